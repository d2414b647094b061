//! Conditional writes for Passit DB
//!
//! - [`ConversationCoordinator`]: creates at most one conversation per pair
//!   of users, resolving duplicate and concurrent requests to the existing one
//! - [`create_listing`] / [`update_listing`]: listing writes with an
//!   enumerated set of updatable fields and an owner guard
//! - [`post_message`]

pub mod conversation;
pub mod error;
pub mod listing;
pub mod message;
pub mod model;

pub use conversation::{ConversationCoordinator, ConversationTables, RecoveryPolicy};
pub use error::{Result, TransactError};
pub use listing::{create_listing, update_listing, ListingPatch};
pub use message::post_message;
pub use model::{
    Conversation, ConversationLink, Listing, ListingStatus, Location, Message, NewListing,
    PairIndexRow,
};
