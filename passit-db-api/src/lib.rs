//! Passit backend access patterns
//!
//! [`Backend`] wires pagination, conversation uniqueness and typed entity
//! writes to the configured tables:
//!
//! ```ignore
//! let backend = Backend::new(store, TablesConfig::from_env()?);
//! let link = backend.create_conversation_between(&user_id, &tutor_id).await?;
//! let page = backend.conversation_messages(&link.conversation_id, None, Some(20)).await?;
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod schema;
pub mod user;

pub use backend::Backend;
pub use config::TablesConfig;
pub use error::{ApiError, Result};
pub use user::User;

pub use passit_db_query::{Cursor, Page};
pub use passit_db_transact::{
    ConversationLink, Listing, ListingPatch, ListingStatus, Location, Message, NewListing,
};
