//! Command handlers
//!
//! Handlers take the store as a parameter and return what they would print,
//! so they run the same against DynamoDB and the in-memory store.

pub mod conversation;
pub mod lifecycle;
pub mod page;
