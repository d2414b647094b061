//! Cursor pagination for Passit DB
//!
//! [`Paginator`] turns the store's continuation-key reads into pages that
//! never exceed the requested limit and whose cursor, when present, always
//! yields at least one more item.
//!
//! ```ignore
//! let paginator = Paginator::new(store);
//! let request = PageRequest::query("messages", KeyCondition::partition("conversationId", id))
//!     .with_index("conversation-index")
//!     .with_limit(Some(20))
//!     .descending();
//! let page: Page<Message> = paginator.fetch_page(&request).await?;
//! ```

pub mod cursor;
pub mod error;
pub mod page;
pub mod paginate;

pub use cursor::Cursor;
pub use error::{QueryError, Result};
pub use page::{Page, PageRequest, ReadMode};
pub use paginate::Paginator;
