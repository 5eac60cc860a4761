//! Gazette Database Layer
//!
//! This crate defines the persistence boundary the pipelines are written
//! against: article storage and the (read-only) topic subsystem. The
//! relational backend lives outside this workspace; the in-memory stores
//! here back the binary's default wiring and every test.
//!
//! # Example
//!
//! ```rust,no_run
//! use gazette_db::{ArticleStore, MemoryArticleStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryArticleStore::new();
//!     let exists = store.exists_by_original_link("https://example.com/a").await?;
//!     assert!(!exists);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;
pub mod memory;

pub use error::{DbError, Result};
pub use store::{ArticleStore, TopicStore};
pub use memory::{MemoryArticleStore, MemoryTopicStore};
