//! gazette-common — Shared types, errors, and the HTTP client used across all Gazette crates.

pub mod error;
pub mod entities;
pub mod http;

// Re-export commonly used types
pub use entities::{Article, CandidateArticle, NewArticle, RestoreResult, SnapshotRecord, Topic};
pub use error::{GazetteError, Result};
pub use http::FetchClient;
