//! gazette-web — Operational HTTP surface.
//! Exposes on-demand triggers for:
//!   - a collection run (all topics, or one)
//!   - a backup of one day
//!   - a restore of a range of days

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::{AppState, SharedState};
