//! Repository modules implementing the review engine's stores and reads.
//!
//! Each module adds methods to `ReviewService` via `impl ReviewService` blocks.

pub mod apply;
pub mod audit;
pub mod comment;
pub mod dashboard;
pub mod feedback;
pub mod item;
pub mod quorum;
pub mod session;
