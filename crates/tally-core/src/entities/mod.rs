//! Entity structs for tally's persisted rows.
//!
//! Each entity maps to a table in the libSQL database. All structs derive
//! `Serialize`, `Deserialize`, and `JsonSchema` for JSON output and schema
//! validation.

mod audit;
mod comment;
mod feedback;
mod item;
mod session;

pub use audit::AuditEntry;
pub use comment::{CommentView, ReviewComment};
pub use feedback::FieldFeedback;
pub use item::Item;
pub use session::ReviewSession;
