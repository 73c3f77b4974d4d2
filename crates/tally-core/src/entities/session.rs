use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SessionStatus;

/// One reviewer's pass over one item. At most one exists per
/// (`item_id`, `reviewer_id`).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewSession {
    pub id: String,
    pub item_id: String,
    pub reviewer_id: String,
    /// Advisory area tag. Never counted toward quorum unless areas are
    /// explicitly required by configuration.
    pub reviewer_area: Option<String>,
    pub status: SessionStatus,
    /// `None` only for rows imported without a start time; backfilled on resume.
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewSession {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}
