use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// A reviewer's proposed replacement for one field of the reviewed item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldFeedback {
    pub id: String,
    pub review_session_id: String,
    pub field_name: String,
    /// Field value as the reviewer saw it; `None` when the field was unset.
    pub current_value: Option<FieldValue>,
    pub proposed_value: FieldValue,
    pub comment: Option<String>,
    pub is_area_specific: bool,
    pub created_at: DateTime<Utc>,
    /// Last time the proposal was written; moves on every revision.
    pub updated_at: DateTime<Utc>,
}
