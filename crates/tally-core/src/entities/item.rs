use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::TargetType;

/// A reviewable project or one of its tasks.
///
/// The review engine only references items by id; this row exists so the
/// suggestion applier has somewhere to write and listings have a title.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub kind: TargetType,
    pub parent_id: Option<String>,
    pub title: String,
    /// Arbitrary field map (`status`, `progress`, `tags`, ...).
    pub fields: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
