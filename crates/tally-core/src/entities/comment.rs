use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::CommentStatus;

/// A remark left during review, answered and resolved by an admin.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewComment {
    pub id: String,
    pub review_session_id: String,
    pub item_id: String,
    pub sub_item_id: Option<String>,
    pub content: String,
    pub status: CommentStatus,
    pub admin_response: Option<String>,
    pub admin_responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A comment joined with the session and item it belongs to, for listings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: ReviewComment,
    pub reviewer_id: String,
    pub reviewer_area: Option<String>,
    pub item_title: Option<String>,
}
