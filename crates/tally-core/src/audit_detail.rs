//! Typed audit detail payloads.
//!
//! Each audit action can carry a structured `detail` JSON blob. These types
//! fix the shape of the common ones.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// Detail for `AuditAction::StatusChanged` and `SessionComplete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Detail for `AuditAction::Updated` on field feedback.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FeedbackDetail {
    pub field_name: String,
    pub proposed_value: FieldValue,
}

/// Detail for `AuditAction::SuggestionApplied`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AppliedDetail {
    pub target_type: String,
    pub field_name: String,
    pub value: FieldValue,
}
