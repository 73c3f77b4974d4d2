//! Status enums, target kinds, and audit vocabulary for tally.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Status of a review session.
///
/// ```text
/// in_progress → completed
/// ```
///
/// A completed session is terminal. Starting it again resumes nothing and
/// returns the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
}

impl SessionStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::InProgress => &[Self::Completed],
            Self::Completed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CommentStatus
// ---------------------------------------------------------------------------

/// Status of a review comment.
///
/// ```text
/// pending → answered → resolved
///         → resolved
/// answered → answered (admin re-responds)
/// ```
///
/// No transition leads back to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    Pending,
    Answered,
    Resolved,
}

impl CommentStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Pending | Self::Answered => &[Self::Answered, Self::Resolved],
            Self::Resolved => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Answered => "answered",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TargetType
// ---------------------------------------------------------------------------

/// Kind of reviewable thing a suggestion can write to.
///
/// `Project` is the reviewable item; `Task` is a sub-item inside a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TargetType {
    Project,
    Task,
}

impl TargetType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "task" => Ok(Self::Task),
            other => Err(CoreError::Validation(format!(
                "unknown target_type '{other}' (expected project or task)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldKind
// ---------------------------------------------------------------------------

/// Shape of a field value, used to validate suggestions before writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    TextList,
}

impl FieldKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::TextList => "text_list",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Type of action recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    StatusChanged,
    Responded,
    SessionStart,
    SessionComplete,
    SuggestionApplied,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
            Self::StatusChanged => "status_changed",
            Self::Responded => "responded",
            Self::SessionStart => "session_start",
            Self::SessionComplete => "session_complete",
            Self::SuggestionApplied => "suggestion_applied",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Type of entity in the system, used in the audit trail and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Item,
    Session,
    Feedback,
    Comment,
    Audit,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Session => "session",
            Self::Feedback => "feedback",
            Self::Comment => "comment",
            Self::Audit => "audit",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        session_in_progress,
        SessionStatus,
        SessionStatus::InProgress,
        "in_progress"
    );
    test_serde_roundtrip!(
        comment_answered,
        CommentStatus,
        CommentStatus::Answered,
        "answered"
    );
    test_serde_roundtrip!(field_kind_list, FieldKind, FieldKind::TextList, "text_list");
    test_serde_roundtrip!(
        audit_suggestion_applied,
        AuditAction,
        AuditAction::SuggestionApplied,
        "suggestion_applied"
    );

    #[test]
    fn session_completed_is_terminal() {
        assert!(SessionStatus::InProgress.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Completed.allowed_next_states().is_empty());
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::InProgress));
    }

    #[test]
    fn comment_status_never_returns_to_pending() {
        for status in [
            CommentStatus::Pending,
            CommentStatus::Answered,
            CommentStatus::Resolved,
        ] {
            assert!(!status.can_transition_to(CommentStatus::Pending));
        }
    }

    #[test]
    fn comment_pending_can_skip_to_resolved() {
        assert!(CommentStatus::Pending.can_transition_to(CommentStatus::Resolved));
        assert!(CommentStatus::Answered.can_transition_to(CommentStatus::Answered));
        assert!(!CommentStatus::Resolved.can_transition_to(CommentStatus::Answered));
    }

    #[test]
    fn target_type_parses_case_insensitively() {
        assert_eq!("Project".parse::<TargetType>().unwrap(), TargetType::Project);
        assert_eq!(" task ".parse::<TargetType>().unwrap(), TargetType::Task);
        assert!("milestone".parse::<TargetType>().is_err());
    }

    #[test]
    fn as_str_matches_display() {
        assert_eq!(SessionStatus::Completed.to_string(), "completed");
        assert_eq!(EntityType::Feedback.to_string(), "feedback");
        assert_eq!(TargetType::Task.to_string(), "task");
    }
}
