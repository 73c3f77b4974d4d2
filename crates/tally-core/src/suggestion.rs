//! Suggestions and the per-suggestion application report.
//!
//! A `Suggestion` is the engine-agnostic form of a proposed field change. It
//! comes either from reviewer feedback or from an external text extractor, so
//! every field is optional on the wire: a malformed entry must be reported as
//! one failure, not abort the whole batch.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::FieldFeedback;
use crate::enums::{FieldKind, TargetType};
use crate::errors::CoreError;
use crate::value::FieldValue;

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Suggestion {
    #[serde(default)]
    pub target_type: String,
    #[serde(default)]
    pub target_id: String,
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub proposed_value: Option<FieldValue>,
}

/// A suggestion that passed shape validation and is ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSuggestion<'a> {
    pub target_type: TargetType,
    pub target_id: &'a str,
    pub field_name: &'a str,
    pub value: &'a FieldValue,
}

impl Suggestion {
    pub fn new(
        target_type: TargetType,
        target_id: impl Into<String>,
        field_name: impl Into<String>,
        proposed_value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            target_type: target_type.as_str().to_string(),
            target_id: target_id.into(),
            field_name: field_name.into(),
            proposed_value: Some(proposed_value.into()),
        }
    }

    /// Build the suggestion a piece of reviewer feedback stands for.
    #[must_use]
    pub fn from_feedback(item_id: &str, feedback: &FieldFeedback) -> Self {
        Self {
            target_type: TargetType::Project.as_str().to_string(),
            target_id: item_id.to_string(),
            field_name: feedback.field_name.clone(),
            proposed_value: Some(feedback.proposed_value.clone()),
        }
    }

    /// Read one entry of an untrusted batch (e.g. extractor output).
    ///
    /// Null or non-string `target_type`/`target_id`/`field_name` become empty
    /// strings and fail later in [`Self::validate`]. A `proposed_value` outside
    /// the supported shapes, or an entry that is not an object, is returned as
    /// a ready-made failure.
    ///
    /// # Errors
    ///
    /// Returns the `SuggestionFailure` to report for an unusable entry.
    pub fn from_json_lossy(entry: &serde_json::Value) -> Result<Self, SuggestionFailure> {
        let Some(fields) = entry.as_object() else {
            return Err(SuggestionFailure {
                suggestion: Self::default(),
                error: CoreError::Validation(format!("suggestion must be a JSON object, got {entry}"))
                    .to_string(),
            });
        };
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
                .unwrap_or_default()
        };
        let mut suggestion = Self {
            target_type: text("target_type"),
            target_id: text("target_id"),
            field_name: text("field_name"),
            proposed_value: None,
        };

        match fields.get("proposed_value") {
            None | Some(serde_json::Value::Null) => Ok(suggestion),
            Some(raw) => match FieldValue::from_json(raw) {
                Some(value) => {
                    suggestion.proposed_value = Some(value);
                    Ok(suggestion)
                }
                None => Err(SuggestionFailure {
                    suggestion,
                    error: CoreError::Validation(format!(
                        "unsupported proposed_value shape: {raw}"
                    ))
                    .to_string(),
                }),
            },
        }
    }

    /// Check required fields and the value shape for known fields.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` describing the first problem found.
    pub fn validate(&self) -> Result<ValidSuggestion<'_>, CoreError> {
        if self.target_type.trim().is_empty() {
            return Err(CoreError::Validation("target_type is required".into()));
        }
        if self.target_id.trim().is_empty() {
            return Err(CoreError::Validation("target_id is required".into()));
        }
        if self.field_name.trim().is_empty() {
            return Err(CoreError::Validation("field_name is required".into()));
        }
        let target_type: TargetType = self.target_type.parse()?;
        let value = self
            .proposed_value
            .as_ref()
            .ok_or_else(|| CoreError::Validation("proposed_value is required".into()))?;

        check_field_shape(target_type, &self.field_name, value)?;

        Ok(ValidSuggestion {
            target_type,
            target_id: &self.target_id,
            field_name: &self.field_name,
            value,
        })
    }
}

/// Declared value kind for well-known fields. Unknown fields return `None`
/// and accept any shape.
#[must_use]
pub fn known_field_kind(target_type: TargetType, field_name: &str) -> Option<FieldKind> {
    match (target_type, field_name) {
        (_, "title" | "description" | "status") => Some(FieldKind::Text),
        (TargetType::Project, "priority") | (TargetType::Task, "assignee" | "due_date") => {
            Some(FieldKind::Text)
        }
        (TargetType::Project, "progress") => Some(FieldKind::Number),
        (TargetType::Project, "tags") => Some(FieldKind::TextList),
        (TargetType::Project, "is_active") | (TargetType::Task, "completed") => {
            Some(FieldKind::Boolean)
        }
        _ => None,
    }
}

fn check_field_shape(
    target_type: TargetType,
    field_name: &str,
    value: &FieldValue,
) -> Result<(), CoreError> {
    let Some(expected) = known_field_kind(target_type, field_name) else {
        return Ok(());
    };
    if value.kind() != expected {
        return Err(CoreError::Validation(format!(
            "{target_type}.{field_name} expects {expected}, got {}",
            value.kind()
        )));
    }
    if field_name == "title" && matches!(value, FieldValue::Text(s) if s.trim().is_empty()) {
        return Err(CoreError::Validation(format!(
            "{target_type}.title cannot be empty"
        )));
    }
    if field_name == "progress" {
        if let Some(n) = value.as_f64() {
            if !(0.0..=100.0).contains(&n) {
                return Err(CoreError::Validation(format!(
                    "{target_type}.progress must be between 0 and 100, got {n}"
                )));
            }
        }
    }
    Ok(())
}

/// Split an untrusted batch into usable suggestions and entries already
/// known to fail, keeping input order within each list.
#[must_use]
pub fn partition_entries(entries: &[serde_json::Value]) -> (Vec<Suggestion>, Vec<SuggestionFailure>) {
    let mut usable = Vec::new();
    let mut rejected = Vec::new();
    for entry in entries {
        match Suggestion::from_json_lossy(entry) {
            Ok(suggestion) => usable.push(suggestion),
            Err(failure) => rejected.push(failure),
        }
    }
    (usable, rejected)
}

/// One suggestion that could not be applied, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SuggestionFailure {
    pub suggestion: Suggestion,
    pub error: String,
}

/// Outcome of a best-effort batch: every input lands in exactly one list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ApplicationResult {
    pub successes: Vec<Suggestion>,
    pub failures: Vec<SuggestionFailure>,
}

impl ApplicationResult {
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The failed subset, ready to resubmit.
    #[must_use]
    pub fn retryable(&self) -> Vec<Suggestion> {
        self.failures.iter().map(|f| f.suggestion.clone()).collect()
    }
}
