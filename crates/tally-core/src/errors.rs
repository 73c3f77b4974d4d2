//! Cross-cutting error types for tally.
//!
//! Storage-specific errors (`DatabaseError`) live in `tally-db`; it converts
//! from `CoreError` so validation raised here surfaces unchanged.

use thiserror::Error;

/// Errors that can be raised by any tally crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Required input missing or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The authorization collaborator refused the caller.
    #[error("Unauthorized: {actor} may not {action}")]
    Unauthorized { actor: String, action: String },

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Reject a missing or blank required string field.
///
/// # Errors
///
/// Returns `CoreError::Validation` naming the field when `value` is empty
/// after trimming.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}
