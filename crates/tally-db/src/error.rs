//! Database error types for tally-db.

use tally_core::enums::EntityType;
use tally_core::errors::CoreError;
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The referenced session, feedback, comment, or item does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Required input missing or malformed. Raised before any write.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The row exists but its state forbids the operation.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A SQL query failed or returned unparseable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatabaseError {
    pub(crate) fn not_found(entity: EntityType, id: &str) -> Self {
        Self::NotFound {
            entity: entity.as_str().to_string(),
            id: id.to_string(),
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<CoreError> for DatabaseError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::NotFound { entity_type, id } => Self::NotFound {
                entity: entity_type,
                id,
            },
            CoreError::InvalidTransition {
                entity_type,
                id,
                from,
                to,
            } => Self::InvalidState(format!(
                "Cannot transition {entity_type} {id} from {from} to {to}"
            )),
            CoreError::Unauthorized { actor, action } => {
                Self::InvalidState(format!("{actor} may not {action}"))
            }
            CoreError::Other(e) => Self::Other(e),
        }
    }
}
