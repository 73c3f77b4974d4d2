//! Field feedback repository.
//!
//! One proposal per (session, field). A second proposal for the same field
//! overwrites the first in place, keeping its id and `created_at` and
//! moving `updated_at`.

use chrono::Utc;

use tally_core::audit_detail::FeedbackDetail;
use tally_core::entities::FieldFeedback;
use tally_core::enums::{AuditAction, EntityType};
use tally_core::errors::require_non_empty;
use tally_core::ids::PREFIX_FEEDBACK;
use tally_core::value::FieldValue;

use crate::error::DatabaseError;
use crate::helpers::{
    encode_field_value, get_opt_string, parse_datetime, parse_field_value,
    parse_optional_field_value, placeholders, text_params,
};
use crate::service::ReviewService;

const FEEDBACK_COLS: &str = "f.id, f.review_session_id, f.field_name, f.current_value, \
     f.proposed_value, f.comment, f.is_area_specific, f.created_at, f.updated_at";

const RETURNING_COLS: &str = "id, review_session_id, field_name, current_value, \
     proposed_value, comment, is_area_specific, created_at, updated_at";

fn row_to_feedback(row: &libsql::Row) -> Result<FieldFeedback, DatabaseError> {
    Ok(FieldFeedback {
        id: row.get(0)?,
        review_session_id: row.get(1)?,
        field_name: row.get(2)?,
        current_value: parse_optional_field_value(get_opt_string(row, 3)?.as_deref())?,
        proposed_value: parse_field_value(&row.get::<String>(4)?)?,
        comment: get_opt_string(row, 5)?,
        is_area_specific: row.get::<i64>(6)? != 0,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

/// A proposed field change, ready to upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackDraft {
    pub session_id: String,
    pub field_name: String,
    pub current_value: Option<FieldValue>,
    pub proposed_value: FieldValue,
    pub comment: Option<String>,
    pub is_area_specific: bool,
}

impl FeedbackDraft {
    pub fn new(
        session_id: impl Into<String>,
        field_name: impl Into<String>,
        proposed_value: impl Into<FieldValue>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            field_name: field_name.into(),
            current_value: None,
            proposed_value: proposed_value.into(),
            comment: None,
            is_area_specific: false,
        }
    }

    #[must_use]
    pub fn current(mut self, value: impl Into<FieldValue>) -> Self {
        self.current_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    #[must_use]
    pub const fn area_specific(mut self, is_area_specific: bool) -> Self {
        self.is_area_specific = is_area_specific;
        self
    }
}

impl ReviewService {
    /// Insert or overwrite the feedback for (`session_id`, `field_name`).
    ///
    /// Feedback may still be recorded after the session completes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if the field name is blank, or
    /// `DatabaseError::NotFound` if the session does not exist.
    pub async fn upsert_feedback(&self, draft: &FeedbackDraft) -> Result<FieldFeedback, DatabaseError> {
        require_non_empty("field_name", &draft.field_name)?;
        require_non_empty("session_id", &draft.session_id)?;
        let field_name = draft.field_name.trim();
        let session = self.get_session(&draft.session_id).await?;

        let id = self.db().generate_id(PREFIX_FEEDBACK).await?;
        let current = draft
            .current_value
            .as_ref()
            .map(encode_field_value)
            .transpose()?;
        let proposed = encode_field_value(&draft.proposed_value)?;
        let comment = draft
            .comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "INSERT INTO field_feedback
                         (id, review_session_id, field_name, current_value, proposed_value,
                          comment, is_area_specific, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                     ON CONFLICT(review_session_id, field_name) DO UPDATE SET
                         current_value = excluded.current_value,
                         proposed_value = excluded.proposed_value,
                         comment = excluded.comment,
                         is_area_specific = excluded.is_area_specific,
                         updated_at = excluded.updated_at
                     RETURNING {RETURNING_COLS}"
                ),
                libsql::params![
                    id.as_str(),
                    session.id.as_str(),
                    field_name,
                    current,
                    proposed,
                    comment,
                    i64::from(draft.is_area_specific),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let feedback = row_to_feedback(&row)?;
        drop(rows);

        let action = if feedback.id == id {
            AuditAction::Created
        } else {
            AuditAction::Updated
        };
        tracing::debug!(feedback_id = %feedback.id, field_name, %action, "field feedback recorded");
        self.record_audit(
            Some(&session.id),
            EntityType::Feedback,
            &feedback.id,
            action,
            Some(&FeedbackDetail {
                field_name: feedback.field_name.clone(),
                proposed_value: feedback.proposed_value.clone(),
            }),
        )
        .await?;

        Ok(feedback)
    }

    /// Get one feedback row by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if it does not exist.
    pub async fn get_feedback(&self, id: &str) -> Result<FieldFeedback, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {FEEDBACK_COLS} FROM field_feedback f WHERE f.id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Feedback, id))?;
        row_to_feedback(&row)
    }

    /// Feedback recorded in one session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_feedback_by_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<FieldFeedback>, DatabaseError> {
        self.query_feedback(
            &format!(
                "SELECT {FEEDBACK_COLS} FROM field_feedback f
                 WHERE f.review_session_id = ?1 ORDER BY f.created_at, f.rowid"
            ),
            vec![libsql::Value::Text(session_id.to_string())],
        )
        .await
    }

    /// Everything proposed for an item so far, across all reviewers.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_feedback_by_item(
        &self,
        item_id: &str,
    ) -> Result<Vec<FieldFeedback>, DatabaseError> {
        self.list_feedback_for_items(&[item_id.to_string()]).await
    }

    /// Feedback across a set of items. An empty id list yields no rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_feedback_for_items(
        &self,
        item_ids: &[String],
    ) -> Result<Vec<FieldFeedback>, DatabaseError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {FEEDBACK_COLS} FROM field_feedback f
             JOIN review_sessions s ON s.id = f.review_session_id
             WHERE s.item_id IN ({}) ORDER BY f.created_at, f.rowid",
            placeholders(1, item_ids.len())
        );
        self.query_feedback(&sql, text_params(item_ids)).await
    }

    /// Delete one feedback row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if it does not exist.
    pub async fn delete_feedback(&self, id: &str) -> Result<(), DatabaseError> {
        let existing = self.get_feedback(id).await?;
        let deleted = self
            .db()
            .conn()
            .execute("DELETE FROM field_feedback WHERE id = ?1", [id])
            .await?;
        if deleted == 0 {
            return Err(DatabaseError::not_found(EntityType::Feedback, id));
        }
        self.record_audit::<()>(
            Some(&existing.review_session_id),
            EntityType::Feedback,
            id,
            AuditAction::Deleted,
            None,
        )
        .await
    }

    async fn query_feedback(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<FieldFeedback>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut feedback = Vec::new();
        while let Some(row) = rows.next().await? {
            feedback.push(row_to_feedback(&row)?);
        }
        Ok(feedback)
    }
}
