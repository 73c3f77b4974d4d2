//! Review session repository.
//!
//! One session per (item, reviewer). Owns the start/resume/complete state
//! machine; a completed session is never reopened.

use chrono::Utc;

use tally_core::audit_detail::StatusChangedDetail;
use tally_core::entities::ReviewSession;
use tally_core::enums::{AuditAction, EntityType, SessionStatus};
use tally_core::errors::require_non_empty;
use tally_core::ids::PREFIX_SESSION;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_optional_datetime, placeholders, text_params,
};
use crate::service::ReviewService;

pub(crate) const SESSION_COLS: &str =
    "id, item_id, reviewer_id, reviewer_area, status, started_at, completed_at, updated_at";

pub(crate) fn row_to_session(row: &libsql::Row) -> Result<ReviewSession, DatabaseError> {
    Ok(ReviewSession {
        id: row.get(0)?,
        item_id: row.get(1)?,
        reviewer_id: row.get(2)?,
        reviewer_area: get_opt_string(row, 3)?,
        status: parse_enum(&row.get::<String>(4)?)?,
        started_at: parse_optional_datetime(get_opt_string(row, 5)?.as_deref())?,
        completed_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        updated_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl ReviewService {
    /// Start a session for (`item_id`, `reviewer_id`), or resume the existing one.
    ///
    /// A new session starts `in_progress`. An existing in-progress session has
    /// `updated_at` refreshed and `started_at` backfilled when unset. A
    /// completed session is returned untouched.
    ///
    /// Runs as one `INSERT ... ON CONFLICT DO UPDATE` so two concurrent starts
    /// for the same pair cannot both insert.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if either id is empty.
    pub async fn start_or_resume_session(
        &self,
        item_id: &str,
        reviewer_id: &str,
        reviewer_area: Option<&str>,
    ) -> Result<ReviewSession, DatabaseError> {
        require_non_empty("item_id", item_id)?;
        require_non_empty("reviewer_id", reviewer_id)?;
        let area = reviewer_area.map(str::trim).filter(|a| !a.is_empty());

        let now = Utc::now().to_rfc3339();
        let id = self.db().generate_id(PREFIX_SESSION).await?;

        let sql = format!(
            "INSERT INTO review_sessions
                 (id, item_id, reviewer_id, reviewer_area, status, started_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, 'in_progress', ?5, ?5)
             ON CONFLICT(item_id, reviewer_id) DO UPDATE SET
                 updated_at = CASE WHEN review_sessions.status = 'completed'
                     THEN review_sessions.updated_at ELSE excluded.updated_at END,
                 started_at = CASE WHEN review_sessions.status = 'completed'
                     THEN review_sessions.started_at
                     ELSE COALESCE(review_sessions.started_at, excluded.started_at) END,
                 reviewer_area = CASE WHEN review_sessions.status = 'completed'
                     THEN review_sessions.reviewer_area
                     ELSE COALESCE(review_sessions.reviewer_area, excluded.reviewer_area) END
             RETURNING {SESSION_COLS}"
        );
        let mut rows = self
            .db()
            .conn()
            .query(
                &sql,
                libsql::params![id.as_str(), item_id, reviewer_id, area, now],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let session = row_to_session(&row)?;
        drop(rows);

        if session.id == id {
            tracing::info!(session_id = %session.id, item_id, reviewer_id, "review session started");
            self.record_audit::<()>(
                Some(&session.id),
                EntityType::Session,
                &session.id,
                AuditAction::SessionStart,
                None,
            )
            .await?;
        } else {
            tracing::debug!(session_id = %session.id, status = %session.status, "review session resumed");
        }

        Ok(session)
    }

    /// Mark a session completed.
    ///
    /// Completing an already-completed session returns it unchanged, keeping
    /// the original `completed_at`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the session does not exist.
    pub async fn complete_session(&self, session_id: &str) -> Result<ReviewSession, DatabaseError> {
        let current = self.get_session(session_id).await?;
        if current.is_completed() {
            return Ok(current);
        }

        let now = Utc::now().to_rfc3339();
        self.db()
            .conn()
            .execute(
                "UPDATE review_sessions SET status = 'completed', completed_at = ?1, updated_at = ?1
                 WHERE id = ?2 AND status = 'in_progress'",
                libsql::params![now, session_id],
            )
            .await?;

        let updated = self.get_session(session_id).await?;
        tracing::info!(session_id, item_id = %updated.item_id, "review session completed");

        self.record_audit(
            Some(session_id),
            EntityType::Session,
            session_id,
            AuditAction::SessionComplete,
            Some(&StatusChangedDetail {
                from: SessionStatus::InProgress.as_str().to_string(),
                to: SessionStatus::Completed.as_str().to_string(),
                reason: None,
            }),
        )
        .await?;

        Ok(updated)
    }

    /// Get a session by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the session does not exist.
    pub async fn get_session(&self, id: &str) -> Result<ReviewSession, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SESSION_COLS} FROM review_sessions WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Session, id))?;
        row_to_session(&row)
    }

    /// Look up the session for an (item, reviewer) pair.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_session_by_item_and_reviewer(
        &self,
        item_id: &str,
        reviewer_id: &str,
    ) -> Result<Option<ReviewSession>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SESSION_COLS} FROM review_sessions WHERE item_id = ?1 AND reviewer_id = ?2"
                ),
                [item_id, reviewer_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_session(&row)?)),
            None => Ok(None),
        }
    }

    /// All sessions for one item, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_sessions_by_item(
        &self,
        item_id: &str,
    ) -> Result<Vec<ReviewSession>, DatabaseError> {
        self.query_sessions(
            &format!(
                "SELECT {SESSION_COLS} FROM review_sessions WHERE item_id = ?1
                 ORDER BY started_at, rowid"
            ),
            vec![libsql::Value::Text(item_id.to_string())],
        )
        .await
    }

    /// All sessions a reviewer has opened, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_sessions_by_reviewer(
        &self,
        reviewer_id: &str,
    ) -> Result<Vec<ReviewSession>, DatabaseError> {
        self.query_sessions(
            &format!(
                "SELECT {SESSION_COLS} FROM review_sessions WHERE reviewer_id = ?1
                 ORDER BY updated_at DESC, rowid DESC"
            ),
            vec![libsql::Value::Text(reviewer_id.to_string())],
        )
        .await
    }

    /// Sessions across a set of items. An empty id list yields no rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_sessions_for_items(
        &self,
        item_ids: &[String],
    ) -> Result<Vec<ReviewSession>, DatabaseError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {SESSION_COLS} FROM review_sessions WHERE item_id IN ({})
             ORDER BY started_at, rowid",
            placeholders(1, item_ids.len())
        );
        self.query_sessions(&sql, text_params(item_ids)).await
    }

    async fn query_sessions(
        &self,
        sql: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<ReviewSession>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(sql, libsql::params_from_iter(params))
            .await?;
        let mut sessions = Vec::new();
        while let Some(row) = rows.next().await? {
            sessions.push(row_to_session(&row)?);
        }
        Ok(sessions)
    }
}
