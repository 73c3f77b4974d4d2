//! Review comment repository.
//!
//! Comments move `pending -> answered -> resolved` (or straight to
//! `resolved`). Nothing here exposes a way back to `pending`. Privilege
//! checks for responding and resolving belong to the caller.

use chrono::Utc;

use tally_core::audit_detail::StatusChangedDetail;
use tally_core::entities::{CommentView, ReviewComment};
use tally_core::enums::{AuditAction, CommentStatus, EntityType};
use tally_core::errors::{CoreError, require_non_empty};
use tally_core::ids::PREFIX_COMMENT;

use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, parse_datetime, parse_enum, parse_optional_datetime, placeholders, text_params,
};
use crate::service::ReviewService;

const COMMENT_COLS: &str = "c.id, c.review_session_id, c.item_id, c.sub_item_id, c.content, \
     c.status, c.admin_response, c.admin_responded_at, c.created_at";

const VIEW_JOINS: &str = "FROM review_comments c
     JOIN review_sessions s ON s.id = c.review_session_id
     LEFT JOIN items i ON i.id = c.item_id";

fn row_to_comment(row: &libsql::Row) -> Result<ReviewComment, DatabaseError> {
    Ok(ReviewComment {
        id: row.get(0)?,
        review_session_id: row.get(1)?,
        item_id: row.get(2)?,
        sub_item_id: get_opt_string(row, 3)?,
        content: row.get(4)?,
        status: parse_enum(&row.get::<String>(5)?)?,
        admin_response: get_opt_string(row, 6)?,
        admin_responded_at: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

/// Expects `COMMENT_COLS` followed by reviewer id, area and item title.
fn row_to_view(row: &libsql::Row) -> Result<CommentView, DatabaseError> {
    Ok(CommentView {
        comment: row_to_comment(row)?,
        reviewer_id: row.get(9)?,
        reviewer_area: get_opt_string(row, 10)?,
        item_title: get_opt_string(row, 11)?,
    })
}

impl ReviewService {
    /// Add a pending comment to a session's item, optionally about a sub-item.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if a required value is blank or
    /// the session reviews a different item, and `DatabaseError::NotFound`
    /// if the session does not exist.
    pub async fn add_comment(
        &self,
        session_id: &str,
        item_id: &str,
        content: &str,
        sub_item_id: Option<&str>,
    ) -> Result<ReviewComment, DatabaseError> {
        require_non_empty("session_id", session_id)?;
        require_non_empty("item_id", item_id)?;
        require_non_empty("content", content)?;

        let session = self.get_session(session_id).await?;
        if session.item_id != item_id {
            return Err(CoreError::Validation(format!(
                "session {session_id} reviews {}, not {item_id}",
                session.item_id
            ))
            .into());
        }

        let id = self.db().generate_id(PREFIX_COMMENT).await?;
        let sub_item_id = sub_item_id.map(str::trim).filter(|s| !s.is_empty());
        self.db()
            .conn()
            .execute(
                "INSERT INTO review_comments
                     (id, review_session_id, item_id, sub_item_id, content, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'pending', ?6)",
                libsql::params![
                    id.as_str(),
                    session_id,
                    item_id,
                    sub_item_id,
                    content.trim(),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;

        self.record_audit::<()>(
            Some(session_id),
            EntityType::Comment,
            &id,
            AuditAction::Created,
            None,
        )
        .await?;

        self.get_comment(&id).await
    }

    /// Record an admin's answer and move the comment to `answered`.
    ///
    /// Responding again to an answered comment replaces the response.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the comment does not exist,
    /// `DatabaseError::Validation` if the response is blank, or
    /// `DatabaseError::InvalidState` if the comment is already resolved.
    pub async fn admin_respond(
        &self,
        comment_id: &str,
        response: &str,
    ) -> Result<ReviewComment, DatabaseError> {
        require_non_empty("response", response)?;
        let current = self.get_comment(comment_id).await?;

        if !current.status.can_transition_to(CommentStatus::Answered) {
            return Err(CoreError::InvalidTransition {
                entity_type: EntityType::Comment.as_str().to_string(),
                id: comment_id.to_string(),
                from: current.status.as_str().to_string(),
                to: CommentStatus::Answered.as_str().to_string(),
            }
            .into());
        }

        if self.write_answer(comment_id, response.trim()).await? == 0 {
            let now = self.get_comment(comment_id).await?;
            return Err(DatabaseError::InvalidState(format!(
                "comment {comment_id} is {} and can no longer be answered",
                now.status
            )));
        }

        tracing::info!(comment_id, from = %current.status, "comment answered");
        self.record_audit(
            Some(&current.review_session_id),
            EntityType::Comment,
            comment_id,
            AuditAction::Responded,
            Some(&StatusChangedDetail {
                from: current.status.as_str().to_string(),
                to: CommentStatus::Answered.as_str().to_string(),
                reason: Some(response.trim().to_string()),
            }),
        )
        .await?;

        self.get_comment(comment_id).await
    }

    /// Move a comment to `resolved`. Already-resolved comments are returned as-is.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the comment does not exist.
    pub async fn resolve_comment(&self, comment_id: &str) -> Result<ReviewComment, DatabaseError> {
        let current = self.get_comment(comment_id).await?;
        if current.status == CommentStatus::Resolved {
            return Ok(current);
        }

        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE review_comments SET status = 'resolved'
                 WHERE id = ?1 AND status <> 'resolved'",
                [comment_id],
            )
            .await?;
        if changed == 0 {
            return self.get_comment(comment_id).await;
        }

        tracing::info!(comment_id, from = %current.status, "comment resolved");
        self.record_audit(
            Some(&current.review_session_id),
            EntityType::Comment,
            comment_id,
            AuditAction::StatusChanged,
            Some(&StatusChangedDetail {
                from: current.status.as_str().to_string(),
                to: CommentStatus::Resolved.as_str().to_string(),
                reason: None,
            }),
        )
        .await?;

        self.get_comment(comment_id).await
    }

    /// Store an answer unless the comment has been resolved in the meantime.
    /// Returns the number of rows changed.
    async fn write_answer(&self, comment_id: &str, response: &str) -> Result<u64, DatabaseError> {
        Ok(self
            .db()
            .conn()
            .execute(
                "UPDATE review_comments
                 SET admin_response = ?1, admin_responded_at = ?2, status = 'answered'
                 WHERE id = ?3 AND status IN ('pending', 'answered')",
                libsql::params![response, Utc::now().to_rfc3339(), comment_id],
            )
            .await?)
    }

    /// Get a comment by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the comment does not exist.
    pub async fn get_comment(&self, id: &str) -> Result<ReviewComment, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {COMMENT_COLS} FROM review_comments c WHERE c.id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Comment, id))?;
        row_to_comment(&row)
    }

    /// Comments on an item with reviewer and item context, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_comments_by_item(
        &self,
        item_id: &str,
    ) -> Result<Vec<CommentView>, DatabaseError> {
        self.list_comment_views_for_items(&[item_id.to_string()])
            .await
    }

    /// Comment views across a set of items. An empty id list yields no rows.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_comment_views_for_items(
        &self,
        item_ids: &[String],
    ) -> Result<Vec<CommentView>, DatabaseError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {COMMENT_COLS}, s.reviewer_id, s.reviewer_area, i.title
             {VIEW_JOINS}
             WHERE c.item_id IN ({}) ORDER BY c.created_at, c.rowid",
            placeholders(1, item_ids.len())
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(text_params(item_ids)))
            .await?;
        let mut views = Vec::new();
        while let Some(row) = rows.next().await? {
            views.push(row_to_view(&row)?);
        }
        Ok(views)
    }

    /// Comments left in one session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_comments_by_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<ReviewComment>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {COMMENT_COLS} FROM review_comments c
                     WHERE c.review_session_id = ?1 ORDER BY c.created_at, c.rowid"
                ),
                [session_id],
            )
            .await?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next().await? {
            comments.push(row_to_comment(&row)?);
        }
        Ok(comments)
    }

    /// Delete a comment.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the comment does not exist.
    pub async fn delete_comment(&self, id: &str) -> Result<(), DatabaseError> {
        let existing = self.get_comment(id).await?;
        self.db()
            .conn()
            .execute("DELETE FROM review_comments WHERE id = ?1", [id])
            .await?;
        self.record_audit::<()>(
            Some(&existing.review_session_id),
            EntityType::Comment,
            id,
            AuditAction::Deleted,
            None,
        )
        .await
    }
}
