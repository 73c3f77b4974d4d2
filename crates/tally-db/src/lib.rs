//! # tally-db
//!
//! libSQL database operations for the tally review engine.
//!
//! Holds all relational review state: review sessions, field feedback,
//! review comments, the audit trail, and a minimal item table the suggestion
//! applier writes into. Quorum and dashboard reads are computed fresh from
//! these rows on every call.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all review state.
///
/// Wraps a libSQL database and connection. Provides ID generation; the
/// repository methods live on [`service::ReviewService`].
pub struct ReviewDb {
    db: libsql::Database,
    conn: libsql::Connection,
    remote: bool,
}

impl ReviewDb {
    /// Open a local-only database at the given path (no remote sync).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        Self::init(db, false).await
    }

    /// Open an embedded replica of a remote libSQL primary.
    ///
    /// Reads are served from the local file at `path`; writes go to the
    /// primary. Pulls remote state once before migrating.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be built, the initial
    /// sync fails, or migrations fail.
    pub async fn open_remote_replica(
        path: &str,
        url: &str,
        auth_token: &str,
    ) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote_replica(path, url.to_string(), auth_token.to_string())
            .build()
            .await?;
        db.sync().await?;
        Self::init(db, true).await
    }

    async fn init(db: libsql::Database, remote: bool) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let review_db = Self { db, conn, remote };
        review_db.run_migrations().await?;
        Ok(review_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Whether this handle is an embedded replica of a remote primary.
    #[must_use]
    pub const fn is_remote_replica(&self) -> bool {
        self.remote
    }

    /// Sync the embedded replica with its primary. No-op for local databases.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync request fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        if !self.remote {
            return Ok(());
        }
        let replicated = self.db.sync().await?;
        tracing::debug!(frame_no = ?replicated.frame_no(), "replica synced");
        Ok(())
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"rvs-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Helper to create an in-memory database for testing.
    async fn test_db() -> ReviewDb {
        ReviewDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "items",
            "review_sessions",
            "field_feedback",
            "review_comments",
            "audit_trail",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
        assert!(!db.is_remote_replica());
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("rvs").await.unwrap();
        assert!(id.starts_with("rvs-"), "ID should start with 'rvs-': {id}");
        assert_eq!(id.len(), 12, "ID should be 12 chars: {id}");
        assert!(id[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in tally_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = db.generate_id("tst").await.unwrap();
            assert!(ids.insert(id.clone()), "Duplicate ID generated: {id}");
        }
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn local_sync_is_noop() {
        let db = test_db().await;
        db.sync().await.unwrap();
    }

    #[tokio::test]
    async fn session_pair_unique_constraint() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO review_sessions (id, item_id, reviewer_id) VALUES ('rvs-1', 'itm-1', 'usr-a')",
                (),
            )
            .await
            .unwrap();
        let dup = db
            .conn()
            .execute(
                "INSERT INTO review_sessions (id, item_id, reviewer_id) VALUES ('rvs-2', 'itm-1', 'usr-a')",
                (),
            )
            .await;
        assert!(dup.is_err(), "second session for the same pair must be rejected");
    }

    #[tokio::test]
    async fn feedback_requires_existing_session() {
        let db = test_db().await;
        let orphan = db
            .conn()
            .execute(
                "INSERT INTO field_feedback (id, review_session_id, field_name, proposed_value) VALUES ('fbk-1', 'rvs-missing', 'status', '\"done\"')",
                (),
            )
            .await;
        assert!(orphan.is_err(), "foreign key should reject unknown session");
    }

    #[tokio::test]
    async fn comment_status_check_constraint() {
        let db = test_db().await;
        db.conn()
            .execute(
                "INSERT INTO review_sessions (id, item_id, reviewer_id) VALUES ('rvs-1', 'itm-1', 'usr-a')",
                (),
            )
            .await
            .unwrap();
        let bad = db
            .conn()
            .execute(
                "INSERT INTO review_comments (id, review_session_id, item_id, content, status) VALUES ('cmt-1', 'rvs-1', 'itm-1', 'x', 'reopened')",
                (),
            )
            .await;
        assert!(bad.is_err());
    }
}
