//! Service layer orchestrating database mutations with audit entries.
//!
//! `ReviewService` wraps `ReviewDb` (raw database access) together with the
//! quorum policy in force for this process. All repo methods are implemented
//! as `impl ReviewService` blocks under [`crate::repos`].

use tally_core::quorum::QuorumPolicy;

use crate::ReviewDb;
use crate::error::DatabaseError;

/// Default number of pending comments surfaced on the dashboard.
pub const DEFAULT_TRIAGE_LIMIT: usize = 10;

/// Orchestrates review-state mutations and fan-in reads.
///
/// Every mutation method follows this protocol:
/// 1. Validate inputs (no write on failure)
/// 2. Execute SQL (single statement for upserts)
/// 3. Append audit entry
///
/// The quorum policy lives here rather than in the database so changing the
/// threshold re-evaluates every item on the next read.
pub struct ReviewService {
    db: ReviewDb,
    policy: QuorumPolicy,
    triage_limit: usize,
}

impl ReviewService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = ReviewDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create a service backed by an embedded replica of a remote primary.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the replica cannot be opened.
    pub async fn new_remote_replica(
        local_replica_path: &str,
        remote_url: &str,
        auth_token: &str,
    ) -> Result<Self, DatabaseError> {
        let db = ReviewDb::open_remote_replica(local_replica_path, remote_url, auth_token).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `ReviewDb` with the default policy.
    #[must_use]
    pub fn from_db(db: ReviewDb) -> Self {
        Self {
            db,
            policy: QuorumPolicy::default(),
            triage_limit: DEFAULT_TRIAGE_LIMIT,
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: QuorumPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn with_triage_limit(mut self, triage_limit: usize) -> Self {
        self.triage_limit = triage_limit;
        self
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &ReviewDb {
        &self.db
    }

    /// The quorum policy used when no per-call threshold is given.
    #[must_use]
    pub const fn policy(&self) -> &QuorumPolicy {
        &self.policy
    }

    #[must_use]
    pub const fn triage_limit(&self) -> usize {
        self.triage_limit
    }

    /// Sync the underlying database with its remote primary.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the sync request fails.
    pub async fn sync(&self) -> Result<(), DatabaseError> {
        self.db.sync().await
    }

    #[must_use]
    pub const fn is_remote_replica(&self) -> bool {
        self.db.is_remote_replica()
    }
}
