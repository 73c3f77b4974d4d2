//! Shared test utilities for tally-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use tally_core::entities::ReviewSession;
    use tally_core::quorum::QuorumPolicy;

    use crate::ReviewDb;
    use crate::service::ReviewService;

    /// Create an in-memory `ReviewService` with the default policy.
    pub async fn test_service() -> ReviewService {
        let db = ReviewDb::open_local(":memory:").await.unwrap();
        ReviewService::from_db(db)
    }

    /// Create an in-memory `ReviewService` with a custom quorum policy.
    pub async fn test_service_with_policy(policy: QuorumPolicy) -> ReviewService {
        test_service().await.with_policy(policy)
    }

    /// Start a session and return it (convenience for tests that need one).
    pub async fn start_test_session(
        svc: &ReviewService,
        item_id: &str,
        reviewer_id: &str,
    ) -> ReviewSession {
        svc.start_or_resume_session(item_id, reviewer_id, None)
            .await
            .unwrap()
    }

    /// Start and immediately complete a session.
    pub async fn completed_session(
        svc: &ReviewService,
        item_id: &str,
        reviewer_id: &str,
        area: Option<&str>,
    ) -> ReviewSession {
        let session = svc
            .start_or_resume_session(item_id, reviewer_id, area)
            .await
            .unwrap();
        svc.complete_session(&session.id).await.unwrap()
    }
}
