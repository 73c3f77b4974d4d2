//! Quorum aggregation.
//!
//! Read-only, pull-based: every call re-reads sessions and applies the
//! policy in force now. Rows may change between the session read and the
//! follow-up counts; each row still reflects some committed state.

use tally_core::quorum::{ProgressStats, QuorumPolicy, QuorumStatus, ReviewerStats, dedup_ids};

use crate::error::DatabaseError;
use crate::helpers::placeholders;
use crate::service::ReviewService;

impl ReviewService {
    /// Quorum status for one item.
    ///
    /// `threshold` overrides the configured threshold for this call only.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the session query fails.
    pub async fn compute_item_status(
        &self,
        item_id: &str,
        threshold: Option<u32>,
    ) -> Result<QuorumStatus, DatabaseError> {
        let policy = self.effective_policy(threshold);
        let sessions = self.list_sessions_by_item(item_id).await?;
        let status = QuorumStatus::from_sessions(item_id, &sessions, &policy);
        tracing::debug!(
            item_id,
            sessions = sessions.len(),
            completed = status.completed_reviewer_count,
            threshold = status.threshold,
            "computed item quorum"
        );
        Ok(status)
    }

    /// Review coverage across candidate items, plus one reviewer's own
    /// activity on those items when `reviewer_id` is given.
    ///
    /// `threshold` overrides the configured threshold for this call only,
    /// as in [`Self::compute_item_status`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any query fails.
    pub async fn compute_global_progress(
        &self,
        item_ids: &[String],
        reviewer_id: Option<&str>,
        threshold: Option<u32>,
    ) -> Result<ProgressStats, DatabaseError> {
        let policy = self.effective_policy(threshold);
        let candidates: Vec<String> = dedup_ids(item_ids)
            .into_iter()
            .map(str::to_string)
            .collect();
        let sessions = self.list_sessions_for_items(&candidates).await?;
        let mut stats = ProgressStats::from_sessions(&candidates, &sessions, &policy);
        tracing::debug!(
            items = stats.total,
            sessions = sessions.len(),
            fully_reviewed = stats.fully_reviewed,
            "computed global progress"
        );

        if let Some(reviewer_id) = reviewer_id {
            let mut reviewer = ReviewerStats {
                reviewer_id: reviewer_id.to_string(),
                ..ReviewerStats::default()
            };
            for session in sessions.iter().filter(|s| s.reviewer_id == reviewer_id) {
                if session.is_completed() {
                    reviewer.completed_sessions += 1;
                } else {
                    reviewer.in_progress_sessions += 1;
                }
            }
            reviewer.feedback_count = self
                .count_reviewer_rows("field_feedback", reviewer_id, &candidates)
                .await?;
            reviewer.comment_count = self
                .count_reviewer_rows("review_comments", reviewer_id, &candidates)
                .await?;
            stats.reviewer_stats = Some(reviewer);
        }

        Ok(stats)
    }

    fn effective_policy(&self, threshold: Option<u32>) -> QuorumPolicy {
        let mut policy = self.policy().clone();
        if let Some(threshold) = threshold {
            policy.threshold = threshold;
        }
        policy
    }

    /// Rows in `table` (keyed by `review_session_id`) written from the
    /// reviewer's sessions on the candidate items.
    async fn count_reviewer_rows(
        &self,
        table: &str,
        reviewer_id: &str,
        item_ids: &[String],
    ) -> Result<u32, DatabaseError> {
        if item_ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "SELECT COUNT(*) FROM {table} t
             JOIN review_sessions s ON s.id = t.review_session_id
             WHERE s.reviewer_id = ?1 AND s.item_id IN ({})",
            placeholders(2, item_ids.len())
        );
        let mut params = vec![libsql::Value::Text(reviewer_id.to_string())];
        params.extend(item_ids.iter().map(|id| libsql::Value::Text(id.clone())));

        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let count: i64 = row.get(0)?;
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use tally_core::quorum::ReviewState;

    use crate::repos::feedback::FeedbackDraft;
    use crate::test_support::helpers::{
        completed_session, start_test_session, test_service, test_service_with_policy,
    };

    use super::*;

    #[tokio::test]
    async fn no_sessions_means_not_reviewed() {
        let svc = test_service().await;
        let status = svc.compute_item_status("itm-1", None).await.unwrap();
        assert_eq!(status.completed_reviewer_count, 0);
        assert!(!status.is_fully_reviewed);
        assert_eq!(status.threshold, 3);
        assert_eq!(status.state(), ReviewState::NotReviewed);
    }

    #[tokio::test]
    async fn in_progress_sessions_do_not_count() {
        let svc = test_service().await;
        completed_session(&svc, "itm-1", "usr-a", None).await;
        start_test_session(&svc, "itm-1", "usr-b").await;
        let status = svc.compute_item_status("itm-1", None).await.unwrap();
        assert_eq!(status.completed_reviewer_count, 1);
        assert_eq!(status.reviewers.len(), 2);
    }

    #[tokio::test]
    async fn per_call_threshold_overrides_policy() {
        let svc = test_service().await;
        completed_session(&svc, "itm-1", "usr-a", None).await;
        assert!(svc.compute_item_status("itm-1", Some(1)).await.unwrap().is_fully_reviewed);
        assert!(!svc.compute_item_status("itm-1", None).await.unwrap().is_fully_reviewed);
    }

    #[tokio::test]
    async fn required_areas_gate_full_review() {
        let policy = QuorumPolicy {
            threshold: 2,
            required_areas: vec!["management".into()],
        };
        let svc = test_service_with_policy(policy).await;
        completed_session(&svc, "itm-1", "usr-a", Some("field")).await;
        completed_session(&svc, "itm-1", "usr-b", Some("field")).await;

        let status = svc.compute_item_status("itm-1", None).await.unwrap();
        assert!(!status.is_fully_reviewed);
        assert_eq!(status.missing_areas, vec!["management".to_string()]);

        completed_session(&svc, "itm-1", "usr-c", Some("Management")).await;
        let status = svc.compute_item_status("itm-1", None).await.unwrap();
        assert!(status.is_fully_reviewed);
        assert!(status.missing_areas.is_empty());
    }

    #[tokio::test]
    async fn global_progress_classifies_items() {
        let svc = test_service_with_policy(QuorumPolicy::with_threshold(2)).await;
        for reviewer in ["usr-a", "usr-b"] {
            completed_session(&svc, "itm-full", reviewer, None).await;
        }
        completed_session(&svc, "itm-part", "usr-a", None).await;
        start_test_session(&svc, "itm-none", "usr-a").await;

        let ids: Vec<String> = ["itm-full", "itm-part", "itm-none", "itm-empty", "itm-full"]
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        let stats = svc.compute_global_progress(&ids, None, None).await.unwrap();
        assert_eq!(
            stats,
            ProgressStats {
                total: 4,
                fully_reviewed: 1,
                partially_reviewed: 1,
                not_reviewed: 2,
                reviewer_stats: None,
            }
        );

        let lowered = svc.compute_global_progress(&ids, None, Some(1)).await.unwrap();
        assert_eq!(lowered.fully_reviewed, 2);
        assert_eq!(lowered.partially_reviewed, 0);
        assert_eq!(svc.policy().threshold, 2);
    }

    #[tokio::test]
    async fn reviewer_stats_are_scoped_to_candidates() {
        let svc = test_service().await;
        let done = completed_session(&svc, "itm-1", "usr-a", None).await;
        let open = start_test_session(&svc, "itm-2", "usr-a").await;
        let outside = start_test_session(&svc, "itm-9", "usr-a").await;
        let other = start_test_session(&svc, "itm-1", "usr-b").await;

        svc.upsert_feedback(&FeedbackDraft::new(&done.id, "status", "done"))
            .await
            .unwrap();
        svc.upsert_feedback(&FeedbackDraft::new(&open.id, "title", "New title"))
            .await
            .unwrap();
        svc.upsert_feedback(&FeedbackDraft::new(&outside.id, "status", "x"))
            .await
            .unwrap();
        svc.upsert_feedback(&FeedbackDraft::new(&other.id, "status", "y"))
            .await
            .unwrap();
        svc.add_comment(&done.id, "itm-1", "looks good", None)
            .await
            .unwrap();

        let ids = vec!["itm-1".to_string(), "itm-2".to_string()];
        let stats = svc.compute_global_progress(&ids, Some("usr-a"), None).await.unwrap();
        assert_eq!(
            stats.reviewer_stats,
            Some(ReviewerStats {
                reviewer_id: "usr-a".into(),
                completed_sessions: 1,
                in_progress_sessions: 1,
                feedback_count: 2,
                comment_count: 1,
            })
        );
    }

    #[tokio::test]
    async fn empty_candidates_yield_zeroes() {
        let svc = test_service().await;
        let stats = svc.compute_global_progress(&[], Some("usr-a"), None).await.unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.reviewer_stats.map(|r| r.feedback_count), Some(0));
    }
}
