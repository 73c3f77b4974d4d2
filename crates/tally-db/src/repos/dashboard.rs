//! Admin dashboard read model.
//!
//! Loads sessions, feedback and comment views for the requested items and
//! hands them to the pure aggregation in `tally_core::dashboard`.

use tally_core::dashboard::{DashboardData, DashboardInput, build_dashboard};
use tally_core::quorum::dedup_ids;

use crate::error::DatabaseError;
use crate::service::ReviewService;

impl ReviewService {
    /// Compose the dashboard for `item_ids`. Performs no writes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any of the fan-in reads fail.
    pub async fn build_dashboard(&self, item_ids: &[String]) -> Result<DashboardData, DatabaseError> {
        let item_ids: Vec<String> = dedup_ids(item_ids)
            .into_iter()
            .map(str::to_string)
            .collect();

        let sessions = self.list_sessions_for_items(&item_ids).await?;
        let feedback = self.list_feedback_for_items(&item_ids).await?;
        let comments = self.list_comment_views_for_items(&item_ids).await?;
        tracing::debug!(
            items = item_ids.len(),
            sessions = sessions.len(),
            feedback = feedback.len(),
            comments = comments.len(),
            "building dashboard"
        );

        Ok(build_dashboard(
            DashboardInput {
                item_ids: &item_ids,
                sessions: &sessions,
                feedback: &feedback,
                comments: &comments,
            },
            self.policy(),
            self.triage_limit(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use tally_core::dashboard::{CommentStatusHistogram, UNASSIGNED_AREA};

    use crate::repos::feedback::FeedbackDraft;
    use crate::test_support::helpers::{completed_session, start_test_session, test_service};

    use super::*;

    #[tokio::test]
    async fn empty_item_list_is_empty_dashboard() {
        let svc = test_service().await;
        assert_eq!(svc.build_dashboard(&[]).await.unwrap(), DashboardData::default());
    }

    #[tokio::test]
    async fn dashboard_groups_by_reviewer_and_area() {
        let svc = test_service().await;
        let a = completed_session(&svc, "itm-1", "usr-a", Some("field")).await;
        let b = start_test_session(&svc, "itm-1", "usr-b").await;
        start_test_session(&svc, "itm-2", "usr-a").await;

        svc.upsert_feedback(&FeedbackDraft::new(&a.id, "status", "in_progress"))
            .await
            .unwrap();
        svc.upsert_feedback(&FeedbackDraft::new(&b.id, "status", "blocked"))
            .await
            .unwrap();
        svc.upsert_feedback(&FeedbackDraft::new(&b.id, "progress", 30_i64))
            .await
            .unwrap();
        let c1 = svc.add_comment(&a.id, "itm-1", "first", None).await.unwrap();
        let c2 = svc.add_comment(&b.id, "itm-1", "second", None).await.unwrap();
        svc.add_comment(&b.id, "itm-1", "third", None).await.unwrap();
        svc.admin_respond(&c1.id, "noted").await.unwrap();
        svc.resolve_comment(&c2.id).await.unwrap();

        let ids = vec!["itm-1".to_string(), "itm-2".to_string()];
        let dash = svc.build_dashboard(&ids).await.unwrap();

        assert_eq!(dash.items.len(), 2);
        assert_eq!(dash.items[0].completed_reviewer_count, 1);
        assert_eq!(
            dash.comment_status,
            CommentStatusHistogram {
                pending: 1,
                answered: 1,
                resolved: 1,
            }
        );
        assert_eq!(dash.feedback_count_for("status"), 2);
        assert_eq!(dash.feedback_count_for("progress"), 1);
        assert_eq!(dash.feedback_by_field[0].field_name, "status");

        let usr_a = dash.reviewers.iter().find(|r| r.reviewer_id == "usr-a").unwrap();
        assert_eq!(usr_a.completed_sessions, 1);
        assert_eq!(usr_a.pending_sessions, 1);
        assert_eq!(usr_a.feedback_count, 1);
        assert_eq!(usr_a.comment_count, 1);
        assert_eq!(usr_a.areas, vec!["field".to_string()]);

        let unassigned = dash.areas.iter().find(|a| a.area == UNASSIGNED_AREA).unwrap();
        assert_eq!(unassigned.session_count, 2);
        assert_eq!(unassigned.feedback_count, 2);
        assert_eq!(unassigned.comment_count, 2);

        assert_eq!(dash.pending_comments.len(), 1);
        assert_eq!(dash.pending_comments[0].comment.content, "third");
    }

    #[tokio::test]
    async fn triage_list_respects_limit() {
        let svc = test_service().await.with_triage_limit(2);
        let session = start_test_session(&svc, "itm-1", "usr-a").await;
        for n in 0..4 {
            svc.add_comment(&session.id, "itm-1", &format!("comment {n}"), None)
                .await
                .unwrap();
        }
        let dash = svc.build_dashboard(&["itm-1".to_string()]).await.unwrap();
        assert_eq!(dash.pending_comments.len(), 2);
        assert_eq!(dash.comment_status.pending, 4);
    }
}
