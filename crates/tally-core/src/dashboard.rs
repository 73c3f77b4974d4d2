//! Admin dashboard aggregates.
//!
//! Pure read-side composition: the database layer fetches sessions, feedback,
//! and comments for a set of items and hands them to [`build_dashboard`].

use std::collections::{BTreeMap, BTreeSet, HashMap};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{CommentView, FieldFeedback, ReviewSession};
use crate::enums::CommentStatus;
use crate::quorum::{QuorumPolicy, QuorumStatus, dedup_ids};

/// Bucket for sessions that carry no area tag.
pub const UNASSIGNED_AREA: &str = "unassigned";

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewerSummary {
    pub reviewer_id: String,
    pub completed_sessions: u32,
    pub pending_sessions: u32,
    pub feedback_count: u32,
    pub comment_count: u32,
    pub areas: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AreaSummary {
    pub area: String,
    pub session_count: u32,
    pub completed_sessions: u32,
    pub feedback_count: u32,
    pub comment_count: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CommentStatusHistogram {
    pub pending: u32,
    pub answered: u32,
    pub resolved: u32,
}

impl CommentStatusHistogram {
    pub const fn record(&mut self, status: CommentStatus) {
        match status {
            CommentStatus::Pending => self.pending += 1,
            CommentStatus::Answered => self.answered += 1,
            CommentStatus::Resolved => self.resolved += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.pending + self.answered + self.resolved
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldCount {
    pub field_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DashboardData {
    pub items: Vec<QuorumStatus>,
    pub reviewers: Vec<ReviewerSummary>,
    pub areas: Vec<AreaSummary>,
    pub comment_status: CommentStatusHistogram,
    /// Most-proposed fields first.
    pub feedback_by_field: Vec<FieldCount>,
    /// Newest pending comments, at most the configured triage limit.
    pub pending_comments: Vec<CommentView>,
}

impl DashboardData {
    /// Count for one field in the feedback histogram, zero when absent.
    #[must_use]
    pub fn feedback_count_for(&self, field_name: &str) -> u32 {
        self.feedback_by_field
            .iter()
            .find(|f| f.field_name == field_name)
            .map_or(0, |f| f.count)
    }
}

/// Rows the dashboard is composed from, all scoped to the requested items.
#[derive(Debug, Clone, Copy)]
pub struct DashboardInput<'a> {
    pub item_ids: &'a [String],
    pub sessions: &'a [ReviewSession],
    pub feedback: &'a [FieldFeedback],
    pub comments: &'a [CommentView],
}

/// Compose the dashboard: per-item quorum, per-reviewer and per-area stats,
/// comment status histogram, feedback-by-field histogram, triage list.
#[must_use]
pub fn build_dashboard(
    input: DashboardInput<'_>,
    policy: &QuorumPolicy,
    triage_limit: usize,
) -> DashboardData {
    let items = dedup_ids(input.item_ids)
        .into_iter()
        .map(|id| QuorumStatus::from_sessions(id, input.sessions, policy))
        .collect();

    let session_index: HashMap<&str, &ReviewSession> =
        input.sessions.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut reviewers: BTreeMap<String, (ReviewerSummary, BTreeSet<String>)> = BTreeMap::new();
    let mut areas: BTreeMap<String, AreaSummary> = BTreeMap::new();

    for session in input.sessions {
        let (summary, touched) = reviewer_entry(&mut reviewers, &session.reviewer_id);
        let area = area_key(session.reviewer_area.as_deref());
        let area_summary = area_entry(&mut areas, &area);
        area_summary.session_count += 1;
        if session.is_completed() {
            summary.completed_sessions += 1;
            area_summary.completed_sessions += 1;
        } else {
            summary.pending_sessions += 1;
        }
        if let Some(tag) = session.reviewer_area.as_deref() {
            touched.insert(tag.to_string());
        }
    }

    let mut field_counts: BTreeMap<&str, u32> = BTreeMap::new();
    for fb in input.feedback {
        *field_counts.entry(fb.field_name.as_str()).or_default() += 1;
        if let Some(session) = session_index.get(fb.review_session_id.as_str()) {
            reviewer_entry(&mut reviewers, &session.reviewer_id).0.feedback_count += 1;
            area_entry(&mut areas, &area_key(session.reviewer_area.as_deref())).feedback_count += 1;
        }
    }

    let mut comment_status = CommentStatusHistogram::default();
    for view in input.comments {
        comment_status.record(view.comment.status);
        let (reviewer_id, area) = session_index
            .get(view.comment.review_session_id.as_str())
            .map_or_else(
                || (view.reviewer_id.as_str(), view.reviewer_area.as_deref()),
                |s| (s.reviewer_id.as_str(), s.reviewer_area.as_deref()),
            );
        reviewer_entry(&mut reviewers, reviewer_id).0.comment_count += 1;
        area_entry(&mut areas, &area_key(area)).comment_count += 1;
    }

    let mut feedback_by_field: Vec<FieldCount> = field_counts
        .into_iter()
        .map(|(field_name, count)| FieldCount {
            field_name: field_name.to_string(),
            count,
        })
        .collect();
    feedback_by_field.sort_by(|a, b| b.count.cmp(&a.count).then(a.field_name.cmp(&b.field_name)));

    let mut pending_comments: Vec<CommentView> = input
        .comments
        .iter()
        .filter(|v| v.comment.status == CommentStatus::Pending)
        .cloned()
        .collect();
    pending_comments.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));
    pending_comments.truncate(triage_limit);

    DashboardData {
        items,
        reviewers: reviewers
            .into_values()
            .map(|(mut summary, touched)| {
                summary.areas = touched.into_iter().collect();
                summary
            })
            .collect(),
        areas: areas.into_values().collect(),
        comment_status,
        feedback_by_field,
        pending_comments,
    }
}

fn reviewer_entry<'m>(
    reviewers: &'m mut BTreeMap<String, (ReviewerSummary, BTreeSet<String>)>,
    reviewer_id: &str,
) -> &'m mut (ReviewerSummary, BTreeSet<String>) {
    reviewers.entry(reviewer_id.to_string()).or_insert_with(|| {
        (
            ReviewerSummary {
                reviewer_id: reviewer_id.to_string(),
                ..ReviewerSummary::default()
            },
            BTreeSet::new(),
        )
    })
}

fn area_entry<'m>(areas: &'m mut BTreeMap<String, AreaSummary>, area: &str) -> &'m mut AreaSummary {
    areas.entry(area.to_string()).or_insert_with(|| AreaSummary {
        area: area.to_string(),
        ..AreaSummary::default()
    })
}

fn area_key(area: Option<&str>) -> String {
    match area.map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => UNASSIGNED_AREA.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ReviewComment;
    use crate::enums::SessionStatus;
    use crate::value::FieldValue;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;

    fn session(id: &str, item: &str, reviewer: &str, area: Option<&str>, done: bool) -> ReviewSession {
        let now = Utc::now();
        ReviewSession {
            id: id.into(),
            item_id: item.into(),
            reviewer_id: reviewer.into(),
            reviewer_area: area.map(String::from),
            status: if done {
                SessionStatus::Completed
            } else {
                SessionStatus::InProgress
            },
            started_at: Some(now),
            completed_at: done.then_some(now),
            updated_at: now,
        }
    }

    fn feedback(session_id: &str, field: &str) -> FieldFeedback {
        FieldFeedback {
            id: format!("fbk-{session_id}-{field}"),
            review_session_id: session_id.into(),
            field_name: field.into(),
            current_value: None,
            proposed_value: FieldValue::from("x"),
            comment: None,
            is_area_specific: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn comment(id: &str, session: &ReviewSession, status: CommentStatus, age_min: i64) -> CommentView {
        CommentView {
            comment: ReviewComment {
                id: id.into(),
                review_session_id: session.id.clone(),
                item_id: session.item_id.clone(),
                sub_item_id: None,
                content: format!("comment {id}"),
                status,
                admin_response: None,
                admin_responded_at: None,
                created_at: Utc::now() - Duration::minutes(age_min),
            },
            reviewer_id: session.reviewer_id.clone(),
            reviewer_area: session.reviewer_area.clone(),
            item_title: None,
        }
    }

    #[test]
    fn composes_every_section() {
        let ids = vec!["p1".to_string()];
        let sessions = vec![
            session("s1", "p1", "a", Some("field"), true),
            session("s2", "p1", "b", None, false),
        ];
        let fb = vec![
            feedback("s1", "status"),
            feedback("s2", "status"),
            feedback("s1", "progress"),
        ];
        let comments = vec![
            comment("c1", &sessions[0], CommentStatus::Pending, 30),
            comment("c2", &sessions[0], CommentStatus::Resolved, 20),
            comment("c3", &sessions[1], CommentStatus::Pending, 10),
        ];

        let data = build_dashboard(
            DashboardInput {
                item_ids: &ids,
                sessions: &sessions,
                feedback: &fb,
                comments: &comments,
            },
            &QuorumPolicy::default(),
            10,
        );

        assert_eq!(data.items.len(), 1);
        assert_eq!(data.items[0].completed_reviewer_count, 1);
        assert_eq!(
            data.feedback_by_field,
            vec![
                FieldCount { field_name: "status".into(), count: 2 },
                FieldCount { field_name: "progress".into(), count: 1 },
            ]
        );
        assert_eq!(
            data.comment_status,
            CommentStatusHistogram { pending: 2, answered: 0, resolved: 1 }
        );
        assert_eq!(
            data.reviewers[0],
            ReviewerSummary {
                reviewer_id: "a".into(),
                completed_sessions: 1,
                pending_sessions: 0,
                feedback_count: 2,
                comment_count: 2,
                areas: vec!["field".into()],
            }
        );
        assert_eq!(data.reviewers[1].pending_sessions, 1);
        assert!(data.reviewers[1].areas.is_empty());

        let area_names: Vec<&str> = data.areas.iter().map(|a| a.area.as_str()).collect();
        assert_eq!(area_names, vec!["field", UNASSIGNED_AREA]);
        assert_eq!(data.areas[1].feedback_count, 1);

        let triage: Vec<&str> = data
            .pending_comments
            .iter()
            .map(|c| c.comment.id.as_str())
            .collect();
        assert_eq!(triage, vec!["c3", "c1"]);
    }

    #[test]
    fn triage_list_respects_limit() {
        let ids = vec!["p1".to_string()];
        let sessions = vec![session("s1", "p1", "a", None, false)];
        let comments: Vec<CommentView> = (0..5)
            .map(|i| comment(&format!("c{i}"), &sessions[0], CommentStatus::Pending, i))
            .collect();
        let data = build_dashboard(
            DashboardInput {
                item_ids: &ids,
                sessions: &sessions,
                feedback: &[],
                comments: &comments,
            },
            &QuorumPolicy::default(),
            2,
        );
        assert_eq!(data.pending_comments.len(), 2);
        assert_eq!(data.pending_comments[0].comment.id, "c0");
        assert_eq!(data.comment_status.total(), 5);
    }

    #[test]
    fn empty_input_yields_empty_dashboard() {
        let data = build_dashboard(
            DashboardInput {
                item_ids: &[],
                sessions: &[],
                feedback: &[],
                comments: &[],
            },
            &QuorumPolicy::default(),
            10,
        );
        assert_eq!(data, DashboardData::default());
        assert_eq!(data.feedback_count_for("status"), 0);
    }
}
