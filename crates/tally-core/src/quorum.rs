//! Quorum computation over review sessions.
//!
//! Quorum status is derived, never stored: it is recomputed from session rows
//! on each call with whatever policy is configured at that moment.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::ReviewSession;
use crate::enums::SessionStatus;

/// Distinct completed reviewers needed by default.
pub const DEFAULT_QUORUM_THRESHOLD: u32 = 3;

/// Runtime quorum rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumPolicy {
    pub threshold: u32,
    /// Areas that must each appear on at least one completed session.
    /// Empty means area tags are display-only.
    pub required_areas: Vec<String>,
}

impl Default for QuorumPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_QUORUM_THRESHOLD,
            required_areas: Vec::new(),
        }
    }
}

impl QuorumPolicy {
    #[must_use]
    pub fn with_threshold(threshold: u32) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}

/// Coarse review state of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    NotReviewed,
    PartiallyReviewed,
    FullyReviewed,
}

/// Where one reviewer stands on one item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewerProgress {
    pub reviewer_id: String,
    pub reviewer_area: Option<String>,
    pub status: SessionStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct QuorumStatus {
    pub item_id: String,
    pub threshold: u32,
    pub completed_reviewer_count: u32,
    pub is_fully_reviewed: bool,
    /// Required areas with no completed session yet.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_areas: Vec<String>,
    pub reviewers: Vec<ReviewerProgress>,
}

impl QuorumStatus {
    /// Compute quorum for `item_id` from its sessions.
    ///
    /// Sessions for other items are ignored. A reviewer counts once no matter
    /// how many session rows carry their id; any completed row marks them
    /// completed.
    #[must_use]
    pub fn from_sessions(item_id: &str, sessions: &[ReviewSession], policy: &QuorumPolicy) -> Self {
        let mut reviewers: BTreeMap<&str, ReviewerProgress> = BTreeMap::new();
        let mut covered_areas: HashSet<String> = HashSet::new();

        for session in sessions.iter().filter(|s| s.item_id == item_id) {
            if session.is_completed() {
                if let Some(area) = session.reviewer_area.as_deref() {
                    covered_areas.insert(normalize_area(area));
                }
            }
            reviewers
                .entry(session.reviewer_id.as_str())
                .and_modify(|entry| {
                    if session.is_completed() {
                        entry.status = SessionStatus::Completed;
                    }
                    if entry.reviewer_area.is_none() {
                        entry.reviewer_area.clone_from(&session.reviewer_area);
                    }
                })
                .or_insert_with(|| ReviewerProgress {
                    reviewer_id: session.reviewer_id.clone(),
                    reviewer_area: session.reviewer_area.clone(),
                    status: session.status,
                });
        }

        let completed = reviewers
            .values()
            .filter(|r| r.status.is_completed())
            .count();
        let completed_reviewer_count = u32::try_from(completed).unwrap_or(u32::MAX);

        let missing_areas: Vec<String> = policy
            .required_areas
            .iter()
            .filter(|area| !covered_areas.contains(&normalize_area(area)))
            .cloned()
            .collect();

        Self {
            item_id: item_id.to_string(),
            threshold: policy.threshold,
            completed_reviewer_count,
            is_fully_reviewed: completed_reviewer_count >= policy.threshold
                && missing_areas.is_empty(),
            missing_areas,
            reviewers: reviewers.into_values().collect(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> ReviewState {
        if self.is_fully_reviewed {
            ReviewState::FullyReviewed
        } else if self.completed_reviewer_count > 0 {
            ReviewState::PartiallyReviewed
        } else {
            ReviewState::NotReviewed
        }
    }
}

fn normalize_area(area: &str) -> String {
    area.trim().to_lowercase()
}

/// A single reviewer's own activity across the candidate items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReviewerStats {
    pub reviewer_id: String,
    pub completed_sessions: u32,
    pub in_progress_sessions: u32,
    pub feedback_count: u32,
    pub comment_count: u32,
}

/// Review coverage across a set of candidate items.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProgressStats {
    pub total: u32,
    pub fully_reviewed: u32,
    pub partially_reviewed: u32,
    pub not_reviewed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer_stats: Option<ReviewerStats>,
}

impl ProgressStats {
    /// Classify each distinct candidate item by its quorum state.
    #[must_use]
    pub fn from_sessions(
        item_ids: &[String],
        sessions: &[ReviewSession],
        policy: &QuorumPolicy,
    ) -> Self {
        let mut stats = Self::default();
        for item_id in dedup_ids(item_ids) {
            stats.total += 1;
            match QuorumStatus::from_sessions(item_id, sessions, policy).state() {
                ReviewState::FullyReviewed => stats.fully_reviewed += 1,
                ReviewState::PartiallyReviewed => stats.partially_reviewed += 1,
                ReviewState::NotReviewed => stats.not_reviewed += 1,
            }
        }
        stats
    }
}

/// Distinct ids in first-seen order.
#[must_use]
pub fn dedup_ids(ids: &[String]) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}
