//! Suggestion applier.
//!
//! Applies a batch of field changes one at a time against an [`ItemStore`].
//! Each suggestion is its own unit of work: a failure is recorded and the
//! loop moves on, and earlier successes are never rolled back.

use std::collections::HashMap;
use std::future::Future;

use tally_core::audit_detail::AppliedDetail;
use tally_core::entities::FieldFeedback;
use tally_core::enums::{AuditAction, EntityType, TargetType};
use tally_core::suggestion::{
    ApplicationResult, Suggestion, SuggestionFailure, partition_entries,
};
use tally_core::value::FieldValue;

use crate::error::DatabaseError;
use crate::service::ReviewService;

/// Write access to the project/task store the applier targets.
pub trait ItemStore {
    /// Overwrite `field_name` on the target with `value`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` when no item of `target_type` has
    /// `target_id`, or any store error.
    fn update_field(
        &self,
        target_type: TargetType,
        target_id: &str,
        field_name: &str,
        value: &FieldValue,
    ) -> impl Future<Output = Result<(), DatabaseError>>;
}

/// Apply every suggestion independently and report each outcome.
///
/// Malformed suggestions land in `failures` without touching the store.
/// An empty batch returns an empty result.
pub async fn apply_batch<S: ItemStore>(store: &S, suggestions: Vec<Suggestion>) -> ApplicationResult {
    let mut result = ApplicationResult::default();

    for suggestion in suggestions {
        let outcome = match suggestion.validate() {
            Ok(valid) => store
                .update_field(
                    valid.target_type,
                    valid.target_id,
                    valid.field_name,
                    valid.value,
                )
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(()) => result.successes.push(suggestion),
            Err(error) => {
                tracing::warn!(
                    target_type = %suggestion.target_type,
                    target_id = %suggestion.target_id,
                    field_name = %suggestion.field_name,
                    %error,
                    "suggestion not applied"
                );
                result.failures.push(SuggestionFailure { suggestion, error });
            }
        }
    }

    tracing::info!(
        applied = result.successes.len(),
        failed = result.failures.len(),
        "suggestion batch finished"
    );
    result
}

impl ReviewService {
    /// Apply suggestions to the item table and audit each success.
    ///
    /// Never fails as a whole: per-suggestion errors are reported in the
    /// result. An audit write that fails after a successful update is logged
    /// and does not turn the success into a failure.
    pub async fn apply_suggestions(&self, suggestions: Vec<Suggestion>) -> ApplicationResult {
        let result = apply_batch(self, suggestions).await;

        for applied in &result.successes {
            let Some(value) = applied.proposed_value.clone() else {
                continue;
            };
            let detail = AppliedDetail {
                target_type: applied.target_type.clone(),
                field_name: applied.field_name.clone(),
                value,
            };
            if let Err(error) = self
                .record_audit(
                    None,
                    EntityType::Item,
                    &applied.target_id,
                    AuditAction::SuggestionApplied,
                    Some(&detail),
                )
                .await
            {
                tracing::warn!(target_id = %applied.target_id, %error, "failed to audit applied suggestion");
            }
        }

        result
    }

    /// Apply a raw JSON batch. Entries that cannot even be read as a
    /// suggestion are reported in `failures` next to the ones the applier
    /// rejected; the rest of the batch still runs.
    pub async fn apply_suggestion_entries(&self, entries: &[serde_json::Value]) -> ApplicationResult {
        let (usable, rejected) = partition_entries(entries);
        for failure in &rejected {
            tracing::warn!(error = %failure.error, "suggestion entry not readable");
        }
        let mut result = self.apply_suggestions(usable).await;
        result.failures.extend(rejected);
        result
    }

    /// One suggestion per field proposed for `item_id`, across all reviewers.
    ///
    /// Fields keep the order of their first proposal; when several reviewers
    /// proposed the same field, the most recently written proposal wins, so a
    /// revision beats another reviewer's older proposal.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the feedback query fails.
    pub async fn suggestions_from_feedback(
        &self,
        item_id: &str,
    ) -> Result<Vec<Suggestion>, DatabaseError> {
        let feedback = self.list_feedback_by_item(item_id).await?;

        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &FieldFeedback> = HashMap::new();
        for fb in &feedback {
            match latest.get(fb.field_name.as_str()) {
                None => order.push(&fb.field_name),
                Some(seen) if seen.updated_at > fb.updated_at => continue,
                Some(_) => {}
            }
            latest.insert(&fb.field_name, fb);
        }

        Ok(order
            .into_iter()
            .filter_map(|field| latest.get(field))
            .map(|fb| Suggestion::from_feedback(item_id, fb))
            .collect())
    }
}
