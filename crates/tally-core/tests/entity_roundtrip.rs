//! Serde roundtrip and JsonSchema validation tests for persisted and reported types.

use chrono::Utc;
use schemars::schema_for;
use tally_core::dashboard::{CommentStatusHistogram, DashboardData, FieldCount};
use tally_core::entities::*;
use tally_core::enums::*;
use tally_core::quorum::{QuorumStatus, ReviewerProgress};
use tally_core::suggestion::{ApplicationResult, Suggestion, SuggestionFailure};
use tally_core::value::FieldValue;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_comment() -> ReviewComment {
    ReviewComment {
        id: "cmt-0badf00d".into(),
        review_session_id: "rvs-a3f8b2c1".into(),
        item_id: "itm-11111111".into(),
        sub_item_id: Some("itm-22222222".into()),
        content: "Budget line looks stale".into(),
        status: CommentStatus::Answered,
        admin_response: Some("will address next sprint".into()),
        admin_responded_at: Some(Utc::now()),
        created_at: Utc::now(),
    }
}

roundtrip_and_validate!(
    session_roundtrip,
    ReviewSession,
    ReviewSession {
        id: "rvs-a3f8b2c1".into(),
        item_id: "itm-11111111".into(),
        reviewer_id: "usr-ana".into(),
        reviewer_area: Some("field".into()),
        status: SessionStatus::Completed,
        started_at: Some(Utc::now()),
        completed_at: Some(Utc::now()),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    session_without_start_roundtrip,
    ReviewSession,
    ReviewSession {
        id: "rvs-00000000".into(),
        item_id: "itm-11111111".into(),
        reviewer_id: "usr-ben".into(),
        reviewer_area: None,
        status: SessionStatus::InProgress,
        started_at: None,
        completed_at: None,
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    feedback_roundtrip,
    FieldFeedback,
    FieldFeedback {
        id: "fbk-deadbeef".into(),
        review_session_id: "rvs-a3f8b2c1".into(),
        field_name: "tags".into(),
        current_value: Some(FieldValue::TextList(vec!["infra".into()])),
        proposed_value: FieldValue::TextList(vec!["infra".into(), "q3".into()]),
        comment: Some("tag for the quarter".into()),
        is_area_specific: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(comment_roundtrip, ReviewComment, sample_comment());

roundtrip_and_validate!(
    comment_view_roundtrip,
    CommentView,
    CommentView {
        comment: sample_comment(),
        reviewer_id: "usr-ana".into(),
        reviewer_area: None,
        item_title: Some("Solar pilot".into()),
    }
);

roundtrip_and_validate!(
    item_roundtrip,
    Item,
    Item {
        id: "itm-11111111".into(),
        kind: TargetType::Project,
        parent_id: None,
        title: "Solar pilot".into(),
        fields: serde_json::json!({"status": "planning", "progress": 10})
            .as_object()
            .cloned()
            .unwrap(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    audit_roundtrip,
    AuditEntry,
    AuditEntry {
        id: "aud-00000001".into(),
        session_id: Some("rvs-a3f8b2c1".into()),
        entity_type: EntityType::Comment,
        entity_id: "cmt-0badf00d".into(),
        action: AuditAction::Responded,
        detail: Some(serde_json::json!({"response": "ok"})),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    quorum_roundtrip,
    QuorumStatus,
    QuorumStatus {
        item_id: "itm-11111111".into(),
        threshold: 3,
        completed_reviewer_count: 1,
        is_fully_reviewed: false,
        missing_areas: vec!["management".into()],
        reviewers: vec![ReviewerProgress {
            reviewer_id: "usr-ana".into(),
            reviewer_area: Some("field".into()),
            status: SessionStatus::Completed,
        }],
    }
);

roundtrip_and_validate!(
    application_result_roundtrip,
    ApplicationResult,
    ApplicationResult {
        successes: vec![Suggestion::new(
            TargetType::Project,
            "itm-11111111",
            "progress",
            40_i64
        )],
        failures: vec![SuggestionFailure {
            suggestion: Suggestion::default(),
            error: "target_type is required".into(),
        }],
    }
);

roundtrip_and_validate!(
    dashboard_roundtrip,
    DashboardData,
    DashboardData {
        comment_status: CommentStatusHistogram {
            pending: 1,
            answered: 2,
            resolved: 3,
        },
        feedback_by_field: vec![FieldCount {
            field_name: "status".into(),
            count: 1,
        }],
        ..DashboardData::default()
    }
);

#[test]
fn comment_view_flattens_comment_fields() {
    let view = CommentView {
        comment: sample_comment(),
        reviewer_id: "usr-ana".into(),
        reviewer_area: None,
        item_title: None,
    };
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["status"], "answered");
    assert_eq!(json["reviewer_id"], "usr-ana");
    assert!(json.get("comment").is_none());
}
