//! Item repository.
//!
//! A minimal stand-in for the external project/task store: enough to give
//! the suggestion applier a write target and comment listings a title.

use chrono::Utc;

use tally_core::entities::Item;
use tally_core::enums::{AuditAction, EntityType, TargetType};
use tally_core::errors::require_non_empty;
use tally_core::ids::PREFIX_ITEM;
use tally_core::value::FieldValue;

use crate::error::DatabaseError;
use crate::helpers::{encode_field_value, get_opt_string, parse_datetime, parse_enum};
use crate::repos::apply::ItemStore;
use crate::service::ReviewService;

const ITEM_COLS: &str = "id, kind, parent_id, title, fields, created_at, updated_at";

fn row_to_item(row: &libsql::Row) -> Result<Item, DatabaseError> {
    let fields_json: String = row.get(4)?;
    let fields = serde_json::from_str(&fields_json)
        .map_err(|e| DatabaseError::Query(format!("Invalid item fields JSON: {e}")))?;
    Ok(Item {
        id: row.get(0)?,
        kind: parse_enum(&row.get::<String>(1)?)?,
        parent_id: get_opt_string(row, 2)?,
        title: row.get(3)?,
        fields,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

/// JSON path for a top-level key, quoted so dots and spaces stay literal.
fn field_path(field_name: &str) -> String {
    format!("$.\"{}\"", field_name.replace('"', "\\\""))
}

impl ReviewService {
    /// Create a project or task.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if the title is blank, or
    /// `DatabaseError::NotFound` if `parent_id` names no item.
    pub async fn create_item(
        &self,
        kind: TargetType,
        title: &str,
        parent_id: Option<&str>,
        fields: serde_json::Map<String, serde_json::Value>,
    ) -> Result<Item, DatabaseError> {
        require_non_empty("title", title)?;
        if let Some(parent) = parent_id {
            self.get_item(parent).await?;
        }

        let id = self.db().generate_id(PREFIX_ITEM).await?;
        let now = Utc::now().to_rfc3339();
        let fields_json = serde_json::Value::Object(fields).to_string();
        self.db()
            .conn()
            .execute(
                "INSERT INTO items (id, kind, parent_id, title, fields, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
                libsql::params![
                    id.as_str(),
                    kind.as_str(),
                    parent_id,
                    title.trim(),
                    fields_json,
                    now
                ],
            )
            .await?;

        self.record_audit::<()>(None, EntityType::Item, &id, AuditAction::Created, None)
            .await?;
        self.get_item(&id).await
    }

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the item does not exist.
    pub async fn get_item(&self, id: &str) -> Result<Item, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {ITEM_COLS} FROM items WHERE id = ?1"), [id])
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found(EntityType::Item, id))?;
        row_to_item(&row)
    }

    /// List items, optionally of one kind, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_items(
        &self,
        kind: Option<TargetType>,
        limit: u32,
    ) -> Result<Vec<Item>, DatabaseError> {
        let mut rows = match kind {
            Some(k) => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {ITEM_COLS} FROM items WHERE kind = ?1
                             ORDER BY created_at DESC, rowid DESC LIMIT ?2"
                        ),
                        libsql::params![k.as_str(), i64::from(limit)],
                    )
                    .await?
            }
            None => {
                self.db()
                    .conn()
                    .query(
                        &format!(
                            "SELECT {ITEM_COLS} FROM items
                             ORDER BY created_at DESC, rowid DESC LIMIT ?1"
                        ),
                        libsql::params![i64::from(limit)],
                    )
                    .await?
            }
        };

        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_item(&row)?);
        }
        Ok(items)
    }
}

impl ItemStore for ReviewService {
    /// Overwrite one field. `title` maps to the title column; every other
    /// field is written into the item's JSON field map.
    async fn update_field(
        &self,
        target_type: TargetType,
        target_id: &str,
        field_name: &str,
        value: &FieldValue,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let updated = match (field_name, value) {
            ("title", FieldValue::Text(title)) => {
                self.db()
                    .conn()
                    .execute(
                        "UPDATE items SET title = ?1, fields = json_set(fields, '$.title', ?1),
                             updated_at = ?2
                         WHERE id = ?3 AND kind = ?4",
                        libsql::params![title.trim(), now, target_id, target_type.as_str()],
                    )
                    .await?
            }
            _ => {
                self.db()
                    .conn()
                    .execute(
                        "UPDATE items SET fields = json_set(fields, ?1, json(?2)), updated_at = ?3
                         WHERE id = ?4 AND kind = ?5",
                        libsql::params![
                            field_path(field_name),
                            encode_field_value(value)?,
                            now,
                            target_id,
                            target_type.as_str()
                        ],
                    )
                    .await?
            }
        };

        if updated == 0 {
            return Err(DatabaseError::not_found(EntityType::Item, target_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::test_support::helpers::test_service;

    use super::*;

    fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_and_get_item() {
        let svc = test_service().await;
        let project = svc
            .create_item(
                TargetType::Project,
                "Solar pilot",
                None,
                fields(json!({"status": "planning", "progress": 10})),
            )
            .await
            .unwrap();
        assert!(project.id.starts_with("itm-"));
        assert_eq!(svc.get_item(&project.id).await.unwrap(), project);
        assert_eq!(project.fields["status"], json!("planning"));

        let task = svc
            .create_item(TargetType::Task, "Site survey", Some(&project.id), fields(json!({})))
            .await
            .unwrap();
        assert_eq!(task.parent_id.as_deref(), Some(project.id.as_str()));
        assert_eq!(svc.list_items(Some(TargetType::Task), 10).await.unwrap(), vec![task]);
        assert_eq!(svc.list_items(None, 10).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn create_validates_title_and_parent() {
        let svc = test_service().await;
        assert!(
            svc.create_item(TargetType::Project, " ", None, fields(json!({})))
                .await
                .unwrap_err()
                .is_validation()
        );
        assert!(
            svc.create_item(TargetType::Task, "Orphan", Some("itm-missing"), fields(json!({})))
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn update_field_writes_typed_json() {
        let svc = test_service().await;
        let project = svc
            .create_item(TargetType::Project, "Solar pilot", None, fields(json!({})))
            .await
            .unwrap();

        svc.update_field(TargetType::Project, &project.id, "progress", &FieldValue::from(40_i64))
            .await
            .unwrap();
        svc.update_field(
            TargetType::Project,
            &project.id,
            "tags",
            &FieldValue::TextList(vec!["solar".into()]),
        )
        .await
        .unwrap();
        svc.update_field(TargetType::Project, &project.id, "title", &FieldValue::from("Solar v2"))
            .await
            .unwrap();

        let item = svc.get_item(&project.id).await.unwrap();
        assert_eq!(item.title, "Solar v2");
        assert_eq!(item.fields["progress"], json!(40));
        assert_eq!(item.fields["tags"], json!(["solar"]));
    }

    #[tokio::test]
    async fn update_field_rejects_missing_or_mismatched_target() {
        let svc = test_service().await;
        let project = svc
            .create_item(TargetType::Project, "Solar pilot", None, fields(json!({})))
            .await
            .unwrap();
        let value = FieldValue::from("done");
        assert!(
            svc.update_field(TargetType::Task, &project.id, "status", &value)
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            svc.update_field(TargetType::Project, "itm-missing", "status", &value)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
}
