use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CategoryStore, StoreError, StoreResult};
use crate::features::categories::dtos::{CategoryEditInput, NewCategoryInput};
use crate::features::categories::models::{default_icon, CategoryId, CategoryRecord};

/// Process-local category store for development and tests.
///
/// Behaves like the remote store: it assigns ids and timestamps and performs
/// no structural checks, so it can hold whatever hierarchy it is seeded with.
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    records: RwLock<Vec<CategoryRecord>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<CategoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Seed from a JSON array of records in the remote store's format
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<CategoryRecord> = serde_json::from_str(json)?;
        Ok(Self::with_records(records))
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn list_categories(&self) -> StoreResult<Vec<CategoryRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn create_category(&self, input: &NewCategoryInput) -> StoreResult<CategoryRecord> {
        let now = Utc::now();
        let record = CategoryRecord {
            id: CategoryId::new(Uuid::now_v7().to_string()),
            name: input.name.clone(),
            description: input.description.clone(),
            icon: input.icon.clone().unwrap_or_else(default_icon),
            thumbnail: input.thumbnail.clone(),
            parent_id: input.parent_id.clone(),
            status: input.status,
            created_at: Some(now),
            updated_at: Some(now),
        };

        self.records.write().await.push(record.clone());
        tracing::debug!("In-memory store created category {}", record.id);

        Ok(record)
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryEditInput,
    ) -> StoreResult<CategoryRecord> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        record.name = input.name.clone();
        record.description = input.description.clone();
        record.icon = input.icon.clone().unwrap_or_else(default_icon);
        record.thumbnail = input.thumbnail.clone();
        record.parent_id = input.parent_id.clone();
        record.status = input.status;
        record.updated_at = Some(Utc::now());

        Ok(record.clone())
    }

    async fn delete_category(&self, id: &CategoryId) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| &r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn delete_categories(&self, ids: &[CategoryId]) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if let Some(missing) = ids.iter().find(|id| !records.iter().any(|r| &r.id == *id)) {
            return Err(StoreError::NotFound(missing.clone()));
        }
        records.retain(|r| !ids.contains(&r.id));
        tracing::debug!("In-memory store deleted {} categories", ids.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::CategoryStatus;

    fn new_input(name: &str, parent: Option<&CategoryId>) -> NewCategoryInput {
        NewCategoryInput {
            name: name.to_string(),
            description: "d".to_string(),
            icon: None,
            thumbnail: None,
            parent_id: parent.cloned(),
            status: CategoryStatus::Published,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_timestamps_and_icon() {
        let store = InMemoryCategoryStore::new();

        let created = store.create_category(&new_input("a", None)).await.unwrap();

        assert!(!created.id.as_str().is_empty());
        assert!(created.created_at.is_some());
        assert_eq!(created.icon, default_icon());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let store = InMemoryCategoryStore::new();
        let missing = CategoryId::from("missing");
        let edit = CategoryEditInput {
            name: "x".to_string(),
            description: "d".to_string(),
            icon: None,
            thumbnail: None,
            parent_id: None,
            status: CategoryStatus::Draft,
        };

        assert!(matches!(
            store.update_category(&missing, &edit).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_category(&missing).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_from_json_accepts_store_format() {
        let json = r#"[
            {"id": 1, "name": "Root", "description": "", "parentId": null, "status": "published"},
            {"id": "2", "name": "Child", "description": "c", "parentId": 1, "status": "blocked"}
        ]"#;

        let store = InMemoryCategoryStore::from_json(json).unwrap();

        assert_eq!(store.len().await, 2);
        let records = store.list_categories().await.unwrap();
        assert_eq!(records[1].parent_id, Some(CategoryId::from("1")));
        assert!(InMemoryCategoryStore::from_json("{}").is_err());
    }

    #[tokio::test]
    async fn test_batch_delete_is_all_or_nothing() {
        let store = InMemoryCategoryStore::new();
        let a = store.create_category(&new_input("a", None)).await.unwrap();
        let b = store.create_category(&new_input("b", Some(&a.id))).await.unwrap();

        let result = store
            .delete_categories(&[b.id.clone(), CategoryId::from("ghost")])
            .await;
        assert!(matches!(result, Err(StoreError::NotFound(id)) if id.as_str() == "ghost"));
        assert_eq!(store.len().await, 2);

        store
            .delete_categories(&[b.id.clone(), a.id.clone()])
            .await
            .unwrap();
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let store = InMemoryCategoryStore::new();
        let parent = store.create_category(&new_input("p", None)).await.unwrap();
        let child = store.create_category(&new_input("c", None)).await.unwrap();

        let edit = CategoryEditInput::reparent(&child, Some(parent.id.clone()));
        let updated = store.update_category(&child.id, &edit).await.unwrap();

        assert_eq!(updated.parent_id, Some(parent.id));
        assert_eq!(updated.name, "c");
        assert_eq!(updated.created_at, child.created_at);
    }
}
