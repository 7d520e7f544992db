use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Icon shown when a category has none
pub const DEFAULT_CATEGORY_ICON: &str = "📁";

/// Opaque category identifier assigned by the store.
///
/// Stores have been seen returning ids as JSON strings and as JSON numbers;
/// both are normalized to the canonical string form on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Raw id shapes accepted from the wire
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl RawId {
    fn into_canonical(self) -> String {
        match self {
            RawId::Text(s) => s.trim().to_string(),
            RawId::Signed(n) => n.to_string(),
            RawId::Unsigned(n) => n.to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for CategoryId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = RawId::deserialize(deserializer)?.into_canonical();
        if id.is_empty() {
            return Err(serde::de::Error::custom("category id must not be empty"));
        }
        Ok(Self(id))
    }
}

/// Normalizes `parentId`: null, absent and "" all mean root.
pub fn deserialize_parent_id<'de, D>(deserializer: D) -> Result<Option<CategoryId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(raw
        .map(RawId::into_canonical)
        .filter(|id| !id.is_empty())
        .map(CategoryId))
}

fn deserialize_icon<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_icon))
}

/// Empty asset references are treated as no thumbnail.
pub fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

pub fn default_icon() -> String {
    DEFAULT_CATEGORY_ICON.to_string()
}

/// Publication status of a category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    #[default]
    Published,
    #[serde(alias = "blocked")]
    Draft,
}

/// Flat category entity as stored and transmitted by the category store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_icon", deserialize_with = "deserialize_icon")]
    pub icon: String,
    #[serde(default, deserialize_with = "deserialize_optional_text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "deserialize_parent_id")]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub status: CategoryStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CategoryRecord {
    pub fn is_child_of(&self, parent: &CategoryId) -> bool {
        self.parent_id.as_ref() == Some(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_and_string_ids_normalize_to_same_value() {
        let a: CategoryRecord = serde_json::from_value(json!({
            "id": 7, "name": "Rust", "parentId": 3
        }))
        .unwrap();
        let b: CategoryRecord = serde_json::from_value(json!({
            "id": "7", "name": "Rust", "parentId": "3"
        }))
        .unwrap();

        assert_eq!(a.id, b.id);
        assert_eq!(a.parent_id, Some(CategoryId::from("3")));
        assert_eq!(a.parent_id, b.parent_id);
    }

    #[test]
    fn test_missing_null_and_empty_parent_mean_root() {
        for value in [
            json!({"id": "1", "name": "a"}),
            json!({"id": "1", "name": "a", "parentId": null}),
            json!({"id": "1", "name": "a", "parentId": ""}),
        ] {
            let record: CategoryRecord = serde_json::from_value(value).unwrap();
            assert_eq!(record.parent_id, None);
        }
    }

    #[test]
    fn test_defaults_for_absent_fields() {
        let record: CategoryRecord =
            serde_json::from_value(json!({"id": "1", "name": "a", "icon": "", "thumbnail": ""}))
                .unwrap();

        assert_eq!(record.icon, DEFAULT_CATEGORY_ICON);
        assert_eq!(record.thumbnail, None);
        assert_eq!(record.status, CategoryStatus::Published);
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_blocked_is_an_alias_for_draft() {
        let record: CategoryRecord =
            serde_json::from_value(json!({"id": "1", "name": "a", "status": "blocked"})).unwrap();
        assert_eq!(record.status, CategoryStatus::Draft);
        assert_eq!(serde_json::to_value(record.status).unwrap(), json!("draft"));
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let result = serde_json::from_value::<CategoryRecord>(json!({"id": "  ", "name": "a"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_camel_case() {
        let record = CategoryRecord {
            id: "2".into(),
            name: "Child".to_string(),
            description: String::new(),
            icon: default_icon(),
            thumbnail: None,
            parent_id: Some("1".into()),
            status: CategoryStatus::Published,
            created_at: None,
            updated_at: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["parentId"], json!("1"));
        assert_eq!(value["id"], json!("2"));
    }
}
