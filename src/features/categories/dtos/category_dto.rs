use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::categories::models::{
    deserialize_optional_text, deserialize_parent_id, CategoryId, CategoryRecord, CategoryStatus,
    DeletePolicy,
};
use crate::features::categories::tree::ExpansionAction;

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

fn normalize_icon(icon: Option<String>) -> Option<String> {
    icon.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Request body for creating a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCategoryInput {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    /// Required by the editor forms even though stored records may have none
    #[validate(length(min = 1, max = 500))]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32))]
    pub icon: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 2048))]
    pub thumbnail: Option<String>,

    /// Parent category; null for a root category
    #[serde(default, deserialize_with = "deserialize_parent_id")]
    #[schema(value_type = Option<String>)]
    pub parent_id: Option<CategoryId>,

    #[serde(default)]
    pub status: CategoryStatus,
}

impl NewCategoryInput {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.icon = normalize_icon(self.icon);
        self
    }
}

/// Request body for editing a category.
///
/// Edits replace every editable field; `parentId: null` moves the category to root.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEditInput {
    #[validate(
        length(min = 1, max = 100),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(length(min = 1, max = 500))]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 32))]
    pub icon: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(length(max = 2048))]
    pub thumbnail: Option<String>,

    #[serde(default, deserialize_with = "deserialize_parent_id")]
    #[schema(value_type = Option<String>)]
    pub parent_id: Option<CategoryId>,

    #[serde(default)]
    pub status: CategoryStatus,
}

impl CategoryEditInput {
    pub fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.icon = normalize_icon(self.icon);
        self
    }

    /// Edit that keeps every field of `record` except its parent
    pub fn reparent(record: &CategoryRecord, parent_id: Option<CategoryId>) -> Self {
        Self {
            name: record.name.clone(),
            description: record.description.clone(),
            icon: Some(record.icon.clone()),
            thumbnail: record.thumbnail.clone(),
            parent_id,
            status: record.status,
        }
    }
}

/// Query params for listing categories
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,
}

/// Query params for the parent selector
#[derive(Debug, Deserialize, IntoParams)]
pub struct ParentOptionsQuery {
    /// Category being edited; omit when creating a new category
    #[serde(default, deserialize_with = "deserialize_parent_id")]
    #[param(value_type = Option<String>)]
    pub editing: Option<CategoryId>,
}

/// Query params for the tree view rows.
///
/// Actions are applied in a fixed order: collapse all, expand all, collapse,
/// expand, toggle, reveal.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRowsQuery {
    /// Comma-separated ids of currently expanded categories
    #[serde(default)]
    pub expanded: Option<String>,

    #[serde(default)]
    pub collapse_all: bool,

    #[serde(default)]
    pub expand_all: bool,

    #[serde(default, deserialize_with = "deserialize_parent_id")]
    #[param(value_type = Option<String>)]
    pub collapse: Option<CategoryId>,

    #[serde(default, deserialize_with = "deserialize_parent_id")]
    #[param(value_type = Option<String>)]
    pub expand: Option<CategoryId>,

    #[serde(default, deserialize_with = "deserialize_parent_id")]
    #[param(value_type = Option<String>)]
    pub toggle: Option<CategoryId>,

    /// Category to reveal by expanding all of its ancestors
    #[serde(default, deserialize_with = "deserialize_parent_id")]
    #[param(value_type = Option<String>)]
    pub reveal: Option<CategoryId>,
}

impl VisibleRowsQuery {
    pub fn expanded_ids(&self) -> Vec<CategoryId> {
        self.expanded
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(CategoryId::from)
            .collect()
    }

    pub fn actions(&self) -> Vec<ExpansionAction> {
        let mut actions = Vec::new();
        if self.collapse_all {
            actions.push(ExpansionAction::CollapseAll);
        }
        if self.expand_all {
            actions.push(ExpansionAction::ExpandAll);
        }
        actions.extend(self.collapse.clone().map(ExpansionAction::Collapse));
        actions.extend(self.expand.clone().map(ExpansionAction::Expand));
        actions.extend(self.toggle.clone().map(ExpansionAction::Toggle));
        actions.extend(self.reveal.clone().map(ExpansionAction::Reveal));
        actions
    }
}

/// Response DTO for descendant lookup
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DescendantsResponseDto {
    #[schema(value_type = String)]
    pub id: CategoryId,
    #[schema(value_type = Vec<String>)]
    pub descendant_ids: Vec<CategoryId>,
}

/// Response DTO for a delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeleteCategoryResponseDto {
    pub policy: DeletePolicy,
    /// Removed categories, leaves first
    #[schema(value_type = Vec<String>)]
    pub deleted: Vec<CategoryId>,
    /// Children moved to the deleted category's parent
    #[schema(value_type = Vec<String>)]
    pub reparented: Vec<CategoryId>,
}

/// Response DTO for a snapshot refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponseDto {
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(name: &str, description: &str) -> NewCategoryInput {
        NewCategoryInput {
            name: name.to_string(),
            description: description.to_string(),
            icon: None,
            thumbnail: None,
            parent_id: None,
            status: CategoryStatus::Published,
        }
    }

    #[test]
    fn test_valid_input_passes() {
        assert!(input("Rust", "Systems programming").validate().is_ok());
    }

    #[test]
    fn test_name_limits() {
        assert!(input("", "d").validate().is_err());
        assert!(input("   ", "d").validate().is_err());
        assert!(input(&"n".repeat(100), "d").validate().is_ok());
        assert!(input(&"n".repeat(101), "d").validate().is_err());
        // length is counted in characters, not bytes
        assert!(input(&"é".repeat(100), "d").validate().is_ok());
    }

    #[test]
    fn test_description_limits() {
        assert!(input("n", "").validate().is_err());
        assert!(input("n", &"d".repeat(500)).validate().is_ok());
        assert!(input("n", &"d".repeat(501)).validate().is_err());
    }

    #[test]
    fn test_normalized_trims_name_and_blank_icon() {
        let mut raw = input("  Rust  ", "d");
        raw.icon = Some("  ".to_string());
        let normalized = raw.normalized();
        assert_eq!(normalized.name, "Rust");
        assert_eq!(normalized.icon, None);
    }

    #[test]
    fn test_parent_id_accepts_number_and_empty_string() {
        let a: NewCategoryInput =
            serde_json::from_value(json!({"name": "a", "description": "d", "parentId": 12}))
                .unwrap();
        assert_eq!(a.parent_id, Some(CategoryId::from("12")));

        let b: CategoryEditInput =
            serde_json::from_value(json!({"name": "a", "description": "d", "parentId": ""}))
                .unwrap();
        assert_eq!(b.parent_id, None);
    }

    #[test]
    fn test_expanded_ids_parsing() {
        let query = VisibleRowsQuery {
            expanded: Some("1, 2,,3 ".to_string()),
            ..Default::default()
        };
        let ids: Vec<_> = query.expanded_ids().into_iter().map(|i| i.to_string()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(query.actions().is_empty());
    }

    #[test]
    fn test_visible_rows_actions_follow_fixed_order() {
        let query = VisibleRowsQuery {
            reveal: Some("4".into()),
            toggle: Some("3".into()),
            collapse_all: true,
            ..Default::default()
        };

        assert_eq!(
            query.actions(),
            vec![
                ExpansionAction::CollapseAll,
                ExpansionAction::Toggle("3".into()),
                ExpansionAction::Reveal("4".into()),
            ]
        );
    }
}
