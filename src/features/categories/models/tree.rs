use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::category::{CategoryId, CategoryRecord};

/// Nested category produced by the tree builder; never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub record: CategoryRecord,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn id(&self) -> &CategoryId {
        &self.record.id
    }

    /// Number of nodes in this subtree, including the node itself
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// Depth-annotated category used for indentation in linear widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FlatNode {
    #[serde(flatten)]
    pub record: CategoryRecord,
    pub depth: usize,
}

#[cfg(test)]
impl FlatNode {
    pub fn id(&self) -> &CategoryId {
        &self.record.id
    }
}

/// Structural problems found while building a tree from untrusted data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeAnomaly {
    /// Parent id not present in the input; the record was placed at root
    Orphan {
        id: CategoryId,
        #[serde(rename = "missingParent")]
        missing_parent: CategoryId,
    },
    /// Parent chain loops; the record was placed at root to break the cycle
    Cycle { id: CategoryId },
    /// Id seen more than once; later occurrences were dropped
    DuplicateId { id: CategoryId },
}

/// Result of building a forest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TreeBuild {
    pub roots: Vec<CategoryNode>,
    pub anomalies: Vec<TreeAnomaly>,
}

impl TreeBuild {
    pub fn has_cycles(&self) -> bool {
        self.anomalies
            .iter()
            .any(|a| matches!(a, TreeAnomaly::Cycle { .. }))
    }

    pub fn node_count(&self) -> usize {
        self.roots.iter().map(CategoryNode::subtree_len).sum()
    }
}

/// Legal parents for a create or edit form, indented for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParentOptions {
    /// The implicit "no parent" option is always available
    pub allow_root: bool,
    pub options: Vec<FlatNode>,
}

/// Rows of a tree view together with the expansion state that produced them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VisibleRows {
    /// Expanded ids after the requested actions; send back on the next request
    #[schema(value_type = Vec<String>)]
    pub expanded: Vec<CategoryId>,
    pub rows: Vec<FlatNode>,
}
