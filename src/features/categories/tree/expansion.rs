use std::collections::{HashMap, HashSet};

use crate::features::categories::models::{CategoryId, CategoryNode, CategoryRecord, FlatNode};

/// A single change requested by a tree view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpansionAction {
    Expand(CategoryId),
    Collapse(CategoryId),
    Toggle(CategoryId),
    /// Expand every ancestor so the node becomes visible
    Reveal(CategoryId),
    ExpandAll,
    CollapseAll,
}

impl ExpansionAction {
    /// Node the action targets, if any
    pub fn target(&self) -> Option<&CategoryId> {
        match self {
            ExpansionAction::Expand(id)
            | ExpansionAction::Collapse(id)
            | ExpansionAction::Toggle(id)
            | ExpansionAction::Reveal(id) => Some(id),
            ExpansionAction::ExpandAll | ExpansionAction::CollapseAll => None,
        }
    }
}

/// Which nodes of a tree view are expanded. Ephemeral view state, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<CategoryId>,
}

impl ExpansionState {
    pub fn from_ids(ids: impl IntoIterator<Item = CategoryId>) -> Self {
        Self {
            expanded: ids.into_iter().collect(),
        }
    }

    pub fn is_expanded(&self, id: &CategoryId) -> bool {
        self.expanded.contains(id)
    }

    pub fn expand(&mut self, id: CategoryId) {
        self.expanded.insert(id);
    }

    pub fn collapse(&mut self, id: &CategoryId) {
        self.expanded.remove(id);
    }

    /// Returns the new state of the node
    pub fn toggle(&mut self, id: &CategoryId) -> bool {
        if self.expanded.remove(id) {
            false
        } else {
            self.expanded.insert(id.clone());
            true
        }
    }

    /// Expand every node that has children
    pub fn expand_all(&mut self, forest: &[CategoryNode]) {
        let mut stack: Vec<&CategoryNode> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            if !node.children.is_empty() {
                self.expanded.insert(node.id().clone());
            }
            stack.extend(node.children.iter());
        }
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    /// Expand every ancestor of `id` so the node becomes visible
    pub fn expand_to(&mut self, records: &[CategoryRecord], id: &CategoryId) {
        let parents: HashMap<&CategoryId, &CategoryId> = records
            .iter()
            .filter_map(|r| r.parent_id.as_ref().map(|p| (&r.id, p)))
            .collect();

        let mut seen = HashSet::new();
        let mut current = id;
        while let Some(&parent) = parents.get(current) {
            if !seen.insert(parent) {
                break;
            }
            self.expanded.insert(parent.clone());
            current = parent;
        }
    }

    /// Forget ids that no longer exist in the forest
    pub fn retain_existing(&mut self, forest: &[CategoryNode]) {
        let mut present = HashSet::new();
        let mut stack: Vec<&CategoryNode> = forest.iter().collect();
        while let Some(node) = stack.pop() {
            present.insert(node.id());
            stack.extend(node.children.iter());
        }
        self.expanded.retain(|id| present.contains(id));
    }

    /// Rows a tree view shows: pre-order, skipping children of collapsed nodes
    pub fn visible_rows(&self, forest: &[CategoryNode]) -> Vec<FlatNode> {
        let mut rows = Vec::new();
        let mut stack: Vec<(&CategoryNode, usize)> = forest.iter().rev().map(|n| (n, 0)).collect();
        while let Some((node, depth)) = stack.pop() {
            rows.push(FlatNode {
                record: node.record.clone(),
                depth,
            });
            if self.is_expanded(node.id()) {
                stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
            }
        }
        rows
    }

    pub fn apply(
        &mut self,
        action: &ExpansionAction,
        records: &[CategoryRecord],
        forest: &[CategoryNode],
    ) {
        match action {
            ExpansionAction::Expand(id) => self.expand(id.clone()),
            ExpansionAction::Collapse(id) => self.collapse(id),
            ExpansionAction::Toggle(id) => {
                self.toggle(id);
            }
            ExpansionAction::Reveal(id) => self.expand_to(records, id),
            ExpansionAction::ExpandAll => self.expand_all(forest),
            ExpansionAction::CollapseAll => self.collapse_all(),
        }
    }

    /// Expanded ids, sorted
    pub fn ids(&self) -> Vec<CategoryId> {
        let mut ids: Vec<_> = self.expanded.iter().cloned().collect();
        ids.sort();
        ids
    }
}
