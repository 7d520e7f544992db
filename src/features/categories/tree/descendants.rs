use std::collections::HashSet;

use super::children_index;
use crate::features::categories::models::{CategoryId, CategoryRecord};

/// Ids of every transitive descendant of `node_id`.
///
/// The node itself is never part of the result, even when corrupted data
/// loops back to it. Each record is visited at most once.
pub fn collect_descendant_ids(
    node_id: &CategoryId,
    records: &[CategoryRecord],
) -> HashSet<CategoryId> {
    let mut found = HashSet::new();
    for id in walk_down(node_id, records) {
        found.insert(id.clone());
    }
    found
}

/// The node and its descendants ordered so every node comes before its
/// ancestors. Deleting in this order never leaves an orphan behind.
pub fn descendants_leaves_first(
    node_id: &CategoryId,
    records: &[CategoryRecord],
) -> Vec<CategoryId> {
    let mut order: Vec<CategoryId> = walk_down(node_id, records).into_iter().cloned().collect();
    order.reverse();
    order.push(node_id.clone());
    order
}

/// Pre-order over descendants, excluding the start node
fn walk_down<'a>(node_id: &'a CategoryId, records: &'a [CategoryRecord]) -> Vec<&'a CategoryId> {
    let index = children_index(records);
    let mut visited: HashSet<&CategoryId> = HashSet::new();
    visited.insert(node_id);

    let mut order = Vec::new();
    let mut stack = vec![node_id];
    while let Some(current) = stack.pop() {
        let Some(children) = index.get(current) else {
            continue;
        };
        for &child in children.iter().rev() {
            if visited.insert(&child.id) {
                order.push(&child.id);
                stack.push(&child.id);
            }
        }
    }
    order
}
