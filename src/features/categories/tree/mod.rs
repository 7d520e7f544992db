//! Pure tree logic over in-memory category snapshots.
//!
//! Nothing here performs I/O or holds shared state, so every function can run
//! on any thread. All traversals use explicit stacks and visited sets, which
//! keeps them bounded on corrupted input (cycles, self-parents, duplicate ids).

mod builder;
mod descendants;
mod expansion;
mod flatten;
mod parents;

use std::collections::HashMap;

use crate::features::categories::models::{CategoryId, CategoryRecord};

pub use builder::build_tree;
pub use descendants::{collect_descendant_ids, descendants_leaves_first};
pub use expansion::{ExpansionAction, ExpansionState};
pub use flatten::{flatten, flatten_from};
pub use parents::{available_parents, is_legal_parent, parent_options};

/// parent id -> direct children, in input order
fn children_index(records: &[CategoryRecord]) -> HashMap<&CategoryId, Vec<&CategoryRecord>> {
    let mut index: HashMap<&CategoryId, Vec<&CategoryRecord>> = HashMap::new();
    for record in records {
        if let Some(parent) = record.parent_id.as_ref() {
            index.entry(parent).or_default().push(record);
        }
    }
    index
}

#[cfg(test)]
pub(crate) mod fixtures {
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    use crate::features::categories::models::{
        default_icon, CategoryId, CategoryRecord, CategoryStatus,
    };

    pub fn record(id: &str, parent: Option<&str>) -> CategoryRecord {
        CategoryRecord {
            id: CategoryId::from(id),
            name: Word().fake(),
            description: String::new(),
            icon: default_icon(),
            thumbnail: None,
            parent_id: parent.map(CategoryId::from),
            status: CategoryStatus::Published,
            created_at: None,
            updated_at: None,
        }
    }

    /// `[{1, null}, {2, 1}, {3, 2}]`
    pub fn chain() -> Vec<CategoryRecord> {
        vec![
            record("1", None),
            record("2", Some("1")),
            record("3", Some("2")),
        ]
    }

    /// Random acyclic forest: every record points at an earlier record or at root.
    pub fn random_forest(len: usize) -> Vec<CategoryRecord> {
        let mut records = Vec::with_capacity(len);
        for i in 0..len {
            let parent = if i == 0 || (0..4).fake::<u8>() == 0 {
                None
            } else {
                Some((0..i).fake::<usize>().to_string())
            };
            records.push(record(&i.to_string(), parent.as_deref()));
        }
        // shuffle-ish: interleave from both ends so parents are not always first
        let mut shuffled = Vec::with_capacity(len);
        let (mut lo, mut hi) = (0usize, len);
        while lo < hi {
            hi -= 1;
            shuffled.push(records[hi].clone());
            if lo < hi {
                shuffled.push(records[lo].clone());
            }
            lo += 1;
        }
        shuffled
    }

    /// Number of ancestors of `id` in an acyclic list
    pub fn ancestor_depth(records: &[CategoryRecord], id: &CategoryId) -> usize {
        let mut depth = 0;
        let mut current = records.iter().find(|r| &r.id == id);
        while let Some(parent) = current
            .and_then(|r| r.parent_id.as_ref())
            .and_then(|p| records.iter().find(|r| &r.id == p))
        {
            depth += 1;
            current = Some(parent);
        }
        depth
    }

    /// True when `ancestor` is on the parent chain of `id`. Walks upward only,
    /// at most `records.len()` steps.
    pub fn is_ancestor(records: &[CategoryRecord], ancestor: &CategoryId, id: &CategoryId) -> bool {
        let mut current = records.iter().find(|r| &r.id == id);
        for _ in 0..records.len() {
            let Some(parent_id) = current.and_then(|r| r.parent_id.as_ref()) else {
                return false;
            };
            if parent_id == ancestor {
                return true;
            }
            current = records.iter().find(|r| &r.id == parent_id);
        }
        false
    }
}
