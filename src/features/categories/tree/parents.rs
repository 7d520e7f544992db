use super::{build_tree, collect_descendant_ids, flatten};
use crate::features::categories::models::{CategoryId, CategoryRecord, ParentOptions};

/// Categories that may become the parent of `editing`.
///
/// With no node being edited every record qualifies. Otherwise the node
/// itself and all of its descendants are excluded, which is what keeps a
/// category from becoming its own ancestor.
pub fn available_parents(
    records: &[CategoryRecord],
    editing: Option<&CategoryId>,
) -> Vec<CategoryRecord> {
    let Some(editing) = editing else {
        return records.to_vec();
    };

    let excluded = collect_descendant_ids(editing, records);
    records
        .iter()
        .filter(|r| &r.id != editing && !excluded.contains(&r.id))
        .cloned()
        .collect()
}

/// Whether `candidate` is an acceptable parent for `editing`
pub fn is_legal_parent(
    records: &[CategoryRecord],
    editing: Option<&CategoryId>,
    candidate: &CategoryId,
) -> bool {
    if !records.iter().any(|r| &r.id == candidate) {
        return false;
    }
    match editing {
        None => true,
        Some(editing) => {
            candidate != editing && !collect_descendant_ids(editing, records).contains(candidate)
        }
    }
}

/// Legal parents re-built as a tree and flattened for an indented dropdown.
///
/// A legal record whose own parent was filtered out is shown at root; the
/// underlying record keeps its real parent.
pub fn parent_options(records: &[CategoryRecord], editing: Option<&CategoryId>) -> ParentOptions {
    let legal = available_parents(records, editing);
    let build = build_tree(&legal);
    ParentOptions {
        allow_root: true,
        options: flatten(&build.roots),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::features::categories::tree::fixtures::{chain, is_ancestor, random_forest, record};

    fn ids(records: &[CategoryRecord]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_creating_allows_every_record() {
        let records = chain();
        assert_eq!(ids(&available_parents(&records, None)), vec!["1", "2", "3"]);
        assert!(parent_options(&records, None).allow_root);
    }

    #[test]
    fn test_editing_middle_node_excludes_self_and_descendants() {
        let records = chain();
        let legal = available_parents(&records, Some(&"2".into()));
        assert_eq!(ids(&legal), vec!["1"]);
    }

    #[test]
    fn test_editing_root_of_chain_leaves_nothing() {
        let records = chain();
        assert!(available_parents(&records, Some(&"1".into())).is_empty());
        let options = parent_options(&records, Some(&"1".into()));
        assert!(options.allow_root);
        assert!(options.options.is_empty());
    }

    #[test]
    fn test_is_legal_parent() {
        let records = chain();
        assert!(is_legal_parent(&records, Some(&"3".into()), &"1".into()));
        assert!(!is_legal_parent(&records, Some(&"1".into()), &"3".into()));
        assert!(!is_legal_parent(&records, Some(&"2".into()), &"2".into()));
        assert!(!is_legal_parent(&records, None, &"404".into()));
        assert!(is_legal_parent(&records, None, &"3".into()));
    }

    #[test]
    fn test_options_are_indented_tree_of_legal_subset() {
        let records = vec![
            record("1", None),
            record("2", Some("1")),
            record("3", Some("2")),
            record("4", Some("1")),
            record("5", Some("4")),
        ];

        let options = parent_options(&records, Some(&"2".into()));

        let view: Vec<_> = options
            .options
            .iter()
            .map(|f| (f.id().as_str(), f.depth))
            .collect();
        assert_eq!(view, vec![("1", 0), ("4", 1), ("5", 2)]);
    }

    #[test]
    fn test_cyclic_data_is_excluded_as_a_whole() {
        let records = vec![
            record("x", Some("y")),
            record("y", Some("x")),
            record("b", Some("x")),
            record("z", None),
        ];
        let options = parent_options(&records, Some(&"y".into()));
        let view: Vec<_> = options
            .options
            .iter()
            .map(|f| (f.id().as_str(), f.depth))
            .collect();
        assert_eq!(view, vec![("z", 0)]);
    }

    #[test]
    fn test_legal_node_without_visible_parent_is_shown_at_root() {
        let records = vec![record("1", None), record("o", Some("gone"))];

        let options = parent_options(&records, Some(&"1".into()));

        assert_eq!(options.options.len(), 1);
        assert_eq!(options.options[0].depth, 0);
        assert_eq!(
            options.options[0].record.parent_id,
            Some(CategoryId::from("gone"))
        );
    }

    #[test]
    fn test_cycle_exclusion_and_no_false_exclusion() {
        let records = random_forest(70);
        for node in &records {
            let legal: HashSet<_> = available_parents(&records, Some(&node.id))
                .into_iter()
                .map(|r| r.id)
                .collect();
            assert!(!legal.contains(&node.id));

            for other in &records {
                if other.id == node.id {
                    continue;
                }
                let below = is_ancestor(&records, &node.id, &other.id);
                assert_eq!(
                    legal.contains(&other.id),
                    !below,
                    "{} as parent of {}",
                    other.id,
                    node.id
                );
            }
        }
    }
}
