use crate::features::categories::models::{CategoryNode, FlatNode};

/// Linearize a forest in pre-order, annotating each record with its depth.
pub fn flatten(nodes: &[CategoryNode]) -> Vec<FlatNode> {
    flatten_from(nodes, 0)
}

/// Same as [`flatten`], with `depth` assigned to the given top-level nodes.
pub fn flatten_from(nodes: &[CategoryNode], depth: usize) -> Vec<FlatNode> {
    let mut out = Vec::new();
    let mut stack: Vec<(&CategoryNode, usize)> = nodes.iter().rev().map(|n| (n, depth)).collect();

    while let Some((node, depth)) = stack.pop() {
        out.push(FlatNode {
            record: node.record.clone(),
            depth,
        });
        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::features::categories::tree::build_tree;
    use crate::features::categories::tree::fixtures::{ancestor_depth, chain, random_forest, record};

    #[test]
    fn test_chain_depths_in_order() {
        let flat = flatten(&build_tree(&chain()).roots);

        let ids: Vec<_> = flat.iter().map(|f| f.id().as_str()).collect();
        let depths: Vec<_> = flat.iter().map(|f| f.depth).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[test]
    fn test_node_precedes_children_and_siblings_follow_subtree() {
        let records = vec![
            record("a", None),
            record("b", None),
            record("a1", Some("a")),
            record("a1x", Some("a1")),
            record("a2", Some("a")),
        ];

        let flat = flatten(&build_tree(&records).roots);

        let ids: Vec<_> = flat.iter().map(|f| f.id().as_str()).collect();
        assert_eq!(ids, vec!["a", "a1", "a1x", "a2", "b"]);
        let depths: Vec<_> = flat.iter().map(|f| f.depth).collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_starting_depth_is_respected() {
        let flat = flatten_from(&build_tree(&chain()).roots, 3);
        let depths: Vec<_> = flat.iter().map(|f| f.depth).collect();
        assert_eq!(depths, vec![3, 4, 5]);
    }

    #[test]
    fn test_round_trip_keeps_ids_and_true_depths() {
        for len in [1, 5, 33, 150] {
            let records = random_forest(len);
            let flat = flatten(&build_tree(&records).roots);

            let flat_ids: HashSet<_> = flat.iter().map(|f| f.id().clone()).collect();
            let record_ids: HashSet<_> = records.iter().map(|r| r.id.clone()).collect();
            assert_eq!(flat.len(), records.len());
            assert_eq!(flat_ids, record_ids);

            for node in &flat {
                assert_eq!(node.depth, ancestor_depth(&records, node.id()));
            }
        }
    }

    #[test]
    fn test_flatten_is_stable_across_builds() {
        let records = random_forest(80);
        let first = flatten(&build_tree(&records).roots);
        let second = flatten(&build_tree(&records).roots);
        assert_eq!(first, second);
    }
}
