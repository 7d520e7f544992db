use std::collections::{HashMap, HashSet};

use crate::features::categories::models::{CategoryNode, CategoryRecord, TreeAnomaly, TreeBuild};

/// Build a forest from a flat list of categories.
///
/// Records whose parent is missing from the input become roots (reported as
/// [`TreeAnomaly::Orphan`]). If the parent pointers contain a cycle, the cycle
/// is broken at one of its members, which is emitted as a root and reported as
/// [`TreeAnomaly::Cycle`]. Every unique record appears exactly once in the
/// output, and children keep the relative order of the input.
pub fn build_tree(records: &[CategoryRecord]) -> TreeBuild {
    let mut anomalies = Vec::new();

    // First occurrence of an id wins
    let mut position = HashMap::with_capacity(records.len());
    let mut kept = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if position.contains_key(&record.id) {
            anomalies.push(TreeAnomaly::DuplicateId {
                id: record.id.clone(),
            });
        } else {
            position.insert(&record.id, i);
            kept.push(i);
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); records.len()];
    let mut parent_of: Vec<Option<usize>> = vec![None; records.len()];
    let mut root_candidates = Vec::new();

    for &i in &kept {
        match records[i].parent_id.as_ref() {
            None => root_candidates.push(i),
            Some(parent) => match position.get(parent) {
                Some(&p) => {
                    children[p].push(i);
                    parent_of[i] = Some(p);
                }
                None => {
                    anomalies.push(TreeAnomaly::Orphan {
                        id: records[i].id.clone(),
                        missing_parent: parent.clone(),
                    });
                    root_candidates.push(i);
                }
            },
        }
    }

    let mut walk = Walk {
        children: &children,
        placed: vec![false; records.len()],
        attached: vec![Vec::new(); records.len()],
        order: Vec::with_capacity(kept.len()),
    };

    let mut roots = Vec::new();
    for &root in &root_candidates {
        walk.descend(root);
        roots.push(root);
    }

    // Anything still unplaced hangs off a cycle. Its parent chain stays inside
    // the unplaced set, so walking up must revisit a node: that node is on the cycle.
    for &start in &kept {
        if walk.placed[start] {
            continue;
        }
        let mut seen = HashSet::new();
        let mut current = start;
        while seen.insert(current) {
            match parent_of[current] {
                Some(p) if !walk.placed[p] => current = p,
                _ => break,
            }
        }
        anomalies.push(TreeAnomaly::Cycle {
            id: records[current].id.clone(),
        });
        walk.descend(current);
        roots.push(current);
    }

    TreeBuild {
        roots: walk.assemble(records, &roots),
        anomalies,
    }
}

struct Walk<'a> {
    children: &'a [Vec<usize>],
    placed: Vec<bool>,
    /// children actually attached to each node during descent
    attached: Vec<Vec<usize>>,
    /// pre-order of every placed node
    order: Vec<usize>,
}

impl Walk<'_> {
    fn descend(&mut self, root: usize) {
        self.placed[root] = true;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            self.order.push(node);
            for &child in &self.children[node] {
                if !self.placed[child] {
                    self.placed[child] = true;
                    self.attached[node].push(child);
                }
            }
            stack.extend(self.attached[node].iter().rev());
        }
    }

    /// Materialize nested nodes bottom-up; reversed pre-order visits every
    /// child before its parent.
    fn assemble(mut self, records: &[CategoryRecord], roots: &[usize]) -> Vec<CategoryNode> {
        let mut built: Vec<Option<CategoryNode>> = (0..records.len()).map(|_| None).collect();
        for &node in self.order.iter().rev() {
            let children = std::mem::take(&mut self.attached[node])
                .into_iter()
                .filter_map(|child| built[child].take())
                .collect();
            built[node] = Some(CategoryNode {
                record: records[node].clone(),
                children,
            });
        }
        roots.iter().filter_map(|&root| built[root].take()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::CategoryId;
    use crate::features::categories::tree::fixtures::{chain, random_forest, record};

    fn ids(nodes: &[CategoryNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id().as_str()).collect()
    }

    #[test]
    fn test_chain_builds_single_path() {
        let build = build_tree(&chain());

        assert!(build.anomalies.is_empty());
        assert_eq!(ids(&build.roots), vec!["1"]);
        assert_eq!(ids(&build.roots[0].children), vec!["2"]);
        assert_eq!(ids(&build.roots[0].children[0].children), vec!["3"]);
        assert!(build.roots[0].children[0].children[0].children.is_empty());
    }

    #[test]
    fn test_empty_input_gives_empty_forest() {
        let build = build_tree(&[]);
        assert!(build.roots.is_empty());
        assert!(build.anomalies.is_empty());
    }

    #[test]
    fn test_children_keep_input_order() {
        let records = vec![
            record("c", Some("root")),
            record("a", Some("root")),
            record("root", None),
            record("b", Some("root")),
        ];
        let build = build_tree(&records);

        assert_eq!(ids(&build.roots), vec!["root"]);
        assert_eq!(ids(&build.roots[0].children), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_orphan_becomes_root() {
        let mut records = chain();
        records.push(record("5", Some("999")));

        let build = build_tree(&records);

        assert_eq!(ids(&build.roots), vec!["1", "5"]);
        assert_eq!(
            build.anomalies,
            vec![TreeAnomaly::Orphan {
                id: CategoryId::from("5"),
                missing_parent: CategoryId::from("999"),
            }]
        );
        assert_eq!(build.node_count(), 4);
    }

    #[test]
    fn test_cycle_is_broken_without_losing_nodes() {
        // a -> b -> c -> a, with d hanging off b
        let records = vec![
            record("d", Some("b")),
            record("a", Some("c")),
            record("b", Some("a")),
            record("c", Some("b")),
            record("root", None),
        ];

        let build = build_tree(&records);

        assert!(build.has_cycles());
        assert_eq!(build.node_count(), 5);
        let cycle_roots: Vec<_> = build
            .anomalies
            .iter()
            .filter_map(|a| match a {
                TreeAnomaly::Cycle { id } => Some(id.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(cycle_roots.len(), 1);
        // the break point is on the cycle, never the hanging node
        assert!(["a", "b", "c"].contains(&cycle_roots[0]));
    }

    #[test]
    fn test_self_parent_is_reported_as_cycle() {
        let records = vec![record("x", Some("x")), record("y", Some("x"))];

        let build = build_tree(&records);

        assert_eq!(ids(&build.roots), vec!["x"]);
        assert_eq!(ids(&build.roots[0].children), vec!["y"]);
        assert_eq!(
            build.anomalies,
            vec![TreeAnomaly::Cycle {
                id: CategoryId::from("x")
            }]
        );
    }

    #[test]
    fn test_duplicate_ids_keep_first_occurrence() {
        let mut second = record("1", Some("2"));
        second.name = "shadow".to_string();
        let records = vec![record("1", None), record("2", Some("1")), second];

        let build = build_tree(&records);

        assert_eq!(build.node_count(), 2);
        assert!(!build.has_cycles());
        assert_eq!(
            build.anomalies,
            vec![TreeAnomaly::DuplicateId {
                id: CategoryId::from("1")
            }]
        );
        assert_ne!(build.roots[0].record.name, "shadow");
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let depth = 50_000;
        let records: Vec<_> = (0..depth)
            .map(|i| {
                let parent = (i > 0).then(|| (i - 1).to_string());
                record(&i.to_string(), parent.as_deref())
            })
            .collect();

        let build = build_tree(&records);

        assert_eq!(build.roots.len(), 1);
        assert_eq!(build.node_count(), depth);
        // dismantle iteratively so the recursive Drop of a 50k-deep tree stays off the stack
        let mut pending = build.roots;
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }

    #[test]
    fn test_build_is_idempotent() {
        let records = random_forest(60);
        assert_eq!(build_tree(&records), build_tree(&records));
    }

    #[test]
    fn test_acyclic_input_keeps_every_record() {
        for len in [1, 2, 7, 40, 120] {
            let records = random_forest(len);
            let build = build_tree(&records);
            assert!(build.anomalies.is_empty());
            assert_eq!(build.node_count(), len);
        }
    }
}
