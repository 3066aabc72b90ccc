// SPDX-FileCopyrightText: 2026 osubot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-hook dependency graph and topological sort.
//!
//! The graph only covers the members of one hook. A dependency naming a
//! minifilter outside that member set contributes no edge. Ordering uses
//! Kahn's algorithm with a FIFO queue seeded in member order, so the output
//! is fully determined by the member order and the declared dependencies.

use std::collections::{HashMap, VecDeque};

/// Result of sorting one hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// Every member placed after all of its in-hook dependencies.
    Sorted(Vec<String>),
    /// A cycle blocked the sort; `unresolved` lists the members that could
    /// not be placed, in member order.
    Cycle { unresolved: Vec<String> },
}

/// Dependency graph over the members of a single hook.
#[derive(Debug)]
pub struct DependencyGraph<'a> {
    nodes: Vec<&'a str>,
    /// `dependents[q]` lists every node with an edge `q -> p`.
    dependents: Vec<Vec<usize>>,
    in_degree: Vec<usize>,
}

impl<'a> DependencyGraph<'a> {
    /// Build the graph for `members`, asking `depends_of` for each member's
    /// declared dependencies.
    pub fn build<'d, F>(members: &'a [String], depends_of: F) -> Self
    where
        F: Fn(&str) -> &'d [String],
    {
        let index: HashMap<&str, usize> = members
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i))
            .collect();

        let mut dependents = vec![Vec::new(); members.len()];
        let mut in_degree = vec![0; members.len()];

        for (p, name) in members.iter().enumerate() {
            for dep in depends_of(name) {
                let Some(&q) = index.get(dep.as_str()) else {
                    continue;
                };
                // Repeated dependencies must not count twice.
                if !dependents[q].contains(&p) {
                    dependents[q].push(p);
                    in_degree[p] += 1;
                }
            }
        }

        Self {
            nodes: members.iter().map(String::as_str).collect(),
            dependents,
            in_degree,
        }
    }

    /// Number of members in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of in-hook dependencies of the member at `index`.
    pub fn in_degree(&self, index: usize) -> usize {
        self.in_degree[index]
    }

    /// Topologically sort the members.
    pub fn sort(&self) -> SortOutcome {
        let mut in_degree = self.in_degree.clone();
        let mut queue: VecDeque<usize> = (0..self.nodes.len())
            .filter(|&i| in_degree[i] == 0)
            .collect();
        let mut placed = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(node) = queue.pop_front() {
            placed[node] = true;
            order.push(self.nodes[node].to_string());
            for &dependent in &self.dependents[node] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() == self.nodes.len() {
            SortOutcome::Sorted(order)
        } else {
            SortOutcome::Cycle {
                unresolved: self
                    .nodes
                    .iter()
                    .zip(&placed)
                    .filter(|(_, placed)| !**placed)
                    .map(|(name, _)| name.to_string())
                    .collect(),
            }
        }
    }
}

/// Convenience wrapper: sort `members` given a name-to-dependencies map.
pub fn topological_sort(members: &[String], depends: &HashMap<String, Vec<String>>) -> SortOutcome {
    DependencyGraph::build(members, |name| {
        depends.get(name).map(Vec::as_slice).unwrap_or(&[])
    })
    .sort()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn graph(defs: &[(&str, &[&str])]) -> (Vec<String>, HashMap<String, Vec<String>>) {
        let members = defs.iter().map(|(n, _)| n.to_string()).collect();
        let depends = defs
            .iter()
            .map(|(n, d)| (n.to_string(), d.iter().map(|s| s.to_string()).collect()))
            .collect();
        (members, depends)
    }

    fn sorted(outcome: SortOutcome) -> Vec<String> {
        match outcome {
            SortOutcome::Sorted(order) => order,
            SortOutcome::Cycle { unresolved } => panic!("unexpected cycle: {unresolved:?}"),
        }
    }

    #[test]
    fn linear_chain() {
        let (members, depends) = graph(&[("A", &[]), ("B", &["A"]), ("C", &["B"])]);
        assert_eq!(sorted(topological_sort(&members, &depends)), ["A", "B", "C"]);
    }

    #[test]
    fn dependencies_override_discovery_order() {
        let (members, depends) = graph(&[("C", &["B"]), ("B", &["A"]), ("A", &[])]);
        assert_eq!(sorted(topological_sort(&members, &depends)), ["A", "B", "C"]);
    }

    #[test]
    fn independent_members_keep_discovery_order() {
        let (members, depends) = graph(&[("z", &[]), ("a", &[]), ("m", &[])]);
        assert_eq!(sorted(topological_sort(&members, &depends)), ["z", "a", "m"]);
    }

    #[test]
    fn diamond_uses_fifo_tie_break() {
        let (members, depends) = graph(&[
            ("d", &["b", "c"]),
            ("c", &["a"]),
            ("b", &["a"]),
            ("a", &[]),
        ]);
        assert_eq!(sorted(topological_sort(&members, &depends)), ["a", "c", "b", "d"]);
    }

    #[test]
    fn out_of_hook_dependencies_are_ignored() {
        let (members, depends) = graph(&[("P", &["Q", "ghost"]), ("R", &[])]);
        assert_eq!(sorted(topological_sort(&members, &depends)), ["P", "R"]);
    }

    #[test]
    fn repeated_dependency_counts_once() {
        let members = vec!["a".to_string(), "b".to_string()];
        let depends = HashMap::from([("b".to_string(), vec!["a".to_string(), "a".to_string()])]);
        let g = DependencyGraph::build(&members, |n| {
            depends.get(n).map(Vec::as_slice).unwrap_or(&[])
        });
        assert_eq!(g.in_degree(1), 1);
        assert_eq!(sorted(g.sort()), ["a", "b"]);
    }

    #[test]
    fn cycle_reports_unresolved_members() {
        let (members, depends) = graph(&[
            ("A", &["D"]),
            ("B", &["A"]),
            ("C", &["B"]),
            ("D", &["C"]),
            ("free", &[]),
        ]);
        assert_eq!(
            topological_sort(&members, &depends),
            SortOutcome::Cycle {
                unresolved: vec!["A".into(), "B".into(), "C".into(), "D".into()]
            }
        );
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let (members, depends) = graph(&[("A", &["A"])]);
        assert!(matches!(
            topological_sort(&members, &depends),
            SortOutcome::Cycle { .. }
        ));
    }

    #[test]
    fn downstream_of_cycle_is_unresolved_too() {
        let (members, depends) = graph(&[("A", &["B"]), ("B", &["A"]), ("C", &["A"])]);
        assert_eq!(
            topological_sort(&members, &depends),
            SortOutcome::Cycle {
                unresolved: vec!["A".into(), "B".into(), "C".into()]
            }
        );
    }

    #[test]
    fn empty_graph_sorts_to_empty() {
        let g = DependencyGraph::build(&[], |_| &[]);
        assert!(g.is_empty());
        assert_eq!(g.sort(), SortOutcome::Sorted(vec![]));
    }

    /// Random DAGs: each node may only depend on lower-numbered nodes, and
    /// members are shuffled before sorting.
    fn arb_dag() -> impl Strategy<Value = (Vec<String>, HashMap<String, Vec<String>>)> {
        (1usize..12)
            .prop_flat_map(|n| {
                let deps = proptest::collection::vec(proptest::collection::vec(any::<bool>(), n), n);
                (Just(n), deps, Just((0..n).collect::<Vec<_>>()).prop_shuffle())
            })
            .prop_map(|(n, adjacency, perm)| {
                let name = |i: usize| format!("f{i}");
                let depends = (0..n)
                    .map(|p| {
                        let ds = (0..p).filter(|&q| adjacency[p][q]).map(name).collect();
                        (name(p), ds)
                    })
                    .collect();
                (perm.into_iter().map(name).collect(), depends)
            })
    }

    proptest! {
        #[test]
        fn order_respects_dependencies((members, depends) in arb_dag()) {
            let order = sorted(topological_sort(&members, &depends));
            prop_assert_eq!(order.len(), members.len());
            let pos = |n: &str| order.iter().position(|o| o == n).unwrap();
            for (p, ds) in &depends {
                for q in ds {
                    prop_assert!(pos(q) < pos(p), "{} must precede {}", q, p);
                }
            }
        }

        #[test]
        fn sort_is_deterministic((members, depends) in arb_dag()) {
            let first = topological_sort(&members, &depends);
            let second = topological_sort(&members, &depends);
            prop_assert_eq!(first, second);
        }
    }
}
