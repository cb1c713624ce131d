//! Breadth-first single-path diagnostic.
//!
//! Answers "show me one concrete chain from this root to that asset". BFS
//! returns a minimum-hop path; among equal-hop candidates the first one in
//! edge insertion order wins, which keeps the answer stable run to run.

use std::collections::{HashSet, VecDeque};

use crate::graph::edges::EdgeMap;
use crate::types::{TracePath, TraceStep};

/// Find one shortest path from `root` to `target`, up to `max_depth` edges.
///
/// `root == target` yields the trivial path: no steps, cumulative weight
/// `1.0`. Only expandable children are enqueued, so a path can end on a
/// terminal asset but never pass through one. Returns `None` when no path
/// exists within the bound.
pub fn find_path(map: &EdgeMap, root: &str, target: &str, max_depth: u32) -> Option<TracePath> {
    if root == target {
        return Some(TracePath {
            steps: Vec::new(),
            cumulative_weight: 1.0,
        });
    }

    // Queue holds (node, steps so far, cumulative weight, edges used).
    let mut queue: VecDeque<(String, Vec<TraceStep>, f64, u32)> = VecDeque::new();
    let mut visited: HashSet<String> = HashSet::new();

    queue.push_back((root.to_string(), Vec::new(), 1.0, 0));
    visited.insert(root.to_string());

    while let Some((node, steps, cumulative, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for edge in map.out_edges(&node) {
            let next_cumulative = cumulative * edge.weight;
            let step = TraceStep {
                from_id: node.clone(),
                to_id: edge.child_id.clone(),
                kind: edge.kind,
                edge_weight: edge.weight,
                cumulative_weight: next_cumulative,
            };

            if edge.child_id == target {
                let mut full = steps;
                full.push(step);
                return Some(TracePath {
                    steps: full,
                    cumulative_weight: next_cumulative,
                });
            }

            if edge.expandable && !visited.contains(&edge.child_id) {
                visited.insert(edge.child_id.clone());
                let mut next_steps = steps.clone();
                next_steps.push(step);
                queue.push_back((edge.child_id.clone(), next_steps, next_cumulative, depth + 1));
            }
        }
    }

    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edges::build_edge_map;
    use crate::types::{AssetType, EdgeKind, FundLink, Holding};

    fn scenario_map() -> EdgeMap {
        let holdings = vec![
            Holding::new("F_MASTER_A", "EQ_US_TECH", AssetType::Equity, 0.60),
            Holding::new("F_MASTER_A", "EQ_EU_BLUECHIP", AssetType::Equity, 0.40),
            Holding::new("F_MASTER_B", "F_MASTER_A", AssetType::Fund, 0.70),
            Holding::new("F_MASTER_B", "BOND_GOV_10Y", AssetType::Bond, 0.30),
            Holding::new("F_MASTER_C", "F_MASTER_B", AssetType::Fund, 1.00),
            Holding::new("F_CYCLE_1", "F_CYCLE_2", AssetType::Fund, 1.00),
            Holding::new("F_CYCLE_2", "F_CYCLE_1", AssetType::Fund, 1.00),
        ];
        let links = vec![
            FundLink::new("TH_FEEDER_MAIN", "F_MASTER_C", Some(1.0)),
            FundLink::new("TH_FEEDER_HALF", "F_MASTER_B", Some(0.5)),
            FundLink::new("TH_FEEDER_CYCLE", "F_CYCLE_1", Some(1.0)),
        ];
        build_edge_map(&holdings, &links)
    }

    // -- basics ------------------------------------------------------------

    #[test]
    fn path_to_self_has_no_steps_and_unit_weight() {
        let map = scenario_map();
        let path = find_path(&map, "F_MASTER_A", "F_MASTER_A", 6).unwrap();

        assert!(path.steps.is_empty());
        assert_eq!(path.cumulative_weight, 1.0);
        assert_eq!(path.depth(), 0);
    }

    #[test]
    fn direct_holding_is_a_single_step() {
        let map = scenario_map();
        let path = find_path(&map, "F_MASTER_A", "EQ_US_TECH", 6).unwrap();

        assert_eq!(path.depth(), 1);
        assert_eq!(path.steps[0].from_id, "F_MASTER_A");
        assert_eq!(path.steps[0].to_id, "EQ_US_TECH");
        assert_eq!(path.steps[0].kind, EdgeKind::Holding);
        assert_eq!(path.cumulative_weight, 0.60);
    }

    #[test]
    fn multi_hop_path_accumulates_the_weight_product() {
        let map = scenario_map();
        let path = find_path(&map, "TH_FEEDER_MAIN", "EQ_US_TECH", 6).unwrap();

        assert_eq!(path.depth(), 4);
        assert_eq!(path.steps[0].kind, EdgeKind::Link);
        assert_eq!(path.steps[3].to_id, "EQ_US_TECH");
        assert!((path.cumulative_weight - 0.42).abs() < 1e-9);

        // Each step's cumulative weight is the running product.
        let mut running = 1.0;
        for step in &path.steps {
            running *= step.edge_weight;
            assert!((step.cumulative_weight - running).abs() < 1e-12);
        }
        assert_eq!(path.cumulative_weight, path.steps.last().unwrap().cumulative_weight);
    }

    // -- shortest path selection ------------------------------------------

    #[test]
    fn shorter_path_wins_over_heavier_longer_one() {
        // EQ_T is one hop away at weight 0.1 and two hops away at 0.9.
        let holdings = vec![
            Holding::new("F_X", "EQ_T", AssetType::Equity, 0.1),
            Holding::new("F_X", "F_Y", AssetType::Fund, 0.9),
            Holding::new("F_Y", "EQ_T", AssetType::Equity, 1.0),
        ];
        let map = build_edge_map(&holdings, &[]);

        let path = find_path(&map, "F_X", "EQ_T", 6).unwrap();
        assert_eq!(path.depth(), 1);
        assert_eq!(path.cumulative_weight, 0.1);
    }

    #[test]
    fn equal_length_paths_tie_break_by_insertion_order() {
        let holdings = vec![
            Holding::new("F_A", "F_B", AssetType::Fund, 0.5),
            Holding::new("F_A", "F_C", AssetType::Fund, 0.5),
            Holding::new("F_B", "EQ_T", AssetType::Equity, 1.0),
            Holding::new("F_C", "EQ_T", AssetType::Equity, 1.0),
        ];
        let map = build_edge_map(&holdings, &[]);

        let path = find_path(&map, "F_A", "EQ_T", 6).unwrap();
        assert_eq!(path.depth(), 2);
        assert_eq!(path.steps[0].to_id, "F_B");
    }

    // -- depth bound -------------------------------------------------------

    #[test]
    fn path_at_exactly_the_depth_bound_is_found() {
        let holdings = vec![
            Holding::new("F_A", "F_B", AssetType::Fund, 1.0),
            Holding::new("F_B", "F_C", AssetType::Fund, 1.0),
            Holding::new("F_C", "EQ_T", AssetType::Equity, 1.0),
        ];
        let map = build_edge_map(&holdings, &[]);

        let path = find_path(&map, "F_A", "EQ_T", 3).unwrap();
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn path_beyond_the_depth_bound_is_not_found() {
        let holdings = vec![
            Holding::new("F_A", "F_B", AssetType::Fund, 1.0),
            Holding::new("F_B", "F_C", AssetType::Fund, 1.0),
            Holding::new("F_C", "EQ_T", AssetType::Equity, 1.0),
        ];
        let map = build_edge_map(&holdings, &[]);

        assert!(find_path(&map, "F_A", "EQ_T", 2).is_none());
    }

    // -- reachability ------------------------------------------------------

    #[test]
    fn unreachable_target_returns_none() {
        let map = scenario_map();
        assert!(find_path(&map, "TH_FEEDER_MAIN", "EQ_NOWHERE", 6).is_none());
    }

    #[test]
    fn search_through_a_cycle_terminates() {
        let map = scenario_map();
        assert!(find_path(&map, "TH_FEEDER_CYCLE", "EQ_NOWHERE", 6).is_none());
    }

    #[test]
    fn terminal_nodes_are_not_traversed_through() {
        // EQ_MID has outgoing rows, but F_A's holding declares it terminal,
        // so nothing behind it is reachable from F_A.
        let holdings = vec![
            Holding::new("F_A", "EQ_MID", AssetType::Equity, 1.0),
            Holding::new("EQ_MID", "EQ_T", AssetType::Equity, 1.0),
        ];
        let map = build_edge_map(&holdings, &[]);

        assert!(find_path(&map, "F_A", "EQ_T", 6).is_none());
        assert!(find_path(&map, "F_A", "EQ_MID", 6).is_some());
    }
}
