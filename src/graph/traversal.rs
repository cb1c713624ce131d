//! Depth-first exposure traversal.
//!
//! Each root is walked independently with a per-path ancestor set, so a
//! node may appear on many distinct paths (multi-path contributions add up
//! later in aggregation) but never twice on the same path. Termination is
//! guaranteed by the ancestor check plus the depth bound.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::graph::edges::EdgeMap;
use crate::types::PathContribution;

/// Walk every path from `root` and collect one contribution per terminal
/// hit.
///
/// A child is expanded only when its edge is expandable, it is not already
/// on the current path, and the next depth is still below `max_depth`. In
/// every other case the child is emitted as a terminal contribution, so a
/// fund cut off by the depth bound (or closing a cycle) still surfaces in
/// the output instead of silently vanishing. Emitted depths never exceed
/// `max_depth` for any `max_depth >= 1`.
pub fn traverse(map: &EdgeMap, root: &str, max_depth: u32) -> Vec<PathContribution> {
    let mut ancestors: HashSet<String> = HashSet::new();
    ancestors.insert(root.to_string());

    let mut out = Vec::new();
    walk(map, root, root, 1.0, 0, max_depth, &mut ancestors, &mut out);
    out
}

/// Traverse every root and concatenate the contributions, in root order.
///
/// Roots are independent, so the fan-out runs on the rayon pool; the
/// collected output still lists contributions in the same order a
/// sequential pass over `roots` would produce.
pub fn traverse_all(map: &EdgeMap, roots: &[String], max_depth: u32) -> Vec<PathContribution> {
    roots
        .par_iter()
        .flat_map(|root| traverse(map, root, max_depth))
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn walk(
    map: &EdgeMap,
    root: &str,
    node: &str,
    cumulative: f64,
    depth: u32,
    max_depth: u32,
    ancestors: &mut HashSet<String>,
    out: &mut Vec<PathContribution>,
) {
    for edge in map.out_edges(node) {
        let next_weight = cumulative * edge.weight;
        if next_weight <= 0.0 {
            continue;
        }
        let next_depth = depth + 1;

        if edge.expandable && !ancestors.contains(&edge.child_id) && next_depth < max_depth {
            ancestors.insert(edge.child_id.clone());
            walk(
                map,
                root,
                &edge.child_id,
                next_weight,
                next_depth,
                max_depth,
                ancestors,
                out,
            );
            ancestors.remove(&edge.child_id);
        } else {
            out.push(PathContribution {
                root_fund_id: root.to_string(),
                final_asset_id: edge.child_id.clone(),
                weight: next_weight,
                depth: next_depth,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
