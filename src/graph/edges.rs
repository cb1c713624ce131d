//! Edge map construction from staging rows.
//!
//! Holdings and feeder links collapse into one adjacency structure so the
//! traversal and path finder walk a single graph. Per-parent edge order is
//! insertion order: holdings first, then links, each in staging row order.

use std::collections::{BTreeSet, HashMap};

use crate::types::{EdgeKind, FundLink, Holding};

// ---------------------------------------------------------------------------
// Edge / EdgeMap
// ---------------------------------------------------------------------------

/// One weighted parent-to-child edge.
///
/// `expandable` is decided at build time from the holding's declared asset
/// type (fund or ETF) or unconditionally for feeder links. A terminal-typed
/// child is never expanded, even if other rows give it outgoing edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub child_id: String,
    pub weight: f64,
    pub expandable: bool,
    pub kind: EdgeKind,
}

/// Adjacency map from parent id to its outgoing edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeMap {
    edges: HashMap<String, Vec<Edge>>,
}

impl EdgeMap {
    /// Outgoing edges of `node_id`, in insertion order. Unknown nodes have
    /// no edges.
    pub fn out_edges(&self, node_id: &str) -> &[Edge] {
        self.edges.get(node_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct parents with at least one outgoing edge.
    pub fn parent_count(&self) -> usize {
        self.edges.len()
    }

    /// Total number of edges across all parents.
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    fn push(&mut self, parent_id: String, edge: Edge) {
        self.edges.entry(parent_id).or_default().push(edge);
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the adjacency map for one as-of date.
///
/// Holding rows are dropped when either id trims to empty or the weight is
/// not positive. Link rows are dropped when either id trims to empty; their
/// weight is the confidence when it lies in `(0, 1]` and `1.0` otherwise
/// (including missing confidence). Links always point at expandable
/// children.
pub fn build_edge_map(holdings: &[Holding], links: &[FundLink]) -> EdgeMap {
    let mut map = EdgeMap::default();

    for h in holdings {
        let fund_id = h.fund_id.trim();
        let asset_id = h.asset_id.trim();
        if fund_id.is_empty() || asset_id.is_empty() {
            continue;
        }
        if h.weight <= 0.0 {
            continue;
        }
        map.push(
            fund_id.to_string(),
            Edge {
                child_id: asset_id.to_string(),
                weight: h.weight,
                expandable: h.asset_type.is_fund_like(),
                kind: EdgeKind::Holding,
            },
        );
    }

    for l in links {
        let feeder = l.feeder_fund_id.trim();
        let master = l.master_fund_id.trim();
        if feeder.is_empty() || master.is_empty() {
            continue;
        }
        map.push(
            feeder.to_string(),
            Edge {
                child_id: master.to_string(),
                weight: l.link_weight(),
                expandable: true,
                kind: EdgeKind::Link,
            },
        );
    }

    map
}

/// Collect the traversal roots: every distinct feeder fund id plus every
/// distinct holding fund id, trimmed, blanks dropped, sorted ascending.
pub fn collect_roots(holdings: &[Holding], links: &[FundLink]) -> Vec<String> {
    let mut roots: BTreeSet<String> = BTreeSet::new();

    for l in links {
        let feeder = l.feeder_fund_id.trim();
        if !feeder.is_empty() {
            roots.insert(feeder.to_string());
        }
    }
    for h in holdings {
        let fund_id = h.fund_id.trim();
        if !fund_id.is_empty() {
            roots.insert(fund_id.to_string());
        }
    }

    roots.into_iter().collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
