//! Graph layer — edge map construction, traversal, aggregation, and path
//! finding.

pub mod aggregate;
pub mod edges;
pub mod pathfind;
pub mod traversal;
