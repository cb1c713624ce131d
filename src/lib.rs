//! fundtrace — true economic exposure for fund-of-funds structures.
//!
//! Flattens feeder/master layers into per-root exposure to terminal assets:
//! staging rows become a weighted graph, every root is traversed with cycle
//! and depth protection, multi-path weights add up, and the result lands in
//! an atomically replaced mart partition.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod observability;
pub mod pipeline;
pub mod seed;
pub mod types;
