//! End-to-end pipeline runs: build, trace, and verify.
//!
//! Each run validates the staging schema up front, so a broken upstream
//! load fails with a named-column error before any traversal or mart write
//! happens.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::store::MartStore;
use crate::error::Result;
use crate::graph::aggregate::aggregate;
use crate::graph::edges::{build_edge_map, collect_roots};
use crate::graph::pathfind::find_path;
use crate::graph::traversal::traverse_all;
use crate::types::{ExposureRecord, TracePath};

// ---------------------------------------------------------------------------
// Staging contract
// ---------------------------------------------------------------------------

const REQUIRED_HOLDING_COLUMNS: &[&str] =
    &["fund_id", "asset_id", "asset_type", "weight", "as_of_date"];
const REQUIRED_LINK_COLUMNS: &[&str] =
    &["feeder_fund_id", "master_fund_id", "confidence", "as_of_date"];

fn validate_staging(store: &MartStore) -> Result<()> {
    store.require_columns("stg_holdings", REQUIRED_HOLDING_COLUMNS)?;
    store.require_columns("stg_fund_links", REQUIRED_LINK_COLUMNS)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Row counts from one completed build run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildSummary {
    pub as_of_date: String,
    pub max_depth: u32,
    pub holdings_rows: usize,
    pub link_rows: usize,
    pub exposure_rows: usize,
}

impl std::fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "as_of_date={} max_depth={} holdings={} links={} exposure_rows={}",
            self.as_of_date, self.max_depth, self.holdings_rows, self.link_rows, self.exposure_rows
        )
    }
}

/// Rebuild the `mart_true_exposure` partition for `as_of_date`.
///
/// Loads the staging partition, traverses every root, aggregates the
/// contributions, and atomically replaces the mart partition. A date with
/// no staging rows still succeeds: the partition is cleared and the
/// summary reports zero rows.
pub fn run_build(store: &MartStore, as_of_date: NaiveDate, max_depth: u32) -> Result<BuildSummary> {
    let date_key = as_of_date.format("%Y-%m-%d").to_string();
    tracing::info!("building exposure for {} (max_depth={})", date_key, max_depth);

    validate_staging(store)?;

    let holdings = store.load_holdings(&date_key)?;
    let links = store.load_links(&date_key)?;

    let map = build_edge_map(&holdings, &links);
    let roots = collect_roots(&holdings, &links);
    tracing::debug!(
        "edge map ready: {} parents, {} edges, {} roots",
        map.parent_count(),
        map.edge_count(),
        roots.len()
    );

    let contributions = traverse_all(&map, &roots, max_depth);
    let records = aggregate(contributions);
    let exposure_rows = store.replace_exposure_partition(&date_key, &records)?;

    let summary = BuildSummary {
        as_of_date: date_key,
        max_depth,
        holdings_rows: holdings.len(),
        link_rows: links.len(),
        exposure_rows,
    };
    tracing::info!("build complete: {}", summary);
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

/// Find one shortest ownership chain from `root` to `target` on the
/// staging partition for `as_of_date`.
pub fn run_trace(
    store: &MartStore,
    as_of_date: NaiveDate,
    root: &str,
    target: &str,
    max_depth: u32,
) -> Result<Option<TracePath>> {
    validate_staging(store)?;

    let date_key = as_of_date.format("%Y-%m-%d").to_string();
    let holdings = store.load_holdings(&date_key)?;
    let links = store.load_links(&date_key)?;
    let map = build_edge_map(&holdings, &links);

    Ok(find_path(&map, root.trim(), target.trim(), max_depth))
}

// ---------------------------------------------------------------------------
// Verify
// ---------------------------------------------------------------------------

/// Compare the mart partition for `as_of_date` against an expectation file.
///
/// The file holds a JSON array of exposure records. Returns one finding
/// per discrepancy: rows missing from the mart, unexpected extra rows,
/// weight differences beyond `tolerance`, and depth mismatches. An empty
/// vector means the partition matches.
pub fn run_verify(
    store: &MartStore,
    as_of_date: NaiveDate,
    expected_path: &Path,
    tolerance: f64,
) -> Result<Vec<String>> {
    use std::collections::BTreeMap;

    let raw = std::fs::read_to_string(expected_path)?;
    let expected: Vec<ExposureRecord> = serde_json::from_str(&raw)?;

    let date_key = as_of_date.format("%Y-%m-%d").to_string();
    let actual = store.exposure_partition(&date_key)?;

    let expected_by_key: BTreeMap<(String, String), &ExposureRecord> = expected
        .iter()
        .map(|r| ((r.root_fund_id.clone(), r.final_asset_id.clone()), r))
        .collect();
    let actual_by_key: BTreeMap<(String, String), &ExposureRecord> = actual
        .iter()
        .map(|r| ((r.root_fund_id.clone(), r.final_asset_id.clone()), r))
        .collect();

    let mut findings = Vec::new();

    for ((root, asset), exp) in &expected_by_key {
        match actual_by_key.get(&(root.clone(), asset.clone())) {
            None => findings.push(format!("missing row: ({root}, {asset})")),
            Some(act) => {
                let diff = (act.effective_weight - exp.effective_weight).abs();
                if diff > tolerance {
                    findings.push(format!(
                        "weight mismatch for ({root}, {asset}): expected {}, got {}",
                        exp.effective_weight, act.effective_weight
                    ));
                }
                if act.path_depth != exp.path_depth {
                    findings.push(format!(
                        "depth mismatch for ({root}, {asset}): expected {}, got {}",
                        exp.path_depth, act.path_depth
                    ));
                }
            }
        }
    }

    for (root, asset) in actual_by_key.keys() {
        if !expected_by_key.contains_key(&(root.clone(), asset.clone())) {
            findings.push(format!("unexpected row: ({root}, {asset})"));
        }
    }

    if findings.is_empty() {
        tracing::info!("verify passed: {} rows match for {}", actual.len(), date_key);
    } else {
        tracing::warn!("verify found {} discrepancies for {}", findings.len(), date_key);
    }
    Ok(findings)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
