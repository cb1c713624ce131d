//! Aggregation of raw path contributions into exposure records.
//!
//! Grouping key is `(root_fund_id, final_asset_id)`: weights from distinct
//! paths add, and the recorded depth is the longest contributing path.

use std::collections::BTreeMap;

use crate::types::{ExposureRecord, PathContribution};

/// Collapse per-path contributions into one record per root/terminal pair.
///
/// Output order is deterministic: root ascending, then effective weight
/// descending, then terminal id ascending for equal weights.
pub fn aggregate(contributions: Vec<PathContribution>) -> Vec<ExposureRecord> {
    let mut grouped: BTreeMap<(String, String), (f64, u32)> = BTreeMap::new();

    for c in contributions {
        let entry = grouped
            .entry((c.root_fund_id, c.final_asset_id))
            .or_insert((0.0, 0));
        entry.0 += c.weight;
        entry.1 = entry.1.max(c.depth);
    }

    let mut records: Vec<ExposureRecord> = grouped
        .into_iter()
        .map(|((root, asset), (weight, depth))| ExposureRecord {
            root_fund_id: root,
            final_asset_id: asset,
            effective_weight: weight,
            path_depth: depth,
        })
        .collect();

    records.sort_by(|a, b| {
        a.root_fund_id
            .cmp(&b.root_fund_id)
            .then_with(|| b.effective_weight.total_cmp(&a.effective_weight))
            .then_with(|| a.final_asset_id.cmp(&b.final_asset_id))
    });
    records
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn contribution(root: &str, asset: &str, weight: f64, depth: u32) -> PathContribution {
        PathContribution {
            root_fund_id: root.to_string(),
            final_asset_id: asset.to_string(),
            weight,
            depth,
        }
    }

    #[test]
    fn parallel_paths_sum_weights_and_keep_the_longest_depth() {
        let records = aggregate(vec![
            contribution("F_TOP", "EQ_1", 0.5, 2),
            contribution("F_TOP", "EQ_1", 0.3, 4),
            contribution("F_TOP", "EQ_1", 0.2, 3),
        ]);

        assert_eq!(records.len(), 1);
        assert!((records[0].effective_weight - 1.0).abs() < 1e-9);
        assert_eq!(records[0].path_depth, 4);
    }

    #[test]
    fn distinct_terminals_stay_separate() {
        let records = aggregate(vec![
            contribution("F_TOP", "EQ_1", 0.6, 2),
            contribution("F_TOP", "EQ_2", 0.4, 2),
        ]);

        assert_eq!(records.len(), 2);
    }

    #[test]
    fn same_terminal_under_different_roots_stays_separate() {
        let records = aggregate(vec![
            contribution("F_A", "EQ_1", 0.6, 2),
            contribution("F_B", "EQ_1", 0.9, 2),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].root_fund_id, "F_A");
        assert_eq!(records[1].root_fund_id, "F_B");
    }

    #[test]
    fn order_is_root_asc_then_weight_desc_then_terminal_asc() {
        let records = aggregate(vec![
            contribution("F_B", "EQ_1", 0.9, 2),
            contribution("F_A", "EQ_LIGHT", 0.1, 2),
            contribution("F_A", "EQ_HEAVY", 0.7, 2),
            contribution("F_A", "EQ_TIE_B", 0.2, 2),
            contribution("F_A", "EQ_TIE_A", 0.2, 2),
        ]);

        let keys: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.root_fund_id.as_str(), r.final_asset_id.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("F_A", "EQ_HEAVY"),
                ("F_A", "EQ_TIE_A"),
                ("F_A", "EQ_TIE_B"),
                ("F_A", "EQ_LIGHT"),
                ("F_B", "EQ_1"),
            ]
        );
    }

    #[test]
    fn single_contribution_passes_through() {
        let records = aggregate(vec![contribution("F_A", "BOND_1", 0.30, 3)]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].effective_weight, 0.30);
        assert_eq!(records[0].path_depth, 3);
    }

    #[test]
    fn empty_input_produces_no_records() {
        assert!(aggregate(Vec::new()).is_empty());
    }
}
