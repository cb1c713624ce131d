//! Demo dataset seeding.
//!
//! Loads a small master/feeder structure into the staging tables: a
//! three-level master chain with two feeders at different confidence, plus
//! a two-fund cycle behind its own feeder. Handy for trying the CLI
//! without wiring up a real staging loader, and reused by the integration
//! tests.

use crate::db::store::MartStore;
use crate::error::Result;
use crate::types::{AssetType, FundLink, Holding};

/// Holding rows of the demo structure.
pub fn demo_holdings() -> Vec<Holding> {
    vec![
        Holding::new("F_MASTER_A", "EQ_US_TECH", AssetType::Equity, 0.60),
        Holding::new("F_MASTER_A", "EQ_EU_BLUECHIP", AssetType::Equity, 0.40),
        Holding::new("F_MASTER_B", "F_MASTER_A", AssetType::Fund, 0.70),
        Holding::new("F_MASTER_B", "BOND_GOV_10Y", AssetType::Bond, 0.30),
        Holding::new("F_MASTER_C", "F_MASTER_B", AssetType::Fund, 1.00),
        Holding::new("F_CYCLE_1", "F_CYCLE_2", AssetType::Fund, 1.00),
        Holding::new("F_CYCLE_2", "F_CYCLE_1", AssetType::Fund, 1.00),
    ]
}

/// Feeder link rows of the demo structure.
pub fn demo_links() -> Vec<FundLink> {
    vec![
        FundLink::new("TH_FEEDER_MAIN", "F_MASTER_C", Some(1.0)),
        FundLink::new("TH_FEEDER_HALF", "F_MASTER_B", Some(0.5)),
        FundLink::new("TH_FEEDER_CYCLE", "F_CYCLE_1", Some(1.0)),
    ]
}

/// Replace both staging partitions for `as_of_date` with the demo rows.
///
/// Returns the number of holding and link rows written. Re-seeding the
/// same date is idempotent.
pub fn seed_demo(store: &MartStore, as_of_date: &str) -> Result<(usize, usize)> {
    let holdings = store.replace_holdings_partition(as_of_date, &demo_holdings())?;
    let links = store.replace_links_partition(as_of_date, &demo_links())?;
    Ok((holdings, links))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
