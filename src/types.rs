//! Core domain types for fundtrace.
//!
//! Mirrors the staging and mart row shapes exactly so that records move
//! between SQLite and the graph layers without renaming or conversion.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// AssetType
// ---------------------------------------------------------------------------

/// Classification of a held asset.
///
/// `Fund` and `Etf` are the fund-like types: holdings of those are
/// expandable during traversal, everything else is a terminal leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Fund,
    Equity,
    Bond,
    Etf,
    Cash,
    Other,
}

impl AssetType {
    /// String representation matching the staging table values.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fund => "fund",
            Self::Equity => "equity",
            Self::Bond => "bond",
            Self::Etf => "etf",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }

    /// Parse from a string (case-insensitive).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fund" => Some(Self::Fund),
            "equity" | "stock" => Some(Self::Equity),
            "bond" => Some(Self::Bond),
            "etf" => Some(Self::Etf),
            "cash" => Some(Self::Cash),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Total parse for staging rows: trims, lowercases, and maps anything
    /// unrecognized to [`AssetType::Other`]. A bad type string must not fail
    /// a load; it just means the asset is treated as a leaf.
    pub fn parse_lossy(s: &str) -> Self {
        Self::from_str_loose(s.trim()).unwrap_or(Self::Other)
    }

    /// Whether holdings of this type are expanded during traversal.
    pub fn is_fund_like(&self) -> bool {
        matches!(self, Self::Fund | Self::Etf)
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EdgeKind
// ---------------------------------------------------------------------------

/// Provenance of a graph edge: a direct holding row or a feeder→master link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Holding,
    Link,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Holding => "holding",
            Self::Link => "link",
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "holding" => Some(Self::Holding),
            "link" => Some(Self::Link),
            _ => None,
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Staging rows
// ---------------------------------------------------------------------------

/// One `stg_holdings` row: a fund's direct allocation into an asset (which
/// may itself be a fund).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub fund_id: String,
    pub asset_id: String,
    pub asset_type: AssetType,
    /// Allocation fraction in [0, 1]. Zero or negative weights carry no
    /// exposure and are dropped by the edge map builder.
    pub weight: f64,
}

impl Holding {
    pub fn new(
        fund_id: impl Into<String>,
        asset_id: impl Into<String>,
        asset_type: AssetType,
        weight: f64,
    ) -> Self {
        Self {
            fund_id: fund_id.into(),
            asset_id: asset_id.into(),
            asset_type,
            weight,
        }
    }
}

/// One `stg_fund_links` row: a feeder fund routing into a master fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundLink {
    pub feeder_fund_id: String,
    pub master_fund_id: String,
    /// Match confidence from the linking collaborator. `None` means unknown.
    pub confidence: Option<f64>,
}

impl FundLink {
    pub fn new(
        feeder_fund_id: impl Into<String>,
        master_fund_id: impl Into<String>,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            feeder_fund_id: feeder_fund_id.into(),
            master_fund_id: master_fund_id.into(),
            confidence,
        }
    }

    /// Edge weight for this link: the confidence when it lies in (0, 1],
    /// otherwise 1.0 (missing and out-of-range values alike).
    pub fn link_weight(&self) -> f64 {
        match self.confidence {
            Some(c) if c > 0.0 && c <= 1.0 => c,
            _ => 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Traversal output
// ---------------------------------------------------------------------------

/// One raw path contribution emitted by the traversal engine before
/// aggregation: a single root→terminal path's weight product and depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathContribution {
    pub root_fund_id: String,
    pub final_asset_id: String,
    pub weight: f64,
    pub depth: u32,
}

/// One `mart_true_exposure` row: the aggregated exposure of a root fund to
/// a terminal asset across every qualifying path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureRecord {
    pub root_fund_id: String,
    pub final_asset_id: String,
    /// Sum of weight products over all distinct contributing paths.
    pub effective_weight: f64,
    /// Maximum depth among the contributing paths.
    pub path_depth: u32,
}

// ---------------------------------------------------------------------------
// Trace paths (diagnostic)
// ---------------------------------------------------------------------------

/// One hop in a diagnostic trace path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    pub from_id: String,
    pub to_id: String,
    pub kind: EdgeKind,
    pub edge_weight: f64,
    /// Running product of edge weights from the root through this step.
    pub cumulative_weight: f64,
}

/// A single root→target path found by the breadth-first path finder.
///
/// The trivial path (root equals target) has no steps and cumulative
/// weight 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TracePath {
    pub steps: Vec<TraceStep>,
    pub cumulative_weight: f64,
}

impl TracePath {
    /// Path depth in hops.
    pub fn depth(&self) -> u32 {
        self.steps.len() as u32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
