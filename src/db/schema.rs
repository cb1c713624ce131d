//! SQLite schema initialization for the staging and mart tables.
//!
//! The staging tables are written by the upstream normalization step (or the
//! bundled seeder) and only read here; the mart table is owned by this crate
//! and carries CHECK constraints for the exposure invariants.

use rusqlite::Connection;

// ---------------------------------------------------------------------------
// DDL constants — kept as separate strings so each statement can be executed
// individually and failures name the statement that broke.
// ---------------------------------------------------------------------------

// Staging columns are nullable on purpose: rows arrive from an external
// loader and the partition readers normalize NULLs instead of rejecting them.
const CREATE_STG_HOLDINGS: &str = "\
CREATE TABLE IF NOT EXISTS stg_holdings (
  fund_id TEXT,
  asset_id TEXT,
  asset_type TEXT,
  weight REAL,
  as_of_date TEXT NOT NULL
)";

const CREATE_STG_FUND_LINKS: &str = "\
CREATE TABLE IF NOT EXISTS stg_fund_links (
  feeder_fund_id TEXT,
  master_fund_id TEXT,
  confidence REAL,
  as_of_date TEXT NOT NULL
)";

const CREATE_MART_TRUE_EXPOSURE: &str = "\
CREATE TABLE IF NOT EXISTS mart_true_exposure (
  root_fund_id TEXT NOT NULL,
  final_asset_id TEXT NOT NULL,
  effective_weight REAL NOT NULL CHECK (effective_weight >= 0),
  path_depth INTEGER NOT NULL CHECK (path_depth >= 1),
  as_of_date TEXT NOT NULL
)";

// Indexes ----------------------------------------------------------------

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_stg_holdings_date ON stg_holdings(as_of_date)",
    "CREATE INDEX IF NOT EXISTS idx_stg_fund_links_date ON stg_fund_links(as_of_date)",
    "CREATE INDEX IF NOT EXISTS idx_mart_exposure_date ON mart_true_exposure(as_of_date)",
    "CREATE INDEX IF NOT EXISTS idx_mart_exposure_root ON mart_true_exposure(as_of_date, root_fund_id)",
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Open (or create) the SQLite database at `db_path` and apply the full
/// fundtrace schema.
///
/// The returned connection has WAL mode and synchronous NORMAL already
/// configured. Safe to call on an existing database; every statement is
/// `IF NOT EXISTS`.
///
/// # Errors
///
/// Returns a `rusqlite::Error` if the database cannot be opened or any DDL
/// statement fails.
pub fn initialize_database(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;

    // -- Pragmas ----------------------------------------------------------
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    // -- Tables -----------------------------------------------------------
    conn.execute_batch(CREATE_STG_HOLDINGS)?;
    conn.execute_batch(CREATE_STG_FUND_LINKS)?;
    conn.execute_batch(CREATE_MART_TRUE_EXPOSURE)?;

    // -- Indexes ----------------------------------------------------------
    for ddl in CREATE_INDEXES {
        conn.execute_batch(ddl)?;
    }

    Ok(conn)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
