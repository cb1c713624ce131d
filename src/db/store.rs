//! SQLite access layer for staging reads and mart writes.
//!
//! Uses `rusqlite` with `prepare_cached` for automatic statement caching:
//! the first call compiles a statement, subsequent calls reuse it from the
//! connection's internal cache. All partition writes are delete-then-insert
//! inside a single transaction, so readers either see the old partition or
//! the new one, never a mix.

use rusqlite::{params, Connection};

use crate::db::schema::initialize_database;
use crate::error::{FundTraceError, Result};
use crate::types::{AssetType, ExposureRecord, FundLink, Holding};

// ---------------------------------------------------------------------------
// SQL constants
// ---------------------------------------------------------------------------

// COALESCE keeps the row mappers total: staging rows arrive from external
// loaders and may carry NULLs in any column except as_of_date.
const SELECT_HOLDINGS_SQL: &str = "\
SELECT COALESCE(fund_id, ''), COALESCE(asset_id, ''), COALESCE(asset_type, ''), COALESCE(weight, 0.0)
FROM stg_holdings WHERE as_of_date = ?1 ORDER BY rowid";

const SELECT_LINKS_SQL: &str = "\
SELECT COALESCE(feeder_fund_id, ''), COALESCE(master_fund_id, ''), confidence
FROM stg_fund_links WHERE as_of_date = ?1 ORDER BY rowid";

const DELETE_HOLDINGS_PARTITION_SQL: &str = "DELETE FROM stg_holdings WHERE as_of_date = ?1";
const DELETE_LINKS_PARTITION_SQL: &str = "DELETE FROM stg_fund_links WHERE as_of_date = ?1";
const DELETE_EXPOSURE_PARTITION_SQL: &str = "DELETE FROM mart_true_exposure WHERE as_of_date = ?1";

const INSERT_HOLDING_SQL: &str = "\
INSERT INTO stg_holdings (fund_id, asset_id, asset_type, weight, as_of_date)
VALUES (?1, ?2, ?3, ?4, ?5)";

const INSERT_LINK_SQL: &str = "\
INSERT INTO stg_fund_links (feeder_fund_id, master_fund_id, confidence, as_of_date)
VALUES (?1, ?2, ?3, ?4)";

const INSERT_EXPOSURE_SQL: &str = "\
INSERT INTO mart_true_exposure (root_fund_id, final_asset_id, effective_weight, path_depth, as_of_date)
VALUES (?1, ?2, ?3, ?4, ?5)";

const SELECT_EXPOSURE_SQL: &str = "\
SELECT root_fund_id, final_asset_id, effective_weight, path_depth
FROM mart_true_exposure WHERE as_of_date = ?1
ORDER BY root_fund_id ASC, effective_weight DESC, final_asset_id ASC";

const SELECT_EXPOSURE_FOR_ROOT_SQL: &str = "\
SELECT root_fund_id, final_asset_id, effective_weight, path_depth
FROM mart_true_exposure WHERE as_of_date = ?1 AND root_fund_id = ?2
ORDER BY effective_weight DESC, final_asset_id ASC
LIMIT ?3";

// ---------------------------------------------------------------------------
// MartStore
// ---------------------------------------------------------------------------

/// Typed wrapper around the fundtrace SQLite database.
///
/// Reads the staging tables (`stg_holdings`, `stg_fund_links`) and owns the
/// mart table (`mart_true_exposure`). The connection is public so callers
/// can run ad-hoc queries in tests.
pub struct MartStore {
    pub conn: Connection,
}

impl std::fmt::Debug for MartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MartStore").finish_non_exhaustive()
    }
}

impl MartStore {
    /// Open (or create) the database at `db_path` with the full schema applied.
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = initialize_database(db_path)?;
        Ok(Self { conn })
    }

    /// Wrap an already-initialized connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    // -------------------------------------------------------------------
    // Input validation
    // -------------------------------------------------------------------

    /// Check that `table` has every column in `required`.
    ///
    /// A table that does not exist reports all required columns as missing.
    ///
    /// # Errors
    ///
    /// Returns [`FundTraceError::MissingColumns`] naming the absent columns.
    pub fn require_columns(&self, table: &str, required: &[&str]) -> Result<()> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let present = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        let missing: Vec<String> = required
            .iter()
            .filter(|col| !present.iter().any(|p| p == *col))
            .map(|col| (*col).to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(FundTraceError::MissingColumns {
                table: table.to_string(),
                columns: missing,
            })
        }
    }

    // -------------------------------------------------------------------
    // Staging reads
    // -------------------------------------------------------------------

    /// Load every holding row for `as_of_date`, in insertion order.
    ///
    /// Unknown or NULL asset types map to [`AssetType::Other`]; NULL weights
    /// map to `0.0`. Filtering of blank ids and non-positive weights is the
    /// edge-map builder's job, not the loader's.
    pub fn load_holdings(&self, as_of_date: &str) -> Result<Vec<Holding>> {
        let mut stmt = self.conn.prepare_cached(SELECT_HOLDINGS_SQL)?;
        let rows = stmt.query_map(params![as_of_date], |row| {
            Ok(Holding {
                fund_id: row.get(0)?,
                asset_id: row.get(1)?,
                asset_type: AssetType::parse_lossy(&row.get::<_, String>(2)?),
                weight: row.get(3)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Load every feeder-to-master link row for `as_of_date`, in insertion
    /// order. NULL confidence values come back as `None`.
    pub fn load_links(&self, as_of_date: &str) -> Result<Vec<FundLink>> {
        let mut stmt = self.conn.prepare_cached(SELECT_LINKS_SQL)?;
        let rows = stmt.query_map(params![as_of_date], |row| {
            Ok(FundLink {
                feeder_fund_id: row.get(0)?,
                master_fund_id: row.get(1)?,
                confidence: row.get(2)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    // -------------------------------------------------------------------
    // Partition writes
    // -------------------------------------------------------------------

    /// Atomically replace the `stg_holdings` partition for `as_of_date`.
    pub fn replace_holdings_partition(
        &self,
        as_of_date: &str,
        rows: &[Holding],
    ) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut del = tx.prepare_cached(DELETE_HOLDINGS_PARTITION_SQL)?;
            del.execute(params![as_of_date])?;

            let mut ins = tx.prepare_cached(INSERT_HOLDING_SQL)?;
            for h in rows {
                ins.execute(params![
                    h.fund_id,
                    h.asset_id,
                    h.asset_type.as_str(),
                    h.weight,
                    as_of_date,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Atomically replace the `stg_fund_links` partition for `as_of_date`.
    pub fn replace_links_partition(&self, as_of_date: &str, rows: &[FundLink]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut del = tx.prepare_cached(DELETE_LINKS_PARTITION_SQL)?;
            del.execute(params![as_of_date])?;

            let mut ins = tx.prepare_cached(INSERT_LINK_SQL)?;
            for l in rows {
                ins.execute(params![
                    l.feeder_fund_id,
                    l.master_fund_id,
                    l.confidence,
                    as_of_date,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Atomically replace the `mart_true_exposure` partition for `as_of_date`.
    ///
    /// Deletes the existing partition, then inserts `rows` tagged with
    /// `as_of_date`, all inside one transaction. An empty `rows` slice still
    /// clears the partition and returns `Ok(0)`. If any insert fails (for
    /// example a CHECK violation), the transaction rolls back and the prior
    /// partition stays intact.
    pub fn replace_exposure_partition(
        &self,
        as_of_date: &str,
        rows: &[ExposureRecord],
    ) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut del = tx.prepare_cached(DELETE_EXPOSURE_PARTITION_SQL)?;
            del.execute(params![as_of_date])?;

            let mut ins = tx.prepare_cached(INSERT_EXPOSURE_SQL)?;
            for rec in rows {
                ins.execute(params![
                    rec.root_fund_id,
                    rec.final_asset_id,
                    rec.effective_weight,
                    rec.path_depth,
                    as_of_date,
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    // -------------------------------------------------------------------
    // Mart reads
    // -------------------------------------------------------------------

    /// Read the full exposure partition for `as_of_date`, ordered by root
    /// ascending, effective weight descending, terminal id ascending.
    pub fn exposure_partition(&self, as_of_date: &str) -> Result<Vec<ExposureRecord>> {
        let mut stmt = self.conn.prepare_cached(SELECT_EXPOSURE_SQL)?;
        let rows = stmt.query_map(params![as_of_date], row_to_exposure)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Read up to `limit` exposure rows for one root, heaviest first.
    pub fn exposure_for_root(
        &self,
        as_of_date: &str,
        root_fund_id: &str,
        limit: usize,
    ) -> Result<Vec<ExposureRecord>> {
        let mut stmt = self.conn.prepare_cached(SELECT_EXPOSURE_FOR_ROOT_SQL)?;
        let rows = stmt.query_map(params![as_of_date, root_fund_id, limit as i64], row_to_exposure)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    // -------------------------------------------------------------------
    // Row counts
    // -------------------------------------------------------------------

    /// Count holding rows in the `as_of_date` staging partition.
    pub fn count_holdings(&self, as_of_date: &str) -> Result<usize> {
        self.count_partition("stg_holdings", as_of_date)
    }

    /// Count link rows in the `as_of_date` staging partition.
    pub fn count_links(&self, as_of_date: &str) -> Result<usize> {
        self.count_partition("stg_fund_links", as_of_date)
    }

    /// Count exposure rows in the `as_of_date` mart partition.
    pub fn count_exposure(&self, as_of_date: &str) -> Result<usize> {
        self.count_partition("mart_true_exposure", as_of_date)
    }

    fn count_partition(&self, table: &str, as_of_date: &str) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("SELECT count(*) FROM {table} WHERE as_of_date = ?1"))?;
        let count: i64 = stmt.query_row(params![as_of_date], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn row_to_exposure(row: &rusqlite::Row<'_>) -> rusqlite::Result<ExposureRecord> {
    Ok(ExposureRecord {
        root_fund_id: row.get(0)?,
        final_asset_id: row.get(1)?,
        effective_weight: row.get(2)?,
        path_depth: row.get(3)?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
