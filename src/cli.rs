//! CLI argument definitions and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{self, DEFAULT_MAX_DEPTH};
use crate::db::store::MartStore;
use crate::error::Result;
use crate::pipeline;
use crate::seed::seed_demo;

// ---------------------------------------------------------------------------
// Argument structs
// ---------------------------------------------------------------------------

/// fundtrace - true economic exposure for fund-of-funds structures
#[derive(Parser, Debug)]
#[command(name = "fundtrace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// SQLite database path. Falls back to FUNDTRACE_DB, then fundtrace.db.
    #[arg(long, global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the true exposure mart partition for one as-of date
    Build(BuildArgs),

    /// Show one ownership chain from a root fund to a target asset
    Trace(TraceArgs),

    /// Print exposure rows from the mart
    Show(ShowArgs),

    /// Load the bundled demo dataset into the staging tables
    Seed(SeedArgs),

    /// Compare a mart partition against a JSON expectation file
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// As-of date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub as_of_date: Option<String>,

    /// Maximum expansion depth; values below 1 are raised to 1.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH as i32)]
    pub max_depth: i32,
}

#[derive(Args, Debug)]
pub struct TraceArgs {
    /// Root fund id to start from
    #[arg(long)]
    pub root: String,

    /// Target asset or fund id to reach
    #[arg(long)]
    pub target: String,

    /// As-of date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub as_of_date: Option<String>,

    /// Maximum number of hops; values below 1 are raised to 1.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH as i32)]
    pub max_depth: i32,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Only show rows for this root fund id
    #[arg(long)]
    pub root: Option<String>,

    /// As-of date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub as_of_date: Option<String>,

    /// Maximum number of rows to print
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// As-of date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub as_of_date: Option<String>,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// JSON file with the expected exposure rows
    #[arg(long)]
    pub expected: PathBuf,

    /// As-of date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub as_of_date: Option<String>,

    /// Allowed absolute difference per effective weight
    #[arg(long, default_value_t = 1e-9)]
    pub tolerance: f64,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Execute the parsed command and return the process exit code.
///
/// Only `verify` uses a non-zero code for a completed run: discrepancies
/// exit with 1 so scripted checks can branch on the result. Everything
/// else exits 0 on success, including builds that wrote zero rows.
pub fn run(cli: Cli) -> Result<i32> {
    let db_path = config::resolve_db_path(cli.db.as_deref());
    let store = MartStore::new(&db_path)?;

    match cli.command {
        Commands::Build(args) => {
            let as_of_date = config::resolve_as_of_date(args.as_of_date.as_deref())?;
            let max_depth = config::clamp_max_depth(args.max_depth);
            let summary = pipeline::run_build(&store, as_of_date, max_depth)?;
            println!("build completed {summary}");
            Ok(0)
        }
        Commands::Trace(args) => {
            let as_of_date = config::resolve_as_of_date(args.as_of_date.as_deref())?;
            let max_depth = config::clamp_max_depth(args.max_depth);
            match pipeline::run_trace(&store, as_of_date, &args.root, &args.target, max_depth)? {
                Some(path) => {
                    if path.steps.is_empty() {
                        println!("root equals target: trivial path (depth=0, weight=1)");
                    }
                    for step in &path.steps {
                        println!(
                            "{} -> {} [{}] edge={:.6} cumulative={:.6}",
                            step.from_id,
                            step.to_id,
                            step.kind,
                            step.edge_weight,
                            step.cumulative_weight
                        );
                    }
                    println!(
                        "path depth={} cumulative_weight={:.6}",
                        path.depth(),
                        path.cumulative_weight
                    );
                }
                None => {
                    println!(
                        "no path from {} to {} within {} hops",
                        args.root.trim(),
                        args.target.trim(),
                        max_depth
                    );
                }
            }
            Ok(0)
        }
        Commands::Show(args) => {
            let as_of_date = config::resolve_as_of_date(args.as_of_date.as_deref())?;
            let date_key = as_of_date.format("%Y-%m-%d").to_string();

            let rows = match args.root.as_deref() {
                Some(root) => store.exposure_for_root(&date_key, root.trim(), args.limit)?,
                None => {
                    let mut all = store.exposure_partition(&date_key)?;
                    all.truncate(args.limit);
                    all
                }
            };

            if rows.is_empty() {
                println!("no exposure rows for {date_key}");
            } else {
                println!(
                    "{:<24} {:<24} {:>12} {:>6}",
                    "root_fund_id", "final_asset_id", "weight", "depth"
                );
                for r in &rows {
                    println!(
                        "{:<24} {:<24} {:>12.6} {:>6}",
                        r.root_fund_id, r.final_asset_id, r.effective_weight, r.path_depth
                    );
                }
            }
            Ok(0)
        }
        Commands::Seed(args) => {
            let as_of_date = config::resolve_as_of_date(args.as_of_date.as_deref())?;
            let date_key = as_of_date.format("%Y-%m-%d").to_string();
            let (holdings, links) = seed_demo(&store, &date_key)?;
            println!("seeded {holdings} holdings and {links} links for {date_key}");
            Ok(0)
        }
        Commands::Verify(args) => {
            let as_of_date = config::resolve_as_of_date(args.as_of_date.as_deref())?;
            let findings =
                pipeline::run_verify(&store, as_of_date, &args.expected, args.tolerance)?;
            if findings.is_empty() {
                println!("verify passed");
                Ok(0)
            } else {
                for finding in &findings {
                    eprintln!("{finding}");
                }
                eprintln!("verify failed with {} discrepancies", findings.len());
                Ok(1)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
