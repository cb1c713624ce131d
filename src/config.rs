//! Run settings: database location, snapshot date, and depth defaults.
//!
//! Resolution order for the database path is CLI flag, then the
//! `FUNDTRACE_DB` environment variable, then `fundtrace.db` in the working
//! directory.

use chrono::{Local, NaiveDate};

use crate::error::{FundTraceError, Result};

/// Environment variable overriding the database path.
pub const DB_ENV_VAR: &str = "FUNDTRACE_DB";

/// Default SQLite file when neither flag nor environment is set.
pub const DEFAULT_DB_PATH: &str = "fundtrace.db";

/// Default traversal depth bound.
pub const DEFAULT_MAX_DEPTH: u32 = 6;

/// Resolve the database path from the CLI flag and environment.
pub fn resolve_db_path(flag: Option<&str>) -> String {
    resolve_db_path_from(flag, std::env::var(DB_ENV_VAR).ok())
}

fn resolve_db_path_from(flag: Option<&str>, env_value: Option<String>) -> String {
    if let Some(path) = flag {
        return path.to_string();
    }
    match env_value {
        Some(path) if !path.trim().is_empty() => path,
        _ => DEFAULT_DB_PATH.to_string(),
    }
}

/// Resolve the snapshot date: an explicit `YYYY-MM-DD` argument, or today.
pub fn resolve_as_of_date(flag: Option<&str>) -> Result<NaiveDate> {
    match flag {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
            FundTraceError::InvalidDate {
                input: s.to_string(),
            }
        }),
        None => Ok(Local::now().date_naive()),
    }
}

/// Coerce a requested depth to the contract's positive bound: `max(1, n)`.
pub fn clamp_max_depth(requested: i32) -> u32 {
    requested.max(1) as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    // -- db path ------------------------------------------------------------

    #[test]
    fn flag_wins_over_environment() {
        let path = resolve_db_path_from(Some("/tmp/custom.db"), Some("/tmp/env.db".to_string()));
        assert_eq!(path, "/tmp/custom.db");
    }

    #[test]
    fn environment_wins_over_default() {
        let path = resolve_db_path_from(None, Some("/tmp/env.db".to_string()));
        assert_eq!(path, "/tmp/env.db");
    }

    #[test]
    fn blank_environment_falls_through_to_default() {
        assert_eq!(resolve_db_path_from(None, Some("  ".to_string())), DEFAULT_DB_PATH);
        assert_eq!(resolve_db_path_from(None, None), DEFAULT_DB_PATH);
    }

    // -- as-of date ---------------------------------------------------------

    #[test]
    fn explicit_date_parses() {
        let date = resolve_as_of_date(Some("2026-02-14")).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 2, 14).unwrap());
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let date = resolve_as_of_date(Some(" 2026-02-14 ")).unwrap();
        assert_eq!(date.to_string(), "2026-02-14");
    }

    #[test_case("2026/02/14" ; "slashes")]
    #[test_case("14-02-2026" ; "day_first")]
    #[test_case("not-a-date" ; "garbage")]
    #[test_case("" ; "empty")]
    fn malformed_date_is_rejected(input: &str) {
        let err = resolve_as_of_date(Some(input)).unwrap_err();
        assert!(err.to_string().contains("invalid as-of date"));
    }

    #[test]
    fn missing_date_defaults_to_today() {
        let date = resolve_as_of_date(None).unwrap();
        assert_eq!(date, Local::now().date_naive());
    }

    // -- depth clamp --------------------------------------------------------

    #[test_case(6, 6 ; "default_passes_through")]
    #[test_case(1, 1 ; "one_passes_through")]
    #[test_case(0, 1 ; "zero_coerced")]
    #[test_case(-5, 1 ; "negative_coerced")]
    #[test_case(100, 100 ; "large_passes_through")]
    fn clamp_max_depth_floors_at_one(requested: i32, expected: u32) {
        assert_eq!(clamp_max_depth(requested), expected);
    }
}
