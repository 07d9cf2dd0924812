//! Scalar SQL functions registered on every pooled connection.
//!
//! SQLite's built-in `LIKE` only folds ASCII letters, so course and article
//! titles written in Cyrillic would not match case-insensitively. The
//! `icontains(haystack, needle)` function folds both sides with Unicode rules.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Name of the case-insensitive substring function.
pub const ICONTAINS: &str = "icontains";

/// Register the custom functions on a connection.
pub fn register(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        ICONTAINS,
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let haystack = ctx.get::<Option<String>>(0)?;
            let needle = ctx.get::<Option<String>>(1)?;

            Ok(match (haystack, needle) {
                (Some(haystack), Some(needle)) => contains_ignore_case(&haystack, &needle),
                _ => false,
            })
        },
    )
}

/// Unicode-aware, case-insensitive substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
