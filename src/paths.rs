//! Project path functions - single source of truth for all file paths.
//!
//! ## Environment Variables
//!
//! - `DATA_DIR`: Override the base data directory (default: "data")
//!
//! This allows keeping several isolated player profiles side by side:
//! ```bash
//! DATA_DIR=data/alice cargo run -- classic easy
//! DATA_DIR=data/bob cargo run -- compare hard
//! ```

use std::env;
use std::sync::OnceLock;

/// Lazily initialized data directory from DATA_DIR env var
static DATA_DIR_VALUE: OnceLock<String> = OnceLock::new();

/// Get the base data directory (from DATA_DIR env var or default "data")
pub fn data_dir() -> &'static str {
    DATA_DIR_VALUE.get_or_init(|| env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()))
}

/// SQLite database holding the player's progress and mastery records
pub fn db_path() -> String {
    format!("{}/progress.db", data_dir())
}

/// Default location of an externally supplied catalog file
pub fn catalog_path() -> String {
    format!("{}/catalog.json", data_dir())
}

#[cfg(test)]
mod tests {
    use super::*;

    // OnceLock initializes once, so only the default layout is checked here.

    #[test]
    fn test_data_dir_default() {
        let dir = data_dir();
        assert!(!dir.is_empty());
    }

    #[test]
    fn test_db_path_format() {
        assert!(db_path().ends_with("/progress.db"));
    }

    #[test]
    fn test_catalog_path_format() {
        assert!(catalog_path().ends_with("/catalog.json"));
    }
}
