//! Test utilities for database setup and item fixtures.
//!
//! Reuses the authoritative schema initialization so tests never carry
//! their own copy of the tables.

use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

use crate::domain::{Category, Item, Region, Tier};

/// Test environment with a migrated progress database in a temporary
/// directory, cleaned up automatically when dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("progress.db"))?;
        crate::db::schema::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    /// Get the temporary directory path for creating test files.
    pub fn path(&self) -> &Path {
        self.temp.path()
    }
}

/// Build a catalog item. The country code is derived from the country name.
pub fn item(id: &str, category: Category, region: Region, tier: Tier, country_name: &str) -> Item {
    let country_code: String = country_name
        .chars()
        .filter(|c| c.is_alphabetic())
        .take(2)
        .collect::<String>()
        .to_uppercase();

    Item {
        id: id.to_string(),
        name: format!("{} {}", country_name, id),
        category,
        region,
        tier,
        country_code,
        country_name: country_name.to_string(),
        image_url: format!("images/{}.png", id),
    }
}

/// `count` uncommon coins from distinct countries in one region
pub fn coins(prefix: &str, region: Region, count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| {
            let mut coin = item(
                &format!("{}_{}", prefix, i),
                Category::Coin,
                region,
                Tier::Uncommon,
                &format!("{} Country {}", prefix, i),
            );
            coin.country_code = format!("{}{}", prefix.to_uppercase(), i);
            coin
        })
        .collect()
}
