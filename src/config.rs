//! Application configuration constants.
//!
//! This module centralizes all tuning values used by the quiz engine and
//! the runtime configuration lookups for the binary.

use serde::Deserialize;
use std::path::PathBuf;

use crate::paths;

// ==================== Runtime Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
    catalog: Option<CatalogConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogConfig {
    path: Option<String>,
}

fn read_config_file() -> Option<AppConfig> {
    let contents = std::fs::read_to_string("config.toml").ok()?;
    match toml::from_str::<AppConfig>(&contents) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Ignoring malformed config.toml: {}", e);
            None
        }
    }
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    let _ = dotenvy::dotenv();

    if let Some(path) = read_config_file()
        .and_then(|c| c.database)
        .and_then(|db| db.path)
    {
        tracing::info!("Using database from config.toml: {}", path);
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    let default = PathBuf::from(paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

/// Load an external catalog path with priority: config.toml > .env > data dir.
///
/// `None` means the built-in catalog should be used.
pub fn load_catalog_path() -> Option<PathBuf> {
    let _ = dotenvy::dotenv();

    if let Some(path) = read_config_file()
        .and_then(|c| c.catalog)
        .and_then(|cat| cat.path)
    {
        tracing::info!("Using catalog from config.toml: {}", path);
        return Some(PathBuf::from(path));
    }

    if let Ok(path) = std::env::var("CATALOG_PATH") {
        tracing::info!("Using catalog from CATALOG_PATH env: {}", path);
        return Some(PathBuf::from(path));
    }

    let fallback = PathBuf::from(paths::catalog_path());
    if fallback.exists() {
        tracing::info!("Using catalog from data dir: {}", fallback.display());
        return Some(fallback);
    }

    None
}

// ==================== Review Schedule ====================

/// Review ladder in days, indexed by the current correct streak.
/// Streaks beyond the end of the ladder stay on the last rung.
pub const REVIEW_INTERVAL_DAYS: [i64; 8] = [0, 1, 3, 7, 14, 30, 60, 120];

/// Forced retry window after an incorrect answer
pub const RETRY_WINDOW_MINUTES: i64 = 5;

/// Success rate reported for items that were never attempted
pub const NEUTRAL_SUCCESS_RATE: f64 = 0.5;

// ==================== Selection Weights ====================

/// Weight for items the player has never seen
pub const UNSEEN_WEIGHT: f64 = 100.0;

/// Base weight for seen items that are due for review
pub const DUE_BASE_WEIGHT: f64 = 50.0;

/// Base weight for seen items that are not yet due
pub const NOT_DUE_BASE_WEIGHT: f64 = 5.0;

/// Extra weight scaled by the failure rate (1 - success rate)
pub const FAILURE_RATE_WEIGHT: f64 = 50.0;

/// Multiplier for the rarest tier, keeps rare items appearing
pub const RARE_TIER_MULTIPLIER: f64 = 1.2;

/// Multiplier for the most common tier
pub const COMMON_TIER_MULTIPLIER: f64 = 0.8;

// ==================== Question Composition ====================

/// Number of distractor choices in multiple choice questions
pub const DISTRACTOR_COUNT: usize = 3;

// ==================== Round Flow ====================

/// How long answer feedback stays on screen before the round advances
pub const FEEDBACK_HOLD_MS: u64 = 1500;

/// Minimum fixed question count for a round to count as perfect
pub const PERFECT_GAME_MIN_QUESTIONS: u32 = 10;

/// Seconds added to the Time Attack clock for a correct answer
pub const TIME_ATTACK_BONUS_SECS: u32 = 2;

/// Seconds removed from the Time Attack clock for a wrong answer
pub const TIME_ATTACK_PENALTY_SECS: u32 = 10;

// ==================== Scoring ====================

/// Points for a correct answer (before bonus multiplier)
pub const BASE_POINTS: u32 = 10;

/// Points for a correct answer in map mode
pub const MAP_POINTS: u32 = 15;

/// Coins for a correct answer in choice modes
pub const BASE_COINS: u32 = 10;

/// Coins for a correct answer in map mode
pub const MAP_COINS: u32 = 15;

/// Coins for a correct answer in compare mode
pub const COMPARE_COINS: u32 = 12;

/// Streak that activates the 2x bonus, and how many rounds it lasts
pub const DOUBLE_BONUS_STREAK: u32 = 5;

/// Streak that activates the 3x bonus, and how many rounds it lasts
pub const TRIPLE_BONUS_STREAK: u32 = 10;

// ==================== Random Mode ====================

/// Clock lengths a random timed round can pick from
pub const RANDOM_DURATIONS_SECS: [u32; 4] = [30, 60, 90, 120];

/// Question counts a random fixed-length round can pick from
pub const RANDOM_QUESTION_COUNTS: [u32; 3] = [10, 15, 20];

// ==================== Player ====================

/// Coins granted to a new player
pub const INITIAL_COINS: u32 = 100;
