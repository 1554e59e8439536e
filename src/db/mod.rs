pub mod progress;
pub mod schema;

use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::content::Catalog;
use crate::progress::PlayerProgress;

pub use progress::*;
pub use schema::run_migrations;

pub type DbPool = Arc<Mutex<Connection>>;

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }
}

/// Error returned when database lock cannot be acquired
#[derive(Debug, thiserror::Error)]
#[error("Progress database unavailable")]
pub struct DbLockError;

/// Try to acquire the database lock, returning an error if poisoned
pub fn try_lock(pool: &DbPool) -> std::result::Result<MutexGuard<'_, Connection>, DbLockError> {
  pool.lock().map_err(|_: PoisonError<_>| {
    tracing::error!("Database mutex poisoned - a thread panicked while holding the lock");
    DbLockError
  })
}

pub fn init_db(path: &Path) -> Result<DbPool> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent).ok();
  }

  // Create backup before migrations if database exists
  if path.exists() {
    let backup_path = path.with_extension("db.backup");
    if let Err(e) = std::fs::copy(path, &backup_path) {
      tracing::warn!("Could not create database backup: {}", e);
    }
  }

  let conn = Connection::open(path)?;
  run_migrations(&conn)?;
  tracing::info!("Progress database ready at {}", path.display());
  Ok(Arc::new(Mutex::new(conn)))
}

/// Load the stored player, falling back to a new player when nothing was
/// saved yet or the store cannot be read.
pub fn load_progress_or_default(pool: &DbPool, catalog: &Catalog) -> PlayerProgress {
  let loaded = try_lock(pool)
    .log_warn("Could not lock progress database")
    .and_then(|conn| load_progress(&conn).log_warn("Could not load player progress"))
    .flatten();

  match loaded {
    Some(progress) => progress,
    None => {
      tracing::info!("Starting a new player");
      PlayerProgress::new_player(catalog)
    }
  }
}
