use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    r#"
    CREATE TABLE IF NOT EXISTS player_stats (
      key TEXT PRIMARY KEY,
      value INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS unlocked_items (
      item_id TEXT PRIMARY KEY,
      unlocked_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS mastery (
      item_id TEXT PRIMARY KEY,
      attempts INTEGER NOT NULL DEFAULT 0,
      correct INTEGER NOT NULL DEFAULT 0,
      correct_streak INTEGER NOT NULL DEFAULT 0,
      last_seen TEXT NOT NULL,
      next_review TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS mode_stats (
      mode TEXT PRIMARY KEY,
      games_played INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS achievement_progress (
      achievement_id TEXT PRIMARY KEY,
      unlocked_tier TEXT,
      progress INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS achievement_unlocks (
      achievement_id TEXT NOT NULL,
      tier TEXT NOT NULL,
      unlocked_at TEXT NOT NULL,
      PRIMARY KEY (achievement_id, tier)
    );

    CREATE INDEX IF NOT EXISTS idx_mastery_next_review ON mastery(next_review);
    "#,
  )?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
      .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
      .unwrap();
    stmt
      .query_map([], |row| row.get(0))
      .unwrap()
      .collect::<Result<Vec<String>>>()
      .unwrap()
  }

  #[test]
  fn test_creates_all_tables() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    assert_eq!(
      table_names(&conn),
      vec![
        "achievement_progress",
        "achievement_unlocks",
        "mastery",
        "mode_stats",
        "player_stats",
        "unlocked_items",
      ]
    );
  }

  #[test]
  fn test_migrations_are_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();
  }
}
