//! Player progress storage.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Result, params};
use std::collections::HashMap;

use crate::domain::{GameMode, MasteryMap, MasteryRecord};
use crate::progress::{AchievementProgress, AchievementTier, PlayerProgress};

const STAT_COINS: &str = "coins";
const STAT_GAMES_PLAYED: &str = "games_played";
const STAT_TOTAL_CORRECT: &str = "total_correct_answers";
const STAT_TOTAL_QUESTIONS: &str = "total_questions_answered";
const STAT_BEST_STREAK: &str = "best_streak";
const STAT_HIGHEST_TIMED_SCORE: &str = "highest_timed_score";
const STAT_PERFECT_GAMES: &str = "perfect_games";

fn parse_timestamp(s: &str) -> DateTime<Utc> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Write the whole progress snapshot in one transaction.
///
/// Unlocked items are only ever added, so existing unlock times are kept.
pub fn save_progress(conn: &Connection, progress: &PlayerProgress, now: DateTime<Utc>) -> Result<()> {
  let tx = conn.unchecked_transaction()?;

  let stats = [
    (STAT_COINS, progress.coins),
    (STAT_GAMES_PLAYED, progress.games_played),
    (STAT_TOTAL_CORRECT, progress.total_correct_answers),
    (STAT_TOTAL_QUESTIONS, progress.total_questions_answered),
    (STAT_BEST_STREAK, progress.best_streak),
    (STAT_HIGHEST_TIMED_SCORE, progress.highest_timed_score),
    (STAT_PERFECT_GAMES, progress.perfect_games),
  ];
  for (key, value) in stats {
    tx.execute(
      "INSERT OR REPLACE INTO player_stats (key, value) VALUES (?1, ?2)",
      params![key, value],
    )?;
  }

  let now_str = now.to_rfc3339();
  for item_id in &progress.unlocked_item_ids {
    tx.execute(
      "INSERT OR IGNORE INTO unlocked_items (item_id, unlocked_at) VALUES (?1, ?2)",
      params![item_id, now_str],
    )?;
  }

  for (item_id, record) in &progress.mastery {
    upsert_mastery(&tx, item_id, record)?;
  }

  for (mode, games) in &progress.games_by_mode {
    tx.execute(
      "INSERT OR REPLACE INTO mode_stats (mode, games_played) VALUES (?1, ?2)",
      params![mode.as_str(), games],
    )?;
  }

  for (achievement_id, entry) in &progress.achievements {
    tx.execute(
      "INSERT OR REPLACE INTO achievement_progress (achievement_id, unlocked_tier, progress) VALUES (?1, ?2, ?3)",
      params![achievement_id, entry.unlocked_tier.map(|t| t.as_str()), entry.progress],
    )?;
    for (tier, unlocked_at) in &entry.unlocked_at {
      tx.execute(
        "INSERT OR IGNORE INTO achievement_unlocks (achievement_id, tier, unlocked_at) VALUES (?1, ?2, ?3)",
        params![achievement_id, tier.as_str(), unlocked_at.to_rfc3339()],
      )?;
    }
  }

  tx.commit()
}

/// Load the stored snapshot, or `None` if nothing was ever saved
pub fn load_progress(conn: &Connection) -> Result<Option<PlayerProgress>> {
  let stats = load_stats(conn)?;
  let Some(coins) = stats.get(STAT_COINS).copied() else {
    return Ok(None);
  };
  let stat = |key: &str| stats.get(key).copied().unwrap_or(0);

  let mut progress = PlayerProgress {
    coins,
    games_played: stat(STAT_GAMES_PLAYED),
    total_correct_answers: stat(STAT_TOTAL_CORRECT),
    total_questions_answered: stat(STAT_TOTAL_QUESTIONS),
    best_streak: stat(STAT_BEST_STREAK),
    highest_timed_score: stat(STAT_HIGHEST_TIMED_SCORE),
    perfect_games: stat(STAT_PERFECT_GAMES),
    mastery: load_mastery_map(conn)?,
    ..PlayerProgress::default()
  };

  let mut stmt = conn.prepare("SELECT item_id FROM unlocked_items")?;
  progress.unlocked_item_ids = stmt
    .query_map([], |row| row.get(0))?
    .collect::<Result<_>>()?;

  let mut stmt = conn.prepare("SELECT mode, games_played FROM mode_stats")?;
  let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?;
  for row in rows {
    let (mode, games) = row?;
    match GameMode::from_str(&mode) {
      Some(mode) => {
        progress.games_by_mode.insert(mode, games);
      }
      None => tracing::warn!("Skipping stats for unknown game mode {}", mode),
    }
  }

  let mut stmt = conn.prepare("SELECT achievement_id, unlocked_tier, progress FROM achievement_progress")?;
  let rows = stmt.query_map([], |row| {
    Ok((
      row.get::<_, String>(0)?,
      row.get::<_, Option<String>>(1)?,
      row.get::<_, u32>(2)?,
    ))
  })?;
  for row in rows {
    let (id, tier, value) = row?;
    progress.achievements.insert(
      id,
      AchievementProgress {
        unlocked_tier: tier.as_deref().and_then(AchievementTier::from_str),
        progress: value,
        ..AchievementProgress::default()
      },
    );
  }

  let mut stmt = conn.prepare("SELECT achievement_id, tier, unlocked_at FROM achievement_unlocks")?;
  let rows = stmt.query_map([], |row| {
    Ok((
      row.get::<_, String>(0)?,
      row.get::<_, String>(1)?,
      row.get::<_, String>(2)?,
    ))
  })?;
  for row in rows {
    let (id, tier, unlocked_at) = row?;
    if let (Some(entry), Some(tier)) = (progress.achievements.get_mut(&id), AchievementTier::from_str(&tier)) {
      entry.unlocked_at.insert(tier, parse_timestamp(&unlocked_at));
    }
  }

  Ok(Some(progress))
}

fn load_stats(conn: &Connection) -> Result<HashMap<String, u32>> {
  let mut stmt = conn.prepare("SELECT key, value FROM player_stats")?;
  let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))?;
  rows.collect()
}

fn upsert_mastery(conn: &Connection, item_id: &str, record: &MasteryRecord) -> Result<()> {
  conn.execute(
    r#"
    INSERT INTO mastery (item_id, attempts, correct, correct_streak, last_seen, next_review)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(item_id) DO UPDATE SET
      attempts = excluded.attempts,
      correct = excluded.correct,
      correct_streak = excluded.correct_streak,
      last_seen = excluded.last_seen,
      next_review = excluded.next_review
    "#,
    params![
      item_id,
      record.attempts,
      record.correct,
      record.correct_streak,
      record.last_seen.to_rfc3339(),
      record.next_review.to_rfc3339(),
    ],
  )?;
  Ok(())
}

/// Persist one item's record right after an answer
pub fn save_mastery_record(conn: &Connection, item_id: &str, record: &MasteryRecord) -> Result<()> {
  upsert_mastery(conn, item_id, record)
}

pub fn load_mastery_map(conn: &Connection) -> Result<MasteryMap> {
  let mut stmt =
    conn.prepare("SELECT attempts, correct, correct_streak, last_seen, next_review, item_id FROM mastery")?;
  let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(5)?, row_to_record(row)?)))?;
  rows.collect()
}

/// Reads the record from the first five selected columns
fn row_to_record(row: &rusqlite::Row) -> Result<MasteryRecord> {
  Ok(MasteryRecord {
    attempts: row.get(0)?,
    correct: row.get(1)?,
    correct_streak: row.get(2)?,
    last_seen: parse_timestamp(&row.get::<_, String>(3)?),
    next_review: parse_timestamp(&row.get::<_, String>(4)?),
  })
}
