use chrono::{DateTime, Duration, Utc};

use crate::config;
use crate::domain::{MasteryMap, MasteryRecord};

/// Review offset for a correct streak. Streaks past the end of the
/// ladder stay on the last rung.
pub fn review_interval(correct_streak: u32) -> Duration {
  let max_index = config::REVIEW_INTERVAL_DAYS.len() - 1;
  let index = (correct_streak as usize).min(max_index);
  Duration::days(config::REVIEW_INTERVAL_DAYS[index])
}

/// Apply one attempt to a record. A fresh `MasteryRecord::default()` is the
/// baseline for an item's first attempt.
pub fn apply_attempt(record: &MasteryRecord, was_correct: bool, now: DateTime<Utc>) -> MasteryRecord {
  let mut next = record.clone();
  next.attempts += 1;
  next.last_seen = now;

  if was_correct {
    next.correct += 1;
    next.correct_streak += 1;
    next.next_review = now + review_interval(next.correct_streak);
  } else {
    next.correct_streak = 0;
    next.next_review = now + Duration::minutes(config::RETRY_WINDOW_MINUTES);
  }

  next
}

/// Record an attempt and return the updated copy of the map.
///
/// The input map is left untouched so round generation can keep reading
/// the snapshot it was handed.
pub fn record_attempt(
  records: &MasteryMap,
  item_id: &str,
  was_correct: bool,
  now: DateTime<Utc>,
) -> MasteryMap {
  let current = records.get(item_id).cloned().unwrap_or_default();
  let updated = apply_attempt(&current, was_correct, now);

  tracing::debug!(
    "Recorded {} attempt for {}: streak {}, next review {}",
    if was_correct { "correct" } else { "incorrect" },
    item_id,
    updated.correct_streak,
    updated.next_review
  );

  let mut next = records.clone();
  next.insert(item_id.to_string(), updated);
  next
}
