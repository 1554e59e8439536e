use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config;

/// Per-item attempt history for one player.
///
/// Created on the first attempt for an item and updated after every
/// following attempt. `correct <= attempts` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasteryRecord {
  pub attempts: u32,
  pub correct: u32,
  pub last_seen: DateTime<Utc>,
  pub correct_streak: u32,
  pub next_review: DateTime<Utc>,
}

impl Default for MasteryRecord {
  /// Zeroed baseline used for an item's first attempt
  fn default() -> Self {
    Self {
      attempts: 0,
      correct: 0,
      last_seen: DateTime::<Utc>::UNIX_EPOCH,
      correct_streak: 0,
      next_review: DateTime::<Utc>::UNIX_EPOCH,
    }
  }
}

impl MasteryRecord {
  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    now >= self.next_review
  }

  /// Fraction of correct attempts; unseen items report a neutral 0.5
  pub fn success_rate(&self) -> f64 {
    if self.attempts > 0 {
      self.correct as f64 / self.attempts as f64
    } else {
      config::NEUTRAL_SUCCESS_RATE
    }
  }

  pub fn is_unseen(&self) -> bool {
    self.attempts == 0
  }
}

/// Mastery records keyed by item id
pub type MasteryMap = HashMap<String, MasteryRecord>;

/// Due-ness for an item; items without a record are always due
pub fn is_due(records: &MasteryMap, item_id: &str, now: DateTime<Utc>) -> bool {
  records.get(item_id).is_none_or(|r| r.is_due(now))
}

/// Success rate for an item; items without a record report 0.5
pub fn success_rate(records: &MasteryMap, item_id: &str) -> f64 {
  records
    .get(item_id)
    .map_or(config::NEUTRAL_SUCCESS_RATE, MasteryRecord::success_rate)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn record(attempts: u32, correct: u32, next_review: DateTime<Utc>) -> MasteryRecord {
    MasteryRecord {
      attempts,
      correct,
      last_seen: next_review - Duration::days(1),
      correct_streak: 0,
      next_review,
    }
  }

  #[test]
  fn test_default_is_zeroed_and_due() {
    let r = MasteryRecord::default();
    assert_eq!(r.attempts, 0);
    assert_eq!(r.correct, 0);
    assert_eq!(r.correct_streak, 0);
    assert!(r.is_unseen());
    assert!(r.is_due(Utc::now()));
  }

  #[test]
  fn test_success_rate_unseen_is_neutral() {
    assert!((MasteryRecord::default().success_rate() - 0.5).abs() < f64::EPSILON);
  }

  #[test]
  fn test_success_rate_ratio() {
    let r = record(4, 3, Utc::now());
    assert!((r.success_rate() - 0.75).abs() < f64::EPSILON);
  }

  #[test]
  fn test_is_due_boundary_is_inclusive() {
    let now = Utc::now();
    assert!(record(1, 1, now).is_due(now));
    assert!(!record(1, 1, now + Duration::seconds(1)).is_due(now));
  }

  #[test]
  fn test_map_queries_for_missing_item() {
    let map = MasteryMap::new();
    assert!(is_due(&map, "missing", Utc::now()));
    assert!((success_rate(&map, "missing") - 0.5).abs() < f64::EPSILON);
  }

  #[test]
  fn test_serde_uses_camel_case_fields() {
    let r = record(2, 1, Utc::now());
    let json = serde_json::to_string(&r).unwrap();
    assert!(json.contains("\"correctStreak\""));
    assert!(json.contains("\"nextReview\""));
    assert!(json.contains("\"lastSeen\""));
  }
}
