//! Weighted target selection.
//!
//! This module picks the item a question asks about, favouring:
//! - Items the player has never seen
//! - Items that are due for review
//! - Items with a poor success rate
//! - Rare items, while damping the most common ones

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::config;
use crate::domain::{Item, MasteryMap, MasteryRecord, Tier};

/// An item's position in the pool with its calculated selection weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemWeight {
  pub index: usize,
  pub weight: f64,
}

/// Calculate the selection weight for an item from its mastery record
pub fn calculate_item_weight(item: &Item, record: Option<&MasteryRecord>, now: DateTime<Utc>) -> f64 {
  let base = match record {
    Some(r) if !r.is_unseen() => {
      let due_weight = if r.is_due(now) {
        config::DUE_BASE_WEIGHT
      } else {
        config::NOT_DUE_BASE_WEIGHT
      };
      due_weight + (1.0 - r.success_rate()) * config::FAILURE_RATE_WEIGHT
    }
    _ => config::UNSEEN_WEIGHT,
  };

  match item.tier {
    Tier::Rare => base * config::RARE_TIER_MULTIPLIER,
    Tier::Common => base * config::COMMON_TIER_MULTIPLIER,
    Tier::Uncommon => base,
  }
}

/// Calculate weights for every item in the pool, preserving pool order
pub fn calculate_all_weights(pool: &[&Item], records: &MasteryMap, now: DateTime<Utc>) -> Vec<ItemWeight> {
  pool
    .iter()
    .enumerate()
    .map(|(index, item)| ItemWeight {
      index,
      weight: calculate_item_weight(item, records.get(&item.id), now),
    })
    .collect()
}

/// Select a pool index using weighted random selection.
///
/// Draws uniformly in `[0, total)` and walks the cumulative weights in pool
/// order, returning the first entry whose cumulative weight exceeds the draw.
/// Equal weights therefore resolve by pool order for a given draw.
pub fn weighted_random_select<R: Rng + ?Sized>(weights: &[ItemWeight], rng: &mut R) -> Option<usize> {
  if weights.is_empty() {
    return None;
  }

  if weights.len() == 1 {
    return Some(weights[0].index);
  }

  let total_weight: f64 = weights.iter().map(|w| w.weight).sum();

  if !total_weight.is_finite() || total_weight <= 0.0 {
    // Degenerate weights: fall back to a uniform pick
    let pick = rng.random_range(0..weights.len());
    return Some(weights[pick].index);
  }

  let target = rng.random_range(0.0..total_weight);
  let mut cumulative = 0.0;

  for w in weights {
    cumulative += w.weight;
    if cumulative > target {
      return Some(w.index);
    }
  }

  // Floating point rounding can leave the draw just past the last bucket
  weights.last().map(|w| w.index)
}

/// Pick the target item for a question, or `None` for an empty pool
pub fn select_target<'a, R: Rng + ?Sized>(
  pool: &[&'a Item],
  records: &MasteryMap,
  now: DateTime<Utc>,
  rng: &mut R,
) -> Option<&'a Item> {
  let weights = calculate_all_weights(pool, records, now);
  weighted_random_select(&weights, rng).map(|index| pool[index])
}
