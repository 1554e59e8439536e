//! Random rounds: a surprise Classic, Timed or Map round at a chosen difficulty.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::config;
use crate::domain::{Category, Difficulty, GameMode, Region, RegionFilter, RoundFilter, RoundOptions};

use super::session::RoundSession;

const RANDOM_MODES: [GameMode; 3] = [GameMode::Classic, GameMode::Timed, GameMode::Map];

/// Roll the settings for a random round.
///
/// Picks the mode, category, region (or all regions) and either a clock
/// length or a question count, keeping the player's difficulty.
pub fn pick_random_round<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> RoundOptions {
  let mode = RANDOM_MODES[rng.random_range(0..RANDOM_MODES.len())];
  let category = Category::ALL[rng.random_range(0..Category::ALL.len())];

  // All regions counts as one more choice alongside each single region
  let region_pick = rng.random_range(0..=Region::ALL.len());
  let region = match Region::ALL.get(region_pick) {
    Some(r) => RegionFilter::Only(*r),
    None => RegionFilter::All,
  };

  let filter = RoundFilter::new(category, region, difficulty);

  match mode {
    GameMode::Timed => RoundOptions::Timed {
      filter,
      duration_secs: *config::RANDOM_DURATIONS_SECS.choose(rng).unwrap_or(&60),
    },
    GameMode::Map => RoundOptions::Map {
      filter,
      num_questions: *config::RANDOM_QUESTION_COUNTS.choose(rng).unwrap_or(&10),
    },
    _ => RoundOptions::Classic {
      filter,
      num_questions: *config::RANDOM_QUESTION_COUNTS.choose(rng).unwrap_or(&10),
    },
  }
}

/// Start a random round whose results are reported as `GameMode::Random`
pub fn start_random_round<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> RoundSession {
  let options = pick_random_round(difficulty, rng);
  tracing::info!(
    "Random round rolled {} over {}",
    options.mode().as_str(),
    options.filter().region
  );
  RoundSession::new(options).reported_as(GameMode::Random)
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;
  use rand::rngs::StdRng;
  use std::collections::HashSet;

  #[test]
  fn test_random_round_keeps_difficulty() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
      let options = pick_random_round(Difficulty::Medium, &mut rng);
      assert_eq!(options.difficulty(), Difficulty::Medium);
    }
  }

  #[test]
  fn test_random_round_only_plays_classic_timed_or_map() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut modes = HashSet::new();
    for _ in 0..300 {
      let options = pick_random_round(Difficulty::Easy, &mut rng);
      modes.insert(options.mode());
      match options {
        RoundOptions::Timed { duration_secs, .. } => {
          assert!(config::RANDOM_DURATIONS_SECS.contains(&duration_secs));
        }
        RoundOptions::Classic { num_questions, .. } | RoundOptions::Map { num_questions, .. } => {
          assert!(config::RANDOM_QUESTION_COUNTS.contains(&num_questions));
        }
        other => panic!("unexpected random round {:?}", other),
      }
    }
    let expected: HashSet<GameMode> = RANDOM_MODES.into_iter().collect();
    assert_eq!(modes, expected);
  }

  #[test]
  fn test_random_round_covers_all_regions_option() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut saw_all = false;
    let mut regions = HashSet::new();
    for _ in 0..500 {
      match pick_random_round(Difficulty::Hard, &mut rng).filter().region {
        RegionFilter::All => saw_all = true,
        RegionFilter::Only(r) => {
          regions.insert(r);
        }
      }
    }
    assert!(saw_all);
    assert_eq!(regions.len(), Region::ALL.len());
  }

  #[test]
  fn test_random_session_reports_random_mode() {
    let mut rng = StdRng::seed_from_u64(4);
    let session = start_random_round(Difficulty::Easy, &mut rng);
    assert_eq!(session.mode(), GameMode::Random);
    assert_ne!(session.options().mode(), GameMode::Random);
  }
}
