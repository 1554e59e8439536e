use serde::{Deserialize, Serialize};

use super::item::{Category, Difficulty, Item, Region};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameMode {
  Classic,
  Timed,
  Map,
  Random,
  Compare,
  TimeAttack,
}

impl GameMode {
  pub const ALL: [GameMode; 6] = [
    GameMode::Classic,
    GameMode::Timed,
    GameMode::Map,
    GameMode::Random,
    GameMode::Compare,
    GameMode::TimeAttack,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Classic => "classic",
      Self::Timed => "timed",
      Self::Map => "map",
      Self::Random => "random",
      Self::Compare => "compare",
      Self::TimeAttack => "time_attack",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s.to_lowercase().replace('-', "_").as_str() {
      "classic" => Some(Self::Classic),
      "timed" => Some(Self::Timed),
      "map" => Some(Self::Map),
      "random" => Some(Self::Random),
      "compare" => Some(Self::Compare),
      "time_attack" | "timeattack" => Some(Self::TimeAttack),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionFilter {
  All,
  Only(Region),
}

impl RegionFilter {
  pub fn matches(&self, region: Region) -> bool {
    match self {
      RegionFilter::All => true,
      RegionFilter::Only(r) => *r == region,
    }
  }
}

impl std::fmt::Display for RegionFilter {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RegionFilter::All => write!(f, "All Regions"),
      RegionFilter::Only(r) => write!(f, "{}", r),
    }
  }
}

/// Constraints narrowing the catalog for one round.
///
/// Compare rounds leave `category` unset and use `RegionFilter::All`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundFilter {
  pub category: Option<Category>,
  pub region: RegionFilter,
  pub difficulty: Difficulty,
}

impl RoundFilter {
  pub fn new(category: Category, region: RegionFilter, difficulty: Difficulty) -> Self {
    Self {
      category: Some(category),
      region,
      difficulty,
    }
  }

  /// Difficulty-only filter (compare rounds)
  pub fn difficulty_only(difficulty: Difficulty) -> Self {
    Self {
      category: None,
      region: RegionFilter::All,
      difficulty,
    }
  }

  pub fn matches(&self, item: &Item) -> bool {
    self.category.is_none_or(|c| c == item.category)
      && self.region.matches(item.region)
      && self.difficulty.allows(item.tier)
  }
}

/// Settings for one round, per game mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundOptions {
  Classic { filter: RoundFilter, num_questions: u32 },
  Timed { filter: RoundFilter, duration_secs: u32 },
  Map { filter: RoundFilter, num_questions: u32 },
  Compare { difficulty: Difficulty, num_questions: u32 },
  TimeAttack { difficulty: Difficulty, duration_secs: u32 },
}

impl RoundOptions {
  pub fn mode(&self) -> GameMode {
    match self {
      Self::Classic { .. } => GameMode::Classic,
      Self::Timed { .. } => GameMode::Timed,
      Self::Map { .. } => GameMode::Map,
      Self::Compare { .. } => GameMode::Compare,
      Self::TimeAttack { .. } => GameMode::TimeAttack,
    }
  }

  /// Filter applied to the catalog for every question in this round.
  /// Time Attack always plays coins from every region.
  pub fn filter(&self) -> RoundFilter {
    match *self {
      Self::Classic { filter, .. } | Self::Timed { filter, .. } | Self::Map { filter, .. } => filter,
      Self::Compare { difficulty, .. } => RoundFilter::difficulty_only(difficulty),
      Self::TimeAttack { difficulty, .. } => {
        RoundFilter::new(Category::Coin, RegionFilter::All, difficulty)
      }
    }
  }

  pub fn difficulty(&self) -> Difficulty {
    self.filter().difficulty
  }

  /// Fixed question count, for rounds that end after N questions
  pub fn question_limit(&self) -> Option<u32> {
    match *self {
      Self::Classic { num_questions, .. }
      | Self::Map { num_questions, .. }
      | Self::Compare { num_questions, .. } => Some(num_questions),
      Self::Timed { .. } | Self::TimeAttack { .. } => None,
    }
  }

  /// Clock length, for rounds that end when time runs out
  pub fn duration_secs(&self) -> Option<u32> {
    match *self {
      Self::Timed { duration_secs, .. } | Self::TimeAttack { duration_secs, .. } => {
        Some(duration_secs)
      }
      _ => None,
    }
  }
}

/// Terminal summary of a finished or abandoned round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
  pub mode: GameMode,
  pub score: u32,
  pub correct_answers: u32,
  pub total_questions: u32,
  pub duration_secs: Option<u32>,
  pub best_streak: u32,
  pub is_perfect: bool,
  pub coins_earned: u32,
}
