//! Tiered achievements and the coin rewards they grant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::GameMode;

use super::PlayerProgress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AchievementTier {
  Bronze,
  Silver,
  Gold,
  Platinum,
}

impl AchievementTier {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Bronze => "Bronze",
      Self::Silver => "Silver",
      Self::Gold => "Gold",
      Self::Platinum => "Platinum",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "Bronze" => Some(Self::Bronze),
      "Silver" => Some(Self::Silver),
      "Gold" => Some(Self::Gold),
      "Platinum" => Some(Self::Platinum),
      _ => None,
    }
  }
}

/// Player statistic an achievement tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AchievementStat {
  TotalCorrect,
  BestStreak,
  ItemsDiscovered,
  PerfectGames,
  GamesPlayed(GameMode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierGoal {
  pub tier: AchievementTier,
  pub goal: u32,
  pub reward: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Achievement {
  pub id: &'static str,
  pub name: &'static str,
  pub description: &'static str,
  pub stat: AchievementStat,
  pub tiers: &'static [TierGoal],
}

const fn goal(tier: AchievementTier, goal: u32, reward: u32) -> TierGoal {
  TierGoal { tier, goal, reward }
}

use AchievementTier::{Bronze, Gold, Platinum, Silver};

pub static ACHIEVEMENTS: &[Achievement] = &[
  Achievement {
    id: "total_correct",
    name: "Knowledge Seeker",
    description: "Answer questions correctly.",
    stat: AchievementStat::TotalCorrect,
    tiers: &[goal(Bronze, 25, 50), goal(Silver, 100, 100), goal(Gold, 250, 250), goal(Platinum, 500, 500)],
  },
  Achievement {
    id: "best_streak",
    name: "On Fire!",
    description: "Achieve a high answer streak in a single game.",
    stat: AchievementStat::BestStreak,
    tiers: &[goal(Bronze, 10, 75), goal(Silver, 20, 150), goal(Gold, 30, 300), goal(Platinum, 50, 600)],
  },
  Achievement {
    id: "currencies_discovered",
    name: "Collector",
    description: "Unlock unique currencies.",
    stat: AchievementStat::ItemsDiscovered,
    tiers: &[goal(Bronze, 25, 100), goal(Silver, 50, 200), goal(Gold, 100, 400), goal(Platinum, 200, 800)],
  },
  Achievement {
    id: "perfect_games",
    name: "Perfectionist",
    description: "Finish a game with 100% accuracy (min. 10 questions).",
    stat: AchievementStat::PerfectGames,
    tiers: &[goal(Bronze, 1, 100), goal(Silver, 5, 250), goal(Gold, 10, 500), goal(Platinum, 25, 1000)],
  },
  Achievement {
    id: "classic_games_played",
    name: "Classic Veteran",
    description: "Play Classic Mode games.",
    stat: AchievementStat::GamesPlayed(GameMode::Classic),
    tiers: &[goal(Bronze, 5, 50), goal(Silver, 25, 100), goal(Gold, 50, 200)],
  },
  Achievement {
    id: "timed_games_played",
    name: "Time Lord",
    description: "Play Timed Mode games.",
    stat: AchievementStat::GamesPlayed(GameMode::Timed),
    tiers: &[goal(Bronze, 5, 50), goal(Silver, 25, 100), goal(Gold, 50, 200)],
  },
  Achievement {
    id: "map_games_played",
    name: "Globetrotter",
    description: "Play Map Mode games.",
    stat: AchievementStat::GamesPlayed(GameMode::Map),
    tiers: &[goal(Bronze, 5, 50), goal(Silver, 25, 100), goal(Gold, 50, 200)],
  },
  Achievement {
    id: "compare_games_played",
    name: "Critical Thinker",
    description: "Play Compare Mode games.",
    stat: AchievementStat::GamesPlayed(GameMode::Compare),
    tiers: &[goal(Bronze, 5, 60), goal(Silver, 25, 120), goal(Gold, 50, 240)],
  },
  Achievement {
    id: "time_attack_games_played",
    name: "Adrenaline Junkie",
    description: "Play Time Attack games.",
    stat: AchievementStat::GamesPlayed(GameMode::TimeAttack),
    tiers: &[goal(Bronze, 5, 60), goal(Silver, 25, 120), goal(Gold, 50, 240)],
  },
];

/// A player's standing on one achievement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
  /// Highest tier unlocked so far
  pub unlocked_tier: Option<AchievementTier>,
  pub progress: u32,
  pub unlocked_at: BTreeMap<AchievementTier, DateTime<Utc>>,
}

/// A tier unlocked by `check_and_grant`, for presentation to the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementUnlock {
  pub achievement_id: &'static str,
  pub name: &'static str,
  pub tier: AchievementTier,
  pub reward: u32,
}

fn stat_value(progress: &PlayerProgress, stat: AchievementStat) -> u32 {
  match stat {
    AchievementStat::TotalCorrect => progress.total_correct_answers,
    AchievementStat::BestStreak => progress.best_streak,
    AchievementStat::ItemsDiscovered => progress.unlocked_item_ids.len() as u32,
    AchievementStat::PerfectGames => progress.perfect_games,
    AchievementStat::GamesPlayed(mode) => progress.games_played_in(mode),
  }
}

/// Refresh achievement progress from the player's stats and unlock every
/// tier whose goal is now met. Rewards are credited to the player's coins.
pub fn check_and_grant(progress: &mut PlayerProgress, now: DateTime<Utc>) -> Vec<AchievementUnlock> {
  let mut unlocks = Vec::new();

  for achievement in ACHIEVEMENTS {
    let value = stat_value(progress, achievement.stat);
    let entry = progress.achievements.entry(achievement.id.to_string()).or_default();
    entry.progress = value;

    for tier in achievement.tiers {
      let above_last = entry.unlocked_tier.is_none_or(|last| tier.tier > last);
      if above_last && value >= tier.goal {
        entry.unlocked_tier = Some(tier.tier);
        entry.unlocked_at.insert(tier.tier, now);
        unlocks.push(AchievementUnlock {
          achievement_id: achievement.id,
          name: achievement.name,
          tier: tier.tier,
          reward: tier.reward,
        });
      }
    }
  }

  let reward: u32 = unlocks.iter().map(|u| u.reward).sum();
  if reward > 0 {
    progress.add_coins(reward);
  }

  for unlock in &unlocks {
    tracing::info!(
      "Achievement unlocked: {} ({}), +{} coins",
      unlock.name,
      unlock.tier.as_str(),
      unlock.reward
    );
  }

  unlocks
}
