//! Player progress: coins, unlocked items, lifetime stats and mastery.
//!
//! The quiz core only reads snapshots of this state. Everything here is
//! plain data so the persistence layer can store it however it likes.

pub mod achievements;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::config;
use crate::content::{Catalog, CurrencyPack};
use crate::domain::{GameMode, GameResult, Item, MasteryMap};
use crate::quiz::QuizContext;
use crate::srs;

pub use achievements::{
  ACHIEVEMENTS, Achievement, AchievementProgress, AchievementTier, AchievementUnlock, check_and_grant,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PurchaseError {
  #[error("pack {pack} costs {price} coins but only {balance} are available")]
  InsufficientCoins { pack: String, price: u32, balance: u32 },
  #[error("every item in pack {0} is already unlocked")]
  AlreadyOwned(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerProgress {
  pub coins: u32,
  pub unlocked_item_ids: HashSet<String>,
  pub games_played: u32,
  pub total_correct_answers: u32,
  pub total_questions_answered: u32,
  pub best_streak: u32,
  pub highest_timed_score: u32,
  pub perfect_games: u32,
  pub games_by_mode: BTreeMap<GameMode, u32>,
  pub mastery: MasteryMap,
  pub achievements: BTreeMap<String, AchievementProgress>,
}

impl PlayerProgress {
  /// Fresh player: starting coins and the catalog's starter items
  pub fn new_player(catalog: &Catalog) -> Self {
    Self {
      coins: config::INITIAL_COINS,
      unlocked_item_ids: catalog.starter_ids(),
      ..Self::default()
    }
  }

  pub fn games_played_in(&self, mode: GameMode) -> u32 {
    self.games_by_mode.get(&mode).copied().unwrap_or(0)
  }

  /// Read-only view the question composers work from
  pub fn quiz_context<'a>(&'a self, items: &'a [Item], now: DateTime<Utc>) -> QuizContext<'a> {
    QuizContext {
      items,
      unlocked_ids: &self.unlocked_item_ids,
      mastery: &self.mastery,
      now,
    }
  }

  pub fn record_attempt(&mut self, item_id: &str, was_correct: bool, now: DateTime<Utc>) {
    self.mastery = srs::record_attempt(&self.mastery, item_id, was_correct, now);
  }

  /// Fold a finished round into lifetime stats, credit its coins and grant
  /// any achievements it completed.
  pub fn apply_game_result(&mut self, result: &GameResult, now: DateTime<Utc>) -> Vec<AchievementUnlock> {
    self.games_played += 1;
    self.total_correct_answers += result.correct_answers;
    self.total_questions_answered += result.total_questions;
    self.best_streak = self.best_streak.max(result.best_streak);

    if result.is_perfect {
      self.perfect_games += 1;
    }

    *self.games_by_mode.entry(result.mode).or_insert(0) += 1;

    if result.mode == GameMode::Timed {
      self.highest_timed_score = self.highest_timed_score.max(result.score);
    }

    self.add_coins(result.coins_earned);

    tracing::debug!(
      "Applied {} result: {} games played, {} coins",
      result.mode.as_str(),
      self.games_played,
      self.coins
    );

    check_and_grant(self, now)
  }

  pub fn unlock_items<I>(&mut self, ids: I, now: DateTime<Utc>) -> Vec<AchievementUnlock>
  where
    I: IntoIterator<Item = String>,
  {
    self.unlocked_item_ids.extend(ids);
    check_and_grant(self, now)
  }

  pub fn owns_pack(&self, pack: &CurrencyPack) -> bool {
    pack.item_ids.iter().all(|id| self.unlocked_item_ids.contains(id))
  }

  pub fn purchase_pack(
    &mut self,
    pack: &CurrencyPack,
    now: DateTime<Utc>,
  ) -> Result<Vec<AchievementUnlock>, PurchaseError> {
    if self.owns_pack(pack) {
      return Err(PurchaseError::AlreadyOwned(pack.id.clone()));
    }
    if self.coins < pack.price {
      return Err(PurchaseError::InsufficientCoins {
        pack: pack.id.clone(),
        price: pack.price,
        balance: self.coins,
      });
    }

    self.spend_coins(pack.price);
    tracing::info!("Purchased pack {} for {} coins", pack.id, pack.price);
    Ok(self.unlock_items(pack.item_ids.iter().cloned(), now))
  }

  pub fn add_coins(&mut self, amount: u32) {
    self.coins = self.coins.saturating_add(amount);
  }

  /// Spend coins, never going below zero
  pub fn spend_coins(&mut self, amount: u32) {
    self.coins = self.coins.saturating_sub(amount);
  }
}
