//! Per-round state machine.
//!
//! A round moves `AwaitingQuestion -> QuestionShown -> FeedbackShown` and then
//! back to `AwaitingQuestion` or on to `Complete`. No question is composed
//! while feedback for the previous answer is still pending.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;
use crate::domain::{GameMode, GameResult, Question, RoundOptions};

use super::composer::{QuizContext, compose_for_round};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoundError {
  #[error("feedback for the previous answer is still pending")]
  FeedbackPending,
  #[error("a question is already waiting for an answer")]
  QuestionPending,
  #[error("no question is waiting for an answer")]
  NoQuestion,
  #[error("the round is paused")]
  Paused,
  #[error("the round is already complete")]
  Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
  AwaitingQuestion,
  QuestionShown,
  FeedbackShown,
  Complete,
}

/// Streak bonus: a score/coin multiplier that lasts a number of answers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
  pub multiplier: u32,
  pub rounds_left: u32,
}

impl Bonus {
  pub fn is_active(&self) -> bool {
    self.rounds_left > 0 && self.multiplier > 1
  }

  /// Multiplier applied to the answer being scored
  pub fn current_multiplier(&self) -> u32 {
    if self.is_active() { self.multiplier } else { 1 }
  }

  /// Bonus state after a correct answer that brought the streak to `streak`
  pub fn after_correct(self, streak: u32) -> Self {
    if streak >= config::TRIPLE_BONUS_STREAK {
      Self {
        multiplier: 3,
        rounds_left: config::TRIPLE_BONUS_STREAK,
      }
    } else if streak >= config::DOUBLE_BONUS_STREAK {
      Self {
        multiplier: 2,
        rounds_left: config::DOUBLE_BONUS_STREAK,
      }
    } else {
      match self.rounds_left.saturating_sub(1) {
        0 => Self::default(),
        rounds_left => Self { rounds_left, ..self },
      }
    }
  }
}

/// What happened when an answer was submitted.
///
/// `tracked_item` names the item whose mastery record should be updated with
/// `was_correct`; compare questions have no single target and leave it empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
  pub was_correct: bool,
  pub correct_answer: String,
  pub points: u32,
  pub coins: u32,
  pub tracked_item: Option<String>,
  pub round_complete: bool,
}

#[derive(Debug, Clone)]
pub struct RoundSession {
  options: RoundOptions,
  reported_mode: GameMode,
  phase: RoundPhase,
  current: Option<Question>,
  paused: bool,
  abandoned: bool,
  answered: u32,
  correct_answers: u32,
  score: u32,
  coins_earned: u32,
  streak: u32,
  best_streak: u32,
  bonus: Bonus,
  remaining_secs: Option<u32>,
}

impl RoundSession {
  pub fn new(options: RoundOptions) -> Self {
    Self {
      options,
      reported_mode: options.mode(),
      phase: RoundPhase::AwaitingQuestion,
      current: None,
      paused: false,
      abandoned: false,
      answered: 0,
      correct_answers: 0,
      score: 0,
      coins_earned: 0,
      streak: 0,
      best_streak: 0,
      bonus: Bonus::default(),
      remaining_secs: options.duration_secs(),
    }
  }

  /// Report results under a different mode (random rounds play as another mode)
  pub fn reported_as(mut self, mode: GameMode) -> Self {
    self.reported_mode = mode;
    self
  }

  pub fn options(&self) -> &RoundOptions {
    &self.options
  }

  pub fn mode(&self) -> GameMode {
    self.reported_mode
  }

  pub fn phase(&self) -> RoundPhase {
    self.phase
  }

  pub fn is_complete(&self) -> bool {
    self.phase == RoundPhase::Complete
  }

  pub fn is_paused(&self) -> bool {
    self.paused
  }

  pub fn current_question(&self) -> Option<&Question> {
    self.current.as_ref()
  }

  pub fn remaining_secs(&self) -> Option<u32> {
    self.remaining_secs
  }

  pub fn score(&self) -> u32 {
    self.score
  }

  pub fn streak(&self) -> u32 {
    self.streak
  }

  pub fn bonus(&self) -> Bonus {
    self.bonus
  }

  pub fn answered(&self) -> u32 {
    self.answered
  }

  pub fn correct_answers(&self) -> u32 {
    self.correct_answers
  }

  /// Compose the next question.
  ///
  /// `Ok(None)` means the unlocked content cannot fill this round; the phase
  /// is left unchanged so the caller can offer different settings.
  pub fn next_question<R: Rng + ?Sized>(
    &mut self,
    ctx: &QuizContext<'_>,
    rng: &mut R,
  ) -> Result<Option<&Question>, RoundError> {
    match self.phase {
      RoundPhase::Complete => return Err(RoundError::Complete),
      RoundPhase::FeedbackShown => return Err(RoundError::FeedbackPending),
      RoundPhase::QuestionShown => return Err(RoundError::QuestionPending),
      RoundPhase::AwaitingQuestion => {}
    }

    match compose_for_round(ctx, &self.options, rng) {
      Some(question) => {
        self.current = Some(question);
        self.phase = RoundPhase::QuestionShown;
        Ok(self.current.as_ref())
      }
      None => {
        tracing::info!("Not enough content for a {} question", self.options.mode().as_str());
        Ok(None)
      }
    }
  }

  pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, RoundError> {
    match self.phase {
      RoundPhase::Complete => return Err(RoundError::Complete),
      RoundPhase::FeedbackShown => return Err(RoundError::FeedbackPending),
      RoundPhase::AwaitingQuestion => return Err(RoundError::NoQuestion),
      RoundPhase::QuestionShown => {}
    }
    if self.paused {
      return Err(RoundError::Paused);
    }

    let question = self.current.as_ref().ok_or(RoundError::NoQuestion)?;
    let was_correct = question.is_correct(answer);
    let correct_answer = question.answer_token().to_string();
    let tracked_item = question.target_item_id().map(str::to_string);

    self.answered += 1;

    let (points, coins) = if was_correct {
      let multiplier = self.bonus.current_multiplier();
      let points = self.base_points() * multiplier;
      let coins = self.base_coins() * multiplier;

      self.correct_answers += 1;
      self.streak += 1;
      self.best_streak = self.best_streak.max(self.streak);
      self.score += points;
      self.coins_earned += coins;
      self.bonus = self.bonus.after_correct(self.streak);
      (points, coins)
    } else {
      self.streak = 0;
      self.bonus = Bonus::default();
      (0, 0)
    };

    if let (GameMode::TimeAttack, Some(remaining)) = (self.options.mode(), self.remaining_secs) {
      let adjusted = if was_correct {
        remaining + config::TIME_ATTACK_BONUS_SECS
      } else {
        remaining.saturating_sub(config::TIME_ATTACK_PENALTY_SECS)
      };
      self.remaining_secs = Some(adjusted);
    }

    self.phase = RoundPhase::FeedbackShown;
    if self.remaining_secs == Some(0) {
      self.finish();
    }

    Ok(AnswerOutcome {
      was_correct,
      correct_answer,
      points,
      coins,
      tracked_item,
      round_complete: self.is_complete(),
    })
  }

  /// Leave the feedback phase once the hold is over
  pub fn advance(&mut self) -> Result<RoundPhase, RoundError> {
    match self.phase {
      RoundPhase::Complete => return Err(RoundError::Complete),
      RoundPhase::AwaitingQuestion => return Err(RoundError::NoQuestion),
      RoundPhase::QuestionShown => return Err(RoundError::QuestionPending),
      RoundPhase::FeedbackShown => {}
    }

    self.current = None;
    if self.options.question_limit().is_some_and(|limit| self.answered >= limit) {
      self.finish();
    } else {
      self.phase = RoundPhase::AwaitingQuestion;
    }
    Ok(self.phase)
  }

  /// One second of round clock. Returns true when this tick ended the round.
  ///
  /// Untimed, paused and finished rounds ignore ticks.
  pub fn tick(&mut self) -> bool {
    if self.paused || self.is_complete() {
      return false;
    }
    let Some(remaining) = self.remaining_secs else {
      return false;
    };

    if remaining <= 1 {
      self.remaining_secs = Some(0);
      self.finish();
      true
    } else {
      self.remaining_secs = Some(remaining - 1);
      false
    }
  }

  pub fn pause(&mut self) {
    if !self.is_complete() {
      self.paused = true;
    }
  }

  pub fn resume(&mut self) {
    self.paused = false;
  }

  pub fn toggle_pause(&mut self) -> bool {
    if self.paused {
      self.resume();
    } else {
      self.pause();
    }
    self.paused
  }

  /// End the round now and summarise what was played so far
  pub fn abandon(&mut self) -> GameResult {
    if !self.is_complete() {
      self.abandoned = true;
      self.finish();
    }
    self.result()
  }

  pub fn result(&self) -> GameResult {
    let is_perfect = !self.abandoned
      && self.is_complete()
      && self.options.question_limit().is_some_and(|limit| self.answered == limit)
      && self.correct_answers == self.answered
      && self.answered >= config::PERFECT_GAME_MIN_QUESTIONS;

    GameResult {
      mode: self.reported_mode,
      score: self.score,
      correct_answers: self.correct_answers,
      total_questions: self.answered,
      duration_secs: self.options.duration_secs(),
      best_streak: self.best_streak,
      is_perfect,
      coins_earned: self.coins_earned,
    }
  }

  fn finish(&mut self) {
    self.phase = RoundPhase::Complete;
    self.paused = false;
    tracing::info!(
      "Round complete: {} scored {} with {}/{} correct",
      self.reported_mode.as_str(),
      self.score,
      self.correct_answers,
      self.answered
    );
  }

  fn base_points(&self) -> u32 {
    match self.options.mode() {
      GameMode::Map => config::MAP_POINTS,
      _ => config::BASE_POINTS,
    }
  }

  fn base_coins(&self) -> u32 {
    match self.options.mode() {
      GameMode::Map => config::MAP_COINS,
      GameMode::Compare => config::COMPARE_COINS,
      _ => config::BASE_COINS,
    }
  }
}
