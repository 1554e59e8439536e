use serde::{Deserialize, Serialize};

use super::item::Item;

/// Multiple choice question used by Classic, Timed and Time Attack rounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceQuestion {
  pub correct_answer: Item,
  /// Target plus distractors, in presentation order
  pub options: Vec<Item>,
  pub image_url: String,
}

/// Map question: the answer surface is the rendered map, not an option list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapQuestion {
  pub correct_answer: Item,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompareKind {
  /// Which country uses this item? Answer is a country name.
  CountryMatch,
  /// Which item is not from the region? Answer is an item id.
  RegionOddOneOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareQuestion {
  pub kind: CompareKind,
  pub items: [Item; 2],
  pub question_text: String,
  /// Country names to pick from (country match only)
  pub options: Option<Vec<String>>,
  /// Country name or item id, depending on `kind`
  pub correct_answer: String,
}

/// Mode-specific question payload. Built per round step, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Question {
  Choice(ChoiceQuestion),
  Map(MapQuestion),
  Compare(CompareQuestion),
}

impl Question {
  /// Check a submitted answer token.
  ///
  /// Choice questions expect an item id, map questions a country code,
  /// compare questions the country name or item id they asked for.
  pub fn is_correct(&self, answer: &str) -> bool {
    match self {
      Question::Choice(q) => q.correct_answer.id == answer,
      Question::Map(q) => q.correct_answer.country_code.eq_ignore_ascii_case(answer),
      Question::Compare(q) => q.correct_answer == answer,
    }
  }

  /// The token `is_correct` accepts
  pub fn answer_token(&self) -> &str {
    match self {
      Question::Choice(q) => &q.correct_answer.id,
      Question::Map(q) => &q.correct_answer.country_code,
      Question::Compare(q) => &q.correct_answer,
    }
  }

  /// Item whose mastery record an answer updates, if any
  pub fn target_item_id(&self) -> Option<&str> {
    match self {
      Question::Choice(q) => Some(&q.correct_answer.id),
      Question::Map(q) => Some(&q.correct_answer.id),
      Question::Compare(_) => None,
    }
  }
}
