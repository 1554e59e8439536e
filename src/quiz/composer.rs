//! Question composition for every game mode.
//!
//! Only the target item is weighted; distractors and compare pairs are
//! drawn uniformly for variety.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::{HashMap, HashSet};

use crate::config;
use crate::domain::{
  ChoiceQuestion, CompareKind, CompareQuestion, Difficulty, Item, MapQuestion, MasteryMap, Question,
  Region, RoundFilter, RoundOptions,
};
use crate::srs::{filter_pool, select_target};

/// Everything a composer reads about the player: the catalog, what they
/// have unlocked, and their mastery records, at a fixed point in time.
#[derive(Debug, Clone, Copy)]
pub struct QuizContext<'a> {
  pub items: &'a [Item],
  pub unlocked_ids: &'a HashSet<String>,
  pub mastery: &'a MasteryMap,
  pub now: DateTime<Utc>,
}

impl<'a> QuizContext<'a> {
  pub fn pool(&self, filter: &RoundFilter) -> Vec<&'a Item> {
    filter_pool(self.items, self.unlocked_ids, filter)
  }
}

/// Multiple choice question: weighted target plus uniformly drawn distractors.
///
/// Needs at least `DISTRACTOR_COUNT + 1` eligible items.
pub fn generate_question<R: Rng + ?Sized>(
  ctx: &QuizContext<'_>,
  filter: &RoundFilter,
  rng: &mut R,
) -> Option<ChoiceQuestion> {
  let pool = ctx.pool(filter);
  let needed = config::DISTRACTOR_COUNT + 1;

  if pool.len() < needed {
    tracing::debug!("Choice pool too small: {} of {} items", pool.len(), needed);
    return None;
  }

  let target = select_target(&pool, ctx.mastery, ctx.now, rng)?;

  let others: Vec<&Item> = pool.iter().copied().filter(|i| i.id != target.id).collect();
  let mut options: Vec<Item> = others
    .choose_multiple(rng, config::DISTRACTOR_COUNT)
    .map(|i| (*i).clone())
    .collect();
  options.push(target.clone());
  options.shuffle(rng);

  Some(ChoiceQuestion {
    correct_answer: target.clone(),
    options,
    image_url: target.image_url.clone(),
  })
}

/// Map question: only a target, the map is the answer surface
pub fn generate_map_question<R: Rng + ?Sized>(
  ctx: &QuizContext<'_>,
  filter: &RoundFilter,
  rng: &mut R,
) -> Option<MapQuestion> {
  let pool = ctx.pool(filter);
  if pool.is_empty() {
    tracing::debug!("Map pool is empty");
    return None;
  }

  let target = select_target(&pool, ctx.mastery, ctx.now, rng)?;
  Some(MapQuestion {
    correct_answer: target.clone(),
  })
}

/// Compare question over the difficulty-filtered pool.
///
/// Country-match and region-odd-one-out are picked with equal odds when both
/// can be formed; otherwise whichever is possible is used. Each is drawn only
/// from valid pairs, so `None` means the pool can never yield one.
pub fn generate_compare_question<R: Rng + ?Sized>(
  ctx: &QuizContext<'_>,
  difficulty: Difficulty,
  rng: &mut R,
) -> Option<CompareQuestion> {
  let pool = ctx.pool(&RoundFilter::difficulty_only(difficulty));
  if pool.len() < 2 {
    tracing::debug!("Compare pool too small: {} items", pool.len());
    return None;
  }

  let countries = distinct_countries(&pool);
  let regions = present_regions(&pool);

  match (countries >= 2, regions.len() >= 2) {
    (true, true) if rng.random_bool(0.5) => country_match(&pool, rng),
    (true, true) => region_odd_one_out(&pool, rng),
    (true, false) => country_match(&pool, rng),
    (false, true) => region_odd_one_out(&pool, rng),
    (false, false) => {
      tracing::debug!("Compare pool has a single country and region, no valid pair exists");
      None
    }
  }
}

/// Compose the next question for a round, using the shape its mode needs
pub fn compose_for_round<R: Rng + ?Sized>(
  ctx: &QuizContext<'_>,
  options: &RoundOptions,
  rng: &mut R,
) -> Option<Question> {
  match options {
    RoundOptions::Classic { .. } | RoundOptions::Timed { .. } | RoundOptions::TimeAttack { .. } => {
      generate_question(ctx, &options.filter(), rng).map(Question::Choice)
    }
    RoundOptions::Map { .. } => generate_map_question(ctx, &options.filter(), rng).map(Question::Map),
    RoundOptions::Compare { difficulty, .. } => {
      generate_compare_question(ctx, *difficulty, rng).map(Question::Compare)
    }
  }
}

fn distinct_countries(pool: &[&Item]) -> usize {
  pool.iter().map(|i| i.country_name.as_str()).collect::<HashSet<_>>().len()
}

/// Regions with at least one pool item, in `Region::ALL` order
fn present_regions(pool: &[&Item]) -> Vec<Region> {
  Region::ALL
    .into_iter()
    .filter(|r| pool.iter().any(|i| i.region == *r))
    .collect()
}

/// Uniform draw over ordered pairs from different countries
fn country_match<R: Rng + ?Sized>(pool: &[&Item], rng: &mut R) -> Option<CompareQuestion> {
  let mut per_country: HashMap<&str, usize> = HashMap::new();
  for item in pool {
    *per_country.entry(item.country_name.as_str()).or_insert(0) += 1;
  }

  // Each item can lead a pair with every item from another country
  let partners: Vec<usize> = pool
    .iter()
    .map(|i| pool.len() - per_country[i.country_name.as_str()])
    .collect();
  let total: usize = partners.iter().sum();
  if total == 0 {
    return None;
  }

  let mut draw = rng.random_range(0..total);
  let mut first_idx = 0;
  for (idx, &count) in partners.iter().enumerate() {
    if draw < count {
      first_idx = idx;
      break;
    }
    draw -= count;
  }
  let first = pool[first_idx];

  let others: Vec<&Item> = pool
    .iter()
    .copied()
    .filter(|i| i.country_name != first.country_name)
    .collect();
  let second = *others.choose(rng)?;

  let subject = if rng.random_bool(0.5) { first } else { second };
  let mut options = vec![first.country_name.clone(), second.country_name.clone()];
  options.shuffle(rng);

  Some(CompareQuestion {
    kind: CompareKind::CountryMatch,
    items: [first.clone(), second.clone()],
    question_text: format!("Which country uses the {}?", subject.name),
    options: Some(options),
    correct_answer: subject.country_name.clone(),
  })
}

/// Uniform region among those present, then one item inside and one outside
fn region_odd_one_out<R: Rng + ?Sized>(pool: &[&Item], rng: &mut R) -> Option<CompareQuestion> {
  let regions = present_regions(pool);
  if regions.len() < 2 {
    return None;
  }
  let region = *regions.choose(rng)?;
  let (in_region, out_of_region): (Vec<&Item>, Vec<&Item>) =
    pool.iter().copied().partition(|i| i.region == region);

  let inside = *in_region.choose(rng)?;
  let outside = *out_of_region.choose(rng)?;

  let mut items = [inside.clone(), outside.clone()];
  items.shuffle(rng);

  Some(CompareQuestion {
    kind: CompareKind::RegionOddOneOut,
    items,
    question_text: format!("Which of these is NOT from {}?", region),
    options: None,
    correct_answer: outside.id.clone(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Category, RegionFilter, Tier};
  use crate::srs::record_attempt;
  use crate::testing::{coins, item};
  use rand::SeedableRng;
  use rand::rngs::StdRng;

  fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
      .unwrap()
      .with_timezone(&Utc)
  }

  fn unlock_all(items: &[Item]) -> HashSet<String> {
    items.iter().map(|i| i.id.clone()).collect()
  }

  fn coin_filter() -> RoundFilter {
    RoundFilter::new(Category::Coin, RegionFilter::All, Difficulty::Hard)
  }

  // Choice questions

  #[test]
  fn test_choice_question_has_four_distinct_options() {
    let items = coins("eu", Region::Europe, 10);
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..100 {
      let q = generate_question(&ctx, &coin_filter(), &mut rng).unwrap();
      assert_eq!(q.options.len(), 4);
      let ids: HashSet<&str> = q.options.iter().map(|o| o.id.as_str()).collect();
      assert_eq!(ids.len(), 4);
      assert!(ids.contains(q.correct_answer.id.as_str()));
      assert_eq!(q.image_url, q.correct_answer.image_url);
    }
  }

  #[test]
  fn test_choice_question_needs_four_items() {
    let items = coins("eu", Region::Europe, 3);
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(1);
    assert!(generate_question(&ctx, &coin_filter(), &mut rng).is_none());
  }

  #[test]
  fn test_choice_question_with_exactly_four_items_uses_all() {
    let items = coins("eu", Region::Europe, 4);
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(4);
    let q = generate_question(&ctx, &coin_filter(), &mut rng).unwrap();
    let mut ids: Vec<&str> = q.options.iter().map(|o| o.id.as_str()).collect();
    ids.sort();
    assert_eq!(ids, vec!["eu_0", "eu_1", "eu_2", "eu_3"]);
  }

  #[test]
  fn test_choice_question_respects_unlocked_set() {
    let items = coins("eu", Region::Europe, 6);
    let unlocked: HashSet<String> = items.iter().take(4).map(|i| i.id.clone()).collect();
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(8);
    for _ in 0..50 {
      let q = generate_question(&ctx, &coin_filter(), &mut rng).unwrap();
      assert!(q.options.iter().all(|o| unlocked.contains(&o.id)));
    }
  }

  #[test]
  fn test_choice_question_reproducible_with_seed() {
    let items = coins("eu", Region::Europe, 12);
    let unlocked = unlock_all(&items);
    let mastery = record_attempt(&MasteryMap::new(), "eu_3", false, now());
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };

    let mut a = StdRng::seed_from_u64(77);
    let mut b = StdRng::seed_from_u64(77);
    for _ in 0..20 {
      assert_eq!(
        generate_question(&ctx, &coin_filter(), &mut a),
        generate_question(&ctx, &coin_filter(), &mut b)
      );
    }
  }

  // Map questions

  #[test]
  fn test_map_question_single_item() {
    let items = coins("af", Region::Africa, 1);
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(2);
    let q = generate_map_question(&ctx, &coin_filter(), &mut rng).unwrap();
    assert_eq!(q.correct_answer.id, "af_0");
  }

  #[test]
  fn test_map_question_empty_pool() {
    let items = coins("af", Region::Africa, 3);
    let unlocked = HashSet::new();
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(2);
    assert!(generate_map_question(&ctx, &coin_filter(), &mut rng).is_none());
  }

  // Compare questions

  #[test]
  fn test_compare_needs_two_items() {
    let items = coins("as", Region::Asia, 1);
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(3);
    assert!(generate_compare_question(&ctx, Difficulty::Hard, &mut rng).is_none());
  }

  #[test]
  fn test_compare_same_country_pair_terminates_with_none() {
    let items = vec![
      item("eur_1", Category::Coin, Region::Europe, Tier::Common, "Eurozone"),
      item("eur_2", Category::Coin, Region::Europe, Tier::Common, "Eurozone"),
    ];
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..10 {
      assert!(generate_compare_question(&ctx, Difficulty::Easy, &mut rng).is_none());
    }
  }

  #[test]
  fn test_compare_lone_foreign_item_always_composes() {
    let mut items: Vec<Item> = (0..30)
      .map(|n| item(&format!("eur_{}", n), Category::Coin, Region::Europe, Tier::Common, "Eurozone"))
      .collect();
    items.push(item("gbp_1", Category::Coin, Region::Europe, Tier::Common, "United Kingdom"));
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..1000 {
      let q = generate_compare_question(&ctx, Difficulty::Easy, &mut rng).unwrap();
      // One region only, so every question is a country match with the pound
      assert_eq!(q.kind, CompareKind::CountryMatch);
      assert!(q.items.iter().any(|i| i.id == "gbp_1"));
    }
  }

  #[test]
  fn test_compare_single_country_across_regions_uses_odd_one_out() {
    let items = vec![
      item("usd_1", Category::Coin, Region::NorthAmerica, Tier::Common, "United States"),
      item("usd_2", Category::Coin, Region::NorthAmerica, Tier::Common, "United States"),
      item("usd_3", Category::Coin, Region::Oceania, Tier::Common, "United States"),
    ];
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(9);

    for _ in 0..200 {
      let q = generate_compare_question(&ctx, Difficulty::Easy, &mut rng).unwrap();
      assert_eq!(q.kind, CompareKind::RegionOddOneOut);
    }
  }

  #[test]
  fn test_country_match_never_pairs_same_country() {
    let items = vec![
      item("eur_1", Category::Coin, Region::Europe, Tier::Common, "Eurozone"),
      item("eur_2", Category::Coin, Region::Europe, Tier::Common, "Eurozone"),
      item("eur_5", Category::Banknote, Region::Europe, Tier::Common, "Eurozone"),
      item("gbp_1", Category::Coin, Region::Europe, Tier::Common, "United Kingdom"),
    ];
    let pool: Vec<&Item> = items.iter().collect();
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..200 {
      let q = country_match(&pool, &mut rng).unwrap();
      assert_ne!(q.items[0].country_name, q.items[1].country_name);
      assert!(q.items.iter().any(|i| i.id == "gbp_1"));
      let options = q.options.as_ref().unwrap();
      assert_eq!(options.len(), 2);
      assert!(options.contains(&q.correct_answer));
      assert!(q.question_text.starts_with("Which country uses the "));
    }
  }

  #[test]
  fn test_region_odd_one_out_answer_is_outside_region() {
    let mut items = coins("eu", Region::Europe, 3);
    items.extend(coins("as", Region::Asia, 3));
    let pool: Vec<&Item> = items.iter().collect();
    let mut rng = StdRng::seed_from_u64(21);
    for _ in 0..300 {
      let q = region_odd_one_out(&pool, &mut rng).unwrap();
      let region_name = q
        .question_text
        .trim_start_matches("Which of these is NOT from ")
        .trim_end_matches('?');
      let region = Region::from_str(region_name).unwrap();
      assert!(matches!(region, Region::Europe | Region::Asia));
      let answer = q.items.iter().find(|i| i.id == q.correct_answer).unwrap();
      let other = q.items.iter().find(|i| i.id != q.correct_answer).unwrap();
      assert_ne!(answer.region, region);
      assert_eq!(other.region, region);
      assert!(q.options.is_none());
    }
  }

  #[test]
  fn test_region_odd_one_out_single_region_pool_gives_none() {
    let items = coins("oc", Region::Oceania, 4);
    let pool: Vec<&Item> = items.iter().collect();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..50 {
      assert!(region_odd_one_out(&pool, &mut rng).is_none());
    }
  }

  #[test]
  fn test_compare_ignores_category_and_region_but_filters_difficulty() {
    let items = vec![
      item("a", Category::Coin, Region::Europe, Tier::Common, "Alpha"),
      item("b", Category::Banknote, Region::Asia, Tier::Common, "Beta"),
      item("c", Category::Banknote, Region::Africa, Tier::Rare, "Gamma"),
    ];
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(6);
    for _ in 0..50 {
      let q = generate_compare_question(&ctx, Difficulty::Easy, &mut rng).unwrap();
      assert!(q.items.iter().all(|i| i.id != "c"));
    }
  }

  #[test]
  fn test_compose_for_round_dispatches_by_mode() {
    let mut items = coins("eu", Region::Europe, 5);
    items.extend(coins("as", Region::Asia, 5));
    let unlocked = unlock_all(&items);
    let mastery = MasteryMap::new();
    let ctx = QuizContext { items: &items, unlocked_ids: &unlocked, mastery: &mastery, now: now() };
    let mut rng = StdRng::seed_from_u64(10);

    let classic = RoundOptions::Classic { filter: coin_filter(), num_questions: 10 };
    let map = RoundOptions::Map { filter: coin_filter(), num_questions: 10 };
    let compare = RoundOptions::Compare { difficulty: Difficulty::Hard, num_questions: 10 };
    let attack = RoundOptions::TimeAttack { difficulty: Difficulty::Hard, duration_secs: 60 };

    assert!(matches!(compose_for_round(&ctx, &classic, &mut rng), Some(Question::Choice(_))));
    assert!(matches!(compose_for_round(&ctx, &map, &mut rng), Some(Question::Map(_))));
    assert!(matches!(compose_for_round(&ctx, &compare, &mut rng), Some(Question::Compare(_))));
    assert!(matches!(compose_for_round(&ctx, &attack, &mut rng), Some(Question::Choice(_))));
  }
}
