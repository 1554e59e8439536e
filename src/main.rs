use chrono::Utc;
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use currency_guesser::content::Catalog;
use currency_guesser::db::{self, LogOnError};
use currency_guesser::domain::{
  Category, Difficulty, GameMode, Item, Question, RegionFilter, RoundFilter, RoundOptions,
};
use currency_guesser::progress::{AchievementUnlock, PlayerProgress};
use currency_guesser::quiz::{RoundSession, start_random_round};
use currency_guesser::config;

const USAGE: &str = "usage: currency_guesser [classic|timed|map|compare|time-attack|random] [easy|medium|hard]
       currency_guesser shop
       currency_guesser buy <pack-id>";

fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "currency_guesser=info".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
    .init();

  let mut args = std::env::args().skip(1).peekable();
  match args.peek().map(String::as_str) {
    Some("shop") => return run_shop(None),
    Some("buy") => {
      let Some(pack_id) = args.nth(1) else {
        eprintln!("{}", USAGE);
        std::process::exit(2);
      };
      return run_shop(Some(pack_id));
    }
    _ => {}
  }

  let mode = args
    .next()
    .map(|s| GameMode::from_str(&s))
    .unwrap_or(Some(GameMode::Classic));
  let difficulty = args
    .next()
    .map(|s| Difficulty::from_str(&s))
    .unwrap_or(Some(Difficulty::Easy));
  let (Some(mode), Some(difficulty)) = (mode, difficulty) else {
    eprintln!("{}", USAGE);
    std::process::exit(2);
  };

  let (catalog, pool, mut progress) = load_player();

  let mut rng = rand::rng();
  let mut session = match mode {
    GameMode::Random => start_random_round(difficulty, &mut rng),
    other => RoundSession::new(default_options(other, difficulty)),
  };

  println!(
    "{} round, {} difficulty. {} coins. Type q to leave.",
    session.mode().as_str(),
    difficulty.as_str(),
    progress.coins
  );

  play_round(&mut session, &mut progress, &catalog, &pool, &mut rng);

  let result = session.result();
  if result.total_questions == 0 {
    return;
  }

  println!(
    "\nScore {} | {}/{} correct | best streak {} | +{} coins{}",
    result.score,
    result.correct_answers,
    result.total_questions,
    result.best_streak,
    result.coins_earned,
    if result.is_perfect { " | PERFECT" } else { "" }
  );

  let unlocks = progress.apply_game_result(&result, Utc::now());
  print_unlocks(&unlocks);
  save_player(&pool, &progress);
}

fn load_player() -> (Catalog, db::DbPool, PlayerProgress) {
  let catalog = match config::load_catalog_path() {
    Some(path) => Catalog::load(&path).expect("Failed to load catalog"),
    None => Catalog::builtin().expect("Built-in catalog is invalid"),
  };

  let pool = db::init_db(&config::load_database_path()).expect("Failed to initialize database");
  let progress = db::load_progress_or_default(&pool, &catalog);
  (catalog, pool, progress)
}

fn save_player(pool: &db::DbPool, progress: &PlayerProgress) {
  if let Some(conn) = db::try_lock(pool).log_warn("Could not lock progress database") {
    db::save_progress(&conn, progress, Utc::now()).log_warn("Failed to save progress");
  }
}

/// List packs, or buy one when `pack_id` is given
fn run_shop(pack_id: Option<String>) {
  let (catalog, pool, mut progress) = load_player();

  let Some(pack_id) = pack_id else {
    println!("{} coins available", progress.coins);
    for pack in catalog.packs() {
      let status = if progress.owns_pack(pack) { "owned".to_string() } else { format!("{} coins", pack.price) };
      println!("  {:<28} {:<12} {}", pack.id, status, pack.description);
    }
    return;
  };

  let Some(pack) = catalog.pack(&pack_id) else {
    eprintln!("No pack named {}", pack_id);
    std::process::exit(2);
  };

  match progress.purchase_pack(pack, Utc::now()) {
    Ok(unlocks) => {
      println!("Unlocked {} ({} items). {} coins left.", pack.name, pack.item_ids.len(), progress.coins);
      print_unlocks(&unlocks);
      save_player(&pool, &progress);
    }
    Err(e) => println!("Cannot buy {}: {}", pack.name, e),
  }
}

fn default_options(mode: GameMode, difficulty: Difficulty) -> RoundOptions {
  let filter = RoundFilter::new(Category::Coin, RegionFilter::All, difficulty);
  match mode {
    GameMode::Timed => RoundOptions::Timed { filter, duration_secs: 60 },
    GameMode::Map => RoundOptions::Map { filter, num_questions: 10 },
    GameMode::Compare => RoundOptions::Compare { difficulty, num_questions: 10 },
    GameMode::TimeAttack => RoundOptions::TimeAttack { difficulty, duration_secs: 60 },
    GameMode::Classic | GameMode::Random => RoundOptions::Classic { filter, num_questions: 10 },
  }
}

/// Wall clock feeding one-second ticks into the round
struct RoundClock {
  last: Instant,
  carry: Duration,
}

impl RoundClock {
  fn new() -> Self {
    Self {
      last: Instant::now(),
      carry: Duration::ZERO,
    }
  }

  fn catch_up(&mut self, session: &mut RoundSession) {
    let now = Instant::now();
    self.carry += now - self.last;
    self.last = now;
    while self.carry >= Duration::from_secs(1) && !session.is_complete() {
      self.carry -= Duration::from_secs(1);
      session.tick();
    }
  }
}

fn play_round<R: rand::Rng + ?Sized>(
  session: &mut RoundSession,
  progress: &mut PlayerProgress,
  catalog: &Catalog,
  pool: &db::DbPool,
  rng: &mut R,
) {
  let stdin = io::stdin();
  let mut lines = stdin.lock().lines();
  let mut clock = RoundClock::new();

  while !session.is_complete() {
    clock.catch_up(session);
    if session.is_complete() {
      break;
    }

    let ctx = progress.quiz_context(catalog.items(), Utc::now());
    let answered = session.answered();
    let question = match session.next_question(&ctx, rng) {
      Ok(Some(q)) => q.clone(),
      Ok(None) => {
        println!("{}", no_question_message(answered));
        session.abandon();
        return;
      }
      Err(e) => {
        tracing::warn!("Could not compose question: {}", e);
        return;
      }
    };

    let choices = render_question(&question, session);
    print!("> ");
    io::stdout().flush().ok();

    let Some(Ok(line)) = lines.next() else {
      session.abandon();
      return;
    };
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
      session.abandon();
      return;
    }

    clock.catch_up(session);
    if session.is_complete() {
      println!("Time's up!");
      break;
    }

    let answer = resolve_answer(line, &choices, &question, catalog);
    let outcome = match session.submit_answer(&answer) {
      Ok(outcome) => outcome,
      Err(e) => {
        tracing::warn!("Answer rejected: {}", e);
        continue;
      }
    };

    if let Some(item_id) = &outcome.tracked_item {
      progress.record_attempt(item_id, outcome.was_correct, Utc::now());
      let conn = db::try_lock(pool).log_warn("Could not lock progress database");
      if let (Some(record), Some(conn)) = (progress.mastery.get(item_id), conn) {
        db::save_mastery_record(&conn, item_id, record).log_warn("Failed to save mastery record");
      }
    }

    if outcome.was_correct {
      println!("Correct! +{} points, +{} coins", outcome.points, outcome.coins);
    } else {
      println!("Wrong. The answer was {}", describe_answer(&question, catalog));
    }

    std::thread::sleep(Duration::from_millis(config::FEEDBACK_HOLD_MS));
    if session.is_complete() {
      break;
    }
    if let Err(e) = session.advance() {
      tracing::warn!("Could not advance round: {}", e);
      return;
    }
  }
}

/// Why a round stopped when no question could be composed
fn no_question_message(answered: u32) -> &'static str {
  if answered == 0 {
    "Not enough unlocked currencies for this round. Try other settings or buy a pack."
  } else {
    "No further question could be composed, so the round ended early."
  }
}

/// Print the question and return the answer token behind each numbered choice
fn render_question(question: &Question, session: &RoundSession) -> Vec<String> {
  let header = match session.remaining_secs() {
    Some(secs) => format!("[{}s left | score {}]", secs, session.score()),
    None => format!("[#{} | score {}]", session.answered() + 1, session.score()),
  };
  println!("\n{}", header);

  match question {
    Question::Choice(q) => {
      println!("Which currency is shown in {}?", q.image_url);
      numbered(q.options.iter().map(|o| (o.id.clone(), item_label(o))))
    }
    Question::Map(q) => {
      println!("Where is the {} from? Type the country name or code.", q.correct_answer.name);
      Vec::new()
    }
    Question::Compare(q) => {
      println!("{}", q.question_text);
      match &q.options {
        Some(options) => numbered(options.iter().map(|o| (o.clone(), o.clone()))),
        None => numbered(q.items.iter().map(|i| (i.id.clone(), i.name.clone()))),
      }
    }
  }
}

fn numbered<I: Iterator<Item = (String, String)>>(choices: I) -> Vec<String> {
  choices
    .enumerate()
    .map(|(i, (token, label))| {
      println!("  {}) {}", i + 1, label);
      token
    })
    .collect()
}

fn item_label(item: &Item) -> String {
  format!("{} ({})", item.name, item.country_name)
}

fn resolve_answer(line: &str, choices: &[String], question: &Question, catalog: &Catalog) -> String {
  if let Ok(n) = line.parse::<usize>() {
    if let Some(token) = n.checked_sub(1).and_then(|i| choices.get(i)) {
      return token.clone();
    }
  }

  if let Question::Map(_) = question {
    if let Some(item) = catalog
      .items()
      .iter()
      .find(|i| i.country_name.eq_ignore_ascii_case(line))
    {
      return item.country_code.clone();
    }
  }

  line.to_string()
}

fn describe_answer(question: &Question, catalog: &Catalog) -> String {
  match question {
    Question::Choice(q) => item_label(&q.correct_answer),
    Question::Map(q) => q.correct_answer.country_name.clone(),
    Question::Compare(q) => catalog
      .get(&q.correct_answer)
      .map(item_label)
      .unwrap_or_else(|| q.correct_answer.clone()),
  }
}

fn print_unlocks(unlocks: &[AchievementUnlock]) {
  for unlock in unlocks {
    println!(
      "Achievement unlocked: {} ({}) +{} coins",
      unlock.name,
      unlock.tier.as_str(),
      unlock.reward
    );
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_no_question_message_depends_on_progress() {
    assert!(no_question_message(0).contains("Not enough unlocked currencies"));
    assert!(no_question_message(4).contains("ended early"));
    assert!(!no_question_message(4).contains("unlocked"));
  }
}
