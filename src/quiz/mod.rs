pub mod composer;
pub mod random_mode;
pub mod session;

pub use composer::{
  QuizContext, compose_for_round, generate_compare_question, generate_map_question, generate_question,
};
pub use random_mode::{pick_random_round, start_random_round};
pub use session::{AnswerOutcome, Bonus, RoundError, RoundPhase, RoundSession};
