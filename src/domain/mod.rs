pub mod item;
pub mod mastery;
pub mod question;
pub mod round;

pub use item::{Category, Difficulty, Item, Region, Tier};
pub use mastery::{MasteryMap, MasteryRecord};
pub use question::{ChoiceQuestion, CompareKind, CompareQuestion, MapQuestion, Question};
pub use round::{GameMode, GameResult, RegionFilter, RoundFilter, RoundOptions};
