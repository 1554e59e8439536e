pub mod pool;
pub mod selector;
pub mod tracker;

pub use pool::filter_pool;
pub use selector::{calculate_item_weight, select_target, weighted_random_select, ItemWeight};
pub use tracker::{apply_attempt, record_attempt, review_interval};
