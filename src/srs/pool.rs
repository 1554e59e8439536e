//! Narrowing the catalog to the items eligible for a round.

use std::collections::HashSet;

use crate::domain::{Item, RoundFilter};

/// Items that are unlocked and match the round filter, in catalog order.
///
/// Returns an empty list rather than failing when nothing matches; callers
/// check the length against what their question shape needs.
pub fn filter_pool<'a, I>(items: I, unlocked_ids: &HashSet<String>, filter: &RoundFilter) -> Vec<&'a Item>
where
  I: IntoIterator<Item = &'a Item>,
{
  items
    .into_iter()
    .filter(|item| unlocked_ids.contains(&item.id) && filter.matches(item))
    .collect()
}
