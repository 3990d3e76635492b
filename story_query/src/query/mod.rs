//! Query pipeline - filter then sort, re-derived from scratch on every state.
//!
//! The pipeline works as follows:
//! 1. **Compile**: normalize the filter state into a predicate
//! 2. **Filter**: keep the stories that pass every clause
//! 3. **Sort**: order the survivors by the sort key, ties by index
//!
//! Nothing is cached between calls, so a result can never be stale with
//! respect to the state it was computed from.

mod predicate;
mod sort;
mod state;

pub use predicate::*;
pub use sort::*;
pub use state::*;

use story_catalog::Story;

/// Filter and order `records` according to `state`. Never fails; an empty
/// result simply means nothing matched.
pub fn evaluate<'a>(records: &'a [Story], state: &FilterState) -> Vec<&'a Story> {
    let predicate = build_predicate(state);
    let mut matched: Vec<&Story> = records.iter().filter(|story| predicate(*story)).collect();
    sort_stories(&mut matched, &state.sort);
    tracing::debug!(matched = matched.len(), total = records.len(), sort = %state.sort.key, "evaluated query");
    matched
}

/// An evaluated query together with the size of the collection it ran over.
#[derive(Debug, Clone)]
pub struct QueryResult<'a> {
    pub stories: Vec<&'a Story>,
    pub total: usize,
}

impl<'a> QueryResult<'a> {
    /// Evaluate `state` over `records`.
    pub fn run(records: &'a [Story], state: &FilterState) -> Self {
        Self {
            stories: evaluate(records, state),
            total: records.len(),
        }
    }

    /// Number of stories that passed the filter.
    pub fn matched(&self) -> usize {
        self.stories.len()
    }

    /// Status line in the form `"12 / 135 stories"`.
    pub fn status_line(&self) -> String {
        format!("{} / {} stories", self.matched(), self.total)
    }
}
