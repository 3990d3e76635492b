//! Predicate composition - the conjunction of every active filter clause.

use story_catalog::{Category, ListField, Story};

use super::{FilterState, LinkFilter};

/// A filter state prepared for repeated matching.
///
/// The search query is normalized once; clauses are checked in a fixed
/// order and the first failing clause short-circuits.
#[derive(Debug)]
pub struct CompiledFilter<'s> {
    state: &'s FilterState,
    query: Option<String>,
}

impl<'s> CompiledFilter<'s> {
    pub fn new(state: &'s FilterState) -> Self {
        let query = state.search.trim().to_lowercase();
        Self {
            state,
            query: (!query.is_empty()).then_some(query),
        }
    }

    pub fn matches(&self, story: &Story) -> bool {
        self.passes_ranges(story)
            && self.passes_search(story)
            && self.passes_categories(story)
            && self.passes_lists(story)
            && self.passes_themes(story)
            && self.passes_link(story)
    }

    /// A story without a value for a bound is not excluded by that bound.
    fn passes_ranges(&self, story: &Story) -> bool {
        story.rating_story.map_or(true, |r| r >= self.state.min_rating)
            && story.darkness_level.map_or(true, |d| d <= self.state.max_darkness)
    }

    fn passes_search(&self, story: &Story) -> bool {
        let Some(query) = &self.query else {
            return true;
        };
        let haystack = format!("{}\n{}", story.title, story.notes.as_deref().unwrap_or(""));
        haystack.to_lowercase().contains(query.as_str())
    }

    fn passes_categories(&self, story: &Story) -> bool {
        Category::ALL.into_iter().all(|category| {
            match self.state.selected_categories(category) {
                None => true,
                Some(selected) => story
                    .category(category)
                    .as_ref()
                    .is_some_and(|value| selected.contains(value)),
            }
        })
    }

    fn passes_lists(&self, story: &Story) -> bool {
        ListField::ALL.into_iter().all(|field| {
            match self.state.selected_list_values(field) {
                None => true,
                Some(selected) => story.list(field).iter().any(|value| selected.contains(value)),
            }
        })
    }

    fn passes_themes(&self, story: &Story) -> bool {
        self.state
            .themes_required
            .iter()
            .all(|key| story.has_theme(key))
    }

    fn passes_link(&self, story: &Story) -> bool {
        match self.state.wikisource {
            LinkFilter::Any => true,
            LinkFilter::Yes => story.has_wikisource(),
            LinkFilter::No => !story.has_wikisource(),
        }
    }
}

/// Build the combined predicate for `state`.
pub fn build_predicate(state: &FilterState) -> impl Fn(&Story) -> bool + '_ {
    let compiled = CompiledFilter::new(state);
    move |story: &Story| compiled.matches(story)
}
