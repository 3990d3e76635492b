//! Filter and sort state.
//!
//! `FilterState` is an immutable value: every transition consumes a state
//! and returns the next one, so a caller can keep the previous state around
//! and the engine never observes a half-applied change.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use story_catalog::{Category, FieldKey, ListField, SortDirection, StateDefaults};

/// Tri-state filter on the presence of a Wikisource link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LinkFilter {
    #[default]
    Any,
    Yes,
    No,
}

impl LinkFilter {
    pub const ALL: [LinkFilter; 3] = [LinkFilter::Any, LinkFilter::Yes, LinkFilter::No];

    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkFilter::Any => "any",
            LinkFilter::Yes => "yes",
            LinkFilter::No => "no",
        }
    }

    /// Option label shown in the filter panel.
    pub fn label(&self) -> &'static str {
        match self {
            LinkFilter::Any => "Any",
            LinkFilter::Yes => "Has Wikisource link",
            LinkFilter::No => "Missing Wikisource link",
        }
    }
}

impl FromStr for LinkFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LinkFilter::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("expected one of any, yes, no; got `{}`", s))
    }
}

/// The sort key and its direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: FieldKey,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort by `key`.
    pub fn asc(key: impl Into<FieldKey>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort by `key`.
    pub fn desc(key: impl Into<FieldKey>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Direction a freshly chosen column starts in: descending for the
    /// rating, ascending for everything else.
    pub fn initial_direction(key: &FieldKey) -> SortDirection {
        if *key == FieldKey::rating() {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec::desc(FieldKey::rating())
    }
}

/// Everything that decides which stories are shown and in what order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub search: String,
    /// Inclusive lower bound on `rating_story`.
    pub min_rating: f64,
    /// Inclusive upper bound on `darkness_level`.
    pub max_darkness: f64,
    pub sort: SortSpec,
    /// Selected values per category. Empty or missing means unconstrained.
    pub categories: BTreeMap<Category, BTreeSet<String>>,
    /// Selected values per list field. Empty or missing means unconstrained.
    pub lists: BTreeMap<ListField, BTreeSet<String>>,
    /// Theme keys that must be `true`.
    pub themes_required: BTreeSet<String>,
    pub wikisource: LinkFilter,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            min_rating: 1.0,
            max_darkness: 5.0,
            sort: SortSpec::default(),
            categories: BTreeMap::new(),
            lists: BTreeMap::new(),
            themes_required: BTreeSet::new(),
            wikisource: LinkFilter::Any,
        }
    }
}

impl FilterState {
    /// The default state: everything shown, best rated first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state from configured defaults.
    pub fn from_defaults(defaults: &StateDefaults) -> Self {
        Self {
            min_rating: defaults.min_rating,
            max_darkness: defaults.max_darkness,
            sort: SortSpec {
                key: defaults.sort_field(),
                direction: defaults.sort_dir,
            },
            ..Self::default()
        }
    }

    /// Set the free-text query.
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = query.into();
        self
    }

    /// Set the inclusive rating floor.
    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = min_rating;
        self
    }

    /// Set the inclusive darkness ceiling.
    pub fn with_max_darkness(mut self, max_darkness: f64) -> Self {
        self.max_darkness = max_darkness;
        self
    }

    /// Replace the sort key and direction.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    /// Set the link presence filter.
    pub fn with_wikisource(mut self, filter: LinkFilter) -> Self {
        self.wikisource = filter;
        self
    }

    /// Check or uncheck one category value.
    pub fn toggle_category(mut self, category: Category, value: impl Into<String>, checked: bool) -> Self {
        toggle(self.categories.entry(category).or_default(), value.into(), checked);
        self
    }

    /// Check or uncheck one list-field value.
    pub fn toggle_list(mut self, field: ListField, value: impl Into<String>, checked: bool) -> Self {
        toggle(self.lists.entry(field).or_default(), value.into(), checked);
        self
    }

    /// Require (or stop requiring) a theme flag.
    pub fn toggle_theme(mut self, key: impl Into<String>, checked: bool) -> Self {
        toggle(&mut self.themes_required, key.into(), checked);
        self
    }

    /// A click on a sortable column header: the active column flips its
    /// direction, any other column becomes active in its initial direction.
    pub fn click_column(mut self, key: FieldKey) -> Self {
        if self.sort.key == key {
            self.sort.direction = self.sort.direction.flipped();
        } else {
            self.sort.direction = SortSpec::initial_direction(&key);
            self.sort.key = key;
        }
        self
    }

    /// Reverse the current sort direction.
    pub fn flip_direction(mut self) -> Self {
        self.sort.direction = self.sort.direction.flipped();
        self
    }

    /// Back to the given defaults with every selection cleared.
    pub fn reset(self, defaults: &StateDefaults) -> Self {
        Self::from_defaults(defaults)
    }

    /// Selected values for a category, or `None` when unconstrained.
    pub fn selected_categories(&self, category: Category) -> Option<&BTreeSet<String>> {
        self.categories.get(&category).filter(|set| !set.is_empty())
    }

    /// Selected values for a list field, or `None` when unconstrained.
    pub fn selected_list_values(&self, field: ListField) -> Option<&BTreeSet<String>> {
        self.lists.get(&field).filter(|set| !set.is_empty())
    }
}

fn toggle(set: &mut BTreeSet<String>, value: String, checked: bool) {
    if checked {
        set.insert(value);
    } else {
        set.remove(&value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = FilterState::new();
        assert_eq!(state.min_rating, 1.0);
        assert_eq!(state.max_darkness, 5.0);
        assert_eq!(state.sort, SortSpec::desc("rating_story"));
        assert_eq!(state.wikisource, LinkFilter::Any);
        assert_eq!(FilterState::from_defaults(&StateDefaults::default()), state);
    }

    #[test]
    fn test_toggles() {
        let state = FilterState::new()
            .toggle_category(Category::Tone, "grim", true)
            .toggle_category(Category::Tone, "light", true)
            .toggle_category(Category::Tone, "grim", false)
            .toggle_list(ListField::SocialTarget, "aunt", true)
            .toggle_theme("theme_animals", true);

        let tones = state.selected_categories(Category::Tone).unwrap();
        assert_eq!(tones.iter().collect::<Vec<_>>(), vec!["light"]);
        assert!(state.selected_list_values(ListField::SocialTarget).unwrap().contains("aunt"));
        assert!(state.themes_required.contains("theme_animals"));
        assert!(state.selected_categories(Category::Setting).is_none());
    }

    #[test]
    fn test_emptied_selection_is_unconstrained() {
        let state = FilterState::new()
            .toggle_category(Category::Tone, "grim", true)
            .toggle_category(Category::Tone, "grim", false);
        assert!(state.selected_categories(Category::Tone).is_none());
    }

    #[test]
    fn test_click_column() {
        let state = FilterState::new().click_column(FieldKey::rating());
        assert_eq!(state.sort, SortSpec::asc("rating_story"));

        let state = state.click_column(FieldKey::Title);
        assert_eq!(state.sort, SortSpec::asc("title"));

        let state = state.click_column(FieldKey::Title);
        assert_eq!(state.sort, SortSpec::desc("title"));

        let state = state.click_column(FieldKey::rating());
        assert_eq!(state.sort, SortSpec::desc("rating_story"));
    }

    #[test]
    fn test_reset() {
        let defaults = StateDefaults::default();
        let state = FilterState::new()
            .with_search("wolf")
            .with_min_rating(4.0)
            .toggle_theme("theme_animals", true)
            .with_wikisource(LinkFilter::No)
            .flip_direction()
            .reset(&defaults);
        assert_eq!(state, FilterState::from_defaults(&defaults));
    }

    #[test]
    fn test_link_filter_parse() {
        assert_eq!("YES".parse::<LinkFilter>(), Ok(LinkFilter::Yes));
        assert!("maybe".parse::<LinkFilter>().is_err());
    }
}
