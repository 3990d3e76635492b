//! The loaded story collection.

use std::collections::HashSet;

use story_catalog::{Story, WikisourceLink};

use crate::error::{DegradedJoin, JoinStatus};
use crate::join::join;
use crate::query::{evaluate, FilterState, QueryResult};
use crate::vocabulary::{filter_groups, FilterGroup};

/// The joined, immutable story collection and everything derived from it
/// once at load time.
#[derive(Debug, Clone)]
pub struct Catalog {
    stories: Vec<Story>,
    theme_keys: Vec<String>,
    groups: Vec<FilterGroup>,
    join_status: JoinStatus,
}

impl Catalog {
    /// Join `primary` with `links` and derive vocabularies.
    pub fn new(primary: Vec<Story>, links: &[WikisourceLink]) -> Self {
        Self::build(join(primary, links), JoinStatus::Complete)
    }

    /// Build a catalog with every link field absent.
    pub fn degraded(primary: Vec<Story>, reason: DegradedJoin) -> Self {
        tracing::warn!(%reason, "continuing without Wikisource links");
        Self::build(join(primary, &[]), JoinStatus::Degraded(reason))
    }

    fn build(stories: Vec<Story>, join_status: JoinStatus) -> Self {
        warn_duplicate_indices(&stories);
        let theme_keys = derive_theme_keys(&stories);
        let groups = filter_groups(&stories, &theme_keys);
        tracing::info!(
            stories = stories.len(),
            themes = theme_keys.len(),
            degraded = join_status.is_degraded(),
            "catalog loaded"
        );
        Self {
            stories,
            theme_keys,
            groups,
            join_status,
        }
    }

    /// All stories in load order.
    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    /// Number of stories.
    pub fn len(&self) -> usize {
        self.stories.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// Theme flag names, taken from the first story and sorted.
    pub fn theme_keys(&self) -> &[String] {
        &self.theme_keys
    }

    /// Filter groups with counts over the full collection.
    pub fn filter_groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    /// Whether the link data made it into the join.
    pub fn join_status(&self) -> &JoinStatus {
        &self.join_status
    }

    /// Filter and sort the collection for `state`.
    pub fn evaluate(&self, state: &FilterState) -> Vec<&Story> {
        evaluate(&self.stories, state)
    }

    /// Like [`Catalog::evaluate`], with the collection size attached.
    pub fn query(&self, state: &FilterState) -> QueryResult<'_> {
        QueryResult::run(&self.stories, state)
    }
}

/// Theme vocabulary comes from the first record only; later records that
/// lack a key simply never satisfy it.
fn derive_theme_keys(stories: &[Story]) -> Vec<String> {
    let mut keys: Vec<String> = stories
        .first()
        .map(|first| first.theme_keys().map(str::to_string).collect())
        .unwrap_or_default();
    keys.sort_by(|a, b| crate::compare::natural_cmp(a, b).then_with(|| a.cmp(b)));
    keys
}

fn warn_duplicate_indices(stories: &[Story]) {
    let mut seen = HashSet::with_capacity(stories.len());
    for story in stories {
        if !seen.insert(story.index) {
            tracing::warn!(index = %story.index, title = %story.title, "duplicate story index");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::LinkFilter;
    use crate::vocabulary::GroupKind;

    fn stories() -> Vec<Story> {
        vec![
            Story::new(1, "first")
                .with_rating(4.0)
                .with_theme("theme_zoo", false)
                .with_theme("theme_animals", true),
            Story::new(2, "second")
                .with_rating(3.0)
                .with_theme("theme_animals", false)
                .with_theme("theme_late_only", true),
        ]
    }

    #[test]
    fn test_theme_keys_from_first_record() {
        let catalog = Catalog::new(stories(), &[]);
        assert_eq!(catalog.theme_keys(), ["theme_animals", "theme_zoo"]);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = Catalog::new(Vec::new(), &[]);
        assert!(catalog.is_empty());
        assert!(catalog.theme_keys().is_empty());
        assert!(catalog.evaluate(&FilterState::new()).is_empty());
    }

    #[test]
    fn test_complete_join() {
        let links = vec![WikisourceLink::new(2, "https://w/2", "Second")];
        let catalog = Catalog::new(stories(), &links);
        assert_eq!(catalog.join_status(), &JoinStatus::Complete);
        let linked = catalog.evaluate(&FilterState::new().with_wikisource(LinkFilter::Yes));
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].index.0, 2);
    }

    #[test]
    fn test_degraded_catalog_stays_usable() {
        let catalog = Catalog::degraded(stories(), DegradedJoin::NotProvided);
        assert!(catalog.join_status().is_degraded());
        assert_eq!(catalog.len(), 2);
        assert!(catalog.stories().iter().all(|s| s.wikisource_url.is_none()));
        assert_eq!(catalog.query(&FilterState::new()).status_line(), "2 / 2 stories");
    }

    #[test]
    fn test_groups_computed_from_full_collection() {
        let catalog = Catalog::new(stories(), &[]);
        let themes = catalog
            .filter_groups()
            .iter()
            .find(|g| g.kind == GroupKind::Themes)
            .unwrap();
        let labels: Vec<_> = themes.options.iter().map(|o| (o.label.as_str(), o.count)).collect();
        assert_eq!(labels, vec![("Animals", 1), ("Zoo", 0)]);
    }
}
