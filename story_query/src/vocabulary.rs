//! Filter vocabularies - the distinct values a field takes across the
//! collection, and how many stories carry each one.

use serde::Serialize;
use std::collections::HashSet;

use story_catalog::{titleize_key, Category, FieldKey, FieldValue, ListField, OwnedValue, Story};

use crate::compare::compare_values;
use crate::query::LinkFilter;

/// Hashable identity of a scalar value, used for deduplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DedupKey<'a> {
    Number(u64),
    Text(&'a str),
    Flag(bool),
}

impl<'a> DedupKey<'a> {
    fn of(value: &FieldValue<'a>) -> Option<Self> {
        match value {
            // Adding zero folds -0.0 into 0.0.
            FieldValue::Number(n) => Some(DedupKey::Number((n + 0.0).to_bits())),
            FieldValue::Text(s) => Some(DedupKey::Text(*s)),
            FieldValue::Flag(b) => Some(DedupKey::Flag(*b)),
            FieldValue::Absent | FieldValue::List(_) => None,
        }
    }
}

/// Every present scalar a field yields on a story. List fields yield each element.
fn scalars<'a>(story: &'a Story, field: &FieldKey) -> Vec<FieldValue<'a>> {
    match story.field(field) {
        FieldValue::Absent => Vec::new(),
        FieldValue::List(items) => items.iter().map(|s| FieldValue::Text(s)).collect(),
        scalar => vec![scalar],
    }
}

/// Distinct values of `values`, absent entries dropped, ordered by [`compare_values`].
pub fn distinct_sorted_values<'a, I>(values: I) -> Vec<FieldValue<'a>>
where
    I: IntoIterator<Item = FieldValue<'a>>,
{
    let mut seen = HashSet::new();
    let mut distinct: Vec<FieldValue<'a>> = values
        .into_iter()
        .filter(|v| DedupKey::of(v).is_some_and(|key| seen.insert(key)))
        .collect();
    distinct.sort_by(compare_values);
    distinct
}

/// Distinct values of `field` across `records`, sorted. List fields are flattened.
pub fn distinct_sorted(records: &[Story], field: &FieldKey) -> Vec<OwnedValue> {
    distinct_sorted_values(records.iter().flat_map(|story| scalars(story, field)))
        .iter()
        .filter_map(FieldValue::to_owned_value)
        .collect()
}

/// Number of stories whose `field` equals `value`, or whose list field contains it.
pub fn count_matches(records: &[Story], field: &FieldKey, value: &OwnedValue) -> usize {
    let wanted = value.as_field_value();
    records
        .iter()
        .filter(|story| scalars(story, field).contains(&wanted))
        .count()
}

/// One checkbox or radio entry in a filter group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOption {
    pub value: OwnedValue,
    pub label: String,
    pub count: usize,
}

/// Which part of the filter state a group drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupKind {
    Category(Category),
    List(ListField),
    Themes,
    Wikisource,
}

/// A titled set of options with counts over the full collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterGroup {
    pub kind: GroupKind,
    pub title: String,
    pub options: Vec<FilterOption>,
}

fn value_options(records: &[Story], field: &FieldKey) -> Vec<FilterOption> {
    distinct_sorted(records, field)
        .into_iter()
        .map(|value| FilterOption {
            label: value.to_string(),
            count: count_matches(records, field, &value),
            value,
        })
        .collect()
}

/// Build every filter group: categories, list fields, required themes and
/// the Wikisource tri-state. Counts ignore the current filter state.
pub fn filter_groups(records: &[Story], theme_keys: &[String]) -> Vec<FilterGroup> {
    let mut groups = Vec::new();

    for category in Category::ALL {
        groups.push(FilterGroup {
            kind: GroupKind::Category(category),
            title: category.label().to_string(),
            options: value_options(records, &FieldKey::Category(category)),
        });
    }

    for list in ListField::ALL {
        groups.push(FilterGroup {
            kind: GroupKind::List(list),
            title: list.label().to_string(),
            options: value_options(records, &FieldKey::List(list)),
        });
    }

    groups.push(FilterGroup {
        kind: GroupKind::Themes,
        title: "Themes (must be true)".to_string(),
        options: theme_keys
            .iter()
            .map(|key| FilterOption {
                value: OwnedValue::Text(key.clone()),
                label: titleize_key(key),
                count: count_matches(records, &FieldKey::Theme(key.clone()), &OwnedValue::Flag(true)),
            })
            .collect(),
    });

    let linked = records.iter().filter(|s| s.has_wikisource()).count();
    groups.push(FilterGroup {
        kind: GroupKind::Wikisource,
        title: "Wikisource".to_string(),
        options: LinkFilter::ALL
            .into_iter()
            .map(|filter| FilterOption {
                value: OwnedValue::Text(filter.as_str().to_string()),
                label: filter.label().to_string(),
                count: match filter {
                    LinkFilter::Any => records.len(),
                    LinkFilter::Yes => linked,
                    LinkFilter::No => records.len() - linked,
                },
            })
            .collect(),
    });

    groups
}
