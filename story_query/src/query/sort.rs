//! Stable ordering by one field with an index tie-break.

use std::cmp::Ordering;

use story_catalog::{SortDirection, Story};

use super::SortSpec;
use crate::compare::compare_values;

/// Compare two stories under `order`.
///
/// Direction applies to the primary key only; ties always fall back to
/// ascending `index`, so the result does not depend on input order.
pub fn compare_stories(a: &Story, b: &Story, order: &SortSpec) -> Ordering {
    let primary = compare_values(&a.field(&order.key), &b.field(&order.key));
    let primary = match order.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| a.index.cmp(&b.index))
}

/// Sort story references in place. The sort is stable.
///
/// List fields order by their comma-joined form, not element by element.
pub fn sort_stories(stories: &mut [&Story], order: &SortSpec) {
    stories.sort_by(|a, b| compare_stories(a, b, order));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use story_catalog::{Category, ListField};

    fn indices(stories: &[&Story]) -> Vec<i64> {
        stories.iter().map(|s| s.index.0).collect()
    }

    #[test]
    fn test_sort_by_rating_desc() {
        let records = [
            Story::new(1, "a").with_rating(2.0),
            Story::new(2, "b").with_rating(5.0),
            Story::new(3, "c").with_rating(3.0),
        ];
        let mut refs: Vec<&Story> = records.iter().collect();
        sort_stories(&mut refs, &SortSpec::desc("rating_story"));
        assert_eq!(indices(&refs), vec![2, 3, 1]);
    }

    #[test]
    fn test_tie_break_ascending_in_both_directions() {
        let records = [
            Story::new(9, "x").with_rating(4.0),
            Story::new(3, "y").with_rating(4.0),
            Story::new(5, "z").with_rating(1.0),
        ];
        let mut refs: Vec<&Story> = records.iter().collect();

        sort_stories(&mut refs, &SortSpec::desc("rating_story"));
        assert_eq!(indices(&refs), vec![3, 9, 5]);

        sort_stories(&mut refs, &SortSpec::asc("rating_story"));
        assert_eq!(indices(&refs), vec![5, 3, 9]);
    }

    #[test]
    fn test_absent_values_sort_first_ascending() {
        let records = [
            Story::new(1, "a").with_category(Category::Setting, "village"),
            Story::new(2, "b"),
            Story::new(3, "c").with_category(Category::Setting, "country_house"),
        ];
        let mut refs: Vec<&Story> = records.iter().collect();
        sort_stories(&mut refs, &SortSpec::asc("setting"));
        assert_eq!(indices(&refs), vec![2, 3, 1]);
    }

    #[test]
    fn test_list_field_sorts_by_joined_string() {
        let records = [
            Story::new(1, "a").with_list(ListField::SocialTarget, ["aunt", "vicar"]),
            Story::new(2, "b").with_list(ListField::SocialTarget, ["aunt"]),
            Story::new(3, "c").with_list(ListField::SocialTarget, ["aunt", "bishop"]),
        ];
        let mut refs: Vec<&Story> = records.iter().collect();
        sort_stories(&mut refs, &SortSpec::asc("social_target"));
        assert_eq!(indices(&refs), vec![2, 3, 1]);
    }

    #[test]
    fn test_extra_array_sorts_by_joined_string() {
        let records: Vec<Story> = [
            json!({"index": 1, "recurring": ["reginald", "clovis"]}),
            json!({"index": 2, "recurring": ["comus"]}),
            json!({"index": 3, "recurring": ["clovis"]}),
            json!({"index": 4}),
        ]
        .iter()
        .map(|v| Story::from_json(v).unwrap())
        .collect();
        let mut refs: Vec<&Story> = records.iter().collect();
        sort_stories(&mut refs, &SortSpec::asc("recurring"));
        assert_eq!(indices(&refs), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_sort_by_index() {
        let records = [Story::new(2, "a"), Story::new(10, "b"), Story::new(1, "c")];
        let mut refs: Vec<&Story> = records.iter().collect();
        sort_stories(&mut refs, &SortSpec::desc("index"));
        assert_eq!(indices(&refs), vec![10, 2, 1]);
    }

    #[test]
    fn test_title_natural_order() {
        let records = [Story::new(1, "Part 10"), Story::new(2, "part 2"), Story::new(3, "Part 1")];
        let mut refs: Vec<&Story> = records.iter().collect();
        sort_stories(&mut refs, &SortSpec::asc("title"));
        assert_eq!(indices(&refs), vec![3, 2, 1]);
    }

    fn records_strategy() -> impl Strategy<Value = Vec<Story>> {
        prop::collection::vec((1u8..6, prop::option::of("[a-c]{1,2}")), 0..24).prop_map(
            |rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, (rating, tone))| {
                        let story = Story::new(i as i64, format!("s{i}")).with_rating(rating as f64);
                        match tone {
                            Some(tone) => story.with_category(Category::Tone, tone),
                            None => story,
                        }
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_sort_is_idempotent_and_order_independent(
            records in records_strategy(),
            desc in any::<bool>(),
            by_tone in any::<bool>(),
        ) {
            let key = if by_tone { "tone" } else { "rating_story" };
            let order = if desc { SortSpec::desc(key) } else { SortSpec::asc(key) };

            let mut forward: Vec<&Story> = records.iter().collect();
            sort_stories(&mut forward, &order);
            let once = indices(&forward);

            sort_stories(&mut forward, &order);
            prop_assert_eq!(&indices(&forward), &once);

            let mut backward: Vec<&Story> = records.iter().rev().collect();
            sort_stories(&mut backward, &order);
            prop_assert_eq!(&indices(&backward), &once);
        }

        #[test]
        fn prop_ties_ascend_by_index(records in records_strategy(), desc in any::<bool>()) {
            let order = if desc { SortSpec::desc("rating_story") } else { SortSpec::asc("rating_story") };
            let mut refs: Vec<&Story> = records.iter().collect();
            sort_stories(&mut refs, &order);
            for pair in refs.windows(2) {
                if pair[0].rating_story == pair[1].rating_story {
                    prop_assert!(pair[0].index < pair[1].index);
                }
            }
        }
    }
}
