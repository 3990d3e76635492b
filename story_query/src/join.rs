//! Record joiner - attaches auxiliary link data to stories by index.

use std::collections::HashMap;

use story_catalog::{Story, StoryIndex, WikisourceLink};

/// Left outer join of `primary` with `auxiliary` on `index`.
///
/// Every primary story survives. Stories without a matching link row get
/// `None` for both link fields. When `auxiliary` holds the same index more
/// than once the last row wins.
pub fn join(primary: Vec<Story>, auxiliary: &[WikisourceLink]) -> Vec<Story> {
    let mut by_index: HashMap<StoryIndex, &WikisourceLink> = HashMap::with_capacity(auxiliary.len());
    for link in auxiliary {
        if by_index.insert(link.story_index(), link).is_some() {
            tracing::debug!(index = link.index, "duplicate link row, keeping the later one");
        }
    }

    primary
        .into_iter()
        .map(|mut story| {
            let link = by_index.get(&story.index);
            story.wikisource_url = link.and_then(|l| l.wikisource_url.clone());
            story.wikisource_title = link.and_then(|l| l.wikisource_title.clone());
            story
        })
        .collect()
}
