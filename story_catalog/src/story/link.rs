//! Auxiliary link records joined onto stories by index.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{integer, StoryIndex};

/// One row of the Wikisource lookup resource.
///
/// Both link fields may be null when the lookup found no match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikisourceLink {
    pub index: i64,
    #[serde(default)]
    pub wikisource_url: Option<String>,
    #[serde(default)]
    pub wikisource_title: Option<String>,
}

impl WikisourceLink {
    /// Create a link row with both fields set.
    pub fn new(index: i64, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            index,
            wikisource_url: Some(url.into()),
            wikisource_title: Some(title.into()),
        }
    }

    /// Decode one row leniently. Rows that are not objects or lack an
    /// integral `index` yield `None`; a link field that is not a string
    /// becomes `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let index = object.get("index").and_then(integer)?;
        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            index,
            wikisource_url: text("wikisource_url"),
            wikisource_title: text("wikisource_title"),
        })
    }

    /// The story this row attaches to.
    pub fn story_index(&self) -> StoryIndex {
        StoryIndex(self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_with_nulls() {
        let links: Vec<WikisourceLink> = serde_json::from_str(
            r#"[{"index": 1, "wikisource_url": "u", "wikisource_title": "t"},
                {"index": 2, "wikisource_url": null},
                {"index": 3}]"#,
        )
        .unwrap();

        assert_eq!(links.len(), 3);
        assert_eq!(links[0], WikisourceLink::new(1, "u", "t"));
        assert_eq!(links[1].wikisource_url, None);
        assert_eq!(links[2].wikisource_title, None);
        assert_eq!(links[2].story_index(), StoryIndex(3));
    }

    #[test]
    fn test_from_json_lenient() {
        let link = WikisourceLink::from_json(&json!({
            "index": 4.0,
            "wikisource_url": 17,
            "wikisource_title": "Esmé"
        }))
        .unwrap();
        assert_eq!(link.index, 4);
        assert_eq!(link.wikisource_url, None);
        assert_eq!(link.wikisource_title.as_deref(), Some("Esmé"));

        assert_eq!(WikisourceLink::from_json(&json!({"index": null})), None);
        assert_eq!(WikisourceLink::from_json(&json!({"index": "5"})), None);
        assert_eq!(WikisourceLink::from_json(&json!([5])), None);
    }
}
