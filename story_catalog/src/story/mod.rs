//! Story records - the unit of the browsable collection.

mod fields;
mod link;

pub use fields::*;
pub use link::*;

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Identifier assigned by the data source. Join key and sort tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StoryIndex(pub i64);

impl std::fmt::Display for StoryIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons a primary record cannot become a [`Story`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no integer `index`")]
    MissingIndex,
}

/// A unified story record: primary attributes plus joined link data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Story {
    pub index: StoryIndex,
    pub title: String,
    pub notes: Option<String>,
    pub href: String,

    pub rating_story: Option<f64>,
    pub darkness_level: Option<f64>,
    pub body_count: Option<f64>,

    pub tone: Option<String>,
    pub setting: Option<String>,
    pub ending_type: Option<String>,
    pub central_mechanism: Option<String>,
    pub protagonist_type: Option<String>,
    pub agency_driver: Option<String>,

    pub social_target: Vec<String>,
    pub constraint_pressure: Vec<String>,

    /// `theme_*` flags. Anything other than JSON `true` is stored as `false`.
    #[serde(flatten)]
    pub themes: BTreeMap<String, bool>,

    pub wikisource_url: Option<String>,
    pub wikisource_title: Option<String>,

    /// Fields outside the known shape, kept for generic access.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,

    /// Array-valued fields outside the known shape, elements as text.
    #[serde(flatten)]
    pub extra_lists: BTreeMap<String, Vec<String>>,
}

impl Story {
    /// Create a story with the given index and title and every other field empty.
    pub fn new(index: i64, title: impl Into<String>) -> Self {
        Self {
            index: StoryIndex(index),
            title: title.into(),
            notes: None,
            href: String::new(),
            rating_story: None,
            darkness_level: None,
            body_count: None,
            tone: None,
            setting: None,
            ending_type: None,
            central_mechanism: None,
            protagonist_type: None,
            agency_driver: None,
            social_target: Vec::new(),
            constraint_pressure: Vec::new(),
            themes: BTreeMap::new(),
            wikisource_url: None,
            wikisource_title: None,
            extra: BTreeMap::new(),
            extra_lists: BTreeMap::new(),
        }
    }

    /// Set the story rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating_story = Some(rating);
        self
    }

    /// Set the darkness level.
    pub fn with_darkness(mut self, darkness: f64) -> Self {
        self.darkness_level = Some(darkness);
        self
    }

    /// Set the body count.
    pub fn with_body_count(mut self, count: f64) -> Self {
        self.body_count = Some(count);
        self
    }

    /// Attach free-text notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Set the artifact path relative to the artifact base.
    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = href.into();
        self
    }

    /// Set one categorical field.
    pub fn with_category(mut self, category: Category, value: impl Into<String>) -> Self {
        *self.category_slot_mut(category) = Some(value.into());
        self
    }

    /// Replace the values of a list field.
    pub fn with_list<I, S>(mut self, field: ListField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.list_slot_mut(field) = values.into_iter().map(Into::into).collect();
        self
    }

    /// Set a theme flag.
    pub fn with_theme(mut self, key: impl Into<String>, value: bool) -> Self {
        self.themes.insert(key.into(), value);
        self
    }

    /// Set both joined link fields.
    pub fn with_wikisource(mut self, url: Option<String>, title: Option<String>) -> Self {
        self.wikisource_url = url;
        self.wikisource_title = title;
        self
    }

    /// Decode one primary record, defaulting every field that is absent,
    /// null or of the wrong type. Only a missing `index` is rejected.
    pub fn from_json(value: &Value) -> Result<Self, RecordError> {
        let object = value.as_object().ok_or(RecordError::NotAnObject)?;
        Self::from_object(object)
    }

    /// Decode one primary record from an already-parsed JSON object.
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, RecordError> {
        let index = object
            .get("index")
            .and_then(integer)
            .ok_or(RecordError::MissingIndex)?;

        let mut story = Story::new(index, text(object.get("title")).unwrap_or_default());
        story.notes = text(object.get("notes"));
        story.href = text(object.get("href")).unwrap_or_default();
        story.rating_story = object.get("rating_story").and_then(Value::as_f64);
        story.darkness_level = object.get("darkness_level").and_then(Value::as_f64);
        story.body_count = object.get("body_count").and_then(Value::as_f64);

        for category in Category::ALL {
            *story.category_slot_mut(category) = text(object.get(category.name()));
        }
        for field in ListField::ALL {
            *story.list_slot_mut(field) = string_list(object.get(field.name()));
        }

        for (key, value) in object {
            if is_theme_key(key) {
                story.themes.insert(key.clone(), matches!(value, Value::Bool(true)));
            } else if is_known_field(key) {
                continue;
            } else if let Value::Array(items) = value {
                story
                    .extra_lists
                    .insert(key.clone(), items.iter().filter_map(list_item).collect());
            } else {
                story.extra.insert(key.clone(), value.clone());
            }
        }

        Ok(story)
    }

    /// Generic typed access by field key.
    pub fn field(&self, key: &FieldKey) -> FieldValue<'_> {
        match key {
            FieldKey::Index => FieldValue::Number(self.index.0 as f64),
            FieldKey::Title => FieldValue::Text(&self.title),
            FieldKey::Notes => opt_text(&self.notes),
            FieldKey::Href => FieldValue::Text(&self.href),
            FieldKey::Scale(scale) => match self.scale(*scale) {
                Some(n) => FieldValue::Number(n),
                None => FieldValue::Absent,
            },
            FieldKey::Category(category) => opt_text(self.category(*category)),
            FieldKey::List(field) => FieldValue::List(self.list(*field)),
            FieldKey::Theme(key) => match self.themes.get(key) {
                Some(flag) => FieldValue::Flag(*flag),
                None => FieldValue::Absent,
            },
            FieldKey::WikisourceUrl => opt_text(&self.wikisource_url),
            FieldKey::WikisourceTitle => opt_text(&self.wikisource_title),
            FieldKey::Extra(name) => match (self.extra_lists.get(name), self.extra.get(name)) {
                (Some(items), _) => FieldValue::List(items),
                (None, Some(Value::Number(n))) => n.as_f64().map_or(FieldValue::Absent, FieldValue::Number),
                (None, Some(Value::String(s))) => FieldValue::Text(s),
                (None, Some(Value::Bool(b))) => FieldValue::Flag(*b),
                _ => FieldValue::Absent,
            },
        }
    }

    /// String-keyed convenience over [`Story::field`].
    pub fn get(&self, name: &str) -> FieldValue<'_> {
        self.field(&FieldKey::parse(name))
    }

    /// Value of a numeric scale field.
    pub fn scale(&self, scale: Scale) -> Option<f64> {
        match scale {
            Scale::RatingStory => self.rating_story,
            Scale::DarknessLevel => self.darkness_level,
            Scale::BodyCount => self.body_count,
        }
    }

    /// Value of a categorical field.
    pub fn category(&self, category: Category) -> &Option<String> {
        match category {
            Category::Tone => &self.tone,
            Category::Setting => &self.setting,
            Category::EndingType => &self.ending_type,
            Category::CentralMechanism => &self.central_mechanism,
            Category::ProtagonistType => &self.protagonist_type,
            Category::AgencyDriver => &self.agency_driver,
        }
    }

    fn category_slot_mut(&mut self, category: Category) -> &mut Option<String> {
        match category {
            Category::Tone => &mut self.tone,
            Category::Setting => &mut self.setting,
            Category::EndingType => &mut self.ending_type,
            Category::CentralMechanism => &mut self.central_mechanism,
            Category::ProtagonistType => &mut self.protagonist_type,
            Category::AgencyDriver => &mut self.agency_driver,
        }
    }

    /// Values of a list field. Empty when absent.
    pub fn list(&self, field: ListField) -> &[String] {
        match field {
            ListField::SocialTarget => &self.social_target,
            ListField::ConstraintPressure => &self.constraint_pressure,
        }
    }

    fn list_slot_mut(&mut self, field: ListField) -> &mut Vec<String> {
        match field {
            ListField::SocialTarget => &mut self.social_target,
            ListField::ConstraintPressure => &mut self.constraint_pressure,
        }
    }

    /// Whether a theme flag is exactly `true`. Absent counts as `false`.
    pub fn has_theme(&self, key: &str) -> bool {
        self.themes.get(key).copied().unwrap_or(false)
    }

    /// Whether a non-empty Wikisource URL was joined onto this story.
    pub fn has_wikisource(&self) -> bool {
        self.wikisource_url.as_deref().is_some_and(|url| !url.is_empty())
    }

    /// Theme flag names present on this record, in key order.
    pub fn theme_keys(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}

fn is_known_field(key: &str) -> bool {
    !matches!(FieldKey::parse(key), FieldKey::Extra(_))
}

fn integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(format_number),
        _ => None,
    }
}

/// Text form of one element of a free-form array. Nulls and nested
/// containers are dropped.
fn list_item(item: &Value) -> Option<String> {
    match item {
        Value::Bool(b) => Some(b.to_string()),
        other => text(Some(other)),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

fn opt_text(value: &Option<String>) -> FieldValue<'_> {
    match value {
        Some(s) => FieldValue::Text(s),
        None => FieldValue::Absent,
    }
}
