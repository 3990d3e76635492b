//! Field registry - typed names for every story attribute.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix reserved for boolean theme flags.
pub const THEME_PREFIX: &str = "theme_";

/// Single-valued categorical attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tone,
    Setting,
    EndingType,
    CentralMechanism,
    ProtagonistType,
    AgencyDriver,
}

impl Category {
    /// All categories, in panel order.
    pub const ALL: [Category; 6] = [
        Category::Tone,
        Category::Setting,
        Category::EndingType,
        Category::CentralMechanism,
        Category::ProtagonistType,
        Category::AgencyDriver,
    ];

    /// The JSON field name.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Tone => "tone",
            Category::Setting => "setting",
            Category::EndingType => "ending_type",
            Category::CentralMechanism => "central_mechanism",
            Category::ProtagonistType => "protagonist_type",
            Category::AgencyDriver => "agency_driver",
        }
    }

    /// Human-readable filter group title.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Tone => "Tone",
            Category::Setting => "Setting",
            Category::EndingType => "Ending type",
            Category::CentralMechanism => "Central mechanism",
            Category::ProtagonistType => "Protagonist type",
            Category::AgencyDriver => "Agency driver",
        }
    }

    /// Look up by field name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// Multi-valued attributes holding ordered string lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListField {
    SocialTarget,
    ConstraintPressure,
}

impl ListField {
    pub const ALL: [ListField; 2] = [ListField::SocialTarget, ListField::ConstraintPressure];

    /// Field name as it appears in the data.
    pub fn name(&self) -> &'static str {
        match self {
            ListField::SocialTarget => "social_target",
            ListField::ConstraintPressure => "constraint_pressure",
        }
    }

    /// Human-readable group title.
    pub fn label(&self) -> &'static str {
        match self {
            ListField::SocialTarget => "Social target",
            ListField::ConstraintPressure => "Constraint pressure",
        }
    }

    /// Look up by field name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }
}

/// Numeric scale attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    RatingStory,
    DarknessLevel,
    BodyCount,
}

impl Scale {
    pub const ALL: [Scale; 3] = [Scale::RatingStory, Scale::DarknessLevel, Scale::BodyCount];

    /// Field name as it appears in the data.
    pub fn name(&self) -> &'static str {
        match self {
            Scale::RatingStory => "rating_story",
            Scale::DarknessLevel => "darkness_level",
            Scale::BodyCount => "body_count",
        }
    }
}

/// A typed reference to any story field.
///
/// Parsing a field name once up front replaces string-keyed lookups on
/// every comparison; names that match no known attribute fall through to
/// [`FieldKey::Theme`] (for the reserved prefix) or [`FieldKey::Extra`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Index,
    Title,
    Notes,
    Href,
    Scale(Scale),
    Category(Category),
    List(ListField),
    Theme(String),
    WikisourceUrl,
    WikisourceTitle,
    Extra(String),
}

impl FieldKey {
    /// Resolve a field name. Never fails: unknown names become `Extra`.
    pub fn parse(name: &str) -> Self {
        match name {
            "index" => FieldKey::Index,
            "title" => FieldKey::Title,
            "notes" => FieldKey::Notes,
            "href" => FieldKey::Href,
            "wikisource_url" => FieldKey::WikisourceUrl,
            "wikisource_title" => FieldKey::WikisourceTitle,
            _ => {
                if let Some(scale) = Scale::ALL.into_iter().find(|s| s.name() == name) {
                    FieldKey::Scale(scale)
                } else if let Some(category) = Category::from_name(name) {
                    FieldKey::Category(category)
                } else if let Some(list) = ListField::from_name(name) {
                    FieldKey::List(list)
                } else if is_theme_key(name) {
                    FieldKey::Theme(name.to_string())
                } else {
                    FieldKey::Extra(name.to_string())
                }
            }
        }
    }

    /// The JSON field name this key reads.
    pub fn name(&self) -> &str {
        match self {
            FieldKey::Index => "index",
            FieldKey::Title => "title",
            FieldKey::Notes => "notes",
            FieldKey::Href => "href",
            FieldKey::Scale(s) => s.name(),
            FieldKey::Category(c) => c.name(),
            FieldKey::List(l) => l.name(),
            FieldKey::Theme(name) | FieldKey::Extra(name) => name,
            FieldKey::WikisourceUrl => "wikisource_url",
            FieldKey::WikisourceTitle => "wikisource_title",
        }
    }

    /// The `rating_story` key, the default sort.
    pub fn rating() -> Self {
        FieldKey::Scale(Scale::RatingStory)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for FieldKey {
    fn from(name: &str) -> Self {
        FieldKey::parse(name)
    }
}

pub fn is_theme_key(name: &str) -> bool {
    name.starts_with(THEME_PREFIX) && name.len() > THEME_PREFIX.len()
}

/// Turn `theme_country_house_politics` into `Country House Politics`.
pub fn titleize_key(key: &str) -> String {
    let bare = key.strip_prefix(THEME_PREFIX).unwrap_or(key);
    let spaced = bare.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_word_start = true;
    for ch in spaced.chars() {
        if at_word_start && ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !(ch.is_alphanumeric() || ch == '_');
    }
    out
}

/// The value of one field on one story, borrowed from the record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Absent,
    Number(f64),
    Text(&'a str),
    Flag(bool),
    List(&'a [String]),
}

impl<'a> FieldValue<'a> {
    /// Whether the field had no value.
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// String form used for collation and display.
    ///
    /// Numbers print without a trailing `.0` when integral; lists are
    /// joined with `", "`.
    pub fn display_string(&self) -> String {
        match self {
            FieldValue::Absent => String::new(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Text(s) => (*s).to_string(),
            FieldValue::Flag(b) => b.to_string(),
            FieldValue::List(items) => items.join(", "),
        }
    }

    /// Detach a scalar from the record. `None` for absent values and lists.
    pub fn to_owned_value(&self) -> Option<OwnedValue> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Number(n) => Some(OwnedValue::Number(*n)),
            FieldValue::Text(s) => Some(OwnedValue::Text((*s).to_string())),
            FieldValue::Flag(b) => Some(OwnedValue::Flag(*b)),
            FieldValue::List(items) => Some(OwnedValue::Text(items.join(", "))),
        }
    }
}

/// A scalar field value detached from its record, used for vocabularies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnedValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl OwnedValue {
    /// Borrow as a [`FieldValue`] for comparison.
    pub fn as_field_value(&self) -> FieldValue<'_> {
        match self {
            OwnedValue::Number(n) => FieldValue::Number(*n),
            OwnedValue::Text(s) => FieldValue::Text(s),
            OwnedValue::Flag(b) => FieldValue::Flag(*b),
        }
    }

    /// The text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OwnedValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for OwnedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_field_value().display_string())
    }
}

impl From<&str> for OwnedValue {
    fn from(s: &str) -> Self {
        OwnedValue::Text(s.to_string())
    }
}

/// Format a number the way JSON would print it.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
