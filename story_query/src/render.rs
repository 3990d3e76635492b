//! Table rendering - column definitions and per-cell display values.
//!
//! Every function here is a pure function of its inputs; output formats
//! (plain text, HTML, JSON) build on [`Cell`].

use serde::Serialize;
use std::fmt;

use story_catalog::{format_number, Category, FieldKey, FieldValue, Scale, Severity, Story};

/// Placeholder shown for empty values.
pub const PLACEHOLDER: &str = "—";

/// What a column displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKey {
    Field(FieldKey),
    Wikisource,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: ColumnKey,
    pub label: &'static str,
    pub sortable: bool,
}

impl Column {
    fn field(key: FieldKey, label: &'static str) -> Self {
        Self {
            key: ColumnKey::Field(key),
            label,
            sortable: true,
        }
    }

    /// The field this column sorts by, if it is sortable.
    pub fn sort_key(&self) -> Option<&FieldKey> {
        match &self.key {
            ColumnKey::Field(key) if self.sortable => Some(key),
            _ => None,
        }
    }
}

/// The table's columns, in display order.
pub fn columns() -> Vec<Column> {
    vec![
        Column::field(FieldKey::Index, "#"),
        Column::field(FieldKey::Title, "Title"),
        Column::field(FieldKey::Scale(Scale::RatingStory), "Rating"),
        Column::field(FieldKey::Category(Category::Tone), "Tone"),
        Column::field(FieldKey::Category(Category::Setting), "Setting"),
        Column::field(FieldKey::Category(Category::EndingType), "Ending"),
        Column::field(FieldKey::Scale(Scale::DarknessLevel), "Dark"),
        Column::field(FieldKey::Scale(Scale::BodyCount), "Bodies"),
        Column::field(FieldKey::Category(Category::CentralMechanism), "Mechanism"),
        Column::field(FieldKey::Category(Category::ProtagonistType), "Protagonist"),
        Column::field(FieldKey::Category(Category::AgencyDriver), "Agency"),
        Column {
            key: ColumnKey::Wikisource,
            label: "Wikisource",
            sortable: false,
        },
        Column {
            key: ColumnKey::Local,
            label: "Local XHTML",
            sortable: false,
        },
    ]
}

/// Sort choices offered to the user: every sortable column.
pub fn sort_options(columns: &[Column]) -> Vec<(FieldKey, &'static str)> {
    columns
        .iter()
        .filter_map(|c| c.sort_key().map(|key| (key.clone(), c.label)))
        .collect()
}

/// A rendered table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Text { text: String, tooltip: Option<String> },
    Badge { text: String, severity: Severity },
    Badges { items: Vec<String> },
    Link { href: String, label: &'static str },
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text { text, .. } => f.write_str(text),
            Cell::Badge { text, .. } => f.write_str(text),
            Cell::Badges { items } => f.write_str(&items.join(" ")),
            Cell::Link { href, .. } => f.write_str(href),
            Cell::Empty => f.write_str(PLACEHOLDER),
        }
    }
}

fn badge(text: String, severity: Severity) -> Cell {
    Cell::Badge { text, severity }
}

fn scale_text(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_default()
}

/// Display value for one story in one column.
pub fn render_cell(story: &Story, column: &ColumnKey, artifact_base: &str) -> Cell {
    match column {
        ColumnKey::Field(FieldKey::Title) => Cell::Text {
            text: story.title.clone(),
            tooltip: story.notes.clone().filter(|n| !n.is_empty()),
        },
        ColumnKey::Field(FieldKey::Scale(Scale::RatingStory)) => badge(
            scale_text(story.rating_story),
            Severity::for_rating(story.rating_story),
        ),
        ColumnKey::Field(FieldKey::Scale(Scale::DarknessLevel)) => {
            badge(scale_text(story.darkness_level), Severity::Neutral)
        }
        ColumnKey::Field(FieldKey::Scale(Scale::BodyCount)) => match story.body_count {
            Some(count) if count != 0.0 => badge(format_number(count), Severity::for_body_count(Some(count))),
            _ => badge("0".to_string(), Severity::Neutral),
        },
        ColumnKey::Wikisource => match story.wikisource_url.as_deref() {
            Some(url) if !url.is_empty() => Cell::Link {
                href: url.to_string(),
                label: "link",
            },
            _ => Cell::Empty,
        },
        ColumnKey::Local => Cell::Link {
            href: format!("{}/{}", artifact_base.trim_end_matches('/'), story.href),
            label: "open",
        },
        ColumnKey::Field(key) => match story.field(key) {
            FieldValue::Absent => Cell::Empty,
            FieldValue::Text("") => Cell::Empty,
            FieldValue::List([]) => Cell::Empty,
            FieldValue::List(items) => Cell::Badges {
                items: items.to_vec(),
            },
            value => badge(value.display_string(), Severity::Neutral),
        },
    }
}

/// Render the header row; the active sort column carries its direction arrow.
pub fn header_row(columns: &[Column], sort: &crate::query::SortSpec) -> Vec<String> {
    columns
        .iter()
        .map(|c| match c.sort_key() {
            Some(key) if *key == sort.key => format!("{} {}", c.label, sort.direction.arrow()),
            _ => c.label.to_string(),
        })
        .collect()
}

/// Render every matched story into rows of cells.
pub fn render_rows(stories: &[&Story], columns: &[Column], artifact_base: &str) -> Vec<Vec<Cell>> {
    stories
        .iter()
        .map(|story| {
            columns
                .iter()
                .map(|c| render_cell(story, &c.key, artifact_base))
                .collect()
        })
        .collect()
}

/// Lay rows out as a padded plain-text table.
pub fn text_table(header: &[String], rows: &[Vec<Cell>]) -> String {
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    for line in std::iter::once(header).chain(body.iter().map(Vec::as_slice)) {
        let padded: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect();
        out.push_str(padded.join("  ").trim_end());
        out.push('\n');
    }
    out
}
