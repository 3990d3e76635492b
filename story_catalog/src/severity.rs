//! Severity classes for numeric badges.

use serde::{Deserialize, Serialize};

/// Visual weight of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Severity {
    Good,
    #[default]
    Neutral,
    Bad,
}

impl Severity {
    /// Rating 4 and up is good, 2 and below is bad.
    pub fn for_rating(rating: Option<f64>) -> Self {
        match rating {
            Some(r) if r >= 4.0 => Severity::Good,
            Some(r) if r <= 2.0 => Severity::Bad,
            // Absent ratings coerce to zero.
            None => Severity::Bad,
            _ => Severity::Neutral,
        }
    }

    /// Any body count other than zero is flagged.
    pub fn for_body_count(count: Option<f64>) -> Self {
        match count {
            Some(c) if c != 0.0 => Severity::Bad,
            _ => Severity::Neutral,
        }
    }

    /// CSS-style class name for renderers that want one.
    pub fn class_name(&self) -> &'static str {
        match self {
            Severity::Good => "badge badge--good",
            Severity::Neutral => "badge",
            Severity::Bad => "badge badge--bad",
        }
    }
}
