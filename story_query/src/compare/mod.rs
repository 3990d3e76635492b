//! Total ordering over heterogeneous field values.
//!
//! Ordering rules:
//! 1. Absent sorts before any present value; two absents are equal
//! 2. Numbers sort before non-numbers and compare numerically
//! 3. Text, flags and lists compare their string forms with [`natural_cmp`]
//!
//! Rule 2 departs from comparing a number against text by string form.
//! Numbers form their own block because mixing numeric and string
//! comparison across types is not transitive once negative or fractional
//! values meet numeric-looking text (`-10 < -2`, `"-3" < "-10"`). Only
//! free-form extra fields ever hold both kinds.

mod collate;

pub use collate::natural_cmp;

use std::cmp::Ordering;
use story_catalog::FieldValue;

/// Compare two field values.
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Absent, FieldValue::Absent) => Ordering::Equal,
        (FieldValue::Absent, _) => Ordering::Less,
        (_, FieldValue::Absent) => Ordering::Greater,
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(y),
        (FieldValue::Number(_), _) => Ordering::Less,
        (_, FieldValue::Number(_)) => Ordering::Greater,
        (FieldValue::Text(x), FieldValue::Text(y)) => natural_cmp(x, y),
        _ => natural_cmp(&a.display_string(), &b.display_string()),
    }
}
