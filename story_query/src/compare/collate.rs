//! Natural, locale-aware string collation.
//!
//! Comparison is at base-letter strength: case and diacritics are ignored,
//! so `"Esmé"` equals `"esme"` and `"élan"` sorts with the `e`s.
//!
//! Strings are split into tokens: runs of ASCII digits become a single
//! numeric token, every other character is folded to lowercase with its
//! combining marks stripped and yields one token per remaining char. Tokens order by
//! class first (whitespace and punctuation, then numbers, then letters),
//! then by value within the class. Two strings compare by their token
//! sequences lexicographically, so the result is a total preorder.

use std::cmp::Ordering;

use unicode_normalization::char::{decompose_canonical, is_combining_mark};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Separator,
    Number,
    Letter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    /// Digit run with leading zeros stripped.
    Number(&'a str),
    Char(char),
}

impl Token<'_> {
    fn class(&self) -> Class {
        match self {
            Token::Number(_) => Class::Number,
            Token::Char(c) if c.is_alphanumeric() => Class::Letter,
            Token::Char(_) => Class::Separator,
        }
    }
}

fn cmp_tokens(a: &Token<'_>, b: &Token<'_>) -> Ordering {
    a.class().cmp(&b.class()).then_with(|| match (a, b) {
        (Token::Number(x), Token::Number(y)) => x.len().cmp(&y.len()).then_with(|| x.cmp(y)),
        (Token::Char(x), Token::Char(y)) => x.cmp(y),
        // Classes differ whenever the variants differ.
        _ => Ordering::Equal,
    })
}

/// Lowercase `c` and strip its diacritics: `É` folds to `e`. A bare
/// combining mark folds to nothing.
fn fold(c: char) -> Vec<char> {
    let mut folded = Vec::with_capacity(1);
    for lower in c.to_lowercase() {
        decompose_canonical(lower, |part| {
            if !is_combining_mark(part) {
                folded.push(part);
            }
        });
    }
    folded
}

struct Tokens<'a> {
    rest: &'a str,
    /// Folding a character may yield several chars.
    pending: std::vec::IntoIter<char>,
}

impl<'a> Tokens<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            rest: s,
            pending: Vec::new().into_iter(),
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if let Some(c) = self.pending.next() {
                return Some(Token::Char(c));
            }

            let first = self.rest.chars().next()?;
            if first.is_ascii_digit() {
                let end = self
                    .rest
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(self.rest.len());
                let digits = &self.rest[..end];
                self.rest = &self.rest[end..];
                let trimmed = digits.trim_start_matches('0');
                return Some(Token::Number(if trimmed.is_empty() { "0" } else { trimmed }));
            }

            self.rest = &self.rest[first.len_utf8()..];
            self.pending = fold(first).into_iter();
        }
    }
}

/// Compare two strings the way a person reading a list expects:
/// ignoring case and accents, with embedded numbers compared by value.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Tokens::new(a);
    let mut right = Tokens::new(b);
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match cmp_tokens(&x, &y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}
