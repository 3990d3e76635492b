//! # Story Catalog
//!
//! The data model crate - story records, the typed field registry used for
//! generic access by field name, the auxiliary Wikisource link records and
//! browser configuration. This crate holds no query logic.

pub mod config;
pub mod severity;
pub mod story;

pub use config::*;
pub use severity::*;
pub use story::*;
