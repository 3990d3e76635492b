//! # Story Query
//!
//! The query engine behind the story browser. This crate loads the
//! annotated story collection from `story_catalog`, joins the optional
//! Wikisource links onto it, and answers filter/sort queries over the
//! result.
//!
//! ## Core Components
//!
//! - **acquire**: Concurrent loading of both data sources, tolerant of a missing link file
//! - **join**: Left join of stories with their links by index
//! - **vocabulary**: Distinct values and option counts for every filter group
//! - **query**: Filter state, the compiled predicate and the stable sort
//! - **compare**: Type-aware value ordering with natural string collation
//! - **render**: Column definitions and per-cell display values
//!
//! ## Design Philosophy
//!
//! - **Derived, not cached**: every result is recomputed from the immutable catalog and the current state
//! - **Degrade, don't fail**: losing the link file costs the link columns, never the catalog

pub mod acquire;
pub mod catalog;
pub mod compare;
pub mod error;
pub mod join;
pub mod query;
pub mod render;
pub mod vocabulary;

pub use acquire::*;
pub use catalog::*;
pub use compare::*;
pub use error::*;
pub use join::*;
pub use query::*;
pub use render::*;
pub use vocabulary::*;
