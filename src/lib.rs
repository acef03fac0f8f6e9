//! Candidate supply for a quick-open fuzzy finder.
//!
//! [`DirectorySource`] walks a tree once, skipping everything excluded by
//! the nearest `.gitignore` in scope, and returns the surviving entries as
//! [`Candidate`]s. [`Ranker`] derives the match key and depth weight that a
//! scorer such as [`FuzzySearcher`] consumes.

pub mod config;
pub mod error;
pub mod format;
pub mod ignore_rules;
pub mod model;
pub mod rank;
pub mod search;
pub mod source;
pub mod walker;

pub use config::Options;
pub use error::{Error, Result};
pub use format::{path_formatter, Formatter};
pub use ignore_rules::{IgnoreFilter, RuleSet};
pub use model::Candidate;
pub use rank::Ranker;
pub use search::{FuzzySearcher, Match};
pub use source::{DirectorySource, FilterScopeStack};
pub use walker::{default_walker, Level, WalkDirWalker, Walker};

#[cfg(feature = "parallel")]
pub use walker::ParallelWalker;
