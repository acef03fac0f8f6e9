use std::borrow::Cow;
use std::path::MAIN_SEPARATOR;

use crate::model::Candidate;

/// Sort key and depth penalty handed to the scorer alongside the candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ranker {
    include_path: bool,
}

impl Ranker {
    pub fn new(include_path: bool) -> Self {
        Self { include_path }
    }

    /// String the query is matched against: the lowercased full path when
    /// `include_path` is set, otherwise the lowercased name.
    pub fn key<'a>(&self, candidate: &'a Candidate) -> Cow<'a, str> {
        if self.include_path {
            Cow::Owned(candidate.path().to_string_lossy().to_lowercase())
        } else {
            Cow::Borrowed(candidate.normalized_name())
        }
    }

    /// Square root of the number of separators in the candidate's directory,
    /// so deeper entries lose ties against shallow ones.
    pub fn weight(&self, candidate: &Candidate) -> f64 {
        let depth = candidate
            .directory()
            .to_string_lossy()
            .chars()
            .filter(|&c| c == MAIN_SEPARATOR)
            .count();
        (depth as f64).sqrt()
    }
}
