use serde::Serialize;
use std::path::{Path, PathBuf};

/// One filesystem entry offered to the fuzzy matcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    directory: PathBuf,
    name: String,
    normalized_name: String,
}

impl Candidate {
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let name = name.into();
        let normalized_name = name.to_lowercase();
        Self { directory: directory.into(), name, normalized_name }
    }

    /// Directory the entry was found in, as reached from the start directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercased `name`, precomputed for repeated matching.
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }
}
