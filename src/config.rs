use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ignore_rules::DEFAULT_IGNORE_FILE;

/// What a [`DirectorySource`](crate::DirectorySource) collects and how it is ranked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub start_dir: PathBuf,
    /// Emit directories as candidates. Ignored directories are pruned either way.
    pub collect_dirs: bool,
    pub collect_files: bool,
    pub use_ignore_rules: bool,
    /// Rank on the whole path instead of the bare name.
    pub include_path: bool,
    pub ignore_file_name: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            start_dir: PathBuf::from("."),
            collect_dirs: false,
            collect_files: true,
            use_ignore_rules: true,
            include_path: false,
            ignore_file_name: DEFAULT_IGNORE_FILE.to_string(),
        }
    }
}
