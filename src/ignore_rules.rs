//! Parses gitignore-style rule files and answers "is this name excluded here?".
//!
//! Only a subset of the format is understood: exact names, shell globs that
//! match a bare entry name anywhere below the rule file, and rules anchored
//! with a leading `/` to one specific directory. Negation and multi-segment
//! globs are not supported.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Version-control metadata directory, excluded by every rule set.
pub const VCS_DIR_NAME: &str = ".git";

/// Rule file looked for in every visited directory unless configured otherwise.
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

const GLOB_CHARS: &[char] = &['*', '[', ']', '?'];

/// One line of a rule file after classification.
#[derive(Debug, PartialEq, Eq)]
enum Rule<'a> {
    Anchored { dir: Option<&'a str>, glob: &'a str },
    Global(&'a str),
    Exact(&'a str),
}

fn classify(line: &str) -> Option<Rule<'_>> {
    if line.starts_with('#') {
        return None;
    }
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(rest) = line.strip_prefix('/') {
        let rest = rest.trim_start_matches('/').trim_end_matches('/');
        if rest.is_empty() {
            return None;
        }
        return Some(match rest.rsplit_once('/') {
            Some((dir, glob)) => Rule::Anchored { dir: Some(dir), glob },
            None => Rule::Anchored { dir: None, glob: rest },
        });
    }
    let line = line.trim_end_matches('/');
    if line.is_empty() {
        return None;
    }
    if line.contains(GLOB_CHARS) {
        Some(Rule::Global(line))
    } else {
        Some(Rule::Exact(line))
    }
}

/// Compiled contents of one rule file.
#[derive(Debug, Clone)]
pub struct RuleSet {
    exact_names: HashSet<String>,
    global_patterns: Option<GlobSet>,
    anchored_patterns: HashMap<PathBuf, GlobSet>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            exact_names: HashSet::from([VCS_DIR_NAME.to_string()]),
            global_patterns: None,
            anchored_patterns: HashMap::new(),
        }
    }
}

impl RuleSet {
    /// Reads and parses the rule file at `path`. Anchored rules are resolved
    /// against the file's parent directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| Error::fs(path, err))?;
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::build(&text, dir, path)
    }

    /// Parses rule text as if it were read from a file inside `dir`.
    pub fn parse(text: &str, dir: &Path) -> Result<Self> {
        Self::build(text, dir, dir)
    }

    fn build(text: &str, dir: &Path, origin: &Path) -> Result<Self> {
        let mut exact_names = HashSet::from([VCS_DIR_NAME.to_string()]);
        let mut globals = Vec::new();
        let mut anchored: HashMap<PathBuf, Vec<&str>> = HashMap::new();

        for rule in text.lines().filter_map(classify) {
            match rule {
                Rule::Exact(name) => {
                    exact_names.insert(name.to_string());
                }
                Rule::Global(glob) => globals.push(glob),
                Rule::Anchored { dir: sub, glob } => {
                    let anchor = match sub {
                        Some(sub) => dir.join(sub),
                        None => dir.to_path_buf(),
                    };
                    anchored.entry(anchor).or_default().push(glob);
                }
            }
        }

        let global_patterns = if globals.is_empty() {
            None
        } else {
            Some(compile(&globals, origin)?)
        };

        let anchored_patterns = anchored
            .into_iter()
            .map(|(anchor, globs)| Ok((anchor, compile(&globs, origin)?)))
            .collect::<Result<HashMap<_, _>>>()?;

        Ok(Self { exact_names, global_patterns, anchored_patterns })
    }

    pub fn exact_names(&self) -> &HashSet<String> {
        &self.exact_names
    }

    pub fn has_global_patterns(&self) -> bool {
        self.global_patterns.is_some()
    }

    /// Directories that carry at least one anchored rule.
    pub fn anchors(&self) -> impl Iterator<Item = &Path> {
        self.anchored_patterns.keys().map(PathBuf::as_path)
    }
}

/// Braces outside a character class are plain text in rule files, so
/// `{` and `}` become one-character classes before compiling.
fn literal_braces(pattern: &str) -> Cow<'_, str> {
    if !pattern.contains(['{', '}']) {
        return Cow::Borrowed(pattern);
    }
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut class: Option<usize> = None;
    for c in pattern.chars() {
        match class {
            None if c == '{' || c == '}' => {
                out.push('[');
                out.push(c);
                out.push(']');
                continue;
            }
            None if c == '[' => class = Some(0),
            // A `]` right after `[` or `[!` is a member, not the end.
            Some(n) if c == ']' && n > 0 => class = None,
            Some(0) if c == '!' => class = Some(0),
            Some(n) => class = Some(n + 1),
            None => {}
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Alternates `globs` into one matcher. `*` may cross `/` and `\` is a
/// literal character, as with fnmatch.
fn compile(globs: &[&str], origin: &Path) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for &pattern in globs {
        let glob = GlobBuilder::new(&literal_braces(pattern))
            .literal_separator(false)
            .backslash_escape(false)
            .build()
            .map_err(|source| Error::MalformedPattern {
                file: origin.to_path_buf(),
                pattern: pattern.to_string(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| Error::MalformedPattern {
        file: origin.to_path_buf(),
        pattern: globs.join(" | "),
        source,
    })
}

/// A rule set bound to the directory its file was found in.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    anchor: PathBuf,
    rules: RuleSet,
}

impl IgnoreFilter {
    pub fn new(anchor: impl Into<PathBuf>, rules: RuleSet) -> Self {
        Self { anchor: anchor.into(), rules }
    }

    /// Loads `dir/file_name` and anchors it at `dir`.
    pub fn load(dir: &Path, file_name: &str) -> Result<Self> {
        let rules = RuleSet::from_file(&dir.join(file_name))?;
        Ok(Self::new(dir, rules))
    }

    pub fn anchor(&self) -> &Path {
        &self.anchor
    }

    /// Returns `true` if `name`, an entry of `current_dir`, is ignored.
    /// `current_dir` must be absolute and normalized.
    pub fn excludes(&self, name: &str, current_dir: &Path) -> bool {
        self.scoped(current_dir).excludes(name)
    }

    /// Resolves the anchored rules for `dir` once, for checking a whole
    /// directory level.
    pub fn scoped(&self, dir: &Path) -> ScopedFilter<'_> {
        ScopedFilter {
            rules: &self.rules,
            anchored: self.rules.anchored_patterns.get(dir),
        }
    }
}

/// An [`IgnoreFilter`] with its anchored lookup already resolved for one directory.
#[derive(Debug, Clone, Copy)]
pub struct ScopedFilter<'a> {
    rules: &'a RuleSet,
    anchored: Option<&'a GlobSet>,
}

impl ScopedFilter<'_> {
    pub fn excludes(&self, name: &str) -> bool {
        if self.rules.exact_names.contains(name) {
            return true;
        }
        if let Some(globals) = &self.rules.global_patterns {
            if globals.is_match(name) {
                return true;
            }
        }
        self.anchored.is_some_and(|set| set.is_match(name))
    }
}
