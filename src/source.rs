//! Collects candidates from a directory tree, honoring cascading ignore files.
//!
//! Only the innermost ignore file in scope is consulted for a directory:
//! rules from ignore files further up are not merged in. A `sub/.gitignore`
//! therefore fully replaces the root one while walking `sub/`.

use std::path::{Path, PathBuf};

use crate::config::Options;
use crate::error::Result;
use crate::ignore_rules::{IgnoreFilter, RuleSet};
use crate::model::Candidate;
use crate::rank::Ranker;
use crate::walker::{check_root, default_walker, Level, Walker};

/// Ignore filters found so far, root-most first. Every anchor is a prefix
/// of the next one's.
#[derive(Debug, Default)]
pub struct FilterScopeStack {
    filters: Vec<IgnoreFilter>,
}

impl FilterScopeStack {
    /// Filters from ignore files in the ancestors of `start` (not `start` itself).
    /// `start` must be absolute.
    pub fn from_ancestors(start: &Path, file_name: &str) -> Result<Self> {
        let mut filters = Vec::new();
        for dir in start.ancestors().skip(1) {
            if dir.join(file_name).is_file() {
                tracing::debug!("found {file_name} above start directory in {}", dir.display());
                filters.push(IgnoreFilter::load(dir, file_name)?);
            }
        }
        filters.reverse();
        Ok(Self { filters })
    }

    /// Drops every filter whose anchor does not contain `dir`.
    pub fn leave_until(&mut self, dir: &Path) {
        while let Some(top) = self.filters.last() {
            if dir.starts_with(top.anchor()) {
                break;
            }
            tracing::debug!("leaving ignore scope {}", top.anchor().display());
            self.filters.pop();
        }
    }

    /// Enters the scope of `filter`. Callers leave stale scopes first.
    pub fn push(&mut self, filter: IgnoreFilter) {
        debug_assert!(
            self.active().map_or(true, |top| filter.anchor().starts_with(top.anchor())),
            "ignore scopes must nest"
        );
        tracing::debug!("entering ignore scope {}", filter.anchor().display());
        self.filters.push(filter);
    }

    /// The innermost filter; the only one ever consulted.
    pub fn active(&self) -> Option<&IgnoreFilter> {
        self.filters.last()
    }

    pub fn anchors(&self) -> impl Iterator<Item = &Path> {
        self.filters.iter().map(IgnoreFilter::anchor)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Walks `Options::start_dir` and produces the candidate list.
///
/// Not reusable concurrently: `fetch` owns the scope stack for the whole walk.
pub struct DirectorySource {
    options: Options,
    walker: Box<dyn Walker>,
    stack: FilterScopeStack,
}

impl DirectorySource {
    pub fn new(options: Options) -> Self {
        Self::with_walker(options, default_walker())
    }

    pub fn with_walker(options: Options, walker: Box<dyn Walker>) -> Self {
        Self { options, walker, stack: FilterScopeStack::default() }
    }

    /// Key and weight functions for the scorer, matching this source's options.
    pub fn ranker(&self) -> Ranker {
        Ranker::new(self.options.include_path)
    }

    /// Walks the whole tree. Fails on the first unreadable directory or
    /// ignore file; nothing is returned in that case.
    pub fn fetch(&mut self) -> Result<Vec<Candidate>> {
        let Self { options, walker, stack } = self;
        let start = options.start_dir.as_path();
        let abs_root = check_root(start)?;

        *stack = if options.use_ignore_rules {
            FilterScopeStack::from_ancestors(&abs_root, &options.ignore_file_name)?
        } else {
            FilterScopeStack::default()
        };
        // Applies when no ignore file is in scope, so VCS metadata never shows up.
        let baseline = IgnoreFilter::new(&abs_root, RuleSet::default());

        let mut found = Vec::new();
        walker.walk(start, &mut |level: Level<'_>| {
            let abs = absolute_level(start, &abs_root, level.dir);

            if options.use_ignore_rules {
                stack.leave_until(&abs);
                if level.files.iter().any(|f| *f == options.ignore_file_name) {
                    stack.push(IgnoreFilter::load(&abs, &options.ignore_file_name)?);
                }
            }

            let active = match stack.active() {
                Some(filter) => Some(filter),
                None if options.use_ignore_rules => Some(&baseline),
                None => None,
            };
            let scoped = active.map(|filter| filter.scoped(&abs));
            let excluded = |name: &str| {
                let hit = scoped.is_some_and(|filter| filter.excludes(name));
                if hit {
                    tracing::trace!("ignoring {} in {}", name, abs.display());
                }
                hit
            };

            let files = options.collect_files.then_some(level.files).unwrap_or_default();
            let dirs: &[String] = if options.collect_dirs { level.subdirs.as_slice() } else { &[] };
            found.extend(
                files
                    .iter()
                    .chain(dirs)
                    .filter(|name| !excluded(name.as_str()))
                    .map(|name| Candidate::new(level.dir, name.as_str())),
            );

            if scoped.is_some() {
                level.subdirs.retain(|name| !excluded(name.as_str()));
            }
            Ok(())
        })?;

        tracing::debug!("collected {} candidates under {}", found.len(), abs_root.display());
        Ok(found)
    }
}

/// Maps a directory reached from `start` onto the normalized `abs_root`.
fn absolute_level(start: &Path, abs_root: &Path, dir: &Path) -> PathBuf {
    match dir.strip_prefix(start) {
        Ok(rel) if rel.as_os_str().is_empty() => abs_root.to_path_buf(),
        Ok(rel) => abs_root.join(rel),
        Err(_) => dir.to_path_buf(),
    }
}
