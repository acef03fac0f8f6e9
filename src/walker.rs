//! Top-down directory walkers that hand out one directory level at a time.
//!
//! The callback may shrink `Level::subdirs`; only the names left in it are
//! descended into. Levels arrive depth-first, pre-order, with names sorted.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// One directory as seen by a walker callback.
#[derive(Debug)]
pub struct Level<'a> {
    /// The directory being visited, as reached from the walk root.
    pub dir: &'a Path,
    /// Subdirectories still pending descent.
    pub subdirs: &'a mut Vec<String>,
    /// Everything that is not a directory.
    pub files: &'a [String],
}

pub trait Walker {
    fn walk(&self, root: &Path, visit: &mut dyn FnMut(Level<'_>) -> Result<()>) -> Result<()>;
}

/// Picks the fastest walker compiled into this build.
pub fn default_walker() -> Box<dyn Walker> {
    #[cfg(feature = "parallel")]
    {
        Box::new(ParallelWalker)
    }
    #[cfg(not(feature = "parallel"))]
    {
        Box::new(WalkDirWalker)
    }
}

/// Children of one directory, split the way a walker reports them.
#[derive(Debug, Default)]
struct Listing {
    subdirs: Vec<String>,
    files: Vec<String>,
    /// Subdirectories reached through a symlink; listed, never descended.
    links: HashSet<String>,
}

impl Listing {
    fn read(dir: &Path) -> Result<Self> {
        let mut listing = Listing::default();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(false) {
            let entry = entry?;
            let name = match entry.file_name().to_str() {
                Some(name) => name.to_string(),
                None => {
                    tracing::warn!("skipping non UTF-8 name {}", entry.path().display());
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                listing.subdirs.push(name);
            } else if entry.path_is_symlink() && points_to_dir(entry.path()) {
                listing.links.insert(name.clone());
                listing.subdirs.push(name);
            } else {
                listing.files.push(name);
            }
        }
        listing.subdirs.sort();
        listing.files.sort();
        Ok(listing)
    }

    /// Paths of the surviving subdirectories that may be descended into.
    fn descend(&self, dir: &Path) -> Vec<PathBuf> {
        self.subdirs
            .iter()
            .filter(|name| !self.links.contains(*name))
            .map(|name| dir.join(name))
            .collect()
    }
}

// Broken links count as files.
fn points_to_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

fn visit_listing(
    dir: &Path,
    listing: &mut Listing,
    visit: &mut dyn FnMut(Level<'_>) -> Result<()>,
) -> Result<()> {
    tracing::trace!(
        "visiting {} ({} dirs, {} files)",
        dir.display(),
        listing.subdirs.len(),
        listing.files.len()
    );
    visit(Level { dir, subdirs: &mut listing.subdirs, files: &listing.files })
}

/// Sequential walker listing each directory with `walkdir`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkDirWalker;

impl Walker for WalkDirWalker {
    fn walk(&self, root: &Path, visit: &mut dyn FnMut(Level<'_>) -> Result<()>) -> Result<()> {
        let mut pending = vec![root.to_path_buf()];
        while let Some(dir) = pending.pop() {
            let mut listing = Listing::read(&dir)?;
            visit_listing(&dir, &mut listing, visit)?;
            pending.extend(listing.descend(&dir).into_iter().rev());
        }
        Ok(())
    }
}

/// Walker that reads the surviving children of each level concurrently.
///
/// Only the directory listing runs on the rayon pool; `visit` is always
/// called on the walking thread, in the same order as [`WalkDirWalker`].
#[cfg(feature = "parallel")]
#[derive(Debug, Default, Clone, Copy)]
pub struct ParallelWalker;

#[cfg(feature = "parallel")]
impl Walker for ParallelWalker {
    fn walk(&self, root: &Path, visit: &mut dyn FnMut(Level<'_>) -> Result<()>) -> Result<()> {
        use rayon::prelude::*;

        let mut pending = vec![(root.to_path_buf(), Listing::read(root)?)];
        while let Some((dir, mut listing)) = pending.pop() {
            visit_listing(&dir, &mut listing, visit)?;
            let children = listing
                .descend(&dir)
                .into_par_iter()
                .map(|child| Listing::read(&child).map(|listing| (child, listing)))
                .collect::<Result<Vec<_>>>()?;
            pending.extend(children.into_iter().rev());
        }
        Ok(())
    }
}

/// Absolute, lexically normalized form of `path`. Symlinks are not
/// resolved, so a start directory reached through a link keeps its logical
/// parents.
pub(crate) fn normalize(path: &Path) -> Result<PathBuf> {
    let abs = std::path::absolute(path).map_err(|err| Error::fs(path, err))?;
    let mut out = PathBuf::new();
    for component in abs.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !matches!(out.components().next_back(), Some(Component::RootDir | Component::Prefix(_)) | None) {
                    out.pop();
                }
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Fails with a filesystem error unless `path` is a readable directory.
/// Returns its normalized absolute form.
pub(crate) fn check_root(path: &Path) -> Result<PathBuf> {
    let meta = fs::metadata(path).map_err(|err| Error::fs(path, err))?;
    if !meta.is_dir() {
        let err = std::io::Error::other("not a directory");
        return Err(Error::fs(path, err));
    }
    normalize(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/deep")).unwrap();
        fs::create_dir_all(root.join("b")).unwrap();
        fs::write(root.join("top.txt"), "").unwrap();
        fs::write(root.join("a/one.txt"), "").unwrap();
        fs::write(root.join("a/deep/two.txt"), "").unwrap();
        fs::write(root.join("b/three.txt"), "").unwrap();
        dir
    }

    fn record(walker: &dyn Walker, root: &Path, prune: &str) -> Vec<(PathBuf, Vec<String>, Vec<String>)> {
        let mut seen = Vec::new();
        walker
            .walk(root, &mut |level| {
                let rel = level.dir.strip_prefix(root).unwrap().to_path_buf();
                seen.push((rel, level.subdirs.clone(), level.files.to_vec()));
                level.subdirs.retain(|name| name != prune);
                Ok(())
            })
            .unwrap();
        seen
    }

    #[test]
    fn walks_top_down_in_sorted_order() {
        let dir = tree();
        let seen = record(&WalkDirWalker, dir.path(), "");
        let dirs: Vec<_> = seen.iter().map(|(d, _, _)| d.clone()).collect();
        assert_eq!(
            dirs,
            vec![PathBuf::new(), PathBuf::from("a"), PathBuf::from("a/deep"), PathBuf::from("b")]
        );
        assert_eq!(seen[0].1, vec!["a", "b"]);
        assert_eq!(seen[0].2, vec!["top.txt"]);
    }

    #[test]
    fn pruned_subdirs_are_not_descended() {
        let dir = tree();
        let seen = record(&WalkDirWalker, dir.path(), "a");
        let dirs: Vec<_> = seen.iter().map(|(d, _, _)| d.clone()).collect();
        assert_eq!(dirs, vec![PathBuf::new(), PathBuf::from("b")]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_walker_matches_sequential_order() {
        let dir = tree();
        assert_eq!(
            record(&ParallelWalker, dir.path(), "deep"),
            record(&WalkDirWalker, dir.path(), "deep")
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dirs_are_listed_but_not_followed() {
        let dir = tree();
        std::os::unix::fs::symlink(dir.path().join("b"), dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling")).unwrap();

        let seen = record(&WalkDirWalker, dir.path(), "");
        assert_eq!(seen[0].1, vec!["a", "b", "link"]);
        assert_eq!(seen[0].2, vec!["dangling", "top.txt"]);
        assert!(seen.iter().all(|(d, _, _)| d != Path::new("link")));
    }

    #[test]
    fn missing_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(WalkDirWalker.walk(&missing, &mut |_| Ok(())).is_err());
        assert!(check_root(&missing).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn normalize_is_lexical() {
        assert_eq!(normalize(Path::new("/r/./a/../b")).unwrap(), PathBuf::from("/r/b"));
        assert_eq!(normalize(Path::new("/../x")).unwrap(), PathBuf::from("/x"));
        assert!(normalize(Path::new("rel")).unwrap().is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn check_root_keeps_symlinked_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("real")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
        let root = check_root(&dir.path().join("alias")).unwrap();
        assert_eq!(root, dir.path().join("alias"));
    }
}
