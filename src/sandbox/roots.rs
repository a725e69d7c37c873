//! Allowed root directories
//!
//! The allowlist is built once at startup and never mutated afterwards.

use log::debug;
use std::path::{Path, PathBuf};

use crate::sandbox::paths::{absolutize, expand_home_with};

/// A single allowed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedRoot {
    path: PathBuf,
    real: Option<PathBuf>,
}

impl AllowedRoot {
    /// Build a root from an absolute, normalized path.
    ///
    /// The symlink-resolved form is remembered when the directory exists so
    /// that real paths still match a root configured through a symlink.
    pub fn new(path: PathBuf) -> Self {
        let real = std::fs::canonicalize(&path)
            .ok()
            .filter(|real| *real != path);
        Self { path, real }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Segment-wise containment: `/home/user` holds `/home/user/x` but not
    /// `/home/user2`.
    pub fn contains(&self, candidate: &Path) -> bool {
        candidate.starts_with(&self.path)
            || self
                .real
                .as_ref()
                .is_some_and(|real| candidate.starts_with(real))
    }
}

/// Ordered, de-duplicated set of allowed roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedRoots {
    roots: Vec<AllowedRoot>,
}

impl AllowedRoots {
    /// Build from already absolute directories.
    pub fn new<I>(dirs: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut roots: Vec<AllowedRoot> = Vec::new();
        for dir in dirs {
            let root = AllowedRoot::new(crate::sandbox::paths::normalize(&dir));
            if !roots.iter().any(|existing| existing.path == root.path) {
                roots.push(root);
            }
        }
        Self { roots }
    }

    /// Build from an optional comma-separated list.
    ///
    /// Each entry is `~`-expanded and resolved against `cwd`; blank entries
    /// are ignored. Without a usable list the allowlist falls back to the
    /// home directory (when known) and `cwd`.
    pub fn from_list(list: Option<&str>, home: Option<&Path>, cwd: &Path) -> Self {
        let configured: Vec<PathBuf> = list
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|entry| !entry.is_empty())
                    .map(|entry| absolutize(&expand_home_with(entry, home), cwd))
                    .collect()
            })
            .unwrap_or_default();

        if !configured.is_empty() {
            debug!("Using configured allowed directories: {:?}", configured);
            return Self::new(configured);
        }

        let defaults = home
            .map(|home| absolutize(home, cwd))
            .into_iter()
            .chain(std::iter::once(cwd.to_path_buf()));
        Self::new(defaults)
    }

    /// Whether `candidate` lies at or below any allowed root.
    pub fn contains(&self, candidate: &Path) -> bool {
        self.roots.iter().any(|root| root.contains(candidate))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AllowedRoot> {
        self.roots.iter()
    }

    /// Configured root paths, in order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.roots.iter().map(|root| root.path.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_list_expands_and_resolves_entries() {
        let roots = AllowedRoots::from_list(
            Some("~/models, data/../shared ,, /srv/files/"),
            Some(Path::new("/home/alice")),
            Path::new("/work"),
        );
        assert_eq!(
            roots.paths(),
            vec![
                PathBuf::from("/home/alice/models"),
                PathBuf::from("/work/shared"),
                PathBuf::from("/srv/files"),
            ]
        );
    }

    #[test]
    fn test_from_list_falls_back_to_home_and_cwd() {
        let roots = AllowedRoots::from_list(None, Some(Path::new("/home/alice")), Path::new("/work"));
        assert_eq!(
            roots.paths(),
            vec![PathBuf::from("/home/alice"), PathBuf::from("/work")]
        );

        let blank = AllowedRoots::from_list(Some(" , "), None, Path::new("/work"));
        assert_eq!(blank.paths(), vec![PathBuf::from("/work")]);
    }

    #[test]
    fn test_duplicates_are_dropped_keeping_order() {
        let roots = AllowedRoots::new(vec![
            PathBuf::from("/srv/b"),
            PathBuf::from("/srv/a"),
            PathBuf::from("/srv/b/"),
        ]);
        assert_eq!(roots.paths(), vec![PathBuf::from("/srv/b"), PathBuf::from("/srv/a")]);
    }

    #[test]
    fn test_containment_is_segment_wise() {
        let roots = AllowedRoots::new(vec![PathBuf::from("/home/user")]);
        assert!(roots.contains(Path::new("/home/user")));
        assert!(roots.contains(Path::new("/home/user/docs/a.txt")));
        assert!(!roots.contains(Path::new("/home/user2")));
        assert!(!roots.contains(Path::new("/home/userX/file")));
        assert!(!roots.contains(Path::new("/home")));
    }
}
