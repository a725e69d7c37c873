//! Storage operations
//!
//! Read, write, list, create-directory and search, each gated by the path
//! guard before any storage access.

use log::{error, info};

use crate::error::GatewayError;
use crate::error::StorageError;
use crate::sandbox::{AuthorizedPath, PathGuard};
use crate::storage::filesystem;
use crate::storage::results::{DirEntryInfo, SearchOutcome};
use crate::storage::search::{self, SearchPatterns};

/// Sandboxed file operations.
///
/// Holds no mutable state; clones share the guard's allowlist and may be
/// used from several threads at once.
#[derive(Debug, Clone)]
pub struct FileOps {
    guard: PathGuard,
}

impl FileOps {
    pub fn new(guard: PathGuard) -> Self {
        Self { guard }
    }

    pub fn guard(&self) -> &PathGuard {
        &self.guard
    }

    /// Reads a file fully as text
    pub fn read_file(&self, path: &str) -> Result<String, GatewayError> {
        let target = self.guard.authorize(path)?;
        let content = filesystem::read_text(target.as_path()).map_err(log_storage)?;
        info!("Read {} ({} bytes)", target.as_path().display(), content.len());
        Ok(content)
    }

    /// Creates or truncates a file with `content`
    pub fn write_file(&self, path: &str, content: &str) -> Result<AuthorizedPath, GatewayError> {
        let target = self.guard.authorize(path)?;
        filesystem::write_text_atomic(target.as_path(), content).map_err(log_storage)?;
        info!("Wrote {} ({} bytes)", target.as_path().display(), content.len());
        Ok(target)
    }

    /// Lists the immediate children of a directory
    pub fn list_directory(&self, path: &str) -> Result<Vec<DirEntryInfo>, GatewayError> {
        let target = self.guard.authorize(path)?;
        let entries = filesystem::read_entries(target.as_path()).map_err(log_storage)?;
        info!(
            "Listed directory {} - {} entries",
            target.as_path().display(),
            entries.len()
        );
        Ok(entries)
    }

    /// Creates a directory and its missing ancestors; succeeds if it exists
    pub fn create_directory(&self, path: &str) -> Result<AuthorizedPath, GatewayError> {
        let target = self.guard.authorize(path)?;
        filesystem::create_directory(target.as_path()).map_err(log_storage)?;
        info!("Created directory {}", target.as_path().display());
        Ok(target)
    }

    /// Recursively searches `path` for entries whose name matches `pattern`
    pub fn search_files(
        &self,
        path: &str,
        pattern: &str,
        exclude_patterns: &[String],
    ) -> Result<SearchOutcome, GatewayError> {
        let patterns = SearchPatterns::new(pattern, exclude_patterns)?;
        let root = self.guard.authorize(path)?;
        let outcome = search::search(&self.guard, root.as_path(), &patterns).map_err(log_storage)?;
        info!(
            "Searched {} for '{}' - {} matches, {} skipped",
            root.as_path().display(),
            pattern,
            outcome.matches.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }
}

fn log_storage(e: StorageError) -> StorageError {
    error!("{}", e);
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::AllowedRoots;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn ops_for(root: &Path) -> FileOps {
        FileOps::new(PathGuard::new(
            AllowedRoots::new(vec![root.to_path_buf()]),
            None,
            root.to_path_buf(),
        ))
    }

    fn setup() -> (tempfile::TempDir, PathBuf, FileOps) {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        let ops = ops_for(&root);
        (dir, root, ops)
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let (_dir, root, ops) = setup();
        let path = root.join("notes.txt");
        let content = "line one\nline two ✓\n";

        let written = ops.write_file(path.to_str().unwrap(), content).unwrap();
        assert_eq!(written.as_path(), path);
        assert_eq!(ops.read_file(path.to_str().unwrap()).unwrap(), content);
    }

    #[test]
    fn test_write_truncates_existing_file() {
        let (_dir, _root, ops) = setup();
        ops.write_file("a.txt", "a much longer first version").unwrap();
        ops.write_file("a.txt", "short").unwrap();
        assert_eq!(ops.read_file("a.txt").unwrap(), "short");
    }

    #[test]
    fn test_create_directory_is_idempotent() {
        let (_dir, root, ops) = setup();
        ops.create_directory("x").unwrap();
        ops.create_directory("x").unwrap();
        assert!(root.join("x").is_dir());
    }

    #[test]
    fn test_create_directory_needs_existing_parent() {
        let (_dir, _root, ops) = setup();
        let err = ops.create_directory("x/y/z").unwrap_err();
        assert!(matches!(err, GatewayError::AccessDenied(_)));
    }

    #[test]
    fn test_list_directory_tags_entries() {
        let (_dir, root, ops) = setup();
        fs::write(root.join("a.txt"), "").unwrap();
        fs::create_dir(root.join("b")).unwrap();

        let mut entries = ops.list_directory(root.to_str().unwrap()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            entries,
            vec![
                DirEntryInfo { name: "a.txt".into(), is_directory: false },
                DirEntryInfo { name: "b".into(), is_directory: true },
            ]
        );
    }

    #[test]
    fn test_denial_and_storage_failure_are_distinct() {
        let (_dir, root, ops) = setup();

        let denied = ops.read_file("/etc/passwd").unwrap_err();
        assert!(matches!(denied, GatewayError::AccessDenied(_)));

        let missing = ops.read_file(root.join("missing.txt").to_str().unwrap()).unwrap_err();
        assert!(matches!(missing, GatewayError::Storage(StorageError::NotFound(_))));
    }

    #[test]
    fn test_denied_write_leaves_storage_untouched() {
        let allowed = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let ops = ops_for(&fs::canonicalize(allowed.path()).unwrap());
        let target = outside.path().join("x.txt");

        let err = ops.write_file(target.to_str().unwrap(), "nope").unwrap_err();
        assert!(matches!(err, GatewayError::AccessDenied(_)));
        assert!(!target.exists());
    }

    #[test]
    fn test_search_rejects_root_outside_allowlist() {
        let (_dir, _root, ops) = setup();
        let err = ops.search_files("/etc", "*", &[]).unwrap_err();
        assert!(matches!(err, GatewayError::AccessDenied(_)));
    }

    #[test]
    fn test_search_from_relative_root() {
        let (_dir, root, ops) = setup();
        fs::create_dir(root.join("d")).unwrap();
        fs::write(root.join("d/x.txt"), "").unwrap();
        let outcome = ops.search_files(".", "*.TXT", &[]).unwrap();
        assert_eq!(outcome.matches, vec![root.join("d/x.txt")]);
    }
}
