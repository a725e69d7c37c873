//! Recursive file search
//!
//! Walks a directory tree with an explicit worklist, re-authorizing every
//! entry it visits. Failures below the search root are recorded as skipped
//! entries and never abort the walk.

use glob::{MatchOptions, Pattern};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{GatewayError, StorageError};
use crate::sandbox::PathGuard;
use crate::storage::results::{SearchOutcome, SkippedEntry};

/// Entry names: case-insensitive, and `*` does not match a leading dot.
const NAME_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

/// Exclusions: matched against the path relative to the search root,
/// `*` stays within one segment and dot files are matched.
const EXCLUDE_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug)]
enum ExcludeRule {
    /// Pattern without `*`: excludes the named entry at any depth and
    /// everything below it, as `**/<pattern>` and `**/<pattern>/**` would.
    Anywhere { entry: Pattern, below: Pattern },
    /// Pattern containing `*`: matched against the whole relative path.
    Glob(Pattern),
}

impl ExcludeRule {
    fn new(raw: &str) -> Result<Self, GatewayError> {
        if raw.contains('*') {
            return Ok(ExcludeRule::Glob(compile(raw, raw)?));
        }
        let name = raw.trim_matches('/');
        Ok(ExcludeRule::Anywhere {
            entry: compile(&format!("**/{}", name), raw)?,
            below: compile(&format!("**/{}/**", name), raw)?,
        })
    }

    fn matches(&self, relative: &Path) -> bool {
        match self {
            ExcludeRule::Anywhere { entry, below } => {
                entry.matches_path_with(relative, EXCLUDE_MATCH)
                    || below.matches_path_with(relative, EXCLUDE_MATCH)
            }
            ExcludeRule::Glob(pattern) => pattern.matches_path_with(relative, EXCLUDE_MATCH),
        }
    }
}

/// Compiled name and exclusion patterns for one search.
#[derive(Debug)]
pub struct SearchPatterns {
    name: Pattern,
    excludes: Vec<ExcludeRule>,
}

impl SearchPatterns {
    pub fn new(name: &str, excludes: &[String]) -> Result<Self, GatewayError> {
        let name = compile(name, name)?;
        let excludes = excludes
            .iter()
            .map(|raw| ExcludeRule::new(raw))
            .collect::<Result<Vec<_>, GatewayError>>()?;
        Ok(Self { name, excludes })
    }

    pub fn is_excluded(&self, relative: &Path) -> bool {
        self.excludes.iter().any(|rule| rule.matches(relative))
    }

    pub fn name_matches(&self, name: &str) -> bool {
        self.name.matches_with(name, NAME_MATCH)
    }
}

/// Compile `glob`, reporting failures against the caller's `raw` pattern.
fn compile(glob: &str, raw: &str) -> Result<Pattern, GatewayError> {
    Pattern::new(glob).map_err(|e| GatewayError::InvalidPattern {
        pattern: raw.to_string(),
        reason: e.msg.to_string(),
    })
}

/// Walk `root` and collect entries whose name matches.
///
/// `root` must already be authorized; a failure to read it is returned as an
/// error. Symlinked directories are reported but not descended into.
pub fn search(
    guard: &PathGuard,
    root: &Path,
    patterns: &SearchPatterns,
) -> Result<SearchOutcome, StorageError> {
    let mut outcome = SearchOutcome::default();
    let mut pending: Vec<PathBuf> = Vec::new();

    let root_entries = fs::read_dir(root).map_err(|e| StorageError::from_io(root, e))?;
    visit_entries(guard, root, root, root_entries, patterns, &mut pending, &mut outcome);

    while let Some(dir) = pending.pop() {
        match fs::read_dir(&dir) {
            Ok(entries) => {
                visit_entries(guard, root, &dir, entries, patterns, &mut pending, &mut outcome)
            }
            Err(e) => skip(&mut outcome, dir, format!("cannot read directory: {}", e)),
        }
    }

    Ok(outcome)
}

fn visit_entries(
    guard: &PathGuard,
    root: &Path,
    dir: &Path,
    entries: fs::ReadDir,
    patterns: &SearchPatterns,
    pending: &mut Vec<PathBuf>,
    outcome: &mut SearchOutcome,
) {
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                skip(outcome, dir.to_path_buf(), format!("cannot read entry: {}", e));
                continue;
            }
        };
        let full_path = entry.path();

        if let Err(denied) = guard.authorize_path(&full_path) {
            skip(outcome, full_path, denied.to_string());
            continue;
        }

        let relative = full_path.strip_prefix(root).unwrap_or(&full_path);
        if patterns.is_excluded(relative) {
            debug!("Excluded {}", full_path.display());
            continue;
        }

        let is_dir = match entry.file_type() {
            Ok(file_type) => file_type.is_dir(),
            Err(e) => {
                skip(outcome, full_path, format!("cannot read file type: {}", e));
                continue;
            }
        };

        if patterns.name_matches(&entry.file_name().to_string_lossy()) {
            outcome.matches.push(full_path.clone());
        }

        if is_dir {
            pending.push(full_path);
        }
    }
}

fn skip(outcome: &mut SearchOutcome, path: PathBuf, reason: String) {
    debug!("Skipping {}: {}", path.display(), reason);
    outcome.skipped.push(SkippedEntry { path, reason });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::AllowedRoots;
    use std::collections::BTreeSet;

    fn fixture() -> (tempfile::TempDir, PathBuf, PathGuard) {
        let dir = tempfile::tempdir().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        fs::create_dir_all(root.join("docs/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join("app/node_modules")).unwrap();
        fs::write(root.join("top.txt"), "").unwrap();
        fs::write(root.join("docs/a.txt"), "").unwrap();
        fs::write(root.join("docs/nested/B.TXT"), "").unwrap();
        fs::write(root.join("docs/nested/c.md"), "").unwrap();
        fs::write(root.join("node_modules/pkg/readme.txt"), "").unwrap();
        fs::write(root.join("app/node_modules/dep.txt"), "").unwrap();
        let guard = PathGuard::new(AllowedRoots::new(vec![root.clone()]), None, root.clone());
        (dir, root, guard)
    }

    fn run(guard: &PathGuard, root: &Path, name: &str, excludes: &[&str]) -> SearchOutcome {
        let excludes: Vec<String> = excludes.iter().map(|s| s.to_string()).collect();
        let patterns = SearchPatterns::new(name, &excludes).unwrap();
        search(guard, root, &patterns).unwrap()
    }

    fn relative_set(root: &Path, outcome: &SearchOutcome) -> BTreeSet<String> {
        outcome
            .matches
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_finds_matches_at_every_depth_case_insensitively() {
        let (_dir, root, guard) = fixture();
        let outcome = run(&guard, &root, "*.txt", &[]);
        let expected: BTreeSet<String> = [
            "top.txt",
            "docs/a.txt",
            "docs/nested/B.TXT",
            "node_modules/pkg/readme.txt",
            "app/node_modules/dep.txt",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(relative_set(&root, &outcome), expected);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_bare_exclude_applies_at_any_depth() {
        let (_dir, root, guard) = fixture();
        let outcome = run(&guard, &root, "*.txt", &["node_modules"]);
        let found = relative_set(&root, &outcome);
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|p| !p.contains("node_modules")));
    }

    #[test]
    fn test_bare_exclude_with_separator_excludes_subtree() {
        let (_dir, root, guard) = fixture();
        fs::create_dir_all(root.join("src/gen/deep")).unwrap();
        fs::write(root.join("src/gen/x.txt"), "").unwrap();
        fs::write(root.join("src/gen/deep/y.txt"), "").unwrap();
        fs::write(root.join("src/keep.txt"), "").unwrap();

        let outcome = run(&guard, &root, "*.txt", &["src/gen", "node_modules", "docs"]);
        assert_eq!(
            relative_set(&root, &outcome),
            BTreeSet::from(["top.txt".to_string(), "src/keep.txt".to_string()])
        );

        let outcome = run(&guard, &root, "*.txt", &["gen", "node_modules", "docs"]);
        assert_eq!(
            relative_set(&root, &outcome),
            BTreeSet::from(["top.txt".to_string(), "src/keep.txt".to_string()])
        );
    }

    #[test]
    fn test_wildcard_exclude_matches_relative_path() {
        let (_dir, root, guard) = fixture();
        let outcome = run(&guard, &root, "*", &["docs/*"]);
        let found = relative_set(&root, &outcome);
        assert!(found.contains("docs"));
        assert!(!found.iter().any(|p| p.starts_with("docs/")));
    }

    #[test]
    fn test_directories_match_by_name_and_are_descended() {
        let (_dir, root, guard) = fixture();
        let outcome = run(&guard, &root, "nest*", &[]);
        assert_eq!(outcome.matches, vec![root.join("docs/nested")]);
    }

    #[test]
    fn test_wildcard_does_not_match_hidden_names() {
        let (_dir, root, guard) = fixture();
        fs::write(root.join(".hidden.txt"), "").unwrap();
        let outcome = run(&guard, &root, "*.txt", &["node_modules", "docs"]);
        assert_eq!(relative_set(&root, &outcome), BTreeSet::from(["top.txt".to_string()]));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let err = SearchPatterns::new("[", &[]).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidPattern { .. }));
    }

    #[test]
    fn test_unreadable_root_is_an_error() {
        let (_dir, root, guard) = fixture();
        let patterns = SearchPatterns::new("*", &[]).unwrap();
        let err = search(&guard, &root.join("missing"), &patterns).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_escaping_symlink_is_skipped_without_aborting() {
        let (_dir, root, guard) = fixture();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "").unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("docs/escape")).unwrap();

        let outcome = run(&guard, &root, "*.txt", &["node_modules"]);

        assert_eq!(relative_set(&root, &outcome).len(), 3);
        assert!(outcome.matches.iter().all(|p| !p.ends_with("secret.txt")));
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].path, root.join("docs/escape"));
    }
}
