//! Path authorization
//!
//! Decides whether a caller-supplied path may be used and returns the path
//! storage operations must actually touch.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::AccessDenied;
use crate::sandbox::paths::{absolutize, expand_home_with};
use crate::sandbox::roots::AllowedRoots;

/// A path proven to lie under the allowlist.
///
/// Only [`PathGuard::authorize`] creates these. For existing paths it holds
/// the symlink-resolved path; for paths that do not exist yet it holds the
/// absolute, normalized path whose parent was verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedPath(PathBuf);

impl AuthorizedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for AuthorizedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Authorizes candidate paths against a fixed allowlist.
///
/// The allowlist, home directory and base directory for relative paths are
/// all fixed at construction. Cloning shares the allowlist.
#[derive(Debug, Clone)]
pub struct PathGuard {
    roots: Arc<AllowedRoots>,
    home: Option<PathBuf>,
    base_dir: PathBuf,
}

impl PathGuard {
    pub fn new(roots: AllowedRoots, home: Option<PathBuf>, base_dir: PathBuf) -> Self {
        Self {
            roots: Arc::new(roots),
            home,
            base_dir,
        }
    }

    pub fn roots(&self) -> &AllowedRoots {
        &self.roots
    }

    /// Authorize `raw` for use.
    ///
    /// Steps: expand `~`, resolve against the base directory, normalize, and
    /// check the allowlist. Existing paths are then re-checked through their
    /// real path; missing paths fall back to checking their parent's real
    /// path.
    pub fn authorize(&self, raw: &str) -> Result<AuthorizedPath, AccessDenied> {
        let expanded = expand_home_with(raw, self.home.as_deref());
        self.authorize_path(&expanded)
    }

    /// Authorize a path that needs no `~` expansion, such as a directory
    /// entry discovered while walking an authorized tree.
    pub fn authorize_path(&self, path: &Path) -> Result<AuthorizedPath, AccessDenied> {
        let absolute = absolutize(path, &self.base_dir);

        if !self.roots.contains(&absolute) {
            return Err(self.deny(AccessDenied::OutsideAllowlist {
                path: absolute,
                allowed: self.roots.paths(),
            }));
        }

        match fs::canonicalize(&absolute) {
            Ok(real) => {
                if !self.roots.contains(&real) {
                    return Err(self.deny(AccessDenied::SymlinkEscapesAllowlist {
                        path: absolute,
                        target: real,
                        allowed: self.roots.paths(),
                    }));
                }
                debug!("Authorized {} (real: {})", absolute.display(), real.display());
                Ok(AuthorizedPath(real))
            }
            Err(e) => {
                debug!(
                    "Cannot resolve {} ({}), checking parent directory",
                    absolute.display(),
                    e
                );
                self.authorize_new_path(absolute)
            }
        }
    }

    /// Fallback for paths that do not resolve, typically files about to be
    /// created.
    fn authorize_new_path(&self, absolute: PathBuf) -> Result<AuthorizedPath, AccessDenied> {
        let parent = absolute
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| absolute.clone());

        let real_parent = match fs::canonicalize(&parent) {
            Ok(real_parent) => real_parent,
            Err(_) => {
                return Err(self.deny(AccessDenied::ParentMissing {
                    path: absolute,
                    parent,
                }));
            }
        };

        if !self.roots.contains(&real_parent) {
            return Err(self.deny(AccessDenied::OutsideAllowlist {
                path: real_parent,
                allowed: self.roots.paths(),
            }));
        }

        // A dangling symlink would be followed on write; its target cannot be verified.
        if let Ok(target) = fs::read_link(&absolute) {
            return Err(self.deny(AccessDenied::SymlinkEscapesAllowlist {
                target: absolutize(&target, &real_parent),
                path: absolute,
                allowed: self.roots.paths(),
            }));
        }

        Ok(AuthorizedPath(absolute))
    }

    fn deny(&self, reason: AccessDenied) -> AccessDenied {
        warn!("{}", reason);
        reason
    }
}
