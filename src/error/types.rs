//! Error types
//!
//! Defines domain-specific error types for the path guard, the storage
//! operations and the tool dispatch layer.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Joins an allowlist for display in error messages.
fn display_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reasons the path guard refuses a candidate path.
///
/// Every variant carries the path that was attempted; allowlist violations
/// also carry the full allowlist so a misconfiguration can be diagnosed from
/// the message alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDenied {
    /// `path` is the candidate itself, or the real parent directory when the
    /// candidate does not exist yet.
    OutsideAllowlist {
        path: PathBuf,
        allowed: Vec<PathBuf>,
    },
    SymlinkEscapesAllowlist {
        path: PathBuf,
        target: PathBuf,
        allowed: Vec<PathBuf>,
    },
    ParentMissing {
        path: PathBuf,
        parent: PathBuf,
    },
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessDenied::OutsideAllowlist { path, allowed } => write!(
                f,
                "Access denied - path outside allowed directories: {} not in {}",
                path.display(),
                display_roots(allowed)
            ),
            AccessDenied::SymlinkEscapesAllowlist {
                path,
                target,
                allowed,
            } => write!(
                f,
                "Access denied - symlink target outside allowed directories: {} -> {} not in {}",
                path.display(),
                target.display(),
                display_roots(allowed)
            ),
            AccessDenied::ParentMissing { path, parent } => write!(
                f,
                "Parent directory does not exist: {} (for {})",
                parent.display(),
                path.display()
            ),
        }
    }
}

impl std::error::Error for AccessDenied {}

/// Storage layer errors
#[derive(Debug)]
pub enum StorageError {
    NotFound(PathBuf),
    PermissionDenied(PathBuf),
    NotADirectory(PathBuf),
    Io { path: PathBuf, source: io::Error },
}

impl StorageError {
    /// Classifies an I/O failure on `path`.
    pub fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(path.to_path_buf()),
            io::ErrorKind::NotADirectory => StorageError::NotADirectory(path.to_path_buf()),
            _ => StorageError::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotFound(p) => write!(f, "No such file or directory: {}", p.display()),
            StorageError::PermissionDenied(p) => write!(f, "Permission denied: {}", p.display()),
            StorageError::NotADirectory(p) => write!(f, "Not a directory: {}", p.display()),
            StorageError::Io { path, source } => {
                write!(f, "IO error on {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors surfaced by gateway operations.
///
/// `AccessDenied` and `Storage` are the two kinds callers branch on;
/// `InvalidPattern` rejects malformed search input before any traversal.
#[derive(Debug)]
pub enum GatewayError {
    AccessDenied(AccessDenied),
    Storage(StorageError),
    InvalidPattern { pattern: String, reason: String },
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::AccessDenied(e) => write!(f, "{}", e),
            GatewayError::Storage(e) => write!(f, "Storage error: {}", e),
            GatewayError::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid glob pattern '{}': {}", pattern, reason)
            }
        }
    }
}

impl std::error::Error for GatewayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GatewayError::AccessDenied(e) => Some(e),
            GatewayError::Storage(e) => Some(e),
            GatewayError::InvalidPattern { .. } => None,
        }
    }
}

impl From<AccessDenied> for GatewayError {
    fn from(error: AccessDenied) -> Self {
        GatewayError::AccessDenied(error)
    }
}

impl From<StorageError> for GatewayError {
    fn from(error: StorageError) -> Self {
        GatewayError::Storage(error)
    }
}

/// Errors raised while reading the gateway configuration.
#[derive(Debug)]
pub enum ConfigError {
    Load(::config::ConfigError),
    Invalid(String),
    WorkingDirectory(io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "Failed to load configuration: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::WorkingDirectory(e) => {
                write!(f, "Cannot determine working directory: {}", e)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<::config::ConfigError> for ConfigError {
    fn from(error: ::config::ConfigError) -> Self {
        ConfigError::Load(error)
    }
}

/// Error kinds reported to callers, distinguishable without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AccessDenied,
    StorageError,
    InvalidPattern,
    InvalidRequest,
}
