//! File system operations
//!
//! Thin wrappers over `std::fs` that map failures to `StorageError`.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::Builder;

use crate::error::StorageError;
use crate::storage::results::DirEntryInfo;

/// Read a whole file as UTF-8 text
pub fn read_text(path: &Path) -> Result<String, StorageError> {
    fs::read_to_string(path).map_err(|e| StorageError::from_io(path, e))
}

/// Replace `path` with `content`.
///
/// The content is written to a temporary file in the same directory and
/// then renamed over the target, so readers never see a partial file. An
/// existing target keeps its permissions; a new file gets the usual
/// umask-filtered mode.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<(), StorageError> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder
        .tempfile_in(dir)
        .map_err(|e| StorageError::from_io(dir, e))?;

    if let Ok(existing) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| StorageError::from_io(temp.path(), e))?;
    }
    if let Err(e) = temp.write_all(content.as_bytes()).and_then(|_| temp.flush()) {
        return Err(StorageError::from_io(temp.path(), e));
    }
    temp.persist(path)
        .map_err(|e| StorageError::from_io(path, e.error))?;
    Ok(())
}

/// Create a directory and any missing ancestors
pub fn create_directory(path: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(path).map_err(|e| StorageError::from_io(path, e))
}

/// Immediate children of `path`, in the order the OS returns them.
///
/// Entry types are not followed: a symlink to a directory reports
/// `is_directory: false`.
pub fn read_entries(path: &Path) -> Result<Vec<DirEntryInfo>, StorageError> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(|e| StorageError::from_io(path, e))? {
        let entry = entry.map_err(|e| StorageError::from_io(path, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| StorageError::from_io(&entry.path(), e))?;
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().to_string(),
            is_directory: file_type.is_dir(),
        });
    }
    Ok(entries)
}
