//! File system storage management
//!
//! Handles sandboxed file operations and recursive search.

pub mod filesystem;
pub mod operations;
pub mod results;
pub mod search;

pub use operations::FileOps;
pub use results::{DirEntryInfo, SearchOutcome, SkippedEntry};
