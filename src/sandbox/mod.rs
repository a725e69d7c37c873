//! Path sandbox
//!
//! Normalizes caller-supplied paths and authorizes them against the
//! allowed root directories before any storage access.

pub mod guard;
pub mod paths;
pub mod roots;

pub use guard::{AuthorizedPath, PathGuard};
pub use paths::{expand_home, normalize};
pub use roots::{AllowedRoot, AllowedRoots};
