//! Sandboxed file gateway for tool-calling agents.
//!
//! Every read, write, list, mkdir and search request is authorized against a
//! fixed set of allowed root directories before the filesystem is touched.

pub mod config;
pub mod error;
pub mod protocol;
pub mod sandbox;
pub mod server;
pub mod storage;
pub mod utils;

pub use crate::config::GatewayConfig;
pub use error::{AccessDenied, GatewayError, StorageError};
pub use sandbox::{AllowedRoots, AuthorizedPath, PathGuard};
pub use server::Server;
pub use storage::FileOps;
