//! Server core functionality
//!
//! This module contains the TCP listener and the per-connection session
//! loop that carries tool calls to the gateway.

pub mod core;
pub mod session;

pub use core::Server;
