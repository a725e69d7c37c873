//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::Env;

/// Setup logging for the gateway.
///
/// `RUST_LOG` controls verbosity and defaults to `info`. Output goes to
/// stderr so it never mixes with tool responses.
pub fn setup_logging() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
}
