//! Error handlers
//!
//! Maps gateway errors to the kinds reported to callers and logs them.

use crate::error::types::{ErrorKind, GatewayError};
use log::{error, warn};

/// Log a gateway error at a level matching its kind
pub fn handle_error(err: &GatewayError) {
    match err {
        GatewayError::AccessDenied(_) => warn!("{}", err),
        GatewayError::Storage(_) => error!("{}", err),
        GatewayError::InvalidPattern { .. } => warn!("{}", err),
    }
}

/// Convert error to the kind reported over the wire
pub fn error_kind(err: &GatewayError) -> ErrorKind {
    match err {
        GatewayError::AccessDenied(_) => ErrorKind::AccessDenied,
        GatewayError::Storage(_) => ErrorKind::StorageError,
        GatewayError::InvalidPattern { .. } => ErrorKind::InvalidPattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::types::{AccessDenied, StorageError};
    use std::path::PathBuf;

    #[test]
    fn test_denials_and_storage_failures_map_to_distinct_kinds() {
        let denied = GatewayError::from(AccessDenied::OutsideAllowlist {
            path: PathBuf::from("/etc/passwd"),
            allowed: vec![PathBuf::from("/data")],
        });
        let missing = GatewayError::from(StorageError::NotFound(PathBuf::from("/data/x")));

        assert_eq!(error_kind(&denied), ErrorKind::AccessDenied);
        assert_eq!(error_kind(&missing), ErrorKind::StorageError);
    }

    #[test]
    fn test_denial_message_names_path_and_allowlist() {
        let denied = AccessDenied::OutsideAllowlist {
            path: PathBuf::from("/etc/passwd"),
            allowed: vec![PathBuf::from("/data"), PathBuf::from("/srv")],
        };
        let message = denied.to_string();
        assert!(message.contains("/etc/passwd"));
        assert!(message.contains("/data, /srv"));
    }
}
