//! Tool responses
//!
//! Defines the response sent back for every request line.

use serde::Serialize;
use std::path::PathBuf;

use crate::error::ErrorKind;
use crate::protocol::tools::ToolSpec;
use crate::storage::{DirEntryInfo, SkippedEntry};

/// Payload of a successful tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolData {
    Text { text: String },
    Entries { entries: Vec<DirEntryInfo> },
    Search { matches: Vec<PathBuf>, skipped: Vec<SkippedEntry> },
    Paths { paths: Vec<PathBuf> },
    Tools { tools: Vec<ToolSpec> },
}

/// Outcome of one tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResponse {
    Ok {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<ToolData>,
    },
    Error {
        kind: ErrorKind,
        message: String,
    },
}

impl ToolResponse {
    pub fn ok(message: impl Into<String>, data: Option<ToolData>) -> Self {
        ToolResponse::Ok {
            message: message.into(),
            data,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        ToolResponse::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ToolResponse::Ok { .. })
    }

    /// Serialize as a single newline-terminated JSON line
    pub fn to_line(&self) -> String {
        match serde_json::to_string(self) {
            Ok(mut line) => {
                line.push('\n');
                line
            }
            Err(e) => format!(
                "{{\"status\":\"error\",\"kind\":\"invalid_request\",\"message\":\"cannot encode response: {}\"}}\n",
                e.to_string().replace('"', "'")
            ),
        }
    }
}
