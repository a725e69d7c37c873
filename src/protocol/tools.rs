//! Tool registry
//!
//! Static descriptions of the tools the gateway exposes, returned by the
//! `list_tools` call.

use serde::Serialize;

/// Description of one tool and its arguments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

const TOOLS: &[ToolSpec] = &[
    ToolSpec {
        name: "read_file",
        description: "Read the contents of a file",
        required: &["path"],
        optional: &[],
    },
    ToolSpec {
        name: "write_file",
        description: "Write content to a file, replacing it if it exists",
        required: &["path", "content"],
        optional: &[],
    },
    ToolSpec {
        name: "list_directory",
        description: "List the contents of a directory",
        required: &["path"],
        optional: &[],
    },
    ToolSpec {
        name: "create_directory",
        description: "Create a new directory",
        required: &["path"],
        optional: &[],
    },
    ToolSpec {
        name: "search_files",
        description: "Recursively search for entries whose name matches a glob pattern",
        required: &["path", "pattern"],
        optional: &["exclude_patterns"],
    },
    ToolSpec {
        name: "list_tools",
        description: "List the available tools",
        required: &[],
        optional: &[],
    },
    ToolSpec {
        name: "list_allowed_directories",
        description: "List the directories this gateway may access",
        required: &[],
        optional: &[],
    },
];

/// All tools, in a stable order
pub fn available_tools() -> &'static [ToolSpec] {
    TOOLS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ToolCall;

    #[test]
    fn test_registry_covers_every_call() {
        let calls = [
            ToolCall::ReadFile { path: String::new() },
            ToolCall::WriteFile { path: String::new(), content: String::new() },
            ToolCall::ListDirectory { path: String::new() },
            ToolCall::CreateDirectory { path: String::new() },
            ToolCall::SearchFiles {
                path: String::new(),
                pattern: String::new(),
                exclude_patterns: Vec::new(),
            },
            ToolCall::ListTools,
            ToolCall::ListAllowedDirectories,
        ];
        for call in &calls {
            assert!(
                available_tools().iter().any(|tool| tool.name == call.name()),
                "missing {}",
                call.name()
            );
        }
        assert_eq!(available_tools().len(), calls.len());
    }
}
