//! Tool protocol
//!
//! Handles request parsing, tool dispatch and response encoding.

pub mod commands;
pub mod handlers;
pub mod responses;
pub mod tools;

pub use commands::{ToolCall, parse_request};
pub use handlers::{handle_request_line, handle_tool_call};
pub use responses::{ToolData, ToolResponse};
