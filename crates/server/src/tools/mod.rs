//! MCP tool implementations.
//!
//! This module contains all tools exposed by the darkroom-sw server.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

use darkroom_core::Error;

pub mod cache;
pub mod worker_events;
pub mod worker_fetch;
pub mod worker_lifecycle;

#[cfg(test)]
pub(crate) mod testing;

/// Serialize a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
