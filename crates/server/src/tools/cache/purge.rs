//! cache_purge tool implementation.
//!
//! Deletes one partition with every entry in it.

use darkroom_core::{CacheDb, CacheStorage, Error};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Partition to delete.
    pub partition: String,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    pub partition: String,
    /// False when no such partition existed.
    pub deleted: bool,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(cache: &CacheDb, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    if params.partition.trim().is_empty() {
        return Err(Error::InvalidInput("partition cannot be empty".to_string()).into());
    }

    let deleted = cache.delete(&params.partition).await?;
    tracing::info!(partition = %params.partition, deleted, "purged cache partition");

    json_result(&CachePurgeOutput { partition: params.partition, deleted })
}
