//! cache_list tool implementation.

use darkroom_core::CacheDb;
use darkroom_core::cache::PartitionSummary;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::Serialize;

use crate::tools::json_result;

/// Output from the cache_list tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CacheListOutput {
    pub partitions: Vec<PartitionSummary>,
}

/// Implementation of the cache_list tool.
pub async fn list_impl(cache: &CacheDb) -> Result<CallToolResult, McpError> {
    let partitions = cache.summaries().await?;
    json_result(&CacheListOutput { partitions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::output_json;
    use darkroom_core::{CacheStorage, Request, Response};
    use http::StatusCode;

    #[tokio::test]
    async fn test_list_empty() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let output = output_json(&list_impl(&cache).await.unwrap());
        assert_eq!(output["partitions"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_list_counts_entries() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let request = Request::get(url::Url::parse("https://studio.test/about").unwrap());
        cache
            .put("static-v1", &request, Response::new(StatusCode::OK, "about"))
            .await
            .unwrap();
        cache.open("images-v1").await.unwrap();

        let output = output_json(&list_impl(&cache).await.unwrap());
        let partitions = output["partitions"].as_array().unwrap();
        assert_eq!(partitions.len(), 2);

        let static_v1 = partitions.iter().find(|p| p["name"] == "static-v1").unwrap();
        assert_eq!(static_v1["entries"], 1);
        let images_v1 = partitions.iter().find(|p| p["name"] == "images-v1").unwrap();
        assert_eq!(images_v1["entries"], 0);
    }
}
