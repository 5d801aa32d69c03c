//! cache_get tool implementation.
//!
//! Looks up a URL in one partition and returns the entry's metadata.

use darkroom_client::resolve;
use darkroom_core::cache::CachedEntry;
use darkroom_core::{CacheDb, Error, Request};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Partition name, e.g. "static-v1".
    pub partition: String,

    /// Absolute URL or site-relative path.
    pub url: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct CacheGetOutput {
    pub entry: CachedEntry,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(cache: &CacheDb, origin: &Url, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let url = resolve(origin, &params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let request = Request::get(url);

    let entry = cache
        .entry(&params.partition, &request)
        .await?
        .ok_or_else(|| Error::CacheMiss(format!("{} in {}", request.cache_url(), params.partition)))?;

    json_result(&CacheGetOutput { entry })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{ORIGIN, output_json};
    use darkroom_core::{CacheStorage, Response};
    use http::StatusCode;

    fn origin() -> Url {
        Url::parse(ORIGIN).unwrap()
    }

    #[tokio::test]
    async fn test_get_impl_missing() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let params = CacheGetParams { partition: "static-v1".into(), url: "/about".into() };

        let result = get_impl(&cache, &origin(), params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_impl_found() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let request = Request::get(origin().join("/about").unwrap());
        let response = Response::new(StatusCode::OK, "<h1>About</h1>").with_header("content-type", "text/html");
        cache.put("static-v1", &request, response).await.unwrap();

        let params = CacheGetParams { partition: "static-v1".into(), url: "/about#team".into() };
        let output = output_json(&get_impl(&cache, &origin(), params).await.unwrap());

        assert_eq!(output["entry"]["url"], "https://studio.test/about");
        assert_eq!(output["entry"]["status"], 200);
        assert_eq!(output["entry"]["content_type"], "text/html");
        assert_eq!(output["entry"]["size"], 14);
    }

    #[tokio::test]
    async fn test_get_impl_other_partition() {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let request = Request::get(origin().join("/about").unwrap());
        cache
            .put("static-v1", &request, Response::new(StatusCode::OK, "about"))
            .await
            .unwrap();

        let params = CacheGetParams { partition: "photography-v1".into(), url: "/about".into() };
        assert!(get_impl(&cache, &origin(), params).await.is_err());
    }
}
