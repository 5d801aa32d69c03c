//! worker_fetch tool implementation.
//!
//! Routes one request through the worker's fetch handler. A request the
//! worker declines is fetched directly, as the page would.

use darkroom_client::resolve;
use darkroom_core::http::{Destination, RequestMode};
use darkroom_core::worker::{ResponseSource, Route};
use darkroom_core::{Error, FetchOutcome, Fetcher, OfflineWorker, Request, Response, WorkerHandler};
use http::{HeaderMap, Method};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for worker_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WorkerFetchParams {
    /// Absolute URL or site-relative path (e.g. "/portfolio").
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Resource kind, e.g. "image" or "document".
    #[serde(default)]
    pub destination: Destination,

    /// Request mode; "navigate" marks a full page load.
    #[serde(default)]
    pub mode: RequestMode,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for worker_fetch tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WorkerFetchOutput {
    /// The resolved request URL.
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Body decoded as UTF-8 (lossy).
    pub body_text: String,
    pub body_bytes: usize,
    /// True when the worker declined and the request went straight to the network.
    pub passthrough: bool,
    pub source: Option<ResponseSource>,
    pub route: Option<Route>,
}

impl WorkerFetchOutput {
    fn new(
        url: String, response: &Response, passthrough: bool, source: Option<ResponseSource>, route: Option<Route>,
    ) -> Self {
        Self {
            url,
            status: response.status.as_u16(),
            headers: response.header_pairs(),
            body_text: String::from_utf8_lossy(&response.body).into_owned(),
            body_bytes: response.body.len(),
            passthrough,
            source,
            route,
        }
    }
}

/// Implementation of the worker_fetch tool.
pub async fn fetch_impl(
    worker: &OfflineWorker, fetcher: &dyn Fetcher, params: WorkerFetchParams,
) -> Result<CallToolResult, McpError> {
    let url = resolve(&worker.config().origin, &params.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
    let method = Method::from_bytes(params.method.trim().to_uppercase().as_bytes())
        .map_err(|e| Error::InvalidInput(format!("invalid method {:?}: {e}", params.method)))?;

    let request = Request { method, url, destination: params.destination, mode: params.mode, headers: HeaderMap::new() };

    let output = match worker.on_fetch(&request).await? {
        FetchOutcome::Passthrough => {
            tracing::debug!(url = %request.url, "worker declined, fetching directly");
            let response = fetcher.fetch(&request).await?;
            WorkerFetchOutput::new(request.url.to_string(), &response, true, None, None)
        }
        FetchOutcome::Respond { response, source, route } => {
            WorkerFetchOutput::new(request.url.to_string(), &response, false, Some(source), Some(route))
        }
    };

    json_result(&output)
}
