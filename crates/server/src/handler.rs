//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the worker's events and the cache store.
use std::sync::Arc;

use crate::tools::cache::{
    CacheGetParams, CachePurgeParams, get_impl as cache_get_impl, list_impl as cache_list_impl,
    purge_impl as cache_purge_impl,
};
use crate::tools::worker_events::{
    NotificationClickParams, PushParams, SyncParams, click_impl, push_impl, sync_impl,
};
use crate::tools::worker_fetch::{WorkerFetchParams, fetch_impl};
use crate::tools::worker_lifecycle::{activate_impl, install_impl};

use darkroom_core::{CacheDb, Fetcher, OfflineWorker};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for darkroom-sw.
#[derive(Clone)]
pub struct DarkroomServer {
    tool_router: ToolRouter<Self>,
    worker: Arc<OfflineWorker>,
    cache: CacheDb,
    fetcher: Arc<dyn Fetcher>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl DarkroomServer {
    /// Create a new server handler around a worker and the store it writes to.
    pub fn new(worker: OfflineWorker, cache: CacheDb, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { tool_router: Self::tool_router(), worker: Arc::new(worker), cache, fetcher }
    }

    /// Route one request through the worker's fetch handler.
    #[tool(
        description = "Route a request through the offline worker. Returns status, headers, body text, and whether it came from the network, a cache, or a fallback."
    )]
    async fn worker_fetch(&self, params: Parameters<WorkerFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.worker, self.fetcher.as_ref(), params.0).await
    }

    #[tool(description = "Run the install event: pre-cache static routes. Returns the resulting state.")]
    async fn worker_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(&self.worker).await
    }

    #[tool(description = "Run the activate event: delete unknown cache partitions and claim clients.")]
    async fn worker_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(&self.worker).await
    }

    #[tool(description = "Deliver a push message (JSON with title, body, url). Returns the notification shown.")]
    async fn worker_push(&self, params: Parameters<PushParams>) -> Result<CallToolResult, McpError> {
        push_impl(&self.worker, params.0).await
    }

    #[tool(description = "Click a notification. The \"view\" action opens its URL, or the home page.")]
    async fn worker_notification_click(
        &self, params: Parameters<NotificationClickParams>,
    ) -> Result<CallToolResult, McpError> {
        click_impl(&self.worker, params.0).await
    }

    #[tool(description = "Fire a background sync tag.")]
    async fn worker_sync(&self, params: Parameters<SyncParams>) -> Result<CallToolResult, McpError> {
        sync_impl(&self.worker, params.0).await
    }

    #[tool(description = "List cache partitions with their entry counts.")]
    async fn cache_list(&self) -> Result<CallToolResult, McpError> {
        cache_list_impl(&self.cache).await
    }

    #[tool(description = "Look up a URL in a cache partition. Returns entry metadata.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        cache_get_impl(&self.cache, &self.worker.config().origin, params.0).await
    }

    #[tool(description = "Delete a cache partition and all of its entries.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        cache_purge_impl(&self.cache, params.0).await
    }
}

impl ServerHandler for DarkroomServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "darkroom-sw".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Offline worker for a photography portfolio site. Use worker_* tools to deliver events \
                 and cache_* tools to inspect the partitions."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
