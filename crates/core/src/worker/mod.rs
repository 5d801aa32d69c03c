//! The offline worker: routes intercepted requests through per-class caching
//! strategies and runs the lifecycle events of a deployment.
//!
//! ### Routing
//! - Non-GET requests pass through untouched; they never touch a partition.
//! - Images: served from cache while younger than the TTL (by `Date` header),
//!   otherwise refetched; stale copy or an SVG placeholder when offline.
//! - Navigations: network first, then the cached page, then the cached `/`,
//!   then a 503.
//! - Static assets: cache first; a miss that fails on the network is an error.
//! - Everything else: network first, cached copy on failure, else an error.
//!
//! Only ok (2xx) network responses are ever written.
//!
//! ### Lifecycle
//! - Install pre-caches the configured routes (all or nothing, best effort)
//!   and skips waiting.
//! - Activate deletes every partition not named in [`CacheNames`] and claims
//!   open pages.

mod env;
mod fallback;
mod lifecycle;
mod push;
mod router;
mod strategies;
mod sync;

#[cfg(test)]
pub(crate) mod testing;

pub use env::{Clock, Fetcher, SystemClock, WorkerHost};
pub use fallback::{offline_document, placeholder_image};
pub use lifecycle::{ActivateReport, InstallReport};
pub use push::{Notification, NotificationAction, PushPayload};
pub use router::{Route, classify};
pub use sync::{CONTACT_FORM_TAG, SyncOutcome};

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;
use url::Url;

use crate::Error;
use crate::cache::CacheStorage;
use crate::http::{Request, Response};

/// Names of the partitions the current version owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNames {
    pub generic: String,
    pub static_assets: String,
    pub images: String,
}

impl CacheNames {
    pub fn contains(&self, name: &str) -> bool {
        [&self.generic, &self.static_assets, &self.images].iter().any(|n| n.as_str() == name)
    }
}

/// Presentation of push notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub icon: String,
    pub badge: String,
    /// Vibration pattern in milliseconds.
    pub vibrate: Vec<u32>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { icon: "/icons/icon-192.png".into(), badge: "/icons/badge-72.png".into(), vibrate: vec![200, 100, 200] }
    }
}

/// Everything the worker needs to know about its deployment.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub caches: CacheNames,
    /// Cached images younger than this are served without touching the network.
    pub image_ttl: chrono::Duration,
    pub static_prefix: String,
    pub static_extensions: Vec<String>,
    /// Site-relative paths stored at install time.
    pub precache: Vec<String>,
    pub origin: Url,
    pub notification: NotificationConfig,
}

/// Path suffixes that mark a request as a static asset.
pub fn default_static_extensions() -> Vec<String> {
    vec![".css".into(), ".js".into()]
}

impl Default for WorkerConfig {
    fn default() -> Self {
        crate::config::AppConfig::default().worker_config()
    }
}

/// Where the worker is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Parsed => "parsed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
        };
        f.write_str(s)
    }
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    Network,
    Cache,
    /// A cached copy served past its freshness because the network failed.
    StaleCache,
    /// Something other than the requested resource: a placeholder, the cached
    /// root page, or the offline page.
    Fallback,
}

/// Result of routing one request.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The worker declines; the page talks to the network directly.
    Passthrough,
    Respond { response: Response, source: ResponseSource, route: Route },
}

impl FetchOutcome {
    pub(crate) fn respond(response: Response, source: ResponseSource, route: Route) -> Self {
        Self::Respond { response, source, route }
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Passthrough => None,
            Self::Respond { response, .. } => Some(response),
        }
    }

    pub fn source(&self) -> Option<ResponseSource> {
        match self {
            Self::Passthrough => None,
            Self::Respond { source, .. } => Some(*source),
        }
    }
}

/// One method per event the runtime delivers to a worker.
#[async_trait]
pub trait WorkerHandler: Send + Sync {
    /// Pre-cache and move to `installed`; an activated worker only refreshes
    /// its pre-cache and stays activated. Never fails; pre-cache problems are
    /// reported and logged.
    async fn on_install(&self) -> InstallReport;

    /// Drop partitions of earlier versions and take control of open pages.
    async fn on_activate(&self) -> Result<ActivateReport, Error>;

    async fn on_fetch(&self, request: &Request) -> Result<FetchOutcome, Error>;

    /// Show a notification for a push message. An empty message shows nothing.
    async fn on_push(&self, payload: Option<&[u8]>) -> Result<Option<Notification>, Error>;

    /// Returns the URL of the window opened, if any.
    async fn on_notification_click(&self, notification: &Notification, action: Option<&str>)
    -> Result<Option<Url>, Error>;

    async fn on_sync(&self, tag: &str) -> Result<SyncOutcome, Error>;
}

/// The worker. Holds no global state: every dependency is passed in.
pub struct OfflineWorker {
    config: WorkerConfig,
    caches: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    host: Arc<dyn WorkerHost>,
    clock: Arc<dyn Clock>,
    state: RwLock<WorkerState>,
}

impl OfflineWorker {
    pub fn new(
        config: WorkerConfig, caches: Arc<dyn CacheStorage>, fetcher: Arc<dyn Fetcher>, host: Arc<dyn WorkerHost>,
    ) -> Self {
        Self { config, caches, fetcher, host, clock: Arc::new(SystemClock), state: RwLock::new(WorkerState::Parsed) }
    }

    /// Replace the wall clock (freshness checks only).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    async fn set_state(&self, state: WorkerState) {
        let mut current = self.state.write().await;
        tracing::info!(from = %*current, to = %state, "worker state change");
        *current = state;
    }

    /// Resolve a site-relative path (or absolute URL) against the origin.
    fn resolve(&self, target: &str) -> Result<Url, Error> {
        self.config
            .origin
            .join(target)
            .map_err(|e| Error::InvalidUrl(format!("{target}: {e}")))
    }

    #[cfg(test)]
    pub(crate) async fn force_state(&self, state: WorkerState) {
        *self.state.write().await = state;
    }
}

#[async_trait]
impl WorkerHandler for OfflineWorker {
    async fn on_install(&self) -> InstallReport {
        self.install().await
    }

    async fn on_activate(&self) -> Result<ActivateReport, Error> {
        self.activate().await
    }

    async fn on_fetch(&self, request: &Request) -> Result<FetchOutcome, Error> {
        if !request.is_get() {
            tracing::debug!(method = %request.method, url = %request.url, "passing through non-GET request");
            return Ok(FetchOutcome::Passthrough);
        }

        if self.state().await != WorkerState::Activated {
            return Ok(FetchOutcome::Passthrough);
        }

        let route = classify(request, &self.config);
        tracing::debug!(url = %request.url, ?route, "routing request");

        match route {
            Route::Image => self.image(request).await,
            Route::Navigation => self.navigation(request).await,
            Route::StaticAsset => self.static_asset(request).await,
            Route::Default => self.network_first(request).await,
        }
    }

    async fn on_push(&self, payload: Option<&[u8]>) -> Result<Option<Notification>, Error> {
        self.push(payload).await
    }

    async fn on_notification_click(
        &self, notification: &Notification, action: Option<&str>,
    ) -> Result<Option<Url>, Error> {
        self.notification_click(notification, action).await
    }

    async fn on_sync(&self, tag: &str) -> Result<SyncOutcome, Error> {
        Ok(sync::handle(tag))
    }
}
