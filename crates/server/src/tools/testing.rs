//! Test doubles shared by the tool tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use darkroom_core::http::{Request, Response};
use darkroom_core::{CacheDb, Error, Fetcher, OfflineWorker, WorkerConfig};
use http::StatusCode;
use rmcp::model::CallToolResult;

use crate::host::LogHost;

pub(crate) const ORIGIN: &str = "https://studio.test/";

/// Answers every request with a small HTML page named after its path.
pub(crate) struct ScriptedFetcher {
    offline: AtomicBool,
}

impl ScriptedFetcher {
    pub(crate) fn online() -> Self {
        Self { offline: AtomicBool::new(false) }
    }

    pub(crate) fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network("offline".into()));
        }
        let body = format!("<h1>{}</h1>", request.url.path());
        Ok(Response::new(StatusCode::OK, body).with_header("content-type", "text/html"))
    }
}

pub(crate) struct Fixture {
    pub(crate) worker: OfflineWorker,
    pub(crate) cache: CacheDb,
    pub(crate) fetcher: Arc<ScriptedFetcher>,
}

impl Fixture {
    pub(crate) async fn new() -> Self {
        let cache = CacheDb::open_in_memory().await.unwrap();
        let fetcher = Arc::new(ScriptedFetcher::online());
        let config = WorkerConfig { origin: url::Url::parse(ORIGIN).unwrap(), ..WorkerConfig::default() };
        let worker = OfflineWorker::new(config, Arc::new(cache.clone()), fetcher.clone(), Arc::new(LogHost));
        Self { worker, cache, fetcher }
    }
}

/// Parse the JSON text content of a tool result.
pub(crate) fn output_json(result: &CallToolResult) -> serde_json::Value {
    let content_val = serde_json::to_value(&result.content[0]).unwrap();
    let text = content_val
        .get("text")
        .and_then(|v| v.as_str())
        .expect("Expected text field in content");
    serde_json::from_str(text).unwrap()
}
