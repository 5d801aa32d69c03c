//! Test doubles for the worker's seams.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use http::StatusCode;
use url::Url;

use super::{Clock, Fetcher, Notification, OfflineWorker, WorkerConfig, WorkerHost, WorkerState};
use crate::Error;
use crate::cache::{CacheDb, CacheStorage};
use crate::http::{Request, Response};

pub(crate) const ORIGIN: &str = "https://studio.test/";

/// Network double: scripted responses by path, 404 for anything else.
#[derive(Default)]
pub(crate) struct MockFetcher {
    routes: Mutex<HashMap<String, Response>>,
    offline: AtomicBool,
    calls: AtomicUsize,
}

impl MockFetcher {
    pub(crate) fn respond(&self, path: &str, response: Response) {
        self.routes.lock().unwrap().insert(path.to_string(), response);
    }

    pub(crate) fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network("offline".into()));
        }
        let routes = self.routes.lock().unwrap();
        Ok(routes
            .get(request.url.path())
            .cloned()
            .unwrap_or_else(|| Response::new(StatusCode::NOT_FOUND, "not found")))
    }
}

/// Store double: the real SQLite store, with traffic counters and
/// injectable read and write failures.
pub(crate) struct CountingStorage {
    pub(crate) inner: CacheDb,
    reads: AtomicUsize,
    writes: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl CountingStorage {
    pub(crate) fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    fn read(&self) -> Result<(), Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::CorruptEntry("disk I/O error".into()));
        }
        Ok(())
    }

    fn write(&self) -> Result<(), Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::CorruptEntry("quota exceeded".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStorage for CountingStorage {
    async fn open(&self, name: &str) -> Result<(), Error> {
        self.inner.open(name).await
    }

    async fn has(&self, name: &str) -> Result<bool, Error> {
        self.read()?;
        self.inner.has(name).await
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.read()?;
        self.inner.keys().await
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        self.write()?;
        self.inner.delete(name).await
    }

    async fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>, Error> {
        self.read()?;
        self.inner.match_request(name, request).await
    }

    async fn put(&self, name: &str, request: &Request, response: Response) -> Result<(), Error> {
        self.write()?;
        self.inner.put(name, request, response).await
    }

    async fn put_all(&self, name: &str, entries: Vec<(Request, Response)>) -> Result<(), Error> {
        self.write()?;
        self.inner.put_all(name, entries).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostEvent {
    SkipWaiting,
    Claim,
    Shown(Notification),
    Closed(String),
    Opened(Url),
}

#[derive(Default)]
pub(crate) struct RecordingHost {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingHost {
    pub(crate) fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }

    fn record(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl WorkerHost for RecordingHost {
    async fn skip_waiting(&self) {
        self.record(HostEvent::SkipWaiting);
    }

    async fn claim_clients(&self) {
        self.record(HostEvent::Claim);
    }

    async fn show_notification(&self, notification: &Notification) -> Result<(), Error> {
        self.record(HostEvent::Shown(notification.clone()));
        Ok(())
    }

    async fn close_notification(&self, notification: &Notification) {
        self.record(HostEvent::Closed(notification.title.clone()));
    }

    async fn open_window(&self, url: &Url) -> Result<(), Error> {
        self.record(HostEvent::Opened(url.clone()));
        Ok(())
    }
}

pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A worker wired to test doubles, with an in-memory store.
pub(crate) struct Harness {
    pub(crate) worker: OfflineWorker,
    pub(crate) fetcher: Arc<MockFetcher>,
    pub(crate) caches: Arc<CountingStorage>,
    pub(crate) host: Arc<RecordingHost>,
    now: DateTime<Utc>,
}

impl Harness {
    pub(crate) async fn new() -> Self {
        let now = Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap();
        let fetcher = Arc::new(MockFetcher::default());
        let caches = Arc::new(CountingStorage {
            inner: CacheDb::open_in_memory().await.unwrap(),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        });
        let host = Arc::new(RecordingHost::default());
        let config = WorkerConfig { origin: Url::parse(ORIGIN).unwrap(), ..WorkerConfig::default() };
        let worker = OfflineWorker::new(config, caches.clone(), fetcher.clone(), host.clone())
            .with_clock(Arc::new(FixedClock(now)));

        Self { worker, fetcher, caches, host, now }
    }

    /// A worker that already controls the page, with nothing pre-cached.
    pub(crate) async fn activated() -> Self {
        let harness = Self::new().await;
        harness.worker.force_state(WorkerState::Activated).await;
        harness
    }

    pub(crate) fn url(&self, path: &str) -> Url {
        Url::parse(ORIGIN).unwrap().join(path).unwrap()
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Write straight to the store, bypassing the counters.
    pub(crate) async fn seed(&self, partition: &str, request: &Request, response: Response) {
        self.caches.inner.put(partition, request, response).await.unwrap();
    }
}
