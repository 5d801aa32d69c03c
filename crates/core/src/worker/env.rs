//! Seams between the worker and the environment hosting it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;

use super::push::Notification;
use crate::Error;
use crate::http::{Request, Response};

/// The network primitive.
///
/// Transport failures are errors. A response with a non-ok status is *not* an
/// error: it is returned as-is and the caller decides what to do with it.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<Response, Error>;
}

/// Capabilities of the runtime the worker lives in: lifecycle control over
/// the pages it serves, and the notification surface.
#[async_trait]
pub trait WorkerHost: Send + Sync {
    /// Activate this version without waiting for old pages to close.
    async fn skip_waiting(&self);

    /// Take control of every open page without a reload.
    async fn claim_clients(&self);

    async fn show_notification(&self, notification: &Notification) -> Result<(), Error>;

    async fn close_notification(&self, notification: &Notification);

    /// Open a window at `url`, or focus one already showing it.
    async fn open_window(&self, url: &Url) -> Result<(), Error>;
}

/// Source of the current time, used for image freshness.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
