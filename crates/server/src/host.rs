//! Host side of the worker seams for a headless process.
//!
//! There are no pages to control and no notification tray, so every host
//! capability is reported through tracing.

use async_trait::async_trait;
use darkroom_core::worker::Notification;
use darkroom_core::{Error, WorkerHost};
use url::Url;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogHost;

#[async_trait]
impl WorkerHost for LogHost {
    async fn skip_waiting(&self) {
        tracing::debug!("skip waiting");
    }

    async fn claim_clients(&self) {
        tracing::debug!("claimed clients");
    }

    async fn show_notification(&self, notification: &Notification) -> Result<(), Error> {
        tracing::info!(title = %notification.title, body = %notification.body, "show notification");
        Ok(())
    }

    async fn close_notification(&self, notification: &Notification) {
        tracing::debug!(title = %notification.title, "close notification");
    }

    async fn open_window(&self, url: &Url) -> Result<(), Error> {
        tracing::info!(url = %url, "open window");
        Ok(())
    }
}
