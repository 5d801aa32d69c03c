//! Push messages and notification clicks.

use serde::{Deserialize, Serialize};
use url::Url;

use super::OfflineWorker;
use crate::Error;

/// JSON body of a push message.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PushPayload {
    pub title: String,
    #[serde(default)]
    pub body: String,
    /// Page to open when the notification is viewed.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

/// A system notification as handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    /// URL carried from the payload to the click handler.
    pub data: Option<String>,
    pub actions: Vec<NotificationAction>,
}

pub(crate) const VIEW_ACTION: &str = "view";
pub(crate) const CLOSE_ACTION: &str = "close";

impl OfflineWorker {
    fn notification_for(&self, payload: PushPayload) -> Notification {
        let style = &self.config.notification;
        Notification {
            title: payload.title,
            body: payload.body,
            icon: style.icon.clone(),
            badge: style.badge.clone(),
            vibrate: style.vibrate.clone(),
            data: payload.url,
            actions: vec![
                NotificationAction { action: VIEW_ACTION.into(), title: "View".into() },
                NotificationAction { action: CLOSE_ACTION.into(), title: "Close".into() },
            ],
        }
    }

    pub(crate) async fn push(&self, payload: Option<&[u8]>) -> Result<Option<Notification>, Error> {
        let Some(bytes) = payload.filter(|b| !b.is_empty()) else {
            tracing::debug!("ignoring push message without data");
            return Ok(None);
        };

        let payload: PushPayload =
            serde_json::from_slice(bytes).map_err(|e| Error::InvalidInput(format!("push payload: {e}")))?;

        let notification = self.notification_for(payload);
        self.host.show_notification(&notification).await?;
        tracing::info!(title = %notification.title, "notification shown");

        Ok(Some(notification))
    }

    pub(crate) async fn notification_click(
        &self, notification: &Notification, action: Option<&str>,
    ) -> Result<Option<Url>, Error> {
        self.host.close_notification(notification).await;

        if action != Some(VIEW_ACTION) {
            return Ok(None);
        }

        let target = self.resolve(notification.data.as_deref().unwrap_or("/"))?;
        self.host.open_window(&target).await?;
        tracing::info!(url = %target, "opened window from notification");

        Ok(Some(target))
    }
}
