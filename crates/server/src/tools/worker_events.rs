//! worker_push, worker_notification_click and worker_sync tool implementations.

use darkroom_core::worker::{Notification, SyncOutcome};
use darkroom_core::{Error, OfflineWorker, WorkerHandler};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for worker_push tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PushParams {
    /// Raw push message data, normally JSON `{"title", "body", "url"}`.
    /// Omitted or empty data shows nothing.
    #[serde(default)]
    pub data: Option<String>,
}

/// Output structure for worker_push tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PushOutput {
    pub notification: Option<Notification>,
}

/// Input parameters for worker_notification_click tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NotificationClickParams {
    /// Title of the notification clicked.
    pub title: String,

    /// URL carried by the notification.
    #[serde(default)]
    pub data: Option<String>,

    /// Action button pressed: "view" or "close". Omitted for a click on the body.
    #[serde(default)]
    pub action: Option<String>,
}

/// Output structure for worker_notification_click tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct NotificationClickOutput {
    /// Window opened, if any.
    pub opened: Option<String>,
}

/// Input parameters for worker_sync tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncParams {
    pub tag: String,
}

/// Output structure for worker_sync tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct SyncOutput {
    pub outcome: SyncOutcome,
}

/// Implementation of the worker_push tool.
pub async fn push_impl(worker: &OfflineWorker, params: PushParams) -> Result<CallToolResult, McpError> {
    let notification = worker.on_push(params.data.as_deref().map(str::as_bytes)).await?;
    json_result(&PushOutput { notification })
}

/// Implementation of the worker_notification_click tool.
pub async fn click_impl(worker: &OfflineWorker, params: NotificationClickParams) -> Result<CallToolResult, McpError> {
    if params.title.trim().is_empty() {
        return Err(Error::InvalidInput("title cannot be empty".into()).into());
    }

    let style = &worker.config().notification;
    let notification = Notification {
        title: params.title,
        body: String::new(),
        icon: style.icon.clone(),
        badge: style.badge.clone(),
        vibrate: style.vibrate.clone(),
        data: params.data,
        actions: Vec::new(),
    };

    let opened = worker
        .on_notification_click(&notification, params.action.as_deref())
        .await?;
    json_result(&NotificationClickOutput { opened: opened.map(String::from) })
}

/// Implementation of the worker_sync tool.
pub async fn sync_impl(worker: &OfflineWorker, params: SyncParams) -> Result<CallToolResult, McpError> {
    let outcome = worker.on_sync(&params.tag).await?;
    json_result(&SyncOutput { outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{Fixture, ORIGIN, output_json};

    #[tokio::test]
    async fn test_push_shows_notification() {
        let f = Fixture::new().await;
        let params = PushParams { data: Some(r#"{"title":"New gallery","url":"/portfolio"}"#.into()) };
        let output = output_json(&push_impl(&f.worker, params).await.unwrap());

        let notification = &output["notification"];
        assert_eq!(notification["title"], "New gallery");
        assert_eq!(notification["data"], "/portfolio");
        assert_eq!(notification["vibrate"], serde_json::json!([200, 100, 200]));
        assert_eq!(notification["actions"][0]["action"], "view");
    }

    #[tokio::test]
    async fn test_push_without_data() {
        let f = Fixture::new().await;
        let output = output_json(&push_impl(&f.worker, PushParams { data: None }).await.unwrap());
        assert!(output["notification"].is_null());
    }

    #[tokio::test]
    async fn test_push_malformed() {
        let f = Fixture::new().await;
        let result = push_impl(&f.worker, PushParams { data: Some("{".into()) }).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_click_view_opens_url() {
        let f = Fixture::new().await;
        let params = NotificationClickParams {
            title: "New gallery".into(),
            data: Some("/portfolio".into()),
            action: Some("view".into()),
        };
        let output = output_json(&click_impl(&f.worker, params).await.unwrap());
        assert_eq!(output["opened"], format!("{ORIGIN}portfolio"));
    }

    #[tokio::test]
    async fn test_click_view_defaults_to_root() {
        let f = Fixture::new().await;
        let params = NotificationClickParams { title: "Hello".into(), data: None, action: Some("view".into()) };
        let output = output_json(&click_impl(&f.worker, params).await.unwrap());
        assert_eq!(output["opened"], ORIGIN);
    }

    #[tokio::test]
    async fn test_click_close_opens_nothing() {
        let f = Fixture::new().await;
        let params = NotificationClickParams { title: "Hello".into(), data: None, action: Some("close".into()) };
        let output = output_json(&click_impl(&f.worker, params).await.unwrap());
        assert!(output["opened"].is_null());
    }

    #[tokio::test]
    async fn test_sync_contact_form() {
        let f = Fixture::new().await;
        let output = output_json(&sync_impl(&f.worker, SyncParams { tag: "contact-form".into() }).await.unwrap());
        assert_eq!(output["outcome"]["recognized"], true);
        assert_eq!(output["outcome"]["flushed"], 0);
    }
}
