//! worker_install and worker_activate tool implementations.

use darkroom_core::{OfflineWorker, WorkerHandler};
use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::json_result;

/// Run the install event. Pre-cache failures are part of the report, not errors.
pub async fn install_impl(worker: &OfflineWorker) -> Result<CallToolResult, McpError> {
    let report = worker.on_install().await;
    json_result(&report)
}

/// Run the activate event.
pub async fn activate_impl(worker: &OfflineWorker) -> Result<CallToolResult, McpError> {
    let report = worker.on_activate().await?;
    json_result(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::testing::{Fixture, output_json};
    use darkroom_core::CacheStorage;

    #[tokio::test]
    async fn test_install_precaches_static_routes() {
        let f = Fixture::new().await;
        let output = output_json(&install_impl(&f.worker).await.unwrap());

        assert_eq!(output["state"], "installed");
        assert_eq!(output["precached"], 7);
        assert!(output["error"].is_null());
    }

    #[tokio::test]
    async fn test_install_offline_reports_error() {
        let f = Fixture::new().await;
        f.fetcher.go_offline();
        let output = output_json(&install_impl(&f.worker).await.unwrap());

        assert_eq!(output["state"], "installed");
        assert_eq!(output["precached"], 0);
        assert!(output["error"].as_str().unwrap().starts_with("NETWORK_ERROR"));
    }

    #[tokio::test]
    async fn test_activate_before_install_fails() {
        let f = Fixture::new().await;
        assert!(activate_impl(&f.worker).await.is_err());
    }

    #[tokio::test]
    async fn test_activate_deletes_old_partitions() {
        let f = Fixture::new().await;
        f.cache.open("photography-v0").await.unwrap();
        install_impl(&f.worker).await.unwrap();

        let output = output_json(&activate_impl(&f.worker).await.unwrap());
        assert_eq!(output["state"], "activated");
        assert_eq!(output["deleted"], serde_json::json!(["photography-v0"]));
        assert!(!f.cache.has("photography-v0").await.unwrap());
    }
}
