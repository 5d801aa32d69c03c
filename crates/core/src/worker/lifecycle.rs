//! Install and activate.

use serde::Serialize;

use super::{OfflineWorker, WorkerState};
use crate::Error;
use crate::http::Request;

/// What install managed to pre-cache.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct InstallReport {
    pub state: WorkerState,
    /// Number of routes stored in the static partition.
    pub precached: usize,
    /// Why pre-caching was abandoned, if it was.
    pub error: Option<String>,
}

/// Partitions removed on activation.
#[derive(Debug, Clone, Serialize, schemars::JsonSchema)]
pub struct ActivateReport {
    pub state: WorkerState,
    pub deleted: Vec<String>,
}

impl OfflineWorker {
    /// Install, or refresh the pre-cache of a worker that already controls
    /// the page. An activated worker stays activated: skip-waiting means a
    /// new install never leaves the page uncontrolled.
    pub(crate) async fn install(&self) -> InstallReport {
        let refreshing = self.state().await == WorkerState::Activated;
        if !refreshing {
            self.set_state(WorkerState::Installing).await;
        }

        let partition = self.config.caches.static_assets.as_str();
        let (precached, error) = match self.precache(partition).await {
            Ok(precached) => {
                tracing::info!(partition, precached, refreshing, "pre-cached static routes");
                (precached, None)
            }
            Err(e) => {
                tracing::error!(partition, error = %e, "pre-caching static routes failed");
                (0, Some(e.to_string()))
            }
        };

        let state = if refreshing { WorkerState::Activated } else { WorkerState::Installed };
        if !refreshing {
            self.set_state(state).await;
        }
        self.host.skip_waiting().await;
        InstallReport { state, precached, error }
    }

    /// Fetch every pre-cache route, then store them in one batch. Any failure
    /// stores nothing.
    async fn precache(&self, partition: &str) -> Result<usize, Error> {
        self.caches.open(partition).await?;

        let mut entries = Vec::with_capacity(self.config.precache.len());
        for path in &self.config.precache {
            let request = Request::get(self.resolve(path)?);
            let response = self.fetcher.fetch(&request).await?;
            if !response.is_ok() {
                return Err(Error::Network(format!("{} returned {}", request.url, response.status)));
            }
            entries.push((request, response));
        }

        let count = entries.len();
        self.caches.put_all(partition, entries).await?;
        Ok(count)
    }

    pub(crate) async fn activate(&self) -> Result<ActivateReport, Error> {
        let state = self.state().await;
        if !matches!(state, WorkerState::Installed | WorkerState::Activated) {
            return Err(Error::InvalidInput(format!("cannot activate a worker that is {state}")));
        }

        self.set_state(WorkerState::Activating).await;

        let mut deleted = Vec::new();
        for name in self.caches.keys().await? {
            if self.config.caches.contains(&name) {
                continue;
            }
            if self.caches.delete(&name).await? {
                tracing::info!(partition = %name, "deleted old cache partition");
                deleted.push(name);
            }
        }

        self.host.claim_clients().await;
        self.set_state(WorkerState::Activated).await;

        Ok(ActivateReport { state: WorkerState::Activated, deleted })
    }
}
