//! The four caching strategies.
//!
//! Cache-store failures never reach the page: a failed read counts as a miss
//! and a failed write is logged while the network response is still served.

use super::fallback::{offline_document, placeholder_image};
use super::{FetchOutcome, OfflineWorker, ResponseSource, Route};
use crate::Error;
use crate::http::{Request, Response};

impl OfflineWorker {
    /// Read from a partition, treating store failures as a miss.
    async fn lookup(&self, partition: &str, request: &Request) -> Option<Response> {
        match self.caches.match_request(partition, request).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(partition, url = %request.url, error = %e, "cache read failed");
                None
            }
        }
    }

    /// Persist a network response if it is ok.
    ///
    /// The partition receives its own copy; the caller keeps `response` to
    /// hand to the page. Both stay independently readable.
    async fn store(&self, partition: &str, request: &Request, response: &Response) {
        if !response.is_ok() {
            tracing::debug!(url = %request.url, status = %response.status, "not caching non-ok response");
            return;
        }
        if let Err(e) = self.caches.put(partition, request, response.clone()).await {
            tracing::warn!(partition, url = %request.url, error = %e, "cache write failed");
        }
    }

    /// Whether a cached image is younger than the TTL. No `Date`, no freshness.
    pub(crate) fn is_fresh(&self, cached: &Response) -> bool {
        cached
            .date()
            .is_some_and(|date| self.clock.now() - date < self.config.image_ttl)
    }

    pub(crate) async fn image(&self, request: &Request) -> Result<FetchOutcome, Error> {
        let partition = self.config.caches.images.as_str();
        let cached = self.lookup(partition, request).await;

        if let Some(hit) = &cached
            && self.is_fresh(hit)
        {
            tracing::debug!(url = %request.url, "fresh image cache hit");
            return Ok(FetchOutcome::respond(hit.clone(), ResponseSource::Cache, Route::Image));
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store(partition, request, &response).await;
                Ok(FetchOutcome::respond(response, ResponseSource::Network, Route::Image))
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "image fetch failed");
                Ok(match cached {
                    Some(stale) => FetchOutcome::respond(stale, ResponseSource::StaleCache, Route::Image),
                    None => FetchOutcome::respond(placeholder_image(), ResponseSource::Fallback, Route::Image),
                })
            }
        }
    }

    pub(crate) async fn navigation(&self, request: &Request) -> Result<FetchOutcome, Error> {
        let partition = self.config.caches.static_assets.as_str();
        let cached = self.lookup(partition, request).await;

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store(partition, request, &response).await;
                Ok(FetchOutcome::respond(response, ResponseSource::Network, Route::Navigation))
            }
            Err(e) => {
                tracing::debug!(url = %request.url, error = %e, "navigation fetch failed");
                if let Some(page) = cached {
                    return Ok(FetchOutcome::respond(page, ResponseSource::Cache, Route::Navigation));
                }

                let root = Request::get(self.resolve("/")?);
                let response = match self.lookup(partition, &root).await {
                    Some(home) => home,
                    None => offline_document(),
                };
                Ok(FetchOutcome::respond(response, ResponseSource::Fallback, Route::Navigation))
            }
        }
    }

    pub(crate) async fn static_asset(&self, request: &Request) -> Result<FetchOutcome, Error> {
        let partition = self.config.caches.static_assets.as_str();

        if let Some(hit) = self.lookup(partition, request).await {
            return Ok(FetchOutcome::respond(hit, ResponseSource::Cache, Route::StaticAsset));
        }

        let response = self.fetcher.fetch(request).await?;
        self.store(partition, request, &response).await;
        Ok(FetchOutcome::respond(response, ResponseSource::Network, Route::StaticAsset))
    }

    pub(crate) async fn network_first(&self, request: &Request) -> Result<FetchOutcome, Error> {
        let partition = self.config.caches.generic.as_str();

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.store(partition, request, &response).await;
                Ok(FetchOutcome::respond(response, ResponseSource::Network, Route::Default))
            }
            Err(e) => match self.lookup(partition, request).await {
                Some(hit) => Ok(FetchOutcome::respond(hit, ResponseSource::Cache, Route::Default)),
                None => Err(e),
            },
        }
    }
}
