//! Request classification.

use serde::Serialize;

use super::WorkerConfig;
use crate::http::{Destination, Request, RequestMode};

/// Traffic class of an intercepted GET request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Stale-while-revalidate with a TTL, placeholder on total failure.
    Image,
    /// Network first, then the cached page, then the cached root.
    Navigation,
    /// Cache first; fingerprinted build output never changes.
    StaticAsset,
    /// Network first, cache on failure.
    Default,
}

/// Classify a request. First match wins: image destination, navigation mode,
/// static path, everything else.
pub fn classify(request: &Request, config: &WorkerConfig) -> Route {
    if request.destination == Destination::Image {
        return Route::Image;
    }

    if request.mode == RequestMode::Navigate {
        return Route::Navigation;
    }

    let path = request.url.path();
    if path.starts_with(&config.static_prefix) || config.static_extensions.iter().any(|ext| path.ends_with(ext.as_str())) {
        return Route::StaticAsset;
    }

    Route::Default
}
