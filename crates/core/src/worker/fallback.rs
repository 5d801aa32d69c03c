//! Synthetic responses served when both network and cache come up empty.

use http::StatusCode;

use crate::http::Response;

const PLACEHOLDER_SVG: &str = r##"<svg width="400" height="300" xmlns="http://www.w3.org/2000/svg">
  <rect width="100%" height="100%" fill="#F8F5F0"/>
  <text x="50%" y="50%" text-anchor="middle" fill="#8B7D6B">Image unavailable</text>
</svg>"##;

const OFFLINE_BODY: &str = "Offline - Please check your connection";

/// 400x300 "Image unavailable" placeholder.
///
/// Marked `no-cache` and never written to a partition, so a later attempt can
/// still fetch the real image.
pub fn placeholder_image() -> Response {
    Response::new(StatusCode::OK, PLACEHOLDER_SVG)
        .with_header("content-type", "image/svg+xml")
        .with_header("cache-control", "no-cache")
}

/// Last-resort answer to a navigation with nothing cached.
pub fn offline_document() -> Response {
    Response::new(StatusCode::SERVICE_UNAVAILABLE, OFFLINE_BODY).with_header("content-type", "text/html")
}
