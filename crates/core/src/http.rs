//! Request and response model shared by the worker, the cache and the network client.
//!
//! The browser's `Response` is a read-once resource: its body can be consumed a
//! single time, so anything that both returns and stores a response must clone
//! it first. Here the body is a reference-counted [`Bytes`], so
//! [`Response::clone`] yields a second, independently readable copy that shares
//! the same buffer. Call sites that persist a response hand the cache an owned
//! clone and return the original.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Error;

/// The kind of resource a request is for, as reported by the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    /// No specific destination (`fetch()` calls, XHR).
    #[default]
    Empty,
    Audio,
    Document,
    Font,
    Image,
    Manifest,
    Script,
    Style,
    Video,
    Worker,
}

impl FromStr for Destination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "empty" => Ok(Self::Empty),
            "audio" => Ok(Self::Audio),
            "document" => Ok(Self::Document),
            "font" => Ok(Self::Font),
            "image" => Ok(Self::Image),
            "manifest" => Ok(Self::Manifest),
            "script" => Ok(Self::Script),
            "style" => Ok(Self::Style),
            "video" => Ok(Self::Video),
            "worker" => Ok(Self::Worker),
            other => Err(Error::InvalidInput(format!("unknown destination: {other}"))),
        }
    }
}

/// Request mode. `Navigate` marks a full document load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    #[default]
    NoCors,
    Cors,
}

impl FromStr for RequestMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "navigate" => Ok(Self::Navigate),
            "same-origin" => Ok(Self::SameOrigin),
            "no-cors" | "" => Ok(Self::NoCors),
            "cors" => Ok(Self::Cors),
            other => Err(Error::InvalidInput(format!("unknown request mode: {other}"))),
        }
    }
}

/// An intercepted outgoing request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub destination: Destination,
    pub mode: RequestMode,
    pub headers: HeaderMap,
}

impl Request {
    /// A plain GET with no destination, as issued by `fetch(url)`.
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            destination: Destination::Empty,
            mode: RequestMode::NoCors,
            headers: HeaderMap::new(),
        }
    }

    /// A top-level document load.
    pub fn navigate(url: Url) -> Self {
        Self { destination: Destination::Document, mode: RequestMode::Navigate, ..Self::get(url) }
    }

    /// An `<img>` load.
    pub fn image(url: Url) -> Self {
        Self { destination: Destination::Image, ..Self::get(url) }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn is_get(&self) -> bool {
        self.method == Method::GET
    }

    /// URL used as the cache identity: the request URL without its fragment.
    pub fn cache_url(&self) -> String {
        let mut url = self.url.clone();
        url.set_fragment(None);
        url.to_string()
    }
}

/// A response, either fresh from the network, read back from a cache
/// partition, or synthesized by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self { status, headers: HeaderMap::new(), body: body.into() }
    }

    /// Add a header. Invalid names or values are dropped.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (HeaderName::from_str(name), HeaderValue::from_str(value)) {
            self.headers.insert(name, value);
        }
        self
    }

    /// HTTP-ok: status in 200..=299.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    pub fn header(&self, name: impl header::AsHeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE)
    }

    /// The `Date` header, if present and parseable.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.header(header::DATE).and_then(parse_http_date)
    }

    /// Headers as ordered name/value pairs, for persistence and display.
    ///
    /// Every header is kept. UTF-8 values (including non-ASCII ones) survive
    /// a round trip through [`Response::headers_from_pairs`] byte for byte;
    /// values that are not UTF-8 are stored lossily, with invalid sequences
    /// replaced by U+FFFD.
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.headers
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
            .collect()
    }

    /// Rebuild a header map from persisted pairs.
    pub fn headers_from_pairs(pairs: &[(String, String)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            if let (Ok(name), Ok(value)) = (HeaderName::from_str(name), HeaderValue::from_bytes(value.as_bytes())) {
                headers.append(name, value);
            }
        }
        headers
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.status, self.body.len())
    }
}

/// Parse an HTTP date (IMF-fixdate, which is RFC 2822 with a `GMT` zone).
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Format a timestamp as an IMF-fixdate `Date` header value.
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
