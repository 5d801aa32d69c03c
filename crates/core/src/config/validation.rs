//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

const MAX_IMAGE_TTL_DAYS: i64 = 3650;

/// A path on the origin. `//host/x` is scheme-relative and would leave it.
fn is_site_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//")
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `origin` is not http(s)
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - a partition name is empty or two partitions share a name
    /// - `image_ttl_days` is not within 1..=3650
    /// - `static_prefix` or a `precache` entry is not a path on the origin
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !matches!(self.origin.scheme(), "http" | "https") {
            return Err(invalid("origin", "must be an http or https URL"));
        }

        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        let names = [
            ("generic_cache", &self.generic_cache),
            ("static_cache", &self.static_cache),
            ("images_cache", &self.images_cache),
        ];
        for (field, name) in names {
            if name.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }
        for (i, (field, name)) in names.iter().enumerate() {
            if names[i + 1..].iter().any(|(_, other)| other == name) {
                return Err(invalid(field, format!("partition name `{name}` is used twice")));
            }
        }

        if self.image_ttl_days <= 0 {
            return Err(invalid("image_ttl_days", "must be at least 1 day"));
        }
        if self.image_ttl_days > MAX_IMAGE_TTL_DAYS {
            return Err(invalid("image_ttl_days", format!("must not exceed {MAX_IMAGE_TTL_DAYS} days")));
        }

        if !is_site_path(&self.static_prefix) {
            return Err(invalid("static_prefix", "must start with a single `/`"));
        }

        if let Some(path) = self.precache.iter().find(|p| !is_site_path(p)) {
            return Err(invalid("precache", format!("`{path}` must start with a single `/`")));
        }

        if self.precache.is_empty() {
            tracing::warn!("precache list is empty; offline navigation has no root fallback");
        }

        Ok(())
    }
}
