//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (DARKROOM_*)
//! 2. TOML config file (if DARKROOM_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::worker::{CacheNames, NotificationConfig, WorkerConfig, default_static_extensions};

mod validation;

pub use validation::ConfigError;

/// Build context the worker is hosted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// The worker is registered at startup and controls fetches.
    #[default]
    Production,
    /// The worker is never registered; every fetch goes straight to the network.
    Development,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (DARKROOM_*)
/// 2. TOML config file (if DARKROOM_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Set via DARKROOM_PROFILE (`production` or `development`).
    #[serde(default)]
    pub profile: Profile,

    /// Origin of the site the worker serves. Relative paths resolve against it.
    ///
    /// Set via DARKROOM_ORIGIN environment variable.
    #[serde(default = "default_origin")]
    pub origin: Url,

    /// Path to the SQLite file holding the cache partitions.
    ///
    /// Set via DARKROOM_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// User-Agent string for network requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Network request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of redirects to follow.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Partition for everything not otherwise classified.
    #[serde(default = "default_generic_cache")]
    pub generic_cache: String,

    /// Partition for documents and build assets.
    #[serde(default = "default_static_cache")]
    pub static_cache: String,

    /// Partition for images.
    #[serde(default = "default_images_cache")]
    pub images_cache: String,

    /// Age in days below which a cached image is served without revalidation.
    #[serde(default = "default_image_ttl_days")]
    pub image_ttl_days: i64,

    /// Path prefix of fingerprinted build assets.
    #[serde(default = "default_static_prefix")]
    pub static_prefix: String,

    /// Paths stored in the static partition at install time.
    #[serde(default = "default_precache")]
    pub precache: Vec<String>,

    /// Icon shown with push notifications.
    #[serde(default = "default_notification_icon")]
    pub notification_icon: String,

    /// Badge shown with push notifications.
    #[serde(default = "default_notification_badge")]
    pub notification_badge: String,
}

fn default_origin() -> Url {
    Url::parse("http://localhost:3000/").expect("static origin is a valid URL")
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./darkroom-cache.sqlite")
}

fn default_user_agent() -> String {
    "darkroom/0.1".into()
}

fn default_max_bytes() -> usize {
    10_485_760 // 10MB, portfolio images are large
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_generic_cache() -> String {
    "photography-v1".into()
}

fn default_static_cache() -> String {
    "static-v1".into()
}

fn default_images_cache() -> String {
    "images-v1".into()
}

fn default_image_ttl_days() -> i64 {
    7
}

fn default_static_prefix() -> String {
    "/_next/static/".into()
}

fn default_precache() -> Vec<String> {
    ["/", "/about", "/services", "/portfolio", "/contact", "/_next/static/css/app.css", "/manifest.json"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_notification_icon() -> String {
    "/icons/icon-192.png".into()
}

fn default_notification_badge() -> String {
    "/icons/badge-72.png".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            origin: default_origin(),
            db_path: default_db_path(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            generic_cache: default_generic_cache(),
            static_cache: default_static_cache(),
            images_cache: default_images_cache(),
            image_ttl_days: default_image_ttl_days(),
            static_prefix: default_static_prefix(),
            precache: default_precache(),
            notification_icon: default_notification_icon(),
            notification_badge: default_notification_badge(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `DARKROOM_`
    /// 2. TOML file from `DARKROOM_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("DARKROOM_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("DARKROOM_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// The worker's view of this configuration.
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig {
            caches: CacheNames {
                generic: self.generic_cache.clone(),
                static_assets: self.static_cache.clone(),
                images: self.images_cache.clone(),
            },
            image_ttl: chrono::Duration::try_days(self.image_ttl_days).unwrap_or(chrono::Duration::MAX),
            static_prefix: self.static_prefix.clone(),
            static_extensions: default_static_extensions(),
            precache: self.precache.clone(),
            origin: self.origin.clone(),
            notification: NotificationConfig {
                icon: self.notification_icon.clone(),
                badge: self.notification_badge.clone(),
                ..NotificationConfig::default()
            },
        }
    }
}
