//! Core types and shared functionality for darkroom.
//!
//! This crate provides:
//! - The request/response model
//! - Cache partitions with a SQLite backend
//! - The offline worker: routing, caching strategies, lifecycle, push
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod worker;

pub use cache::{CacheDb, CacheStorage};
pub use error::Error;
pub use crate::http::{Request, Response};
pub use worker::{FetchOutcome, Fetcher, OfflineWorker, WorkerConfig, WorkerHandler, WorkerHost};
