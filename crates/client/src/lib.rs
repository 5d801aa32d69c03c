//! Network client for darkroom.
//!
//! This crate provides the reqwest-backed `Fetcher` the offline worker uses
//! to reach the origin, plus URL resolution shared by the server.

pub mod fetch;

pub use fetch::{FetchClient, FetchConfig, UrlError, resolve};
