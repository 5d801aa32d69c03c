//! The cache-storage seam used by the worker.
//!
//! Mirrors the browser's `CacheStorage`: a set of named partitions, each a
//! map from request identity to response. `CacheDb` is the SQLite-backed
//! implementation; tests may wrap it to observe traffic.

use async_trait::async_trait;

use crate::Error;
use crate::http::{Request, Response};

#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the partition if it doesn't exist yet.
    async fn open(&self, name: &str) -> Result<(), Error>;

    /// Whether a partition with this name exists.
    async fn has(&self, name: &str) -> Result<bool, Error>;

    /// Names of all existing partitions.
    async fn keys(&self) -> Result<Vec<String>, Error>;

    /// Delete a partition and all of its entries. Returns whether it existed.
    async fn delete(&self, name: &str) -> Result<bool, Error>;

    /// Look up a request in a partition. A missing partition is a miss, and is
    /// not created.
    async fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>, Error>;

    /// Store a response, replacing any previous entry for the same request.
    ///
    /// Only GET requests can be stored.
    async fn put(&self, name: &str, request: &Request, response: Response) -> Result<(), Error>;

    /// Store a batch of entries atomically: all of them or none.
    async fn put_all(&self, name: &str, entries: Vec<(Request, Response)>) -> Result<(), Error>;
}
