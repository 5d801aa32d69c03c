//! SQLite-backed cache partitions.
//!
//! Each partition is a named bucket of request → response entries, the
//! persistent counterpart of the browser's `CacheStorage`:
//!
//! - Entries keyed by SHA-256 of method and fragment-free URL
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - Partition deletion cascades to entries

pub mod connection;
pub mod key;
pub mod migrations;
pub mod partitions;
pub mod storage;

pub use crate::Error;

pub use connection::CacheDb;
pub use partitions::{CachedEntry, PartitionSummary};
pub use storage::CacheStorage;
