//! Partition and entry operations on the SQLite store.

use async_trait::async_trait;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::key::compute_entry_key;
use super::storage::CacheStorage;
use crate::Error;
use crate::http::{Request, Response};

/// Metadata of one stored entry, without its body.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CachedEntry {
    pub partition: String,
    pub method: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub size: usize,
    pub stored_at: String,
}

/// A partition with its entry count.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct PartitionSummary {
    pub name: String,
    pub entries: u64,
    pub created_at: String,
}

/// One row ready to be written.
struct EntryRow {
    key_hash: String,
    method: String,
    url: String,
    status: u16,
    headers_json: String,
    body: Vec<u8>,
}

impl EntryRow {
    fn new(request: &Request, response: &Response) -> Result<Self, Error> {
        if !request.is_get() {
            return Err(Error::InvalidInput(format!("cannot cache {} request", request.method)));
        }
        let url = request.cache_url();
        Ok(Self {
            key_hash: compute_entry_key(request.method.as_str(), &url),
            method: request.method.to_string(),
            url,
            status: response.status.as_u16(),
            headers_json: serde_json::to_string(&response.header_pairs())?,
            body: response.body.to_vec(),
        })
    }
}

fn ensure_partition(conn: &rusqlite::Connection, name: &str, now: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR IGNORE INTO partitions (name, created_at) VALUES (?1, ?2)",
        params![name, now],
    )?;
    Ok(())
}

fn write_entry(conn: &rusqlite::Connection, name: &str, row: &EntryRow, now: &str) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT INTO entries (partition, key_hash, method, url, status, headers_json, body, stored_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(partition, key_hash) DO UPDATE SET
            method = excluded.method,
            url = excluded.url,
            status = excluded.status,
            headers_json = excluded.headers_json,
            body = excluded.body,
            stored_at = excluded.stored_at",
        params![name, row.key_hash, row.method, row.url, row.status, row.headers_json, row.body, now],
    )?;
    Ok(())
}

#[async_trait]
impl CacheStorage for CacheDb {
    async fn open(&self, name: &str) -> Result<(), Error> {
        let name = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                ensure_partition(conn, &name, &now)?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn has(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM partitions WHERE name = ?1)",
                    params![name],
                    |row| row.get(0),
                )?;
                Ok(exists)
            })
            .await
            .map_err(Error::from)
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM partitions ORDER BY created_at, name")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    async fn delete(&self, name: &str) -> Result<bool, Error> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM partitions WHERE name = ?1", params![name])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn match_request(&self, name: &str, request: &Request) -> Result<Option<Response>, Error> {
        let name = name.to_string();
        let url = request.cache_url();
        let key_hash = compute_entry_key(request.method.as_str(), &url);

        let row = self
            .conn
            .call(move |conn| -> Result<Option<(u16, String, Vec<u8>)>, Error> {
                let result = conn.query_row(
                    "SELECT status, headers_json, body FROM entries WHERE partition = ?1 AND key_hash = ?2",
                    params![name, key_hash],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                );

                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        let Some((status, headers_json, body)) = row else {
            return Ok(None);
        };

        let status = StatusCode::from_u16(status).map_err(|e| Error::CorruptEntry(format!("{url}: {e}")))?;
        let pairs: Vec<(String, String)> = serde_json::from_str(&headers_json)?;

        Ok(Some(Response { status, headers: Response::headers_from_pairs(&pairs), body: body.into() }))
    }

    async fn put(&self, name: &str, request: &Request, response: Response) -> Result<(), Error> {
        let row = EntryRow::new(request, &response)?;
        let name = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                ensure_partition(&tx, &name, &now)?;
                write_entry(&tx, &name, &row, &now)?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn put_all(&self, name: &str, entries: Vec<(Request, Response)>) -> Result<(), Error> {
        let rows = entries
            .iter()
            .map(|(request, response)| EntryRow::new(request, response))
            .collect::<Result<Vec<_>, _>>()?;
        let name = name.to_string();
        let now = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                ensure_partition(&tx, &name, &now)?;
                for row in &rows {
                    write_entry(&tx, &name, row, &now)?;
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

type MetaRow = (String, String, u16, String, i64, String);

fn meta_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MetaRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?, row.get(5)?))
}

fn decode_meta(partition: &str, row: MetaRow) -> Result<CachedEntry, Error> {
    let (method, url, status, headers_json, size, stored_at) = row;
    let pairs: Vec<(String, String)> = serde_json::from_str(&headers_json)?;
    let content_type = pairs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        .map(|(_, v)| v.clone());
    Ok(CachedEntry {
        partition: partition.to_string(),
        method,
        url,
        status,
        content_type,
        size: size.max(0) as usize,
        stored_at,
    })
}

impl CacheDb {
    /// List the entries of a partition, most recently stored first.
    pub async fn entries(&self, name: &str) -> Result<Vec<CachedEntry>, Error> {
        let partition = name.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<MetaRow>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT method, url, status, headers_json, length(body), stored_at
                    FROM entries WHERE partition = ?1 ORDER BY stored_at DESC, url",
                )?;
                let rows = stmt
                    .query_map(params![partition], meta_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await
            .map_err(Error::from)?
            .into_iter()
            .map(|row| decode_meta(name, row))
            .collect()
    }

    /// Metadata of the entry stored for `request`, looked up by its key.
    pub async fn entry(&self, name: &str, request: &Request) -> Result<Option<CachedEntry>, Error> {
        let partition = name.to_string();
        let key_hash = compute_entry_key(request.method.as_str(), &request.cache_url());
        let row = self
            .conn
            .call(move |conn| -> Result<Option<MetaRow>, Error> {
                let result = conn.query_row(
                    "SELECT method, url, status, headers_json, length(body), stored_at
                    FROM entries WHERE partition = ?1 AND key_hash = ?2",
                    params![partition, key_hash],
                    meta_row,
                );
                match result {
                    Ok(r) => Ok(Some(r)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        row.map(|row| decode_meta(name, row)).transpose()
    }

    /// Every partition with its entry count.
    pub async fn summaries(&self) -> Result<Vec<PartitionSummary>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<PartitionSummary>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT p.name, COUNT(e.key_hash), p.created_at
                    FROM partitions p LEFT JOIN entries e ON e.partition = p.name
                    GROUP BY p.name ORDER BY p.created_at, p.name",
                )?;
                let summaries = stmt
                    .query_map([], |row| {
                        Ok(PartitionSummary {
                            name: row.get(0)?,
                            entries: row.get::<_, i64>(1)?.max(0) as u64,
                            created_at: row.get(2)?,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(summaries)
            })
            .await
            .map_err(Error::from)
    }
}
