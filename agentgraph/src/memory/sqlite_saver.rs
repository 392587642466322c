//! SQLite checkpointer (feature `sqlite`).
//!
//! One row per thread, upserted on every put, so a process restart can resume a suspended
//! thread. Blocking rusqlite calls run on tokio's blocking pool.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::memory::{Checkpoint, CheckpointError, Checkpointer, JsonSerializer, Serializer};

/// Persistent checkpointer backed by a SQLite file.
pub struct SqliteSaver {
    conn: Arc<Mutex<Connection>>,
    serializer: Arc<dyn Serializer<Checkpoint>>,
}

impl SqliteSaver {
    /// Opens or creates the database at `path`, creating parent directories.
    pub fn new(
        path: impl AsRef<Path>,
        serializer: Arc<dyn Serializer<Checkpoint>>,
    ) -> Result<Self, CheckpointError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CheckpointError::Storage(format!("create checkpoint directory: {}", e))
                })?;
            }
        }
        let conn = Connection::open(path).map_err(storage)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;

             CREATE TABLE IF NOT EXISTS checkpoints (
                 thread_id TEXT PRIMARY KEY,
                 checkpoint_id TEXT NOT NULL,
                 step INTEGER NOT NULL,
                 data BLOB NOT NULL,
                 updated_at TEXT NOT NULL
             );",
        )
        .map_err(storage)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            serializer,
        })
    }

    /// Opens `path` with the JSON serializer.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        Self::new(path, Arc::new(JsonSerializer))
    }

    async fn with_conn<T, F>(&self, f: F) -> Result<T, CheckpointError>
    where
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|e| CheckpointError::Storage(e.to_string()))?;
            f(&guard).map_err(storage)
        })
        .await
        .map_err(|e| CheckpointError::Storage(format!("blocking task failed: {}", e)))?
    }
}

fn storage(e: rusqlite::Error) -> CheckpointError {
    CheckpointError::Storage(e.to_string())
}

#[async_trait]
impl Checkpointer for SqliteSaver {
    async fn put(&self, thread_id: &str, checkpoint: &Checkpoint) -> Result<(), CheckpointError> {
        let data = self.serializer.serialize(checkpoint)?;
        let thread_id = thread_id.to_string();
        let checkpoint_id = checkpoint.id.clone();
        let step = checkpoint.step() as i64;
        let updated_at = checkpoint.ts.clone();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO checkpoints (thread_id, checkpoint_id, step, data, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(thread_id) DO UPDATE SET
                     checkpoint_id = excluded.checkpoint_id,
                     step = excluded.step,
                     data = excluded.data,
                     updated_at = excluded.updated_at",
                params![thread_id, checkpoint_id, step, data, updated_at],
            )
            .map(|_| ())
        })
        .await
    }

    async fn get(&self, thread_id: &str) -> Result<Option<Checkpoint>, CheckpointError> {
        let thread_id = thread_id.to_string();
        let data: Option<Vec<u8>> = self
            .with_conn(move |conn| {
                conn.query_row(
                    "SELECT data FROM checkpoints WHERE thread_id = ?1",
                    params![thread_id],
                    |row| row.get(0),
                )
                .optional()
            })
            .await?;
        data.map(|bytes| self.serializer.deserialize(&bytes))
            .transpose()
    }

    async fn delete(&self, thread_id: &str) -> Result<bool, CheckpointError> {
        let thread_id = thread_id.to_string();
        let deleted = self
            .with_conn(move |conn| {
                conn.execute(
                    "DELETE FROM checkpoints WHERE thread_id = ?1",
                    params![thread_id],
                )
            })
            .await?;
        Ok(deleted > 0)
    }

    async fn list_threads(&self) -> Result<Vec<String>, CheckpointError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT thread_id FROM checkpoints ORDER BY thread_id")?;
            let ids = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ids)
        })
        .await
    }
}
