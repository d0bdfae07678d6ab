//! Durable side of a unit of work.

use async_trait::async_trait;
use folio_db::DbPool;
use sqlx::{PgConnection, Postgres, Transaction};

use crate::error::StorageError;

/// Backing store whose pending writes are made durable by one atomic
/// [`flush`](Storage::flush).
#[async_trait]
pub trait Storage: Send {
    /// Make every pending write durable, or none of them.
    async fn flush(&mut self) -> Result<(), StorageError>;
}

/// PostgreSQL storage that buffers writes in a lazily opened transaction.
///
/// Repositories write through [`connection`](PgStorage::connection); the
/// first call opens a transaction and later calls reuse it until
/// [`flush`](Storage::flush) commits it. A flush with nothing written is a
/// no-op, and dropping the storage without flushing rolls the writes back.
pub struct PgStorage {
    pool: DbPool,
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgStorage {
    pub fn new(pool: DbPool) -> Self {
        Self { pool, tx: None }
    }

    /// Connection inside the current transaction, opening one if needed.
    pub async fn connection(&mut self) -> Result<&mut PgConnection, sqlx::Error> {
        let tx = match self.tx.take() {
            Some(tx) => tx,
            None => self.pool.begin().await?,
        };
        Ok(&mut **self.tx.insert(tx))
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn flush(&mut self) -> Result<(), StorageError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
            tracing::debug!("Storage transaction committed");
        }
        Ok(())
    }
}
