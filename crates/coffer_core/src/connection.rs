//! Connection: transaction lifecycles and sync/async entry points.

use crate::error::{CoreError, CoreResult};
use crate::facade::{Reader, Remover, Writer};
use crate::index::Index;
use crate::ops::{ItemRead, ItemWrite};
use crate::persistable::Persistable;
use crate::transaction::{ReadTxn, WriteTransaction, WriteTxn};
use coffer_store::StoreEngine;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// Owner of transaction lifecycles against one store engine.
///
/// A connection exposes synchronous, blocking [`read`](Self::read) and
/// [`write`](Self::write) scopes and their asynchronous counterparts,
/// which run the identical blocking scope on the tokio blocking thread
/// pool and resolve a future with its result.
///
/// # Serialization
///
/// Transactions on one connection are strictly serialized: concurrent
/// callers are ordered by the connection's lane and never interleave
/// mid-transaction. Clones share the lane, so a connection can be handed
/// to concurrent tasks freely. Commits across different connections are
/// serialized by the engine.
#[derive(Clone)]
pub struct Connection {
    engine: Arc<dyn StoreEngine>,
    lane: Arc<Mutex<()>>,
}

impl Connection {
    pub(crate) fn new(engine: Arc<dyn StoreEngine>) -> Self {
        Self {
            engine,
            lane: Arc::new(Mutex::new(())),
        }
    }

    /// Runs `f` in a read-only transaction, blocking until it completes.
    ///
    /// Every read inside the scope observes the snapshot taken when the
    /// transaction began.
    ///
    /// # Errors
    ///
    /// Returns whatever error `f` produces; the engine's read failures
    /// surface through the transaction methods.
    pub fn read<R>(&self, f: impl FnOnce(&ReadTxn<'_>) -> CoreResult<R>) -> CoreResult<R> {
        let _lane = self.lane.lock();
        let txn = ReadTxn::new(&*self.engine, self.engine.committed_seq());
        f(&txn)
    }

    /// Runs `f` in a read-write transaction, blocking until it completes.
    ///
    /// When `f` returns `Ok`, the transaction's pending writes commit
    /// atomically: either all of them are visible afterwards or none. When
    /// `f` returns `Err`, nothing commits.
    ///
    /// # Errors
    ///
    /// Returns `f`'s error, or the engine's if the commit fails.
    pub fn write<R>(&self, f: impl FnOnce(&mut WriteTxn<'_>) -> CoreResult<R>) -> CoreResult<R> {
        let _lane = self.lane.lock();
        let mut txn = WriteTxn::new(&*self.engine, self.engine.committed_seq());
        let result = f(&mut txn)?;
        let ops = txn.pending_ops();
        if ops > 0 {
            let seq = self.engine.commit(txn.into_batch())?;
            trace!(seq, ops, "committed write transaction");
        }
        Ok(result)
    }

    /// Removes the records at `indexes` in one transaction.
    ///
    /// Removing absent records is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub fn remove(&self, indexes: &[Index]) -> CoreResult<()> {
        self.write(|txn| txn.remove_at_indexes(indexes))
    }

    /// Like [`read`](Self::read), but runs the transaction on the blocking
    /// thread pool and resolves a future with its result.
    ///
    /// The calling task is never blocked. Once the scope is running it
    /// runs to completion; dropping the future does not cancel it.
    ///
    /// # Errors
    ///
    /// Resolves to `f`'s error, or [`CoreError::Background`] if the
    /// background task died before delivering a result.
    pub async fn async_read<R, F>(&self, f: F) -> CoreResult<R>
    where
        F: for<'t> FnOnce(&ReadTxn<'t>) -> CoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let connection = self.clone();
        tokio::task::spawn_blocking(move || connection.read(f))
            .await
            .map_err(|e| CoreError::background(e.to_string()))?
    }

    /// Like [`write`](Self::write), but runs the transaction on the
    /// blocking thread pool and resolves a future with its result.
    ///
    /// # Errors
    ///
    /// Resolves to `f`'s error, the engine's commit error, or
    /// [`CoreError::Background`] if the background task died before
    /// delivering a result.
    pub async fn async_write<R, F>(&self, f: F) -> CoreResult<R>
    where
        F: for<'t> FnOnce(&mut WriteTxn<'t>) -> CoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let connection = self.clone();
        tokio::task::spawn_blocking(move || connection.write(f))
            .await
            .map_err(|e| CoreError::background(e.to_string()))?
    }

    /// Like [`remove`](Self::remove), but runs on the blocking thread pool
    /// and resolves a future on completion.
    ///
    /// # Errors
    ///
    /// Resolves to the engine's commit error, or
    /// [`CoreError::Background`] if the background task died before
    /// delivering a result.
    pub async fn async_remove(&self, indexes: Vec<Index>) -> CoreResult<()> {
        self.async_write(move |txn| txn.remove_at_indexes(&indexes)).await
    }

    /// Reads the item at an index in its own read transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    pub fn read_item_at_index<T: Persistable>(&self, index: &Index) -> CoreResult<Option<T>> {
        self.read(|txn| txn.item_at_index(index))
    }

    /// Reads the item stored under a key in its own read transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    pub fn read_item_by_key<T: Persistable>(&self, key: &str) -> CoreResult<Option<T>> {
        self.read(|txn| txn.item_by_key(key))
    }

    /// Reads the items stored under the given keys in one read
    /// transaction, dropping absent entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    pub fn read_items_by_keys<T, K>(&self, keys: &[K]) -> CoreResult<Vec<T>>
    where
        T: Persistable,
        K: AsRef<str>,
    {
        self.read(|txn| txn.items_by_keys(keys))
    }

    /// Writes an item in its own write transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the commit fails.
    pub fn write_item<T: Persistable>(&self, item: &T) -> CoreResult<()> {
        self.write(|txn| txn.put_item(item))
    }

    /// Returns the read capability façade for `T`.
    #[must_use]
    pub fn reader<T: Persistable>(&self) -> Reader<T> {
        Reader::new(self.clone())
    }

    /// Returns the write capability façade for `T`.
    #[must_use]
    pub fn writer<T: Persistable>(&self) -> Writer<T> {
        Writer::new(self.clone())
    }

    /// Returns the remove capability façade for `T`.
    #[must_use]
    pub fn remover<T: Persistable>(&self) -> Remover<T> {
        Remover::new(self.clone())
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("committed_seq", &self.engine.committed_seq())
            .finish_non_exhaustive()
    }
}
