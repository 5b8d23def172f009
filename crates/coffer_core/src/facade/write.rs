//! Write capability façade.

use crate::connection::Connection;
use crate::error::CoreResult;
use crate::ops::ItemWrite;
use crate::persistable::Persistable;
use std::marker::PhantomData;

/// Typed write access to `T`'s records over one connection.
///
/// Every operation runs as a single transaction and commits atomically:
/// a batch write is never observed half applied. Each write fully replaces
/// the record at the item's index.
///
/// Obtained via [`Connection::writer`].
pub struct Writer<T: Persistable> {
    connection: Connection,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Persistable> Writer<T> {
    pub(crate) fn new(connection: Connection) -> Self {
        Self {
            connection,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying connection.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Writes an item, fully replacing any record at its index.
    ///
    /// For metadata-bearing items the metadata payload is written in the
    /// same transaction, after the primary; an empty in-memory metadata
    /// slot writes nothing and leaves previously stored metadata in place.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the commit fails.
    pub fn write(&self, item: &T) -> CoreResult<()> {
        self.connection.write(|txn| txn.put_item(item))
    }

    /// Writes every item in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the commit fails; nothing commits
    /// on failure.
    pub fn write_all(&self, items: &[T]) -> CoreResult<()> {
        self.connection.write(|txn| txn.put_items(items))
    }

    /// Async variant of [`write`](Self::write). Resolves with the written
    /// item once the transaction commits.
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant, or
    /// [`CoreError::Background`](crate::CoreError::Background) if the
    /// background task died.
    pub async fn async_write(&self, item: T) -> CoreResult<T>
    where
        T: Send + 'static,
    {
        self.connection
            .async_write(move |txn| {
                txn.put_item(&item)?;
                Ok(item)
            })
            .await
    }

    /// Async variant of [`write_all`](Self::write_all). Resolves with the
    /// written items once the transaction commits.
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant.
    pub async fn async_write_all(&self, items: Vec<T>) -> CoreResult<Vec<T>>
    where
        T: Send + 'static,
    {
        self.connection
            .async_write(move |txn| {
                txn.put_items(&items)?;
                Ok(items)
            })
            .await
    }
}

impl<T: Persistable> std::fmt::Debug for Writer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("collection", &T::COLLECTION)
            .finish_non_exhaustive()
    }
}
