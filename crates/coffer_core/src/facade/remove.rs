//! Remove capability façade.

use crate::connection::Connection;
use crate::error::CoreResult;
use crate::index::Index;
use crate::ops::ItemWrite;
use crate::persistable::Persistable;
use std::marker::PhantomData;

/// Typed removal of `T`'s records over one connection.
///
/// Every operation runs as a single transaction. Removal clears both the
/// primary payload and any stored metadata; removing an absent record is a
/// no-op, not an error.
///
/// Obtained via [`Connection::remover`].
pub struct Remover<T: Persistable> {
    connection: Connection,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Persistable> Remover<T> {
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

    /// Removes an item's record.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub fn remove(&self, item: &T) -> CoreResult<()> {
        self.connection.write(|txn| txn.remove_item(item))
    }

    /// Removes every item's record in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub fn remove_all(&self, items: &[T]) -> CoreResult<()> {
        self.connection.write(|txn| txn.remove_items(items))
    }

    /// Removes the record at an index.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub fn remove_at_index(&self, index: &Index) -> CoreResult<()> {
        self.connection.remove(std::slice::from_ref(index))
    }

    /// Removes the records at the given indexes in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub fn remove_at_indexes(&self, indexes: &[Index]) -> CoreResult<()> {
        self.connection.remove(indexes)
    }

    /// Removes the record stored under a key in `T`'s collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub fn remove_by_key(&self, key: &str) -> CoreResult<()> {
        self.remove_at_index(&T::index_with_key(key))
    }

    /// Removes the records stored under the given keys in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub fn remove_by_keys(&self, keys: &[String]) -> CoreResult<()> {
        self.remove_at_indexes(&T::indexes_with_keys(keys.iter().cloned()))
    }

    /// Async variant of [`remove`](Self::remove).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant, or
    /// [`CoreError::Background`](crate::CoreError::Background) if the
    /// background task died.
    pub async fn async_remove(&self, item: T) -> CoreResult<()>
    where
        T: Send + 'static,
    {
        self.connection
            .async_write(move |txn| txn.remove_item(&item))
            .await
    }

    /// Async variant of [`remove_all`](Self::remove_all).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant.
    pub async fn async_remove_all(&self, items: Vec<T>) -> CoreResult<()>
    where
        T: Send + 'static,
    {
        self.connection
            .async_write(move |txn| txn.remove_items(&items))
            .await
    }

    /// Async variant of [`remove_at_indexes`](Self::remove_at_indexes).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant.
    pub async fn async_remove_at_indexes(&self, indexes: Vec<Index>) -> CoreResult<()> {
        self.connection.async_remove(indexes).await
    }

    /// Async variant of [`remove_by_keys`](Self::remove_by_keys).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant.
    pub async fn async_remove_by_keys(&self, keys: Vec<String>) -> CoreResult<()> {
        self.connection
            .async_remove(T::indexes_with_keys(keys))
            .await
    }
}

impl<T: Persistable> std::fmt::Debug for Remover<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Remover")
            .field("collection", &T::COLLECTION)
            .finish_non_exhaustive()
    }
}
