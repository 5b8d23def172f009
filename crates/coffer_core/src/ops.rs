//! Typed operations over transactions.
//!
//! [`ItemRead`] and [`ItemWrite`] extend the raw transaction traits with
//! operations parameterized over [`Persistable`] item types. The metadata
//! decoration logic lives here, written once: the same implementation
//! serves plain and metadata-bearing types, with the strategy selected
//! through the item's `Metadata` associated type.

use crate::codec::MetadataCodec;
use crate::error::CoreResult;
use crate::index::Index;
use crate::persistable::Persistable;
use crate::transaction::{ReadTransaction, WriteTransaction};
use tracing::debug;

/// Typed read operations over any transaction scope.
pub trait ItemRead: ReadTransaction {
    /// Reads the item at an index.
    ///
    /// For metadata-bearing types the metadata payload is fetched within
    /// the same transaction and attached to the item's metadata slot;
    /// absent or undecodable metadata leaves the slot empty. An absent or
    /// undecodable primary payload reads as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    fn item_at_index<T: Persistable>(&self, index: &Index) -> CoreResult<Option<T>> {
        let Some(bytes) = self.read_at_index(index)? else {
            return Ok(None);
        };
        let Some(mut item) = T::decode(&bytes) else {
            debug!(%index, "discarding payload that failed to decode");
            return Ok(None);
        };
        if <T::Metadata as MetadataCodec>::PRESENT {
            if let Some(metadata) = self.metadata_at_index::<T::Metadata>(index)? {
                item.set_metadata(metadata);
            }
        }
        Ok(Some(item))
    }

    /// Reads the items at the given indexes, dropping absent entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    fn items_at_indexes<T: Persistable>(&self, indexes: &[Index]) -> CoreResult<Vec<T>> {
        let mut items = Vec::with_capacity(indexes.len());
        for index in indexes {
            if let Some(item) = self.item_at_index(index)? {
                items.push(item);
            }
        }
        Ok(items)
    }

    /// Reads the item stored under a key in `T`'s collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    fn item_by_key<T: Persistable>(&self, key: &str) -> CoreResult<Option<T>> {
        self.item_at_index(&T::index_with_key(key))
    }

    /// Reads the items stored under the given keys, dropping absent
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    fn items_by_keys<T, K>(&self, keys: &[K]) -> CoreResult<Vec<T>>
    where
        T: Persistable,
        K: AsRef<str>,
    {
        let indexes: Vec<Index> = keys
            .iter()
            .map(|key| T::index_with_key(key.as_ref()))
            .collect();
        self.items_at_indexes(&indexes)
    }

    /// Reads every item in `T`'s collection.
    ///
    /// This is the only operation that enumerates the collection rather
    /// than taking explicit keys.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    fn all_items<T: Persistable>(&self) -> CoreResult<Vec<T>> {
        let keys = self.keys_in_collection(T::COLLECTION)?;
        self.items_by_keys(&keys)
    }

    /// Partitions `keys` into the items that exist in `T`'s collection and
    /// the keys that are missing.
    ///
    /// `missing` preserves the input order; a missing key is never raised
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    fn filter_existing<T: Persistable>(
        &self,
        keys: &[String],
    ) -> CoreResult<(Vec<T>, Vec<String>)> {
        let existing: Vec<T> = self.items_by_keys(keys)?;
        let existing_keys: Vec<String> = existing.iter().map(Persistable::key).collect();
        let missing = keys
            .iter()
            .filter(|key| !existing_keys.contains(key))
            .cloned()
            .collect();
        Ok((existing, missing))
    }

    /// Reads the metadata at an index, without touching the primary
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the read.
    fn metadata_at_index<M: MetadataCodec>(&self, index: &Index) -> CoreResult<Option<M>> {
        let Some(bytes) = self.read_metadata_at_index(index)? else {
            return Ok(None);
        };
        let metadata = M::decode_metadata(&bytes);
        if metadata.is_none() {
            debug!(%index, "discarding metadata that failed to decode");
        }
        Ok(metadata)
    }

    /// Reads the metadata at the given indexes, dropping absent entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    fn metadata_at_indexes<M: MetadataCodec>(&self, indexes: &[Index]) -> CoreResult<Vec<M>> {
        let mut all = Vec::with_capacity(indexes.len());
        for index in indexes {
            if let Some(metadata) = self.metadata_at_index(index)? {
                all.push(metadata);
            }
        }
        Ok(all)
    }
}

impl<R: ReadTransaction + ?Sized> ItemRead for R {}

/// Typed write operations over a read-write transaction scope.
pub trait ItemWrite: WriteTransaction {
    /// Writes an item, fully replacing any record at its index.
    ///
    /// The primary payload is written first; the metadata payload is
    /// written second, and only when the in-memory value carries metadata.
    /// Writing a value whose metadata slot is empty leaves previously
    /// stored metadata in place - clearing it requires removing the record
    /// or writing a value with `Some` metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the item cannot be encoded or the write cannot
    /// be recorded.
    fn put_item<T: Persistable>(&mut self, item: &T) -> CoreResult<()> {
        let index = item.index();
        self.write_at_index(&index, item.encode()?)?;
        if let Some(metadata) = item.metadata() {
            self.write_metadata_at_index(&index, metadata.encode_metadata()?)?;
        }
        Ok(())
    }

    /// Writes every item in `items`.
    ///
    /// # Errors
    ///
    /// Returns an error if an item cannot be encoded or a write cannot be
    /// recorded.
    fn put_items<T: Persistable>(&mut self, items: &[T]) -> CoreResult<()> {
        for item in items {
            self.put_item(item)?;
        }
        Ok(())
    }

    /// Removes an item's record.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be recorded.
    fn remove_item<T: Persistable>(&mut self, item: &T) -> CoreResult<()> {
        self.remove_at_indexes(&[item.index()])
    }

    /// Removes every item's record.
    ///
    /// # Errors
    ///
    /// Returns an error if a removal cannot be recorded.
    fn remove_items<T: Persistable>(&mut self, items: &[T]) -> CoreResult<()> {
        let indexes: Vec<Index> = items.iter().map(Persistable::index).collect();
        self.remove_at_indexes(&indexes)
    }
}

impl<W: WriteTransaction + ?Sized> ItemWrite for W {}
