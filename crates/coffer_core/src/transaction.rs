//! Scoped transactions over one store snapshot.
//!
//! A transaction binds every read to a single committed sequence of the
//! engine, so all reads within one scope observe one consistent snapshot.
//! Write transactions buffer their mutations in an overlay: reads inside
//! the scope observe the pending writes (read-your-own-write), and the
//! whole buffer commits atomically through the engine - or not at all.

use crate::codec::Payload;
use crate::error::CoreResult;
use crate::index::Index;
use coffer_store::{Batch, BatchOp, StoreEngine};
use std::collections::HashMap;

/// Read operations available within any transaction scope.
///
/// All reads resolve against the transaction's snapshot: a record committed
/// after the transaction began is never observed.
pub trait ReadTransaction {
    /// Reads the encoded payload at an index.
    ///
    /// Absent records read as `None`, never as an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the read.
    fn read_at_index(&self, index: &Index) -> CoreResult<Option<Payload>>;

    /// Reads the encoded metadata payload at an index, independent of the
    /// primary payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the read.
    fn read_metadata_at_index(&self, index: &Index) -> CoreResult<Option<Payload>>;

    /// Returns every key with a live record in `collection`, in ascending
    /// key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the enumeration.
    fn keys_in_collection(&self, collection: &str) -> CoreResult<Vec<String>>;

    /// Reads the payloads at the given indexes, preserving count: the
    /// result has one entry per requested index, `None` where the record
    /// is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    fn read_at_indexes(&self, indexes: &[Index]) -> CoreResult<Vec<Option<Payload>>> {
        indexes.iter().map(|index| self.read_at_index(index)).collect()
    }
}

/// Write operations available within a read-write transaction scope.
pub trait WriteTransaction: ReadTransaction {
    /// Replaces the encoded payload at an index. Stored metadata is
    /// preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be recorded.
    fn write_at_index(&mut self, index: &Index, payload: Payload) -> CoreResult<()>;

    /// Replaces the encoded metadata payload at an index. The primary
    /// payload is preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be recorded.
    fn write_metadata_at_index(&mut self, index: &Index, metadata: Payload) -> CoreResult<()>;

    /// Removes the records at the given indexes, clearing payload and
    /// metadata. Removing an absent record is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be recorded.
    fn remove_at_indexes(&mut self, indexes: &[Index]) -> CoreResult<()>;
}

/// A read-only transaction bound to one snapshot of the store.
pub struct ReadTxn<'a> {
    engine: &'a dyn StoreEngine,
    snapshot_seq: u64,
}

impl<'a> ReadTxn<'a> {
    pub(crate) fn new(engine: &'a dyn StoreEngine, snapshot_seq: u64) -> Self {
        Self {
            engine,
            snapshot_seq,
        }
    }

    /// Returns the committed sequence this transaction reads at.
    #[must_use]
    pub fn snapshot_seq(&self) -> u64 {
        self.snapshot_seq
    }
}

impl ReadTransaction for ReadTxn<'_> {
    fn read_at_index(&self, index: &Index) -> CoreResult<Option<Payload>> {
        let slot = self
            .engine
            .slot(index.collection(), index.key(), self.snapshot_seq)?;
        Ok(slot.payload)
    }

    fn read_metadata_at_index(&self, index: &Index) -> CoreResult<Option<Payload>> {
        let slot = self
            .engine
            .slot(index.collection(), index.key(), self.snapshot_seq)?;
        Ok(slot.metadata)
    }

    fn keys_in_collection(&self, collection: &str) -> CoreResult<Vec<String>> {
        Ok(self.engine.keys_in_collection(collection, self.snapshot_seq)?)
    }
}

/// The overlay state of one sub-slot: untouched, or pending a new value,
/// or pending removal.
#[derive(Debug, Clone, Default)]
enum Pending {
    #[default]
    Untouched,
    Value(Payload),
    Removed,
}

/// Pending overlay for one index.
#[derive(Debug, Clone, Default)]
struct PendingSlot {
    payload: Pending,
    metadata: Pending,
}

/// A read-write transaction bound to one snapshot of the store.
///
/// Mutations accumulate in order and commit atomically when the enclosing
/// [`Connection::write`](crate::Connection::write) scope returns `Ok`.
/// Reads within the scope observe the pending mutations first and fall
/// back to the snapshot.
pub struct WriteTxn<'a> {
    engine: &'a dyn StoreEngine,
    snapshot_seq: u64,
    ops: Batch,
    overlay: HashMap<Index, PendingSlot>,
}

impl<'a> WriteTxn<'a> {
    pub(crate) fn new(engine: &'a dyn StoreEngine, snapshot_seq: u64) -> Self {
        Self {
            engine,
            snapshot_seq,
            ops: Batch::new(),
            overlay: HashMap::new(),
        }
    }

    /// Returns the committed sequence this transaction reads at.
    #[must_use]
    pub fn snapshot_seq(&self) -> u64 {
        self.snapshot_seq
    }

    /// Returns the number of pending operations.
    #[must_use]
    pub fn pending_ops(&self) -> usize {
        self.ops.len()
    }

    /// Consumes the transaction, yielding the ordered engine batch.
    pub(crate) fn into_batch(self) -> Batch {
        self.ops
    }

    fn pending_slot(&mut self, index: &Index) -> &mut PendingSlot {
        self.overlay.entry(index.clone()).or_default()
    }
}

impl ReadTransaction for WriteTxn<'_> {
    fn read_at_index(&self, index: &Index) -> CoreResult<Option<Payload>> {
        if let Some(slot) = self.overlay.get(index) {
            match &slot.payload {
                Pending::Value(payload) => return Ok(Some(payload.clone())),
                Pending::Removed => return Ok(None),
                Pending::Untouched => {}
            }
        }
        let slot = self
            .engine
            .slot(index.collection(), index.key(), self.snapshot_seq)?;
        Ok(slot.payload)
    }

    fn read_metadata_at_index(&self, index: &Index) -> CoreResult<Option<Payload>> {
        if let Some(slot) = self.overlay.get(index) {
            match &slot.metadata {
                Pending::Value(metadata) => return Ok(Some(metadata.clone())),
                Pending::Removed => return Ok(None),
                Pending::Untouched => {}
            }
        }
        let slot = self
            .engine
            .slot(index.collection(), index.key(), self.snapshot_seq)?;
        Ok(slot.metadata)
    }

    fn keys_in_collection(&self, collection: &str) -> CoreResult<Vec<String>> {
        let mut keys = self.engine.keys_in_collection(collection, self.snapshot_seq)?;
        for (index, slot) in &self.overlay {
            if index.collection() != collection {
                continue;
            }
            match &slot.payload {
                Pending::Value(_) => keys.push(index.key().to_string()),
                Pending::Removed => keys.retain(|key| key != index.key()),
                Pending::Untouched => {}
            }
        }
        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}

impl WriteTransaction for WriteTxn<'_> {
    fn write_at_index(&mut self, index: &Index, payload: Payload) -> CoreResult<()> {
        self.ops.push(BatchOp::PutPayload {
            collection: index.collection().to_string(),
            key: index.key().to_string(),
            payload: payload.clone(),
        });
        self.pending_slot(index).payload = Pending::Value(payload);
        Ok(())
    }

    fn write_metadata_at_index(&mut self, index: &Index, metadata: Payload) -> CoreResult<()> {
        self.ops.push(BatchOp::PutMetadata {
            collection: index.collection().to_string(),
            key: index.key().to_string(),
            metadata: metadata.clone(),
        });
        self.pending_slot(index).metadata = Pending::Value(metadata);
        Ok(())
    }

    fn remove_at_indexes(&mut self, indexes: &[Index]) -> CoreResult<()> {
        for index in indexes {
            self.ops.push(BatchOp::Remove {
                collection: index.collection().to_string(),
                key: index.key().to_string(),
            });
            let slot = self.pending_slot(index);
            slot.payload = Pending::Removed;
            slot.metadata = Pending::Removed;
        }
        Ok(())
    }
}
