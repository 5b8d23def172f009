//! Store engine trait definition.

use crate::error::StoreResult;

/// The state of one record slot.
///
/// A slot holds the primary encoded payload for a `(collection, key)` pair
/// and, independently, an optional metadata payload. Both are opaque bytes;
/// engines store and return them without interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slot {
    /// Primary encoded payload. `None` means the record is absent.
    pub payload: Option<Vec<u8>>,
    /// Secondary metadata payload, stored alongside the primary.
    pub metadata: Option<Vec<u8>>,
}

impl Slot {
    /// Returns `true` when neither payload nor metadata is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_none() && self.metadata.is_none()
    }
}

/// A single mutation within a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Replaces the primary payload. Stored metadata is preserved.
    PutPayload {
        /// Collection the slot belongs to.
        collection: String,
        /// Key within the collection.
        key: String,
        /// The new primary payload.
        payload: Vec<u8>,
    },
    /// Replaces the metadata payload. The primary payload is preserved.
    PutMetadata {
        /// Collection the slot belongs to.
        collection: String,
        /// Key within the collection.
        key: String,
        /// The new metadata payload.
        metadata: Vec<u8>,
    },
    /// Clears both the payload and the metadata.
    ///
    /// Removing an absent slot is a no-op, not an error.
    Remove {
        /// Collection the slot belongs to.
        collection: String,
        /// Key within the collection.
        key: String,
    },
}

/// An ordered list of mutations applied atomically by [`StoreEngine::commit`].
pub type Batch = Vec<BatchOp>;

/// An embedded key-value store engine.
///
/// Engines are **opaque slot stores** addressed by `(collection, key)`.
/// The typed layer above owns all payload interpretation - engines do not
/// understand codecs, persistable types, or metadata semantics beyond the
/// two independent byte sub-slots of a [`Slot`].
///
/// # Invariants
///
/// - Reads at a given sequence are stable: once `commit` returns sequence
///   `n`, every read at `n` observes exactly the state after that batch.
/// - A committed batch is visible in full or not at all.
/// - Sequences are strictly monotonic; concurrent commits are serialized
///   by the engine.
/// - Engines must be `Send + Sync` for concurrent access.
///
/// # Implementors
///
/// - [`super::InMemoryEngine`] - for tests and ephemeral databases
pub trait StoreEngine: Send + Sync {
    /// Returns the sequence of the latest committed batch.
    fn committed_seq(&self) -> u64;

    /// Reads the slot state for `(collection, key)` as of `at_seq`.
    ///
    /// Slots that were never written, or whose last mutation at or before
    /// `at_seq` was a removal, read as the empty slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the read.
    fn slot(&self, collection: &str, key: &str, at_seq: u64) -> StoreResult<Slot>;

    /// Returns every key with a live payload in `collection` as of `at_seq`,
    /// in ascending key order.
    ///
    /// Slots holding only metadata are not enumerated.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the enumeration.
    fn keys_in_collection(&self, collection: &str, at_seq: u64) -> StoreResult<Vec<String>>;

    /// Applies `batch` atomically and returns the new committed sequence.
    ///
    /// Operations are applied in order; later operations in the batch
    /// observe the effect of earlier ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch cannot be made durable. No partial
    /// effect is visible after a failed commit.
    fn commit(&self, batch: Batch) -> StoreResult<u64>;
}
