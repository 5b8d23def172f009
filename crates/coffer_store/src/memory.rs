//! In-memory store engine for testing and ephemeral databases.

use crate::engine::{Batch, BatchOp, Slot, StoreEngine};
use crate::error::StoreResult;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

/// One committed slot state, tagged with the sequence that produced it.
#[derive(Debug, Clone)]
struct Version {
    seq: u64,
    slot: Slot,
}

/// Collection name -> key -> versions in ascending sequence order.
type SlotMap = HashMap<String, BTreeMap<String, Vec<Version>>>;

/// An in-memory, multi-version store engine.
///
/// Every commit records the full new state of each touched slot, so readers
/// can resolve any slot against an arbitrary past sequence. This gives the
/// snapshot guarantee of [`StoreEngine`] without coordination: versions are
/// immutable once written.
///
/// Suitable for:
/// - Unit and integration tests
/// - Ephemeral databases that don't need persistence
///
/// # Thread Safety
///
/// The engine is thread-safe and can be shared across threads. Commits take
/// the write half of the slot map lock for their full duration, so a batch
/// is never observed half applied.
#[derive(Debug, Default)]
pub struct InMemoryEngine {
    slots: RwLock<SlotMap>,
    committed_seq: AtomicU64,
}

impl InMemoryEngine {
    /// Creates a new empty in-memory engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys with a live payload, across all
    /// collections, at the latest committed sequence.
    ///
    /// Useful for tests and debugging.
    #[must_use]
    pub fn record_count(&self) -> usize {
        let at_seq = self.committed_seq();
        let slots = self.slots.read();
        slots
            .values()
            .flat_map(|keys| keys.values())
            .filter(|versions| {
                latest_at(versions, at_seq).is_some_and(|slot| slot.payload.is_some())
            })
            .count()
    }
}

/// Resolves the greatest version at or before `at_seq`.
fn latest_at(versions: &[Version], at_seq: u64) -> Option<&Slot> {
    versions
        .iter()
        .rev()
        .find(|version| version.seq <= at_seq)
        .map(|version| &version.slot)
}

/// Mutates the slot for `(collection, key)` at `seq`, starting from its
/// latest state. Multiple ops on one slot within a batch stack onto the
/// same version.
fn mutate<F>(slots: &mut SlotMap, collection: String, key: String, seq: u64, f: F)
where
    F: FnOnce(&mut Slot),
{
    let versions = slots.entry(collection).or_default().entry(key).or_default();
    let mut slot = versions.last().map(|v| v.slot.clone()).unwrap_or_default();
    f(&mut slot);
    match versions.last_mut() {
        Some(last) if last.seq == seq => last.slot = slot,
        _ => versions.push(Version { seq, slot }),
    }
}

impl StoreEngine for InMemoryEngine {
    fn committed_seq(&self) -> u64 {
        self.committed_seq.load(Ordering::SeqCst)
    }

    fn slot(&self, collection: &str, key: &str, at_seq: u64) -> StoreResult<Slot> {
        let slots = self.slots.read();
        Ok(slots
            .get(collection)
            .and_then(|keys| keys.get(key))
            .and_then(|versions| latest_at(versions, at_seq))
            .cloned()
            .unwrap_or_default())
    }

    fn keys_in_collection(&self, collection: &str, at_seq: u64) -> StoreResult<Vec<String>> {
        let slots = self.slots.read();
        Ok(slots
            .get(collection)
            .map(|keys| {
                keys.iter()
                    .filter(|(_, versions)| {
                        latest_at(versions, at_seq).is_some_and(|slot| slot.payload.is_some())
                    })
                    .map(|(key, _)| key.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn commit(&self, batch: Batch) -> StoreResult<u64> {
        let mut slots = self.slots.write();
        let seq = self.committed_seq.load(Ordering::SeqCst) + 1;

        for op in batch {
            match op {
                BatchOp::PutPayload {
                    collection,
                    key,
                    payload,
                } => {
                    mutate(&mut slots, collection, key, seq, |slot| {
                        slot.payload = Some(payload);
                    });
                }
                BatchOp::PutMetadata {
                    collection,
                    key,
                    metadata,
                } => {
                    mutate(&mut slots, collection, key, seq, |slot| {
                        slot.metadata = Some(metadata);
                    });
                }
                BatchOp::Remove { collection, key } => {
                    // Skip absent slots so removes stay no-ops.
                    let occupied = slots
                        .get(&collection)
                        .and_then(|keys| keys.get(&key))
                        .and_then(|versions| versions.last())
                        .is_some_and(|version| !version.slot.is_empty());
                    if occupied {
                        mutate(&mut slots, collection, key, seq, |slot| {
                            *slot = Slot::default();
                        });
                    }
                }
            }
        }

        self.committed_seq.store(seq, Ordering::SeqCst);
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(collection: &str, key: &str, payload: &[u8]) -> BatchOp {
        BatchOp::PutPayload {
            collection: collection.into(),
            key: key.into(),
            payload: payload.to_vec(),
        }
    }

    fn put_meta(collection: &str, key: &str, metadata: &[u8]) -> BatchOp {
        BatchOp::PutMetadata {
            collection: collection.into(),
            key: key.into(),
            metadata: metadata.to_vec(),
        }
    }

    fn remove(collection: &str, key: &str) -> BatchOp {
        BatchOp::Remove {
            collection: collection.into(),
            key: key.into(),
        }
    }

    #[test]
    fn new_engine_is_empty() {
        let engine = InMemoryEngine::new();
        assert_eq!(engine.committed_seq(), 0);
        assert_eq!(engine.record_count(), 0);
        assert!(engine.slot("any", "k", 0).unwrap().is_empty());
    }

    #[test]
    fn commit_then_read() {
        let engine = InMemoryEngine::new();
        let seq = engine.commit(vec![put("users", "1", b"alice")]).unwrap();
        assert_eq!(seq, 1);

        let slot = engine.slot("users", "1", seq).unwrap();
        assert_eq!(slot.payload.as_deref(), Some(b"alice".as_ref()));
        assert!(slot.metadata.is_none());
    }

    #[test]
    fn put_payload_preserves_metadata() {
        let engine = InMemoryEngine::new();
        engine
            .commit(vec![put("users", "1", b"v1"), put_meta("users", "1", b"m1")])
            .unwrap();
        let seq = engine.commit(vec![put("users", "1", b"v2")]).unwrap();

        let slot = engine.slot("users", "1", seq).unwrap();
        assert_eq!(slot.payload.as_deref(), Some(b"v2".as_ref()));
        assert_eq!(slot.metadata.as_deref(), Some(b"m1".as_ref()));
    }

    #[test]
    fn put_metadata_preserves_payload() {
        let engine = InMemoryEngine::new();
        engine.commit(vec![put("users", "1", b"v1")]).unwrap();
        let seq = engine.commit(vec![put_meta("users", "1", b"m2")]).unwrap();

        let slot = engine.slot("users", "1", seq).unwrap();
        assert_eq!(slot.payload.as_deref(), Some(b"v1".as_ref()));
        assert_eq!(slot.metadata.as_deref(), Some(b"m2".as_ref()));
    }

    #[test]
    fn remove_clears_both_sub_slots() {
        let engine = InMemoryEngine::new();
        engine
            .commit(vec![put("users", "1", b"v1"), put_meta("users", "1", b"m1")])
            .unwrap();
        let seq = engine.commit(vec![remove("users", "1")]).unwrap();

        assert!(engine.slot("users", "1", seq).unwrap().is_empty());
        assert_eq!(engine.record_count(), 0);
    }

    #[test]
    fn remove_absent_is_noop() {
        let engine = InMemoryEngine::new();
        let seq = engine.commit(vec![remove("users", "missing")]).unwrap();
        assert_eq!(seq, 1);
        assert!(engine.slot("users", "missing", seq).unwrap().is_empty());
    }

    #[test]
    fn snapshot_reads_are_stable() {
        let engine = InMemoryEngine::new();
        let seq1 = engine.commit(vec![put("users", "1", b"old")]).unwrap();
        let seq2 = engine.commit(vec![put("users", "1", b"new")]).unwrap();

        let old = engine.slot("users", "1", seq1).unwrap();
        assert_eq!(old.payload.as_deref(), Some(b"old".as_ref()));

        let new = engine.slot("users", "1", seq2).unwrap();
        assert_eq!(new.payload.as_deref(), Some(b"new".as_ref()));
    }

    #[test]
    fn snapshot_before_first_commit_sees_nothing() {
        let engine = InMemoryEngine::new();
        engine.commit(vec![put("users", "1", b"v")]).unwrap();
        assert!(engine.slot("users", "1", 0).unwrap().is_empty());
    }

    #[test]
    fn keys_in_collection_sorted_and_live_only() {
        let engine = InMemoryEngine::new();
        engine
            .commit(vec![
                put("users", "b", b"2"),
                put("users", "a", b"1"),
                put_meta("users", "meta-only", b"m"),
                put("posts", "x", b"3"),
            ])
            .unwrap();
        let seq = engine.commit(vec![remove("users", "b")]).unwrap();

        let keys = engine.keys_in_collection("users", seq).unwrap();
        assert_eq!(keys, vec!["a".to_string()]);

        let posts = engine.keys_in_collection("posts", seq).unwrap();
        assert_eq!(posts, vec!["x".to_string()]);
    }

    #[test]
    fn keys_in_unknown_collection_is_empty() {
        let engine = InMemoryEngine::new();
        assert!(engine.keys_in_collection("nope", 0).unwrap().is_empty());
    }

    #[test]
    fn batch_applies_in_order() {
        let engine = InMemoryEngine::new();
        let seq = engine
            .commit(vec![
                put("users", "1", b"first"),
                put("users", "1", b"second"),
                remove("users", "1"),
                put("users", "1", b"third"),
            ])
            .unwrap();

        let slot = engine.slot("users", "1", seq).unwrap();
        assert_eq!(slot.payload.as_deref(), Some(b"third".as_ref()));
    }

    #[test]
    fn record_count_tracks_live_payloads() {
        let engine = InMemoryEngine::new();
        engine
            .commit(vec![put("users", "1", b"a"), put("users", "2", b"b")])
            .unwrap();
        assert_eq!(engine.record_count(), 2);

        engine.commit(vec![remove("users", "1")]).unwrap();
        assert_eq!(engine.record_count(), 1);
    }
}
