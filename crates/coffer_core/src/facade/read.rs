//! Read capability façade.

use crate::connection::Connection;
use crate::error::CoreResult;
use crate::index::Index;
use crate::ops::ItemRead;
use crate::persistable::Persistable;
use std::marker::PhantomData;

/// Typed read access to `T`'s records over one connection.
///
/// Every operation runs as a single transaction: batch reads observe one
/// snapshot and are atomic with respect to concurrent writers. Absent and
/// undecodable records surface as empty results, never as errors.
///
/// Obtained via [`Connection::reader`].
pub struct Reader<T: Persistable> {
    connection: Connection,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Persistable> Reader<T> {
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

    /// Reads the item at an index.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the read.
    pub fn at_index(&self, index: &Index) -> CoreResult<Option<T>> {
        self.connection.read(|txn| txn.item_at_index(index))
    }

    /// Reads the items at the given indexes, dropping absent entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    pub fn at_indexes(&self, indexes: &[Index]) -> CoreResult<Vec<T>> {
        self.connection.read(|txn| txn.items_at_indexes(indexes))
    }

    /// Reads the item stored under a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the read.
    pub fn by_key(&self, key: &str) -> CoreResult<Option<T>> {
        self.connection.read(|txn| txn.item_by_key(key))
    }

    /// Reads the items stored under the given keys, dropping absent
    /// entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    pub fn by_keys(&self, keys: &[String]) -> CoreResult<Vec<T>> {
        self.connection.read(|txn| txn.items_by_keys(keys))
    }

    /// Reads every item in `T`'s collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    pub fn all(&self) -> CoreResult<Vec<T>> {
        self.connection.read(|txn| txn.all_items())
    }

    /// Partitions `keys` into existing items and missing keys.
    ///
    /// `missing` preserves the input order, filtered down to the keys with
    /// no record; missing keys are not errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete a read.
    pub fn filter_existing(&self, keys: &[String]) -> CoreResult<(Vec<T>, Vec<String>)> {
        self.connection.read(|txn| txn.filter_existing(keys))
    }

    /// Reads the metadata at an index, without the primary payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the read.
    pub fn metadata_at_index(&self, index: &Index) -> CoreResult<Option<T::Metadata>> {
        self.connection.read(|txn| txn.metadata_at_index(index))
    }

    /// Reads the metadata stored under a key, without the primary payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot complete the read.
    pub fn metadata_by_key(&self, key: &str) -> CoreResult<Option<T::Metadata>> {
        self.metadata_at_index(&T::index_with_key(key))
    }

    /// Async variant of [`at_index`](Self::at_index).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant, or
    /// [`CoreError::Background`](crate::CoreError::Background) if the
    /// background task died.
    pub async fn async_at_index(&self, index: Index) -> CoreResult<Option<T>>
    where
        T: Send + 'static,
    {
        self.connection
            .async_read(move |txn| txn.item_at_index(&index))
            .await
    }

    /// Async variant of [`at_indexes`](Self::at_indexes).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant.
    pub async fn async_at_indexes(&self, indexes: Vec<Index>) -> CoreResult<Vec<T>>
    where
        T: Send + 'static,
    {
        self.connection
            .async_read(move |txn| txn.items_at_indexes(&indexes))
            .await
    }

    /// Async variant of [`by_key`](Self::by_key).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant.
    pub async fn async_by_key(&self, key: String) -> CoreResult<Option<T>>
    where
        T: Send + 'static,
    {
        self.connection
            .async_read(move |txn| txn.item_by_key(&key))
            .await
    }

    /// Async variant of [`by_keys`](Self::by_keys).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant.
    pub async fn async_by_keys(&self, keys: Vec<String>) -> CoreResult<Vec<T>>
    where
        T: Send + 'static,
    {
        self.connection
            .async_read(move |txn| txn.items_by_keys(&keys))
            .await
    }

    /// Async variant of [`all`](Self::all).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant.
    pub async fn async_all(&self) -> CoreResult<Vec<T>>
    where
        T: Send + 'static,
    {
        self.connection.async_read(|txn| txn.all_items()).await
    }

    /// Async variant of [`filter_existing`](Self::filter_existing).
    ///
    /// # Errors
    ///
    /// Resolves to the same errors as the blocking variant.
    pub async fn async_filter_existing(
        &self,
        keys: Vec<String>,
    ) -> CoreResult<(Vec<T>, Vec<String>)>
    where
        T: Send + 'static,
    {
        self.connection
            .async_read(move |txn| txn.filter_existing(&keys))
            .await
    }
}

impl<T: Persistable> std::fmt::Debug for Reader<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reader")
            .field("collection", &T::COLLECTION)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_cbor, to_cbor, MetadataCodec, Payload, Storable};
    use crate::database::Database;
    use crate::ops::ItemWrite;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Gadget {
        serial: String,
        #[serde(skip)]
        state: Option<GadgetState>,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct GadgetState {
        powered: bool,
    }

    impl Storable for Gadget {
        fn encode(&self) -> CoreResult<Payload> {
            to_cbor(self)
        }

        fn decode(bytes: &[u8]) -> Option<Self> {
            from_cbor(bytes)
        }
    }

    impl MetadataCodec for GadgetState {
        fn encode_metadata(&self) -> CoreResult<Payload> {
            to_cbor(self)
        }

        fn decode_metadata(bytes: &[u8]) -> Option<Self> {
            from_cbor(bytes)
        }
    }

    impl Persistable for Gadget {
        const COLLECTION: &'static str = "gadgets";
        type Metadata = GadgetState;

        fn key(&self) -> String {
            self.serial.clone()
        }

        fn metadata(&self) -> Option<&GadgetState> {
            self.state.as_ref()
        }

        fn set_metadata(&mut self, metadata: GadgetState) {
            self.state = Some(metadata);
        }
    }

    fn gadget(serial: &str, powered: Option<bool>) -> Gadget {
        Gadget {
            serial: serial.into(),
            state: powered.map(|powered| GadgetState { powered }),
        }
    }

    fn seeded_connection() -> Connection {
        let db = Database::open_in_memory();
        let connection = db.connection();
        connection
            .write(|txn| {
                txn.put_items(&[
                    gadget("g1", Some(true)),
                    gadget("g2", None),
                    gadget("g3", Some(false)),
                ])
            })
            .unwrap();
        connection
    }

    #[test]
    fn at_index_reads_item_with_metadata() {
        let reader = seeded_connection().reader::<Gadget>();
        let read = reader.at_index(&Gadget::index_with_key("g1")).unwrap();
        assert_eq!(read, Some(gadget("g1", Some(true))));
    }

    #[test]
    fn by_key_absent_is_none() {
        let reader = seeded_connection().reader::<Gadget>();
        assert!(reader.by_key("missing").unwrap().is_none());
    }

    #[test]
    fn by_keys_drops_absent() {
        let reader = seeded_connection().reader::<Gadget>();
        let keys = vec!["g1".to_string(), "missing".to_string(), "g3".to_string()];
        let read = reader.by_keys(&keys).unwrap();
        assert_eq!(read.len(), 2);
    }

    #[test]
    fn at_indexes_drops_absent() {
        let reader = seeded_connection().reader::<Gadget>();
        let read = reader
            .at_indexes(&Gadget::indexes_with_keys(["g2", "nope"]))
            .unwrap();
        assert_eq!(read, vec![gadget("g2", None)]);
    }

    #[test]
    fn all_returns_every_item() {
        let reader = seeded_connection().reader::<Gadget>();
        let all = reader.all().unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn filter_existing_preserves_missing_order() {
        let reader = seeded_connection().reader::<Gadget>();
        let keys = vec![
            "zz".to_string(),
            "g1".to_string(),
            "aa".to_string(),
            "g2".to_string(),
        ];
        let (existing, missing) = reader.filter_existing(&keys).unwrap();
        assert_eq!(existing.len(), 2);
        assert_eq!(missing, vec!["zz".to_string(), "aa".to_string()]);
    }

    #[test]
    fn metadata_by_key_reads_only_metadata() {
        let reader = seeded_connection().reader::<Gadget>();
        let metadata = reader.metadata_by_key("g3").unwrap();
        assert_eq!(metadata, Some(GadgetState { powered: false }));
        assert!(reader.metadata_by_key("g2").unwrap().is_none());
    }

    #[tokio::test]
    async fn async_variants_match_blocking() {
        let reader = seeded_connection().reader::<Gadget>();

        let read = reader.async_by_key("g1".into()).await.unwrap();
        assert_eq!(read, Some(gadget("g1", Some(true))));

        let all = reader.async_all().await.unwrap();
        assert_eq!(all.len(), 3);

        let (existing, missing) = reader
            .async_filter_existing(vec!["g1".into(), "nope".into()])
            .await
            .unwrap();
        assert_eq!(existing.len(), 1);
        assert_eq!(missing, vec!["nope".to_string()]);
    }
}
