//! Per-type persistence declaration.

use crate::codec::{MetadataCodec, Storable};
use crate::index::Index;

/// A type that can be persisted in the store.
///
/// Implementors declare the collection their values live in, how a value
/// derives its key, and which secondary-payload strategy applies. Together
/// with the [`Storable`] codec this is everything the typed operations need
/// - the contracts are stateless and shared by all callers.
///
/// Types without metadata set `type Metadata = NoMetadata` and inherit the
/// default accessor pair; metadata-bearing types override
/// [`metadata`](Self::metadata) and [`set_metadata`](Self::set_metadata) to
/// expose their metadata slot.
///
/// # Example
///
/// ```rust,ignore
/// use coffer_core::{NoMetadata, Persistable};
///
/// impl Persistable for Person {
///     const COLLECTION: &'static str = "people";
///     type Metadata = NoMetadata;
///
///     fn key(&self) -> String {
///         self.identifier.clone()
///     }
/// }
/// ```
pub trait Persistable: Storable {
    /// The collection this type's records live in. Constant per type.
    const COLLECTION: &'static str;

    /// The secondary-payload strategy for this type.
    type Metadata: MetadataCodec;

    /// Derives the key for this value. Must be deterministic.
    fn key(&self) -> String;

    /// Returns the value's metadata, when it carries any.
    fn metadata(&self) -> Option<&Self::Metadata> {
        None
    }

    /// Attaches decoded metadata to the value's metadata slot.
    fn set_metadata(&mut self, metadata: Self::Metadata) {
        let _ = metadata;
    }

    /// Returns the index addressing this value's record.
    fn index(&self) -> Index {
        Index::new(Self::COLLECTION, self.key())
    }

    /// Returns the index for a key in this type's collection.
    fn index_with_key(key: impl Into<String>) -> Index {
        Index::new(Self::COLLECTION, key)
    }

    /// Returns the indexes for a list of keys in this type's collection.
    fn indexes_with_keys<I>(keys: I) -> Vec<Index>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        keys.into_iter().map(Self::index_with_key).collect()
    }
}
