//! Codec contracts between typed values and their stored form.
//!
//! [`Storable`] is the primary codec: a bidirectional mapping between a
//! value and the opaque bytes the store engine accepts. [`MetadataCodec`]
//! is the secondary-payload strategy a persistable type selects through its
//! `Metadata` associated type; [`NoMetadata`] is the strategy for types
//! without a secondary payload.
//!
//! Types can implement [`Storable`] by hand, or in two lines through the
//! CBOR helpers [`to_cbor`] / [`from_cbor`] when they derive serde traits.

use crate::error::{CoreError, CoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The store-representable encoded form of a value. Opaque to this layer.
pub type Payload = Vec<u8>;

/// A bidirectional mapping between a typed value and its stored form.
///
/// # Contract
///
/// - `encode` is deterministic: identical values produce identical bytes.
/// - `decode` is the left inverse of `encode`:
///   `decode(&encode(v)?) == Some(v)` for every value `v`.
/// - `decode` returns `None` for malformed input. A corrupt record and a
///   missing record are both "nothing usable was found" at this layer;
///   corruption detection belongs to the store engine.
///
/// # Example
///
/// ```rust,ignore
/// use coffer_core::{from_cbor, to_cbor, CoreResult, Payload, Storable};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Barcode {
///     code: String,
/// }
///
/// impl Storable for Barcode {
///     fn encode(&self) -> CoreResult<Payload> {
///         to_cbor(self)
///     }
///
///     fn decode(bytes: &[u8]) -> Option<Self> {
///         from_cbor(bytes)
///     }
/// }
/// ```
pub trait Storable: Sized {
    /// Encodes the value to its stored form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Codec`] if the value cannot be encoded. An
    /// encode failure aborts the write it is part of.
    fn encode(&self) -> CoreResult<Payload>;

    /// Decodes a value from its stored form.
    ///
    /// Returns `None` when the bytes are malformed.
    fn decode(bytes: &[u8]) -> Option<Self>;
}

/// The secondary-payload strategy of a persistable type.
///
/// Metadata-bearing types route their metadata through an implementor of
/// this trait; types without metadata use [`NoMetadata`], whose
/// [`PRESENT`](Self::PRESENT) flag lets the read path skip the metadata
/// sub-slot entirely.
pub trait MetadataCodec: Sized {
    /// Whether this strategy stores anything at all.
    ///
    /// When `false`, the read path never touches the metadata sub-slot and
    /// the write path never emits a metadata write.
    const PRESENT: bool = true;

    /// Encodes the metadata to its stored form.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Codec`] if the metadata cannot be encoded.
    fn encode_metadata(&self) -> CoreResult<Payload>;

    /// Decodes metadata from its stored form.
    ///
    /// Returns `None` when the bytes are malformed.
    fn decode_metadata(bytes: &[u8]) -> Option<Self>;
}

/// Sentinel metadata strategy for persistable types without a secondary
/// payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoMetadata;

impl MetadataCodec for NoMetadata {
    const PRESENT: bool = false;

    fn encode_metadata(&self) -> CoreResult<Payload> {
        Ok(Payload::new())
    }

    fn decode_metadata(_bytes: &[u8]) -> Option<Self> {
        None
    }
}

/// Encodes a serde value to CBOR bytes.
///
/// # Errors
///
/// Returns [`CoreError::Codec`] if serialization fails.
pub fn to_cbor<T: Serialize>(value: &T) -> CoreResult<Payload> {
    let mut bytes = Payload::new();
    ciborium::into_writer(value, &mut bytes).map_err(|e| CoreError::codec(e.to_string()))?;
    Ok(bytes)
}

/// Decodes a serde value from CBOR bytes.
///
/// Returns `None` when the bytes are not valid CBOR for `T`.
#[must_use]
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Option<T> {
    ciborium::from_reader(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        count: u32,
    }

    impl Storable for Sample {
        fn encode(&self) -> CoreResult<Payload> {
            to_cbor(self)
        }

        fn decode(bytes: &[u8]) -> Option<Self> {
            from_cbor(bytes)
        }
    }

    #[test]
    fn cbor_roundtrip() {
        let sample = Sample {
            name: "test".into(),
            count: 42,
        };
        let bytes = sample.encode().unwrap();
        assert_eq!(Sample::decode(&bytes), Some(sample));
    }

    #[test]
    fn deterministic_encoding() {
        let sample = Sample {
            name: "test".into(),
            count: 7,
        };
        assert_eq!(sample.encode().unwrap(), sample.clone().encode().unwrap());
    }

    #[test]
    fn malformed_bytes_decode_to_none() {
        assert_eq!(Sample::decode(b"not cbor at all"), None);
        assert_eq!(Sample::decode(&[]), None);
    }

    #[test]
    fn storable_as_metadata_codec_roundtrips() {
        // Any Storable type can serve as a metadata strategy by
        // implementing MetadataCodec the same way.
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Scanned {
            scanned: bool,
        }

        impl MetadataCodec for Scanned {
            fn encode_metadata(&self) -> CoreResult<Payload> {
                to_cbor(self)
            }

            fn decode_metadata(bytes: &[u8]) -> Option<Self> {
                from_cbor(bytes)
            }
        }

        assert!(Scanned::PRESENT);
        let meta = Scanned { scanned: true };
        let bytes = meta.encode_metadata().unwrap();
        assert_eq!(Scanned::decode_metadata(&bytes), Some(meta));
    }

    #[test]
    fn no_metadata_is_never_present() {
        assert!(!NoMetadata::PRESENT);
        assert_eq!(NoMetadata::decode_metadata(b"anything"), None);
    }
}
