//! # Coffer Core
//!
//! Typed persistence layer for Coffer.
//!
//! This crate lets application code read, write, and remove strongly-typed
//! values - optionally paired with a secondary metadata payload - on top of
//! an embedded key-value store, without hand-writing encode/decode and
//! key-management logic per type. It provides:
//!
//! - [`Index`]: composite `(collection, key)` identity of a record
//! - [`Storable`] / [`MetadataCodec`]: per-type codec contracts
//! - [`Persistable`]: per-type collection, key derivation, and metadata
//!   declaration
//! - [`ReadTransaction`] / [`WriteTransaction`]: snapshot-scoped
//!   read/write/remove primitives
//! - [`ItemRead`] / [`ItemWrite`]: typed operations over transactions,
//!   including metadata decoration
//! - [`Connection`]: serialized sync entry points and the async bridge
//! - [`Reader`] / [`Writer`] / [`Remover`]: capability façades
//!
//! ## Example
//!
//! ```rust,ignore
//! use coffer_core::{Database, NoMetadata, Persistable};
//!
//! let db = Database::open_in_memory();
//! let connection = db.connection();
//!
//! connection.writer::<Person>().write(&person)?;
//! let people = connection.reader::<Person>().all()?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod codec;
mod connection;
mod database;
mod error;
mod facade;
mod index;
mod ops;
mod persistable;
mod transaction;

pub use codec::{from_cbor, to_cbor, MetadataCodec, NoMetadata, Payload, Storable};
pub use connection::Connection;
pub use database::Database;
pub use error::{CoreError, CoreResult};
pub use facade::{Reader, Remover, Writer};
pub use index::Index;
pub use ops::{ItemRead, ItemWrite};
pub use persistable::Persistable;
pub use transaction::{ReadTransaction, ReadTxn, WriteTransaction, WriteTxn};
