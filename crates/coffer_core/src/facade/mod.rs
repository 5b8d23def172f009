//! Capability façades: typed operations over a connection.
//!
//! Each façade binds an item type and a [`Connection`](crate::Connection)
//! and exposes the typed operations built from the transaction primitives:
//! [`Reader`] for reads, [`Writer`] for writes, [`Remover`] for removals.
//! One generic implementation serves every item shape - plain or
//! metadata-bearing, serde-coded or hand-coded.

mod read;
mod remove;
mod write;

pub use read::Reader;
pub use remove::Remover;
pub use write::Writer;
