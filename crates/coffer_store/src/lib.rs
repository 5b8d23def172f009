//! # Coffer Store
//!
//! Store engine boundary for Coffer.
//!
//! This crate pins down the interface the typed layer programs against:
//! snapshot slot reads, key enumeration per collection, and atomic batch
//! commits. The typed layer never bypasses this boundary and never assumes
//! a particular on-disk format.
//!
//! Ships with [`InMemoryEngine`], a multi-version engine for tests and
//! ephemeral databases. Durable engines implement [`StoreEngine`] behind
//! the same contract.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod memory;

pub use engine::{Batch, BatchOp, Slot, StoreEngine};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryEngine;
