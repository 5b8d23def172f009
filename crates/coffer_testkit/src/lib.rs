//! # Coffer Testkit
//!
//! Test utilities for Coffer.
//!
//! This crate provides:
//! - Fixture types covering the six persistable item shapes
//! - In-memory database helpers
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coffer_testkit::{with_test_db, Person};
//!
//! #[test]
//! fn test_with_database() {
//!     with_test_db(|db| {
//!         let connection = db.connection();
//!         // ... test operations
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;
