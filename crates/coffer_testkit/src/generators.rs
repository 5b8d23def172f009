//! Property-based test generators using proptest.
//!
//! Provides strategies for generating random keys, payloads, and fixture
//! values that maintain the invariants the typed layer expects.

use crate::fixtures::{Barcode, Inventory, Person, Product, Scanned};
use proptest::prelude::*;

/// Strategy for generating record keys.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9][a-z0-9-]{0,15}").expect("Invalid regex")
}

/// Strategy for generating valid collection names.
pub fn collection_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,31}").expect("Invalid regex")
}

/// Strategy for generating opaque payload bytes.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..512)
}

/// Strategy for generating a set of distinct keys.
pub fn distinct_keys_strategy(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(key_strategy(), 0..max)
        .prop_map(|keys| keys.into_iter().collect())
}

/// Strategy for generating people.
pub fn person_strategy() -> impl Strategy<Value = Person> {
    (key_strategy(), "[A-Za-z ]{1,24}")
        .prop_map(|(identifier, name)| Person::new(identifier, name))
}

/// Strategy for generating barcodes, with and without scan metadata.
pub fn barcode_strategy() -> impl Strategy<Value = Barcode> {
    (key_strategy(), prop::option::of(any::<bool>()))
        .prop_map(|(code, scanned)| Barcode::new(code, scanned.map(|scanned| Scanned { scanned })))
}

/// Strategy for generating products, with and without inventory metadata.
pub fn product_strategy() -> impl Strategy<Value = Product> {
    (
        key_strategy(),
        "[A-Za-z ]{1,24}",
        any::<u32>(),
        prop::option::of((any::<u32>(), any::<u32>())),
    )
        .prop_map(|(identifier, name, price, inventory)| {
            Product::new(
                identifier,
                name,
                u64::from(price),
                inventory.map(|(on_hand, reorder_at)| Inventory {
                    on_hand,
                    reorder_at,
                }),
            )
        })
}
