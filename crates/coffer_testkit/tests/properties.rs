//! Property-based tests for the codec and façade laws.

use coffer_core::{Persistable, Storable};
use coffer_testkit::{
    barcode_strategy, distinct_keys_strategy, person_strategy, product_strategy, with_test_db,
    Barcode, Person, Product,
};
use proptest::prelude::*;
use std::collections::HashSet;

proptest! {
    /// decode is the left inverse of encode for the hand-written codec.
    #[test]
    fn person_roundtrip(person in person_strategy()) {
        let bytes = person.encode().unwrap();
        prop_assert_eq!(Person::decode(&bytes), Some(person));
    }

    /// The primary codec round-trips; the metadata slot travels separately
    /// and is empty on a bare decode.
    #[test]
    fn barcode_primary_roundtrip(barcode in barcode_strategy()) {
        let bytes = barcode.encode().unwrap();
        let mut expected = barcode.clone();
        expected.scanned = None;
        prop_assert_eq!(Barcode::decode(&bytes), Some(expected));
    }

    /// Writing through the store restores both payload and metadata.
    #[test]
    fn product_write_then_read(product in product_strategy()) {
        with_test_db(|db| {
            let connection = db.connection();
            connection.writer::<Product>().write(&product).unwrap();
            let read = connection
                .reader::<Product>()
                .by_key(&product.key())
                .unwrap();
            prop_assert_eq!(read, Some(product));
            Ok(())
        })?;
    }

    /// filter_existing partitions any key list: existing keys and missing
    /// keys are disjoint and their union is the input set.
    #[test]
    fn filter_existing_partition(
        keys in distinct_keys_strategy(24),
        mask in prop::collection::vec(any::<bool>(), 24),
    ) {
        with_test_db(|db| {
            let connection = db.connection();
            let written: Vec<Person> = keys
                .iter()
                .zip(mask.iter())
                .filter(|(_, write)| **write)
                .map(|(key, _)| Person::new(key.clone(), "x"))
                .collect();
            connection.writer::<Person>().write_all(&written).unwrap();

            let (existing, missing) = connection
                .reader::<Person>()
                .filter_existing(&keys)
                .unwrap();

            let existing_keys: HashSet<String> =
                existing.iter().map(Persistable::key).collect();
            let missing_keys: HashSet<String> = missing.iter().cloned().collect();
            let input_keys: HashSet<String> = keys.iter().cloned().collect();

            prop_assert!(existing_keys.is_disjoint(&missing_keys));
            let union: HashSet<String> =
                existing_keys.union(&missing_keys).cloned().collect();
            prop_assert_eq!(union, input_keys);
            Ok(())
        })?;
    }

    /// Writing n distinct items then reading by their keys returns exactly
    /// those n items.
    #[test]
    fn batch_completeness(keys in distinct_keys_strategy(16)) {
        with_test_db(|db| {
            let connection = db.connection();
            let people: Vec<Person> = keys
                .iter()
                .map(|key| Person::new(key.clone(), format!("name-{key}")))
                .collect();
            connection.writer::<Person>().write_all(&people).unwrap();

            let read = connection.reader::<Person>().by_keys(&keys).unwrap();
            prop_assert_eq!(
                read.iter().collect::<HashSet<_>>(),
                people.iter().collect::<HashSet<_>>()
            );
            Ok(())
        })?;
    }

    /// Removing every written item leaves the collection empty; removing
    /// again changes nothing.
    #[test]
    fn remove_idempotence(keys in distinct_keys_strategy(12)) {
        with_test_db(|db| {
            let connection = db.connection();
            let people: Vec<Person> = keys
                .iter()
                .map(|key| Person::new(key.clone(), "x"))
                .collect();
            connection.writer::<Person>().write_all(&people).unwrap();

            let remover = connection.remover::<Person>();
            remover.remove_all(&people).unwrap();
            prop_assert!(connection.reader::<Person>().all().unwrap().is_empty());

            remover.remove_all(&people).unwrap();
            prop_assert!(connection.reader::<Person>().all().unwrap().is_empty());
            Ok(())
        })?;
    }
}
