// HashTable property tests.
//
// Model: std HashMap<String, String> driven by the same operation stream.
// Invariants checked after every step:
//  - search(k) agrees with the model for every key in the key space.
//  - len() equals the model's len().
//  - capacity() is prime and never below the capacity of a fresh table.
//  - load factor stays at or below the grow threshold.
use std::collections::HashMap;

use primehash::{DEFAULT_GROW_PERCENT, HashTable, Primality, is_prime};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, String),
    Delete(usize),
}

fn op_strategy(keys: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..keys, "[a-z]{0,8}").prop_map(|(k, v)| Op::Insert(k, v)),
        2 => (0..keys).prop_map(Op::Delete),
    ]
}

fn key_name(k: usize) -> String {
    format!("key-{k}")
}

proptest! {
    #[test]
    fn prop_matches_std_hashmap(ops in proptest::collection::vec(op_strategy(150), 1..600)) {
        let mut table = HashTable::new();
        let mut model: HashMap<String, String> = HashMap::new();
        let floor = table.capacity();

        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    let key = key_name(k);
                    let previous = table.insert(&key, &v);
                    prop_assert_eq!(previous, model.insert(key, v));
                }
                Op::Delete(k) => {
                    let key = key_name(k);
                    prop_assert_eq!(table.delete(&key), model.remove(&key));
                }
            }

            prop_assert_eq!(table.len(), model.len());
            prop_assert_eq!(is_prime(table.capacity()), Primality::Prime);
            prop_assert!(table.capacity() >= floor);
            prop_assert!(table.len() * 100 <= table.capacity() * DEFAULT_GROW_PERCENT);
        }

        for k in 0..150 {
            let key = key_name(k);
            prop_assert_eq!(table.search(&key), model.get(&key).map(String::as_str));
        }
    }

    #[test]
    fn prop_round_trip(pairs in proptest::collection::vec((".*", ".*"), 0..300)) {
        let mut table = HashTable::new();
        let mut expected: HashMap<&str, &str> = HashMap::new();
        for (key, value) in &pairs {
            table.insert(key, value);
            expected.insert(key, value);
        }

        prop_assert_eq!(table.len(), expected.len());
        for (key, value) in expected {
            prop_assert_eq!(table.search(key), Some(value));
        }
    }

    #[test]
    fn prop_delete_removes(keys in proptest::collection::hash_set("[a-z0-9]{1,12}", 1..200)) {
        let mut table: HashTable = keys.iter().map(|k| (k, k)).collect();

        for key in &keys {
            prop_assert_eq!(table.delete(key), Some(key.clone()));
            prop_assert_eq!(table.search(key), None);
            // A second delete is a no-op.
            let len = table.len();
            prop_assert_eq!(table.delete(key), None);
            prop_assert_eq!(table.len(), len);
        }
        prop_assert!(table.is_empty());
        prop_assert_eq!(table.capacity(), 53);
    }

    #[test]
    fn prop_resize_preserves_entries(count in 38usize..2_000) {
        let mut table = HashTable::new();
        let mut capacity = table.capacity();

        for i in 0..count {
            table.insert(&key_name(i), &i.to_string());
            prop_assert!(table.capacity() >= capacity);
            capacity = table.capacity();
        }

        prop_assert!(capacity > 53);
        for i in 0..count {
            let value = i.to_string();
            prop_assert_eq!(table.search(&key_name(i)), Some(value.as_str()));
        }
    }
}
