//! # Prime Hash
//!
//! An in-memory hash table mapping string keys to string values.
//!
//! `HashTable` resolves collisions with open addressing and double hashing: two
//! polynomial string hashes pick a starting slot and a step, and the capacity is kept
//! prime so every step walks the whole table. Deleted entries become tombstones, which
//! later inserts reuse. The table grows when it is more than 70% full and shrinks when
//! it drops below 10%, never below the base size it was created with.
//!
//! ## Basic Usage
//!
//! ```rust
//! use primehash::HashTable;
//!
//! let mut table = HashTable::new();
//!
//! table.insert("cat", "meow");
//! table.insert("dog", "woof");
//! assert_eq!(table.search("cat"), Some("meow"));
//!
//! // Inserting an existing key replaces its value
//! assert_eq!(table.insert("cat", "purr"), Some("meow".to_string()));
//! assert_eq!(table.search("cat"), Some("purr"));
//! assert_eq!(table.len(), 2);
//!
//! // Missing keys are not an error
//! assert_eq!(table.search("bird"), None);
//! assert_eq!(table.delete("bird"), None);
//!
//! table.delete("cat");
//! assert_eq!(table.search("cat"), None);
//! ```
//!
//! ## Fallible Allocation
//!
//! ```rust
//! use primehash::{HashTable, TableError};
//!
//! fn load(pairs: &[(&str, &str)]) -> Result<HashTable, TableError> {
//!     let mut table = HashTable::try_with_base_size(64)?;
//!     for (key, value) in pairs {
//!         table.try_insert(key, value)?;
//!     }
//!     Ok(table)
//! }
//!
//! let table = load(&[("a", "1"), ("b", "2")]).unwrap();
//! assert_eq!(table.capacity(), 67);
//! ```
//!
//! The table is not thread-safe; wrap it in a `Mutex` to share it.

/// Error type of the fallible API
mod error;
/// The double-hashing table engine
mod hash_table;
/// Polynomial string hashes and probe sequences
mod hashing;
/// Primality helpers for sizing the slot array
mod prime;
/// Entries and slot states
mod slot;

pub use error::TableError;
pub use hash_table::{
    DEFAULT_BASE_SIZE, DEFAULT_GROW_PERCENT, DEFAULT_SHRINK_PERCENT, HashTable, create, delete,
    destroy, insert, search,
};
pub use hashing::{double_hash, hash};
pub use prime::{Primality, is_prime, next_prime};
