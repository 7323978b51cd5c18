//! # Open Address
//!
//! A Rust implementation of a hash table using open addressing.
//!
//! All entries live directly in a single slot array. A key is mapped to its home slot with
//! multiplicative hashing, and collisions are resolved by linear probing with a fixed stride
//! that is kept coprime with the capacity, so every probe sequence covers the whole table.
//! Removed entries are replaced by tombstones and the table doubles its capacity, rehashing
//! all live entries, once the configured load factor is reached.
//!
//! ## Basic Usage
//!
//! ```rust
//! use open_address::OpenAddressTable;
//!
//! // Create a table with 4 slots that grows once it is half full
//! let mut table = OpenAddressTable::new(4, 0.5)?;
//!
//! // Insert values
//! assert_eq!(table.put("apple".to_string(), 1), None);
//! assert_eq!(table.put("banana".to_string(), 2), None);
//! assert_eq!(table.capacity(), 8);
//!
//! // Retrieve values
//! assert_eq!(table.get("apple"), Some(&1));
//!
//! // Update values
//! assert_eq!(table.put("apple".to_string(), 10), Some(1));
//! assert_eq!(table.get("apple"), Some(&10));
//!
//! // Remove values
//! assert_eq!(table.remove("apple"), Some(10));
//! assert_eq!(table.get("apple"), None);
//! assert_eq!(table.size(), 1);
//! # Ok::<(), open_address::Error>(())
//! ```
//!
//! ## Invalid Parameters
//!
//! ```rust
//! use open_address::{Error, OpenAddressTable};
//!
//! let result = OpenAddressTable::<String, u32>::new(0, 0.5);
//! assert!(matches!(result, Err(Error::InvalidCapacity(0))));
//! ```

/// Errors returned when building a table
mod error;
/// Module implementing the open addressing hash table
mod open_address_table;
/// Slot index derivation and probe sequences
mod probe;
/// Utility functions and traits for the table
mod utils;

pub use error::{Error, Result};
pub use open_address_table::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, OpenAddressTable};
pub use utils::{TableExtensions, from_pairs};
