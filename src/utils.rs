//! Utility functions and traits for `OpenAddressTable`

use crate::{OpenAddressTable, error::Result};
use std::{borrow::Borrow, hash::Hash};

/// Extension trait for table implementations that provides additional utility methods
pub trait TableExtensions<K, V> {
    /// Returns the value stored for `key`, or `default` if it is absent
    fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized;

    /// Inserts every pair and returns how many keys were not present before
    fn put_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>;
}

impl<K, V> TableExtensions<K, V> for OpenAddressTable<K, V>
where
    K: Eq + Hash,
{
    fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    fn put_all<I>(&mut self, pairs: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut added: usize = 0;
        for (key, value) in pairs {
            if self.put(key, value).is_none() {
                added = added.saturating_add(1);
            }
        }
        added
    }
}

/// Creates an `OpenAddressTable` with the given parameters from an iterator of key-value pairs
///
/// # Errors
///
/// Fails if the capacity or load factor is rejected by [`OpenAddressTable::new`].
pub fn from_pairs<K, V, I>(
    capacity: usize,
    load_factor: f64,
    pairs: I,
) -> Result<OpenAddressTable<K, V>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, V)>,
{
    let mut table = OpenAddressTable::new(capacity, load_factor)?;
    table.extend(pairs);
    Ok(table)
}
