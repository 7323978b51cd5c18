use std::{borrow::Borrow, hash::Hash, mem};

use crate::{
    error::{Error, Result},
    probe::{Probe, coprime_step, hash_key, home_index},
};

/// Number of slots allocated by [`OpenAddressTable::default`]
pub const DEFAULT_CAPACITY: usize = 1000;

/// Load factor used when none is given
pub const DEFAULT_LOAD_FACTOR: f64 = 0.5;

/// A single position of the slot array
#[derive(Debug, Clone, Default)]
enum Slot<K, V> {
    /// Never used since the array was allocated
    #[default]
    Empty,
    /// Holds a live entry
    Occupied {
        /// The key of the entry
        key: K,
        /// The value associated with the key
        value: V,
    },
    /// Used to hold an entry that has since been removed
    Tombstone,
}

/// Outcome of probing for a key
#[derive(Debug, Clone, Copy)]
struct Search {
    /// Slot holding the key, if it is present
    index: Option<usize>,
    /// Number of slots examined before the probe resolved
    probes: usize,
}

/// A hash table using open addressing with linear probing.
///
/// Keys are placed with multiplicative hashing and collisions are resolved by walking the slot
/// array with a fixed stride. Removed entries leave a tombstone behind so that probe chains
/// running through them stay intact. Once the number of entries reaches
/// `floor(load_factor * capacity)` the slot array is doubled and every live entry is rehashed.
/// The table never shrinks.
///
/// Note: This implementation is not thread-safe. Wrap it in a lock to share it between threads.
#[derive(Debug, Clone)]
pub struct OpenAddressTable<K, V> {
    /// The slot array, its length is the capacity
    slots: Vec<Slot<K, V>>,
    /// Number of occupied slots
    size: usize,
    /// Configured load factor, within `[0, 1]`
    load_factor: f64,
    /// Size at which the table grows
    threshold: usize,
    /// Probe stride, coprime with the capacity
    step: usize,
    /// Number of times the table has grown
    resizes: usize,
}

impl<K, V> Default for OpenAddressTable<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::allocate(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }
}

impl<K, V> Extend<(K, V)> for OpenAddressTable<K, V>
where
    K: Eq + Hash,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for OpenAddressTable<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::default();
        table.extend(iter);
        table
    }
}

/// Computes `floor(load_factor * capacity)`
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn threshold_for(load_factor: f64, capacity: usize) -> usize {
    (load_factor * capacity as f64).floor() as usize
}

impl<K, V> OpenAddressTable<K, V>
where
    K: Eq + Hash,
{
    /// Creates a table with `capacity` slots that grows once `load_factor * capacity` entries
    /// are stored.
    ///
    /// The load factor is clamped into `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] for a capacity of zero and
    /// [`Error::InvalidLoadFactor`] if the load factor is NaN.
    pub fn new(capacity: usize, load_factor: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        if load_factor.is_nan() {
            return Err(Error::InvalidLoadFactor(load_factor));
        }
        Ok(Self::allocate(capacity, load_factor.clamp(0.0, 1.0)))
    }

    /// Creates a table with `capacity` slots and the default load factor
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] for a capacity of zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a table with the default capacity and the given load factor
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLoadFactor`] if the load factor is NaN.
    pub fn with_load_factor(load_factor: f64) -> Result<Self> {
        Self::new(DEFAULT_CAPACITY, load_factor)
    }

    /// Builds the table from already validated parameters
    fn allocate(capacity: usize, load_factor: f64) -> Self {
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);

        Self {
            slots,
            size: 0,
            load_factor,
            threshold: threshold_for(load_factor, capacity),
            step: coprime_step(capacity),
            resizes: 0,
        }
    }

    /// Walks the probe sequence of `key` until it hits the key or an empty slot.
    ///
    /// Tombstones do not stop the walk since the key may live further along the chain.
    fn search<Q>(&self, key: &Q) -> Search
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let capacity = self.slots.len();
        let start = home_index(hash_key(key), capacity);
        let mut probes: usize = 0;

        for index in Probe::new(start, self.step, capacity) {
            probes = probes.saturating_add(1);
            match self.slots.get(index) {
                None | Some(Slot::Empty) => break,
                Some(Slot::Occupied { key: stored, .. }) if stored.borrow() == key => {
                    return Search { index: Some(index), probes };
                }
                Some(Slot::Occupied { .. } | Slot::Tombstone) => {}
            }
        }

        Search { index: None, probes }
    }

    /// Finds the first empty or tombstone slot on the probe sequence starting at `start`
    fn vacant_index(slots: &[Slot<K, V>], start: usize, step: usize) -> Option<usize> {
        Probe::new(start, step, slots.len())
            .find(|&index| matches!(slots.get(index), Some(Slot::Empty | Slot::Tombstone)))
    }

    /// Stores a key that is known to be absent, growing the table if no slot is free
    fn place(&mut self, key: K, value: V) {
        let hash = hash_key(&key);
        loop {
            let start = home_index(hash, self.slots.len());
            if let Some(slot) = Self::vacant_index(&self.slots, start, self.step)
                .and_then(|index| self.slots.get_mut(index))
            {
                *slot = Slot::Occupied { key, value };
                return;
            }
            self.grow();
        }
    }

    /// Inserts a key-value pair.
    ///
    /// Returns the previous value if the key was already present; its slot is updated in
    /// place and the size is unchanged. Otherwise the entry takes the first empty or tombstone
    /// slot of its probe sequence, and the table grows if the size reaches the threshold.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        if let Some(Slot::Occupied { value: stored, .. }) =
            self.search(&key).index.and_then(|index| self.slots.get_mut(index))
        {
            return Some(mem::replace(stored, value));
        }

        self.place(key, value);
        self.size = self.size.saturating_add(1);

        if self.size >= self.threshold {
            self.grow();
        }

        None
    }

    /// Retrieves the value stored for `key`
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.search(key).index.and_then(|index| self.slots.get(index)) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Retrieves a mutable reference to the value stored for `key`
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.search(key).index.and_then(|index| self.slots.get_mut(index)) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Returns true if the table holds `key`
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.search(key).index.is_some()
    }

    /// Removes `key`, leaving a tombstone in its slot, and returns its value
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.search(key).index.and_then(|index| self.slots.get_mut(index))?;

        match mem::replace(slot, Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.size = self.size.saturating_sub(1);
                Some(value)
            }
            other => {
                // `search` only reports occupied slots
                *slot = other;
                None
            }
        }
    }

    /// Number of slots examined by a lookup of `key`, whether it hits or misses
    pub fn probe_length<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.search(key).probes
    }

    /// Doubles the slot array and rehashes every live entry into it.
    ///
    /// Entries are replayed in the storage order of the old array, tombstones are dropped.
    fn grow(&mut self) {
        let old_capacity = self.slots.len();
        let capacity = old_capacity.saturating_mul(2);

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        let old_slots = mem::replace(&mut self.slots, slots);

        self.threshold = threshold_for(self.load_factor, capacity);
        self.step = coprime_step(capacity);
        self.resizes = self.resizes.saturating_add(1);

        let live = self.size;
        self.size = 0;

        for slot in old_slots {
            if let Slot::Occupied { key, value } = slot {
                let start = home_index(hash_key(&key), capacity);
                if let Some(target) = Self::vacant_index(&self.slots, start, self.step)
                    .and_then(|index| self.slots.get_mut(index))
                {
                    *target = Slot::Occupied { key, value };
                    self.size = self.size.saturating_add(1);
                }
            }
        }

        log::debug!(
            "Grew table from {old_capacity} to {capacity} slots, rehashed {}/{live} entries with stride {}",
            self.size,
            self.step,
        );
    }

    /// Removes every entry, keeping the current capacity
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::Empty;
        }
        self.size = 0;
    }
}

impl<K, V> OpenAddressTable<K, V> {
    /// Returns the number of entries in the table
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the configured load factor, after clamping
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Returns the size at which the next insertion of a new key grows the table
    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Returns the stride between two probes for the current capacity
    #[must_use]
    pub fn probe_step(&self) -> usize {
        self.step
    }

    /// Returns how many times the table has grown since it was created
    #[must_use]
    pub fn resize_count(&self) -> usize {
        self.resizes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    /// Key with a fixed hash so that every key collides
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Colliding(u32);

    impl Hash for Colliding {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            0_u8.hash(state);
        }
    }

    #[test]
    fn test_put_and_get() {
        let mut table = OpenAddressTable::default();
        assert_eq!(table.put("key1".to_string(), 1), None);
        assert_eq!(table.put("key2".to_string(), 2), None);
        assert_eq!(table.put("key3".to_string(), 3), None);

        assert_eq!(table.get("key1"), Some(&1));
        assert_eq!(table.get("key2"), Some(&2));
        assert_eq!(table.get("key3"), Some(&3));
        assert_eq!(table.get("key4"), None);
        assert_eq!(table.size(), 3);
    }

    #[test]
    fn test_update() {
        let mut table = OpenAddressTable::default();
        assert_eq!(table.put("key1".to_string(), 1), None);
        assert_eq!(table.put("key1".to_string(), 10), Some(1));
        assert_eq!(table.get("key1"), Some(&10));
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn test_remove() {
        let mut table = OpenAddressTable::default();
        table.put("key1".to_string(), 1);
        table.put("key2".to_string(), 2);

        assert_eq!(table.remove("key1"), Some(1));
        assert_eq!(table.get("key1"), None);
        assert_eq!(table.get("key2"), Some(&2));
        assert_eq!(table.remove("key1"), None);
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn test_invalid_parameters() {
        assert_eq!(
            OpenAddressTable::<u32, u32>::new(0, 0.5).unwrap_err(),
            Error::InvalidCapacity(0)
        );
        assert!(matches!(
            OpenAddressTable::<u32, u32>::with_load_factor(f64::NAN),
            Err(Error::InvalidLoadFactor(_))
        ));
    }

    #[test]
    fn test_load_factor_is_clamped() {
        let table = OpenAddressTable::<u32, u32>::new(10, 3.0).unwrap();
        assert_eq!(table.load_factor(), 1.0);
        assert_eq!(table.threshold(), 10);

        let table = OpenAddressTable::<u32, u32>::new(10, -1.0).unwrap();
        assert_eq!(table.load_factor(), 0.0);
        assert_eq!(table.threshold(), 0);
    }

    #[test]
    fn test_defaults() {
        let table = OpenAddressTable::<String, u32>::default();
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert_eq!(table.threshold(), 500);
        assert_eq!(table.probe_step(), 7);
        assert!(table.is_empty());
    }

    #[test]
    fn test_resize() {
        let mut table = OpenAddressTable::new(4, 0.5).unwrap();

        table.put("key1".to_string(), 1);
        assert_eq!(table.capacity(), 4);
        // Second insert reaches the threshold of 2
        table.put("key2".to_string(), 2);
        assert_eq!(table.capacity(), 8);
        assert_eq!(table.threshold(), 4);
        assert_eq!(table.resize_count(), 1);

        assert_eq!(table.get("key1"), Some(&1));
        assert_eq!(table.get("key2"), Some(&2));
        assert_eq!(table.size(), 2);
    }

    #[test]
    fn test_resize_drops_tombstones() {
        let mut table = OpenAddressTable::new(8, 0.5).unwrap();
        table.put(1, "one");
        table.put(2, "two");
        table.put(3, "three");
        assert_eq!(table.remove(&2), Some("two"));

        // Brings the size back to the threshold
        table.put(4, "four");
        table.put(5, "five");
        assert_eq!(table.capacity(), 16);
        assert_eq!(table.size(), 4);

        let tombstones = table.slots.iter().filter(|slot| matches!(slot, Slot::Tombstone)).count();
        assert_eq!(tombstones, 0);
        assert_eq!(table.get(&2), None);
        assert_eq!(table.get(&5), Some(&"five"));
    }

    #[test]
    fn test_tombstone_keeps_chain_reachable() {
        let mut table = OpenAddressTable::new(16, 1.0).unwrap();
        table.put(Colliding(1), 1);
        table.put(Colliding(2), 2);
        table.put(Colliding(3), 3);

        assert_eq!(table.remove(&Colliding(1)), Some(1));
        assert_eq!(table.get(&Colliding(1)), None);
        assert_eq!(table.get(&Colliding(2)), Some(&2));
        assert_eq!(table.get(&Colliding(3)), Some(&3));
        assert_eq!(table.probe_length(&Colliding(3)), 3);
    }

    #[test]
    fn test_put_reuses_tombstone() {
        let mut table = OpenAddressTable::new(16, 1.0).unwrap();
        table.put(Colliding(1), 1);
        table.put(Colliding(2), 2);
        table.remove(&Colliding(1));

        // Already present behind the tombstone: updated in place, not duplicated
        assert_eq!(table.put(Colliding(2), 20), Some(2));
        assert_eq!(table.size(), 1);

        // A new key takes the tombstone at the head of the chain
        assert_eq!(table.put(Colliding(3), 3), None);
        assert_eq!(table.probe_length(&Colliding(3)), 1);
        assert_eq!(table.get(&Colliding(2)), Some(&20));
        assert_eq!(table.size(), 2);
    }

    #[test]
    fn test_lookup_terminates_without_empty_slots() {
        let mut table = OpenAddressTable::new(4, 1.0).unwrap();

        // Churn keys until every slot has been used once
        for key in 0..1000_u32 {
            table.put(key, key);
            table.remove(&key);
            if table.slots.iter().all(|slot| matches!(slot, Slot::Tombstone)) {
                break;
            }
        }

        assert!(table.slots.iter().all(|slot| matches!(slot, Slot::Tombstone)));
        assert_eq!(table.capacity(), 4);
        assert!(table.is_empty());
        assert_eq!(table.get(&5000), None);
        assert_eq!(table.probe_length(&5000), 4);
        assert_eq!(table.remove(&5000), None);

        // Insertion still finds a slot among the tombstones
        assert_eq!(table.put(5000, 1), None);
        assert_eq!(table.get(&5000), Some(&1));
    }

    #[test]
    fn test_zero_load_factor_grows_on_every_insert() {
        let mut table = OpenAddressTable::new(2, 0.0).unwrap();
        for i in 0..5 {
            table.put(i, i);
        }
        assert_eq!(table.capacity(), 64);
        assert_eq!(table.resize_count(), 5);
        for i in 0..5 {
            assert_eq!(table.get(&i), Some(&i));
        }
    }

    #[test]
    fn test_get_mut() {
        let mut table = OpenAddressTable::default();
        table.put("key1".to_string(), 1);

        if let Some(value) = table.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(table.get("key1"), Some(&11));
        assert_eq!(table.get_mut("key2"), None);
    }

    #[test]
    fn test_clear() {
        let mut table = OpenAddressTable::new(4, 0.5).unwrap();
        table.put("key1".to_string(), 1);
        table.put("key2".to_string(), 2);
        let capacity = table.capacity();

        table.clear();

        assert_eq!(table.len(), 0);
        assert!(table.is_empty());
        assert_eq!(table.capacity(), capacity);
        assert_eq!(table.get("key1"), None);
        assert_eq!(table.get("key2"), None);
    }

    #[test]
    fn test_from_iter_and_extend() {
        let mut table: OpenAddressTable<u32, u32> = (0..10).map(|i| (i, i * i)).collect();
        table.extend((5..15).map(|i| (i, i)));

        assert_eq!(table.len(), 15);
        assert_eq!(table.get(&3), Some(&9));
        assert_eq!(table.get(&7), Some(&7));
        assert!(table.contains_key(&14));
        assert!(!table.contains_key(&15));
    }
}
