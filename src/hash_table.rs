use std::{fmt, mem};

use log::{debug, trace};

use crate::{
    error::TableError,
    hashing::ProbeSequence,
    prime::next_prime,
    slot::{Entry, Slot},
};

/// Base size of a table created with [`HashTable::new`]; the capacity is the next prime.
pub const DEFAULT_BASE_SIZE: usize = 50;
/// Load factor (percent) above which the table grows.
pub const DEFAULT_GROW_PERCENT: usize = 70;
/// Load factor (percent) below which the table shrinks.
pub const DEFAULT_SHRINK_PERCENT: usize = 10;

/// Smallest base size a table accepts.
const MIN_BASE_SIZE: usize = 2;
/// Upper clamp for the grow threshold, so a probe always meets an empty slot.
const MAX_GROW_PERCENT: usize = 95;

/// Outcome of walking a key's probe sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    /// The key lives at this index.
    Occupied(usize),
    /// The key is absent; this is where an insert would place it.
    Vacant(usize),
    /// The key is absent and every slot on its sequence is occupied.
    Exhausted,
}

/// Result of [`HashTable::locate`].
#[derive(Debug, Clone, Copy)]
struct Located {
    /// Where the walk ended
    probe: Probe,
    /// Number of slots inspected
    inspected: usize,
}

/// A string-to-string hash table using open addressing with double hashing.
///
/// The capacity is always prime. Deleted entries leave tombstones behind so that the
/// probe sequences of other keys stay intact; tombstones are reused by later inserts
/// and discarded whenever the table is rebuilt.
///
/// Note: This implementation is not thread-safe. Wrap it in a lock for shared use.
#[derive(Clone)]
pub struct HashTable {
    /// The backing array; its length is the capacity
    slots: Box<[Slot]>,
    /// Logical capacity target; the capacity is `next_prime(base_size)`
    base_size: usize,
    /// Number of occupied slots
    count: usize,
    /// Number of tombstone slots
    tombstones: usize,
    /// Base size the table was created with; it never shrinks below it
    min_base_size: usize,
    /// Load factor threshold for growing, stored as percentage (0-100)
    grow_percent: usize,
    /// Load factor threshold for shrinking, stored as percentage (0-100)
    shrink_percent: usize,
}

impl Default for HashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.count)
            .field("capacity", &self.capacity())
            .field("base_size", &self.base_size)
            .field("tombstones", &self.tombstones)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for HashTable
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value.as_ref());
        }
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl HashTable {
    /// Creates an empty table with the default base size of 50 (capacity 53).
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_size(DEFAULT_BASE_SIZE)
    }

    /// Creates an empty table with capacity `next_prime(base_size)`.
    ///
    /// `base_size` is clamped to at least 2 and also becomes the floor below which the
    /// table never shrinks.
    #[must_use]
    pub fn with_base_size(base_size: usize) -> Self {
        let base_size = base_size.max(MIN_BASE_SIZE);
        Self::from_slots(base_size, Slot::empty_array(next_prime(base_size)))
    }

    /// Like [`HashTable::with_base_size`], but reports allocation failure.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Allocation`] if the slot array cannot be allocated.
    pub fn try_with_base_size(base_size: usize) -> Result<Self, TableError> {
        let base_size = base_size.max(MIN_BASE_SIZE);
        Ok(Self::from_slots(base_size, Slot::try_empty_array(next_prime(base_size))?))
    }

    /// Wraps an already allocated array of empty slots.
    fn from_slots(base_size: usize, slots: Box<[Slot]>) -> Self {
        trace!("new table with base size {base_size} and capacity {}", slots.len());
        Self {
            slots,
            base_size,
            count: 0,
            tombstones: 0,
            min_base_size: base_size,
            grow_percent: DEFAULT_GROW_PERCENT,
            shrink_percent: DEFAULT_SHRINK_PERCENT,
        }
    }

    /// Inserts a key-value pair, replacing the value if the key is already present.
    ///
    /// Returns the previous value for the key, if any. The table may grow afterwards.
    pub fn insert(&mut self, key: &str, value: &str) -> Option<String> {
        let previous = self.insert_entry(Entry::new(key, value));
        self.grow_if_needed();
        previous
    }

    /// Like [`HashTable::insert`], but reports allocation failure.
    ///
    /// Everything the insert needs (the key and value copies and, if the insert
    /// crosses the load threshold, the larger slot array) is allocated before the
    /// table is touched, so on error the table is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Allocation`] if any of those allocations fails.
    pub fn try_insert(&mut self, key: &str, value: &str) -> Result<Option<String>, TableError> {
        let entry = Entry::try_new(key, value)?;

        let located = self.locate(key);
        let (count, tombstones) = match located.probe {
            Probe::Occupied(_) => return Ok(self.commit(located.probe, entry)),
            Probe::Vacant(index) => {
                let reuses = matches!(self.slots.get(index), Some(Slot::Tombstone));
                (self.count.saturating_add(1), self.tombstones.saturating_sub(usize::from(reuses)))
            }
            Probe::Exhausted => (self.count.saturating_add(1), self.tombstones),
        };

        let capacity = self.capacity();
        if located.probe == Probe::Exhausted || self.exceeds_grow(count, capacity) {
            let base_size = self.base_size.saturating_mul(2);
            let slots = Slot::try_empty_array(next_prime(base_size))?;
            self.rebuild(base_size, slots);
            return Ok(self.insert_entry(entry));
        }
        if self.exceeds_grow(count.saturating_add(tombstones), capacity) {
            let slots = Slot::try_empty_array(capacity)?;
            self.rebuild(self.base_size, slots);
            return Ok(self.insert_entry(entry));
        }
        Ok(self.commit(located.probe, entry))
    }

    /// Returns the value stored for `key`.
    #[must_use]
    pub fn search(&self, key: &str) -> Option<&str> {
        match self.locate(key).probe {
            Probe::Occupied(index) => self.slots.get(index).and_then(Slot::entry).map(Entry::value),
            Probe::Vacant(_) | Probe::Exhausted => None,
        }
    }

    /// Returns true if the table contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.search(key).is_some()
    }

    /// Removes `key` from the table and returns its value.
    ///
    /// Deleting an absent key does nothing. The table may shrink afterwards.
    pub fn delete(&mut self, key: &str) -> Option<String> {
        let Probe::Occupied(index) = self.locate(key).probe else {
            return None;
        };
        let removed = self.slots.get_mut(index).and_then(Slot::vacate)?;
        self.count = self.count.saturating_sub(1);
        self.tombstones = self.tombstones.saturating_add(1);

        if self.count.saturating_mul(100) < self.capacity().saturating_mul(self.shrink_percent) {
            self.resize(self.base_size / 2);
        }
        Some(removed.into_value())
    }

    /// Number of slots a search for `key` inspects.
    #[must_use]
    pub fn probe_count(&self, key: &str) -> usize {
        self.locate(key).inspected
    }

    /// Removes every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.count = 0;
        self.tombstones = 0;
    }

    /// Returns the number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of slots, which is always prime
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the logical capacity target the current capacity was derived from
    #[must_use]
    pub fn base_size(&self) -> usize {
        self.base_size
    }

    /// Returns the current load factor of the table
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.count as f64 / self.capacity() as f64
    }

    /// Sets the load factor (percent) above which inserts grow the table.
    ///
    /// The value is clamped to `1..=95`, and the shrink threshold is lowered if needed
    /// so that it stays below half of the grow threshold. Takes effect on the next
    /// insert.
    pub fn set_grow_threshold(&mut self, percent: usize) {
        self.grow_percent = percent.clamp(1, MAX_GROW_PERCENT);
        self.shrink_percent = self.shrink_percent.min(self.max_shrink_percent());
    }

    /// Sets the load factor (percent) below which deletes shrink the table.
    ///
    /// The value is capped below half of the grow threshold so that a table that has
    /// just grown never qualifies for shrinking. Zero disables shrinking.
    pub fn set_shrink_threshold(&mut self, percent: usize) {
        self.shrink_percent = percent.min(self.max_shrink_percent());
    }

    /// Largest shrink threshold compatible with the grow threshold.
    fn max_shrink_percent(&self) -> usize {
        (self.grow_percent / 2).saturating_sub(1)
    }

    /// Returns true if `used` slots out of `capacity` is above the grow threshold.
    fn exceeds_grow(&self, used: usize, capacity: usize) -> bool {
        used.saturating_mul(100) > capacity.saturating_mul(self.grow_percent)
    }

    /// Walks the probe sequence of `key` until it finds the key or an empty slot.
    ///
    /// Tombstones are skipped, but the first one seen is reported as the vacant slot
    /// so that inserts reuse it.
    fn locate(&self, key: &str) -> Located {
        let mut first_tombstone = None;
        let mut inspected: usize = 0;

        for index in ProbeSequence::new(key, self.slots.len()) {
            inspected = inspected.saturating_add(1);
            match self.slots.get(index) {
                Some(Slot::Occupied(entry)) if entry.key() == key => {
                    return Located { probe: Probe::Occupied(index), inspected };
                }
                Some(Slot::Occupied(_)) => {}
                Some(Slot::Tombstone) => {
                    first_tombstone.get_or_insert(index);
                }
                Some(Slot::Empty) => {
                    let index = first_tombstone.unwrap_or(index);
                    return Located { probe: Probe::Vacant(index), inspected };
                }
                None => break,
            }
        }

        let probe = first_tombstone.map_or(Probe::Exhausted, Probe::Vacant);
        Located { probe, inspected }
    }

    /// Places `entry` without checking load thresholds.
    fn insert_entry(&mut self, entry: Entry) -> Option<String> {
        let located = self.locate(entry.key());
        self.commit(located.probe, entry)
    }

    /// Stores `entry` where `probe` points and updates the counters.
    fn commit(&mut self, probe: Probe, entry: Entry) -> Option<String> {
        let index = match probe {
            Probe::Occupied(index) | Probe::Vacant(index) => index,
            Probe::Exhausted => {
                self.resize(self.base_size.saturating_mul(2));
                return self.insert_entry(entry);
            }
        };
        // `locate` only reports indices inside the array.
        let slot = self.slots.get_mut(index)?;

        match slot.occupy(entry) {
            Slot::Occupied(old) => Some(old.into_value()),
            Slot::Tombstone => {
                self.tombstones = self.tombstones.saturating_sub(1);
                self.count = self.count.saturating_add(1);
                None
            }
            Slot::Empty => {
                self.count = self.count.saturating_add(1);
                None
            }
        }
    }

    /// Grows the table, or purges its tombstones, after an insert.
    fn grow_if_needed(&mut self) {
        let capacity = self.capacity();
        if self.exceeds_grow(self.count, capacity) {
            self.resize(self.base_size.saturating_mul(2));
        } else if self.exceeds_grow(self.count.saturating_add(self.tombstones), capacity) {
            trace!("purging {} tombstones at capacity {capacity}", self.tombstones);
            self.rebuild(self.base_size, Slot::empty_array(capacity));
        }
    }

    /// Rebuilds the table with capacity `next_prime(new_base_size)`.
    ///
    /// Does nothing if `new_base_size` is below the table's minimum base size.
    fn resize(&mut self, new_base_size: usize) {
        if new_base_size < self.min_base_size {
            return;
        }
        self.rebuild(new_base_size, Slot::empty_array(next_prime(new_base_size)));
    }

    /// Moves every live entry into `slots` and makes it the backing array.
    ///
    /// Tombstones are dropped. The old array is released with the scratch table.
    fn rebuild(&mut self, new_base_size: usize, slots: Box<[Slot]>) {
        let old_capacity = self.capacity();
        let mut scratch = Self::from_slots(new_base_size, slots);
        scratch.min_base_size = self.min_base_size;
        scratch.grow_percent = self.grow_percent;
        scratch.shrink_percent = self.shrink_percent;

        for slot in self.slots.iter_mut() {
            if let Some(entry) = slot.take_entry() {
                scratch.insert_entry(entry);
            }
        }

        mem::swap(self, &mut scratch);
        debug!(
            "resized table from capacity {old_capacity} to {} (base size {}, {} entries)",
            self.capacity(),
            self.base_size,
            self.count
        );
    }
}

/// Creates an empty table with the default capacity.
#[must_use]
pub fn create() -> HashTable {
    HashTable::new()
}

/// Releases a table and every entry it owns.
pub fn destroy(table: HashTable) {
    drop(table);
}

/// Inserts or updates `key` in `table`.
pub fn insert(table: &mut HashTable, key: &str, value: &str) {
    table.insert(key, value);
}

/// Looks up `key` in `table`.
#[must_use]
pub fn search<'a>(table: &'a HashTable, key: &str) -> Option<&'a str> {
    table.search(key)
}

/// Removes `key` from `table`; absent keys are ignored.
pub fn delete(table: &mut HashTable, key: &str) {
    table.delete(key);
}
