//! Entries and the three-state slots of the backing array.

use crate::error::TableError;

/// An owned key-value pair stored in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    /// The key of the pair
    key: String,
    /// The value associated with the key
    value: String,
}

impl Entry {
    /// Creates an entry holding copies of `key` and `value`.
    pub(crate) fn new(key: &str, value: &str) -> Self {
        Self { key: key.to_owned(), value: value.to_owned() }
    }

    /// Creates an entry holding copies of `key` and `value`, reporting allocation
    /// failure instead of aborting.
    pub(crate) fn try_new(key: &str, value: &str) -> Result<Self, TableError> {
        Ok(Self { key: try_copy(key, "key")?, value: try_copy(value, "value")? })
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    pub(crate) fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the entry and returns its value.
    pub(crate) fn into_value(self) -> String {
        self.value
    }
}

/// Copies `source` into a freshly reserved `String`.
fn try_copy(source: &str, what: &'static str) -> Result<String, TableError> {
    let mut copy = String::new();
    copy.try_reserve_exact(source.len())
        .map_err(|source| TableError::Allocation { what, source })?;
    copy.push_str(source);
    Ok(copy)
}

/// A single position of the backing array.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum Slot {
    /// Never occupied since the array was allocated; ends every probe.
    #[default]
    Empty,
    /// Holds a live entry.
    Occupied(Entry),
    /// Held an entry that was deleted; probes continue past it.
    Tombstone,
}

impl Slot {
    /// Allocates `len` empty slots.
    pub(crate) fn empty_array(len: usize) -> Box<[Self]> {
        std::iter::repeat_with(Self::default).take(len).collect()
    }

    /// Allocates `len` empty slots, reporting allocation failure instead of aborting.
    pub(crate) fn try_empty_array(len: usize) -> Result<Box<[Self]>, TableError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(len)
            .map_err(|source| TableError::Allocation { what: "slot array", source })?;
        slots.resize_with(len, Self::default);
        Ok(slots.into_boxed_slice())
    }

    /// Stores `entry` in this slot and returns the previous state.
    pub(crate) fn occupy(&mut self, entry: Entry) -> Self {
        std::mem::replace(self, Self::Occupied(entry))
    }

    /// Turns an occupied slot into a tombstone and returns the removed entry.
    ///
    /// Empty slots and tombstones are left untouched.
    pub(crate) fn vacate(&mut self) -> Option<Entry> {
        match std::mem::take(self) {
            Self::Occupied(entry) => {
                *self = Self::Tombstone;
                Some(entry)
            }
            other => {
                *self = other;
                None
            }
        }
    }

    /// Takes the entry out of an occupied slot, leaving it empty.
    pub(crate) fn take_entry(&mut self) -> Option<Entry> {
        match std::mem::take(self) {
            Self::Occupied(entry) => Some(entry),
            _ => None,
        }
    }

    /// Returns the entry if the slot is occupied.
    pub(crate) fn entry(&self) -> Option<&Entry> {
        match self {
            Self::Occupied(entry) => Some(entry),
            Self::Empty | Self::Tombstone => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_array_is_all_empty() {
        let slots = Slot::empty_array(53);
        assert_eq!(slots.len(), 53);
        assert!(slots.iter().all(|slot| *slot == Slot::Empty));

        let slots = Slot::try_empty_array(7).unwrap();
        assert_eq!(slots.len(), 7);
        assert!(slots.iter().all(|slot| *slot == Slot::Empty));
    }

    #[test]
    fn test_try_empty_array_reports_overflow() {
        let err = Slot::try_empty_array(usize::MAX).unwrap_err();
        assert!(matches!(err, TableError::Allocation { what: "slot array", .. }));
    }

    #[test]
    fn test_occupy_returns_previous_state() {
        let mut slot = Slot::Empty;
        assert_eq!(slot.occupy(Entry::new("a", "1")), Slot::Empty);
        assert_eq!(slot.occupy(Entry::new("a", "2")), Slot::Occupied(Entry::new("a", "1")));
        assert_eq!(slot.entry().map(Entry::value), Some("2"));
    }

    #[test]
    fn test_vacate_leaves_tombstone() {
        let mut slot = Slot::Occupied(Entry::new("a", "1"));
        assert_eq!(slot.vacate(), Some(Entry::new("a", "1")));
        assert_eq!(slot, Slot::Tombstone);

        // Vacating again is a no-op.
        assert_eq!(slot.vacate(), None);
        assert_eq!(slot, Slot::Tombstone);

        let mut empty = Slot::Empty;
        assert_eq!(empty.vacate(), None);
        assert_eq!(empty, Slot::Empty);
    }

    #[test]
    fn test_take_entry_empties_slot() {
        let mut slot = Slot::Occupied(Entry::new("k", "v"));
        assert_eq!(slot.take_entry().map(Entry::into_value), Some("v".to_string()));
        assert_eq!(slot, Slot::Empty);

        let mut tombstone = Slot::Tombstone;
        assert_eq!(tombstone.take_entry(), None);
    }

    #[test]
    fn test_try_new_copies_strings() {
        let entry = Entry::try_new("key", "").unwrap();
        assert_eq!(entry.key(), "key");
        assert_eq!(entry.value(), "");
    }
}
