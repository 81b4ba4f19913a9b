//! Connections waiting for a partner with the same key.

use crate::relay::wire::RelayKey;

/// One waiting connection.
#[derive(Debug)]
pub struct Entry<T> {
    pub key: RelayKey,
    pub waiting: T,
}

/// Growable list of waiting connections with an explicit logical capacity.
///
/// The capacity doubles when a push finds the list full. After a removal it
/// halves while fewer than a quarter of the slots are used, but never below
/// the floor it was created with.
#[derive(Debug)]
pub struct PendingList<T> {
    entries: Vec<Entry<T>>,
    capacity: usize,
    floor: usize,
}

impl<T> PendingList<T> {
    pub fn new(floor: usize) -> Self {
        let floor = floor.max(1);
        Self {
            entries: Vec::with_capacity(floor),
            capacity: floor,
            floor,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, key: &RelayKey) -> bool {
        self.entries.iter().any(|e| &e.key == key)
    }

    /// Keys in arrival order.
    pub fn keys(&self) -> impl Iterator<Item = &RelayKey> {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn push(&mut self, key: RelayKey, waiting: T) {
        if self.entries.len() == self.capacity {
            self.capacity *= 2;
            self.entries.reserve_exact(self.capacity - self.entries.len());
            log::debug!("pending list grew to {}", self.capacity);
        }
        self.entries.push(Entry { key, waiting });
    }

    /// Remove the oldest entry with `key`, keeping the others in order.
    pub fn take(&mut self, key: &RelayKey) -> Option<T> {
        let idx = self.entries.iter().position(|e| &e.key == key)?;
        let entry = self.entries.remove(idx);
        if self.entries.len() < self.capacity / 4 && self.capacity / 2 >= self.floor {
            self.capacity /= 2;
            self.entries.shrink_to(self.capacity);
            log::debug!("pending list shrank to {}", self.capacity);
        }
        Some(entry.waiting)
    }

    /// Drop every waiting connection.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
