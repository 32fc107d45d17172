//! Bounded memo of complete paths keyed by floored (start, goal).
//!
//! Eviction is by insertion order (FIFO): reads never refresh an entry.

use indexmap::IndexMap;

use crate::models::{Coord, Position};

pub const DEFAULT_CACHE_CAPACITY: usize = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PathKey {
    pub start: Coord,
    pub goal: Coord,
}

impl PathKey {
    pub fn new(start: Position, goal: Position) -> Self { Self { start: start.floor(), goal: goal.floor() } }
}

#[derive(Debug, Clone)]
pub struct PathCache {
    capacity: usize,
    entries: IndexMap<PathKey, Vec<Coord>>,
}

impl Default for PathCache {
    fn default() -> Self { Self::with_capacity(DEFAULT_CACHE_CAPACITY) }
}

impl PathCache {
    /// A capacity of zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { capacity, entries: IndexMap::with_capacity(capacity.min(DEFAULT_CACHE_CAPACITY)) }
    }

    pub fn get(&self, start: Position, goal: Position) -> Option<&[Coord]> {
        self.entries.get(&PathKey::new(start, goal)).map(Vec::as_slice)
    }

    /// Callers must only store complete paths. Replacing an existing key keeps its slot in the
    /// eviction order.
    pub fn put(&mut self, start: Position, goal: Position, path: Vec<Coord>) {
        if self.capacity == 0 {
            return;
        }
        let key = PathKey::new(start, goal);
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = path;
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.shift_remove_index(0);
        }
        self.entries.insert(key, path);
    }

    pub fn clear(&mut self) { self.entries.clear(); }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn capacity(&self) -> usize { self.capacity }

    pub fn contains(&self, start: Position, goal: Position) -> bool {
        self.entries.contains_key(&PathKey::new(start, goal))
    }
}
