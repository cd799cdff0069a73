//! State identifiers and bit-set state collections.

use fixedbitset::FixedBitSet;
use std::fmt;

/// A state identifier represented as a dense u32 index.
///
/// Identifiers are only meaningful within one [`crate::Dfa`] instance;
/// minimization assigns fresh ones.
pub type StateId = u32;

/// A set of states backed by a bit set.
///
/// Iteration yields states in ascending order, which keeps every consumer
/// (block representatives, reachability traversals) deterministic.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StateSet {
    bits: FixedBitSet,
}

impl StateSet {
    /// Create an empty set sized for `capacity` states.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    /// Create a set containing a single state.
    pub fn singleton(state: StateId, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        set.insert(state);
        set
    }

    /// Insert a state, growing the set if needed.
    pub fn insert(&mut self, state: StateId) {
        let idx = state as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        self.bits.insert(idx);
    }

    /// Remove a state from the set.
    pub fn remove(&mut self, state: StateId) {
        let idx = state as usize;
        if idx < self.bits.len() {
            self.bits.set(idx, false);
        }
    }

    /// Check whether the set contains `state`.
    pub fn contains(&self, state: StateId) -> bool {
        let idx = state as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    /// Check whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// Number of states in the set.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// Iterate over the states in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StateId> + '_ {
        self.bits.ones().map(|i| i as StateId)
    }

    /// Union another set into this one in place.
    pub fn union_with(&mut self, other: &StateSet) {
        if other.bits.len() > self.bits.len() {
            self.bits.grow(other.bits.len());
        }
        self.bits.union_with(&other.bits);
    }

    /// Check whether this set shares any state with `other`.
    pub fn intersects(&self, other: &StateSet) -> bool {
        self.bits.intersection(&other.bits).next().is_some()
    }

    /// States contained in both this set and `other`, as a new set.
    pub fn intersection(&self, other: &StateSet) -> StateSet {
        let mut result = self.clone();
        let max_len = std::cmp::max(result.bits.len(), other.bits.len());
        result.bits.grow(max_len);
        result.bits.intersect_with(&other.bits);
        result
    }

    /// States contained in this set but not in `other`, as a new set.
    pub fn difference(&self, other: &StateSet) -> StateSet {
        let mut result = self.clone();
        result.bits.difference_with(&other.bits);
        result
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<StateId> for StateSet {
    fn from_iter<I: IntoIterator<Item = StateId>>(iter: I) -> Self {
        let mut set = Self::with_capacity(0);
        for state in iter {
            set.insert(state);
        }
        set
    }
}
