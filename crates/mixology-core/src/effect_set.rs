//! Fixed-width effect collection.
//!
//! Effects form a closed universe indexed densely by [`EffectId`], so a set of
//! effects is a single `u64` word. Enumeration always walks ascending ids,
//! which makes iteration order canonical and independent of insertion order.

use crate::id::EffectId;
use serde::{Deserialize, Serialize};

/// Maximum number of effects a mixed product can carry.
pub const MAX_EFFECTS: usize = 8;

/// A set of effects backed by a bitmask over effect ids.
///
/// `Copy` is intentional: cloning is a word copy and the copy shares no state
/// with the original.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectSet {
    bits: u64,
}

impl EffectSet {
    /// Number of distinct effect ids a set can represent.
    pub const CAPACITY: usize = u64::BITS as usize;

    /// Create an empty set.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Create a set seeded with the given effects. Out-of-range ids are ignored.
    pub fn from_ids<I: IntoIterator<Item = EffectId>>(ids: I) -> Self {
        ids.into_iter().collect()
    }

    #[inline]
    fn mask(effect: EffectId) -> Option<u64> {
        1u64.checked_shl(u32::from(effect.0))
    }

    /// Insert an effect. Returns `true` if it was not already present.
    pub fn insert(&mut self, effect: EffectId) -> bool {
        let Some(mask) = Self::mask(effect) else {
            return false;
        };
        let fresh = self.bits & mask == 0;
        self.bits |= mask;
        fresh
    }

    /// Remove an effect. Returns `true` if it was present.
    pub fn remove(&mut self, effect: EffectId) -> bool {
        let Some(mask) = Self::mask(effect) else {
            return false;
        };
        let present = self.bits & mask != 0;
        self.bits &= !mask;
        present
    }

    pub fn contains(&self, effect: EffectId) -> bool {
        Self::mask(effect).is_some_and(|mask| self.bits & mask != 0)
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if every effect in `other` is also in `self`.
    pub fn contains_all(&self, other: &EffectSet) -> bool {
        self.bits & other.bits == other.bits
    }

    /// Returns `true` if at least one effect in `other` is in `self`.
    pub fn contains_any(&self, other: &EffectSet) -> bool {
        self.bits & other.bits != 0
    }

    /// Returns `true` if the two sets share no effect.
    pub fn is_disjoint(&self, other: &EffectSet) -> bool {
        !self.contains_any(other)
    }

    /// Iterate members in ascending id order.
    pub fn iter(&self) -> Iter {
        Iter { bits: self.bits }
    }

    /// Members in canonical (ascending id) order.
    pub fn to_vec(&self) -> Vec<EffectId> {
        self.iter().collect()
    }
}

impl FromIterator<EffectId> for EffectSet {
    fn from_iter<I: IntoIterator<Item = EffectId>>(iter: I) -> Self {
        let mut set = EffectSet::new();
        for effect in iter {
            set.insert(effect);
        }
        set
    }
}

impl Extend<EffectId> for EffectSet {
    fn extend<I: IntoIterator<Item = EffectId>>(&mut self, iter: I) {
        for effect in iter {
            self.insert(effect);
        }
    }
}

impl IntoIterator for EffectSet {
    type Item = EffectId;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

impl IntoIterator for &EffectSet {
    type Item = EffectId;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

/// Ascending-order iterator over an [`EffectSet`].
#[derive(Debug, Clone)]
pub struct Iter {
    bits: u64,
}

impl Iterator for Iter {
    type Item = EffectId;

    fn next(&mut self) -> Option<EffectId> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros();
        // Clear the lowest set bit.
        self.bits &= self.bits - 1;
        Some(EffectId(index as u8))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Iter {}
