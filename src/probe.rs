//! Slot index derivation and the linear probe sequence

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

/// Preferred stride between two consecutive probes
pub(crate) const PROBE_STEP: usize = 7;

/// Fractional part of the inverse golden ratio in 64-bit fixed point (`0.6180339887...`)
const MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// Computes the intrinsic hash of a key
pub(crate) fn hash_key<Q: ?Sized + Hash>(key: &Q) -> u64 {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Maps a hash onto `0..capacity` with multiplicative hashing.
///
/// Equivalent to `floor(capacity * frac(hash * MULTIPLIER))`, evaluated exactly: the wrapping
/// product keeps the fractional bits and the high half of the widened product scales them
/// onto the table.
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub(crate) fn home_index(hash: u64, capacity: usize) -> usize {
    let fraction = u128::from(hash.wrapping_mul(MULTIPLIER));
    // `usize` is at most 64 bits wide on every supported target
    let scaled = (fraction * capacity as u128) >> 64;
    scaled as usize
}

/// Greatest common divisor
fn gcd(mut a: usize, mut b: usize) -> usize {
    while let Some(rest) = a.checked_rem(b) {
        a = b;
        b = rest;
    }
    a
}

/// Picks the stride for a table of `capacity` slots.
///
/// The stride is the smallest value not below [`PROBE_STEP`] that is coprime with the capacity,
/// reduced modulo the capacity. A coprime stride makes every probe sequence a full cycle.
pub(crate) fn coprime_step(capacity: usize) -> usize {
    let capacity = capacity.max(1);
    let mut step = PROBE_STEP;
    while gcd(step, capacity) != 1 {
        step = step.saturating_add(1);
    }
    if step != PROBE_STEP {
        log::trace!("Stride {PROBE_STEP} shares a factor with capacity {capacity}, using {step}");
    }
    step.checked_rem(capacity).unwrap_or(0)
}

/// Linear probe sequence over a table.
///
/// Yields `start, start + step, start + 2 * step, ...` modulo the capacity, and stops after
/// `capacity` positions.
#[derive(Debug, Clone)]
pub(crate) struct Probe {
    /// Next slot to visit
    index: usize,
    /// Distance between two consecutive slots
    step: usize,
    /// Number of slots in the table
    capacity: usize,
    /// Positions left before the sequence is exhausted
    remaining: usize,
}

impl Probe {
    /// Starts a probe sequence at `start`
    pub(crate) fn new(start: usize, step: usize, capacity: usize) -> Self {
        Self { index: start, step, capacity, remaining: capacity }
    }
}

impl Iterator for Probe {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);

        let current = self.index;
        self.index = current.saturating_add(self.step).checked_rem(self.capacity).unwrap_or(0);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Probe {}
