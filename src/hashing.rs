//! Polynomial string hashing and the double-hashing probe sequence.

/// Base of the first hash family, which picks the starting slot.
const HASH_PRIME_A: usize = 151;
/// Base of the second hash family, which picks the probe step.
const HASH_PRIME_B: usize = 163;

/// Hashes `key` as a base-`a` polynomial over its bytes, modulo `m`.
///
/// For a key of length `L` this is `Σ a^(L-1-i) · byte[i] mod m`, computed with
/// Horner's rule and reduced at every step. A modulus of zero yields zero.
#[must_use]
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub fn hash(key: &str, a: usize, m: usize) -> usize {
    if m == 0 {
        return 0;
    }
    let a = a as u128;
    let m = m as u128;

    let hash = key.bytes().fold(0_u128, |acc, byte| (acc * a + u128::from(byte)) % m);
    // `hash < m`, so it fits back into `usize`.
    hash as usize
}

/// Starting slot and step size of the probe sequence for `key`.
///
/// The step is reduced modulo `num_buckets - 1` and then incremented, so it lies in
/// `[1, num_buckets - 1]` and is never a multiple of the bucket count.
#[allow(clippy::arithmetic_side_effects)]
fn probe_parameters(key: &str, num_buckets: usize) -> (usize, usize) {
    let start = hash(key, HASH_PRIME_A, num_buckets);
    let step = hash(key, HASH_PRIME_B, num_buckets.saturating_sub(1)) + 1;
    (start, step)
}

/// Returns the slot inspected on the `attempt`-th probe for `key`.
///
/// Computes `(hash_a + attempt * (hash_b + 1)) mod num_buckets`. When `num_buckets`
/// is prime, attempts `0..num_buckets` visit every slot exactly once.
#[must_use]
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub fn double_hash(key: &str, num_buckets: usize, attempt: usize) -> usize {
    if num_buckets == 0 {
        return 0;
    }
    let (start, step) = probe_parameters(key, num_buckets);
    let index = (start as u128 + attempt as u128 * step as u128) % num_buckets as u128;
    index as usize
}

/// Iterator over the first `num_buckets` slots of a key's probe sequence.
///
/// Yields the same indices as [`double_hash`] for attempts `0, 1, 2, ...` but hashes
/// the key only once.
#[derive(Debug, Clone)]
pub(crate) struct ProbeSequence {
    /// Slot returned by the next call to `next`
    index: usize,
    /// Distance between consecutive slots
    step: usize,
    /// Number of buckets the indices wrap around
    num_buckets: usize,
    /// Attempts left before the sequence ends
    remaining: usize,
}

impl ProbeSequence {
    /// Starts the probe sequence for `key` over `num_buckets` slots.
    pub(crate) fn new(key: &str, num_buckets: usize) -> Self {
        let (index, step) = probe_parameters(key, num_buckets);
        Self { index, step, num_buckets, remaining: num_buckets }
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    #[allow(clippy::arithmetic_side_effects)]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let current = self.index;
        // Both operands are below `num_buckets`, which is non-zero here.
        self.index = (current + self.step) % self.num_buckets;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}
