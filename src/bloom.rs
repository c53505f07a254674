//! Space-efficient probabilistic membership filter.
//!
//! Independent of the perfect hash table: the table answers "what value",
//! the filter answers "was this key ever added" with a tunable false
//! positive rate and zero false negatives. Gating [`PhfTable::get`]
//! lookups behind [`BloomFilter::contains`] is how callers reject keys that
//! were not part of the build set.
//!
//! Sizing follows the standard formulas: for capacity `c` and target error
//! rate `e`, the bit count is `-(c * ln e) / ln(2)^2` and the probe count
//! `(bits / c) * ln 2`, both truncated. Probes use enhanced double hashing
//! (`g_i(x) = h1(x) + i*h2(x) + i^3`) over two members of the crate's
//! seeded FNV family, which costs two hash evaluations per key instead
//! of k.
//!
//! [`PhfTable::get`]: crate::PhfTable::get

use crate::fnv;

/// A fixed-size bloom filter over string keys.
///
/// ```rust
/// use perfect_kv::BloomFilter;
///
/// let mut filter = BloomFilter::new(1000, 0.01);
/// filter.add("present");
/// assert!(filter.contains("present"));
/// // Absent keys are *almost always* rejected; never the other way around.
/// ```
#[derive(Debug, Clone)]
pub struct BloomFilter {
    bits: Vec<u64>,
    num_bits: u64,
    num_hashes: u32,
    capacity: usize,
    error_rate: f64,
}

impl BloomFilter {
    /// Create a filter sized for `capacity` elements at the given target
    /// false positive rate.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or `error_rate` is outside `(0, 1)`.
    pub fn new(capacity: usize, error_rate: f64) -> Self {
        assert!(capacity > 0, "bloom filter capacity must be non-zero");
        assert!(
            error_rate > 0.0 && error_rate < 1.0,
            "error rate must be in (0, 1)"
        );

        let ln2 = std::f64::consts::LN_2;
        let num_bits = ((-(capacity as f64) * error_rate.ln()) / (ln2 * ln2)).max(1.0) as u64;
        let num_hashes = (((num_bits as f64) / (capacity as f64)) * ln2).max(1.0) as u32;

        let words = num_bits.div_ceil(64) as usize;
        Self {
            bits: vec![0u64; words],
            num_bits,
            num_hashes,
            capacity,
            error_rate,
        }
    }

    /// Add a key to the filter.
    pub fn add(&mut self, key: &str) {
        let (h1, h2) = Self::hash_pair(key);
        for i in 0..u64::from(self.num_hashes) {
            let bit = self.probe(h1, h2, i);
            self.bits[(bit / 64) as usize] |= 1 << (bit % 64);
        }
    }

    /// Test membership: `false` means the key was definitely never added;
    /// `true` means it probably was (false positives at roughly the
    /// configured rate).
    pub fn contains(&self, key: &str) -> bool {
        let (h1, h2) = Self::hash_pair(key);
        (0..u64::from(self.num_hashes)).all(|i| {
            let bit = self.probe(h1, h2, i);
            self.bits[(bit / 64) as usize] & (1 << (bit % 64)) != 0
        })
    }

    #[inline]
    fn hash_pair(key: &str) -> (u64, u64) {
        let h1 = u64::from(fnv::hash(0, key));
        // Forcing h2 odd keeps it coprime with power-of-two strides.
        let h2 = u64::from(fnv::hash(1, key)) | 1;
        (h1, h2)
    }

    #[inline]
    fn probe(&self, h1: u64, h2: u64, i: u64) -> u64 {
        h1.wrapping_add(i.wrapping_mul(h2))
            .wrapping_add(i.wrapping_mul(i).wrapping_mul(i))
            % self.num_bits
    }

    /// Number of elements the filter was sized for.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Target false positive rate the filter was sized for.
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Width of the bit array.
    pub fn num_bits(&self) -> u64 {
        self.num_bits
    }

    /// Probes per key.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }
}
