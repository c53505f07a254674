//! Seeded FNV hash family.
//!
//! The same FNV-1 variant the table format is defined over: a 32-bit
//! accumulator, multiplied by the FNV prime and XORed with each key byte,
//! truncated modulo 2^32. Seed 0 starts the accumulator at the prime itself
//! so that every seed value (including 0) yields a usable hash; distinct
//! seeds give statistically independent mappings of the same key, which is
//! what the displacement search in `build` relies on.
//!
//! Fixed-width wrapping arithmetic is deliberate: tables built by any
//! conforming implementation hash identically, so a persisted `(G, V)` pair
//! can be queried anywhere.

/// FNV prime, also the seed-0 accumulator basis.
pub const FNV_PRIME: u32 = 0x0100_0193;

/// Hash `key` under the given seed. Seed 0 selects the primary (bucketing)
/// hash; seeds >= 1 are displacement hashes.
#[inline]
pub fn hash(seed: u32, key: &str) -> u32 {
    let mut acc = if seed == 0 { FNV_PRIME } else { seed };
    for &byte in key.as_bytes() {
        acc = acc.wrapping_mul(FNV_PRIME) ^ u32::from(byte);
    }
    acc
}
