//! Minimal perfect hash construction.
//!
//! The classic two-phase displacement scheme: partition keys into buckets by
//! their seed-0 hash, place multi-key buckets largest-first by searching for
//! a displacement seed that lands every key in a free slot, then drop the
//! remaining singletons straight into the leftover slots with a negative
//! sentinel. The result is a dense table: N keys, N slots, none wasted.

use std::collections::HashSet;

use crate::error::PhfError;
use crate::fnv;
use crate::table::PhfTable;

/// A bucket may try at most `SEED_LIMIT_FACTOR * n` displacement seeds
/// before construction fails. The naive search is unbounded and can hang on
/// adversarial key sets; in practice random keys settle within a handful of
/// seeds per bucket.
const SEED_LIMIT_FACTOR: u64 = 64;

/// Floor for the seed bound so tiny tables still get a real search.
const MIN_SEED_LIMIT: u64 = 1024;

/// Progress callbacks fire once per this many buckets placed.
const PROGRESS_INTERVAL: usize = 1000;

/// Counters gathered during construction, mostly useful for tuning and for
/// spotting pathological key sets before they hit the seed bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Number of keys (and slots) in the finished table.
    pub keys: usize,
    /// Buckets that needed a displacement seed (size >= 2).
    pub multi_key_buckets: usize,
    /// Buckets placed directly via the sentinel encoding (size 1).
    pub singleton_buckets: usize,
    /// Size of the largest bucket.
    pub max_bucket_size: usize,
    /// Largest displacement seed any bucket settled on.
    pub max_seed: u32,
    /// Total displacement seeds rejected across all buckets.
    pub rejected_seeds: u64,
}

pub(crate) type Progress<'a> = dyn FnMut(usize, usize) + 'a;

/// Build a `(G, V)` pair from `entries`.
///
/// `progress`, when present, is invoked with `(buckets_placed, total)` every
/// [`PROGRESS_INTERVAL`] buckets across both placement phases.
pub(crate) fn construct<V>(
    entries: Vec<(String, V)>,
    mut progress: Option<&mut Progress<'_>>,
) -> Result<(PhfTable<V>, BuildStats), PhfError> {
    let n = entries.len();
    if n == 0 {
        return Err(PhfError::EmptyKeySet);
    }
    // G entries are i32; both displacement seeds and -(slot + 1) sentinels
    // must fit.
    if n > i32::MAX as usize {
        return Err(PhfError::TooManyKeys { count: n });
    }

    // Duplicates would overwrite a slot and leave another unset, silently
    // breaking the one-slot-per-key invariant. Reject up front.
    let mut seen: HashSet<&str> = HashSet::with_capacity(n);
    for (key, _) in &entries {
        if !seen.insert(key.as_str()) {
            return Err(PhfError::DuplicateKey { key: key.clone() });
        }
    }
    drop(seen);

    // Phase 0: partition into buckets by the primary hash. Buckets hold
    // indices into `keys`/`vals`.
    let (keys, vals): (Vec<String>, Vec<V>) = entries.into_iter().unzip();
    let mut vals: Vec<Option<V>> = vals.into_iter().map(Some).collect();

    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, key) in keys.iter().enumerate() {
        buckets[fnv::hash(0, key) as usize % n].push(i);
    }

    // Largest first, so big buckets search while most slots are still free.
    // The sort is stable, so equal-size buckets keep ascending primary-hash
    // order; that tie-break is what makes rebuilds byte-identical.
    buckets.sort_by_key(|b| std::cmp::Reverse(b.len()));

    let seed_limit = (n as u64 * SEED_LIMIT_FACTOR)
        .max(MIN_SEED_LIMIT)
        .min(i32::MAX as u64) as u32;

    let mut g = vec![0i32; n];
    // Arena owned by the builder for the duration of the build; becomes the
    // dense value array once every slot is claimed.
    let mut slots: Vec<Option<V>> = (0..n).map(|_| None).collect();

    let mut stats = BuildStats {
        keys: n,
        max_bucket_size: buckets.first().map_or(0, Vec::len),
        ..BuildStats::default()
    };

    let mut report = |placed: usize| {
        if let Some(cb) = progress.as_mut() {
            if placed % PROGRESS_INTERVAL == 0 {
                cb(placed, n);
            }
        }
    };

    // Phase 1: displacement search for every bucket with two or more keys.
    let mut b = 0;
    while b < n && buckets[b].len() >= 2 {
        let bucket = &buckets[b];
        let mut trial: Vec<usize> = Vec::with_capacity(bucket.len());
        let mut found = None;

        'seeds: for d in 1..=seed_limit {
            trial.clear();
            for &e in bucket {
                let slot = fnv::hash(d, &keys[e]) as usize % n;
                if slots[slot].is_some() || trial.contains(&slot) {
                    stats.rejected_seeds += 1;
                    continue 'seeds;
                }
                trial.push(slot);
            }
            found = Some(d);
            break;
        }

        let d = found.ok_or_else(|| PhfError::SeedSearchExhausted {
            bucket_size: bucket.len(),
            limit: seed_limit,
            first_key: keys[bucket[0]].clone(),
        })?;

        // Every key in the bucket shares the same primary hash, so any of
        // them addresses the same G entry.
        g[fnv::hash(0, &keys[bucket[0]]) as usize % n] = d as i32;
        for (&e, &slot) in bucket.iter().zip(&trial) {
            slots[slot] = vals[e].take();
        }

        stats.multi_key_buckets += 1;
        stats.max_seed = stats.max_seed.max(d);
        b += 1;
        report(b);
    }

    // Phase 2: singletons go straight into the leftover free slots.
    // Descending size order means everything from here on has size 1 until
    // the size-0 tail begins.
    let mut free: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.is_none().then_some(i))
        .collect();

    while b < n && !buckets[b].is_empty() {
        let e = buckets[b][0];
        let slot = free
            .pop()
            .expect("one free slot remains per unplaced singleton");
        // Minus one keeps the sentinel negative even for slot 0.
        g[fnv::hash(0, &keys[e]) as usize % n] = -((slot + 1) as i32);
        slots[slot] = vals[e].take();

        stats.singleton_buckets += 1;
        b += 1;
        report(b);
    }

    debug_assert!(
        slots.iter().all(Option::is_some),
        "minimal perfect table: every slot must be written exactly once"
    );
    let values: Vec<V> = slots
        .into_iter()
        .map(|s| s.expect("every slot is filled after both placement phases"))
        .collect();

    Ok((PhfTable::from_raw(g, values), stats))
}
