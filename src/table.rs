//! The finished `(G, V)` pair and its pure O(1) lookup.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::build::{construct, BuildStats, Progress};
use crate::error::PhfError;
use crate::fnv;

/// An immutable minimal perfect hash table over string keys.
///
/// Built once from a complete key-to-value mapping; thereafter every original
/// key is found with exactly two FNV evaluations, no collisions, and no
/// unused slot (`len(G) == len(V) == N`). The table is read-only and may be
/// shared freely across threads.
///
/// # Keys outside the build set
///
/// The table stores no keys, so [`get`](PhfTable::get) **cannot tell whether
/// a queried key was part of the original mapping**. An out-of-set key
/// returns *some* value deterministically, not an error — this differs from
/// ordinary "not found" map semantics. Callers that must reject such keys
/// need to establish membership upstream, e.g. with a
/// [`BloomFilter`](crate::BloomFilter).
///
/// # Example
///
/// ```rust
/// use perfect_kv::PhfTable;
///
/// let table = PhfTable::from_entries(vec![
///     ("cat".to_string(), "1".to_string()),
///     ("dog".to_string(), "2".to_string()),
///     ("emu".to_string(), "3".to_string()),
/// ])?;
///
/// assert_eq!(table.len(), 3);
/// assert_eq!(table.get("dog")?, "2");
/// # Ok::<(), perfect_kv::PhfError>(())
/// ```
#[derive(Clone, Debug, Serialize)]
pub struct PhfTable<V> {
    /// Displacement table: a positive entry is a seed for the second hash,
    /// a negative entry `-(slot + 1)` points straight at a slot.
    #[serde(rename = "G")]
    g: Vec<i32>,
    #[serde(rename = "V")]
    values: Vec<V>,
}

/// Raw serialized shape: `{"G": [...], "V": [...]}`. Converted through
/// [`PhfTable::from_parts`] so a persisted record with mismatched array
/// lengths is rejected at deserialization time.
#[derive(Deserialize)]
struct TableParts<V> {
    #[serde(rename = "G")]
    g: Vec<i32>,
    #[serde(rename = "V")]
    values: Vec<V>,
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for PhfTable<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let parts = TableParts::deserialize(deserializer)?;
        PhfTable::from_parts(parts.g, parts.values).map_err(serde::de::Error::custom)
    }
}

impl<V> PhfTable<V> {
    /// Build from a map. A `HashMap` cannot hold duplicate keys, so this
    /// only fails on an empty input or on displacement-search exhaustion.
    pub fn from_map(data: HashMap<String, V>) -> Result<Self, PhfError> {
        let (table, _) = construct(data.into_iter().collect(), None)?;
        Ok(table)
    }

    /// Build from key-value pairs. Duplicate keys are rejected with
    /// [`PhfError::DuplicateKey`] rather than silently overwritten.
    pub fn from_entries<I>(entries: I) -> Result<Self, PhfError>
    where
        I: IntoIterator<Item = (String, V)>,
    {
        let (table, _) = construct(entries.into_iter().collect(), None)?;
        Ok(table)
    }

    /// Reassemble a table from persisted arrays, validating the length
    /// invariant.
    pub fn from_parts(g: Vec<i32>, values: Vec<V>) -> Result<Self, PhfError> {
        if g.len() != values.len() || g.is_empty() {
            return Err(PhfError::MalformedTable {
                g_len: g.len(),
                v_len: values.len(),
            });
        }
        Ok(Self { g, values })
    }

    /// Invariants already established by the builder.
    pub(crate) fn from_raw(g: Vec<i32>, values: Vec<V>) -> Self {
        debug_assert_eq!(g.len(), values.len());
        Self { g, values }
    }

    /// Look up the value for `key`: two hash evaluations, no probing.
    ///
    /// For any key in the build set this returns the associated value and
    /// cannot fail on a well-formed table. For a key outside the build set
    /// it returns an arbitrary (but deterministic) resident value — see the
    /// type-level docs. An `Err` is only possible on a corrupt table whose
    /// sentinel points past the value array.
    #[inline]
    pub fn get(&self, key: &str) -> Result<&V, PhfError> {
        let n = self.values.len();
        let d = self.g[fnv::hash(0, key) as usize % n];
        let slot = if d < 0 {
            (-(i64::from(d)) - 1) as usize
        } else {
            fnv::hash(d as u32, key) as usize % n
        };
        self.values
            .get(slot)
            .ok_or(PhfError::SlotOutOfRange { slot, len: n })
    }

    /// Number of key-value pairs (equal to the number of slots).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The displacement table.
    pub fn g(&self) -> &[i32] {
        &self.g
    }

    /// The value table, in slot order.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    /// Consume the table into its `(G, V)` arrays.
    pub fn into_parts(self) -> (Vec<i32>, Vec<V>) {
        (self.g, self.values)
    }

    /// Approximate heap footprint of the two arrays. Heap data owned by the
    /// values themselves (e.g. `String` contents) is not counted.
    pub fn memory_usage_bytes(&self) -> usize {
        std::mem::size_of::<Self>()
            + self.g.capacity() * std::mem::size_of::<i32>()
            + self.values.capacity() * std::mem::size_of::<V>()
    }
}

impl<V: Serialize> PhfTable<V> {
    /// Serialize as the `{"G": [...], "V": [...]}` JSON object.
    pub fn to_json(&self) -> Result<String, PhfError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Write the JSON form to an arbitrary sink.
    pub fn to_json_writer<W: io::Write>(&self, writer: W) -> Result<(), PhfError> {
        Ok(serde_json::to_writer(writer, self)?)
    }
}

impl<V: for<'de> Deserialize<'de>> PhfTable<V> {
    /// Parse a table from its JSON form, rejecting records where the two
    /// arrays disagree in length.
    pub fn from_json(json: &str) -> Result<Self, PhfError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<V> PhfTable<V>
where
    V: Serialize + for<'de> Deserialize<'de>,
{
    /// Save the table to a versioned, checksummed file, written atomically.
    ///
    /// Unlike formats that must re-derive their hash function on load, the
    /// displacement table is persisted verbatim: loading is pure
    /// deserialization plus validation, never a rebuild.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), PhfError> {
        crate::persistence::write_table(path, self)
    }

    /// Load a table previously written by
    /// [`save_to_file`](PhfTable::save_to_file), validating magic, format
    /// version, checksum, and the `len(G) == len(V)` invariant.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, PhfError> {
        crate::persistence::read_table(path)
    }
}

/// Incremental builder for [`PhfTable`], in the spirit of a collection
/// builder: accumulate entries, then `build()`.
///
/// ```rust
/// use perfect_kv::PhfBuilder;
///
/// let table = PhfBuilder::new()
///     .insert("hello".to_string(), "world".to_string())
///     .insert("foo".to_string(), "bar".to_string())
///     .build()?;
/// assert_eq!(table.get("hello")?, "world");
/// # Ok::<(), perfect_kv::PhfError>(())
/// ```
pub struct PhfBuilder<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for PhfBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> PhfBuilder<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn insert(mut self, key: String, value: V) -> Self {
        self.entries.push((key, value));
        self
    }

    pub fn extend<I>(mut self, iter: I) -> Self
    where
        I: IntoIterator<Item = (String, V)>,
    {
        self.entries.extend(iter);
        self
    }

    pub fn with_entries<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (String, V)>,
    {
        Self {
            entries: iter.into_iter().collect(),
        }
    }

    pub fn build(self) -> Result<PhfTable<V>, PhfError> {
        let (table, _) = construct(self.entries, None)?;
        Ok(table)
    }

    /// Build and also report construction statistics.
    pub fn build_with_stats(self) -> Result<(PhfTable<V>, BuildStats), PhfError> {
        construct(self.entries, None)
    }

    /// Build, invoking `progress` with `(buckets_placed, total_buckets)`
    /// every thousand buckets. Useful for reporting on long builds without
    /// wiring a logger into the construction path.
    pub fn build_with_progress<F>(
        self,
        mut progress: F,
    ) -> Result<(PhfTable<V>, BuildStats), PhfError>
    where
        F: FnMut(usize, usize),
    {
        let cb: &mut Progress<'_> = &mut progress;
        construct(self.entries, Some(cb))
    }
}
