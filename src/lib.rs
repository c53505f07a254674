//! # perfect-kv
//!
//! An immutable **string key-value store** backed by a minimal perfect hash
//! table.
//!
//! ## Features
//!
//! - **Minimal perfect hashing** - N keys, N slots, zero collisions, zero
//!   wasted slots
//! - **O(1) lookups** - exactly two FNV evaluations per query, no probing
//! - **Immutable** - built once from a complete key set, read many times
//! - **Serializable** - the `(G, V)` pair persists verbatim, as JSON
//!   (`{"G": [...], "V": [...]}`) or a checksummed binary file; loading
//!   never rebuilds
//! - **Bounded construction** - the displacement search fails with a typed
//!   error instead of hanging on pathological key sets
//! - **Bloom filter** - an independent membership filter for rejecting
//!   out-of-set keys before they reach the table
//!
//! ## Lookups for keys outside the build set
//!
//! The table stores values only, not keys. Querying a key that was never
//! part of the build mapping returns *some* resident value deterministically
//! rather than an error. When that matters, gate lookups behind a
//! [`BloomFilter`]:
//!
//! ```rust
//! use perfect_kv::{BloomFilter, PhfTable};
//! use std::collections::HashMap;
//!
//! let mut data = HashMap::new();
//! data.insert("cat".to_string(), "1".to_string());
//! data.insert("dog".to_string(), "2".to_string());
//! data.insert("emu".to_string(), "3".to_string());
//!
//! let mut filter = BloomFilter::new(data.len(), 0.0001);
//! for key in data.keys() {
//!     filter.add(key);
//! }
//! let table = PhfTable::from_map(data)?;
//!
//! assert_eq!(table.get("dog")?, "2");
//! if filter.contains("ferret") {
//!     let _ = table.get("ferret"); // probably never reached
//! }
//! # Ok::<(), perfect_kv::PhfError>(())
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use perfect_kv::PhfBuilder;
//!
//! let table = PhfBuilder::new()
//!     .insert("key1".to_string(), "value1".to_string())
//!     .insert("key2".to_string(), "value2".to_string())
//!     .build()?;
//!
//! assert_eq!(table.get("key1")?, "value1");
//!
//! // Persist and reload
//! table.save_to_file("/tmp/perfect_kv_doc.bin")?;
//! let loaded: perfect_kv::PhfTable<String> =
//!     perfect_kv::PhfTable::load_from_file("/tmp/perfect_kv_doc.bin")?;
//! assert_eq!(loaded.get("key2")?, "value2");
//! # std::fs::remove_file("/tmp/perfect_kv_doc.bin").ok();
//! # Ok::<(), perfect_kv::PhfError>(())
//! ```

pub mod bloom;
pub mod error;
pub mod fnv;
pub mod table;

mod build;

// Persistence is an internal implementation detail; tables expose it via
// save_to_file / load_from_file.
mod persistence;

pub use bloom::BloomFilter;
pub use build::BuildStats;
pub use error::PhfError;
pub use table::{PhfBuilder, PhfTable};
