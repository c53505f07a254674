use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhfError {
    #[error("Duplicate key in build input: {key}")]
    DuplicateKey { key: String },

    #[error("Empty key set provided")]
    EmptyKeySet,

    #[error("Key set too large for 32-bit displacement table: {count} keys")]
    TooManyKeys { count: usize },

    #[error(
        "Displacement search exhausted after {limit} seeds for a bucket of {bucket_size} keys (first key: {first_key})"
    )]
    SeedSearchExhausted {
        bucket_size: usize,
        limit: u32,
        first_key: String,
    },

    #[error("Malformed table: G has {g_len} entries but V has {v_len}")]
    MalformedTable { g_len: usize, v_len: usize },

    #[error("Corrupt table: lookup derived slot {slot} but the table has {len} slots")]
    SlotOutOfRange { slot: usize, len: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
