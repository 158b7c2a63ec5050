use thiserror::Error;

/// Why a table failed the bijection check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The key's home bucket has no entry.
    Miss,
    /// The slot is outside `[0, n)`.
    OutOfRange,
    /// Another key already maps to the same slot.
    Collision { other: u64 },
}

#[derive(Debug, Error)]
pub enum MphError {
    #[error("empty key set is not supported")]
    EmptyKeySet,
    #[error("duplicate key {0:#018x} detected during build")]
    DuplicateKey(u64),
    #[error("key buffer length {0} is not a multiple of 8")]
    TruncatedKeys(usize),
    #[error("bucket {bucket} ({size} keys) found no salt within {attempts} attempts")]
    SaltSearchExhausted {
        bucket: usize,
        size: usize,
        attempts: u64,
    },
    #[error("table is not a bijection: key {key:#018x} -> slot {slot}: {violation:?}")]
    NotBijective {
        key: u64,
        slot: usize,
        violation: Violation,
    },
    #[error("table covers {table} slots but {keys} keys were supplied")]
    KeyCountMismatch { table: usize, keys: usize },
    #[error("corrupt salt table entry {index}: {value}")]
    CorruptTable { index: usize, value: i64 },
    #[cfg(feature = "serde")]
    #[error("serialization error: {0}")]
    Serde(#[from] Box<bincode::ErrorKind>),
}
