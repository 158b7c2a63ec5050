//! Key set preparation: uniqueness checks and decoding of raw key dumps.

use std::hash::BuildHasherDefault;

use hashbrown::HashSet;

use crate::build_hasher::KeyHasher;
use crate::error::MphError;

type KeySet = HashSet<u64, BuildHasherDefault<KeyHasher>>;

/// Rejects empty input and reports the first repeated key.
pub fn check_unique(keys: &[u64]) -> Result<(), MphError> {
    if keys.is_empty() {
        return Err(MphError::EmptyKeySet);
    }
    let mut seen = KeySet::with_capacity_and_hasher(keys.len(), Default::default());
    for &k in keys {
        if !seen.insert(k) {
            return Err(MphError::DuplicateKey(k));
        }
    }
    Ok(())
}

/// Decodes a flat buffer of little-endian `u64` keys, such as a page address
/// dump. Duplicates are passed through untouched.
pub fn keys_from_le_bytes(bytes: &[u8]) -> Result<Vec<u64>, MphError> {
    if bytes.len() % 8 != 0 {
        return Err(MphError::TruncatedKeys(bytes.len()));
    }
    let mut out = Vec::with_capacity(bytes.len() / 8);
    for chunk in bytes.chunks_exact(8) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        out.push(u64::from_le_bytes(word));
    }
    Ok(out)
}

/// Drops repeated keys, keeping the first occurrence of each.
pub fn dedup_keys(keys: &[u64]) -> Vec<u64> {
    let mut seen = KeySet::with_capacity_and_hasher(keys.len(), Default::default());
    keys.iter().copied().filter(|&k| seen.insert(k)).collect()
}
