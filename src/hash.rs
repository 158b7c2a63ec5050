//! Seeded 64-bit hash families.
//!
//! Salt `0` is the primary hash that picks a key's home bucket; every salt
//! `d >= 1` is an independent hash used for displacement.

/// A deterministic, seed-parameterized hash over 64-bit keys.
///
/// Implementations must be pure: the same `(key, salt)` pair always yields the
/// same value, and distinct salts should behave as uncorrelated functions.
pub trait HashFamily: Clone + Default + Send + Sync {
    fn hash(&self, key: u64, salt: u64) -> u64;

    /// Home bucket of `key` in a table of `n` buckets.
    #[inline]
    fn primary(&self, key: u64, n: usize) -> usize {
        reduce(self.hash(key, 0), n)
    }

    /// Slot of `key` under displacement salt `salt`.
    #[inline]
    fn slot(&self, key: u64, salt: u64, n: usize) -> usize {
        reduce(self.hash(key, salt), n)
    }
}

/// wyhash over the little-endian encoding of the key.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WyHash;

impl HashFamily for WyHash {
    #[inline]
    fn hash(&self, key: u64, salt: u64) -> u64 {
        wyhash::wyhash(&key.to_le_bytes(), salt)
    }
}

/// splitmix64 finalizer keyed by a mixed salt. Cheaper than [`WyHash`], useful
/// as a second family when a build with the first one is exhausted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix;

impl HashFamily for SplitMix {
    #[inline]
    fn hash(&self, key: u64, salt: u64) -> u64 {
        let seed = mix64(salt ^ 0xD6E8_FD9B_D6E8_FD9B);
        mix64(key ^ seed)
    }
}

#[inline]
pub(crate) fn reduce(hash: u64, n: usize) -> usize {
    (hash % n as u64) as usize
}

#[inline]
pub(crate) fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}
