//! addr_mph — minimal perfect hashing for sets of 64-bit addresses.
//!
//! - Build once on a set of **unique** `u64` keys.
//! - O(1) lookups: key -> unique slot in `[0..n)`, two hashes and one read.
//! - Buckets are placed largest first with a bounded salt search; a build
//!   either returns a verified table or an error, never a partial one.

mod build_hasher;
mod builder;
mod error;
mod hash;
mod keys;
mod partition;
mod schedule;
mod slots;
mod solver;
mod table;
mod verify;

pub use builder::{BuildConfig, BuildStats, Builder};
pub use error::{MphError, Violation};
pub use hash::{HashFamily, SplitMix, WyHash};
pub use keys::{check_unique, dedup_keys, keys_from_le_bytes};
pub use solver::SolveStats;
pub use table::{lookup_raw, SaltEntry, SaltTable, TableStats};
pub use verify::verify;
