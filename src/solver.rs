use log::{trace, warn};

use crate::error::MphError;
use crate::hash::HashFamily;
use crate::partition::Buckets;
use crate::slots::SlotBits;
use crate::table::SaltEntry;

/// Counters gathered while placing buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveStats {
    pub multi_key_buckets: usize,
    pub singleton_buckets: usize,
    pub empty_buckets: usize,
    /// Candidate salts tried across all multi-key buckets, up to and
    /// including the accepted one.
    pub salt_attempts: u64,
    pub max_salt: u64,
}

/// Salt search for one bucket at a time against the shared slot bitset.
///
/// Scratch buffers are sized once for the largest bucket. Internal collisions
/// are found with an epoch-stamped array over all slots, so no attempt
/// allocates or clears anything.
pub struct SaltSearch<'a, H> {
    hasher: &'a H,
    n: usize,
    max_attempts: u64,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    speculative_width: usize,
    seen_epoch: Vec<u32>,
    epoch: u32,
    trial: Vec<usize>,
}

impl<'a, H: HashFamily> SaltSearch<'a, H> {
    pub fn new(
        hasher: &'a H,
        n: usize,
        max_attempts: u64,
        speculative_width: usize,
        max_bucket_len: usize,
    ) -> Self {
        Self {
            hasher,
            n,
            max_attempts,
            speculative_width: speculative_width.max(1),
            seen_epoch: vec![0u32; n],
            epoch: 0,
            trial: Vec::with_capacity(max_bucket_len),
        }
    }

    /// Smallest salt in `1..=max_attempts` that sends every key in `keys` to a
    /// distinct free slot. On success the slots are left in [`Self::slots`].
    pub fn find(&mut self, keys: &[u64], used: &SlotBits) -> Option<u64> {
        #[cfg(feature = "parallel")]
        if self.speculative_width > 1 {
            let salt = self.find_speculative(keys, used)?;
            self.fill_trial(keys, salt);
            return Some(salt);
        }

        (1..=self.max_attempts).find(|&salt| self.try_salt(keys, salt, used))
    }

    /// Slots produced by the last successful [`Self::find`].
    #[inline]
    pub fn slots(&self) -> &[usize] {
        &self.trial
    }

    fn try_salt(&mut self, keys: &[u64], salt: u64, used: &SlotBits) -> bool {
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.seen_epoch.fill(0);
            self.epoch = 1;
        }
        self.trial.clear();
        for &key in keys {
            let slot = self.hasher.slot(key, salt, self.n);
            let mark = &mut self.seen_epoch[slot];
            if *mark == self.epoch {
                return false;
            }
            *mark = self.epoch;
            self.trial.push(slot);
        }
        used.all_free(&self.trial)
    }

    #[cfg(feature = "parallel")]
    fn fill_trial(&mut self, keys: &[u64], salt: u64) {
        self.trial.clear();
        let (hasher, n) = (self.hasher, self.n);
        self.trial.extend(keys.iter().map(|&k| hasher.slot(k, salt, n)));
    }

    /// Evaluates windows of consecutive salts on the rayon pool against the
    /// current bitset. `find_first` keeps the lowest winner, so the result is
    /// the same salt the sequential scan would pick.
    #[cfg(feature = "parallel")]
    fn find_speculative(&self, keys: &[u64], used: &SlotBits) -> Option<u64> {
        use rayon::prelude::*;

        let (hasher, n) = (self.hasher, self.n);
        let width = self.speculative_width as u64;
        let mut start = 1u64;
        while start <= self.max_attempts {
            let end = start.saturating_add(width - 1).min(self.max_attempts);
            let hit = (start..=end).into_par_iter().find_first(|&salt| {
                let mut slots: Vec<usize> = keys.iter().map(|&k| hasher.slot(k, salt, n)).collect();
                slots.sort_unstable();
                !slots.windows(2).any(|w| w[0] == w[1]) && used.all_free(&slots)
            });
            if hit.is_some() {
                return hit;
            }
            start = end + 1;
        }
        None
    }
}

/// Places every bucket in `order`, committing slots one bucket at a time.
///
/// Multi-key buckets get a displacement salt; singletons take the lowest free
/// slot. Buckets missing from `order` are empty and stay [`SaltEntry::Unset`].
pub fn place_buckets<H: HashFamily>(
    buckets: &Buckets,
    order: &[usize],
    hasher: &H,
    max_attempts: u64,
    speculative_width: usize,
) -> Result<(Vec<SaltEntry>, SolveStats), MphError> {
    let n = buckets.bucket_count();
    let mut entries = vec![SaltEntry::Unset; n];
    let mut used = SlotBits::new(n);
    let mut search = SaltSearch::new(hasher, n, max_attempts, speculative_width, buckets.max_len());
    let mut stats = SolveStats {
        empty_buckets: n - order.len(),
        ..SolveStats::default()
    };

    for &b in order {
        let keys = buckets.bucket(b);
        match keys.len() {
            0 => {}
            1 => {
                let slot = used.take_lowest_free().ok_or(MphError::SaltSearchExhausted {
                    bucket: b,
                    size: 1,
                    attempts: 0,
                })?;
                entries[b] = SaltEntry::Direct(slot);
                stats.singleton_buckets += 1;
            }
            size => {
                let Some(salt) = search.find(keys, &used) else {
                    warn!(
                        "bucket {b} with {size} keys exhausted {max_attempts} salts ({} of {n} slots used)",
                        used.used_count()
                    );
                    return Err(MphError::SaltSearchExhausted {
                        bucket: b,
                        size,
                        attempts: max_attempts,
                    });
                };
                for &slot in search.slots() {
                    used.mark_used(slot);
                }
                trace!("bucket {b}: {size} keys placed with salt {salt}");
                entries[b] = SaltEntry::Displacement(salt);
                stats.multi_key_buckets += 1;
                stats.salt_attempts += salt;
                stats.max_salt = stats.max_salt.max(salt);
            }
        }
    }

    debug_assert_eq!(used.used_count(), n);
    Ok((entries, stats))
}
