use std::time::{Duration, Instant};

use log::debug;

use crate::error::MphError;
use crate::hash::{HashFamily, WyHash};
use crate::keys::check_unique;
use crate::partition::Buckets;
use crate::schedule::bucket_order;
use crate::solver::{place_buckets, SolveStats};
use crate::table::SaltTable;
use crate::verify::verify;

/// Build parameters.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Salts tried per multi-key bucket before the build fails.
    pub max_salt_attempts: u64,
    /// Consecutive salts evaluated together by the `parallel` search.
    /// `1` forces the sequential scan. Ignored without the feature.
    pub speculative_width: usize,
    /// Worker threads for the `parallel` search; `None` reads
    /// `ADDR_MPH_BUILD_THREADS` or falls back to the machine's parallelism.
    pub threads: Option<usize>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            max_salt_attempts: 4096,
            speculative_width: 64,
            threads: None,
        }
    }
}

/// What a build cost.
#[derive(Debug, Clone)]
pub struct BuildStats {
    pub keys: usize,
    pub max_bucket_len: usize,
    pub solve: SolveStats,
    pub elapsed: Duration,
}

pub struct Builder<H = WyHash> {
    cfg: BuildConfig,
    hasher: H,
}

impl Builder<WyHash> {
    pub fn new() -> Self {
        Self {
            cfg: BuildConfig::default(),
            hasher: WyHash,
        }
    }
}

impl Default for Builder<WyHash> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HashFamily> Builder<H> {
    pub fn with_config(mut self, cfg: BuildConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn with_max_salt_attempts(mut self, attempts: u64) -> Self {
        self.cfg.max_salt_attempts = attempts;
        self
    }

    pub fn with_speculative_width(mut self, width: usize) -> Self {
        self.cfg.speculative_width = width;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.cfg.threads = Some(threads);
        self
    }

    /// Swaps the hash family. The resulting table must be looked up with it.
    pub fn with_hasher<G: HashFamily>(self, hasher: G) -> Builder<G> {
        Builder {
            cfg: self.cfg,
            hasher,
        }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.cfg
    }

    /// Build the table. Requires **unique** keys, checked up front.
    pub fn build(&self, keys: &[u64]) -> Result<SaltTable<H>, MphError> {
        self.build_with_stats(keys).map(|(table, _)| table)
    }

    /// Like [`Self::build`], also reporting what the build cost.
    ///
    /// The table is verified before it is returned; nothing partial escapes.
    pub fn build_with_stats(&self, keys: &[u64]) -> Result<(SaltTable<H>, BuildStats), MphError> {
        let start = Instant::now();
        check_unique(keys)?;

        let (table, solve, max_bucket_len) = self.run_in_pool(|| self.build_once(keys))?;
        verify(&table, keys)?;

        let stats = BuildStats {
            keys: keys.len(),
            max_bucket_len,
            solve,
            elapsed: start.elapsed(),
        };
        debug!(
            "built table for {} keys in {:?}: {} displaced, {} direct, max salt {}",
            stats.keys,
            stats.elapsed,
            stats.solve.multi_key_buckets,
            stats.solve.singleton_buckets,
            stats.solve.max_salt
        );
        Ok((table, stats))
    }

    fn build_once(&self, keys: &[u64]) -> Result<(SaltTable<H>, SolveStats, usize), MphError> {
        let buckets = Buckets::partition(keys, &self.hasher);
        let order = bucket_order(&buckets.sizes());
        let max_bucket_len = buckets.max_len();
        debug!(
            "partitioned {} keys: {} non-empty buckets, largest holds {}",
            keys.len(),
            order.len(),
            max_bucket_len
        );

        let (entries, solve) = place_buckets(
            &buckets,
            &order,
            &self.hasher,
            self.cfg.max_salt_attempts,
            self.cfg.speculative_width,
        )?;
        Ok((
            SaltTable::from_entries(entries, self.hasher.clone()),
            solve,
            max_bucket_len,
        ))
    }

    #[cfg(feature = "parallel")]
    fn run_in_pool<T, F>(&self, f: F) -> Result<T, MphError>
    where
        F: FnOnce() -> Result<T, MphError> + Send,
        T: Send,
    {
        if self.cfg.speculative_width <= 1 {
            return f();
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.cfg.threads.unwrap_or_else(detect_build_threads))
            .build();
        match pool {
            Ok(pool) => pool.install(f),
            Err(_) => f(),
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn run_in_pool<T, F>(&self, f: F) -> Result<T, MphError>
    where
        F: FnOnce() -> Result<T, MphError>,
    {
        f()
    }
}

#[cfg(feature = "parallel")]
fn detect_build_threads() -> usize {
    if let Some(v) = std::env::var_os("ADDR_MPH_BUILD_THREADS") {
        if let Ok(parsed) = v.to_string_lossy().parse::<usize>() {
            return parsed.max(1);
        }
    }
    std::thread::available_parallelism()
        .map(|t| t.get().clamp(2, 8))
        .unwrap_or(4)
}
