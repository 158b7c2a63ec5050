use addr_mph::{dedup_keys, keys_from_le_bytes, Builder, SplitMix};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::env;
use std::time::Instant;

const N_KEYS: usize = 1_000_000;
const GEN_SEED: u64 = 42;
const PAGE_SHIFT: u32 = 14;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let keys = match env::args().nth(1) {
        Some(path) => load_keys(&path)?,
        None => gen_page_addrs(N_KEYS, GEN_SEED),
    };

    println!("addr_mph build");
    println!("n = {} keys", keys.len());
    println!("{}", "=".repeat(60));

    let t0 = Instant::now();
    let (table, stats) = Builder::new().build_with_stats(&keys)?;
    let build = t0.elapsed();
    println!(
        "build:  {:>10.3} ms  ({:.1} ns/key, {} multi-key buckets, {} salt attempts)",
        build.as_secs_f64() * 1e3,
        build.as_nanos() as f64 / keys.len() as f64,
        stats.solve.multi_key_buckets,
        stats.solve.salt_attempts
    );

    let t0 = Instant::now();
    let mut acc = 0usize;
    for &k in &keys {
        acc ^= table.lookup(k).unwrap_or(usize::MAX);
    }
    let lookups = t0.elapsed();
    println!(
        "lookup: {:>10.3} ms  ({:.1} ns/key, checksum {acc:#x})",
        lookups.as_secs_f64() * 1e3,
        lookups.as_nanos() as f64 / keys.len() as f64
    );

    match Builder::new().with_hasher(SplitMix).build(&keys) {
        Ok(alt) => println!("splitmix family: max salt {}", alt.stats().max_salt),
        Err(e) => println!("splitmix family failed: {e}"),
    }

    println!("{}", table.stats());
    Ok(())
}

fn load_keys(path: &str) -> Result<Vec<u64>, Box<dyn std::error::Error>> {
    let t0 = Instant::now();
    let bytes = std::fs::read(path)?;
    let raw = keys_from_le_bytes(&bytes)?;
    let keys = dedup_keys(&raw);
    let ns = t0.elapsed().as_nanos().max(1) as f64;
    println!(
        "loaded {} keys ({} unique) from {path}: {:.3} bytes / nanosecond",
        raw.len(),
        keys.len(),
        bytes.len() as f64 / ns
    );
    Ok(keys)
}

fn gen_page_addrs(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(n * 2);
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let page = rng.gen_range(0x1_0000u64..0x1_0000_0000u64) << PAGE_SHIFT;
        if seen.insert(page) {
            out.push(page);
        }
    }
    out
}
