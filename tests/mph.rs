use addr_mph::{
    keys_from_le_bytes, lookup_raw, verify, Builder, HashFamily, MphError, SaltEntry, SaltTable,
    SplitMix, WyHash,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

fn random_keys(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut seen = HashSet::with_capacity(n);
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let k: u64 = rng.gen();
        if seen.insert(k) {
            out.push(k);
        }
    }
    out
}

fn page_addrs(n: usize) -> Vec<u64> {
    (0..n as u64).map(|i| 0x0001_0000_0000 + i * 0x4000).collect()
}

fn assert_bijection<H: HashFamily>(table: &SaltTable<H>, keys: &[u64]) {
    let mut slots: Vec<usize> = keys.iter().map(|&k| table.lookup(k).unwrap()).collect();
    slots.sort_unstable();
    assert!(slots.iter().copied().eq(0..keys.len()));
}

/// `hash(k, 0) = k`, `hash(k, d) = k + d * (k / 2)`.
#[derive(Debug, Clone, Default)]
struct Halving;

impl HashFamily for Halving {
    fn hash(&self, key: u64, salt: u64) -> u64 {
        key.wrapping_add(salt.wrapping_mul(key / 2))
    }
}

#[derive(Debug, Clone, Default)]
struct Identity;

impl HashFamily for Identity {
    fn hash(&self, key: u64, salt: u64) -> u64 {
        key.wrapping_add(salt)
    }
}

/// Every key, every salt, slot 0.
#[derive(Debug, Clone, Default)]
struct Colliding;

impl HashFamily for Colliding {
    fn hash(&self, _key: u64, _salt: u64) -> u64 {
        0
    }
}

#[test]
fn random_keys_form_bijection() {
    for (n, seed) in [(1, 1), (2, 2), (3, 3), (17, 4), (1000, 5), (50_000, 6)] {
        let keys = random_keys(n, seed);
        let table = Builder::new().build(&keys).unwrap();
        assert_eq!(table.len(), n);
        assert_bijection(&table, &keys);
    }
}

#[test]
fn page_addresses_form_bijection() {
    let keys = page_addrs(20_000);
    let table = Builder::new().build(&keys).unwrap();
    assert_bijection(&table, &keys);

    let table = Builder::new().with_hasher(SplitMix).build(&keys).unwrap();
    assert_bijection(&table, &keys);
}

#[test]
fn rebuild_is_identical() {
    let keys = random_keys(10_000, 42);
    let a = Builder::new().build(&keys).unwrap();
    let b = Builder::new().build(&keys).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.to_raw(), b.to_raw());
}

#[test]
fn sequential_and_speculative_agree() {
    let keys = random_keys(10_000, 7);
    let seq = Builder::new().with_speculative_width(1).build(&keys).unwrap();
    let speculative = Builder::new()
        .with_speculative_width(16)
        .with_threads(2)
        .build(&keys)
        .unwrap();
    assert_eq!(seq, speculative);
}

#[test]
fn shuffled_input_still_bijective() {
    let mut keys = random_keys(5_000, 9);
    let mut rng = StdRng::seed_from_u64(1337);
    for _ in 0..3 {
        keys.shuffle(&mut rng);
        let table = Builder::new().build(&keys).unwrap();
        assert_bijection(&table, &keys);
    }
}

#[test]
fn distinct_homes_are_all_direct() {
    let keys: Vec<u64> = vec![4, 0, 3, 1, 2];
    let (table, stats) = Builder::new()
        .with_hasher(Identity)
        .build_with_stats(&keys)
        .unwrap();
    assert_eq!(stats.solve.multi_key_buckets, 0);
    assert_eq!(stats.solve.salt_attempts, 0);
    assert!(table
        .entries()
        .iter()
        .all(|e| matches!(e, SaltEntry::Direct(_))));
    assert_bijection(&table, &keys);
}

#[test]
fn colliding_family_fails_bounded() {
    let keys = [1u64, 2, 3];
    let err = Builder::new()
        .with_hasher(Colliding)
        .with_max_salt_attempts(128)
        .build(&keys)
        .unwrap_err();
    match err {
        MphError::SaltSearchExhausted {
            bucket,
            size,
            attempts,
        } => assert_eq!((bucket, size, attempts), (0, 3, 128)),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn five_key_scenario() {
    let keys = [10u64, 3, 7, 21, 8];
    let table = Builder::new().with_hasher(Halving).build(&keys).unwrap();
    let slots: Vec<usize> = keys.iter().map(|&k| table.lookup(k).unwrap()).collect();
    assert_eq!(slots, vec![0, 4, 3, 1, 2]);
    assert_bijection(&table, &keys);
    // 999 % 5 == 4, an empty home bucket
    assert_eq!(table.lookup(999), None);
    assert_eq!(table.entries()[4], SaltEntry::Unset);
}

#[test]
fn verifier_is_repeatable() {
    let keys = random_keys(3_000, 11);
    let table = Builder::new().build(&keys).unwrap();
    let before = table.clone();
    assert!(verify(&table, &keys).is_ok());
    assert!(verify(&table, &keys).is_ok());
    assert_eq!(table, before);

    let mut other = keys.clone();
    other[0] ^= 1;
    let first = verify(&table, &other).is_ok();
    assert_eq!(verify(&table, &other).is_ok(), first);
}

#[test]
fn raw_table_round_trip() {
    let keys = random_keys(4_000, 12);
    let table = Builder::new().build(&keys).unwrap();
    let raw = table.to_raw();
    assert!(raw.iter().filter(|&&v| v == 0).count() > 0);

    let restored = SaltTable::from_raw(&raw, WyHash).unwrap();
    assert_eq!(restored, table);
    for &k in &keys {
        assert_eq!(lookup_raw(&raw, &WyHash, k), table.lookup(k));
    }
}

#[test]
fn keys_from_dump() {
    let keys = page_addrs(1_000);
    let mut buf = Vec::with_capacity(keys.len() * 8);
    for k in &keys {
        buf.extend_from_slice(&k.to_le_bytes());
    }
    let decoded = keys_from_le_bytes(&buf).unwrap();
    let table = Builder::new().build(&decoded).unwrap();
    assert_bijection(&table, &keys);
}

#[cfg(feature = "serde")]
#[test]
fn bytes_round_trip() {
    let keys = random_keys(2_000, 13);
    let table = Builder::new().build(&keys).unwrap();
    let bytes = table.to_bytes().unwrap();
    let restored = SaltTable::<WyHash>::from_bytes(&bytes).unwrap();
    assert_eq!(restored, table);
}
