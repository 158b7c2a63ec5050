use crate::hash::HashFamily;

/// Keys grouped by home bucket, stored as one flat array plus offsets.
///
/// Bucket `b` holds `items[offsets[b]..offsets[b + 1]]`, in input order.
#[derive(Debug, Clone)]
pub struct Buckets {
    offsets: Vec<usize>,
    items: Vec<u64>,
}

impl Buckets {
    /// Partitions `keys` into `keys.len()` buckets by primary hash.
    pub fn partition<H: HashFamily>(keys: &[u64], hasher: &H) -> Self {
        let n = keys.len();
        let home: Vec<usize> = keys.iter().map(|&k| hasher.primary(k, n)).collect();

        let mut offsets = vec![0usize; n + 1];
        for &b in &home {
            offsets[b + 1] += 1;
        }
        for i in 0..n {
            offsets[i + 1] += offsets[i];
        }

        let mut cursor = offsets.clone();
        let mut items = vec![0u64; n];
        for (&key, &b) in keys.iter().zip(&home) {
            items[cursor[b]] = key;
            cursor[b] += 1;
        }

        Self { offsets, items }
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn bucket(&self, b: usize) -> &[u64] {
        &self.items[self.offsets[b]..self.offsets[b + 1]]
    }

    #[inline]
    pub fn len(&self, b: usize) -> usize {
        self.offsets[b + 1] - self.offsets[b]
    }

    pub fn max_len(&self) -> usize {
        (0..self.bucket_count()).map(|b| self.len(b)).max().unwrap_or(0)
    }

    /// Bucket sizes indexed by bucket.
    pub fn sizes(&self) -> Vec<usize> {
        self.offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::WyHash;

    #[derive(Debug, Clone, Default)]
    struct Identity;

    impl HashFamily for Identity {
        fn hash(&self, key: u64, _salt: u64) -> u64 {
            key
        }
    }

    #[test]
    fn groups_by_home_bucket_in_input_order() {
        let keys = [10u64, 3, 7, 21, 8];
        let b = Buckets::partition(&keys, &Identity);
        assert_eq!(b.bucket_count(), 5);
        assert_eq!(b.bucket(0), &[10]);
        assert_eq!(b.bucket(1), &[21]);
        assert_eq!(b.bucket(2), &[7]);
        assert_eq!(b.bucket(3), &[3, 8]);
        assert!(b.bucket(4).is_empty());
        assert_eq!(b.sizes(), vec![1, 1, 1, 2, 0]);
        assert_eq!(b.max_len(), 2);
    }

    #[test]
    fn every_key_lands_once() {
        let keys: Vec<u64> = (0..1000u64).map(|i| 0x1_0000_0000 + (i << 14)).collect();
        let b = Buckets::partition(&keys, &WyHash);
        let mut all: Vec<u64> = (0..b.bucket_count()).flat_map(|i| b.bucket(i).to_vec()).collect();
        all.sort_unstable();
        assert_eq!(all, keys);
        for i in 0..b.bucket_count() {
            for &k in b.bucket(i) {
                assert_eq!(WyHash.primary(k, keys.len()), i);
            }
        }
    }
}
