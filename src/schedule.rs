/// Processing order over buckets: largest first, ties by ascending bucket
/// index. Empty buckets are left out.
///
/// Counting sort keyed on size; the scatter walks buckets in index order, so
/// ties keep ascending order without a comparison sort.
pub fn bucket_order(sizes: &[usize]) -> Vec<usize> {
    let max_len = sizes.iter().copied().max().unwrap_or(0);
    if max_len == 0 {
        return Vec::new();
    }
    let mut freq = vec![0usize; max_len + 1];
    for &c in sizes {
        freq[c] += 1;
    }
    let mut next = vec![0usize; max_len + 1];
    let mut acc = 0usize;
    for len in (1..=max_len).rev() {
        next[len] = acc;
        acc += freq[len];
    }
    let mut order = vec![0usize; acc];
    for (bucket, &c) in sizes.iter().enumerate() {
        if c == 0 {
            continue;
        }
        order[next[c]] = bucket;
        next[c] += 1;
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_first_then_by_index() {
        let sizes = [1, 0, 3, 2, 0, 3, 1, 2];
        assert_eq!(bucket_order(&sizes), vec![2, 5, 3, 7, 0, 6]);
    }

    #[test]
    fn all_empty() {
        assert!(bucket_order(&[0, 0, 0]).is_empty());
        assert!(bucket_order(&[]).is_empty());
    }

    #[test]
    fn matches_comparison_sort() {
        let sizes: Vec<usize> = (0..500usize).map(|i| (i * 7919) % 5).collect();
        let mut expected: Vec<usize> = (0..sizes.len()).filter(|&b| sizes[b] > 0).collect();
        expected.sort_by(|&a, &b| sizes[b].cmp(&sizes[a]).then(a.cmp(&b)));
        assert_eq!(bucket_order(&sizes), expected);
    }
}
