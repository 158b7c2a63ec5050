use crate::error::{MphError, Violation};
use crate::hash::HashFamily;
use crate::slots::SlotBits;
use crate::table::SaltTable;

/// Checks that `table` maps `keys` onto `[0, n)` one-to-one.
///
/// Takes the table by shared reference and keeps its own scratch bitset, so
/// repeated calls on the same inputs always agree.
pub fn verify<H: HashFamily>(table: &SaltTable<H>, keys: &[u64]) -> Result<(), MphError> {
    let n = table.len();
    if n != keys.len() {
        return Err(MphError::KeyCountMismatch {
            table: n,
            keys: keys.len(),
        });
    }

    // Owner of each slot, for naming both keys in a collision report.
    let mut owner = vec![0u64; n];
    let mut seen = SlotBits::new(n);
    for &key in keys {
        let Some(slot) = table.lookup(key) else {
            return Err(MphError::NotBijective {
                key,
                slot: 0,
                violation: Violation::Miss,
            });
        };
        if slot >= n {
            return Err(MphError::NotBijective {
                key,
                slot,
                violation: Violation::OutOfRange,
            });
        }
        if seen.is_used(slot) {
            return Err(MphError::NotBijective {
                key,
                slot,
                violation: Violation::Collision { other: owner[slot] },
            });
        }
        seen.mark_used(slot);
        owner[slot] = key;
    }

    // n distinct slots below n cover the whole range.
    debug_assert_eq!(seen.used_count(), seen.len());
    Ok(())
}
