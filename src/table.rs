use std::fmt;

use crate::error::MphError;
use crate::hash::{HashFamily, WyHash};

/// Per-bucket outcome of construction.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltEntry {
    /// No key has this bucket as its home.
    Unset,
    /// The bucket's single key sits at this slot.
    Direct(usize),
    /// Every key in the bucket sits at `hash(key, salt) mod n`. Always `>= 1`.
    Displacement(u64),
}

impl SaltEntry {
    /// Signed encoding: `0` unset, `-(slot + 1)` direct, `salt` displaced.
    #[inline]
    pub fn to_raw(self) -> i64 {
        match self {
            SaltEntry::Unset => 0,
            SaltEntry::Direct(slot) => -(slot as i64) - 1,
            SaltEntry::Displacement(salt) => salt as i64,
        }
    }

    #[inline]
    pub fn from_raw(v: i64) -> Self {
        match v {
            0 => SaltEntry::Unset,
            v if v < 0 => SaltEntry::Direct((-(v + 1)) as usize),
            v => SaltEntry::Displacement(v as u64),
        }
    }
}

/// Finished minimal perfect hash: one [`SaltEntry`] per home bucket.
///
/// Read-only after construction, so lookups can run from any number of
/// threads without locking.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(bound(serialize = "", deserialize = "H: Default"))
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltTable<H = WyHash> {
    entries: Vec<SaltEntry>,
    #[cfg_attr(feature = "serde", serde(skip))]
    hasher: H,
}

impl<H: HashFamily> SaltTable<H> {
    pub(crate) fn from_entries(entries: Vec<SaltEntry>, hasher: H) -> Self {
        debug_assert!(!entries.is_empty());
        Self { entries, hasher }
    }

    /// Number of keys, slots and buckets.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[SaltEntry] {
        &self.entries
    }

    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Slot of `key`, or `None` when its home bucket is empty.
    ///
    /// Keys outside the build set whose home bucket is occupied still get a
    /// slot; only the empty-bucket case is detectable.
    #[inline]
    pub fn lookup(&self, key: u64) -> Option<usize> {
        let n = self.entries.len();
        match self.entries[self.hasher.primary(key, n)] {
            SaltEntry::Unset => None,
            SaltEntry::Direct(slot) => Some(slot),
            SaltEntry::Displacement(salt) => Some(self.hasher.slot(key, salt, n)),
        }
    }

    pub fn to_raw(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.to_raw()).collect()
    }

    /// Rebuilds a table from its signed encoding. Lookups are only meaningful
    /// with the same hash family the table was built with.
    pub fn from_raw(raw: &[i64], hasher: H) -> Result<Self, MphError> {
        let table = Self {
            entries: raw.iter().map(|&v| SaltEntry::from_raw(v)).collect(),
            hasher,
        };
        table.validate()?;
        Ok(table)
    }

    #[cfg(feature = "serde")]
    pub fn to_bytes(&self) -> Result<Vec<u8>, MphError> {
        Ok(bincode::serialize(self)?)
    }

    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MphError> {
        let table: Self = bincode::deserialize(bytes)?;
        table.validate()?;
        Ok(table)
    }

    pub fn stats(&self) -> TableStats {
        let mut stats = TableStats {
            slots: self.entries.len(),
            direct: 0,
            displaced: 0,
            unset: 0,
            max_salt: 0,
            memory_bytes: std::mem::size_of_val(self)
                + self.entries.len() * std::mem::size_of::<SaltEntry>(),
        };
        for e in &self.entries {
            match *e {
                SaltEntry::Unset => stats.unset += 1,
                SaltEntry::Direct(_) => stats.direct += 1,
                SaltEntry::Displacement(salt) => {
                    stats.displaced += 1;
                    stats.max_salt = stats.max_salt.max(salt);
                }
            }
        }
        stats
    }

    fn validate(&self) -> Result<(), MphError> {
        if self.entries.is_empty() {
            return Err(MphError::EmptyKeySet);
        }
        let n = self.entries.len();
        for (index, e) in self.entries.iter().enumerate() {
            let bad = match *e {
                SaltEntry::Unset => false,
                SaltEntry::Direct(slot) => slot >= n,
                SaltEntry::Displacement(salt) => salt == 0 || salt > i64::MAX as u64,
            };
            if bad {
                return Err(MphError::CorruptTable {
                    index,
                    value: e.to_raw(),
                });
            }
        }
        Ok(())
    }
}

/// Lookup straight from the persisted signed encoding, without building a
/// [`SaltTable`]. Malformed entries read as a miss.
#[inline]
pub fn lookup_raw<H: HashFamily>(raw: &[i64], hasher: &H, key: u64) -> Option<usize> {
    let n = raw.len();
    if n == 0 {
        return None;
    }
    match SaltEntry::from_raw(raw[hasher.primary(key, n)]) {
        SaltEntry::Unset => None,
        SaltEntry::Direct(slot) => (slot < n).then_some(slot),
        SaltEntry::Displacement(salt) => Some(hasher.slot(key, salt, n)),
    }
}

/// Entry mix of a finished table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub slots: usize,
    pub direct: usize,
    pub displaced: usize,
    pub unset: usize,
    pub max_salt: u64,
    pub memory_bytes: usize,
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Salt table statistics:")?;
        writeln!(f, "  Slots: {}", self.slots)?;
        writeln!(f, "  Direct buckets: {}", self.direct)?;
        writeln!(f, "  Displaced buckets: {}", self.displaced)?;
        writeln!(f, "  Empty buckets: {}", self.unset)?;
        writeln!(f, "  Max salt: {}", self.max_salt)?;
        write!(
            f,
            "  Memory: {:.2} MB",
            self.memory_bytes as f64 / 1_048_576.0
        )
    }
}
