/// Free/used state of the `n` output slots.
///
/// One bit per slot. Slots are never freed, so `take_lowest_free` keeps a
/// word cursor that only moves forward past full words.
#[derive(Debug, Clone)]
pub struct SlotBits {
    words: Vec<u64>,
    len: usize,
    used: usize,
    cursor: usize,
}

impl SlotBits {
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0u64; len.div_ceil(64)],
            len,
            used: 0,
            cursor: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn used_count(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn is_used(&self, slot: usize) -> bool {
        (self.words[slot >> 6] >> (slot & 63)) & 1 != 0
    }

    #[inline]
    pub fn mark_used(&mut self, slot: usize) {
        debug_assert!(!self.is_used(slot), "slot {slot} claimed twice");
        self.words[slot >> 6] |= 1u64 << (slot & 63);
        self.used += 1;
    }

    #[inline]
    pub fn all_free(&self, slots: &[usize]) -> bool {
        slots.iter().all(|&s| !self.is_used(s))
    }

    /// Claims and returns the lowest-indexed free slot.
    pub fn take_lowest_free(&mut self) -> Option<usize> {
        while self.cursor < self.words.len() {
            let free = !self.words[self.cursor];
            if free != 0 {
                let slot = (self.cursor << 6) | free.trailing_zeros() as usize;
                if slot >= self.len {
                    return None;
                }
                self.mark_used(slot);
                return Some(slot);
            }
            self.cursor += 1;
        }
        None
    }
}
