use std::hash::Hasher;

use crate::hash::mix64;

/// `Hasher` for sets of `u64` keys used during duplicate detection.
///
/// Keys are already well distributed addresses, so a single finalizer round is
/// enough. Arbitrary byte input is folded 8 bytes at a time.
#[derive(Default)]
pub struct KeyHasher {
    state: u64,
}

impl Hasher for KeyHasher {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut chunks = bytes.chunks_exact(8);
        for chunk in &mut chunks {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            self.state = mix64(self.state ^ u64::from_le_bytes(word));
        }
        for &b in chunks.remainder() {
            self.state = mix64(self.state ^ (b as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        }
    }

    #[inline]
    fn write_u64(&mut self, key: u64) {
        self.state = mix64(self.state ^ key);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }
}
