//! Packed bit buffer backing edge masks.

/// Fixed-length bit vector packed into 64-bit words, lowest index in the
/// least significant bit of the first word.
///
/// Bits past `len` in the last word are always zero, so derived equality
/// compares only the logical contents.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitBuf {
    words: Vec<u64>,
    len: usize,
}

impl BitBuf {
    /// Creates a buffer of `len` zero bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Number of bits in the buffer.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns bit `idx`, or `None` past the end.
    #[inline]
    pub fn get(&self, idx: usize) -> Option<bool> {
        if idx >= self.len {
            return None;
        }
        Some(self.bit(idx))
    }

    /// Sets bit `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len()`.
    #[inline]
    pub fn set(&mut self, idx: usize, value: bool) {
        assert!(idx < self.len, "bit index {idx} out of range {}", self.len);
        let mask = 1u64 << (idx & 63);
        if value {
            self.words[idx >> 6] |= mask;
        } else {
            self.words[idx >> 6] &= !mask;
        }
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|word| *word = 0);
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Iterates bits from index zero.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |idx| self.bit(idx))
    }

    #[inline]
    pub(crate) fn bit(&self, idx: usize) -> bool {
        (self.words[idx >> 6] >> (idx & 63)) & 1 == 1
    }
}

impl FromIterator<bool> for BitBuf {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let mut words = Vec::new();
        let mut len = 0usize;
        for value in iter {
            if len % 64 == 0 {
                words.push(0);
            }
            if value {
                words[len >> 6] |= 1u64 << (len & 63);
            }
            len += 1;
        }
        Self { words, len }
    }
}
