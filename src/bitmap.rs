use core::ops::Range;

use crate::base::{PagePtr, WORD};

/// A fixed-width bitmap stored inside a metadata page.
pub struct Bitmap {
    page: PagePtr,
    offset: usize,
    num_bits: usize,
}

impl Bitmap {
    /// Returns the number of words needed to store `num_bits` bits.
    #[inline]
    pub const fn num_words(num_bits: usize) -> usize {
        (num_bits + u64::BITS as usize - 1) / u64::BITS as usize
    }

    /// Constructs a view of the `num_bits` bitmap stored `offset` bytes into
    /// `page`.
    ///
    /// The contents are left as they are; use [`Bitmap::clear`] on a freshly
    /// claimed slot.
    pub fn new(page: PagePtr, offset: usize, num_bits: usize) -> Bitmap {
        assert!(num_bits > 0);

        Bitmap {
            page,
            offset,
            num_bits,
        }
    }

    /// Returns a tuple of the byte offset of the word containing `bit` and a
    /// mask which extracts it.
    #[inline]
    fn offset_and_mask(&self, bit: usize) -> (usize, u64) {
        (
            self.offset + (bit / u64::BITS as usize) * WORD,
            1 << (bit as u64 % u64::BITS as u64),
        )
    }

    /// Clears every bit.
    pub fn clear(&mut self) {
        self.page
            .zero(self.offset, Self::num_words(self.num_bits) * WORD);
    }

    /// Gets the value of the indexed bit.
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.num_bits);

        let (word, mask) = self.offset_and_mask(index);
        self.page.read_word(word) & mask != 0
    }

    /// Sets the value of the indexed bit.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.num_bits);

        let (word, mask) = self.offset_and_mask(index);
        let old = self.page.read_word(word);
        self.page.write_word(
            word,
            match value {
                true => old | mask,
                false => old & !mask,
            },
        );
    }

    /// Sets every bit in `range` to `value`.
    pub fn set_range(&mut self, range: Range<usize>, value: bool) {
        for bit in range {
            self.set(bit, value);
        }
    }

    /// Returns `true` if every bit in `range` equals `value`.
    pub fn all(&self, mut range: Range<usize>, value: bool) -> bool {
        range.all(|bit| self.get(bit) == value)
    }

    /// Returns `true` if no bit is set.
    pub fn is_clear(&self) -> bool {
        (0..Self::num_words(self.num_bits))
            .all(|w| self.page.read_word(self.offset + w * WORD) == 0)
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> usize {
        (0..Self::num_words(self.num_bits))
            .map(|w| self.page.read_word(self.offset + w * WORD).count_ones() as usize)
            .sum()
    }
}
