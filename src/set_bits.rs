//! Table-driven iteration over the indices of set bits.
//!
//! Each word is scanned one nibble at a time. A nonzero nibble value selects a run in
//! [`NIBBLE_OFFSETS`] listing its set-bit offsets, so cleared bits are never visited
//! individually and zero nibbles and zero words are skipped whole.

use crate::bit_array::BitArray;
use crate::bitops::{NIBBLE_OFFSETS, NIBBLE_START, NIBBLE_TABLE_END, NIBBLES_PER_WORD, WORD_BITS, Word};
use std::fmt;
use std::iter::FusedIterator;

/// Forward cursor over the set bits of a [`BitArray`], yielding indices in ascending order.
///
/// The exhausted cursor sits at word index `word_count()`, nibble index 8 and the end of the
/// offset table. Two cursors compare equal when those three positions match.
#[derive(Clone)]
pub struct SetBitIndices<'b> {
    array: &'b BitArray<'b>,
    word_index: usize,
    nibble_index: usize,
    table_pos: usize,
    table_end: usize,
    remaining: Word,
}

impl<'b> SetBitIndices<'b> {
    pub(crate) fn new(array: &'b BitArray<'b>) -> Self {
        let mut cursor = Self::end(array);
        cursor.seek_word(0);
        cursor
    }

    pub(crate) fn end(array: &'b BitArray<'b>) -> Self {
        Self {
            array,
            word_index: array.word_count(),
            nibble_index: NIBBLES_PER_WORD,
            table_pos: NIBBLE_TABLE_END,
            table_end: NIBBLE_TABLE_END,
            remaining: 0,
        }
    }

    /// True once every set bit has been produced.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.word_index >= self.array.word_count()
    }

    /// Index the cursor currently points at, or `None` when exhausted.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        if self.is_exhausted() {
            return None;
        }
        let offset = NIBBLE_OFFSETS[self.table_pos] as usize;
        Some(WORD_BITS * self.word_index + 4 * self.nibble_index + offset)
    }

    fn load_nibble(&mut self) {
        let nibble = (self.remaining & 0xF) as usize;
        self.table_pos = NIBBLE_START[nibble];
        self.table_end = NIBBLE_START[nibble + 1];
    }

    fn seek_word(&mut self, start: usize) {
        let count = self.array.word_count();
        let found = (start..count).find(|&index| self.array.word(index) != 0);
        match found {
            Some(index) => {
                self.word_index = index;
                self.nibble_index = 0;
                self.remaining = self.array.word(index);
                while self.remaining & 0xF == 0 {
                    self.nibble_index += 1;
                    self.remaining >>= 4;
                }
                self.load_nibble();
            }
            None => *self = Self::end(self.array),
        }
    }

    fn advance(&mut self) {
        self.table_pos += 1;
        if self.table_pos < self.table_end {
            return;
        }
        while self.nibble_index + 1 < NIBBLES_PER_WORD {
            self.nibble_index += 1;
            self.remaining >>= 4;
            if self.remaining & 0xF != 0 {
                self.load_nibble();
                return;
            }
        }
        self.seek_word(self.word_index + 1);
    }
}

impl Iterator for SetBitIndices<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current()?;
        self.advance();
        Some(index)
    }
}

impl FusedIterator for SetBitIndices<'_> {}

impl PartialEq for SetBitIndices<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.word_index == other.word_index
            && self.nibble_index == other.nibble_index
            && self.table_pos == other.table_pos
    }
}

impl Eq for SetBitIndices<'_> {}

impl fmt::Debug for SetBitIndices<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetBitIndices")
            .field("word_index", &self.word_index)
            .field("nibble_index", &self.nibble_index)
            .field("table_pos", &self.table_pos)
            .finish_non_exhaustive()
    }
}

impl<'a> BitArray<'a> {
    /// Iterates over the indices of set bits in ascending order.
    pub fn iter_set_bits(&self) -> SetBitIndices<'_> {
        SetBitIndices::new(self)
    }

    /// The exhausted cursor for this array.
    pub fn set_bits_end(&self) -> SetBitIndices<'_> {
        SetBitIndices::end(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crosses_word_boundary_and_reaches_top_bit() {
        let bits = BitArray::from_indices(64, [2, 5, 31, 32, 63]);
        let indices: Vec<usize> = bits.iter_set_bits().collect();
        assert_eq!(indices, vec![2, 5, 31, 32, 63]);
    }

    #[test]
    fn skips_zero_words() {
        let bits = BitArray::from_indices(200, [0, 199]);
        let indices: Vec<usize> = bits.iter_set_bits().collect();
        assert_eq!(indices, vec![0, 199]);
    }

    #[test]
    fn empty_and_all_clear_arrays_start_exhausted() {
        let empty = BitArray::new();
        assert!(empty.iter_set_bits().is_exhausted());
        assert_eq!(empty.iter_set_bits(), empty.set_bits_end());

        let clear = BitArray::with_size(96);
        assert_eq!(clear.iter_set_bits().next(), None);
        assert_eq!(clear.iter_set_bits(), clear.set_bits_end());
    }

    #[test]
    fn dense_nibbles_yield_every_index() {
        let mut bits = BitArray::with_size(45);
        bits.set_all();
        let indices: Vec<usize> = bits.iter_set_bits().collect();
        assert_eq!(indices, (0..45).collect::<Vec<_>>());
    }

    #[test]
    fn padding_is_never_yielded() {
        let mut bits = BitArray::from_bit_str("10");
        bits.complement();
        assert_eq!(bits.iter_set_bits().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn cursor_reaches_end_sentinel() {
        let bits = BitArray::from_indices(40, [3, 36]);
        let mut cursor = bits.iter_set_bits();
        assert_eq!(cursor.current(), Some(3));
        assert_ne!(cursor, bits.set_bits_end());
        assert_eq!(cursor.next(), Some(3));
        assert_eq!(cursor.current(), Some(36));
        assert_eq!(cursor.next(), Some(36));
        assert_eq!(cursor, bits.set_bits_end());
        assert_eq!(cursor.next(), None);
    }
}
