//! Boolean set algebra over bit arrays of equal word count.
//!
//! Binary operators combine corresponding words and panic when the operands occupy a
//! different number of words; [`BitArray::check_same_words`] lets callers test first.

use crate::bit_array::BitArray;
use crate::bitops::{WORD_BITS, Word};
use crate::error::{Error, Result};
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, ShlAssign};

impl BitArray<'_> {
    /// Returns an error if `other` does not occupy the same number of words.
    pub fn check_same_words(&self, other: &BitArray<'_>) -> Result<()> {
        if self.word_count() == other.word_count() {
            Ok(())
        } else {
            Err(Error::WordCountMismatch {
                left: self.word_count(),
                right: other.word_count(),
            })
        }
    }

    fn combine_words(&mut self, other: &BitArray<'_>, op: impl Fn(Word, Word) -> Word) {
        if let Err(e) = self.check_same_words(other) {
            panic!("{e}");
        }
        for (word, &rhs) in self.words_mut().iter_mut().zip(other.as_words()) {
            *word = op(*word, rhs);
        }
        self.invalidate_count();
    }

    /// Flips every bit in place.
    ///
    /// A valid count stays valid as `size - count`.
    pub fn complement(&mut self) {
        for word in self.words_mut() {
            *word = !*word;
        }
        let size = self.size();
        self.set_cached_count(self.cached_count().map(|count| size - count));
    }

    /// True if every set bit of `self` is also set in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &BitArray<'_>) -> bool {
        self.size() == other.size() && self.num_set() == (self.clone() & other).num_set()
    }

    /// True if every set bit of `other` is also set in `self`.
    #[must_use]
    pub fn is_superset(&self, other: &BitArray<'_>) -> bool {
        self.size() == other.size() && other.num_set() == (self.clone() & other).num_set()
    }

    /// True if some index below both sizes is set in both arrays.
    #[must_use]
    pub fn intersects(&self, other: &BitArray<'_>) -> bool {
        let shorter = self.size().min(other.size());
        let full_words = shorter / WORD_BITS;
        for index in 0..full_words {
            if self.word(index) & other.word(index) != 0 {
                return true;
            }
        }
        (full_words * WORD_BITS..shorter).any(|bit| self.get(bit) && other.get(bit))
    }
}

impl BitAndAssign<&BitArray<'_>> for BitArray<'_> {
    fn bitand_assign(&mut self, rhs: &BitArray<'_>) {
        self.combine_words(rhs, |a, b| a & b);
    }
}

impl BitOrAssign<&BitArray<'_>> for BitArray<'_> {
    fn bitor_assign(&mut self, rhs: &BitArray<'_>) {
        self.combine_words(rhs, |a, b| a | b);
    }
}

impl BitXorAssign<&BitArray<'_>> for BitArray<'_> {
    fn bitxor_assign(&mut self, rhs: &BitArray<'_>) {
        self.combine_words(rhs, |a, b| a ^ b);
    }
}

macro_rules! binary_op {
    ($trait:ident, $method:ident, $assign:ident) => {
        impl<'a> $trait<&BitArray<'_>> for BitArray<'a> {
            type Output = BitArray<'a>;

            fn $method(mut self, rhs: &BitArray<'_>) -> Self::Output {
                self.$assign(rhs);
                self
            }
        }

        impl<'a> $trait<&BitArray<'_>> for &BitArray<'a> {
            type Output = BitArray<'a>;

            fn $method(self, rhs: &BitArray<'_>) -> Self::Output {
                let mut result = self.clone();
                result.$assign(rhs);
                result
            }
        }
    };
}

binary_op!(BitAnd, bitand, bitand_assign);
binary_op!(BitOr, bitor, bitor_assign);
binary_op!(BitXor, bitxor, bitxor_assign);

impl<'a> Not for BitArray<'a> {
    type Output = BitArray<'a>;

    fn not(mut self) -> Self::Output {
        self.complement();
        self
    }
}

impl<'a> Not for &BitArray<'a> {
    type Output = BitArray<'a>;

    fn not(self) -> Self::Output {
        let mut result = self.clone();
        result.complement();
        result
    }
}

/// `a <<= &b` appends the bits of `b` to `a`.
impl ShlAssign<&BitArray<'_>> for BitArray<'_> {
    fn shl_assign(&mut self, rhs: &BitArray<'_>) {
        self.append(rhs);
    }
}
