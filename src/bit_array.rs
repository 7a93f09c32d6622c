//! Fixed-capacity, word-packed bit arrays.
//!
//! A [`BitArray`] stores `size` meaningful bits in `ceil(size / 32)` words. Bits at
//! positions `>= size` inside the last word are padding: every read path masks them out,
//! so complements and raw buffers never leak into counts, comparisons or iteration.
//!
//! The array either owns its buffer or borrows one supplied by the caller. A borrowed
//! buffer is written through in place and is never freed by the array; growing past
//! its length moves the contents into a freshly owned buffer.

use crate::bitops::{
    BYTES_PER_WORD, WORD_BITS, Word, bytes_for_bits, clear_span, get_bits,
    popcount_by_table, set_bits, single_bit, tail_mask, words_for_bits,
};
use crate::error::{Error, Result};
use log::error;
use std::cell::Cell;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};
use std::str::FromStr;

enum Storage<'a> {
    Owned(Vec<Word>),
    Borrowed(&'a mut [Word]),
}

impl Storage<'_> {
    fn words(&self) -> &[Word] {
        match self {
            Storage::Owned(words) => words,
            Storage::Borrowed(words) => words,
        }
    }

    fn words_mut(&mut self) -> &mut [Word] {
        match self {
            Storage::Owned(words) => words,
            Storage::Borrowed(words) => words,
        }
    }
}

/// A packed array of bits with a memoized count of set bits.
///
/// The cardinality cache lives in a [`Cell`], so `num_set` can fill it through a shared
/// reference. This makes `BitArray` `!Sync`: a single owner mutates, readers on the same
/// thread may share it freely.
pub struct BitArray<'a> {
    storage: Storage<'a>,
    size: usize,
    num_set: Cell<Option<usize>>,
}

impl<'a> BitArray<'a> {
    /// Creates an empty array with no storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            storage: Storage::Owned(Vec::new()),
            size: 0,
            num_set: Cell::new(Some(0)),
        }
    }

    /// Creates an array of `size` bits, all clear.
    #[must_use]
    pub fn with_size(size: usize) -> Self {
        Self {
            storage: Storage::Owned(vec![0; words_for_bits(size)]),
            size,
            num_set: Cell::new(Some(0)),
        }
    }

    /// Copies the first `size` bits out of a raw word buffer.
    ///
    /// # Panics
    ///
    /// Panics if `words` holds fewer than `ceil(size / 32)` words.
    #[must_use]
    pub fn from_words(words: &[Word], size: usize) -> Self {
        let needed = words_for_bits(size);
        assert!(
            words.len() >= needed,
            "buffer of {} words cannot hold {size} bits",
            words.len()
        );
        Self {
            storage: Storage::Owned(words[..needed].to_vec()),
            size,
            num_set: Cell::new(None),
        }
    }

    /// Wraps a caller-owned word buffer without copying it.
    ///
    /// Every mutation writes straight into `words`. The buffer is never freed by the array.
    ///
    /// # Panics
    ///
    /// Panics if `words` holds fewer than `ceil(size / 32)` words.
    #[must_use]
    pub fn from_words_mut(words: &'a mut [Word], size: usize) -> Self {
        assert!(
            words.len() >= words_for_bits(size),
            "buffer of {} words cannot hold {size} bits",
            words.len()
        );
        Self {
            storage: Storage::Borrowed(words),
            size,
            num_set: Cell::new(None),
        }
    }

    /// Creates an array of `size` bits with the given indices set.
    ///
    /// # Panics
    ///
    /// Panics if any index is `>= size`.
    #[must_use]
    pub fn from_indices<I>(size: usize, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut array = Self::with_size(size);
        for index in indices {
            array.set(index);
        }
        array
    }

    /// Parses a string of `'0'` and `'1'` characters, one bit per character.
    ///
    /// Any other character is logged and stored as a clear bit. The size is the number of
    /// characters, not bytes.
    #[must_use]
    pub fn from_bit_str(bits: &str) -> Self {
        let mut array = Self::with_size(bits.chars().count());
        for (index, c) in bits.chars().enumerate() {
            match c {
                '1' => array.set(index),
                '0' => {}
                _ => error!("Bad bit '{c}' in bit string '{bits}'"),
            }
        }
        array
    }

    /// Detaches the array from any borrowed buffer by deep-copying it.
    #[must_use]
    pub fn to_owned_array(&self) -> BitArray<'static> {
        BitArray {
            storage: Storage::Owned(self.as_words().to_vec()),
            size: self.size,
            num_set: Cell::new(self.num_set.get()),
        }
    }

    /// Number of meaningful bits.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of words needed to hold `size` bits.
    #[inline]
    #[must_use]
    pub fn word_count(&self) -> usize {
        words_for_bits(self.size)
    }

    /// Number of words currently allocated or borrowed.
    #[inline]
    #[must_use]
    pub fn capacity_words(&self) -> usize {
        self.storage.words().len()
    }

    /// Number of bytes written by [`BitArray::write_to`].
    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        bytes_for_bits(self.size)
    }

    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(self.storage, Storage::Borrowed(_))
    }

    /// The words in use, padding included.
    #[must_use]
    pub fn as_words(&self) -> &[Word] {
        &self.storage.words()[..self.word_count()]
    }

    pub(crate) fn words_mut(&mut self) -> &mut [Word] {
        let count = self.word_count();
        &mut self.storage.words_mut()[..count]
    }

    /// Word `index` with padding bits cleared.
    #[inline]
    pub(crate) fn word(&self, index: usize) -> Word {
        let word = self.storage.words()[index];
        if index + 1 == self.word_count() {
            word & tail_mask(self.size)
        } else {
            word
        }
    }

    pub(crate) fn masked_words(&self) -> impl Iterator<Item = Word> + '_ {
        (0..self.word_count()).map(|index| self.word(index))
    }

    #[inline]
    pub(crate) fn invalidate_count(&self) {
        self.num_set.set(None);
    }

    #[inline]
    pub(crate) fn cached_count(&self) -> Option<usize> {
        self.num_set.get()
    }

    #[inline]
    pub(crate) fn set_cached_count(&self, count: Option<usize>) {
        self.num_set.set(count);
    }

    /// Changes the logical size to `new_size`.
    ///
    /// When more words are needed a new zeroed buffer is allocated; the old bits are copied
    /// over only if `copy` is set. When the existing buffer is large enough only the size
    /// changes, and any newly exposed bits are cleared.
    pub fn grow(&mut self, new_size: usize, copy: bool) {
        let needed = words_for_bits(new_size);
        if needed > self.capacity_words() {
            let mut words = vec![0; needed];
            if copy && self.size > 0 {
                let old = self.word_count();
                for (index, word) in words.iter_mut().take(old).enumerate() {
                    *word = self.word(index);
                }
            }
            self.storage = Storage::Owned(words);
        } else if new_size > self.size {
            let from = self.size;
            clear_span(self.storage.words_mut(), from, new_size);
        }
        self.size = new_size;
        self.invalidate_count();
    }

    #[inline]
    fn check_index(&self, index: usize) {
        assert!(
            index < self.size,
            "bit index {index} is out of range for a bit array of size {}",
            self.size
        );
    }

    /// Returns bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> bool {
        self.check_index(index);
        self.storage.words()[index / WORD_BITS] & single_bit(index) != 0
    }

    /// Returns bit `index`, or an error if it lies outside the array.
    pub fn try_get(&self, index: usize) -> Result<bool> {
        if index < self.size {
            Ok(self.get(index))
        } else {
            Err(Error::IndexOutOfRange {
                index,
                size: self.size,
            })
        }
    }

    /// Returns up to one word of bits starting at `from`, clamped to the end of the array.
    ///
    /// # Panics
    ///
    /// Panics if `from >= size` or `num_bits > 32`.
    #[must_use]
    pub fn get_field(&self, from: usize, num_bits: usize) -> Word {
        self.check_index(from);
        assert!(num_bits <= WORD_BITS, "field of {num_bits} bits is wider than a word");
        let num_bits = num_bits.min(self.size - from);
        get_bits(self.storage.words(), from, num_bits)
    }

    /// Sets bit `index`, keeping a valid count exact.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    #[inline]
    pub fn set(&mut self, index: usize) {
        self.check_index(index);
        let word = &mut self.storage.words_mut()[index / WORD_BITS];
        let mask = single_bit(index);
        if *word & mask == 0 {
            *word |= mask;
            if let Some(count) = self.num_set.get() {
                self.num_set.set(Some(count + 1));
            }
        }
    }

    /// Clears bit `index`, keeping a valid count exact.
    ///
    /// # Panics
    ///
    /// Panics if `index >= size`.
    #[inline]
    pub fn clear(&mut self, index: usize) {
        self.check_index(index);
        let word = &mut self.storage.words_mut()[index / WORD_BITS];
        let mask = single_bit(index);
        if *word & mask != 0 {
            *word &= !mask;
            if let Some(count) = self.num_set.get() {
                self.num_set.set(Some(count - 1));
            }
        }
    }

    /// Sets or clears bit `index`.
    #[inline]
    pub fn assign(&mut self, index: usize, value: bool) {
        if value {
            self.set(index);
        } else {
            self.clear(index);
        }
    }

    /// Writes the low `num_bits` bits of `value` at `from`, growing the array if the field
    /// runs past its end.
    ///
    /// # Panics
    ///
    /// Panics if `num_bits > 32`.
    pub fn set_field(&mut self, from: usize, num_bits: usize, value: Word) {
        assert!(num_bits <= WORD_BITS, "field of {num_bits} bits is wider than a word");
        if from + num_bits > self.size {
            self.grow(from + num_bits, true);
        }
        set_bits(self.storage.words_mut(), from, num_bits, value);
        self.invalidate_count();
    }

    /// Copies all of `other` into this array starting at bit `from`.
    ///
    /// # Panics
    ///
    /// Panics if `from + other.size() > size`.
    pub fn set_range(&mut self, from: usize, other: &BitArray<'_>) {
        assert!(
            from + other.size <= self.size,
            "range of {} bits at {from} does not fit in a bit array of size {}",
            other.size,
            self.size
        );
        if other.size == 0 {
            return;
        }
        let aligned_end = (other.word_count() - 1) * WORD_BITS;
        let words = self.storage.words_mut();
        let mut bit = 0;
        while bit < aligned_end {
            set_bits(words, from + bit, WORD_BITS, other.get_field(bit, WORD_BITS));
            bit += WORD_BITS;
        }
        let tail = other.size - bit;
        set_bits(words, from + bit, tail, other.get_field(bit, tail));
        self.invalidate_count();
    }

    /// Appends the bits of `other` to the end of this array.
    pub fn append(&mut self, other: &BitArray<'_>) {
        if other.size == 0 {
            return;
        }
        let start = self.size;
        self.grow(self.size + other.size, true);
        self.set_range(start, other);
    }

    /// Clears every bit.
    pub fn clear_all(&mut self) {
        self.words_mut().fill(0);
        self.num_set.set(Some(0));
    }

    /// Sets every bit in `[0, size)`.
    pub fn set_all(&mut self) {
        let size = self.size;
        let words = self.words_mut();
        words.fill(Word::MAX);
        if let Some(last) = words.last_mut() {
            *last &= tail_mask(size);
        }
        self.num_set.set(Some(size));
    }

    /// Number of set bits, computed with the hardware popcount and memoized.
    #[must_use]
    pub fn num_set(&self) -> usize {
        if let Some(count) = self.num_set.get() {
            return count;
        }
        let count = self
            .masked_words()
            .map(|word| word.count_ones() as usize)
            .sum();
        self.num_set.set(Some(count));
        count
    }

    /// Number of set bits counted through the byte lookup table, bypassing the cache.
    #[must_use]
    pub fn popcount_table(&self) -> usize {
        self.masked_words().map(popcount_by_table).sum()
    }

    /// Number of set bits in `[start, end)`, scanned bit by bit.
    ///
    /// # Panics
    ///
    /// Panics if `end > size`.
    #[must_use]
    pub fn num_set_range(&self, start: usize, end: usize) -> usize {
        assert!(
            end <= self.size,
            "range end {end} is out of range for a bit array of size {}",
            self.size
        );
        (start..end).filter(|&index| self.get(index)).count()
    }

    /// Highest set index, if any.
    #[must_use]
    pub fn last_set_bit(&self) -> Option<usize> {
        (0..self.word_count()).rev().find_map(|index| {
            let word = self.word(index);
            (word != 0).then(|| index * WORD_BITS + (WORD_BITS - 1 - word.leading_zeros() as usize))
        })
    }

    /// Highest clear index, if any.
    #[must_use]
    pub fn last_clear_bit(&self) -> Option<usize> {
        let count = self.word_count();
        (0..count).rev().find_map(|index| {
            let mut word = !self.word(index);
            if index + 1 == count {
                word &= tail_mask(self.size);
            }
            (word != 0).then(|| index * WORD_BITS + (WORD_BITS - 1 - word.leading_zeros() as usize))
        })
    }

    /// Writes the first `ceil(size / 8)` bytes of the little-endian word layout.
    ///
    /// The size is not recorded; the reader must already know it.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let bytes: Vec<u8> = self
            .masked_words()
            .flat_map(Word::to_le_bytes)
            .take(self.byte_len())
            .collect();
        writer.write_all(&bytes)
    }

    /// Overwrites the array with `ceil(size / 8)` bytes read from `reader`.
    ///
    /// Data written with a different size is silently misinterpreted.
    pub fn read_from<R: Read>(&mut self, reader: &mut R) -> io::Result<()> {
        let mut bytes = vec![0u8; self.word_count() * BYTES_PER_WORD];
        let byte_len = self.byte_len();
        reader.read_exact(&mut bytes[..byte_len])?;
        for (word, chunk) in self
            .words_mut()
            .iter_mut()
            .zip(bytes.chunks_exact(BYTES_PER_WORD))
        {
            let mut le = [0u8; BYTES_PER_WORD];
            le.copy_from_slice(chunk);
            *word = Word::from_le_bytes(le);
        }
        self.invalidate_count();
        Ok(())
    }

    /// Reads a bit dump of `size` bits into a new array.
    pub fn from_reader<R: Read>(reader: &mut R, size: usize) -> io::Result<Self> {
        let mut array = Self::with_size(size);
        array.read_from(reader)?;
        Ok(array)
    }
}

impl Default for BitArray<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for BitArray<'_> {
    fn clone(&self) -> Self {
        Self {
            storage: Storage::Owned(self.as_words().to_vec()),
            size: self.size,
            num_set: Cell::new(self.num_set.get()),
        }
    }
}

impl From<&str> for BitArray<'_> {
    fn from(bits: &str) -> Self {
        Self::from_bit_str(bits)
    }
}

impl FromStr for BitArray<'_> {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_bit_str(s))
    }
}

impl FromIterator<bool> for BitArray<'_> {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let bits: Vec<bool> = iter.into_iter().collect();
        let mut array = Self::with_size(bits.len());
        for (index, _) in bits.iter().enumerate().filter(|&(_, &bit)| bit) {
            array.set(index);
        }
        array
    }
}

impl fmt::Display for BitArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.size {
            f.write_str(if self.get(index) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitArray<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitArray")
            .field("size", &self.size)
            .field("bits", &format_args!("{self}"))
            .field("borrowed", &self.is_borrowed())
            .finish()
    }
}

impl PartialEq<BitArray<'_>> for BitArray<'_> {
    fn eq(&self, other: &BitArray<'_>) -> bool {
        self.size == other.size && self.masked_words().eq(other.masked_words())
    }
}

impl Eq for BitArray<'_> {}

impl Hash for BitArray<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.size.hash(state);
        for word in self.masked_words() {
            word.hash(state);
        }
    }
}

/// Larger arrays sort first; equal sizes compare their little-endian bytes.
impl Ord for BitArray<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.size.cmp(&self.size).then_with(|| {
            self.masked_words()
                .map(Word::to_le_bytes)
                .cmp(other.masked_words().map(Word::to_le_bytes))
        })
    }
}

impl PartialOrd for BitArray<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
