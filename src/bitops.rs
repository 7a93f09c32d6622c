//! Word-level bit manipulation utilities shared by the bit array and its iterators.

/// The unit of packed storage.
pub type Word = u32;

pub const BITS_PER_BYTE: usize = 8;
pub const WORD_BITS: usize = Word::BITS as usize;
pub const BYTES_PER_WORD: usize = WORD_BITS / BITS_PER_BYTE;

/// Number of 4-bit segments in one word.
pub const NIBBLES_PER_WORD: usize = WORD_BITS / 4;

/// Number of words needed to hold `bits` bits.
#[inline]
#[must_use]
pub const fn words_for_bits(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

/// Number of bytes needed to hold `bits` bits.
#[inline]
#[must_use]
pub const fn bytes_for_bits(bits: usize) -> usize {
    bits.div_ceil(BITS_PER_BYTE)
}

/// A mask with the low `n` bits set, for `n` in `0..=WORD_BITS`.
#[inline]
#[must_use]
pub const fn low_mask(n: usize) -> Word {
    if n >= WORD_BITS {
        Word::MAX
    } else {
        (1 << n) - 1
    }
}

/// A mask with only bit `n` set.
#[inline]
#[must_use]
pub const fn single_bit(n: usize) -> Word {
    1 << (n % WORD_BITS)
}

/// Mask of the meaningful bits in the last word of an array of `bits` bits.
#[inline]
#[must_use]
pub const fn tail_mask(bits: usize) -> Word {
    match bits % WORD_BITS {
        0 => Word::MAX,
        rem => low_mask(rem),
    }
}

const fn build_byte_popcount() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 1;
    while i < 256 {
        table[i] = (i & 1) as u8 + table[i / 2];
        i += 1;
    }
    table
}

/// Number of set bits for every byte value.
pub static BYTE_POPCOUNT: [u8; 256] = build_byte_popcount();

/// Counts set bits in a word by summing byte-wide table lookups.
#[inline]
#[must_use]
pub fn popcount_by_table(word: Word) -> usize {
    word.to_le_bytes()
        .iter()
        .map(|&b| BYTE_POPCOUNT[b as usize] as usize)
        .sum()
}

const NIBBLE_OFFSET_COUNT: usize = 32;

const fn build_nibble_tables() -> ([u8; NIBBLE_OFFSET_COUNT], [usize; 17]) {
    let mut offsets = [0u8; NIBBLE_OFFSET_COUNT];
    let mut starts = [0usize; 17];
    let mut pos = 0;
    let mut nibble = 0;
    while nibble < 16 {
        starts[nibble] = pos;
        let mut bit = 0;
        while bit < 4 {
            if nibble & (1 << bit) != 0 {
                offsets[pos] = bit as u8;
                pos += 1;
            }
            bit += 1;
        }
        nibble += 1;
    }
    starts[16] = pos;
    (offsets, starts)
}

const NIBBLE_TABLES: ([u8; NIBBLE_OFFSET_COUNT], [usize; 17]) = build_nibble_tables();

/// Offsets of the set bits of every nibble value, concatenated in nibble order.
///
/// The offsets of nibble `v` live at `NIBBLE_OFFSETS[NIBBLE_START[v]..NIBBLE_START[v + 1]]`.
pub static NIBBLE_OFFSETS: [u8; NIBBLE_OFFSET_COUNT] = NIBBLE_TABLES.0;

/// Start position of each nibble's run in [`NIBBLE_OFFSETS`]; entry 16 is the end position.
pub static NIBBLE_START: [usize; 17] = NIBBLE_TABLES.1;

/// Position in [`NIBBLE_OFFSETS`] one past the last entry.
pub const NIBBLE_TABLE_END: usize = NIBBLE_OFFSET_COUNT;

/// Reads up to one word of bits starting at bit `from`, spanning at most two words.
///
/// Bits beyond the end of `words` read as zero.
#[must_use]
pub fn get_bits(words: &[Word], from: usize, num_bits: usize) -> Word {
    debug_assert!(num_bits <= WORD_BITS);
    if num_bits == 0 {
        return 0;
    }
    let index = from / WORD_BITS;
    let unused = from % WORD_BITS;
    let used = WORD_BITS - unused;
    let mut result = words.get(index).map_or(0, |w| w >> unused);
    if num_bits > used {
        let rest = num_bits - used;
        let next = words.get(index + 1).copied().unwrap_or(0);
        result |= (next & low_mask(rest)) << used;
    }
    result & low_mask(num_bits)
}

/// Writes the low `num_bits` bits of `value` starting at bit `from`, spanning at most two words.
///
/// Bits outside `[from, from + num_bits)` are left untouched.
pub fn set_bits(words: &mut [Word], from: usize, num_bits: usize, value: Word) {
    debug_assert!(num_bits <= WORD_BITS);
    if num_bits == 0 {
        return;
    }
    let value = value & low_mask(num_bits);
    let index = from / WORD_BITS;
    let offset = from % WORD_BITS;
    let room = WORD_BITS - offset;

    let first_len = num_bits.min(room);
    let first_mask = low_mask(first_len) << offset;
    words[index] = (words[index] & !first_mask) | ((value << offset) & first_mask);

    if num_bits > room {
        let overlap = num_bits - room;
        let second_mask = low_mask(overlap);
        words[index + 1] = (words[index + 1] & !second_mask) | ((value >> room) & second_mask);
    }
}

/// Clears bits `[from, to)`, one word-aligned chunk at a time.
pub fn clear_span(words: &mut [Word], from: usize, to: usize) {
    let mut bit = from;
    while bit < to {
        let chunk = (WORD_BITS - bit % WORD_BITS).min(to - bit);
        set_bits(words, bit, chunk, 0);
        bit += chunk;
    }
}
