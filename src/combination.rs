//! Subset enumeration over the bit pattern of a [`BitArray`].
//!
//! Two independent orders are offered. [`BitArray::next_combination`] walks the `k`-subsets
//! of the universe `0..size` with `k` held fixed. [`BitArray::next_depth_first_combination`]
//! walks every non-empty subset up to a maximum size in prefix order:
//! `{0}, {0,1}, {0,1,2}, {0,2}, {1}, {1,2}, {2}` for a universe of three.

use crate::bit_array::BitArray;
use crate::error::{Error, Result};
use log::debug;
use std::iter::FusedIterator;

impl BitArray<'_> {
    /// Advances to the next subset with the same number of set bits.
    ///
    /// Returns `false` and clears the array once the last subset (all set bits packed at
    /// the top) has been passed, or immediately if the array is empty, all clear or all set.
    pub fn next_combination(&mut self) -> bool {
        let size = self.size();
        let num_set = self.num_set();
        if size == 0 || num_set == 0 || num_set == size {
            self.clear_all();
            return false;
        }

        let Some(last) = self.last_set_bit() else {
            self.clear_all();
            return false;
        };
        self.clear(last);
        if last < size - 1 {
            self.set(last + 1);
            return true;
        }

        // The top bit was set: strip the run of set bits ending there.
        let mut to_set = 1;
        let mut below = last;
        while below > 0 && self.get(below - 1) {
            below -= 1;
            self.clear(below);
            to_set += 1;
        }
        if to_set == num_set {
            self.clear_all();
            return false;
        }

        // Move the next set bit below the run up by one and repack the run after it.
        let Some(pivot) = (0..below).rev().find(|&index| self.get(index)) else {
            self.clear_all();
            return false;
        };
        self.clear(pivot);
        for index in pivot + 1..=pivot + to_set + 1 {
            self.set(index);
        }
        true
    }

    /// Advances to the next subset in depth-first order, using at most `max_depth` bits.
    ///
    /// `None` means the whole universe. Starting from an all-clear array the first call sets
    /// bit 0. Returns `false` once the singleton holding the top bit has been passed.
    pub fn next_depth_first_combination(&mut self, max_depth: Option<usize>) -> bool {
        let size = self.size();
        let max_depth = max_depth.unwrap_or(size);
        if size == 0 || max_depth == 0 {
            return false;
        }

        let num_set = self.num_set();
        let Some(mut last) = self.last_set_bit() else {
            self.set(0);
            return true;
        };

        if last == size - 1 {
            if num_set == 1 {
                return false;
            }
            // Pop a level: drop the top bit, then shift the new highest bit up by one.
            self.clear(last);
            last = match self.last_set_bit() {
                Some(next) => next,
                None => return false,
            };
            self.clear(last);
            self.set(last + 1);
            return true;
        }

        if num_set == max_depth {
            self.clear(last);
        }
        self.set(last + 1);
        true
    }
}

/// Binomial coefficient `C(n, k)`, saturating at `u128::MAX`.
#[must_use]
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        let Some(product) = result.checked_mul((n - i) as u128) else {
            return u128::MAX;
        };
        result = product / (i as u128 + 1);
    }
    result
}

/// Every `k`-subset of `0..n`, in the order produced by [`BitArray::next_combination`].
#[derive(Debug, Clone)]
pub struct Combinations {
    state: Option<BitArray<'static>>,
}

impl Combinations {
    /// Starts at the subset `{0, .., k - 1}`.
    pub fn new(n: usize, k: usize) -> Result<Self> {
        if k > n {
            return Err(Error::CombinationSize { n, k });
        }
        debug!("Enumerating {} combinations of {k} from {n}", binomial(n, k));
        Ok(Self {
            state: Some(BitArray::from_indices(n, 0..k)),
        })
    }
}

impl Iterator for Combinations {
    type Item = BitArray<'static>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.state.take()?;
        let mut next = current.clone();
        if next.next_combination() {
            self.state = Some(next);
        }
        Some(current)
    }
}

impl FusedIterator for Combinations {}

/// Every non-empty subset of `0..n` with at most `max_depth` elements, in depth-first order.
#[derive(Debug, Clone)]
pub struct DepthFirstCombinations {
    state: BitArray<'static>,
    max_depth: Option<usize>,
    done: bool,
}

impl DepthFirstCombinations {
    #[must_use]
    pub fn new(n: usize, max_depth: Option<usize>) -> Self {
        Self {
            state: BitArray::with_size(n),
            max_depth,
            done: false,
        }
    }
}

impl Iterator for DepthFirstCombinations {
    type Item = BitArray<'static>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.state.next_depth_first_combination(self.max_depth) {
            Some(self.state.clone())
        } else {
            self.done = true;
            None
        }
    }
}

impl FusedIterator for DepthFirstCombinations {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn walk_fixed(n: usize, k: usize) -> Vec<String> {
        let mut bits = BitArray::from_indices(n, 0..k);
        let mut seen = vec![bits.to_string()];
        while bits.next_combination() {
            seen.push(bits.to_string());
        }
        assert_eq!(bits.num_set(), 0);
        seen
    }

    #[test]
    fn fixed_order_for_four_choose_two() {
        assert_eq!(
            walk_fixed(4, 2),
            vec!["1100", "1010", "1001", "0110", "0101", "0011"]
        );
    }

    #[test]
    fn fixed_order_counts_match_binomial() {
        for n in 1..=9 {
            for k in 1..n {
                let seen = walk_fixed(n, k);
                let distinct: HashSet<&String> = seen.iter().collect();
                assert_eq!(seen.len() as u128, binomial(n, k), "n={n} k={k}");
                assert_eq!(distinct.len(), seen.len());
            }
        }
    }

    #[test]
    fn degenerate_fixed_inputs_clear_and_stop() {
        let mut full = BitArray::from_bit_str("111");
        assert!(!full.next_combination());
        assert_eq!(full.num_set(), 0);

        let mut empty = BitArray::with_size(5);
        assert!(!empty.next_combination());

        let mut nothing = BitArray::new();
        assert!(!nothing.next_combination());
    }

    #[test]
    fn fixed_order_crosses_words() {
        let mut bits = BitArray::from_indices(40, [31]);
        assert!(bits.next_combination());
        assert_eq!(bits.iter_set_bits().collect::<Vec<_>>(), vec![32]);
    }

    #[test]
    fn depth_first_order_for_three() {
        let seen: Vec<String> = DepthFirstCombinations::new(3, None)
            .map(|bits| bits.to_string())
            .collect();
        assert_eq!(seen, vec!["100", "110", "111", "101", "010", "011", "001"]);
    }

    #[test]
    fn depth_first_respects_max_depth() {
        let seen: Vec<String> = DepthFirstCombinations::new(3, Some(2))
            .map(|bits| bits.to_string())
            .collect();
        assert_eq!(seen, vec!["100", "110", "101", "010", "011", "001"]);

        let singles: Vec<String> = DepthFirstCombinations::new(3, Some(1))
            .map(|bits| bits.to_string())
            .collect();
        assert_eq!(singles, vec!["100", "010", "001"]);
    }

    #[test]
    fn depth_first_zero_depth_or_size_yields_nothing() {
        assert_eq!(DepthFirstCombinations::new(0, None).count(), 0);
        assert_eq!(DepthFirstCombinations::new(4, Some(0)).count(), 0);
    }

    #[test]
    fn combinations_iterator_includes_edge_sizes() {
        assert_eq!(Combinations::new(5, 0).unwrap().count(), 1);
        assert_eq!(Combinations::new(5, 5).unwrap().count(), 1);
        assert_eq!(Combinations::new(6, 3).unwrap().count(), 20);
        assert!(matches!(
            Combinations::new(2, 3),
            Err(Error::CombinationSize { n: 2, k: 3 })
        ));
    }

    #[test]
    fn binomial_values() {
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(40, 20), 137_846_528_820);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(0, 0), 1);
    }
}
