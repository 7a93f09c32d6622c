use bitcomb::BitArray;
use bitcomb::bitops::{WORD_BITS, Word};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::io::{Seek, SeekFrom};

proptest! {
    #[test]
    fn set_then_get(bits in prop::collection::vec(any::<bool>(), 1..300), picks in prop::collection::vec(any::<prop::sample::Index>(), 0..50)) {
        let mut array: BitArray = bits.iter().copied().collect();
        for pick in picks {
            let index = pick.index(bits.len());
            array.set(index);
            prop_assert!(array.get(index));
            array.clear(index);
            prop_assert!(!array.get(index));
        }
    }

    #[test]
    fn cached_count_never_drifts(size in 1..200usize, ops in prop::collection::vec((any::<bool>(), any::<prop::sample::Index>()), 0..200)) {
        let mut array = BitArray::with_size(size);
        let mut expected = BTreeSet::new();
        for (set, pick) in ops {
            let index = pick.index(size);
            if set {
                array.set(index);
                expected.insert(index);
            } else {
                array.clear(index);
                expected.remove(&index);
            }
            prop_assert_eq!(array.num_set(), expected.len());
        }
        prop_assert_eq!(array.popcount_table(), expected.len());
        prop_assert_eq!(array.num_set_range(0, size), expected.len());
    }

    #[test]
    fn masking_recovers_original((a, b) in equal_length_arrays(300)) {
        let recombined = (&a & &b) | &(&a & &!&b);
        prop_assert_eq!(recombined, a);
    }

    #[test]
    fn double_complement_is_identity(a in arbitrary_array(300)) {
        let twice = !!a.clone();
        prop_assert_eq!(twice.num_set(), a.num_set());
        prop_assert_eq!(twice, a);
    }

    #[test]
    fn set_bit_iteration_matches_scan(a in arbitrary_array(500)) {
        let expected: Vec<usize> = (0..a.size()).filter(|&i| a.get(i)).collect();
        let actual: Vec<usize> = a.iter_set_bits().collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn fields_read_back(size in 1..200usize, from in any::<prop::sample::Index>(), width in 0..=WORD_BITS, value in any::<Word>()) {
        let from = from.index(size);
        let mut array = BitArray::with_size(size);
        array.set_field(from, width, value);
        prop_assert!(array.size() >= from + width);
        let mask = if width == WORD_BITS { Word::MAX } else { (1 << width) - 1 };
        prop_assert_eq!(array.get_field(from, width), value & mask);
        prop_assert_eq!(array.num_set(), (value & mask).count_ones() as usize);
    }

    #[test]
    fn append_concatenates(a in arbitrary_array(150), b in arbitrary_array(150)) {
        let mut joined = a.clone();
        joined.append(&b);
        prop_assert_eq!(joined.size(), a.size() + b.size());
        prop_assert_eq!(joined.to_string(), format!("{a}{b}"));
        prop_assert_eq!(joined.num_set(), a.num_set() + b.num_set());
    }

    #[test]
    fn intersects_matches_scan((a, b) in equal_length_arrays(300)) {
        let expected = (0..a.size()).any(|i| a.get(i) && b.get(i));
        prop_assert_eq!(a.intersects(&b), expected);
        let subset = (0..a.size()).all(|i| !a.get(i) || b.get(i));
        prop_assert_eq!(a.is_subset(&b), subset);
        prop_assert_eq!(b.is_superset(&a), subset);
    }

    #[test]
    fn string_form_round_trips(text in "[01]{0,200}") {
        let array = BitArray::from_bit_str(&text);
        prop_assert_eq!(array.size(), text.len());
        prop_assert_eq!(array.to_string(), text);
    }
}

fn arbitrary_array(max_length: usize) -> impl Strategy<Value = BitArray<'static>> {
    prop::collection::vec(any::<bool>(), 0..max_length).prop_map(BitArray::from_iter)
}

fn equal_length_arrays(max_length: usize) -> impl Strategy<Value = (BitArray<'static>, BitArray<'static>)> {
    (0..max_length).prop_flat_map(|length| {
        (
            prop::collection::vec(any::<bool>(), length).prop_map(BitArray::from_iter),
            prop::collection::vec(any::<bool>(), length).prop_map(BitArray::from_iter),
        )
    })
}

#[test]
fn string_scenario_with_append() {
    let mut bits = BitArray::from_bit_str("01101001");
    assert!(bits.get(1));
    assert_eq!(bits.num_set(), 4);
    bits <<= &BitArray::from_bit_str("1111");
    assert_eq!(bits.size(), 12);
    assert!((8..12).all(|i| bits.get(i)));
    assert_eq!(bits.num_set(), 8);
}

#[test]
fn growth_scenario() {
    let mut bits = BitArray::from_bit_str("1010");
    bits.grow(10, true);
    assert_eq!(
        (0..4).map(|i| bits.get(i)).collect::<Vec<_>>(),
        vec![true, false, true, false]
    );
    assert!((4..10).all(|i| !bits.get(i)));
}

#[test]
fn iteration_scenario() {
    let bits = BitArray::from_indices(64, [2, 5, 31, 32, 63]);
    assert_eq!(bits.iter_set_bits().collect::<Vec<_>>(), vec![2, 5, 31, 32, 63]);
}

#[test]
fn ordered_and_hashed_containers_use_content() {
    let mut ordered = BTreeSet::new();
    ordered.insert(BitArray::from_bit_str("01"));
    ordered.insert(BitArray::from_bit_str("011"));
    ordered.insert(BitArray::from_bit_str("10"));
    ordered.insert(BitArray::from_bit_str("10"));
    let listed: Vec<String> = ordered.iter().map(ToString::to_string).collect();
    assert_eq!(listed, vec!["011", "10", "01"]);

    let hashed: HashSet<BitArray> = ["0110", "0110", "1001"].into_iter().map(BitArray::from).collect();
    assert_eq!(hashed.len(), 2);
}

#[test]
fn binary_dump_through_a_file() {
    let bits = BitArray::from_indices(37, [0, 8, 36]);
    let mut file = tempfile::tempfile().unwrap();
    bits.write_to(&mut file).unwrap();
    assert_eq!(file.metadata().unwrap().len(), 5);

    file.seek(SeekFrom::Start(0)).unwrap();
    let read = BitArray::from_reader(&mut file, 37).unwrap();
    assert_eq!(read, bits);

    // A mismatched size is not detected, only misread.
    file.seek(SeekFrom::Start(0)).unwrap();
    let short = BitArray::from_reader(&mut file, 9).unwrap();
    assert_eq!(short.to_string(), "100000001");
}

#[test]
fn raw_word_constructors() {
    let copied = BitArray::from_words(&[0x8000_0001, 0x1], 33);
    assert_eq!(copied.iter_set_bits().collect::<Vec<_>>(), vec![0, 31, 32]);
    assert!(!copied.is_borrowed());

    let mut buffer = [0 as Word; 4];
    let mut borrowed = BitArray::from_words_mut(&mut buffer, 100);
    borrowed.set_field(60, 8, 0xFF);
    let owned = borrowed.to_owned_array();
    drop(borrowed);
    assert_eq!(buffer[1], 0xF000_0000);
    assert_eq!(buffer[2], 0xF);
    assert_eq!(owned.num_set(), 8);
}
