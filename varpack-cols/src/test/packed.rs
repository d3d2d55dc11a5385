use crate::Packed;
use test_log::test;
use varpack_base::ErrorKind;

#[test]
fn test_twelve_bit_store() {
    // Three 12-bit writes into a zeroed store; untouched elements still
    // read zero afterward.
    let mut p: Packed<u16> = Packed::zeroed(12, 12).unwrap();
    p.set(0, 0xABC).unwrap();
    p.set(1, 0x123).unwrap();
    p.set(2, 0xFFF).unwrap();
    assert_eq!(p.get(0), 0xABC);
    assert_eq!(p.get(1), 0x123);
    assert_eq!(p.get(2), 0xFFF);
    assert_eq!(p.get(3), 0);
    assert_eq!(p.get(11), 0);
}

#[test]
fn test_disjoint_writes_random_sweep() {
    let mut p: Packed<u8> = Packed::zeroed(5, 100).unwrap();
    let mut mirror = [0u64; 100];
    let mut state = 11;
    for _ in 0..2000 {
        let i = (super::lcg_step(&mut state) % 100) as usize;
        let v = super::lcg_step(&mut state) & 0x1F;
        p.set(i, v).unwrap();
        mirror[i] = v;
    }
    for (i, &want) in mirror.iter().enumerate() {
        assert_eq!(p.get(i), want, "i={}", i);
    }
}

#[test]
fn test_set_value_out_of_range() {
    let mut p: Packed<u32> = Packed::zeroed(4, 8).unwrap();
    assert_eq!(p.set(0, 16).unwrap_err().kind(), ErrorKind::ValueOutOfRange);
    assert_eq!(p.get(0), 0);
    assert_eq!(p.max_value(), 15);
}

#[test]
fn test_invalid_widths() {
    assert_eq!(
        Packed::<u8>::new(9).unwrap_err().kind(),
        ErrorKind::InvalidWidth
    );
    assert_eq!(
        Packed::<u64>::new(0).unwrap_err().kind(),
        ErrorKind::InvalidWidth
    );
    assert!(Packed::<u64>::new(64).is_ok());
}

#[test]
fn test_append_and_iter() {
    let mut p: Packed<u16> = Packed::new(12).unwrap();
    for v in [0xABCu64, 0x123, 0xFFF, 0] {
        p.append(v).unwrap();
    }
    assert_eq!(p.len(), 4);
    assert_eq!(p.iter().collect::<Vec<_>>(), vec![0xABC, 0x123, 0xFFF, 0]);
}

#[test]
fn test_insert_shifts_tail() {
    let mut p: Packed<u16> = Packed::new(12).unwrap();
    for v in [10u64, 30, 40] {
        p.append(v).unwrap();
    }
    p.insert(1, 20).unwrap();
    assert_eq!(p.iter().collect::<Vec<_>>(), vec![10, 20, 30, 40]);
    p.insert(0, 5).unwrap();
    p.insert(5, 50).unwrap();
    assert_eq!(p.iter().collect::<Vec<_>>(), vec![5, 10, 20, 30, 40, 50]);
}

#[test]
fn test_remove_shifts_tail() {
    let mut p: Packed<u8> = Packed::new(7).unwrap();
    for v in [1u64, 2, 3, 4, 5] {
        p.append(v).unwrap();
    }
    assert_eq!(p.remove(1), 2);
    assert_eq!(p.iter().collect::<Vec<_>>(), vec![1, 3, 4, 5]);
    assert_eq!(p.remove(3), 5);
    assert_eq!(p.iter().collect::<Vec<_>>(), vec![1, 3, 4]);
    assert_eq!(p.remove(0), 1);
    assert_eq!(p.remove(0), 3);
    assert_eq!(p.remove(0), 4);
    assert!(p.is_empty());
}

#[test]
fn test_remove_then_append_matches_fresh_array() {
    // The vacated cell is scrubbed, so history does not leak into
    // equality.
    let mut a: Packed<u8> = Packed::new(3).unwrap();
    for v in [7u64, 6, 5] {
        a.append(v).unwrap();
    }
    a.remove(2);
    let mut b: Packed<u8> = Packed::new(3).unwrap();
    for v in [7u64, 6] {
        b.append(v).unwrap();
    }
    assert_eq!(a, b);
}

#[test]
fn test_binary_search_leftmost() {
    let mut p: Packed<u32> = Packed::new(10).unwrap();
    for v in [2u64, 4, 4, 4, 9, 12] {
        p.append(v).unwrap();
    }
    assert_eq!(p.binary_search(0), 0);
    assert_eq!(p.binary_search(2), 0);
    assert_eq!(p.binary_search(3), 1);
    assert_eq!(p.binary_search(4), 1);
    assert_eq!(p.binary_search(5), 4);
    assert_eq!(p.binary_search(12), 5);
    assert_eq!(p.binary_search(13), 6);
}

#[test]
fn test_insert_sorted_random_sweep() {
    let mut p: Packed<u64> = Packed::new(33).unwrap();
    let mut mirror = Vec::new();
    let mut state = 13;
    for _ in 0..200 {
        let v = super::lcg_step(&mut state) & ((1u64 << 33) - 1);
        let i = p.insert_sorted(v).unwrap();
        let j = mirror.partition_point(|&x| x < v);
        mirror.insert(j, v);
        assert_eq!(i, j);
    }
    assert_eq!(p.iter().collect::<Vec<_>>(), mirror);
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_get_past_len_panics() {
    let p: Packed<u8> = Packed::zeroed(4, 2).unwrap();
    p.get(2);
}
