use crate::for_codec::{encoded_len, get_all, get_at, header, put};
use test_log::test;
use varpack_base::ErrorKind;

#[test]
fn test_clustered_run() {
    // 100 values clustered within 100 of the minimum: single-byte
    // offsets, and the whole encoding stays comfortably small.
    let vals: Vec<u64> = (0..100).map(|i| 1_000_000 + i).collect();
    let mut buf = vec![0u8; encoded_len(&vals)];
    let n = put(&vals, &mut buf).unwrap();
    assert_eq!(n, buf.len());
    assert!(n <= 120, "encoded {} bytes", n);

    let h = header(&buf).unwrap();
    assert_eq!(h.min, 1_000_000);
    assert_eq!(h.offset_width, 1);
    assert_eq!(h.count, 100);

    assert_eq!(get_at(&buf, 0).unwrap(), 1_000_000);
    assert_eq!(get_at(&buf, 42).unwrap(), 1_000_042);
    assert_eq!(get_at(&buf, 99).unwrap(), 1_000_099);

    let (out, used) = get_all(&buf).unwrap();
    assert_eq!(out, vals);
    assert_eq!(used, n);
}

#[test]
fn test_all_equal_degenerates_to_width_one() {
    let vals = [7_777u64; 9];
    let mut buf = vec![0u8; encoded_len(&vals)];
    let n = put(&vals, &mut buf).unwrap();
    let h = header(&buf).unwrap();
    assert_eq!(h.offset_width, 1);
    // Zero-valued offsets on the wire.
    assert!(buf[h.header_len..n].iter().all(|&b| b == 0));
    let (out, _) = get_all(&buf).unwrap();
    assert_eq!(out, vals);
}

#[test]
fn test_empty_sequence() {
    let vals: [u64; 0] = [];
    let mut buf = vec![0u8; encoded_len(&vals)];
    let n = put(&vals, &mut buf).unwrap();
    let (out, used) = get_all(&buf[..n]).unwrap();
    assert!(out.is_empty());
    assert_eq!(used, n);
    assert_eq!(get_at(&buf, 0).unwrap_err().kind(), ErrorKind::ValueOutOfRange);
}

#[test]
fn test_wide_spread_random_sweep() {
    let mut state = 29;
    for _ in 0..50 {
        let base = super::spread(&mut state) >> 1;
        let len = 1 + (super::lcg_step(&mut state) % 40) as usize;
        let vals: Vec<u64> = (0..len)
            .map(|_| base + (super::spread(&mut state) >> 8))
            .collect();
        let mut buf = vec![0u8; encoded_len(&vals)];
        let n = put(&vals, &mut buf).unwrap();
        assert_eq!(n, buf.len());
        for (i, &v) in vals.iter().enumerate() {
            assert_eq!(get_at(&buf, i).unwrap(), v);
        }
        let (out, used) = get_all(&buf).unwrap();
        assert_eq!(out, vals);
        assert_eq!(used, n);
    }
}

#[test]
fn test_index_past_count() {
    let vals = [5u64, 6, 7];
    let mut buf = vec![0u8; encoded_len(&vals)];
    put(&vals, &mut buf).unwrap();
    assert_eq!(get_at(&buf, 3).unwrap_err().kind(), ErrorKind::ValueOutOfRange);
}

#[test]
fn test_malformed_headers() {
    assert_eq!(header(&[]).unwrap_err().kind(), ErrorKind::BufferTooSmall);
    // min=0 then an offset-width byte out of range.
    assert_eq!(header(&[0, 0, 1]).unwrap_err().kind(), ErrorKind::InvalidWidth);
    assert_eq!(header(&[0, 9, 1]).unwrap_err().kind(), ErrorKind::InvalidWidth);
    // Valid header claiming more payload than the buffer holds.
    let vals = [10u64, 20, 30];
    let mut buf = vec![0u8; encoded_len(&vals)];
    let n = put(&vals, &mut buf).unwrap();
    assert_eq!(
        get_all(&buf[..n - 1]).unwrap_err().kind(),
        ErrorKind::BufferTooSmall
    );
}

#[test]
fn test_short_output_buffer() {
    let vals = [1u64, 2, 3];
    let mut buf = [0u8; 4];
    assert_eq!(put(&vals, &mut buf).unwrap_err().kind(), ErrorKind::BufferTooSmall);
}
