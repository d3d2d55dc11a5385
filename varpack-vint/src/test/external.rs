use crate::external::{
    get_fixed, get_fixed_signed, put_fixed, put_fixed_signed, width_of_unsigned,
};
use test_log::test;
use varpack_base::ErrorKind;

#[test]
fn test_width_of_unsigned_boundaries() {
    assert_eq!(width_of_unsigned(0), 1);
    assert_eq!(width_of_unsigned(0xff), 1);
    assert_eq!(width_of_unsigned(0x100), 2);
    assert_eq!(width_of_unsigned(0xffff), 2);
    assert_eq!(width_of_unsigned(0x1_0000), 3);
    assert_eq!(width_of_unsigned((1 << 56) - 1), 7);
    assert_eq!(width_of_unsigned(1 << 56), 8);
    assert_eq!(width_of_unsigned(u64::MAX), 8);
}

#[test]
fn test_little_endian_layout() {
    let mut buf = [0u8; 4];
    put_fixed(&mut buf, 0x0102_0304, 4).unwrap();
    assert_eq!(buf, [4, 3, 2, 1]);
    assert_eq!(get_fixed(&buf, 4).unwrap(), 0x0102_0304);
}

#[test]
fn test_roundtrip_all_widths() {
    let mut state = 7;
    for _ in 0..100 {
        let v = super::lcg_step(&mut state);
        for width in 1..=8usize {
            let masked = if width == 8 { v } else { v & ((1u64 << (8 * width)) - 1) };
            let mut buf = [0u8; 8];
            assert_eq!(put_fixed(&mut buf, masked, width).unwrap(), width);
            assert_eq!(get_fixed(&buf, width).unwrap(), masked);
        }
    }
}

#[test]
fn test_only_low_bytes_travel() {
    let mut buf = [0u8; 2];
    put_fixed(&mut buf, 0xAABB_CCDD, 2).unwrap();
    assert_eq!(get_fixed(&buf, 2).unwrap(), 0xCCDD);
}

#[test]
fn test_width_errors() {
    let mut buf = [0u8; 16];
    assert_eq!(
        put_fixed(&mut buf, 1, 0).unwrap_err().kind(),
        ErrorKind::InvalidWidth
    );
    assert_eq!(
        put_fixed(&mut buf, 1, 9).unwrap_err().kind(),
        ErrorKind::InvalidWidth
    );
    assert_eq!(get_fixed(&buf, 0).unwrap_err().kind(), ErrorKind::InvalidWidth);
    assert_eq!(get_fixed(&buf, 9).unwrap_err().kind(), ErrorKind::InvalidWidth);
}

#[test]
fn test_short_buffers() {
    let mut buf = [0u8; 3];
    assert_eq!(
        put_fixed(&mut buf, 1, 4).unwrap_err().kind(),
        ErrorKind::BufferTooSmall
    );
    assert_eq!(
        get_fixed(&buf, 4).unwrap_err().kind(),
        ErrorKind::BufferTooSmall
    );
}

#[test]
fn test_signed_rejects_negative() {
    let mut buf = [0u8; 8];
    assert_eq!(
        put_fixed_signed(&mut buf, -1, 8).unwrap_err().kind(),
        ErrorKind::ValueOutOfRange
    );
    assert_eq!(put_fixed_signed(&mut buf, i64::MAX, 8).unwrap(), 8);
    assert_eq!(get_fixed_signed(&buf, 8).unwrap(), i64::MAX);
    put_fixed(&mut buf, u64::MAX, 8).unwrap();
    assert_eq!(
        get_fixed_signed(&buf, 8).unwrap_err().kind(),
        ErrorKind::ValueOutOfRange
    );
}
