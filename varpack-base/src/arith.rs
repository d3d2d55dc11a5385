// Checked arithmetic used across the codecs. Every overflow becomes an
// ErrorKind::Overflow instead of a wrap or a panic; no codec aborts the
// process.

use crate::{err, ErrorKind, Result};

#[cfg(test)]
use test_log::test;

pub fn checked_add(a: u64, b: u64) -> Result<u64> {
    a.checked_add(b)
        .ok_or_else(|| err(ErrorKind::Overflow, "u64 addition overflow"))
}

pub fn checked_sub(a: u64, b: u64) -> Result<u64> {
    a.checked_sub(b)
        .ok_or_else(|| err(ErrorKind::Overflow, "u64 subtraction underflow"))
}

/// Signed distance `next - prev` between two unsigned values, as consumed
/// by the delta codec. Errors when the distance falls outside i64.
pub fn checked_delta(prev: u64, next: u64) -> Result<i64> {
    if next >= prev {
        let d = next - prev;
        if d > i64::MAX as u64 {
            return Err(err(ErrorKind::Overflow, "delta exceeds i64::MAX"));
        }
        Ok(d as i64)
    } else {
        let d = prev - next;
        // d == 2^63 maps to i64::MIN exactly.
        if d > (i64::MAX as u64) + 1 {
            return Err(err(ErrorKind::Overflow, "delta below i64::MIN"));
        }
        Ok(d.wrapping_neg() as i64)
    }
}

/// Inverse of [`checked_delta`]: reconstruct `prev + d`, erroring when the
/// result leaves the u64 domain.
pub fn apply_delta(prev: u64, d: i64) -> Result<u64> {
    if d >= 0 {
        checked_add(prev, d as u64)
    } else {
        checked_sub(prev, d.unsigned_abs())
    }
}

#[test]
fn test_checked_add_sub() {
    assert_eq!(checked_add(1, 2).unwrap(), 3);
    assert_eq!(
        checked_add(u64::MAX, 1).unwrap_err().kind(),
        ErrorKind::Overflow
    );
    assert_eq!(checked_sub(2, 2).unwrap(), 0);
    assert_eq!(checked_sub(1, 2).unwrap_err().kind(), ErrorKind::Overflow);
}

#[test]
fn test_checked_delta_bounds() {
    assert_eq!(checked_delta(10, 3).unwrap(), -7);
    assert_eq!(checked_delta(3, 10).unwrap(), 7);
    assert_eq!(checked_delta(0, i64::MAX as u64).unwrap(), i64::MAX);
    assert_eq!(checked_delta(1 << 63, 0).unwrap(), i64::MIN);
    assert!(checked_delta(0, u64::MAX).is_err());
    assert!(checked_delta(u64::MAX, 0).is_err());
}

#[test]
fn test_apply_delta_roundtrip() {
    for (prev, next) in [(0u64, 5u64), (5, 0), (1 << 62, 1 << 63), (7, 7)] {
        let d = checked_delta(prev, next).unwrap();
        assert_eq!(apply_delta(prev, d).unwrap(), next);
    }
    assert!(apply_delta(u64::MAX, 1).is_err());
    assert!(apply_delta(0, -1).is_err());
}
