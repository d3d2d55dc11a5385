// Externally-tagged fixed-width codec. The width never appears in the
// byte stream; both sides carry it out of band, usually in an enclosing
// header byte. Payloads are little-endian on every host: the to_le_bytes
// path is a plain store on little-endian targets and a byte-reversed
// store on big-endian ones.

use varpack_base::{err, ErrorKind, Result};

/// Widths are byte counts in 1..=8.
pub const MAX_WIDTH: usize = 8;

/// Smallest width in 1..=8 such that `v < 2^(8 * width)`. Zero still takes
/// one byte.
pub fn width_of_unsigned(v: u64) -> usize {
    let bits = 64 - v.leading_zeros() as usize;
    bits.div_ceil(8).max(1)
}

/// Write the low `width` bytes of `v` into the front of `dst`,
/// little-endian. Callers size `width` with [`width_of_unsigned`]; higher
/// bytes of `v` do not travel.
pub fn put_fixed(dst: &mut [u8], v: u64, width: usize) -> Result<usize> {
    if width == 0 || width > MAX_WIDTH {
        return Err(err(ErrorKind::InvalidWidth, "external width not in 1..=8"));
    }
    if dst.len() < width {
        return Err(err(ErrorKind::BufferTooSmall, "external encoding needs width bytes"));
    }
    dst[..width].copy_from_slice(&v.to_le_bytes()[..width]);
    Ok(width)
}

/// Read `width` little-endian bytes from the front of `src`.
pub fn get_fixed(src: &[u8], width: usize) -> Result<u64> {
    if width == 0 || width > MAX_WIDTH {
        return Err(err(ErrorKind::InvalidWidth, "external width not in 1..=8"));
    }
    if src.len() < width {
        return Err(err(ErrorKind::BufferTooSmall, "external decoding needs width bytes"));
    }
    let mut le = [0u8; 8];
    le[..width].copy_from_slice(&src[..width]);
    Ok(u64::from_le_bytes(le))
}

/// Signed convenience over [`put_fixed`]. Negative values are a caller
/// error; there is no sign bit in this format.
pub fn put_fixed_signed(dst: &mut [u8], v: i64, width: usize) -> Result<usize> {
    if v < 0 {
        return Err(err(
            ErrorKind::ValueOutOfRange,
            "negative value in external encoding",
        ));
    }
    put_fixed(dst, v as u64, width)
}

/// Signed convenience over [`get_fixed`]; rejects payloads above i64::MAX.
pub fn get_fixed_signed(src: &[u8], width: usize) -> Result<i64> {
    let v = get_fixed(src, width)?;
    if v > i64::MAX as u64 {
        return Err(err(
            ErrorKind::ValueOutOfRange,
            "external payload exceeds i64::MAX",
        ));
    }
    Ok(v as i64)
}
