// Delta sequence codec. The first element travels whole; every later
// element travels as a ZigZag-folded difference from its predecessor, so
// slowly-moving sequences spend one or two bytes per element. Each field
// is a width byte followed by that many External bytes; the element count
// does not travel and stays with the caller.

use varpack_base::{apply_delta, checked_delta, err, ErrorKind, Result};
use varpack_vint::external;

/// Interleave signed values onto the unsigned line: 0, -1, 1, -2, 2...
/// Small magnitudes of either sign get small images.
#[inline]
pub fn zigzag(d: i64) -> u64 {
    ((d << 1) ^ (d >> 63)) as u64
}

#[inline]
pub fn unzigzag(z: u64) -> i64 {
    ((z >> 1) as i64) ^ -((z & 1) as i64)
}

fn put_field(dst: &mut [u8], v: u64) -> Result<usize> {
    let width = external::width_of_unsigned(v);
    if dst.len() < 1 + width {
        return Err(err(ErrorKind::BufferTooSmall, "no room for delta field"));
    }
    dst[0] = width as u8;
    external::put_fixed(&mut dst[1..], v, width)?;
    Ok(1 + width)
}

fn get_field(src: &[u8]) -> Result<(u64, usize)> {
    if src.is_empty() {
        return Err(err(ErrorKind::BufferTooSmall, "no room for width byte"));
    }
    let width = src[0] as usize;
    let v = external::get_fixed(&src[1..], width)?;
    Ok((v, 1 + width))
}

/// Exact encoded size of `vals` under [`put_u64`].
pub fn encoded_len_u64(vals: &[u64]) -> usize {
    let mut len = 0;
    let mut prev = 0;
    for (i, &v) in vals.iter().enumerate() {
        let field = if i == 0 {
            v
        } else {
            match checked_delta(prev, v) {
                Ok(d) => zigzag(d),
                // Sizing is an estimate for inputs put_u64 will reject.
                Err(_) => u64::MAX,
            }
        };
        len += 1 + external::width_of_unsigned(field);
        prev = v;
    }
    len
}

pub fn encoded_len_i64(vals: &[i64]) -> usize {
    let mut len = 0;
    let mut prev = 0;
    for (i, &v) in vals.iter().enumerate() {
        let field = if i == 0 { zigzag(v) } else { zigzag(v.wrapping_sub(prev)) };
        len += 1 + external::width_of_unsigned(field);
        prev = v;
    }
    len
}

/// Encode an unsigned sequence: `v0` whole, then ZigZag deltas (which may
/// be negative when the sequence decreases). Consecutive values farther
/// than i64 apart are Overflow.
pub fn put_u64(vals: &[u64], dst: &mut [u8]) -> Result<usize> {
    let mut at = 0;
    let mut prev = 0;
    for (i, &v) in vals.iter().enumerate() {
        let field = if i == 0 {
            v
        } else {
            zigzag(checked_delta(prev, v)?)
        };
        at += put_field(&mut dst[at..], field)?;
        prev = v;
    }
    Ok(at)
}

/// Decode `count` elements written by [`put_u64`]; returns the values and
/// the bytes consumed. Decoding is strictly sequential; a reconstruction
/// that leaves u64 is Overflow.
pub fn get_u64(src: &[u8], count: usize) -> Result<(Vec<u64>, usize)> {
    let mut out = Vec::with_capacity(count);
    let mut at = 0;
    for i in 0..count {
        let (field, used) = get_field(&src[at..])?;
        at += used;
        let v = if i == 0 {
            field
        } else {
            apply_delta(out[i - 1], unzigzag(field))?
        };
        out.push(v);
    }
    Ok((out, at))
}

/// Signed variant: the base value is ZigZag-folded too, so small negative
/// bases stay small on the wire. Deltas wrap within i64, which loses
/// nothing: unzigzag of the wrapped image re-wraps to the original value.
pub fn put_i64(vals: &[i64], dst: &mut [u8]) -> Result<usize> {
    let mut at = 0;
    let mut prev = 0;
    for (i, &v) in vals.iter().enumerate() {
        let field = if i == 0 { zigzag(v) } else { zigzag(v.wrapping_sub(prev)) };
        at += put_field(&mut dst[at..], field)?;
        prev = v;
    }
    Ok(at)
}

pub fn get_i64(src: &[u8], count: usize) -> Result<(Vec<i64>, usize)> {
    let mut out: Vec<i64> = Vec::with_capacity(count);
    let mut at = 0;
    for i in 0..count {
        let (field, used) = get_field(&src[at..])?;
        at += used;
        let v = if i == 0 {
            unzigzag(field)
        } else {
            out[i - 1].wrapping_add(unzigzag(field))
        };
        out.push(v);
    }
    Ok((out, at))
}
