// Frame-of-reference codec for clustered sequences: a Tagged minimum, a
// one-byte offset width, a Tagged count, then count fixed-width External
// offsets from the minimum. Fixed-width offsets buy O(1) random access
// into the encoded bytes: element i sits at header_len + i * offset_width.

use varpack_base::{checked_add, err, ErrorKind, Result};
use varpack_vint::{external, tagged};

/// Decoded view of a FOR header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForHeader {
    pub min: u64,
    pub offset_width: usize,
    pub count: u64,
    pub header_len: usize,
}

fn select_width(vals: &[u64]) -> (u64, usize) {
    let min = vals.iter().copied().min().unwrap_or(0);
    let max = vals.iter().copied().max().unwrap_or(0);
    // All-equal input degenerates to width 1 with zero offsets; that is
    // the canonical form, there is no width-0 encoding.
    (min, external::width_of_unsigned(max - min))
}

/// Exact encoded size of `vals` under [`put`].
pub fn encoded_len(vals: &[u64]) -> usize {
    let (min, offset_width) = select_width(vals);
    tagged::width_of(min) + 1 + tagged::width_of(vals.len() as u64) + vals.len() * offset_width
}

pub fn put(vals: &[u64], dst: &mut [u8]) -> Result<usize> {
    let (min, offset_width) = select_width(vals);
    let mut at = tagged::put(dst, min)?;
    if dst.len() < at + 1 {
        return Err(err(ErrorKind::BufferTooSmall, "no room for offset width"));
    }
    dst[at] = offset_width as u8;
    at += 1;
    at += tagged::put(&mut dst[at..], vals.len() as u64)?;
    for &v in vals {
        at += external::put_fixed(&mut dst[at..], v - min, offset_width)?;
    }
    Ok(at)
}

/// Parse the header at the front of `src`.
pub fn header(src: &[u8]) -> Result<ForHeader> {
    let (min, min_len) =
        tagged::get(src).ok_or_else(|| err(ErrorKind::BufferTooSmall, "short FOR minimum"))?;
    let offset_width = *src
        .get(min_len)
        .ok_or_else(|| err(ErrorKind::BufferTooSmall, "short FOR offset width"))? as usize;
    if offset_width == 0 || offset_width > external::MAX_WIDTH {
        return Err(err(ErrorKind::InvalidWidth, "FOR offset width not in 1..=8"));
    }
    let (count, count_len) = tagged::get(&src[min_len + 1..])
        .ok_or_else(|| err(ErrorKind::BufferTooSmall, "short FOR count"))?;
    Ok(ForHeader {
        min,
        offset_width,
        count,
        header_len: min_len + 1 + count_len,
    })
}

/// Random access into the encoded form without touching other elements.
pub fn get_at(src: &[u8], i: usize) -> Result<u64> {
    let h = header(src)?;
    if (i as u64) >= h.count {
        return Err(err(ErrorKind::ValueOutOfRange, "FOR index past count"));
    }
    let at = h.header_len + i * h.offset_width;
    if src.len() < at + h.offset_width {
        return Err(err(ErrorKind::BufferTooSmall, "FOR payload truncated"));
    }
    let off = external::get_fixed(&src[at..], h.offset_width)?;
    checked_add(h.min, off)
}

/// Decode the whole sequence; returns the values and the bytes consumed.
pub fn get_all(src: &[u8]) -> Result<(Vec<u64>, usize)> {
    let h = header(src)?;
    let count = h.count as usize;
    let payload = count
        .checked_mul(h.offset_width)
        .ok_or_else(|| err(ErrorKind::Overflow, "FOR payload size overflow"))?;
    if src.len() < h.header_len + payload {
        return Err(err(ErrorKind::BufferTooSmall, "FOR payload truncated"));
    }
    let mut out = Vec::with_capacity(count);
    let mut at = h.header_len;
    for _ in 0..count {
        let off = external::get_fixed(&src[at..], h.offset_width)?;
        out.push(checked_add(h.min, off)?);
        at += h.offset_width;
    }
    Ok((out, at))
}
