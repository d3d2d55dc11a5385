// Self-describing codec whose encoded strings sort byte-lexicographically
// in the same order as their values; that property is the reason this
// codec exists, so payload bytes are big-endian. The lead byte alone
// fixes the length:
//
//   lead 0..=240          1 byte   value = lead
//   lead 241..=248        2 bytes  value = (lead-241)*256 + b1 + 240
//   lead 249              3 bytes  value = b1*256 + b2 + 2288
//   lead 250              4 bytes  3-byte big-endian payload
//   lead 251..=255        lead-246 bytes total, big-endian payload
//
// The cumulative band offsets (240, 2288) keep the bands contiguous: each
// band starts exactly one past the previous band's maximum.

use varpack_base::{checked_add, err, ErrorKind, Result};

pub const MAX_LEN: usize = 9;

const BAND1_MAX: u64 = 240;
const BAND2_MAX: u64 = 2_287;
const BAND3_MAX: u64 = 67_823;
const BAND2_OFFSET: u64 = 240;
const BAND3_OFFSET: u64 = 2_288;

/// Encoded length of `v`, 1..=9.
pub fn width_of(v: u64) -> usize {
    if v <= BAND1_MAX {
        1
    } else if v <= BAND2_MAX {
        2
    } else if v <= BAND3_MAX {
        3
    } else {
        // Lead 247+n introduces an n-byte big-endian payload, n in 3..=8.
        let payload = crate::external::width_of_unsigned(v).max(3);
        1 + payload
    }
}

/// Total encoded length implied by a lead byte. Pure function of the first
/// byte; never reads further.
pub fn length_of_lead(lead: u8) -> usize {
    match lead {
        0..=240 => 1,
        241..=248 => 2,
        249 => 3,
        250 => 4,
        _ => lead as usize - 246,
    }
}

pub fn put(dst: &mut [u8], v: u64) -> Result<usize> {
    let w = width_of(v);
    if dst.len() < w {
        return Err(err(ErrorKind::BufferTooSmall, "tagged encoding needs more room"));
    }
    match w {
        1 => dst[0] = v as u8,
        2 => {
            let r = v - BAND2_OFFSET;
            dst[0] = 241 + (r >> 8) as u8;
            dst[1] = (r & 0xff) as u8;
        }
        3 => {
            let r = v - BAND3_OFFSET;
            dst[0] = 249;
            dst[1] = (r >> 8) as u8;
            dst[2] = (r & 0xff) as u8;
        }
        _ => {
            let payload = w - 1;
            dst[0] = (247 + payload) as u8;
            dst[1..w].copy_from_slice(&v.to_be_bytes()[8 - payload..]);
        }
    }
    Ok(w)
}

pub fn get(src: &[u8]) -> Option<(u64, usize)> {
    let lead = *src.first()?;
    let len = length_of_lead(lead);
    if src.len() < len {
        return None;
    }
    let v = match lead {
        0..=240 => lead as u64,
        241..=248 => (lead as u64 - 241) * 256 + src[1] as u64 + BAND2_OFFSET,
        249 => (src[1] as u64) * 256 + src[2] as u64 + BAND3_OFFSET,
        _ => {
            let payload = len - 1;
            let mut be = [0u8; 8];
            be[8 - payload..].copy_from_slice(&src[1..len]);
            u64::from_be_bytes(be)
        }
    };
    Some((v, len))
}

/// Add `delta` to the tagged value at the front of `buf`, re-encoding in
/// place when the sum still fits the existing width. A sum that needs a
/// wider band (or leaves u64) is reported as Overflow and the buffer is
/// left untouched.
pub fn add_in_place(buf: &mut [u8], delta: u64) -> Result<usize> {
    let (v, len) = get(buf).ok_or_else(|| err(ErrorKind::BufferTooSmall, "short tagged value"))?;
    let sum = checked_add(v, delta)?;
    if width_of(sum) != len {
        return Err(err(ErrorKind::Overflow, "sum outgrows the encoded tagged width"));
    }
    put(&mut buf[..len], sum)
}
