// Pattern and key grammar. Segments are separated by `.`; a segment is
// `*`, `#`, or 1..=63 bytes of [A-Za-z0-9_-]. A whole pattern is at most
// 255 bytes. The empty pattern is legal and degenerate: it names the root
// itself and parses to zero segments.

use memchr::memchr;
use varpack_base::{err, ErrorKind, Result};

pub const MAX_SEGMENT_LEN: usize = 63;
pub const MAX_PATTERN_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SegmentKind {
    Literal,
    Star,
    Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Segment {
    pub(crate) kind: SegmentKind,
    pub(crate) text: Vec<u8>,
}

pub(crate) fn literal_byte_ok(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn split_segments(input: &[u8]) -> impl Iterator<Item = &[u8]> + '_ {
    let mut rest = Some(input);
    std::iter::from_fn(move || {
        let cur = rest?;
        match memchr(b'.', cur) {
            Some(dot) => {
                rest = Some(&cur[dot + 1..]);
                Some(&cur[..dot])
            }
            None => {
                rest = None;
                Some(cur)
            }
        }
    })
}

/// Parse a subscription pattern. Grammar violations are InvalidFormat.
pub(crate) fn parse_pattern(input: &str) -> Result<Vec<Segment>> {
    let bytes = input.as_bytes();
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    if bytes.len() > MAX_PATTERN_LEN {
        return Err(err(ErrorKind::InvalidFormat, "pattern longer than 255 bytes"));
    }
    let mut segs = Vec::new();
    for raw in split_segments(bytes) {
        let seg = match raw {
            b"" => return Err(err(ErrorKind::InvalidFormat, "empty pattern segment")),
            b"*" => Segment {
                kind: SegmentKind::Star,
                text: raw.to_vec(),
            },
            b"#" => Segment {
                kind: SegmentKind::Hash,
                text: raw.to_vec(),
            },
            _ => {
                if raw.len() > MAX_SEGMENT_LEN {
                    return Err(err(ErrorKind::InvalidFormat, "segment longer than 63 bytes"));
                }
                if !raw.iter().copied().all(literal_byte_ok) {
                    return Err(err(
                        ErrorKind::InvalidFormat,
                        "segment byte outside [A-Za-z0-9_-]",
                    ));
                }
                Segment {
                    kind: SegmentKind::Literal,
                    text: raw.to_vec(),
                }
            }
        };
        segs.push(seg);
    }
    Ok(segs)
}

/// Parse a concrete routing key: literal segments only. Returns None on
/// any grammar violation; the match collector turns that into an empty
/// result rather than an error.
pub(crate) fn parse_key(input: &str) -> Option<Vec<&[u8]>> {
    let bytes = input.as_bytes();
    if bytes.is_empty() {
        return Some(Vec::new());
    }
    if bytes.len() > MAX_PATTERN_LEN {
        return None;
    }
    let mut segs = Vec::new();
    for raw in split_segments(bytes) {
        if raw.is_empty() || raw.len() > MAX_SEGMENT_LEN {
            return None;
        }
        if !raw.iter().copied().all(literal_byte_ok) {
            return None;
        }
        segs.push(raw);
    }
    Some(segs)
}
