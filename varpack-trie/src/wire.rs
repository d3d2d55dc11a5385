// Self-describing envelope:
//
//   "TRIE"            4 bytes magic
//   version           1 byte (currently 1)
//   pattern count     Tagged
//   node count        Tagged
//   subscriber count  Tagged
//   <node>            recursive, root first
//
// and each <node>:
//
//   flags             1 byte: bit 0 terminal, bits 1-2 kind, bits 3-7
//                     reserved (writers zero them, readers ignore them)
//   segment length    Tagged, then that many raw bytes
//   subscriber count  Tagged, then per subscriber:
//                       id Tagged, name length Tagged, raw name bytes
//   child count       Tagged, then each child <node>
//
// The decoder cross-checks the envelope counters against the tree it
// parsed; a disagreement is structural corruption, not a tolerable
// variation.

use tracing::trace;
use varpack_base::{err, ErrorKind, Result};
use varpack_vint::tagged;

use crate::pattern::{literal_byte_ok, SegmentKind, MAX_SEGMENT_LEN};
use crate::trie::{Node, PatternTrie, Subscriber};

pub(crate) const MAGIC: [u8; 4] = *b"TRIE";
pub(crate) const VERSION: u8 = 1;

// Deepest node chain any 255-byte pattern can create: 128 segments below
// the root.
const MAX_DEPTH: usize = 128;

const FLAG_TERMINAL: u8 = 0b0000_0001;
const KIND_SHIFT: u32 = 1;
const KIND_MASK: u8 = 0b0000_0110;

fn kind_to_bits(kind: SegmentKind) -> u8 {
    match kind {
        SegmentKind::Literal => 0,
        SegmentKind::Star => 1,
        SegmentKind::Hash => 2,
    }
}

fn kind_from_bits(bits: u8) -> Result<SegmentKind> {
    match bits {
        0 => Ok(SegmentKind::Literal),
        1 => Ok(SegmentKind::Star),
        2 => Ok(SegmentKind::Hash),
        _ => Err(err(ErrorKind::InvalidFormat, "reserved node kind")),
    }
}

struct Cursor<'b> {
    buf: &'b [u8],
    at: usize,
}

impl<'b> Cursor<'b> {
    fn take(&mut self, n: usize) -> Result<&'b [u8]> {
        if self.buf.len() - self.at < n {
            return Err(err(ErrorKind::BufferTooSmall, "trie envelope truncated"));
        }
        let out = &self.buf[self.at..self.at + n];
        self.at += n;
        Ok(out)
    }

    fn take_tagged(&mut self) -> Result<u64> {
        let (v, used) = tagged::get(&self.buf[self.at..])
            .ok_or_else(|| err(ErrorKind::BufferTooSmall, "trie envelope truncated"))?;
        self.at += used;
        Ok(v)
    }
}

fn put_tagged(dst: &mut [u8], at: &mut usize, v: u64) -> Result<()> {
    *at += tagged::put(&mut dst[*at..], v)?;
    Ok(())
}

fn put_raw(dst: &mut [u8], at: &mut usize, bytes: &[u8]) -> Result<()> {
    if dst.len() - *at < bytes.len() {
        return Err(err(ErrorKind::BufferTooSmall, "no room for trie bytes"));
    }
    dst[*at..*at + bytes.len()].copy_from_slice(bytes);
    *at += bytes.len();
    Ok(())
}

fn node_len(node: &Node) -> usize {
    let mut len = 1 + tagged::width_of(node.segment.len() as u64) + node.segment.len();
    len += tagged::width_of(node.subscribers.len() as u64);
    for sub in &node.subscribers {
        len += tagged::width_of(sub.id as u64);
        len += tagged::width_of(sub.name.len() as u64) + sub.name.len();
    }
    len += tagged::width_of(node.children.len() as u64);
    len + node.children.iter().map(node_len).sum::<usize>()
}

fn put_node(node: &Node, dst: &mut [u8], at: &mut usize) -> Result<()> {
    let flags = (kind_to_bits(node.kind) << KIND_SHIFT) | (node.terminal as u8);
    put_raw(dst, at, &[flags])?;
    put_tagged(dst, at, node.segment.len() as u64)?;
    put_raw(dst, at, &node.segment)?;
    put_tagged(dst, at, node.subscribers.len() as u64)?;
    for sub in &node.subscribers {
        put_tagged(dst, at, sub.id as u64)?;
        put_tagged(dst, at, sub.name.len() as u64)?;
        put_raw(dst, at, sub.name.as_bytes())?;
    }
    put_tagged(dst, at, node.children.len() as u64)?;
    for child in &node.children {
        put_node(child, dst, at)?;
    }
    Ok(())
}

struct ParseTally {
    nodes: u64,
    patterns: u64,
    subscribers: u64,
}

fn get_node(cur: &mut Cursor<'_>, depth: usize, tally: &mut ParseTally) -> Result<Node> {
    if depth > MAX_DEPTH {
        return Err(err(ErrorKind::InvalidFormat, "trie deeper than any legal pattern"));
    }
    let flags = cur.take(1)?[0];
    let terminal = flags & FLAG_TERMINAL != 0;
    let kind = kind_from_bits((flags & KIND_MASK) >> KIND_SHIFT)?;
    // Bits 3..7 are reserved and deliberately not inspected.

    let seg_len = cur.take_tagged()? as usize;
    if seg_len > MAX_SEGMENT_LEN {
        return Err(err(ErrorKind::InvalidFormat, "segment longer than 63 bytes"));
    }
    let segment = cur.take(seg_len)?.to_vec();
    match kind {
        SegmentKind::Literal => {
            if depth == 0 {
                if !segment.is_empty() {
                    return Err(err(ErrorKind::InvalidFormat, "root segment must be empty"));
                }
            } else if segment.is_empty() || !segment.iter().copied().all(literal_byte_ok) {
                return Err(err(ErrorKind::InvalidFormat, "literal segment outside grammar"));
            }
        }
        SegmentKind::Star => {
            if segment != b"*" {
                return Err(err(ErrorKind::InvalidFormat, "star segment must be \"*\""));
            }
        }
        SegmentKind::Hash => {
            if segment != b"#" {
                return Err(err(ErrorKind::InvalidFormat, "hash segment must be \"#\""));
            }
        }
    }

    let sub_count = cur.take_tagged()? as usize;
    let mut subscribers = Vec::with_capacity(sub_count.min(1024));
    for _ in 0..sub_count {
        let id = cur.take_tagged()?;
        if id > u32::MAX as u64 {
            return Err(err(ErrorKind::InvalidFormat, "subscriber id wider than u32"));
        }
        let id = id as u32;
        if subscribers.iter().any(|s: &Subscriber| s.id == id) {
            return Err(err(ErrorKind::InvalidFormat, "duplicate subscriber id"));
        }
        let name_len = cur.take_tagged()? as usize;
        let name = String::from_utf8(cur.take(name_len)?.to_vec())
            .map_err(|e| varpack_base::Error::new(ErrorKind::InvalidFormat, e))?;
        subscribers.push(Subscriber { id, name });
    }
    if terminal && subscribers.is_empty() {
        return Err(err(ErrorKind::InvalidFormat, "terminal node with no subscribers"));
    }
    if !terminal && !subscribers.is_empty() {
        return Err(err(ErrorKind::InvalidFormat, "subscribers on a non-terminal node"));
    }

    tally.nodes += 1;
    if terminal {
        tally.patterns += 1;
        tally.subscribers += sub_count as u64;
    }

    let child_count = cur.take_tagged()? as usize;
    let mut children: Vec<Node> = Vec::with_capacity(child_count.min(1024));
    for _ in 0..child_count {
        let child = get_node(cur, depth + 1, tally)?;
        if children
            .iter()
            .any(|c| c.kind == child.kind && c.segment == child.segment)
        {
            return Err(err(ErrorKind::InvalidFormat, "duplicate (kind, segment) child"));
        }
        children.push(child);
    }
    if depth > 0 && !terminal && children.is_empty() {
        return Err(err(ErrorKind::InvalidFormat, "unreachable interior node"));
    }

    Ok(Node {
        kind,
        segment,
        terminal,
        subscribers,
        children,
    })
}

impl PatternTrie {
    /// Exact size of the serialized form.
    pub fn serialized_len(&self) -> usize {
        MAGIC.len()
            + 1
            + tagged::width_of(self.pattern_count)
            + tagged::width_of(self.root.count())
            + tagged::width_of(self.subscriber_count)
            + node_len(&self.root)
    }

    /// Write the envelope into `dst`; fails with BufferTooSmall when the
    /// region cannot hold [`serialized_len`] bytes.
    pub fn serialize(&self, dst: &mut [u8]) -> Result<usize> {
        let mut at = 0;
        put_raw(dst, &mut at, &MAGIC)?;
        put_raw(dst, &mut at, &[VERSION])?;
        put_tagged(dst, &mut at, self.pattern_count)?;
        put_tagged(dst, &mut at, self.root.count())?;
        put_tagged(dst, &mut at, self.subscriber_count)?;
        put_node(&self.root, dst, &mut at)?;
        trace!(target: "varpack", bytes = at, "trie serialized");
        Ok(at)
    }

    /// Rebuild a trie from an envelope; returns it with the bytes
    /// consumed. Magic, version, grammar, and counter mismatches are
    /// InvalidFormat.
    pub fn deserialize(src: &[u8]) -> Result<(PatternTrie, usize)> {
        if src.is_empty() {
            return Err(err(ErrorKind::NullInput, "empty trie envelope"));
        }
        let mut cur = Cursor { buf: src, at: 0 };
        if cur.take(MAGIC.len())? != &MAGIC[..] {
            return Err(err(ErrorKind::InvalidFormat, "bad trie magic"));
        }
        if cur.take(1)?[0] != VERSION {
            return Err(err(ErrorKind::InvalidFormat, "unknown trie version"));
        }
        let patterns = cur.take_tagged()?;
        let nodes = cur.take_tagged()?;
        let subscribers = cur.take_tagged()?;

        let mut tally = ParseTally {
            nodes: 0,
            patterns: 0,
            subscribers: 0,
        };
        let root = get_node(&mut cur, 0, &mut tally)?;
        if (tally.patterns, tally.nodes, tally.subscribers) != (patterns, nodes, subscribers) {
            return Err(err(ErrorKind::InvalidFormat, "envelope counters disagree with tree"));
        }
        trace!(target: "varpack", bytes = cur.at, patterns, "trie deserialized");
        Ok((PatternTrie::from_parts(root, patterns, subscribers), cur.at))
    }
}
