use rapidhash::RapidHashSet;
use tracing::trace;
use varpack_base::{err, ErrorKind, Result};

use crate::pattern::{parse_key, parse_pattern, Segment, SegmentKind};

/// Per-pattern subscriber cap used by [`PatternTrie::new`]. Local policy,
/// not part of the wire format; [`PatternTrie::with_max_subscribers`]
/// overrides it.
pub const MAX_SUBSCRIBERS_DEFAULT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscriber {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrieStats {
    pub patterns: u64,
    pub nodes: u64,
    pub subscribers: u64,
}

// Children are ordered by insertion and unique by (kind, segment). A
// non-terminal leaf is unreachable from any pattern, so mutators prune
// such nodes on the unwind path and never leave them behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Node {
    pub(crate) kind: SegmentKind,
    pub(crate) segment: Vec<u8>,
    pub(crate) terminal: bool,
    pub(crate) subscribers: Vec<Subscriber>,
    pub(crate) children: Vec<Node>,
}

impl Node {
    pub(crate) fn root() -> Node {
        Node {
            kind: SegmentKind::Literal,
            segment: Vec::new(),
            terminal: false,
            subscribers: Vec::new(),
            children: Vec::new(),
        }
    }

    fn child_pos(&self, kind: SegmentKind, segment: &[u8]) -> Option<usize> {
        self.children
            .iter()
            .position(|c| c.kind == kind && c.segment == segment)
    }

    fn prunable(&self) -> bool {
        !self.terminal && self.children.is_empty()
    }

    pub(crate) fn count(&self) -> u64 {
        1 + self.children.iter().map(Node::count).sum::<u64>()
    }
}

#[derive(Debug)]
pub struct PatternTrie {
    pub(crate) root: Node,
    pub(crate) pattern_count: u64,
    pub(crate) subscriber_count: u64,
    max_subscribers: usize,
}

impl Default for PatternTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternTrie {
    pub fn new() -> Self {
        Self::with_max_subscribers(MAX_SUBSCRIBERS_DEFAULT)
    }

    pub fn with_max_subscribers(max_subscribers: usize) -> Self {
        PatternTrie {
            root: Node::root(),
            pattern_count: 0,
            subscriber_count: 0,
            max_subscribers,
        }
    }

    pub(crate) fn from_parts(root: Node, pattern_count: u64, subscriber_count: u64) -> Self {
        PatternTrie {
            root,
            pattern_count,
            subscriber_count,
            max_subscribers: MAX_SUBSCRIBERS_DEFAULT,
        }
    }

    /// Subscribe `(id, name)` to `pattern`, creating the path as needed.
    /// Returns true when the subscriber is new on this pattern; an id
    /// already present leaves the existing entry untouched.
    pub fn insert(&mut self, pattern: &str, id: u32, name: &str) -> Result<bool> {
        let segs = parse_pattern(pattern)?;
        let mut node = &mut self.root;
        for seg in &segs {
            let pos = match node.child_pos(seg.kind, &seg.text) {
                Some(pos) => pos,
                None => {
                    node.children.push(Node {
                        kind: seg.kind,
                        segment: seg.text.clone(),
                        terminal: false,
                        subscribers: Vec::new(),
                        children: Vec::new(),
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[pos];
        }
        if node.subscribers.iter().any(|s| s.id == id) {
            return Ok(false);
        }
        if node.subscribers.len() >= self.max_subscribers {
            return Err(err(
                ErrorKind::ValueOutOfRange,
                "pattern subscriber set is full",
            ));
        }
        if !node.terminal {
            node.terminal = true;
            self.pattern_count += 1;
            trace!(target: "varpack", pattern, "new pattern");
        }
        node.subscribers.push(Subscriber {
            id,
            name: name.to_string(),
        });
        self.subscriber_count += 1;
        Ok(true)
    }

    /// Drop a whole pattern and all of its subscribers. Returns true when
    /// the pattern was present.
    pub fn remove_pattern(&mut self, pattern: &str) -> Result<bool> {
        let segs = parse_pattern(pattern)?;
        let (removed, subs) = remove_pattern_rec(&mut self.root, &segs);
        if removed {
            self.pattern_count -= 1;
            self.subscriber_count -= subs;
            trace!(target: "varpack", pattern, "pattern removed");
        }
        Ok(removed)
    }

    /// Drop one subscriber id from a pattern. The last subscriber takes
    /// the pattern itself with it. Returns true when the id was present.
    pub fn remove_subscriber(&mut self, pattern: &str, id: u32) -> Result<bool> {
        let segs = parse_pattern(pattern)?;
        let (removed, emptied) = remove_subscriber_rec(&mut self.root, &segs, id);
        if removed {
            self.subscriber_count -= 1;
        }
        if emptied {
            self.pattern_count -= 1;
        }
        Ok(removed)
    }

    /// Collect every subscriber whose pattern accepts `key`, deduplicated
    /// by id, in first-encountered order. A malformed key matches
    /// nothing.
    pub fn match_key(&self, key: &str) -> Vec<&Subscriber> {
        let Some(segs) = parse_key(key) else {
            return Vec::new();
        };
        let mut seen = RapidHashSet::default();
        let mut out = Vec::new();
        match_rec(&self.root, &segs, 0, &mut seen, &mut out);
        out
    }

    /// Every stored pattern with its subscribers, in depth-first order.
    pub fn list(&self) -> Vec<(String, Vec<Subscriber>)> {
        let mut out = Vec::new();
        let mut path: Vec<&[u8]> = Vec::new();
        list_rec(&self.root, &mut path, &mut out);
        out
    }

    pub fn stats(&self) -> TrieStats {
        TrieStats {
            patterns: self.pattern_count,
            nodes: self.root.count(),
            subscribers: self.subscriber_count,
        }
    }
}

// Returns (pattern removed, subscribers dropped with it).
fn remove_pattern_rec(node: &mut Node, segs: &[Segment]) -> (bool, u64) {
    let Some(seg) = segs.first() else {
        if !node.terminal {
            return (false, 0);
        }
        node.terminal = false;
        let subs = node.subscribers.len() as u64;
        node.subscribers.clear();
        return (true, subs);
    };
    let Some(pos) = node.child_pos(seg.kind, &seg.text) else {
        return (false, 0);
    };
    let res = remove_pattern_rec(&mut node.children[pos], &segs[1..]);
    if node.children[pos].prunable() {
        node.children.remove(pos);
    }
    res
}

// Returns (subscriber removed, terminal flag cleared).
fn remove_subscriber_rec(node: &mut Node, segs: &[Segment], id: u32) -> (bool, bool) {
    let Some(seg) = segs.first() else {
        let Some(pos) = node.subscribers.iter().position(|s| s.id == id) else {
            return (false, false);
        };
        node.subscribers.remove(pos);
        if node.terminal && node.subscribers.is_empty() {
            node.terminal = false;
            return (true, true);
        }
        return (true, false);
    };
    let Some(pos) = node.child_pos(seg.kind, &seg.text) else {
        return (false, false);
    };
    let res = remove_subscriber_rec(&mut node.children[pos], &segs[1..], id);
    if node.children[pos].prunable() {
        node.children.remove(pos);
    }
    res
}

fn collect<'t>(
    node: &'t Node,
    seen: &mut RapidHashSet<u32>,
    out: &mut Vec<&'t Subscriber>,
) {
    for sub in &node.subscribers {
        if seen.insert(sub.id) {
            out.push(sub);
        }
    }
}

fn match_rec<'t>(
    node: &'t Node,
    segs: &[&[u8]],
    i: usize,
    seen: &mut RapidHashSet<u32>,
    out: &mut Vec<&'t Subscriber>,
) {
    if i == segs.len() {
        if node.terminal {
            collect(node, seen, out);
        }
        // A trailing `#` child accepts the empty remainder.
        for c in &node.children {
            if c.kind == SegmentKind::Hash {
                match_rec(c, segs, i, seen, out);
            }
        }
        return;
    }
    for c in &node.children {
        match c.kind {
            SegmentKind::Literal => {
                if c.segment == segs[i] {
                    match_rec(c, segs, i + 1, seen, out);
                }
            }
            SegmentKind::Star => match_rec(c, segs, i + 1, seen, out),
            SegmentKind::Hash => {
                // Zero segments consumed, then every nonzero tail split.
                match_rec(c, segs, i, seen, out);
                for j in i..segs.len() {
                    match_rec(c, segs, j + 1, seen, out);
                }
            }
        }
    }
}

fn list_rec<'t>(
    node: &'t Node,
    path: &mut Vec<&'t [u8]>,
    out: &mut Vec<(String, Vec<Subscriber>)>,
) {
    if node.terminal {
        let joined = path
            .iter()
            .map(|seg| String::from_utf8_lossy(seg))
            .collect::<Vec<_>>()
            .join(".");
        out.push((joined, node.subscribers.clone()));
    }
    for c in &node.children {
        path.push(&c.segment);
        list_rec(c, path, out);
        path.pop();
    }
}
