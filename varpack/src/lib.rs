// Facade over the varpack subsystems, re-exporting the public surface in
// one place. Dependency order runs leaves-first:
//
//   varpack-base  error taxonomy, byte-order probe, checked arithmetic
//   varpack-vint  External / Tagged / Split / Chained primitive codecs
//   varpack-cols  Bitstream, Packed, Delta, FOR, Dimension
//   varpack-trie  wildcard pattern trie and its serialized envelope
//
// Codecs are pure functions over caller-provided byte regions; the
// containers and the trie own only their own storage. See each crate for
// the wire contracts.

pub use varpack_base::{
    apply_delta, checked_add, checked_delta, checked_sub, err, host_order, ByteOrder, Error,
    ErrorKind, Result, HOST_ORDER,
};

pub use varpack_vint::{chained, external, split, tagged, VarintKind};

pub use varpack_cols::{bitstream, delta, for_codec, Dimension, Packed, Slot};

pub use varpack_trie::{
    PatternTrie, SegmentKind, Subscriber, TrieStats, MAX_PATTERN_LEN, MAX_SEGMENT_LEN,
    MAX_SUBSCRIBERS_DEFAULT,
};

#[cfg(test)]
mod test {
    use test_log::test;

    // One pass across the layers: route subscribers through the trie,
    // ship the routing table through its envelope, and carry the id list
    // through FOR.
    #[test]
    fn test_stack_smoke() {
        let mut trie = crate::PatternTrie::new();
        trie.insert("metrics.#", 7, "sink").unwrap();
        trie.insert("metrics.cpu.*", 8, "cpu").unwrap();

        let mut wire = vec![0u8; trie.serialized_len()];
        let n = trie.serialize(&mut wire).unwrap();
        let (trie, _) = crate::PatternTrie::deserialize(&wire[..n]).unwrap();

        let hits: Vec<u64> = trie
            .match_key("metrics.cpu.load")
            .iter()
            .map(|s| s.id as u64)
            .collect();
        assert_eq!(hits, vec![7, 8]);

        let mut buf = vec![0u8; crate::for_codec::encoded_len(&hits)];
        let n = crate::for_codec::put(&hits, &mut buf).unwrap();
        assert_eq!(crate::for_codec::get_at(&buf[..n], 1).unwrap(), 8);
    }
}
