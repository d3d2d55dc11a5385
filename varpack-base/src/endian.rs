// The only process-wide datum in the whole library. Codecs are specified
// against little-endian in-memory layouts, so a big-endian host takes the
// byte-reversed store path; both paths go through to_le_bytes and friends,
// and this probe exists so callers (and tests) can observe which path that
// is on the running host.

#[cfg(test)]
use test_log::test;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    Little,
    Big,
}

/// Compile-time view of the target byte order.
pub const HOST_ORDER: ByteOrder = if cfg!(target_endian = "big") {
    ByteOrder::Big
} else {
    ByteOrder::Little
};

/// Runtime probe: inspect the in-memory layout of a known u32. Pure and
/// allocation-free; call it once and pass the answer along, or just read
/// [`HOST_ORDER`].
pub fn host_order() -> ByteOrder {
    let probe: u32 = 0x0102_0304;
    if probe.to_ne_bytes()[0] == 0x04 {
        ByteOrder::Little
    } else {
        ByteOrder::Big
    }
}

#[test]
fn test_probe_agrees_with_target() {
    assert_eq!(host_order(), HOST_ORDER);
}

#[test]
fn test_le_layout_is_order_independent() {
    // The codecs depend on to_le_bytes producing the same byte string on
    // every host; the probe only reports which native path produced it.
    assert_eq!(0x0102_0304_u32.to_le_bytes(), [4, 3, 2, 1]);
}
