use varpack_base::Result;

use crate::{chained, external, split, tagged};

/// Selector for the primitive codecs, for call sites that pick a wire form
/// at runtime. A match over the variant replaces any v-table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarintKind {
    Tagged,
    Chained,
    Split,
    SplitNoZero,
    /// Fixed-width External form; the width travels in the variant, not
    /// the byte stream.
    External { width: usize },
}

impl VarintKind {
    /// Encoded length of `v` under this codec.
    pub fn width_of(&self, v: u64) -> Result<usize> {
        match self {
            VarintKind::Tagged => Ok(tagged::width_of(v)),
            VarintKind::Chained => Ok(chained::width_of(v)),
            VarintKind::Split => Ok(split::width_of(v)),
            VarintKind::SplitNoZero => split::width_of_no_zero(v),
            VarintKind::External { width } => Ok(*width),
        }
    }

    pub fn put(&self, dst: &mut [u8], v: u64) -> Result<usize> {
        match self {
            VarintKind::Tagged => tagged::put(dst, v),
            VarintKind::Chained => chained::put(dst, v),
            VarintKind::Split => split::put(dst, v),
            VarintKind::SplitNoZero => split::put_no_zero(dst, v),
            VarintKind::External { width } => external::put_fixed(dst, v, *width),
        }
    }

    pub fn get(&self, src: &[u8]) -> Option<(u64, usize)> {
        match self {
            VarintKind::Tagged => tagged::get(src),
            VarintKind::Chained => chained::get(src),
            VarintKind::Split => split::get(src),
            VarintKind::SplitNoZero => split::get_no_zero(src),
            VarintKind::External { width } => {
                external::get_fixed(src, *width).ok().map(|v| (v, *width))
            }
        }
    }
}
