// Homogeneous array of width-bit elements, element i occupying bits
// [i*width, (i+1)*width) of the slot stream. Every element access goes
// through the bitstream cell functions, so the two placement cases (cell
// inside one slot, cell straddling a boundary) are handled in one place.
// Insert and remove shift the tail one element at a time through those
// same cells, moving the bit stream rather than whole slots.

use varpack_base::{err, ErrorKind, Result};

use crate::bitstream::{get_cell, low_mask, set_cell};
use crate::slot::Slot;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Packed<S: Slot> {
    width: u32,
    len: usize,
    slots: Vec<S>,
}

fn slots_for<S: Slot>(width: u32, len: usize) -> usize {
    (len * width as usize).div_ceil(S::SLOT_BITS as usize)
}

impl<S: Slot> Packed<S> {
    /// Empty array of `width`-bit elements. The width must fit a slot so
    /// that no element spans more than one boundary.
    pub fn new(width: u32) -> Result<Self> {
        if width == 0 || width > S::SLOT_BITS {
            return Err(err(
                ErrorKind::InvalidWidth,
                "packed width not in 1..=SLOT_BITS",
            ));
        }
        Ok(Packed {
            width,
            len: 0,
            slots: Vec::new(),
        })
    }

    /// Array of `len` zero elements.
    pub fn zeroed(width: u32, len: usize) -> Result<Self> {
        let mut p = Packed::new(width)?;
        p.len = len;
        p.slots = vec![S::ZERO; slots_for::<S>(width, len)];
        Ok(p)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest value an element can hold.
    pub fn max_value(&self) -> u64 {
        low_mask(self.width)
    }

    /// Element at `i`. Panics if `i` is out of bounds.
    pub fn get(&self, i: usize) -> u64 {
        assert!(i < self.len, "packed index {} out of bounds {}", i, self.len);
        match get_cell(&self.slots, i * self.width as usize, self.width) {
            Ok(v) => v,
            Err(_) => unreachable!("element cell is in bounds"),
        }
    }

    /// Overwrite element `i`. Panics if `i` is out of bounds; a value
    /// wider than the element width is ValueOutOfRange.
    pub fn set(&mut self, i: usize, v: u64) -> Result<()> {
        assert!(i < self.len, "packed index {} out of bounds {}", i, self.len);
        set_cell(&mut self.slots, i * self.width as usize, self.width, v)
    }

    pub fn append(&mut self, v: u64) -> Result<usize> {
        if v > low_mask(self.width) {
            return Err(err(ErrorKind::ValueOutOfRange, "value wider than element"));
        }
        self.len += 1;
        let need = slots_for::<S>(self.width, self.len);
        if self.slots.len() < need {
            self.slots.resize(need, S::ZERO);
        }
        let i = self.len - 1;
        self.set(i, v)?;
        Ok(i)
    }

    /// Insert at `i`, shifting elements `i..` up one position. O(N) cell
    /// moves. Panics if `i > len`.
    pub fn insert(&mut self, i: usize, v: u64) -> Result<()> {
        assert!(i <= self.len, "packed index {} out of bounds {}", i, self.len);
        if v > low_mask(self.width) {
            return Err(err(ErrorKind::ValueOutOfRange, "value wider than element"));
        }
        self.append(0)?;
        let mut j = self.len - 1;
        while j > i {
            let moved = self.get(j - 1);
            self.set(j, moved)?;
            j -= 1;
        }
        self.set(i, v)
    }

    /// Remove element `i`, shifting the tail down one position and
    /// returning the removed value. Panics if `i` is out of bounds.
    pub fn remove(&mut self, i: usize) -> u64 {
        assert!(i < self.len, "packed index {} out of bounds {}", i, self.len);
        let removed = self.get(i);
        for j in i..self.len - 1 {
            let moved = self.get(j + 1);
            match self.set(j, moved) {
                Ok(()) => (),
                Err(_) => unreachable!("moved value fits the shared width"),
            }
        }
        // Zero the vacated cell so equality and hashing stay insensitive
        // to removal history, then drop any slot with no live bits left.
        match set_cell(
            &mut self.slots,
            (self.len - 1) * self.width as usize,
            self.width,
            0,
        ) {
            Ok(()) => (),
            Err(_) => unreachable!("vacated cell is in bounds"),
        }
        self.len -= 1;
        self.slots.truncate(slots_for::<S>(self.width, self.len));
        removed
    }

    /// Leftmost insertion point for `key`: the smallest `i` with
    /// `get(i) >= key`, or `len` when every element is smaller. Duplicate
    /// runs resolve to their first index.
    pub fn binary_search(&self, key: u64) -> usize {
        let mut lo = 0;
        let mut hi = self.len;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.get(mid) < key {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// Insert `v` at its leftmost sorted position and return that index.
    pub fn insert_sorted(&mut self, v: u64) -> Result<usize> {
        let i = self.binary_search(v);
        self.insert(i, v)?;
        Ok(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }
}
