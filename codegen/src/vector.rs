//! Fixed-width relay state vectors.
//!
//! A state vector is one row of the output table. Position 0 is the most
//! significant bit of the row's GID, so a freshly expanded vector reads as the
//! zero-padded binary string of its GID.

use core::fmt;

/// Largest supported vector width. Keeps every GID inside a `u32`.
pub const MAX_WIDTH: u32 = 32;

/// One row of relay outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateVector {
    bits: u32,
    width: u32,
}

impl StateVector {
    /// Expands `gid` into a `width`-bit vector.
    ///
    /// Bits of `gid` above `width` are discarded. `width` must be in
    /// `1..=MAX_WIDTH`; callers get that guarantee from
    /// [`TableConfig::validate`](crate::config::TableConfig::validate).
    pub fn from_gid(gid: u32, width: u32) -> Self {
        debug_assert!((1..=MAX_WIDTH).contains(&width));
        Self {
            bits: gid & mask(width),
            width,
        }
    }

    /// Number of positions in the vector.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the bit at `pos` (0 = most significant). Positions past the
    /// width read as `false`.
    pub fn bit(&self, pos: u32) -> bool {
        if pos >= self.width {
            return false;
        }
        (self.bits >> self.shift(pos)) & 1 == 1
    }

    /// Overwrites the bit at `pos`. Positions past the width are ignored.
    pub fn set_bit(&mut self, pos: u32, value: bool) {
        if pos >= self.width {
            return;
        }
        let flag = 1 << self.shift(pos);
        if value {
            self.bits |= flag;
        } else {
            self.bits &= !flag;
        }
    }

    /// Iterates the bits in row order.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.width).map(move |pos| self.bit(pos))
    }

    /// Integer value of the current bits, most significant position first.
    pub fn to_gid(&self) -> u32 {
        self.bits
    }

    fn shift(&self, pos: u32) -> u32 {
        self.width - 1 - pos
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, bit) in self.bits().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(if bit { "1" } else { "0" })?;
        }
        f.write_str("}")
    }
}

/// Number of GIDs a `width`-bit table enumerates.
pub fn candidate_count(width: u32) -> u64 {
    1u64 << width
}

fn mask(width: u32) -> u32 {
    if width >= MAX_WIDTH {
        u32::MAX
    } else {
        (1 << width) - 1
    }
}
