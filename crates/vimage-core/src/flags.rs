//! Per-call flag set.
//!
//! Flags combine with `|`. The edge-style group (`COPY_IN_PLACE`,
//! `BACKGROUND_COLOR_FILL`, `EDGE_EXTEND`, `TRUNCATE_KERNEL`) is mutually
//! exclusive for the box filter; the remaining bits are independent
//! modifiers.
//!
//! ```rust
//! use vimage_core::Flags;
//!
//! let flags = Flags::EDGE_EXTEND | Flags::GET_TEMP_BUFFER_SIZE;
//! assert!(flags.contains(Flags::EDGE_EXTEND));
//! assert_eq!(flags.edge_styles().count(), 1);
//! ```

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// A set of call flags, bit-compatible with the `kvImage*` flag values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u32);

impl Flags {
    /// No flags.
    pub const NO_FLAGS: Flags = Flags(0);
    /// Leave the alpha lane unchanged. Ignored by the box filter.
    pub const LEAVE_ALPHA_UNCHANGED: Flags = Flags(1);
    /// Copy pixels whose kernel leaves the source unchanged.
    pub const COPY_IN_PLACE: Flags = Flags(2);
    /// Substitute a background color for samples outside the source.
    pub const BACKGROUND_COLOR_FILL: Flags = Flags(4);
    /// Substitute the nearest edge sample for samples outside the source.
    pub const EDGE_EXTEND: Flags = Flags(8);
    /// Do not split work into tiles. Ignored; the filter never tiles.
    pub const DO_NOT_TILE: Flags = Flags(16);
    /// Prefer quality over speed when resampling. Ignored by the box filter.
    pub const HIGH_QUALITY_RESAMPLING: Flags = Flags(32);
    /// Shrink the kernel to the samples inside the source.
    pub const TRUNCATE_KERNEL: Flags = Flags(64);
    /// Only report the scratch size; do no work.
    pub const GET_TEMP_BUFFER_SIZE: Flags = Flags(128);
    /// Log failures through `tracing`.
    pub const PRINT_DIAGNOSTICS_TO_CONSOLE: Flags = Flags(256);
    /// Never allocate scratch memory internally.
    pub const NO_ALLOCATE: Flags = Flags(512);

    /// The mutually exclusive edge-style group.
    pub const EDGE_STYLES: Flags = Flags(
        Self::COPY_IN_PLACE.0
            | Self::BACKGROUND_COLOR_FILL.0
            | Self::EDGE_EXTEND.0
            | Self::TRUNCATE_KERNEL.0,
    );

    const KNOWN: u32 = 0x3ff;

    /// Creates a flag set from raw bits, keeping unknown bits.
    #[inline]
    pub const fn from_bits_retain(bits: u32) -> Self {
        Flags(bits)
    }

    /// Returns the raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set.
    #[inline]
    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any bit of `other` is set.
    #[inline]
    pub const fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if no bit is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the bits that are not defined by any flag constant.
    #[inline]
    pub const fn unknown_bits(self) -> u32 {
        self.0 & !Self::KNOWN
    }

    /// Iterates over the edge-style flags that are set.
    pub fn edge_styles(self) -> impl Iterator<Item = Flags> {
        [
            Self::COPY_IN_PLACE,
            Self::BACKGROUND_COLOR_FILL,
            Self::EDGE_EXTEND,
            Self::TRUNCATE_KERNEL,
        ]
        .into_iter()
        .filter(move |f| self.contains(*f))
    }
}

impl BitOr for Flags {
    type Output = Flags;

    #[inline]
    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    #[inline]
    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, &str); 10] = [
            (Flags::LEAVE_ALPHA_UNCHANGED, "LEAVE_ALPHA_UNCHANGED"),
            (Flags::COPY_IN_PLACE, "COPY_IN_PLACE"),
            (Flags::BACKGROUND_COLOR_FILL, "BACKGROUND_COLOR_FILL"),
            (Flags::EDGE_EXTEND, "EDGE_EXTEND"),
            (Flags::DO_NOT_TILE, "DO_NOT_TILE"),
            (Flags::HIGH_QUALITY_RESAMPLING, "HIGH_QUALITY_RESAMPLING"),
            (Flags::TRUNCATE_KERNEL, "TRUNCATE_KERNEL"),
            (Flags::GET_TEMP_BUFFER_SIZE, "GET_TEMP_BUFFER_SIZE"),
            (Flags::PRINT_DIAGNOSTICS_TO_CONSOLE, "PRINT_DIAGNOSTICS_TO_CONSOLE"),
            (Flags::NO_ALLOCATE, "NO_ALLOCATE"),
        ];

        if self.is_empty() {
            return f.write_str("Flags(NO_FLAGS)");
        }
        f.write_str("Flags(")?;
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str(" | ")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        let unknown = self.unknown_bits();
        if unknown != 0 {
            if !first {
                f.write_str(" | ")?;
            }
            write!(f, "{unknown:#x}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_values() {
        assert_eq!(Flags::COPY_IN_PLACE.bits(), 2);
        assert_eq!(Flags::TRUNCATE_KERNEL.bits(), 64);
        assert_eq!(Flags::GET_TEMP_BUFFER_SIZE.bits(), 128);
        assert_eq!(Flags::NO_ALLOCATE.bits(), 512);
    }

    #[test]
    fn test_edge_styles() {
        assert_eq!(Flags::NO_FLAGS.edge_styles().count(), 0);
        let two = Flags::EDGE_EXTEND | Flags::TRUNCATE_KERNEL | Flags::DO_NOT_TILE;
        assert_eq!(two.edge_styles().count(), 2);
    }

    #[test]
    fn test_unknown_bits() {
        assert_eq!(Flags::from_bits_retain(0x3ff).unknown_bits(), 0);
        assert_eq!(Flags::from_bits_retain(0x400 | 8).unknown_bits(), 0x400);
    }

    #[test]
    fn test_debug_names() {
        let s = format!("{:?}", Flags::EDGE_EXTEND | Flags::from_bits_retain(0x800));
        assert_eq!(s, "Flags(EDGE_EXTEND | 0x800)");
        assert_eq!(format!("{:?}", Flags::NO_FLAGS), "Flags(NO_FLAGS)");
    }
}
