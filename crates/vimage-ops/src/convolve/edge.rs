//! Edge policies.
//!
//! Both passes see a line of `len` valid samples and ask the policy what
//! lives at a position that may fall outside it. `None` means the position
//! contributes nothing, not even to the divisor.

use vimage_core::{Flags, Pixel8888};

/// How kernel samples outside the source are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Pixels whose kernel leaves the source keep their source value.
    CopyThrough,
    /// The kernel shrinks to the samples inside the source.
    TruncateKernel,
    /// Missing samples take the given color.
    BackgroundFill(Pixel8888),
    /// Missing samples take the nearest edge sample.
    EdgeExtend,
}

impl EdgePolicy {
    /// The edge-style flag selecting this policy.
    pub fn flag(&self) -> Flags {
        match self {
            Self::CopyThrough => Flags::COPY_IN_PLACE,
            Self::TruncateKernel => Flags::TRUNCATE_KERNEL,
            Self::BackgroundFill(_) => Flags::BACKGROUND_COLOR_FILL,
            Self::EdgeExtend => Flags::EDGE_EXTEND,
        }
    }

    /// Background color, for [`EdgePolicy::BackgroundFill`].
    pub fn background(&self) -> Option<Pixel8888> {
        match self {
            Self::BackgroundFill(color) => Some(*color),
            _ => None,
        }
    }

    /// Builds the policy for a single edge-style flag.
    ///
    /// Returns `None` for anything but exactly one edge-style bit, and for
    /// background fill without a color.
    pub(crate) fn from_style(style: Flags, background: Option<Pixel8888>) -> Option<Self> {
        match style {
            Flags::COPY_IN_PLACE => Some(Self::CopyThrough),
            Flags::TRUNCATE_KERNEL => Some(Self::TruncateKernel),
            Flags::EDGE_EXTEND => Some(Self::EdgeExtend),
            Flags::BACKGROUND_COLOR_FILL => background.map(Self::BackgroundFill),
            _ => None,
        }
    }

    #[inline]
    pub(crate) fn is_copy_through(&self) -> bool {
        matches!(self, Self::CopyThrough)
    }

    /// Sample at `pos` on a line of `len` valid samples.
    ///
    /// `fetch` is only called with indices in `0..len`. Copy-through never
    /// convolves a window that leaves the line, so it has nothing to supply.
    #[inline]
    pub(crate) fn sample<F>(&self, pos: isize, len: usize, fetch: F) -> Option<Pixel8888>
    where
        F: Fn(usize) -> Pixel8888,
    {
        if pos >= 0 && (pos as usize) < len {
            return Some(fetch(pos as usize));
        }
        match self {
            Self::CopyThrough | Self::TruncateKernel => None,
            Self::BackgroundFill(color) => Some(*color),
            Self::EdgeExtend if len == 0 => None,
            Self::EdgeExtend => Some(fetch(if pos < 0 { 0 } else { len - 1 })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: [Pixel8888; 3] = [[1, 1, 1, 1], [2, 2, 2, 2], [3, 3, 3, 3]];

    fn at(i: usize) -> Pixel8888 {
        LINE[i]
    }

    #[test]
    fn test_inside_is_fetched() {
        for policy in [
            EdgePolicy::CopyThrough,
            EdgePolicy::TruncateKernel,
            EdgePolicy::BackgroundFill([9; 4]),
            EdgePolicy::EdgeExtend,
        ] {
            assert_eq!(policy.sample(1, 3, at), Some([2; 4]));
        }
    }

    #[test]
    fn test_outside() {
        assert_eq!(EdgePolicy::TruncateKernel.sample(-1, 3, at), None);
        assert_eq!(EdgePolicy::BackgroundFill([9; 4]).sample(5, 3, at), Some([9; 4]));
        assert_eq!(EdgePolicy::EdgeExtend.sample(-4, 3, at), Some([1; 4]));
        assert_eq!(EdgePolicy::EdgeExtend.sample(3, 3, at), Some([3; 4]));
    }

    #[test]
    fn test_from_style() {
        assert_eq!(
            EdgePolicy::from_style(Flags::EDGE_EXTEND, None),
            Some(EdgePolicy::EdgeExtend)
        );
        assert_eq!(EdgePolicy::from_style(Flags::BACKGROUND_COLOR_FILL, None), None);
        assert_eq!(
            EdgePolicy::from_style(Flags::EDGE_EXTEND | Flags::COPY_IN_PLACE, None),
            None
        );
        let fill = EdgePolicy::BackgroundFill([1, 2, 3, 4]);
        assert_eq!(EdgePolicy::from_style(fill.flag(), fill.background()), Some(fill));
    }
}
