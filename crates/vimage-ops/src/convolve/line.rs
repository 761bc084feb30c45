//! One-dimensional sliding box sum shared by both passes.

use vimage_core::{CHANNELS, Pixel8888};

use super::edge::EdgePolicy;

/// Running 4-lane window sum and the number of samples in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Accumulator {
    sum: [u32; CHANNELS],
    count: u32,
}

impl Accumulator {
    #[inline]
    pub fn add(&mut self, px: Pixel8888) {
        for (s, &v) in self.sum.iter_mut().zip(&px) {
            *s += v as u32;
        }
        self.count += 1;
    }

    /// Adds `px` as if it appeared `n` times.
    #[inline]
    pub fn add_n(&mut self, px: Pixel8888, n: u32) {
        for (s, &v) in self.sum.iter_mut().zip(&px) {
            *s += v as u32 * n;
        }
        self.count += n;
    }

    #[inline]
    pub fn remove(&mut self, px: Pixel8888) {
        for (s, &v) in self.sum.iter_mut().zip(&px) {
            *s -= v as u32;
        }
        self.count -= 1;
    }

    /// Window mean per lane, clamped to 255 before dividing.
    #[inline]
    pub fn resolve(&self) -> Pixel8888 {
        let divisor = self.count.max(1);
        let limit = 255 * divisor;
        self.sum
            .map(|s| if s > limit { 255 } else { (s / divisor) as u8 })
    }
}

/// Box-filters `out.len()` consecutive positions of a line.
///
/// The line has `len` valid samples read through `fetch`; `out[k]` receives
/// the window of `2 * radius + 1` samples centred on `first + k`. Every
/// centre must lie inside the line. Samples past either end come from
/// `policy`.
pub(crate) fn convolve_line<F>(
    policy: &EdgePolicy,
    len: usize,
    first: usize,
    radius: usize,
    fetch: F,
    out: &mut [Pixel8888],
) where
    F: Fn(usize) -> Pixel8888,
{
    if out.is_empty() {
        return;
    }
    debug_assert!(first + out.len() <= len, "centre outside line");

    let r = radius as isize;
    let n = len as isize;
    let centre = first as isize;
    let lo = centre - r;
    let hi = centre + r;

    // First window: constant runs past the ends, then the samples inside.
    let mut acc = Accumulator::default();
    if lo < 0 {
        if let Some(px) = policy.sample(-1, len, &fetch) {
            acc.add_n(px, (-lo) as u32);
        }
    }
    for p in lo.max(0)..=hi.min(n - 1) {
        acc.add(fetch(p as usize));
    }
    if hi >= n {
        if let Some(px) = policy.sample(n, len, &fetch) {
            acc.add_n(px, (hi - n + 1) as u32);
        }
    }
    out[0] = acc.resolve();

    for (k, slot) in out.iter_mut().enumerate().skip(1) {
        let c = centre + k as isize;
        if let Some(px) = policy.sample(c - r - 1, len, &fetch) {
            acc.remove(px);
        }
        if let Some(px) = policy.sample(c + r, len, &fetch) {
            acc.add(px);
        }
        *slot = acc.resolve();
    }
}
