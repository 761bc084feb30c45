//! Integration tests for the vimage crates.
//!
//! The filter is checked against [`reference`], a direct per-pixel
//! evaluation of the same two-pass box mean with no sliding window, no
//! scratch rows and no staging.

use vimage_core::{ImageBuffer, Pixel8888};
use vimage_ops::EdgePolicy;

/// Shape of one filter call.
#[derive(Debug, Clone, Copy)]
pub struct Case {
    pub width: usize,
    pub height: usize,
    pub offset_x: usize,
    pub offset_y: usize,
    pub kernel_width: u32,
    pub kernel_height: u32,
    pub policy: EdgePolicy,
}

fn mean(sum: [u32; 4], count: u32) -> Pixel8888 {
    let count = count.max(1);
    sum.map(|s| if s > 255 * count { 255 } else { (s / count) as u8 })
}

/// Window mean along one axis.
///
/// `at(p)` returns the sample at in-range position `p` of a line of `len`.
fn line_mean(
    policy: &EdgePolicy,
    len: usize,
    centre: usize,
    radius: usize,
    at: impl Fn(usize) -> Pixel8888,
) -> Pixel8888 {
    let mut sum = [0u32; 4];
    let mut count = 0;
    for p in centre as isize - radius as isize..=(centre + radius) as isize {
        let px = if p >= 0 && (p as usize) < len {
            at(p as usize)
        } else {
            match policy {
                EdgePolicy::TruncateKernel | EdgePolicy::CopyThrough => continue,
                EdgePolicy::BackgroundFill(color) => *color,
                EdgePolicy::EdgeExtend => at((p.max(0) as usize).min(len - 1)),
            }
        };
        for (s, v) in sum.iter_mut().zip(px) {
            *s += v as u32;
        }
        count += 1;
    }
    mean(sum, count)
}

/// Evaluates the filter one destination pixel at a time.
///
/// Returns the destination pixels row-major without padding.
pub fn reference(src: &ImageBuffer<'_>, case: &Case) -> Vec<Pixel8888> {
    let kw2 = (case.kernel_width / 2) as usize;
    let kh2 = (case.kernel_height / 2) as usize;
    let (sw, sh) = (src.width(), src.height());

    // Horizontal mean of source pixel (x, y), rounded to 8 bits
    let row_mean = |x: usize, y: usize| line_mean(&case.policy, sw, x, kw2, |p| src.pixel(p, y));

    let mut out = Vec::with_capacity(case.width * case.height);
    for i in 0..case.height {
        for j in 0..case.width {
            let (x, y) = (case.offset_x + j, case.offset_y + i);
            let inside = x >= kw2 && x + kw2 < sw && y >= kh2 && y + kh2 < sh;
            if matches!(case.policy, EdgePolicy::CopyThrough) && !inside {
                out.push(src.pixel(x, y));
                continue;
            }
            out.push(line_mean(&case.policy, sh, y, kh2, |p| row_mean(x, p)));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use vimage_core::{Flags, ImageBufferMut, PixelBuffer};
    use vimage_ops::{box_convolve_argb8888, codes, BoxConvolve, Convolved};

    fn random_image(rng: &mut StdRng, width: usize, height: usize) -> PixelBuffer {
        let packed: Vec<u8> = (0..width * height * 4).map(|_| rng.random()).collect();
        PixelBuffer::from_packed(width, height, &packed).unwrap()
    }

    fn random_odd(rng: &mut StdRng, max: u32) -> u32 {
        rng.random_range(0..=max / 2) * 2 + 1
    }

    fn random_policy(rng: &mut StdRng) -> EdgePolicy {
        match rng.random_range(0..4) {
            0 => EdgePolicy::CopyThrough,
            1 => EdgePolicy::TruncateKernel,
            2 => EdgePolicy::BackgroundFill(rng.random()),
            _ => EdgePolicy::EdgeExtend,
        }
    }

    fn random_case(rng: &mut StdRng, src_width: usize, src_height: usize) -> Case {
        let width = rng.random_range(1..=src_width);
        let height = rng.random_range(1..=src_height);
        Case {
            width,
            height,
            offset_x: rng.random_range(0..=src_width - width),
            offset_y: rng.random_range(0..=src_height - height),
            kernel_width: random_odd(rng, 2 * src_width as u32 + 3),
            kernel_height: random_odd(rng, 2 * src_height as u32 + 3),
            policy: random_policy(rng),
        }
    }

    fn blur(case: &Case) -> BoxConvolve {
        BoxConvolve::new(case.kernel_width, case.kernel_height)
            .offset(case.offset_x, case.offset_y)
            .edge(case.policy)
    }

    fn pixels(buf: &PixelBuffer) -> Vec<Pixel8888> {
        buf.to_packed()
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect()
    }

    #[test]
    fn test_matches_reference() {
        let mut rng = StdRng::seed_from_u64(0x0b0c);
        for _ in 0..400 {
            let sw = rng.random_range(1..=24);
            let sh = rng.random_range(1..=24);
            let src = random_image(&mut rng, sw, sh);
            let case = random_case(&mut rng, sw, sh);

            let mut dst = PixelBuffer::new(case.width, case.height).unwrap();
            blur(&case)
                .apply(&src.view(), &mut dst.view_mut(), None)
                .unwrap();

            assert_eq!(
                pixels(&dst),
                reference(&src.view(), &case),
                "{case:?} in {sw}x{sh}"
            );
        }
    }

    #[test]
    fn test_matches_reference_with_padding() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let sw = rng.random_range(1..=16);
            let sh = rng.random_range(1..=16);
            let case = random_case(&mut rng, sw, sh);

            let src_stride = sw * 4 + rng.random_range(0..12);
            let src_bytes: Vec<u8> = (0..src_stride * sh).map(|_| rng.random()).collect();
            let src = ImageBuffer::new(&src_bytes, sw, sh, src_stride).unwrap();

            let dst_stride = case.width * 4 + rng.random_range(1..12);
            let mut dst_bytes = vec![0x5Au8; dst_stride * case.height];
            {
                let mut dst =
                    ImageBufferMut::new(&mut dst_bytes, case.width, case.height, dst_stride)
                        .unwrap();
                blur(&case).apply(&src, &mut dst, None).unwrap();

                let got: Vec<Pixel8888> = (0..case.height)
                    .flat_map(|y| dst.row(y).to_vec())
                    .collect();
                assert_eq!(got, reference(&src, &case), "{case:?}");
            }
            for y in 0..case.height {
                let pad = &dst_bytes[y * dst_stride + case.width * 4..(y + 1) * dst_stride];
                assert!(pad.iter().all(|&b| b == 0x5A));
            }
        }
    }

    #[test]
    fn test_reported_size_is_enough() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let sw = rng.random_range(1..=20);
            let sh = rng.random_range(1..=20);
            let src = random_image(&mut rng, sw, sh);
            let case = random_case(&mut rng, sw, sh);
            let blur = blur(&case);

            let mut dst = PixelBuffer::new(case.width, case.height).unwrap();
            let query = box_convolve_argb8888(
                &src.view(),
                &mut dst.view_mut(),
                None,
                case.offset_x,
                case.offset_y,
                case.kernel_height,
                case.kernel_width,
                case.policy.background(),
                blur.flags() | Flags::GET_TEMP_BUFFER_SIZE,
            )
            .unwrap();
            let Convolved::TempBufferSize(size) = query else {
                panic!("expected a size, got {query:?}");
            };
            assert_eq!(size, blur.temp_buffer_size(&src.view(), case.width, case.height).unwrap());

            let mut temp = vec![0u8; size];
            blur.no_allocate()
                .apply(&src.view(), &mut dst.view_mut(), Some(temp.as_mut_slice()))
                .unwrap();
            assert_eq!(pixels(&dst), reference(&src.view(), &case), "{case:?}");
        }
    }

    #[test]
    fn test_dirty_scratch_is_harmless() {
        let mut rng = StdRng::seed_from_u64(99);
        let src = random_image(&mut rng, 17, 13);
        let case = Case {
            width: 9,
            height: 7,
            offset_x: 3,
            offset_y: 2,
            kernel_width: 7,
            kernel_height: 9,
            policy: EdgePolicy::EdgeExtend,
        };
        let blur = blur(&case);
        let size = blur.temp_buffer_size(&src.view(), 9, 7).unwrap();
        let mut temp = vec![0xFFu8; size + 13];
        let mut dst = PixelBuffer::filled(9, 7, [1, 2, 3, 4]).unwrap();
        blur.apply(&src.view(), &mut dst.view_mut(), Some(temp.as_mut_slice()))
            .unwrap();
        assert_eq!(pixels(&dst), reference(&src.view(), &case));
    }

    #[test]
    fn test_saturated_large_kernels() {
        let src = PixelBuffer::filled(12, 12, [255; 4]).unwrap();
        for k in [1, 3, 25, 101, 1001] {
            for policy in [
                EdgePolicy::CopyThrough,
                EdgePolicy::TruncateKernel,
                EdgePolicy::BackgroundFill([255; 4]),
                EdgePolicy::EdgeExtend,
            ] {
                let mut dst = PixelBuffer::new(10, 10).unwrap();
                BoxConvolve::square(k)
                    .offset(1, 1)
                    .edge(policy)
                    .apply(&src.view(), &mut dst.view_mut(), None)
                    .unwrap();
                assert!(pixels(&dst).iter().all(|&p| p == [255; 4]), "{policy:?} k={k}");
            }
        }
    }

    #[test]
    fn test_edge_extend_constant_roi_inside() {
        let src = PixelBuffer::filled(10, 10, [200, 0, 0, 255]).unwrap();
        for (x, y, w, h) in [(0, 0, 10, 10), (2, 3, 5, 5), (9, 9, 1, 1)] {
            let mut dst = PixelBuffer::new(w, h).unwrap();
            BoxConvolve::square(5)
                .offset(x, y)
                .apply(&src.view(), &mut dst.view_mut(), None)
                .unwrap();
            assert!(pixels(&dst).iter().all(|&p| p == [200, 0, 0, 255]));
        }
    }

    #[test]
    fn test_even_kernels_rejected_before_access() {
        let src = PixelBuffer::new(8, 8).unwrap();
        let mut dst = PixelBuffer::filled(8, 8, [3; 4]).unwrap();
        for (kw, kh) in [(2, 3), (3, 2), (0, 1), (4, 4)] {
            let result = box_convolve_argb8888(
                &src.view(),
                &mut dst.view_mut(),
                None,
                0,
                0,
                kh,
                kw,
                None,
                Flags::EDGE_EXTEND,
            );
            assert_eq!(result.unwrap_err().code(), codes::INVALID_KERNEL_SIZE);
        }
        assert!(pixels(&dst).iter().all(|&p| p == [3; 4]));
    }

    #[test]
    fn test_roi_past_source_rejected() {
        let mut rng = StdRng::seed_from_u64(5);
        let src = random_image(&mut rng, 6, 6);
        for (x, y, w, h) in [(1, 0, 6, 6), (0, 1, 6, 6), (5, 5, 2, 1), (6, 6, 1, 1)] {
            let mut dst = PixelBuffer::new(w, h).unwrap();
            let err = BoxConvolve::square(3)
                .offset(x, y)
                .apply(&src.view(), &mut dst.view_mut(), None)
                .unwrap_err();
            assert_eq!(err.code(), codes::ROI_LARGER_THAN_INPUT_BUFFER, "({x},{y}) {w}x{h}");
        }
    }

    #[test]
    fn test_modifier_flags_ignored() {
        let mut rng = StdRng::seed_from_u64(11);
        let src = random_image(&mut rng, 8, 8);
        let mut plain = PixelBuffer::new(8, 8).unwrap();
        let mut modified = PixelBuffer::new(8, 8).unwrap();
        let run = |dst: &mut PixelBuffer, flags: Flags| {
            box_convolve_argb8888(&src.view(), &mut dst.view_mut(), None, 0, 0, 3, 5, None, flags)
                .unwrap()
        };
        run(&mut plain, Flags::TRUNCATE_KERNEL);
        run(
            &mut modified,
            Flags::TRUNCATE_KERNEL
                | Flags::LEAVE_ALPHA_UNCHANGED
                | Flags::DO_NOT_TILE
                | Flags::HIGH_QUALITY_RESAMPLING
                | Flags::PRINT_DIAGNOSTICS_TO_CONSOLE,
        );
        assert_eq!(plain, modified);
    }
}
