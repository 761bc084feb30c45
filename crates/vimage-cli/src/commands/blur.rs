//! Blur command
//!
//! Box-blurs a PNG, optionally restricted to a region of interest.

use crate::BlurArgs;
use anyhow::{Context, Result};
use tracing::{debug, info, trace};
use vimage_core::{Flags, PixelBuffer};
use vimage_ops::box_convolve_argb8888;

use super::{EdgeArg, Roi};

pub fn run(args: BlurArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), output = %args.output.display(), "blur::run");

    let src = super::load_png(&args.input)?;
    let roi = args.roi.unwrap_or(Roi {
        x: 0,
        y: 0,
        width: src.width(),
        height: src.height(),
    });
    let (kw, kh) = (args.kernel.width(), args.kernel.height());

    let mut flags = args.kernel.edge.flag();
    if verbose > 0 {
        flags |= Flags::PRINT_DIAGNOSTICS_TO_CONSOLE;
    }
    let background = match args.kernel.edge {
        EdgeArg::Background => Some(args.kernel.background.unwrap_or([0, 0, 0, 0])),
        _ => args.kernel.background,
    };

    info!(
        kernel_width = kw,
        kernel_height = kh,
        edge = ?args.kernel.edge,
        w = roi.width,
        h = roi.height,
        "Applying box blur"
    );
    if verbose > 0 {
        println!(
            "Applying {kw}x{kh} box blur ({:?} edges) to {}",
            args.kernel.edge,
            args.input.display()
        );
    }

    let mut dst = PixelBuffer::new(roi.width, roi.height)?;
    let done = box_convolve_argb8888(
        &src.view(),
        &mut dst.view_mut(),
        None,
        roi.x,
        roi.y,
        kh,
        kw,
        background,
        flags,
    )
    .with_context(|| format!("Failed to blur: {}", args.input.display()))?;
    debug!(?done, "blur finished");

    super::save_png(&args.output, &dst)?;

    if verbose > 0 {
        println!("Done.");
    }

    Ok(())
}
