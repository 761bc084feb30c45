//! Temp-size command
//!
//! Prints the scratch bytes a blur of the given shape needs.

use crate::TempSizeArgs;
use anyhow::{Context, Result};
use tracing::trace;
use vimage_ops::{BoxConvolve, EdgePolicy};

use super::EdgeArg;

pub fn run(args: TempSizeArgs, verbose: u8) -> Result<()> {
    trace!(
        src_width = args.src_width,
        src_height = args.src_height,
        "temp_size::run"
    );

    let width = args.width.unwrap_or(args.src_width);
    let height = args.height.unwrap_or(args.src_height);
    let edge = match args.kernel.edge {
        EdgeArg::Copy => EdgePolicy::CopyThrough,
        EdgeArg::Truncate => EdgePolicy::TruncateKernel,
        EdgeArg::Background => {
            EdgePolicy::BackgroundFill(args.kernel.background.unwrap_or([0, 0, 0, 0]))
        }
        EdgeArg::Extend => EdgePolicy::EdgeExtend,
    };

    let bytes = BoxConvolve::new(args.kernel.width(), args.kernel.height())
        .offset(args.offset_x, args.offset_y)
        .edge(edge)
        .temp_buffer_size_for(args.src_width, args.src_height, width, height)
        .context("Invalid blur parameters")?;

    if verbose > 0 {
        println!(
            "{width}x{height} at ({}, {}) of {}x{}, kernel {}x{}: {bytes} bytes",
            args.offset_x,
            args.offset_y,
            args.src_width,
            args.src_height,
            args.kernel.width(),
            args.kernel.height()
        );
    } else {
        println!("{bytes}");
    }

    Ok(())
}
