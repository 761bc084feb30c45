//! vimage - box blur from the command line
//!
//! Thin front end over `vimage-ops` for PNG files.

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{EdgeArg, Roi};

#[derive(Parser)]
#[command(name = "vimage")]
#[command(author, version, about = "Box convolution for 8-bit RGBA images")]
#[command(long_about = "
Blurs PNG images with a separable box kernel and reports scratch sizes.

Examples:
  vimage blur in.png -o out.png                     # 3x3, edge extend
  vimage blur in.png -o out.png -k 9 --edge truncate
  vimage blur in.png -o out.png --kernel-width 15 --kernel-height 1
  vimage blur in.png -o out.png --edge background --background 0,0,0,255
  vimage blur in.png -o crop.png --roi 10,10,64,64
  vimage temp-size --src-width 1920 --src-height 1080 -k 31
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Box-blur an image
    #[command(visible_alias = "b")]
    Blur(BlurArgs),

    /// Print the scratch size a blur would need
    #[command(name = "temp-size", visible_alias = "ts")]
    TempSize(TempSizeArgs),
}

/// Kernel extent shared by both commands.
#[derive(Args, Clone, Copy)]
struct KernelArgs {
    /// Square kernel size (odd)
    #[arg(short = 'k', long, default_value_t = 3)]
    kernel: u32,

    /// Kernel width, overrides --kernel
    #[arg(long)]
    kernel_width: Option<u32>,

    /// Kernel height, overrides --kernel
    #[arg(long)]
    kernel_height: Option<u32>,

    /// Edge handling
    #[arg(short, long, value_enum, default_value_t = EdgeArg::Extend)]
    edge: EdgeArg,

    /// Background color R,G,B,A for --edge background
    #[arg(long, value_parser = commands::parse_color)]
    background: Option<[u8; 4]>,
}

impl KernelArgs {
    fn width(&self) -> u32 {
        self.kernel_width.unwrap_or(self.kernel)
    }

    fn height(&self) -> u32 {
        self.kernel_height.unwrap_or(self.kernel)
    }
}

#[derive(Args)]
struct BlurArgs {
    /// Input PNG
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    kernel: KernelArgs,

    /// Region of interest X,Y,W,H; the output has size W x H
    #[arg(long, value_parser = commands::parse_roi)]
    roi: Option<Roi>,
}

#[derive(Args)]
struct TempSizeArgs {
    /// Source width in pixels
    #[arg(long)]
    src_width: usize,

    /// Source height in pixels
    #[arg(long)]
    src_height: usize,

    /// Destination width, defaults to the source width
    #[arg(long)]
    width: Option<usize>,

    /// Destination height, defaults to the source height
    #[arg(long)]
    height: Option<usize>,

    /// ROI offset X
    #[arg(long, default_value_t = 0)]
    offset_x: usize,

    /// ROI offset Y
    #[arg(long, default_value_t = 0)]
    offset_y: usize,

    #[command(flatten)]
    kernel: KernelArgs,
}

/// Installs the fmt subscriber. `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Blur(args) => commands::blur::run(args, cli.verbose),
        Commands::TempSize(args) => commands::temp_size::run(args, cli.verbose),
    }
}
