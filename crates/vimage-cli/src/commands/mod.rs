//! CLI command implementations

pub mod blur;
pub mod temp_size;

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use vimage_core::{Flags, PixelBuffer};

/// Edge handling as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EdgeArg {
    /// Leave pixels near the border unblurred
    Copy,
    /// Average only the samples inside the image
    Truncate,
    /// Treat samples outside the image as --background
    Background,
    /// Repeat the nearest edge pixel
    Extend,
}

impl EdgeArg {
    /// The edge-style flag for this choice.
    pub fn flag(self) -> Flags {
        match self {
            Self::Copy => Flags::COPY_IN_PLACE,
            Self::Truncate => Flags::TRUNCATE_KERNEL,
            Self::Background => Flags::BACKGROUND_COLOR_FILL,
            Self::Extend => Flags::EDGE_EXTEND,
        }
    }
}

/// Region of interest in source pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

fn parse_list<T: std::str::FromStr, const N: usize>(s: &str, what: &str) -> Result<[T; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated {what}, got '{s}'"));
    }
    let mut values = Vec::with_capacity(N);
    for part in parts {
        values.push(
            part.parse::<T>()
                .map_err(|_| format!("invalid {what} component '{part}'"))?,
        );
    }
    values
        .try_into()
        .map_err(|_| format!("expected {N} comma-separated {what}"))
}

/// Parses `R,G,B,A`.
pub fn parse_color(s: &str) -> Result<[u8; 4], String> {
    parse_list(s, "color channels")
}

/// Parses `X,Y,W,H`.
pub fn parse_roi(s: &str) -> Result<Roi, String> {
    let [x, y, width, height] = parse_list(s, "roi values")?;
    Ok(Roi {
        x,
        y,
        width,
        height,
    })
}

/// Loads a PNG as 8-bit RGBA.
pub fn load_png(path: &Path) -> Result<PixelBuffer> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .with_context(|| format!("Failed to decode: {}", path.display()))?;

    let buf_size = reader
        .output_buffer_size()
        .context("Cannot determine PNG output buffer size")?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .with_context(|| format!("Failed to decode: {}", path.display()))?;
    let data = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => data.to_vec(),
        (png::ColorType::Rgb, png::BitDepth::Eight) => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            data.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (color, depth) => bail!("Unsupported PNG layout: {color:?} {depth:?}"),
    };

    PixelBuffer::from_packed(info.width as usize, info.height as usize, &rgba)
        .with_context(|| format!("Invalid image: {}", path.display()))
}

/// Saves a buffer as 8-bit RGBA PNG.
pub fn save_png(path: &Path, image: &PixelBuffer) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create: {}", path.display()))?;
    let width = u32::try_from(image.width()).context("Image too wide for PNG")?;
    let height = u32::try_from(image.height()).context("Image too tall for PNG")?;

    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    writer
        .write_image_data(&image.to_packed())
        .with_context(|| format!("Failed to save: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("1, 2,3,255"), Ok([1, 2, 3, 255]));
        assert!(parse_color("1,2,3").is_err());
        assert!(parse_color("1,2,3,256").is_err());
    }

    #[test]
    fn test_parse_roi() {
        let roi = parse_roi("4,8,16,32").unwrap();
        assert_eq!(
            roi,
            Roi {
                x: 4,
                y: 8,
                width: 16,
                height: 32
            }
        );
        assert!(parse_roi("4,8,-1,2").is_err());
    }

    #[test]
    fn test_png_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.png");

        let packed: Vec<u8> = (0..5 * 3 * 4).map(|i| (i * 7 % 256) as u8).collect();
        let image = PixelBuffer::from_packed(5, 3, &packed).unwrap();
        save_png(&path, &image).unwrap();

        let loaded = load_png(&path).unwrap();
        assert_eq!(loaded.width(), 5);
        assert_eq!(loaded.height(), 3);
        assert_eq!(loaded.to_packed(), packed);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_png(&dir.path().join("missing.png")).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }

    #[test]
    fn test_edge_flags() {
        assert_eq!(EdgeArg::Copy.flag(), Flags::COPY_IN_PLACE);
        assert_eq!(EdgeArg::Background.flag(), Flags::BACKGROUND_COLOR_FILL);
    }
}
