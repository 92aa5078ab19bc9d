use anyhow::Context;
use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::{
    chunks::{ColorType, IDATChunk, IENDChunk, IHDRChunk, ParseableChunk},
    pixel::Pixel,
};

pub const SIGNATURE: &[u8; 8] = b"\x89PNG\x0d\x0a\x1a\x0a";

/// Builds complete PNG files in memory: signature, IHDR, a single IDAT and
/// IEND. Every scanline uses filter type 0.
#[derive(Debug, Clone, Copy)]
pub struct PngEncoder {
    level: u8,
}

impl Default for PngEncoder {
    fn default() -> Self {
        Self { level: 6 }
    }
}

impl PngEncoder {
    /// zlib compression level, clamped to 0..=10.
    pub fn with_level(level: u8) -> Self {
        Self {
            level: level.min(10),
        }
    }

    /// Encodes 8-bit `Truecolor` or `TruecolorWithAlpha` pixels given in
    /// row-major order with no padding.
    pub fn encode(
        &self,
        width: u32,
        height: u32,
        color_type: ColorType,
        pixels: &[u8],
    ) -> anyhow::Result<Vec<u8>> {
        if width == 0 || height == 0 {
            anyhow::bail!("image dimensions must be positive, got {width}x{height}");
        }
        if !matches!(
            color_type,
            ColorType::Truecolor | ColorType::TruecolorWithAlpha
        ) {
            anyhow::bail!("unsupported color type {color_type:?}");
        }
        let header = IHDRChunk::new(width, height, color_type);
        let expected = header
            .scanline_size()
            .and_then(|size| (size - 1).checked_mul(height as usize))
            .with_context(|| format!("{width}x{height} image is too large"))?;
        let row_len = expected / height as usize;
        if pixels.len() != expected {
            anyhow::bail!(
                "pixel buffer is {} bytes, expected {expected} for {width}x{height} {color_type:?}",
                pixels.len()
            );
        }

        let mut scanlines = Vec::with_capacity(expected + height as usize);
        for row in pixels.chunks(row_len) {
            scanlines.push(0);
            scanlines.extend_from_slice(row);
        }
        Ok(self.assemble(&header, &scanlines))
    }

    /// A `width` x `height` RGB image where every pixel is `color`. Alpha is
    /// ignored.
    pub fn solid(&self, width: u32, height: u32, color: Pixel) -> anyhow::Result<Vec<u8>> {
        if width == 0 || height == 0 {
            anyhow::bail!("image dimensions must be positive, got {width}x{height}");
        }
        let header = IHDRChunk::new(width, height, ColorType::Truecolor);
        let scanline_size = header
            .scanline_size()
            .with_context(|| format!("{width}x{height} image is too large"))?;
        let mut row = Vec::with_capacity(scanline_size);
        row.push(0);
        for _ in 0..width {
            row.extend(color.to_rgb());
        }
        let scanlines = row.repeat(height as usize);
        Ok(self.assemble(&header, &scanlines))
    }

    fn assemble(&self, header: &IHDRChunk, scanlines: &[u8]) -> Vec<u8> {
        let idat = IDATChunk {
            data: compress_to_vec_zlib(scanlines, self.level),
        };
        log::debug!(
            "compressed {} scanline bytes to {} for {}x{}",
            scanlines.len(),
            idat.data.len(),
            header.width,
            header.height
        );
        let mut bytes = SIGNATURE.to_vec();
        bytes.extend(header.to_bytes());
        bytes.extend(idat.to_bytes());
        bytes.extend(IENDChunk.to_bytes());
        bytes
    }
}
