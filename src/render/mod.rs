use std::path::Path;

use anyhow::Context;
use image::{imageops, imageops::FilterType, ImageReader, RgbaImage};

use crate::{
    chunks::ColorType,
    encoder::PngEncoder,
    matrix::Fill,
    pixel::Pixel,
};

mod font;

/// Pixels ready for encoding. Solid fills skip the RGBA buffer entirely and
/// go through the truecolor encoder.
#[derive(Debug, Clone)]
pub enum Raster {
    Solid { size: u32, color: Pixel },
    Rgba(RgbaImage),
}

impl Raster {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Raster::Solid { size, .. } => (*size, *size),
            Raster::Rgba(img) => img.dimensions(),
        }
    }

    pub fn encode(&self, encoder: &PngEncoder) -> anyhow::Result<Vec<u8>> {
        match self {
            Raster::Solid { size, color } => encoder.solid(*size, *size, *color),
            Raster::Rgba(img) => {
                let (width, height) = img.dimensions();
                encoder.encode(width, height, ColorType::TruecolorWithAlpha, img.as_raw())
            }
        }
    }
}

/// A decoded source logo, held once for the whole run.
pub struct Logo {
    img: RgbaImage,
}

impl Logo {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let img = ImageReader::open(path)
            .with_context(|| format!("Source logo not found: {}", path.display()))?
            .with_guessed_format()?
            .decode()
            .with_context(|| format!("Failed to decode {}", path.display()))?
            .to_rgba8();
        let (width, height) = img.dimensions();
        log::info!("loaded source logo {} ({width}x{height})", path.display());
        Ok(Self { img })
    }

    pub fn from_image(img: RgbaImage) -> Self {
        Self { img }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.img.dimensions()
    }

    /// Scales the logo into the padded content box of a `size` square and
    /// blends it onto a canvas of `background`, transparent when `None`.
    pub fn render(&self, size: u32, background: Option<Pixel>) -> RgbaImage {
        let (src_w, src_h) = self.img.dimensions();
        let (w, h) = fit(src_w, src_h, size);
        let (x, y) = center(size, w, h);
        log::debug!("logo {src_w}x{src_h} -> {w}x{h} at ({x}, {y}) in {size}x{size}");

        let background = background.unwrap_or(Pixel::TRANSPARENT);
        let mut canvas = RgbaImage::from_pixel(size, size, background.into());
        let resized = imageops::resize(&self.img, w, h, FilterType::Lanczos3);
        imageops::overlay(&mut canvas, &resized, x as i64, y as i64);
        canvas
    }
}

/// Padding on each side of a `size` square: one eighth, rounded down.
pub fn padding(size: u32) -> u32 {
    size / 8
}

/// Dimensions of a `src_w` x `src_h` image scaled so its longer axis spans
/// the padded content box of a `size` square. Never returns zero.
pub fn fit(src_w: u32, src_h: u32, size: u32) -> (u32, u32) {
    let max = u64::from(size - 2 * padding(size)).max(1);
    let (src_w, src_h) = (u64::from(src_w.max(1)), u64::from(src_h.max(1)));
    let (w, h) = if src_w > src_h {
        (max, max * src_h / src_w)
    } else {
        (max * src_w / src_h, max)
    };
    (w.max(1) as u32, h.max(1) as u32)
}

/// Top-left offset placing a `w` x `h` box in the middle of a `size` square.
pub fn center(size: u32, w: u32, h: u32) -> (u32, u32) {
    (size.saturating_sub(w) / 2, size.saturating_sub(h) / 2)
}

/// Border width used by badge fills.
pub fn border_width(size: u32) -> u32 {
    (size / 16).max(1)
}

/// Flat `color` square with a `border` ring and `text` drawn in the border
/// color. Characters missing from the built-in font are skipped.
pub fn badge(size: u32, color: Pixel, border: Pixel, text: &str) -> RgbaImage {
    let bw = border_width(size);
    let mut img = RgbaImage::from_fn(size, size, |x, y| {
        let edge = x < bw || y < bw || x >= size.saturating_sub(bw) || y >= size.saturating_sub(bw);
        let pixel = if edge { border } else { color };
        pixel.into()
    });

    let glyphs: Vec<_> = text
        .chars()
        .filter_map(|c| {
            let glyph = font::glyph(c);
            if glyph.is_none() {
                log::warn!("no built-in glyph for {c:?}, drawing without it");
            }
            glyph
        })
        .collect();
    if glyphs.is_empty() {
        return img;
    }

    let n = glyphs.len() as u32;
    let cols = n * font::WIDTH + (n - 1);
    let inner = size.saturating_sub(2 * bw);
    let scale = (size / 2 / font::HEIGHT).min(inner * 3 / 4 / cols);
    if scale == 0 {
        log::warn!("{size}x{size} badge is too small for {text:?}, drawing without text");
        return img;
    }
    let (x0, y0) = center(size, cols * scale, font::HEIGHT * scale);
    for (i, rows) in glyphs.iter().enumerate() {
        let gx = x0 + i as u32 * (font::WIDTH + 1) * scale;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..font::WIDTH {
                if bits & (1 << (font::WIDTH - 1 - col)) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        img.put_pixel(
                            gx + col * scale + dx,
                            y0 + row as u32 * scale + dy,
                            border.into(),
                        );
                    }
                }
            }
        }
    }
    img
}

/// Produces the pixels for one `size` square under `fill`.
pub fn render(fill: &Fill, size: u32, logo: Option<&Logo>) -> anyhow::Result<Raster> {
    if size == 0 {
        anyhow::bail!("icon size must be positive");
    }
    let raster = match fill {
        Fill::Solid { color } => Raster::Solid {
            size,
            color: *color,
        },
        Fill::Badge {
            color,
            border,
            text,
        } => Raster::Rgba(badge(size, *color, *border, text)),
        Fill::Logo { background } => {
            let logo = logo.context("logo fill requested but no source logo is loaded")?;
            Raster::Rgba(logo.render(size, *background))
        }
    };
    Ok(raster)
}
