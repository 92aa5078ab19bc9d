use anyhow::anyhow;

use crate::chunks::IHDRChunk;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    None,
    Sub,
    Up,
    Average,
    Paeth,
}
impl Filter {
    /// Inverts the filter for one byte. `a` is the byte one pixel to the
    /// left, `b` the byte above, `c` the byte above and to the left.
    pub fn reconstruct(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        match self {
            Filter::None => x,
            Filter::Sub => x.wrapping_add(a),
            Filter::Up => x.wrapping_add(b),
            Filter::Average => x.wrapping_add(((a as u16 + b as u16) / 2) as u8),
            Filter::Paeth => x.wrapping_add(paeth_predictor(a, b, c)),
        }
    }
}
impl TryFrom<u8> for Filter {
    type Error = anyhow::Error;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Sub),
            2 => Ok(Self::Up),
            3 => Ok(Self::Average),
            4 => Ok(Self::Paeth),
            i => Err(anyhow!("unknown filter type {i}")),
        }
    }
}

fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Undoes per-scanline filtering in place and strips the filter bytes,
/// returning the raw pixel rows.
pub(crate) fn reconstruct_scanlines(data: &[u8], header: &IHDRChunk) -> anyhow::Result<Vec<u8>> {
    let (Some(scanline_size), Some(expected)) = (header.scanline_size(), header.image_data_size())
    else {
        anyhow::bail!("{}x{} image is too large", header.width, header.height);
    };
    let row_len = scanline_size - 1;
    let bpp = header.filter_width();
    if data.len() != expected {
        anyhow::bail!(
            "image data is {} bytes, expected {expected} for {}x{}",
            data.len(),
            header.width,
            header.height
        );
    }

    let mut pixels = vec![0u8; expected - header.height as usize];
    for (y, scanline) in data.chunks(scanline_size).enumerate() {
        let filter = Filter::try_from(scanline[0])?;
        let (done, current) = pixels.split_at_mut(y * row_len);
        let previous = y.checked_sub(1).map(|p| &done[p * row_len..]);
        let current = &mut current[..row_len];
        for i in 0..row_len {
            let a = if i >= bpp { current[i - bpp] } else { 0 };
            let b = previous.map_or(0, |row| row[i]);
            let c = match previous {
                Some(row) if i >= bpp => row[i - bpp],
                _ => 0,
            };
            current[i] = filter.reconstruct(scanline[i + 1], a, b, c);
        }
    }
    Ok(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunks::ColorType;

    #[test]
    fn paeth_picks_nearest() {
        assert_eq!(paeth_predictor(10, 20, 10), 20);
        assert_eq!(paeth_predictor(20, 10, 10), 20);
        assert_eq!(paeth_predictor(0, 0, 0), 0);
    }

    #[test]
    fn sub_and_up_rows() {
        let header = IHDRChunk::new(2, 2, ColorType::Greyscale);
        // row 0: Sub, [5, +3] -> [5, 8]; row 1: Up, [+1, +1] -> [6, 9]
        let data = [1, 5, 3, 2, 1, 1];
        let pixels = reconstruct_scanlines(&data, &header).unwrap();
        assert_eq!(pixels, vec![5, 8, 6, 9]);
    }

    #[test]
    fn length_mismatch_is_an_error() {
        let header = IHDRChunk::new(2, 2, ColorType::Greyscale);
        assert!(reconstruct_scanlines(&[0, 1, 2], &header).is_err());
    }

    #[test]
    fn unknown_filter_is_an_error() {
        let header = IHDRChunk::new(1, 1, ColorType::Greyscale);
        assert!(reconstruct_scanlines(&[9, 1], &header).is_err());
    }
}
