use nom::{
    combinator::map_res,
    number::complete::{be_u32, u8},
    sequence::tuple,
    IResult,
};

use super::{write_chunk, ParseableChunk};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IHDRChunk {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: ColorType,
    pub compression_method: u8,
    pub filter_method: u8,
    pub interlace_method: Interlacing,
}
impl IHDRChunk {
    /// Header for an 8-bit, non-interlaced image using deflate and the
    /// standard filter set.
    pub fn new(width: u32, height: u32, color_type: ColorType) -> Self {
        Self {
            width,
            height,
            bit_depth: 8,
            color_type,
            ..Self::default()
        }
    }

    /// Bytes per complete pixel, rounded up to one for sub-byte depths.
    pub(crate) fn filter_width(&self) -> usize {
        let sample_width = u8::max(self.bit_depth / 8, 1);
        (self.color_type.channel_count() * sample_width) as usize
    }

    /// Length of one scanline including its leading filter-type byte, or
    /// `None` if it does not fit in `usize`.
    pub(crate) fn scanline_size(&self) -> Option<usize> {
        let bits = (self.width as usize)
            .checked_mul(self.color_type.channel_count() as usize)?
            .checked_mul(self.bit_depth as usize)?;
        bits.div_ceil(8).checked_add(1)
    }

    /// Length of the whole unfiltered scanline stream.
    pub(crate) fn image_data_size(&self) -> Option<usize> {
        self.scanline_size()?.checked_mul(self.height as usize)
    }
}
impl<'a> ParseableChunk<'a> for IHDRChunk {
    type Output = Vec<u8>;

    const HEADER: &'static [u8; 4] = b"IHDR";

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self> {
        let (rest, (width, height, bit_depth, color_type)) = tuple((
            be_u32,
            be_u32,
            u8,
            map_res(u8, ColorType::try_from),
        ))(chunk_data)?;
        let (rest, (compression_method, filter_method, interlace_method)) =
            tuple((u8, u8, map_res(u8, Interlacing::try_from)))(rest)?;
        Ok((
            rest,
            IHDRChunk {
                width,
                height,
                bit_depth,
                color_type,
                compression_method,
                filter_method,
                interlace_method,
            },
        ))
    }

    fn to_bytes(&self) -> Self::Output {
        let mut data = Vec::with_capacity(13);
        data.extend(self.width.to_be_bytes());
        data.extend(self.height.to_be_bytes());
        data.extend([
            self.bit_depth,
            self.color_type as u8,
            self.compression_method,
            self.filter_method,
            self.interlace_method as u8,
        ]);
        write_chunk(Self::HEADER, &data)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ColorType {
    Greyscale = 0,
    #[default]
    Truecolor = 2,
    IndexedColor = 3,
    GreyscaleWithAlpha = 4,
    TruecolorWithAlpha = 6,
}
impl TryFrom<u8> for ColorType {
    type Error = anyhow::Error;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Greyscale),
            2 => Ok(Self::Truecolor),
            3 => Ok(Self::IndexedColor),
            4 => Ok(Self::GreyscaleWithAlpha),
            6 => Ok(Self::TruecolorWithAlpha),
            v => anyhow::bail!("invalid color type {v}"),
        }
    }
}
impl ColorType {
    pub fn channel_count(&self) -> u8 {
        match self {
            Self::Greyscale => 1,
            Self::IndexedColor => 1,
            Self::GreyscaleWithAlpha => 2,
            Self::Truecolor => 3,
            Self::TruecolorWithAlpha => 4,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Interlacing {
    #[default]
    None = 0,
    Adam7 = 1,
}
impl TryFrom<u8> for Interlacing {
    type Error = anyhow::Error;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Adam7),
            v => anyhow::bail!("invalid interlace method {v}"),
        }
    }
}
