use std::marker::PhantomData;

use anyhow::{anyhow, Context};
use miniz_oxide::inflate::decompress_to_vec_zlib_with_limit;
use nom::{bytes::complete::tag, IResult};

use crate::{
    chunks::{iter_chunks, parse_chunk, Chunk, ColorType, IHDRChunk, Interlacing},
    encoder::SIGNATURE,
    filters::reconstruct_scanlines,
};

pub struct PNGDecoder<'a, State>(&'a [u8], PhantomData<State>);

pub struct Start;
pub struct Chunks;
pub struct IDAT;

impl<'a> PNGDecoder<'a, Start> {
    pub fn new(data: &'a [u8]) -> anyhow::Result<Self> {
        let (rest, _) = parse_signature(data)
            .map_err(|_| anyhow!("input doesn't start with expected signature"))?;
        Ok(Self(rest, PhantomData))
    }

    pub fn parse_ihdr(self) -> anyhow::Result<(PNGDecoder<'a, Chunks>, IHDRChunk)> {
        match parse_chunk(self.0) {
            Ok((rest, Chunk::IHDR(header))) => Ok((PNGDecoder(rest, PhantomData), header)),
            Ok((_, other)) => Err(anyhow!(
                "first chunk is {}, expected IHDR",
                String::from_utf8_lossy(other.chunk_type())
            )),
            Err(_) => Err(anyhow!("IHDR chunk is malformed or fails its CRC")),
        }
    }
}

impl<'a, S> PNGDecoder<'a, S> {
    /// Skips ancillary chunks up to the next IDAT. Fails on a corrupt chunk
    /// or when IEND comes first.
    pub fn parse_idat(self) -> anyhow::Result<(PNGDecoder<'a, IDAT>, &'a [u8])> {
        let mut data = self.0;
        loop {
            let (rest, chunk) =
                parse_chunk(data).map_err(|_| anyhow!("chunk is malformed or fails its CRC"))?;
            data = rest;
            match chunk {
                Chunk::IDAT(idat) => return Ok((PNGDecoder(data, PhantomData), idat.data)),
                Chunk::IEND => anyhow::bail!("Couldn't find an IDAT"),
                _ => (),
            }
        }
    }
}

impl<'a> PNGDecoder<'a, IDAT> {
    /// Collects consecutive IDAT payloads and checks the stream ends with
    /// IEND.
    pub fn finish(self, first: &'a [u8]) -> anyhow::Result<Vec<u8>> {
        let mut compressed = first.to_vec();
        for chunk in iter_chunks(self.0) {
            match chunk?.0 {
                Chunk::IDAT(idat) => compressed.extend_from_slice(idat.data),
                Chunk::IEND => return Ok(compressed),
                _ => (),
            }
        }
        anyhow::bail!("missing IEND chunk")
    }
}

#[derive(Debug)]
pub struct DecodedPng {
    pub header: IHDRChunk,
    /// Unfiltered rows, `width * channels` bytes each.
    pub pixels: Vec<u8>,
}

impl DecodedPng {
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.header.width || y >= self.header.height {
            return None;
        }
        let channels = self.header.color_type.channel_count() as usize;
        let start = (y as usize * self.header.width as usize + x as usize) * channels;
        self.pixels.get(start..start + channels)
    }
}

/// Decodes an 8-bit, non-interlaced PNG into raw pixel rows.
pub fn decode(bytes: &[u8]) -> anyhow::Result<DecodedPng> {
    let (decoder, header) = PNGDecoder::new(bytes)?.parse_ihdr()?;
    if header.bit_depth != 8 {
        anyhow::bail!("unsupported bit depth {}", header.bit_depth);
    }
    if header.interlace_method != Interlacing::None {
        anyhow::bail!("interlaced images are not supported");
    }
    if header.color_type == ColorType::IndexedColor {
        anyhow::bail!("indexed color images are not supported");
    }
    let expected = header
        .image_data_size()
        .with_context(|| format!("{}x{} image is too large", header.width, header.height))?;
    let (decoder, first) = decoder.parse_idat()?;
    let compressed = decoder.finish(first)?;
    // inflating past the declared size means the data cannot match the header
    let data = decompress_to_vec_zlib_with_limit(&compressed, expected)
        .map_err(|e| anyhow!("{e:?}"))
        .context("Failed to decompress image data.")?;
    let pixels = reconstruct_scanlines(&data, &header)?;
    Ok(DecodedPng { header, pixels })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkInfo {
    pub chunk_type: String,
    pub length: usize,
}

/// Lists every chunk after the signature, failing on the first one whose
/// CRC or framing is wrong.
pub fn inspect(bytes: &[u8]) -> anyhow::Result<Vec<ChunkInfo>> {
    let (rest, _) = parse_signature(bytes)
        .map_err(|_| anyhow!("input doesn't start with expected signature"))?;
    let mut chunks = vec![];
    for chunk in iter_chunks(rest) {
        let (chunk, length) = chunk
            .with_context(|| format!("chunk {} is corrupt", chunks.len()))?;
        chunks.push(ChunkInfo {
            chunk_type: String::from_utf8_lossy(chunk.chunk_type()).into_owned(),
            length,
        });
    }
    if chunks.last().map(|c| c.chunk_type.as_str()) != Some("IEND") {
        anyhow::bail!("missing IEND chunk");
    }
    Ok(chunks)
}

pub(crate) fn parse_signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(SIGNATURE.as_slice())(input)
}
