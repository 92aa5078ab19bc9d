use nom::{
    bytes::complete::{tag, take},
    combinator::map,
    multi::length_data,
    number::complete::be_u32,
    sequence::terminated,
    IResult,
};

use crate::crc::chunk_crc;

pub mod idat;
pub mod iend;
pub mod ihdr;

pub use idat::IDATChunk;
pub use iend::IENDChunk;
pub use ihdr::{ColorType, IHDRChunk, Interlacing};

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug)]
pub enum Chunk<'a> {
    IHDR(IHDRChunk),
    IDAT(IDATChunk<&'a [u8]>),
    IEND,
    Unknown(RawChunk<'a>),
}

impl Chunk<'_> {
    pub fn chunk_type(&self) -> &[u8; 4] {
        match self {
            Chunk::IHDR(_) => b"IHDR",
            Chunk::IDAT(_) => b"IDAT",
            Chunk::IEND => b"IEND",
            Chunk::Unknown(raw) => raw.chunk_type,
        }
    }
}

pub fn iter_chunks(source: &[u8]) -> ChunkIter {
    ChunkIter {
        source,
        finished: false,
    }
}

pub struct ChunkIter<'a> {
    source: &'a [u8],
    finished: bool,
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = anyhow::Result<(Chunk<'a>, usize)>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match parse_chunk(self.source) {
            Ok((rest, chunk)) => {
                let length = self.source.len() - rest.len() - 12;
                self.source = rest;
                if matches!(chunk, Chunk::IEND) {
                    self.finished = true;
                }
                Some(Ok((chunk, length)))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(anyhow::anyhow!("malformed chunk: {:?}", e.map(|e| e.code))))
            }
        }
    }
}

pub(crate) fn parse_chunk(input: &[u8]) -> IResult<&[u8], Chunk<'_>> {
    let (rest, (header, chunk_data)) = valid_chunk(input)?;
    match header {
        b"IHDR" => Ok((rest, Chunk::IHDR(IHDRChunk::from_bytes(chunk_data)?.1))),
        b"IDAT" => Ok((rest, Chunk::IDAT(IDATChunk::from_bytes(chunk_data)?.1))),
        b"IEND" => Ok((rest, Chunk::IEND)),
        _ => Ok((
            rest,
            Chunk::Unknown(RawChunk {
                chunk_type: header,
                data: chunk_data,
            }),
        )),
    }
}

#[derive(Debug)]
pub struct RawChunk<'a> {
    pub chunk_type: &'a [u8; 4],
    pub data: &'a [u8],
}

/// Splits one chunk off the input, checking its trailing CRC against the
/// type tag and payload.
fn valid_chunk<'a, Error: nom::error::ParseError<&'a [u8]>>(
    input: &'a [u8],
) -> IResult<&'a [u8], (&'a [u8; 4], &'a [u8]), Error> {
    let (header_length, crc_length) = (4usize, 4usize);
    let (input, chunk_data) = length_data(map(be_u32, |v| {
        v as usize + header_length + crc_length
    }))(input)?;
    let (chunk_type, rest) = chunk_data.split_at(header_length);
    let chunk_type: &[u8; 4] = chunk_type
        .try_into()
        .map_err(|_| nom::Err::Error(Error::from_error_kind(input, nom::error::ErrorKind::Eof)))?;
    let payload_length = rest.len() - crc_length;
    let crc = chunk_crc(chunk_type, &rest[..payload_length]).to_be_bytes();
    let (_, payload) = terminated(take(payload_length), tag(crc.as_slice()))(rest)?;
    let data = (chunk_type, payload);
    Ok((input, data))
}

/// Writes `length ++ type ++ data ++ crc(type ++ data)`.
pub(crate) fn write_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(data.len() + 12);
    bytes.extend((data.len() as u32).to_be_bytes());
    bytes.extend(chunk_type);
    bytes.extend(data);
    bytes.extend(chunk_crc(chunk_type, data).to_be_bytes());
    log::debug!(
        "wrote {} chunk with {} byte payload",
        String::from_utf8_lossy(chunk_type),
        data.len()
    );
    bytes
}

pub trait ParseableChunk<'a>: Sized {
    type Output: AsRef<[u8]>;
    const HEADER: &'static [u8; 4];

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self>;
    fn to_bytes(&self) -> Self::Output;
}
