use super::{write_chunk, ParseableChunk};
use nom::IResult;

/// Compressed image data. Holds borrowed bytes when parsed and owned bytes
/// when built by the encoder.
#[derive(Debug)]
pub struct IDATChunk<T> {
    pub data: T,
}
impl<'a, T> ParseableChunk<'a> for IDATChunk<T>
where
    T: AsRef<[u8]> + From<&'a [u8]>,
{
    type Output = Vec<u8>;

    const HEADER: &'static [u8; 4] = b"IDAT";

    fn from_bytes(chunk_data: &'a [u8]) -> IResult<&'a [u8], Self> {
        Ok((
            &chunk_data[chunk_data.len()..],
            IDATChunk {
                data: chunk_data.into(),
            },
        ))
    }

    fn to_bytes(&self) -> Self::Output {
        write_chunk(Self::HEADER, self.data.as_ref())
    }
}
