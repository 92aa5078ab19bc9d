const CRC_TABLE: [u32; 256] = {
    let mut table = [0; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut i = 0;
        while i < 8 {
            if c & 1 != 0 {
                c = 0xedb88320 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            i += 1;
        }
        table[n as usize] = c;
        n += 1;
    }
    table
};

/// Running CRC-32 state. Starts at all ones and is inverted on `finish`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Crc(u32);

impl Crc {
    pub(crate) fn new() -> Self {
        Self(0xffffffff)
    }

    pub(crate) fn update(mut self, data: &[u8]) -> Self {
        for &b in data {
            let index = (self.0 ^ b as u32) & 0xff;
            self.0 = CRC_TABLE[index as usize] ^ (self.0 >> 8);
        }
        self
    }

    pub(crate) fn finish(self) -> u32 {
        self.0 ^ 0xffffffff
    }
}

/// CRC of a chunk as stored after its payload: covers the type tag and the
/// payload, never the length field.
pub(crate) fn chunk_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    Crc::new().update(chunk_type).update(data).finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_value() {
        assert_eq!(Crc::new().update(b"123456789").finish(), 0xcbf43926);
    }

    #[test]
    fn empty_iend() {
        assert_eq!(chunk_crc(b"IEND", &[]), 0xae426082);
    }

    #[test]
    fn split_update_matches_whole() {
        let whole = Crc::new().update(b"IHDRpayload bytes").finish();
        assert_eq!(chunk_crc(b"IHDR", b"payload bytes"), whole);
    }
}
