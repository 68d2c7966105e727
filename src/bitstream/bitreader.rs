use std::io::{self, ErrorKind, Read};

/// Serves single bits MSB-first from any byte source. Once the source is
/// exhausted every further bit reads as zero; the entropy coders use that
/// padding to resolve their final interval, so running off the end of the
/// stream is not an error here.
pub struct BitReader<R: Read> {
    source: R,
    queue: u8,
    q_bits: u8,
    exhausted: bool,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            queue: 0,
            q_bits: 0,
            exhausted: false,
        }
    }

    fn next_byte(&mut self) -> io::Result<u8> {
        if self.exhausted {
            return Ok(0);
        }
        let mut byte = [0u8];
        match self.source.read_exact(&mut byte) {
            Ok(()) => Ok(byte[0]),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.exhausted = true;
                Ok(0)
            }
            Err(e) => Err(e),
        }
    }

    /// Return the next bit, or zero past the end of the source.
    pub fn get_bit(&mut self) -> io::Result<u8> {
        if self.q_bits == 0 {
            self.queue = self.next_byte()?;
            self.q_bits = 8;
        }
        self.q_bits -= 1;
        Ok((self.queue >> self.q_bits) & 1)
    }

    /// Read the next 32 bits as a big-endian word. The coders seed their
    /// code register with this before the first decode.
    pub fn get_u32(&mut self) -> io::Result<u32> {
        let mut word = 0u32;
        for _ in 0..32 {
            word = (word << 1) | u32::from(self.get_bit()?);
        }
        Ok(word)
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;

    #[test]
    fn bits_come_out_msb_first() {
        let data = [0b1000_0001u8];
        let mut br = BitReader::new(data.as_slice());
        assert_eq!(br.get_bit().unwrap(), 1);
        for _ in 0..6 {
            assert_eq!(br.get_bit().unwrap(), 0);
        }
        assert_eq!(br.get_bit().unwrap(), 1);
    }

    #[test]
    fn exhausted_source_reads_zero() {
        let data = [0xFFu8];
        let mut br = BitReader::new(data.as_slice());
        for _ in 0..8 {
            assert_eq!(br.get_bit().unwrap(), 1);
        }
        for _ in 0..24 {
            assert_eq!(br.get_bit().unwrap(), 0);
        }
    }

    #[test]
    fn get_u32_is_big_endian() {
        let data = [0x12u8, 0x34, 0x56, 0x78];
        let mut br = BitReader::new(data.as_slice());
        assert_eq!(br.get_u32().unwrap(), 0x1234_5678);
    }
}
