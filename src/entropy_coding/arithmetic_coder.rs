//! 32-bit arithmetic coder working against a cumulative frequency table.
//!
//! The interval [low, high] narrows to the coded symbol's band on every
//! step. Settled top bits leave through the bit writer (E1/E2); when the
//! interval straddles the midpoint inside the middle quarters the coder
//! defers the decision and counts underflow bits instead (E3), emitting
//! them as complements once the next top bit settles.

use std::io::{self, Read, Write};

use crate::bitstream::{BitReader, BitWriter};

use super::freq_table::FrequencyTable;
use super::{HALF, Q1, Q3};

/// Encoder half of the coder pair.
pub struct ArithmeticEncoder<W: Write> {
    low: u32,
    high: u32,
    underflow: u64,
    bits: BitWriter<W>,
}

impl<W: Write> ArithmeticEncoder<W> {
    pub fn new(sink: W) -> Self {
        Self {
            low: 0,
            high: u32::MAX,
            underflow: 0,
            bits: BitWriter::new(sink),
        }
    }

    fn put_bit_with_underflow(&mut self, bit: u8) -> io::Result<()> {
        self.bits.put_bit(bit)?;
        while self.underflow > 0 {
            self.underflow -= 1;
            self.bits.put_bit(bit ^ 1)?;
        }
        Ok(())
    }

    /// Narrow the interval to the symbol's band and renormalize. The
    /// widening multiply runs in u64; `range * cum` does not fit in 32
    /// bits, and at the initial state `range` itself is 2^32.
    pub fn encode(&mut self, symbol: u16, table: &FrequencyTable) -> io::Result<()> {
        let range = u64::from(self.high - self.low) + 1;
        let total = u64::from(table.total());
        self.high = self.low + (range * u64::from(table.high(symbol)) / total - 1) as u32;
        self.low += (range * u64::from(table.low(symbol)) / total) as u32;

        loop {
            if self.high < HALF {
                // E1: both below the midpoint.
                self.put_bit_with_underflow(0)?;
            } else if self.low >= HALF {
                // E2: both above the midpoint.
                self.put_bit_with_underflow(1)?;
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= Q1 && self.high < Q3 {
                // E3: straddling the midpoint inside the middle quarters.
                self.underflow += 1;
                self.low -= Q1;
                self.high -= Q1;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
        }
        Ok(())
    }

    /// Disambiguate the final interval with one more bit (plus pending
    /// underflow bits), pad to a byte boundary and hand the sink back.
    pub fn finish(mut self) -> io::Result<W> {
        self.underflow += 1;
        if self.low < Q1 {
            self.put_bit_with_underflow(0)?;
        } else {
            self.put_bit_with_underflow(1)?;
        }
        self.bits.finish()
    }
}

/// Decoder half of the coder pair. Mirrors every interval update the
/// encoder makes, consuming stream bits where the encoder emitted them.
pub struct ArithmeticDecoder<R: Read> {
    low: u32,
    high: u32,
    code: u32,
    bits: BitReader<R>,
}

impl<R: Read> ArithmeticDecoder<R> {
    /// Seeds the code register with the first 32 stream bits.
    pub fn new(source: R) -> io::Result<Self> {
        let mut bits = BitReader::new(source);
        let code = bits.get_u32()?;
        Ok(Self {
            low: 0,
            high: u32::MAX,
            code,
            bits,
        })
    }

    pub fn decode(&mut self, table: &FrequencyTable) -> io::Result<u16> {
        let range = u64::from(self.high - self.low) + 1;
        let total = u64::from(table.total());
        // Wrapping math: a damaged stream may push code outside the
        // interval, and the contract there is garbled output, not a
        // panic.
        let value = ((u64::from(self.code.wrapping_sub(self.low)) + 1) * total - 1) / range;
        let symbol = table.symbol_for(value as u32);

        self.high = self.low + (range * u64::from(table.high(symbol)) / total - 1) as u32;
        self.low += (range * u64::from(table.low(symbol)) / total) as u32;

        loop {
            if self.high < HALF {
                // E1: nothing to remove, the top bit is already zero.
            } else if self.low >= HALF {
                self.code = self.code.wrapping_sub(HALF);
                self.low -= HALF;
                self.high -= HALF;
            } else if self.low >= Q1 && self.high < Q3 {
                self.code = self.code.wrapping_sub(Q1);
                self.low -= Q1;
                self.high -= Q1;
            } else {
                break;
            }
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
            self.code = (self.code << 1) | u32::from(self.bits.get_bit()?);
        }
        Ok(symbol)
    }
}

#[cfg(test)]
mod test {
    use super::super::freq_table::{FrequencyTable, EOF_SYMBOL};
    use super::{ArithmeticDecoder, ArithmeticEncoder};

    fn roundtrip(symbols: &[u16]) {
        let mut table = FrequencyTable::new();
        let mut enc = ArithmeticEncoder::new(Vec::new());
        for &s in symbols {
            enc.encode(s, &table).unwrap();
            table.update(s);
        }
        enc.encode(EOF_SYMBOL, &table).unwrap();
        let packed = enc.finish().unwrap();

        let mut table = FrequencyTable::new();
        let mut dec = ArithmeticDecoder::new(packed.as_slice()).unwrap();
        for &expected in symbols {
            let s = dec.decode(&table).unwrap();
            assert_eq!(s, expected);
            table.update(s);
        }
        assert_eq!(dec.decode(&table).unwrap(), EOF_SYMBOL);
    }

    #[test]
    fn empty_stream_is_just_eof() {
        roundtrip(&[]);
    }

    #[test]
    fn single_symbol() {
        roundtrip(&[65]);
    }

    #[test]
    fn skewed_sequence() {
        let mut symbols = vec![0u16; 500];
        symbols.extend([1, 2, 3, 255, 0, 0, 7]);
        roundtrip(&symbols);
    }

    #[test]
    fn all_byte_values() {
        let symbols: Vec<u16> = (0..=255).collect();
        roundtrip(&symbols);
    }
}
