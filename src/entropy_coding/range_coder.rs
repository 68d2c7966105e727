//! Binary range coder driven by a 16-bit probability of the next bit
//! being one.
//!
//! The interval [low, high] splits at a bound proportional to the model's
//! probability; the coded bit picks a half. Settled top bits leave the
//! interval through E1 renormalization, with `follow` counting deferred
//! E3 decisions whose complements are emitted once the next top bit
//! settles. The decoder mirrors every interval operation while sliding a
//! 32-bit code window over the stream, so the two state machines stay in
//! lockstep for any probability sequence in [1, 65534].

use std::io::{self, Read, Write};

use crate::bitstream::{BitReader, BitWriter};

use super::{HALF, Q1, Q3};

/// Floor of the probability range the models may hand the coder.
pub const P_MIN: u16 = 1;
/// Ceiling of the probability range the models may hand the coder.
pub const P_MAX: u16 = 0xFFFE;

/// Split the interval at the bound below which a zero bit falls. The
/// multiply widens to u64; `range * (0xFFFF - p1)` overflows 32 bits.
fn bound(low: u32, high: u32, p1: u16) -> u32 {
    debug_assert!((P_MIN..=P_MAX).contains(&p1));
    let range = u64::from(high - low) + 1;
    low + ((range * u64::from(0xFFFF - p1)) >> 16) as u32
}

/// Encoder half. `finish` must be called to settle the tail of the
/// stream.
pub struct RangeCoder<W: Write> {
    low: u32,
    high: u32,
    follow: u64,
    bits: BitWriter<W>,
}

impl<W: Write> RangeCoder<W> {
    pub fn new(sink: W) -> Self {
        Self {
            low: 0,
            high: u32::MAX,
            follow: 0,
            bits: BitWriter::new(sink),
        }
    }

    fn put_bit_with_follow(&mut self, bit: u8) -> io::Result<()> {
        self.bits.put_bit(bit)?;
        while self.follow > 0 {
            self.follow -= 1;
            self.bits.put_bit(bit ^ 1)?;
        }
        Ok(())
    }

    pub fn encode(&mut self, bit: u8, p1: u16) -> io::Result<()> {
        let mid = bound(self.low, self.high, p1);
        if bit != 0 {
            self.low = mid + 1;
        } else {
            self.high = mid;
        }

        // E1/E2: the top bit has settled, ship it together with any
        // deferred E3 complements.
        while (self.low ^ self.high) & HALF == 0 {
            self.put_bit_with_follow((self.low >> 31) as u8)?;
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
        }

        // E3: straddling the midpoint inside the middle quarters. Rotate
        // the interval around the midpoint and remember the deferral.
        while self.low >= Q1 && self.high < Q3 {
            self.follow += 1;
            self.low = (self.low << 1) & !HALF;
            self.high = (self.high << 1) | HALF | 1;
        }
        Ok(())
    }

    /// Emit the 32 bits of `low` MSB-first. Together with the zero
    /// padding the reader supplies past end-of-stream this pins the
    /// decoder's code window inside the final interval.
    pub fn finish(mut self) -> io::Result<W> {
        let mut tail = self.low;
        for _ in 0..32 {
            self.put_bit_with_follow((tail >> 31) as u8)?;
            tail <<= 1;
        }
        self.bits.finish()
    }
}

/// Decoder half. Seeds its code window with 32 stream bits and then
/// mirrors the encoder bit for bit.
pub struct RangeDecoder<R: Read> {
    low: u32,
    high: u32,
    code: u32,
    bits: BitReader<R>,
}

impl<R: Read> RangeDecoder<R> {
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

    pub fn decode(&mut self, p1: u16) -> io::Result<u8> {
        let mid = bound(self.low, self.high, p1);
        let bit = u8::from(self.code > mid);
        if bit != 0 {
            self.low = mid + 1;
        } else {
            self.high = mid;
        }

        while (self.low ^ self.high) & HALF == 0 {
            self.low <<= 1;
            self.high = (self.high << 1) | 1;
            self.code = (self.code << 1) | u32::from(self.bits.get_bit()?);
        }

        while self.low >= Q1 && self.high < Q3 {
            self.low = (self.low << 1) & !HALF;
            self.high = (self.high << 1) | HALF | 1;
            self.code = ((self.code << 1) ^ HALF) | u32::from(self.bits.get_bit()?);
        }
        Ok(bit)
    }
}

#[cfg(test)]
mod test {
    use super::{RangeCoder, RangeDecoder};

    fn roundtrip(bits: &[u8], probs: &[u16]) {
        assert_eq!(bits.len(), probs.len());
        let mut enc = RangeCoder::new(Vec::new());
        for (&b, &p) in bits.iter().zip(probs) {
            enc.encode(b, p).unwrap();
        }
        let packed = enc.finish().unwrap();

        let mut dec = RangeDecoder::new(packed.as_slice()).unwrap();
        for (&b, &p) in bits.iter().zip(probs) {
            assert_eq!(dec.decode(p).unwrap(), b);
        }
    }

    #[test]
    fn neutral_probability() {
        let bits = [1, 0, 0, 1, 1, 1, 0, 1, 0, 0];
        roundtrip(&bits, &[0x8000; 10]);
    }

    #[test]
    fn extreme_probabilities() {
        // A confident model that is sometimes wrong still round-trips.
        let bits = [1, 1, 1, 0, 1, 1, 1, 1, 0, 1, 1, 1];
        let probs = [super::P_MAX; 12];
        roundtrip(&bits, &probs);
        let bits = [0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0];
        let probs = [super::P_MIN; 12];
        roundtrip(&bits, &probs);
    }

    #[test]
    fn varying_probabilities() {
        // Pseudo-random bits and probabilities from a fixed LCG seed.
        let mut state = 0x2545_F491u32;
        let mut bits = Vec::new();
        let mut probs = Vec::new();
        for _ in 0..4096 {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            bits.push((state >> 16) as u8 & 1);
            let p = (state % 0xFFFE) as u16 + 1;
            probs.push(p);
        }
        roundtrip(&bits, &probs);
    }

    #[test]
    fn empty_stream() {
        let enc = RangeCoder::new(Vec::new());
        let packed = enc.finish().unwrap();
        assert_eq!(packed.len(), 4);
        RangeDecoder::new(packed.as_slice()).unwrap();
    }
}
