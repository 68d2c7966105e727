use std::collections::HashMap;

use super::{Predictor, P_NEUTRAL};

/// Bytes of history kept in the ring buffer.
const CAPACITY: usize = 1 << 20;

/// How many trailing bytes form the lookup context.
const CONTEXT: usize = 3;

/// Predicts the next bit from the longest recent repeat of the current
/// context.
///
/// A ring buffer holds the last mebibyte of history and a table maps each
/// 3-byte context to the position right after its most recent occurrence.
/// While a match is live the model predicts each bit of the matched byte,
/// with confidence growing as the match extends; the first contradicted
/// bit drops the match until the next byte boundary offers a new
/// candidate. The candidate lookup always happens at the byte boundary,
/// before any of the following byte's bits are coded, so the encoder and
/// decoder see identical match state.
pub struct MatchModel {
    buf: Vec<u8>,
    pos: usize,
    table: HashMap<u32, usize>,
    match_pos: usize,
    match_len: u32,
    bit_pos: u8,
    active: bool,
}

impl MatchModel {
    pub fn new() -> Self {
        Self {
            buf: vec![0; CAPACITY],
            pos: 0,
            table: HashMap::new(),
            match_pos: 0,
            match_len: 0,
            bit_pos: 0,
            active: false,
        }
    }

    /// The byte the live match expects next.
    fn expected(&self) -> u8 {
        self.buf[self.match_pos % CAPACITY]
    }

    /// Confidence offset from neutral, non-decreasing in the match
    /// length.
    fn stride(&self) -> u16 {
        match self.match_len {
            0 | 1 => 256,
            2..=3 => 1024,
            4..=7 => 4096,
            _ => 8192,
        }
    }

    fn context_key(&self) -> u32 {
        let mut key = 0u32;
        for i in (1..=CONTEXT).rev() {
            key = (key << 8) | u32::from(self.buf[(self.pos - i) % CAPACITY]);
        }
        key
    }
}

impl Predictor for MatchModel {
    fn predict(&self) -> u16 {
        if !self.active {
            return P_NEUTRAL;
        }
        let bit = (self.expected() >> (7 - self.bit_pos)) & 1;
        let stride = self.stride();
        if bit != 0 {
            P_NEUTRAL.saturating_add(stride).min(0xFFFE)
        } else {
            (P_NEUTRAL - stride).max(1)
        }
    }

    fn update_bit(&mut self, bit: u8) {
        if !self.active {
            return;
        }
        let expected = (self.expected() >> (7 - self.bit_pos)) & 1;
        if bit & 1 != expected {
            // Contradicted; stay quiet until the next byte boundary.
            self.active = false;
            return;
        }
        self.bit_pos += 1;
    }

    fn update_byte(&mut self, byte: u8) {
        self.buf[self.pos % CAPACITY] = byte;
        self.pos += 1;

        if self.active && self.bit_pos == 8 {
            // The whole byte matched; slide the match forward.
            self.match_pos += 1;
            self.match_len += 1;
            self.bit_pos = 0;
            if self.match_len as usize >= CAPACITY {
                self.active = false;
                self.match_len = 0;
            }
        }

        if self.pos >= CONTEXT {
            let key = self.context_key();
            if !self.active {
                if let Some(&candidate) = self.table.get(&key) {
                    // The candidate must still be inside the ring and
                    // strictly behind the write position.
                    if candidate < self.pos && self.pos - candidate < CAPACITY {
                        self.match_pos = candidate;
                        self.match_len = 1;
                        self.active = true;
                    }
                }
            }
            self.table.insert(key, self.pos);
        }
        self.bit_pos = 0;
    }
}

impl Default for MatchModel {
    fn default() -> Self {
        Self::new()
    }
}
