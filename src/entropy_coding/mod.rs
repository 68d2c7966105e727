//! The entropy_coding module holds the two coders that turn model output
//! into compressed bytes.
//!
//! - The arithmetic coder works a symbol at a time against an adaptive
//!   cumulative frequency table. It drives the order-0 profile.
//! - The range coder works a bit at a time against a 16-bit probability
//!   supplied by the models. It drives the context-mixing profiles.
//!
//! Both keep the classic 32-bit low/high interval and the E1/E2/E3
//! renormalization discipline. The encoder and decoder of each pair must
//! be kept in lockstep: the decoder performs the mirror image of every
//! interval update, so any change to one side has to land on the other.
//!
pub mod arithmetic_coder;
pub mod freq_table;
pub mod range_coder;

pub use arithmetic_coder::{ArithmeticDecoder, ArithmeticEncoder};
pub use freq_table::FrequencyTable;
pub use range_coder::{RangeCoder, RangeDecoder};

/// First quarter of the 32-bit interval.
pub const Q1: u32 = 0x4000_0000;
/// Interval midpoint.
pub const HALF: u32 = 0x8000_0000;
/// Third quarter of the 32-bit interval.
pub const Q3: u32 = 0xC000_0000;
