//! squish: an adaptive context-mixing file compressor.
//!
//! - Provides lossless compression and decompression of files under four
//!   coder profiles, from a plain adaptive order-0 arithmetic coder up to
//!   a block-sorting pipeline feeding context-mixed range coding.
//! - Single-threaded: every profile is one serial stream of adaptive
//!   model state, and the decoder replays that state bit for bit.
//!
//! Basic usage to compress a file:
//!
//! ```text
//! $> squish -z -b test.txt
//! ```
//!
//! This compresses with the block-sorting profile and creates
//! test.txt.sqz. Decompress it again with:
//!
//! ```text
//! $> squish -d -b test.txt.sqz
//! ```
//!
//! Help is available by entering:
//!
//! ```text
//! $> squish --help
//! ```
//!
pub mod bitstream;
pub mod bwt_algorithms;
pub mod compression;
pub mod entropy_coding;
pub mod error;
pub mod models;
pub mod tools;

pub use compression::{compress, decompress, Profile};
pub use error::{Error, Result};
