//! The bwt_algorithms module holds the block-sorting transform for the
//! `bwt` profile.
//!
//! The forward transform sorts every rotation of the block and keeps the
//! column of bytes that precede each sorted rotation, plus the index of
//! the row holding the unrotated block. Sorting clusters equal contexts
//! together, which is what makes the later move-to-front and zero-run
//! stages productive. The inverse rebuilds the block from that column
//! with a counting sort and a next-pointer walk.
//!
pub mod bwt;

pub use bwt::{bwt_decode, bwt_encode};
