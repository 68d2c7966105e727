//! The compression module manages the archive container and the
//! per-profile pipelines.
//!
//! Compression happens in up to four stages depending on the profile:
//! - Burrows-Wheeler Transform: sort the block so equal contexts cluster.
//! - Move-To-Front: turn the clusters into small ranks.
//! - Zero-run coding: collapse the rank-zero runs.
//! - Entropy coding: arithmetic coding against an adaptive frequency
//!   table, or bitwise range coding against the context-mixing models.
//!
//! Decompression follows the exact inverse. The adaptive state on both
//! sides must evolve identically, so the drivers here are written as
//! mirror images of one another: every predict/update call in
//! `compress.rs` has its twin in `decompress.rs`.
//!
pub mod compress;
pub mod container;
pub mod decompress;

pub use compress::compress;
pub use decompress::decompress;

use container::{MAGIC_BWT, MAGIC_CTXMIX, MAGIC_ORDER0, MAGIC_PAQ};

/// Which coder pipeline an archive uses. The archive magic pins the
/// profile, so a file compressed under one profile never decodes under
/// another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Adaptive order-0 frequency model, arithmetic coder.
    Order0,
    /// Context-mixing models over the raw stream, range coder.
    CtxMix,
    /// Block-wise BWT front end over the context-mixing models.
    Bwt,
    /// Legacy single-predictor variant (512-entry state table).
    Paq,
}

impl Profile {
    pub fn magic(self) -> u32 {
        match self {
            Profile::Order0 => MAGIC_ORDER0,
            Profile::CtxMix => MAGIC_CTXMIX,
            Profile::Bwt => MAGIC_BWT,
            Profile::Paq => MAGIC_PAQ,
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Profile::Order0 => "order0",
            Profile::CtxMix => "ctxmix",
            Profile::Bwt => "bwt",
            Profile::Paq => "paq",
        };
        write!(f, "{}", name)
    }
}
