//! The bitstream module forms the bit-level I/O subsystem for the coders.
//!
//! Both entropy coders emit and consume their streams one bit at a time,
//! most significant bit first. The writer packs bits into bytes and pushes
//! complete bytes straight through to the underlying sink; the reader
//! serves bits from the source and degrades to an endless run of zero bits
//! once the source is exhausted. The coders rely on that zero padding to
//! settle their final interval, so the reader never reports EOF itself.
//!
pub mod bitreader;
pub mod bitwriter;

pub use bitreader::BitReader;
pub use bitwriter::BitWriter;
