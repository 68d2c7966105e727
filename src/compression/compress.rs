use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info, warn};

use crate::bwt_algorithms::bwt_encode;
use crate::entropy_coding::freq_table::EOF_SYMBOL;
use crate::entropy_coding::{ArithmeticEncoder, FrequencyTable, RangeCoder};
use crate::error::{Error, Result};
use crate::models::{MixModel, Predictor, StateTable};
use crate::tools::mtf::mtf_encode;
use crate::tools::rle0::rle0_encode;

use super::container::{BlockHeader, Header, BLOCK_SIZE, MAGIC_PAQ};
use super::Profile;

/// The UTF-8 byte order mark the legacy profile strips.
pub(super) const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Compress `in_path` into a fresh archive at `out_path`.
///
/// Refuses to clobber an existing output unless `force` is set. A failed
/// run removes whatever partial archive it managed to write.
pub fn compress(in_path: &Path, out_path: &Path, profile: Profile, force: bool) -> Result<()> {
    if !in_path.exists() {
        return Err(Error::InputMissing);
    }
    let source = File::open(in_path).map_err(Error::CannotOpenInput)?;
    if out_path.exists() && !force {
        return Err(Error::OutputExists);
    }
    let sink = File::create(out_path).map_err(Error::CannotOpenOutput)?;

    let original_size = source.metadata().map_err(Error::CannotOpenInput)?.len();
    info!(
        "Compressing {} bytes with the {} profile.",
        original_size, profile
    );

    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(sink);
    let result = pack_stream(&mut reader, &mut writer, profile, original_size)
        .and_then(|()| writer.flush().map_err(Error::Io));
    if result.is_err() {
        // A torn archive is worse than none.
        drop(writer);
        let _ = fs::remove_file(out_path);
    }
    result
}

/// Run the profile pipeline from an open byte source to an open sink.
/// `original_size` is recorded in the header; the decoder trusts it for
/// the length-terminated profiles.
pub fn pack_stream<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    profile: Profile,
    original_size: u64,
) -> Result<()> {
    match profile {
        Profile::Order0 => pack_order0(reader, writer, original_size),
        Profile::CtxMix => pack_ctxmix(reader, writer, original_size),
        Profile::Bwt => pack_bwt(reader, writer, original_size),
        Profile::Paq => pack_paq(reader, writer, original_size),
    }
}

/// One adaptive pass with the order-0 frequency table; the reserved
/// symbol 256 terminates the stream, so the decoder never needs the
/// header count.
fn pack_order0<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    original_size: u64,
) -> Result<()> {
    Header::new(Profile::Order0.magic(), original_size).write_to(writer)?;

    let mut table = FrequencyTable::new();
    let mut coder = ArithmeticEncoder::new(&mut *writer);
    let mut buf = [0u8; 1 << 16];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            coder.encode(u16::from(byte), &table)?;
            table.update(u16::from(byte));
        }
    }
    coder.encode(EOF_SYMBOL, &table)?;
    coder.finish()?;
    Ok(())
}

/// Push one byte through the mixing models and the range coder, most
/// significant bit first. `decompress.rs` has the mirror image of this
/// loop; the call order here is load-bearing.
pub(super) fn encode_byte<W: Write>(
    coder: &mut RangeCoder<W>,
    model: &mut MixModel,
    byte: u8,
) -> io::Result<()> {
    for i in (0..8).rev() {
        let bit = (byte >> i) & 1;
        let p1 = model.predict();
        coder.encode(bit, p1)?;
        model.update(bit);
    }
    model.update_byte(byte);
    Ok(())
}

/// One adaptive context-mixing pass over the whole stream,
/// length-terminated by the header.
fn pack_ctxmix<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    original_size: u64,
) -> Result<()> {
    Header::new(Profile::CtxMix.magic(), original_size).write_to(writer)?;

    let mut model = MixModel::new();
    let mut coder = RangeCoder::new(&mut *writer);
    let mut coded = 0u64;
    let mut buf = [0u8; 1 << 16];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            encode_byte(&mut coder, &mut model, byte)?;
        }
        coded += n as u64;
    }
    coder.finish()?;
    if coded != original_size {
        warn!(
            "Input changed while compressing: coded {} bytes, header says {}.",
            coded, original_size
        );
    }
    Ok(())
}

/// Fill `block` as far as the source allows; a short count means EOF.
fn fill_block<R: Read>(reader: &mut R, block: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < block.len() {
        let n = reader.read(&mut block[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Block pipeline: BWT, move-to-front, zero-run coding, then a range
/// coder over the runs. Models and coder start from state zero for every
/// block, so each block decodes independently.
fn pack_bwt<R: Read, W: Write>(reader: &mut R, writer: &mut W, original_size: u64) -> Result<()> {
    Header::new(Profile::Bwt.magic(), original_size).write_to(writer)?;

    let mut block = vec![0u8; BLOCK_SIZE];
    loop {
        let n = fill_block(reader, &mut block)?;
        if n == 0 {
            break;
        }
        let (primary, bwt) = bwt_encode(&block[..n]);
        let ranks = mtf_encode(&bwt);
        let runs = rle0_encode(&ranks);

        let mut model = MixModel::new();
        let mut coder = RangeCoder::new(Vec::new());
        for &byte in &runs {
            encode_byte(&mut coder, &mut model, byte)?;
        }
        let payload = coder.finish()?;

        BlockHeader {
            block_len: n as u32,
            primary,
            rle_count: runs.len() as u32,
            comp_size: payload.len() as u32,
        }
        .write_to(writer)?;
        writer.write_all(&payload)?;
        debug!(
            "block: {} bytes in, {} after rle0, {} coded",
            n,
            runs.len(),
            payload.len()
        );
    }
    Ok(())
}

/// Legacy single-predictor profile: strip a UTF-8 BOM if the input leads
/// with one, then code the rest against the 512-state bit table.
fn pack_paq<R: Read, W: Write>(reader: &mut R, writer: &mut W, original_size: u64) -> Result<()> {
    let mut head = [0u8; 3];
    let head_len = fill_block(reader, &mut head)?;
    let bom = head_len == 3 && head == BOM;
    let coded_size = if bom {
        original_size.saturating_sub(BOM.len() as u64)
    } else {
        original_size
    };

    writer.write_all(&MAGIC_PAQ.to_le_bytes())?;
    writer.write_all(&coded_size.to_le_bytes())?;
    writer.write_all(&[u8::from(bom)])?;

    fn put<W: Write>(
        coder: &mut RangeCoder<W>,
        model: &mut StateTable,
        byte: u8,
    ) -> io::Result<()> {
        for i in (0..8).rev() {
            let bit = (byte >> i) & 1;
            let p1 = model.predict();
            coder.encode(bit, p1)?;
            model.update_bit(bit);
        }
        Ok(())
    }

    let mut model = StateTable::new();
    let mut coder = RangeCoder::new(&mut *writer);
    if !bom {
        for &byte in &head[..head_len] {
            put(&mut coder, &mut model, byte)?;
        }
    }
    let mut buf = [0u8; 1 << 16];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        for &byte in &buf[..n] {
            put(&mut coder, &mut model, byte)?;
        }
    }
    coder.finish()?;
    Ok(())
}
