use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{debug, info};

use crate::bwt_algorithms::bwt_decode;
use crate::entropy_coding::freq_table::EOF_SYMBOL;
use crate::entropy_coding::{ArithmeticDecoder, FrequencyTable, RangeDecoder};
use crate::error::{Error, Result};
use crate::models::{MixModel, Predictor, StateTable};
use crate::tools::mtf::mtf_decode;
use crate::tools::rle0::rle0_decode;

use super::compress::BOM;
use super::container::{read_u32, read_u64, read_u8, BlockHeader, Header, BLOCK_SIZE, MAGIC_PAQ};
use super::Profile;

/// Expand the archive at `in_path` into `out_path`.
///
/// The profile must match the one the archive was written with; the
/// magic check enforces that. A failed run removes the partial output.
pub fn decompress(in_path: &Path, out_path: &Path, profile: Profile, force: bool) -> Result<()> {
    if !in_path.exists() {
        return Err(Error::InputMissing);
    }
    let source = File::open(in_path).map_err(Error::CannotOpenInput)?;
    if out_path.exists() && !force {
        return Err(Error::OutputExists);
    }
    let sink = File::create(out_path).map_err(Error::CannotOpenOutput)?;

    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(sink);
    let result = unpack_stream(&mut reader, &mut writer, profile)
        .and_then(|()| writer.flush().map_err(Error::Io));
    if result.is_err() {
        drop(writer);
        let _ = fs::remove_file(out_path);
    }
    result
}

/// Validate the header and run the mirror of the profile pipeline.
pub fn unpack_stream<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    profile: Profile,
) -> Result<()> {
    match profile {
        Profile::Order0 => unpack_order0(reader, writer),
        Profile::CtxMix => unpack_ctxmix(reader, writer),
        Profile::Bwt => unpack_bwt(reader, writer),
        Profile::Paq => unpack_paq(reader, writer),
    }
}

fn unpack_order0<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<()> {
    let header = Header::read_from(reader, Profile::Order0.magic())?;
    info!("order0 archive, {} bytes original.", header.original_size);

    let mut table = FrequencyTable::new();
    let mut coder = ArithmeticDecoder::new(&mut *reader)?;
    let mut produced = 0u64;
    // The EOF symbol must arrive after exactly original_size data
    // symbols; anything else is a truncated or damaged stream.
    loop {
        let symbol = coder.decode(&table)?;
        if symbol == EOF_SYMBOL {
            if produced != header.original_size {
                return Err(Error::UnexpectedEof);
            }
            break;
        }
        if produced == header.original_size {
            return Err(Error::UnexpectedEof);
        }
        writer.write_all(&[symbol as u8])?;
        table.update(symbol);
        produced += 1;
    }
    Ok(())
}

/// Mirror of `compress::encode_byte`: same predict/update order, with
/// the decoded bit taking the place of the input bit.
pub(super) fn decode_byte<R: Read>(
    coder: &mut RangeDecoder<R>,
    model: &mut MixModel,
) -> io::Result<u8> {
    let mut byte = 0u8;
    for _ in 0..8 {
        let p1 = model.predict();
        let bit = coder.decode(p1)?;
        model.update(bit);
        byte = (byte << 1) | bit;
    }
    model.update_byte(byte);
    Ok(byte)
}

fn unpack_ctxmix<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<()> {
    let header = Header::read_from(reader, Profile::CtxMix.magic())?;
    info!("ctxmix archive, {} bytes original.", header.original_size);

    let mut model = MixModel::new();
    let mut coder = RangeDecoder::new(&mut *reader)?;
    for _ in 0..header.original_size {
        let byte = decode_byte(&mut coder, &mut model)?;
        writer.write_all(&[byte])?;
    }
    Ok(())
}

fn unpack_bwt<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<()> {
    let header = Header::read_from(reader, Profile::Bwt.magic())?;
    info!("bwt archive, {} bytes original.", header.original_size);

    let mut produced = 0u64;
    while let Some(block) = BlockHeader::read_from(reader)? {
        if block.block_len == 0 || block.block_len as usize > BLOCK_SIZE {
            return Err(Error::InvalidFormat);
        }
        if block.primary >= block.block_len {
            return Err(Error::InvalidFormat);
        }
        let mut payload = vec![0u8; block.comp_size as usize];
        reader.read_exact(&mut payload).map_err(Error::from_read)?;

        // Fresh models for every block, exactly as the encoder started.
        let mut model = MixModel::new();
        let mut coder = RangeDecoder::new(payload.as_slice())?;
        let mut runs = Vec::with_capacity(block.rle_count as usize);
        for _ in 0..block.rle_count {
            runs.push(decode_byte(&mut coder, &mut model)?);
        }

        let ranks = rle0_decode(&runs);
        if ranks.len() != block.block_len as usize {
            return Err(Error::InvalidFormat);
        }
        let data = bwt_decode(block.primary, &mtf_decode(&ranks));
        writer.write_all(&data)?;
        produced += data.len() as u64;
        debug!("block: {} coded bytes out, {} restored", runs.len(), data.len());
    }

    if produced != header.original_size {
        return Err(Error::UnexpectedEof);
    }
    Ok(())
}

fn unpack_paq<R: Read, W: Write>(reader: &mut R, writer: &mut W) -> Result<()> {
    if read_u32(reader)? != MAGIC_PAQ {
        return Err(Error::InvalidFormat);
    }
    let coded_size = read_u64(reader)?;
    let bom = read_u8(reader)?;
    if bom > 1 {
        return Err(Error::InvalidFormat);
    }
    info!("paq archive, {} coded bytes, bom={}.", coded_size, bom);
    if bom == 1 {
        writer.write_all(&BOM)?;
    }

    let mut model = StateTable::new();
    let mut coder = RangeDecoder::new(&mut *reader)?;
    for _ in 0..coded_size {
        let mut byte = 0u8;
        for _ in 0..8 {
            let p1 = model.predict();
            let bit = coder.decode(p1)?;
            model.update_bit(bit);
            byte = (byte << 1) | bit;
        }
        writer.write_all(&[byte])?;
    }
    Ok(())
}
