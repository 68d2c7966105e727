//! Run-length coding of zero bytes.
//!
//! The move-to-front stage leaves long runs of zeros behind; every such
//! run collapses to a marker byte and a count. Non-zero bytes pass
//! through untouched, so the stage never expands data that has no zero
//! runs by more than the markers themselves.

use log::error;

/// Encode: each maximal run of zeros becomes `[0x00, count]` packets,
/// counts capped at 255 with longer runs split into consecutive packets.
pub fn rle0_encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut idx = 0;
    while idx < data.len() {
        if data[idx] != 0 {
            out.push(data[idx]);
            idx += 1;
            continue;
        }
        let mut run = 0usize;
        while idx < data.len() && data[idx] == 0 {
            run += 1;
            idx += 1;
        }
        while run > 255 {
            out.push(0);
            out.push(255);
            run -= 255;
        }
        out.push(0);
        out.push(run as u8);
    }
    out
}

/// Decode: expand each `[0x00, count]` packet back into `count` zeros.
pub fn rle0_decode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() * 2);
    let mut idx = 0;
    while idx < data.len() {
        let byte = data[idx];
        idx += 1;
        if byte != 0 {
            out.push(byte);
            continue;
        }
        if idx >= data.len() {
            // A marker with no count only happens on corrupt input; the
            // coder has no checksum, so just stop expanding.
            error!("zero marker without a count byte");
            break;
        }
        let run = data[idx] as usize;
        idx += 1;
        out.resize(out.len() + run, 0);
    }
    out
}

#[cfg(test)]
mod test {
    use super::{rle0_decode, rle0_encode};

    #[test]
    fn no_zeros_passes_through() {
        let data = b"hello".to_vec();
        assert_eq!(rle0_encode(&data), data);
        assert_eq!(rle0_decode(&data), data);
    }

    #[test]
    fn kilobyte_of_zeros() {
        let coded = rle0_encode(&[0u8; 1024]);
        assert_eq!(coded, vec![0, 255, 0, 255, 0, 255, 0, 255, 0, 4]);
        assert_eq!(rle0_decode(&coded), vec![0u8; 1024]);
    }

    #[test]
    fn exact_packet_boundaries() {
        let coded = rle0_encode(&[0u8; 255]);
        assert_eq!(coded, vec![0, 255]);
        let coded = rle0_encode(&[0u8; 256]);
        assert_eq!(coded, vec![0, 255, 0, 1]);
        assert_eq!(rle0_decode(&coded), vec![0u8; 256]);
    }

    #[test]
    fn markers_always_carry_a_count() {
        let data = b"\x00a\x00\x00b\x00".to_vec();
        let coded = rle0_encode(&data);
        let mut idx = 0;
        while idx < coded.len() {
            if coded[idx] == 0 {
                assert!(idx + 1 < coded.len());
                idx += 2;
            } else {
                idx += 1;
            }
        }
        assert_eq!(rle0_decode(&coded), data);
    }

    #[test]
    fn mixed_roundtrip() {
        let mut data = Vec::new();
        for i in 0..2000 {
            data.push((i % 5 == 0) as u8 * (i % 251) as u8);
            if i % 7 == 0 {
                data.extend_from_slice(&[0, 0, 0]);
            }
        }
        assert_eq!(rle0_decode(&rle0_encode(&data)), data);
    }
}
