//! Move-To-Front transform.
//!
//! Each byte is replaced by its rank in a recency list, and the byte then
//! moves to the front of the list. After a BWT the input is full of local
//! repeats, so the ranks skew heavily toward zero, which is exactly what
//! the zero-run stage wants to see.

/// Encode a block. Output length equals input length.
pub fn mtf_encode(data: &[u8]) -> Vec<u8> {
    let mut order: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut out = Vec::with_capacity(data.len());
    for &byte in data {
        let idx = order.iter().position(|&c| c == byte).unwrap();
        out.push(idx as u8);
        order.copy_within(0..idx, 1);
        order[0] = byte;
    }
    out
}

/// Decode a block of ranks back into bytes.
pub fn mtf_decode(data: &[u8]) -> Vec<u8> {
    let mut order: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut out = Vec::with_capacity(data.len());
    for &rank in data {
        let idx = rank as usize;
        let byte = order[idx];
        out.push(byte);
        order.copy_within(0..idx, 1);
        order[0] = byte;
    }
    out
}
