use std::cmp::Ordering;

use log::trace;

/// Burrows-Wheeler transform of one block. Returns the primary index (the
/// sorted position of the unrotated block) and the transformed data.
pub fn bwt_encode(block: &[u8]) -> (u32, Vec<u8>) {
    let n = block.len();
    if n == 0 {
        return (0, Vec::new());
    }

    // Sort the rotation start offsets rather than materializing the
    // rotations themselves.
    let mut index = (0_u32..n as u32).collect::<Vec<u32>>();
    index.sort_unstable_by(|&a, &b| rotation_compare(a as usize, b as usize, block));

    let mut primary = 0_u32;
    let mut bwt = vec![0_u8; n];
    for (i, &rot) in index.iter().enumerate() {
        if rot == 0 {
            primary = i as u32;
            bwt[i] = block[n - 1];
        } else {
            bwt[i] = block[rot as usize - 1];
        }
    }
    trace!("bwt block of {} bytes, primary {}", n, primary);
    (primary, bwt)
}

/// Compare two rotations of the block lexicographically. The slices run
/// to the end of the block first, then wrap; three slice compares cover
/// the whole rotation without any per-byte modular indexing.
fn rotation_compare(a: usize, b: usize, block: &[u8]) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let (a, b, flip) = if a < b { (a, b, false) } else { (b, a, true) };

    // Head of the longer tail against the shorter tail, then the
    // wrapped pieces.
    let first = block[b..].len();
    let mut result = block[a..a + first].cmp(&block[b..]);
    if result == Ordering::Equal {
        let second = block.len() - a - first;
        result = block[a + first..].cmp(&block[..second]);
        if result == Ordering::Equal {
            result = block[..a].cmp(&block[second..second + a]);
        }
    }
    if flip {
        result.reverse()
    } else {
        result
    }
}

/// Invert the transform: counting sort over the column gives each row's
/// successor, and walking those links from the primary row replays the
/// original block.
pub fn bwt_decode(primary: u32, bwt: &[u8]) -> Vec<u8> {
    let n = bwt.len();
    if n == 0 {
        return Vec::new();
    }

    let mut count = [0_u32; 256];
    for &b in bwt {
        count[b as usize] += 1;
    }
    // Exclusive scan: pos[c] is where symbol c's rows start.
    let mut pos = [0_u32; 256];
    let mut sum = 0_u32;
    for c in 0..256 {
        pos[c] = sum;
        sum += count[c];
    }

    let mut next = vec![0_u32; n];
    for (i, &b) in bwt.iter().enumerate() {
        next[pos[b as usize] as usize] = i as u32;
        pos[b as usize] += 1;
    }

    let mut out = vec![0_u8; n];
    let mut idx = next[primary as usize];
    for slot in out.iter_mut() {
        *slot = bwt[idx as usize];
        idx = next[idx as usize];
    }
    out
}

#[cfg(test)]
mod test {
    use super::{bwt_decode, bwt_encode};

    #[test]
    fn banana() {
        let (primary, bwt) = bwt_encode(b"banana");
        assert_eq!(bwt, b"nnbaaa");
        assert_eq!(primary, 3);
        assert_eq!(bwt_decode(primary, &bwt), b"banana");
    }

    #[test]
    fn empty_block() {
        let (primary, bwt) = bwt_encode(b"");
        assert_eq!(primary, 0);
        assert!(bwt.is_empty());
        assert!(bwt_decode(0, &[]).is_empty());
    }

    #[test]
    fn single_byte() {
        let (primary, bwt) = bwt_encode(b"A");
        assert_eq!((primary, bwt.as_slice()), (0, b"A".as_slice()));
        assert_eq!(bwt_decode(primary, &bwt), b"A");
    }

    #[test]
    fn periodic_data_roundtrips() {
        // Every rotation of an all-zero block compares equal; the
        // decode must still reproduce the block.
        let block = vec![0_u8; 300];
        let (primary, bwt) = bwt_encode(&block);
        assert_eq!(bwt_decode(primary, &bwt), block);

        let block: Vec<u8> = b"abab".iter().cycle().take(200).cloned().collect();
        let (primary, bwt) = bwt_encode(&block);
        assert_eq!(bwt_decode(primary, &bwt), block);
    }

    #[test]
    fn mixed_roundtrips() {
        for block in [
            b"mississippi".to_vec(),
            (0_u8..=255).collect::<Vec<u8>>(),
            b"aaaaabaaaaacaaaaab".to_vec(),
        ] {
            let (primary, bwt) = bwt_encode(&block);
            assert_eq!(bwt.len(), block.len());
            assert_eq!(bwt_decode(primary, &bwt), block, "block {:?}", block);
        }
    }
}
