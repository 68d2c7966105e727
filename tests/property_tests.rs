//! Randomized invariants for the transforms and coders.

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;

use squish::bwt_algorithms::{bwt_decode, bwt_encode};
use squish::compression::compress::pack_stream;
use squish::compression::decompress::unpack_stream;
use squish::compression::Profile;
use squish::entropy_coding::{RangeCoder, RangeDecoder};
use squish::tools::mtf::{mtf_decode, mtf_encode};
use squish::tools::rle0::{rle0_decode, rle0_encode};

proptest! {
    #[test]
    fn bwt_roundtrip(block in prop::collection::vec(any::<u8>(), 0..2000)) {
        let (primary, bwt) = bwt_encode(&block);
        prop_assert_eq!(bwt.len(), block.len());
        if !block.is_empty() {
            prop_assert!((primary as usize) < block.len());
        }
        prop_assert_eq!(bwt_decode(primary, &bwt), block);
    }

    #[test]
    fn bwt_roundtrip_on_runs(byte in any::<u8>(), len in 0usize..1500) {
        // Degenerate periodic blocks: every rotation compares equal.
        let block = vec![byte; len];
        let (primary, bwt) = bwt_encode(&block);
        prop_assert_eq!(bwt_decode(primary, &bwt), block);
    }

    #[test]
    fn mtf_roundtrip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
        let coded = mtf_encode(&data);
        prop_assert_eq!(coded.len(), data.len());
        prop_assert_eq!(mtf_decode(&coded), data);
    }

    #[test]
    fn rle0_roundtrip(data in prop::collection::vec(prop::sample::select(
        // Weight zeros heavily so real runs appear.
        vec![0u8, 0, 0, 0, 1, 2, 7, 255]), 0..3000))
    {
        let coded = rle0_encode(&data);
        prop_assert_eq!(rle0_decode(&coded), data);
        // Every marker byte is followed by its count.
        let mut idx = 0;
        while idx < coded.len() {
            if coded[idx] == 0 {
                prop_assert!(idx + 1 < coded.len());
                prop_assert!(coded[idx + 1] >= 1);
                idx += 2;
            } else {
                idx += 1;
            }
        }
    }

    #[test]
    fn range_coder_bijection(
        steps in prop::collection::vec((any::<bool>(), 1u16..=65534), 0..2000)
    ) {
        let mut coder = RangeCoder::new(Vec::new());
        for &(bit, p1) in &steps {
            coder.encode(u8::from(bit), p1).unwrap();
        }
        let packed = coder.finish().unwrap();

        let mut decoder = RangeDecoder::new(packed.as_slice()).unwrap();
        for &(bit, p1) in &steps {
            prop_assert_eq!(decoder.decode(p1).unwrap(), u8::from(bit));
        }
    }
}

proptest! {
    // Whole-pipeline roundtrips run fewer cases; each one drives every
    // adaptive model over the full input.
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn order0_stream_roundtrip(data in prop::collection::vec(any::<u8>(), 0..4000)) {
        stream_roundtrip(Profile::Order0, &data)?;
    }

    #[test]
    fn ctxmix_stream_roundtrip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
        stream_roundtrip(Profile::CtxMix, &data)?;
    }

    #[test]
    fn bwt_stream_roundtrip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
        stream_roundtrip(Profile::Bwt, &data)?;
    }

    #[test]
    fn paq_stream_roundtrip(data in prop::collection::vec(any::<u8>(), 0..4000)) {
        stream_roundtrip(Profile::Paq, &data)?;
    }
}

fn stream_roundtrip(profile: Profile, data: &[u8]) -> Result<(), TestCaseError> {
    let mut packed = Vec::new();
    pack_stream(&mut &data[..], &mut packed, profile, data.len() as u64).unwrap();
    let mut restored = Vec::new();
    unpack_stream(&mut packed.as_slice(), &mut restored, profile).unwrap();
    prop_assert_eq!(restored, data);
    Ok(())
}
