use ironrdp_mppc::{CompressionFlags, CompressionType, MppcCompressor, MppcDecompressor};
use ironrdp_testsuite_core::{bitmap_payload, noise_payload, text_payload};
use proptest::prelude::*;
use rstest::rstest;

fn compression_type() -> impl Strategy<Value = CompressionType> {
    prop_oneof![Just(CompressionType::Rdp4), Just(CompressionType::Rdp5)]
}

/// Chunks drawn from a small alphabet, so that matches of every length show up.
fn redundant_chunk(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(0u8..4, 1..max_len),
        prop::collection::vec(prop::sample::select(vec![b'a', b'b', 0x80, 0xFF]), 1..max_len),
        prop::collection::vec(any::<u8>(), 1..max_len),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Compress(Vec<u8>),
    Flush,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => redundant_chunk(3000).prop_map(Op::Compress),
        1 => Just(Op::Flush),
    ]
}

/// Runs `ops` through a compressor and returns every emitted payload with its flags.
fn run_stream(compression_type: CompressionType, ops: &[Op]) -> Vec<(Vec<u8>, CompressionFlags)> {
    let mut compressor = MppcCompressor::new(compression_type).unwrap();
    let mut emitted = Vec::new();

    for op in ops {
        match op {
            Op::Compress(chunk) => {
                let compressed = compressor.compress(chunk).unwrap();
                emitted.push((compressed.data().to_vec(), compressed.flags()));
            }
            Op::Flush => compressor.request_flush(),
        }
    }

    emitted
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stream_round_trips(compression_type in compression_type(), ops in prop::collection::vec(op(), 1..12)) {
        let emitted = run_stream(compression_type, &ops);
        let chunks = ops.iter().filter_map(|op| match op {
            Op::Compress(chunk) => Some(chunk),
            Op::Flush => None,
        });

        let mut decompressor = MppcDecompressor::new(compression_type).unwrap();
        for (chunk, (payload, flags)) in chunks.zip(&emitted) {
            let decompressed = decompressor.decompress(payload, *flags).unwrap();
            prop_assert_eq!(decompressed, chunk.as_slice());

            if flags.contains(CompressionFlags::COMPRESSED) {
                prop_assert!(payload.len() < chunk.len());
            } else {
                prop_assert!(flags.contains(CompressionFlags::FLUSHED));
                prop_assert_eq!(payload, chunk);
            }
        }

        if let Some((_, flags)) = emitted.first() {
            prop_assert!(flags.contains(CompressionFlags::AT_FRONT));
        }
    }

    #[test]
    fn compression_is_deterministic(compression_type in compression_type(), ops in prop::collection::vec(op(), 1..8)) {
        prop_assert_eq!(run_stream(compression_type, &ops), run_stream(compression_type, &ops));
    }

    #[test]
    fn single_chunk_round_trips(compression_type in compression_type(), chunk in redundant_chunk(8192)) {
        let mut compressor = MppcCompressor::new(compression_type).unwrap();
        let compressed = compressor.compress(&chunk).unwrap();

        prop_assert!(compressed.data().len() <= chunk.len());

        let mut decompressor = MppcDecompressor::new(compression_type).unwrap();
        let decompressed = decompressor.decompress(compressed.data(), compressed.flags()).unwrap();
        prop_assert_eq!(decompressed, chunk.as_slice());
    }
}

#[rstest]
#[case(CompressionType::Rdp4, 4096)]
#[case(CompressionType::Rdp4, 8192)]
#[case(CompressionType::Rdp5, 4096)]
#[case(CompressionType::Rdp5, 65536)]
fn sample_payloads_round_trip(#[case] compression_type: CompressionType, #[case] chunk_size: usize) {
    let mut compressor = MppcCompressor::new(compression_type).unwrap();
    let mut decompressor = MppcDecompressor::new(compression_type).unwrap();

    let payloads = [
        text_payload(4 * chunk_size),
        bitmap_payload(4 * chunk_size),
        noise_payload(chunk_size, 0x1234_5678),
    ];

    for payload in &payloads {
        for chunk in payload.chunks(chunk_size) {
            let compressed = compressor.compress(chunk).unwrap();
            let decompressed = decompressor.decompress(compressed.data(), compressed.flags()).unwrap();
            assert_eq!(decompressed, chunk);
        }
    }
}

#[rstest]
#[case(CompressionType::Rdp4)]
#[case(CompressionType::Rdp5)]
fn full_window_run_is_one_copy(#[case] compression_type: CompressionType) {
    let size = compression_type.history_size();
    let input = vec![0x55; size];

    let mut compressor = MppcCompressor::new(compression_type).unwrap();
    let compressed = compressor.compress(&input).unwrap();
    // 3 literals, a short offset code and the widest length code of the level.
    assert!(compressed.data().len() <= 9);

    let mut decompressor = MppcDecompressor::new(compression_type).unwrap();
    let decompressed = decompressor.decompress(compressed.data(), compressed.flags()).unwrap();
    assert_eq!(decompressed, input.as_slice());
}
