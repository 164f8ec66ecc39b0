//! Oracles.
//!
//! Oracles take a test case and determine whether we have a bug. The MPPC
//! round-trip oracle compresses a stream and checks that the paired
//! decompressor reproduces every chunk; the decompression oracle feeds
//! arbitrary payloads and (implicitly) checks that no assertions failed.
//!
//! When an oracle finds a bug, it should report it to the fuzzing engine by
//! panicking.

use ironrdp_mppc::{CompressionFlags, CompressionType, MppcCompressor, MppcDecompressor, MppcError};

use crate::generators::{MppcPayloadInput, MppcStreamInput, StreamOp};

pub fn mppc_round_trip(input: MppcStreamInput<'_>) {
    let compression_type = CompressionType::from(input.level);
    let max_chunk_size = compression_type.history_size();

    let mut compressor = MppcCompressor::new(compression_type).expect("MPPC compressor should initialize");
    let mut decompressor = MppcDecompressor::new(compression_type).expect("MPPC decompressor should initialize");

    for op in input.ops {
        let chunk = match op {
            StreamOp::Compress(data) => data.to_vec(),
            StreamOp::CompressRepeated { pattern, count } => pattern
                .iter()
                .copied()
                .cycle()
                .take(pattern.len() * usize::from(count))
                .collect(),
            StreamOp::RequestFlush => {
                compressor.request_flush();
                continue;
            }
        };

        if chunk.is_empty() || chunk.len() > max_chunk_size {
            assert!(matches!(
                compressor.compress(&chunk),
                Err(MppcError::InvalidInput { .. })
            ));
            continue;
        }

        let compressed = compressor.compress(&chunk).expect("valid chunk should compress");

        if compressed.is_compressed() {
            assert!(compressed.data().len() < chunk.len());
        } else {
            assert!(compressed.flags().contains(CompressionFlags::FLUSHED));
        }

        let decompressed = decompressor
            .decompress(compressed.data(), compressed.flags())
            .expect("compressor output should decompress");
        assert_eq!(decompressed, chunk.as_slice());
    }
}

pub fn mppc_decompress(input: MppcPayloadInput<'_>) {
    let compression_type = CompressionType::from(input.level);
    let flags = CompressionFlags::from_bits_truncate(input.flags);

    let mut decompressor = MppcDecompressor::new(compression_type).expect("MPPC decompressor should initialize");

    for payload in input.payloads {
        let _ = decompressor.decompress(payload, flags);
    }
}
