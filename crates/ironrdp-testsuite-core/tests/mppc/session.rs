use ironrdp_mppc::{CompressionFlags, CompressionType, MppcCompressor, MppcDecompressor, MppcError};
use ironrdp_testsuite_core::{BELLS, noise_payload, text_payload};
use rstest::rstest;

#[rstest]
#[case(CompressionType::Rdp4)]
#[case(CompressionType::Rdp5)]
fn chunk_size_boundaries(#[case] compression_type: CompressionType) {
    let capacity = compression_type.history_size();
    let mut compressor = MppcCompressor::new(compression_type).unwrap();
    assert_eq!(compressor.max_chunk_size(), capacity);

    assert_eq!(
        compressor.compress(&[]).unwrap_err(),
        MppcError::InvalidInput { length: 0, capacity }
    );

    let too_large = text_payload(capacity + 1);
    assert_eq!(
        compressor.compress(&too_large).unwrap_err(),
        MppcError::InvalidInput {
            length: capacity + 1,
            capacity
        }
    );

    let exact = text_payload(capacity);
    let compressed = compressor.compress(&exact).unwrap();
    assert!(compressed.is_compressed());

    let mut decompressor = MppcDecompressor::new(compression_type).unwrap();
    let decompressed = decompressor.decompress(compressed.data(), compressed.flags()).unwrap();
    assert_eq!(decompressed, exact.as_slice());
}

#[rstest]
#[case(CompressionType::Rdp4)]
#[case(CompressionType::Rdp5)]
fn rejected_chunk_does_not_consume_the_first_packet(#[case] compression_type: CompressionType) {
    let mut compressor = MppcCompressor::new(compression_type).unwrap();
    let oversized = vec![0; compression_type.history_size() + 1];

    assert!(compressor.compress(&oversized).is_err());
    let compressed = compressor.compress(BELLS).unwrap();
    assert_eq!(
        compressed.flags(),
        CompressionFlags::COMPRESSED | CompressionFlags::AT_FRONT
    );
}

#[rstest]
#[case(0x00, CompressionType::Rdp4)]
#[case(0x01, CompressionType::Rdp5)]
fn create_from_type_bits(#[case] value: u32, #[case] expected: CompressionType) {
    let compressor = MppcCompressor::from_type_bits(value).unwrap();
    assert_eq!(compressor.compression_type(), expected);
}

#[rstest]
#[case(0x02)] // NCRUSH
#[case(0x03)] // XCRUSH
#[case(0x0F)]
#[case(0xFFFF_FFFF)]
fn create_rejects_unknown_levels(#[case] value: u32) {
    assert_eq!(
        MppcCompressor::from_type_bits(value).unwrap_err(),
        MppcError::UnsupportedCompressionType(value)
    );
}

#[rstest]
#[case(CompressionType::Rdp4)]
#[case(CompressionType::Rdp5)]
fn incompressible_chunk_is_sent_raw(#[case] compression_type: CompressionType) {
    let mut compressor = MppcCompressor::new(compression_type).unwrap();
    let mut decompressor = MppcDecompressor::new(compression_type).unwrap();

    let first = text_payload(1000);
    let compressed = compressor.compress(&first).unwrap();
    decompressor.decompress(compressed.data(), compressed.flags()).unwrap();

    let noise = noise_payload(1000, 0xC0FF_EE00);
    let compressed = compressor.compress(&noise).unwrap();
    assert!(!compressed.is_compressed());
    assert_eq!(compressed.flags(), CompressionFlags::FLUSHED);
    assert_eq!(compressed.data(), noise.as_slice());
    assert_eq!(
        compressed.header_flags(),
        0x80 | compression_type.as_u8()
    );
    decompressor.decompress(compressed.data(), compressed.flags()).unwrap();

    // The next chunk cannot reference anything from before the raw one.
    let compressed = compressor.compress(&first).unwrap();
    assert_eq!(
        compressed.flags(),
        CompressionFlags::COMPRESSED | CompressionFlags::AT_FRONT
    );
    let decompressed = decompressor.decompress(compressed.data(), compressed.flags()).unwrap();
    assert_eq!(decompressed, first.as_slice());
}

#[rstest]
#[case(CompressionType::Rdp4)]
#[case(CompressionType::Rdp5)]
fn flush_request_resets_both_sides(#[case] compression_type: CompressionType) {
    let mut compressor = MppcCompressor::new(compression_type).unwrap();
    let mut decompressor = MppcDecompressor::new(compression_type).unwrap();

    let compressed = compressor.compress(BELLS).unwrap();
    let fresh_len = compressed.data().len();
    decompressor.decompress(compressed.data(), compressed.flags()).unwrap();

    compressor.request_flush();
    let compressed = compressor.compress(BELLS).unwrap();
    assert_eq!(
        compressed.flags(),
        CompressionFlags::COMPRESSED | CompressionFlags::AT_FRONT | CompressionFlags::FLUSHED
    );
    assert_eq!(compressed.data().len(), fresh_len);
    let decompressed = decompressor.decompress(compressed.data(), compressed.flags()).unwrap();
    assert_eq!(decompressed, BELLS);

    let compressed = compressor.compress(BELLS).unwrap();
    assert_eq!(compressed.flags(), CompressionFlags::COMPRESSED);
    let decompressed = decompressor.decompress(compressed.data(), compressed.flags()).unwrap();
    assert_eq!(decompressed, BELLS);
}

#[rstest]
#[case(CompressionType::Rdp4, 3000)]
#[case(CompressionType::Rdp5, 20000)]
fn stream_wraps_to_the_front(#[case] compression_type: CompressionType, #[case] chunk_size: usize) {
    let mut compressor = MppcCompressor::new(compression_type).unwrap();
    let mut decompressor = MppcDecompressor::new(compression_type).unwrap();
    let payload = text_payload(chunk_size);

    // A chunk that does not fit in what is left of the history starts a new lap.
    let mut at_front = Vec::new();
    for _ in 0..6 {
        let compressed = compressor.compress(&payload).unwrap();
        at_front.push(compressed.flags().contains(CompressionFlags::AT_FRONT));
        let decompressed = decompressor.decompress(compressed.data(), compressed.flags()).unwrap();
        assert_eq!(decompressed, payload.as_slice());
    }

    let chunks_per_lap = compression_type.history_size() / chunk_size;
    let expected: Vec<bool> = (0..6).map(|i| i % chunks_per_lap == 0).collect();
    assert_eq!(at_front, expected);
}

#[test]
fn reset_restarts_the_stream() {
    let mut compressor = MppcCompressor::new(CompressionType::Rdp5).unwrap();
    let first = compressor.compress(BELLS).unwrap().data().to_vec();
    compressor.compress(BELLS).unwrap();

    compressor.reset();
    let again = compressor.compress(BELLS).unwrap();
    assert_eq!(again.data(), first.as_slice());
    assert_eq!(
        again.flags(),
        CompressionFlags::COMPRESSED | CompressionFlags::AT_FRONT
    );

    // A receiver created afresh follows the reset stream.
    let mut decompressor = MppcDecompressor::new(CompressionType::Rdp5).unwrap();
    let decompressed = decompressor.decompress(again.data(), again.flags()).unwrap();
    assert_eq!(decompressed, BELLS);
}

#[test]
fn compressors_are_independent() {
    let mut a = MppcCompressor::new(CompressionType::Rdp4).unwrap();
    let mut b = MppcCompressor::new(CompressionType::Rdp4).unwrap();

    a.compress(BELLS).unwrap();
    a.compress(b"unrelated traffic on another stream").unwrap();

    let from_b = b.compress(BELLS).unwrap();
    assert!(from_b.flags().contains(CompressionFlags::AT_FRONT));

    let mut fresh = MppcCompressor::new(CompressionType::Rdp4).unwrap();
    assert_eq!(from_b.data(), fresh.compress(BELLS).unwrap().data());
}

#[rstest]
#[case(CompressionType::Rdp4)]
#[case(CompressionType::Rdp5)]
fn unique_prefixes_are_not_compressed(#[case] compression_type: CompressionType) {
    // Every 3-byte window of 0, 1, .., 255 occurs once: only literals are possible.
    let input: Vec<u8> = (0..=255).collect();

    let mut compressor = MppcCompressor::new(compression_type).unwrap();
    let compressed = compressor.compress(&input).unwrap();
    assert!(!compressed.is_compressed());
    assert_eq!(
        compressed.flags(),
        CompressionFlags::AT_FRONT | CompressionFlags::FLUSHED
    );
    assert_eq!(compressed.data().len(), input.len());
}
