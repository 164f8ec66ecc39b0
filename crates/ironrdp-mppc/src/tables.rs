//! MPPC codeword tables.
//!
//! Bit patterns from MS-RDPBCGR 3.1.8.4.1 (RDP 4.0) and 3.1.8.4.2 (RDP 5.0);
//! RFC 2118 describes the RDP 4.0 layout. Copy offsets and match lengths are
//! split into bands: each band has a fixed prefix followed by a value field
//! holding `value - base`.

use crate::CompressionType;

/// Shortest match encoded as a copy token.
pub(crate) const MIN_MATCH_LENGTH: usize = 3;

/// One band of a variable-width code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CodeBand {
    /// Smallest value covered by the band.
    pub(crate) base: usize,
    /// Prefix bits, right-aligned.
    pub(crate) prefix: u16,
    pub(crate) prefix_bits: u8,
    /// Width of the `value - base` field following the prefix (may be 0).
    pub(crate) value_bits: u8,
}

impl CodeBand {
    const fn new(base: usize, prefix: u16, prefix_bits: u8, value_bits: u8) -> Self {
        Self {
            base,
            prefix,
            prefix_bits,
            value_bits,
        }
    }

    /// Largest value covered by the band.
    pub(crate) const fn last(&self) -> usize {
        self.base + (1 << self.value_bits) - 1
    }

    /// Total codeword width.
    pub(crate) const fn width(&self) -> u8 {
        self.prefix_bits + self.value_bits
    }

    /// Whether the top `prefix_bits` of a left-aligned 32-bit window hold this band's prefix.
    pub(crate) fn matches(&self, window: u32) -> bool {
        window >> (32 - u32::from(self.prefix_bits)) == u32::from(self.prefix)
    }

    /// Extracts the value field following the prefix from a left-aligned 32-bit window.
    #[expect(
        clippy::as_conversions,
        reason = "a value field is at most 16 bits wide"
    )]
    pub(crate) fn decode(&self, window: u32) -> usize {
        if self.value_bits == 0 {
            return self.base;
        }
        let field = (window << self.prefix_bits) >> (32 - u32::from(self.value_bits));
        self.base + field as usize
    }
}

/// Literal bytes below 0x80: `0` followed by the 7 low bits.
pub(crate) const LITERAL_LOW: CodeBand = CodeBand::new(0x00, 0b0, 1, 7);

/// Literal bytes from 0x80: `10` followed by the 7 low bits.
pub(crate) const LITERAL_HIGH: CodeBand = CodeBand::new(0x80, 0b10, 2, 7);

/// Copy offsets, RDP 4.0 (8K history).
pub(crate) const OFFSET_BANDS_RDP4: [CodeBand; 3] = [
    CodeBand::new(0, 0b1111, 4, 6),
    CodeBand::new(64, 0b1110, 4, 8),
    CodeBand::new(320, 0b110, 3, 13),
];

/// Copy offsets, RDP 5.0 (64K history).
pub(crate) const OFFSET_BANDS_RDP5: [CodeBand; 4] = [
    CodeBand::new(0, 0b11111, 5, 6),
    CodeBand::new(64, 0b11110, 5, 8),
    CodeBand::new(320, 0b1110, 4, 11),
    CodeBand::new(2368, 0b110, 3, 16),
];

/// Lengths of match, shared by both levels. RDP 4.0 stops at the
/// `4096..=8191` band.
pub(crate) const LENGTH_BANDS: [CodeBand; 15] = [
    CodeBand::new(3, 0b0, 1, 0),
    CodeBand::new(4, 0b10, 2, 2),
    CodeBand::new(8, 0b110, 3, 3),
    CodeBand::new(16, 0b1110, 4, 4),
    CodeBand::new(32, 0b1_1110, 5, 5),
    CodeBand::new(64, 0b11_1110, 6, 6),
    CodeBand::new(128, 0b111_1110, 7, 7),
    CodeBand::new(256, 0b1111_1110, 8, 8),
    CodeBand::new(512, 0b1_1111_1110, 9, 9),
    CodeBand::new(1024, 0b11_1111_1110, 10, 10),
    CodeBand::new(2048, 0b111_1111_1110, 11, 11),
    CodeBand::new(4096, 0b1111_1111_1110, 12, 12),
    CodeBand::new(8192, 0b1_1111_1111_1110, 13, 13),
    CodeBand::new(16384, 0b11_1111_1111_1110, 14, 14),
    CodeBand::new(32768, 0b111_1111_1111_1110, 15, 15),
];

pub(crate) fn offset_bands(compression_type: CompressionType) -> &'static [CodeBand] {
    match compression_type {
        CompressionType::Rdp4 => &OFFSET_BANDS_RDP4,
        CompressionType::Rdp5 => &OFFSET_BANDS_RDP5,
    }
}

pub(crate) fn length_bands(compression_type: CompressionType) -> &'static [CodeBand] {
    match compression_type {
        CompressionType::Rdp4 => &LENGTH_BANDS[..12],
        CompressionType::Rdp5 => &LENGTH_BANDS,
    }
}

/// Codeword for a literal byte.
pub(crate) fn literal_band(byte: u8) -> CodeBand {
    if byte < 0x80 {
        LITERAL_LOW
    } else {
        LITERAL_HIGH
    }
}

/// Band covering `value`, or `None` when it is past the end of the table.
pub(crate) fn find_band(bands: &[CodeBand], value: usize) -> Option<CodeBand> {
    bands
        .iter()
        .copied()
        .find(|band| band.base <= value && value <= band.last())
}
