//! MPPC receiver.

use alloc::vec::Vec;

use crate::bitstream::BitReader;
use crate::tables::{length_bands, offset_bands, CodeBand, LITERAL_HIGH, LITERAL_LOW};
use crate::{CompressionFlags, CompressionType, MppcError};

/// MPPC decompressor state for one stream.
///
/// Mirrors the history handling of [`MppcCompressor`](crate::MppcCompressor):
/// decompressed bytes are written linearly into the history buffer, which is
/// rewound by `AT_FRONT` and cleared by `FLUSHED`.
pub struct MppcDecompressor {
    compression_type: CompressionType,
    history: Vec<u8>,
    history_ptr: usize,
}

impl MppcDecompressor {
    /// Creates a decompressor with a zeroed history.
    pub fn new(compression_type: CompressionType) -> Result<Self, MppcError> {
        Ok(Self {
            compression_type,
            history: crate::try_alloc_filled(compression_type.history_size(), 0u8)?,
            history_ptr: 0,
        })
    }

    /// Level fixed at construction.
    pub fn compression_type(&self) -> CompressionType {
        self.compression_type
    }

    /// Returns to the freshly-created state.
    pub fn reset(&mut self) {
        self.history.fill(0);
        self.history_ptr = 0;
    }

    /// Decompresses one chunk.
    ///
    /// Returns the decompressed bytes, borrowed from the history buffer, or
    /// `src` itself when `COMPRESSED` is not set.
    pub fn decompress<'a>(&'a mut self, src: &'a [u8], flags: CompressionFlags) -> Result<&'a [u8], MppcError> {
        if flags.contains(CompressionFlags::AT_FRONT) {
            self.history_ptr = 0;
        }

        if flags.contains(CompressionFlags::FLUSHED) {
            self.reset();
        }

        if !flags.contains(CompressionFlags::COMPRESSED) {
            return Ok(src);
        }

        let start = self.history_ptr;
        let mut reader = BitReader::new(src);

        while reader.bits_remaining() >= 8 {
            let window = reader.peek32();

            if let Some(band) = [LITERAL_LOW, LITERAL_HIGH].into_iter().find(|band| band.matches(window)) {
                let literal = u8::try_from(band.decode(window))
                    .map_err(|_| MppcError::InvalidCompressedData("literal out of range"))?;
                consume(&mut reader, band, src.len())?;

                let slot = self
                    .history
                    .get_mut(self.history_ptr)
                    .ok_or(MppcError::HistoryBufferOverflow)?;
                *slot = literal;
                self.history_ptr += 1;

                continue;
            }

            let band = find_prefix(offset_bands(self.compression_type), window)
                .ok_or(MppcError::InvalidCompressedData("invalid copy offset encoding"))?;
            let copy_offset = band.decode(window);
            consume(&mut reader, band, src.len())?;

            let window = reader.peek32();
            let band = find_prefix(length_bands(self.compression_type), window)
                .ok_or(MppcError::InvalidCompressedData("invalid length of match encoding"))?;
            let length = band.decode(window);
            consume(&mut reader, band, src.len())?;

            if copy_offset == 0 {
                return Err(MppcError::InvalidCompressedData("zero copy offset"));
            }

            self.copy_within_history(copy_offset, length)?;
        }

        trace!(
            src_len = src.len(),
            dst_len = self.history_ptr - start,
            ?flags,
            "MPPC chunk decompressed"
        );

        Ok(&self.history[start..self.history_ptr])
    }

    /// Appends `length` bytes read `copy_offset` bytes behind the write pointer.
    ///
    /// Byte by byte, so that a source overlapping the destination repeats.
    fn copy_within_history(&mut self, copy_offset: usize, length: usize) -> Result<(), MppcError> {
        let size = self.history.len();

        if self.history_ptr + length > size {
            return Err(MppcError::HistoryBufferOverflow);
        }

        let mask = size - 1;
        let mut src_index = self.history_ptr.wrapping_sub(copy_offset) & mask;

        for _ in 0..length {
            self.history[self.history_ptr] = self.history[src_index];
            self.history_ptr += 1;
            src_index = (src_index + 1) & mask;
        }

        Ok(())
    }
}

impl core::fmt::Debug for MppcDecompressor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MppcDecompressor")
            .field("compression_type", &self.compression_type)
            .field("history_ptr", &self.history_ptr)
            .finish_non_exhaustive()
    }
}

fn find_prefix(bands: &[CodeBand], window: u32) -> Option<CodeBand> {
    bands.iter().copied().find(|band| band.matches(window))
}

fn consume(reader: &mut BitReader<'_>, band: CodeBand, src_len: usize) -> Result<(), MppcError> {
    reader.shift(usize::from(band.width()));

    if reader.bits_consumed() > src_len * 8 {
        return Err(MppcError::InvalidCompressedData("truncated token"));
    }

    Ok(())
}
