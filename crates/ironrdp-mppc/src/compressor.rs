//! MPPC session: one compressor per logical stream.

use alloc::vec::Vec;

use crate::bitstream::max_compressed_size;
use crate::encoder::{self, Encoded};
use crate::history::HistoryBuffer;
use crate::match_finder::MatchFinder;
use crate::{CompressionFlags, CompressionType, MppcError};

/// MPPC compressor state for one stream.
///
/// The history buffer, the match finder and the output buffer are sized once
/// from the [`CompressionType`] and reused for every chunk. Dropping the
/// compressor releases them.
pub struct MppcCompressor {
    compression_type: CompressionType,
    history: HistoryBuffer,
    matches: MatchFinder,
    output: Vec<u8>,
    /// Flags carried over to the next chunk.
    pending_flags: CompressionFlags,
}

impl MppcCompressor {
    /// Creates a compressor with an empty dictionary.
    ///
    /// The first chunk is always flagged `AT_FRONT`.
    pub fn new(compression_type: CompressionType) -> Result<Self, MppcError> {
        let history_size = compression_type.history_size();

        let history = HistoryBuffer::new(history_size)?;
        let matches = MatchFinder::new(history_size)?;
        let output = crate::try_alloc_filled(max_compressed_size(history_size), 0u8)?;

        Ok(Self {
            compression_type,
            history,
            matches,
            output,
            pending_flags: CompressionFlags::AT_FRONT,
        })
    }

    /// Creates a compressor from a raw protocol level value (0 or 1).
    pub fn from_type_bits(value: u32) -> Result<Self, MppcError> {
        Self::new(CompressionType::try_from(value)?)
    }

    /// Level fixed at construction.
    pub fn compression_type(&self) -> CompressionType {
        self.compression_type
    }

    /// Largest chunk accepted by [`compress`](Self::compress).
    pub fn max_chunk_size(&self) -> usize {
        self.history.capacity()
    }

    /// Makes the next chunk start from an empty dictionary on both sides.
    pub fn request_flush(&mut self) {
        debug!(compression_type = %self.compression_type, "MPPC flush requested");
        self.pending_flags |= CompressionFlags::FLUSHED | CompressionFlags::AT_FRONT;
    }

    /// Returns to the freshly-created state.
    pub fn reset(&mut self) {
        self.restart_dictionary();
        self.pending_flags = CompressionFlags::AT_FRONT;
    }

    /// Compresses one chunk.
    ///
    /// The chunk must be non-empty and no larger than the history buffer;
    /// otherwise [`MppcError::InvalidInput`] is returned and the state is left
    /// untouched.
    ///
    /// A chunk that does not shrink is handed back as-is (the returned data is
    /// `src` itself) with `FLUSHED` set and `COMPRESSED` clear, and the
    /// dictionary is restarted.
    pub fn compress<'a>(&'a mut self, src: &'a [u8]) -> Result<CompressedChunk<'a>, MppcError> {
        let capacity = self.history.capacity();
        if src.is_empty() || src.len() > capacity {
            return Err(MppcError::InvalidInput {
                length: src.len(),
                capacity,
            });
        }

        let mut flags = core::mem::replace(&mut self.pending_flags, CompressionFlags::empty());

        if flags.intersects(CompressionFlags::AT_FRONT | CompressionFlags::FLUSHED) {
            self.restart_dictionary();
            flags |= CompressionFlags::AT_FRONT;
        } else if self.history.remaining() < src.len() {
            debug!(
                remaining = self.history.remaining(),
                length = src.len(),
                "MPPC history full, restarting at the front"
            );
            self.restart_dictionary();
            flags |= CompressionFlags::AT_FRONT;
        }

        let encoded = encoder::encode_chunk(
            self.compression_type,
            &mut self.history,
            &mut self.matches,
            src,
            &mut self.output,
        );

        match encoded {
            Encoded::Compressed {
                length,
                literals,
                matches,
            } => {
                flags |= CompressionFlags::COMPRESSED;

                trace!(
                    src_len = src.len(),
                    dst_len = length,
                    literals,
                    matches,
                    ?flags,
                    "MPPC chunk compressed"
                );

                Ok(CompressedChunk {
                    data: &self.output[..length],
                    flags,
                    compression_type: self.compression_type,
                })
            }
            Encoded::Incompressible => {
                debug!(src_len = src.len(), "MPPC chunk did not shrink, sending it raw");

                self.restart_dictionary();
                self.pending_flags = CompressionFlags::AT_FRONT;

                Ok(CompressedChunk {
                    data: src,
                    flags: flags | CompressionFlags::FLUSHED,
                    compression_type: self.compression_type,
                })
            }
        }
    }

    fn restart_dictionary(&mut self) {
        self.history.reset();
        self.matches.clear();
    }
}

impl core::fmt::Debug for MppcCompressor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MppcCompressor")
            .field("compression_type", &self.compression_type)
            .field("history_len", &self.history.len())
            .field("pending_flags", &self.pending_flags)
            .finish_non_exhaustive()
    }
}

/// Result of [`MppcCompressor::compress`].
///
/// Borrows either the compressor's output buffer or, for a raw chunk, the
/// caller's input. Either way it must be consumed before the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressedChunk<'a> {
    data: &'a [u8],
    flags: CompressionFlags,
    compression_type: CompressionType,
}

impl<'a> CompressedChunk<'a> {
    /// Payload to transmit.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Flags the receiver needs to interpret the payload.
    pub fn flags(&self) -> CompressionFlags {
        self.flags
    }

    /// Whether the payload is MPPC-encoded rather than raw.
    pub fn is_compressed(&self) -> bool {
        self.flags.contains(CompressionFlags::COMPRESSED)
    }

    /// Level of the compressor that produced the chunk.
    pub fn compression_type(&self) -> CompressionType {
        self.compression_type
    }

    /// The `compressedType` byte: flags in the high nibble, level in the low one.
    pub fn header_flags(&self) -> u8 {
        self.flags.bits() | self.compression_type.as_u8()
    }
}
