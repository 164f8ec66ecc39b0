//! Error types for MPPC compression and decompression.

use core::fmt;

/// Error type for MPPC compression and decompression operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MppcError {
    /// The compression type value is not one of the two MPPC levels.
    UnsupportedCompressionType(u32),
    /// The chunk handed to the compressor is empty or larger than the history buffer.
    ///
    /// Nothing was modified; the call can be retried with a valid chunk.
    InvalidInput {
        /// Length of the rejected chunk.
        length: usize,
        /// History buffer size of the compressor.
        capacity: usize,
    },
    /// A working buffer could not be allocated.
    OutOfMemory {
        /// Number of bytes requested by the failed allocation.
        requested: usize,
    },
    /// The compressed data is malformed or truncated.
    InvalidCompressedData(&'static str),
    /// A token would write past the end of the history buffer.
    HistoryBufferOverflow,
}

impl fmt::Display for MppcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCompressionType(value) => {
                write!(f, "unsupported compression type: {value:#04x}")
            }
            Self::InvalidInput { length: 0, .. } => {
                write!(f, "invalid input: chunk is empty")
            }
            Self::InvalidInput { length, capacity } => {
                write!(
                    f,
                    "invalid input: chunk of {length} bytes exceeds the {capacity} bytes history buffer"
                )
            }
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory: failed to allocate {requested} bytes")
            }
            Self::InvalidCompressedData(detail) => {
                write!(f, "invalid compressed data: {detail}")
            }
            Self::HistoryBufferOverflow => {
                write!(f, "history buffer overflow")
            }
        }
    }
}

impl core::error::Error for MppcError {}
