#![doc = include_str!("../README.md")]
#![doc(html_logo_url = "https://cdnweb.devolutions.net/images/projects/devolutions/logos/devolutions-icon-shadow.svg")]
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![warn(clippy::std_instead_of_alloc)]
#![warn(clippy::std_instead_of_core)]
#![cfg_attr(doc, warn(missing_docs))]

#[macro_use]
extern crate tracing;

extern crate alloc;

mod bitstream;
mod compressor;
mod decompressor;
mod encoder;
mod error;
mod history;
mod match_finder;
mod tables;


use bitflags::bitflags;

pub use self::compressor::{CompressedChunk, MppcCompressor};
pub use self::decompressor::MppcDecompressor;
pub use self::error::MppcError;

/// MPPC protocol level (low 4 bits of the `compressedType` field).
///
/// The level fixes the history buffer size and the codeword tables used for
/// copy offsets and match lengths. It never changes for the lifetime of a
/// compressor or decompressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CompressionType {
    /// MPPC with 8K history buffer (RDP 4.0)
    Rdp4 = 0x00,
    /// MPPC with 64K history buffer (RDP 5.0)
    Rdp5 = 0x01,
}

impl CompressionType {
    /// Mask to extract the compression type from the flags byte.
    pub const TYPE_MASK: u32 = 0x0F;

    /// Attempts to parse a compression type from the low 4 bits of a flags value.
    ///
    /// Only the two MPPC levels are accepted. The RDP 6.0 and 6.1 type values
    /// (NCRUSH, XCRUSH) are reported as unsupported.
    pub fn from_flags(flags: u32) -> Result<Self, MppcError> {
        match flags & Self::TYPE_MASK {
            0x00 => Ok(Self::Rdp4),
            0x01 => Ok(Self::Rdp5),
            other => Err(MppcError::UnsupportedCompressionType(other)),
        }
    }

    /// Size of the history buffer in bytes.
    ///
    /// This is also the largest chunk accepted by [`MppcCompressor::compress`].
    pub const fn history_size(self) -> usize {
        match self {
            Self::Rdp4 => 8 * 1024,
            Self::Rdp5 => 64 * 1024,
        }
    }

    /// Width of the widest copy offset value field.
    pub const fn max_offset_bits(self) -> u32 {
        match self {
            Self::Rdp4 => 13,
            Self::Rdp5 => 16,
        }
    }

    /// Longest match a single copy token can describe.
    pub const fn max_match_length(self) -> usize {
        match self {
            Self::Rdp4 => 8191,
            Self::Rdp5 => 65535,
        }
    }

    /// Value of the type bits as carried in the `compressedType` field.
    #[expect(clippy::as_conversions, reason = "fieldless repr(u8) enum discriminant")]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Strict conversion: the whole value must be a level, no flag bits allowed.
impl TryFrom<u32> for CompressionType {
    type Error = MppcError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Rdp4),
            0x01 => Ok(Self::Rdp5),
            other => Err(MppcError::UnsupportedCompressionType(other)),
        }
    }
}

impl TryFrom<u8> for CompressionType {
    type Error = MppcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from(u32::from(value))
    }
}

impl core::fmt::Display for CompressionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Rdp4 => write!(f, "RDP4 (MPPC 8K)"),
            Self::Rdp5 => write!(f, "RDP5 (MPPC 64K)"),
        }
    }
}

bitflags! {
    /// Level-2 bulk compression flags attached to every chunk, as carried in the
    /// upper nibble of the share data header's `compressedType` field.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct CompressionFlags: u8 {
        /// The payload is MPPC-encoded (otherwise it is the raw input).
        const COMPRESSED = 0x20;
        /// The history buffer write position was moved back to the start.
        const AT_FRONT = 0x40;
        /// The receiver must discard its history before applying this chunk.
        const FLUSHED = 0x80;
    }
}

/// Allocates a `len`-element buffer filled with `value`, reporting allocation failure.
pub(crate) fn try_alloc_filled<T: Clone>(len: usize, value: T) -> Result<alloc::vec::Vec<T>, MppcError> {
    let mut buffer = alloc::vec::Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| MppcError::OutOfMemory {
        requested: len.saturating_mul(size_of::<T>()),
    })?;
    buffer.resize(len, value);
    Ok(buffer)
}
