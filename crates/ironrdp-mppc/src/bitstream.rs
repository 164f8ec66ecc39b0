//! MSB-first bit packing for the MPPC token stream.
//!
//! Codes are appended most significant bit first and cross byte boundaries
//! without any alignment padding. Only the final partial byte of a chunk is
//! padded, with zero bits.

/// Appends codes of 1 to 16 bits to a caller-provided output buffer.
///
/// The buffer is sized up front for the worst case of a chunk (see
/// [`max_compressed_size`]), so running out of room is a defect, not an error.
/// Bytes of the buffer are cleared lazily the first time a code lands in them;
/// stale content past the write position is never reported.
pub(crate) struct BitWriter<'a> {
    buffer: &'a mut [u8],
    /// Index of the trailing byte, the one receiving the next bit.
    byte_position: usize,
    /// Bits already filled in the trailing byte (0..=7).
    bit_position: u8,
}

impl<'a> BitWriter<'a> {
    pub(crate) fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            byte_position: 0,
            bit_position: 0,
        }
    }

    /// Appends the low `width` bits of `code`, most significant bit first.
    ///
    /// # Panics
    ///
    /// Panics if the output buffer is exhausted. Callers size the buffer for
    /// the worst case, so this only fires on a sizing bug.
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        reason = "the shifted chunk is at most 8 bits wide"
    )]
    pub(crate) fn write_bits(&mut self, code: u32, width: u8) {
        debug_assert!((1..=16).contains(&width), "code width must be 1..=16, got {width}");

        let mut remaining = u32::from(width);

        while remaining > 0 {
            assert!(
                self.byte_position < self.buffer.len(),
                "MPPC output buffer overflow ({} bytes)",
                self.buffer.len()
            );

            let free = 8 - u32::from(self.bit_position);
            let take = remaining.min(free);
            let chunk = (code >> (remaining - take)) & ((1 << take) - 1);

            let byte = &mut self.buffer[self.byte_position];
            if self.bit_position == 0 {
                *byte = 0;
            }
            *byte |= (chunk << (free - take)) as u8;

            remaining -= take;
            if take == free {
                self.byte_position += 1;
                self.bit_position = 0;
            } else {
                self.bit_position += take as u8;
            }
        }
    }

    /// Total number of bits appended so far.
    #[cfg(test)]
    pub(crate) fn bit_length(&self) -> usize {
        self.byte_position * 8 + usize::from(self.bit_position)
    }

    /// Number of bytes touched so far, the partial trailing byte included.
    pub(crate) fn byte_length(&self) -> usize {
        self.byte_position + usize::from(self.bit_position != 0)
    }

    /// Pads the trailing byte with zero bits and returns the total byte count.
    pub(crate) fn finish(self) -> usize {
        // Bits below the cursor were cleared when the byte was first touched.
        self.byte_length()
    }
}

/// Upper bound of the encoded size of a chunk of `input_len` bytes.
///
/// The costliest token per input byte is a 9-bit literal: copy tokens never
/// take more bits than the literals they replace.
pub(crate) const fn max_compressed_size(input_len: usize) -> usize {
    (input_len * 9).div_ceil(8)
}

/// Reads the MPPC token stream back, exposing a 32-bit MSB-first window for
/// prefix matching.
pub(crate) struct BitReader<'a> {
    data: &'a [u8],
    /// Absolute bit position of the next unread bit.
    position: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub(crate) fn bits_remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.position)
    }

    pub(crate) fn bits_consumed(&self) -> usize {
        self.position
    }

    /// Returns the next 32 bits of the stream, zero-filled past the end.
    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_truncation,
        reason = "the value is masked down to 32 bits first"
    )]
    pub(crate) fn peek32(&self) -> u32 {
        let byte = self.position / 8;
        let byte_at = |index: usize| u64::from(self.data.get(index).copied().unwrap_or(0));

        let window = (byte_at(byte) << 32)
            | (byte_at(byte + 1) << 24)
            | (byte_at(byte + 2) << 16)
            | (byte_at(byte + 3) << 8)
            | byte_at(byte + 4);

        (((window << (self.position % 8)) >> 8) & 0xFFFF_FFFF) as u32
    }

    pub(crate) fn shift(&mut self, nbits: usize) {
        self.position += nbits;
    }
}
