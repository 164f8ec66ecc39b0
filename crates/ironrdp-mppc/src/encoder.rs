//! Token selection and encoding for one chunk.
//!
//! The scan is greedy: at each position the single candidate offered by the
//! match finder is extended as far as it goes, and the position becomes a
//! literal when that yields fewer than [`MIN_MATCH_LENGTH`] bytes. There is no
//! lookahead for a better alternative.

use crate::bitstream::BitWriter;
use crate::history::HistoryBuffer;
use crate::match_finder::MatchFinder;
use crate::tables::{find_band, length_bands, literal_band, offset_bands, CodeBand, MIN_MATCH_LENGTH};
use crate::CompressionType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Literal(u8),
    /// Copy of `length` bytes starting `distance` bytes behind the write position.
    Match { distance: usize, length: usize },
}

impl Token {
    /// Number of input bytes covered by the token.
    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Match { length, .. } => *length,
        }
    }

    /// Width of the token's codewords in bits.
    #[cfg(test)]
    pub(crate) fn bit_width(&self, compression_type: CompressionType) -> usize {
        match *self {
            Self::Literal(byte) => usize::from(literal_band(byte).width()),
            Self::Match { distance, length } => {
                usize::from(offset_band(compression_type, distance).width())
                    + usize::from(length_band(compression_type, length).width())
            }
        }
    }
}

/// Walks a chunk and yields its tokens.
///
/// Every byte covered by a yielded token is appended to the history, and each
/// position is indexed in the match finder once its whole 3-byte prefix is
/// in the history. Candidates are therefore at least [`MIN_MATCH_LENGTH`]
/// bytes behind the current position, while the match itself may run on into
/// the bytes it produces.
pub(crate) struct Tokenizer<'a> {
    compression_type: CompressionType,
    history: &'a mut HistoryBuffer,
    matches: &'a mut MatchFinder,
    input: &'a [u8],
    position: usize,
}

impl<'a> Tokenizer<'a> {
    pub(crate) fn new(
        compression_type: CompressionType,
        history: &'a mut HistoryBuffer,
        matches: &'a mut MatchFinder,
        input: &'a [u8],
    ) -> Self {
        Self {
            compression_type,
            history,
            matches,
            input,
            position: 0,
        }
    }

    /// Looks up the candidate for the current position and extends it.
    ///
    /// Returns `(distance, length)` for a match of at least the minimum length.
    fn find_match(&self) -> Option<(usize, usize)> {
        let rest = &self.input[self.position..];

        let prefix: [u8; MIN_MATCH_LENGTH] = rest.get(..MIN_MATCH_LENGTH)?.try_into().ok()?;
        let candidate = self.matches.lookup(self.matches.hash(prefix))?;

        if !self.history.contains(candidate) {
            return None;
        }

        let current = self.history.write_offset();
        let distance = current - candidate;
        let max_length = rest.len().min(self.compression_type.max_match_length());

        // Bytes at or past the write position are the ones this match is producing.
        let source_byte = |offset: usize| {
            if offset < current {
                self.history.byte_at(offset)
            } else {
                rest[offset - current]
            }
        };

        let mut length = 0;
        while length < max_length && source_byte(candidate + length) == rest[length] {
            length += 1;
        }

        (length >= MIN_MATCH_LENGTH).then_some((distance, length))
    }

    /// Moves `count` input bytes into the history.
    fn consume(&mut self, count: usize) {
        let input = self.input;

        for &byte in &input[self.position..self.position + count] {
            self.history.push(byte);
            self.index_latest_prefix();
        }

        self.position += count;
    }

    /// Records the prefix whose last byte was just appended.
    ///
    /// Recording waits for the third byte so that a candidate always points at
    /// a complete prefix in the history, which lets a run of equal bytes become
    /// three literals and one overlapping copy.
    fn index_latest_prefix(&mut self) {
        let Some(first) = self.history.write_offset().checked_sub(MIN_MATCH_LENGTH) else {
            return;
        };

        if first < self.history.start() {
            return;
        }

        let prefix = [
            self.history.byte_at(first),
            self.history.byte_at(first + 1),
            self.history.byte_at(first + 2),
        ];
        let hash = self.matches.hash(prefix);
        self.matches.record(hash, first);
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let byte = *self.input.get(self.position)?;

        let token = match self.find_match() {
            Some((distance, length)) => Token::Match { distance, length },
            None => Token::Literal(byte),
        };

        self.consume(token.len());

        Some(token)
    }
}

/// Result of an encode pass over one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Encoded {
    /// The chunk shrank; the first `length` bytes of the output hold it.
    Compressed { length: usize, literals: usize, matches: usize },
    /// The encoding reached the input size and was abandoned.
    Incompressible,
}

/// Encodes `input` into `output`, updating the history and the match finder.
///
/// `output` must hold at least [`max_compressed_size`] of the input length.
/// When the encoded size reaches the input size the pass stops early: the
/// history then holds a partial chunk and must be reset by the caller.
///
/// The whole chunk must fit in [`HistoryBuffer::remaining`], which keeps every
/// copy offset and length inside the code tables of `compression_type`.
///
/// [`max_compressed_size`]: crate::bitstream::max_compressed_size
pub(crate) fn encode_chunk(
    compression_type: CompressionType,
    history: &mut HistoryBuffer,
    matches: &mut MatchFinder,
    input: &[u8],
    output: &mut [u8],
) -> Encoded {
    debug_assert!(
        history.remaining() >= input.len(),
        "chunk of {} bytes does not fit the {} bytes left in the history",
        input.len(),
        history.remaining()
    );

    let mut writer = BitWriter::new(output);
    let mut literals = 0;
    let mut copies = 0;

    for token in Tokenizer::new(compression_type, history, matches, input) {
        match token {
            Token::Literal(_) => literals += 1,
            Token::Match { .. } => copies += 1,
        }

        write_token(&mut writer, compression_type, token);

        if writer.byte_length() >= input.len() {
            return Encoded::Incompressible;
        }
    }

    Encoded::Compressed {
        length: writer.finish(),
        literals,
        matches: copies,
    }
}

pub(crate) fn write_token(writer: &mut BitWriter<'_>, compression_type: CompressionType, token: Token) {
    match token {
        Token::Literal(byte) => write_code(writer, literal_band(byte), usize::from(byte)),
        Token::Match { distance, length } => {
            write_code(writer, offset_band(compression_type, distance), distance);
            write_code(writer, length_band(compression_type, length), length);
        }
    }
}

#[expect(
    clippy::as_conversions,
    clippy::cast_possible_truncation,
    reason = "value fields are at most 16 bits wide"
)]
fn write_code(writer: &mut BitWriter<'_>, band: CodeBand, value: usize) {
    writer.write_bits(u32::from(band.prefix), band.prefix_bits);
    if band.value_bits > 0 {
        writer.write_bits((value - band.base) as u32, band.value_bits);
    }
}

fn offset_band(compression_type: CompressionType, distance: usize) -> CodeBand {
    let Some(band) = find_band(offset_bands(compression_type), distance) else {
        unreachable!("copy offset {distance} outside of the {compression_type} history")
    };
    band
}

fn length_band(compression_type: CompressionType, length: usize) -> CodeBand {
    let Some(band) = find_band(length_bands(compression_type), length) else {
        unreachable!("match length {length} above the {compression_type} maximum")
    };
    band
}
