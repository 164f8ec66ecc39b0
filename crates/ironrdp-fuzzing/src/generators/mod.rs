//! Test case generators.
//!
//! Test case generators take raw, unstructured input from a fuzzer
//! (e.g. libFuzzer) and translate that into a structured test case (e.g. a
//! sequence of chunks fed to one MPPC stream).
//!
//! These are generally implementations of the `Arbitrary` trait.

use ironrdp_mppc::CompressionType;

#[derive(Arbitrary, Debug, Clone, Copy)]
pub enum Level {
    Rdp4,
    Rdp5,
}

impl From<Level> for CompressionType {
    fn from(level: Level) -> Self {
        match level {
            Level::Rdp4 => Self::Rdp4,
            Level::Rdp5 => Self::Rdp5,
        }
    }
}

/// One call made on the compressor.
#[derive(Arbitrary, Debug)]
pub enum StreamOp<'a> {
    Compress(&'a [u8]),
    /// A chunk made of `count` repetitions of `pattern`, to reach the long match lengths.
    CompressRepeated { pattern: &'a [u8], count: u16 },
    RequestFlush,
}

#[derive(Arbitrary, Debug)]
pub struct MppcStreamInput<'a> {
    pub level: Level,
    pub ops: Vec<StreamOp<'a>>,
}

#[derive(Arbitrary, Debug)]
pub struct MppcPayloadInput<'a> {
    pub level: Level,
    pub flags: u8,
    pub payloads: Vec<&'a [u8]>,
}
