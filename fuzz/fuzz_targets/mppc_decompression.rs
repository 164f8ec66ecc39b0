#![no_main]

use ironrdp_fuzzing::generators::MppcPayloadInput;
use ironrdp_fuzzing::oracles;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: MppcPayloadInput<'_>| {
    oracles::mppc_decompress(input);
});
