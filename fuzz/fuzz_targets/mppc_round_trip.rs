#![no_main]

use ironrdp_fuzzing::generators::MppcStreamInput;
use ironrdp_fuzzing::oracles;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: MppcStreamInput<'_>| {
    oracles::mppc_round_trip(input);
});
