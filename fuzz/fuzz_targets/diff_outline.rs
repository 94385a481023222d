#![no_main]

use libfuzzer_sys::fuzz_target;

use patchrelay_diff::parse_diff_outline;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    let _ = parse_diff_outline(&s);
});
