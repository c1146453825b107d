#![no_main]
use decldiff::{JsonTreeParser, SourceParser};
use libfuzzer_sys::fuzz_target;

/// Fuzz the pre-built tree reader.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = JsonTreeParser::new().parse(s, "fuzz.json");
    }
});
