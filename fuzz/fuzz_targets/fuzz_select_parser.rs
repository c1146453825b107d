#![no_main]
use decldiff::parsers::{ParserKind, ParserRegistry};
use libfuzzer_sys::fuzz_target;

/// Fuzz the confidence-based parser selection without parsing.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = ParserRegistry::new().select(ParserKind::Auto, s, "fuzz.txt");
    }
});
