#![no_main]
use decldiff::{Configuration, DiffEngine, LineParser, SourceParser};
use libfuzzer_sys::fuzz_target;

/// Fuzz conditional-directive handling and the line diff.
///
/// The input is split at the first NUL into an old and a new version; both
/// are parsed under a configuration and, when both parse, diffed.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let (old, new) = s.split_once('\0').unwrap_or((s, ""));
    let configuration = Configuration::new("fuzz", ["NET8_0", "DEBUG"]);
    let parser = LineParser::new();

    let old_tree = parser.parse_under(old, "fuzz.cs", Some(&configuration));
    let new_tree = parser.parse_under(new, "fuzz.cs", Some(&configuration));
    if let (Ok(old_tree), Ok(new_tree)) = (old_tree, new_tree) {
        let _ = DiffEngine::new().diff(&old_tree, &new_tree);
    }
});
