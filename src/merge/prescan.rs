//! Cheap scan for conditional-compilation directives.

use regex::Regex;
use std::sync::LazyLock;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*#[ \t]*(if|ifdef|ifndef|elif|else|endif)\b").expect("static regex")
});

/// Whether `text` contains any `#if`-family directive.
///
/// When neither side of a comparison has one, every configuration parses to
/// the same tree and a single run is enough.
#[must_use]
pub fn has_configuration_directives(text: &str) -> bool {
    DIRECTIVE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_directives() {
        assert!(has_configuration_directives("class A {\n#if NET8_0\n}\n#endif\n"));
        assert!(has_configuration_directives("  #  ifdef DEBUG\n"));
        assert!(has_configuration_directives("#else\n"));
    }

    #[test]
    fn test_ignores_lookalikes() {
        assert!(!has_configuration_directives("// #if is mentioned in a comment\n"));
        assert!(!has_configuration_directives("#region Helpers\n#endregion\n"));
        assert!(!has_configuration_directives("#include <stdio.h>\n"));
        assert!(!has_configuration_directives("#iffy\n"));
    }
}
