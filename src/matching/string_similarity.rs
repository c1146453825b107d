//! Text similarity helpers for declaration matching.
//!
//! This module provides normalized-text similarity, identifier masking used
//! for rename detection, and a lightweight parameter-list reader used to spot
//! parameter renames.

use crate::model::normalize_signature;

/// Placeholder substituted for a masked identifier.
const MASK: &str = "\u{2400}";

/// Normalized Levenshtein similarity of two texts after collapsing whitespace.
///
/// Returns 1.0 for identical (or both empty) texts and 0.0 for completely
/// different ones.
#[must_use]
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let norm_a = normalize_signature(a);
    let norm_b = normalize_signature(b);
    if norm_a == norm_b {
        return 1.0;
    }
    strsim::normalized_levenshtein(&norm_a, &norm_b)
}

const fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Replace whole-word occurrences of `name` in `text` with a fixed placeholder.
///
/// `_count` inside `_counter` is left alone; `_count` in `_count = 0` is masked.
#[must_use]
pub fn mask_identifier(text: &str, name: &str) -> String {
    if name.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (idx, _) in text.match_indices(name) {
        if idx < last {
            continue;
        }
        let end = idx + name.len();
        let before_ok = text[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !is_identifier_char(c));
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_identifier_char(c));
        if before_ok && after_ok {
            out.push_str(&text[last..idx]);
            out.push_str(MASK);
            last = end;
        }
    }
    out.push_str(&text[last..]);
    out
}

/// True when two declarations differ only in their declared name.
#[must_use]
pub fn same_apart_from_name(old_text: &str, old_name: &str, new_text: &str, new_name: &str) -> bool {
    normalize_signature(&mask_identifier(old_text, old_name))
        == normalize_signature(&mask_identifier(new_text, new_name))
}

/// One entry of a parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Type text including modifiers (`ref`, `params`, ...); empty when untyped
    pub type_text: String,
    pub name: String,
}

/// Read the first parenthesized parameter list of a declaration.
///
/// Handles `Type name`, `Type name = default` and `name: Type` forms. Returns
/// `None` when the text has no balanced parameter list.
#[must_use]
pub fn parameters(signature: &str) -> Option<Vec<Parameter>> {
    let open = signature.find('(')?;
    let mut depth = 0usize;
    let mut close = None;
    for (offset, c) in signature[open..].char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    close = Some(open + offset);
                    break;
                }
            }
            _ => {}
        }
    }
    let inner = &signature[open + 1..close?];

    Some(
        split_top_level(inner)
            .into_iter()
            .filter_map(|raw| parse_parameter(raw.trim()))
            .collect(),
    )
}

fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, c) in list.char_indices() {
        match c {
            '(' | '<' | '[' | '{' => depth += 1,
            ')' | '>' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

fn parse_parameter(raw: &str) -> Option<Parameter> {
    let without_default = raw.split('=').next().unwrap_or("").trim();
    if without_default.is_empty() {
        return None;
    }
    if let Some((name, ty)) = without_default.split_once(':') {
        return Some(Parameter {
            type_text: normalize_signature(ty),
            name: name.trim().to_string(),
        });
    }
    let tokens: Vec<&str> = without_default.split_whitespace().collect();
    let (name, ty) = tokens.split_last()?;
    Some(Parameter {
        type_text: ty.join(" "),
        name: (*name).to_string(),
    })
}

/// True when both signatures list the same parameter types in the same order
/// but at least one parameter name differs.
#[must_use]
pub fn parameter_renamed(old_signature: &str, new_signature: &str) -> bool {
    let (Some(old), Some(new)) = (parameters(old_signature), parameters(new_signature)) else {
        return false;
    };
    old.len() == new.len()
        && old.iter().zip(&new).all(|(a, b)| a.type_text == b.type_text)
        && old.iter().zip(&new).any(|(a, b)| a.name != b.name)
}
