//! Positional message formatting for resolved bundle values.
//!
//! Templates use `{0}`, `{1}`, … placeholders. Substitution is purely
//! textual: arguments are stringified through their `Display` form and
//! spliced in by position. `{{` and `}}` escape literal braces; anything
//! else that merely looks brace-like passes through untouched.

use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"\{(\d+)\}").unwrap();
}

/// Extracts placeholder indices from a template in occurrence order.
///
/// Duplicates are kept: `"{0} and {0}"` yields `[0, 0]`.
pub fn placeholder_indices(template: &str) -> Vec<usize> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .filter_map(|captures| captures[1].parse::<usize>().ok())
        .collect()
}

/// Returns the highest placeholder index used by a template, if any.
pub fn max_placeholder_index(template: &str) -> Option<usize> {
    placeholder_indices(template).into_iter().max()
}

/// Substitutes positional placeholders in `template` with `args`.
///
/// Rules:
/// - `{n}` with `n < args.len()` is replaced by `args[n]`'s display form.
/// - `{n}` referencing a missing argument is left as-is.
/// - `{{` and `}}` produce literal `{` and `}`.
/// - An unterminated or non-numeric brace sequence is copied verbatim.
/// - No arguments returns the template unchanged.
pub fn format_positional(template: &str, args: &[&dyn Display]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let bytes = template.as_bytes();
    let mut i = 0;
    let mut out = String::with_capacity(template.len());

    while i < bytes.len() {
        match bytes[i] {
            b'{' if i + 1 < bytes.len() && bytes[i + 1] == b'{' => {
                out.push('{');
                i += 2;
            }
            b'}' if i + 1 < bytes.len() && bytes[i + 1] == b'}' => {
                out.push('}');
                i += 2;
            }
            b'{' => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j].is_ascii_digit() {
                    j += 1;
                }
                if j > i + 1 && j < bytes.len() && bytes[j] == b'}' {
                    let index = template[i + 1..j].parse::<usize>().ok();
                    match index.and_then(|n| args.get(n)) {
                        Some(arg) => out.push_str(&arg.to_string()),
                        // Missing argument: keep the placeholder verbatim.
                        None => out.push_str(&template[i..=j]),
                    }
                    i = j + 1;
                } else {
                    out.push('{');
                    i += 1;
                }
            }
            _ => {
                // Copy the whole UTF-8 scalar, not just one byte.
                let ch_len = utf8_len(bytes[i]);
                out.push_str(&template[i..i + ch_len]);
                i += ch_len;
            }
        }
    }

    out
}

fn utf8_len(first_byte: u8) -> usize {
    match first_byte {
        b if b < 0x80 => 1,
        b if b >> 5 == 0b110 => 2,
        b if b >> 4 == 0b1110 => 3,
        _ => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(template: &str, args: &[&dyn Display]) -> String {
        format_positional(template, args)
    }

    #[test]
    fn test_substitutes_in_order() {
        let out = fmt("Color: {0}, Fruit: {1}", &[&"yellow", &"strawberry"]);
        assert_eq!(out, "Color: yellow, Fruit: strawberry");
    }

    #[test]
    fn test_no_args_returns_template_unchanged() {
        assert_eq!(fmt("Hello {0}", &[]), "Hello {0}");
    }

    #[test]
    fn test_repeated_placeholder() {
        assert_eq!(fmt("{0}{0}{0}", &[&"ab"]), "ababab");
    }

    #[test]
    fn test_missing_argument_left_verbatim() {
        assert_eq!(fmt("{0} and {3}", &[&"x"]), "x and {3}");
    }

    #[test]
    fn test_non_string_arguments() {
        assert_eq!(fmt("{0} + {1} = {2}", &[&1, &2, &3]), "1 + 2 = 3");
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(fmt("{{0}} is literal, {0} is not", &[&"v"]), "{0} is literal, v is not");
    }

    #[test]
    fn test_non_numeric_braces_pass_through() {
        assert_eq!(fmt("set {x} and {0}", &[&"v"]), "set {x} and v");
    }

    #[test]
    fn test_unterminated_brace() {
        assert_eq!(fmt("dangling {0", &[&"v"]), "dangling {0");
    }

    #[test]
    fn test_multibyte_text_preserved() {
        assert_eq!(fmt("héllo {0} • wörld", &[&"ß"]), "héllo ß • wörld");
    }

    #[test]
    fn test_placeholder_indices() {
        assert_eq!(placeholder_indices("{1} {0} {1}"), vec![1, 0, 1]);
        assert!(placeholder_indices("no placeholders").is_empty());
    }

    #[test]
    fn test_max_placeholder_index() {
        assert_eq!(max_placeholder_index("{0} {4} {2}"), Some(4));
        assert_eq!(max_placeholder_index("plain"), None);
    }
}
