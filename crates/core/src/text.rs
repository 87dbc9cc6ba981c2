//! Stateless string helpers.
//!
//! Pure functions shared by path handling, key parsing, and template code.
//! Case-insensitive comparisons use Unicode case folding and are independent
//! of the host locale.

use std::sync::LazyLock;

use regex::Regex;

/// GUID with hyphen separators, optionally wrapped in braces.
static GUID_HYPHENATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\{?[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\}?$",
    )
    .expect("Invalid regex")
});

/// GUID as 32 contiguous hex digits, optionally wrapped in braces.
static GUID_COMPACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{?[0-9a-fA-F]{32}\}?$").expect("Invalid regex"));

/// Replaces every `\` with `/` in a path.
#[must_use]
pub fn ensure_forward_slashes(value: &str) -> String {
    value.replace('\\', "/")
}

/// Replaces every `/` with `\` in a path.
#[must_use]
pub fn ensure_back_slashes(value: &str) -> String {
    value.replace('/', "\\")
}

/// Repeatedly strips `for_removing` from the start of `value`, comparing
/// case-insensitively. An empty `for_removing` is a no-op.
#[must_use]
pub fn trim_start_ignore_case<'a>(value: &'a str, for_removing: &str) -> &'a str {
    if for_removing.is_empty() {
        return value;
    }
    let mut out = value;
    while let Some(rest) = strip_prefix_ignore_case(out, for_removing) {
        out = rest;
    }
    out
}

/// Ensures `input` starts with `prefix`, idempotently.
///
/// Already-prefixed input is returned unchanged; otherwise the prefix is
/// prepended after case-insensitively stripping any repeated occurrences,
/// so `ensure_starts_with("//cart", "/")` is `"/cart"`, not `"///cart"`.
#[must_use]
pub fn ensure_starts_with(input: &str, prefix: &str) -> String {
    if input.starts_with(prefix) {
        return input.to_owned();
    }
    format!("{prefix}{}", trim_start_ignore_case(input, prefix))
}

/// Ensures `input` ends with `suffix`, idempotently.
#[must_use]
pub fn ensure_ends_with(input: &str, suffix: &str) -> String {
    if input.ends_with(suffix) {
        input.to_owned()
    } else {
        format!("{input}{suffix}")
    }
}

/// Ensures `input` both starts and ends with `value`.
#[must_use]
pub fn ensure_starts_and_ends_with(input: &str, value: char) -> String {
    let mut buf = [0u8; 4];
    let value: &str = value.encode_utf8(&mut buf);
    ensure_ends_with(&ensure_starts_with(input, value), value)
}

/// Strips a single leading occurrence of `value`, if present.
#[must_use]
pub fn ensure_not_starts_with(input: &str, value: char) -> &str {
    input.strip_prefix(value).unwrap_or(input)
}

/// Strips a single trailing occurrence of `value`, if present.
#[must_use]
pub fn ensure_not_ends_with(input: &str, value: char) -> &str {
    input.strip_suffix(value).unwrap_or(input)
}

/// Strips a single occurrence of `value` from each end.
#[must_use]
pub fn ensure_not_starts_or_ends_with(input: &str, value: char) -> &str {
    ensure_not_ends_with(ensure_not_starts_with(input, value), value)
}

/// Compares two strings case-insensitively, independent of host locale.
#[must_use]
pub fn invariant_eq(compare: &str, compare_to: &str) -> bool {
    compare.to_lowercase() == compare_to.to_lowercase()
}

/// Case-insensitive `starts_with`, independent of host locale.
#[must_use]
pub fn invariant_starts_with(compare: &str, compare_to: &str) -> bool {
    strip_prefix_ignore_case(compare, compare_to).is_some()
}

/// Case-insensitive `ends_with`, independent of host locale.
#[must_use]
pub fn invariant_ends_with(compare: &str, compare_to: &str) -> bool {
    compare.to_lowercase().ends_with(&compare_to.to_lowercase())
}

/// Case-insensitive `contains`, independent of host locale.
#[must_use]
pub fn invariant_contains(compare: &str, compare_to: &str) -> bool {
    compare.to_lowercase().contains(&compare_to.to_lowercase())
}

/// Case-insensitive membership test over a slice of strings.
#[must_use]
pub fn invariant_member<S: AsRef<str>>(values: &[S], value: &str) -> bool {
    values.iter().any(|v| invariant_eq(v.as_ref(), value))
}

/// True when the string is empty or all whitespace.
#[must_use]
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns `value`, or `default` when `value` is blank.
#[must_use]
pub fn if_blank<'a>(value: &'a str, default: &'a str) -> &'a str {
    if is_blank(value) { default } else { value }
}

/// Determines whether the string has the shape of a GUID.
///
/// With `with_hyphens` the canonical `8-4-4-4-12` form is expected;
/// without, 32 contiguous hex digits. Braces around either form are
/// accepted. Returns `false` for anything else, including the empty
/// string; never panics.
#[must_use]
pub fn is_guid(value: &str, with_hyphens: bool) -> bool {
    if value.is_empty() {
        return false;
    }
    if with_hyphens {
        GUID_HYPHENATED_RE.is_match(value)
    } else {
        GUID_COMPACT_RE.is_match(value)
    }
}

/// Applies an ordered set of `(pattern, replacement)` pairs to `text`.
///
/// Pairs are applied sequentially, so a later pattern can match text
/// introduced by an earlier replacement; the caller's ordering is
/// significant. Pairs with an empty pattern are skipped.
#[must_use]
pub fn replace_many(text: &str, replacements: &[(&str, &str)]) -> String {
    replacements
        .iter()
        .filter(|(from, _)| !from.is_empty())
        .fold(text.to_owned(), |current, (from, to)| {
            current.replace(from, to)
        })
}

/// Replaces every occurrence of each listed character with `replacement`.
#[must_use]
pub fn replace_chars(text: &str, chars: &[char], replacement: char) -> String {
    text.chars()
        .map(|c| if chars.contains(&c) { replacement } else { c })
        .collect()
}

/// Replaces every character that is not a letter or digit with
/// `replacement`, preserving the character count.
#[must_use]
pub fn replace_non_alphanumeric(input: &str, replacement: char) -> String {
    input
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { replacement })
        .collect()
}

/// Strips `prefix` from `value` once, comparing character-wise with Unicode
/// case folding. Returns the remainder, or `None` when `value` does not
/// start with `prefix`.
fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = value.char_indices();
    let mut pref = prefix.chars();
    loop {
        let Some(p) = pref.next() else {
            return Some(match rest.next() {
                Some((i, _)) => value.get(i..).unwrap_or(""),
                None => "",
            });
        };
        let (_, v) = rest.next()?;
        if !v.to_lowercase().eq(p.to_lowercase()) {
            return None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_normalization() {
        assert_eq!(ensure_forward_slashes(r"a\b\c"), "a/b/c");
        assert_eq!(ensure_back_slashes("a/b/c"), r"a\b\c");
        assert_eq!(ensure_forward_slashes(""), "");
    }

    #[test]
    fn test_back_then_forward_maps_every_slash_forward() {
        for s in ["a/b\\c", "\\\\server\\share", "plain", "//already//"] {
            let normalized = ensure_forward_slashes(&ensure_back_slashes(s));
            assert!(!normalized.contains('\\'), "{normalized}");
            let slashes = s.chars().filter(|c| *c == '/' || *c == '\\').count();
            assert_eq!(normalized.matches('/').count(), slashes);
        }
    }

    #[test]
    fn test_trim_start_ignore_case() {
        assert_eq!(trim_start_ignore_case("FooFoobar", "foo"), "bar");
        assert_eq!(trim_start_ignore_case("bar", "foo"), "bar");
        assert_eq!(trim_start_ignore_case("bar", ""), "bar");
        assert_eq!(trim_start_ignore_case("", "foo"), "");
    }

    #[test]
    fn test_ensure_starts_with_is_idempotent() {
        for (s, v) in [("cart", "/"), ("/cart", "/"), ("//cart", "/"), ("", "/")] {
            let once = ensure_starts_with(s, v);
            assert_eq!(ensure_starts_with(&once, v), once);
        }
    }

    #[test]
    fn test_ensure_starts_with_collapses_repeats() {
        assert_eq!(ensure_starts_with("//cart", "/"), "/cart");
        assert_eq!(ensure_starts_with("cart", "/"), "/cart");
        assert_eq!(ensure_starts_with("/cart", "/"), "/cart");
    }

    #[test]
    fn test_ensure_ends_with() {
        assert_eq!(ensure_ends_with("path", "/"), "path/");
        assert_eq!(ensure_ends_with("path/", "/"), "path/");
    }

    #[test]
    fn test_ensure_starts_and_ends_with() {
        assert_eq!(ensure_starts_and_ends_with("cart", '/'), "/cart/");
        assert_eq!(ensure_starts_and_ends_with("/cart/", '/'), "/cart/");
    }

    #[test]
    fn test_ensure_not_variants_strip_single_occurrence() {
        assert_eq!(ensure_not_starts_with("/cart", '/'), "cart");
        assert_eq!(ensure_not_starts_with("//cart", '/'), "/cart");
        assert_eq!(ensure_not_ends_with("cart/", '/'), "cart");
        assert_eq!(ensure_not_ends_with("cart", '/'), "cart");
        assert_eq!(ensure_not_starts_or_ends_with("/cart/", '/'), "cart");
    }

    #[test]
    fn test_invariant_comparisons() {
        assert!(invariant_eq("Checkout", "checkout"));
        assert!(!invariant_eq("checkout", "cart"));
        assert!(invariant_starts_with("Checkout/Step1", "checkout"));
        assert!(!invariant_starts_with("cart", "checkout"));
        assert!(invariant_ends_with("Checkout/Step1", "STEP1"));
        assert!(invariant_contains("The Checkout Page", "checkout"));
        assert!(!invariant_contains("cart", "checkout"));
    }

    #[test]
    fn test_invariant_member() {
        let values = ["Cart", "Checkout"];
        assert!(invariant_member(&values, "checkout"));
        assert!(!invariant_member(&values, "wishlist"));
    }

    #[test]
    fn test_blank_helpers() {
        assert!(is_blank(""));
        assert!(is_blank("   \t"));
        assert!(!is_blank(" x "));
        assert_eq!(if_blank("", "fallback"), "fallback");
        assert_eq!(if_blank("  ", "fallback"), "fallback");
        assert_eq!(if_blank("value", "fallback"), "value");
    }

    #[test]
    fn test_is_guid_hyphenated() {
        assert!(is_guid("550e8400-e29b-41d4-a716-446655440000", true));
        assert!(is_guid("{550e8400-e29b-41d4-a716-446655440000}", true));
        assert!(!is_guid("550e8400-e29b-41d4-a716-446655440000", false));
        assert!(!is_guid("not-a-guid", true));
        assert!(!is_guid("", true));
    }

    #[test]
    fn test_is_guid_compact() {
        assert!(is_guid("550e8400e29b41d4a716446655440000", false));
        assert!(is_guid("{550e8400e29b41d4a716446655440000}", false));
        assert!(!is_guid("550e8400e29b41d4a716446655440000", true));
        assert!(!is_guid("550e8400e29b41d4a71644665544000", false));
    }

    #[test]
    fn test_replace_many_chains_in_caller_order() {
        assert_eq!(replace_many("aXb", &[("X", "Y"), ("Y", "Z")]), "aZb");
        // Reversed order: Y is replaced before any Y exists, so the chain
        // stops at the first substitution.
        assert_eq!(replace_many("aXb", &[("Y", "Z"), ("X", "Y")]), "aYb");
    }

    #[test]
    fn test_replace_many_skips_empty_patterns() {
        assert_eq!(replace_many("abc", &[("", "x"), ("b", "y")]), "ayc");
    }

    #[test]
    fn test_replace_chars() {
        assert_eq!(replace_chars("a-b_c", &['-', '_'], ' '), "a b c");
        assert_eq!(replace_chars("abc", &[], '!'), "abc");
    }

    #[test]
    fn test_replace_non_alphanumeric_preserves_length() {
        let input = "sku #42 (blue)";
        let out = replace_non_alphanumeric(input, '-');
        assert_eq!(out, "sku--42--blue-");
        assert_eq!(out.chars().count(), input.chars().count());
    }
}
