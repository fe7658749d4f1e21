//! Heading slugs for anchor links.
//!
//! `Getting Started!` becomes `getting-started`. Text containing neither
//! whitespace nor separators is split on case changes first, so `fooBar`
//! becomes `foo-bar`.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn separator_run() -> &'static Regex {
    static SEPARATOR_RUN: OnceLock<Regex> = OnceLock::new();
    SEPARATOR_RUN
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9]+(.|$)").expect("Invalid separator regex"))
}

fn camel_boundary() -> &'static Regex {
    static CAMEL_BOUNDARY: OnceLock<Regex> = OnceLock::new();
    CAMEL_BOUNDARY.get_or_init(|| Regex::new(r"(.)([A-Z]+)").expect("Invalid camel case regex"))
}

fn has_camel_case() -> &'static Regex {
    static HAS_CAMEL_CASE: OnceLock<Regex> = OnceLock::new();
    HAS_CAMEL_CASE
        .get_or_init(|| Regex::new(r"[a-z][A-Z]|[A-Z][a-z]").expect("Invalid camel case regex"))
}

/// Convert heading text into a lowercase, hyphen-separated slug.
///
/// Deterministic: the same text always yields the same slug.
pub fn to_slug(text: &str) -> String {
    to_space_case(text).replace(char::is_whitespace, "-")
}

fn to_space_case(text: &str) -> String {
    separate_words(&to_no_case(text)).trim().to_string()
}

fn to_no_case(text: &str) -> String {
    if text.contains(char::is_whitespace) {
        return text.to_lowercase();
    }
    if text.contains(['_', '-', '.', ':']) {
        let separated = separate_words(text);
        let words = if separated.is_empty() {
            text
        } else {
            &separated
        };
        return words.to_lowercase();
    }
    if has_camel_case().is_match(text) {
        return split_camel_case(text).to_lowercase();
    }
    text.to_lowercase()
}

/// Collapse each run of non-alphanumerics into one space, dropping a trailing run.
fn separate_words(text: &str) -> String {
    separator_run()
        .replace_all(text, |caps: &Captures| match &caps[1] {
            "" => String::new(),
            next => format!(" {next}"),
        })
        .into_owned()
}

fn split_camel_case(text: &str) -> String {
    camel_boundary()
        .replace_all(text, |caps: &Captures| {
            let uppers: Vec<String> = caps[2].chars().map(|c| c.to_string()).collect();
            format!("{} {}", &caps[1], uppers.join(" "))
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Getting Started!", "getting-started")]
    #[case("Hello World", "hello-world")]
    #[case("  padded   heading  ", "padded-heading")]
    #[case("API Reference (v2)", "api-reference-v2")]
    #[case("snake_case_name", "snake-case-name")]
    #[case("dotted.name", "dotted-name")]
    #[case("fooBar", "foo-bar")]
    #[case("buttonGroupXL", "button-group-x-l")]
    #[case("Button", "button")]
    #[case("", "")]
    fn test_to_slug(#[case] heading: &str, #[case] expected: &str) {
        assert_eq!(to_slug(heading), expected);
    }

    #[test]
    fn test_slug_is_deterministic() {
        assert_eq!(to_slug("Getting Started!"), to_slug("Getting Started!"));
    }

    #[test]
    fn test_only_separators_keeps_nothing() {
        assert_eq!(to_slug("---"), "");
    }
}
