//! String transforms applied to fenced code before it is assembled.
//!
//! Source listings end up inside a JSX-like template where `{`, `}` and raw
//! newlines are significant. [`encode_literal`] wraps each of them in a
//! literal-string expression so the listing survives that template verbatim.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::highlight::{HighlightError, Highlighter};

pub const LITERAL_OPEN_BRACE: &str = r#"{"{"}"#;
pub const LITERAL_CLOSE_BRACE: &str = r#"{"}"}"#;
pub const LITERAL_NEWLINE: &str = r#"{"\n"}"#;

const CLASS_ATTRIBUTE: &str = "class=";
const JSX_CLASS_ATTRIBUTE: &str = "className=";

/// Characters left as-is when building a language class name. Everything
/// else is percent-encoded.
const CLASS_NAME_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'@')
    .remove(b'*')
    .remove(b'_')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'/');

/// Escape `&`, `<`, `>` and `"` so text can sit inside a `<code>` element.
pub fn escape_html(code: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(code)
}

/// Highlight `code` when a highlighter is available, otherwise HTML-escape it.
pub fn highlight_or_escape(
    code: &str,
    language: &str,
    highlighter: Option<&dyn Highlighter>,
) -> Result<String, HighlightError> {
    match highlighter {
        Some(highlighter) => highlighter.highlight(code, language),
        None => Ok(escape_html(code).into_owned()),
    }
}

/// CSS class for a language tag, or `None` when the tag is empty.
pub fn language_class(prefix: &str, language: &str) -> Option<String> {
    if language.is_empty() {
        return None;
    }
    Some(format!(
        "{prefix}{}",
        utf8_percent_encode(language, CLASS_NAME_SAFE)
    ))
}

/// Encode highlighted HTML for embedding in a brace-sensitive template.
///
/// Single left-to-right pass:
/// - `{` becomes `{"{"}`
/// - `}` becomes `{"}"}`
/// - a newline becomes `{"\n"}` (backslash, `n`)
/// - `class=` becomes `className=`
///
/// Not idempotent: encoding already-encoded text wraps the braces again.
pub fn encode_literal(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + html.len() / 4);
    let mut rest = html;

    while let Some(pos) = rest.find(['{', '}', '\n', 'c']) {
        let (literal, tail) = rest.split_at(pos);
        out.push_str(literal);

        let (replacement, consumed) = classify(tail);
        out.push_str(replacement);
        rest = &tail[consumed..];
    }

    out.push_str(rest);
    out
}

/// Replacement text for the token at the start of `tail`, and its length.
fn classify(tail: &str) -> (&str, usize) {
    if tail.starts_with(CLASS_ATTRIBUTE) {
        return (JSX_CLASS_ATTRIBUTE, CLASS_ATTRIBUTE.len());
    }
    match tail.as_bytes()[0] {
        b'{' => (LITERAL_OPEN_BRACE, 1),
        b'}' => (LITERAL_CLOSE_BRACE, 1),
        b'\n' => (LITERAL_NEWLINE, 1),
        _ => (&tail[..1], 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Reverse every substitution made by `encode_literal`.
    fn decode_literal(encoded: &str) -> String {
        encoded
            .replace(LITERAL_OPEN_BRACE, "{")
            .replace(LITERAL_CLOSE_BRACE, "}")
            .replace(LITERAL_NEWLINE, "\n")
            .replace(JSX_CLASS_ATTRIBUTE, CLASS_ATTRIBUTE)
    }

    struct Upper;

    impl Highlighter for Upper {
        fn highlight(&self, code: &str, _language: &str) -> Result<String, HighlightError> {
            Ok(code.to_uppercase())
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_highlight_or_escape_prefers_highlighter() {
        assert_eq!(
            highlight_or_escape("<b>", "html", Some(&Upper)).unwrap(),
            "<B>"
        );
        assert_eq!(highlight_or_escape("<b>", "html", None).unwrap(), "&lt;b&gt;");
    }

    #[rstest]
    #[case("{", r#"{"{"}"#)]
    #[case("}", r#"{"}"}"#)]
    #[case("\n", r#"{"\n"}"#)]
    #[case("{example}", r#"{"{"}example{"}"}"#)]
    #[case("}{", r#"{"}"}{"{"}"#)]
    #[case(
        r#"<span class="token">x</span>"#,
        r#"<span className="token">x</span>"#
    )]
    #[case("a\nb", r#"a{"\n"}b"#)]
    #[case("cccc", "cccc")]
    fn test_encode_literal(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(encode_literal(input), expected);
    }

    #[test]
    fn test_text_without_special_characters_is_untouched() {
        let html = r#"<span data-kind="keyword">const</span> value = 42;"#;

        assert_eq!(encode_literal(html), html);
    }

    #[test]
    fn test_braces_round_trip() {
        let encoded = encode_literal("{example}");

        assert_eq!(decode_literal(&encoded), "{example}");
    }

    #[test]
    fn test_nested_and_quoted_braces_round_trip() {
        let source = "const style = {{ color: \"{red}\" }};\n<Button onClick={() => {}} />\n";

        assert_eq!(decode_literal(&encode_literal(source)), source);
    }

    #[test]
    fn test_encoding_is_not_idempotent() {
        let once = encode_literal("{");
        let twice = encode_literal(&once);

        assert_ne!(once, twice);
        assert_eq!(twice, r#"{"{"}"{"{"}"{"}"}"#);
    }

    #[test]
    fn test_language_class() {
        assert_eq!(
            language_class("language-", "jsx").as_deref(),
            Some("language-jsx")
        );
        assert_eq!(
            language_class("lang-", "c++").as_deref(),
            Some("lang-c++")
        );
        assert_eq!(
            language_class("language-", "a\"b").as_deref(),
            Some("language-a%22b")
        );
        assert_eq!(language_class("language-", ""), None);
    }
}
