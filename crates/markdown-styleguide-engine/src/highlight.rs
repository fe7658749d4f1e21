//! Syntax highlighting capability used for the source view of code blocks.

use std::sync::OnceLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use thiserror::Error;

/// Grammar used when a fence names no language or an unknown one.
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "txt";

/// Fence tags with no grammar of their own, mapped to the closest bundled one.
const LANGUAGE_ALIASES: [(&str, &str); 5] = [
    ("jsx", "js"),
    ("tsx", "js"),
    ("ts", "js"),
    ("shell", "sh"),
    ("yml", "yaml"),
];

#[derive(Debug, Error)]
#[error("Failed to highlight code as '{language}': {message}")]
pub struct HighlightError {
    pub language: String,
    pub message: String,
}

/// Turns source code into syntax-highlighted HTML.
///
/// Output must already be HTML-safe: text content escaped, markup limited to
/// the highlighter's own elements.
pub trait Highlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError>;
}

fn default_syntaxes() -> &'static SyntaxSet {
    static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Highlighter backed by syntect's bundled grammars, emitting class-based spans.
#[derive(Clone)]
pub struct SyntectHighlighter {
    syntaxes: &'static SyntaxSet,
    fallback_language: String,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self::with_fallback(DEFAULT_FALLBACK_LANGUAGE)
    }

    pub fn with_fallback(fallback_language: impl Into<String>) -> Self {
        Self {
            syntaxes: default_syntaxes(),
            fallback_language: fallback_language.into(),
        }
    }

    /// Whether `language` resolves to a grammar without falling back.
    pub fn supports(&self, language: &str) -> bool {
        self.lookup(language).is_some()
    }

    fn lookup(&self, language: &str) -> Option<&'static SyntaxReference> {
        if language.is_empty() {
            return None;
        }
        let token = LANGUAGE_ALIASES
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(language))
            .map_or(language, |(_, target)| *target);
        self.syntaxes.find_syntax_by_token(token)
    }

    fn syntax_for(&self, language: &str) -> &'static SyntaxReference {
        if let Some(syntax) = self.lookup(language) {
            return syntax;
        }
        if !language.is_empty() {
            log::warn!(
                "Unknown language '{language}', highlighting as '{}'",
                self.fallback_language
            );
        }
        self.syntaxes
            .find_syntax_by_token(&self.fallback_language)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError> {
        let syntax = self.syntax_for(language);
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, self.syntaxes, ClassStyle::Spaced);

        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| HighlightError {
                    language: language.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(generator.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language_produces_classed_spans() {
        let highlighter = SyntectHighlighter::new();

        let html = highlighter.highlight("let x = 1;\n", "js").unwrap();

        assert!(html.contains("<span class=\""), "got: {html}");
        assert!(html.contains("let"));
    }

    #[test]
    fn test_markup_in_code_is_escaped() {
        let highlighter = SyntectHighlighter::new();

        let html = highlighter.highlight("<b>bold</b>\n", "txt").unwrap();

        assert!(html.contains("&lt;b&gt;"), "got: {html}");
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_unknown_language_falls_back_without_error() {
        let _ = env_logger::builder().is_test(true).try_init();
        let highlighter = SyntectHighlighter::new();

        assert!(!highlighter.supports("no-such-language"));
        let html = highlighter.highlight("plain words\n", "no-such-language").unwrap();

        assert!(html.contains("plain words"));
    }

    #[test]
    fn test_aliases_resolve_to_bundled_grammars() {
        let highlighter = SyntectHighlighter::new();

        assert!(highlighter.supports("jsx"));
        assert!(highlighter.supports("JSX"));
        assert!(!highlighter.supports(""));
    }

    #[test]
    fn test_empty_language_uses_fallback() {
        let highlighter = SyntectHighlighter::with_fallback("not-a-grammar-either");

        let html = highlighter.highlight("text\n", "").unwrap();

        assert!(html.contains("text"));
    }
}
