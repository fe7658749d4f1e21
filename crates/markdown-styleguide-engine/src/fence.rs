//! Fenced code block parameters.
//!
//! The text after the opening fence is split on whitespace. The last token is
//! the language; with three or more tokens the second-to-last is an options
//! blob such as `compiled;theme=dark`.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

const OPTION_DELIMITER: char = ';';
const COMPILED: &str = "compiled";

/// Content and parameter string of one fenced code region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceBlock<'a> {
    pub content: &'a str,
    pub params: &'a str,
}

/// Which fence tokens play which role.
///
/// | tokens | language | options |
/// |--------|----------|---------|
/// | 0      | none     | none    |
/// | 1      | last     | none    |
/// | 2      | last     | none    |
/// | 3+     | last     | second-to-last |
///
/// Two-token fences (`mode lang`) carry no options; the first token is
/// ignored rather than treated as an options blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceRoles<'a> {
    pub language: Option<&'a str>,
    pub options: Option<&'a str>,
}

impl<'a> FenceRoles<'a> {
    pub fn from_tokens(tokens: &[&'a str]) -> Self {
        match *tokens {
            [] => Self {
                language: None,
                options: None,
            },
            [language] | [_, language] => Self {
                language: Some(language),
                options: None,
            },
            [.., options, language] => Self {
                language: Some(language),
                options: Some(options),
            },
        }
    }
}

/// Value of a single render option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Bare key with no `=`, e.g. `compiled`.
    Flag,
    Text(String),
}

impl OptionValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Flag => true,
            OptionValue::Text(value) => !matches!(value.as_str(), "" | "false" | "0"),
        }
    }
}

/// Render options parsed from a fence's options blob.
///
/// Only `compiled` changes rendering; other keys are kept but ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceOptions {
    entries: BTreeMap<String, OptionValue>,
}

impl FenceOptions {
    /// Parse a `;`-delimited `key=value` list. Keys and values are
    /// percent-decoded with `+` read as a space; a repeated key keeps its
    /// last value.
    pub fn parse(blob: &str) -> Self {
        let entries = blob
            .split(OPTION_DELIMITER)
            .filter_map(|pair| {
                let (key, value) = match pair.split_once('=') {
                    Some((key, value)) => (decode(key), OptionValue::Text(decode(value))),
                    None => (decode(pair), OptionValue::Flag),
                };
                (!key.is_empty()).then_some((key, value))
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.get(key)
    }

    /// Whether only the run view should be rendered.
    pub fn is_compiled(&self) -> bool {
        self.get(COMPILED).is_some_and(OptionValue::is_truthy)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, OptionValue)> for FenceOptions {
    fn from_iter<I: IntoIterator<Item = (K, OptionValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Language and options derived from a fence parameter string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceInfo {
    /// Language tag; empty when the fence has no parameters.
    pub language: String,
    /// The raw options blob, when the fence has one.
    pub render_mode: Option<String>,
    pub options: FenceOptions,
}

impl FenceInfo {
    pub fn parse(params: &str) -> Self {
        let tokens: Vec<&str> = params.split_whitespace().collect();
        let roles = FenceRoles::from_tokens(&tokens);

        Self {
            language: roles.language.unwrap_or_default().to_string(),
            render_mode: roles.options.map(str::to_string),
            options: roles.options.map(FenceOptions::parse).unwrap_or_default(),
        }
    }
}
