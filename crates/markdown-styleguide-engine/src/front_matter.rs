//! Splits a document into its YAML front matter and markdown body.
//!
//! A front matter block opens on the very first line with `---` (or the
//! `= yaml =` marker), optionally preceded by a byte order mark, and closes
//! with the same marker or `...` on a line of its own. Anything else is body.

use std::collections::BTreeMap;

use serde_yaml::Value;
use thiserror::Error;

/// Front matter fields keyed by name.
pub type Attributes = BTreeMap<String, Value>;

const OPENING_MARKERS: [&str; 2] = ["---", "= yaml ="];
const ALTERNATE_CLOSER: &str = "...";
const BYTE_ORDER_MARK: char = '\u{feff}';

#[derive(Debug, Error)]
pub enum FrontMatterError {
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Expected a mapping of fields, found {0}")]
    NotAMapping(&'static str),
    #[error("Unsupported field name: {0:?}")]
    UnsupportedKey(Value),
}

/// A document split into front matter attributes and markdown body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    attributes: Attributes,
    body: String,
    front_matter: Option<String>,
    body_begin: usize,
}

impl ParsedDocument {
    /// Split `input` on its front matter delimiters.
    ///
    /// Input without a (closed) front matter block is returned unchanged as
    /// the body, with empty attributes.
    pub fn extract(input: &str) -> Result<Self, FrontMatterError> {
        let Some(block) = FrontMatterBlock::find(input) else {
            log::trace!("No front matter block found");
            return Ok(Self::without_front_matter(input));
        };

        log::trace!("Front matter block ends at byte {}", block.body_start);
        let attributes = parse_attributes(block.yaml)?;

        Ok(Self {
            attributes,
            body: input[block.body_start..].to_string(),
            front_matter: Some(block.yaml.to_string()),
            body_begin: line_number_at(input, block.body_start),
        })
    }

    fn without_front_matter(input: &str) -> Self {
        Self {
            attributes: Attributes::new(),
            body: input.to_string(),
            front_matter: None,
            body_begin: 1,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Raw text between the delimiters, trimmed. `None` when there was no block.
    pub fn front_matter(&self) -> Option<&str> {
        self.front_matter.as_deref()
    }

    /// 1-based line number on which the body starts.
    pub fn body_begin(&self) -> usize {
        self.body_begin
    }

    pub fn into_parts(self) -> (Attributes, String) {
        (self.attributes, self.body)
    }
}

struct FrontMatterBlock<'a> {
    yaml: &'a str,
    body_start: usize,
}

impl<'a> FrontMatterBlock<'a> {
    fn find(input: &'a str) -> Option<Self> {
        let bom = if input.starts_with(BYTE_ORDER_MARK) {
            BYTE_ORDER_MARK.len_utf8()
        } else {
            0
        };

        let mut lines = input[bom..].split_inclusive('\n');
        let first = lines.next()?;
        let marker = strip_line_ending(first);
        if !OPENING_MARKERS.contains(&marker) {
            return None;
        }

        let yaml_start = bom + first.len();
        let mut offset = yaml_start;
        for line in lines {
            let content = strip_line_ending(line).trim_end();
            if content == marker || content == ALTERNATE_CLOSER {
                return Some(Self {
                    yaml: input[yaml_start..offset].trim(),
                    body_start: offset + line.len(),
                });
            }
            offset += line.len();
        }

        None
    }
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn line_number_at(input: &str, byte_offset: usize) -> usize {
    input[..byte_offset].matches('\n').count() + 1
}

fn parse_attributes(yaml: &str) -> Result<Attributes, FrontMatterError> {
    if yaml.is_empty() {
        return Ok(Attributes::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Null => Ok(Attributes::new()),
        Value::Mapping(mapping) => mapping
            .into_iter()
            .map(|(key, value)| attribute_name(key).map(|name| (name, value)))
            .collect(),
        other => Err(FrontMatterError::NotAMapping(describe(&other))),
    }
}

fn attribute_name(key: Value) -> Result<String, FrontMatterError> {
    match key {
        Value::String(name) => Ok(name),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(FrontMatterError::UnsupportedKey(other)),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
