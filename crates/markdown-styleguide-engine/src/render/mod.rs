//! # Document rendering
//!
//! A [`Renderer`] runs a document through three stages:
//!
//! 1. **Split**: front matter is separated from the markdown body
//!    ([`ParsedDocument::extract`])
//! 2. **Render**: the body goes through pulldown-cmark; every fenced code
//!    block is handed to a [`FenceHandler`] whose fragment replaces it
//! 3. **Resolve**: the HTML and front matter attributes are returned as a
//!    [`RenderResult`]
//!
//! A renderer owns its options and highlighter and never mutates them while
//! rendering, so one instance can serve concurrent callers.

mod anchors;
mod handler;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, RenderError},
    front_matter::{Attributes, ParsedDocument},
    highlight::{DEFAULT_FALLBACK_LANGUAGE, Highlighter, SyntectHighlighter},
};

pub use handler::{CodeBlockHandler, FenceHandler, render_with_block_handler};

/// Options applied to every document a [`Renderer`] renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Prepended to the language tag to form the code block CSS class.
    pub lang_prefix: String,
    /// Syntax-highlight source views. When off, code is only HTML-escaped.
    pub highlight: bool,
    /// Give headings an `id` slugged from their text.
    pub heading_anchors: bool,
    /// Pass raw HTML in the markdown through instead of escaping it.
    pub allow_html: bool,
    /// Only fences whose first token matches render as examples; the rest
    /// render as plain listings. `None` makes every fence an example.
    pub fence_trigger: Option<String>,
    /// Grammar for fences with an empty or unknown language.
    pub fallback_language: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            lang_prefix: "language-".to_string(),
            highlight: true,
            heading_anchors: false,
            allow_html: false,
            fence_trigger: None,
            fallback_language: DEFAULT_FALLBACK_LANGUAGE.to_string(),
        }
    }
}

/// Rendered document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderResult {
    pub html: String,
    /// Front matter fields, passed through unchanged.
    pub attributes: Attributes,
    /// Reserved for example dependencies. Always empty.
    pub imports: BTreeMap<String, String>,
}

pub struct Renderer {
    options: RenderOptions,
    highlighter: Option<Box<dyn Highlighter + Send + Sync>>,
}

impl Renderer {
    /// Build a renderer, using syntect for highlighting when `options.highlight` is set.
    pub fn new(options: RenderOptions) -> Self {
        let highlighter = options.highlight.then(|| {
            Box::new(SyntectHighlighter::with_fallback(
                options.fallback_language.clone(),
            )) as Box<dyn Highlighter + Send + Sync>
        });
        Self {
            options,
            highlighter,
        }
    }

    /// Build a renderer around a custom highlighter, regardless of `options.highlight`.
    pub fn with_highlighter(
        options: RenderOptions,
        highlighter: impl Highlighter + Send + Sync + 'static,
    ) -> Self {
        Self {
            options,
            highlighter: Some(Box::new(highlighter)),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a markdown body (no front matter) to HTML.
    pub fn render(&self, body: &str) -> Result<String, RenderError> {
        let highlighter = self
            .highlighter
            .as_deref()
            .map(|highlighter| highlighter as &dyn Highlighter);
        let handler = CodeBlockHandler::new(&self.options, highlighter);
        handler::render_body(body, &handler, &self.options)
    }

    /// Split front matter from `input` and render the body.
    pub fn parse(&self, input: &str) -> Result<RenderResult, Error> {
        let (attributes, body) = ParsedDocument::extract(input)?.into_parts();
        let html = self.render(&body)?;

        log::debug!(
            "Rendered document: {} front matter fields, {} bytes of HTML",
            attributes.len(),
            html.len()
        );
        Ok(RenderResult {
            html,
            attributes,
            imports: BTreeMap::new(),
        })
    }

    /// [`Renderer::parse`] for async callers. Completes without yielding.
    pub async fn parse_async(&self, input: &str) -> Result<RenderResult, Error> {
        self.parse(input)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Parse and render `input` with default options.
pub fn parse(input: &str) -> Result<RenderResult, Error> {
    Renderer::default().parse(input)
}

pub async fn parse_async(input: &str) -> Result<RenderResult, Error> {
    parse(input)
}
