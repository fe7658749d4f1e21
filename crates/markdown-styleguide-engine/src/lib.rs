//! Markdown to HTML rendering for styleguide documents.
//!
//! Fenced code blocks are rendered twice: once verbatim as a live "run" view
//! and once as a highlighted, brace-encoded "source" listing. See
//! [`render::Renderer`] for the entry point.

pub mod assemble;
pub mod error;
pub mod escape;
pub mod fence;
pub mod front_matter;
pub mod highlight;
pub mod render;
pub mod slug;

// Re-export key types for easier usage
pub use assemble::{CodeBlockHtml, assemble};
pub use error::{Error, RenderError};
pub use escape::{encode_literal, escape_html, highlight_or_escape, language_class};
pub use fence::{FenceBlock, FenceInfo, FenceOptions, FenceRoles, OptionValue};
pub use front_matter::{Attributes, FrontMatterError, ParsedDocument};
pub use highlight::{HighlightError, Highlighter, SyntectHighlighter};
pub use render::{
    CodeBlockHandler, FenceHandler, RenderOptions, RenderResult, Renderer, parse, parse_async,
    render_with_block_handler,
};
pub use slug::to_slug;
