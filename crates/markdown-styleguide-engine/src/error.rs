use thiserror::Error;

use crate::{front_matter::FrontMatterError, highlight::HighlightError};

/// Failure while turning a markdown body into HTML.
///
/// No partial output accompanies a render error: a document either renders
/// completely or not at all.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to render code block: {0}")]
    Highlight(#[from] HighlightError),
}

/// Top-level error returned by [`crate::parse`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to parse front matter: {0}")]
    FrontMatter(#[from] FrontMatterError),
    #[error("Failed to render markdown: {0}")]
    Render(#[from] RenderError),
}
