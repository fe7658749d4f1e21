use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::{
    assemble::CodeBlockHtml,
    error::RenderError,
    escape::{encode_literal, highlight_or_escape, language_class},
    fence::{FenceBlock, FenceInfo},
    highlight::Highlighter,
};

use super::{RenderOptions, anchors};

/// Renders one fenced code block into an HTML fragment.
///
/// Called synchronously for every fence in document order; the returned
/// fragment replaces the fence in the output.
pub trait FenceHandler {
    fn render_fence(&self, block: &FenceBlock<'_>) -> Result<String, RenderError>;
}

/// The styleguide fence handler: dual run/source views for examples.
pub struct CodeBlockHandler<'r> {
    options: &'r RenderOptions,
    highlighter: Option<&'r dyn Highlighter>,
}

impl<'r> CodeBlockHandler<'r> {
    pub fn new(options: &'r RenderOptions, highlighter: Option<&'r dyn Highlighter>) -> Self {
        Self {
            options,
            highlighter,
        }
    }

    fn is_example(&self, params: &str) -> bool {
        match &self.options.fence_trigger {
            Some(trigger) => params.split_whitespace().next() == Some(trigger.as_str()),
            None => true,
        }
    }

    fn render_example(&self, block: &FenceBlock<'_>) -> Result<String, RenderError> {
        let info = FenceInfo::parse(block.params);
        let highlighted = highlight_or_escape(block.content, &info.language, self.highlighter)?;
        let css_class = language_class(&self.options.lang_prefix, &info.language);

        let code_block = CodeBlockHtml::new(
            block.content,
            encode_literal(&highlighted),
            css_class.as_deref(),
            &info.options,
        );

        log::debug!(
            "Rendered '{}' example, options {:?}, source view {}",
            info.language,
            info.options.keys().collect::<Vec<_>>(),
            if code_block.is_compiled() { "omitted" } else { "included" }
        );
        Ok(code_block.to_string())
    }

    fn render_listing(&self, block: &FenceBlock<'_>) -> Result<String, RenderError> {
        let language = block.params.split_whitespace().next().unwrap_or_default();
        let highlighted = highlight_or_escape(block.content, language, self.highlighter)?;
        let class_attr = language_class(&self.options.lang_prefix, language)
            .map(|class| format!(" class=\"{class}\""))
            .unwrap_or_default();

        log::debug!("Rendered '{language}' listing");
        Ok(format!("<pre><code{class_attr}>{highlighted}</code></pre>\n"))
    }
}

impl FenceHandler for CodeBlockHandler<'_> {
    fn render_fence(&self, block: &FenceBlock<'_>) -> Result<String, RenderError> {
        if self.is_example(block.params) {
            self.render_example(block)
        } else {
            self.render_listing(block)
        }
    }
}

/// Render markdown to HTML, delegating every fenced code block to `handler`.
pub fn render_with_block_handler(
    body: &str,
    handler: &dyn FenceHandler,
) -> Result<String, RenderError> {
    render_body(body, handler, &RenderOptions::default())
}

pub(crate) fn render_body(
    body: &str,
    handler: &dyn FenceHandler,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let parser = Parser::new_ext(body, markdown_extensions());
    let mut events = intercept_fences(parser, handler, options.allow_html)?;
    if options.heading_anchors {
        events = anchors::with_heading_ids(events);
    }

    let mut html = String::with_capacity(body.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, events.into_iter());
    Ok(html)
}

fn markdown_extensions() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES
}

struct PendingFence {
    params: String,
    content: String,
}

impl PendingFence {
    fn as_block(&self) -> FenceBlock<'_> {
        FenceBlock {
            content: &self.content,
            params: &self.params,
        }
    }
}

/// Replace each fenced code block's events with the handler's fragment.
///
/// Raw HTML from the source is demoted to text unless `allow_html` is set.
fn intercept_fences<'a>(
    parser: Parser<'a>,
    handler: &dyn FenceHandler,
    allow_html: bool,
) -> Result<Vec<Event<'a>>, RenderError> {
    let mut events = Vec::new();
    let mut pending: Option<PendingFence> = None;

    for event in parser {
        if let Some(fence) = pending.as_mut() {
            match event {
                Event::Text(text) => fence.content.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let html = handler.render_fence(&fence.as_block())?;
                    events.push(Event::Html(html.into()));
                    pending = None;
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(params))) => {
                pending = Some(PendingFence {
                    params: params.into_string(),
                    content: String::new(),
                });
            }
            Event::Html(html) | Event::InlineHtml(html) if !allow_html => {
                events.push(Event::Text(html));
            }
            other => events.push(other),
        }
    }

    Ok(events)
}
