//! Heading `id` attributes for anchor links.

use pulldown_cmark::{Event, HeadingLevel, Tag, TagEnd};

use crate::slug::to_slug;

/// Replace each heading with HTML carrying an `id` slugged from its text.
pub(crate) fn with_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut heading: Option<(HeadingLevel, Vec<Event<'_>>)> = None;

    for event in events {
        match event {
            Event::Start(Tag::Heading { level, .. }) => heading = Some((level, Vec::new())),
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, inner)) = heading.take() {
                    out.push(Event::Html(render_heading(level, inner).into()));
                }
            }
            other => match heading.as_mut() {
                Some((_, inner)) => inner.push(other),
                None => out.push(other),
            },
        }
    }

    out
}

fn render_heading(level: HeadingLevel, inner: Vec<Event<'_>>) -> String {
    let level = level as usize;
    let id = to_slug(&heading_text(&inner));

    let mut html = format!("<h{level} id=\"{id}\">");
    pulldown_cmark::html::push_html(&mut html, inner.into_iter());
    html.push_str(&format!("</h{level}>\n"));
    html
}

fn heading_text(events: &[Event<'_>]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Text(text) | Event::Code(text) => Some(&**text),
            _ => None,
        })
        .collect()
}
