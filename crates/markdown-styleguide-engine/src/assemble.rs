//! Wraps a code example's run view and source view in one HTML fragment.

use std::fmt;

use crate::fence::FenceOptions;

const CONTAINER_CLASS: &str = "example";
const COMPILED_CONTAINER_CLASS: &str = "example exampleViewCode";

/// The two views of one fenced example.
///
/// `source_markup` is `None` for compiled examples, which render the run
/// view only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlockHtml {
    run_markup: String,
    source_markup: Option<String>,
    css_class: Option<String>,
}

impl CodeBlockHtml {
    /// `run_markup` is inserted verbatim; `encoded_source` should already be
    /// highlighted and literal-encoded.
    pub fn new(
        run_markup: impl Into<String>,
        encoded_source: impl Into<String>,
        css_class: Option<&str>,
        options: &FenceOptions,
    ) -> Self {
        Self {
            run_markup: run_markup.into(),
            source_markup: (!options.is_compiled()).then(|| encoded_source.into()),
            css_class: css_class.filter(|c| !c.is_empty()).map(str::to_string),
        }
    }

    pub fn run_markup(&self) -> &str {
        &self.run_markup
    }

    pub fn source_markup(&self) -> Option<&str> {
        self.source_markup.as_deref()
    }

    pub fn is_compiled(&self) -> bool {
        self.source_markup.is_none()
    }
}

impl fmt::Display for CodeBlockHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let container = if self.is_compiled() {
            COMPILED_CONTAINER_CLASS
        } else {
            CONTAINER_CLASS
        };
        write!(
            f,
            "\n<div class=\"{container}\">\n  <div class=\"run\">{}</div>",
            self.run_markup
        )?;

        if let Some(source) = &self.source_markup {
            let class_attr = self
                .css_class
                .as_ref()
                .map(|class| format!(" class=\"{class}\""))
                .unwrap_or_default();
            write!(
                f,
                "<div class=\"source\">\n    <pre{class_attr}><code{class_attr}>\n      {source}\n    </code></pre>\n  </div>"
            )?;
        }

        f.write_str("\n</div>")
    }
}

/// Assemble the dual-view fragment for one example.
pub fn assemble(
    run_markup: &str,
    encoded_source: &str,
    css_class: Option<&str>,
    options: &FenceOptions,
) -> String {
    CodeBlockHtml::new(run_markup, encoded_source, css_class, options).to_string()
}
