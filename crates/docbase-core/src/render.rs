//! Content renderer: content tree → display tree.
//!
//! [`render`] is a pure, total function. Identical input always yields an
//! identical [`DisplayNode`], so the same output backs on-screen rendering
//! ([`crate::html`]) and search flattening ([`DisplayNode::to_plain_text`]).
//!
//! # Rules
//!
//! 1. Text is returned verbatim.
//! 2. Arrays render each element in order into a [`DisplayNode::Fragment`],
//!    with no separators.
//! 3. Known blocks map to their display container. Heading levels outside
//!    1–4 render at [`HeadingLevel::SMALLEST`]. Code is never recursed.
//! 4. Everything else becomes a [`DisplayNode::Fallback`] holding the
//!    JSON text of the raw value, and a [`Diagnostic`] is recorded.
//!
//! Diagnostics are returned, not logged, so rendering stays side-effect
//! free. Callers decide whether to surface them.

use serde::Serialize;

use crate::content::{CalloutStyle, ContentNode, ListStyle, UnrecognizedReason};

/// Heading size in the display tree. Always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Size used for any stored level outside `1..=4`.
    pub const SMALLEST: HeadingLevel = HeadingLevel(5);

    pub fn from_raw(raw: Option<i64>) -> Self {
        match raw {
            Some(level @ 1..=4) => HeadingLevel(level as u8),
            _ => Self::SMALLEST,
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

/// A presentation-ready node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayNode {
    Text {
        text: String,
    },
    Fragment {
        children: Vec<DisplayNode>,
    },
    Paragraph {
        content: Box<DisplayNode>,
    },
    Heading {
        level: HeadingLevel,
        content: Box<DisplayNode>,
    },
    Preformatted {
        text: String,
    },
    List {
        ordered: bool,
        items: Vec<DisplayNode>,
    },
    Link {
        href: String,
        label: Box<DisplayNode>,
    },
    Callout {
        category: CalloutStyle,
        title: Option<String>,
        body: Box<DisplayNode>,
    },
    /// Literal dump of content that could not be rendered as a block.
    Fallback {
        text: String,
    },
}

/// Non-fatal "unrecognized content" report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Location in the content tree, e.g. `$[2].items[0]`.
    pub path: String,
    pub message: String,
}

/// Display tree plus every diagnostic raised while building it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    pub display: DisplayNode,
    pub diagnostics: Vec<Diagnostic>,
}

/// Render a content tree, discarding diagnostics.
pub fn render(node: &ContentNode) -> DisplayNode {
    render_with_diagnostics(node).display
}

/// Render a content tree and collect diagnostics for unrecognized nodes.
pub fn render_with_diagnostics(node: &ContentNode) -> RenderOutput {
    let mut walker = Walker::default();
    let display = walker.node(node, "$");
    RenderOutput {
        display,
        diagnostics: walker.diagnostics,
    }
}

#[derive(Default)]
struct Walker {
    diagnostics: Vec<Diagnostic>,
}

impl Walker {
    fn node(&mut self, node: &ContentNode, path: &str) -> DisplayNode {
        match node {
            ContentNode::Text(text) => DisplayNode::Text { text: text.clone() },
            ContentNode::Array(items) => DisplayNode::Fragment {
                children: self.items(items, path),
            },
            ContentNode::Paragraph(content) => DisplayNode::Paragraph {
                content: self.child(content, path, "content"),
            },
            ContentNode::Heading { level, content } => DisplayNode::Heading {
                level: HeadingLevel::from_raw(*level),
                content: self.child(content, path, "content"),
            },
            ContentNode::Code(code) => DisplayNode::Preformatted { text: code.clone() },
            ContentNode::List { style, items } => DisplayNode::List {
                ordered: *style == ListStyle::Ordered,
                items: self.items(items, &format!("{}.items", path)),
            },
            ContentNode::Link { href, content } => DisplayNode::Link {
                href: href.clone(),
                label: self.child(content, path, "content"),
            },
            ContentNode::Callout {
                style,
                title,
                content,
            } => DisplayNode::Callout {
                category: *style,
                title: title.clone(),
                body: self.child(content, path, "content"),
            },
            ContentNode::Unrecognized { raw, reason } => self.fallback(raw, reason, path),
        }
    }

    fn child(&mut self, node: &ContentNode, path: &str, field: &str) -> Box<DisplayNode> {
        Box::new(self.node(node, &format!("{}.{}", path, field)))
    }

    fn items(&mut self, items: &[ContentNode], path: &str) -> Vec<DisplayNode> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.node(item, &format!("{}[{}]", path, i)))
            .collect()
    }

    fn fallback(
        &mut self,
        raw: &serde_json::Value,
        reason: &UnrecognizedReason,
        path: &str,
    ) -> DisplayNode {
        self.diagnostics.push(Diagnostic {
            path: path.to_string(),
            message: format!("unrecognized content: {}", reason),
        });
        DisplayNode::Fallback {
            text: raw.to_string(),
        }
    }
}

impl DisplayNode {
    pub fn text(text: impl Into<String>) -> Self {
        DisplayNode::Text { text: text.into() }
    }

    /// Flatten to plain text.
    ///
    /// Inline nodes are concatenated as-is; block nodes (paragraphs,
    /// headings, code, list items, callout parts) start on their own line.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain(&mut out);
        out.trim().to_string()
    }

    fn write_plain(&self, out: &mut String) {
        match self {
            DisplayNode::Text { text } | DisplayNode::Fallback { text } => out.push_str(text),
            DisplayNode::Fragment { children } => {
                for child in children {
                    child.write_plain(out);
                }
            }
            DisplayNode::Paragraph { content } | DisplayNode::Heading { content, .. } => {
                block(out, |out| content.write_plain(out));
            }
            DisplayNode::Preformatted { text } => block(out, |out| out.push_str(text)),
            DisplayNode::List { items, .. } => {
                for item in items {
                    block(out, |out| item.write_plain(out));
                }
            }
            DisplayNode::Link { label, .. } => label.write_plain(out),
            DisplayNode::Callout { title, body, .. } => {
                if let Some(title) = title {
                    block(out, |out| out.push_str(title));
                }
                block(out, |out| body.write_plain(out));
            }
        }
    }
}

fn block(out: &mut String, write: impl FnOnce(&mut String)) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    write(out);
    out.push('\n');
}
