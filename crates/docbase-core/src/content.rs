//! The documentation content model.
//!
//! Section content is stored as plain JSON. [`ContentNode::from_value`]
//! lifts any JSON value into a closed set of variants; shapes that do not
//! fit a known block land in [`ContentNode::Unrecognized`] instead of
//! failing, so the renderer can degrade them to a textual dump.
//!
//! ```text
//! "plain text"                                   → Text
//! [ ... ]                                        → Array
//! { "type": "paragraph", "content": ... }        → Paragraph
//! { "type": "heading", "level": 2, "content": ...} → Heading
//! { "type": "code", "content": "..." }           → Code
//! { "type": "list", "style": "ordered", "items": [...] } → List
//! { "type": "link", "href": "...", "content": ... } → Link
//! { "type": "callout", "style": "warning", "title": "...", "content": ... } → Callout
//! anything else                                  → Unrecognized
//! ```

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

/// Ordered or unordered list container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    Ordered,
    Unordered,
}

impl ListStyle {
    /// Only the exact string `"ordered"` selects [`ListStyle::Ordered`].
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("ordered") => ListStyle::Ordered,
            _ => ListStyle::Unordered,
        }
    }
}

/// Visual category of a callout box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutStyle {
    Info,
    Warning,
    Error,
    Success,
    /// Any style string outside the four known ones, or none at all.
    Default,
}

impl CalloutStyle {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("info") => CalloutStyle::Info,
            Some("warning") => CalloutStyle::Warning,
            Some("error") => CalloutStyle::Error,
            Some("success") => CalloutStyle::Success,
            _ => CalloutStyle::Default,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CalloutStyle::Info => "info",
            CalloutStyle::Warning => "warning",
            CalloutStyle::Error => "error",
            CalloutStyle::Success => "success",
            CalloutStyle::Default => "default",
        }
    }
}

/// Why a value could not be read as a known block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnrecognizedReason {
    /// Object with a `type` outside the known set.
    UnknownType(String),
    /// Object without a string `type` field.
    MissingType,
    /// Known `type` whose required field is absent or has the wrong shape.
    MalformedField {
        kind: &'static str,
        field: &'static str,
    },
    /// Number, boolean, or null.
    Scalar,
}

impl fmt::Display for UnrecognizedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnrecognizedReason::UnknownType(t) => write!(f, "unknown block type '{}'", t),
            UnrecognizedReason::MissingType => write!(f, "object has no 'type' field"),
            UnrecognizedReason::MalformedField { kind, field } => {
                write!(f, "'{}' block has a missing or malformed '{}'", kind, field)
            }
            UnrecognizedReason::Scalar => write!(f, "non-text scalar value"),
        }
    }
}

/// One node of a documentation content tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Text(String),
    Array(Vec<ContentNode>),
    Paragraph(Box<ContentNode>),
    Heading {
        /// Raw level as stored; `None` when absent or not an integer.
        level: Option<i64>,
        content: Box<ContentNode>,
    },
    /// Verbatim code. Never parsed as nested content.
    Code(String),
    List {
        style: ListStyle,
        items: Vec<ContentNode>,
    },
    Link {
        href: String,
        content: Box<ContentNode>,
    },
    Callout {
        style: CalloutStyle,
        title: Option<String>,
        content: Box<ContentNode>,
    },
    Unrecognized {
        raw: Value,
        reason: UnrecognizedReason,
    },
}

impl ContentNode {
    /// Read a JSON value as a content tree. Never fails.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => ContentNode::Text(s.clone()),
            Value::Array(items) => ContentNode::Array(items.iter().map(Self::from_value).collect()),
            Value::Object(map) => Self::from_object(value, map),
            Value::Number(_) | Value::Bool(_) | Value::Null => ContentNode::Unrecognized {
                raw: value.clone(),
                reason: UnrecognizedReason::Scalar,
            },
        }
    }

    fn from_object(raw: &Value, map: &Map<String, Value>) -> Self {
        let kind = match map.get("type").and_then(Value::as_str) {
            Some(kind) => kind,
            None => return Self::unrecognized(raw, UnrecognizedReason::MissingType),
        };

        let malformed = |kind: &'static str, field: &'static str| {
            Self::unrecognized(raw, UnrecognizedReason::MalformedField { kind, field })
        };
        let child = |field: &str| map.get(field).map(|v| Box::new(Self::from_value(v)));

        match kind {
            "paragraph" => match child("content") {
                Some(content) => ContentNode::Paragraph(content),
                None => malformed("paragraph", "content"),
            },
            "heading" => match child("content") {
                Some(content) => ContentNode::Heading {
                    level: map.get("level").and_then(Value::as_i64),
                    content,
                },
                None => malformed("heading", "content"),
            },
            "code" => match map.get("content") {
                Some(Value::String(code)) => ContentNode::Code(code.clone()),
                Some(other) => ContentNode::Code(other.to_string()),
                None => malformed("code", "content"),
            },
            "list" => match map.get("items").and_then(Value::as_array) {
                Some(items) => ContentNode::List {
                    style: ListStyle::from_raw(map.get("style").and_then(Value::as_str)),
                    items: items.iter().map(Self::from_value).collect(),
                },
                None => malformed("list", "items"),
            },
            "link" => {
                let href = match map.get("href").and_then(Value::as_str) {
                    Some(href) => href.to_string(),
                    None => return malformed("link", "href"),
                };
                match child("content") {
                    Some(content) => ContentNode::Link { href, content },
                    None => malformed("link", "content"),
                }
            }
            "callout" => match child("content") {
                Some(content) => ContentNode::Callout {
                    style: CalloutStyle::from_raw(map.get("style").and_then(Value::as_str)),
                    title: map.get("title").and_then(Value::as_str).map(str::to_string),
                    content,
                },
                None => malformed("callout", "content"),
            },
            other => Self::unrecognized(raw, UnrecognizedReason::UnknownType(other.to_string())),
        }
    }

    fn unrecognized(raw: &Value, reason: UnrecognizedReason) -> Self {
        ContentNode::Unrecognized {
            raw: raw.clone(),
            reason,
        }
    }
}

impl From<&Value> for ContentNode {
    fn from(value: &Value) -> Self {
        ContentNode::from_value(value)
    }
}
