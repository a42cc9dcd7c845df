//! HTML output for display trees.
//!
//! Text and attribute values are escaped with `html-escape`; the `href`
//! of a link is emitted verbatim apart from attribute escaping (no URL
//! validation happens here).

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::render::DisplayNode;

/// Serialize a display tree to an HTML fragment.
pub fn to_html(node: &DisplayNode) -> String {
    let mut out = String::new();
    write_html(node, &mut out);
    out
}

fn write_html(node: &DisplayNode, out: &mut String) {
    match node {
        DisplayNode::Text { text } => out.push_str(&encode_text(text)),
        DisplayNode::Fragment { children } => {
            for child in children {
                write_html(child, out);
            }
        }
        DisplayNode::Paragraph { content } => wrap(out, "<p>", "</p>", content),
        DisplayNode::Heading { level, content } => {
            let n = level.get();
            out.push_str(&format!("<h{}>", n));
            write_html(content, out);
            out.push_str(&format!("</h{}>", n));
        }
        DisplayNode::Preformatted { text } => {
            out.push_str("<pre><code>");
            out.push_str(&encode_text(text));
            out.push_str("</code></pre>");
        }
        DisplayNode::List { ordered, items } => {
            let tag = if *ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{}>", tag));
            for item in items {
                wrap(out, "<li>", "</li>", item);
            }
            out.push_str(&format!("</{}>", tag));
        }
        DisplayNode::Link { href, label } => {
            out.push_str("<a href=\"");
            out.push_str(&encode_double_quoted_attribute(href));
            out.push_str("\">");
            write_html(label, out);
            out.push_str("</a>");
        }
        DisplayNode::Callout {
            category,
            title,
            body,
        } => {
            out.push_str(&format!(
                "<div class=\"callout callout-{}\">",
                category.as_str()
            ));
            if let Some(title) = title {
                out.push_str("<h5 class=\"callout-title\">");
                out.push_str(&encode_text(title));
                out.push_str("</h5>");
            }
            wrap(out, "<div class=\"callout-body\">", "</div>", body);
            out.push_str("</div>");
        }
        DisplayNode::Fallback { text } => {
            out.push_str("<pre class=\"unrecognized\">");
            out.push_str(&encode_text(text));
            out.push_str("</pre>");
        }
    }
}

fn wrap(out: &mut String, open: &str, close: &str, inner: &DisplayNode) {
    out.push_str(open);
    write_html(inner, out);
    out.push_str(close);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentNode;
    use crate::render::render;
    use serde_json::json;

    fn html_of(value: serde_json::Value) -> String {
        to_html(&render(&ContentNode::from_value(&value)))
    }

    #[test]
    fn test_paragraph_and_heading() {
        assert_eq!(
            html_of(json!([
                {"type": "heading", "level": 2, "content": "Install"},
                {"type": "paragraph", "content": "Run it."}
            ])),
            "<h2>Install</h2><p>Run it.</p>"
        );
    }

    #[test]
    fn test_heading_fallback_is_h5() {
        assert_eq!(
            html_of(json!({"type": "heading", "level": 7, "content": "Deep"})),
            "<h5>Deep</h5>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        assert_eq!(
            html_of(json!({"type": "paragraph", "content": "<script>alert(1)</script>"})),
            "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"
        );
    }

    #[test]
    fn test_link_href_attribute_escaped() {
        assert_eq!(
            html_of(json!({"type": "link", "href": "/a?x=\"1\"", "content": "go"})),
            "<a href=\"/a?x=&quot;1&quot;\">go</a>"
        );
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            html_of(json!({"type": "list", "style": "ordered", "items": ["a", "b"]})),
            "<ol><li>a</li><li>b</li></ol>"
        );
        assert_eq!(
            html_of(json!({"type": "list", "items": ["a"]})),
            "<ul><li>a</li></ul>"
        );
    }

    #[test]
    fn test_callout_with_title() {
        assert_eq!(
            html_of(json!({"type": "callout", "style": "warning", "title": "Heads up", "content": "body"})),
            "<div class=\"callout callout-warning\"><h5 class=\"callout-title\">Heads up</h5><div class=\"callout-body\">body</div></div>"
        );
    }

    #[test]
    fn test_callout_without_title_has_no_heading() {
        let html = html_of(json!({"type": "callout", "style": "mystery", "content": "body"}));
        assert_eq!(
            html,
            "<div class=\"callout callout-default\"><div class=\"callout-body\">body</div></div>"
        );
        assert!(!html.contains("<h5"));
    }

    #[test]
    fn test_fallback_rendered_as_pre() {
        let html = html_of(json!({"type": "bogus"}));
        assert!(html.starts_with("<pre class=\"unrecognized\">"));
        assert!(html.contains("bogus"));
    }
}
