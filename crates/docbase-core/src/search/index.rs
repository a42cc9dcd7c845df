use serde::Serialize;
use serde_json::Value;

use crate::content::ContentNode;
use crate::models::DocumentationSection;
use crate::render::render;

use super::query::SearchOptions;

/// Anything the indexer can read: an id, a title, and a content tree.
pub trait Searchable {
    fn search_id(&self) -> &str;
    fn search_title(&self) -> &str;
    fn search_content(&self) -> &Value;
}

impl Searchable for DocumentationSection {
    fn search_id(&self) -> &str {
        &self.id
    }

    fn search_title(&self) -> &str {
        &self.title
    }

    fn search_content(&self) -> &Value {
        &self.content
    }
}

/// One searchable section. Derived data; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchIndexEntry {
    pub id: String,
    pub title: String,
    /// Flattened content with original casing, used for snippets.
    pub content: String,
    /// Lower-cased flattened content, used for matching.
    pub content_lower: String,
    /// Fragment reference, `#<id>`.
    pub url: String,
    #[serde(skip)]
    pub(crate) title_lower: String,
}

/// Flat, in-order index over a section list.
///
/// Built wholesale from a snapshot; there is no incremental update.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    pub(crate) entries: Vec<SearchIndexEntry>,
    pub(crate) options: SearchOptions,
}

impl SearchIndex {
    /// Build an index with default [`SearchOptions`].
    pub fn build<S: Searchable>(sections: &[S]) -> Self {
        Self::build_with_options(sections, SearchOptions::default())
    }

    pub fn build_with_options<S: Searchable>(sections: &[S], options: SearchOptions) -> Self {
        let entries = sections
            .iter()
            .map(|section| {
                let content = flatten_content(section.search_content());
                let id = section.search_id().to_string();
                SearchIndexEntry {
                    url: format!("#{}", id),
                    id,
                    title: section.search_title().to_string(),
                    title_lower: fold(section.search_title()),
                    content_lower: content.to_lowercase(),
                    content,
                }
            })
            .collect();

        Self { entries, options }
    }

    pub fn entries(&self) -> &[SearchIndexEntry] {
        &self.entries
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render a raw content tree and collapse it to single-spaced plain text.
pub fn flatten_content(content: &Value) -> String {
    let plain = render(&ContentNode::from_value(content)).to_plain_text();
    collapse_whitespace(&plain)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Matching form of titles and queries: single-spaced and lower-cased,
/// the same shape as `content_lower`.
pub(crate) fn fold(text: &str) -> String {
    collapse_whitespace(text).to_lowercase()
}
