use serde::{Deserialize, Serialize};

use super::index::{fold, SearchIndex, SearchIndexEntry};

/// Marker appended (or prepended) when a snippet is cut.
pub const ELLIPSIS: &str = "...";

/// Where a snippet window starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetMode {
    /// First N characters of the content, wherever the match is.
    #[default]
    Leading,
    /// Window around the first content match; leading when only the
    /// title matched.
    AroundMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub snippet_chars: usize,
    pub snippet_mode: SnippetMode,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            snippet_chars: 100,
            snippet_mode: SnippetMode::Leading,
        }
    }
}

/// A single hit. Produced per query, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub snippet: String,
    pub url: String,
}

/// Query result that keeps "nothing typed" apart from "nothing found".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    NoQuery,
    NoMatches,
    Matches(Vec<SearchResult>),
}

impl SearchOutcome {
    pub fn results(&self) -> &[SearchResult] {
        match self {
            SearchOutcome::Matches(results) => results,
            SearchOutcome::NoQuery | SearchOutcome::NoMatches => &[],
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SearchOutcome::NoQuery => "no_query",
            SearchOutcome::NoMatches => "no_matches",
            SearchOutcome::Matches(_) => "matches",
        }
    }
}

impl SearchIndex {
    /// Return every entry whose title or content contains `text`
    /// (case-insensitive, whitespace runs treated as one space), in index
    /// order. Blank queries return nothing.
    pub fn query(&self, text: &str) -> Vec<SearchResult> {
        let needle = fold(text);
        if needle.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter_map(|entry| {
                let content_hit = entry.content_lower.find(&needle);
                if content_hit.is_none() && !entry.title_lower.contains(&needle) {
                    return None;
                }
                Some(SearchResult {
                    id: entry.id.clone(),
                    title: entry.title.clone(),
                    snippet: self.snippet(entry, content_hit),
                    url: entry.url.clone(),
                })
            })
            .collect()
    }

    pub fn outcome(&self, text: &str) -> SearchOutcome {
        if text.trim().is_empty() {
            return SearchOutcome::NoQuery;
        }
        let results = self.query(text);
        if results.is_empty() {
            SearchOutcome::NoMatches
        } else {
            SearchOutcome::Matches(results)
        }
    }

    fn snippet(&self, entry: &SearchIndexEntry, content_hit: Option<usize>) -> String {
        let width = self.options.snippet_chars;
        let total = entry.content.chars().count();

        let start = match (self.options.snippet_mode, content_hit) {
            (SnippetMode::AroundMatch, Some(byte_pos)) => {
                let match_char = original_char_offset(&entry.content, byte_pos);
                let lead = width / 4;
                match_char
                    .saturating_sub(lead)
                    .min(total.saturating_sub(width))
            }
            _ => 0,
        };

        let window: String = entry.content.chars().skip(start).take(width).collect();
        let mut snippet = String::with_capacity(window.len() + 2 * ELLIPSIS.len());
        if start > 0 {
            snippet.push_str(ELLIPSIS);
        }
        snippet.push_str(&window);
        if start + width < total {
            snippet.push_str(ELLIPSIS);
        }
        snippet
    }
}

/// Map a byte offset in the lower-cased copy of `content` back to a char
/// offset in `content`. Some code points lower-case to several chars
/// (`İ` becomes `i̇`), so the two strings do not line up char for char.
fn original_char_offset(content: &str, lower_byte: usize) -> usize {
    let mut seen = 0;
    for (position, c) in content.chars().enumerate() {
        if seen >= lower_byte {
            return position;
        }
        seen += c.to_lowercase().map(char::len_utf8).sum::<usize>();
    }
    content.chars().count()
}
