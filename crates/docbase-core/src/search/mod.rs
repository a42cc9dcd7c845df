//! Client-side search over documentation sections.
//!
//! The engine is a linear substring scan over a per-build index:
//!
//! 1. [`SearchIndex::build`] renders each section, flattens the display
//!    tree to plain text, collapses whitespace, and lower-cases it.
//! 2. [`SearchIndex::query`] keeps every entry whose title or flattened
//!    content contains the lower-cased query, in index order.
//! 3. Each hit carries a snippet of the flattened content, cut to
//!    [`SearchOptions::snippet_chars`] characters.
//!
//! There is no scoring: result order is section display order. The
//! [`surface`] module wraps an index in the interactive command palette.

mod index;
mod query;
pub mod surface;

pub use index::{flatten_content, SearchIndex, SearchIndexEntry, Searchable};
pub use query::{SearchOptions, SearchOutcome, SearchResult, SnippetMode};
