//! Interactive search surface (the command palette).
//!
//! A [`SearchSurface`] owns a private [`SearchIndex`] and the state of one
//! palette instance: open or closed, the current query, the latest
//! outcome, and the highlighted result.
//!
//! - Cmd+K (macOS) or Ctrl+K (elsewhere) opens it from anywhere and
//!   focuses the input. Pressing it while open keeps it open.
//! - Every query change re-runs the search synchronously.
//! - Escape or selecting a result closes it. Closing always clears the
//!   query, so reopening starts from an empty input.
//! - The index is rebuilt only when [`SearchSurface::set_sections`] is
//!   given a list with a different identity (`Arc` pointer), never by
//!   comparing contents.

use std::sync::Arc;

use crate::models::DocumentationSection;

use super::index::SearchIndex;
use super::query::{SearchOptions, SearchOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Other
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            key: Key::Char(c),
            modifiers: Modifiers {
                ctrl: true,
                ..Modifiers::default()
            },
        }
    }

    pub fn meta(c: char) -> Self {
        Self {
            key: Key::Char(c),
            modifiers: Modifiers {
                meta: true,
                ..Modifiers::default()
            },
        }
    }
}

/// What the host should do after a key press or selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Opened,
    Closed,
    /// Scroll to this fragment (`#<id>`); the surface is now closed.
    Navigate(String),
    Ignored,
}

pub struct SearchSurface {
    platform: Platform,
    options: SearchOptions,
    sections: Option<Arc<[DocumentationSection]>>,
    index: SearchIndex,
    open: bool,
    input_focused: bool,
    query: String,
    outcome: SearchOutcome,
    highlighted: usize,
}

impl SearchSurface {
    pub fn new(platform: Platform, options: SearchOptions) -> Self {
        Self {
            platform,
            index: SearchIndex::build_with_options::<DocumentationSection>(&[], options.clone()),
            options,
            sections: None,
            open: false,
            input_focused: false,
            query: String::new(),
            outcome: SearchOutcome::NoQuery,
            highlighted: 0,
        }
    }

    /// Hand the surface the current section list.
    ///
    /// Returns `true` if the index was rebuilt. The current query, if
    /// any, is re-run against the new index.
    pub fn set_sections(&mut self, sections: Arc<[DocumentationSection]>) -> bool {
        if let Some(current) = &self.sections {
            if Arc::ptr_eq(current, &sections) {
                return false;
            }
        }
        self.index = SearchIndex::build_with_options(&sections[..], self.options.clone());
        self.sections = Some(sections);
        if !self.query.is_empty() {
            self.rerun();
        }
        true
    }

    fn is_trigger(&self, chord: &KeyChord) -> bool {
        let modifier = match self.platform {
            Platform::MacOs => chord.modifiers.meta,
            Platform::Other => chord.modifiers.ctrl,
        };
        modifier && matches!(chord.key, Key::Char('k') | Key::Char('K'))
    }

    pub fn handle_key(&mut self, chord: KeyChord) -> SurfaceEvent {
        if self.is_trigger(&chord) {
            self.open = true;
            self.input_focused = true;
            return SurfaceEvent::Opened;
        }
        if !self.open {
            return SurfaceEvent::Ignored;
        }

        match chord.key {
            Key::Escape => {
                self.close();
                SurfaceEvent::Closed
            }
            Key::Down => {
                let len = self.outcome.results().len();
                if len > 0 {
                    self.highlighted = (self.highlighted + 1).min(len - 1);
                }
                SurfaceEvent::Ignored
            }
            Key::Up => {
                self.highlighted = self.highlighted.saturating_sub(1);
                SurfaceEvent::Ignored
            }
            Key::Enter => match self.select(self.highlighted) {
                Some(url) => SurfaceEvent::Navigate(url),
                None => SurfaceEvent::Ignored,
            },
            Key::Char(_) => SurfaceEvent::Ignored,
        }
    }

    /// Replace the query text and re-run the search.
    pub fn set_query(&mut self, text: &str) -> &SearchOutcome {
        self.query = text.to_string();
        self.rerun();
        &self.outcome
    }

    fn rerun(&mut self) {
        self.outcome = self.index.outcome(&self.query);
        self.highlighted = 0;
    }

    /// Select the `position`-th result: returns its fragment target and
    /// closes the surface. `None` if there is no such result.
    pub fn select(&mut self, position: usize) -> Option<String> {
        let url = self.outcome.results().get(position)?.url.clone();
        self.close();
        Some(url)
    }

    pub fn close(&mut self) {
        self.open = false;
        self.input_focused = false;
        self.query.clear();
        self.outcome = SearchOutcome::NoQuery;
        self.highlighted = 0;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectionIcon;
    use chrono::Utc;
    use serde_json::json;

    fn section(id: &str, title: &str, content: &str) -> DocumentationSection {
        DocumentationSection {
            id: id.to_string(),
            title: title.to_string(),
            icon: SectionIcon::Book,
            slug: id.to_string(),
            order_index: 0,
            content: json!(content),
            last_updated_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sections() -> Arc<[DocumentationSection]> {
        Arc::from(vec![
            section("a", "Getting Started", "Install the SDK"),
            section("b", "FAQ", "Billing questions"),
            section("c", "Installation on Linux", "apt packages"),
        ])
    }

    fn surface() -> SearchSurface {
        let mut s = SearchSurface::new(Platform::Other, SearchOptions::default());
        s.set_sections(sections());
        s
    }

    #[test]
    fn test_ctrl_k_opens_and_focuses() {
        let mut s = surface();
        assert!(!s.is_open());
        assert_eq!(s.handle_key(KeyChord::ctrl('k')), SurfaceEvent::Opened);
        assert!(s.is_open());
        assert!(s.input_focused());
    }

    #[test]
    fn test_platform_modifier() {
        let mut mac = SearchSurface::new(Platform::MacOs, SearchOptions::default());
        assert_eq!(mac.handle_key(KeyChord::ctrl('k')), SurfaceEvent::Ignored);
        assert_eq!(mac.handle_key(KeyChord::meta('k')), SurfaceEvent::Opened);

        let mut other = SearchSurface::new(Platform::Other, SearchOptions::default());
        assert_eq!(other.handle_key(KeyChord::meta('k')), SurfaceEvent::Ignored);
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut s = surface();
        assert_eq!(s.handle_key(KeyChord::plain(Key::Escape)), SurfaceEvent::Ignored);
        assert_eq!(s.handle_key(KeyChord::plain(Key::Enter)), SurfaceEvent::Ignored);
    }

    #[test]
    fn test_query_reruns_on_every_change() {
        let mut s = surface();
        s.handle_key(KeyChord::ctrl('k'));
        assert_eq!(s.set_query("i").results().len(), 3);
        assert_eq!(s.set_query("ins").results().len(), 2);
        assert_eq!(s.set_query("insz"), &SearchOutcome::NoMatches);
        assert_eq!(s.set_query(""), &SearchOutcome::NoQuery);
    }

    #[test]
    fn test_close_resets_query() {
        let mut s = surface();
        s.handle_key(KeyChord::ctrl('k'));
        s.set_query("billing");
        assert_eq!(s.handle_key(KeyChord::plain(Key::Escape)), SurfaceEvent::Closed);
        s.handle_key(KeyChord::ctrl('k'));
        assert_eq!(s.query(), "");
        assert_eq!(s.outcome(), &SearchOutcome::NoQuery);
    }

    #[test]
    fn test_select_navigates_and_closes() {
        let mut s = surface();
        s.handle_key(KeyChord::ctrl('k'));
        s.set_query("install");
        assert_eq!(s.select(1), Some("#c".to_string()));
        assert!(!s.is_open());
        assert_eq!(s.select(0), None);
    }

    #[test]
    fn test_enter_selects_highlighted() {
        let mut s = surface();
        s.handle_key(KeyChord::ctrl('k'));
        s.set_query("install");
        s.handle_key(KeyChord::plain(Key::Down));
        s.handle_key(KeyChord::plain(Key::Down));
        assert_eq!(s.highlighted(), 1);
        assert_eq!(
            s.handle_key(KeyChord::plain(Key::Enter)),
            SurfaceEvent::Navigate("#c".to_string())
        );
    }

    #[test]
    fn test_rebuild_only_on_new_identity() {
        let list = sections();
        let mut s = SearchSurface::new(Platform::Other, SearchOptions::default());
        assert!(s.set_sections(list.clone()));
        assert!(!s.set_sections(list.clone()));
        // Same contents, new allocation: rebuilt.
        let copy: Arc<[DocumentationSection]> = Arc::from(list.to_vec());
        assert!(s.set_sections(copy));
    }

    #[test]
    fn test_new_sections_rerun_open_query() {
        let mut s = surface();
        s.handle_key(KeyChord::ctrl('k'));
        s.set_query("rotation");
        assert_eq!(s.outcome(), &SearchOutcome::NoMatches);
        let updated: Arc<[DocumentationSection]> =
            Arc::from(vec![section("k", "Key rotation", "Rotate keys monthly")]);
        s.set_sections(updated);
        assert_eq!(s.outcome().results()[0].id, "k");
    }
}
