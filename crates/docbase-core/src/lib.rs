//! # Docbase Core
//!
//! Pure logic for Docbase, a documentation portal: the content model,
//! the renderer, the search index and palette, the admin editor
//! workflow, and the repository trait.
//!
//! This crate has no database, HTTP, or filesystem code. Everything
//! except the editor's save and delete calls is synchronous.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Sections, code examples, feedback, icons |
//! | [`content`] | `ContentNode` tagged union parsed from JSON |
//! | [`render`] | `ContentNode` → display tree with diagnostics |
//! | [`html`] | Display tree → escaped HTML |
//! | [`search`] | Substring index, query engine, and command palette |
//! | [`slug`] | Title → URL slug |
//! | [`editor`] | Validation and the save / delete state machine |
//! | [`auth`] | `Actor` and write permission |
//! | [`store`] | `SectionRepository` trait and in-memory implementation |

pub mod auth;
pub mod content;
pub mod editor;
pub mod html;
pub mod models;
pub mod render;
pub mod search;
pub mod slug;
pub mod store;
