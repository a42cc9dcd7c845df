//! Repository abstraction for Docbase.
//!
//! The [`SectionRepository`] trait is the boundary to whatever persists
//! sections, code examples, and feedback. The engine never talks to a
//! database directly; SQLite, in-memory, or remote stores plug in here.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.
//!
//! # Contract
//!
//! | Method | Semantics |
//! |--------|-----------|
//! | [`list_sections`](SectionRepository::list_sections) | All sections, `order_index` ascending, ties in insertion order |
//! | [`get_section`](SectionRepository::get_section) | One section by id |
//! | [`create_section`](SectionRepository::create_section) | Assigns id and timestamps |
//! | [`update_section`](SectionRepository::update_section) | Full replace of every field in [`NewSection`] |
//! | [`delete_section`](SectionRepository::delete_section) | Irreversible; drops its examples and feedback |
//! | [`list_code_examples`](SectionRepository::list_code_examples) | Examples for a section, `order_index` ascending |
//! | [`add_code_example`](SectionRepository::add_code_example) | Attach an example to a section |
//! | [`submit_feedback`](SectionRepository::submit_feedback) | Record a helpful / not helpful vote |
//!
//! Content is always returned as a parsed [`serde_json::Value`].

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CodeExample, DocumentationSection, Feedback, NewCodeExample, NewSection};

/// Failures a caller may want to branch on.
///
/// Repositories return them inside [`anyhow::Error`]; recover the kind
/// with `err.downcast_ref::<StoreError>()`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("section not found: {0}")]
    SectionNotFound(String),
    #[error("slug already in use: {0}")]
    DuplicateSlug(String),
}

#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn list_sections(&self) -> Result<Vec<DocumentationSection>>;

    async fn get_section(&self, id: &str) -> Result<Option<DocumentationSection>>;

    async fn create_section(&self, section: NewSection) -> Result<DocumentationSection>;

    /// Replace every field of an existing section.
    ///
    /// Fails with [`StoreError::SectionNotFound`] if `id` does not exist.
    async fn update_section(&self, id: &str, section: NewSection) -> Result<()>;

    /// Fails with [`StoreError::SectionNotFound`] if `id` does not exist.
    async fn delete_section(&self, id: &str) -> Result<()>;

    async fn list_code_examples(&self, section_id: &str) -> Result<Vec<CodeExample>>;

    async fn add_code_example(&self, example: NewCodeExample) -> Result<CodeExample>;

    async fn submit_feedback(
        &self,
        section_id: &str,
        helpful: bool,
        message: &str,
        user_id: Option<&str>,
    ) -> Result<Feedback>;
}
