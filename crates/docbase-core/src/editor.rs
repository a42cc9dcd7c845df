//! Admin content editor: validation, JSON round-trip, and write workflow.
//!
//! The editor holds one section's fields as the author edits them. Content
//! is edited as text: parsed content is pretty-printed (2-space indent)
//! on the way in and parsed back on save. The parsed value is forwarded to
//! the repository unchanged.
//!
//! # State machine
//!
//! ```text
//! writes:   Idle ─save─▶ Validating ─ok──▶ Saving ─ok──▶ Idle
//!                            │                 └─err─▶ Error
//!                            └─invalid───────────────▶ Error ─edit/dismiss─▶ Idle
//!
//! deletes:  Idle ─request_delete─▶ ConfirmingDelete ─confirm─▶ Deleting ─▶ Idle | Error
//!                                        └─cancel─▶ Idle
//! ```
//!
//! `Saving` and `Deleting` are held by a drop guard, so they are cleared on
//! every exit path: success, repository failure, or the future being
//! dropped mid-call.
//!
//! Permission is checked before any repository call; a denied actor never
//! reaches the network.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::auth::Actor;
use crate::models::{DocumentationSection, NewSection, SectionIcon};
use crate::slug::{is_valid_slug, slugify};
use crate::store::SectionRepository;

/// Content as handed to the editor: already-edited text, or a parsed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EditableContent {
    Text(String),
    Parsed(Value),
}

impl EditableContent {
    /// Text shown in the editor. Parsed content is pretty-printed.
    pub fn to_editor_text(&self) -> String {
        match self {
            EditableContent::Text(text) => text.clone(),
            EditableContent::Parsed(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

impl From<Value> for EditableContent {
    fn from(value: Value) -> Self {
        EditableContent::Parsed(value)
    }
}

impl From<String> for EditableContent {
    fn from(text: String) -> Self {
        EditableContent::Text(text)
    }
}

impl From<&str> for EditableContent {
    fn from(text: &str) -> Self {
        EditableContent::Text(text.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Icon,
    Slug,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every field-level problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Why the editor is sitting in [`EditorState::Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorFailure {
    Invalid(ValidationErrors),
    Repository(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Validating,
    Saving,
    Error(EditorFailure),
    ConfirmingDelete,
    Deleting,
}

impl EditorState {
    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "idle",
            EditorState::Validating => "validating",
            EditorState::Saving => "saving",
            EditorState::Error(_) => "error",
            EditorState::ConfirmingDelete => "confirming-delete",
            EditorState::Deleting => "deleting",
        }
    }

    fn accepts_edits(&self) -> bool {
        matches!(self, EditorState::Idle | EditorState::Error(_))
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("repository error: {0:#}")]
    Repository(anyhow::Error),
    #[error("cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
    #[error("section has not been saved yet")]
    Unsaved,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(DocumentationSection),
    Updated(String),
}

/// Loosely-typed section payload from an import file or HTTP body.
///
/// `content` is a parsed tree; `content_text` is raw editor text and wins
/// when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub content_text: Option<String>,
}

/// Sets a busy state on entry and writes the settled state on drop.
struct BusyGuard<'a> {
    state: &'a mut EditorState,
    settled: EditorState,
}

impl<'a> BusyGuard<'a> {
    fn enter(state: &'a mut EditorState, busy: EditorState) -> Self {
        *state = busy;
        Self {
            state,
            settled: EditorState::Idle,
        }
    }

    fn settle(&mut self, next: EditorState) {
        self.settled = next;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.state = std::mem::replace(&mut self.settled, EditorState::Idle);
    }
}

pub struct SectionEditor {
    section_id: Option<String>,
    title: String,
    icon_name: String,
    slug: String,
    /// The slug holds an auto-derived value the author has not touched.
    slug_derived: bool,
    order_index: i64,
    content_text: String,
    state: EditorState,
}

impl Default for SectionEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionEditor {
    /// Blank editor for a new section.
    pub fn new() -> Self {
        Self {
            section_id: None,
            title: String::new(),
            icon_name: String::new(),
            slug: String::new(),
            slug_derived: false,
            order_index: 0,
            content_text: EditableContent::Parsed(Value::Array(Vec::new())).to_editor_text(),
            state: EditorState::Idle,
        }
    }

    /// Editor pre-filled from an existing section.
    pub fn edit(section: &DocumentationSection) -> Self {
        Self {
            section_id: Some(section.id.clone()),
            title: section.title.clone(),
            icon_name: section.icon.as_str().to_string(),
            slug: section.slug.clone(),
            slug_derived: false,
            order_index: section.order_index,
            content_text: EditableContent::Parsed(section.content.clone()).to_editor_text(),
            state: EditorState::Idle,
        }
    }

    /// Editor for a new section filled from a loosely-typed draft.
    pub fn from_draft(draft: SectionDraft) -> Self {
        let mut editor = Self::new();
        editor.set_slug(draft.slug.unwrap_or_default());
        editor.set_title(draft.title);
        editor.set_icon_name(draft.icon.unwrap_or_default());
        editor.set_order_index(draft.order_index);
        match (draft.content_text, draft.content) {
            (Some(text), _) => editor.set_content(text),
            (None, Some(value)) => editor.set_content(value),
            (None, None) => {}
        }
        editor
    }

    /// Re-target a draft-filled editor at an existing section (full replace).
    pub fn for_section(mut self, id: impl Into<String>) -> Self {
        self.section_id = Some(id.into());
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        if self.slug.is_empty() || self.slug_derived {
            self.slug = slugify(&self.title);
            self.slug_derived = !self.slug.is_empty();
        }
        self.touch();
    }

    /// Author-entered slug. Stops automatic derivation unless cleared.
    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
        self.slug_derived = false;
        self.touch();
    }

    pub fn set_icon(&mut self, icon: SectionIcon) {
        self.set_icon_name(icon.as_str());
    }

    pub fn set_icon_name(&mut self, name: impl Into<String>) {
        self.icon_name = name.into();
        self.touch();
    }

    pub fn set_order_index(&mut self, order_index: i64) {
        self.order_index = order_index;
        self.touch();
    }

    pub fn set_content(&mut self, content: impl Into<EditableContent>) {
        self.content_text = content.into().to_editor_text();
        self.touch();
    }

    /// Editing clears a previous error.
    fn touch(&mut self) {
        if matches!(self.state, EditorState::Error(_)) {
            self.state = EditorState::Idle;
        }
    }

    pub fn dismiss_error(&mut self) {
        self.touch();
    }

    pub fn section_id(&self) -> Option<&str> {
        self.section_id.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn content_text(&self) -> &str {
        &self.content_text
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    /// Check every field and parse the content text.
    pub fn validate(&self) -> Result<NewSection, ValidationErrors> {
        let mut errors = Vec::new();
        let mut field_error = |field: Field, message: String| {
            errors.push(FieldError { field, message });
        };

        if self.title.trim().is_empty() {
            field_error(Field::Title, "Title is required".to_string());
        }

        let icon = if self.icon_name.trim().is_empty() {
            field_error(Field::Icon, "Icon is required".to_string());
            None
        } else {
            match self.icon_name.parse::<SectionIcon>() {
                Ok(icon) => Some(icon),
                Err(_) => {
                    field_error(Field::Icon, format!("Unknown icon '{}'", self.icon_name));
                    None
                }
            }
        };

        if self.slug.trim().is_empty() {
            field_error(Field::Slug, "Slug is required".to_string());
        } else if !is_valid_slug(&self.slug) {
            field_error(
                Field::Slug,
                "Slug may only contain lowercase letters, digits, and '-'".to_string(),
            );
        }

        let content = match serde_json::from_str::<Value>(&self.content_text) {
            Ok(value) => Some(value),
            Err(e) => {
                field_error(Field::Content, format!("Invalid JSON: {}", e));
                None
            }
        };

        match (icon, content) {
            (Some(icon), Some(content)) if errors.is_empty() => Ok(NewSection {
                title: self.title.clone(),
                icon,
                slug: self.slug.clone(),
                order_index: self.order_index,
                content,
                last_updated_by: None,
            }),
            _ => Err(ValidationErrors { errors }),
        }
    }

    /// Validate and write the section through `repo`.
    ///
    /// Creates when the editor has no section id yet, otherwise performs a
    /// full-replace update.
    pub async fn save<R>(&mut self, repo: &R, actor: &Actor) -> Result<SaveOutcome, EditorError>
    where
        R: SectionRepository + ?Sized,
    {
        if !self.state.accepts_edits() {
            return Err(EditorError::InvalidState {
                action: "save",
                state: self.state.name(),
            });
        }
        if !actor.can_write() {
            return Err(EditorError::PermissionDenied(
                "only admins can edit documentation".to_string(),
            ));
        }

        self.state = EditorState::Validating;
        let mut section = match self.validate() {
            Ok(section) => section,
            Err(errors) => {
                self.state = EditorState::Error(EditorFailure::Invalid(errors.clone()));
                return Err(EditorError::Validation(errors));
            }
        };
        section.last_updated_by = actor.user_id.clone();

        let result = {
            let mut busy = BusyGuard::enter(&mut self.state, EditorState::Saving);
            let result = match &self.section_id {
                None => repo.create_section(section).await.map(SaveOutcome::Created),
                Some(id) => repo
                    .update_section(id, section)
                    .await
                    .map(|()| SaveOutcome::Updated(id.clone())),
            };
            if let Err(e) = &result {
                busy.settle(EditorState::Error(EditorFailure::Repository(format!("{:#}", e))));
            }
            result
        };

        match result {
            Ok(outcome) => {
                if let SaveOutcome::Created(created) = &outcome {
                    self.section_id = Some(created.id.clone());
                }
                self.slug_derived = false;
                Ok(outcome)
            }
            Err(e) => Err(EditorError::Repository(e)),
        }
    }

    /// Ask for delete confirmation. Nothing is deleted yet.
    pub fn request_delete(&mut self) -> Result<(), EditorError> {
        if self.section_id.is_none() {
            return Err(EditorError::Unsaved);
        }
        if !self.state.accepts_edits() {
            return Err(EditorError::InvalidState {
                action: "delete",
                state: self.state.name(),
            });
        }
        self.state = EditorState::ConfirmingDelete;
        Ok(())
    }

    /// Back out of a pending delete. Returns `false` if none was pending.
    pub fn cancel_delete(&mut self) -> bool {
        if self.state == EditorState::ConfirmingDelete {
            self.state = EditorState::Idle;
            true
        } else {
            false
        }
    }

    /// Confirm a pending delete and remove the section. Irreversible.
    ///
    /// On success the editor detaches from the deleted section; saving
    /// again would create a new one.
    pub async fn confirm_delete<R>(&mut self, repo: &R, actor: &Actor) -> Result<(), EditorError>
    where
        R: SectionRepository + ?Sized,
    {
        if self.state != EditorState::ConfirmingDelete {
            return Err(EditorError::InvalidState {
                action: "confirm delete",
                state: self.state.name(),
            });
        }
        if !actor.can_write() {
            self.state = EditorState::Idle;
            return Err(EditorError::PermissionDenied(
                "only admins can delete documentation".to_string(),
            ));
        }
        let id = match self.section_id.clone() {
            Some(id) => id,
            None => {
                self.state = EditorState::Idle;
                return Err(EditorError::Unsaved);
            }
        };

        let result = {
            let mut busy = BusyGuard::enter(&mut self.state, EditorState::Deleting);
            let result = repo.delete_section(&id).await;
            if let Err(e) = &result {
                busy.settle(EditorState::Error(EditorFailure::Repository(format!("{:#}", e))));
            }
            result
        };

        match result {
            Ok(()) => {
                self.section_id = None;
                Ok(())
            }
            Err(e) => Err(EditorError::Repository(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CodeExample, Feedback, NewCodeExample};
    use crate::store::memory::InMemoryRepository;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps the in-memory store, counting writes and optionally failing them.
    #[derive(Default)]
    struct Recording {
        inner: InMemoryRepository,
        writes: AtomicUsize,
        fail_writes: bool,
    }

    impl Recording {
        fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }

        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        fn record(&self) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                bail!("store unavailable");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl SectionRepository for Recording {
        async fn list_sections(&self) -> Result<Vec<DocumentationSection>> {
            self.inner.list_sections().await
        }
        async fn get_section(&self, id: &str) -> Result<Option<DocumentationSection>> {
            self.inner.get_section(id).await
        }
        async fn create_section(&self, section: NewSection) -> Result<DocumentationSection> {
            self.record()?;
            self.inner.create_section(section).await
        }
        async fn update_section(&self, id: &str, section: NewSection) -> Result<()> {
            self.record()?;
            self.inner.update_section(id, section).await
        }
        async fn delete_section(&self, id: &str) -> Result<()> {
            self.record()?;
            self.inner.delete_section(id).await
        }
        async fn list_code_examples(&self, section_id: &str) -> Result<Vec<CodeExample>> {
            self.inner.list_code_examples(section_id).await
        }
        async fn add_code_example(&self, example: NewCodeExample) -> Result<CodeExample> {
            self.inner.add_code_example(example).await
        }
        async fn submit_feedback(
            &self,
            section_id: &str,
            helpful: bool,
            message: &str,
            user_id: Option<&str>,
        ) -> Result<Feedback> {
            self.inner
                .submit_feedback(section_id, helpful, message, user_id)
                .await
        }
    }

    fn filled_editor() -> SectionEditor {
        let mut editor = SectionEditor::new();
        editor.set_title("Getting Started");
        editor.set_icon(SectionIcon::Rocket);
        editor.set_content(json!([{"type": "paragraph", "content": "Install the SDK"}]));
        editor
    }

    #[test]
    fn test_slug_derived_from_title() {
        let mut editor = SectionEditor::new();
        editor.set_title("Getting Started");
        assert_eq!(editor.slug(), "getting-started");
    }

    #[test]
    fn test_slug_follows_title_until_customized() {
        let mut editor = SectionEditor::new();
        editor.set_title("G");
        editor.set_title("Getting Started");
        assert_eq!(editor.slug(), "getting-started");

        editor.set_slug("start");
        editor.set_title("Getting Started Fast");
        assert_eq!(editor.slug(), "start");
    }

    #[test]
    fn test_cleared_slug_is_derived_again() {
        let mut editor = SectionEditor::new();
        editor.set_slug("custom");
        editor.set_slug("");
        editor.set_title("A & B!");
        assert_eq!(editor.slug(), "a--b");
    }

    #[test]
    fn test_existing_section_slug_not_overwritten() {
        let section = DocumentationSection {
            id: "s1".into(),
            title: "Old".into(),
            icon: SectionIcon::Key,
            slug: "legacy-slug".into(),
            order_index: 0,
            content: json!("x"),
            last_updated_by: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let mut editor = SectionEditor::edit(&section);
        editor.set_title("Brand New");
        assert_eq!(editor.slug(), "legacy-slug");
    }

    #[test]
    fn test_parsed_content_pretty_printed_with_two_spaces() {
        let mut editor = SectionEditor::new();
        editor.set_content(json!({"type": "code", "content": "x"}));
        assert_eq!(
            editor.content_text(),
            "{\n  \"type\": \"code\",\n  \"content\": \"x\"\n}"
        );
    }

    #[test]
    fn test_text_content_kept_verbatim() {
        let mut editor = SectionEditor::new();
        editor.set_content("[ \"as typed\" ]");
        assert_eq!(editor.content_text(), "[ \"as typed\" ]");
    }

    #[test]
    fn test_validate_reports_each_field() {
        let mut editor = SectionEditor::new();
        editor.set_content("{not json");
        let errors = editor.validate().unwrap_err();
        assert!(errors.for_field(Field::Title).is_some());
        assert!(errors.for_field(Field::Icon).is_some());
        assert!(errors.for_field(Field::Slug).is_some());
        let content = errors.for_field(Field::Content).unwrap();
        assert!(content.message.starts_with("Invalid JSON"));
    }

    #[test]
    fn test_validate_unknown_icon_and_bad_slug() {
        let mut editor = filled_editor();
        editor.set_icon_name("sparkles");
        editor.set_slug("Not A Slug");
        let errors = editor.validate().unwrap_err();
        assert!(errors.for_field(Field::Icon).unwrap().message.contains("sparkles"));
        assert!(errors.for_field(Field::Slug).is_some());
        assert!(errors.for_field(Field::Title).is_none());
    }

    #[tokio::test]
    async fn test_save_creates_and_forwards_content_unchanged() {
        let repo = Recording::default();
        let mut editor = filled_editor();
        let outcome = editor.save(&repo, &Actor::admin("alice")).await.unwrap();

        let created = match outcome {
            SaveOutcome::Created(s) => s,
            other => panic!("expected create, got {:?}", other),
        };
        assert_eq!(created.slug, "getting-started");
        assert_eq!(
            created.content,
            json!([{"type": "paragraph", "content": "Install the SDK"}])
        );
        assert_eq!(created.last_updated_by.as_deref(), Some("alice"));
        assert_eq!(editor.section_id(), Some(created.id.as_str()));
        assert_eq!(editor.state(), &EditorState::Idle);
    }

    #[tokio::test]
    async fn test_second_save_updates() {
        let repo = Recording::default();
        let mut editor = filled_editor();
        let admin = Actor::admin("alice");
        editor.save(&repo, &admin).await.unwrap();
        editor.set_content(json!("rewritten"));
        let outcome = editor.save(&repo, &admin).await.unwrap();
        assert!(matches!(outcome, SaveOutcome::Updated(_)));

        let sections = repo.list_sections().await.unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, json!("rewritten"));
        assert_eq!(repo.writes(), 2);
    }

    #[tokio::test]
    async fn test_invalid_json_blocks_save_without_repository_call() {
        let repo = Recording::default();
        let mut editor = filled_editor();
        editor.set_content("[{\"type\": \"paragraph\",");

        let err = editor.save(&repo, &Actor::admin("alice")).await.unwrap_err();
        match err {
            EditorError::Validation(errors) => {
                assert!(errors.for_field(Field::Content).is_some())
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(repo.writes(), 0);
        assert!(matches!(
            editor.state(),
            EditorState::Error(EditorFailure::Invalid(_))
        ));

        editor.set_content("[]");
        assert_eq!(editor.state(), &EditorState::Idle);
    }

    #[tokio::test]
    async fn test_permission_denied_before_repository_call() {
        let repo = Recording::default();
        let mut editor = filled_editor();
        let err = editor.save(&repo, &Actor::reader("bob")).await.unwrap_err();
        assert!(matches!(err, EditorError::PermissionDenied(_)));
        assert_eq!(repo.writes(), 0);
        assert_eq!(editor.state(), &EditorState::Idle);
    }

    #[tokio::test]
    async fn test_repository_failure_resets_saving() {
        let repo = Recording::failing();
        let mut editor = filled_editor();
        let err = editor.save(&repo, &Actor::admin("alice")).await.unwrap_err();
        assert!(matches!(err, EditorError::Repository(_)));
        assert!(matches!(
            editor.state(),
            EditorState::Error(EditorFailure::Repository(msg)) if msg.contains("store unavailable")
        ));
        assert_eq!(editor.section_id(), None);
    }

    #[tokio::test]
    async fn test_cancel_delete_issues_no_call() {
        let repo = Recording::default();
        let admin = Actor::admin("alice");
        let mut editor = filled_editor();
        editor.save(&repo, &admin).await.unwrap();
        let writes_before = repo.writes();

        editor.request_delete().unwrap();
        assert_eq!(editor.state(), &EditorState::ConfirmingDelete);
        assert!(editor.cancel_delete());
        assert_eq!(editor.state(), &EditorState::Idle);

        assert_eq!(repo.writes(), writes_before);
        assert_eq!(repo.list_sections().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_section() {
        let repo = Recording::default();
        let admin = Actor::admin("alice");
        let mut editor = filled_editor();
        editor.save(&repo, &admin).await.unwrap();

        editor.request_delete().unwrap();
        editor.confirm_delete(&repo, &admin).await.unwrap();
        assert!(repo.list_sections().await.unwrap().is_empty());
        assert_eq!(editor.state(), &EditorState::Idle);
        assert_eq!(editor.section_id(), None);
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation_step() {
        let repo = Recording::default();
        let admin = Actor::admin("alice");
        let mut editor = filled_editor();
        editor.save(&repo, &admin).await.unwrap();

        let err = editor.confirm_delete(&repo, &admin).await.unwrap_err();
        assert!(matches!(err, EditorError::InvalidState { .. }));
        assert_eq!(repo.list_sections().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_of_unsaved_section_rejected() {
        let mut editor = filled_editor();
        assert!(matches!(editor.request_delete(), Err(EditorError::Unsaved)));
    }

    #[tokio::test]
    async fn test_failed_delete_resets_deleting() {
        let ok_repo = Recording::default();
        let admin = Actor::admin("alice");
        let mut editor = filled_editor();
        let created = match editor.save(&ok_repo, &admin).await.unwrap() {
            SaveOutcome::Created(s) => s,
            other => panic!("expected create, got {:?}", other),
        };

        let failing = Recording::failing();
        let mut editor = SectionEditor::edit(&created);
        editor.request_delete().unwrap();
        assert!(editor.confirm_delete(&failing, &admin).await.is_err());
        assert!(matches!(editor.state(), EditorState::Error(_)));
        assert_eq!(editor.section_id(), Some(created.id.as_str()));
    }

    #[tokio::test]
    async fn test_reader_cannot_confirm_delete() {
        let repo = Recording::default();
        let mut editor = filled_editor();
        editor.save(&repo, &Actor::admin("alice")).await.unwrap();
        let writes_before = repo.writes();

        editor.request_delete().unwrap();
        let err = editor
            .confirm_delete(&repo, &Actor::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, EditorError::PermissionDenied(_)));
        assert_eq!(repo.writes(), writes_before);
        assert_eq!(editor.state(), &EditorState::Idle);
    }

    #[test]
    fn test_draft_prefers_content_text() {
        let draft: SectionDraft = serde_json::from_value(json!({
            "title": "API Keys",
            "icon": "key",
            "content": ["ignored"],
            "content_text": "[\"kept\"]"
        }))
        .unwrap();
        let editor = SectionEditor::from_draft(draft);
        assert_eq!(editor.slug(), "api-keys");
        assert_eq!(editor.content_text(), "[\"kept\"]");
        assert!(editor.validate().is_ok());
    }

    #[test]
    fn test_draft_explicit_slug_kept() {
        let draft = SectionDraft {
            title: "API Keys".into(),
            icon: Some("key".into()),
            slug: Some("keys".into()),
            ..SectionDraft::default()
        };
        let editor = SectionEditor::from_draft(draft);
        assert_eq!(editor.slug(), "keys");
        assert_eq!(editor.validate().unwrap().content, json!([]));
    }
}
