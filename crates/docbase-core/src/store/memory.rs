//! In-memory [`SectionRepository`] for tests and embedded use.
//!
//! Uses `Vec`s behind `std::sync::RwLock`. Insertion order is kept so
//! sections sharing an `order_index` list in the order they were created.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;

use crate::models::{CodeExample, DocumentationSection, Feedback, NewCodeExample, NewSection};

use super::{SectionRepository, StoreError};

#[derive(Default)]
pub struct InMemoryRepository {
    sections: RwLock<Vec<DocumentationSection>>,
    examples: RwLock<Vec<CodeExample>>,
    feedback: RwLock<Vec<Feedback>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all feedback, oldest first.
    pub fn feedback(&self) -> Result<Vec<Feedback>> {
        Ok(self.feedback.read().map_err(poisoned)?.clone())
    }
}

fn poisoned<T>(_: T) -> anyhow::Error {
    anyhow!("in-memory repository lock poisoned")
}

fn ensure_unique_slug(
    sections: &[DocumentationSection],
    slug: &str,
    except_id: Option<&str>,
) -> Result<()> {
    let taken = sections
        .iter()
        .any(|s| s.slug == slug && Some(s.id.as_str()) != except_id);
    if taken {
        return Err(StoreError::DuplicateSlug(slug.to_string()).into());
    }
    Ok(())
}

#[async_trait]
impl SectionRepository for InMemoryRepository {
    async fn list_sections(&self) -> Result<Vec<DocumentationSection>> {
        let mut sections = self.sections.read().map_err(poisoned)?.clone();
        // Stable sort keeps insertion order for equal order_index.
        sections.sort_by_key(|s| s.order_index);
        Ok(sections)
    }

    async fn get_section(&self, id: &str) -> Result<Option<DocumentationSection>> {
        let sections = self.sections.read().map_err(poisoned)?;
        Ok(sections.iter().find(|s| s.id == id).cloned())
    }

    async fn create_section(&self, section: NewSection) -> Result<DocumentationSection> {
        let mut sections = self.sections.write().map_err(poisoned)?;
        ensure_unique_slug(&sections, &section.slug, None)?;

        let now = Utc::now();
        let created = DocumentationSection {
            id: uuid::Uuid::new_v4().to_string(),
            title: section.title,
            icon: section.icon,
            slug: section.slug,
            order_index: section.order_index,
            content: section.content,
            last_updated_by: section.last_updated_by,
            created_at: now,
            updated_at: now,
        };
        sections.push(created.clone());
        Ok(created)
    }

    async fn update_section(&self, id: &str, section: NewSection) -> Result<()> {
        let mut sections = self.sections.write().map_err(poisoned)?;
        ensure_unique_slug(&sections, &section.slug, Some(id))?;

        let existing = sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::SectionNotFound(id.to_string()))?;

        existing.title = section.title;
        existing.icon = section.icon;
        existing.slug = section.slug;
        existing.order_index = section.order_index;
        existing.content = section.content;
        existing.last_updated_by = section.last_updated_by;
        existing.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_section(&self, id: &str) -> Result<()> {
        {
            let mut sections = self.sections.write().map_err(poisoned)?;
            let before = sections.len();
            sections.retain(|s| s.id != id);
            if sections.len() == before {
                return Err(StoreError::SectionNotFound(id.to_string()).into());
            }
        }
        self.examples
            .write()
            .map_err(poisoned)?
            .retain(|e| e.section_id != id);
        self.feedback
            .write()
            .map_err(poisoned)?
            .retain(|f| f.section_id != id);
        Ok(())
    }

    async fn list_code_examples(&self, section_id: &str) -> Result<Vec<CodeExample>> {
        let mut examples: Vec<CodeExample> = self
            .examples
            .read()
            .map_err(poisoned)?
            .iter()
            .filter(|e| e.section_id == section_id)
            .cloned()
            .collect();
        examples.sort_by_key(|e| e.order_index);
        Ok(examples)
    }

    async fn add_code_example(&self, example: NewCodeExample) -> Result<CodeExample> {
        if self.get_section(&example.section_id).await?.is_none() {
            return Err(StoreError::SectionNotFound(example.section_id).into());
        }
        let created = CodeExample {
            id: uuid::Uuid::new_v4().to_string(),
            section_id: example.section_id,
            title: example.title,
            language: example.language,
            code: example.code,
            description: example.description,
            order_index: example.order_index,
        };
        self.examples
            .write()
            .map_err(poisoned)?
            .push(created.clone());
        Ok(created)
    }

    async fn submit_feedback(
        &self,
        section_id: &str,
        helpful: bool,
        message: &str,
        user_id: Option<&str>,
    ) -> Result<Feedback> {
        if self.get_section(section_id).await?.is_none() {
            return Err(StoreError::SectionNotFound(section_id.to_string()).into());
        }
        let feedback = Feedback {
            id: uuid::Uuid::new_v4().to_string(),
            section_id: section_id.to_string(),
            helpful,
            message: message.to_string(),
            user_id: user_id.map(str::to_string),
            created_at: Utc::now(),
        };
        self.feedback
            .write()
            .map_err(poisoned)?
            .push(feedback.clone());
        Ok(feedback)
    }
}
