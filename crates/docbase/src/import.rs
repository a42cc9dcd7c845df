//! Bulk import of sections from a JSON file (`docs import`).
//!
//! ```json
//! { "sections": [
//!     { "title": "Getting Started", "icon": "rocket", "order_index": 0,
//!       "content": [ { "type": "paragraph", "content": "Install the SDK" } ],
//!       "examples": [ { "title": "Install", "language": "sh", "code": "..." } ] }
//! ] }
//! ```
//!
//! Every section goes through the editor: the slug is derived from the
//! title when absent, and the same validation as an interactive save
//! applies. A section whose slug already exists is replaced in full, so
//! importing the same file twice is a no-op apart from `updated_at`.
//! Examples are attached only to newly created sections.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use docbase_core::auth::Actor;
use docbase_core::editor::{SaveOutcome, SectionDraft, SectionEditor};
use docbase_core::models::NewCodeExample;
use docbase_core::store::SectionRepository;

use crate::config::Config;
use crate::db;
use crate::events::{self, DocEvent};

#[derive(Debug, Deserialize)]
pub struct ImportFile {
    pub sections: Vec<ImportSection>,
}

#[derive(Debug, Deserialize)]
pub struct ImportSection {
    #[serde(flatten)]
    pub draft: SectionDraft,
    #[serde(default)]
    pub examples: Vec<ImportExample>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImportExample {
    pub title: String,
    pub language: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order_index: i64,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub examples: usize,
    /// `(title, reason)` for each section or code example that was not
    /// written.
    pub failed: Vec<(String, String)>,
}

pub fn read_import_file(path: &Path) -> Result<ImportFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse import file: {}", path.display()))
}

/// Write every section in `file` through the editor as `actor`.
///
/// Per-section and per-example failures are collected in the report;
/// only a failure to list existing sections aborts the import.
pub async fn import_sections<R>(repo: &R, file: ImportFile, actor: &Actor) -> Result<ImportReport>
where
    R: SectionRepository + ?Sized,
{
    let existing = repo.list_sections().await?;
    let mut report = ImportReport::default();

    for item in file.sections {
        let title = item.draft.title.clone();
        let mut editor = SectionEditor::from_draft(item.draft);
        if let Some(current) = existing.iter().find(|s| s.slug == editor.slug()) {
            editor = editor.for_section(current.id.clone());
        }

        match editor.save(repo, actor).await {
            Ok(SaveOutcome::Created(section)) => {
                events::emit(DocEvent::SectionCreated {
                    id: &section.id,
                    slug: &section.slug,
                    actor: actor.user_id.as_deref(),
                });
                report.created += 1;
                for example in item.examples {
                    let example_title = example.title.clone();
                    let added = repo
                        .add_code_example(NewCodeExample {
                            section_id: section.id.clone(),
                            title: example.title,
                            language: example.language,
                            code: example.code,
                            description: example.description,
                            order_index: example.order_index,
                        })
                        .await;
                    match added {
                        Ok(_) => report.examples += 1,
                        Err(e) => {
                            tracing::warn!(
                                section = %title,
                                example = %example_title,
                                error = %e,
                                "code example not imported"
                            );
                            let reason = format!("code example {:?}: {:#}", example_title, e);
                            report.failed.push((title.clone(), reason));
                        }
                    }
                }
            }
            Ok(SaveOutcome::Updated(id)) => {
                events::emit(DocEvent::SectionUpdated {
                    id: &id,
                    actor: actor.user_id.as_deref(),
                });
                report.updated += 1;
            }
            Err(e) => {
                tracing::warn!(section = %title, error = %e, "section not imported");
                report.failed.push((title, e.to_string()));
            }
        }
    }

    Ok(report)
}

pub async fn run_import(config: &Config, path: &Path, actor: &Actor) -> Result<()> {
    let file = read_import_file(path)?;
    let repo = db::open_repository(config).await?;
    let report = import_sections(&repo, file, actor).await?;
    repo.close().await;

    println!("Import {}", path.display());
    println!("  created sections: {}", report.created);
    println!("  updated sections: {}", report.updated);
    println!("  code examples:    {}", report.examples);
    for (title, reason) in &report.failed {
        eprintln!("  failed: {}: {}", title, reason);
    }

    if !report.failed.is_empty() {
        bail!("{} section(s) failed to import", report.failed.len());
    }
    println!("ok");
    Ok(())
}
