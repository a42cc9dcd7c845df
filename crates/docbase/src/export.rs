//! JSON export of every section (`docs export`).
//!
//! The output has the same shape `docs import` reads, so an export can be
//! re-imported into another database.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use docbase_core::models::SectionIcon;
use docbase_core::store::SectionRepository;

use crate::config::Config;
use crate::db;
use crate::import::ImportExample;

#[derive(Debug, Serialize)]
pub struct ExportFile {
    pub sections: Vec<ExportSection>,
}

#[derive(Debug, Serialize)]
pub struct ExportSection {
    pub id: String,
    pub title: String,
    pub icon: SectionIcon,
    pub slug: String,
    pub order_index: i64,
    pub content: Value,
    pub last_updated_by: Option<String>,
    pub updated_at: String,
    pub examples: Vec<ImportExample>,
}

pub async fn export_sections<R>(repo: &R) -> Result<ExportFile>
where
    R: SectionRepository + ?Sized,
{
    let mut sections = Vec::new();
    for section in repo.list_sections().await? {
        let examples = repo
            .list_code_examples(&section.id)
            .await?
            .into_iter()
            .map(|e| ImportExample {
                title: e.title,
                language: e.language,
                code: e.code,
                description: e.description,
                order_index: e.order_index,
            })
            .collect();
        sections.push(ExportSection {
            updated_at: section.updated_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            id: section.id,
            title: section.title,
            icon: section.icon,
            slug: section.slug,
            order_index: section.order_index,
            content: section.content,
            last_updated_by: section.last_updated_by,
            examples,
        });
    }
    Ok(ExportFile { sections })
}

pub async fn run_export(config: &Config, output: Option<&Path>) -> Result<()> {
    let repo = db::open_repository(config).await?;
    let file = export_sections(&repo).await?;
    repo.close().await;

    let json = serde_json::to_string_pretty(&file)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write export: {}", path.display()))?;
            eprintln!(
                "Exported {} sections to {}",
                file.sections.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}
