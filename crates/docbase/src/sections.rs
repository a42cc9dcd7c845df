//! Section listing and display.
//!
//! Used by `docs sections`, `docs show`, and the `GET /sections` routes.

use anyhow::{bail, Result};
use serde::Serialize;

use docbase_core::content::ContentNode;
use docbase_core::html::to_html;
use docbase_core::models::{CodeExample, DocumentationSection};
use docbase_core::render::{render_with_diagnostics, Diagnostic};
use docbase_core::store::SectionRepository;

use crate::config::Config;
use crate::db;

/// A section with its rendered forms and code examples.
#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    #[serde(flatten)]
    pub section: DocumentationSection,
    pub anchor: String,
    pub html: String,
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
    pub examples: Vec<CodeExample>,
}

/// Render a section and attach its examples.
///
/// Unrecognized content never fails the render; each fallback is logged.
pub async fn section_view<R>(repo: &R, section: DocumentationSection) -> Result<SectionView>
where
    R: SectionRepository + ?Sized,
{
    let output = render_with_diagnostics(&ContentNode::from_value(&section.content));
    for diagnostic in &output.diagnostics {
        tracing::warn!(
            section = %section.id,
            path = %diagnostic.path,
            "{}",
            diagnostic.message
        );
    }
    let examples = repo.list_code_examples(&section.id).await?;

    Ok(SectionView {
        anchor: section.anchor(),
        html: to_html(&output.display),
        text: output.display.to_plain_text(),
        diagnostics: output.diagnostics,
        examples,
        section,
    })
}

pub async fn run_sections(config: &Config) -> Result<()> {
    let repo = db::open_repository(config).await?;
    let sections = repo.list_sections().await?;

    if sections.is_empty() {
        println!("No sections.");
    }
    for section in &sections {
        println!(
            "{:>3}  {:<10} {:<28} {}",
            section.order_index,
            section.icon.as_str(),
            section.slug,
            section.title
        );
        println!("     id: {}", section.id);
    }

    repo.close().await;
    Ok(())
}

/// CLI entry point for `docs show`: look up by id or slug and print.
pub async fn run_show(config: &Config, id_or_slug: &str, html: bool) -> Result<()> {
    let repo = db::open_repository(config).await?;
    let section = match repo.find_section(id_or_slug).await? {
        Some(section) => section,
        None => {
            repo.close().await;
            bail!("section not found: {}", id_or_slug);
        }
    };
    let view = section_view(&repo, section).await?;
    repo.close().await;

    println!("--- {} ---", view.section.title);
    println!("id:         {}", view.section.id);
    println!("slug:       {}", view.section.slug);
    println!("icon:       {}", view.section.icon);
    println!("order:      {}", view.section.order_index);
    println!(
        "updated_at: {}",
        view.section.updated_at.format("%Y-%m-%dT%H:%M:%SZ")
    );
    if let Some(user) = &view.section.last_updated_by {
        println!("updated_by: {}", user);
    }
    println!();

    if html {
        println!("{}", view.html);
    } else {
        println!("{}", view.text);
    }

    if !view.examples.is_empty() {
        println!();
        println!("--- Examples ({}) ---", view.examples.len());
        for example in &view.examples {
            println!("[{}] {}", example.language, example.title);
            if let Some(description) = &example.description {
                println!("{}", description);
            }
            println!("{}", example.code);
            println!();
        }
    }

    if !view.diagnostics.is_empty() {
        eprintln!(
            "warning: {} unrecognized content block(s) shown as raw JSON",
            view.diagnostics.len()
        );
    }

    Ok(())
}
