//! Section deletion (`docs delete`).
//!
//! Deleting is irreversible and drops the section's code examples and
//! feedback. The command asks `y/N` on stdin unless `--yes` is given;
//! anything but `y`/`yes` (including end of input) cancels.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};

use docbase_core::auth::Actor;
use docbase_core::editor::SectionEditor;
use docbase_core::models::DocumentationSection;
use docbase_core::store::SectionRepository;

use crate::config::Config;
use crate::db;
use crate::events::{self, DocEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Drive the editor's confirm step with `confirm`, then delete.
pub async fn delete_section<R, F>(
    repo: &R,
    section: &DocumentationSection,
    actor: &Actor,
    confirm: F,
) -> Result<DeleteOutcome>
where
    R: SectionRepository + ?Sized,
    F: FnOnce(&DocumentationSection) -> bool,
{
    let mut editor = SectionEditor::edit(section);
    editor.request_delete()?;

    if !confirm(section) {
        editor.cancel_delete();
        return Ok(DeleteOutcome::Cancelled);
    }

    editor.confirm_delete(repo, actor).await?;
    events::emit(DocEvent::SectionDeleted {
        id: &section.id,
        actor: actor.user_id.as_deref(),
    });
    Ok(DeleteOutcome::Deleted)
}

fn prompt_yes_no(section: &DocumentationSection) -> bool {
    print!(
        "Delete section \"{}\" ({})? This cannot be undone. [y/N] ",
        section.title, section.slug
    );
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

pub async fn run_delete(config: &Config, id_or_slug: &str, yes: bool, actor: &Actor) -> Result<()> {
    let repo = db::open_repository(config).await?;
    let section = match repo.find_section(id_or_slug).await? {
        Some(section) => section,
        None => {
            repo.close().await;
            bail!("section not found: {}", id_or_slug);
        }
    };

    let outcome = delete_section(&repo, &section, actor, |s| yes || prompt_yes_no(s)).await;
    repo.close().await;

    match outcome? {
        DeleteOutcome::Deleted => println!("Deleted section {} ({}).", section.slug, section.id),
        DeleteOutcome::Cancelled => println!("Cancelled; nothing deleted."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docbase_core::models::{NewSection, SectionIcon};
    use docbase_core::store::memory::InMemoryRepository;
    use serde_json::json;

    async fn seeded() -> (InMemoryRepository, DocumentationSection) {
        let repo = InMemoryRepository::new();
        let section = repo
            .create_section(NewSection {
                title: "Old".into(),
                icon: SectionIcon::Book,
                slug: "old".into(),
                order_index: 0,
                content: json!([]),
                last_updated_by: None,
            })
            .await
            .unwrap();
        (repo, section)
    }

    #[tokio::test]
    async fn test_declined_confirmation_keeps_section() {
        let (repo, section) = seeded().await;
        let outcome = delete_section(&repo, &section, &Actor::admin("ops"), |_| false)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(repo.list_sections().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_section() {
        let (repo, section) = seeded().await;
        let outcome = delete_section(&repo, &section, &Actor::admin("ops"), |_| true)
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(repo.list_sections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reader_delete_denied() {
        let (repo, section) = seeded().await;
        let err = delete_section(&repo, &section, &Actor::reader("bob"), |_| true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("permission denied"));
        assert_eq!(repo.list_sections().await.unwrap().len(), 1);
    }
}
