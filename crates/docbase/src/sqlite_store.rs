//! SQLite-backed [`SectionRepository`] implementation.
//!
//! Content is stored as JSON text and parsed back to a [`Value`] on read;
//! a row with corrupt JSON surfaces as an error naming the section.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use docbase_core::models::{
    CodeExample, DocumentationSection, Feedback, NewCodeExample, NewSection, SectionIcon,
};
use docbase_core::store::{SectionRepository, StoreError};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }

    /// Look a section up by id, falling back to slug.
    pub async fn find_section(&self, id_or_slug: &str) -> Result<Option<DocumentationSection>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM sections WHERE id = ? OR slug = ? ORDER BY id = ? DESC LIMIT 1",
            SECTION_COLUMNS
        ))
        .bind(id_or_slug)
        .bind(id_or_slug)
        .bind(id_or_slug)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(section_from_row).transpose()
    }
}

const SECTION_COLUMNS: &str =
    "id, title, icon, slug, order_index, content_json, last_updated_by, created_at, updated_at";

fn millis_to_utc(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

fn section_from_row(row: &SqliteRow) -> Result<DocumentationSection> {
    let id: String = row.get("id");
    let icon: String = row.get("icon");
    let content_json: String = row.get("content_json");
    let content: Value = serde_json::from_str(&content_json)
        .with_context(|| format!("section {} has corrupt content", id))?;

    Ok(DocumentationSection {
        icon: icon
            .parse::<SectionIcon>()
            .with_context(|| format!("section {} has an unknown icon", id))?,
        id,
        title: row.get("title"),
        slug: row.get("slug"),
        order_index: row.get("order_index"),
        content,
        last_updated_by: row.get("last_updated_by"),
        created_at: millis_to_utc(row.get("created_at")),
        updated_at: millis_to_utc(row.get("updated_at")),
    })
}

fn example_from_row(row: &SqliteRow) -> CodeExample {
    CodeExample {
        id: row.get("id"),
        section_id: row.get("section_id"),
        title: row.get("title"),
        language: row.get("language"),
        code: row.get("code"),
        description: row.get("description"),
        order_index: row.get("order_index"),
    }
}

/// Map a unique-index violation on `slug` to [`StoreError::DuplicateSlug`].
fn map_write_error(err: sqlx::Error, slug: &str) -> anyhow::Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::DuplicateSlug(slug.to_string()).into()
        }
        _ => err.into(),
    }
}

#[async_trait]
impl SectionRepository for SqliteRepository {
    async fn list_sections(&self) -> Result<Vec<DocumentationSection>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM sections ORDER BY order_index ASC, seq ASC",
            SECTION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(section_from_row).collect()
    }

    async fn get_section(&self, id: &str) -> Result<Option<DocumentationSection>> {
        let row = sqlx::query(&format!("SELECT {} FROM sections WHERE id = ?", SECTION_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(section_from_row).transpose()
    }

    async fn create_section(&self, section: NewSection) -> Result<DocumentationSection> {
        // Millisecond precision, matching what a later read returns.
        let now_ms = Utc::now().timestamp_millis();
        let now = millis_to_utc(now_ms);
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

        sqlx::query(
            r#"
            INSERT INTO sections (id, title, icon, slug, order_index, content_json,
                                  last_updated_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&created.id)
        .bind(&created.title)
        .bind(created.icon.as_str())
        .bind(&created.slug)
        .bind(created.order_index)
        .bind(created.content.to_string())
        .bind(&created.last_updated_by)
        .bind(now_ms)
        .bind(now_ms)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &created.slug))?;

        Ok(created)
    }

    async fn update_section(&self, id: &str, section: NewSection) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE sections SET
                title = ?, icon = ?, slug = ?, order_index = ?, content_json = ?,
                last_updated_by = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&section.title)
        .bind(section.icon.as_str())
        .bind(&section.slug)
        .bind(section.order_index)
        .bind(section.content.to_string())
        .bind(&section.last_updated_by)
        .bind(Utc::now().timestamp_millis())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &section.slug))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::SectionNotFound(id.to_string()).into());
        }
        Ok(())
    }

    async fn delete_section(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM code_examples WHERE section_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM feedback WHERE section_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM sections WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::SectionNotFound(id.to_string()).into());
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_code_examples(&self, section_id: &str) -> Result<Vec<CodeExample>> {
        let rows = sqlx::query(
            r#"
            SELECT id, section_id, title, language, code, description, order_index
            FROM code_examples
            WHERE section_id = ?
            ORDER BY order_index ASC, rowid ASC
            "#,
        )
        .bind(section_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(example_from_row).collect())
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
        sqlx::query(
            r#"
            INSERT INTO code_examples (id, section_id, title, language, code, description, order_index)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&created.id)
        .bind(&created.section_id)
        .bind(&created.title)
        .bind(&created.language)
        .bind(&created.code)
        .bind(&created.description)
        .bind(created.order_index)
        .execute(&self.pool)
        .await?;
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
        let now_ms = Utc::now().timestamp_millis();
        let feedback = Feedback {
            id: uuid::Uuid::new_v4().to_string(),
            section_id: section_id.to_string(),
            helpful,
            message: message.to_string(),
            user_id: user_id.map(str::to_string),
            created_at: millis_to_utc(now_ms),
        };
        sqlx::query(
            "INSERT INTO feedback (id, section_id, helpful, message, user_id, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&feedback.id)
        .bind(&feedback.section_id)
        .bind(feedback.helpful)
        .bind(&feedback.message)
        .bind(&feedback.user_id)
        .bind(now_ms)
        .execute(&self.pool)
        .await?;
        Ok(feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn repo() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate::apply(&pool).await.unwrap();
        SqliteRepository::new(pool)
    }

    fn new_section(title: &str, slug: &str, order_index: i64) -> NewSection {
        NewSection {
            title: title.to_string(),
            icon: SectionIcon::Terminal,
            slug: slug.to_string(),
            order_index,
            content: json!([{"type": "paragraph", "content": title}]),
            last_updated_by: Some("alice".into()),
        }
    }

    #[tokio::test]
    async fn test_create_then_read_back() {
        let repo = repo().await;
        let created = repo.create_section(new_section("CLI", "cli", 2)).await.unwrap();
        let fetched = repo.get_section(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.content, json!([{"type": "paragraph", "content": "CLI"}]));
    }

    #[tokio::test]
    async fn test_content_key_order_survives_storage() {
        let repo = repo().await;
        let mut section = new_section("Keys", "keys", 0);
        section.content = json!({"type": "code", "language": "sh", "content": "docs serve"});
        let created = repo.create_section(section).await.unwrap();

        let stored: String = sqlx::query_scalar("SELECT content_json FROM sections WHERE id = ?")
            .bind(&created.id)
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(
            stored,
            r#"{"type":"code","language":"sh","content":"docs serve"}"#
        );

        let fetched = repo.get_section(&created.id).await.unwrap().unwrap();
        let keys: Vec<&String> = fetched.content.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["type", "language", "content"]);
    }

    #[tokio::test]
    async fn test_list_orders_by_index_then_insertion() {
        let repo = repo().await;
        repo.create_section(new_section("Late", "late", 9)).await.unwrap();
        repo.create_section(new_section("First", "first", 1)).await.unwrap();
        repo.create_section(new_section("Second", "second", 1)).await.unwrap();
        let titles: Vec<String> = repo
            .list_sections()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.title)
            .collect();
        assert_eq!(titles, vec!["First", "Second", "Late"]);
    }

    #[tokio::test]
    async fn test_duplicate_slug_maps_to_store_error() {
        let repo = repo().await;
        repo.create_section(new_section("A", "dup", 0)).await.unwrap();
        let err = repo.create_section(new_section("B", "dup", 0)).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<StoreError>(),
            Some(&StoreError::DuplicateSlug("dup".into()))
        );
    }

    #[tokio::test]
    async fn test_update_missing_section_errors() {
        let repo = repo().await;
        let err = repo
            .update_section("missing", new_section("A", "a", 0))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::SectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_full_replace() {
        let repo = repo().await;
        let created = repo.create_section(new_section("A", "a", 0)).await.unwrap();
        let mut replacement = new_section("B", "b", 4);
        replacement.icon = SectionIcon::Shield;
        replacement.content = json!("plain");
        repo.update_section(&created.id, replacement).await.unwrap();

        let updated = repo.get_section(&created.id).await.unwrap().unwrap();
        assert_eq!(updated.title, "B");
        assert_eq!(updated.slug, "b");
        assert_eq!(updated.icon, SectionIcon::Shield);
        assert_eq!(updated.order_index, 4);
        assert_eq!(updated.content, json!("plain"));
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let repo = repo().await;
        let s = repo.create_section(new_section("A", "a", 0)).await.unwrap();
        repo.add_code_example(NewCodeExample {
            section_id: s.id.clone(),
            title: "Hello".into(),
            language: "sh".into(),
            code: "echo hi".into(),
            description: Some("greets".into()),
            order_index: 0,
        })
        .await
        .unwrap();
        repo.submit_feedback(&s.id, true, "nice", None).await.unwrap();

        repo.delete_section(&s.id).await.unwrap();
        assert!(repo.get_section(&s.id).await.unwrap().is_none());
        assert!(repo.list_code_examples(&s.id).await.unwrap().is_empty());
        let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM feedback")
            .fetch_one(repo.pool())
            .await
            .unwrap();
        assert_eq!(remaining, 0);

        assert!(repo.delete_section(&s.id).await.is_err());
    }

    #[tokio::test]
    async fn test_find_by_slug_or_id() {
        let repo = repo().await;
        let s = repo.create_section(new_section("Keys", "keys", 0)).await.unwrap();
        assert_eq!(repo.find_section("keys").await.unwrap().unwrap().id, s.id);
        assert_eq!(repo.find_section(&s.id).await.unwrap().unwrap().slug, "keys");
        assert!(repo.find_section("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_content_is_error_not_panic() {
        let repo = repo().await;
        let s = repo.create_section(new_section("A", "a", 0)).await.unwrap();
        sqlx::query("UPDATE sections SET content_json = '{oops' WHERE id = ?")
            .bind(&s.id)
            .execute(repo.pool())
            .await
            .unwrap();
        let err = repo.get_section(&s.id).await.unwrap_err();
        assert!(err.to_string().contains("corrupt content"));
    }
}
