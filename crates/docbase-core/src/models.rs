//! Core data models used throughout Docbase.
//!
//! These types represent the persisted documentation sections and the
//! records attached to them (code examples, reader feedback), plus the
//! write-side payloads the editor hands to a [`SectionRepository`].
//!
//! Section content is always carried as a parsed [`serde_json::Value`].
//! Turning it into editable text happens only inside the
//! [`editor`](crate::editor) module.
//!
//! [`SectionRepository`]: crate::store::SectionRepository

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Icon shown next to a section in navigation.
///
/// The set is closed: the dashboard only ships glyphs for these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionIcon {
    Book,
    Rocket,
    Code,
    Terminal,
    Shield,
    Key,
    Lock,
    Settings,
    Database,
    Zap,
    FileText,
    HelpCircle,
}

impl SectionIcon {
    pub const ALL: [SectionIcon; 12] = [
        SectionIcon::Book,
        SectionIcon::Rocket,
        SectionIcon::Code,
        SectionIcon::Terminal,
        SectionIcon::Shield,
        SectionIcon::Key,
        SectionIcon::Lock,
        SectionIcon::Settings,
        SectionIcon::Database,
        SectionIcon::Zap,
        SectionIcon::FileText,
        SectionIcon::HelpCircle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionIcon::Book => "book",
            SectionIcon::Rocket => "rocket",
            SectionIcon::Code => "code",
            SectionIcon::Terminal => "terminal",
            SectionIcon::Shield => "shield",
            SectionIcon::Key => "key",
            SectionIcon::Lock => "lock",
            SectionIcon::Settings => "settings",
            SectionIcon::Database => "database",
            SectionIcon::Zap => "zap",
            SectionIcon::FileText => "file-text",
            SectionIcon::HelpCircle => "help-circle",
        }
    }
}

impl fmt::Display for SectionIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionIcon {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        SectionIcon::ALL
            .iter()
            .copied()
            .find(|icon| icon.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown section icon: '{}'", s))
    }
}

/// A persisted, top-level unit of documentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentationSection {
    pub id: String,
    pub title: String,
    pub icon: SectionIcon,
    pub slug: String,
    pub order_index: i64,
    /// Raw content tree; see [`ContentNode`](crate::content::ContentNode).
    pub content: serde_json::Value,
    pub last_updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentationSection {
    /// Fragment reference used by navigation and search results.
    pub fn anchor(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Full-replace payload for creating or updating a section.
///
/// Everything except the id and timestamps, which the repository owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSection {
    pub title: String,
    pub icon: SectionIcon,
    pub slug: String,
    pub order_index: i64,
    pub content: serde_json::Value,
    pub last_updated_by: Option<String>,
}

/// Example snippet attached to a section. Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeExample {
    pub id: String,
    pub section_id: String,
    pub title: String,
    pub language: String,
    pub code: String,
    pub description: Option<String>,
    pub order_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCodeExample {
    pub section_id: String,
    pub title: String,
    pub language: String,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub order_index: i64,
}

/// "Was this page helpful?" submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: String,
    pub section_id: String,
    pub helpful: bool,
    pub message: String,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_round_trips_through_str() {
        for icon in SectionIcon::ALL {
            assert_eq!(icon.as_str().parse::<SectionIcon>().unwrap(), icon);
        }
    }

    #[test]
    fn test_icon_serde_matches_as_str() {
        let json = serde_json::to_string(&SectionIcon::HelpCircle).unwrap();
        assert_eq!(json, "\"help-circle\"");
        let back: SectionIcon = serde_json::from_str("\"file-text\"").unwrap();
        assert_eq!(back, SectionIcon::FileText);
    }

    #[test]
    fn test_unknown_icon_rejected() {
        let err = "sparkles".parse::<SectionIcon>().unwrap_err();
        assert!(err.to_string().contains("sparkles"));
    }
}
