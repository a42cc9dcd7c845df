//! Domain events.
//!
//! Each event becomes one `info!` record on the `docbase::events` target,
//! so it can be filtered with `RUST_LOG=docbase::events=info`.

use docbase_core::search::SearchOutcome;

#[derive(Debug, Clone, PartialEq)]
pub enum DocEvent<'a> {
    SectionCreated {
        id: &'a str,
        slug: &'a str,
        actor: Option<&'a str>,
    },
    SectionUpdated {
        id: &'a str,
        actor: Option<&'a str>,
    },
    SectionDeleted {
        id: &'a str,
        actor: Option<&'a str>,
    },
    FeedbackSubmitted {
        section_id: &'a str,
        helpful: bool,
    },
    SearchExecuted {
        query: &'a str,
        outcome: &'a SearchOutcome,
    },
}

impl DocEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            DocEvent::SectionCreated { .. } => "section_created",
            DocEvent::SectionUpdated { .. } => "section_updated",
            DocEvent::SectionDeleted { .. } => "section_deleted",
            DocEvent::FeedbackSubmitted { .. } => "feedback_submitted",
            DocEvent::SearchExecuted { .. } => "search_executed",
        }
    }
}

pub fn emit(event: DocEvent<'_>) {
    let name = event.name();
    match event {
        DocEvent::SectionCreated { id, slug, actor } => {
            tracing::info!(target: "docbase::events", event = name, id, slug, actor = actor.unwrap_or("-"));
        }
        DocEvent::SectionUpdated { id, actor } | DocEvent::SectionDeleted { id, actor } => {
            tracing::info!(target: "docbase::events", event = name, id, actor = actor.unwrap_or("-"));
        }
        DocEvent::FeedbackSubmitted {
            section_id,
            helpful,
        } => {
            tracing::info!(target: "docbase::events", event = name, section_id, helpful);
        }
        DocEvent::SearchExecuted { query, outcome } => {
            // Query length only; queries may contain user data.
            tracing::info!(
                target: "docbase::events",
                event = name,
                query_len = query.chars().count(),
                outcome = outcome.kind(),
                results = outcome.results().len()
            );
        }
    }
}
