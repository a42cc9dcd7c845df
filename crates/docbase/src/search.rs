//! Section search over the repository.
//!
//! Each call lists the sections and builds a fresh [`SearchIndex`]; there
//! is no index cached between commands or requests.

use anyhow::Result;

use docbase_core::search::{SearchIndex, SearchOptions, SearchOutcome};
use docbase_core::store::SectionRepository;

use crate::config::Config;
use crate::db;
use crate::events::{self, DocEvent};

/// Run one query and emit a `search_executed` event.
pub async fn search_sections<R>(
    repo: &R,
    options: &SearchOptions,
    query: &str,
) -> Result<SearchOutcome>
where
    R: SectionRepository + ?Sized,
{
    let sections = repo.list_sections().await?;
    let index = SearchIndex::build_with_options(&sections, options.clone());
    let outcome = index.outcome(query);
    tracing::debug!(indexed = index.len(), "search index built");
    events::emit(DocEvent::SearchExecuted {
        query,
        outcome: &outcome,
    });
    Ok(outcome)
}

pub async fn run_search(config: &Config, query: &str) -> Result<()> {
    let repo = db::open_repository(config).await?;
    let outcome = search_sections(&repo, &config.search.options(), query).await?;
    repo.close().await;

    match outcome {
        SearchOutcome::NoQuery => println!("No results. Enter a search query."),
        SearchOutcome::NoMatches => println!("No results for \"{}\".", query.trim()),
        SearchOutcome::Matches(results) => {
            for (i, result) in results.iter().enumerate() {
                println!("{}. {}", i + 1, result.title);
                println!("    excerpt: \"{}\"", result.snippet);
                println!("    url: {}", result.url);
                println!("    id: {}", result.id);
                println!();
            }
        }
    }
    Ok(())
}
