//! Source provider interface
//!
//! A source provider turns one query string into extracted release
//! candidates. It may fan out over several listing pages internally
//! (cooperatively, on one logical thread); page results must be concatenated
//! in page order so the engine's input order is deterministic, and a single
//! failed page should yield partial results rather than failing the whole
//! listing. Each network call carries its own bounded timeout.

use async_trait::async_trait;
use longbox_common::models::Candidate;
use thiserror::Error;

/// Source provider errors
///
/// The orchestrator recovers a failed query as zero candidates and keeps
/// searching; none of these escape a search.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned status {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// A search source producing release candidates for a query string.
#[async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_candidates(&self, query: &str) -> Result<Vec<Candidate>, ProviderError>;
}
