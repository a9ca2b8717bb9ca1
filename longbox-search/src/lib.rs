//! # Longbox Search Engine
//!
//! Locates downloadable releases for a comic volume or issue from scraped
//! listings:
//! - Title normalization for series comparison
//! - Match evaluation of release candidates against library metadata
//! - Composite ranking of candidates
//! - Greedy coverage selection for unattended acquisition
//!
//! Retrieval, persistence and the blocklist are injected collaborators
//! (`SourceProvider`, `Library`, `Blocklist`); the engine performs no I/O of
//! its own beyond calling them and holds no state across searches.

pub mod error;
pub mod library;
pub mod services;
pub mod sources;

pub use error::SearchError;
pub use library::{Blocklist, Library, OpenIssues};
pub use services::{
    evaluate, normalize_title, rank, rank_key, select_cover, titles_match, AnnotatedCandidate,
    MatchRejection, RankKey, Searcher,
};
pub use sources::{ProviderError, SourceProvider};
