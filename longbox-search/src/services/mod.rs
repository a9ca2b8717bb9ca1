//! Engine components for release matching and selection
//!
//! Dependency order, leaves first: title normalizer → match evaluator →
//! result ranker → coverage selector → search orchestrator.

pub mod coverage_selector;
pub mod match_evaluator;
pub mod result_ranker;
pub mod search_orchestrator;
pub mod title_normalizer;

pub use coverage_selector::select_cover;
pub use match_evaluator::{evaluate, AnnotatedCandidate, MatchRejection};
pub use result_ranker::{rank, rank_key, RankKey};
pub use search_orchestrator::Searcher;
pub use title_normalizer::{normalize_title, titles_match};
