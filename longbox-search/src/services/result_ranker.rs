//! Composite ranking of search results
//!
//! Produces an ascending sort key per candidate: lower sorts first and is the
//! better release. The sort is stable, so candidates with identical keys keep
//! the deterministic provider order they arrived in.

use crate::services::match_evaluator::AnnotatedCandidate;
use longbox_common::models::{IssueQuery, IssueSpan, VolumeQuery};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Ordered sort key for a search result. Earlier fields dominate ties.
#[derive(Debug, Clone, Copy)]
pub struct RankKey {
    /// 0 for matches, 1 for non-matches; matches always rank first.
    unmatched: u8,
    /// Query-title words missing from the candidate's series name.
    missing_words: usize,
    /// Volume-number and year mismatch penalties combined (0..=2).
    metadata_penalty: u8,
    /// How well the candidate's issue coverage fits the query.
    issue_fit: f64,
}

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey {}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // issue_fit is never NaN, so total_cmp is a plain numeric order here
        self.unmatched
            .cmp(&other.unmatched)
            .then(self.missing_words.cmp(&other.missing_words))
            .then(self.metadata_penalty.cmp(&other.metadata_penalty))
            .then(self.issue_fit.total_cmp(&other.issue_fit))
    }
}

/// Compute the sort key for one result.
pub fn rank_key(
    result: &AnnotatedCandidate,
    volume: &VolumeQuery,
    issue: Option<&IssueQuery>,
) -> RankKey {
    let candidate = &result.candidate;

    let series_words: HashSet<String> = candidate
        .series
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let missing_words = volume
        .title
        .to_lowercase()
        .split_whitespace()
        .filter(|word| !series_words.contains(*word))
        .count();

    let volume_penalty = u8::from(
        !(candidate.volume_number.is_some() && candidate.volume_number == volume.volume_number),
    );
    let year_penalty = match (volume.year, candidate.year) {
        (Some(query_year), Some(candidate_year))
            if (query_year - 1..=query_year + 1).contains(&candidate_year) =>
        {
            0
        }
        _ => 1,
    };

    let issue_fit = match issue {
        Some(issue) => match candidate.issue_number {
            // Exact issue is the best possible fit
            Some(IssueSpan::Single(n)) if n == issue.calculated_issue_number => 0.0,
            // A containing range: tighter ranges fit better
            Some(span @ IssueSpan::Range(..)) if span.contains(issue.calculated_issue_number) => {
                1.0 - 1.0 / span.width()
            }
            // No issue number, but a whole-volume release
            None if candidate.special_version.is_some() => 2.0,
            _ => 3.0,
        },
        None => match candidate.issue_number {
            Some(span @ IssueSpan::Range(..)) => 1.0 / span.width(),
            Some(IssueSpan::Single(_)) => 1.0,
            None => 0.0,
        },
    };

    RankKey {
        unmatched: u8::from(!result.is_match()),
        missing_words,
        metadata_penalty: volume_penalty + year_penalty,
        issue_fit,
    }
}

/// Stable-sort results ascending by rank key, best result first.
pub fn rank(results: &mut [AnnotatedCandidate], volume: &VolumeQuery, issue: Option<&IssueQuery>) {
    results.sort_by_key(|result| rank_key(result, volume, issue));
}
