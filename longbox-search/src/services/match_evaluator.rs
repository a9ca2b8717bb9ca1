//! Match evaluation of release candidates against library metadata
//!
//! Decides per candidate whether it genuinely is the volume/issue being
//! searched for. Checks run in a fixed order and the first failure wins, so
//! every non-match carries exactly one rejection reason.

use crate::library::Blocklist;
use crate::services::title_normalizer::titles_match;
use longbox_common::models::{Candidate, IssueQuery, IssueSpan, VolumeQuery};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a candidate was rejected. Stable identifiers, one per check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchRejection {
    Blocklisted,
    AnnualMismatch,
    TitleMismatch,
    VolumeMismatch,
    IssueMismatch,
    YearMismatch,
}

impl fmt::Display for MatchRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            MatchRejection::Blocklisted => "Link is blocklisted",
            MatchRejection::AnnualMismatch => "Annual conflict",
            MatchRejection::TitleMismatch => "Title doesn't match",
            MatchRejection::VolumeMismatch => "Volume number doesn't match",
            MatchRejection::IssueMismatch => "Issue number(s) don't match",
            MatchRejection::YearMismatch => "Year doesn't match",
        };
        f.write_str(message)
    }
}

/// A candidate annotated with the outcome of match evaluation.
///
/// The candidate itself stays immutable; the verdict travels alongside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedCandidate {
    pub candidate: Candidate,
    /// `None` means the candidate matched.
    pub rejection: Option<MatchRejection>,
}

impl AnnotatedCandidate {
    pub fn is_match(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Evaluate one candidate against a volume (and optionally issue) query.
///
/// Returns `None` on a match, or the reason of the first failed check.
/// Pure apart from the blocklist lookup.
pub fn evaluate(
    candidate: &Candidate,
    volume: &VolumeQuery,
    issue: Option<&IssueQuery>,
    blocklist: &dyn Blocklist,
) -> Option<MatchRejection> {
    if blocklist.is_blocklisted(&candidate.link) {
        return Some(MatchRejection::Blocklisted);
    }

    let query_is_annual = volume.title.to_lowercase().contains("annual");
    if candidate.annual != query_is_annual {
        return Some(MatchRejection::AnnualMismatch);
    }

    if !titles_match(&volume.title, &candidate.series) {
        return Some(MatchRejection::TitleMismatch);
    }

    // A candidate without a volume number is tolerated only when a year is
    // available to corroborate the match.
    if candidate.volume_number != volume.volume_number
        && (candidate.volume_number.is_some() || volume.year.is_none())
    {
        return Some(MatchRejection::VolumeMismatch);
    }

    if !issue_compatible(candidate, volume, issue) {
        return Some(MatchRejection::IssueMismatch);
    }

    if let (Some(query_year), Some(candidate_year)) = (volume.year, candidate.year) {
        let near_volume_year = (query_year - 1..=query_year + 1).contains(&candidate_year);
        // Release year recorded for the covered issue (range start for ranges)
        let issue_year = match candidate.issue_number {
            Some(span) => volume.issue_catalog.get(&span.low()).copied(),
            None => None,
        };
        if !near_volume_year && issue_year != Some(candidate_year) {
            return Some(MatchRejection::YearMismatch);
        }
    }

    None
}

fn issue_compatible(
    candidate: &Candidate,
    volume: &VolumeQuery,
    issue: Option<&IssueQuery>,
) -> bool {
    match issue {
        // Volume-level query: the covered issues must all exist in the
        // volume, or the release covers the whole volume at once.
        None => {
            let span_in_catalog = match candidate.issue_number {
                Some(IssueSpan::Single(n)) => volume.issue_catalog.contains_key(&n),
                Some(IssueSpan::Range(low, high)) => {
                    volume.issue_catalog.contains_key(&low)
                        && volume.issue_catalog.contains_key(&high)
                }
                None => false,
            };
            span_in_catalog || candidate.special_version.is_some()
        }
        // Issue-level query: exact issue, or a number-less release of a
        // volume that only has one issue.
        Some(issue) => match candidate.issue_number {
            Some(IssueSpan::Single(n)) => n == issue.calculated_issue_number,
            Some(IssueSpan::Range(..)) => false,
            None => volume.issue_catalog.len() == 1,
        },
    }
}
