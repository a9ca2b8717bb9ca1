//! Search orchestration
//!
//! Builds query strings from volume/issue metadata, fans them out to the
//! source provider, and runs the evaluation, ranking and (for unattended
//! searches) coverage selection over the merged results.
//!
//! The fan-out is cooperative on one logical thread: all template fetches are
//! outstanding at once and joined at a single point, then concatenated in
//! template order so the ranking input is deterministic for identical
//! provider responses. A failed template contributes zero candidates rather
//! than failing the search.

use crate::error::SearchError;
use crate::library::{Blocklist, Library};
use crate::services::coverage_selector::select_cover;
use crate::services::match_evaluator::{evaluate, AnnotatedCandidate};
use crate::services::result_ranker::rank;
use crate::sources::SourceProvider;
use longbox_common::models::{Candidate, IssueId, IssueQuery, IssueSpan, VolumeId, VolumeQuery};
use std::collections::HashMap;

/// Release search over one library, blocklist and source provider.
///
/// Holds no state across calls beyond its collaborators; every search works
/// on per-call data only.
pub struct Searcher<L, B, P> {
    library: L,
    blocklist: B,
    provider: P,
}

impl<L, B, P> Searcher<L, B, P>
where
    L: Library,
    B: Blocklist,
    P: SourceProvider,
{
    pub fn new(library: L, blocklist: B, provider: P) -> Self {
        Self {
            library,
            blocklist,
            provider,
        }
    }

    /// Search for a volume or one of its issues and return every candidate,
    /// annotated with its match verdict, best result first.
    pub async fn manual_search(
        &self,
        volume_id: VolumeId,
        issue_id: Option<IssueId>,
    ) -> Result<Vec<AnnotatedCandidate>, SearchError> {
        let volume = self
            .library
            .volume(volume_id)
            .await?
            .ok_or(SearchError::VolumeNotFound(volume_id))?;
        let issue = match issue_id {
            Some(issue_id) => Some(
                self.library
                    .issue(volume_id, issue_id)
                    .await?
                    .ok_or(SearchError::IssueNotFound(issue_id))?,
            ),
            None => None,
        };

        tracing::info!(
            volume_id,
            title = %volume.title,
            issue = ?issue.map(|i| i.calculated_issue_number.value()),
            "Starting manual search"
        );

        let queries = build_queries(&volume, issue.as_ref());
        let fetches = queries
            .iter()
            .map(|query| self.provider.fetch_candidates(query));
        let pages = futures::future::join_all(fetches).await;

        let mut merged: Vec<Candidate> = Vec::new();
        for (query, page) in queries.iter().zip(pages) {
            match page {
                Ok(candidates) => merged.extend(candidates),
                Err(error) => {
                    tracing::warn!(
                        query = %query,
                        error = %error,
                        "Source query failed, continuing with remaining queries"
                    );
                }
            }
        }

        let mut results: Vec<AnnotatedCandidate> = dedupe_by_link(merged)
            .into_iter()
            .map(|candidate| {
                let rejection = evaluate(&candidate, &volume, issue.as_ref(), &self.blocklist);
                AnnotatedCandidate {
                    candidate,
                    rejection,
                }
            })
            .collect();

        rank(&mut results, &volume, issue.as_ref());

        tracing::debug!(volume_id, results = results.len(), "Manual search complete");
        Ok(results)
    }

    /// Search unattended and pick results safe to acquire automatically.
    ///
    /// Returns an empty list whenever no safe choice exists: unmonitored
    /// volume or issue, an issue that already has a file, or no open issues.
    /// The unmonitored and file checks run before any provider traffic.
    pub async fn auto_search(
        &self,
        volume_id: VolumeId,
        issue_id: Option<IssueId>,
    ) -> Result<Vec<Candidate>, SearchError> {
        if !self.library.volume_monitored(volume_id).await? {
            tracing::debug!(volume_id, "Volume is unmonitored, skipping auto search");
            return Ok(Vec::new());
        }

        tracing::info!(volume_id, issue_id, "Starting auto search");

        match issue_id {
            Some(issue_id) => {
                if !self.library.issue_monitored(issue_id).await? {
                    tracing::debug!(issue_id, "Issue is unmonitored, skipping auto search");
                    return Ok(Vec::new());
                }
                if self.library.issue_has_file(issue_id).await? {
                    tracing::debug!(issue_id, "Issue already has a file, skipping auto search");
                    return Ok(Vec::new());
                }

                let results = self.manual_search(volume_id, Some(issue_id)).await?;
                let best = results
                    .into_iter()
                    .find(AnnotatedCandidate::is_match)
                    .map(|result| result.candidate);
                tracing::debug!(issue_id, found = best.is_some(), "Auto search complete");
                Ok(best.into_iter().collect())
            }
            None => {
                let open = self.library.open_issues(volume_id).await?;
                if open.issues.is_empty() {
                    tracing::debug!(volume_id, "No open issues, skipping auto search");
                    return Ok(Vec::new());
                }

                let results = self.manual_search(volume_id, None).await?;
                let matched: Vec<Candidate> = results
                    .into_iter()
                    .filter(AnnotatedCandidate::is_match)
                    .map(|result| result.candidate)
                    .collect();

                let volume = self
                    .library
                    .volume(volume_id)
                    .await?
                    .ok_or(SearchError::VolumeNotFound(volume_id))?;
                let selection = select_cover(&matched, &volume, &open.issues, open.all_open);
                tracing::debug!(
                    volume_id,
                    matched = matched.len(),
                    selected = selection.len(),
                    "Auto search complete"
                );
                Ok(selection)
            }
        }
    }
}

/// Build the provider query strings for a volume or issue search.
///
/// Colons confuse the search providers and are stripped from the title. The
/// year segment is dropped when no year is known, and `Vol.`-bearing
/// templates are dropped when no volume number is known.
fn build_queries(volume: &VolumeQuery, issue: Option<&IssueQuery>) -> Vec<String> {
    let title = volume.title.replace(':', "");
    let mut templates: Vec<String> = Vec::new();

    match issue {
        None => {
            if let (Some(number), Some(year)) = (volume.volume_number, volume.year) {
                templates.push(format!("{title} Vol. {number} ({year})"));
            }
            match volume.year {
                Some(year) => templates.push(format!("{title} ({year})")),
                None => templates.push(title.clone()),
            }
            if let Some(number) = volume.volume_number {
                templates.push(format!("{title} Vol. {number}"));
            }
        }
        Some(issue) => {
            let issue_number = issue.calculated_issue_number;
            if let Some(year) = volume.year {
                templates.push(format!("{title} #{issue_number} ({year})"));
            }
            if let Some(number) = volume.volume_number {
                templates.push(format!("{title} Vol. {number} #{issue_number}"));
            }
            templates.push(format!("{title} #{issue_number}"));
        }
    }

    let mut queries: Vec<String> = Vec::new();
    for template in templates {
        let query = template.trim().to_string();
        if !queries.contains(&query) {
            queries.push(query);
        }
    }
    queries
}

/// Deduplicate merged results by link and drop malformed candidates.
///
/// Multiple query templates return overlapping listings; the last-seen
/// candidate wins while the first-seen position is kept. Candidates with an
/// inverted issue range are dropped here so nothing downstream sees them.
fn dedupe_by_link(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut position_by_link: HashMap<String, usize> = HashMap::new();
    let mut deduped: Vec<Candidate> = Vec::new();

    for candidate in candidates {
        if let Some(span @ IssueSpan::Range(..)) = candidate.issue_number {
            if span.is_inverted() {
                tracing::warn!(
                    link = %candidate.link,
                    "Dropping candidate with inverted issue range"
                );
                continue;
            }
        }

        match position_by_link.get(&candidate.link) {
            Some(&position) => deduped[position] = candidate,
            None => {
                position_by_link.insert(candidate.link.clone(), deduped.len());
                deduped.push(candidate);
            }
        }
    }

    deduped
}

#[cfg(test)]
mod tests {
    use super::*;
    use longbox_common::models::IssueNumber;
    use std::collections::BTreeMap;

    fn volume(volume_number: Option<i32>, year: Option<i32>) -> VolumeQuery {
        VolumeQuery {
            title: "Batman: Year One".to_string(),
            volume_number,
            year,
            issue_catalog: BTreeMap::from([(IssueNumber::new(1.0), 1987)]),
        }
    }

    #[test]
    fn volume_queries_cover_all_templates() {
        let queries = build_queries(&volume(Some(2), Some(1987)), None);
        assert_eq!(
            queries,
            vec![
                "Batman Year One Vol. 2 (1987)",
                "Batman Year One (1987)",
                "Batman Year One Vol. 2",
            ]
        );
    }

    #[test]
    fn missing_year_drops_year_segment() {
        let queries = build_queries(&volume(Some(2), None), None);
        assert_eq!(
            queries,
            vec!["Batman Year One", "Batman Year One Vol. 2"]
        );
    }

    #[test]
    fn missing_volume_number_drops_vol_templates() {
        let queries = build_queries(&volume(None, Some(1987)), None);
        assert_eq!(queries, vec!["Batman Year One (1987)"]);

        let queries = build_queries(&volume(None, None), None);
        assert_eq!(queries, vec!["Batman Year One"]);
    }

    #[test]
    fn issue_queries_carry_the_issue_number() {
        let issue = IssueQuery {
            calculated_issue_number: IssueNumber::new(1.5),
        };
        let queries = build_queries(&volume(Some(2), Some(1987)), Some(&issue));
        assert_eq!(
            queries,
            vec![
                "Batman Year One #1.5 (1987)",
                "Batman Year One Vol. 2 #1.5",
                "Batman Year One #1.5",
            ]
        );

        let queries = build_queries(&volume(None, None), Some(&issue));
        assert_eq!(queries, vec!["Batman Year One #1.5"]);
    }

    fn candidate(link: &str, series: &str) -> Candidate {
        Candidate {
            link: link.to_string(),
            display_title: series.to_string(),
            series: series.to_string(),
            volume_number: None,
            year: None,
            issue_number: None,
            special_version: None,
            annual: false,
        }
    }

    #[test]
    fn dedupe_keeps_first_position_with_last_value() {
        let deduped = dedupe_by_link(vec![
            candidate("a", "first a"),
            candidate("b", "first b"),
            candidate("a", "second a"),
        ]);

        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].link, "a");
        assert_eq!(deduped[0].series, "second a");
        assert_eq!(deduped[1].link, "b");
    }

    #[test]
    fn dedupe_drops_inverted_ranges() {
        let mut inverted = candidate("a", "a");
        inverted.issue_number = Some(IssueSpan::Range(
            IssueNumber::new(5.0),
            IssueNumber::new(1.0),
        ));

        let deduped = dedupe_by_link(vec![inverted, candidate("b", "b")]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].link, "b");
    }
}
