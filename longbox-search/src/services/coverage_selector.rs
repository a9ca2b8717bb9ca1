//! Coverage selection for unattended acquisition
//!
//! From matched, ranked candidates of a whole volume, pick a set that covers
//! every open issue without covering any issue twice and without acquiring
//! anything that is not open. Single greedy pass in rank order: the
//! best-ranked release wins each slot. Intentionally not an optimal set-cover
//! solver; preferring the top-ranked release is the product behavior.

use longbox_common::models::{Candidate, IssueNumber, IssueSpan, VolumeQuery};
use std::collections::BTreeSet;

/// Select a minimal, non-overlapping set of releases for the open issues.
///
/// `candidates` must already be matched and in rank order. `all_open` is true
/// iff `open_issues` equals the volume's full issue set; in that case a
/// whole-volume special release short-circuits the pass and is returned
/// alone.
pub fn select_cover(
    candidates: &[Candidate],
    volume: &VolumeQuery,
    open_issues: &BTreeSet<IssueNumber>,
    all_open: bool,
) -> Vec<Candidate> {
    let mut selected: Vec<Candidate> = Vec::new();
    let mut covered: Vec<IssueSpan> = Vec::new();

    for candidate in candidates {
        if all_open && candidate.special_version.is_some() {
            tracing::debug!(
                link = %candidate.link,
                "Whole-volume special release satisfies a fully open volume"
            );
            return vec![candidate.clone()];
        }

        // Without an issue number or the short-circuit above, a release
        // cannot be attributed to specific open issues.
        let Some(span) = candidate.issue_number else {
            continue;
        };

        let wanted = match span {
            IssueSpan::Range(low, high) => {
                // Every catalog issue inside the range must be open,
                // otherwise the release would acquire an unwanted issue.
                volume
                    .issue_catalog
                    .range(low..=high)
                    .all(|(number, _)| open_issues.contains(number))
            }
            IssueSpan::Single(number) => open_issues.contains(&number),
        };
        if !wanted {
            tracing::debug!(link = %candidate.link, "Release covers an issue that is not open");
            continue;
        }

        if covered.iter().any(|existing| existing.overlaps(&span)) {
            tracing::debug!(link = %candidate.link, "Release overlaps an already selected one");
            continue;
        }

        covered.push(span);
        selected.push(candidate.clone());
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use longbox_common::models::SpecialVersion;
    use std::collections::BTreeMap;

    fn volume(issues: &[(f64, i32)]) -> VolumeQuery {
        VolumeQuery {
            title: "Batman".to_string(),
            volume_number: Some(1),
            year: Some(2020),
            issue_catalog: issues
                .iter()
                .map(|&(number, year)| (IssueNumber::new(number), year))
                .collect(),
        }
    }

    fn open(numbers: &[f64]) -> BTreeSet<IssueNumber> {
        numbers.iter().map(|&n| IssueNumber::new(n)).collect()
    }

    fn candidate(link: &str, issue_number: Option<IssueSpan>) -> Candidate {
        Candidate {
            link: link.to_string(),
            display_title: "Batman".to_string(),
            series: "Batman".to_string(),
            volume_number: Some(1),
            year: Some(2020),
            issue_number,
            special_version: None,
            annual: false,
        }
    }

    fn single(n: f64) -> Option<IssueSpan> {
        Some(IssueSpan::Single(IssueNumber::new(n)))
    }

    fn range(low: f64, high: f64) -> Option<IssueSpan> {
        Some(IssueSpan::Range(IssueNumber::new(low), IssueNumber::new(high)))
    }

    #[test]
    fn range_covering_all_open_issues_is_selected() {
        let volume = volume(&[(1.0, 2020), (2.0, 2020)]);
        let candidates = vec![candidate("range", range(1.0, 2.0))];

        let selected = select_cover(&candidates, &volume, &open(&[1.0, 2.0]), true);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].link, "range");
    }

    #[test]
    fn range_touching_a_closed_issue_is_discarded() {
        let volume = volume(&[(1.0, 2020), (2.0, 2020)]);
        let candidates = vec![candidate("range", range(1.0, 2.0))];

        // Issue 1 already has a file; acquiring the range would re-download it
        let selected = select_cover(&candidates, &volume, &open(&[2.0]), false);
        assert!(selected.is_empty());

        let candidates = vec![
            candidate("range", range(1.0, 2.0)),
            candidate("single", single(2.0)),
        ];
        let selected = select_cover(&candidates, &volume, &open(&[2.0]), false);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].link, "single");
    }

    #[test]
    fn duplicate_single_issue_releases_collapse_to_the_best_ranked() {
        let volume = volume(&[(3.0, 2020)]);
        let candidates = vec![
            candidate("first", single(3.0)),
            candidate("second", single(3.0)),
        ];

        let selected = select_cover(&candidates, &volume, &open(&[3.0]), true);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].link, "first");
    }

    #[test]
    fn special_version_short_circuits_a_fully_open_volume() {
        let volume = volume(&[(1.0, 2020), (2.0, 2020)]);
        let mut tpb = candidate("tpb", None);
        tpb.special_version = Some(SpecialVersion::TradePaperback);
        let candidates = vec![candidate("single", single(1.0)), tpb];

        let selected = select_cover(&candidates, &volume, &open(&[1.0, 2.0]), true);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].link, "tpb");
    }

    #[test]
    fn special_version_is_ignored_when_not_all_issues_are_open() {
        let volume = volume(&[(1.0, 2020), (2.0, 2020)]);
        let mut tpb = candidate("tpb", None);
        tpb.special_version = Some(SpecialVersion::TradePaperback);
        let candidates = vec![tpb, candidate("single", single(2.0))];

        let selected = select_cover(&candidates, &volume, &open(&[2.0]), false);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].link, "single");
    }

    #[test]
    fn numberless_releases_are_skipped() {
        let volume = volume(&[(1.0, 2020)]);
        let candidates = vec![candidate("numberless", None)];

        let selected = select_cover(&candidates, &volume, &open(&[1.0]), true);
        assert!(selected.is_empty());
    }

    #[test]
    fn selection_never_overlaps_and_stays_within_open_issues() {
        let volume = volume(&[
            (1.0, 2020),
            (2.0, 2020),
            (3.0, 2020),
            (4.0, 2021),
            (5.0, 2021),
        ]);
        let open_issues = open(&[1.0, 2.0, 3.0, 5.0]);
        let candidates = vec![
            candidate("r1-3", range(1.0, 3.0)),
            candidate("r2-4", range(2.0, 4.0)), // touches closed issue 4
            candidate("s2", single(2.0)),       // overlaps r1-3
            candidate("s4", single(4.0)),       // not open
            candidate("s5", single(5.0)),
        ];

        let selected = select_cover(&candidates, &volume, &open_issues, false);
        let links: Vec<&str> = selected.iter().map(|c| c.link.as_str()).collect();
        assert_eq!(links, vec!["r1-3", "s5"]);

        // Postconditions: pairwise disjoint coverage, all inside open issues
        let spans: Vec<IssueSpan> = selected
            .iter()
            .filter_map(|c| c.issue_number)
            .collect();
        for (i, a) in spans.iter().enumerate() {
            for b in &spans[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
        for span in &spans {
            for (number, _) in volume.issue_catalog.range(span.low()..=span.high()) {
                assert!(open_issues.contains(number));
            }
        }
    }
}
