//! Domain model shared across the Longbox services
//!
//! Volumes and issues describe what the library tracks; `Candidate` describes
//! one scraped release listing that might satisfy part of it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Row identifier of a volume in the library.
pub type VolumeId = i64;

/// Row identifier of an issue in the library.
pub type IssueId = i64;

/// Calculated issue number.
///
/// Issue labels like "1.AU" or "½" are normalized by the library into a
/// floating-point number ("1.5", "0.5") so they can be compared and ordered.
/// The newtype gives that number a total order (`f64::total_cmp`) and a
/// consistent hash so it can key ordered maps and sets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueNumber(f64);

impl IssueNumber {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for IssueNumber {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl PartialEq for IssueNumber {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for IssueNumber {}

impl PartialOrd for IssueNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IssueNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for IssueNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Bit representation agrees with total_cmp equality
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for IssueNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.is_finite() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The issue numbers one release covers: a single issue or a closed range.
///
/// A candidate with no issue coverage at all is `Option<IssueSpan>::None`, so
/// the "both single and range set" shape is unrepresentable. Serialized
/// untagged: providers encode a single issue as a bare number and a range as
/// a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueSpan {
    Single(IssueNumber),
    Range(IssueNumber, IssueNumber),
}

impl IssueSpan {
    pub fn low(&self) -> IssueNumber {
        match *self {
            IssueSpan::Single(n) => n,
            IssueSpan::Range(low, _) => low,
        }
    }

    pub fn high(&self) -> IssueNumber {
        match *self {
            IssueSpan::Single(n) => n,
            IssueSpan::Range(_, high) => high,
        }
    }

    /// Number of issues the span covers, counting both endpoints.
    pub fn width(&self) -> f64 {
        self.high().value() - self.low().value() + 1.0
    }

    pub fn contains(&self, number: IssueNumber) -> bool {
        self.low() <= number && number <= self.high()
    }

    /// Numeric containment overlap; a single issue is a degenerate range.
    pub fn overlaps(&self, other: &IssueSpan) -> bool {
        self.low() <= other.high() && other.low() <= self.high()
    }

    /// A range whose endpoints are out of order. Rejected at intake.
    pub fn is_inverted(&self) -> bool {
        self.low() > self.high()
    }
}

/// Tag for a release that covers a whole volume in one unit rather than a
/// single numbered issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialVersion {
    TradePaperback,
    OneShot,
    HardCover,
    Omnibus,
}

/// One scraped release listing produced by a source provider.
///
/// Candidates are immutable once created; the outcome of match evaluation
/// lives alongside them in `AnnotatedCandidate`, not in the candidate itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Unique identifier/URL of the release. Deduplication key.
    pub link: String,
    /// Raw scraped title of the listing.
    pub display_title: String,
    /// Series name extracted from the listing, used for title comparison.
    pub series: String,
    #[serde(default)]
    pub volume_number: Option<i32>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Issue coverage of the release, when the listing names any.
    #[serde(default)]
    pub issue_number: Option<IssueSpan>,
    /// Set when the release is a whole-volume edition (trade paperback etc.).
    #[serde(default)]
    pub special_version: Option<SpecialVersion>,
    /// Whether the release is an annual.
    #[serde(default)]
    pub annual: bool,
}

/// Metadata of the volume a search runs against.
#[derive(Debug, Clone)]
pub struct VolumeQuery {
    pub title: String,
    pub volume_number: Option<i32>,
    pub year: Option<i32>,
    /// Calculated issue number to release year, for every issue of the
    /// volume. Non-empty for any volume used in matching.
    pub issue_catalog: BTreeMap<IssueNumber, i32>,
}

/// Narrows a search to one issue of a volume.
#[derive(Debug, Clone, Copy)]
pub struct IssueQuery {
    pub calculated_issue_number: IssueNumber,
}
