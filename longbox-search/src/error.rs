//! Error types for the search engine

use longbox_common::models::{IssueId, VolumeId};
use thiserror::Error;

/// Search engine errors.
///
/// A missing volume or issue is a precondition violation and surfaces to the
/// caller; it is never folded into an empty result list. Provider failures do
/// not appear here: they are recovered inside the search as zero candidates
/// for the failed query.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No volume with this id exists in the library
    #[error("Volume {0} not found in library")]
    VolumeNotFound(VolumeId),

    /// No issue with this id exists in the library
    #[error("Issue {0} not found in library")]
    IssueNotFound(IssueId),

    /// Library collaborator failure
    #[error("Library error: {0}")]
    Library(#[from] longbox_common::Error),
}
