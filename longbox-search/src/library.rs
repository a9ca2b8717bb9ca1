//! Collaborator interfaces onto library state
//!
//! The engine never touches storage directly: volume/issue metadata, monitor
//! flags, file associations and the blocklist are read through these traits.
//! Deployments back them with the library database; tests back them with
//! in-memory fakes.

use async_trait::async_trait;
use longbox_common::models::{IssueId, IssueNumber, IssueQuery, VolumeId, VolumeQuery};
use std::collections::BTreeSet;

/// The monitored, file-less issues of a volume.
#[derive(Debug, Clone, Default)]
pub struct OpenIssues {
    /// Calculated issue numbers still wanted for the volume.
    pub issues: BTreeSet<IssueNumber>,
    /// True when `issues` equals the volume's full issue set.
    pub all_open: bool,
}

/// Read access to volume and issue metadata.
///
/// Lookup methods return `Ok(None)` for an unknown id; the flag methods
/// (`issue_has_file` and the monitor checks) should return
/// `Error::NotFound` instead, since a flag for a missing row has no value.
#[async_trait]
pub trait Library: Send + Sync {
    /// Volume metadata and its issue catalog.
    async fn volume(&self, volume_id: VolumeId) -> longbox_common::Result<Option<VolumeQuery>>;

    /// Metadata of one issue of a volume.
    async fn issue(
        &self,
        volume_id: VolumeId,
        issue_id: IssueId,
    ) -> longbox_common::Result<Option<IssueQuery>>;

    /// Monitored issues of the volume that have no file yet.
    async fn open_issues(&self, volume_id: VolumeId) -> longbox_common::Result<OpenIssues>;

    /// Whether the issue already has an associated file.
    async fn issue_has_file(&self, issue_id: IssueId) -> longbox_common::Result<bool>;

    /// Whether the issue is monitored for acquisition.
    async fn issue_monitored(&self, issue_id: IssueId) -> longbox_common::Result<bool>;

    /// Whether the volume is monitored for acquisition.
    async fn volume_monitored(&self, volume_id: VolumeId) -> longbox_common::Result<bool>;
}

/// Pure predicate over the persisted blocklist.
pub trait Blocklist: Send + Sync {
    fn is_blocklisted(&self, link: &str) -> bool;
}
