//! The diff engine: breadth-first tree comparison producing an Agenda

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SyncError;
use crate::local::{self, LocalEntry};
use crate::remote::{Lister, RemoteEntry};

/// One remote entry to materialize at a local destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// The remote entry (file or whole directory subtree)
    pub entry: RemoteEntry,
    /// Local path it should appear at
    pub dest: PathBuf,
}

/// The plan produced by one diff pass: deletions first, then downloads
///
/// An agenda is single-use: created fresh each pass, applied immediately,
/// then discarded. Nothing persists across passes.
#[derive(Debug, Default)]
pub struct Agenda {
    /// Local paths (files or whole subtrees) with no remote counterpart
    pub to_delete: Vec<PathBuf>,
    /// Remote entries absent locally, with their local destinations
    pub to_download: Vec<Download>,
}

impl Agenda {
    /// Check if the pass has nothing to do
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_download.is_empty()
    }

    /// Total number of planned operations
    #[must_use]
    pub fn len(&self) -> usize {
        self.to_delete.len() + self.to_download.len()
    }
}

/// Compare a local and a remote tree and plan the deletions and downloads
/// that make the local tree match the remote one.
///
/// Breadth-first, level order: each frontier node is one matched pair of
/// directories. Entries are matched by name, type, and (for files) size;
/// a changed file therefore shows up as a deletion plus a download in the
/// same agenda, never as an in-place update. The traversal descends only
/// into directories that matched on both sides; an unmatched subtree is a
/// single deletion or a single download entry, with deep materialization
/// deferred to the driver.
///
/// # Errors
/// Returns `SyncError::LocalList` if a local directory cannot be read and
/// `SyncError::RemoteList` if a remote listing fails. Either aborts the
/// diff with no partial agenda.
pub fn compute_agenda(
    local_root: &Path,
    remote_root: &str,
    remote: &mut impl Lister,
) -> Result<Agenda, SyncError> {
    let mut agenda = Agenda::default();
    let mut frontier: VecDeque<(PathBuf, String)> = VecDeque::new();
    frontier.push_back((local_root.to_path_buf(), remote_root.to_string()));

    while let Some((local_dir, remote_dir)) = frontier.pop_front() {
        let local_listing = local::list_dir(&local_dir).map_err(|source| SyncError::LocalList {
            path: local_dir.clone(),
            source,
        })?;
        let remote_listing = remote.list(&remote_dir).map_err(|source| SyncError::RemoteList {
            path: remote_dir.clone(),
            source,
        })?;

        debug!(
            local = %local_dir.display(),
            remote = %remote_dir,
            "comparing directory pair"
        );

        // Local side: unmatched entries are deleted, matched directories
        // are queued for comparison one level deeper.
        for local_entry in &local_listing {
            let local_path = local_dir.join(&local_entry.file_name);
            match remote_listing.iter().find(|r| entries_match(local_entry, r)) {
                None => agenda.to_delete.push(local_path),
                Some(matched) if local_entry.is_dir => {
                    frontier.push_back((local_path, matched.path.clone()));
                }
                Some(_) => {}
            }
        }

        // Remote side: unmatched entries are downloaded to `local_dir/name`.
        // A changed file fails to match in both scans, so its old version is
        // already queued for deletion above.
        for remote_entry in &remote_listing {
            let matched = local_listing.iter().any(|l| entries_match(l, remote_entry));
            if !matched {
                agenda.to_download.push(Download {
                    entry: remote_entry.clone(),
                    dest: local_dir.join(remote_entry.name()),
                });
            }
        }
    }

    Ok(agenda)
}

/// The match rule: same name, same type, and (for files) same size.
///
/// Modification time and content are never consulted. Non-UTF-8 local
/// names are compared lossily; they can never equal a remote name, so
/// they fall out as deletions.
fn entries_match(local: &LocalEntry, remote: &RemoteEntry) -> bool {
    if local.file_name.to_string_lossy() != remote.name() {
        return false;
    }
    if local.is_dir != remote.is_dir {
        return false;
    }
    local.is_dir || local.size == remote.size
}
