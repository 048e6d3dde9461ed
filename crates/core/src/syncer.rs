//! The sync driver: applies agendas and loops on a fixed interval

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::agenda::{self, Agenda};
use crate::error::SyncError;
use crate::local;
use crate::remote::{Downloader, Lister, RemoteEntry};

/// Seconds between passes when no interval is configured
const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// Counters from one completed pass, for reporting only
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Local paths removed (each may have been a whole subtree)
    pub deleted: usize,
    /// Individual files fetched, including those inside new directories
    pub files_downloaded: usize,
    /// Total remote bytes fetched
    pub bytes_downloaded: u64,
}

/// Keeps a local directory mirroring a remote one
///
/// One `Syncer` owns its transport; all access is from the single calling
/// thread, so the connection handle needs no locking.
pub struct Syncer<T> {
    local_root: PathBuf,
    remote_root: String,
    interval: Duration,
    transport: T,
}

impl<T: Lister + Downloader> Syncer<T> {
    /// Create a syncer mirroring `remote_root` into `local_root`
    #[must_use]
    pub fn new(
        local_root: impl Into<PathBuf>,
        remote_root: impl Into<String>,
        transport: T,
    ) -> Self {
        Self {
            local_root: local_root.into(),
            remote_root: remote_root.into(),
            interval: DEFAULT_INTERVAL,
            transport,
        }
    }

    /// Set the time between passes, measured from pass start
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Access the transport, e.g. to disconnect or inspect it
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Run the sync loop until the first failed pass
    ///
    /// The interval is measured from pass start: a slow pass shortens the
    /// following sleep, and a pass longer than the interval starts the next
    /// one immediately. The loop never retries a failed pass.
    ///
    /// # Errors
    /// Returns the error of the first failed pass. Never returns `Ok`.
    pub fn run(&mut self) -> Result<(), SyncError> {
        loop {
            let wake = Instant::now() + self.interval;

            match self.sync_once() {
                Ok(summary) => info!(
                    deleted = summary.deleted,
                    files = summary.files_downloaded,
                    bytes = summary.bytes_downloaded,
                    "pass complete"
                ),
                Err(err) => {
                    error!(error = %err, "synchronization failed");
                    return Err(err);
                }
            }

            let now = Instant::now();
            if wake > now {
                std::thread::sleep(wake - now);
            }
        }
    }

    /// Compute the agenda for one pass without applying it
    ///
    /// # Errors
    /// Propagates any listing error from the diff.
    pub fn plan(&mut self) -> Result<Agenda, SyncError> {
        agenda::compute_agenda(&self.local_root, &self.remote_root, &mut self.transport)
    }

    /// Perform one full synchronization pass
    ///
    /// Diffs the trees, applies every deletion in order, then materializes
    /// every download in order. The first error aborts the rest of the
    /// pass; anything already applied stays applied.
    ///
    /// # Errors
    /// Returns the first listing, deletion, or download error.
    pub fn sync_once(&mut self) -> Result<PassSummary, SyncError> {
        let agenda = self.plan()?;
        let mut summary = PassSummary::default();

        // Deletions first: a type-changed path must be gone before its
        // replacement is written.
        for path in &agenda.to_delete {
            info!(path = %path.display(), "removing local entry");
            local::remove_recursively(path).map_err(|source| SyncError::LocalDelete {
                path: path.clone(),
                source,
            })?;
            summary.deleted += 1;
        }

        for download in &agenda.to_download {
            Self::download(
                &mut self.transport,
                &download.entry,
                &download.dest,
                &mut summary,
            )?;
        }

        Ok(summary)
    }

    /// Materialize one remote entry at a local destination
    ///
    /// Directories are created locally, then every remote child is fetched
    /// recursively with no further diffing: by construction of the agenda,
    /// nothing can already exist locally under a path that was absent when
    /// the pass started.
    fn download(
        transport: &mut T,
        entry: &RemoteEntry,
        dest: &Path,
        summary: &mut PassSummary,
    ) -> Result<(), SyncError> {
        info!(remote = %entry.path, dest = %dest.display(), "downloading");

        if !entry.is_dir {
            transport
                .download(&entry.path, dest)
                .map_err(|source| SyncError::RemoteDownload {
                    path: entry.path.clone(),
                    dest: dest.to_path_buf(),
                    source,
                })?;
            summary.files_downloaded += 1;
            summary.bytes_downloaded += entry.size;
            return Ok(());
        }

        std::fs::create_dir_all(dest).map_err(|source| SyncError::RemoteDownload {
            path: entry.path.clone(),
            dest: dest.to_path_buf(),
            source: Box::new(source),
        })?;

        let children = transport
            .list(&entry.path)
            .map_err(|source| SyncError::RemoteList {
                path: entry.path.clone(),
                source,
            })?;

        for child in &children {
            Self::download(transport, child, &dest.join(child.name()), summary)?;
        }
        Ok(())
    }
}
