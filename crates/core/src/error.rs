//! Error taxonomy for one synchronization pass

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::remote::RemoteError;

/// Errors that abort a synchronization pass
///
/// Every variant is fatal for the pass it occurs in: nothing is retried
/// or swallowed, and the driver's loop stops on the first failed pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A local directory could not be read during diffing
    #[error("failed to list local directory {path}")]
    LocalList {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A remote listing failed (transport, auth, network)
    #[error("failed to list remote directory {path}")]
    RemoteList {
        path: String,
        #[source]
        source: RemoteError,
    },

    /// Recursive removal of a local path failed
    #[error("failed to delete local path {path}")]
    LocalDelete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A single-file fetch or the local write of its contents failed
    #[error("failed to download {path} to {dest}")]
    RemoteDownload {
        path: String,
        dest: PathBuf,
        #[source]
        source: RemoteError,
    },
}
