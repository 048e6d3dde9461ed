//! dirmirror-core: One-way directory mirroring engine
//!
//! Provides the tree diffing algorithm (`compute_agenda`) and the sync
//! driver (`Syncer`) that applies the resulting deletions and downloads.

pub mod agenda;
pub mod error;
pub mod local;
pub mod remote;
pub mod syncer;

pub use agenda::{Agenda, Download, compute_agenda};
pub use error::SyncError;
pub use remote::{Downloader, Lister, RemoteEntry, RemoteError};
pub use syncer::{PassSummary, Syncer};
