//! Remote data model and the capability traits transports implement

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors produced by transports (connection, protocol, I/O)
pub type RemoteError = Box<dyn std::error::Error + Send + Sync>;

/// Metadata for a single remote entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Slash-separated path, rooted at the remote tree's root
    pub path: String,
    /// Whether this entry is a directory
    pub is_dir: bool,
    /// File size in bytes (meaningless for directories)
    pub size: u64,
}

impl RemoteEntry {
    /// Create a file entry
    #[must_use]
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            is_dir: false,
            size,
        }
    }

    /// Create a directory entry
    #[must_use]
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_dir: true,
            size: 0,
        }
    }

    /// The final path segment (trailing slashes ignored)
    #[must_use]
    pub fn name(&self) -> &str {
        let trimmed = self.path.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }
}

/// Capability to enumerate a remote directory's immediate children
///
/// Each returned child's `path` must be the child's own full remote path,
/// so it can be passed back into `list` or into a download.
pub trait Lister {
    /// List the immediate children of a remote directory
    ///
    /// # Errors
    /// Returns an error if the path is unreachable or the transport fails.
    fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError>;
}

/// Capability to fetch one remote file to a local path
pub trait Downloader {
    /// Download a single remote file to `dest`, creating/overwriting as
    /// needed. Must not leave a partially-written file behind on failure.
    ///
    /// # Errors
    /// Returns an error if the fetch or the local write fails.
    fn download(&mut self, remote_path: &str, dest: &Path) -> Result<(), RemoteError>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{BTreeMap, HashSet};
    use std::path::Path;

    use super::{Downloader, Lister, RemoteEntry, RemoteError};

    /// In-memory remote tree for exercising the engine and driver
    #[derive(Default)]
    pub(crate) struct FakeRemote {
        dirs: BTreeMap<String, Vec<RemoteEntry>>,
        files: BTreeMap<String, Vec<u8>>,
        fail_list: HashSet<String>,
        fail_download: HashSet<String>,
        /// Every path passed to `list`, in call order
        pub(crate) list_calls: Vec<String>,
    }

    impl FakeRemote {
        pub(crate) fn new() -> Self {
            let mut fake = Self::default();
            fake.dirs.insert("/".to_string(), Vec::new());
            fake
        }

        /// Add a directory, registering it in its parent's listing
        pub(crate) fn dir(&mut self, path: &str) -> &mut Self {
            self.register(RemoteEntry::dir(path));
            self.dirs.entry(path.to_string()).or_default();
            self
        }

        /// Add a file with the given contents
        pub(crate) fn file(&mut self, path: &str, contents: &[u8]) -> &mut Self {
            self.register(RemoteEntry::file(path, contents.len() as u64));
            self.files.insert(path.to_string(), contents.to_vec());
            self
        }

        /// Remove an entry from its parent's listing (and its contents)
        pub(crate) fn remove(&mut self, path: &str) -> &mut Self {
            let parent = Self::parent_of(path);
            if let Some(listing) = self.dirs.get_mut(&parent) {
                listing.retain(|e| e.path != path);
            }
            self.dirs.remove(path);
            self.files.remove(path);
            self
        }

        pub(crate) fn fail_list(&mut self, path: &str) -> &mut Self {
            self.fail_list.insert(path.to_string());
            self
        }

        pub(crate) fn fail_download(&mut self, path: &str) -> &mut Self {
            self.fail_download.insert(path.to_string());
            self
        }

        fn register(&mut self, entry: RemoteEntry) {
            let parent = Self::parent_of(&entry.path);
            self.dirs.entry(parent).or_default().push(entry);
        }

        fn parent_of(path: &str) -> String {
            match path.rfind('/') {
                Some(0) | None => "/".to_string(),
                Some(idx) => path[..idx].to_string(),
            }
        }
    }

    impl Lister for FakeRemote {
        fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
            self.list_calls.push(path.to_string());
            if self.fail_list.contains(path) {
                return Err(format!("listing {path} failed").into());
            }
            self.dirs
                .get(path)
                .cloned()
                .ok_or_else(|| format!("no such remote directory: {path}").into())
        }
    }

    impl Downloader for FakeRemote {
        fn download(&mut self, remote_path: &str, dest: &Path) -> Result<(), RemoteError> {
            if self.fail_download.contains(remote_path) {
                return Err(format!("download of {remote_path} failed").into());
            }
            let contents = self
                .files
                .get(remote_path)
                .ok_or_else(|| format!("no such remote file: {remote_path}"))?;
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(dest, contents)?;
            Ok(())
        }
    }
}
