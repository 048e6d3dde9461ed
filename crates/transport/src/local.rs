//! Local in-process transport for testing
//!
//! Serves an ordinary local directory tree through the remote capability
//! traits, where "remote paths" are plain slash-separated filesystem paths.
//! Useful for end-to-end tests without a server, and for local-to-local
//! mirroring.

use std::path::Path;

use dirmirror_core::{Downloader, Lister, RemoteEntry, RemoteError, local};

use crate::join_remote;

/// Transport reading from the local filesystem (no network)
#[derive(Debug, Default)]
pub struct LocalTransport;

impl LocalTransport {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Lister for LocalTransport {
    fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        let entries = local::list_dir(Path::new(path))?;
        Ok(entries
            .into_iter()
            .map(|e| RemoteEntry {
                path: join_remote(path, &e.file_name.to_string_lossy()),
                is_dir: e.is_dir,
                size: e.size,
            })
            .collect())
    }
}

impl Downloader for LocalTransport {
    fn download(&mut self, remote_path: &str, dest: &Path) -> Result<(), RemoteError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(Path::new(remote_path), dest)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_returns_full_child_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let root = dir.path().to_str().unwrap().to_string();
        let entries = LocalTransport::new().list(&root).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, format!("{root}/a.txt"));
        assert!(!entries[0].is_dir);
        assert_eq!(entries[0].size, 5);
        assert_eq!(entries[1].path, format!("{root}/sub"));
        assert!(entries[1].is_dir);
    }

    #[test]
    fn test_list_missing_directory_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope").to_str().unwrap().to_string();
        assert!(LocalTransport::new().list(&missing).is_err());
    }

    #[test]
    fn test_download_copies_and_creates_parents() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(src.path().join("f"), "payload").unwrap();

        let dest = dst.path().join("deep/nested/f");
        LocalTransport::new()
            .download(src.path().join("f").to_str().unwrap(), &dest)
            .unwrap();

        assert_eq!(fs::read(dest).unwrap(), b"payload");
    }

    #[test]
    fn test_download_missing_source_is_error() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let result = LocalTransport::new().download(
            src.path().join("absent").to_str().unwrap(),
            &dst.path().join("out"),
        );
        assert!(result.is_err());
    }
}
