//! Thin local filesystem primitives consumed by the engine and driver

use std::ffi::OsString;
use std::io;
use std::path::Path;

/// Metadata for one immediate child of a local directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalEntry {
    /// The entry's file name (not a full path)
    pub file_name: OsString,
    /// Whether the entry is a directory (symlinks are never directories)
    pub is_dir: bool,
    /// File size in bytes (meaningless for directories)
    pub size: u64,
}

/// List the immediate children of a local directory, sorted by name
///
/// Symlink metadata is not followed, so a symlink to a directory is
/// reported as a non-directory and will never be descended into.
///
/// # Errors
/// Returns an error if the directory is missing or unreadable.
pub fn list_dir(path: &Path) -> io::Result<Vec<LocalEntry>> {
    let mut entries = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        entries.push(LocalEntry {
            file_name: entry.file_name(),
            is_dir: metadata.is_dir(),
            size: metadata.len(),
        });
    }
    // Sort for deterministic agenda ordering
    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

/// Remove a local path and everything underneath it
///
/// A path that is already absent is not an error. Symlinks are removed
/// as links, never followed.
///
/// # Errors
/// Returns an error if the removal itself fails.
pub fn remove_recursively(path: &Path) -> io::Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => std::fs::remove_dir_all(path),
        Ok(_) => std::fs::remove_file(path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_list_dir_sorted_with_types_and_sizes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "world!").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("a.txt"), "hello").unwrap();

        let entries = list_dir(dir.path()).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.file_name.clone()).collect();
        assert_eq!(names, ["a.txt", "b.txt", "sub"]);
        assert!(!entries[0].is_dir);
        assert_eq!(entries[0].size, 5);
        assert_eq!(entries[1].size, 6);
        assert!(entries[2].is_dir);
    }

    #[test]
    fn test_list_dir_missing_is_error() {
        let dir = TempDir::new().unwrap();
        assert!(list_dir(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn test_remove_recursively_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("gone.txt");
        fs::write(&file, "x").unwrap();

        remove_recursively(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_remove_recursively_directory_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/deep.txt"), "deep").unwrap();
        fs::write(root.join("top.txt"), "top").unwrap();

        remove_recursively(&root).unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_remove_recursively_absent_is_ok() {
        let dir = TempDir::new().unwrap();
        remove_recursively(&dir.path().join("never-existed")).unwrap();
    }
}
