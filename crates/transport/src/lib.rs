//! dirmirror-transport: transports implementing the core capability traits
//!
//! `FtpTransport` speaks FTP to a remote server; `LocalTransport` serves a
//! local directory tree, mainly for tests and local-to-local mirroring.

pub mod ftp;
pub mod local;

pub use ftp::{FtpConfig, FtpTransport};
pub use local::LocalTransport;

/// Join a remote directory path and a child name with a single slash
pub(crate) fn join_remote(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else if dir.ends_with('/') {
        format!("{dir}{name}")
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::join_remote;

    #[test]
    fn test_join_remote() {
        assert_eq!(join_remote("/pub", "data"), "/pub/data");
        assert_eq!(join_remote("/", "data"), "/data");
        assert_eq!(join_remote("/pub/", "data"), "/pub/data");
        assert_eq!(join_remote("", "data"), "data");
    }
}
