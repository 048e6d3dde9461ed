//! FTP transport: Lister and Downloader over a remote FTP server
//!
//! Connects lazily on first use and health-checks the connection with NOOP
//! before each operation, reconnecting if the server went away. Reconnection
//! is this transport's own concern; the core treats it as opaque.

use std::io;
use std::path::Path;

use suppaftp::list::File;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};
use tracing::{debug, info};

use dirmirror_core::{Downloader, Lister, RemoteEntry, RemoteError};

use crate::join_remote;

/// Connection settings for an FTP server
#[derive(Debug, Clone)]
pub struct FtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
}

/// FTP client implementing the core capability traits
///
/// Holds at most one control connection; all access is from a single
/// thread, so no locking is needed.
pub struct FtpTransport {
    config: FtpConfig,
    conn: Option<FtpStream>,
}

impl FtpTransport {
    /// Create a transport without connecting
    #[must_use]
    pub fn new(config: FtpConfig) -> Self {
        Self { config, conn: None }
    }

    /// Shut down the connection; idempotent
    pub fn disconnect(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            let _ = conn.quit();
        }
    }

    fn connect(&mut self) -> Result<(), RemoteError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        debug!(addr = %addr, "connecting");

        let mut conn = FtpStream::connect(&addr)?;
        if let Err(err) = conn.login(&self.config.user, &self.config.password) {
            let _ = conn.quit();
            return Err(err.into());
        }
        if let Err(err) = conn.transfer_type(FileType::Binary) {
            let _ = conn.quit();
            return Err(err.into());
        }

        info!(host = %self.config.host, user = %self.config.user, "connected");
        self.conn = Some(conn);
        Ok(())
    }

    fn ensure_connected(&mut self) -> Result<&mut FtpStream, RemoteError> {
        if let Some(conn) = self.conn.as_mut() {
            if conn.noop().is_err() {
                self.disconnect();
            }
        }
        if self.conn.is_none() {
            self.connect()?;
        }
        Ok(self.conn.as_mut().expect("connection established above"))
    }
}

impl Drop for FtpTransport {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl Lister for FtpTransport {
    fn list(&mut self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        let conn = self.ensure_connected()?;
        let lines = match conn.list(Some(path)) {
            Ok(lines) => lines,
            Err(err) => {
                self.disconnect();
                return Err(err.into());
            }
        };
        parse_listing(path, &lines)
    }
}

impl Downloader for FtpTransport {
    fn download(&mut self, remote_path: &str, dest: &Path) -> Result<(), RemoteError> {
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = self.ensure_connected()?;
        let result = conn.retr(remote_path, |reader| {
            let mut file = std::fs::File::create(dest).map_err(FtpError::ConnectionError)?;
            io::copy(reader, &mut file).map_err(FtpError::ConnectionError)?;
            Ok(())
        });

        if let Err(err) = result {
            // Never leave a partially-written file behind
            let _ = std::fs::remove_file(dest);
            self.disconnect();
            return Err(err.into());
        }
        Ok(())
    }
}

/// Parse LIST output lines into remote entries
///
/// An unparseable line is a hard error: a silently dropped remote entry
/// would get its local counterpart deleted on the next diff.
fn parse_listing(dir: &str, lines: &[String]) -> Result<Vec<RemoteEntry>, RemoteError> {
    let mut entries = Vec::with_capacity(lines.len());
    for line in lines {
        let file = File::try_from(line.as_str())
            .map_err(|err| format!("unparseable LIST line {line:?} in {dir}: {err}"))?;
        let name = file.name();
        if name == "." || name == ".." {
            continue;
        }
        entries.push(RemoteEntry {
            path: join_remote(dir, name),
            is_dir: file.is_directory(),
            size: if file.is_directory() {
                0
            } else {
                file.size() as u64
            },
        });
    }
    Ok(entries)
}
