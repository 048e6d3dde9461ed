//! Cargo-style status output for mirror passes
//!
//! Displays progress in the familiar cargo format:
//! ```text
//!     Deleting /srv/mirror/stale.log
//!     Fetching /pub/data/report.csv -> /srv/mirror/report.csv
//!      Planned 1 deletion, 1 download
//!     Mirrored 2 deleted, 14 files (3.1 MiB) fetched in 1.84s
//! ```

use std::io::Write as _;
use std::time::Instant;

use dirmirror_core::{Agenda, PassSummary};

/// Status verbs (right-aligned to 12 chars)
struct Status;

impl Status {
    const DELETING: &str = "Deleting";
    const FETCHING: &str = "Fetching";
    const PLANNED: &str = "Planned";
    const MIRRORED: &str = "Mirrored";
}

/// Print a cargo-style status line
fn print_status(status: &str, message: &str) {
    let mut term = console::Term::stderr();
    let style = console::Style::new().green().bold();
    let _ = writeln!(term, "{:>12} {}", style.apply_to(status), message);
}

/// Print a computed agenda without applying it (dry-run output)
pub fn print_agenda(agenda: &Agenda) {
    for path in &agenda.to_delete {
        print_status(Status::DELETING, &path.display().to_string());
    }
    for download in &agenda.to_download {
        let detail = if download.entry.is_dir {
            "(directory)".to_string()
        } else {
            format!("({})", humansize::format_size(download.entry.size, humansize::BINARY))
        };
        print_status(
            Status::FETCHING,
            &format!(
                "{} -> {} {detail}",
                download.entry.path,
                download.dest.display()
            ),
        );
    }
    print_status(
        Status::PLANNED,
        &format!(
            "{} deletions, {} downloads",
            agenda.to_delete.len(),
            agenda.to_download.len()
        ),
    );
}

/// Elapsed-time tracker for one mirror pass
pub struct MirrorStatus {
    start: Instant,
}

impl MirrorStatus {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Show the final summary for an applied pass
    pub fn mirrored(&self, summary: &PassSummary) {
        let elapsed = self.start.elapsed();
        let elapsed_str = if elapsed.as_secs() >= 1 {
            format!("{:.2}s", elapsed.as_secs_f64())
        } else {
            format!("{}ms", elapsed.as_millis())
        };
        let bytes = humansize::format_size(summary.bytes_downloaded, humansize::BINARY);
        print_status(
            Status::MIRRORED,
            &format!(
                "{} deleted, {} files ({bytes}) fetched in {elapsed_str}",
                summary.deleted, summary.files_downloaded
            ),
        );
    }
}

impl Default for MirrorStatus {
    fn default() -> Self {
        Self::new()
    }
}
