//! dirmirror: one-way FTP directory mirroring
//!
//! Keeps a local directory matching a remote FTP tree by name, type, and
//! size: extras are deleted locally, missing or changed entries are
//! re-downloaded. One pass is fully serial; `watch` repeats it on a fixed
//! interval until the first failure.

mod config;
mod progress;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand, builder::Styles};
use color_eyre::Result;
use color_eyre::eyre::{bail, eyre};
use tracing::info;

use dirmirror_core::{Lister as _, Syncer, compute_agenda};
use dirmirror_transport::{FtpConfig, FtpTransport};

use config::Profile;

const DEFAULT_PORT: u16 = 21;
const DEFAULT_USER: &str = "anonymous";
const DEFAULT_INTERVAL_SECS: u64 = 300;

/// Environment variable consulted before prompting for a password
const PASSWORD_ENV: &str = "DIRMIRROR_PASSWORD";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::Red.on_default());

#[derive(Parser)]
#[command(name = "dirmirror")]
#[command(version)]
#[command(styles = STYLES)]
#[command(about = "One-way FTP directory mirroring")]
#[command(long_about = r#"
dirmirror keeps a local directory matching a remote FTP tree.

Entries are compared by name, type, and size; local extras are deleted
and remote extras are downloaded, deletions first. There is no content
hashing and no retry: a failed pass stops the run.

Examples:
  dirmirror sync ftp.example.com /pub/data ./mirror     One pass
  dirmirror sync --dry-run -c site.toml                 Print the plan
  dirmirror watch ftp.example.com /pub/data ./mirror    Poll every 5 min
  dirmirror ls ftp.example.com /pub --format json       List a directory
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one mirror pass
    Sync {
        /// FTP host
        host: Option<String>,

        /// Remote directory to mirror from
        remote: Option<String>,

        /// Local directory to mirror into
        local: Option<PathBuf>,

        /// FTP port
        #[arg(long)]
        port: Option<u16>,

        /// FTP username
        #[arg(short, long)]
        user: Option<String>,

        /// Compute and print the agenda without applying it
        #[arg(long)]
        dry_run: bool,

        /// TOML profile supplying values for omitted arguments
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Mirror continuously on a fixed interval
    Watch {
        /// FTP host
        host: Option<String>,

        /// Remote directory to mirror from
        remote: Option<String>,

        /// Local directory to mirror into
        local: Option<PathBuf>,

        /// FTP port
        #[arg(long)]
        port: Option<u16>,

        /// FTP username
        #[arg(short, long)]
        user: Option<String>,

        /// Seconds between passes, measured from pass start
        #[arg(short, long)]
        interval: Option<u64>,

        /// TOML profile supplying values for omitted arguments
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List a remote directory
    Ls {
        /// FTP host
        host: Option<String>,

        /// Remote directory to list
        remote: Option<String>,

        /// FTP port
        #[arg(long)]
        port: Option<u16>,

        /// FTP username
        #[arg(short, long)]
        user: Option<String>,

        /// Output format (json, summary)
        #[arg(short, long, default_value = "summary")]
        format: String,

        /// TOML profile supplying values for omitted arguments
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Sync {
            host,
            remote,
            local,
            port,
            user,
            dry_run,
            config,
        } => {
            let profile = load_profile(config.as_deref())?;
            let conn = resolve_connection(host, port, user, &profile)?;
            let remote = resolve_remote(remote, &profile)?;
            let local = resolve_local(local, &profile)?;
            sync_command(conn, remote, local, dry_run)
        }
        Commands::Watch {
            host,
            remote,
            local,
            port,
            user,
            interval,
            config,
        } => {
            let profile = load_profile(config.as_deref())?;
            let conn = resolve_connection(host, port, user, &profile)?;
            let remote = resolve_remote(remote, &profile)?;
            let local = resolve_local(local, &profile)?;
            let interval =
                Duration::from_secs(interval.or(profile.interval).unwrap_or(DEFAULT_INTERVAL_SECS));
            watch_command(conn, remote, local, interval)
        }
        Commands::Ls {
            host,
            remote,
            port,
            user,
            format,
            config,
        } => {
            let profile = load_profile(config.as_deref())?;
            let conn = resolve_connection(host, port, user, &profile)?;
            let remote = resolve_remote(remote, &profile)?;
            ls_command(conn, &remote, &format)
        }
    }
}

fn sync_command(conn: FtpConfig, remote: String, local: PathBuf, dry_run: bool) -> Result<()> {
    check_local_root(&local)?;
    let mut transport = FtpTransport::new(conn);

    if dry_run {
        let agenda = compute_agenda(&local, &remote, &mut transport)?;
        progress::print_agenda(&agenda);
        return Ok(());
    }

    info!(remote = %remote, local = %local.display(), "mirroring once");
    let status = progress::MirrorStatus::new();
    let mut syncer = Syncer::new(local, remote, transport);
    let summary = syncer.sync_once()?;
    status.mirrored(&summary);
    Ok(())
}

fn watch_command(
    conn: FtpConfig,
    remote: String,
    local: PathBuf,
    interval: Duration,
) -> Result<()> {
    check_local_root(&local)?;
    info!(
        remote = %remote,
        local = %local.display(),
        interval_secs = interval.as_secs(),
        "mirroring continuously"
    );

    let transport = FtpTransport::new(conn);
    let mut syncer = Syncer::new(local, remote, transport).with_interval(interval);
    syncer.run()?;
    Ok(())
}

fn ls_command(conn: FtpConfig, remote: &str, format: &str) -> Result<()> {
    let mut transport = FtpTransport::new(conn);
    let entries = transport
        .list(remote)
        .map_err(|err| eyre!("failed to list {remote}: {err}"))?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&entries)?;
            eprintln!("{json}");
        }
        _ => {
            for entry in &entries {
                if entry.is_dir {
                    eprintln!("{:>10}  {}/", "-", entry.name());
                } else {
                    let size = humansize::format_size(entry.size, humansize::BINARY);
                    eprintln!("{size:>10}  {}", entry.name());
                }
            }
            eprintln!("{} entries", entries.len());
        }
    }

    Ok(())
}

fn load_profile(path: Option<&Path>) -> Result<Profile> {
    match path {
        Some(path) => Profile::load(path),
        None => Ok(Profile::default()),
    }
}

/// Resolve connection settings: flags win, then profile, then defaults
fn resolve_connection(
    host: Option<String>,
    port: Option<u16>,
    user: Option<String>,
    profile: &Profile,
) -> Result<FtpConfig> {
    let host = host
        .or_else(|| profile.host.clone())
        .ok_or_else(|| eyre!("FTP host missing (argument or profile)"))?;
    let port = port.or(profile.port).unwrap_or(DEFAULT_PORT);
    let user = user
        .or_else(|| profile.user.clone())
        .unwrap_or_else(|| DEFAULT_USER.to_string());
    let password = read_password()?;

    Ok(FtpConfig {
        host,
        port,
        user,
        password,
    })
}

fn resolve_remote(remote: Option<String>, profile: &Profile) -> Result<String> {
    remote
        .or_else(|| profile.remote.clone())
        .ok_or_else(|| eyre!("remote directory missing (argument or profile)"))
}

fn resolve_local(local: Option<PathBuf>, profile: &Profile) -> Result<PathBuf> {
    local
        .or_else(|| profile.local.clone())
        .ok_or_else(|| eyre!("local directory missing (argument or profile)"))
}

/// Read the FTP password from the environment or an echo-free prompt
fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(password);
    }
    let term = console::Term::stderr();
    term.write_str("Password: ")?;
    let password = term.read_secure_line()?;
    Ok(password)
}

/// The local root must already exist: the first diff pass lists it, and a
/// missing root would otherwise only surface as a mid-pass error.
fn check_local_root(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .map_err(|err| eyre!("local root {} is not accessible: {err}", path.display()))?;
    if !metadata.is_dir() {
        bail!("local root {} is not a directory", path.display());
    }
    Ok(())
}
