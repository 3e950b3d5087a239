use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use jsonfs_core::Document;
use jsonfs_fuse::MountConfig;

/// Mount a JSON document as a read-only filesystem.
///
/// Objects and arrays appear as directories; strings, numbers, booleans
/// and nulls appear as regular files containing the value as text.
#[derive(Parser, Debug)]
#[command(name = "jsonfs")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON document to project
    source: PathBuf,

    /// Directory to mount the filesystem on
    mountpoint: PathBuf,

    /// Unmount automatically when the process exits
    #[arg(long)]
    auto_unmount: bool,

    /// Reserved path segment that halts resolution and addresses the node
    /// reached so far (disabled unless given)
    #[arg(long, value_name = "NAME")]
    stop_segment: Option<String>,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    /// jsonfs does no access checking of its own, so a superuser mount
    /// would expose the whole namespace to every user on the system.
    #[error("refusing to run as the superuser")]
    RunningAsRoot,

    #[error(transparent)]
    Document(#[from] jsonfs_core::DocumentError),

    #[error("mount failed: {0}")]
    Mount(#[from] std::io::Error),
}

fn run(args: Args) -> Result<(), CliError> {
    if unsafe { libc::getuid() } == 0 || unsafe { libc::geteuid() } == 0 {
        return Err(CliError::RunningAsRoot);
    }

    let document = Document::load(&args.source)?;
    tracing::info!(source = %args.source.display(), "document loaded");

    jsonfs_fuse::mount(
        document,
        &args.mountpoint,
        MountConfig {
            auto_unmount: args.auto_unmount,
            stop_segment: args.stop_segment,
        },
    )?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);
    tracing_subscriber::registry().with(stderr_layer).init();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
