//! Binary entrypoint for the slideshow.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use rust_slideshow::navigation::{self, Navigator};
use rust_slideshow::render::viewer::{self, ViewerOptions};
use rust_slideshow::{ignore, scan, state};

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "rust-slideshow", about = "Recursive image slideshow")]
struct Cli {
    /// Root directory to search for images
    #[arg(value_name = "DIR", default_value = ".")]
    directory: PathBuf,

    /// Start in fullscreen mode
    #[arg(short, long)]
    fullscreen: bool,

    /// Delay between images in whole seconds (0 = manual only)
    #[arg(short, long, value_name = "SECONDS", default_value_t = 3)]
    delay: u64,

    /// Resume from the last viewed position in this directory
    #[arg(short, long)]
    resume: bool,

    /// Disable ignore-list filtering
    #[arg(long)]
    no_ignore: bool,

    /// Override the state file path
    #[arg(long, value_name = "FILE")]
    state_file: Option<PathBuf>,

    /// Override the ignore file path
    #[arg(long, value_name = "FILE")]
    ignore_file: Option<PathBuf>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("rust_slideshow={level}").parse()?)
        .add_directive("wgpu=warn".parse()?)
        .add_directive("winit=warn".parse()?);
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

fn config_dir() -> PathBuf {
    dirs_next::config_dir()
        .map(|d| d.join("rust-slideshow"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let ignore_set: HashSet<String> = if cli.no_ignore {
        HashSet::new()
    } else {
        let path = cli
            .ignore_file
            .clone()
            .unwrap_or_else(|| config_dir().join("ignore.json"));
        ignore::load_or_create(&path)
    };

    info!(root = %cli.directory.display(), "searching for images");
    let discovery = scan::discover(&cli.directory, &ignore_set)
        .with_context(|| format!("scanning {}", cli.directory.display()))?;
    info!(
        found = discovery.len(),
        ignored = discovery.ignored,
        "scan complete"
    );

    let mut nav = Navigator::new(discovery.entries, &cli.directory, cli.delay)?;

    let state_file = cli
        .state_file
        .clone()
        .unwrap_or_else(|| config_dir().join("state.json"));
    if cli.resume {
        let doc = state::load(&state_file);
        let key = state::canonical_key(&cli.directory);
        if let Some(saved) = doc.directories.get(&key) {
            let index = navigation::compute_resume_index(saved, &cli.directory, nav.entries());
            nav.seek(index);
            info!(position = index + 1, total = nav.len(), "resuming");
        } else {
            info!("no saved position for this directory");
        }
    }

    info!("controls: Left/Right navigate, Space toggles auto-play, R rotates, F fullscreen, Q/Escape quits");

    viewer::run_slideshow(
        nav,
        ViewerOptions {
            fullscreen: cli.fullscreen,
            root: cli.directory,
            state_file,
        },
    )?;
    Ok(())
}
