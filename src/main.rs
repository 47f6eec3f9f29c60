//! Lined - a small modal terminal line editor.
//!
//! # Usage
//!
//! ```bash
//! lined notes.txt
//! lined --tab-width 4 notes.txt
//! lined --debug-log lined.log notes.txt
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lined::app::{App, DEFAULT_TAB_WIDTH};
use lined::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags,
};

/// A small modal terminal line editor
#[derive(Parser, Debug)]
#[command(name = "lined", version, about, long_about = None)]
struct Cli {
    /// File to edit (created on first save if missing)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Spaces inserted by TAB in insert mode
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=32))]
    tab_width: Option<u8>,

    /// Write debug logging to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Never ring the terminal bell
    #[arg(long)]
    no_bell: bool,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

/// Install the tracing subscriber: a debug file when requested, otherwise
/// warnings to stderr.
fn init_logging(debug_log: Option<&Path>) -> Result<()> {
    if let Some(path) = debug_log {
        let file = File::create(path)
            .with_context(|| format!("Failed to create debug log {}", path.display()))?;
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lined=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let debug_log = effective
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("LINED_DEBUG_LOG").map(PathBuf::from));
    init_logging(debug_log.as_deref())?;
    tracing::debug!(?effective, "resolved config");

    let tab_width = cli
        .tab_width
        .map(usize::from)
        .or(effective.tab_width)
        .unwrap_or(DEFAULT_TAB_WIDTH);

    let mut app = App::new(cli.file)
        .with_tab_width(tab_width)
        .with_bell(!(cli.no_bell || effective.no_bell));

    app.run().context("Application error")
}
