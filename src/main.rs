//! remote-mouse: numeric keypad / IR remote to mouse and shortcut mapper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use remote_mouse::config::{self, RawConfig};
use remote_mouse::run;

#[derive(Parser)]
#[command(name = "remote-mouse")]
#[command(about = "Translate keypad/remote key events into mouse motion, shortcuts and commands")]
struct Cli {
    /// Physical input device to grab
    /// (e.g. /dev/input/by-path/platform-ir-receiver@11-event)
    device: PathBuf,

    /// Config file path (default: ~/.config/remote-mouse/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config_path = cli.config.unwrap_or_else(RawConfig::default_path);
    info!(path = %config_path.display(), "loading config");
    let raw = RawConfig::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    let settings = config::validate(raw);
    if settings.table.is_empty() {
        info!("no mappings configured; all events pass through");
    }

    run::run(&cli.device, settings)?;
    Ok(())
}
