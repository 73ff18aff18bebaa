//! Chess match GUI
//!
//! Play a timed game against any UCI engine:
//! - click-to-move board with legal-move hints
//! - a clock per side
//! - engine communication in a background worker
//!
//! Settings come from `--config <path>`, else `match.toml` in the working
//! directory, else built-in defaults.

mod app;
mod board;
mod engine;
mod styles;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use app::ChessApp;
use iced::application;
use match_core::MatchConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "match.toml";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?;
    tracing::info!(engine = %config.engine.path.display(), "starting");

    application(ChessApp::title, ChessApp::update, ChessApp::view)
        .subscription(ChessApp::subscription)
        .theme(ChessApp::theme)
        .window_size((1000.0, 700.0))
        .run_with(move || ChessApp::new(config))
        .context("running GUI")
}

fn load_config() -> Result<MatchConfig> {
    let mut args = std::env::args().skip(1);
    let explicit = match (args.next().as_deref(), args.next()) {
        (Some("--config"), Some(path)) => Some(PathBuf::from(path)),
        (None, _) => None,
        (Some(other), _) => bail!("unexpected argument {other:?}; usage: chess_gui [--config <path>]"),
    };

    let path = match explicit {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG).exists() => PathBuf::from(DEFAULT_CONFIG),
        None => return Ok(MatchConfig::default()),
    };
    MatchConfig::load(&path).with_context(|| format!("loading {}", path.display()))
}
