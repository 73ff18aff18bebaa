//! UCI engine speaking over stdin/stdout.
//!
//! Logs go to stderr; stdout carries only protocol lines.

mod session;

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use session::{Flow, Session};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    let mut rng = rand::thread_rng();
    let mut session = Session::new();

    for line in stdin.lock().lines() {
        let line = line.context("reading stdin")?;
        if session.handle(&line, &mut stdout, &mut rng)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
