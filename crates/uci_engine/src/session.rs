//! UCI command handling for the random mover.
//!
//! Every `go` is answered immediately with a move picked uniformly at random
//! from the legal moves, so `stop` has nothing to interrupt.

use std::io::Write;

use anyhow::{Result, bail};
use match_core::{CozyRules, Rules, parse_uci_move};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, warn};

pub const ENGINE_NAME: &str = "RandomMover 0.1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Default)]
pub struct Session {
    rules: CozyRules,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fen(&self) -> String {
        self.rules.fen()
    }

    /// Handle one input line, writing any reply to `out`.
    pub fn handle<W, R>(&mut self, line: &str, out: &mut W, rng: &mut R) -> Result<Flow>
    where
        W: Write,
        R: Rng + ?Sized,
    {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = parts.split_first() else {
            return Ok(Flow::Continue);
        };
        debug!(line, "<- gui");

        match command {
            "uci" => {
                writeln!(out, "id name {ENGINE_NAME}")?;
                writeln!(out, "id author ML-chess")?;
                writeln!(out, "uciok")?;
            }
            "isready" => writeln!(out, "readyok")?,
            "ucinewgame" => self.rules = CozyRules::new(),
            "position" => {
                if let Err(err) = self.set_position(args) {
                    warn!("bad position command {line:?}: {err}");
                    self.rules = CozyRules::new();
                }
            }
            "go" => {
                let moves = self.rules.legal_moves();
                match moves.choose(rng) {
                    Some(mv) => writeln!(out, "bestmove {mv}")?,
                    None => writeln!(out, "bestmove 0000")?,
                }
            }
            "quit" => return Ok(Flow::Quit),
            // "stop", "setoption" and anything unknown need no reply.
            _ => {}
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    fn set_position(&mut self, args: &[&str]) -> Result<()> {
        let (setup, moves) = match args.iter().position(|&arg| arg == "moves") {
            Some(index) => (&args[..index], &args[index + 1..]),
            None => (args, &[][..]),
        };
        let mut rules = match setup {
            ["startpos"] => CozyRules::new(),
            ["fen", fen @ ..] if !fen.is_empty() => CozyRules::from_fen(&fen.join(" "))?,
            _ => bail!("unsupported position setup {setup:?}"),
        };
        for text in moves {
            rules.apply(&parse_uci_move(text)?)?;
        }
        self.rules = rules;
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
