//! UCI text lines in both directions.

use std::fmt;
use std::time::Duration;

use cozy_chess::{Piece, Square};

use crate::error::ProtocolError;
use crate::types::Move;

/// Lines the match sends to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    Identify,
    ReadyProbe,
    NewGame,
    Position { fen: String },
    Go { movetime: Duration },
    Stop,
    Quit,
}

impl fmt::Display for EngineCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineCommand::Identify => write!(f, "uci"),
            EngineCommand::ReadyProbe => write!(f, "isready"),
            EngineCommand::NewGame => write!(f, "ucinewgame"),
            EngineCommand::Position { fen } => write!(f, "position fen {fen}"),
            EngineCommand::Go { movetime } => write!(f, "go movetime {}", movetime.as_millis()),
            EngineCommand::Stop => write!(f, "stop"),
            EngineCommand::Quit => write!(f, "quit"),
        }
    }
}

/// A classified engine output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineReply {
    UciOk,
    ReadyOk,
    IdName(String),
    IdAuthor(String),
    /// A `bestmove` line, even when its move could not be parsed.
    BestMove(Result<Move, ProtocolError>),
    Info,
    Unknown,
}

impl EngineReply {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("uciok") => EngineReply::UciOk,
            Some("readyok") => EngineReply::ReadyOk,
            Some("id") => match parts.next() {
                Some("name") => EngineReply::IdName(rest_after(line, "name")),
                Some("author") => EngineReply::IdAuthor(rest_after(line, "author")),
                _ => EngineReply::Unknown,
            },
            Some("bestmove") => match parts.next() {
                // Anything after the move ("ponder e7e5") is ignored.
                Some(text) => EngineReply::BestMove(parse_uci_move(text)),
                None => EngineReply::BestMove(Err(ProtocolError::MissingBestMove)),
            },
            Some("info") => EngineReply::Info,
            _ => EngineReply::Unknown,
        }
    }
}

fn rest_after(line: &str, keyword: &str) -> String {
    line.split_once(keyword)
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

/// Parse long algebraic notation (`e2e4`, `e7e8q`). Legality is checked later
/// by the rules engine.
pub fn parse_uci_move(text: &str) -> Result<Move, ProtocolError> {
    if text == "(none)" || text == "0000" {
        return Err(ProtocolError::NoMove);
    }
    let malformed = || ProtocolError::MalformedBestMove(text.to_string());
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(malformed());
    }

    let origin: Square = text[0..2].parse().map_err(|_| malformed())?;
    let destination: Square = text[2..4].parse().map_err(|_| malformed())?;
    if origin == destination {
        return Err(malformed());
    }
    let promotion = match text.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(Piece::Queen),
        Some(b'r') => Some(Piece::Rook),
        Some(b'b') => Some(Piece::Bishop),
        Some(b'n') => Some(Piece::Knight),
        Some(_) => return Err(malformed()),
    };
    Ok(Move::new(origin, destination, promotion))
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod protocol_tests;
