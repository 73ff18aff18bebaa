//! Error types for the match core.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Rejections from the rules engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("illegal move {0}")]
    IllegalMove(String),
    #[error("invalid FEN {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },
}

/// Engine replies that could not be turned into a playable move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("malformed best move {0:?}")]
    MalformedBestMove(String),
    #[error("bestmove reply carried no move")]
    MissingBestMove,
    #[error("engine reported no legal move")]
    NoMove,
    #[error("engine proposed illegal move {0}")]
    IllegalBestMove(String),
    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),
    #[error("engine disconnected: {0}")]
    Disconnected(String),
}

/// Requests the bridge refuses to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BridgeError {
    #[error("a search is already pending")]
    SearchInFlight,
    #[error("engine unavailable")]
    EngineUnavailable,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start engine {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("engine process has no {0} pipe")]
    MissingPipe(&'static str),
    #[error("engine I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// User-facing report surfaced by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Alert {
    #[error("Move rejected: {0}")]
    MoveRejected(RulesError),
    #[error("Engine error: {0}")]
    Engine(ProtocolError),
    #[error("Engine request failed: {0}")]
    Bridge(BridgeError),
}
