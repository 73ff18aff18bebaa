//! Core of a human-vs-engine chess match.
//!
//! Everything stateful and timing-sensitive lives here: click-to-select move
//! input, turn sequencing, the UCI engine bridge, per-side clocks and outcome
//! evaluation. The crate performs no UI work and, apart from
//! [`engine::EngineProcess`], no I/O. Hosts feed events into
//! [`TurnCoordinator`] and execute the [`Effect`]s it returns.

pub mod board;
pub mod clock;
pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod rules;
pub mod selection;
pub mod types;

pub use board::{BoardView, Highlight};
pub use clock::{ClockEpoch, ClockManager, Tick, format_clock};
pub use config::{EngineConfig, HumanColor, MatchConfig};
pub use coordinator::{Effect, FlashId, Phase, TurnCoordinator};
pub use engine::{
    BridgeEvent, EngineBridge, EngineCommand, EngineLines, EngineProcess, EngineReply, SearchToken,
    SessionPhase, parse_uci_move,
};
pub use error::{Alert, BridgeError, ConfigError, ProcessError, ProtocolError, RulesError};
pub use outcome::{DrawRule, Outcome, OutcomeKind, evaluate};
pub use rules::{CozyRules, Rules};
pub use selection::{SelectOutcome, SelectionController};
pub use types::{Move, Seating, Side};

// Square/colour vocabulary shared with the rules adapter and hosts.
pub use cozy_chess::{Color, Piece, Square};
