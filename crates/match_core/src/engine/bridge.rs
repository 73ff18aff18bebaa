//! UCI session state machine.
//!
//! The bridge never touches the process. It turns requests into
//! [`EngineCommand`]s for the host to write, and incoming lines into
//! [`BridgeEvent`]s.
//!
//! Every `go` it emits pushes a [`SearchToken`] onto an in-flight queue and
//! every `bestmove` pops one, so replies to abandoned searches (after `stop`,
//! a restart or a watchdog timeout) are recognised and dropped. Abandoning a
//! running search also sends `isready`; tokens still unanswered when its
//! `readyok` arrives belong to searches the engine dropped and are purged, and
//! new searches wait in the queue until then.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::protocol::{EngineCommand, EngineReply};
use crate::error::{BridgeError, ProtocolError};
use crate::types::Move;

/// Correlation tag of one search request. Never reused within a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// `isready` sent, `readyok` not seen yet. Searches are queued.
    Uninitialized,
    Ready,
    Searching,
    /// The process is gone.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Nothing,
    Identified(String),
    /// `readyok` arrived. `queued` is set when a search is waiting for
    /// [`EngineBridge::dispatch_queued`].
    Ready { queued: bool },
    BestMove(Move),
    Stale(SearchToken),
    Failed(ProtocolError),
}

#[derive(Debug)]
pub struct EngineBridge {
    phase: SessionPhase,
    movetime: Duration,
    next_token: u64,
    pending: Option<SearchToken>,
    queued: bool,
    in_flight: VecDeque<SearchToken>,
    search_started: Option<Instant>,
    engine_name: Option<String>,
}

impl EngineBridge {
    pub fn new(movetime: Duration) -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            movetime,
            next_token: 0,
            pending: None,
            queued: false,
            in_flight: VecDeque::new(),
            search_started: None,
            engine_name: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn movetime(&self) -> Duration {
        self.movetime
    }

    pub fn pending(&self) -> Option<SearchToken> {
        self.pending
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine_name.as_deref()
    }

    pub fn begin_handshake(&mut self) -> Vec<EngineCommand> {
        self.phase = SessionPhase::Uninitialized;
        vec![EngineCommand::Identify, EngineCommand::ReadyProbe]
    }

    /// Ask for a best move in `fen`. Before the handshake completes the
    /// request is queued rather than sent.
    pub fn request_search(
        &mut self,
        fen: &str,
        now: Instant,
    ) -> Result<Vec<EngineCommand>, BridgeError> {
        match self.phase {
            SessionPhase::Closed => return Err(BridgeError::EngineUnavailable),
            SessionPhase::Searching => return Err(BridgeError::SearchInFlight),
            _ if self.pending.is_some() => return Err(BridgeError::SearchInFlight),
            _ => {}
        }

        let token = SearchToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(token);

        if self.phase == SessionPhase::Uninitialized {
            debug!(?token, "search queued until engine is ready");
            self.queued = true;
            self.search_started = Some(now);
            return Ok(Vec::new());
        }
        Ok(self.dispatch(token, fen, now))
    }

    /// Send the search queued before `readyok`, against the position current
    /// now.
    pub fn dispatch_queued(&mut self, fen: &str, now: Instant) -> Vec<EngineCommand> {
        if self.phase != SessionPhase::Ready || !self.queued {
            return Vec::new();
        }
        self.queued = false;
        match self.pending {
            Some(token) => self.dispatch(token, fen, now),
            None => Vec::new(),
        }
    }

    fn dispatch(&mut self, token: SearchToken, fen: &str, now: Instant) -> Vec<EngineCommand> {
        debug!(?token, fen, "search dispatched");
        self.in_flight.push_back(token);
        self.phase = SessionPhase::Searching;
        self.search_started = Some(now);
        vec![
            EngineCommand::Position {
                fen: fen.to_string(),
            },
            EngineCommand::Go {
                movetime: self.movetime,
            },
        ]
    }

    pub fn on_line(&mut self, line: &str) -> BridgeEvent {
        if self.phase == SessionPhase::Closed {
            return BridgeEvent::Nothing;
        }
        match EngineReply::parse(line) {
            EngineReply::IdName(name) => {
                info!(engine = %name, "engine identified");
                self.engine_name = Some(name.clone());
                BridgeEvent::Identified(name)
            }
            EngineReply::ReadyOk if self.phase == SessionPhase::Uninitialized => {
                self.phase = SessionPhase::Ready;
                if !self.in_flight.is_empty() {
                    debug!(dropped = self.in_flight.len(), "purging unanswered searches");
                    self.in_flight.clear();
                }
                debug!(queued = self.queued, "engine ready");
                BridgeEvent::Ready {
                    queued: self.queued,
                }
            }
            EngineReply::BestMove(result) => self.on_best_move(result),
            _ => BridgeEvent::Nothing,
        }
    }

    fn on_best_move(&mut self, result: Result<Move, ProtocolError>) -> BridgeEvent {
        let Some(token) = self.in_flight.pop_front() else {
            warn!("bestmove without an outstanding search");
            return BridgeEvent::Nothing;
        };
        if self.pending != Some(token) {
            debug!(?token, "discarding stale bestmove");
            return BridgeEvent::Stale(token);
        }

        self.pending = None;
        self.search_started = None;
        self.phase = SessionPhase::Ready;
        match result {
            Ok(mv) => BridgeEvent::BestMove(mv),
            Err(err) => BridgeEvent::Failed(err),
        }
    }

    /// Forget the pending search. Its reply, if one still arrives, is stale.
    /// A running search is stopped and the session resynchronised with
    /// `isready`.
    pub fn abandon_search(&mut self) -> Vec<EngineCommand> {
        let mut commands = self.drop_pending();
        if !commands.is_empty() {
            self.phase = SessionPhase::Uninitialized;
            commands.push(EngineCommand::ReadyProbe);
        }
        commands
    }

    fn drop_pending(&mut self) -> Vec<EngineCommand> {
        let Some(token) = self.pending.take() else {
            return Vec::new();
        };
        self.queued = false;
        self.search_started = None;
        if self.phase == SessionPhase::Searching {
            debug!(?token, "search abandoned");
            self.phase = SessionPhase::Ready;
            vec![EngineCommand::Stop]
        } else {
            Vec::new()
        }
    }

    /// Start a fresh session on the same process.
    pub fn restart(&mut self) -> Vec<EngineCommand> {
        if self.phase == SessionPhase::Closed {
            return Vec::new();
        }
        let mut commands = self.drop_pending();
        self.phase = SessionPhase::Uninitialized;
        commands.push(EngineCommand::NewGame);
        commands.push(EngineCommand::ReadyProbe);
        commands
    }

    /// The process exited. Returns whether a search was pending.
    pub fn on_disconnected(&mut self) -> bool {
        self.phase = SessionPhase::Closed;
        self.queued = false;
        self.search_started = None;
        self.in_flight.clear();
        self.pending.take().is_some()
    }

    /// The pending search, running or still queued behind `readyok`, has
    /// waited longer than its movetime plus `grace`.
    pub fn search_overdue(&self, now: Instant, grace: Duration) -> bool {
        self.phase != SessionPhase::Closed
            && self.pending.is_some()
            && self
                .search_started
                .is_some_and(|started| now.saturating_duration_since(started) >= self.movetime + grace)
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod bridge_tests;
