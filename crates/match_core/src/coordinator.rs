//! Turn sequencing for one match.
//!
//! [`TurnCoordinator`] owns the selection, clock and engine session, and is
//! the only thing that mutates the position. Hosts call one `on_*` method per
//! event and carry out the returned [`Effect`]s: writing engine commands,
//! scheduling flash expiry and showing alerts.

use std::time::{Duration, Instant};

use cozy_chess::Square;
use tracing::{debug, error, info, warn};

use crate::board::{BoardView, Highlight};
use crate::clock::{ClockEpoch, ClockManager, Tick};
use crate::config::MatchConfig;
use crate::engine::{BridgeEvent, EngineBridge, EngineCommand};
use crate::error::{Alert, ProtocolError};
use crate::outcome::{self, Outcome};
use crate::rules::Rules;
use crate::selection::{SelectOutcome, SelectionController};
use crate::types::{Move, Seating, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingHumanInput,
    /// Transient while a committed human move is being applied.
    MoveAccepted,
    EngineTurn,
    MatchOver,
}

/// Handle of one error flash, echoed back through
/// [`TurnCoordinator::expire_flash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlashId(u64);

/// Work the host performs on the coordinator's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Send(EngineCommand),
    ExpireFlash { flash: FlashId, after: Duration },
    Alert(Alert),
}

pub struct TurnCoordinator<R, B> {
    rules: R,
    board: B,
    seating: Seating,
    selection: SelectionController,
    clock: ClockManager,
    bridge: EngineBridge,
    phase: Phase,
    outcome: Outcome,
    last_move: Option<Move>,
    alert: Option<Alert>,
    flashes: Vec<(FlashId, Square)>,
    next_flash: u64,
    error_flash: Duration,
    search_grace: Duration,
}

impl<R: Rules, B: BoardView> TurnCoordinator<R, B> {
    pub fn new(rules: R, board: B, config: &MatchConfig) -> Self {
        Self {
            rules,
            board,
            seating: config.seating(),
            selection: SelectionController::new(),
            clock: ClockManager::new(config.initial_seconds),
            bridge: EngineBridge::new(config.movetime()),
            phase: Phase::AwaitingHumanInput,
            outcome: Outcome::in_progress(),
            last_move: None,
            alert: None,
            flashes: Vec::new(),
            next_flash: 0,
            error_flash: config.error_flash(),
            search_grace: config.search_grace(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn clock(&self) -> &ClockManager {
        &self.clock
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn bridge(&self) -> &EngineBridge {
        &self.bridge
    }

    pub fn seating(&self) -> Seating {
        self.seating
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Most recent unresolved alert.
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn side_to_move(&self) -> Side {
        self.seating.side_of(self.rules.side_to_move())
    }

    /// Control came back after an engine failure while the engine is still
    /// to move.
    pub fn can_retry_engine(&self) -> bool {
        self.phase == Phase::AwaitingHumanInput && self.side_to_move() == Side::Engine
    }

    /// Open the engine session, draw the position and start the clock.
    pub fn start(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self
            .bridge
            .begin_handshake()
            .into_iter()
            .map(Effect::Send)
            .collect();
        self.board.set_position(&self.rules.fen());
        self.clock.start(self.side_to_move());
        info!(human = ?self.seating.color_of(Side::Human), "match started");
        self.continue_match(now, &mut effects);
        effects
    }

    pub fn on_square_clicked(&mut self, square: Square, now: Instant) -> Vec<Effect> {
        if self.phase != Phase::AwaitingHumanInput || self.side_to_move() != Side::Human {
            debug!(%square, phase = ?self.phase, "click ignored");
            return Vec::new();
        }

        if self.selection.is_candidate(square) {
            return match self.selection.commit(square, &self.rules, &mut self.board) {
                Some(mv) => self.accept_human_move(mv, now),
                None => Vec::new(),
            };
        }

        match self
            .selection
            .select_square(square, &self.rules, &mut self.board)
        {
            SelectOutcome::Rejected(square) => vec![self.schedule_flash(square)],
            _ => Vec::new(),
        }
    }

    pub fn on_engine_line(&mut self, line: &str, now: Instant) -> Vec<Effect> {
        debug!(line, "<- engine");
        match self.bridge.on_line(line) {
            BridgeEvent::Ready { queued: true } => {
                let commands = if self.phase == Phase::EngineTurn {
                    self.bridge.dispatch_queued(&self.rules.fen(), now)
                } else {
                    self.bridge.abandon_search()
                };
                commands.into_iter().map(Effect::Send).collect()
            }
            BridgeEvent::BestMove(mv) => self.apply_engine_move(mv, now),
            BridgeEvent::Failed(err) => self.engine_failure(err),
            BridgeEvent::Stale(_)
            | BridgeEvent::Ready { queued: false }
            | BridgeEvent::Identified(_)
            | BridgeEvent::Nothing => Vec::new(),
        }
    }

    pub fn on_engine_disconnected(&mut self, reason: &str) -> Vec<Effect> {
        warn!(reason, "engine disconnected");
        self.bridge.on_disconnected();
        self.engine_failure(ProtocolError::Disconnected(reason.to_string()))
    }

    /// One clock tick. Also runs the search watchdog.
    pub fn on_tick(&mut self, epoch: ClockEpoch, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.phase == Phase::EngineTurn && self.bridge.search_overdue(now, self.search_grace) {
            let waited = self.bridge.movetime() + self.search_grace;
            effects.extend(self.bridge.abandon_search().into_iter().map(Effect::Send));
            effects.extend(self.engine_failure(ProtocolError::Timeout(waited)));
        }

        if let Tick::Expired { side } = self.clock.tick(epoch) {
            self.outcome = Outcome::time_forfeit(side);
            self.finish(&mut effects);
        }
        effects
    }

    /// Remove an error flash once its interval has elapsed. The square stays
    /// highlighted while a later flash on it is still live.
    pub fn expire_flash(&mut self, flash: FlashId) {
        let Some(index) = self.flashes.iter().position(|(id, _)| *id == flash) else {
            return;
        };
        let (_, square) = self.flashes.swap_remove(index);
        if !self.flashes.iter().any(|(_, other)| *other == square) {
            self.board.unhighlight(square, Highlight::Error);
        }
    }

    /// Re-issue the search after an engine failure returned control.
    pub fn retry_engine(&mut self, now: Instant) -> Vec<Effect> {
        if !self.can_retry_engine() {
            return Vec::new();
        }
        self.alert = None;
        let mut effects = Vec::new();
        self.request_engine_move(now, &mut effects);
        effects
    }

    /// Abandon the current match and start over from the initial position.
    pub fn restart(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects: Vec<Effect> =
            self.bridge.restart().into_iter().map(Effect::Send).collect();
        self.clock.stop();

        self.rules.reset();
        self.board.reset();
        self.board.set_position(&self.rules.fen());
        self.selection = SelectionController::new();
        self.flashes.clear();
        self.last_move = None;
        self.alert = None;
        self.outcome = Outcome::in_progress();

        self.clock.reset(self.side_to_move());
        info!("match restarted");
        self.continue_match(now, &mut effects);
        effects
    }

    fn accept_human_move(&mut self, mv: Move, now: Instant) -> Vec<Effect> {
        self.phase = Phase::MoveAccepted;
        if let Err(err) = self.rules.apply(&mv) {
            error!(%mv, "rules engine rejected committed move: {err}");
            self.phase = Phase::AwaitingHumanInput;
            return vec![
                self.schedule_flash(mv.destination()),
                self.raise(Alert::MoveRejected(err)),
            ];
        }
        info!(%mv, "human move");
        self.alert = None;
        let mut effects = Vec::new();
        self.after_ply(mv, now, &mut effects);
        effects
    }

    fn apply_engine_move(&mut self, mv: Move, now: Instant) -> Vec<Effect> {
        if self.phase != Phase::EngineTurn {
            debug!(%mv, phase = ?self.phase, "best move outside engine turn dropped");
            return Vec::new();
        }
        if let Err(err) = self.rules.apply(&mv) {
            debug!("{err}");
            return self.engine_failure(ProtocolError::IllegalBestMove(mv.to_string()));
        }
        info!(%mv, "engine move");
        let mut effects = Vec::new();
        self.after_ply(mv, now, &mut effects);
        effects
    }

    fn after_ply(&mut self, mv: Move, now: Instant, effects: &mut Vec<Effect>) {
        self.board.set_position(&self.rules.fen());
        if let Some(previous) = self.last_move.replace(mv) {
            self.board.unhighlight(previous.origin(), Highlight::LastMove);
            self.board.unhighlight(previous.destination(), Highlight::LastMove);
        }
        self.board.highlight(mv.origin(), Highlight::LastMove);
        self.board.highlight(mv.destination(), Highlight::LastMove);
        self.continue_match(now, effects);
    }

    /// Evaluate the position and hand the turn to whoever moves next.
    fn continue_match(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let to_move = self.side_to_move();
        self.clock.switch_active(to_move);
        self.outcome = outcome::evaluate(&self.rules, &self.seating);
        if self.outcome.is_terminal() {
            self.finish(effects);
            return;
        }
        match to_move {
            Side::Human => self.phase = Phase::AwaitingHumanInput,
            Side::Engine => self.request_engine_move(now, effects),
        }
    }

    fn request_engine_move(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        self.phase = Phase::EngineTurn;
        match self.bridge.request_search(&self.rules.fen(), now) {
            Ok(commands) => effects.extend(commands.into_iter().map(Effect::Send)),
            Err(err) => {
                warn!("search request refused: {err}");
                self.phase = Phase::AwaitingHumanInput;
                effects.push(self.raise(Alert::Bridge(err)));
            }
        }
    }

    fn engine_failure(&mut self, err: ProtocolError) -> Vec<Effect> {
        error!("engine failure: {err}");
        if self.phase == Phase::EngineTurn {
            self.phase = Phase::AwaitingHumanInput;
        }
        vec![self.raise(Alert::Engine(err))]
    }

    fn finish(&mut self, effects: &mut Vec<Effect>) {
        self.phase = Phase::MatchOver;
        self.clock.stop();
        self.selection.clear(&mut self.board);
        effects.extend(self.bridge.abandon_search().into_iter().map(Effect::Send));
        info!(outcome = %self.outcome, "match over");
    }

    fn schedule_flash(&mut self, square: Square) -> Effect {
        let flash = FlashId(self.next_flash);
        self.next_flash += 1;
        self.board.highlight(square, Highlight::Error);
        self.flashes.push((flash, square));
        Effect::ExpireFlash {
            flash,
            after: self.error_flash,
        }
    }

    fn raise(&mut self, alert: Alert) -> Effect {
        self.alert = Some(alert.clone());
        Effect::Alert(alert)
    }
}
