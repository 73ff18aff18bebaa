//! Click-to-select move input.

use std::collections::HashSet;

use cozy_chess::{Piece, Square};
use tracing::debug;

use crate::board::{BoardView, Highlight};
use crate::rules::Rules;
use crate::types::Move;

/// Result of a [`SelectionController::select_square`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// `square` is now the selected origin.
    Selected(Square),
    /// The origin was clicked again.
    Cleared,
    /// The click was neither a candidate nor an own piece. The selection is
    /// cleared; the caller owns the error flash on the square.
    Rejected(Square),
    Ignored,
}

/// Selected origin plus the legal destinations computed when it was selected.
///
/// Candidates are empty whenever nothing is selected.
#[derive(Debug, Default, Clone)]
pub struct SelectionController {
    origin: Option<Square>,
    candidates: HashSet<Square>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(&self) -> Option<Square> {
        self.origin
    }

    pub fn candidates(&self) -> &HashSet<Square> {
        &self.candidates
    }

    pub fn is_candidate(&self, square: Square) -> bool {
        self.candidates.contains(&square)
    }

    /// Handle a click that is not a commit. Candidate squares must go through
    /// [`commit`](Self::commit) instead and are ignored here.
    pub fn select_square<R, B>(&mut self, square: Square, rules: &R, board: &mut B) -> SelectOutcome
    where
        R: Rules + ?Sized,
        B: BoardView + ?Sized,
    {
        let own_piece = rules.color_on(square) == Some(rules.side_to_move());

        let Some(origin) = self.origin else {
            if own_piece {
                self.select(square, rules, board);
                return SelectOutcome::Selected(square);
            }
            return SelectOutcome::Ignored;
        };

        if square == origin {
            self.clear(board);
            SelectOutcome::Cleared
        } else if self.is_candidate(square) {
            SelectOutcome::Ignored
        } else if own_piece {
            self.select(square, rules, board);
            SelectOutcome::Selected(square)
        } else {
            debug!(%square, %origin, "selection rejected");
            self.clear(board);
            SelectOutcome::Rejected(square)
        }
    }

    /// Turn a candidate click into a [`Move`]. Promotions always pick a queen.
    /// Returns `None` if `destination` is not a candidate. Never touches the
    /// position.
    pub fn commit<R, B>(&mut self, destination: Square, rules: &R, board: &mut B) -> Option<Move>
    where
        R: Rules + ?Sized,
        B: BoardView + ?Sized,
    {
        let origin = self.origin?;
        if !self.is_candidate(destination) {
            return None;
        }
        let promotion = rules
            .is_promotion(origin, destination)
            .then_some(Piece::Queen);
        self.clear(board);
        Some(Move::new(origin, destination, promotion))
    }

    /// Drop the selection and its overlays.
    pub fn clear<B: BoardView + ?Sized>(&mut self, board: &mut B) {
        if let Some(origin) = self.origin.take() {
            board.unhighlight(origin, Highlight::Selected);
        }
        for square in self.candidates.drain() {
            board.unhighlight(square, Highlight::Candidate);
        }
    }

    fn select<R, B>(&mut self, origin: Square, rules: &R, board: &mut B)
    where
        R: Rules + ?Sized,
        B: BoardView + ?Sized,
    {
        self.clear(board);
        self.origin = Some(origin);
        self.candidates = rules.legal_destinations(origin);
        board.highlight(origin, Highlight::Selected);
        for &square in &self.candidates {
            board.highlight(square, Highlight::Candidate);
        }
        debug!(%origin, candidates = self.candidates.len(), "origin selected");
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod selection_tests;
