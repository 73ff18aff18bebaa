//! Terminal-state evaluation and result labels.

use std::fmt;

use crate::rules::Rules;
use crate::types::{Seating, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawRule {
    InsufficientMaterial,
    Repetition,
    FiftyMoves,
}

impl fmt::Display for DrawRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawRule::InsufficientMaterial => write!(f, "insufficient material"),
            DrawRule::Repetition => write!(f, "threefold repetition"),
            DrawRule::FiftyMoves => write!(f, "fifty-move rule"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    InProgress,
    Checkmate,
    Stalemate,
    DrawByRule(DrawRule),
    TimeForfeit,
}

/// Result of a match, or `InProgress`. Recomputed after every half-move and
/// every clock expiry, never stored across positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub winner: Option<Side>,
}

impl Default for Outcome {
    fn default() -> Self {
        Self::in_progress()
    }
}

impl Outcome {
    pub fn in_progress() -> Self {
        Self {
            kind: OutcomeKind::InProgress,
            winner: None,
        }
    }

    /// `loser` ran out of time.
    pub fn time_forfeit(loser: Side) -> Self {
        Self {
            kind: OutcomeKind::TimeForfeit,
            winner: Some(loser.other()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind != OutcomeKind::InProgress
    }
}

/// Classify the current position: checkmate, then stalemate, then draw rules.
pub fn evaluate<R: Rules + ?Sized>(rules: &R, seating: &Seating) -> Outcome {
    if rules.is_checkmate() {
        let loser = seating.side_of(rules.side_to_move());
        return Outcome {
            kind: OutcomeKind::Checkmate,
            winner: Some(loser.other()),
        };
    }
    if rules.is_stalemate() {
        return Outcome {
            kind: OutcomeKind::Stalemate,
            winner: None,
        };
    }
    match rules.draw_rule() {
        Some(rule) => Outcome {
            kind: OutcomeKind::DrawByRule(rule),
            winner: None,
        },
        None => Outcome::in_progress(),
    }
}

fn verb(side: Side) -> &'static str {
    match side {
        Side::Human => "win",
        Side::Engine => "wins",
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind, self.winner) {
            (OutcomeKind::InProgress, _) => write!(f, "In progress"),
            (OutcomeKind::Checkmate, Some(side)) => {
                write!(f, "Game Over: {side} {} by checkmate", verb(side))
            }
            (OutcomeKind::TimeForfeit, Some(side)) => {
                write!(f, "Game Over: {side} {} on time", verb(side))
            }
            (OutcomeKind::Stalemate, _) => write!(f, "Game Over: Stalemate"),
            (OutcomeKind::DrawByRule(rule), _) => write!(f, "Game Over: Draw by {rule}"),
            (OutcomeKind::Checkmate | OutcomeKind::TimeForfeit, None) => {
                write!(f, "Game Over: Draw")
            }
        }
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod outcome_tests;
