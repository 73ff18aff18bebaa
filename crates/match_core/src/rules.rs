//! Rules-engine collaborator.
//!
//! The match core never interprets chess rules itself; it asks a [`Rules`]
//! implementation. [`CozyRules`] adapts the `cozy-chess` move generator.

use std::collections::HashSet;

use cozy_chess::{BitBoard, Board, Color, File, Piece, Square};
use tracing::debug;

use crate::error::RulesError;
use crate::outcome::DrawRule;
use crate::types::Move;

/// Position authority consulted by selection, turn coordination and outcome
/// evaluation.
pub trait Rules {
    fn side_to_move(&self) -> Color;

    fn color_on(&self, square: Square) -> Option<Color>;

    /// Destinations reachable from `origin` by the side to move. Empty when
    /// `origin` does not hold one of its pieces.
    fn legal_destinations(&self, origin: Square) -> HashSet<Square>;

    fn is_promotion(&self, origin: Square, destination: Square) -> bool;

    /// Play `mv`. On error the position is unchanged.
    fn apply(&mut self, mv: &Move) -> Result<(), RulesError>;

    fn is_checkmate(&self) -> bool;

    fn is_stalemate(&self) -> bool;

    /// First draw rule that holds for the current position, if any.
    fn draw_rule(&self) -> Option<DrawRule>;

    /// FEN snapshot of the current position.
    fn fen(&self) -> String;

    fn fullmove_number(&self) -> u16;

    /// Return to the position the match started from.
    fn reset(&mut self);
}

/// [`Rules`] backed by `cozy_chess::Board`, with position history for
/// repetition detection.
#[derive(Debug, Clone)]
pub struct CozyRules {
    board: Board,
    initial: Board,
    history: Vec<u64>,
}

impl Default for CozyRules {
    fn default() -> Self {
        Self::new()
    }
}

impl CozyRules {
    pub fn new() -> Self {
        Self::with_board(Board::default())
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        let board = Board::from_fen(fen, false).map_err(|err| RulesError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{err:?}"),
        })?;
        Ok(Self::with_board(board))
    }

    fn with_board(board: Board) -> Self {
        let history = vec![board.hash()];
        Self {
            initial: board.clone(),
            board,
            history,
        }
    }

    /// All legal moves of the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        self.board.generate_moves(|piece_moves| {
            moves.extend(piece_moves.into_iter().map(|mv| self.standardize(mv)));
            false
        });
        moves
    }

    fn has_legal_move(&self) -> bool {
        self.board.generate_moves(|piece_moves| !piece_moves.to.is_empty())
    }

    fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    /// cozy-chess encodes castling as the king capturing its own rook.
    fn standardize(&self, mv: cozy_chess::Move) -> Move {
        let mut destination = mv.to;
        if self.board.piece_on(mv.from) == Some(Piece::King)
            && self.board.color_on(mv.to) == self.board.color_on(mv.from)
        {
            let file = if (mv.to.file() as usize) > (mv.from.file() as usize) {
                File::G
            } else {
                File::C
            };
            destination = Square::new(file, mv.from.rank());
        }
        Move::new(mv.from, destination, mv.promotion)
    }

    fn to_native(&self, mv: &Move) -> cozy_chess::Move {
        let (from, to) = (mv.origin(), mv.destination());
        if self.board.piece_on(from) == Some(Piece::King) && from.rank() == to.rank() {
            let from_file = from.file() as usize;
            let to_file = to.file() as usize;
            if from_file.abs_diff(to_file) == 2 {
                let rook_file = if to_file > from_file { File::H } else { File::A };
                return cozy_chess::Move {
                    from,
                    to: Square::new(rook_file, from.rank()),
                    promotion: None,
                };
            }
        }
        cozy_chess::Move {
            from,
            to,
            promotion: mv.promotion(),
        }
    }

    fn insufficient_material(&self) -> bool {
        let heavy = self.board.pieces(Piece::Pawn)
            | self.board.pieces(Piece::Rook)
            | self.board.pieces(Piece::Queen);
        if !heavy.is_empty() {
            return false;
        }

        let knights = self.board.pieces(Piece::Knight);
        let bishops = self.board.pieces(Piece::Bishop);
        if knights.len() + bishops.len() <= 1 {
            return true;
        }

        // Bishops confined to one square colour cannot mate.
        knights.is_empty() && on_single_color(bishops)
    }

    fn is_repetition(&self) -> bool {
        let current = self.board.hash();
        self.history.iter().filter(|&&h| h == current).count() >= 3
    }
}

fn on_single_color(pieces: BitBoard) -> bool {
    let dark = pieces.into_iter().filter(|&sq| is_dark(sq)).count();
    dark == 0 || dark == pieces.len() as usize
}

fn is_dark(square: Square) -> bool {
    (square.file() as usize + square.rank() as usize) % 2 == 0
}

impl Rules for CozyRules {
    fn side_to_move(&self) -> Color {
        self.board.side_to_move()
    }

    fn color_on(&self, square: Square) -> Option<Color> {
        self.board.color_on(square)
    }

    fn legal_destinations(&self, origin: Square) -> HashSet<Square> {
        let mut destinations = HashSet::new();
        if self.board.color_on(origin) != Some(self.board.side_to_move()) {
            return destinations;
        }
        self.board.generate_moves_for(origin.bitboard(), |piece_moves| {
            for mv in piece_moves {
                destinations.insert(self.standardize(mv).destination());
            }
            false
        });
        destinations
    }

    fn is_promotion(&self, origin: Square, destination: Square) -> bool {
        let mut promotion = false;
        self.board.generate_moves_for(origin.bitboard(), |piece_moves| {
            promotion = piece_moves
                .into_iter()
                .any(|mv| mv.to == destination && mv.promotion.is_some());
            promotion
        });
        promotion
    }

    fn apply(&mut self, mv: &Move) -> Result<(), RulesError> {
        let native = self.to_native(mv);
        if !self.board.is_legal(native) {
            return Err(RulesError::IllegalMove(mv.to_string()));
        }
        self.board.play_unchecked(native);
        self.history.push(self.board.hash());
        debug!(%mv, fen = %self.board, "move applied");
        Ok(())
    }

    fn is_checkmate(&self) -> bool {
        self.in_check() && !self.has_legal_move()
    }

    fn is_stalemate(&self) -> bool {
        !self.in_check() && !self.has_legal_move()
    }

    fn draw_rule(&self) -> Option<DrawRule> {
        if self.insufficient_material() {
            Some(DrawRule::InsufficientMaterial)
        } else if self.is_repetition() {
            Some(DrawRule::Repetition)
        } else if self.board.halfmove_clock() >= 100 {
            Some(DrawRule::FiftyMoves)
        } else {
            None
        }
    }

    fn fen(&self) -> String {
        self.board.to_string()
    }

    fn fullmove_number(&self) -> u16 {
        self.board.fullmove_number()
    }

    fn reset(&mut self) {
        self.board = self.initial.clone();
        self.history = vec![self.board.hash()];
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod rules_tests;
