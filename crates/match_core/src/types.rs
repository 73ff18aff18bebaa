use std::fmt;

use cozy_chess::{Color, Piece, Square};

/// The two participants of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Human,
    Engine,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Human => Side::Engine,
            Side::Engine => Side::Human,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Human => write!(f, "You"),
            Side::Engine => write!(f, "Engine"),
        }
    }
}

/// Which colour each side plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seating {
    human: Color,
}

impl Default for Seating {
    fn default() -> Self {
        Self::new(Color::White)
    }
}

impl Seating {
    pub fn new(human: Color) -> Self {
        Self { human }
    }

    pub fn side_of(&self, color: Color) -> Side {
        if color == self.human {
            Side::Human
        } else {
            Side::Engine
        }
    }

    pub fn color_of(&self, side: Side) -> Color {
        match side {
            Side::Human => self.human,
            Side::Engine => !self.human,
        }
    }
}

/// A validated half-move in standard notation (castling is king to g/c file).
///
/// Values are only produced by move input, the engine reply parser and the
/// rules adapter, never assembled by hand outside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    origin: Square,
    destination: Square,
    promotion: Option<Piece>,
}

impl Move {
    pub(crate) fn new(origin: Square, destination: Square, promotion: Option<Piece>) -> Self {
        Self {
            origin,
            destination,
            promotion,
        }
    }

    pub fn origin(&self) -> Square {
        self.origin
    }

    pub fn destination(&self) -> Square {
        self.destination
    }

    pub fn promotion(&self) -> Option<Piece> {
        self.promotion
    }
}

/// UCI long algebraic form, e.g. `e2e4`, `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", promotion_char(piece))?;
        }
        Ok(())
    }
}

pub(crate) fn promotion_char(piece: Piece) -> char {
    match piece {
        Piece::Queen => 'q',
        Piece::Rook => 'r',
        Piece::Bishop => 'b',
        Piece::Knight => 'n',
        Piece::Pawn => 'p',
        Piece::King => 'k',
    }
}
