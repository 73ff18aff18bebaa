//! Styling constants and piece glyphs

use cozy_chess::{Color as PieceColor, Piece};
use iced::Color;

// Board colors
pub const LIGHT_SQUARE: Color = Color::from_rgb(0.94, 0.85, 0.71); // Wheat
pub const DARK_SQUARE: Color = Color::from_rgb(0.71, 0.53, 0.39); // Sienna
pub const SELECTED_SQUARE: Color = Color::from_rgb(0.68, 0.85, 0.37); // Yellow-green
pub const LAST_MOVE_SQUARE: Color = Color::from_rgba(0.9, 0.9, 0.0, 0.4); // Yellow overlay
pub const CANDIDATE_CAPTURE: Color = Color::from_rgba(0.2, 0.6, 0.2, 0.45);
pub const ERROR_SQUARE: Color = Color::from_rgb(0.85, 0.25, 0.25);
pub const CANDIDATE_DOT: Color = Color::from_rgba(0.0, 0.0, 0.0, 0.3);

// Clock colors
pub const CLOCK_ACTIVE: Color = Color::from_rgb(0.95, 0.95, 0.95);
pub const CLOCK_IDLE: Color = Color::from_rgb(0.55, 0.55, 0.55);
pub const ALERT_TEXT: Color = Color::from_rgb(0.95, 0.45, 0.4);

// Dimensions
pub const SQUARE_SIZE: f32 = 70.0;
pub const PANEL_WIDTH: f32 = 320.0;

pub fn piece_char(color: PieceColor, piece: Piece) -> char {
    match (color, piece) {
        (PieceColor::White, Piece::King) => '♔',
        (PieceColor::White, Piece::Queen) => '♕',
        (PieceColor::White, Piece::Rook) => '♖',
        (PieceColor::White, Piece::Bishop) => '♗',
        (PieceColor::White, Piece::Knight) => '♘',
        (PieceColor::White, Piece::Pawn) => '♙',
        (PieceColor::Black, Piece::King) => '♚',
        (PieceColor::Black, Piece::Queen) => '♛',
        (PieceColor::Black, Piece::Rook) => '♜',
        (PieceColor::Black, Piece::Bishop) => '♝',
        (PieceColor::Black, Piece::Knight) => '♞',
        (PieceColor::Black, Piece::Pawn) => '♟',
    }
}
