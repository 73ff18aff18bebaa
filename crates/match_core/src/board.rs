//! Board-widget collaborator.

use cozy_chess::Square;

/// Overlay kinds a board widget can draw on a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// The selected origin.
    Selected,
    /// A legal destination of the selected origin.
    Candidate,
    /// Transient rejection flash.
    Error,
    LastMove,
}

/// What the core needs from whatever draws the board.
///
/// Highlights are layered: removing one kind from a square leaves the others.
pub trait BoardView {
    fn set_position(&mut self, fen: &str);

    fn highlight(&mut self, square: Square, kind: Highlight);

    fn unhighlight(&mut self, square: Square, kind: Highlight);

    fn clear_highlights(&mut self);

    /// Back to the start position with no highlights.
    fn reset(&mut self);
}
