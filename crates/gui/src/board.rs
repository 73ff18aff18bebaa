//! Chess board model and widget rendering

use std::collections::{HashMap, HashSet};

use cozy_chess::{Board, File, Rank, Square};
use iced::widget::{button, column, container, row, text};
use iced::{Color, Element, Length};
use match_core::{BoardView, Highlight};
use tracing::warn;

use crate::styles::{self, SQUARE_SIZE};

/// Message type for board interactions
#[derive(Debug, Clone)]
pub enum BoardMessage {
    SquareClicked(Square),
}

/// What the board shows: the last position pushed by the coordinator and the
/// highlight layers on each square.
#[derive(Debug, Clone, Default)]
pub struct BoardModel {
    board: Board,
    highlights: HashMap<Square, HashSet<Highlight>>,
}

impl BoardModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn has(&self, square: Square, kind: Highlight) -> bool {
        self.highlights
            .get(&square)
            .is_some_and(|layers| layers.contains(&kind))
    }
}

impl BoardView for BoardModel {
    fn set_position(&mut self, fen: &str) {
        match Board::from_fen(fen, false) {
            Ok(board) => self.board = board,
            Err(err) => warn!(fen, "board cannot display position: {err:?}"),
        }
    }

    fn highlight(&mut self, square: Square, kind: Highlight) {
        self.highlights.entry(square).or_default().insert(kind);
    }

    fn unhighlight(&mut self, square: Square, kind: Highlight) {
        if let Some(layers) = self.highlights.get_mut(&square) {
            layers.remove(&kind);
            if layers.is_empty() {
                self.highlights.remove(&square);
            }
        }
    }

    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Renders the chess board
pub struct BoardWidget<'a> {
    model: &'a BoardModel,
    flipped: bool,
}

impl<'a> BoardWidget<'a> {
    pub fn new(model: &'a BoardModel, flipped: bool) -> Self {
        Self { model, flipped }
    }

    /// Create the board view element
    pub fn view(&self) -> Element<'a, BoardMessage> {
        let mut board_column = column![].spacing(0);

        for rank in 0..8 {
            let display_rank = if self.flipped { rank } else { 7 - rank };
            let mut rank_row = row![].spacing(0);

            for file in 0..8 {
                let display_file = if self.flipped { 7 - file } else { file };
                let square = Square::new(File::index(display_file), Rank::index(display_rank));
                rank_row = rank_row.push(self.render_square(square, display_rank, display_file));
            }

            board_column = board_column.push(rank_row);
        }

        container(board_column)
            .style(|_theme| container::Style {
                border: iced::Border {
                    color: Color::from_rgb(0.3, 0.3, 0.3),
                    width: 2.0,
                    radius: 0.0.into(),
                },
                ..Default::default()
            })
            .into()
    }

    /// Render a single square
    fn render_square(&self, square: Square, rank: usize, file: usize) -> Element<'a, BoardMessage> {
        let model = self.model;
        let is_light = (rank + file) % 2 == 1;
        let mut bg_color = if is_light {
            styles::LIGHT_SQUARE
        } else {
            styles::DARK_SQUARE
        };

        if model.has(square, Highlight::LastMove) {
            bg_color = blend_colors(bg_color, styles::LAST_MOVE_SQUARE);
        }
        if model.has(square, Highlight::Selected) {
            bg_color = styles::SELECTED_SQUARE;
        }

        let piece = model
            .board
            .piece_on(square)
            .zip(model.board.color_on(square));
        let is_candidate = model.has(square, Highlight::Candidate);

        // Capturable pieces get a tint, empty targets a dot.
        if is_candidate && piece.is_some() {
            bg_color = blend_colors(bg_color, styles::CANDIDATE_CAPTURE);
        }
        if model.has(square, Highlight::Error) {
            bg_color = styles::ERROR_SQUARE;
        }

        let content: Element<'a, BoardMessage> = if let Some((piece, side)) = piece {
            text(styles::piece_char(side, piece).to_string())
                .size(SQUARE_SIZE * 0.75)
                .center()
                .into()
        } else if is_candidate {
            text("●")
                .size(SQUARE_SIZE * 0.3)
                .color(styles::CANDIDATE_DOT)
                .center()
                .into()
        } else {
            text("").into()
        };

        button(
            container(content)
                .width(SQUARE_SIZE)
                .height(SQUARE_SIZE)
                .center_x(Length::Fill)
                .center_y(Length::Fill),
        )
        .width(SQUARE_SIZE)
        .height(SQUARE_SIZE)
        .style(move |_theme, status| {
            let hover_overlay = match status {
                button::Status::Hovered => 0.1,
                button::Status::Pressed => 0.2,
                _ => 0.0,
            };
            button::Style {
                background: Some(iced::Background::Color(if hover_overlay > 0.0 {
                    blend_colors(bg_color, Color::from_rgba(1.0, 1.0, 1.0, hover_overlay))
                } else {
                    bg_color
                })),
                border: iced::Border::default(),
                text_color: Color::BLACK,
                ..Default::default()
            }
        })
        .on_press(BoardMessage::SquareClicked(square))
        .into()
    }
}

/// Blend two colors together
fn blend_colors(base: Color, overlay: Color) -> Color {
    let alpha = overlay.a;
    Color::from_rgb(
        base.r * (1.0 - alpha) + overlay.r * alpha,
        base.g * (1.0 - alpha) + overlay.g * alpha,
        base.b * (1.0 - alpha) + overlay.b * alpha,
    )
}
