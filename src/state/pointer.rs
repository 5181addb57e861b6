// Drag / click-click input tracking for the board canvas.
use crate::model::{Move, Square};

/// Square under a point in board pixels, white at the bottom.
pub fn square_at(x: f64, y: f64, board_px: f64) -> Option<Square> {
    if board_px <= 0.0 || x < 0.0 || y < 0.0 || x >= board_px || y >= board_px {
        return None;
    }
    let cell = board_px / 8.0;
    let file = (x / cell).floor() as u8;
    let row = (y / cell).floor() as u8;
    Square::new(file, 7u8.saturating_sub(row))
}

/// Top-left corner of a square in board pixels.
pub fn square_origin(sq: Square, board_px: f64) -> (f64, f64) {
    let cell = board_px / 8.0;
    (sq.file() as f64 * cell, (7 - sq.rank()) as f64 * cell)
}

pub fn square_center(sq: Square, board_px: f64) -> (f64, f64) {
    let (x, y) = square_origin(sq, board_px);
    let half = board_px / 16.0;
    (x + half, y + half)
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct PointerState {
    /// Square whose piece is picked up, by press or by click.
    pub selected: Option<Square>,
    /// Held between press and release.
    pub dragging: bool,
    pub x: f64,
    pub y: f64,
}

impl PointerState {
    /// Press on `sq`. Completes a click-click move when a piece was already selected.
    pub fn press(&mut self, sq: Option<Square>, has_piece: bool, x: f64, y: f64) -> Option<Move> {
        self.x = x;
        self.y = y;
        if let (Some(from), Some(to), false) = (self.selected, sq, self.dragging) {
            if from != to {
                self.selected = None;
                return Some(Move::new(from, to));
            }
        }
        match sq {
            Some(sq) if has_piece => {
                self.selected = Some(sq);
                self.dragging = true;
            }
            _ => self.cancel(),
        }
        None
    }

    pub fn drag_to(&mut self, x: f64, y: f64) {
        if self.dragging {
            self.x = x;
            self.y = y;
        }
    }

    /// Release over `sq`. Dropping on another square completes a move; dropping
    /// back on the origin leaves the piece selected for a click-click move.
    pub fn release(&mut self, sq: Option<Square>) -> Option<Move> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        let from = self.selected?;
        match sq {
            Some(to) if to != from => {
                self.selected = None;
                Some(Move::new(from, to))
            }
            Some(_) => None,
            None => {
                self.selected = None;
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        self.selected = None;
        self.dragging = false;
    }
}
