// Piece placement for rendering: just the knight and the queen.
use crate::model::{KNIGHT_START, QUEEN_SQUARE, Square};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Piece {
    WhiteKnight,
    BlackQueen,
}

impl Piece {
    pub fn fen_char(self) -> char {
        match self {
            Piece::WhiteKnight => 'N',
            Piece::BlackQueen => 'q',
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Piece::WhiteKnight => "\u{2658}",
            Piece::BlackQueen => "\u{265B}",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardPosition {
    knight: Square,
    /// `None` once the knight has landed on the queen.
    queen: Option<Square>,
}

impl BoardPosition {
    pub fn initial() -> Self {
        Self { knight: KNIGHT_START, queen: Some(QUEEN_SQUARE) }
    }

    #[cfg(test)]
    pub fn knight(&self) -> Square {
        self.knight
    }

    #[cfg(test)]
    pub fn queen(&self) -> Option<Square> {
        self.queen
    }

    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        if sq == self.knight {
            Some(Piece::WhiteKnight)
        } else if self.queen == Some(sq) {
            Some(Piece::BlackQueen)
        } else {
            None
        }
    }

    /// Moves the knight, capturing the queen if it lands on her.
    pub fn relocate_knight(&mut self, to: Square) {
        if self.queen == Some(to) {
            self.queen = None;
        }
        self.knight = to;
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> {
        std::iter::once((self.knight, Piece::WhiteKnight))
            .chain(self.queen.map(|q| (q, Piece::BlackQueen)))
    }

    /// Forsyth-Edwards notation, white to move, no castling or en passant.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let piece = Square::new(file, rank).and_then(|sq| self.piece_at(sq));
                match piece {
                    Some(p) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(p.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }
        fen.push_str(" w - - 0 1");
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_fen() {
        assert_eq!(BoardPosition::initial().to_fen(), "7N/8/8/3q4/8/8/8/8 w - - 0 1");
    }

    #[test]
    fn knight_moves_and_captures() {
        let mut board = BoardPosition::initial();
        board.relocate_knight(Square::named(b"a1"));
        assert_eq!(board.to_fen(), "8/8/8/3q4/8/8/8/N7 w - - 0 1");
        assert_eq!(board.piece_at(Square::named(b"h8")), None);
        assert_eq!(board.piece_at(Square::named(b"a1")), Some(Piece::WhiteKnight));

        board.relocate_knight(QUEEN_SQUARE);
        assert_eq!(board.queen(), None);
        assert_eq!(board.pieces().count(), 1);
        assert_eq!(board.to_fen(), "8/8/8/3N4/8/8/8/8 w - - 0 1");
    }
}
