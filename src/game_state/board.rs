use super::{Cell, Color, Square};

/// Marker shown for an empty square.
pub const EMPTY_GLYPH: char = ' ';

/// 8×8 grid of cell contents, indexed `[rank][file]`.
///
/// At most one piece occupies a square; [`Board::place`] overwrites.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[Option<Cell>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub const fn empty() -> Self {
        Self {
            grid: [[None; 8]; 8],
        }
    }

    /// Contents of a square.
    #[inline]
    pub fn cell_at(&self, square: Square) -> Option<Cell> {
        let (row, col) = square.grid();
        self.grid[row][col]
    }

    /// Put a piece on a square, replacing whatever was there.
    #[inline]
    pub fn place(&mut self, square: Square, cell: Cell) {
        let (row, col) = square.grid();
        self.grid[row][col] = Some(cell);
    }

    /// Empty a square, returning its previous contents.
    #[inline]
    pub fn clear(&mut self, square: Square) -> Option<Cell> {
        let (row, col) = square.grid();
        self.grid[row][col].take()
    }

    #[inline]
    pub fn is_empty_at(&self, square: Square) -> bool {
        self.cell_at(square).is_none()
    }

    #[inline]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.cell_at(square).map(|cell| cell.color)
    }

    /// Occupant glyph, or [`EMPTY_GLYPH`].
    pub fn glyph_at(&self, square: Square) -> char {
        self.cell_at(square).map_or(EMPTY_GLYPH, Cell::glyph)
    }

    /// All occupied squares with their contents, a1 first.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Cell)> + '_ {
        Square::all().filter_map(|square| self.cell_at(square).map(|cell| (square, cell)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::Kind;

    fn sq(s: &str) -> Square {
        s.parse().expect("test square is valid")
    }

    const WHITE_ROOK: Cell = Cell {
        kind: Kind::Rook,
        color: Color::White,
    };

    #[test]
    fn test_empty_board() {
        let board = Board::empty();
        assert_eq!(board.occupied().count(), 0);
        assert!(Square::all().all(|square| board.glyph_at(square) == EMPTY_GLYPH));
    }

    #[test]
    fn test_place_is_idempotent() {
        let mut board = Board::empty();
        board.place(sq("a1"), WHITE_ROOK);
        let once = board.clone();
        board.place(sq("a1"), WHITE_ROOK);

        assert_eq!(board, once);
        assert_eq!(board.cell_at(sq("a1")), Some(WHITE_ROOK));
        assert_eq!(board.glyph_at(sq("a1")), '♖');
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut board = Board::empty();
        board.place(sq("d4"), WHITE_ROOK);

        assert_eq!(board.clear(sq("d4")), Some(WHITE_ROOK));
        assert_eq!(board.clear(sq("d4")), None);
        assert!(board.is_empty_at(sq("d4")));
    }

    #[test]
    fn test_place_overwrites_occupant() {
        let mut board = Board::empty();
        let black_knight = Cell {
            kind: Kind::Knight,
            color: Color::Black,
        };
        board.place(sq("c3"), black_knight);
        board.place(sq("c3"), WHITE_ROOK);

        assert_eq!(board.color_at(sq("c3")), Some(Color::White));
        assert_eq!(board.occupied().count(), 1);
    }

    #[test]
    fn test_occupied_order() {
        let mut board = Board::empty();
        board.place(sq("h8"), WHITE_ROOK);
        board.place(sq("a1"), WHITE_ROOK);

        let squares: Vec<Square> = board.occupied().map(|(square, _)| square).collect();
        assert_eq!(squares, vec![sq("a1"), sq("h8")]);
    }
}
