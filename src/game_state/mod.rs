//! Board representation: squares, cells, pieces and the players that own them.

mod board;
mod piece;
mod player;
mod square;

pub use board::{Board, EMPTY_GLYPH};
pub use piece::{Cell, Color, Kind, KindParseError, Piece, PieceId, PieceIdParseError};
pub use player::Player;
pub use square::{Square, SquareParseError};
