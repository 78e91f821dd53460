use std::fmt;
use std::str::FromStr;

/// A single square on the chess board.
///
/// Internally stores index 0-63 where:
/// - 0 = a1, 7 = h1
/// - 56 = a8, 63 = h8
///
/// The index doubles as the board grid coordinate `(rank - 1, file)`,
/// so conversions in both directions are O(1) and total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Creates a new Square if the index is valid (0-63).
    #[inline]
    pub const fn new(idx: u8) -> Option<Self> {
        if idx < Self::COUNT as u8 {
            Some(Square(idx))
        } else {
            None
        }
    }

    /// Creates a Square from zero-based file (a = 0) and rank (1 = 0).
    #[inline]
    pub const fn from_coords(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    /// Creates a Square from a grid coordinate `(row, column)`.
    #[inline]
    pub const fn from_grid(row: usize, col: usize) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Square((row * 8 + col) as u8))
        } else {
            None
        }
    }

    /// Returns the internal index value (0-63).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Zero-based file, a = 0.
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    /// Zero-based rank, rank 1 = 0.
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Grid coordinate `(row, column)` of this square.
    #[inline]
    pub const fn grid(self) -> (usize, usize) {
        (self.rank() as usize, self.file() as usize)
    }

    /// Returns the file letter ('a'-'h') of this square.
    pub fn file_char(self) -> char {
        (b'a' + self.file()) as char
    }

    /// Returns the rank digit ('1'-'8') of this square.
    pub fn rank_char(self) -> char {
        (b'1' + self.rank()) as char
    }

    /// Square reached by stepping `df` files and `dr` ranks, if still on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Square::from_coords(file as u8, rank as u8)
        } else {
            None
        }
    }

    /// Iterates all 64 squares from a1 to h8.
    pub fn all() -> impl DoubleEndedIterator<Item = Square> {
        (0..Self::COUNT as u8).map(Square)
    }
}

/// Parse algebraic notation like "e4" into a Square.
///
/// # Examples
/// ```
/// # use console_chess::game_state::Square;
/// let square: Square = "e4".parse().unwrap();
/// assert_eq!(square.index(), 28);
/// ```
impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(SquareParseError::WrongLength);
        };

        let file = file.to_ascii_lowercase();
        let rank = rank.to_digit(10).ok_or(SquareParseError::BadRank)?;

        if !('a'..='h').contains(&file) {
            return Err(SquareParseError::BadFile);
        }
        if !(1..=8).contains(&rank) {
            return Err(SquareParseError::BadRank);
        }

        Ok(Square((rank as u8 - 1) * 8 + (file as u8 - b'a')))
    }
}

/// Display square in algebraic notation (e.g., "e4").
impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

/// Error type for parsing square notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SquareParseError {
    /// Square notation must be exactly 2 characters
    #[error("square must be 2 characters (e.g., 'e4')")]
    WrongLength,
    /// File must be a letter from a-h
    #[error("file must be a-h")]
    BadFile,
    /// Rank must be a digit from 1-8
    #[error("rank must be 1-8")]
    BadRank,
}
