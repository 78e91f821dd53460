use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::Square;

/// Side of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank delta of a pawn advance.
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Zero-based rank of the king and rooks at the start of a game.
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Zero-based rank pawns start on and may double-step from.
    #[inline]
    pub const fn pawn_rank(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Black => 6,
        }
    }

    /// Zero-based rank a pawn must stand on to capture en passant.
    #[inline]
    pub const fn en_passant_rank(self) -> u8 {
        match self {
            Color::White => 4,
            Color::Black => 3,
        }
    }

    /// Zero-based rank on which pawns promote.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Color::White => "white",
            Color::Black => "black",
        })
    }
}

/// Piece kind. Move generation and legality dispatch on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Pawn,
        Kind::Knight,
        Kind::Bishop,
        Kind::Rook,
        Kind::Queen,
        Kind::King,
    ];

    /// Kinds a pawn may promote to, in prompt order.
    pub const PROMOTIONS: [Kind; 4] = [Kind::Queen, Kind::Rook, Kind::Knight, Kind::Bishop];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase name, as typed at the promotion prompt.
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Pawn => "pawn",
            Kind::Knight => "knight",
            Kind::Bishop => "bishop",
            Kind::Rook => "rook",
            Kind::Queen => "queen",
            Kind::King => "king",
        }
    }

    /// Bishops, rooks and queens move along rays.
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, Kind::Bishop | Kind::Rook | Kind::Queen)
    }

    /// Unicode chess glyph for this kind in the given color.
    pub const fn glyph(self, color: Color) -> char {
        match (self, color) {
            (Kind::Pawn, Color::White) => '♙',
            (Kind::Knight, Color::White) => '♘',
            (Kind::Bishop, Color::White) => '♗',
            (Kind::Rook, Color::White) => '♖',
            (Kind::Queen, Color::White) => '♕',
            (Kind::King, Color::White) => '♔',
            (Kind::Pawn, Color::Black) => '♟',
            (Kind::Knight, Color::Black) => '♞',
            (Kind::Bishop, Color::Black) => '♝',
            (Kind::Rook, Color::Black) => '♜',
            (Kind::Queen, Color::Black) => '♛',
            (Kind::King, Color::Black) => '♚',
        }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    pub const fn fen_char(self, color: Color) -> char {
        let c = match self {
            Kind::Pawn => 'p',
            Kind::Knight => 'n',
            Kind::Bishop => 'b',
            Kind::Rook => 'r',
            Kind::Queen => 'q',
            Kind::King => 'k',
        };
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Inverse of [`Kind::fen_char`].
    pub fn from_fen_char(c: char) -> Option<(Kind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'p' => Kind::Pawn,
            'n' => Kind::Knight,
            'b' => Kind::Bishop,
            'r' => Kind::Rook,
            'q' => Kind::Queen,
            'k' => Kind::King,
            _ => return None,
        };
        Some((kind, color))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognised piece-kind name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown piece kind '{0}'")]
pub struct KindParseError(pub String);

impl FromStr for Kind {
    type Err = KindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| KindParseError(s.to_string()))
    }
}

/// Stable identity of a piece for the whole game.
///
/// Derived from the kind and the square the piece entered the game on, never
/// from its current square. `serial` separates pieces that would otherwise
/// share a key, e.g. two queens promoted on the same square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId {
    kind: Kind,
    origin: Square,
    serial: u8,
}

impl PieceId {
    #[inline]
    pub const fn new(kind: Kind, origin: Square) -> Self {
        Self::with_serial(kind, origin, 0)
    }

    #[inline]
    pub const fn with_serial(kind: Kind, origin: Square, serial: u8) -> Self {
        Self {
            kind,
            origin,
            serial,
        }
    }

    #[inline]
    pub const fn kind(self) -> Kind {
        self.kind
    }

    #[inline]
    pub const fn origin(self) -> Square {
        self.origin
    }

    #[inline]
    pub const fn serial(self) -> u8 {
        self.serial
    }
}

/// Formats as `pawn_e2`, or `queen_e8_1` for a repeated key.
impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.origin)?;
        if self.serial > 0 {
            write!(f, "_{}", self.serial)?;
        }
        Ok(())
    }
}

/// Error for a malformed piece key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed piece key '{0}'")]
pub struct PieceIdParseError(pub String);

impl FromStr for PieceId {
    type Err = PieceIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PieceIdParseError(s.to_string());
        let mut parts = s.split('_');
        let kind = parts.next().ok_or_else(err)?.parse().map_err(|_| err())?;
        let origin = parts.next().ok_or_else(err)?.parse().map_err(|_| err())?;
        let serial = match parts.next() {
            Some(serial) => serial.parse().map_err(|_| err())?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self::with_serial(kind, origin, serial))
    }
}

/// A live piece and its move-relevant state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub kind: Kind,
    pub color: Color,
    pub position: Square,
    pub previous_position: Option<Square>,
    /// Only meaningful for kings and rooks; drives castling rights.
    pub moved: bool,
    /// Square of an enemy pawn this pawn may capture en passant on the current ply.
    pub en_passant: Option<Square>,
    /// Legal destinations, recomputed every turn.
    pub legal_moves: BTreeSet<Square>,
}

impl Piece {
    pub fn new(id: PieceId, color: Color, position: Square) -> Self {
        Self {
            id,
            kind: id.kind(),
            color,
            position,
            previous_position: None,
            moved: false,
            en_passant: None,
            legal_moves: BTreeSet::new(),
        }
    }

    /// Board cell this piece occupies.
    #[inline]
    pub const fn cell(&self) -> Cell {
        Cell {
            kind: self.kind,
            color: self.color,
        }
    }

    #[inline]
    pub const fn glyph(&self) -> char {
        self.kind.glyph(self.color)
    }
}

/// Contents of an occupied board square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub kind: Kind,
    pub color: Color,
}

impl Cell {
    #[inline]
    pub const fn glyph(self) -> char {
        self.kind.glyph(self.color)
    }
}
