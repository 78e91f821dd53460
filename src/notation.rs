//! Move and promotion tokens as typed at the console.

use std::fmt;
use std::str::FromStr;

use crate::game_state::{Kind, Square, SquareParseError};

/// A requested move from one square to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

/// Error for a move or promotion token that cannot be understood.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("expected a move like 'e2 e4'")]
    Empty,
    #[error("expected two squares, found {0}")]
    WrongCount(usize),
    #[error("invalid square: {0}")]
    Square(#[from] SquareParseError),
    #[error("'{0}' is not one of queen, rook, knight, bishop")]
    Promotion(String),
}

/// Parses `"e2 e4"`; the compact `"e2e4"` form is accepted as well.
impl FromStr for Move {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let (from, to) = match tokens[..] {
            [] => return Err(TokenError::Empty),
            [compact] if compact.len() == 4 && compact.is_char_boundary(2) => {
                compact.split_at(2)
            }
            [from, to] => (from, to),
            _ => return Err(TokenError::WrongCount(tokens.len())),
        };
        Ok(Self::new(from.parse()?, to.parse()?))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.from, self.to)
    }
}

/// Parse a promotion choice: one of the four lowercase kind names.
pub fn parse_promotion(token: &str) -> Result<Kind, TokenError> {
    let token = token.trim();
    token
        .parse::<Kind>()
        .ok()
        .filter(|kind| Kind::PROMOTIONS.contains(kind))
        .ok_or_else(|| TokenError::Promotion(token.to_string()))
}
