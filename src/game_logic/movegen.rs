//! Pseudo-legal move generation, one generator per piece kind.
//!
//! Generators look only at the piece itself. Sliding rays run to the edge of
//! the board; occupancy clipping happens in [`super::legality`].

use std::collections::BTreeSet;

use crate::game_state::{Kind, Piece, Square};

pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];
pub const DIAGONAL: [(i8, i8); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];
pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
pub const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Pseudo-legal targets of one piece.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidates {
    /// Movement rays, nearest square first. Steppers emit one single-square ray per target.
    pub rays: Vec<Vec<Square>>,
    /// Pawn diagonals, usable only to capture.
    pub captures: Vec<Square>,
    /// En-passant landing square, if this pawn holds the right this ply.
    pub en_passant: Option<Square>,
    /// King destinations on the c- and g-file, pending castling eligibility.
    pub castling: Vec<Square>,
}

impl Candidates {
    /// Every square this piece could conceivably reach.
    pub fn squares(&self) -> BTreeSet<Square> {
        self.rays
            .iter()
            .flatten()
            .chain(&self.captures)
            .chain(&self.en_passant)
            .chain(&self.castling)
            .copied()
            .collect()
    }
}

type Generator = fn(&Piece) -> Candidates;

/// Indexed by [`Kind::index`].
const GENERATORS: [Generator; 6] = [pawn, knight, bishop, rook, queen, king];

/// Pseudo-legal candidates for `piece` from its current position.
#[inline]
pub fn candidates(piece: &Piece) -> Candidates {
    GENERATORS[piece.kind.index()](piece)
}

/// Replacement kinds offered when `piece` stands on its promotion rank.
pub fn promotion_choices(piece: &Piece) -> &'static [Kind] {
    if piece.kind == Kind::Pawn && piece.position.rank() == piece.color.promotion_rank() {
        &Kind::PROMOTIONS
    } else {
        &[]
    }
}

/// Squares from `from` (exclusive) towards the board edge.
pub fn ray(from: Square, (df, dr): (i8, i8)) -> Vec<Square> {
    std::iter::successors(from.offset(df, dr), |square| square.offset(df, dr)).collect()
}

fn steps(from: Square, offsets: &[(i8, i8)]) -> Vec<Vec<Square>> {
    offsets
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .map(|square| vec![square])
        .collect()
}

fn rays(from: Square, directions: &[(i8, i8)]) -> Vec<Vec<Square>> {
    directions
        .iter()
        .map(|&direction| ray(from, direction))
        .filter(|ray| !ray.is_empty())
        .collect()
}

fn pawn(piece: &Piece) -> Candidates {
    let from = piece.position;
    let forward = piece.color.forward();

    let mut advance = Vec::with_capacity(2);
    if let Some(one) = from.offset(0, forward) {
        advance.push(one);
        if from.rank() == piece.color.pawn_rank()
            && let Some(two) = one.offset(0, forward)
        {
            advance.push(two);
        }
    }

    let captures = [-1, 1]
        .into_iter()
        .filter_map(|df| from.offset(df, forward))
        .collect();

    let en_passant = piece
        .en_passant
        .filter(|victim| {
            from.rank() == piece.color.en_passant_rank()
                && victim.rank() == from.rank()
                && victim.file().abs_diff(from.file()) == 1
        })
        .and_then(|victim| victim.offset(0, forward));

    Candidates {
        rays: if advance.is_empty() { vec![] } else { vec![advance] },
        captures,
        en_passant,
        castling: vec![],
    }
}

fn knight(piece: &Piece) -> Candidates {
    Candidates {
        rays: steps(piece.position, &KNIGHT_JUMPS),
        ..Candidates::default()
    }
}

fn bishop(piece: &Piece) -> Candidates {
    Candidates {
        rays: rays(piece.position, &DIAGONAL),
        ..Candidates::default()
    }
}

fn rook(piece: &Piece) -> Candidates {
    Candidates {
        rays: rays(piece.position, &ORTHOGONAL),
        ..Candidates::default()
    }
}

fn queen(piece: &Piece) -> Candidates {
    Candidates {
        rays: rays(piece.position, &ORTHOGONAL)
            .into_iter()
            .chain(rays(piece.position, &DIAGONAL))
            .collect(),
        ..Candidates::default()
    }
}

fn king(piece: &Piece) -> Candidates {
    let from = piece.position;
    let on_home_square = from.rank() == piece.color.home_rank() && from.file() == 4;

    let castling = if !piece.moved && on_home_square {
        [2, 6]
            .into_iter()
            .filter_map(|file| Square::from_coords(file, from.rank()))
            .collect()
    } else {
        vec![]
    };

    Candidates {
        rays: steps(from, &KING_STEPS),
        castling,
        ..Candidates::default()
    }
}
