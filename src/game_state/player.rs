use std::collections::BTreeMap;

use super::{Color, Kind, Piece, PieceId, Square};

/// Back-rank layout from the a-file to the h-file.
const BACK_RANK: [Kind; 8] = [
    Kind::Rook,
    Kind::Knight,
    Kind::Bishop,
    Kind::Queen,
    Kind::King,
    Kind::Bishop,
    Kind::Knight,
    Kind::Rook,
];

/// One side of the game and its live pieces, keyed by stable identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    name: String,
    color: Color,
    pieces: BTreeMap<PieceId, Piece>,
}

impl Player {
    /// A player with no pieces.
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
            pieces: BTreeMap::new(),
        }
    }

    /// A player with the standard sixteen pieces on their spawn squares.
    pub fn with_starting_pieces(name: impl Into<String>, color: Color) -> Self {
        let mut player = Self::new(name, color);
        for (file, kind) in BACK_RANK.into_iter().enumerate() {
            let file = file as u8;
            if let Some(square) = Square::from_coords(file, color.home_rank()) {
                player.spawn(kind, square);
            }
            if let Some(square) = Square::from_coords(file, color.pawn_rank()) {
                player.spawn(Kind::Pawn, square);
            }
        }
        player
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    pub fn pieces_mut(&mut self) -> impl Iterator<Item = &mut Piece> {
        self.pieces.values_mut()
    }

    #[cfg(test)]
    pub(crate) fn get(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&id)
    }

    pub fn get_mut(&mut self, id: PieceId) -> Option<&mut Piece> {
        self.pieces.get_mut(&id)
    }

    /// The piece currently standing on `square`, if it belongs to this player.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.pieces().find(|piece| piece.position == square)
    }

    pub fn piece_at_mut(&mut self, square: Square) -> Option<&mut Piece> {
        self.pieces_mut().find(|piece| piece.position == square)
    }

    pub fn king(&self) -> Option<&Piece> {
        self.pieces().find(|piece| piece.kind == Kind::King)
    }

    pub fn king_square(&self) -> Option<Square> {
        self.king().map(|king| king.position)
    }

    /// Add a new piece of `kind` on `square` under a fresh identity.
    pub fn spawn(&mut self, kind: Kind, square: Square) -> PieceId {
        let id = (0..=u8::MAX)
            .map(|serial| PieceId::with_serial(kind, square, serial))
            .find(|id| !self.pieces.contains_key(id))
            .unwrap_or(PieceId::new(kind, square));
        self.insert(Piece::new(id, self.color, square));
        id
    }

    /// Insert a piece under its own identity, replacing any previous holder.
    pub fn insert(&mut self, piece: Piece) -> Option<Piece> {
        self.pieces.insert(piece.id, piece)
    }

    pub fn remove(&mut self, id: PieceId) -> Option<Piece> {
        self.pieces.remove(&id)
    }
}
