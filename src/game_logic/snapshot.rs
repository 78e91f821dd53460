//! Persisted shape of a game: names, side to move and each living piece.
//!
//! Only placement and special-move state are saved. Legal moves and king
//! flags are recomputed when a snapshot is loaded.

use std::collections::BTreeMap;

use super::engine::{Game, LoadError};
use crate::game_state::{Color, Kind, Piece, PieceId, Player, Square};

/// Saved state of one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavedPiece {
    /// Position only.
    At(Square),
    /// A pawn and the enemy pawn it may take en passant this ply.
    EnPassant(Square, Square),
    /// A king or rook and whether it has moved.
    Castling(Square, bool),
}

impl SavedPiece {
    #[inline]
    pub fn square(self) -> Square {
        match self {
            Self::At(square) | Self::EnPassant(square, _) | Self::Castling(square, _) => square,
        }
    }
}

/// A game as an external store would keep it, pieces keyed by identity (`"pawn_e2"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub white_name: String,
    pub black_name: String,
    pub turn: Color,
    pub white: BTreeMap<String, SavedPiece>,
    pub black: BTreeMap<String, SavedPiece>,
}

impl Snapshot {
    pub fn pieces(&self, color: Color) -> &BTreeMap<String, SavedPiece> {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

fn save(piece: &Piece) -> SavedPiece {
    match (piece.kind, piece.en_passant) {
        (Kind::King | Kind::Rook, _) => SavedPiece::Castling(piece.position, piece.moved),
        (Kind::Pawn, Some(partner)) => SavedPiece::EnPassant(piece.position, partner),
        _ => SavedPiece::At(piece.position),
    }
}

fn load(key: &str, saved: SavedPiece, color: Color) -> Result<Piece, LoadError> {
    let malformed = || LoadError::Malformed {
        field: "piece",
        value: key.to_string(),
    };
    let id: PieceId = key.parse().map_err(|_| malformed())?;
    let mut piece = Piece::new(id, color, saved.square());

    match saved {
        SavedPiece::At(_) => {}
        SavedPiece::EnPassant(_, partner) if id.kind() == Kind::Pawn => {
            piece.en_passant = Some(partner);
        }
        SavedPiece::Castling(_, moved) if matches!(id.kind(), Kind::King | Kind::Rook) => {
            piece.moved = moved;
        }
        _ => return Err(malformed()),
    }
    Ok(piece)
}

impl Game {
    /// Capture the persisted shape of this game.
    pub fn snapshot(&self) -> Snapshot {
        let saved = |color: Color| {
            self.player(color)
                .pieces()
                .map(|piece| (piece.id.to_string(), save(piece)))
                .collect::<BTreeMap<_, _>>()
        };
        Snapshot {
            white_name: self.player(Color::White).name().to_string(),
            black_name: self.player(Color::Black).name().to_string(),
            turn: self.turn(),
            white: saved(Color::White),
            black: saved(Color::Black),
        }
    }

    /// Rebuild a game from a snapshot, recomputing all legality state.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, LoadError> {
        let mut players = [
            Player::new(snapshot.white_name.clone(), Color::White),
            Player::new(snapshot.black_name.clone(), Color::Black),
        ];
        for player in &mut players {
            let color = player.color();
            for (key, &saved) in snapshot.pieces(color) {
                player.insert(load(key, saved, color)?);
            }
        }
        Self::assemble(players, snapshot.turn, 0, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::Move;

    fn sq(s: &str) -> Square {
        s.parse().expect("test square is valid")
    }

    fn mv(token: &str) -> Move {
        token.parse().expect("test move is valid")
    }

    #[test]
    fn test_snapshot_of_new_game() {
        let snapshot = Game::new().snapshot();

        assert_eq!(snapshot.white_name, "White");
        assert_eq!(snapshot.turn, Color::White);
        assert_eq!(snapshot.white.len(), 16);
        assert_eq!(snapshot.black.len(), 16);
        assert_eq!(snapshot.white.get("pawn_e2"), Some(&SavedPiece::At(sq("e2"))));
        assert_eq!(
            snapshot.black.get("king_e8"),
            Some(&SavedPiece::Castling(sq("e8"), false))
        );
    }

    #[test]
    fn test_snapshot_records_en_passant_partner() {
        let mut game = Game::new();
        for token in ["e2 e4", "a7 a6", "e4 e5", "d7 d5"] {
            game.play(mv(token)).expect("legal move");
        }
        let snapshot = game.snapshot();

        assert_eq!(
            snapshot.white.get("pawn_e2"),
            Some(&SavedPiece::EnPassant(sq("e5"), sq("d5")))
        );
        assert_eq!(snapshot.black.get("pawn_d7"), Some(&SavedPiece::At(sq("d5"))));
    }

    #[test]
    fn test_reload_rebuilds_equivalent_position() {
        let mut game = Game::new();
        for token in ["e2 e4", "a7 a6", "e4 e5", "d7 d5", "g1 f3", "a6 a5", "f1 e2", "a8 a6"] {
            game.play(mv(token)).expect("legal move");
        }
        let reloaded = Game::from_snapshot(&game.snapshot()).expect("snapshot is valid");

        assert_eq!(reloaded.board(), game.board());
        assert_eq!(reloaded.turn(), game.turn());
        for color in Color::ALL {
            let expected: Vec<_> = game.all_legal_moves(color).collect();
            let actual: Vec<_> = reloaded.all_legal_moves(color).collect();
            assert_eq!(actual, expected);
            assert_eq!(reloaded.status(color), game.status(color));
        }
        let rook = reloaded.piece_at(sq("a6")).expect("rook moved to a6");
        assert!(rook.moved);
    }

    #[test]
    fn test_reload_keeps_promoted_identity() {
        let mut game =
            Game::from_fen("r1bqkbnr/pPpppppp/2n5/8/8/8/PP1PPPPP/RNBQKBNR w KQkq - 0 1")
                .expect("valid FEN");
        game.play(mv("b7 b8")).expect("legal move");
        game.promote(Kind::Queen).expect("valid promotion");

        let snapshot = game.snapshot();
        assert_eq!(snapshot.white.get("queen_b8"), Some(&SavedPiece::At(sq("b8"))));

        let reloaded = Game::from_snapshot(&snapshot).expect("snapshot is valid");
        assert_eq!(
            reloaded.piece_at(sq("b8")).map(|p| p.id),
            Some(PieceId::new(Kind::Queen, sq("b8")))
        );
    }

    #[test]
    fn test_load_rejects_bad_identity() {
        let mut snapshot = Game::new().snapshot();
        snapshot.white.insert("dragon_e4".to_string(), SavedPiece::At(sq("e4")));

        assert_eq!(
            Game::from_snapshot(&snapshot),
            Err(LoadError::Malformed {
                field: "piece",
                value: "dragon_e4".to_string()
            })
        );
    }

    #[test]
    fn test_load_rejects_mismatched_state() {
        let mut snapshot = Game::new().snapshot();
        snapshot
            .white
            .insert("knight_b1".to_string(), SavedPiece::Castling(sq("b1"), true));

        assert!(matches!(
            Game::from_snapshot(&snapshot),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_load_rejects_missing_king() {
        let mut snapshot = Game::new().snapshot();
        snapshot.black.remove("king_e8");

        assert_eq!(
            Game::from_snapshot(&snapshot),
            Err(LoadError::MissingKing(Color::Black))
        );
    }

    #[test]
    fn test_load_rejects_overlap() {
        let mut snapshot = Game::new().snapshot();
        snapshot.white.insert("queen_d1_1".to_string(), SavedPiece::At(sq("e2")));

        assert_eq!(Game::from_snapshot(&snapshot), Err(LoadError::Overlap(sq("e2"))));
    }

    #[test]
    fn test_load_rejects_waiting_side_in_check() {
        let mut snapshot = Game::new().snapshot();
        snapshot.white.remove("pawn_e2");
        snapshot.black.remove("pawn_e7");
        snapshot.white.insert("queen_d1".to_string(), SavedPiece::At(sq("e2")));

        assert_eq!(
            Game::from_snapshot(&snapshot),
            Err(LoadError::OpponentInCheck(Color::Black))
        );

        snapshot.turn = Color::Black;
        let game = Game::from_snapshot(&snapshot).expect("side to move may be in check");
        assert!(game.status(Color::Black).check);
    }

    #[test]
    fn test_load_rejects_en_passant_without_victim() {
        let mut snapshot = Game::new().snapshot();
        snapshot
            .white
            .insert("pawn_e2".to_string(), SavedPiece::EnPassant(sq("e2"), sq("d2")));

        assert_eq!(
            Game::from_snapshot(&snapshot),
            Err(LoadError::EnPassant(sq("d2")))
        );
    }
}
