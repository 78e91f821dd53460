//! FEN import and export.
//!
//! Castling availability is carried by the King/Rook `moved` flags and the
//! en-passant target by the capturing pawns' partner square, so a position
//! only emits an en-passant target when some pawn can actually use it.

use std::fmt::Write as _;

use crate::game_logic::{Game, GameConfig, LoadError};
use crate::game_state::{Color, Kind, Piece, Player, Square};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn malformed(field: &'static str, value: &str) -> LoadError {
    LoadError::Malformed {
        field,
        value: value.to_string(),
    }
}

fn parse_placement(placement: &str, players: &mut [Player; 2]) -> Result<(), LoadError> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(malformed("placement", placement));
    }

    for (row, rank_text) in ranks.into_iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;
        for c in rank_text.chars() {
            if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                file = file
                    .checked_add(skip as u8)
                    .filter(|&f| f <= 8)
                    .ok_or_else(|| malformed("placement", placement))?;
                continue;
            }
            let (kind, color) =
                Kind::from_fen_char(c).ok_or_else(|| malformed("placement", placement))?;
            let square =
                Square::from_coords(file, rank).ok_or_else(|| malformed("placement", placement))?;
            players[color.index()].spawn(kind, square);
            file += 1;
        }
        if file != 8 {
            return Err(malformed("placement", placement));
        }
    }
    Ok(())
}

fn parse_turn(side: &str) -> Result<Color, LoadError> {
    match side {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(malformed("side to move", side)),
    }
}

/// Rights for one color as `(king side, queen side)`.
fn parse_castling(castling: &str) -> Result<[(bool, bool); 2], LoadError> {
    let mut rights = [(false, false); 2];
    if castling == "-" {
        return Ok(rights);
    }
    for c in castling.chars() {
        match c {
            'K' => rights[Color::White.index()].0 = true,
            'Q' => rights[Color::White.index()].1 = true,
            'k' => rights[Color::Black.index()].0 = true,
            'q' => rights[Color::Black.index()].1 = true,
            _ => return Err(malformed("castling", castling)),
        }
    }
    Ok(rights)
}

/// Mark kings and rooks without a matching right as moved.
fn apply_castling(player: &mut Player, (king_side, queen_side): (bool, bool)) {
    let home = player.color().home_rank();
    for piece in player.pieces_mut() {
        let on_home_rank = piece.position.rank() == home;
        piece.moved = match piece.kind {
            Kind::King => !(king_side || queen_side),
            Kind::Rook if on_home_rank && piece.position.file() == 7 => !king_side,
            Kind::Rook if on_home_rank && piece.position.file() == 0 => !queen_side,
            Kind::Rook => true,
            _ => false,
        };
    }
}

/// Hand the en-passant right to the side-to-move pawns beside the victim.
fn apply_en_passant(players: &mut [Player; 2], turn: Color, target: &str) -> Result<(), LoadError> {
    if target == "-" {
        return Ok(());
    }
    let square: Square = target
        .parse()
        .map_err(|_| malformed("en passant", target))?;
    let expected_rank = turn.other().pawn_rank() as i8 + turn.other().forward();
    let victim = (square.rank() as i8 == expected_rank)
        .then(|| square.offset(0, -turn.forward()))
        .flatten()
        .ok_or_else(|| malformed("en passant", target))?;

    let is_enemy_pawn = players[turn.other().index()]
        .piece_at(victim)
        .is_some_and(|piece| piece.kind == Kind::Pawn);
    if !is_enemy_pawn {
        return Err(LoadError::EnPassant(victim));
    }

    for pawn in players[turn.index()].pieces_mut().filter(|piece| {
        piece.kind == Kind::Pawn
            && piece.position.rank() == victim.rank()
            && piece.position.file().abs_diff(victim.file()) == 1
    }) {
        pawn.en_passant = Some(victim);
    }
    Ok(())
}

fn parse_counter(field: &'static str, value: Option<&str>, default: u32) -> Result<u32, LoadError> {
    value.map_or(Ok(default), |text| {
        text.parse().map_err(|_| malformed(field, text))
    })
}

impl Game {
    /// Load a position with the default player names.
    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, LoadError> {
        Self::from_fen_with_config(fen, &GameConfig::default())
    }

    /// Load a position. Missing trailing fields default to `w - - 0 1`.
    pub fn from_fen_with_config(fen: &str, config: &GameConfig) -> Result<Self, LoadError> {
        let mut fields = fen.split_whitespace();
        let placement = fields.next().ok_or_else(|| malformed("placement", fen))?;
        let turn = parse_turn(fields.next().unwrap_or("w"))?;
        let castling = parse_castling(fields.next().unwrap_or("-"))?;
        let en_passant = fields.next().unwrap_or("-");
        let halfmove_clock = parse_counter("halfmove clock", fields.next(), 0)?;
        let fullmove_number = parse_counter("fullmove number", fields.next(), 1)?;
        if let Some(extra) = fields.next() {
            return Err(malformed("fen", extra));
        }

        let mut players = [
            Player::new(config.white_name.clone(), Color::White),
            Player::new(config.black_name.clone(), Color::Black),
        ];
        parse_placement(placement, &mut players)?;
        for player in &mut players {
            let rights = castling[player.color().index()];
            apply_castling(player, rights);
        }
        apply_en_passant(&mut players, turn, en_passant)?;

        Self::assemble(players, turn, halfmove_clock, fullmove_number)
    }

    /// The position as a FEN string.
    pub fn fen(&self) -> String {
        let mut fen = String::with_capacity(90);

        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match Square::from_coords(file, rank).and_then(|sq| self.board().cell_at(sq)) {
                    Some(cell) => {
                        if empty > 0 {
                            let _ = write!(fen, "{empty}");
                            empty = 0;
                        }
                        fen.push(cell.kind.fen_char(cell.color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                let _ = write!(fen, "{empty}");
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        let side = match self.turn() {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let _ = write!(
            fen,
            " {side} {} {} {} {}",
            self.castling_field(),
            self.en_passant_field(),
            self.halfmove_clock(),
            self.fullmove_number()
        );
        fen
    }

    fn castling_field(&self) -> String {
        let mut field = String::new();
        for color in Color::ALL {
            let player = self.player(color);
            let home = color.home_rank();
            let unmoved = |kind: Kind, file: u8| {
                Square::from_coords(file, home)
                    .and_then(|square| player.piece_at(square))
                    .is_some_and(|piece: &Piece| piece.kind == kind && !piece.moved)
            };
            if !unmoved(Kind::King, 4) {
                continue;
            }
            if unmoved(Kind::Rook, 7) {
                field.push(Kind::King.fen_char(color));
            }
            if unmoved(Kind::Rook, 0) {
                field.push(Kind::Queen.fen_char(color));
            }
        }
        if field.is_empty() {
            field.push('-');
        }
        field
    }

    fn en_passant_field(&self) -> String {
        let turn = self.turn();
        self.player(turn)
            .pieces()
            .filter(|piece| piece.kind == Kind::Pawn)
            .find_map(|piece| piece.en_passant)
            .and_then(|victim| victim.offset(0, turn.forward()))
            .map_or_else(|| "-".to_string(), |target| target.to_string())
    }
}
