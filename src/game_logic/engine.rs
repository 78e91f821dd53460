use std::collections::BTreeSet;

use log::{debug, info};

use super::legality::{self, Context};
use super::movegen;
use crate::feedback::{CheckInfo, FeedbackSource};
use crate::game_state::{Board, Cell, Color, Kind, Piece, PieceId, Player, Square};
use crate::notation::Move;

/// Names of the two players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub white_name: String,
    pub black_name: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            white_name: "White".to_string(),
            black_name: "Black".to_string(),
        }
    }
}

/// Check, checkmate and stalemate flags of one king, recomputed every turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KingStatus {
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    /// Square of the checking piece; `None` without check or in double check.
    pub checked_from: Option<Square>,
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

/// Result of a successful [`Game::play`] or [`Game::promote`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Played {
    /// The move was applied and the turn passed.
    Moved { captured: Option<Kind> },
    /// A pawn reached its last rank; [`Game::promote`] must finish the turn.
    AwaitingPromotion(Square),
    /// The waiting pawn was replaced and the turn passed.
    Promoted(Kind),
}

/// Why a move or promotion was refused. The game is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("no {0} piece on {1}")]
    NoPiece(Color, Square),
    #[error("{kind} on {from} cannot move to {to}")]
    Illegal { kind: Kind, from: Square, to: Square },
    #[error("that move would leave the {0} king in check")]
    SelfCheck(Color),
    #[error("the pawn on {0} must be promoted first")]
    PromotionPending(Square),
    #[error("no pawn is waiting for promotion")]
    NoPromotionPending,
    #[error("a pawn cannot promote to {0}")]
    InvalidPromotion(Kind),
    #[error("the game is over")]
    GameOver,
}

/// Why a saved or described position could not be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("{0} has no king")]
    MissingKing(Color),
    #[error("{0} has more than one king")]
    ExtraKing(Color),
    #[error("two pieces stand on {0}")]
    Overlap(Square),
    #[error("malformed {field}: '{value}'")]
    Malformed { field: &'static str, value: String },
    #[error("no capturable pawn for en passant on {0}")]
    EnPassant(Square),
    #[error("{0} king is in check with the other side to move")]
    OpponentInCheck(Color),
}

/// Board and piece state saved before a provisional move.
#[derive(Debug, Clone)]
struct Checkpoint {
    board: Board,
    players: [Player; 2],
}

/// One game of chess: board, both players and whose turn it is.
///
/// Every turn ends with a full recompute of legal moves and king flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    board: Board,
    players: [Player; 2],
    turn: Color,
    status: [KingStatus; 2],
    pending_promotion: Option<Square>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A new game from the standard starting position.
    #[inline]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        let players = [
            Player::with_starting_pieces(config.white_name, Color::White),
            Player::with_starting_pieces(config.black_name, Color::Black),
        ];
        let mut board = Board::empty();
        for piece in players.iter().flat_map(Player::pieces) {
            board.place(piece.position, piece.cell());
        }

        let mut game = Self {
            board,
            players,
            turn: Color::White,
            status: [KingStatus::default(); 2],
            pending_promotion: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        };
        game.refresh();
        game
    }

    /// Validate a set of pieces and build a game around them.
    ///
    /// Legal moves and king flags are recomputed, never taken from the input.
    pub(crate) fn assemble(
        players: [Player; 2],
        turn: Color,
        halfmove_clock: u32,
        fullmove_number: u32,
    ) -> Result<Self, LoadError> {
        for player in &players {
            match player.pieces().filter(|p| p.kind == Kind::King).count() {
                0 => return Err(LoadError::MissingKing(player.color())),
                1 => {}
                _ => return Err(LoadError::ExtraKing(player.color())),
            }
        }

        let mut board = Board::empty();
        for piece in players.iter().flat_map(Player::pieces) {
            if !board.is_empty_at(piece.position) {
                return Err(LoadError::Overlap(piece.position));
            }
            board.place(piece.position, piece.cell());
        }

        for piece in players.iter().flat_map(Player::pieces) {
            let Some(victim) = piece.en_passant else {
                continue;
            };
            let expected = Cell {
                kind: Kind::Pawn,
                color: piece.color.other(),
            };
            if piece.kind != Kind::Pawn || board.cell_at(victim) != Some(expected) {
                return Err(LoadError::EnPassant(victim));
            }
        }

        let waiting = turn.other();
        if let Some(king) = players[waiting.index()].king_square()
            && !legality::checkers(king, &players[turn.index()], &board).is_empty()
        {
            return Err(LoadError::OpponentInCheck(waiting));
        }

        let pending_promotion = players[turn.index()]
            .pieces()
            .find(|piece| !movegen::promotion_choices(piece).is_empty())
            .map(|piece| piece.position);

        let mut game = Self {
            board,
            players,
            turn,
            status: [KingStatus::default(); 2],
            pending_promotion,
            halfmove_clock,
            fullmove_number,
        };
        game.refresh();
        Ok(game)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    /// Side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn status(&self, color: Color) -> KingStatus {
        self.status[color.index()]
    }

    /// Square of a pawn waiting for a promotion choice.
    #[inline]
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending_promotion
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Terminal state of the side to move, if any.
    pub fn outcome(&self) -> Option<Outcome> {
        let status = self.status(self.turn);
        if status.checkmate {
            Some(Outcome::Checkmate {
                winner: self.turn.other(),
            })
        } else if status.stalemate {
            Some(Outcome::Stalemate)
        } else {
            None
        }
    }

    /// The piece on `square`, of either color.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        self.players
            .iter()
            .find_map(|player| player.piece_at(square))
    }

    /// Legal destinations of the piece on `square`.
    pub fn legal_moves(&self, square: Square) -> Option<&BTreeSet<Square>> {
        self.piece_at(square).map(|piece| &piece.legal_moves)
    }

    /// Pseudo-legal destinations of the piece on `square`.
    pub fn pseudo_legal_moves(&self, square: Square) -> Option<BTreeSet<Square>> {
        self.piece_at(square)
            .map(|piece| movegen::candidates(piece).squares())
    }

    /// Every piece of `color` with its legal destinations.
    pub fn all_legal_moves(&self, color: Color) -> impl Iterator<Item = (Square, &BTreeSet<Square>)> {
        self.player(color)
            .pieces()
            .map(|piece| (piece.position, &piece.legal_moves))
    }

    /// Whether moving from `from` to `to` would take a piece, en passant included.
    pub fn is_capture(&self, from: Square, to: Square) -> bool {
        let Some(piece) = self.piece_at(from) else {
            return false;
        };
        self.board.color_at(to) == Some(piece.color.other())
            || (piece.kind == Kind::Pawn && from.file() != to.file() && self.board.is_empty_at(to))
    }

    /// Play a move for the side to move.
    ///
    /// The move is applied provisionally; if it leaves the mover's king in
    /// check, board and pieces are restored exactly and the move is refused.
    pub fn play(&mut self, mv: Move) -> Result<Played, MoveError> {
        if self.outcome().is_some() {
            return Err(MoveError::GameOver);
        }
        if let Some(square) = self.pending_promotion {
            return Err(MoveError::PromotionPending(square));
        }

        let color = self.turn;
        let piece = self
            .player(color)
            .piece_at(mv.from)
            .ok_or(MoveError::NoPiece(color, mv.from))?;
        let (id, kind) = (piece.id, piece.kind);
        if !piece.legal_moves.contains(&mv.to) {
            return Err(MoveError::Illegal {
                kind,
                from: mv.from,
                to: mv.to,
            });
        }

        let checkpoint = self.checkpoint();
        let captured = self.apply(id, mv);
        if self.king_attacked(color) {
            self.restore(checkpoint);
            debug!("rolled back {mv}: {color} king would be in check");
            return Err(MoveError::SelfCheck(color));
        }
        debug!("{color} {kind} {mv}");

        if kind == Kind::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if kind == Kind::Pawn && mv.to.rank() == color.promotion_rank() {
            info!("{color} pawn on {} awaits promotion", mv.to);
            self.pending_promotion = Some(mv.to);
            return Ok(Played::AwaitingPromotion(mv.to));
        }

        self.end_turn();
        Ok(Played::Moved { captured })
    }

    /// Replace the waiting pawn with a piece of `kind` and pass the turn.
    pub fn promote(&mut self, kind: Kind) -> Result<Played, MoveError> {
        let square = self
            .pending_promotion
            .ok_or(MoveError::NoPromotionPending)?;
        if !Kind::PROMOTIONS.contains(&kind) {
            return Err(MoveError::InvalidPromotion(kind));
        }

        let color = self.turn;
        let player = &mut self.players[color.index()];
        if let Some(id) = player.piece_at(square).map(|pawn| pawn.id) {
            player.remove(id);
        }
        player.spawn(kind, square);
        self.board.place(square, Cell { kind, color });
        self.pending_promotion = None;
        info!("{color} pawn on {square} promoted to {kind}");

        self.end_turn();
        Ok(Played::Promoted(kind))
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            board: self.board.clone(),
            players: self.players.clone(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.board = checkpoint.board;
        self.players = checkpoint.players;
    }

    /// Move a piece with every side effect: capture, castling rook, en-passant rights.
    fn apply(&mut self, id: PieceId, mv: Move) -> Option<Kind> {
        let color = self.turn;
        let enemy = color.other();
        let kind = id.kind();

        let en_passant = kind == Kind::Pawn
            && mv.from.file() != mv.to.file()
            && self.board.is_empty_at(mv.to);
        let victim = if en_passant {
            Square::from_coords(mv.to.file(), mv.from.rank())
        } else {
            Some(mv.to)
        };
        let captured = victim.and_then(|square| self.capture(enemy, square));

        self.board.clear(mv.from);
        self.board.place(mv.to, Cell { kind, color });
        if let Some(piece) = self.players[color.index()].get_mut(id) {
            piece.previous_position = Some(mv.from);
            piece.position = mv.to;
            if matches!(kind, Kind::King | Kind::Rook) {
                piece.moved = true;
            }
        }

        if kind == Kind::King && mv.from.file().abs_diff(mv.to.file()) == 2 {
            self.castle_rook(color, mv.to);
        }

        // Rights granted to us last ply expire now, used or not.
        for piece in self.players[color.index()].pieces_mut() {
            piece.en_passant = None;
        }
        if kind == Kind::Pawn && mv.from.rank().abs_diff(mv.to.rank()) == 2 {
            self.grant_en_passant(enemy, mv.to);
        }

        captured
    }

    fn capture(&mut self, owner: Color, square: Square) -> Option<Kind> {
        let player = &mut self.players[owner.index()];
        let id = player.piece_at(square)?.id;
        let piece = player.remove(id)?;
        self.board.clear(square);
        debug!("{owner} {} captured on {square}", piece.kind);
        Some(piece.kind)
    }

    fn castle_rook(&mut self, color: Color, king_to: Square) {
        let (from_file, to_file) = if king_to.file() == 6 { (7, 5) } else { (0, 3) };
        let (Some(from), Some(to)) = (
            Square::from_coords(from_file, king_to.rank()),
            Square::from_coords(to_file, king_to.rank()),
        ) else {
            return;
        };

        if let Some(rook) = self.players[color.index()].piece_at_mut(from) {
            rook.previous_position = Some(from);
            rook.position = to;
            rook.moved = true;
        }
        if let Some(cell) = self.board.clear(from) {
            self.board.place(to, cell);
        }
        debug!("{color} rook {from} -> {to} (castling)");
    }

    /// Let enemy pawns beside a pawn that just double-stepped take it next ply.
    fn grant_en_passant(&mut self, enemy: Color, landed: Square) {
        for pawn in self.players[enemy.index()].pieces_mut().filter(|piece| {
            piece.kind == Kind::Pawn
                && piece.position.rank() == landed.rank()
                && piece.position.file().abs_diff(landed.file()) == 1
        }) {
            pawn.en_passant = Some(landed);
            debug!("{enemy} pawn on {} may take {landed} en passant", pawn.position);
        }
    }

    /// Squares of the enemy pieces giving check to the `color` king.
    pub fn checkers(&self, color: Color) -> Vec<Square> {
        self.player(color)
            .king_square()
            .map(|king| legality::checkers(king, self.player(color.other()), &self.board))
            .unwrap_or_default()
    }

    fn king_attacked(&self, color: Color) -> bool {
        !self.checkers(color).is_empty()
    }

    fn end_turn(&mut self) {
        if self.turn == Color::Black {
            self.fullmove_number += 1;
        }
        self.turn = self.turn.other();
        self.refresh();

        let status = self.status(self.turn);
        if status.checkmate {
            info!("{} is checkmated", self.turn);
        } else if status.stalemate {
            info!("{} is stalemated", self.turn);
        } else if status.check {
            info!("{} king in check", self.turn);
        }
    }

    /// Recompute every piece's legal moves and both kings' flags from scratch.
    fn refresh(&mut self) {
        for color in Color::ALL {
            let own = &self.players[color.index()];
            let enemy = &self.players[color.other().index()];
            let king = own.king_square();

            let threatened = legality::attacked_squares(enemy, &self.board, king);
            let checkers = king
                .map(|king| legality::checkers(king, enemy, &self.board))
                .unwrap_or_default();
            let pins = king
                .map(|king| legality::pins(king, color, enemy, &self.board))
                .unwrap_or_default();
            let ctx = Context {
                board: &self.board,
                player: own,
                threatened: &threatened,
                pins: &pins,
                in_check: !checkers.is_empty(),
            };

            let legal: Vec<(PieceId, BTreeSet<Square>)> = own
                .pieces()
                .map(|piece| (piece.id, legality::legal_moves(piece, &ctx)))
                .collect();
            let player = &mut self.players[color.index()];
            for (id, moves) in legal {
                if let Some(piece) = player.get_mut(id) {
                    piece.legal_moves = moves;
                }
            }

            self.status[color.index()] = self.king_status(color, &checkers);
        }
    }

    fn king_status(&self, color: Color, checkers: &[Square]) -> KingStatus {
        let player = self.player(color);
        let Some(king) = player.king() else {
            return KingStatus::default();
        };

        let check = !checkers.is_empty();
        let checked_from = match checkers {
            [single] => Some(*single),
            _ => None,
        };
        let checkmate = check
            && king.legal_moves.is_empty()
            && !self.can_lift_check(player, king.position, checked_from);
        let stalemate = !check && player.pieces().all(|piece| piece.legal_moves.is_empty());

        KingStatus {
            check,
            checkmate,
            stalemate,
            checked_from,
        }
    }

    /// Whether some piece other than the king can block or take a single checker.
    ///
    /// Double check (`checked_from == None`) can only be answered by the king.
    fn can_lift_check(&self, player: &Player, king: Square, checked_from: Option<Square>) -> bool {
        let Some(checker) = checked_from else {
            return false;
        };
        let mut line: BTreeSet<Square> = legality::between(king, checker).into_iter().collect();
        line.insert(checker);

        player
            .pieces()
            .filter(|piece| piece.kind != Kind::King)
            .any(|piece| {
                let takes_en_passant = piece.en_passant == Some(checker)
                    && movegen::candidates(piece)
                        .en_passant
                        .is_some_and(|target| piece.legal_moves.contains(&target));
                !piece.legal_moves.is_disjoint(&line) || takes_en_passant
            })
    }
}

impl FeedbackSource for Game {
    fn legal_moves(&self) -> Vec<Move> {
        self.all_legal_moves(self.turn)
            .flat_map(|(from, targets)| targets.iter().map(move |&to| Move::new(from, to)))
            .collect()
    }

    fn is_capture(&self, mv: Move) -> bool {
        Game::is_capture(self, mv.from, mv.to)
    }

    fn check_info(&self) -> Option<CheckInfo> {
        let king_square = self.player(self.turn).king_square()?;
        self.status(self.turn).check.then(|| CheckInfo {
            king_square,
            checkers: self.checkers(self.turn),
        })
    }
}
