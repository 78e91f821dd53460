//! Turns pseudo-legal candidates into legal moves.
//!
//! Threat and pin detection work from attack sets: occupancy-clipped rays of
//! enemy pieces that ignore whether those pieces are pinned themselves.

use std::collections::BTreeSet;

use super::movegen::{self, DIAGONAL, ORTHOGONAL};
use crate::game_state::{Board, Cell, Color, Kind, Piece, Player, Square};

/// A friendly piece held on the line between its king and an enemy slider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub pinned: Square,
    /// Squares the pinned piece may still occupy, the pinner's square included.
    pub line: BTreeSet<Square>,
}

/// Per-side inputs to [`legal_moves`], computed once per turn.
#[derive(Debug)]
pub struct Context<'a> {
    pub board: &'a Board,
    /// Owner of the pieces being filtered.
    pub player: &'a Player,
    /// Squares attacked by the enemy, with our king treated as transparent.
    pub threatened: &'a BTreeSet<Square>,
    pub pins: &'a [Pin],
    pub in_check: bool,
}

/// Cut a ray at its first occupied square.
///
/// The occupied square is kept only when `may_capture` and it holds an enemy piece.
pub fn clip(ray: &[Square], board: &Board, color: Color, may_capture: bool) -> Vec<Square> {
    let mut reachable = Vec::with_capacity(ray.len());
    for &square in ray {
        match board.color_at(square) {
            None => reachable.push(square),
            Some(occupant) => {
                if may_capture && occupant != color {
                    reachable.push(square);
                }
                break;
            }
        }
    }
    reachable
}

/// Squares `piece` attacks, up to and including the first piece of either color.
///
/// `transparent` is skipped over as if empty, so a king cannot step backwards
/// along the ray that checks it.
pub fn attacks(piece: &Piece, board: &Board, transparent: Option<Square>) -> BTreeSet<Square> {
    let candidates = movegen::candidates(piece);
    if piece.kind == Kind::Pawn {
        return candidates.captures.into_iter().collect();
    }

    let mut attacked = BTreeSet::new();
    for ray in &candidates.rays {
        for &square in ray {
            attacked.insert(square);
            if Some(square) != transparent && !board.is_empty_at(square) {
                break;
            }
        }
    }
    attacked
}

/// Union of every square `attacker` attacks.
pub fn attacked_squares(
    attacker: &Player,
    board: &Board,
    transparent: Option<Square>,
) -> BTreeSet<Square> {
    attacker
        .pieces()
        .flat_map(|piece| attacks(piece, board, transparent))
        .collect()
}

/// Squares of the `enemy` pieces attacking `king`.
pub fn checkers(king: Square, enemy: &Player, board: &Board) -> Vec<Square> {
    enemy
        .pieces()
        .filter(|piece| attacks(piece, board, None).contains(&king))
        .map(|piece| piece.position)
        .collect()
}

/// Unit step from `from` towards `to` if they share a file, rank or diagonal.
fn direction(from: Square, to: Square) -> Option<(i8, i8)> {
    let df = to.file() as i8 - from.file() as i8;
    let dr = to.rank() as i8 - from.rank() as i8;
    let aligned = (df == 0) != (dr == 0) || (df != 0 && df.abs() == dr.abs());
    aligned.then(|| (df.signum(), dr.signum()))
}

/// Squares strictly between two aligned squares; empty when not aligned.
pub fn between(from: Square, to: Square) -> Vec<Square> {
    let Some(step) = direction(from, to) else {
        return vec![];
    };
    movegen::ray(from, step)
        .into_iter()
        .take_while(|&square| square != to)
        .collect()
}

fn slides_along(kind: Kind, step: (i8, i8)) -> bool {
    match kind {
        Kind::Rook => ORTHOGONAL.contains(&step),
        Kind::Bishop => DIAGONAL.contains(&step),
        Kind::Queen => true,
        _ => false,
    }
}

/// Absolute pins against the `color` king on `king`.
pub fn pins(king: Square, color: Color, enemy: &Player, board: &Board) -> Vec<Pin> {
    let mut pins = Vec::new();
    for slider in enemy.pieces().filter(|piece| piece.kind.is_slider()) {
        let Some(step) = direction(slider.position, king) else {
            continue;
        };
        if !slides_along(slider.kind, step) {
            continue;
        }

        let path = between(slider.position, king);
        let blockers: Vec<Square> = path
            .iter()
            .copied()
            .filter(|&square| !board.is_empty_at(square))
            .collect();

        if let [pinned] = blockers[..]
            && board.color_at(pinned) == Some(color)
        {
            let mut line: BTreeSet<Square> = path.into_iter().collect();
            line.insert(slider.position);
            pins.push(Pin { pinned, line });
        }
    }
    pins
}

/// Castling destinations currently open to `king`.
pub fn castling_targets(king: &Piece, ctx: &Context<'_>) -> Vec<Square> {
    if king.moved || ctx.in_check {
        return vec![];
    }

    movegen::candidates(king)
        .castling
        .into_iter()
        .filter(|&target| {
            let rook_file = if target.file() > king.position.file() { 7 } else { 0 };
            let Some(rook_square) = Square::from_coords(rook_file, target.rank()) else {
                return false;
            };
            let rook_ready = ctx
                .player
                .piece_at(rook_square)
                .is_some_and(|rook| rook.kind == Kind::Rook && !rook.moved);
            let path_clear = between(king.position, rook_square)
                .into_iter()
                .all(|square| ctx.board.is_empty_at(square));
            let transit_safe = between(king.position, target)
                .into_iter()
                .chain([target])
                .all(|square| !ctx.threatened.contains(&square));

            rook_ready && path_clear && transit_safe
        })
        .collect()
}

fn en_passant_victim_present(pawn: &Piece, board: &Board) -> bool {
    let victim = Cell {
        kind: Kind::Pawn,
        color: pawn.color.other(),
    };
    pawn.en_passant
        .is_some_and(|square| board.cell_at(square) == Some(victim))
}

/// Legal destinations of `piece`.
pub fn legal_moves(piece: &Piece, ctx: &Context<'_>) -> BTreeSet<Square> {
    let board = ctx.board;
    let color = piece.color;
    let candidates = movegen::candidates(piece);

    let mut moves: BTreeSet<Square> = match piece.kind {
        Kind::Pawn => {
            let mut moves: BTreeSet<Square> = candidates
                .rays
                .iter()
                .flat_map(|ray| clip(ray, board, color, false))
                .collect();
            moves.extend(
                candidates
                    .captures
                    .iter()
                    .filter(|&&square| board.color_at(square) == Some(color.other())),
            );
            if let Some(target) = candidates.en_passant
                && board.is_empty_at(target)
                && en_passant_victim_present(piece, board)
            {
                moves.insert(target);
            }
            moves
        }
        _ => candidates
            .rays
            .iter()
            .flat_map(|ray| clip(ray, board, color, true))
            .collect(),
    };

    if piece.kind == Kind::King {
        moves.retain(|square| !ctx.threatened.contains(square));
        moves.extend(castling_targets(piece, ctx));
    } else if let Some(pin) = ctx.pins.iter().find(|pin| pin.pinned == piece.position) {
        moves.retain(|square| pin.line.contains(square));
    }

    moves
}
