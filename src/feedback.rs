use std::collections::BTreeSet;

use crate::game_state::Square;
use crate::notation::Move;

/// Type of visual feedback for an individual square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SquareFeedback {
    /// Legal destination of the selected piece
    Destination,
    /// Moving here captures an opponent piece
    Capture,
    /// A piece that can make the highlighted move
    Origin,
    /// King of the side to move while in check
    Check,
    /// Enemy piece giving check
    Checker,
}

/// Contains the set of squares and their associated feedback types for the current board state.
///
/// `BoardFeedback` is computed by `compute_feedback()` and consumed by the board display to
/// highlight squares next to the glyphs. Each square carries at most one feedback entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardFeedback {
    squares: Vec<(Square, SquareFeedback)>,
}

impl BoardFeedback {
    /// Create empty feedback (no highlights)
    #[inline]
    pub const fn new() -> Self {
        Self {
            squares: Vec::new(),
        }
    }

    /// Get all square feedback entries
    #[inline]
    pub fn squares(&self) -> &[(Square, SquareFeedback)] {
        &self.squares
    }

    /// Get feedback for a specific square, if any
    #[inline]
    pub fn get(&self, square: Square) -> Option<SquareFeedback> {
        self.squares
            .iter()
            .find(|(sq, _)| *sq == square)
            .map(|(_, feedback)| *feedback)
    }

    /// Add feedback for a square that has none yet.
    pub fn set(&mut self, square: Square, feedback: SquareFeedback) {
        if self.get(square).is_none() {
            self.squares.push((square, feedback));
        }
    }

    /// Check if any feedback exists
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.squares.is_empty()
    }
}

impl From<Vec<(Square, SquareFeedback)>> for BoardFeedback {
    fn from(squares: Vec<(Square, SquareFeedback)>) -> Self {
        let mut feedback = Self::new();
        for (square, kind) in squares {
            feedback.set(square, kind);
        }
        feedback
    }
}

/// Check state of the side to move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInfo {
    pub king_square: Square,
    pub checkers: Vec<Square>,
}

/// Game state information needed to compute feedback
///
/// This trait defines what the feedback system needs from the game engine.
pub trait FeedbackSource {
    /// All legal moves of the side to move
    fn legal_moves(&self) -> Vec<Move>;

    /// Whether the move takes an opponent piece
    fn is_capture(&self, mv: Move) -> bool;

    /// King and checkers, if the side to move is in check
    fn check_info(&self) -> Option<CheckInfo>;
}

/// Compute visual feedback based on current game state.
///
/// - Own piece selected: shows its legal destinations
/// - Any other square selected: shows which pieces can move there
///
/// A king in check and its checkers are always highlighted.
pub fn compute_feedback(source: &impl FeedbackSource, selected: Option<Square>) -> BoardFeedback {
    let legal_moves = source.legal_moves();

    let mut feedback = match selected {
        Some(square) if legal_moves.iter().any(|mv| mv.from == square) => {
            show_destinations_for(source, &legal_moves, square)
        }
        Some(square) => show_reaching(&legal_moves, square),
        None => BoardFeedback::new(),
    };

    if let Some(check) = source.check_info() {
        feedback.set(check.king_square, SquareFeedback::Check);
        for checker in check.checkers {
            feedback.set(checker, SquareFeedback::Checker);
        }
    }
    feedback
}

/// Show legal destinations of the selected piece
fn show_destinations_for(
    source: &impl FeedbackSource,
    legal_moves: &[Move],
    from: Square,
) -> BoardFeedback {
    std::iter::once((from, SquareFeedback::Origin))
        .chain(
            legal_moves
                .iter()
                .filter(|mv| mv.from == from)
                .map(|&mv| classify_move(source, mv)),
        )
        .collect::<Vec<_>>()
        .into()
}

/// Show which pieces can move onto the selected square
fn show_reaching(legal_moves: &[Move], to: Square) -> BoardFeedback {
    let origins: BTreeSet<Square> = legal_moves
        .iter()
        .filter(|mv| mv.to == to)
        .map(|mv| mv.from)
        .collect();
    if origins.is_empty() {
        return BoardFeedback::new();
    }

    std::iter::once((to, SquareFeedback::Destination))
        .chain(origins.into_iter().map(|from| (from, SquareFeedback::Origin)))
        .collect::<Vec<_>>()
        .into()
}

/// Classify a move as either a capture or regular destination
fn classify_move(source: &impl FeedbackSource, mv: Move) -> (Square, SquareFeedback) {
    if source.is_capture(mv) {
        (mv.to, SquareFeedback::Capture)
    } else {
        (mv.to, SquareFeedback::Destination)
    }
}
