//! Two-player console chess.
//!
//! [`game_logic::Game`] owns the board and both players and enforces the
//! rules; [`terminal`] drives it turn by turn over a [`MoveInput`] and a
//! [`BoardDisplay`].

use game_state::Board;

pub mod feedback;
pub mod fen;
pub mod game_logic;
pub mod game_state;
pub mod notation;
pub mod terminal;

/// Trait for reading the player's typed commands.
///
/// Abstracts over the real console and scripted inputs, providing a
/// uniform interface for the session loop.
pub trait MoveInput {
    /// Error type for input read failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Read the next line of input, or `None` once input is exhausted.
    fn read_line(&mut self) -> Result<Option<String>, Self::Error>;
}

/// Trait for displaying the board and messages to the players.
///
/// Mirrors [`MoveInput`] on the output side of the game loop.
pub trait BoardDisplay {
    /// Error type for display update failures.
    type Error: std::fmt::Debug + std::fmt::Display;

    /// Show the board with the given highlights.
    ///
    /// Implementations map [`feedback::SquareFeedback`] variants to their
    /// own output (terminal colors, markers, etc.).
    fn show(&mut self, board: &Board, feedback: &feedback::BoardFeedback)
    -> Result<(), Self::Error>;

    /// Show a prompt or status line.
    fn announce(&mut self, message: &str) -> Result<(), Self::Error>;
}
