use std::io::{self, Write};

use crate::BoardDisplay;
use crate::feedback::{BoardFeedback, SquareFeedback};
use crate::game_state::{Board, Square};

const LIGHT_SQUARE: &str = "47";
const DARK_SQUARE: &str = "46";

/// Terminal board display.
///
/// Renders the board as an 8×8 checkered grid of Unicode glyphs, with
/// squares carrying [`BoardFeedback`] recolored by feedback type.
#[derive(Debug)]
pub struct TerminalDisplay<W = io::Stdout> {
    out: W,
}

impl TerminalDisplay {
    /// Create a display writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume the display, returning the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Error type for terminal display operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError {
    #[error("failed to write to terminal: {0}")]
    Io(#[from] io::Error),
}

impl<W: Write> BoardDisplay for TerminalDisplay<W> {
    type Error = DisplayError;

    fn show(&mut self, board: &Board, feedback: &BoardFeedback) -> Result<(), Self::Error> {
        render_board(&mut self.out, board, feedback)
    }

    fn announce(&mut self, message: &str) -> Result<(), Self::Error> {
        writeln!(self.out, "{message}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Render the board to any writer. Extracted for testability.
fn render_board(
    w: &mut impl Write,
    board: &Board,
    feedback: &BoardFeedback,
) -> Result<(), DisplayError> {
    for rank in (0..8).rev() {
        write!(w, " {} ", rank + 1)?;
        for file in 0..8 {
            let Some(square) = Square::from_coords(file, rank) else {
                continue;
            };
            let background = background(square, feedback.get(square));
            write!(w, "\x1b[{background}m {} \x1b[0m", board.glyph_at(square))?;
        }
        writeln!(w)?;
    }
    writeln!(w, "    a  b  c  d  e  f  g  h")?;
    w.flush()?;
    Ok(())
}

/// ANSI background code for a square: its feedback color, else its checker color.
fn background(square: Square, feedback: Option<SquareFeedback>) -> &'static str {
    match feedback {
        Some(SquareFeedback::Destination) => "44",
        Some(SquareFeedback::Capture) => "41",
        Some(SquareFeedback::Origin) => "42",
        Some(SquareFeedback::Check) => "45",
        Some(SquareFeedback::Checker) => "43",
        None if (square.file() + square.rank()) % 2 == 0 => DARK_SQUARE,
        None => LIGHT_SQUARE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_logic::Game;

    fn sq(s: &str) -> Square {
        s.parse().expect("test square is valid")
    }

    fn render_to_string(board: &Board, feedback: &BoardFeedback) -> String {
        let mut buf = Vec::new();
        render_board(&mut buf, board, feedback).expect("rendering to buffer should succeed");
        String::from_utf8(buf).expect("output should be valid UTF-8")
    }

    fn render_start(feedback: &BoardFeedback) -> String {
        render_to_string(Game::new().board(), feedback)
    }

    #[test]
    fn show_contains_all_rank_labels() {
        let output = render_start(&BoardFeedback::new());

        let labels: Vec<String> = output
            .lines()
            .take(8)
            .map(|line| line.chars().take(3).collect())
            .collect();
        let expected: Vec<String> = (1..=8).rev().map(|rank| format!(" {rank} ")).collect();
        assert_eq!(labels, expected);
    }

    #[test]
    fn show_contains_file_labels() {
        let output = render_start(&BoardFeedback::new());

        assert!(
            output.contains("a  b  c  d  e  f  g  h"),
            "output should contain file labels"
        );
    }

    #[test]
    fn show_renders_piece_glyphs() {
        let output = render_start(&BoardFeedback::new());
        let first_rank = output.lines().nth(7).expect("rank 1 line");

        for glyph in ['♖', '♘', '♗', '♕', '♔'] {
            assert!(first_rank.contains(glyph), "rank 1 should contain {glyph}");
        }
        assert!(output.lines().next().is_some_and(|rank8| rank8.contains('♚')));
        assert_eq!(output.matches('♙').count(), 8);
        assert_eq!(output.matches('♟').count(), 8);
    }

    #[test]
    fn show_empty_board_has_no_glyphs() {
        let output = render_to_string(&Board::empty(), &BoardFeedback::new());
        assert!(!output.contains('♙'));
        assert!(output.contains("\x1b[46m   \x1b[0m"));
    }

    #[test]
    fn squares_are_checkered() {
        assert_eq!(background(sq("a1"), None), DARK_SQUARE);
        assert_eq!(background(sq("b1"), None), LIGHT_SQUARE);
        assert_eq!(background(sq("h1"), None), LIGHT_SQUARE);
        assert_eq!(background(sq("h8"), None), DARK_SQUARE);
    }

    #[test]
    fn show_destination_uses_blue_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("e4"), SquareFeedback::Destination);

        let output = render_start(&feedback);

        assert!(
            output.contains("\x1b[44m"),
            "destination should use blue ANSI background"
        );
    }

    #[test]
    fn show_capture_uses_red_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("d5"), SquareFeedback::Capture);

        assert!(render_start(&feedback).contains("\x1b[41m"));
    }

    #[test]
    fn show_origin_uses_green_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("e2"), SquareFeedback::Origin);

        assert!(render_start(&feedback).contains("\x1b[42m ♙ \x1b[0m"));
    }

    #[test]
    fn show_check_uses_magenta_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("e8"), SquareFeedback::Check);

        assert!(render_start(&feedback).contains("\x1b[45m ♚ \x1b[0m"));
    }

    #[test]
    fn show_checker_uses_yellow_background() {
        let mut feedback = BoardFeedback::new();
        feedback.set(sq("h5"), SquareFeedback::Checker);

        assert!(render_start(&feedback).contains("\x1b[43m"));
    }

    #[test]
    fn empty_feedback_uses_only_checker_colors() {
        let output = render_start(&BoardFeedback::new());

        for code in ["\x1b[41m", "\x1b[42m", "\x1b[43m", "\x1b[44m", "\x1b[45m"] {
            assert!(!output.contains(code), "unexpected highlight {code:?}");
        }
    }

    #[test]
    fn announce_writes_line() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.announce("white to move").expect("writing to buffer succeeds");

        assert_eq!(display.into_inner(), b"white to move\n");
    }
}
