use std::convert::Infallible;

use console_chess::BoardDisplay;
use console_chess::feedback::{BoardFeedback, SquareFeedback};
use console_chess::game_logic::Game;
use console_chess::game_state::{Board, Color, Kind, Square};
use console_chess::terminal::{ScriptedInput, SessionEnd, TerminalDisplay, run_session};

/// Display that records every frame and message instead of printing.
#[derive(Debug, Default)]
struct RecordingDisplay {
    frames: Vec<BoardFeedback>,
    messages: Vec<String>,
}

impl RecordingDisplay {
    fn said(&self, needle: &str) -> bool {
        self.messages.iter().any(|message| message.contains(needle))
    }

    fn last_frame(&self) -> &BoardFeedback {
        self.frames.last().expect("at least one frame shown")
    }
}

impl BoardDisplay for RecordingDisplay {
    type Error = Infallible;

    fn show(&mut self, _board: &Board, feedback: &BoardFeedback) -> Result<(), Self::Error> {
        self.frames.push(feedback.clone());
        Ok(())
    }

    fn announce(&mut self, message: &str) -> Result<(), Self::Error> {
        self.messages.push(message.to_string());
        Ok(())
    }
}

fn sq(s: &str) -> Square {
    s.parse().expect("test square is valid")
}

/// Helper: run a script against a game and return how it ended.
fn run(game: &mut Game, script: &str) -> (SessionEnd, RecordingDisplay) {
    let mut input = ScriptedInput::from(script);
    let mut display = RecordingDisplay::default();
    let end = run_session(game, &mut input, &mut display).expect("recording never fails");
    (end, display)
}

fn kind_at(game: &Game, square: &str) -> Option<(Kind, Color)> {
    game.board()
        .cell_at(sq(square))
        .map(|cell| (cell.kind, cell.color))
}

// ---------------------------------------------------------------
// Game endings
// ---------------------------------------------------------------

#[test]
fn fools_mate_ends_in_checkmate() {
    let mut game = Game::new();

    let (end, display) = run(&mut game, "f2 f3; e7 e5; g2 g4; d8 h4; e2 e4");

    assert_eq!(
        end,
        SessionEnd::Checkmate {
            winner: Color::Black
        }
    );
    assert!(display.said("Checkmate! Black (black) wins"));
    assert_eq!(display.last_frame().get(sq("e1")), Some(SquareFeedback::Check));
    assert_eq!(display.last_frame().get(sq("h4")), Some(SquareFeedback::Checker));
    // The trailing move is never read.
    assert_eq!(kind_at(&game, "e2"), Some((Kind::Pawn, Color::White)));
}

#[test]
fn stalemate_ends_session() {
    let mut game = Game::from_fen("7k/5K2/8/8/8/8/8/6Q1 w - - 0 1").expect("valid FEN");

    let (end, display) = run(&mut game, "g1 g6");

    assert_eq!(end, SessionEnd::Stalemate);
    assert!(display.said("Stalemate"));
}

#[test]
fn quit_ends_session() {
    let mut game = Game::new();

    let (end, _) = run(&mut game, "e2 e4; quit; e7 e5");

    assert_eq!(end, SessionEnd::Quit);
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn exhausted_input_ends_session() {
    let mut game = Game::new();

    let (end, display) = run(&mut game, "e2 e4");

    assert_eq!(end, SessionEnd::InputClosed);
    assert!(display.said("Black (black) to move"));
}

// ---------------------------------------------------------------
// Recovery from bad input
// ---------------------------------------------------------------

#[test]
fn malformed_and_illegal_input_retries_same_turn() {
    let mut game = Game::new();

    let (end, display) = run(&mut game, "hello; e2 e5; e7 e5; z9 e4; e2 e4; quit");

    assert_eq!(end, SessionEnd::Quit);
    assert!(display.said("expected two squares"));
    assert!(display.said("Illegal move: pawn on e2 cannot move to e5"));
    assert!(display.said("Illegal move: no white piece on e7"));
    assert!(display.said("invalid square"));
    assert_eq!(kind_at(&game, "e4"), Some((Kind::Pawn, Color::White)));
    assert_eq!(kind_at(&game, "e5"), None);
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn self_check_rejected_and_board_unchanged() {
    let mut game = Game::from_fen("rnbqk1nr/pppp1ppp/8/4p3/1b1P4/8/PPP1PPPP/RNBQKBNR w KQkq - 1 3")
        .expect("valid FEN");
    let before = game.clone();

    let (_, display) = run(&mut game, "a2 a3; quit");

    assert!(display.said("would leave the white king in check"));
    assert_eq!(game, before);
}

// ---------------------------------------------------------------
// Promotion
// ---------------------------------------------------------------

#[test]
fn promotion_prompts_until_valid_choice() {
    let mut game = Game::from_fen("r1bqkbnr/pPpppppp/2n5/8/8/8/PP1PPPPP/RNBQKBNR w KQkq - 0 1")
        .expect("valid FEN");

    let (end, display) = run(&mut game, "b7 b8; king; dragon; knight; quit");

    assert_eq!(end, SessionEnd::Quit);
    assert!(display.said("Promote pawn on b8"));
    assert!(display.said("'king' is not one of queen, rook, knight, bishop"));
    assert!(display.said("'dragon' is not one of queen, rook, knight, bishop"));
    assert_eq!(kind_at(&game, "b8"), Some((Kind::Knight, Color::White)));
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn promotion_pending_after_load_is_resolved_first() {
    let mut game = Game::from_fen("1P2k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("valid FEN");

    let (_, display) = run(&mut game, "queen; quit");

    assert_eq!(kind_at(&game, "b8"), Some((Kind::Queen, Color::White)));
    assert!(display.said("black king is in check"));
}

// ---------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------

#[test]
fn selecting_a_piece_shows_destinations() {
    let mut game = Game::new();

    let (_, display) = run(&mut game, "e2; quit");

    let frame = display.last_frame();
    assert_eq!(frame.get(sq("e2")), Some(SquareFeedback::Origin));
    assert_eq!(frame.get(sq("e3")), Some(SquareFeedback::Destination));
    assert_eq!(frame.get(sq("e4")), Some(SquareFeedback::Destination));
}

#[test]
fn selection_cleared_after_next_frame() {
    let mut game = Game::new();

    let (_, display) = run(&mut game, "e2; e2 e4; quit");

    assert!(display.last_frame().is_empty());
}

#[test]
fn check_is_announced_and_highlighted() {
    let mut game = Game::new();

    let (_, display) = run(&mut game, "e2 e4; f7 f5; d1 h5; quit");

    assert!(display.said("black king is in check"));
    assert_eq!(display.last_frame().get(sq("e8")), Some(SquareFeedback::Check));
    assert_eq!(display.last_frame().get(sq("h5")), Some(SquareFeedback::Checker));
}

// ---------------------------------------------------------------
// Position commands
// ---------------------------------------------------------------

#[test]
fn load_and_export_position() {
    let mut game = Game::new();

    let (_, display) = run(&mut game, "load 4k3/8/8/8/8/8/8/4K3 b - - 3 40; fen; quit");

    assert!(display.said("Position loaded"));
    assert!(display.said("4k3/8/8/8/8/8/8/4K3 b - - 3 40"));
    assert_eq!(game.turn(), Color::Black);
}

#[test]
fn bad_load_falls_back_to_new_game() {
    let mut game = Game::new();

    let (_, display) = run(&mut game, "e2 e4; load 8/8/8/8/8/8/8/8 w - - 0 1; quit");

    assert!(display.said("Cannot load position: white has no king"));
    assert!(display.said("New game"));
    assert_eq!(game, Game::new());
}

#[test]
fn corrupt_placement_is_reported_not_fatal() {
    let mut game = Game::new();
    let script = format!("load {}/8/8/8/8/8/8/4K2k w - - 0 1; quit", "8".repeat(40));

    let (end, display) = run(&mut game, &script);

    assert_eq!(end, SessionEnd::Quit);
    assert!(display.said("Cannot load position: malformed placement"));
    assert_eq!(game, Game::new());
}

#[test]
fn load_with_waiting_king_in_check_is_rejected() {
    let mut game = Game::new();

    let (_, display) = run(&mut game, "load 4k3/8/8/8/8/8/8/4R1K1 w - - 0 1; e1 e8; quit");

    assert!(display.said(
        "Cannot load position: black king is in check with the other side to move"
    ));
    assert_eq!(kind_at(&game, "e8"), Some((Kind::King, Color::Black)));
    assert_eq!(game.player(Color::Black).king_square(), Some(sq("e8")));
}

#[test]
fn new_restarts_game() {
    let mut game = Game::new();

    let (_, display) = run(&mut game, "e2 e4; e7 e5; new; quit");

    assert!(display.said("New game"));
    assert_eq!(game, Game::new());
}

// ---------------------------------------------------------------
// Terminal rendering
// ---------------------------------------------------------------

#[test]
fn terminal_session_renders_board_and_prompts() {
    let mut game = Game::new();
    let mut input = ScriptedInput::from("e2; quit");
    let mut display = TerminalDisplay::new(Vec::new());

    let end = run_session(&mut game, &mut input, &mut display).expect("writing to buffer succeeds");

    assert_eq!(end, SessionEnd::Quit);
    let output = String::from_utf8(display.into_inner()).expect("output is UTF-8");
    assert!(output.contains("a  b  c  d  e  f  g  h"));
    assert!(output.contains("White (white) to move"));
    assert!(output.contains("\x1b[42m ♙ \x1b[0m"), "selected pawn highlighted");
    assert_eq!(output.matches('♔').count(), 2, "board drawn twice");
}
