use log::{debug, warn};

use crate::feedback::compute_feedback;
use crate::game_logic::{Game, GameConfig, Outcome, Played};
use crate::game_state::{Color, Square};
use crate::notation::{Move, TokenError, parse_promotion};
use crate::{BoardDisplay, MoveInput};

pub const HELP: &str =
    "Commands: <from> <to> | <square> (show moves) | fen | load <fen> | new | quit";

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    Checkmate { winner: Color },
    Stalemate,
    Quit,
    /// Input ran out before the game ended.
    InputClosed,
}

/// Failure of the input or display collaborator. Rule violations never end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError<I, D> {
    #[error("failed to read input: {0}")]
    Input(I),
    #[error("failed to update display: {0}")]
    Display(D),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quit,
    Restart,
    Fen,
    Load(String),
    Select(Square),
    Play(Move),
}

fn parse_command(line: &str) -> Result<Command, TokenError> {
    let line = line.trim();
    let command = match line {
        "quit" | "q" => Command::Quit,
        "new" | "r" => Command::Restart,
        "fen" => Command::Fen,
        _ => {
            if let Some(fen) = line.strip_prefix("load ") {
                Command::Load(fen.trim().to_string())
            } else if let Ok(square) = line.parse::<Square>() {
                Command::Select(square)
            } else {
                Command::Play(line.parse()?)
            }
        }
    };
    Ok(command)
}

struct Session<'a, I, D> {
    game: &'a mut Game,
    input: &'a mut I,
    display: &'a mut D,
}

impl<I: MoveInput, D: BoardDisplay> Session<'_, I, D> {
    fn say(&mut self, message: &str) -> Result<(), SessionError<I::Error, D::Error>> {
        self.display.announce(message).map_err(SessionError::Display)
    }

    fn read(&mut self) -> Result<Option<String>, SessionError<I::Error, D::Error>> {
        self.input.read_line().map_err(SessionError::Input)
    }

    fn render(&mut self, selected: Option<Square>) -> Result<(), SessionError<I::Error, D::Error>> {
        let feedback = compute_feedback(&*self.game, selected);
        self.display
            .show(self.game.board(), &feedback)
            .map_err(SessionError::Display)
    }

    fn run(&mut self) -> Result<SessionEnd, SessionError<I::Error, D::Error>> {
        self.say(HELP)?;
        let mut selected = None;

        loop {
            if let Some(outcome) = self.game.outcome() {
                self.render(None)?;
                return self.finish(outcome);
            }
            if let Some(square) = self.game.pending_promotion()
                && !self.choose_promotion(square)?
            {
                return Ok(SessionEnd::InputClosed);
            }
            if self.game.outcome().is_some() {
                continue;
            }

            self.render(selected.take())?;
            let turn = self.game.turn();
            let prompt = format!("{} ({turn}) to move", self.game.player(turn).name());
            self.say(&prompt)?;

            let Some(line) = self.read()? else {
                return Ok(SessionEnd::InputClosed);
            };
            if line.trim().is_empty() {
                continue;
            }

            match parse_command(&line) {
                Ok(Command::Quit) => return Ok(SessionEnd::Quit),
                Ok(Command::Restart) => {
                    *self.game = Game::with_config(self.config());
                    self.say("New game")?;
                }
                Ok(Command::Fen) => {
                    let fen = self.game.fen();
                    self.say(&fen)?;
                }
                Ok(Command::Load(fen)) => match Game::from_fen_with_config(&fen, &self.config()) {
                    Ok(game) => {
                        *self.game = game;
                        self.say("Position loaded")?;
                    }
                    Err(e) => {
                        warn!("rejected position '{fen}': {e}");
                        self.say(&format!("Cannot load position: {e}"))?;
                        *self.game = Game::with_config(self.config());
                        self.say("New game")?;
                    }
                },
                Ok(Command::Select(square)) => selected = Some(square),
                Ok(Command::Play(mv)) => self.play(mv)?,
                Err(e) => self.say(&format!("{e}. {HELP}"))?,
            }
        }
    }

    fn config(&self) -> GameConfig {
        GameConfig {
            white_name: self.game.player(Color::White).name().to_string(),
            black_name: self.game.player(Color::Black).name().to_string(),
        }
    }

    fn play(&mut self, mv: Move) -> Result<(), SessionError<I::Error, D::Error>> {
        match self.game.play(mv) {
            Ok(Played::AwaitingPromotion(_)) => Ok(()),
            Ok(_) => self.announce_check(),
            Err(e) => {
                debug!("rejected {mv}: {e}");
                self.say(&format!("Illegal move: {e}"))
            }
        }
    }

    /// Prompt until a valid promotion choice is read. `false` if input ran out.
    fn choose_promotion(&mut self, square: Square) -> Result<bool, SessionError<I::Error, D::Error>> {
        self.render(None)?;
        loop {
            self.say(&format!(
                "Promote pawn on {square} to (queen, rook, knight, bishop):"
            ))?;
            let Some(line) = self.read()? else {
                return Ok(false);
            };
            let promoted = parse_promotion(&line)
                .map_err(|e| e.to_string())
                .and_then(|kind| self.game.promote(kind).map_err(|e| e.to_string()));
            match promoted {
                Ok(_) => {
                    self.announce_check()?;
                    return Ok(true);
                }
                Err(message) => self.say(&message)?,
            }
        }
    }

    fn announce_check(&mut self) -> Result<(), SessionError<I::Error, D::Error>> {
        let turn = self.game.turn();
        let status = self.game.status(turn);
        if status.check && !status.checkmate {
            self.say(&format!("{turn} king is in check"))?;
        }
        Ok(())
    }

    fn finish(&mut self, outcome: Outcome) -> Result<SessionEnd, SessionError<I::Error, D::Error>> {
        match outcome {
            Outcome::Checkmate { winner } => {
                let name = self.game.player(winner).name().to_string();
                self.say(&format!("Checkmate! {name} ({winner}) wins"))?;
                Ok(SessionEnd::Checkmate { winner })
            }
            Outcome::Stalemate => {
                self.say("Stalemate! The game is a draw")?;
                Ok(SessionEnd::Stalemate)
            }
        }
    }
}

/// Play `game` turn by turn until it ends, the players quit or input runs out.
///
/// Malformed commands and illegal moves are reported through `display` and
/// the same turn is prompted again.
pub fn run_session<I: MoveInput, D: BoardDisplay>(
    game: &mut Game,
    input: &mut I,
    display: &mut D,
) -> Result<SessionEnd, SessionError<I::Error, D::Error>> {
    Session {
        game,
        input,
        display,
    }
    .run()
}
