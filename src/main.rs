use console_chess::game_logic::Game;
use console_chess::terminal::{self, SessionEnd, StdinInput, TerminalDisplay};

fn main() {
    // An optional FEN may be passed quoted or as separate fields.
    let fen = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    let mut game = if fen.is_empty() {
        Game::new()
    } else {
        Game::from_fen(&fen).unwrap_or_else(|e| {
            eprintln!("Invalid FEN ({e}), starting a new game");
            Game::new()
        })
    };

    println!("♟️  Console Chess");
    println!();

    let mut input = StdinInput::new();
    let mut display = TerminalDisplay::stdout();
    match terminal::run_session(&mut game, &mut input, &mut display) {
        Ok(SessionEnd::Quit | SessionEnd::InputClosed) => println!("Bye"),
        Ok(_) => {}
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
