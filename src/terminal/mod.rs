//! Console front end: board rendering, line input and the session loop.

use std::io::{self, BufRead, Write};

use crate::MoveInput;

mod display;
mod script;
mod session;

pub use display::{DisplayError, TerminalDisplay};
pub use script::ScriptedInput;
pub use session::{HELP, SessionEnd, SessionError, run_session};

/// Line input from standard input, prompting with `> `.
#[derive(Debug)]
pub struct StdinInput {
    stdin: io::Stdin,
}

impl Default for StdinInput {
    fn default() -> Self {
        Self::new()
    }
}

impl StdinInput {
    #[inline]
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl MoveInput for StdinInput {
    type Error = io::Error;

    fn read_line(&mut self) -> Result<Option<String>, Self::Error> {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if self.stdin.lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
