use std::collections::VecDeque;
use std::convert::Infallible;

use crate::MoveInput;

/// A scriptable input that replays queued lines.
///
/// New script can be appended at any time for interactive use.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pending_lines: VecDeque<String>,
}

impl ScriptedInput {
    /// Create with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue additional script.
    ///
    /// Format:
    /// - Newlines or semicolons separate lines
    /// - Blank lines are dropped
    ///
    /// Examples:
    /// - `"e2 e4; e7 e5"` - Two moves
    /// - `"b7 b8; queen"` - A move followed by a promotion choice
    pub fn push_script(&mut self, script: &str) {
        self.pending_lines.extend(
            script
                .split(['\n', ';'])
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    /// Lines not yet read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.pending_lines.len()
    }
}

impl From<&str> for ScriptedInput {
    fn from(script: &str) -> Self {
        let mut input = Self::new();
        input.push_script(script);
        input
    }
}

impl MoveInput for ScriptedInput {
    type Error = Infallible;

    fn read_line(&mut self) -> Result<Option<String>, Self::Error> {
        Ok(self.pending_lines.pop_front())
    }
}
