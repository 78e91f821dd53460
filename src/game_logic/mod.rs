//! Rules: move generation, legality filtering and the turn engine.

mod engine;
pub mod legality;
pub mod movegen;
mod snapshot;

pub use engine::{Game, GameConfig, KingStatus, LoadError, MoveError, Outcome, Played};
pub use snapshot::{SavedPiece, Snapshot};
