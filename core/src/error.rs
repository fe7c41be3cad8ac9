use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Board size must be between 1 and 255")]
    InvalidSize,
    #[error("Mine count must be positive and leave at least one safe cell")]
    InvalidMineCount,
    #[error("Coordinates are outside the board")]
    OutOfBounds,
    #[error("Game already ended, no new moves are accepted")]
    GameNotActive,
    #[error("Cell is already revealed or holds a mine")]
    InvalidTransition,
}

pub type Result<T> = core::result::Result<T, GameError>;
