use sweeper_core::GameError;
use sweeper_protocol::{ErrorKind, ErrorReport};
use thiserror::Error;

use crate::GameId;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Game {0} not found")]
    NotFound(GameId),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored game is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Game lock poisoned")]
    LockPoisoned,
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Game(GameError::InvalidSize) => ErrorKind::InvalidSize,
            ServiceError::Game(GameError::InvalidMineCount) => ErrorKind::InvalidMineCount,
            ServiceError::Game(GameError::OutOfBounds) => ErrorKind::OutOfBounds,
            ServiceError::Game(GameError::GameNotActive) => ErrorKind::GameNotActive,
            ServiceError::Game(GameError::InvalidTransition) => ErrorKind::InvalidTransition,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Io(_)
            | ServiceError::Json(_)
            | ServiceError::Settings(_)
            | ServiceError::LockPoisoned => ErrorKind::Internal,
        }
    }

    pub fn to_report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            messages: self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
