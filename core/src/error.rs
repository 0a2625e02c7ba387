use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Configuration leaves no playable board")]
    InvalidConfiguration,
    #[error("Hazard layout does not match the configured size")]
    InvalidBoardShape,
}

pub type Result<T> = core::result::Result<T, GameError>;
