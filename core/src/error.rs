use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid board parameters: {rows}x{cols} with {mines} mines")]
    InvalidParameters {
        rows: u8,
        cols: u8,
        mines: u16,
    },
    #[error("Coordinates ({0}, {1}) are outside the board")]
    CoordinateOutOfRange(u8, u8),
    #[error("Board shape does not match declared size")]
    InvalidBoardShape,
    #[error("Snapshot marks a cell as both revealed and flagged")]
    InvalidSnapshot,
}

pub type Result<T> = core::result::Result<T, GameError>;
