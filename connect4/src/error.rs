use thiserror::Error;

use crate::NUM_COLS;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot create a move with column {column} that is not in range 0..{}", NUM_COLS - 1)]
    ColumnOutOfBounds { column: usize },
    #[error("cannot place a chip into full column {column}")]
    ColumnFull { column: usize },
    #[error("no legal moves remain")]
    NoMoves,
    #[error("depth must be an integer, found {0:?}")]
    DepthNotInteger(String),
    #[error("depth must be at least 1, found {0}")]
    DepthTooSmall(i64),
    #[error("unknown turn {0:?}, expected \"first\" or \"second\"")]
    UnknownTurn(String),
    #[error("invalid board diagram at row {row}: {reason}")]
    BoardDiagram { row: usize, reason: String },
    #[error("no move has been requested from this player")]
    NotAwaitingMove,
    #[error("column {column} is not a playable move")]
    IllegalMove { column: usize },
}
