//! Error type shared by the rules engine, notation utilities and session.
//!
//! Search and evaluation are total over any board the rules engine produces;
//! the variants below cover malformed external input (squares, FEN, move
//! text, PGN) and misuse of the make/unmake stack.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid move notation: {0}")]
    InvalidMoveNotation(String),

    /// The move text parsed but is not among the legal moves of the position.
    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("no piece on square {0}")]
    NoPieceOnSquare(u8),

    #[error("undo requested with no applied move on the stack")]
    NothingToUndo,
}

pub type ChessResult<T> = Result<T, ChessError>;
