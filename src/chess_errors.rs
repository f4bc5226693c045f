//! Errors used throughout the engine.
//!
//! `ChessError` is the single error type returned by the session, the move
//! applier and the parsing utilities. Every variant is recoverable: a request
//! that fails leaves the session exactly as it was.
//!
//! Usage guidelines:
//! - `IllegalMove`, `AmbiguousPromotion` and `NothingToUndo` are the answers a
//!   front-end is expected to handle, e.g. by asking for a promotion piece.
//! - `InvalidFen`, `InvalidSquare` and `InvalidMove` describe bad textual
//!   input.
//! - `InvalidState` means a position violates a board invariant (missing
//!   king, pawn on a back rank) and should be reported, not retried.

use thiserror::Error;

use crate::game_state::chess_types::{PieceKind, Square};
use crate::move_generation::move_generator::MoveGenerationError;

pub type ChessResult<T> = Result<T, ChessError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// No legal move in the current position matches the request.
    #[error("illegal move from {from} to {to} (promotion {promotion:?})")]
    IllegalMove {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },

    /// History is empty.
    #[error("nothing to undo")]
    NothingToUndo,

    /// The pawn move needs a promotion piece and none was supplied.
    #[error("move from {from} to {to} requires a promotion piece")]
    AmbiguousPromotion { from: Square, to: Square },

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid move: {0}")]
    InvalidMove(String),

    #[error("invalid game state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    MoveGeneration(#[from] MoveGenerationError),
}
