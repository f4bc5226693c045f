use thiserror::Error;

use crate::game_state::game_state::GameState;
use crate::moves::chess_move::Move;

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveGenerationError {
    #[error("invalid game state: {0}")]
    InvalidState(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveAnnotations {
    pub gives_check: bool,
    pub is_checkmate: bool,
}

#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub mv: Move,
    pub game_after_move: GameState,
    pub annotations: MoveAnnotations,
}

pub trait MoveGenerator: Send + Sync {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>>;
}
