//! Crate root module declarations for the Square Chess rules engine.
//!
//! Exposes the board state, move generation, notation utilities and the
//! game session that a front-end drives (new game, legal moves, attempt a
//! move, undo, status, move log).

pub mod chess_errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod moves {
    pub mod attack_tables;
    pub mod chess_move;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_sliders;
    pub mod move_generator;
    pub mod perft;
}

pub mod session {
    pub mod game_session;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
    pub mod san;
}

pub use chess_errors::{ChessError, ChessResult};
pub use game_state::chess_types::{Color, Move, Piece, PieceKind, Square};
pub use game_state::game_state::GameState;
pub use session::game_session::{GameSession, GameStatus, MoveApplied};
