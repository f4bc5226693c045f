//! Coordinate notation (`e2e4`, `e7e8q`) for moves.
//!
//! Parsing resolves the text against the legal moves of the position, so a
//! parsed move always carries the correct capture / castle / en-passant
//! details.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::chess_move::Move;
use crate::utils::algebraic::algebraic_to_square;

/// Split coordinate text into from, to and optional promotion kind without
/// consulting a position.
pub fn parse_coordinates(text: &str) -> ChessResult<(Square, Square, Option<PieceKind>)> {
    let text = text.trim();
    if !text.is_ascii() || (text.len() != 4 && text.len() != 5) {
        return Err(ChessError::InvalidMove(format!("'{text}' is not coordinate notation")));
    }

    let from = algebraic_to_square(&text[0..2])?;
    let to = algebraic_to_square(&text[2..4])?;
    let promotion = match text[4..].chars().next() {
        None => None,
        Some(ch) => Some(char_to_promotion(ch)?),
    };

    Ok((from, to, promotion))
}

pub fn long_algebraic_to_move(long_algebraic: &str, game_state: &GameState) -> ChessResult<Move> {
    let (from, to, promotion) = parse_coordinates(long_algebraic)?;
    legal_moves(game_state)
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
        .ok_or(ChessError::IllegalMove { from, to, promotion })
}

pub fn char_to_promotion(ch: char) -> ChessResult<PieceKind> {
    match PieceKind::from_letter(ch) {
        Some(kind @ (PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop | PieceKind::Knight)) => Ok(kind),
        _ => Err(ChessError::InvalidMove(format!("'{ch}' is not a promotion piece"))),
    }
}
