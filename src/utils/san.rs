//! Standard Algebraic Notation.
//!
//! Encoding is relative to the position the move is played from: the
//! disambiguation looks at the other legal moves there, and the `+` / `#`
//! suffix comes from the position after the move.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::{has_legal_move, legal_moves};
use crate::moves::chess_move::Move;
use crate::utils::algebraic::{file_char, rank_char, square_to_algebraic};

pub const KINGSIDE_CASTLE: &str = "O-O";
pub const QUEENSIDE_CASTLE: &str = "O-O-O";

/// Render `mv`, which must be legal in `game_state`, as SAN.
pub fn move_to_san(game_state: &GameState, mv: &Move) -> ChessResult<String> {
    let legal = legal_moves(game_state);
    if !legal.contains(mv) {
        return Err(ChessError::IllegalMove {
            from: mv.from,
            to: mv.to,
            promotion: mv.promotion,
        });
    }

    let mut out = san_body(mv, &legal)?;
    out.push_str(check_suffix(game_state, mv)?);
    Ok(out)
}

/// Resolve SAN text to the matching legal move. Check marks and annotation
/// glyphs are ignored, and `0-0` is accepted for `O-O`.
pub fn san_to_move(game_state: &GameState, san: &str) -> ChessResult<Move> {
    let wanted = san
        .trim()
        .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'))
        .replace('0', "O");

    let legal = legal_moves(game_state);
    for mv in &legal {
        if san_body(mv, &legal)? == wanted {
            return Ok(*mv);
        }
    }

    Err(ChessError::InvalidMove(format!("'{san}' matches no legal move")))
}

/// SAN without the check suffix.
fn san_body(mv: &Move, legal: &[Move]) -> ChessResult<String> {
    if mv.is_castle {
        let token = if mv.to > mv.from { KINGSIDE_CASTLE } else { QUEENSIDE_CASTLE };
        return Ok(token.to_owned());
    }

    let mut out = String::with_capacity(8);
    if mv.piece == PieceKind::Pawn {
        if mv.is_capture() {
            out.push(file_char(mv.from));
            out.push('x');
        }
    } else {
        out.push(mv.piece.letter());
        out.push_str(&disambiguation(mv, legal));
        if mv.is_capture() {
            out.push('x');
        }
    }

    out.push_str(&square_to_algebraic(mv.to)?);

    if let Some(promo) = mv.promotion {
        out.push('=');
        out.push(promo.letter());
    }

    Ok(out)
}

/// Shortest prefix (file, rank, or both) that separates `mv` from other
/// moves of the same piece kind to the same square.
fn disambiguation(mv: &Move, legal: &[Move]) -> String {
    let rivals: Vec<&Move> = legal
        .iter()
        .filter(|other| other.piece == mv.piece && other.to == mv.to && other.from != mv.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let shares_file = rivals.iter().any(|o| square_file(o.from) == square_file(mv.from));
    let shares_rank = rivals.iter().any(|o| square_rank(o.from) == square_rank(mv.from));

    match (shares_file, shares_rank) {
        (false, _) => file_char(mv.from).to_string(),
        (true, false) => rank_char(mv.from).to_string(),
        (true, true) => format!("{}{}", file_char(mv.from), rank_char(mv.from)),
    }
}

fn check_suffix(game_state: &GameState, mv: &Move) -> ChessResult<&'static str> {
    let next = apply_move(game_state, mv)?;
    if !next.is_in_check(next.side_to_move) {
        return Ok("");
    }
    Ok(if has_legal_move(&next) { "+" } else { "#" })
}
