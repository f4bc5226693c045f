//! Successor-state construction.
//!
//! `apply_move` never touches its input: it clones, edits the clone and
//! returns it, so anyone still holding the prior position keeps seeing it
//! unchanged. Only moves produced by the generator for `game_state` are
//! supported; the from-square check below catches the obvious misuse.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{castling_route_for, rights_touched_by_square};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::piece_on_square_for_color;
use crate::moves::chess_move::Move;

pub fn apply_move(game_state: &GameState, mv: &Move) -> ChessResult<GameState> {
    if mv.from > 63 || mv.to > 63 {
        return Err(ChessError::InvalidSquare(format!("move {}-{} leaves the board", mv.from, mv.to)));
    }

    let moving_color = game_state.side_to_move;
    let enemy_color = moving_color.opposite();

    let moved_piece = piece_on_square_for_color(game_state, moving_color, mv.from)
        .ok_or_else(|| ChessError::InvalidMove(format!("no {moving_color} piece on square {}", mv.from)))?;
    if moved_piece != mv.piece {
        return Err(ChessError::InvalidMove(format!(
            "move expects {:?} on square {}, found {moved_piece:?}",
            mv.piece, mv.from
        )));
    }

    let from_mask = 1u64 << mv.from;
    let to_mask = 1u64 << mv.to;
    let mut next = game_state.clone();

    next.pieces[moving_color.index()][moved_piece.index()] &= !from_mask;

    if mv.is_en_passant {
        // The captured pawn sits behind the target square.
        let capture_sq = make_square(square_file(mv.to), square_rank(mv.from));
        next.pieces[enemy_color.index()][PieceKind::Pawn.index()] &= !(1u64 << capture_sq);
    } else {
        for bb in next.pieces[enemy_color.index()].iter_mut() {
            *bb &= !to_mask;
        }
    }

    let arriving = mv.promotion.unwrap_or(moved_piece);
    next.pieces[moving_color.index()][arriving.index()] |= to_mask;

    if mv.is_castle {
        let route = castling_route_for(moving_color, mv.from, mv.to).ok_or_else(|| {
            ChessError::InvalidMove(format!("no castling route from {} to {}", mv.from, mv.to))
        })?;
        let rooks = &mut next.pieces[moving_color.index()][PieceKind::Rook.index()];
        *rooks &= !(1u64 << route.rook_from);
        *rooks |= 1u64 << route.rook_to;
    }

    // Rights are only ever removed here, never granted.
    next.castling_rights &= !(rights_touched_by_square(mv.from) | rights_touched_by_square(mv.to));

    next.en_passant_square = if mv.is_double_pawn_push() {
        Some((mv.from + mv.to) / 2)
    } else {
        None
    };

    if moved_piece == PieceKind::Pawn || mv.is_capture() {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Black {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = enemy_color;
    next.recalc_occupancy();

    Ok(next)
}
