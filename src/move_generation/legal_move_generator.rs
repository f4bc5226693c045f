//! Full legal move generation pipeline.
//!
//! Collects pseudo-legal moves piece by piece, applies every candidate to a
//! scratch state and keeps only those that leave the mover's king safe. This
//! one filter covers pins, moving into check, and en-passant captures that
//! uncover a rank attack on the king.

use log::{trace, warn};

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliders::{
    generate_bishop_moves, generate_queen_moves, generate_rook_moves,
};
use crate::move_generation::move_generator::{
    GeneratedMove, MoveAnnotations, MoveGenResult, MoveGenerationError, MoveGenerator,
};
use crate::moves::chess_move::Move;

/// Legal moves annotated with check / checkmate information.
pub struct LegalMoveGenerator;

/// Legal moves without annotations; used where only the move list matters.
pub struct FastLegalMoveGenerator;

impl MoveGenerator for LegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
        generate_legal_moves_internal(game_state, true)
    }
}

impl MoveGenerator for FastLegalMoveGenerator {
    fn generate_legal_moves(&self, game_state: &GameState) -> MoveGenResult<Vec<GeneratedMove>> {
        generate_legal_moves_internal(game_state, false)
    }
}

/// Pseudo-legal moves in generation order: pawns, knights, bishops, rooks,
/// queens, king (castling last).
pub fn generate_pseudo_legal_moves(game_state: &GameState) -> Vec<Move> {
    let mut pseudo = Vec::<Move>::with_capacity(64);

    generate_pawn_moves(game_state, &mut pseudo);
    generate_knight_moves(game_state, &mut pseudo);
    generate_bishop_moves(game_state, &mut pseudo);
    generate_rook_moves(game_state, &mut pseudo);
    generate_queen_moves(game_state, &mut pseudo);
    generate_king_moves(game_state, &mut pseudo);

    pseudo
}

/// Plain list of legal moves for `game_state`.
///
/// A position accepted by `GameState::validate` always yields a list, possibly
/// empty; an empty list means checkmate or stalemate.
pub fn legal_moves(game_state: &GameState) -> Vec<Move> {
    match generate_legal_moves_internal(game_state, false) {
        Ok(moves) => moves.into_iter().map(|g| g.mv).collect(),
        Err(err) => {
            warn!("legal move generation failed, reporting no moves: {err}");
            Vec::new()
        }
    }
}

/// Whether the side to move has at least one legal move. Stops at the first.
pub fn has_legal_move(game_state: &GameState) -> bool {
    let mover = game_state.side_to_move;
    generate_pseudo_legal_moves(game_state).iter().any(|mv| {
        apply_move(game_state, mv)
            .map(|next| !is_king_in_check(&next, mover))
            .unwrap_or(false)
    })
}

fn generate_legal_moves_internal(
    game_state: &GameState,
    annotate: bool,
) -> MoveGenResult<Vec<GeneratedMove>> {
    let pseudo = generate_pseudo_legal_moves(game_state);
    let mover = game_state.side_to_move;

    let mut legal = Vec::<GeneratedMove>::with_capacity(pseudo.len());
    for mv in pseudo {
        let next = apply_move(game_state, &mv)
            .map_err(|x| MoveGenerationError::InvalidState(format!("apply_move failed: {x}")))?;

        // Illegal if own king is in check after move.
        if is_king_in_check(&next, mover) {
            continue;
        }

        let annotations = if annotate {
            classify_move_annotations(&next)
        } else {
            MoveAnnotations::default()
        };

        legal.push(GeneratedMove {
            mv,
            game_after_move: next,
            annotations,
        });
    }

    trace!("generated {} legal moves for {}", legal.len(), game_state.side_to_move);
    Ok(legal)
}

fn classify_move_annotations(next: &GameState) -> MoveAnnotations {
    let gives_check = is_king_in_check(next, next.side_to_move);
    MoveAnnotations {
        gives_check,
        is_checkmate: gives_check && !has_legal_move(next),
    }
}
