use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.pieces[color.index()][PieceKind::King.index()];
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = king_square(game_state, color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

/// Whether `attacker_color` attacks `square`. Pins are ignored; a pinned
/// piece still gives check.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let theirs = &game_state.pieces[attacker_color.index()];

    // A pawn of the attacking color attacks `square` exactly when a pawn of
    // the defending color on `square` would attack the pawn's square.
    if pawn_attacks(attacker_color.opposite(), square) & theirs[PieceKind::Pawn.index()] != 0 {
        return true;
    }

    if knight_attacks(square) & theirs[PieceKind::Knight.index()] != 0 {
        return true;
    }

    if king_attacks(square) & theirs[PieceKind::King.index()] != 0 {
        return true;
    }

    let queens = theirs[PieceKind::Queen.index()];
    let diagonal = theirs[PieceKind::Bishop.index()] | queens;
    if diagonal != 0 && bishop_attacks(square, game_state.occupancy_all) & diagonal != 0 {
        return true;
    }

    let straight = theirs[PieceKind::Rook.index()] | queens;
    straight != 0 && rook_attacks(square, game_state.occupancy_all) & straight != 0
}
