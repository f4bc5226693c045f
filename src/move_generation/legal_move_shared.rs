use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::chess_move::Move;

#[inline]
pub fn piece_on_square_for_color(
    game_state: &GameState,
    color: Color,
    square: Square,
) -> Option<PieceKind> {
    let mask = 1u64.checked_shl(u32::from(square))?;
    PieceKind::ALL
        .into_iter()
        .find(|kind| game_state.pieces[color.index()][kind.index()] & mask != 0)
}

#[inline]
pub fn enemy_piece_on(game_state: &GameState, square: Square) -> Option<PieceKind> {
    piece_on_square_for_color(game_state, game_state.side_to_move.opposite(), square)
}

/// Push one move per set bit of `targets`, marking captures of enemy pieces.
/// `targets` must already exclude squares held by the side to move.
pub fn push_target_moves(
    game_state: &GameState,
    from: Square,
    piece: PieceKind,
    mut targets: u64,
    out: &mut Vec<Move>,
) {
    while targets != 0 {
        let to = targets.trailing_zeros() as Square;
        out.push(Move::quiet_or_capture(
            from,
            to,
            piece,
            enemy_piece_on(game_state, to),
        ));
        targets &= targets - 1;
    }
}
