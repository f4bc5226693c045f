use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_target_moves;
use crate::moves::attack_tables::knight_attacks;
use crate::moves::chess_move::Move;

pub fn generate_knight_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut knights = game_state.pieces[side.index()][PieceKind::Knight.index()];
    while knights != 0 {
        let from = knights.trailing_zeros() as Square;
        let targets = knight_attacks(from) & !own_occ;
        push_target_moves(game_state, from, PieceKind::Knight, targets, out);
        knights &= knights - 1;
    }
}
