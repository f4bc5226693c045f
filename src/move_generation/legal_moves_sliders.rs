//! Bishop, rook and queen generation. All three differ only in the attack
//! function, so they share one loop.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::push_target_moves;
use crate::moves::attack_tables::{bishop_attacks, queen_attacks, rook_attacks};
use crate::moves::chess_move::Move;

pub fn generate_bishop_moves(game_state: &GameState, out: &mut Vec<Move>) {
    generate_slider_moves(game_state, PieceKind::Bishop, bishop_attacks, out);
}

pub fn generate_rook_moves(game_state: &GameState, out: &mut Vec<Move>) {
    generate_slider_moves(game_state, PieceKind::Rook, rook_attacks, out);
}

pub fn generate_queen_moves(game_state: &GameState, out: &mut Vec<Move>) {
    generate_slider_moves(game_state, PieceKind::Queen, queen_attacks, out);
}

fn generate_slider_moves(
    game_state: &GameState,
    piece: PieceKind,
    attacks: fn(Square, u64) -> u64,
    out: &mut Vec<Move>,
) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut sliders = game_state.pieces[side.index()][piece.index()];
    while sliders != 0 {
        let from = sliders.trailing_zeros() as Square;
        let targets = attacks(from, game_state.occupancy_all) & !own_occ;
        push_target_moves(game_state, from, piece, targets, out);
        sliders &= sliders - 1;
    }
}
