use crate::game_state::chess_rules::CASTLING_ROUTES;
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::push_target_moves;
use crate::moves::attack_tables::king_attacks;
use crate::moves::chess_move::Move;

pub fn generate_king_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let king_bb = game_state.pieces[side.index()][PieceKind::King.index()];
    if king_bb == 0 {
        return;
    }

    let from = king_bb.trailing_zeros() as Square;
    push_target_moves(game_state, from, PieceKind::King, king_attacks(from) & !own_occ, out);

    generate_castling_moves(game_state, out, from);
}

/// Castling is the one move whose safety is checked at generation time: the
/// king may not start on, cross or land on an attacked square.
fn generate_castling_moves(game_state: &GameState, out: &mut Vec<Move>, king_from: Square) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let rooks = game_state.pieces[side.index()][PieceKind::Rook.index()];

    for route in CASTLING_ROUTES.iter().filter(|r| r.color == side) {
        if !game_state.has_castling_right(route.right)
            || king_from != route.king_from
            || rooks & (1u64 << route.rook_from) == 0
            || game_state.occupancy_all & route.must_be_empty != 0
        {
            continue;
        }

        if route
            .king_path
            .iter()
            .any(|&sq| is_square_attacked(game_state, sq, enemy))
        {
            continue;
        }

        out.push(Move::castle(route.king_from, route.king_to));
    }
}

#[cfg(test)]
mod tests {
    use super::generate_king_moves;
    use crate::game_state::game_state::GameState;

    fn castles(fen: &str) -> Vec<String> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        generate_king_moves(&game, &mut out);
        out.iter().filter(|m| m.is_castle).map(|m| m.to_string()).collect()
    }

    #[test]
    fn both_sides_available_when_clear() {
        let moves = castles("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        assert_eq!(moves, vec!["e1g1", "e1c1"]);
        let moves = castles("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1");
        assert_eq!(moves, vec!["e8g8", "e8c8"]);
    }

    #[test]
    fn no_castling_out_of_or_through_check() {
        // Rook on e8 checks the king.
        assert!(castles("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").is_empty());
        // Rook on f8 covers f1 only: queenside still fine.
        assert_eq!(castles("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1c1"]);
        // b1 may be attacked; only the king's own path matters.
        assert_eq!(castles("1r4k1/8/8/8/8/8/8/R3K2R w KQ - 0 1"), vec!["e1g1", "e1c1"]);
    }

    #[test]
    fn blocked_or_revoked_routes_are_skipped() {
        assert_eq!(castles("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1"), vec!["e1g1"]);
        assert_eq!(castles("4k3/8/8/8/8/8/8/R3K2R w Q - 0 1"), vec!["e1c1"]);
    }
}
