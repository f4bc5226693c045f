use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::enemy_piece_on;
use crate::moves::attack_tables::pawn_attacks;
use crate::moves::chess_move::Move;

/// Pseudo-legal pawn pushes, captures, promotions and en-passant captures.
pub fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;
    let forward: i8 = if side == Color::White { 8 } else { -8 };

    let mut pawns = game_state.pieces[side.index()][PieceKind::Pawn.index()];
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        // Pawns never stand on the promotion rank, so one step is on-board.
        let one_step = (from as i8 + forward) as Square;
        if (1u64 << one_step) & empty != 0 {
            push_pawn_move(side, from, one_step, None, out);

            if square_rank(from) == side.pawn_start_rank() {
                let two_step = (one_step as i8 + forward) as Square;
                if (1u64 << two_step) & empty != 0 {
                    out.push(Move::quiet_or_capture(from, two_step, PieceKind::Pawn, None));
                }
            }
        }

        let mut captures = pawn_attacks(side, from) & enemy_occ;
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            captures &= captures - 1;
            push_pawn_move(side, from, to, enemy_piece_on(game_state, to), out);
        }

        if let Some(ep) = game_state.en_passant_square {
            if pawn_attacks(side, from) & (1u64 << ep) != 0 {
                out.push(Move::en_passant(from, ep));
            }
        }
    }
}

fn push_pawn_move(
    side: Color,
    from: Square,
    to: Square,
    captured: Option<PieceKind>,
    out: &mut Vec<Move>,
) {
    if square_rank(to) == side.promotion_rank() {
        for promo in PieceKind::PROMOTIONS {
            out.push(Move::promoting(from, to, captured, promo));
        }
    } else {
        out.push(Move::quiet_or_capture(from, to, PieceKind::Pawn, captured));
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::game_state::GameState;

    fn pseudo(fen: &str) -> Vec<String> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut out = Vec::new();
        generate_pawn_moves(&game, &mut out);
        out.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn start_position_has_sixteen_pawn_moves() {
        let game = GameState::new_game();
        let mut out = Vec::new();
        generate_pawn_moves(&game, &mut out);
        assert_eq!(out.len(), 16);
    }

    #[test]
    fn blocked_pawn_cannot_push_or_double_push() {
        let moves = pseudo("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(moves.is_empty());
        let moves = pseudo("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(moves, vec!["e2e3"]);
    }

    #[test]
    fn promotion_generates_four_choices_per_target() {
        let moves = pseudo("3n3k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(moves.len(), 8);
        assert!(moves.contains(&"e7e8q".to_owned()));
        assert!(moves.contains(&"e7d8n".to_owned()));
    }

    #[test]
    fn en_passant_capture_is_generated_from_target() {
        let moves = pseudo("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        assert!(moves.contains(&"e5d6".to_owned()));
        assert!(moves.contains(&"e5e6".to_owned()));
    }
}
