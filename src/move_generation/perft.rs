//! Perft: leaf-node counting over the legal move tree.
//!
//! Used to validate the generator against published reference counts and
//! as the workload of the criterion benchmark.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_generator::{FastLegalMoveGenerator, LegalMoveGenerator};
use crate::move_generation::move_generator::{GeneratedMove, MoveGenResult, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn record_leaf(&mut self, mv: &GeneratedMove) {
        self.nodes += 1;
        if mv.mv.is_capture() {
            self.captures += 1;
        }
        if mv.mv.is_en_passant {
            self.en_passant += 1;
        }
        if mv.mv.is_castle {
            self.castles += 1;
        }
        if mv.mv.promotion.is_some() {
            self.promotions += 1;
        }
        if mv.annotations.gives_check {
            self.checks += 1;
        }
        if mv.annotations.is_checkmate {
            self.checkmates += 1;
        }
    }
}

/// Detailed perft with check and mate counts at the leaves.
pub fn perft<G: MoveGenerator>(generator: &G, game_state: &GameState, depth: u8) -> MoveGenResult<PerftCounts> {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }

    for mv in generator.generate_legal_moves(game_state)? {
        perft_recurse(generator, &mv, depth, 1, &mut total)?;
    }

    Ok(total)
}

/// Annotated perft using the standard legal generator.
pub fn perft_detailed(game_state: &GameState, depth: u8) -> MoveGenResult<PerftCounts> {
    perft(&LegalMoveGenerator, game_state, depth)
}

/// Node-count-only perft; check and mate fields stay zero.
pub fn perft_legal(game_state: &GameState, depth: u8) -> MoveGenResult<PerftCounts> {
    perft(&FastLegalMoveGenerator, game_state, depth)
}

fn perft_recurse<G: MoveGenerator>(
    generator: &G,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) -> MoveGenResult<()> {
    if current_depth == search_depth {
        counts.record_leaf(mv);
        return Ok(());
    }

    for child in generator.generate_legal_moves(&mv.game_after_move)? {
        perft_recurse(generator, &child, search_depth, current_depth + 1, counts)?;
    }

    Ok(())
}
