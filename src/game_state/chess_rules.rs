//! Canonical chess-rule constants.
//!
//! Starting position, castling geometry and draw thresholds used by the
//! generator, the applier and the session.

use crate::game_state::chess_types::*;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Halfmove clock value at which the fifty-move rule may be claimed.
pub const FIFTY_MOVE_HALFMOVES: u16 = 100;

/// Number of occurrences of one position that allows a repetition claim.
pub const REPETITION_CLAIM_COUNT: usize = 3;

/// Geometry of one castling option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CastlingRoute {
    pub right: CastlingRights,
    pub color: Color,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares that must be empty between king and rook.
    pub must_be_empty: u64,
    /// Squares the king stands on, crosses or lands on.
    pub king_path: [Square; 3],
}

impl CastlingRoute {
    #[inline]
    pub const fn is_kingside(&self) -> bool {
        self.king_to > self.king_from
    }
}

pub const CASTLING_ROUTES: [CastlingRoute; 4] = [
    CastlingRoute {
        right: CASTLE_WHITE_KINGSIDE,
        color: Color::White,
        king_from: 4,
        king_to: 6,
        rook_from: 7,
        rook_to: 5,
        must_be_empty: (1 << 5) | (1 << 6),
        king_path: [4, 5, 6],
    },
    CastlingRoute {
        right: CASTLE_WHITE_QUEENSIDE,
        color: Color::White,
        king_from: 4,
        king_to: 2,
        rook_from: 0,
        rook_to: 3,
        must_be_empty: (1 << 1) | (1 << 2) | (1 << 3),
        king_path: [4, 3, 2],
    },
    CastlingRoute {
        right: CASTLE_BLACK_KINGSIDE,
        color: Color::Black,
        king_from: 60,
        king_to: 62,
        rook_from: 63,
        rook_to: 61,
        must_be_empty: (1 << 61) | (1 << 62),
        king_path: [60, 61, 62],
    },
    CastlingRoute {
        right: CASTLE_BLACK_QUEENSIDE,
        color: Color::Black,
        king_from: 60,
        king_to: 58,
        rook_from: 56,
        rook_to: 59,
        must_be_empty: (1 << 57) | (1 << 58) | (1 << 59),
        king_path: [60, 59, 58],
    },
];

/// Route matching a king move, if the move is a castle.
pub fn castling_route_for(color: Color, king_from: Square, king_to: Square) -> Option<&'static CastlingRoute> {
    CASTLING_ROUTES
        .iter()
        .find(|route| route.color == color && route.king_from == king_from && route.king_to == king_to)
}

/// Rights lost when a piece leaves or arrives on `square`.
#[inline]
pub const fn rights_touched_by_square(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_WHITE_QUEENSIDE,
        4 => CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE,
        7 => CASTLE_WHITE_KINGSIDE,
        56 => CASTLE_BLACK_QUEENSIDE,
        60 => CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE,
        63 => CASTLE_BLACK_KINGSIDE,
        _ => 0,
    }
}
