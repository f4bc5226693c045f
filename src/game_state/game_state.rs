//! Board state representation.
//!
//! `GameState` is one immutable-by-convention chess position: piece
//! bitboards, occupancy caches, side to move, castling rights, en-passant
//! target and the two move counters. Successor positions are produced by
//! `apply_move`, which clones; nothing in the engine mutates a state that a
//! caller still holds.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks;
use crate::move_generation::legal_move_generator::legal_moves;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

const RANK_1: u64 = 0x0000_0000_0000_00FF;
const RANK_8: u64 = 0xFF00_0000_0000_0000;

/// One chess position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GameState {
    // --- Bitboard representation ---
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    // Occupancy caches, rebuilt by `recalc_occupancy`.
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

/// The part of a position that matters for repetition: placement, side to
/// move, castling rights and en-passant target, without the clocks. The
/// target only counts when an en-passant capture onto it is legal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionKey {
    pieces: [[u64; 6]; 2],
    side_to_move: Color,
    castling_rights: CastlingRights,
    en_passant_square: Option<Square>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl GameState {
    /// Empty board, White to move, no rights.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting position.
    pub fn new_game() -> Self {
        let mut state = Self::new_empty();
        state.pieces[Color::White.index()] = [
            0x0000_0000_0000_FF00,
            0x0000_0000_0000_0042,
            0x0000_0000_0000_0024,
            0x0000_0000_0000_0081,
            0x0000_0000_0000_0008,
            0x0000_0000_0000_0010,
        ];
        state.pieces[Color::Black.index()] = [
            0x00FF_0000_0000_0000,
            0x4200_0000_0000_0000,
            0x2400_0000_0000_0000,
            0x8100_0000_0000_0000,
            0x0800_0000_0000_0000,
            0x1000_0000_0000_0000,
        ];
        state.castling_rights = CASTLE_ALL;
        state.recalc_occupancy();
        state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    /// Piece standing on `square`, if any.
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let mask = 1u64.checked_shl(u32::from(square))?;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in [Color::White, Color::Black] {
            if self.occupancy_by_color[color.index()] & mask == 0 {
                continue;
            }
            for kind in PieceKind::ALL {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some(Piece::new(color, kind));
                }
            }
        }
        None
    }

    /// Bitboard of `color`'s pieces of `kind`.
    #[inline]
    pub fn bitboard(&self, color: Color, kind: PieceKind) -> u64 {
        self.pieces[color.index()][kind.index()]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        legal_move_checks::king_square(self, color)
    }

    /// Whether any piece of `by_color` attacks `square`, ignoring pins.
    #[inline]
    pub fn is_square_attacked_by(&self, square: Square, by_color: Color) -> bool {
        legal_move_checks::is_square_attacked(self, square, by_color)
    }

    #[inline]
    pub fn is_in_check(&self, color: Color) -> bool {
        legal_move_checks::is_king_in_check(self, color)
    }

    #[inline]
    pub fn has_castling_right(&self, right: CastlingRights) -> bool {
        self.castling_rights & right != 0
    }

    pub fn position_key(&self) -> PositionKey {
        let en_passant_square = self
            .en_passant_square
            .filter(|_| legal_moves(self).iter().any(|mv| mv.is_en_passant));

        PositionKey {
            pieces: self.pieces,
            side_to_move: self.side_to_move,
            castling_rights: self.castling_rights,
            en_passant_square,
        }
    }

    /// Place `piece` on an empty square. Occupancy caches are refreshed.
    pub fn put_piece(&mut self, square: Square, piece: Piece) {
        self.pieces[piece.color.index()][piece.kind.index()] |= 1u64 << square;
        self.recalc_occupancy();
    }

    /// Remove whatever stands on `square`. Occupancy caches are refreshed.
    pub fn clear_square(&mut self, square: Square) {
        let mask = !(1u64 << square);
        for side in self.pieces.iter_mut() {
            for bb in side.iter_mut() {
                *bb &= mask;
            }
        }
        self.recalc_occupancy();
    }

    pub(crate) fn recalc_occupancy(&mut self) {
        for color in [Color::White, Color::Black] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::White.index()]
            | self.occupancy_by_color[Color::Black.index()];
    }

    /// Check the structural invariants every reachable position satisfies.
    pub fn validate(&self) -> ChessResult<()> {
        for color in [Color::White, Color::Black] {
            let kings = self.bitboard(color, PieceKind::King).count_ones();
            if kings != 1 {
                return Err(ChessError::InvalidState(format!(
                    "{color} must have exactly one king, found {kings}"
                )));
            }
            if self.bitboard(color, PieceKind::Pawn) & (RANK_1 | RANK_8) != 0 {
                return Err(ChessError::InvalidState(format!(
                    "{color} has a pawn on the first or last rank"
                )));
            }
        }

        let mut seen = 0u64;
        for side in &self.pieces {
            for bb in side {
                if seen & bb != 0 {
                    return Err(ChessError::InvalidState(
                        "two pieces share a square".to_owned(),
                    ));
                }
                seen |= bb;
            }
        }

        if let Some(target) = self.en_passant_square {
            self.validate_en_passant(target)?;
        }

        let opponent = self.side_to_move.opposite();
        if self.is_in_check(opponent) {
            return Err(ChessError::InvalidState(format!(
                "{opponent} is in check but it is {} to move",
                self.side_to_move
            )));
        }

        Ok(())
    }

    /// An en-passant target must be the square skipped by a double push of
    /// the side that just moved, with that pawn still in front of it.
    fn validate_en_passant(&self, target: Square) -> ChessResult<()> {
        let pusher = self.side_to_move.opposite();
        let expected_rank = match self.side_to_move {
            Color::White => 5,
            Color::Black => 2,
        };
        if square_rank(target) != expected_rank {
            return Err(ChessError::InvalidState(format!(
                "en-passant square {target} does not fit {} to move",
                self.side_to_move
            )));
        }

        let (pawn_square, start_square) = match pusher {
            Color::White => (target + 8, target - 8),
            Color::Black => (target - 8, target + 8),
        };
        if self.bitboard(pusher, PieceKind::Pawn) & (1u64 << pawn_square) == 0 {
            return Err(ChessError::InvalidState(format!(
                "en-passant square {target} has no {pusher} pawn in front of it"
            )));
        }
        if self.occupancy_all & ((1u64 << target) | (1u64 << start_square)) != 0 {
            return Err(ChessError::InvalidState(format!(
                "en-passant square {target} or the pawn's start square is occupied"
            )));
        }

        Ok(())
    }
}
