//! Game session: the one mutable object in the engine.
//!
//! Owns the current position plus an append-only history of
//! `(prior state, move, SAN)` entries. Applying a move pushes an entry;
//! undo pops one and restores its stored prior state verbatim, so castling
//! rights and clocks come back exactly as they were rather than being
//! re-derived. SAN is captured at the moment a move is played and never
//! regenerated.

use log::{debug, info, warn};

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::{FIFTY_MOVE_HALFMOVES, REPETITION_CLAIM_COUNT};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_apply::apply_move;
use crate::move_generation::legal_move_generator::{has_legal_move, legal_moves};
use crate::moves::chess_move::Move;
use crate::utils::san::move_to_san;

/// Classification of a position from the side to move's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// Game continues; the side to move is in check.
    Check,
    /// Terminal. `winner` is the side that delivered mate.
    Checkmate { winner: Color },
    /// Terminal draw.
    Stalemate,
}

impl GameStatus {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }
}

/// Draws a player could claim; they never end the session on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
    ThreefoldRepetition,
    InsufficientMaterial,
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub prior_state: GameState,
    pub prior_status: GameStatus,
    pub mv: Move,
    pub san: String,
}

/// Result of a successful `attempt_move`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveApplied {
    pub mv: Move,
    pub san: String,
    pub status: GameStatus,
}

/// Classify `game_state` as ongoing, check, checkmate or stalemate.
pub fn classify(game_state: &GameState) -> GameStatus {
    let in_check = game_state.is_in_check(game_state.side_to_move);
    match (has_legal_move(game_state), in_check) {
        (true, false) => GameStatus::Ongoing,
        (true, true) => GameStatus::Check,
        (false, true) => GameStatus::Checkmate {
            winner: game_state.side_to_move.opposite(),
        },
        (false, false) => GameStatus::Stalemate,
    }
}

#[derive(Debug, Clone)]
pub struct GameSession {
    initial_state: GameState,
    current: GameState,
    history: Vec<HistoryEntry>,
    status: GameStatus,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new_game()
    }
}

impl GameSession {
    /// Session at the standard starting position.
    pub fn new_game() -> Self {
        Self::from_state(GameState::new_game())
    }

    /// Session starting from an arbitrary valid position.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        Ok(Self::from_state(GameState::from_fen(fen)?))
    }

    fn from_state(state: GameState) -> Self {
        let status = classify(&state);
        Self {
            initial_state: state.clone(),
            current: state,
            history: Vec::new(),
            status,
        }
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.current
    }

    #[inline]
    pub fn initial_state(&self) -> &GameState {
        &self.initial_state
    }

    #[inline]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.current.side_to_move
    }

    #[inline]
    pub fn fen(&self) -> String {
        self.current.get_fen()
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.current)
    }

    /// Legal moves of the piece on `from`, for highlighting destinations.
    pub fn legal_moves_from(&self, from: Square) -> Vec<Move> {
        legal_moves(&self.current)
            .into_iter()
            .filter(|mv| mv.from == from)
            .collect()
    }

    /// Whether a legal move from `from` to `to` exists that needs a promotion
    /// piece.
    pub fn requires_promotion(&self, from: Square, to: Square) -> bool {
        self.legal_moves_from(from)
            .iter()
            .any(|mv| mv.to == to && mv.promotion.is_some())
    }

    /// Play the legal move matching `from`, `to` and `promotion`.
    ///
    /// A pawn move onto the last rank without `promotion` yields
    /// `AmbiguousPromotion`. A `promotion` on a move that does not promote
    /// is an `IllegalMove`. Nothing is changed on any error.
    pub fn attempt_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<MoveApplied> {
        let candidates: Vec<Move> = self
            .legal_moves_from(from)
            .into_iter()
            .filter(|mv| mv.to == to)
            .collect();
        let illegal = ChessError::IllegalMove { from, to, promotion };

        if candidates.is_empty() {
            warn!("rejected move from {from} to {to}: no legal move matches");
            return Err(illegal);
        }

        let needs_promotion = candidates.iter().any(|mv| mv.promotion.is_some());
        match (needs_promotion, promotion) {
            (true, None) => {
                warn!("rejected move from {from} to {to}: promotion piece missing");
                return Err(ChessError::AmbiguousPromotion { from, to });
            }
            (false, Some(kind)) => {
                warn!("rejected move from {from} to {to}: {kind:?} given but the move does not promote");
                return Err(illegal);
            }
            _ => {}
        }

        let mv = candidates
            .into_iter()
            .find(|mv| mv.promotion == promotion)
            .ok_or(illegal)?;

        self.play(mv)
    }

    /// Like `attempt_move`, but asks `prompt` for the promotion piece only
    /// when the matched move needs one. A `None` answer aborts the request.
    pub fn attempt_move_with_prompt<F>(&mut self, from: Square, to: Square, prompt: F) -> ChessResult<MoveApplied>
    where
        F: FnOnce(Square, Square) -> Option<PieceKind>,
    {
        let promotion = if self.requires_promotion(from, to) {
            let Some(kind) = prompt(from, to) else {
                warn!("rejected move from {from} to {to}: no promotion piece chosen");
                return Err(ChessError::AmbiguousPromotion { from, to });
            };
            Some(kind)
        } else {
            None
        };

        self.attempt_move(from, to, promotion)
    }

    /// Play a move already known to be legal in the current position.
    pub fn play(&mut self, mv: Move) -> ChessResult<MoveApplied> {
        let san = move_to_san(&self.current, &mv)?;
        let next = apply_move(&self.current, &mv)?;

        let prior_state = std::mem::replace(&mut self.current, next);
        self.history.push(HistoryEntry {
            prior_state,
            prior_status: self.status,
            mv,
            san: san.clone(),
        });
        self.status = classify(&self.current);

        debug!("played {san} ({mv}), status {:?}", self.status);
        match self.status {
            GameStatus::Checkmate { winner } => info!("{winner} wins by checkmate"),
            GameStatus::Stalemate => info!("stalemate"),
            _ => {}
        }

        Ok(MoveApplied {
            mv,
            san,
            status: self.status,
        })
    }

    /// Restore the position before the most recent move.
    pub fn undo(&mut self) -> ChessResult<()> {
        let entry = self.history.pop().ok_or(ChessError::NothingToUndo)?;
        debug!("undo {}", entry.san);
        self.current = entry.prior_state;
        self.status = entry.prior_status;
        Ok(())
    }

    /// Clear history and return to the standard starting position.
    pub fn reset(&mut self) {
        debug!("reset after {} plies", self.history.len());
        *self = Self::new_game();
    }

    /// SAN of every move played, in order.
    pub fn move_log(&self) -> Vec<String> {
        self.history.iter().map(|entry| entry.san.clone()).collect()
    }

    /// Move log grouped by move number: `(number, white, black)`.
    ///
    /// A session that started with Black to move gets `None` for White's
    /// half of the first pair.
    pub fn move_pairs(&self) -> Vec<(u16, Option<String>, Option<String>)> {
        let mut pairs = Vec::new();
        let mut number = self.initial_state.fullmove_number;
        let mut sans = self.move_log().into_iter();

        if self.initial_state.side_to_move == Color::Black {
            if let Some(black) = sans.next() {
                pairs.push((number, None, Some(black)));
                number = number.saturating_add(1);
            }
        }

        while let Some(white) = sans.next() {
            pairs.push((number, Some(white), sans.next()));
            number = number.saturating_add(1);
        }

        pairs
    }

    /// Move log as display text, e.g. `1. e4 e5 2. Nf3`.
    pub fn move_log_text(&self) -> String {
        self.move_pairs()
            .into_iter()
            .map(|(number, white, black)| match (white, black) {
                (Some(w), Some(b)) => format!("{number}. {w} {b}"),
                (Some(w), None) => format!("{number}. {w}"),
                (None, Some(b)) => format!("{number}... {b}"),
                (None, None) => String::new(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// A draw the side to move could claim, if any.
    pub fn claimable_draw(&self) -> Option<DrawReason> {
        if is_insufficient_material(&self.current) {
            return Some(DrawReason::InsufficientMaterial);
        }
        if self.current.halfmove_clock >= FIFTY_MOVE_HALFMOVES {
            return Some(DrawReason::FiftyMoveRule);
        }
        if self.repetition_count() >= REPETITION_CLAIM_COUNT {
            return Some(DrawReason::ThreefoldRepetition);
        }
        None
    }

    /// How many times the current position has occurred, including now.
    pub fn repetition_count(&self) -> usize {
        let key = self.current.position_key();
        1 + self
            .history
            .iter()
            .filter(|entry| entry.prior_state.position_key() == key)
            .count()
    }
}

/// Neither side can possibly mate: bare kings, a single minor piece, or
/// bishops only, all on squares of one color.
pub fn is_insufficient_material(game_state: &GameState) -> bool {
    const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;

    let heavy_or_pawns = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen]
        .iter()
        .any(|&kind| game_state.bitboard(Color::White, kind) | game_state.bitboard(Color::Black, kind) != 0);
    if heavy_or_pawns {
        return false;
    }

    let knights = game_state.bitboard(Color::White, PieceKind::Knight)
        | game_state.bitboard(Color::Black, PieceKind::Knight);
    let bishops = game_state.bitboard(Color::White, PieceKind::Bishop)
        | game_state.bitboard(Color::Black, PieceKind::Bishop);
    let minors = knights.count_ones() + bishops.count_ones();

    if minors <= 1 {
        return true;
    }

    knights == 0 && (bishops & LIGHT_SQUARES == 0 || bishops & !LIGHT_SQUARES == 0)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::san::san_to_move;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("square should parse")
    }

    fn play_coords(session: &mut GameSession, from: &str, to: &str) -> MoveApplied {
        session
            .attempt_move(sq(from), sq(to), None)
            .unwrap_or_else(|err| panic!("{from}{to} should be legal: {err}"))
    }

    fn play_san(session: &mut GameSession, san: &str) -> MoveApplied {
        let mv = san_to_move(session.state(), san).unwrap_or_else(|err| panic!("{san}: {err}"));
        session.play(mv).expect("move should apply")
    }

    #[test]
    fn new_game_has_twenty_moves_and_is_ongoing() {
        let session = GameSession::new_game();
        assert_eq!(session.legal_moves().len(), 20);
        assert_eq!(session.status(), GameStatus::Ongoing);
        assert!(session.move_log().is_empty());
    }

    #[test]
    fn after_e4_e5_nf3_black_has_twenty_nine_moves() {
        let mut session = GameSession::new_game();
        for san in ["e4", "e5", "Nf3"] {
            play_san(&mut session, san);
        }
        let moves = session.legal_moves();
        assert_eq!(moves.len(), 29);

        let sans: Vec<String> = moves
            .iter()
            .map(|mv| move_to_san(session.state(), mv).expect("SAN should encode"))
            .collect();
        for expected in ["Nc6", "Nf6", "d6", "Qe7", "Ke7", "Bc5", "Qh4", "a5", "Ne7"] {
            assert!(sans.contains(&expected.to_owned()), "missing {expected}");
        }
        assert!(!sans.iter().any(|s| s == "e4"));
    }

    #[test]
    fn scholars_mate_ends_in_checkmate() {
        let mut session = GameSession::new_game();
        let moves = [
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
            ("h5", "f7"),
        ];
        let mut last = None;
        for (from, to) in moves {
            last = Some(play_coords(&mut session, from, to));
        }

        assert_eq!(
            session.move_log(),
            vec!["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"]
        );
        assert_eq!(session.status(), GameStatus::Checkmate { winner: Color::White });
        assert_eq!(last.map(|m| m.status), Some(GameStatus::Checkmate { winner: Color::White }));
        assert!(session.status().is_terminal());
        assert!(session.legal_moves().is_empty());
        assert_eq!(session.move_log_text(), "1. e4 e5 2. Bc4 Nc6 3. Qh5 Nf6 4. Qxf7#");
    }

    #[test]
    fn fastest_stalemate_construction() {
        // Sam Loyd's ten-move stalemate.
        let mut session = GameSession::new_game();
        for san in [
            "e3", "a5", "Qh5", "Ra6", "Qxa5", "h5", "h4", "Rah6", "Qxc7", "f6", "Qxd7+", "Kf7",
            "Qxb7", "Qd3", "Qxb8", "Qh7", "Qxc8", "Kg6", "Qe6",
        ] {
            play_san(&mut session, san);
        }

        assert_eq!(session.status(), GameStatus::Stalemate);
        assert!(session.legal_moves().is_empty());
        let king = session.state().king_square(Color::Black).expect("black king");
        assert!(!session.state().is_square_attacked_by(king, Color::White));
        assert!(session.status().is_terminal());
    }

    #[test]
    fn undo_restores_prior_state_exactly() {
        let mut session = GameSession::new_game();
        let before = session.state().clone();
        play_coords(&mut session, "g1", "f3");
        assert_ne!(session.state(), &before);
        session.undo().expect("undo should succeed");
        assert_eq!(session.state(), &before);
        assert!(session.history().is_empty());
        assert_eq!(session.undo(), Err(ChessError::NothingToUndo));
    }

    #[test]
    fn random_sequences_undo_to_every_prior_state() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let mut session = GameSession::new_game();
            let mut snapshots = vec![session.state().clone()];
            for _ in 0..60 {
                let moves = session.legal_moves();
                if moves.is_empty() {
                    break;
                }
                let mv = moves[rng.random_range(0..moves.len())];
                session.play(mv).expect("legal move should apply");
                snapshots.push(session.state().clone());
            }

            while session.undo().is_ok() {
                snapshots.pop();
                assert_eq!(session.state(), snapshots.last().expect("snapshot"));
            }
            assert_eq!(session.state(), &GameState::new_game());
            assert_eq!(snapshots.len(), 1);
        }
    }

    #[test]
    fn en_passant_is_available_for_one_ply_only() {
        let mut session = GameSession::new_game();
        for (from, to) in [("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")] {
            play_coords(&mut session, from, to);
        }

        let ep: Vec<Move> = session.legal_moves().into_iter().filter(|m| m.is_en_passant).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_string(), "e5d6");

        // Delay one move each; the capture is gone.
        play_coords(&mut session, "h2", "h3");
        play_coords(&mut session, "h7", "h6");
        assert!(session.legal_moves().iter().all(|m| !m.is_en_passant));
        assert!(session.attempt_move(sq("e5"), sq("d6"), None).is_err());
    }

    #[test]
    fn en_passant_capture_logs_and_removes_pawn() {
        let mut session = GameSession::new_game();
        for (from, to) in [("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")] {
            play_coords(&mut session, from, to);
        }
        let applied = play_coords(&mut session, "e5", "d6");
        assert_eq!(applied.san, "exd6");
        assert!(applied.mv.is_en_passant);
        assert_eq!(session.state().piece_at(sq("d5")), None);
    }

    #[test]
    fn rook_returning_home_does_not_restore_castling() {
        let mut session =
            GameSession::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        play_coords(&mut session, "h1", "h2");
        play_coords(&mut session, "a8", "a7");
        play_coords(&mut session, "h2", "h1");
        play_coords(&mut session, "a7", "a8");

        let state = session.state();
        assert!(!state.has_castling_right(CASTLE_WHITE_KINGSIDE));
        assert!(!state.has_castling_right(CASTLE_BLACK_QUEENSIDE));
        assert!(state.has_castling_right(CASTLE_WHITE_QUEENSIDE));
        assert!(session.attempt_move(sq("e1"), sq("g1"), None).is_err());
        assert_eq!(play_coords(&mut session, "e1", "c1").san, "O-O-O");
    }

    #[test]
    fn promotion_requires_a_choice() {
        let mut session = GameSession::from_fen("7k/4P3/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(session.requires_promotion(sq("e7"), sq("e8")));

        let before = session.state().clone();
        assert_eq!(
            session.attempt_move(sq("e7"), sq("e8"), None),
            Err(ChessError::AmbiguousPromotion { from: sq("e7"), to: sq("e8") })
        );
        assert_eq!(session.state(), &before);
        assert!(session.history().is_empty());

        let applied = session
            .attempt_move_with_prompt(sq("e7"), sq("e8"), |_, _| Some(PieceKind::Rook))
            .expect("promotion should apply");
        assert_eq!(applied.san, "e8=R+");
        assert_eq!(applied.status, GameStatus::Check);
    }

    #[test]
    fn promotion_piece_on_a_plain_move_is_illegal() {
        let mut session = GameSession::new_game();
        assert_eq!(
            session.attempt_move(sq("e2"), sq("e4"), Some(PieceKind::Queen)),
            Err(ChessError::IllegalMove {
                from: sq("e2"),
                to: sq("e4"),
                promotion: Some(PieceKind::Queen),
            })
        );
        assert!(session.history().is_empty());
        assert_eq!(session.state(), &GameState::new_game());

        assert_eq!(
            session.attempt_move(sq("e2"), sq("e5"), Some(PieceKind::Rook)),
            Err(ChessError::IllegalMove {
                from: sq("e2"),
                to: sq("e5"),
                promotion: Some(PieceKind::Rook),
            })
        );

        let mut session = GameSession::from_fen("7k/4P3/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(matches!(
            session.attempt_move(sq("e7"), sq("e8"), Some(PieceKind::King)),
            Err(ChessError::IllegalMove { .. })
        ));
        assert!(session.history().is_empty());
    }

    #[test]
    fn repetition_counts_position_after_double_push() {
        let mut session = GameSession::new_game();
        for san in ["e4", "Nf6", "Nf3", "Ng8", "Ng1", "Nf6", "Nf3", "Ng8", "Ng1"] {
            play_san(&mut session, san);
        }
        assert_eq!(session.repetition_count(), 3);
        assert_eq!(session.claimable_draw(), Some(DrawReason::ThreefoldRepetition));
    }

    #[test]
    fn phantom_en_passant_fen_is_rejected() {
        assert!(matches!(
            GameSession::from_fen("4k3/8/8/3P4/8/8/8/4K3 w - e6 0 1"),
            Err(ChessError::InvalidFen(_))
        ));
    }

    #[test]
    fn illegal_requests_leave_session_untouched() {
        let mut session = GameSession::new_game();
        let before = session.state().clone();
        assert!(matches!(
            session.attempt_move(sq("e2"), sq("e5"), None),
            Err(ChessError::IllegalMove { .. })
        ));
        assert!(session.attempt_move(sq("e7"), sq("e5"), None).is_err());
        assert!(session.attempt_move(sq("e4"), sq("e5"), None).is_err());
        assert_eq!(session.state(), &before);
        assert_eq!(session.status(), GameStatus::Ongoing);
    }

    #[test]
    fn reset_clears_history() {
        let mut session = GameSession::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1").expect("FEN should parse");
        play_coords(&mut session, "a1", "a7");
        session.reset();
        assert!(session.history().is_empty());
        assert_eq!(session.state(), &GameState::new_game());
    }

    #[test]
    fn move_pairs_when_black_starts() {
        let mut session = GameSession::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 7").expect("FEN should parse");
        play_coords(&mut session, "e8", "d8");
        play_coords(&mut session, "e1", "d1");
        assert_eq!(session.move_log_text(), "7... Kd8 8. Kd1");
    }

    #[test]
    fn draw_claims() {
        let session = GameSession::from_fen("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(session.claimable_draw(), Some(DrawReason::InsufficientMaterial));

        let session = GameSession::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80").expect("FEN should parse");
        assert_eq!(session.claimable_draw(), Some(DrawReason::FiftyMoveRule));

        let mut session = GameSession::new_game();
        for _ in 0..2 {
            play_coords(&mut session, "g1", "f3");
            play_coords(&mut session, "g8", "f6");
            play_coords(&mut session, "f3", "g1");
            play_coords(&mut session, "f6", "g8");
        }
        assert_eq!(session.repetition_count(), 3);
        assert_eq!(session.claimable_draw(), Some(DrawReason::ThreefoldRepetition));
        assert_eq!(session.status(), GameStatus::Ongoing);
    }

    #[test]
    fn insufficient_material_cases() {
        let fen_result = |fen: &str| {
            is_insufficient_material(&GameState::from_fen(fen).expect("FEN should parse"))
        };
        assert!(fen_result("4k3/8/8/8/8/8/8/4K3 w - - 0 1"));
        assert!(fen_result("4k3/8/8/8/8/8/8/4KN2 w - - 0 1"));
        // c1 and f8 are both dark squares.
        assert!(fen_result("4kb2/8/8/8/8/8/8/2B1K3 w - - 0 1"));
        assert!(!fen_result("4k1b1/8/8/8/8/8/8/2B1K3 w - - 0 1"));
        assert!(!fen_result("4k3/8/8/8/8/8/8/3NKN2 w - - 0 1"));
        assert!(!fen_result("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"));
    }
}
