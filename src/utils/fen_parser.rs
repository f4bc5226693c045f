//! FEN-to-GameState parser.
//!
//! Builds a fully-populated position from a Forsyth-Edwards Notation string
//! and rejects positions that break the board invariants. The clock fields
//! may be omitted; they default to `0 1`.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> ChessResult<GameState> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side-to-move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant square"))?;
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(invalid("extra trailing fields"));
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;
    game_state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| invalid(&format!("bad halfmove clock '{halfmove_part}'")))?;
    game_state.fullmove_number = fullmove_part
        .parse::<u16>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| invalid(&format!("bad fullmove number '{fullmove_part}'")))?;

    game_state.recalc_occupancy();
    game_state
        .validate()
        .map_err(|err| invalid(&err.to_string()))?;

    Ok(game_state)
}

fn invalid(reason: &str) -> ChessError {
    ChessError::InvalidFen(reason.to_owned())
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(&format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(invalid("board rank has too many files"));
                }
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| invalid(&format!("invalid piece character '{ch}'")))?;
            if file >= 8 {
                return Err(invalid("board rank has too many files"));
            }

            let sq = make_square(file, board_rank);
            game_state.pieces[piece.color.index()][piece.kind.index()] |= 1u64 << sq;
            file += 1;
        }

        if file != 8 {
            return Err(invalid("board rank does not sum to 8 files"));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(invalid(&format!("invalid side-to-move field '{side_part}'"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_WHITE_KINGSIDE,
            'Q' => rights |= CASTLE_WHITE_QUEENSIDE,
            'k' => rights |= CASTLE_BLACK_KINGSIDE,
            'q' => rights |= CASTLE_BLACK_QUEENSIDE,
            _ => return Err(invalid(&format!("invalid castling rights character '{ch}'"))),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part).map_err(|err| invalid(&err.to_string()))?;
    if !matches!(square_rank(square), 2 | 5) {
        return Err(invalid(&format!("en-passant square '{en_passant_part}' not on rank 3 or 6")));
    }
    Ok(Some(square))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    PieceKind::from_letter(ch).map(|kind| Piece::new(color, kind))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessError;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::*;

    #[test]
    fn parse_starting_fen() {
        let game_state = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        assert_eq!(game_state.side_to_move, Color::White);
        assert_eq!(game_state.castling_rights, CASTLE_ALL);
        assert_eq!(game_state.fullmove_number, 1);
        assert_eq!(game_state.halfmove_clock, 0);
        assert_eq!(game_state.occupancy_all.count_ones(), 32);
    }

    #[test]
    fn clocks_are_optional() {
        let game_state = parse_fen("4k3/8/8/8/8/8/8/4K3 b - -").expect("short FEN should parse");
        assert_eq!(game_state.side_to_move, Color::Black);
        assert_eq!(game_state.halfmove_clock, 0);
        assert_eq!(game_state.fullmove_number, 1);
    }

    #[test]
    fn rejects_malformed_layouts() {
        for fen in [
            "",
            "8/8/8/8/8/8/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K4 w - - 0 1",
            "4k3/8/8/8/8/8/8/4X3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w Z - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - e4 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 0",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra",
        ] {
            assert!(
                matches!(parse_fen(fen), Err(ChessError::InvalidFen(_))),
                "expected rejection for {fen:?}"
            );
        }
    }

    #[test]
    fn rejects_invariant_violations() {
        // No black king.
        assert!(parse_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // Pawn on the eighth rank.
        assert!(parse_fen("P3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_err());
        // Side not to move is in check.
        assert!(parse_fen("4k3/8/8/8/8/8/8/4KR2 w - - 0 1").is_ok());
        assert!(parse_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1").is_err());
    }
}
