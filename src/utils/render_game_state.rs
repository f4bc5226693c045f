//! Terminal-oriented board renderer.
//!
//! Unicode or ASCII pieces, optionally flipped so Black sits at the bottom.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::fen_generator::piece_to_fen_char;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub ascii: bool,
    pub flipped: bool,
}

/// Render the board with White at the bottom using Unicode pieces.
pub fn render_game_state(game_state: &GameState) -> String {
    render_game_state_with(game_state, RenderOptions::default())
}

pub fn render_game_state_with(game_state: &GameState, options: RenderOptions) -> String {
    let files: Vec<u8> = if options.flipped {
        (0..8).rev().collect()
    } else {
        (0..8).collect()
    };
    let ranks: Vec<u8> = if options.flipped {
        (0..8).collect()
    } else {
        (0..8).rev().collect()
    };

    let header: String = files
        .iter()
        .map(|f| char::from(b'a' + f).to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = format!("  {header}\n");
    for &rank in &ranks {
        let rank_label = char::from(b'1' + rank);
        out.push(rank_label);
        out.push(' ');

        let cells: Vec<String> = files
            .iter()
            .map(|&file| match game_state.piece_at(make_square(file, rank)) {
                Some(piece) if options.ascii => piece_to_fen_char(piece).to_string(),
                Some(piece) => piece_to_unicode(piece).to_string(),
                None if options.ascii => ".".to_owned(),
                None => "·".to_owned(),
            })
            .collect();
        out.push_str(&cells.join(" "));

        out.push(' ');
        out.push(rank_label);
        out.push('\n');
    }
    out.push_str(&format!("  {header}"));

    out
}

fn piece_to_unicode(piece: Piece) -> char {
    match (piece.color, piece.kind) {
        (Color::White, PieceKind::Pawn) => '♙',
        (Color::White, PieceKind::Knight) => '♘',
        (Color::White, PieceKind::Bishop) => '♗',
        (Color::White, PieceKind::Rook) => '♖',
        (Color::White, PieceKind::Queen) => '♕',
        (Color::White, PieceKind::King) => '♔',
        (Color::Black, PieceKind::Pawn) => '♟',
        (Color::Black, PieceKind::Knight) => '♞',
        (Color::Black, PieceKind::Bishop) => '♝',
        (Color::Black, PieceKind::Rook) => '♜',
        (Color::Black, PieceKind::Queen) => '♛',
        (Color::Black, PieceKind::King) => '♚',
    }
}
