use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::square_to_algebraic;

/// A move as produced by the generator for one specific position.
///
/// `piece` and `captured` are filled in from the position the move was
/// generated in; the move is meaningless against any other position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: PieceKind,
    pub captured: Option<PieceKind>,
    pub promotion: Option<PieceKind>,
    pub is_castle: bool,
    pub is_en_passant: bool,
}

impl Move {
    /// Plain (non-special) move, optionally capturing.
    #[inline]
    pub const fn quiet_or_capture(
        from: Square,
        to: Square,
        piece: PieceKind,
        captured: Option<PieceKind>,
    ) -> Self {
        Self {
            from,
            to,
            piece,
            captured,
            promotion: None,
            is_castle: false,
            is_en_passant: false,
        }
    }

    #[inline]
    pub const fn promoting(
        from: Square,
        to: Square,
        captured: Option<PieceKind>,
        promotion: PieceKind,
    ) -> Self {
        Self {
            from,
            to,
            piece: PieceKind::Pawn,
            captured,
            promotion: Some(promotion),
            is_castle: false,
            is_en_passant: false,
        }
    }

    #[inline]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            piece: PieceKind::Pawn,
            captured: Some(PieceKind::Pawn),
            promotion: None,
            is_castle: false,
            is_en_passant: true,
        }
    }

    #[inline]
    pub const fn castle(king_from: Square, king_to: Square) -> Self {
        Self {
            from: king_from,
            to: king_to,
            piece: PieceKind::King,
            captured: None,
            promotion: None,
            is_castle: true,
            is_en_passant: false,
        }
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Pawn advance of two ranks.
    #[inline]
    pub const fn is_double_pawn_push(&self) -> bool {
        matches!(self.piece, PieceKind::Pawn) && self.from.abs_diff(self.to) == 16
    }
}

impl std::fmt::Display for Move {
    /// Coordinate form, e.g. `e2e4` or `e7e8q`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            square_to_algebraic(self.from).map_err(|_| std::fmt::Error)?,
            square_to_algebraic(self.to).map_err(|_| std::fmt::Error)?
        )?;
        if let Some(promo) = self.promotion {
            write!(f, "{}", promo.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
