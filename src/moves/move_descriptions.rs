//! Packed move encoding.
//!
//! A `Move` carries origin, destination, moved/captured/promotion piece codes
//! and special-move flags in one integer, so it is `Copy`, cheap to compare
//! and self-describing enough to render without the board.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, Square};

const FROM_SHIFT: u64 = 0;
const TO_SHIFT: u64 = 6;
const MOVED_PIECE_SHIFT: u64 = 12;
const CAPTURED_PIECE_SHIFT: u64 = 15;
const PROMOTION_PIECE_SHIFT: u64 = 18;

const SQUARE_MASK: u64 = 0x3F;
const PIECE_MASK: u64 = 0x7;
pub const NO_PIECE_CODE: u64 = 0x7;

pub const FLAG_CAPTURE: u64 = 1u64 << 21;
pub const FLAG_DOUBLE_PAWN_PUSH: u64 = 1u64 << 22;
pub const FLAG_EN_PASSANT: u64 = 1u64 << 23;
pub const FLAG_CASTLING: u64 = 1u64 << 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u64);

impl Move {
    #[inline]
    pub fn new(
        from: Square,
        to: Square,
        moved_piece: PieceKind,
        captured_piece: Option<PieceKind>,
        promotion_piece: Option<PieceKind>,
        flags: u64,
    ) -> Self {
        let mut out = 0u64;
        out |= (u64::from(from) & SQUARE_MASK) << FROM_SHIFT;
        out |= (u64::from(to) & SQUARE_MASK) << TO_SHIFT;
        out |= piece_kind_to_code(moved_piece) << MOVED_PIECE_SHIFT;
        out |= captured_piece
            .map(piece_kind_to_code)
            .unwrap_or(NO_PIECE_CODE)
            << CAPTURED_PIECE_SHIFT;
        out |= promotion_piece
            .map(piece_kind_to_code)
            .unwrap_or(NO_PIECE_CODE)
            << PROMOTION_PIECE_SHIFT;
        out |= flags;
        Self(out)
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn from(self) -> Square {
        ((self.0 >> FROM_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub const fn to(self) -> Square {
        ((self.0 >> TO_SHIFT) & SQUARE_MASK) as Square
    }

    #[inline]
    pub fn moved_piece(self) -> Option<PieceKind> {
        piece_kind_from_code((self.0 >> MOVED_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub fn captured_piece(self) -> Option<PieceKind> {
        piece_kind_from_code((self.0 >> CAPTURED_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub fn promotion(self) -> Option<PieceKind> {
        piece_kind_from_code((self.0 >> PROMOTION_PIECE_SHIFT) & PIECE_MASK)
    }

    #[inline]
    pub const fn has_flag(self, flag: u64) -> bool {
        self.0 & flag != 0
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.has_flag(FLAG_CAPTURE)
    }

    #[inline]
    pub const fn is_en_passant(self) -> bool {
        self.has_flag(FLAG_EN_PASSANT)
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.has_flag(FLAG_CASTLING)
    }

    #[inline]
    pub const fn is_double_pawn_push(self) -> bool {
        self.has_flag(FLAG_DOUBLE_PAWN_PUSH)
    }
}

/// Long algebraic (UCI coordinate) rendering, e.g. `e2e4` or `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for square in [self.from(), self.to()] {
            let file = char::from(b'a' + square % 8);
            let rank = char::from(b'1' + square / 8);
            write!(f, "{file}{rank}")?;
        }
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promotion_char(promo))?;
        }
        Ok(())
    }
}

#[inline]
pub fn piece_kind_to_code(piece_kind: PieceKind) -> u64 {
    piece_kind.index() as u64
}

#[inline]
pub fn piece_kind_from_code(code: u64) -> Option<PieceKind> {
    PieceKind::from_index(code as usize)
}

pub fn promotion_char(piece_kind: PieceKind) -> char {
    match piece_kind {
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        _ => 'q',
    }
}
