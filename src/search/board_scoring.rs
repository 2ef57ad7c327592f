//! Static position evaluation.
//!
//! Search delegates leaf scoring to `BoardScorer`, so alternate heuristics
//! can be swapped in without touching the tree walk. Scores are always from
//! White's point of view: positive favors White whoever is to move.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::search::piece_square_tables::{
    PieceSquareTable, BISHOP_BLACK, BISHOP_WHITE, KING_BLACK, KING_ENDGAME_BLACK,
    KING_ENDGAME_WHITE, KING_WHITE, KNIGHT, PAWN_BLACK, PAWN_WHITE, QUEEN, ROOK_BLACK, ROOK_WHITE,
};

pub trait BoardScorer: Send + Sync {
    /// Score from White's perspective, regardless of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

/// Material plus piece-square tables, with an endgame king table.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer;

impl BoardScorer for PieceSquareScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        evaluate(game_state)
    }
}

pub fn evaluate(game_state: &GameState) -> i32 {
    let endgame = is_endgame(game_state);

    ALL_SQUARES
        .filter_map(|sq| game_state.piece_at(sq).map(|piece| (sq, piece)))
        .map(|(sq, piece)| {
            let value = piece_value(piece.kind) + positional_bonus(piece, sq, endgame);
            match piece.color {
                Color::White => value,
                Color::Black => -value,
            }
        })
        .sum()
}

#[inline]
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20000,
    }
}

#[inline]
pub fn positional_bonus(piece: Piece, square: Square, endgame: bool) -> i32 {
    table_for(piece, endgame)[square as usize]
}

fn table_for(piece: Piece, endgame: bool) -> &'static PieceSquareTable {
    let white = piece.color == Color::White;
    match piece.kind {
        PieceKind::Pawn if white => &PAWN_WHITE,
        PieceKind::Pawn => &PAWN_BLACK,
        PieceKind::Knight => &KNIGHT,
        PieceKind::Bishop if white => &BISHOP_WHITE,
        PieceKind::Bishop => &BISHOP_BLACK,
        PieceKind::Rook if white => &ROOK_WHITE,
        PieceKind::Rook => &ROOK_BLACK,
        PieceKind::Queen => &QUEEN,
        PieceKind::King => match (endgame, white) {
            (true, true) => &KING_ENDGAME_WHITE,
            (true, false) => &KING_ENDGAME_BLACK,
            (false, true) => &KING_WHITE,
            (false, false) => &KING_BLACK,
        },
    }
}

/// Coarse phase test on board-wide totals: no queens at all, or exactly two
/// queens with at most one knight or bishop between both sides.
pub fn is_endgame(game_state: &GameState) -> bool {
    let queens = game_state.count_both(PieceKind::Queen);
    let minors = game_state.count_both(PieceKind::Knight) + game_state.count_both(PieceKind::Bishop);
    queens == 0 || (queens == 2 && minors <= 1)
}
