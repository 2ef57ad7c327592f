use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};

#[inline]
pub fn king_square(game_state: &GameState, color: Color) -> Option<Square> {
    let kings = game_state.pieces[color.index()][PieceKind::King.index()];
    if kings == 0 {
        None
    } else {
        Some(kings.trailing_zeros() as Square)
    }
}

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    king_square(game_state, color)
        .is_some_and(|king_sq| is_square_attacked(game_state, king_sq, color.opposite()))
}

/// Whether any piece of `attacker_color` attacks `square`.
///
/// Each test looks outward from the target: a pawn of the defending color on
/// `square` would attack exactly the squares an attacking pawn must stand on,
/// and likewise for the symmetric leaper and slider patterns.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let theirs = &game_state.pieces[attacker_color.index()];
    let occupancy = game_state.occupancy_all;

    if pawn_attacks(attacker_color.opposite(), square) & theirs[PieceKind::Pawn.index()] != 0 {
        return true;
    }
    if knight_attacks(square) & theirs[PieceKind::Knight.index()] != 0 {
        return true;
    }
    if king_attacks(square) & theirs[PieceKind::King.index()] != 0 {
        return true;
    }

    let queens = theirs[PieceKind::Queen.index()];
    if bishop_attacks(square, occupancy) & (theirs[PieceKind::Bishop.index()] | queens) != 0 {
        return true;
    }
    rook_attacks(square, occupancy) & (theirs[PieceKind::Rook.index()] | queens) != 0
}
