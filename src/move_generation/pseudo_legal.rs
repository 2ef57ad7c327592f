//! Pseudo-legal move generation for the side to move.
//!
//! Moves are emitted in a fixed order that the search relies on for its
//! tie-break. Non-pawn pieces come first, highest origin square down, each
//! with its targets highest square down. Castling follows (kingside first),
//! then pawn captures, single pushes, double pushes and en passant, all
//! scanned from the highest square down. Promotions are listed Q, R, B, N.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
use crate::moves::move_descriptions::{
    Move, FLAG_CAPTURE, FLAG_CASTLING, FLAG_DOUBLE_PAWN_PUSH, FLAG_EN_PASSANT,
};

const PROMOTION_ORDER: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

const RANK_4: u64 = 0xFF << 24;
const RANK_5: u64 = 0xFF << 32;

pub fn generate_pseudo_legal_moves(game_state: &GameState, out: &mut Vec<Move>) {
    generate_piece_moves(game_state, out);
    generate_castling_moves(game_state, out);
    generate_pawn_captures(game_state, out);
    generate_pawn_pushes(game_state, out);
    generate_en_passant(game_state, out);
}

/// Removes and returns the highest set square.
#[inline]
fn pop_highest(bb: &mut u64) -> Option<Square> {
    if *bb == 0 {
        return None;
    }
    let square = 63 - bb.leading_zeros() as Square;
    *bb &= !(1u64 << square);
    Some(square)
}

fn attacks_of(kind: PieceKind, square: Square, occupancy: u64) -> u64 {
    match kind {
        PieceKind::Pawn => 0,
        PieceKind::Knight => knight_attacks(square),
        PieceKind::Bishop => bishop_attacks(square, occupancy),
        PieceKind::Rook => rook_attacks(square, occupancy),
        PieceKind::Queen => queen_attacks(square, occupancy),
        PieceKind::King => king_attacks(square),
    }
}

fn generate_piece_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];

    let mut pieces = own_occ & !game_state.pieces[side.index()][PieceKind::Pawn.index()];
    while let Some(from) = pop_highest(&mut pieces) {
        let Some(kind) = game_state.piece_at(from).map(|piece| piece.kind) else {
            continue;
        };
        let mut targets = attacks_of(kind, from, game_state.occupancy_all) & !own_occ;

        while let Some(to) = pop_highest(&mut targets) {
            let captured = enemy_piece_on(game_state, to);
            let flags = if captured.is_some() { FLAG_CAPTURE } else { 0 };
            out.push(Move::new(from, to, kind, captured, None, flags));
        }
    }
}

fn push_pawn_move(out: &mut Vec<Move>, from: Square, to: Square, captured: Option<PieceKind>, flags: u64) {
    if to / 8 == 0 || to / 8 == 7 {
        for promo in PROMOTION_ORDER {
            out.push(Move::new(from, to, PieceKind::Pawn, captured, Some(promo), flags));
        }
    } else {
        out.push(Move::new(from, to, PieceKind::Pawn, captured, None, flags));
    }
}

fn generate_pawn_captures(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];

    let mut pawns = game_state.pieces[side.index()][PieceKind::Pawn.index()];
    while let Some(from) = pop_highest(&mut pawns) {
        let mut targets = pawn_attacks(side, from) & enemy_occ;
        while let Some(to) = pop_highest(&mut targets) {
            push_pawn_move(out, from, to, enemy_piece_on(game_state, to), FLAG_CAPTURE);
        }
    }
}

fn generate_pawn_pushes(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let empty = !game_state.occupancy_all;
    let pawns = game_state.pieces[side.index()][PieceKind::Pawn.index()];

    let (mut single, mut double, back): (u64, u64, i8) = match side {
        Color::White => {
            let single = (pawns << 8) & empty;
            (single, (single << 8) & empty & RANK_4, -8)
        }
        Color::Black => {
            let single = (pawns >> 8) & empty;
            (single, (single >> 8) & empty & RANK_5, 8)
        }
    };

    while let Some(to) = pop_highest(&mut single) {
        push_pawn_move(out, to.wrapping_add_signed(back), to, None, 0);
    }
    while let Some(to) = pop_highest(&mut double) {
        let from = to.wrapping_add_signed(2 * back);
        out.push(Move::new(from, to, PieceKind::Pawn, None, None, FLAG_DOUBLE_PAWN_PUSH));
    }
}

fn generate_en_passant(game_state: &GameState, out: &mut Vec<Move>) {
    let Some(target) = game_state.en_passant_square else {
        return;
    };
    let side = game_state.side_to_move;

    // Our pawns standing where an enemy pawn on the target would attack.
    let mut capturers =
        game_state.pieces[side.index()][PieceKind::Pawn.index()] & pawn_attacks(side.opposite(), target);
    while let Some(from) = pop_highest(&mut capturers) {
        out.push(Move::new(
            from,
            target,
            PieceKind::Pawn,
            Some(PieceKind::Pawn),
            None,
            FLAG_CAPTURE | FLAG_EN_PASSANT,
        ));
    }
}

fn generate_castling_moves(game_state: &GameState, out: &mut Vec<Move>) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let (king_from, kingside, queenside) = match side {
        Color::White => (4u8, CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE),
        Color::Black => (60u8, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE),
    };

    let king_bb = game_state.pieces[side.index()][PieceKind::King.index()];
    if king_bb & (1u64 << king_from) == 0 || game_state.castling_rights & (kingside | queenside) == 0 {
        return;
    }
    if is_square_attacked(game_state, king_from, enemy) {
        return;
    }

    let rooks = game_state.pieces[side.index()][PieceKind::Rook.index()];

    // (right, rook square, squares that must be empty, squares the king crosses, king target)
    let wings: [(CastlingRights, Square, &[Square], [Square; 2], Square); 2] = [
        (kingside, king_from + 3, &[king_from + 1, king_from + 2], [king_from + 1, king_from + 2], king_from + 2),
        (
            queenside,
            king_from - 4,
            &[king_from - 1, king_from - 2, king_from - 3],
            [king_from - 1, king_from - 2],
            king_from - 2,
        ),
    ];

    for (right, rook_square, must_be_empty, king_path, king_to) in wings {
        if game_state.castling_rights & right == 0 || rooks & (1u64 << rook_square) == 0 {
            continue;
        }
        if must_be_empty
            .iter()
            .any(|&sq| game_state.occupancy_all & (1u64 << sq) != 0)
        {
            continue;
        }
        if king_path
            .iter()
            .any(|&sq| is_square_attacked(game_state, sq, enemy))
        {
            continue;
        }
        out.push(Move::new(king_from, king_to, PieceKind::King, None, None, FLAG_CASTLING));
    }
}

#[inline]
fn enemy_piece_on(game_state: &GameState, square: Square) -> Option<PieceKind> {
    game_state
        .piece_at(square)
        .filter(|piece| piece.color != game_state.side_to_move)
        .map(|piece| piece.kind)
}
