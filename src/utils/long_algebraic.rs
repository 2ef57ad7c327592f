//! Long algebraic (coordinate) move notation: `e2e4`, `e1g1`, `a7a8q`.
//!
//! `long_algebraic_to_move` decodes text against the board to recover the
//! moved/captured pieces and special-move flags. `parse_legal_move` and
//! `is_valid_move` additionally require the result to be one of the rules
//! engine's legal moves; this is the gate every submitted player move goes
//! through.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::move_generator::RulesEngine;
use crate::moves::move_descriptions::*;
use crate::utils::algebraic::algebraic_to_square;

pub fn long_algebraic_to_move(long_algebraic: &str, game_state: &GameState) -> ChessResult<Move> {
    let notation_error = |msg: &str| ChessError::InvalidMoveNotation(format!("{msg}: {long_algebraic}"));

    if !long_algebraic.is_ascii() || !(4..=5).contains(&long_algebraic.len()) {
        return Err(notation_error("expected source, destination and optional promotion"));
    }

    let from = algebraic_to_square(&long_algebraic[0..2])?;
    let to = algebraic_to_square(&long_algebraic[2..4])?;

    let moving = game_state
        .piece_at(from)
        .ok_or(ChessError::NoPieceOnSquare(from))?;
    if moving.color != game_state.side_to_move {
        return Err(notation_error("piece does not belong to the side to move"));
    }

    let target = game_state.piece_at(to);
    let mut captured_piece = target.map(|piece| piece.kind);
    let mut flags = 0u64;

    if captured_piece.is_some() {
        flags |= FLAG_CAPTURE;
    }
    if moving.kind == PieceKind::Pawn && from.abs_diff(to) == 16 {
        flags |= FLAG_DOUBLE_PAWN_PUSH;
    }
    if moving.kind == PieceKind::King && (from % 8).abs_diff(to % 8) == 2 {
        flags |= FLAG_CASTLING;
    }
    if moving.kind == PieceKind::Pawn
        && game_state.en_passant_square == Some(to)
        && from % 8 != to % 8
        && target.is_none()
    {
        captured_piece = Some(PieceKind::Pawn);
        flags |= FLAG_CAPTURE | FLAG_EN_PASSANT;
    }

    let last_rank = to / 8 == 0 || to / 8 == 7;
    let promotion_piece = match long_algebraic.as_bytes().get(4) {
        Some(&ch) => {
            if moving.kind != PieceKind::Pawn || !last_rank {
                return Err(notation_error("only a pawn reaching the last rank may promote"));
            }
            Some(char_to_promotion(char::from(ch)).ok_or_else(|| notation_error("invalid promotion piece"))?)
        }
        None => {
            if moving.kind == PieceKind::Pawn && last_rank {
                return Err(notation_error("missing promotion piece"));
            }
            None
        }
    };

    Ok(Move::new(
        from,
        to,
        moving.kind,
        captured_piece,
        promotion_piece,
        flags,
    ))
}

/// Decode `source ++ destination` and accept it only if it is legal here.
/// `destination` may carry a trailing promotion letter (`e8q`).
pub fn parse_legal_move<R: RulesEngine + ?Sized>(
    source: &str,
    destination: &str,
    rules: &R,
    game_state: &GameState,
) -> ChessResult<Move> {
    let text = format!("{}{}", source.trim(), destination.trim()).to_ascii_lowercase();
    let candidate = long_algebraic_to_move(&text, game_state)?;
    rules
        .legal_moves(game_state)?
        .into_iter()
        .find(|legal| *legal == candidate)
        .ok_or(ChessError::IllegalMove(text))
}

pub fn is_valid_move<R: RulesEngine + ?Sized>(
    source: &str,
    destination: &str,
    rules: &R,
    game_state: &GameState,
) -> bool {
    parse_legal_move(source, destination, rules, game_state).is_ok()
}

fn char_to_promotion(ch: char) -> Option<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Some(PieceKind::Knight),
        'b' => Some(PieceKind::Bishop),
        'r' => Some(PieceKind::Rook),
        'q' => Some(PieceKind::Queen),
        _ => None,
    }
}
