//! Game-over detection.
//!
//! Checked in this order: checkmate, insufficient material, stalemate,
//! seventy-five-move rule, fivefold repetition. Only automatic endings are
//! reported; claimable draws (fifty moves, threefold) do not end the game.

use crate::errors::ChessResult;
use crate::game_state::chess_rules::{FIVEFOLD_REPETITION, SEVENTY_FIVE_MOVE_HALFMOVES};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::has_legal_move;
use crate::move_generation::move_generator::GameOutcome;

const LIGHT_SQUARES: u64 = 0x55AA_55AA_55AA_55AA;
const DARK_SQUARES: u64 = 0xAA55_AA55_AA55_AA55;

pub fn detect_outcome(game_state: &GameState) -> ChessResult<Option<GameOutcome>> {
    let side = game_state.side_to_move;
    let can_move = has_legal_move(game_state)?;

    if !can_move && is_king_in_check(game_state, side) {
        return Ok(Some(GameOutcome::Checkmate {
            winner: side.opposite(),
        }));
    }
    if is_insufficient_material(game_state) {
        return Ok(Some(GameOutcome::InsufficientMaterial));
    }
    if !can_move {
        return Ok(Some(GameOutcome::Stalemate));
    }
    if game_state.halfmove_clock >= SEVENTY_FIVE_MOVE_HALFMOVES {
        return Ok(Some(GameOutcome::SeventyFiveMoves));
    }
    if game_state.repetition_count() >= FIVEFOLD_REPETITION {
        return Ok(Some(GameOutcome::FivefoldRepetition));
    }

    Ok(None)
}

pub fn is_insufficient_material(game_state: &GameState) -> bool {
    side_has_insufficient_material(game_state, Color::White)
        && side_has_insufficient_material(game_state, Color::Black)
}

fn side_has_insufficient_material(game_state: &GameState, color: Color) -> bool {
    let ours = &game_state.pieces[color.index()];
    let theirs = &game_state.pieces[color.opposite().index()];
    let both = |kind: PieceKind| ours[kind.index()] | theirs[kind.index()];

    if ours[PieceKind::Pawn.index()] | ours[PieceKind::Rook.index()] | ours[PieceKind::Queen.index()] != 0 {
        return false;
    }

    if ours[PieceKind::Knight.index()] != 0 {
        // King and one knight, against at most king and queens.
        let their_minor_or_better = game_state.occupancy_by_color[color.opposite().index()]
            & !theirs[PieceKind::King.index()]
            & !theirs[PieceKind::Queen.index()];
        return game_state.occupancy_by_color[color.index()].count_ones() <= 2
            && their_minor_or_better == 0;
    }

    if ours[PieceKind::Bishop.index()] != 0 {
        let bishops = both(PieceKind::Bishop);
        let same_square_color = bishops & DARK_SQUARES == 0 || bishops & LIGHT_SQUARES == 0;
        return same_square_color && both(PieceKind::Pawn) == 0 && both(PieceKind::Knight) == 0;
    }

    true
}
