//! Perft node counting over the `RulesEngine` apply/undo protocol.
//!
//! Used to verify the rules engine against published reference counts.

use crate::errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::move_generator::RulesEngine;
use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft<R: RulesEngine + ?Sized>(
    rules: &R,
    game_state: &GameState,
    depth: u8,
) -> ChessResult<PerftCounts> {
    let mut board = game_state.clone();
    let mut counts = PerftCounts::default();

    if depth == 0 {
        counts.nodes = 1;
        return Ok(counts);
    }

    perft_recurse(rules, &mut board, depth, &mut counts)?;
    Ok(counts)
}

/// Per-root-move node counts, in enumeration order.
pub fn perft_divide<R: RulesEngine + ?Sized>(
    rules: &R,
    game_state: &GameState,
    depth: u8,
) -> ChessResult<Vec<(Move, usize)>> {
    if depth == 0 {
        return Ok(Vec::new());
    }

    let mut board = game_state.clone();
    let mut split = Vec::new();

    for mv in rules.legal_moves(&board)? {
        let mut counts = PerftCounts::default();
        rules.apply(&mut board, mv)?;
        let result = if depth == 1 {
            tally_leaf(rules, &board, mv, &mut counts)
        } else {
            perft_recurse(rules, &mut board, depth - 1, &mut counts)
        };
        rules.undo(&mut board)?;
        result?;
        split.push((mv, counts.nodes));
    }

    Ok(split)
}

fn perft_recurse<R: RulesEngine + ?Sized>(
    rules: &R,
    board: &mut GameState,
    depth: u8,
    counts: &mut PerftCounts,
) -> ChessResult<()> {
    for mv in rules.legal_moves(board)? {
        rules.apply(board, mv)?;
        let mut local = PerftCounts::default();
        let result = if depth == 1 {
            tally_leaf(rules, board, mv, &mut local)
        } else {
            perft_recurse(rules, board, depth - 1, &mut local)
        };
        rules.undo(board)?;
        result?;
        counts.merge(local);
    }

    Ok(())
}

/// Counts one leaf reached by `mv`; `board` is the position after it.
fn tally_leaf<R: RulesEngine + ?Sized>(
    rules: &R,
    board: &GameState,
    mv: Move,
    counts: &mut PerftCounts,
) -> ChessResult<()> {
    counts.nodes += 1;

    if mv.is_capture() {
        counts.captures += 1;
    }
    if mv.is_en_passant() {
        counts.en_passant += 1;
    }
    if mv.is_castling() {
        counts.castles += 1;
    }
    if mv.promotion().is_some() {
        counts.promotions += 1;
    }
    if is_king_in_check(board, board.side_to_move) {
        counts.checks += 1;
        if rules.legal_moves(board)?.is_empty() {
            counts.checkmates += 1;
        }
    }

    Ok(())
}
