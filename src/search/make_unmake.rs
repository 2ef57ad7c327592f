//! Scoped make/unmake for search.
//!
//! `AppliedMove` plays a move on construction and takes it back when it goes
//! out of scope, so an early `?` return still leaves the board restored.

use log::error;

use crate::errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::RulesEngine;
use crate::moves::move_descriptions::Move;

pub struct AppliedMove<'a, R: RulesEngine + ?Sized> {
    rules: &'a R,
    board: &'a mut GameState,
    mv: Move,
    undone: bool,
}

impl<'a, R: RulesEngine + ?Sized> AppliedMove<'a, R> {
    pub fn apply(rules: &'a R, board: &'a mut GameState, mv: Move) -> ChessResult<Self> {
        rules.apply(board, mv)?;
        Ok(Self {
            rules,
            board,
            mv,
            undone: false,
        })
    }

    /// The position after the move.
    pub fn board(&mut self) -> &mut GameState {
        self.board
    }

    pub fn mv(&self) -> Move {
        self.mv
    }

    /// Undo now and surface the error instead of logging it from `drop`.
    pub fn finish(mut self) -> ChessResult<()> {
        self.undone = true;
        self.rules.undo(self.board).map(|_| ())
    }
}

impl<R: RulesEngine + ?Sized> Drop for AppliedMove<'_, R> {
    fn drop(&mut self) {
        if self.undone {
            return;
        }
        if let Err(err) = self.rules.undo(self.board) {
            error!("failed to undo {} while unwinding search: {err}", self.mv);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppliedMove;
    use crate::errors::{ChessError, ChessResult};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::move_generator::{RulesEngine, StandardRules};

    #[test]
    fn drop_restores_the_board() {
        let mut board = GameState::new_game();
        let before = board.clone();
        let mv = StandardRules.legal_moves(&board).expect("moves should generate")[0];
        {
            let mut applied = AppliedMove::apply(&StandardRules, &mut board, mv).expect("apply");
            assert_ne!(*applied.board(), before);
            assert_eq!(applied.mv(), mv);
        }
        assert_eq!(board, before);
    }

    #[test]
    fn early_return_still_restores_the_board() {
        fn fails_midway(board: &mut GameState) -> ChessResult<()> {
            let mv = StandardRules.legal_moves(board)?[0];
            let _applied = AppliedMove::apply(&StandardRules, board, mv)?;
            Err(ChessError::IllegalMove("simulated".to_owned()))
        }

        let mut board = GameState::new_game();
        let before = board.clone();
        assert!(fails_midway(&mut board).is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn finish_undoes_exactly_once() {
        let mut board = GameState::new_game();
        let before = board.clone();
        let mv = StandardRules.legal_moves(&board).expect("moves should generate")[0];
        let applied = AppliedMove::apply(&StandardRules, &mut board, mv).expect("apply");
        applied.finish().expect("undo should succeed");
        assert_eq!(board, before);
    }
}
