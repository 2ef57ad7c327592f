//! The rules-engine seam consumed by search and the session layer.
//!
//! Search never looks inside move generation: it enumerates, applies and
//! undoes moves and asks whether the game is over, all through
//! `RulesEngine`. `StandardRules` is the orthodox chess implementation.

use std::fmt;

use crate::errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::game_state::chess_types::Color;
use crate::move_generation::game_outcome::detect_outcome;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::move_descriptions::Move;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    SeventyFiveMoves,
    FivefoldRepetition,
}

impl GameOutcome {
    /// PGN-style result string.
    pub const fn result(self) -> &'static str {
        match self {
            GameOutcome::Checkmate { winner: Color::White } => "1-0",
            GameOutcome::Checkmate { winner: Color::Black } => "0-1",
            _ => "1/2-1/2",
        }
    }

    pub const fn winner(self) -> Option<Color> {
        match self {
            GameOutcome::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            GameOutcome::Checkmate { .. } => "checkmate",
            GameOutcome::Stalemate => "stalemate",
            GameOutcome::InsufficientMaterial => "insufficient material",
            GameOutcome::SeventyFiveMoves => "seventy-five-move rule",
            GameOutcome::FivefoldRepetition => "fivefold repetition",
        };
        write!(f, "{} ({reason})", self.result())
    }
}

pub trait RulesEngine: Send + Sync {
    /// All legal moves for the side to move, in a stable enumeration order.
    fn legal_moves(&self, board: &GameState) -> ChessResult<Vec<Move>>;

    fn apply(&self, board: &mut GameState, mv: Move) -> ChessResult<()>;

    /// Exact inverse of the most recent `apply`.
    fn undo(&self, board: &mut GameState) -> ChessResult<Move>;

    fn outcome(&self, board: &GameState) -> ChessResult<Option<GameOutcome>>;

    fn is_game_over(&self, board: &GameState) -> ChessResult<bool> {
        Ok(self.outcome(board)?.is_some())
    }

    /// "1-0", "0-1", "1/2-1/2", or "*" while the game is still running.
    fn result(&self, board: &GameState) -> ChessResult<&'static str> {
        Ok(self.outcome(board)?.map_or("*", GameOutcome::result))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl RulesEngine for StandardRules {
    fn legal_moves(&self, board: &GameState) -> ChessResult<Vec<Move>> {
        generate_legal_moves(board)
    }

    fn apply(&self, board: &mut GameState, mv: Move) -> ChessResult<()> {
        board.make_move(mv)
    }

    fn undo(&self, board: &mut GameState) -> ChessResult<Move> {
        board.unmake_move()
    }

    fn outcome(&self, board: &GameState) -> ChessResult<Option<GameOutcome>> {
        detect_outcome(board)
    }
}

#[cfg(test)]
mod tests {
    use super::{GameOutcome, RulesEngine, StandardRules};
    use crate::game_state::chess_types::Color;
    use crate::game_state::game_state::GameState;

    #[test]
    fn starting_position_is_running() {
        let game = GameState::new_game();
        let rules = StandardRules;
        assert!(!rules.is_game_over(&game).expect("outcome should compute"));
        assert_eq!(rules.result(&game).expect("result should compute"), "*");
    }

    #[test]
    fn apply_then_undo_round_trips_through_the_trait() {
        let mut game = GameState::new_game();
        let before = game.clone();
        let rules = StandardRules;
        let moves = rules.legal_moves(&game).expect("moves should generate");

        rules.apply(&mut game, moves[0]).expect("move should apply");
        let undone = rules.undo(&mut game).expect("undo should succeed");

        assert_eq!(undone, moves[0]);
        assert_eq!(game, before);
    }

    #[test]
    fn outcome_result_strings() {
        assert_eq!(GameOutcome::Checkmate { winner: Color::White }.result(), "1-0");
        assert_eq!(GameOutcome::Checkmate { winner: Color::Black }.result(), "0-1");
        assert_eq!(GameOutcome::Stalemate.result(), "1/2-1/2");
        assert_eq!(
            GameOutcome::Checkmate { winner: Color::Black }.to_string(),
            "0-1 (checkmate)"
        );
    }
}
