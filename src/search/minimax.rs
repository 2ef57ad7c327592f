//! Fixed-depth minimax over the rules engine.
//!
//! Plain minimax without pruning. White is always the maximizer; the caller
//! passes `maximizing` to match the side to move. Children are visited in
//! the rules engine's enumeration order and a later move must score strictly
//! better to replace the current best, so the first of equally scored moves
//! wins. The board is mutated in place and restored before returning.

use log::{debug, trace};

use crate::errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::RulesEngine;
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::BoardScorer;
use crate::search::eval_table::EvalTable;
use crate::search::make_unmake::AppliedMove;

pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u8,
    /// Record every score into an `EvalTable`. Grows with the whole tree.
    pub collect_eval_table: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_SEARCH_DEPTH,
            collect_eval_table: false,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u8) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_score: i32,
    /// `None` when the root itself is a leaf.
    pub best_move: Option<Move>,
    pub nodes: u64,
    pub eval_table: Option<EvalTable>,
}

pub fn minimax_search<R, S>(
    board: &mut GameState,
    rules: &R,
    scorer: &S,
    config: &SearchConfig,
    maximizing: bool,
) -> ChessResult<SearchResult>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    let mut searcher = Searcher {
        rules,
        scorer,
        nodes: 0,
        eval_table: config.collect_eval_table.then(EvalTable::new),
    };

    let (best_score, best_move) = searcher.minimax(board, config.depth, maximizing)?;

    debug!(
        "minimax depth={} maximizing={} best={} score={} nodes={}",
        config.depth,
        maximizing,
        best_move.map_or_else(|| "none".to_owned(), |mv| mv.to_string()),
        best_score,
        searcher.nodes
    );
    if let Some(table) = &searcher.eval_table {
        trace!("\n{}", table.render());
    }

    Ok(SearchResult {
        best_score,
        best_move,
        nodes: searcher.nodes,
        eval_table: searcher.eval_table,
    })
}

/// `(score, move)` without the bookkeeping of `minimax_search`.
pub fn search<R, S>(
    board: &mut GameState,
    rules: &R,
    scorer: &S,
    depth: u8,
    maximizing: bool,
) -> ChessResult<(i32, Option<Move>)>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    let result = minimax_search(board, rules, scorer, &SearchConfig::with_depth(depth), maximizing)?;
    Ok((result.best_score, result.best_move))
}

struct Searcher<'a, R: ?Sized, S: ?Sized> {
    rules: &'a R,
    scorer: &'a S,
    nodes: u64,
    eval_table: Option<EvalTable>,
}

impl<R, S> Searcher<'_, R, S>
where
    R: RulesEngine + ?Sized,
    S: BoardScorer + ?Sized,
{
    fn minimax(
        &mut self,
        board: &mut GameState,
        depth: u8,
        maximizing: bool,
    ) -> ChessResult<(i32, Option<Move>)> {
        self.nodes += 1;

        if depth == 0 || self.rules.is_game_over(board)? {
            return Ok(self.leaf(board, depth, maximizing));
        }

        let moves = self.rules.legal_moves(board)?;
        if moves.is_empty() {
            return Ok(self.leaf(board, depth, maximizing));
        }

        let mut best_score = if maximizing { i32::MIN } else { i32::MAX };
        let mut best_move = None;

        for mv in moves {
            let mut applied = AppliedMove::apply(self.rules, board, mv)?;
            let (score, _) = self.minimax(applied.board(), depth - 1, !maximizing)?;
            applied.finish()?;

            let improves = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if improves {
                best_score = score;
                best_move = Some(mv);
            }

            if let Some(table) = self.eval_table.as_mut() {
                table.push(depth, maximizing, Some(mv), score);
            }
        }

        Ok((best_score, best_move))
    }

    fn leaf(&mut self, board: &GameState, depth: u8, maximizing: bool) -> (i32, Option<Move>) {
        let score = self.scorer.score(board);
        if let Some(table) = self.eval_table.as_mut() {
            table.push(depth, maximizing, None, score);
        }
        (score, None)
    }
}

#[cfg(test)]
mod tests {
    use super::{minimax_search, search, SearchConfig};
    use crate::game_state::game_state::GameState;
    use crate::move_generation::move_generator::{RulesEngine, StandardRules};
    use crate::search::board_scoring::{evaluate, BoardScorer, PieceSquareScorer};

    struct ConstantScorer;

    impl BoardScorer for ConstantScorer {
        fn score(&self, _game_state: &GameState) -> i32 {
            7
        }
    }

    fn board(fen: &str) -> GameState {
        GameState::from_fen(fen).expect("FEN should parse")
    }

    #[test]
    fn depth_zero_is_a_static_evaluation() {
        let mut game = GameState::new_game();
        for maximizing in [true, false] {
            let (score, mv) = search(&mut game, &StandardRules, &PieceSquareScorer, 0, maximizing)
                .expect("search should run");
            assert_eq!(score, evaluate(&game));
            assert_eq!(mv, None);
        }
    }

    #[test]
    fn search_is_deterministic() {
        let mut game = GameState::new_game();
        let first = search(&mut game, &StandardRules, &PieceSquareScorer, 2, true).expect("search");
        let second = search(&mut game, &StandardRules, &PieceSquareScorer, 2, true).expect("search");
        assert_eq!(first, second);
        assert!(first.1.is_some());
    }

    #[test]
    fn search_leaves_board_unchanged() {
        let mut game = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let before = game.clone();
        search(&mut game, &StandardRules, &PieceSquareScorer, 2, true).expect("search should run");
        assert_eq!(game, before);
        assert_eq!(game.get_fen(), before.get_fen());
    }

    #[test]
    fn depth_one_picks_first_best_opening_move() {
        let mut game = GameState::new_game();
        let rules = StandardRules;

        let mut expected = None;
        let mut best = i32::MIN;
        for mv in rules.legal_moves(&game).expect("moves should generate") {
            rules.apply(&mut game, mv).expect("apply");
            let score = evaluate(&game);
            rules.undo(&mut game).expect("undo");
            if score > best {
                best = score;
                expected = Some(mv);
            }
        }

        let (score, mv) = search(&mut game, &rules, &PieceSquareScorer, 1, true).expect("search");
        assert_eq!(score, best);
        assert_eq!(mv, expected);
        // Nf3 and Nc3 both gain 50 on the knight table; g1 is enumerated first.
        assert_eq!(mv.map(|mv| mv.to_string()).as_deref(), Some("g1f3"));
    }

    #[test]
    fn equal_scores_keep_the_first_enumerated_move() {
        // Kf2, Ke2 and Kd2 each gain 30 on the endgame king table; Kf2 comes first.
        let mut game = board("4k3/p6p/8/8/8/8/P6P/4K3 w - - 0 1");
        let (_, mv) = search(&mut game, &StandardRules, &PieceSquareScorer, 1, true).expect("search");
        assert_eq!(mv.map(|mv| mv.to_string()).as_deref(), Some("e1f2"));
    }

    #[test]
    fn constant_scores_keep_the_first_legal_move() {
        let mut game = GameState::new_game();
        let first = StandardRules.legal_moves(&game).expect("moves should generate")[0];
        for maximizing in [true, false] {
            let (score, mv) =
                search(&mut game, &StandardRules, &ConstantScorer, 2, maximizing).expect("search");
            assert_eq!(score, 7);
            assert_eq!(mv, Some(first));
        }
    }

    #[test]
    fn checkmated_root_is_a_leaf() {
        let mut game = board("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        let config = SearchConfig {
            depth: 3,
            collect_eval_table: true,
        };
        let result = minimax_search(&mut game, &StandardRules, &PieceSquareScorer, &config, true)
            .expect("search should run");
        assert_eq!(result.best_score, evaluate(&game));
        assert_eq!(result.best_move, None);
        assert_eq!(result.nodes, 1);
        let table = result.eval_table.expect("table should be collected");
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].depth, 3);
    }

    #[test]
    fn hanging_queen_is_taken_by_either_side() {
        let mut white = board("4k3/8/8/3q4/8/8/3R4/4K3 w - - 0 1");
        let (_, mv) = search(&mut white, &StandardRules, &PieceSquareScorer, 2, true).expect("search");
        assert_eq!(mv.map(|mv| mv.to_string()).as_deref(), Some("d2d5"));

        let mut black = board("4k3/8/8/3Q4/8/8/3r4/4K3 b - - 0 1");
        let (_, mv) = search(&mut black, &StandardRules, &PieceSquareScorer, 2, false).expect("search");
        assert_eq!(mv.map(|mv| mv.to_string()).as_deref(), Some("d2d5"));
    }

    #[test]
    fn eval_table_records_leaves_and_children() {
        let mut game = GameState::new_game();
        let config = SearchConfig {
            depth: 1,
            collect_eval_table: true,
        };
        let result = minimax_search(&mut game, &StandardRules, &PieceSquareScorer, &config, true)
            .expect("search should run");
        let table = result.eval_table.expect("table should be collected");
        assert_eq!(result.nodes, 21);
        assert_eq!(table.len(), 40);
        assert_eq!(table.records().iter().filter(|r| r.mv.is_none()).count(), 20);

        let without = minimax_search(&mut game, &StandardRules, &PieceSquareScorer, &SearchConfig::with_depth(1), true)
            .expect("search should run");
        assert!(without.eval_table.is_none());
        assert_eq!(without.best_move, result.best_move);
    }
}
