//! One human-vs-computer game.
//!
//! `GameSession` owns the board for a single ongoing game and answers the
//! two requests a client makes: show the board, and play a move. A played
//! move is validated, applied, and (unless the game just ended) answered by
//! a minimax reply for the side now to move.

use std::thread;
use std::time::Duration;

use log::{info, warn};
use serde::Serialize;

use crate::errors::ChessResult;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::move_generation::move_generator::{RulesEngine, StandardRules};
use crate::moves::move_descriptions::Move;
use crate::search::board_scoring::{BoardScorer, PieceSquareScorer};
use crate::search::eval_table::EvalTable;
use crate::search::minimax::{minimax_search, SearchConfig, DEFAULT_SEARCH_DEPTH};
use crate::utils::long_algebraic::parse_legal_move;
use crate::utils::pgn::write_pgn;
use crate::utils::render_game_state::render_game_state;

pub const INVALID_MOVE_MESSAGE: &str = "Invalid move!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub default_depth: u8,
    /// Collect the eval table on every reply and log it.
    pub trace: bool,
    /// Pause before the computer answers.
    pub reply_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_depth: DEFAULT_SEARCH_DEPTH,
            trace: false,
            reply_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub board: String,
    pub fen: String,
}

/// Reply to a submitted move. Absent fields are left out of the JSON form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MoveResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub computer_move: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub game_over: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MoveResponse {
    fn invalid() -> Self {
        Self {
            error: Some(INVALID_MOVE_MESSAGE.to_owned()),
            ..Self::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

pub struct GameSession {
    board: GameState,
    initial_state: GameState,
    history: Vec<Move>,
    rules: Box<dyn RulesEngine>,
    scorer: Box<dyn BoardScorer>,
    config: SessionConfig,
    last_eval_table: Option<EvalTable>,
}

impl GameSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_engine(
            GameState::new_game(),
            Box::new(StandardRules),
            Box::new(PieceSquareScorer),
            config,
        )
    }

    pub fn from_fen(fen: &str, config: SessionConfig) -> ChessResult<Self> {
        Ok(Self::with_engine(
            GameState::from_fen(fen)?,
            Box::new(StandardRules),
            Box::new(PieceSquareScorer),
            config,
        ))
    }

    pub fn with_engine(
        board: GameState,
        rules: Box<dyn RulesEngine>,
        scorer: Box<dyn BoardScorer>,
        config: SessionConfig,
    ) -> Self {
        Self {
            initial_state: board.clone(),
            board,
            history: Vec::new(),
            rules,
            scorer,
            config,
            last_eval_table: None,
        }
    }

    /// Back to the position this session started from.
    pub fn new_game(&mut self) {
        info!("new game from {}", self.initial_state.get_fen());
        self.board = self.initial_state.clone();
        self.history.clear();
        self.last_eval_table = None;
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &GameState {
        &self.board
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn fen(&self) -> String {
        self.board.get_fen()
    }

    pub fn board_view(&self) -> BoardView {
        BoardView {
            board: render_game_state(&self.board),
            fen: self.board.get_fen(),
        }
    }

    pub fn pgn(&self) -> ChessResult<String> {
        let result = self.rules.result(&self.board)?;
        Ok(write_pgn(&self.initial_state, &self.history, result))
    }

    pub fn last_eval_table(&self) -> Option<&EvalTable> {
        self.last_eval_table.as_ref()
    }

    pub fn submit_move(
        &mut self,
        source: &str,
        destination: &str,
        depth: u8,
    ) -> ChessResult<MoveResponse> {
        let human_move = match parse_legal_move(source, destination, self.rules.as_ref(), &self.board) {
            Ok(mv) => mv,
            Err(err) => {
                warn!("rejected move {source}{destination}: {err}");
                return Ok(MoveResponse::invalid());
            }
        };

        self.play(human_move)?;
        info!("player {human_move}");

        if let Some(response) = self.game_over_response(None)? {
            return Ok(response);
        }

        if !self.config.reply_delay.is_zero() {
            thread::sleep(self.config.reply_delay);
        }

        // A zero-depth search never yields a move; the reply needs at least one ply.
        let search_config = SearchConfig {
            depth: depth.max(1),
            collect_eval_table: self.config.trace,
        };
        let maximizing = self.board.side_to_move == Color::White;
        let result = minimax_search(
            &mut self.board,
            self.rules.as_ref(),
            self.scorer.as_ref(),
            &search_config,
            maximizing,
        )?;

        if let Some(table) = &result.eval_table {
            info!("\n{}", table.render());
        }
        self.last_eval_table = result.eval_table;

        let computer_move = match result.best_move {
            Some(mv) => mv,
            None => {
                return Ok(MoveResponse {
                    board: Some(render_game_state(&self.board)),
                    ..MoveResponse::default()
                })
            }
        };

        self.play(computer_move)?;
        info!(
            "computer {computer_move} (score {}, {} nodes)",
            result.best_score, result.nodes
        );

        let reply = computer_move.to_string();
        if let Some(response) = self.game_over_response(Some(reply.clone()))? {
            return Ok(response);
        }

        Ok(MoveResponse {
            board: Some(render_game_state(&self.board)),
            computer_move: Some(reply),
            ..MoveResponse::default()
        })
    }

    fn play(&mut self, mv: Move) -> ChessResult<()> {
        self.rules.apply(&mut self.board, mv)?;
        self.history.push(mv);
        Ok(())
    }

    fn game_over_response(&self, computer_move: Option<String>) -> ChessResult<Option<MoveResponse>> {
        let Some(outcome) = self.rules.outcome(&self.board)? else {
            return Ok(None);
        };
        info!("game over: {outcome}");
        Ok(Some(MoveResponse {
            board: Some(render_game_state(&self.board)),
            computer_move,
            game_over: true,
            result: Some(outcome.result().to_owned()),
            error: None,
        }))
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{GameSession, SessionConfig, INVALID_MOVE_MESSAGE};
    use crate::game_state::chess_types::Color;

    fn session(fen: &str) -> GameSession {
        GameSession::from_fen(fen, SessionConfig::default()).expect("FEN should parse")
    }

    #[test]
    fn board_view_carries_diagram_and_fen() {
        let game = GameSession::default();
        let view = game.board_view();
        assert_eq!(view.fen, "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(view.board.lines().count(), 10);
    }

    #[test]
    fn illegal_move_is_rejected_without_mutation() {
        let mut game = GameSession::default();
        let before = game.board().clone();

        for (source, destination) in [("e2", "e5"), ("e7", "e5"), ("z9", "e4"), ("e2", "")] {
            let response = game.submit_move(source, destination, 2).expect("submit should run");
            assert_eq!(response.error.as_deref(), Some(INVALID_MOVE_MESSAGE));
            assert!(response.board.is_none());
            assert_eq!(*game.board(), before);
        }
        assert!(game.history().is_empty());
    }

    #[test]
    fn legal_move_gets_a_computer_reply() {
        let mut game = GameSession::default();
        let response = game.submit_move("e2", "e4", 2).expect("submit should run");

        assert!(!response.is_error());
        assert!(!response.game_over);
        assert!(response.computer_move.is_some());
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.board().side_to_move, Color::White);
        assert_eq!(response.board.as_deref(), Some(game.board_view().board.as_str()));
    }

    #[test]
    fn computer_playing_white_maximizes() {
        let mut game = session("4k3/8/8/3q4/8/8/3R4/4K3 b - - 0 1");
        let response = game.submit_move("e8", "e7", 1).expect("submit should run");
        assert_eq!(response.computer_move.as_deref(), Some("d2d5"));
    }

    #[test]
    fn mating_player_move_ends_the_game_without_a_reply() {
        let mut game = session("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2");
        let response = game.submit_move("d8", "h4", 3).expect("submit should run");
        assert!(response.game_over);
        assert_eq!(response.result.as_deref(), Some("0-1"));
        assert!(response.computer_move.is_none());
        assert_eq!(game.history().len(), 1);
    }

    #[test]
    fn computer_reply_can_end_the_game() {
        // Black's king takes the last rook: bare kings.
        let mut game = session("8/8/8/8/8/3R4/2k5/7K w - - 0 1");
        let response = game.submit_move("h1", "g1", 1).expect("submit should run");
        assert!(response.game_over);
        assert_eq!(response.computer_move.as_deref(), Some("c2d3"));
        assert_eq!(response.result.as_deref(), Some("1/2-1/2"));
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn zero_depth_request_still_gets_a_reply() {
        let mut game = GameSession::default();
        let response = game.submit_move("e2", "e4", 0).expect("submit should run");
        assert!(response.computer_move.is_some());
        assert_eq!(game.history().len(), 2);
        assert_eq!(game.board().side_to_move, Color::White);
    }

    #[test]
    fn trace_keeps_the_last_eval_table() {
        let config = SessionConfig {
            trace: true,
            ..SessionConfig::default()
        };
        let mut game = GameSession::new(config);
        game.submit_move("e2", "e4", 1).expect("submit should run");
        let table = game.last_eval_table().expect("table should be kept");
        // Twenty black replies, each a leaf plus a root record.
        assert_eq!(table.len(), 40);

        game.new_game();
        assert!(game.last_eval_table().is_none());
        assert!(game.history().is_empty());
    }

    #[test]
    fn pgn_lists_both_sides_moves() {
        let mut game = GameSession::default();
        game.submit_move("e2", "e4", 1).expect("submit should run");
        let pgn = game.pgn().expect("PGN should write");
        let reply = game.history()[1].to_string();
        assert!(pgn.contains(&format!("1. e2e4 {reply} *")));
    }

    #[test]
    fn responses_serialize_only_present_fields() {
        let mut game = GameSession::default();
        let invalid = game.submit_move("e2", "e5", 1).expect("submit should run");
        assert_eq!(
            serde_json::to_string(&invalid).expect("response should serialize"),
            r#"{"error":"Invalid move!"}"#
        );

        let played = game.submit_move("e2", "e4", 1).expect("submit should run");
        let json = serde_json::to_value(&played).expect("response should serialize");
        assert!(json.get("board").is_some());
        assert!(json.get("game_over").is_none());
        assert!(json.get("error").is_none());
    }
}
