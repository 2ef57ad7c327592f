//! Crate root module declarations for the minimax chess player.
//!
//! The rules engine (`game_state`, `moves`, `move_generation`) is consumed
//! by the search core (`search`) only through `RulesEngine`; `session` wraps
//! both into a single human-vs-computer game.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod undo_state;
}

pub mod moves {
    pub mod attacks;
    pub mod move_descriptions;
}

pub mod move_generation {
    pub mod game_outcome;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod move_generator;
    pub mod perft;
    pub mod pseudo_legal;
}

pub mod search {
    pub mod board_scoring;
    pub mod eval_table;
    pub mod make_unmake;
    pub mod minimax;
    pub mod piece_square_tables;
    pub mod zobrist;
}

pub mod session {
    pub mod console;
    pub mod game_session;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod pgn;
    pub mod render_game_state;
}
