//! PGN export for game records.
//!
//! Movetext uses long algebraic notation (`1. e2e4 e7e5`), the same form the
//! session accepts as input.

use std::collections::BTreeMap;

use chrono::Local;

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::Move;

/// Seven-tag roster dated today, plus `SetUp`/`FEN` for non-standard starts.
pub fn default_headers(initial_state: &GameState, result: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::<String, String>::new();
    headers.insert("Event".to_owned(), "Human vs Computer".to_owned());
    headers.insert("Site".to_owned(), "Local".to_owned());
    headers.insert("Date".to_owned(), Local::now().format("%Y.%m.%d").to_string());
    headers.insert("Round".to_owned(), "-".to_owned());
    headers.insert("White".to_owned(), "White".to_owned());
    headers.insert("Black".to_owned(), "Black".to_owned());
    headers.insert("Result".to_owned(), normalize_result(result).to_owned());

    let initial_fen = initial_state.get_fen();
    if initial_fen != STARTING_POSITION_FEN {
        headers.insert("SetUp".to_owned(), "1".to_owned());
        headers.insert("FEN".to_owned(), initial_fen);
    }
    headers
}

pub fn write_pgn(initial_state: &GameState, moves: &[Move], result: &str) -> String {
    write_pgn_with_headers(initial_state, moves, &default_headers(initial_state, result))
}

pub fn write_pgn_with_headers(
    initial_state: &GameState,
    moves: &[Move],
    headers: &BTreeMap<String, String>,
) -> String {
    let mut out = String::new();

    for (key, value) in headers {
        out.push_str(&format!("[{} \"{}\"]\n", key, escape_pgn_value(value)));
    }
    out.push('\n');

    // Numbering follows the real move counter, so a Black-to-move start
    // opens with "N...".
    let mut number = initial_state.fullmove_number;
    let mut black_to_move = initial_state.side_to_move == Color::Black;
    let mut parts = Vec::<String>::with_capacity(moves.len() + 1);
    for (idx, mv) in moves.iter().enumerate() {
        if !black_to_move {
            parts.push(format!("{number}. {mv}"));
        } else if idx == 0 {
            parts.push(format!("{number}... {mv}"));
        } else {
            parts.push(mv.to_string());
        }
        if black_to_move {
            number += 1;
        }
        black_to_move = !black_to_move;
    }

    let result = headers.get("Result").map_or("*", |x| normalize_result(x));
    parts.push(result.to_owned());
    out.push_str(&parts.join(" "));
    out.push('\n');

    out
}

fn is_result_token(token: &str) -> bool {
    matches!(token, "1-0" | "0-1" | "1/2-1/2" | "*")
}

fn normalize_result(result: &str) -> &str {
    if is_result_token(result) {
        result
    } else {
        "*"
    }
}

fn escape_pgn_value(value: &str) -> String {
    value.replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::{default_headers, write_pgn, write_pgn_with_headers};
    use std::collections::BTreeMap;

    use crate::game_state::game_state::GameState;
    use crate::moves::move_descriptions::Move;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    fn play(game: &mut GameState, lans: &[&str]) -> Vec<Move> {
        lans.iter()
            .map(|lan| {
                let mv = long_algebraic_to_move(lan, game).expect("LAN should parse");
                game.make_move(mv).expect("move should apply");
                mv
            })
            .collect()
    }

    #[test]
    fn start_position_history_is_numbered_by_pairs() {
        let mut game = GameState::new_game();
        let history = play(&mut game, &["e2e4", "e7e5", "g1f3", "b8c6", "f1c4"]);

        let pgn = write_pgn(&GameState::new_game(), &history, "*");
        assert!(pgn.starts_with("[Black \"Black\"]\n"));
        assert!(pgn.ends_with("\n\n1. e2e4 e7e5 2. g1f3 b8c6 3. f1c4 *\n"));
        assert!(!pgn.contains("[FEN"));
        assert!(!pgn.contains("[SetUp"));
    }

    #[test]
    fn date_header_uses_dotted_format() {
        let headers = default_headers(&GameState::new_game(), "1-0");
        let date = &headers["Date"];
        assert_eq!(date.len(), 10);
        assert_eq!(date.matches('.').count(), 2);
        assert_eq!(headers["Result"], "1-0");
    }

    #[test]
    fn unknown_result_becomes_an_asterisk() {
        let headers = default_headers(&GameState::new_game(), "white resigned");
        assert_eq!(headers["Result"], "*");
        let pgn = write_pgn(&GameState::new_game(), &[], "white resigned");
        assert!(pgn.ends_with("\n\n*\n"));
    }

    #[test]
    fn custom_start_records_setup_and_black_numbering() {
        let initial =
            GameState::from_fen("4k3/4p3/8/8/8/8/4P3/4K3 b - - 0 7").expect("FEN should parse");
        let headers = default_headers(&initial, "*");
        assert_eq!(headers["SetUp"], "1");
        assert_eq!(headers["FEN"], initial.get_fen());

        let mut game = initial.clone();
        let history = play(&mut game, &["e7e5", "e2e4", "e8e7"]);

        let mut headers = BTreeMap::<String, String>::new();
        headers.insert("Result".to_owned(), "1/2-1/2".to_owned());
        headers.insert("Event".to_owned(), "say \"hi\"".to_owned());

        let pgn = write_pgn_with_headers(&initial, &history, &headers);
        assert!(pgn.contains("[Event \"say \\\"hi\\\"\"]"));
        assert!(pgn.contains("7... e7e5 8. e2e4 e8e7 1/2-1/2"));
    }
}
