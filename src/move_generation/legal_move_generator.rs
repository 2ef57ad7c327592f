//! Full legal move generation pipeline.
//!
//! Generates pseudo-legal candidates, plays each on a scratch copy of the
//! board and keeps the ones that do not leave the mover's king in check.
//! The pseudo-legal enumeration order is preserved, except that a side in
//! check lists its king's moves first.

use crate::errors::ChessResult;
use crate::game_state::chess_types::PieceKind;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::pseudo_legal::generate_pseudo_legal_moves;
use crate::moves::move_descriptions::Move;

pub fn generate_legal_moves(game_state: &GameState) -> ChessResult<Vec<Move>> {
    let mut pseudo = Vec::with_capacity(64);
    generate_pseudo_legal_moves(game_state, &mut pseudo);

    let mover = game_state.side_to_move;
    if is_king_in_check(game_state, mover) {
        // Stable: the relative order inside each group is kept.
        pseudo.sort_by_key(|mv| mv.moved_piece() != Some(PieceKind::King));
    }

    let mut scratch = game_state.clone();
    let mut legal = Vec::with_capacity(pseudo.len());

    for mv in pseudo {
        scratch.make_move(mv)?;
        let keeps_king_safe = !is_king_in_check(&scratch, mover);
        scratch.unmake_move()?;

        if keeps_king_safe {
            legal.push(mv);
        }
    }

    Ok(legal)
}

/// Cheaper than `generate_legal_moves(..).is_empty()`: stops at the first hit.
pub fn has_legal_move(game_state: &GameState) -> ChessResult<bool> {
    let mut pseudo = Vec::with_capacity(64);
    generate_pseudo_legal_moves(game_state, &mut pseudo);

    let mover = game_state.side_to_move;
    let mut scratch = game_state.clone();

    for mv in pseudo {
        scratch.make_move(mv)?;
        let keeps_king_safe = !is_king_in_check(&scratch, mover);
        scratch.unmake_move()?;

        if keeps_king_safe {
            return Ok(true);
        }
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{generate_legal_moves, has_legal_move};
    use crate::game_state::game_state::GameState;

    #[test]
    fn startpos_has_twenty_legal_moves() {
        let game = GameState::new_game();
        let moves = generate_legal_moves(&game).expect("move generation should succeed");
        assert_eq!(moves.len(), 20);
        assert!(has_legal_move(&game).expect("probe should succeed"));
    }

    #[test]
    fn pinned_piece_cannot_leave_the_line() {
        // White knight on e2 is pinned by the rook on e8.
        let game = GameState::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        let moves = generate_legal_moves(&game).expect("move generation should succeed");
        assert!(moves.iter().all(|mv| mv.from() != 12));
    }

    #[test]
    fn king_moves_lead_when_in_check() {
        // The rook on h1 checks; the knight can only block on f1.
        let game = GameState::from_fen("4k3/8/8/8/8/4N3/8/4K2r w - - 0 1").expect("FEN should parse");
        let moves: Vec<String> = generate_legal_moves(&game)
            .expect("move generation should succeed")
            .iter()
            .map(|mv| mv.to_string())
            .collect();
        assert_eq!(moves, ["e1f2", "e1e2", "e1d2", "e3f1"]);
    }

    #[test]
    fn checkmated_side_has_no_moves() {
        let game = GameState::from_fen(
            "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3",
        )
        .expect("FEN should parse");
        assert!(generate_legal_moves(&game).expect("generation should succeed").is_empty());
        assert!(!has_legal_move(&game).expect("probe should succeed"));
    }
}
