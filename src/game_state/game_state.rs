//! Core incremental board state representation.
//!
//! `GameState` is the single mutable board of a game. It stores piece
//! bitboards, occupancy caches, turn/state flags, clocks, the repetition
//! history and the undo stack used by in-place `make_move`/`unmake_move`.
//! After any balanced sequence of makes and unmakes the state compares equal
//! to where it started.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    pub zobrist_key: u64,

    pub ply: u16,
    /// Zobrist keys of every position reached, current one last.
    pub repetition_history: Vec<u64>,

    pub undo_stack: Vec<UndoState>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            zobrist_key: 0,

            ply: 0,
            repetition_history: Vec::new(),
            undo_stack: Vec::new(),
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    pub fn new_game() -> Self {
        // The built-in starting FEN is well formed; fall back to an empty
        // board rather than panicking if that ever stops being true.
        parse_fen(STARTING_POSITION_FEN).unwrap_or_else(|err| {
            log::error!("starting position failed to parse: {err}");
            Self::new_empty()
        })
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in [Color::White, Color::Black] {
            for kind in PieceKind::ALL {
                if self.pieces[color.index()][kind.index()] & mask != 0 {
                    return Some(Piece::new(kind, color));
                }
            }
        }
        None
    }

    #[inline]
    pub fn count(&self, color: Color, kind: PieceKind) -> u32 {
        self.pieces[color.index()][kind.index()].count_ones()
    }

    /// Total of one piece kind across both colors.
    #[inline]
    pub fn count_both(&self, kind: PieceKind) -> u32 {
        self.count(Color::White, kind) + self.count(Color::Black, kind)
    }

    /// Recompute occupancy caches, the Zobrist key and seed the repetition
    /// history. Called once after a position is built from scratch.
    pub fn refresh_derived_state(&mut self) {
        self.recalc_occupancy();
        self.zobrist_key = compute_zobrist_key(self);
        self.repetition_history.clear();
        self.repetition_history.push(self.zobrist_key);
    }

    /// How many times the current position has occurred, this one included.
    pub fn repetition_count(&self) -> usize {
        self.repetition_history
            .iter()
            .filter(|&&key| key == self.zobrist_key)
            .count()
    }

    /// Apply `mv` in place, pushing the information needed to reverse it.
    pub fn make_move(&mut self, mv: Move) -> ChessResult<()> {
        let from = mv.from();
        let to = mv.to();
        let mover = self.side_to_move;
        let enemy = mover.opposite();

        let moved_piece = self
            .piece_of(mover, from)
            .ok_or(ChessError::NoPieceOnSquare(from))?;

        let (captured_piece, capture_square) = if mv.is_en_passant() {
            (Some(PieceKind::Pawn), en_passant_victim_square(mover, to))
        } else {
            (self.piece_of(enemy, to), to)
        };

        self.undo_stack.push(UndoState {
            mv,
            moved_piece,
            captured_piece,
            prev_castling_rights: self.castling_rights,
            prev_en_passant_square: self.en_passant_square,
            prev_halfmove_clock: self.halfmove_clock,
            prev_fullmove_number: self.fullmove_number,
            prev_zobrist_key: self.zobrist_key,
        });

        if let Some(captured) = captured_piece {
            self.pieces[enemy.index()][captured.index()] &= !(1u64 << capture_square);
        }

        let placed = mv.promotion().unwrap_or(moved_piece);
        self.pieces[mover.index()][moved_piece.index()] &= !(1u64 << from);
        self.pieces[mover.index()][placed.index()] |= 1u64 << to;

        if mv.is_castling() && moved_piece == PieceKind::King {
            if let Some((rook_from, rook_to)) = castling_rook_squares(to) {
                self.relocate(mover, PieceKind::Rook, rook_from, rook_to);
            }
        }

        self.update_castling_rights(mover, from, to, moved_piece);

        self.en_passant_square = if mv.is_double_pawn_push() {
            Some((from + to) / 2)
        } else {
            None
        };

        if moved_piece == PieceKind::Pawn || captured_piece.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if mover == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        self.side_to_move = enemy;
        self.ply = self.ply.saturating_add(1);
        self.recalc_occupancy();
        self.zobrist_key = compute_zobrist_key(self);
        self.repetition_history.push(self.zobrist_key);

        Ok(())
    }

    /// Reverse the most recent `make_move`, returning the move taken back.
    pub fn unmake_move(&mut self) -> ChessResult<Move> {
        let undo = self.undo_stack.pop().ok_or(ChessError::NothingToUndo)?;
        let mv = undo.mv;
        let from = mv.from();
        let to = mv.to();
        let mover = self.side_to_move.opposite();
        let enemy = self.side_to_move;

        let placed = mv.promotion().unwrap_or(undo.moved_piece);
        self.pieces[mover.index()][placed.index()] &= !(1u64 << to);
        self.pieces[mover.index()][undo.moved_piece.index()] |= 1u64 << from;

        if let Some(captured) = undo.captured_piece {
            let capture_square = if mv.is_en_passant() {
                en_passant_victim_square(mover, to)
            } else {
                to
            };
            self.pieces[enemy.index()][captured.index()] |= 1u64 << capture_square;
        }

        if mv.is_castling() && undo.moved_piece == PieceKind::King {
            if let Some((rook_from, rook_to)) = castling_rook_squares(to) {
                self.relocate(mover, PieceKind::Rook, rook_to, rook_from);
            }
        }

        self.side_to_move = mover;
        self.castling_rights = undo.prev_castling_rights;
        self.en_passant_square = undo.prev_en_passant_square;
        self.halfmove_clock = undo.prev_halfmove_clock;
        self.fullmove_number = undo.prev_fullmove_number;
        self.zobrist_key = undo.prev_zobrist_key;
        self.ply = self.ply.saturating_sub(1);
        self.repetition_history.pop();
        self.recalc_occupancy();

        Ok(mv)
    }

    fn piece_of(&self, color: Color, square: Square) -> Option<PieceKind> {
        let mask = 1u64 << square;
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.pieces[color.index()][kind.index()] & mask != 0)
    }

    fn relocate(&mut self, color: Color, kind: PieceKind, from: Square, to: Square) {
        let board = &mut self.pieces[color.index()][kind.index()];
        *board &= !(1u64 << from);
        *board |= 1u64 << to;
    }

    fn update_castling_rights(
        &mut self,
        mover: Color,
        from: Square,
        to: Square,
        moved_piece: PieceKind,
    ) {
        if moved_piece == PieceKind::King {
            self.castling_rights &= match mover {
                Color::White => !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE),
                Color::Black => !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE),
            };
        }

        // A rook leaving or being captured on its home square loses the right.
        for square in [from, to] {
            self.castling_rights &= match square {
                0 => !CASTLE_WHITE_QUEENSIDE,
                7 => !CASTLE_WHITE_KINGSIDE,
                56 => !CASTLE_BLACK_QUEENSIDE,
                63 => !CASTLE_BLACK_KINGSIDE,
                _ => !0,
            };
        }
    }

    pub(crate) fn recalc_occupancy(&mut self) {
        for color in [Color::White, Color::Black] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::White.index()]
            | self.occupancy_by_color[Color::Black.index()];
    }
}

/// Square of the pawn removed by an en-passant capture landing on `to`.
#[inline]
fn en_passant_victim_square(mover: Color, to: Square) -> Square {
    match mover {
        Color::White => to.wrapping_sub(8),
        Color::Black => to.wrapping_add(8),
    }
}

/// Rook origin and destination for a king castling onto `king_to`.
#[inline]
fn castling_rook_squares(king_to: Square) -> Option<(Square, Square)> {
    match king_to {
        6 => Some((7, 5)),
        2 => Some((0, 3)),
        62 => Some((63, 61)),
        58 => Some((56, 59)),
        _ => None,
    }
}
