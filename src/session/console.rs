//! Line-based front end over a `GameSession`.
//!
//! Reads one command per line and answers on the writer, either as text for a
//! terminal or as one JSON object per line for a driving program.

use std::io::{self, BufRead, Write};

use log::warn;
use serde::Serialize;

use crate::session::game_session::{GameSession, MoveResponse};

const HELP_TEXT: &str = "\
commands:
  board                       show the board
  move <src> <dst> [depth]    play a move, e.g. `move e2 e4` or `move e7 e8q 3`
  fen                         print the position as FEN
  pgn                         print the game so far as PGN
  new                         start over from the initial position
  help                        this text
  quit                        leave";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsoleOptions {
    pub json: bool,
}

#[derive(Serialize)]
struct ErrorLine<'a> {
    error: &'a str,
}

pub fn run_console<R: BufRead, W: Write>(
    session: &mut GameSession,
    input: R,
    out: &mut W,
    options: ConsoleOptions,
) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        let should_quit = handle_command(session, &line, out, options)?;
        out.flush()?;
        if should_quit {
            break;
        }
    }
    Ok(())
}

/// Returns `true` when the session should end.
pub fn handle_command<W: Write>(
    session: &mut GameSession,
    line: &str,
    out: &mut W,
    options: ConsoleOptions,
) -> io::Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(false);
    };

    match cmd.to_ascii_lowercase().as_str() {
        "board" => {
            let view = session.board_view();
            if options.json {
                write_json(out, &view)?;
            } else {
                writeln!(out, "{}", view.board)?;
            }
        }
        "move" => {
            let (Some(source), Some(destination)) = (parts.next(), parts.next()) else {
                return write_error(out, options, "usage: move <src> <dst> [depth]").map(|_| false);
            };
            let depth = match parts.next().map(str::parse::<u8>) {
                None => session.config().default_depth,
                Some(Ok(depth)) => depth,
                Some(Err(_)) => {
                    return write_error(out, options, "depth must be a number from 0 to 255").map(|_| false);
                }
            };
            match session.submit_move(source, destination, depth) {
                Ok(response) => write_move_response(out, options, &response)?,
                Err(err) => write_error(out, options, &err.to_string())?,
            }
        }
        "fen" => {
            let fen = session.fen();
            if options.json {
                write_json(out, &serde_json::json!({ "fen": fen }))?;
            } else {
                writeln!(out, "{fen}")?;
            }
        }
        "pgn" => match session.pgn() {
            Ok(pgn) if options.json => write_json(out, &serde_json::json!({ "pgn": pgn }))?,
            Ok(pgn) => write!(out, "{pgn}")?,
            Err(err) => write_error(out, options, &err.to_string())?,
        },
        "new" => {
            session.new_game();
            let view = session.board_view();
            if options.json {
                write_json(out, &view)?;
            } else {
                writeln!(out, "{}", view.board)?;
            }
        }
        "help" => {
            if options.json {
                write_json(out, &serde_json::json!({ "help": HELP_TEXT }))?;
            } else {
                writeln!(out, "{HELP_TEXT}")?;
            }
        }
        "quit" | "exit" => return Ok(true),
        other => {
            warn!("unknown command: {other}");
            write_error(out, options, &format!("unknown command: {other} (try `help`)"))?;
        }
    }

    Ok(false)
}

fn write_move_response<W: Write>(
    out: &mut W,
    options: ConsoleOptions,
    response: &MoveResponse,
) -> io::Result<()> {
    if options.json {
        return write_json(out, response);
    }

    if let Some(error) = &response.error {
        return writeln!(out, "{error}");
    }
    if let Some(mv) = &response.computer_move {
        writeln!(out, "computer plays {mv}")?;
    }
    if let Some(board) = &response.board {
        writeln!(out, "{board}")?;
    }
    if response.game_over {
        writeln!(out, "game over: {}", response.result.as_deref().unwrap_or("*"))?;
    }
    Ok(())
}

fn write_error<W: Write>(out: &mut W, options: ConsoleOptions, message: &str) -> io::Result<()> {
    if options.json {
        write_json(out, &ErrorLine { error: message })
    } else {
        writeln!(out, "error: {message}")
    }
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)
}
