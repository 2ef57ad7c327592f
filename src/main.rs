use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use minimax_chess::search::minimax::DEFAULT_SEARCH_DEPTH;
use minimax_chess::session::console::{run_console, ConsoleOptions};
use minimax_chess::session::game_session::{GameSession, SessionConfig};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play chess against a fixed-depth minimax engine", long_about = None)]
struct Args {
    /// Search depth in plies when a move command gives none
    #[arg(long, default_value_t = DEFAULT_SEARCH_DEPTH)]
    depth: u8,

    /// Start from this position instead of the standard one
    #[arg(long)]
    fen: Option<String>,

    /// Collect and log the evaluation table for every computer move
    #[arg(long)]
    trace: bool,

    /// Answer each command with one JSON object per line
    #[arg(long)]
    json: bool,

    /// Pause before the computer replies, in milliseconds
    #[arg(long, default_value_t = 0)]
    reply_delay_ms: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(args) {
        log::error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(args: &Args) {
    let log_level = if args.debug { "debug" } else { "info" };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, log_level),
    );
    builder
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Stderr)
        .init();
}

fn run(args: Args) -> Result<()> {
    let config = SessionConfig {
        default_depth: args.depth,
        trace: args.trace,
        reply_delay: Duration::from_millis(args.reply_delay_ms),
    };
    let mut session = match &args.fen {
        Some(fen) => GameSession::from_fen(fen, config).context("could not load --fen position")?,
        None => GameSession::new(config),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if !args.json {
        writeln!(stdout, "{}", session.board_view().board)?;
        writeln!(stdout, "type `help` for commands")?;
    }

    run_console(&mut session, stdin.lock(), &mut stdout, ConsoleOptions { json: args.json })
        .context("console I/O failed")?;
    Ok(())
}
