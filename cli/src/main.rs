use std::{
    env,
    fs::{self, File},
    io,
    path::PathBuf,
    str::FromStr,
    sync::{Arc, Mutex},
};

use anyhow::{Context, Result};
use chess_rules::{game::Match, perft::perft, piece::Color, rules::Rules};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, level_filters::LevelFilter, Level};
use tracing_subscriber::{prelude::*, Registry};

use cli::{ReadCommand, Session, StdinCommandReader};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Also forbid castling across a square the opponent attacks.
    #[arg(long, global = true)]
    strict_castling: bool,

    /// Leave pawns that reach the far row as pawns.
    #[arg(long, global = true)]
    no_promotion: bool,

    /// Write debug logs to $CHESS_LOG_PATH or ~/.local/state/chess/chess.log.
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Play a match on the terminal. The default.
    Play,
    /// Count legal move sequences from a position, by depth.
    Perft {
        depth: usize,
        /// Piece placement field of a FEN string. Standard start if omitted.
        #[arg(long)]
        placement: Option<String>,
        #[arg(long, value_enum, default_value_t = Side::White)]
        to_move: Side,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Side {
    White,
    Black,
}

impl From<Side> for Color {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Color::White,
            Side::Black => Color::Black,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    enable_logging(cli.log)?;

    let rules = Rules {
        strict_castling: cli.strict_castling,
        promote_pawns: !cli.no_promotion,
    };
    debug!("{:?}", rules);

    match cli.command {
        Some(Commands::Perft {
            depth,
            placement,
            to_move,
        }) => cli_perft(rules, placement.as_deref(), to_move.into(), depth),
        Some(Commands::Play) | None => play_main_loop(rules),
    }
}

fn cli_perft(rules: Rules, placement: Option<&str>, to_move: Color, depth: usize) -> Result<()> {
    let game = match placement {
        Some(placement) => Match::from_placement(placement, to_move, rules)
            .with_context(|| format!("Couldn't parse given placement: `{}`", placement))?,
        None => Match::with_rules(rules),
    };
    let res = perft(&game, depth)?;
    println!("{}", res);
    Ok(())
}

fn play_main_loop(rules: Rules) -> Result<()> {
    let mut session = Session::new(rules, Arc::new(Mutex::new(io::stdout())));
    let reader = StdinCommandReader;

    while let Some(line) = reader.read_command()? {
        debug!("{}", line.trim_end());
        session.handle_line(&line)?;

        if session.is_finished() {
            break;
        }
    }
    Ok(())
}

fn enable_logging(to_file: bool) -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_writer(io::stderr)
        .with_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        );

    let log_layer = if to_file {
        let log_path = get_log_path()?;
        let log_file = File::create(&log_path)
            .with_context(|| format!("Couldn't create file {:?}", log_path))?;
        Some(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .with_filter(LevelFilter::from_level(Level::DEBUG)),
        )
    } else {
        None
    };

    Registry::default()
        .with(stderr_layer)
        .with(log_layer)
        .init();

    Ok(())
}

fn get_log_path() -> Result<PathBuf> {
    if let Ok(log_path_str) = env::var("CHESS_LOG_PATH") {
        return Ok(PathBuf::from_str(&log_path_str)?);
    }

    let mut logs_dir = dirs::home_dir().context("Home directory not set")?;
    logs_dir.push(PathBuf::from(".local/state/chess"));
    if !logs_dir.exists() {
        fs::create_dir_all(&logs_dir)?;
    }

    let mut log_path = logs_dir;
    log_path.push("chess.log");
    Ok(log_path)
}
