//! Let two robots play one game and print the result.
//!
//! ```text
//! RUST_LOG=rust_boardgame=debug selfplay --game hasami --level hard --seed 3
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rust_boardgame::games::{Hasami, TicTacToe};
use rust_boardgame::{
    Board, GameResult, GameRules, PlayerId, RepetitionTracker, RobotController, RobotLevel,
    Transcript,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GameKind {
    Tictactoe,
    Hasami,
}

/// Play a robot-vs-robot game.
#[derive(Parser)]
#[command(name = "selfplay", about = "Play a robot-vs-robot game")]
struct Cli {
    /// Game to play
    #[arg(long, value_enum, default_value = "tictactoe")]
    game: GameKind,

    /// Board size (hasami only)
    #[arg(long, default_value_t = 5)]
    size: u8,

    /// Strength of both robots
    #[arg(long, value_enum, default_value = "medium")]
    level: RobotLevel,

    /// Override the search depth of the level
    #[arg(long)]
    depth: Option<u32>,

    /// Pick randomly among this many top moves
    #[arg(long)]
    randomize: Option<usize>,

    /// Setup and robot seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Stop after this many moves
    #[arg(long, default_value_t = 200)]
    max_moves: usize,

    /// Write the transcript here instead of printing it
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Replay the transcript and check its digest
    #[arg(long)]
    verify: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.game {
        GameKind::Tictactoe => play(TicTacToe::new(), &cli),
        GameKind::Hasami => play(Hasami::builder().size(cli.size).build(), &cli),
    }
}

fn robot<G: GameRules>(cli: &Cli, player: PlayerId) -> RobotController<G> {
    let mut config = cli.level.config(cli.seed.wrapping_add(player.index() as u64));
    if let Some(depth) = cli.depth {
        config = config.with_depth(depth);
    }
    if let Some(top_n) = cli.randomize {
        let tolerance = config.random_tolerance.max(10.0);
        config = config.with_randomization(top_n, tolerance);
    }
    RobotController::new(config)
}

fn play<G: GameRules + Clone>(rules: G, cli: &Cli) -> Result<()> {
    let mut board = Board::new(rules.clone(), cli.seed);
    let mut tracker = RepetitionTracker::new();
    tracker.observe(&mut board);
    let mut transcript = Transcript::for_board(&board);
    let mut robots = [robot(cli, PlayerId::FIRST), robot(cli, PlayerId::SECOND)];

    info!(game = %board.config().name, level = %cli.level, seed = cli.seed, "game started");

    while board.phase().is_active() && transcript.len() < cli.max_moves {
        let mv = robots[board.player().index()].choose_move(&board);
        board.execute(&mv);
        board.settle();
        transcript.push(mv);
        tracker.observe(&mut board);
    }
    transcript.finish(&board);

    println!("{board}");
    match board.outcome() {
        Some(GameResult::Winner(player)) => {
            println!("{player} wins after {} moves", transcript.len())
        }
        Some(GameResult::Draw) => println!("draw after {} moves", transcript.len()),
        None => println!("unfinished after {} moves", transcript.len()),
    }

    match &cli.transcript {
        Some(path) => std::fs::write(path, transcript.to_text())
            .with_context(|| format!("writing transcript to {}", path.display()))?,
        None => print!("{}", transcript.to_text()),
    }

    if cli.verify {
        let replayed = transcript.replay(rules).context("replaying transcript")?;
        info!(digest = replayed.digest(), "transcript verified");
    }
    Ok(())
}
