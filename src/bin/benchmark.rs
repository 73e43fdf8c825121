use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use minesweeper_solver::harness::{
    comparison_table, play_on_map_with, run_games, Difficulty, GameConfig, MoveKind, Outcome,
};
use minesweeper_solver::mine_map::{self, generate_mine_map_with_rng, get_neighbor_mine_count};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "benchmark",
    version,
    about = "Measure how well the minesweeper agent plays"
)]
struct Cli {
    /// Base seed; game i of a batch is seeded with seed + i
    #[arg(long, default_value_t = 0, global = true)]
    seed: u64,
    /// Hide the progress bar
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a batch of games on one board configuration
    Run {
        #[arg(long, default_value_t = GameConfig::default().nrows)]
        rows: usize,
        #[arg(long, default_value_t = GameConfig::default().ncols)]
        cols: usize,
        #[arg(long, default_value_t = GameConfig::default().nmines)]
        mines: usize,
        /// Number of games to play
        #[arg(short = 'n', long, default_value_t = 100)]
        games: usize,
        /// Write every game result to this file as JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },
    /// Play every difficulty preset and print a comparison table
    Compare {
        /// Override the per-preset game count
        #[arg(short = 'n', long)]
        games: Option<usize>,
    },
    /// Play one game and narrate every move
    Demo {
        #[arg(long, default_value_t = GameConfig::default().nrows)]
        rows: usize,
        #[arg(long, default_value_t = GameConfig::default().ncols)]
        cols: usize,
        #[arg(long, default_value_t = GameConfig::default().nmines)]
        mines: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run { rows, cols, mines, games, json } => {
            let config = checked_config(rows, cols, mines)?;
            let pb = progress_bar(games, cli.quiet)?;
            let (stats, results) = run_games(config, games, cli.seed, &pb)?;
            pb.finish_and_clear();
            println!("{}", stats);
            if let Some(path) = json {
                fs::write(&path, serde_json::to_string_pretty(&results)?)?;
                eprintln!("Results saved to {}", path.display());
            }
        }
        Command::Compare { games } => {
            let mut rows = Vec::with_capacity(Difficulty::ALL.len());
            for difficulty in Difficulty::ALL {
                let n = games.unwrap_or_else(|| difficulty.default_games());
                println!("Testing: {}", difficulty.name());
                let pb = progress_bar(n, cli.quiet)?;
                let (stats, _) = run_games(difficulty.config(), n, cli.seed, &pb)?;
                pb.finish_and_clear();
                println!("{}", stats);
                rows.push((difficulty.name(), stats));
            }
            print!("{}", comparison_table(&rows));
        }
        Command::Demo { rows, cols, mines } => {
            let config = checked_config(rows, cols, mines)?;
            demo(config, cli.seed)?;
        }
    }
    Ok(())
}

fn checked_config(rows: usize, cols: usize, mines: usize) -> anyhow::Result<GameConfig> {
    if rows == 0 || cols == 0 {
        anyhow::bail!("the board needs at least one row and one column");
    }
    if mines > rows * cols {
        anyhow::bail!("{} mines don't fit on a {} x {} board", mines, rows, cols);
    }
    Ok(GameConfig::new(rows, cols, mines))
}

fn progress_bar(games: usize, quiet: bool) -> anyhow::Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(games as u64);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

fn demo(config: GameConfig, seed: u64) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mine_map = generate_mine_map_with_rng(&mut rng, config.nrows, config.ncols, config.nmines);
    let nsafe = config.ncells() - config.nmines;
    println!("Board configuration: {}", config);
    println!("Safe cells to reveal: {}", nsafe);
    println!("{}", mine_map::to_string(&mine_map));

    let result = play_on_map_with(&mine_map, &mut rng, |n, (i, j), kind, solve_state| {
        let summary = solve_state.summary();
        println!("{}", "-".repeat(70));
        println!("Move #{n}");
        println!(
            "  knowledge: {} safe, {} mines, {} statements",
            summary.known_safe, summary.known_mines, summary.statements
        );
        let label = match kind {
            MoveKind::Certain => "certain (logically proven safe)",
            MoveKind::Guess => "guess (lowest estimated mine likelihood)",
        };
        println!("  decision: {label}");
        println!("  cell: ({i}, {j}), {} neighboring mines", get_neighbor_mine_count(&mine_map, i, j));
    })?;

    println!("{}", "=".repeat(70));
    match result.outcome {
        Outcome::Won => println!("Won: all {} safe cells revealed", nsafe),
        Outcome::HitMine => println!("Hit a mine after revealing {}/{} safe cells", result.revealed, nsafe),
        Outcome::NoMovesLeft => println!("No more moves available"),
    }
    println!(
        "moves: {}, certain: {}, guesses: {}, certain share: {:.1}%",
        result.moves,
        result.safe_moves,
        result.guess_moves,
        result.accuracy * 100.0
    );
    Ok(())
}
