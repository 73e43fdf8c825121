use minesweeper_solver::count_grid::{self, CountGrid};
use minesweeper_solver::grid::Cell;
use minesweeper_solver::harness::GameConfig;
use minesweeper_solver::error::Contradiction;
use minesweeper_solver::mine_map::{self, all_mines_flagged, generate_new_mine_map, is_mine, is_won, MineMap};
use minesweeper_solver::solve_state::SolveState;

use std::io;
use std::num::ParseIntError;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "minesweeper", version, about = "Play minesweeper with a deducing agent looking over your shoulder")]
struct Args {
    /// Number of rows
    #[arg(long, default_value_t = GameConfig::default().nrows)]
    rows: usize,
    /// Number of columns
    #[arg(long, default_value_t = GameConfig::default().ncols)]
    cols: usize,
    /// Number of mines
    #[arg(long, default_value_t = GameConfig::default().nmines)]
    mines: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    if args.mines > args.rows * args.cols {
        anyhow::bail!("{} mines don't fit on a {} x {} board", args.mines, args.rows, args.cols);
    }
    minesweeper_repl(GameConfig::new(args.rows, args.cols, args.mines))
}

/// What the player typed at the prompt.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Reveal(Cell),
    Flag(Cell),
    Recommended,
}

fn minesweeper_repl(config: GameConfig) -> anyhow::Result<()> {
    let mine_map = generate_new_mine_map(config.nrows, config.ncols, config.nmines);
    let mut count_grid = count_grid::init_count_grid(config.nrows, config.ncols);
    let mut solve_state = SolveState::init(config.nrows, config.ncols);
    let mut rng = rand::thread_rng();
    println!("Let's play minesweeper: {}", config);
    print(&count_grid, &solve_state);

    loop {
        let recommended = solve_state
            .pick_certain_move()
            .map(|cell| (cell, "certainly safe".to_string()))
            .or_else(|| {
                solve_state.pick_best_guess(&mut rng).map(|cell| {
                    let likelihood = solve_state.mine_estimates().get(&cell).copied();
                    let note = match likelihood {
                        Some(p) => format!("guess, mine likelihood {:.2}", p),
                        None => "guess, nothing known".to_string(),
                    };
                    (cell, note)
                })
            });
        let Some((best_move, note)) = recommended else {
            println!("No more moves available.");
            break;
        };
        println!("The computer recommends: {:?} ({})", best_move, note);
        println!("Enter a move as: row,col  (f row,col to flag, or enter to take the recommendation)");

        let mut mark_str = String::new();
        let nread = io::stdin()
            .read_line(&mut mark_str)
            .context("failed to read from stdin")?;
        if nread == 0 {
            break;
        }
        let command = match parse_command(&mark_str) {
            Some(command) => command,
            None => {
                println!("Could not parse input as coordinates row,col: {}", mark_str.trim());
                continue;
            }
        };

        let (mi, mj) = match command {
            Command::Recommended => best_move,
            Command::Reveal(cell) => cell,
            Command::Flag((fi, fj)) => {
                if !in_bounds(&config, (fi, fj)) {
                    println!("{fi},{fj} is off the board");
                    continue;
                }
                let won = toggle_flag(&mut count_grid, &mine_map, (fi, fj));
                print(&count_grid, &solve_state);
                if won {
                    println!("Every mine is flagged - you win!");
                    break;
                }
                continue;
            }
        };
        if !in_bounds(&config, (mi, mj)) {
            println!("{mi},{mj} is off the board");
            continue;
        }
        if count_grid::revealed_cells(&count_grid).contains(&(mi, mj)) {
            println!("{mi},{mj} is already revealed");
            continue;
        }
        println!("Revealing {:?}", (mi, mj));

        match reveal_cell(&mut count_grid, &mut solve_state, &mine_map, (mi, mj)) {
            Ok(RevealOutcome::HitMine) => {
                println!("Hit a mine! at {mi},{mj}:\n{}", mine_map::to_string(&mine_map));
                break;
            }
            Ok(RevealOutcome::Won) => {
                print(&count_grid, &solve_state);
                println!("All safe cells revealed - you win!");
                break;
            }
            Ok(RevealOutcome::Continue) => print(&count_grid, &solve_state),
            Err(e) => {
                // Only a corrupted board gets here.
                anyhow::bail!("the agent's knowledge is inconsistent: {e}");
            }
        }
    }
    Ok(())
}

/// What revealing a cell did to the game.
#[derive(Debug, PartialEq, Eq)]
enum RevealOutcome {
    HitMine,
    Won,
    Continue,
}

///
/// Flags only live on the player's board. The agent never hears about them: a flag is the
/// player's guess, not something the agent has deduced. Returns whether the flags now sit
/// exactly on the mines.
///
fn toggle_flag(count_grid: &mut CountGrid, mine_map: &MineMap, (i, j): Cell) -> bool {
    count_grid::toggle_flag(count_grid, i, j);
    all_mines_flagged(mine_map, &count_grid::flagged_cells(count_grid))
}

fn reveal_cell(
    count_grid: &mut CountGrid, solve_state: &mut SolveState, mine_map: &MineMap, cell: Cell,
) -> Result<RevealOutcome, Contradiction> {
    // Check if we hit a mine. If so, you lose!
    if is_mine(mine_map, cell) {
        return Ok(RevealOutcome::HitMine);
    }
    let (i, j) = cell;
    let count = count_grid::reveal(count_grid, i, j, mine_map);
    solve_state.record_observation(cell, count)?;
    if is_won(mine_map, &count_grid::revealed_cells(count_grid)) {
        return Ok(RevealOutcome::Won);
    }
    Ok(RevealOutcome::Continue)
}

fn in_bounds(config: &GameConfig, (i, j): Cell) -> bool {
    i < config.nrows && j < config.ncols
}

fn parse_command(input: &str) -> Option<Command> {
    let input = input.trim();
    if input.is_empty() {
        return Some(Command::Recommended);
    }
    match input.strip_prefix('f') {
        Some(rest) => parse_mark(rest).map(Command::Flag),
        None => parse_mark(input).map(Command::Reveal),
    }
}

fn parse_mark(mark_str: &str) -> Option<Cell> {
    let maybe_mark: Vec<Result<usize, ParseIntError>> = mark_str.splitn(2, ',')
        .map(|coord_str| coord_str.trim().parse::<usize>()
    ).collect();

    if maybe_mark.len() != 2 {
        return None
    }
    let row = maybe_mark[0].as_ref().ok()?;
    let col = maybe_mark[1].as_ref().ok()?;
    Some((*row, *col))
}

fn print(count_grid: &CountGrid, solve_state: &SolveState) {
    println!("{}", count_grid::to_string(count_grid));
    println!("{}", solve_state.pretty_print());
}
