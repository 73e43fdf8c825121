//! Game loop and batch statistics for the agent.
//!
//! The agent plays with the same strategy throughout: take a certain move when one exists,
//! otherwise the best guess. Batches run on the rayon pool; every game gets its own rng
//! seeded from `(seed, game index)`, so a batch reports the same numbers however the games
//! are scheduled.

use std::fmt;

use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::count_grid::{self, init_count_grid};
use crate::error::Contradiction;
use crate::grid::{get_num_cols, get_num_rows};
use crate::mine_map::{count_mines, generate_mine_map_with_rng, is_mine, is_won, MineMap};
use crate::solve_state::SolveState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameConfig {
    pub nrows: usize,
    pub ncols: usize,
    pub nmines: usize,
}

impl GameConfig {
    pub fn new(nrows: usize, ncols: usize, nmines: usize) -> GameConfig {
        GameConfig { nrows, ncols, nmines }
    }

    pub fn ncells(&self) -> usize {
        self.nrows * self.ncols
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::new(8, 8, 10)
    }
}

impl fmt::Display for GameConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} with {} mines", self.nrows, self.ncols, self.nmines)
    }
}

/// Preset board configurations used by the difficulty comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
    SmallDense,
    LargeSparse,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Expert,
        Difficulty::SmallDense,
        Difficulty::LargeSparse,
    ];

    pub fn config(&self) -> GameConfig {
        match self {
            Difficulty::Beginner => GameConfig::new(8, 8, 10),
            Difficulty::Intermediate => GameConfig::new(16, 16, 40),
            Difficulty::Expert => GameConfig::new(16, 30, 99),
            Difficulty::SmallDense => GameConfig::new(5, 5, 8),
            Difficulty::LargeSparse => GameConfig::new(20, 20, 50),
        }
    }

    /// Bigger boards are slower to play, so they get fewer games by default.
    pub fn default_games(&self) -> usize {
        match self {
            Difficulty::Beginner | Difficulty::SmallDense => 100,
            Difficulty::Intermediate => 50,
            Difficulty::Expert | Difficulty::LargeSparse => 25,
        }
    }

    pub fn name(&self) -> String {
        let label = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Expert => "Expert",
            Difficulty::SmallDense => "Small Dense",
            Difficulty::LargeSparse => "Large Sparse",
        };
        let config = self.config();
        format!("{} ({}x{}, {} mines)", label, config.nrows, config.ncols, config.nmines)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Proven safe by deduction.
    Certain,
    /// Lowest estimated mine likelihood, or a uniform pick when nothing is known.
    Guess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won,
    HitMine,
    NoMovesLeft,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameResult {
    pub config: GameConfig,
    pub outcome: Outcome,
    pub won: bool,
    pub moves: usize,
    pub safe_moves: usize,
    pub guess_moves: usize,
    pub revealed: usize,
    /// Share of moves that were certain, in [0, 1].
    pub accuracy: f64,
    /// Kind of the move that hit a mine, if one did.
    pub lost_on: Option<MoveKind>,
}

/// Generate a mine map from `rng` and let the agent play it.
pub fn play_game<R: Rng + ?Sized>(config: GameConfig, rng: &mut R) -> Result<GameResult, Contradiction> {
    let mine_map = generate_mine_map_with_rng(rng, config.nrows, config.ncols, config.nmines);
    play_on_map(&mine_map, rng)
}

///
/// Let the agent play the given mine map to the end. Each move is reported to `on_move`
/// together with the knowledge base as it stood when the move was chosen.
///
pub fn play_on_map_with<R, F>(mine_map: &MineMap, rng: &mut R, mut on_move: F) -> Result<GameResult, Contradiction>
where
    R: Rng + ?Sized,
    F: FnMut(usize, (usize, usize), MoveKind, &SolveState),
{
    let nrows = get_num_rows(mine_map);
    let ncols = get_num_cols(mine_map);
    let config = GameConfig::new(nrows, ncols, count_mines(mine_map));
    let mut solve_state = SolveState::init(nrows, ncols);
    let mut count_grid = init_count_grid(nrows, ncols);

    let mut moves = 0;
    let mut safe_moves = 0;
    let mut guess_moves = 0;
    let mut lost_on = None;

    let outcome = loop {
        let (cell, kind) = match solve_state.pick_certain_move() {
            Some(cell) => (cell, MoveKind::Certain),
            None => match solve_state.pick_best_guess(rng) {
                Some(cell) => (cell, MoveKind::Guess),
                None => break Outcome::NoMovesLeft,
            },
        };
        moves += 1;
        match kind {
            MoveKind::Certain => safe_moves += 1,
            MoveKind::Guess => guess_moves += 1,
        }
        on_move(moves, cell, kind, &solve_state);
        debug!(?cell, ?kind, moves, "agent move");

        if is_mine(mine_map, cell) {
            lost_on = Some(kind);
            break Outcome::HitMine;
        }
        let (i, j) = cell;
        let count = count_grid::reveal(&mut count_grid, i, j, mine_map);
        solve_state.record_observation(cell, count)?;
        if is_won(mine_map, &count_grid::revealed_cells(&count_grid)) {
            break Outcome::Won;
        }
    };

    Ok(GameResult {
        config,
        outcome,
        won: outcome == Outcome::Won,
        moves,
        safe_moves,
        guess_moves,
        revealed: count_grid::revealed_cells(&count_grid).len(),
        accuracy: if moves > 0 { safe_moves as f64 / moves as f64 } else { 0.0 },
        lost_on,
    })
}

pub fn play_on_map<R: Rng + ?Sized>(mine_map: &MineMap, rng: &mut R) -> Result<GameResult, Contradiction> {
    play_on_map_with(mine_map, rng, |_, _, _, _| {})
}

/// Aggregated results over a batch of games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchStats {
    pub config: GameConfig,
    pub games_played: usize,
    pub wins: usize,
    pub losses: usize,
    /// Percentage of games won.
    pub win_rate: f64,
    pub avg_moves: f64,
    pub avg_safe_moves: f64,
    pub avg_guess_moves: f64,
    pub avg_revealed: f64,
    /// Percentage of all moves that were certain.
    pub avg_accuracy: f64,
}

impl BatchStats {
    pub fn from_results(config: GameConfig, results: &[GameResult]) -> BatchStats {
        let games_played = results.len();
        let wins = results.iter().filter(|r| r.won).count();
        let total_moves: usize = results.iter().map(|r| r.moves).sum();
        let total_safe: usize = results.iter().map(|r| r.safe_moves).sum();
        let total_guess: usize = results.iter().map(|r| r.guess_moves).sum();
        let total_revealed: usize = results.iter().map(|r| r.revealed).sum();
        let per_game = |total: usize| {
            if games_played > 0 { total as f64 / games_played as f64 } else { 0.0 }
        };
        BatchStats {
            config,
            games_played,
            wins,
            losses: games_played - wins,
            win_rate: per_game(wins) * 100.0,
            avg_moves: per_game(total_moves),
            avg_safe_moves: per_game(total_safe),
            avg_guess_moves: per_game(total_guess),
            avg_revealed: per_game(total_revealed),
            avg_accuracy: if total_moves > 0 { total_safe as f64 / total_moves as f64 * 100.0 } else { 0.0 },
        }
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        let thin = "-".repeat(70);
        writeln!(f, "{rule}")?;
        writeln!(f, "MINESWEEPER AGENT PERFORMANCE REPORT")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Configuration: {}", self.config)?;
        writeln!(f, "Games Played:  {}", self.games_played)?;
        writeln!(f, "{thin}")?;
        writeln!(f, "Wins:          {}", self.wins)?;
        writeln!(f, "Losses:        {}", self.losses)?;
        writeln!(f, "Win Rate:      {:.2}%", self.win_rate)?;
        writeln!(f, "{thin}")?;
        writeln!(f, "Average Moves per Game:        {:.2}", self.avg_moves)?;
        writeln!(f, "Average Certain Moves:         {:.2}", self.avg_safe_moves)?;
        writeln!(f, "Average Guesses:               {:.2}", self.avg_guess_moves)?;
        writeln!(f, "Average Cells Revealed:        {:.2}", self.avg_revealed)?;
        writeln!(f, "Certain Move Share:            {:.2}%", self.avg_accuracy)?;
        writeln!(f, "{rule}")
    }
}

///
/// Play `games` independent games of `config` in parallel. Game `idx` is seeded with
/// `seed + idx`. `progress` is bumped once per finished game; pass `ProgressBar::hidden()`
/// to run quietly.
///
pub fn run_games(
    config: GameConfig, games: usize, seed: u64, progress: &ProgressBar,
) -> Result<(BatchStats, Vec<GameResult>), Contradiction> {
    info!(%config, games, seed, "running games");
    let results = (0..games)
        .into_par_iter()
        .map(|idx| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(idx as u64));
            let result = play_game(config, &mut rng);
            progress.inc(1);
            result
        })
        .collect::<Result<Vec<_>, _>>()?;
    let stats = BatchStats::from_results(config, &results);
    info!(wins = stats.wins, games = stats.games_played, win_rate = stats.win_rate, "batch finished");
    Ok((stats, results))
}

/// Side-by-side summary of several batches.
pub fn comparison_table(rows: &[(String, BatchStats)]) -> String {
    let rule = "=".repeat(70);
    let mut str = format!("{rule}\nSUMMARY COMPARISON\n{rule}\n");
    str.push_str(&format!("{:<35} {:<15} {:<15}\n", "Difficulty", "Win Rate", "Avg Moves"));
    str.push_str(&format!("{}\n", "-".repeat(70)));
    for (name, stats) in rows {
        str.push_str(&format!("{:<35} {:>6.2}%        {:>7.2}\n", name, stats.win_rate, stats.avg_moves));
    }
    str.push_str(&format!("{rule}\n"));
    str
}
