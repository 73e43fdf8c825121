use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::Contradiction;
use crate::grid::{neighbor_coords, Cell};
use crate::statement::Statement;

///
/// Knowledge base the agent builds up over the course of a single game.
///
/// Terms:
/// move: a cell the caller has chosen to reveal
/// known safe / known mine: a cell whose contents follow with certainty from the observations
/// so far. A cell is classified at most once and never changes class afterwards.
/// statement: "exactly n of these unknown cells are mines", see [`Statement`].
///
#[derive(Debug, Clone)]
pub struct SolveState {
    nrows: usize,
    ncols: usize,
    moves_made: HashSet<Cell>,
    known_safe: HashSet<Cell>,
    known_mines: HashSet<Cell>,
    statements: Vec<Statement>,
}

/// Counts describing the knowledge base, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KnowledgeSummary {
    pub moves_made: usize,
    pub known_safe: usize,
    pub known_mines: usize,
    pub statements: usize,
    pub total_cells_in_statements: usize,
}

impl SolveState {
    pub fn init(nrows: usize, ncols: usize) -> SolveState {
        SolveState {
            nrows,
            ncols,
            moves_made: HashSet::with_capacity(nrows * ncols),
            known_safe: HashSet::with_capacity(nrows * ncols),
            known_mines: HashSet::with_capacity(16),
            statements: Vec::with_capacity(16),
        }
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn moves_made(&self) -> &HashSet<Cell> {
        &self.moves_made
    }

    pub fn known_safe(&self) -> &HashSet<Cell> {
        &self.known_safe
    }

    pub fn known_mines(&self) -> &HashSet<Cell> {
        &self.known_mines
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn is_unknown(&self, cell: &Cell) -> bool {
        !self.known_safe.contains(cell) && !self.known_mines.contains(cell)
    }

    ///
    /// Record that `cell` is a mine and strike it from every statement. Calling this twice
    /// with the same cell is the same as calling it once.
    ///
    pub fn mark_mine(&mut self, cell: Cell) -> Result<(), Contradiction> {
        if self.known_mines.contains(&cell) {
            return Ok(());
        }
        if self.known_safe.contains(&cell) {
            return Err(Contradiction::MineCellIsSafe(cell));
        }
        if let Some(statement) = self.statements.iter().find(|s| !s.admits_mine(&cell)) {
            return Err(Contradiction::MineInSafeStatement { cell, statement: statement.to_string() });
        }
        debug!(?cell, "marking mine");
        self.known_mines.insert(cell);
        for statement in self.statements.iter_mut() {
            statement.apply_known_mine(cell);
        }
        Ok(())
    }

    /// Record that `cell` is safe and strike it from every statement. Idempotent.
    pub fn mark_safe(&mut self, cell: Cell) -> Result<(), Contradiction> {
        if self.known_safe.contains(&cell) {
            return Ok(());
        }
        if self.known_mines.contains(&cell) {
            return Err(Contradiction::SafeCellIsMine(cell));
        }
        if let Some(statement) = self.statements.iter().find(|s| !s.admits_safe(&cell)) {
            return Err(Contradiction::SafeInMineStatement { cell, statement: statement.to_string() });
        }
        debug!(?cell, "marking safe");
        self.known_safe.insert(cell);
        for statement in self.statements.iter_mut() {
            statement.apply_known_safe(cell);
        }
        Ok(())
    }

    ///
    /// Called when the board tells us that the safe cell `cell` has `mine_count` neighboring
    /// mines. Records the move, adds a statement about the still-unknown neighbors, then draws
    /// every conclusion that follows.
    ///
    /// On a contradiction the knowledge base is left exactly as it was before the call.
    ///
    pub fn record_observation(&mut self, cell: Cell, mine_count: usize) -> Result<(), Contradiction> {
        let mut next = self.clone();
        next.ingest_observation(cell, mine_count)?;
        *self = next;
        Ok(())
    }

    fn ingest_observation(&mut self, cell: Cell, mine_count: usize) -> Result<(), Contradiction> {
        let (i, j) = cell;
        self.moves_made.insert(cell);
        self.mark_safe(cell)?;

        // Known mines among the neighbors use up part of the count but tell us nothing new.
        let mut known_mine_neighbors = 0;
        let mut unknown_neighbors: Vec<Cell> = Vec::with_capacity(8);
        for neighbor in neighbor_coords(self.nrows, self.ncols, i, j) {
            if self.known_mines.contains(&neighbor) {
                known_mine_neighbors += 1;
            } else if !self.known_safe.contains(&neighbor) {
                unknown_neighbors.push(neighbor);
            }
        }
        let remaining = mine_count.checked_sub(known_mine_neighbors).ok_or(
            Contradiction::ObservationBelowKnownMines { cell, count: mine_count, known_mines: known_mine_neighbors },
        )?;
        let statement = Statement::new(unknown_neighbors, remaining)?;
        debug!(?cell, mine_count, %statement, "recorded observation");
        if !statement.is_empty() {
            self.statements.push(statement);
        }

        self.infer_known_cells()?;
        self.derive_from_subsets()?;
        self.prune_statements();
        Ok(())
    }

    ///
    /// Scan every statement for cells that are certainly mines or certainly safe and mark them,
    /// over and over until a full pass turns up nothing new. Each pass classifies at least one
    /// more cell of a finite board, so this terminates.
    ///
    fn infer_known_cells(&mut self) -> Result<(), Contradiction> {
        loop {
            let mut new_mines: BTreeSet<Cell> = BTreeSet::new();
            let mut new_safe: BTreeSet<Cell> = BTreeSet::new();
            for statement in &self.statements {
                new_mines.extend(statement.known_mines());
                new_safe.extend(statement.known_safe_cells());
            }
            new_mines.retain(|cell| !self.known_mines.contains(cell));
            new_safe.retain(|cell| !self.known_safe.contains(cell));
            if new_mines.is_empty() && new_safe.is_empty() {
                return Ok(());
            }
            trace!(mines = new_mines.len(), safe = new_safe.len(), "inference pass");
            for cell in new_safe {
                self.mark_safe(cell)?;
            }
            for cell in new_mines {
                self.mark_mine(cell)?;
            }
        }
    }

    ///
    /// Subset resolution: whenever one statement's cells all lie within another's, the cells
    /// outside the smaller one hold the difference in counts.
    ///   {A, B, C} = 2 and {A, B, C, D, E} = 3  =>  {D, E} = 1
    /// Every ordered pair of distinct statements is tried once. New statements are only added
    /// if nothing equal to them is already held.
    ///
    fn derive_from_subsets(&mut self) -> Result<(), Contradiction> {
        let mut held: HashSet<Statement> = self.statements.iter().cloned().collect();
        let mut derived: Vec<Statement> = Vec::new();
        for (sub_idx, subset) in self.statements.iter().enumerate() {
            if subset.is_empty() {
                continue;
            }
            for (sup_idx, superset) in self.statements.iter().enumerate() {
                if sub_idx == sup_idx || superset.is_empty() || !subset.is_subset_of(superset) {
                    continue;
                }
                let candidate = superset.subtract(subset)?;
                if candidate.is_empty() || held.contains(&candidate) {
                    continue;
                }
                trace!(%subset, %superset, %candidate, "derived statement");
                held.insert(candidate.clone());
                derived.push(candidate);
            }
        }
        if !derived.is_empty() {
            debug!(count = derived.len(), "statements derived from subsets");
        }
        self.statements.extend(derived);
        Ok(())
    }

    /// Drop statements with no cells left, along with exact duplicates.
    fn prune_statements(&mut self) {
        let mut held: HashSet<Statement> = HashSet::with_capacity(self.statements.len());
        self.statements.retain(|s| !s.is_empty() && held.insert(s.clone()));
    }

    /// A cell known to be safe that hasn't been played yet, if any. Picks the first such cell
    /// in row-major order.
    pub fn pick_certain_move(&self) -> Option<Cell> {
        self.known_safe.difference(&self.moves_made).min().copied()
    }

    ///
    /// Estimated mine likelihood for every unplayed cell mentioned by some statement. A cell in
    /// several statements takes the largest of their likelihoods: one constraint saying the
    /// cell is risky is enough.
    ///
    pub fn mine_estimates(&self) -> BTreeMap<Cell, f64> {
        let mut estimates: BTreeMap<Cell, f64> = BTreeMap::new();
        for statement in self.statements.iter().filter(|s| !s.is_empty()) {
            let likelihood = statement.mine_probability();
            for cell in statement.cells() {
                if self.moves_made.contains(cell) || self.known_mines.contains(cell) {
                    continue;
                }
                let estimate = estimates.entry(*cell).or_insert(likelihood);
                if likelihood > *estimate {
                    *estimate = likelihood;
                }
            }
        }
        estimates
    }

    ///
    /// Best move when nothing is certain: the cell with the lowest estimated mine likelihood,
    /// ties broken uniformly at random. If no statement says anything about the remaining
    /// cells, any unplayed cell not known to be a mine is chosen uniformly at random.
    /// Returns None once there is nothing left to play.
    ///
    pub fn pick_best_guess<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Cell> {
        let candidates: Vec<Cell> = (0..self.nrows)
            .flat_map(|i| (0..self.ncols).map(move |j| (i, j)))
            .filter(|cell| !self.moves_made.contains(cell) && !self.known_mines.contains(cell))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let estimates = self.mine_estimates();
        let lowest = estimates.values().copied().fold(f64::INFINITY, f64::min);
        // BTreeMap iteration keeps the tie list in row-major order, so a seeded rng
        // always lands on the same cell.
        let safest: Vec<Cell> = estimates
            .iter()
            .filter(|(_, estimate)| **estimate == lowest)
            .map(|(cell, _)| *cell)
            .collect();
        if safest.is_empty() {
            candidates.choose(rng).copied()
        } else {
            safest.choose(rng).copied()
        }
    }

    pub fn summary(&self) -> KnowledgeSummary {
        KnowledgeSummary {
            moves_made: self.moves_made.len(),
            known_safe: self.known_safe.len(),
            known_mines: self.known_mines.len(),
            statements: self.statements.len(),
            total_cells_in_statements: self.statements.iter().map(Statement::len).sum(),
        }
    }

    ///
    /// Board as the agent sees it:
    ///   o  played
    ///   .  known safe, not yet played
    ///   x  known mine
    ///   -  unknown
    ///
    pub fn pretty_print(&self) -> String {
        let mut str = format!("nrows: {}, ncols: {}\n", self.nrows, self.ncols);
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                let cell = (i, j);
                let symbol = if self.moves_made.contains(&cell) {
                    "o "
                } else if self.known_safe.contains(&cell) {
                    ". "
                } else if self.known_mines.contains(&cell) {
                    "x "
                } else {
                    "- "
                };
                str.push_str(symbol);
            }
            str.push('\n');
        }
        let summary = self.summary();
        str.push_str(&format!(
            "moves made: {}, known safe: {}, known mines: {}, statements: {}\n",
            summary.moves_made, summary.known_safe, summary.known_mines, summary.statements
        ));
        for statement in &self.statements {
            str.push_str(&format!("  {}\n", statement));
        }
        str
    }
}
