use std::collections::BTreeSet;
use std::fmt;

use crate::error::Contradiction;
use crate::grid::Cell;

///
/// A logical statement about the board: exactly `count` of `cells` are mines, the rest are
/// safe. e.g. {(0, 0), (0, 1), (1, 0)} = 2 means two of those three cells hold mines.
///
/// Cells are kept in a BTreeSet so that statements hash, compare and print the same way
/// regardless of the order facts arrived in.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    cells: BTreeSet<Cell>,
    count: usize,
}

impl Statement {
    pub fn new<I: IntoIterator<Item = Cell>>(cells: I, count: usize) -> Result<Statement, Contradiction> {
        let cells: BTreeSet<Cell> = cells.into_iter().collect();
        if count > cells.len() {
            return Err(Contradiction::CountExceedsCells { count, ncells: cells.len() });
        }
        Ok(Statement { cells, count })
    }

    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// If every remaining cell is needed to make up the count, they're all mines.
    pub fn known_mines(&self) -> BTreeSet<Cell> {
        if self.count > 0 && self.count == self.cells.len() {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    /// A zero count means every remaining cell is safe.
    pub fn known_safe_cells(&self) -> BTreeSet<Cell> {
        if self.count == 0 {
            self.cells.clone()
        } else {
            BTreeSet::new()
        }
    }

    ///
    /// Update the statement given that `cell` is a mine: drop it and decrement the count.
    /// Cells not in the statement are ignored, so a fact can be pushed to every statement
    /// without checking relevance first. Callers check `admits_mine` beforehand.
    ///
    pub fn apply_known_mine(&mut self, cell: Cell) {
        if self.cells.remove(&cell) {
            self.count = self.count.saturating_sub(1);
        }
    }

    /// Update the statement given that `cell` is safe. The count doesn't change.
    pub fn apply_known_safe(&mut self, cell: Cell) {
        self.cells.remove(&cell);
    }

    /// Whether `cell` being a mine is consistent with this statement.
    pub fn admits_mine(&self, cell: &Cell) -> bool {
        !self.cells.contains(cell) || self.count > 0
    }

    /// Whether `cell` being safe is consistent with this statement.
    pub fn admits_safe(&self, cell: &Cell) -> bool {
        !self.cells.contains(cell) || self.count < self.cells.len()
    }

    /// Estimated likelihood that any single member cell is a mine.
    pub fn mine_probability(&self) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.count as f64 / self.cells.len() as f64
    }

    pub fn is_subset_of(&self, other: &Statement) -> bool {
        self.cells.is_subset(&other.cells)
    }

    ///
    /// Given `subset` whose cells all lie within this statement, the cells outside `subset`
    /// must hold the remaining mines: (self.cells - subset.cells) = self.count - subset.count.
    ///
    pub fn subtract(&self, subset: &Statement) -> Result<Statement, Contradiction> {
        let count = self.count.checked_sub(subset.count).ok_or_else(|| {
            Contradiction::NegativeDerivation {
                subset: subset.to_string(),
                superset: self.to_string(),
            }
        })?;
        Statement::new(self.cells.difference(&subset.cells).copied(), count)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, (i, j)) in self.cells.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", i, j)?;
        }
        write!(f, "}} = {}", self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stmt(cells: &[Cell], count: usize) -> Statement {
        Statement::new(cells.iter().copied(), count).unwrap()
    }

    #[test]
    fn test_new_rejects_count_above_cells() {
        assert_eq!(
            Err(Contradiction::CountExceedsCells { count: 3, ncells: 2 }),
            Statement::new(vec![(0, 0), (0, 1)], 3)
        );
    }

    #[test]
    fn test_duplicate_cells_collapse() {
        let s = stmt(&[(1, 1), (1, 1), (0, 1)], 1);
        assert_eq!(2, s.len());
    }

    #[test]
    fn test_known_mines() {
        let all_mines = stmt(&[(0, 0), (0, 1)], 2);
        assert_eq!(all_mines.cells().clone(), all_mines.known_mines());
        assert!(all_mines.known_safe_cells().is_empty());

        let undecided = stmt(&[(0, 0), (0, 1)], 1);
        assert!(undecided.known_mines().is_empty());
        assert!(undecided.known_safe_cells().is_empty());
    }

    #[test]
    fn test_known_safe_cells() {
        let all_safe = stmt(&[(2, 2), (2, 3), (3, 3)], 0);
        assert_eq!(all_safe.cells().clone(), all_safe.known_safe_cells());
        assert!(all_safe.known_mines().is_empty());
    }

    #[test]
    fn test_empty_statement_knows_nothing_about_mines() {
        let empty = stmt(&[], 0);
        assert!(empty.known_mines().is_empty());
        assert!(empty.known_safe_cells().is_empty());
    }

    #[test]
    fn test_apply_known_mine() {
        let mut s = stmt(&[(0, 0), (0, 1), (1, 0)], 2);
        s.apply_known_mine((0, 0));
        assert_eq!(stmt(&[(0, 1), (1, 0)], 1), s);
        // Not a member: no-op.
        s.apply_known_mine((5, 5));
        assert_eq!(stmt(&[(0, 1), (1, 0)], 1), s);
    }

    #[test]
    fn test_apply_known_safe() {
        let mut s = stmt(&[(0, 0), (0, 1), (1, 0)], 2);
        s.apply_known_safe((1, 0));
        assert_eq!(stmt(&[(0, 0), (0, 1)], 2), s);
        assert_eq!(s.cells().clone(), s.known_mines());
        s.apply_known_safe((7, 7));
        assert_eq!(stmt(&[(0, 0), (0, 1)], 2), s);
    }

    #[test]
    fn test_admits() {
        let safe = stmt(&[(0, 0), (0, 1)], 0);
        assert!(!safe.admits_mine(&(0, 0)));
        assert!(safe.admits_mine(&(3, 3)));
        assert!(safe.admits_safe(&(0, 0)));

        let mines = stmt(&[(0, 0), (0, 1)], 2);
        assert!(!mines.admits_safe(&(0, 1)));
        assert!(mines.admits_mine(&(0, 1)));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        assert_eq!(stmt(&[(0, 0), (1, 1)], 1), stmt(&[(1, 1), (0, 0)], 1));
        assert_ne!(stmt(&[(0, 0), (1, 1)], 1), stmt(&[(0, 0), (1, 1)], 0));
    }

    #[test]
    fn test_subtract() {
        // {A,B,C} = 2 within {A,B,C,D,E} = 3 leaves {D,E} = 1
        let small = stmt(&[(0, 0), (0, 1), (0, 2)], 2);
        let big = stmt(&[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)], 3);
        assert!(small.is_subset_of(&big));
        assert!(!big.is_subset_of(&small));
        assert_eq!(stmt(&[(1, 0), (1, 1)], 1), big.subtract(&small).unwrap());
    }

    #[test]
    fn test_subtract_contradictions() {
        let small = stmt(&[(0, 0), (0, 1)], 2);
        let big = stmt(&[(0, 0), (0, 1), (0, 2)], 1);
        assert!(matches!(big.subtract(&small), Err(Contradiction::NegativeDerivation { .. })));

        let small = stmt(&[(0, 0), (0, 1)], 0);
        let big = stmt(&[(0, 0), (0, 1), (0, 2)], 2);
        assert_eq!(
            Err(Contradiction::CountExceedsCells { count: 2, ncells: 1 }),
            big.subtract(&small)
        );
    }

    #[test]
    fn test_mine_probability_and_display() {
        let s = stmt(&[(0, 1), (0, 0), (1, 0), (1, 1)], 1);
        assert_eq!(0.25, s.mine_probability());
        assert_eq!("{(0, 0), (0, 1), (1, 0), (1, 1)} = 1", s.to_string());
    }
}
