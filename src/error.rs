use crate::grid::Cell;

/// The knowledge base has become logically inconsistent.
///
/// Never produced by a sound deduction over a real mine map; seeing one means the
/// caller fed the engine an observation that disagrees with what it already knows.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Contradiction {
    #[error("statement claims {count} mines among only {ncells} cells")]
    CountExceedsCells { count: usize, ncells: usize },
    #[error("cell {cell:?} reports {count} neighboring mines but {known_mines} are already known")]
    ObservationBelowKnownMines { cell: Cell, count: usize, known_mines: usize },
    #[error("cell {0:?} is already known to be a mine")]
    SafeCellIsMine(Cell),
    #[error("cell {0:?} is already known to be safe")]
    MineCellIsSafe(Cell),
    #[error("marking {cell:?} as a mine breaks the statement {statement}")]
    MineInSafeStatement { cell: Cell, statement: String },
    #[error("marking {cell:?} as safe breaks the statement {statement}")]
    SafeInMineStatement { cell: Cell, statement: String },
    #[error("{superset} minus {subset} leaves a negative mine count")]
    NegativeDerivation { subset: String, superset: String },
}
