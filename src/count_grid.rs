use std::collections::HashSet;

use crate::grid::*;
use crate::mine_map::{get_neighbor_mine_count, is_mine, MineMap};

// Board shown to the user, kept independently from the mine map itself.
#[derive(Debug, Clone)]
pub struct CountCell {
    pub neighbor_mine_count: i32,
    pub flagged: bool,
}
impl CountCell {
    pub fn is_marked(&self) -> bool {
        self.neighbor_mine_count != UNKNOWN_CELL_COUNT
    }
}
pub type CountGrid = Vec<Vec<CountCell>>;

const UNKNOWN_CELL_COUNT: i32 = -1;

pub fn init_count_grid(nrows: usize, ncols: usize) -> CountGrid {
    let mut count_grid: CountGrid = Vec::with_capacity(nrows);
    for _ in 0..nrows {
        count_grid.push(vec![CountCell { neighbor_mine_count: UNKNOWN_CELL_COUNT, flagged: false }; ncols]);
    }
    count_grid
}

///
/// Reveal a single cell and return its neighboring mine count. Only the one cell is
/// revealed: zeros don't cascade, the agent plays out their neighbors itself.
///
pub fn reveal(count_grid: &mut CountGrid, i: usize, j: usize, mine_map: &MineMap) -> usize {
    // Revealing a mine is a game over, and should be caught by the caller.
    if is_mine(mine_map, (i, j)) {
        panic!("revealed cell {i},{j} is a mine");
    }
    let cur_cell: &mut CountCell = get_mut(count_grid, i, j);
    if cur_cell.is_marked() {
        panic!("Cell {},{} has already been revealed", i, j);
    }
    let count = get_neighbor_mine_count(mine_map, i, j);
    cur_cell.neighbor_mine_count = count as i32;
    cur_cell.flagged = false;
    count
}

/// Toggle the flag on an unrevealed cell. Returns whether the cell is flagged afterwards.
pub fn toggle_flag(count_grid: &mut CountGrid, i: usize, j: usize) -> bool {
    let cur_cell: &mut CountCell = get_mut(count_grid, i, j);
    if cur_cell.is_marked() {
        return false;
    }
    cur_cell.flagged = !cur_cell.flagged;
    cur_cell.flagged
}

pub fn revealed_cells(count_grid: &CountGrid) -> HashSet<Cell> {
    cells_where(count_grid, CountCell::is_marked)
}

pub fn flagged_cells(count_grid: &CountGrid) -> HashSet<Cell> {
    cells_where(count_grid, |cell| cell.flagged)
}

fn cells_where<F: Fn(&CountCell) -> bool>(count_grid: &CountGrid, pred: F) -> HashSet<Cell> {
    let mut cells = HashSet::new();
    for (i, row) in count_grid.iter().enumerate() {
        for (j, cell) in row.iter().enumerate() {
            if pred(cell) {
                cells.insert((i, j));
            }
        }
    }
    cells
}

pub fn flatten_cells(count_grid: &CountGrid) -> Vec<Vec<i32>> {
    count_grid.iter().map(
        |row| row.iter().map(
            |cell| cell.neighbor_mine_count
        ).collect()
    ).collect()
}

pub fn to_string(count_grid: &CountGrid) -> String {
    let mut str = get_row_col_str(count_grid);
    for row in count_grid {
        for cell in row {
            if cell.flagged {
                str.push_str("F ");
            } else if cell.neighbor_mine_count == UNKNOWN_CELL_COUNT {
                str.push_str("- ");
            } else {
                str.push_str(&format!("{} ", cell.neighbor_mine_count));
            };
        }
        str.push('\n');
    }
    str
}


#[cfg(test)]
mod tests {
    use super::*;

    fn mine_map() -> MineMap {
        vec![
            vec![true, false, false],
            vec![true, true, false],
            vec![false, false, false],
        ]
    }

    #[test]
    fn test_reveal() {
        let mine_map = mine_map();
        let mut count_grid: CountGrid = init_count_grid(3, 3);
        println!("{}", to_string(&count_grid));
        assert_eq!(3, reveal(&mut count_grid, 0, 1, &mine_map));
        assert_eq!(1, reveal(&mut count_grid, 2, 2, &mine_map));
        println!("{}", to_string(&count_grid));

        assert_eq!(
            vec![
                vec![-1, 3, -1],
                vec![-1, -1, -1],
                vec![-1, -1, 1],
            ],
            flatten_cells(&count_grid)
        );
        let expected: HashSet<Cell> = [(0, 1), (2, 2)].into_iter().collect();
        assert_eq!(expected, revealed_cells(&count_grid));
    }

    #[should_panic]
    #[test]
    fn test_reveal_mine() {
        let mut count_grid: CountGrid = init_count_grid(3, 3);
        reveal(&mut count_grid, 1, 1, &mine_map());
    }

    #[should_panic]
    #[test]
    fn test_reveal_twice() {
        let mine_map = mine_map();
        let mut count_grid: CountGrid = init_count_grid(3, 3);
        reveal(&mut count_grid, 2, 2, &mine_map);
        reveal(&mut count_grid, 2, 2, &mine_map);
    }

    #[test]
    fn test_toggle_flag() {
        let mine_map = mine_map();
        let mut count_grid: CountGrid = init_count_grid(3, 3);
        assert!(toggle_flag(&mut count_grid, 0, 0));
        assert!(toggle_flag(&mut count_grid, 1, 1));
        assert!(!toggle_flag(&mut count_grid, 1, 1));
        reveal(&mut count_grid, 0, 2, &mine_map);
        // Revealed cells can't be flagged.
        assert!(!toggle_flag(&mut count_grid, 0, 2));

        let expected: HashSet<Cell> = [(0, 0)].into_iter().collect();
        assert_eq!(expected, flagged_cells(&count_grid));
        assert_eq!("nrows: 3, ncols: 3\nF - 1 \n- - - \n- - - \n", to_string(&count_grid));
    }
}
