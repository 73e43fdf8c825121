//!
//! Common grid functions
//!

/// A (row, col) coordinate on the board.
pub type Cell = (usize, usize);

pub fn get<T>(grid: &Vec<Vec<T>>, i: usize, j: usize) -> &T {
    &grid[i][j]
}

pub fn get_mut<T>(grid: &mut Vec<Vec<T>>, i: usize, j: usize) -> &mut T {
    &mut grid[i][j]
}

pub fn get_num_rows<T>(grid: &Vec<Vec<T>>) -> usize {
    grid.len()
}

pub fn get_num_cols<T>(grid: &Vec<Vec<T>>) -> usize {
    grid.first().map_or(0, |row| row.len())
}

///
/// The 8-connected neighbors of i,j on an nrows x ncols board, clipped to the board and
/// excluding i,j itself. Returned in row-major order.
///
pub fn neighbor_coords(nrows: usize, ncols: usize, i: usize, j: usize) -> Vec<Cell> {
    let mut neighbors = Vec::with_capacity(8);
    let row_lo = i.saturating_sub(1);
    let col_lo = j.saturating_sub(1);
    let row_hi = (i + 1).min(nrows.saturating_sub(1));
    let col_hi = (j + 1).min(ncols.saturating_sub(1));
    for ni in row_lo..=row_hi {
        for nj in col_lo..=col_hi {
            if (ni, nj) != (i, j) {
                neighbors.push((ni, nj));
            }
        }
    }
    neighbors
}

pub fn get_neighbors<T>(grid: &Vec<Vec<T>>, i: usize, j: usize) -> Vec<Cell> {
    neighbor_coords(get_num_rows(grid), get_num_cols(grid), i, j)
}

pub fn for_each_neighbor<T, F>(grid: &Vec<Vec<T>>, i: usize, j: usize, f: &mut F)
where
    F: FnMut(&T, usize, usize),
{
    for (ni, nj) in get_neighbors(grid, i, j) {
        f(get(grid, ni, nj), ni, nj);
    }
}

/// Header line used by the grid printers.
pub fn get_row_col_str<T>(grid: &Vec<Vec<T>>) -> String {
    format!("nrows: {}, ncols: {}\n", get_num_rows(grid), get_num_cols(grid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_coords_interior() {
        let neighbors = neighbor_coords(8, 8, 3, 3);
        assert_eq!(
            vec![(2, 2), (2, 3), (2, 4), (3, 2), (3, 4), (4, 2), (4, 3), (4, 4)],
            neighbors
        );
    }

    #[test]
    fn test_neighbor_coords_corners() {
        assert_eq!(vec![(0, 1), (1, 0), (1, 1)], neighbor_coords(8, 8, 0, 0));
        assert_eq!(vec![(6, 6), (6, 7), (7, 6)], neighbor_coords(8, 8, 7, 7));
    }

    #[test]
    fn test_neighbor_coords_single_cell_board() {
        assert!(neighbor_coords(1, 1, 0, 0).is_empty());
    }

    #[test]
    fn test_for_each_neighbor() {
        let grid = vec![
            vec![1, 2, 3],
            vec![4, 5, 6],
        ];
        let mut sum = 0;
        for_each_neighbor(&grid, 0, 0, &mut |value, _, _| sum += *value);
        assert_eq!(2 + 4 + 5, sum);
        assert_eq!(2, get_num_rows(&grid));
        assert_eq!(3, get_num_cols(&grid));
    }
}
