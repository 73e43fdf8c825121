use std::collections::HashSet;

use rand::Rng;

use crate::grid::{for_each_neighbor, get, get_num_cols, get_num_rows, Cell};

/// Ground-truth representation of a game (i.e. where the mines are)
pub type MineMap = Vec<Vec<bool>>;

///
/// Generates a new nrows x ncols mine map with nmines mines
/// distributed across the map uniformly at random.
///
pub fn generate_new_mine_map(nrows: usize, ncols: usize, nmines: usize) -> MineMap {
    generate_mine_map_with_rng(&mut rand::thread_rng(), nrows, ncols, nmines)
}

/// Same as [`generate_new_mine_map`], drawing from the given rng so games can be replayed.
pub fn generate_mine_map_with_rng<R: Rng + ?Sized>(
    rng: &mut R, nrows: usize, ncols: usize, nmines: usize) -> MineMap {
    let ncells = nrows * ncols;
    if nmines > ncells {
        panic!("too many mines - mine map of size {} x {} can have at most {} mines, requested {}", nrows, ncols, ncells, nmines);
    }
    // Selection sampling over the cells in row-major order: pick cell_idx with probability
    // n_left_to_pick / n_left_to_pick_from, which yields exactly nmines uniformly chosen cells.
    let mut mine_map: MineMap = vec![vec![false; ncols]; nrows];
    let mut n_picked = 0;
    for cell_idx in 0..ncells {
        let n_left_to_pick = (nmines - n_picked) as f64;
        let n_left_to_pick_from = (ncells - cell_idx) as f64;
        if rng.gen_bool(n_left_to_pick / n_left_to_pick_from) {
            mine_map[cell_idx / ncols][cell_idx % ncols] = true;
            n_picked += 1;
        }
    }
    mine_map
}

pub fn is_mine(mine_map: &MineMap, cell: Cell) -> bool {
    let (i, j) = cell;
    *get(mine_map, i, j)
}

/// Number of mines among the (up to 8) cells surrounding i,j.
pub fn get_neighbor_mine_count(mine_map: &MineMap, i: usize, j: usize) -> usize {
    let mut count = 0;
    for_each_neighbor(mine_map, i, j, &mut |has_mine, _, _| {
        if *has_mine {
            count += 1;
        }
    });
    count
}

pub fn count_mines(mine_map: &MineMap) -> usize {
    mine_map.iter().flatten().filter(|is_mine| **is_mine).count()
}

pub fn mine_cells(mine_map: &MineMap) -> HashSet<Cell> {
    let mut mines = HashSet::new();
    for (i, row) in mine_map.iter().enumerate() {
        for (j, is_mine) in row.iter().enumerate() {
            if *is_mine {
                mines.insert((i, j));
            }
        }
    }
    mines
}

/// The game is won once every cell that isn't a mine has been revealed.
pub fn is_won(mine_map: &MineMap, revealed: &HashSet<Cell>) -> bool {
    let nsafe = get_num_rows(mine_map) * get_num_cols(mine_map) - count_mines(mine_map);
    revealed.iter().filter(|cell| !is_mine(mine_map, **cell)).count() == nsafe
}

/// Alternative win condition: the flags sit exactly on the mines.
pub fn all_mines_flagged(mine_map: &MineMap, flagged: &HashSet<Cell>) -> bool {
    mine_cells(mine_map) == *flagged
}

pub fn to_string(mine_map: &MineMap) -> String {
    let mut str = format!("nrows: {}, ncols: {}\n",
                          get_num_rows(mine_map),
                          get_num_cols(mine_map));
    for row in mine_map {
        for cell in row {
            str.push_str(if *cell { "x " } else { "- " });
        }
        str.push('\n');
    }
    str
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn validate_mine_map(mine_map: &MineMap, nrows: usize, ncols: usize, nmines: usize) {
        assert_eq!(nrows, mine_map.len());
        for row in mine_map {
            assert_eq!(ncols, row.len());
        }
        assert_eq!(nmines, count_mines(mine_map));
    }

    #[test]
    fn test_generate_small_mine_map() {
        for _ in 0..10 {
            let mine_map = generate_new_mine_map(3, 3, 3);
            println!("{}", to_string(&mine_map));
            validate_mine_map(&mine_map, 3, 3, 3);
        }
    }

    #[test]
    fn test_generate_large_mine_map() {
        for _ in 0..10 {
            let mine_map = generate_new_mine_map(40, 40, 40);
            validate_mine_map(&mine_map, 40, 40, 40);
        }
    }

    #[test]
    fn test_generate_empty_mine_map() {
        let mine_map = generate_new_mine_map(3, 3, 0);
        validate_mine_map(&mine_map, 3, 3, 0)
    }

    #[test]
    fn test_generate_full_mine_map() {
        let mine_map = generate_new_mine_map(4, 3, 12);
        validate_mine_map(&mine_map, 4, 3, 12);
    }

    #[should_panic]
    #[test]
    fn test_generate_overfull_mine_map() {
        generate_new_mine_map(4, 3, 13);
    }

    #[test]
    fn test_seeded_mine_maps_repeat() {
        let first = generate_mine_map_with_rng(&mut StdRng::seed_from_u64(5), 16, 30, 99);
        let second = generate_mine_map_with_rng(&mut StdRng::seed_from_u64(5), 16, 30, 99);
        assert_eq!(first, second);
        validate_mine_map(&first, 16, 30, 99);
    }

    #[test]
    fn test_get_neighbor_mine_count() {
        let mine_map: MineMap = vec![
            vec![true, false, false],
            vec![true, true, false],
            vec![false, false, false],
        ];
        assert_eq!(3, get_neighbor_mine_count(&mine_map, 0, 1));
        assert_eq!(2, get_neighbor_mine_count(&mine_map, 1, 1));
        assert_eq!(1, get_neighbor_mine_count(&mine_map, 2, 2));
        assert_eq!(2, get_neighbor_mine_count(&mine_map, 2, 0));
        assert!(is_mine(&mine_map, (1, 0)));
        assert!(!is_mine(&mine_map, (2, 1)));
    }

    #[test]
    fn test_win_conditions() {
        let mine_map: MineMap = vec![
            vec![true, false],
            vec![false, false],
        ];
        let mut revealed: HashSet<Cell> = [(0, 1), (1, 0)].into_iter().collect();
        assert!(!is_won(&mine_map, &revealed));
        revealed.insert((1, 1));
        assert!(is_won(&mine_map, &revealed));

        let flagged: HashSet<Cell> = [(0, 0)].into_iter().collect();
        assert!(all_mines_flagged(&mine_map, &flagged));
        assert!(!all_mines_flagged(&mine_map, &HashSet::new()));
    }
}
