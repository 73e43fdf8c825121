//! A knowledge-based minesweeper agent.
//!
//! The agent keeps a list of [`statement::Statement`]s ("exactly n of these cells are mines"),
//! one per revealed cell, and draws conclusions from them in [`solve_state::SolveState`]:
//! cells that are certainly safe or certainly mines, plus new statements derived whenever one
//! statement's cells are a subset of another's. When nothing is certain it falls back to the
//! cell with the lowest estimated mine likelihood.
//!
//! ```
//! use minesweeper_solver::solve_state::SolveState;
//!
//! let mut solve_state = SolveState::init(8, 8);
//! solve_state.record_observation((0, 0), 0).unwrap();
//! assert_eq!(Some((0, 1)), solve_state.pick_certain_move());
//! ```
pub mod grid;
pub mod error;
pub mod statement;
pub mod solve_state;
pub mod mine_map;
pub mod count_grid;
pub mod harness;

