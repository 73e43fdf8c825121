use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use minesweeper_solver::harness::{play_game, Difficulty};
use minesweeper_solver::mine_map::{generate_mine_map_with_rng, get_neighbor_mine_count, is_mine};
use minesweeper_solver::solve_state::SolveState;
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

// Safe cells of a seeded expert board, in row-major order.
fn corpus() -> Vec<(usize, usize, usize)> {
    let mut rng = StdRng::seed_from_u64(1337);
    let mine_map = generate_mine_map_with_rng(&mut rng, 16, 30, 99);
    let mut observations = Vec::new();
    for i in 0..16 {
        for j in 0..30 {
            if !is_mine(&mine_map, (i, j)) {
                observations.push((i, j, get_neighbor_mine_count(&mine_map, i, j)));
            }
        }
    }
    observations
}

fn bench_record_observation(c: &mut Criterion) {
    let observations = corpus();
    c.bench_function("record_observation/expert_first_rows", |bch| {
        bch.iter_batched(
            || SolveState::init(16, 30),
            |mut solve_state| {
                for &(i, j, count) in observations.iter().take(60) {
                    solve_state.record_observation((i, j), count).unwrap();
                }
                black_box(solve_state.summary())
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_full_games(c: &mut Criterion) {
    for difficulty in [Difficulty::Beginner, Difficulty::Intermediate] {
        c.bench_function(&format!("play_game/{:?}", difficulty), |bch| {
            let mut rng = StdRng::seed_from_u64(42);
            bch.iter(|| black_box(play_game(difficulty.config(), &mut rng).unwrap()))
        });
    }
}

criterion_group!(inference, bench_record_observation, bench_full_games);
criterion_main!(inference);
