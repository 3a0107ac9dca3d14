//! Benchmarks for map generation and the simulation step.
//!
//! The simulation step is the hot path of both the interactive game and
//! surveys.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use tilewar::survey::{play_autonomous, run_survey};
use tilewar::{Difficulty, GameConfig, GameState, Shape};

fn large_config() -> GameConfig {
    GameConfig {
        seed: 42,
        width: 60,
        height: 40,
        shape: Shape::Rect,
        difficulty: Difficulty::Hard,
        autopilot_controlled: true,
        ..GameConfig::default()
    }
}

fn bench_new_game(c: &mut Criterion) {
    let config = GameConfig::default();
    c.bench_function("new_game_21x21", |b| {
        b.iter(|| black_box(GameState::new(black_box(&config))));
    });

    let config = large_config();
    c.bench_function("new_game_60x40", |b| {
        b.iter(|| black_box(GameState::new(black_box(&config))));
    });
}

fn bench_advance(c: &mut Criterion) {
    let config = GameConfig {
        autopilot_controlled: true,
        ..GameConfig::default()
    };
    let Ok(start) = GameState::new(&config) else {
        return;
    };
    c.bench_function("advance_100_steps_21x21", |b| {
        b.iter(|| {
            let mut game = start.clone();
            for _ in 0..100 {
                game.advance();
            }
            black_box(game.tick)
        });
    });

    let Ok(start) = GameState::new(&large_config()) else {
        return;
    };
    c.bench_function("advance_100_steps_60x40", |b| {
        b.iter(|| {
            let mut game = start.clone();
            for _ in 0..100 {
                game.advance();
            }
            black_box(game.tick)
        });
    });
}

fn bench_autonomous_game(c: &mut Criterion) {
    let config = GameConfig::default();
    let mut group = c.benchmark_group("autonomous");
    group.sample_size(10);
    group.bench_function("single_game", |b| {
        b.iter(|| black_box(play_autonomous(black_box(&config), 2000)));
    });
    group.bench_function("survey_8_games", |b| {
        b.iter(|| black_box(run_survey(black_box(&config), 8, 2000)));
    });
    group.finish();
}

criterion_group!(benches, bench_new_game, bench_advance, bench_autonomous_game);
criterion_main!(benches);
