use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use minimax_chess::game_state::game_state::GameState;
use minimax_chess::move_generation::move_generator::StandardRules;
use minimax_chess::search::board_scoring::{evaluate, PieceSquareScorer};
use minimax_chess::search::minimax::{minimax_search, SearchConfig};

const POSITIONS: &[(&str, &str)] = &[
    ("startpos", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
    ("kiwipete", "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"),
    ("rook_endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1"),
];

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for (name, fen) in POSITIONS {
        let game = GameState::from_fen(fen).expect("benchmark FEN should parse");
        group.bench_function(*name, |b| b.iter(|| evaluate(black_box(&game))));
    }
    group.finish();
}

fn bench_minimax(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    for (name, fen) in POSITIONS {
        let game = GameState::from_fen(fen).expect("benchmark FEN should parse");
        let maximizing = fen.split_whitespace().nth(1) == Some("w");

        for depth in 1..=2u8 {
            let config = SearchConfig::with_depth(depth);
            group.bench_with_input(BenchmarkId::new(*name, depth), &config, |b, config| {
                let mut board = game.clone();
                b.iter(|| {
                    let result = minimax_search(
                        black_box(&mut board),
                        &StandardRules,
                        &PieceSquareScorer,
                        config,
                        maximizing,
                    )
                    .expect("search should run");
                    black_box(result.best_move)
                });
            });
        }
    }

    group.finish();
}

criterion_group!(minimax_benches, bench_evaluate, bench_minimax);
criterion_main!(minimax_benches);
