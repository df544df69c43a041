use std::time::Instant;

use chess_rules::game::Match;
use chess_rules::perft::perft;
use chess_rules::piece::Color;
use chess_rules::rules::Rules;
use criterion::{criterion_group, criterion_main, Criterion};

const PERFT_BENCHMARK_PLACEMENTS_AND_DEPTHS: &[(&str, usize, &str)] = &[
    (
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
        3,
        "starting position",
    ),
    (
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
        2,
        "middlegame",
    ),
    ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8", 3, "endgame"),
];

pub fn benchmark_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.sample_size(15);

    for (placement, depth, position_name) in PERFT_BENCHMARK_PLACEMENTS_AND_DEPTHS.iter() {
        let game = Match::from_placement(placement, Color::White, Rules::default()).unwrap();
        let bench_name = format!("perft {}", position_name);

        group.bench_function(&bench_name, |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();
                let mut total_nodes = 0;

                for _ in 0..iters {
                    total_nodes += perft(&game, *depth).unwrap().tot_nodes;
                }

                let elapsed = start.elapsed();
                let nps = total_nodes as f64 / elapsed.as_secs_f64();
                println!("{} (depth {}): {:.0} nodes/second", &bench_name, depth, nps);

                elapsed
            })
        });
    }
}

criterion_group!(benches, benchmark_perft);
criterion_main!(benches);
