use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use poker_arena::cards::parse_cards;
use poker_arena::config::TableConfig;
use poker_arena::engine::RoundEngine;
use poker_arena::equity;
use poker_arena::evaluator::{HoldemRanker, Ranker};
use poker_arena::hand::HoleCards;
use poker_arena::player::{Player, PlayerId};
use poker_arena::strategy::{CallingStation, StrategyHandle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn bench_rank(c: &mut Criterion) {
    let hole: HoleCards = "As Ah".parse().unwrap();
    let board = parse_cards("Ks Qs Js Ts 9s").unwrap();
    c.bench_function("holdem_rank_seven", |b| {
        b.iter(|| HoldemRanker.rank(black_box(&hole), black_box(&board)))
    });
}

fn bench_equity(c: &mut Criterion) {
    let hole: HoleCards = "Qh Jh".parse().unwrap();
    let board = parse_cards("Th 9c 2d").unwrap();
    let mut g = c.benchmark_group("equity");
    for opponents in [1usize, 3, 5] {
        g.bench_with_input(BenchmarkId::new("flop_200", opponents), &opponents, |b, &n| {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            b.iter(|| equity::estimate(&hole, &board, n, 200, &mut rng, &HoldemRanker))
        });
    }
    g.finish();
}

fn bench_hand(c: &mut Criterion) {
    let config = TableConfig::holdem(5, 10).with_decision_timeout(None);
    let mut engine = RoundEngine::new(config).unwrap().with_seed(7);
    let handles: Vec<StrategyHandle> =
        (0..6).map(|i| StrategyHandle::new(format!("s{i}"), CallingStation)).collect();
    c.bench_function("run_hand_six_calling_stations", |b| {
        b.iter(|| {
            let players =
                (0..6).map(|i| Player::new(PlayerId(i), format!("P{i}"), 1000)).collect();
            let mut state = engine.new_hand(players, 0).unwrap();
            black_box(engine.run_hand(&mut state, &handles).unwrap())
        })
    });
}

criterion_group!(benches, bench_rank, bench_equity, bench_hand);
criterion_main!(benches);
