use criterion::{black_box, criterion_group, criterion_main, Criterion};
use grouppay_engine::aggregation::aggregator::BalanceAggregator;
use grouppay_engine::settlement::optimizer::SettlementOptimizer;
use grouppay_engine::simulation::generator::{generate_random_group, GroupConfig};

fn bench_group(c: &mut Criterion, name: &str, participant_count: usize, expense_count: usize) {
    let config = GroupConfig {
        participant_count,
        expense_count,
        ..Default::default()
    };
    let snapshot = generate_random_group(&config);
    let balances =
        match BalanceAggregator::compute_balances(&config.currency, &snapshot.expenses, &snapshot.shares) {
            Ok(balances) => balances,
            Err(e) => panic!("generated group failed validation: {e}"),
        };

    c.bench_function(&format!("aggregate_{name}"), |b| {
        b.iter(|| {
            BalanceAggregator::compute_balances(
                black_box(&config.currency),
                black_box(&snapshot.expenses),
                black_box(&snapshot.shares),
            )
        })
    });

    c.bench_function(&format!("optimize_{name}"), |b| {
        b.iter(|| SettlementOptimizer::optimize_settlements(black_box(&balances)))
    });
}

fn bench_settlement_10_participants(c: &mut Criterion) {
    bench_group(c, "10_participants", 10, 50);
}

fn bench_settlement_100_participants(c: &mut Criterion) {
    bench_group(c, "100_participants", 100, 1_000);
}

fn bench_settlement_1000_participants(c: &mut Criterion) {
    bench_group(c, "1000_participants", 1_000, 10_000);
}

criterion_group!(
    benches,
    bench_settlement_10_participants,
    bench_settlement_100_participants,
    bench_settlement_1000_participants
);
criterion_main!(benches);
