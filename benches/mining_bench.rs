//! Benchmark for block mining under both hash modes

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use cahash::algorithm::{HashProvider, Rule};
use cahash::{Block, Miner};

fn template() -> Block {
    Block::new(1, "0".repeat(64), "benchmark block", "2024-01-01T00:00:00Z")
}

fn bench_mine_reference(c: &mut Criterion) {
    let miner = Miner::new(HashProvider::reference());

    let mut group = c.benchmark_group("mine_sha256");
    for difficulty in [1usize, 2] {
        group.bench_with_input(
            BenchmarkId::from_parameter(difficulty),
            &difficulty,
            |b, &difficulty| b.iter(|| miner.mine(black_box(template()), difficulty)),
        );
    }
    group.finish();
}

fn bench_mine_cellular(c: &mut Criterion) {
    let provider = HashProvider::cellular(Rule::new(30), 128).unwrap();
    let sequential = Miner::new(provider.clone());
    let parallel = Miner::new(provider).with_threads(4);

    let mut group = c.benchmark_group("mine_cahash");
    group.sample_size(10);
    group.bench_function("sequential_d1", |b| {
        b.iter(|| sequential.mine(black_box(template()), 1))
    });
    group.bench_function("parallel_d1", |b| {
        b.iter(|| parallel.mine(black_box(template()), 1))
    });
    group.finish();
}

criterion_group!(benches, bench_mine_reference, bench_mine_cellular);
criterion_main!(benches);
