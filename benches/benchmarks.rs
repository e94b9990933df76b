use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use slh_mask::address::Address;
use slh_mask::chain::{wots_chain, ChainState};
use slh_mask::keccak::permute;

fn permutation_benchmarks(c: &mut Criterion) {
    let mut g = c.benchmark_group("permutation");
    g.sample_size(1_000);
    g.throughput(Throughput::Bytes(200));

    g.bench_function("masked-output", |b| {
        let input = [0u64; 75];
        let mut output = [0u64; 75];
        b.iter(|| permute(&input, &mut output, true))
    });
    g.bench_function("unmasked-output", |b| {
        let input = [0u64; 75];
        let mut output = [0u64; 4];
        b.iter(|| permute(&input, &mut output, false))
    });

    g.finish();
}

fn chain_benchmarks(c: &mut Criterion) {
    let mut g = c.benchmark_group("chain");
    g.sample_size(1_000);

    let pub_seed = [0u8; 32];
    let shares = [[1u8; 32], [2u8; 32], [3u8; 32]];

    g.bench_function("wots-chain-w16", |b| {
        let mut addr = Address::new();
        b.iter(|| wots_chain(&pub_seed, &mut addr, 0, 16, Some(3), &shares))
    });
    g.bench_function("chain-state-setup", |b| {
        b.iter(|| ChainState::setup(&pub_seed, &shares, &Address::new()))
    });

    g.finish();
}

criterion_group!(benches, permutation_benchmarks, chain_benchmarks);
criterion_main!(benches);
