//! # Source Registry Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Derivation | Key and child address derivation |
//! | Codec | Deploy frame to and from bag-of-cells bytes |
//! | State machine | `apply` on a deploy |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use shared_cells::CellBuilder;
use source_registry::prelude::*;
use std::sync::Arc;

const HASH: &str = "E5ny0LU1Q9ESmmVUNa8uFOyuN3JDbvHgsURxUtdETnI=";

fn child_code() -> ArcCell {
    let mut b = CellBuilder::new();
    b.store_bytes(b"source-item").unwrap();
    Arc::new(b.build().unwrap())
}

fn bench_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("derivation");
    let registry = MsgAddress::new(0, [0xC0; 32]);
    let code = child_code();
    let key = derive_source_key("my verifier", HASH).unwrap();

    group.bench_function("source_key", |b| {
        b.iter(|| derive_source_key(black_box("my verifier"), black_box(HASH)))
    });
    group.bench_function("child_address", |b| {
        b.iter(|| derive_child_address(black_box(&key), &registry, &code))
    });
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    for len in [16usize, 256, 2048] {
        let pointer = vec![b'a'; len];
        let message = RegistryMessage::deploy_source(1, "my verifier", HASH, &pointer).unwrap();
        let bytes = message.to_boc().unwrap();

        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("encode_deploy", len), &message, |b, m| {
            b.iter(|| m.to_boc())
        });
        group.bench_with_input(BenchmarkId::new("decode_deploy", len), &bytes, |b, bytes| {
            b.iter(|| RegistryMessage::from_boc(black_box(bytes)))
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let registry = MsgAddress::new(0, [0xC0; 32]);
    let state = RegistryState {
        admin: TEST_ADMIN,
        verifier_source: TEST_VERIFIER_SOURCE,
        min_fee: Coins::from_nano(65_000_000),
        max_fee: Coins::from_units(1),
        child_code: child_code(),
    };
    let ctx = MessageContext::new(TEST_VERIFIER_SOURCE, Coins::from_nano(500_000_000), registry);
    let message =
        RegistryMessage::deploy_source(1, "my verifier", HASH, b"https://x/y.json").unwrap();

    c.bench_function("apply_deploy", |b| {
        b.iter(|| apply(black_box(&state), &ctx, &message))
    });
}

criterion_group!(benches, bench_derivation, bench_codec, bench_apply);
criterion_main!(benches);
