use criterion::{black_box, criterion_group, criterion_main, Criterion};
use bag_pattern::core::{parse, presets, tokenize, BagGenerator};

const NESTED: &str = "[[OTS][ITS][JTS]:2]*4 (TIO)*3 [@:3]*2 [@]~";

fn bench_tokenize(c: &mut Criterion) {
    let keys = presets::standard().keys();

    c.bench_function("tokenize_nested", |b| {
        b.iter(|| tokenize(black_box(NESTED), &keys).unwrap())
    });
}

fn bench_parse(c: &mut Criterion) {
    let keys = presets::standard().keys();

    c.bench_function("parse_nested", |b| {
        b.iter(|| parse(black_box(NESTED), &keys).unwrap())
    });
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_standard_bag", |b| {
        b.iter(|| BagGenerator::standard(black_box(12345)).unwrap())
    });
}

fn bench_pick(c: &mut Criterion) {
    let mut bag = BagGenerator::standard(12345).unwrap();

    c.bench_function("pick_standard", |b| {
        b.iter(|| {
            black_box(bag.pick().unwrap().key);
        })
    });
}

fn bench_pick_nested(c: &mut Criterion) {
    let mut bag = BagGenerator::with_seed(presets::standard(), NESTED, 12345).unwrap();

    c.bench_function("pick_nested", |b| {
        b.iter(|| {
            black_box(bag.pick().unwrap().key);
        })
    });
}

fn bench_peek_window(c: &mut Criterion) {
    let mut bag = BagGenerator::standard(12345).unwrap();

    c.bench_function("peek_14", |b| {
        b.iter(|| {
            bag.pick().unwrap();
            black_box(bag.peek(14).unwrap().len());
        })
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_parse,
    bench_build,
    bench_pick,
    bench_pick_nested,
    bench_peek_window
);
criterion_main!(benches);
