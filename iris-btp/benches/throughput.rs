use criterion::{black_box, criterion_group, criterion_main, Criterion};
use iris_btp::scoring::score;
use iris_btp::transform::transform;
use iris_btp_common::{BitMatrix, BloomFilterParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Transform and scoring throughput at the reference geometry: 512x20 codes,
/// 32x10 blocks, 1024-bit filters.
fn bench_engines(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let params = BloomFilterParams::default();
    let code_a = BitMatrix::random_rng(&mut rng, 512, 20);
    let code_b = BitMatrix::random_rng(&mut rng, 512, 20);

    c.bench_function("transform_512x20", |b| {
        b.iter(|| transform(black_box(&code_a), &params).unwrap())
    });

    let template_a = transform(&code_a, &params).unwrap();
    let template_b = transform(&code_b, &params).unwrap();
    c.bench_function("score_32_blocks", |b| {
        b.iter(|| score(black_box(&template_a), black_box(&template_b)).unwrap())
    });
}

criterion_group! {benches, bench_engines}
criterion_main!(benches);
