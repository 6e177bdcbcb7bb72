use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use hillsweep::numerical::compression::compress_indices;

// slow outward spiral, long enough that the scan cost dominates
fn spiral(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    for i in 0..n {
        let angle = i as f64 * 0.01;
        let radius = 1.0 + i as f64 * 1e-4;
        x.push(radius * angle.cos());
        y.push(radius * angle.sin());
    }
    (x, y)
}

fn bench_compress_fine(c: &mut Criterion) {
    let (x, y) = spiral(100_000);
    c.bench_function("compress delta=1e-4", |b| {
        b.iter(|| compress_indices(black_box(&x), black_box(&y), 1e-4))
    });
}

fn bench_compress_coarse(c: &mut Criterion) {
    let (x, y) = spiral(100_000);
    c.bench_function("compress delta=5e-2", |b| {
        b.iter(|| compress_indices(black_box(&x), black_box(&y), 5e-2))
    });
}

criterion_group!(benches, bench_compress_fine, bench_compress_coarse);
criterion_main!(benches);
