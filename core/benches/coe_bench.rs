use coe_core::{bitmap::BitMatrix, container::coe, dither::Dither};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn gradient(width: usize, height: usize) -> Vec<u8> {
    (0..width * height)
        .map(|i| ((i % width) * 255 / width.max(1)) as u8)
        .collect()
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("coe_write");
    for &(width, height) in &[(64, 64), (640, 480), (1920, 1080)] {
        let matrix = BitMatrix::from_fn(width, height, |x, y| (x ^ y) & 1 == 1);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &matrix,
            |b, matrix| {
                let mut out: Vec<u8> = Vec::with_capacity((width + 2) * height + 64);
                b.iter(|| {
                    out.clear();
                    coe::write(&mut out, black_box(matrix)).unwrap();
                });
            },
        );
    }
    group.finish();
}

fn bench_dither(c: &mut Criterion) {
    let (width, height) = (640, 480);
    let luma = gradient(width, height);
    c.bench_function("floyd_steinberg_640x480", |b| {
        b.iter(|| {
            BitMatrix::from_luma(width, height, black_box(&luma), Dither::FloydSteinberg).unwrap()
        })
    });
}

criterion_group!(benches, bench_write, bench_dither);
criterion_main!(benches);
