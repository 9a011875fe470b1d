//! Benchmarks comparing PairCollapseDecimator vs StrideDecimator

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pointmorph_core::{Point3f, PointCloud3f};
use pointmorph_simplification::{Decimator, PairCollapseDecimator, StrideDecimator};

fn generate_wave_cloud(size: usize) -> PointCloud3f {
    let mut points = Vec::with_capacity(size * size);
    for y in 0..size {
        for x in 0..size {
            let fx = x as f32 / (size - 1) as f32 * std::f32::consts::PI;
            let fy = y as f32 / (size - 1) as f32 * std::f32::consts::PI;
            points.push(Point3f::new(x as f32, y as f32, (fx.sin() * fy.sin()) * 2.0));
        }
    }
    PointCloud3f::from_points(points)
}

fn bench_decimation(c: &mut Criterion) {
    let sizes = [20, 40, 80];
    let ratios = [0.2, 0.5];

    let mut group = c.benchmark_group("decimation");

    for &size in &sizes {
        let cloud = generate_wave_cloud(size);
        let count = cloud.len();

        for &ratio in &ratios {
            let remove = (count as f32 * ratio) as usize;

            group.bench_with_input(
                BenchmarkId::new("pair_collapse", format!("{}p_r{}", count, (ratio * 100.0) as u32)),
                &(&cloud, remove),
                |b, &(cloud, remove)| {
                    let decimator = PairCollapseDecimator::new();
                    b.iter(|| {
                        let result = decimator.decimate(black_box(cloud), remove).unwrap();
                        black_box(result);
                    });
                },
            );

            group.bench_with_input(
                BenchmarkId::new("stride", format!("{}p_r{}", count, (ratio * 100.0) as u32)),
                &(&cloud, remove),
                |b, &(cloud, remove)| {
                    let decimator = StrideDecimator::new();
                    b.iter(|| {
                        let result = decimator.decimate(black_box(cloud), remove).unwrap();
                        black_box(result);
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_decimation);
criterion_main!(benches);
