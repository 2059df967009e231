use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mandel_core::{Complex, Size, ViewParameters};
use mandel_render::{ParallelRenderer, RenderMode, Renderer};

criterion_main!(benches);
criterion_group!(benches, bench_backends, bench_multithread);

fn view() -> ViewParameters {
    ViewParameters::new(
        256,
        3.0,
        0.0,
        Complex::new(-0.5, 0.0),
        Size {
            width: 320,
            height: 240,
        },
    )
}

/// Benchmark each backend on the same view.
pub fn bench_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("backends");
    let params = view();
    // Count pixels:
    group.throughput(criterion::Throughput::Elements(params.size().pixels() as u64));
    // Don't spend too long preparing:
    group.warm_up_time(Duration::from_secs(1));

    for mode in RenderMode::ALL {
        let mut renderer = mode.renderer().unwrap();
        group.bench_with_input(BenchmarkId::new("draw", mode), &params, |b, input| {
            b.iter(|| renderer.draw(black_box(input)).unwrap())
        });
    }
    group.finish();
}

/// Benchmark the parallel backend across worker counts.
pub fn bench_multithread(c: &mut Criterion) {
    let mut group = c.benchmark_group("multithreading-base");
    let params = view();
    group.throughput(criterion::Throughput::Elements(params.size().pixels() as u64));
    group.warm_up_time(Duration::from_secs(1));

    // Count up powers of two:
    let worker_range = (0..).map(|x| 1 << x).take_while({
        let x = num_cpus::get().next_power_of_two();
        move |y| (*y <= x)
    });
    for workers in worker_range {
        let mut renderer = ParallelRenderer::with_workers(workers).unwrap();
        group.bench_with_input(BenchmarkId::new("parallel", workers), &params, |b, input| {
            b.iter(|| renderer.draw(black_box(input)).unwrap())
        });
    }
    group.finish();
}
