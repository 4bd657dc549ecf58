//! Quantized matmul benchmarks.
//!
//! Operators: int8/int4 matmul, dot strategies, quantize-and-pack.
//! Reported throughput: FLOPs (2*N*M*K per matmul).

use std::time::Duration;

use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};

use quant_matmul_kernels::{
    dot, matmul_quant, quantize_and_pack, DotStrategy, MatrixView, PackedBits,
};

#[path = "utils.rs"]
mod utils;

fn bench_matmul_int8(c: &mut Criterion) {
    let mut group = c.benchmark_group("quant/matmul_int8");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(3));

    for &(n, k, m) in &[(64usize, 256usize, 64usize), (256, 1024, 64), (512, 4096, 16)] {
        let a_data = utils::random_code_vec(n * k);
        let b_data = utils::random_f32_vec(k * m);
        group.throughput(Throughput::Elements(utils::gemm_flops(n, m, k)));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{n}x{k}x{m}")),
            &(n, k, m),
            |bencher, _| {
                let a = MatrixView::from_slice(&a_data, n, k).unwrap();
                let b = MatrixView::from_slice(&b_data, k, m).unwrap();
                bencher.iter(|| {
                    black_box(matmul_quant(&a, &b, 8, 0.05, 128.0).unwrap());
                });
            },
        );
    }
    group.finish();
}

fn bench_matmul_int4(c: &mut Criterion) {
    let mut group = c.benchmark_group("quant/matmul_int4");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(3));

    for &(n, k, m) in &[(64usize, 256usize, 64usize), (256, 1024, 64)] {
        let a_data = utils::random_code_vec(n * k / 2);
        let b_data = utils::random_f32_vec(k * m);
        group.throughput(Throughput::Elements(utils::gemm_flops(n, m, k)));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{n}x{k}x{m}")),
            &(n, k, m),
            |bencher, _| {
                let a = MatrixView::from_slice(&a_data, n, k / 2).unwrap();
                let b = MatrixView::from_slice(&b_data, k, m).unwrap();
                bencher.iter(|| {
                    black_box(matmul_quant(&a, &b, 4, 0.1, 8.0).unwrap());
                });
            },
        );
    }
    group.finish();
}

fn bench_dot_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("quant/dot_int8");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(3));

    for &k in &[256usize, 4096, 16384] {
        let a = utils::random_code_vec(k);
        let b = utils::random_f32_vec(k);
        group.throughput(Throughput::Elements(2 * k as u64));
        group.bench_with_input(BenchmarkId::new("vector", k), &k, |bencher, &k| {
            bencher.iter(|| {
                black_box(dot(
                    DotStrategy::Vector,
                    PackedBits::Int8,
                    &a,
                    &b,
                    k,
                    1,
                    1,
                    0.05,
                    128.0,
                ));
            });
        });
        group.bench_with_input(BenchmarkId::new("scalar", k), &k, |bencher, &k| {
            bencher.iter(|| {
                black_box(dot(
                    DotStrategy::Scalar,
                    PackedBits::Int8,
                    &a,
                    &b,
                    k,
                    1,
                    1,
                    0.05,
                    128.0,
                ));
            });
        });
    }
    group.finish();
}

fn bench_quantize_and_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("quant/pack");
    group.warm_up_time(Duration::from_millis(500));
    group.measurement_time(Duration::from_secs(3));

    for &(n, k) in &[(256usize, 1024usize), (1024, 4096)] {
        let data = utils::random_f32_vec(n * k);
        group.throughput(Throughput::Elements((n * k) as u64));
        for bits in [4u32, 8] {
            group.bench_with_input(
                BenchmarkId::new(format!("int{bits}"), format!("{n}x{k}")),
                &bits,
                |bencher, &bits| {
                    let a = MatrixView::from_slice(&data, n, k).unwrap();
                    let zero_point = if bits == 4 { 8.0 } else { 128.0 };
                    bencher.iter(|| {
                        black_box(quantize_and_pack(&a, bits, 0.02, zero_point).unwrap());
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_matmul_int8,
    bench_matmul_int4,
    bench_dot_strategies,
    bench_quantize_and_pack
);
criterion_main!(benches);
