use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use matpacket::batch::{inverse_batch, multiply_batch};
use matpacket::{Lanes, MatrixPacket, Packet};

fn packet_of<P: Lanes<Scalar = f32>>() -> MatrixPacket<P> {
    MatrixPacket::splat_cells([
        0.0, 2.0, 0.0, 0.0, //
        -2.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 3.0, 0.0, //
        5.0, -1.0, 7.0, 1.0,
    ])
}

fn bench_kernels(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel");

    let m4 = packet_of::<Packet<f32, 4>>();
    group.throughput(Throughput::Elements(4));
    group.bench_function("multiply/portable_x4", |b| {
        b.iter(|| matpacket::multiply(black_box(&m4), black_box(&m4)))
    });
    group.bench_function("inverse/portable_x4", |b| {
        b.iter(|| matpacket::inverse(black_box(&m4)))
    });

    let m8 = packet_of::<Packet<f32, 8>>();
    group.throughput(Throughput::Elements(8));
    group.bench_function("multiply/portable_x8", |b| {
        b.iter(|| matpacket::multiply(black_box(&m8), black_box(&m8)))
    });
    group.bench_function("inverse/portable_x8", |b| {
        b.iter(|| matpacket::inverse(black_box(&m8)))
    });

    #[cfg(feature = "wide")]
    {
        let w8 = packet_of::<wide::f32x8>();
        group.bench_function("multiply/wide_f32x8", |b| {
            b.iter(|| matpacket::multiply(black_box(&w8), black_box(&w8)))
        });
        group.bench_function("inverse/wide_f32x8", |b| {
            b.iter(|| matpacket::inverse(black_box(&w8)))
        });
    }

    group.finish();
}

fn bench_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let cell = packet_of::<Packet<f32, 1>>().lane_matrix(0);

    for count in [1_000usize, 10_000, 100_000] {
        let a = vec![cell; count];
        let mut out = vec![[0.0f32; 16]; count];
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("multiply_x8", count), &a, |b, a| {
            b.iter(|| multiply_batch::<Packet<f32, 8>>(black_box(a), black_box(a), &mut out))
        });
        group.bench_with_input(BenchmarkId::new("inverse_x8", count), &a, |b, a| {
            b.iter(|| inverse_batch::<Packet<f32, 8>>(black_box(a), &mut out))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kernels, bench_batches);
criterion_main!(benches);
