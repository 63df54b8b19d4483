//! Smoke check and throughput runner for the batched kernels.
//!
//! Environment:
//! - `MATPACKET_BATCH`: matrices per run (default 65536)
//! - `MATPACKET_ITERS`: timed iterations (default 5)
//! - `MATPACKET_THREADS`: threads for the parallel rows (default 4)
//! - `RUST_LOG`: log level, e.g. `RUST_LOG=debug`

use matpacket::batch::threaded::{inverse_batch_parallel, multiply_batch_parallel};
use matpacket::batch::{inverse_batch, multiply_batch};
use matpacket::{Lanes, MatrixPacketN, Packet};
use std::process::ExitCode;
use std::time::Instant;

struct RunnerConfig {
    batch: usize,
    iterations: usize,
    threads: usize,
}

impl RunnerConfig {
    fn from_env() -> Self {
        Self {
            batch: env_or("MATPACKET_BATCH", 65_536),
            iterations: env_or("MATPACKET_ITERS", 5).max(1),
            threads: env_or("MATPACKET_THREADS", 4).max(1),
        }
    }
}

fn env_or(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("{key}={raw:?} is not a count, using {default}");
            default
        }),
        Err(_) => default,
    }
}

type BatchFn = fn(&[[f32; 16]], &[[f32; 16]], &mut [[f32; 16]]) -> matpacket::Result<()>;

fn main() -> ExitCode {
    env_logger::init();
    let config = RunnerConfig::from_env();

    println!("=== Batched 4x4 Matrix Kernels ===\n");

    if !smoke_check() {
        return ExitCode::FAILURE;
    }

    println!(
        "\nBatch: {} matrices, {} iterations, {} threads",
        config.batch, config.iterations, config.threads
    );
    println!("{}", "-".repeat(60));

    let a = random_affine_batch(config.batch, 0x5eed);
    let b = random_affine_batch(config.batch, 0xfeed);
    let threads = config.threads;

    let mut rows: Vec<(&str, BatchFn)> = vec![
        ("mul portable x4", multiply_batch::<Packet<f32, 4>> as BatchFn),
        ("mul portable x8", multiply_batch::<Packet<f32, 8>> as BatchFn),
        ("inv portable x4", inverse_only::<Packet<f32, 4>> as BatchFn),
        ("inv portable x8", inverse_only::<Packet<f32, 8>> as BatchFn),
    ];
    #[cfg(feature = "wide")]
    rows.extend([
        ("mul wide f32x4", multiply_batch::<wide::f32x4> as BatchFn),
        ("mul wide f32x8", multiply_batch::<wide::f32x8> as BatchFn),
        ("inv wide f32x4", inverse_only::<wide::f32x4> as BatchFn),
        ("inv wide f32x8", inverse_only::<wide::f32x8> as BatchFn),
    ]);

    for (name, f) in &rows {
        match bench(&a, &b, config.iterations, *f) {
            Ok((ms, rate)) => println!("{:18} {:9.3} ms  {:8.2} M mat/s", name, ms, rate),
            Err(e) => {
                log::error!("{name} failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    let parallel = [
        ("mul x8 MT", bench_parallel(&a, &b, config.iterations, |a, b, out| {
            multiply_batch_parallel::<Packet<f32, 8>>(a, b, out, threads)
        })),
        ("inv x8 MT", bench_parallel(&a, &b, config.iterations, |m, _, out| {
            inverse_batch_parallel::<Packet<f32, 8>>(m, out, threads)
        })),
    ];
    for (name, result) in parallel {
        match result {
            Ok((ms, rate)) => println!("{:18} {:9.3} ms  {:8.2} M mat/s", name, ms, rate),
            Err(e) => {
                log::error!("{name} failed: {e}");
                return ExitCode::FAILURE;
            }
        }
    }

    println!("\nM mat/s = million matrices per second. Higher is better.\n");
    ExitCode::SUCCESS
}

/// Identity * identity and inverse(diag(2, 2, 2, 1)), read back through a
/// store of the c0x cell.
fn smoke_check() -> bool {
    let one = Packet::<f32, 4>::splat(1.0);
    let two = Packet::<f32, 4>::splat(2.0);
    let mut buf = [0.0f32; 4];

    let id = MatrixPacketN::<4>::identity();
    matpacket::multiply(&id, &id).c0x().store_unaligned(&mut buf);
    let mul_ok = buf[0] == 1.0;
    if mul_ok {
        log::info!("Id*Id passed basic check");
    } else {
        log::error!("Id*Id c0x != 1, got {}", buf[0]);
    }

    let scale = MatrixPacketN::<4>::diagonal(two, two, two, one);
    matpacket::inverse(&scale).c0x().store_unaligned(&mut buf);
    let inv_ok = buf[0] == 0.5;
    if inv_ok {
        log::info!("Inv scale passed");
    } else {
        log::error!("Inv scale c0x != 0.5, got {}", buf[0]);
    }

    println!(
        "Smoke: multiply {}, inverse {}",
        if mul_ok { "ok" } else { "FAILED" },
        if inv_ok { "ok" } else { "FAILED" }
    );
    mul_ok && inv_ok
}

/// [`inverse_batch`] with the unused second operand of a [`BatchFn`].
fn inverse_only<P: Lanes<Scalar = f32>>(
    m: &[[f32; 16]],
    _: &[[f32; 16]],
    out: &mut [[f32; 16]],
) -> matpacket::Result<()> {
    inverse_batch::<P>(m, out)
}

fn bench(
    a: &[[f32; 16]],
    b: &[[f32; 16]],
    iterations: usize,
    f: BatchFn,
) -> matpacket::Result<(f64, f64)> {
    bench_parallel(a, b, iterations, f)
}

/// Same timing loop as [`bench`], for closures that capture a thread count.
fn bench_parallel<F>(
    a: &[[f32; 16]],
    b: &[[f32; 16]],
    iterations: usize,
    f: F,
) -> matpacket::Result<(f64, f64)>
where
    F: Fn(&[[f32; 16]], &[[f32; 16]], &mut [[f32; 16]]) -> matpacket::Result<()>,
{
    let mut out = vec![[0.0f32; 16]; a.len()];

    // Warmup
    f(a, b, &mut out)?;

    let mut total = 0.0;
    for _ in 0..iterations {
        let start = Instant::now();
        f(a, b, &mut out)?;
        total += start.elapsed().as_secs_f64();
    }

    let avg = total / iterations as f64;
    let rate = a.len() as f64 / avg / 1e6;
    Ok((avg * 1000.0, rate))
}

/// Scale-rotate-translate matrices from a fixed-seed LCG, always invertible.
fn random_affine_batch(count: usize, seed: u64) -> Vec<[f32; 16]> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 40) as f32) / (1u64 << 24) as f32
    };

    (0..count)
        .map(|_| {
            let angle = next() * std::f32::consts::TAU;
            let scale = 0.5 + next() * 2.0;
            let (sin, cos) = angle.sin_cos();
            [
                cos * scale, sin * scale, 0.0, 0.0,
                -sin * scale, cos * scale, 0.0, 0.0,
                0.0, 0.0, scale, 0.0,
                next() * 10.0, next() * 10.0, next() * 10.0, 1.0,
            ]
        })
        .collect()
}
