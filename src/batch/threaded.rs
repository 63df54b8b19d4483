//! Multi-threaded batch drivers.

use super::{check_len, inverse_batch, multiply_batch};
use crate::error::{KernelError, Result};
use crate::lanes::Lanes;
use std::thread;

/// Same as [`multiply_batch`] but splits the batch across threads.
///
/// Each thread gets a contiguous run of matrices sized to a multiple of the
/// lane width, so only the final run ever needs tail padding. Thread count
/// adapts to batch size:
/// - < 4096 matrices: 1 thread
/// - < 16384 matrices: 2 threads
/// - Otherwise: up to `num_threads`
///
/// # Errors
///
/// [`KernelError::ZeroThreads`] if `num_threads == 0`, otherwise the same
/// length checks as [`multiply_batch`].
pub fn multiply_batch_parallel<P: Lanes>(
    a: &[[P::Scalar; 16]],
    b: &[[P::Scalar; 16]],
    out: &mut [[P::Scalar; 16]],
    num_threads: usize,
) -> Result<()> {
    if num_threads == 0 {
        return Err(KernelError::ZeroThreads);
    }
    check_len("b", a.len(), b.len())?;
    check_len("out", a.len(), out.len())?;

    let threads = choose_thread_count(a.len(), P::WIDTH, num_threads);
    if threads == 1 {
        return multiply_batch::<P>(a, b, out);
    }

    for_each_run::<P::Scalar, _>(out, run_length(a.len(), P::WIDTH, threads), |start, run| {
        let end = start + run.len();
        multiply_batch::<P>(&a[start..end], &b[start..end], run)
    })
}

/// Same as [`inverse_batch`] but splits the batch across threads.
///
/// # Errors
///
/// [`KernelError::ZeroThreads`] if `num_threads == 0`, otherwise the same
/// length check as [`inverse_batch`].
pub fn inverse_batch_parallel<P: Lanes>(
    m: &[[P::Scalar; 16]],
    out: &mut [[P::Scalar; 16]],
    num_threads: usize,
) -> Result<()> {
    if num_threads == 0 {
        return Err(KernelError::ZeroThreads);
    }
    check_len("out", m.len(), out.len())?;

    let threads = choose_thread_count(m.len(), P::WIDTH, num_threads);
    if threads == 1 {
        return inverse_batch::<P>(m, out);
    }

    for_each_run::<P::Scalar, _>(out, run_length(m.len(), P::WIDTH, threads), |start, run| {
        inverse_batch::<P>(&m[start..start + run.len()], run)
    })
}

/// Runs `f(start, run)` on scoped threads, one per `run_len`-sized piece of
/// `out`. The first error wins; a panicking worker is re-raised here.
fn for_each_run<S, F>(out: &mut [[S; 16]], run_len: usize, f: F) -> Result<()>
where
    S: Send,
    F: Fn(usize, &mut [[S; 16]]) -> Result<()> + Sync,
{
    log::debug!(
        "splitting {} matrices into runs of {} across {} threads",
        out.len(),
        run_len,
        out.len().div_ceil(run_len)
    );

    thread::scope(|scope| {
        let f = &f;
        let handles: Vec<_> = out
            .chunks_mut(run_len)
            .enumerate()
            .map(|(i, run)| scope.spawn(move || f(i * run_len, run)))
            .collect();

        let mut result = Ok(());
        for handle in handles {
            match handle.join() {
                Ok(r) => {
                    if result.is_ok() {
                        result = r;
                    }
                }
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
        result
    })
}

fn run_length(count: usize, width: usize, threads: usize) -> usize {
    count.div_ceil(threads).next_multiple_of(width)
}

fn choose_thread_count(count: usize, width: usize, max_threads: usize) -> usize {
    const SINGLE_THREAD_THRESHOLD: usize = 4_096;
    const TWO_THREAD_THRESHOLD: usize = 16_384;
    // below this many packets per thread, spawn cost dominates
    const MIN_PACKETS_PER_THREAD: usize = 256;

    let optimal_threads = if count < SINGLE_THREAD_THRESHOLD {
        1
    } else if count < TWO_THREAD_THRESHOLD {
        2
    } else {
        max_threads
    };

    let threads_by_packets = (count / (width * MIN_PACKETS_PER_THREAD)).max(1);

    optimal_threads.min(threads_by_packets).min(max_threads)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_batches_stay_single_threaded() {
        assert_eq!(choose_thread_count(100, 4, 8), 1);
        assert_eq!(choose_thread_count(4_095, 4, 8), 1);
    }

    #[test]
    fn test_thread_count_scales_with_batch() {
        assert_eq!(choose_thread_count(8_192, 4, 8), 2);
        assert_eq!(choose_thread_count(1 << 20, 4, 8), 8);
        assert_eq!(choose_thread_count(1 << 20, 4, 3), 3);
        // wide lanes mean fewer packets, so fewer threads are worth it
        assert_eq!(choose_thread_count(20_000, 16, 8), 4);
    }

    #[test]
    fn test_runs_are_lane_aligned() {
        assert_eq!(run_length(1000, 8, 3), 336);
        assert_eq!(run_length(1024, 4, 4), 256);
        assert_eq!(run_length(10, 4, 4), 4);
    }
}
