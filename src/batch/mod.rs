//! Slice-level drivers over arrays of scalar matrices.
//!
//! These feed `[S; 16]` column-major matrices through the packet kernels
//! W at a time. A short final chunk is padded with identity matrices, which
//! keeps the padding lanes finite in both kernels; padding results are
//! dropped on the way out.
//!
//! Available drivers:
//! - `multiply_batch` / `inverse_batch`: single thread
//! - `threaded::multiply_batch_parallel` / `threaded::inverse_batch_parallel`

pub mod threaded;

use crate::error::{KernelError, Result};
use crate::kernels;
use crate::lanes::Lanes;
use crate::matrix::MatrixPacket;

pub(crate) fn check_len(name: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(KernelError::LengthMismatch {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}

/// `out[i] = a[i] * b[i]` for every `i`, W matrices per kernel call.
///
/// # Errors
///
/// Returns [`KernelError::LengthMismatch`] if `b` or `out` differ in length from `a`.
///
/// # Example
///
/// ```
/// use matpacket::{batch, Packet};
///
/// let mut scale = [0.0f32; 16];
/// scale[0] = 2.0; scale[5] = 2.0; scale[10] = 2.0; scale[15] = 1.0;
///
/// let a = vec![scale; 5];
/// let b = vec![scale; 5];
/// let mut out = vec![[0.0f32; 16]; 5];
///
/// batch::multiply_batch::<Packet<f32, 4>>(&a, &b, &mut out).unwrap();
/// assert_eq!(out[4][0], 4.0);
/// assert_eq!(out[4][15], 1.0);
/// ```
pub fn multiply_batch<P: Lanes>(
    a: &[[P::Scalar; 16]],
    b: &[[P::Scalar; 16]],
    out: &mut [[P::Scalar; 16]],
) -> Result<()> {
    check_len("b", a.len(), b.len())?;
    check_len("out", a.len(), out.len())?;

    let pad = MatrixPacket::<P>::identity().lane_matrix(0);
    let mut scratch = vec![P::Scalar::default(); P::WIDTH];

    for ((ca, cb), co) in a
        .chunks(P::WIDTH)
        .zip(b.chunks(P::WIDTH))
        .zip(out.chunks_mut(P::WIDTH))
    {
        if ca.len() < P::WIDTH {
            log::trace!("padding tail chunk: {} of {} lanes live", ca.len(), P::WIDTH);
        }
        let pa = MatrixPacket::<P>::gather_padded(ca, &pad, &mut scratch);
        let pb = MatrixPacket::<P>::gather_padded(cb, &pad, &mut scratch);
        kernels::multiply(&pa, &pb).scatter_into(co, &mut scratch);
    }
    Ok(())
}

/// `out[i] = inverse(m[i])` for every `i`, W matrices per kernel call.
///
/// Singular matrices produce non-finite entries in their own output slot
/// only.
///
/// # Errors
///
/// Returns [`KernelError::LengthMismatch`] if `out` differs in length from `m`.
pub fn inverse_batch<P: Lanes>(
    m: &[[P::Scalar; 16]],
    out: &mut [[P::Scalar; 16]],
) -> Result<()> {
    check_len("out", m.len(), out.len())?;

    let pad = MatrixPacket::<P>::identity().lane_matrix(0);
    let mut scratch = vec![P::Scalar::default(); P::WIDTH];

    for (cm, co) in m.chunks(P::WIDTH).zip(out.chunks_mut(P::WIDTH)) {
        if cm.len() < P::WIDTH {
            log::trace!("padding tail chunk: {} of {} lanes live", cm.len(), P::WIDTH);
        }
        let pm = MatrixPacket::<P>::gather_padded(cm, &pad, &mut scratch);
        kernels::inverse(&pm).scatter_into(co, &mut scratch);
    }
    Ok(())
}
