//! Batched 4x4 matrix product.

use crate::lanes::Lanes;
use crate::matrix::MatrixPacket;

/// Computes C = A * B independently in every lane.
///
/// Column `j` of C is A's four columns weighted by column `j` of B:
/// `C.cj_row = A.c0_row * B.cj_x + A.c1_row * B.cj_y + A.c2_row * B.cj_z + A.c3_row * B.cj_w`.
///
/// Plain multiplies and adds are used rather than `mul_add`, so multiplying
/// by an identity packet gives back the other operand bit for bit.
/// Non-finite input propagates per IEEE-754.
#[inline]
pub fn multiply<P: Lanes>(a: &MatrixPacket<P>, b: &MatrixPacket<P>) -> MatrixPacket<P> {
    let a = a.cells();
    let b = b.cells();

    // A's columns, reused by every output column
    let (a0, a1, a2, a3) = (&a[0..4], &a[4..8], &a[8..12], &a[12..16]);

    let mut c = [P::zero(); 16];
    for j in 0..4 {
        let bx = b[j * 4];
        let by = b[j * 4 + 1];
        let bz = b[j * 4 + 2];
        let bw = b[j * 4 + 3];

        c[j * 4] = a0[0] * bx + a1[0] * by + a2[0] * bz + a3[0] * bw;
        c[j * 4 + 1] = a0[1] * bx + a1[1] * by + a2[1] * bz + a3[1] * bw;
        c[j * 4 + 2] = a0[2] * bx + a1[2] * by + a2[2] * bz + a3[2] * bw;
        c[j * 4 + 3] = a0[3] * bx + a1[3] * by + a2[3] * bz + a3[3] * bw;
    }

    MatrixPacket::from_cells(c)
}
