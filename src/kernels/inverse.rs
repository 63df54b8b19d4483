//! Batched general 4x4 inverse via cofactors.

use crate::lanes::Lanes;
use crate::matrix::MatrixPacket;

/// Inverts every lane of `m` with the adjugate method.
///
/// Per lane: the 16 cofactors are built from 2x2 minors of the top and
/// bottom row pairs, the determinant is the first row of `m` dotted with
/// its cofactors, and the output is the transposed cofactor matrix scaled
/// by `1 / det`.
///
/// There is no singularity check. A lane whose determinant is zero comes
/// back as ±inf/NaN while the other lanes are unaffected; callers that
/// care inspect the result (e.g. `is_finite`) themselves.
///
/// # Example
///
/// ```
/// use matpacket::{Lanes, MatrixPacketN, Packet};
///
/// let two = Packet::<f32, 4>::splat(2.0);
/// let m = MatrixPacketN::<4>::diagonal(two, two, two, Packet::one());
/// let inv = matpacket::inverse(&m);
///
/// let mut buf = [0.0f32; 4];
/// inv.c0x().store_unaligned(&mut buf);
/// assert_eq!(buf[0], 0.5);
/// ```
pub fn inverse<P: Lanes>(m: &MatrixPacket<P>) -> MatrixPacket<P> {
    // a{row}{col}
    let a = |row: usize, col: usize| m.cells()[col * 4 + row];
    let (a00, a01, a02, a03) = (a(0, 0), a(0, 1), a(0, 2), a(0, 3));
    let (a10, a11, a12, a13) = (a(1, 0), a(1, 1), a(1, 2), a(1, 3));
    let (a20, a21, a22, a23) = (a(2, 0), a(2, 1), a(2, 2), a(2, 3));
    let (a30, a31, a32, a33) = (a(3, 0), a(3, 1), a(3, 2), a(3, 3));

    // 2x2 minors of rows 0-1
    let s0 = a00 * a11 - a10 * a01;
    let s1 = a00 * a12 - a10 * a02;
    let s2 = a00 * a13 - a10 * a03;
    let s3 = a01 * a12 - a11 * a02;
    let s4 = a01 * a13 - a11 * a03;
    let s5 = a02 * a13 - a12 * a03;

    // 2x2 minors of rows 2-3
    let t0 = a20 * a31 - a30 * a21;
    let t1 = a20 * a32 - a30 * a22;
    let t2 = a20 * a33 - a30 * a23;
    let t3 = a21 * a32 - a31 * a22;
    let t4 = a21 * a33 - a31 * a23;
    let t5 = a22 * a33 - a32 * a23;

    // cofactors k{row}{col}
    let k00 = a11 * t5 - a12 * t4 + a13 * t3;
    let k01 = a12 * t2 - a10 * t5 - a13 * t1;
    let k02 = a10 * t4 - a11 * t2 + a13 * t0;
    let k03 = a11 * t1 - a10 * t3 - a12 * t0;

    let k10 = a02 * t4 - a01 * t5 - a03 * t3;
    let k11 = a00 * t5 - a02 * t2 + a03 * t1;
    let k12 = a01 * t2 - a00 * t4 - a03 * t0;
    let k13 = a00 * t3 - a01 * t1 + a02 * t0;

    let k20 = a31 * s5 - a32 * s4 + a33 * s3;
    let k21 = a32 * s2 - a30 * s5 - a33 * s1;
    let k22 = a30 * s4 - a31 * s2 + a33 * s0;
    let k23 = a31 * s1 - a30 * s3 - a32 * s0;

    let k30 = a22 * s4 - a21 * s5 - a23 * s3;
    let k31 = a20 * s5 - a22 * s2 + a23 * s1;
    let k32 = a21 * s2 - a20 * s4 - a23 * s0;
    let k33 = a20 * s3 - a21 * s1 + a22 * s0;

    let det = a00 * k00 + a01 * k01 + a02 * k02 + a03 * k03;
    let rcp = P::one() / det;

    // adjugate: output column j is cofactor row j
    #[rustfmt::skip]
    let cells = [
        k00 * rcp, k01 * rcp, k02 * rcp, k03 * rcp,
        k10 * rcp, k11 * rcp, k12 * rcp, k13 * rcp,
        k20 * rcp, k21 * rcp, k22 * rcp, k23 * rcp,
        k30 * rcp, k31 * rcp, k32 * rcp, k33 * rcp,
    ];
    MatrixPacket::from_cells(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::multiply;
    use crate::lanes::Packet;
    use approx::assert_abs_diff_eq;

    type M4 = MatrixPacket<Packet<f32, 4>>;

    #[test]
    fn test_inverse_of_identity_is_exact() {
        let id = M4::identity();
        assert_eq!(inverse(&id), id);
    }

    #[test]
    fn test_inverse_of_uniform_scale() {
        let s = Packet::from_array([2.0f32, 4.0, 0.5, -8.0]);
        let m = M4::diagonal(s, s, s, Packet::one());
        let inv = inverse(&m);

        let expected = [0.5f32, 0.25, 2.0, -0.125];
        for lane in 0..4 {
            let cells = inv.lane_matrix(lane);
            for i in 0..16 {
                let want = match i {
                    0 | 5 | 10 => expected[lane],
                    15 => 1.0,
                    _ => 0.0,
                };
                assert_abs_diff_eq!(cells[i], want, epsilon = 1e-7);
            }
        }
    }

    #[test]
    fn test_round_trip_general_matrix() {
        // rotation about z by 90 degrees, scaled, with translation
        let cells = [
            0.0f32, 2.0, 0.0, 0.0, //
            -2.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 3.0, 0.0, //
            5.0, -1.0, 7.0, 1.0,
        ];
        let m = M4::splat_cells(cells);
        let product = multiply(&m, &inverse(&m));
        let id = M4::identity().lane_matrix(0);

        for lane in 0..4 {
            let got = product.lane_matrix(lane);
            for i in 0..16 {
                assert_abs_diff_eq!(got[i], id[i], epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_singular_lane_does_not_leak() {
        let mut m = M4::identity();
        // lane 2 gets an all-zero first row
        for col in 0..4 {
            let mut lanes = m.cell(col, 0).to_array();
            lanes[2] = 0.0;
            m.set_cell(col, 0, Packet::from_array(lanes));
        }

        let inv = inverse(&m);
        let id = M4::identity().lane_matrix(0);

        assert!(inv.lane_matrix(2).iter().any(|v| !v.is_finite()));
        for lane in [0, 1, 3] {
            assert_eq!(inv.lane_matrix(lane), id);
        }
    }
}
