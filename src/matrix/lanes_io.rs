//! Moving matrices between lanes and flat scalar storage.
//!
//! Scalar matrices are `[S; 16]` in column-major order, the same cell order
//! as [`MatrixPacket::from_cells`].

use super::MatrixPacket;
use crate::error::{KernelError, Result};
use crate::lanes::Lanes;

impl<P: Lanes> MatrixPacket<P> {
    /// Gather exactly `WIDTH` matrices; `matrices[i]` lands in lane `i`.
    ///
    /// # Example
    ///
    /// ```
    /// use matpacket::MatrixPacketN;
    ///
    /// let mut scale = [0.0f32; 16];
    /// scale[0] = 2.0; scale[5] = 2.0; scale[10] = 2.0; scale[15] = 1.0;
    /// let identity = MatrixPacketN::<2>::identity().lane_matrix(0);
    ///
    /// let m = MatrixPacketN::<2>::from_matrices(&[identity, scale]).unwrap();
    /// assert_eq!(m.lane_matrix(1), scale);
    /// assert!(MatrixPacketN::<2>::from_matrices(&[identity]).is_err());
    /// ```
    pub fn from_matrices(matrices: &[[P::Scalar; 16]]) -> Result<Self> {
        if matrices.len() != P::WIDTH {
            return Err(KernelError::LaneCountMismatch {
                expected: P::WIDTH,
                actual: matrices.len(),
            });
        }
        let mut scratch = vec![P::Scalar::default(); P::WIDTH];
        Ok(Self::gather_padded(matrices, &[P::Scalar::default(); 16], &mut scratch))
    }

    /// Gather up to `WIDTH` matrices, filling the remaining lanes with `pad`.
    ///
    /// `scratch` must hold at least `WIDTH` scalars; it is reused across the
    /// 16 cells so a caller looping over chunks allocates once.
    pub(crate) fn gather_padded(
        matrices: &[[P::Scalar; 16]],
        pad: &[P::Scalar; 16],
        scratch: &mut [P::Scalar],
    ) -> Self {
        debug_assert!(matrices.len() <= P::WIDTH);
        Self::from_cells(std::array::from_fn(|cell| {
            for (lane, slot) in scratch[..P::WIDTH].iter_mut().enumerate() {
                *slot = matrices.get(lane).map_or(pad[cell], |m| m[cell]);
            }
            P::load_unaligned(&scratch[..])
        }))
    }

    /// Scatter the first `out.len()` lanes back into scalar matrices.
    pub(crate) fn scatter_into(&self, out: &mut [[P::Scalar; 16]], scratch: &mut [P::Scalar]) {
        debug_assert!(out.len() <= P::WIDTH);
        for (cell, lanes) in self.cells().iter().enumerate() {
            lanes.store_unaligned(scratch);
            for (lane, m) in out.iter_mut().enumerate() {
                m[cell] = scratch[lane];
            }
        }
    }

    /// The matrix held in lane `lane`, column-major.
    ///
    /// # Panics
    ///
    /// Panics if `lane >= WIDTH`.
    pub fn lane_matrix(&self, lane: usize) -> [P::Scalar; 16] {
        assert!(lane < P::WIDTH, "lane {lane} out of range for width {}", P::WIDTH);
        self.cells.map(|c| c.extract(lane))
    }

    /// Every lane as its own column-major matrix.
    pub fn to_matrices(&self) -> Vec<[P::Scalar; 16]> {
        let mut out = vec![[P::Scalar::default(); 16]; P::WIDTH];
        let mut scratch = vec![P::Scalar::default(); P::WIDTH];
        self.scatter_into(&mut out, &mut scratch);
        out
    }

    /// Write the 16 cells as one SoA stream: cell `k` occupies
    /// `dst[k * WIDTH..(k + 1) * WIDTH]`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds fewer than `16 * WIDTH` scalars.
    pub fn store_cells(&self, dst: &mut [P::Scalar]) {
        assert!(
            dst.len() >= 16 * P::WIDTH,
            "SoA buffer: expected at least {} scalars, got {}",
            16 * P::WIDTH,
            dst.len()
        );
        for (cell, lanes) in self.cells().iter().enumerate() {
            lanes.store_unaligned(&mut dst[cell * P::WIDTH..]);
        }
    }

    /// Inverse of [`store_cells`](Self::store_cells).
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than `16 * WIDTH` scalars.
    pub fn load_cells(src: &[P::Scalar]) -> Self {
        assert!(
            src.len() >= 16 * P::WIDTH,
            "SoA buffer: expected at least {} scalars, got {}",
            16 * P::WIDTH,
            src.len()
        );
        Self::from_cells(std::array::from_fn(|cell| {
            P::load_unaligned(&src[cell * P::WIDTH..])
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanes::Packet;

    type M3 = MatrixPacket<Packet<f32, 3>>;

    fn numbered(base: f32) -> [f32; 16] {
        std::array::from_fn(|i| base + i as f32)
    }

    #[test]
    fn test_gather_then_lane_matrix() {
        let mats = [numbered(0.0), numbered(100.0), numbered(200.0)];
        let m = M3::from_matrices(&mats).unwrap();

        for (lane, expected) in mats.iter().enumerate() {
            assert_eq!(&m.lane_matrix(lane), expected);
        }
        assert_eq!(m.c1y().to_array(), [5.0, 105.0, 205.0]);
        assert_eq!(m.to_matrices(), mats.to_vec());
    }

    #[test]
    fn test_wrong_lane_count_is_an_error() {
        let err = M3::from_matrices(&[numbered(0.0); 4]).unwrap_err();
        assert_eq!(
            err,
            KernelError::LaneCountMismatch {
                expected: 3,
                actual: 4
            }
        );
    }

    #[test]
    fn test_gather_padded_fills_missing_lanes() {
        let pad = M3::identity().lane_matrix(0);
        let mut scratch = [0.0f32; 3];
        let m = M3::gather_padded(&[numbered(1.0)], &pad, &mut scratch);

        assert_eq!(m.lane_matrix(0), numbered(1.0));
        assert_eq!(m.lane_matrix(1), pad);
        assert_eq!(m.lane_matrix(2), pad);
    }

    #[test]
    fn test_scatter_into_partial_output() {
        let m = M3::from_matrices(&[numbered(0.0), numbered(10.0), numbered(20.0)]).unwrap();
        let mut out = [[0.0f32; 16]; 2];
        let mut scratch = [0.0f32; 3];
        m.scatter_into(&mut out, &mut scratch);
        assert_eq!(out, [numbered(0.0), numbered(10.0)]);
    }

    #[test]
    fn test_soa_stream_layout() {
        let m = M3::from_matrices(&[numbered(0.0), numbered(10.0), numbered(20.0)]).unwrap();
        let mut soa = vec![0.0f32; 48];
        m.store_cells(&mut soa);

        // cell 2 (c0z) of lanes 0, 1, 2
        assert_eq!(&soa[6..9], &[2.0, 12.0, 22.0]);
        assert_eq!(M3::load_cells(&soa), m);
    }

    #[test]
    #[should_panic(expected = "SoA buffer")]
    fn test_store_cells_short_buffer_panics() {
        let mut soa = vec![0.0f32; 47];
        M3::identity().store_cells(&mut soa);
    }
}
