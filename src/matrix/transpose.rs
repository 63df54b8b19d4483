use super::{MatrixPacket, cell_index};

impl<P: Copy> MatrixPacket<P> {
    /// Transpose every lane: cell (col, row) moves to (row, col).
    ///
    /// Pure cell shuffling, no arithmetic, so it is exact for any content.
    ///
    /// # Example
    ///
    /// ```
    /// use matpacket::{Lanes, MatrixPacketN};
    ///
    /// let mut m = MatrixPacketN::<2>::identity();
    /// *m.c3x_mut() = matpacket::Packet::splat(7.0);   // translation x
    ///
    /// let t = m.transpose();
    /// assert_eq!(t.c0w().extract(1), 7.0);
    /// assert_eq!(t.c3x().extract(1), 0.0);
    /// ```
    pub fn transpose(&self) -> Self {
        let src = self.cells();
        MatrixPacket::from_cells(std::array::from_fn(|i| {
            let (col, row) = (i / 4, i % 4);
            src[cell_index(row, col)]
        }))
    }
}

#[cfg(test)]
mod tests {
    use crate::lanes::{Lanes, Packet};
    use crate::matrix::MatrixPacket;

    #[test]
    fn test_transpose_twice_is_identity_op() {
        let m = MatrixPacket::<Packet<f64, 2>>::from_cells(std::array::from_fn(|i| {
            Packet::from_array([i as f64, -(i as f64)])
        }));
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn test_transpose_swaps_per_lane() {
        let m = MatrixPacket::<Packet<f32, 4>>::splat_cells(std::array::from_fn(|i| i as f32));
        let t = m.transpose();
        for col in 0..4 {
            for row in 0..4 {
                assert_eq!(t.cell(col, row).extract(0), m.cell(row, col).extract(0));
            }
        }
    }
}
