//! Batched 4x4 matrices in structure-of-arrays form.
//!
//! A [`MatrixPacket`] holds W independent column-major 4x4 matrices. Each of
//! its 16 cells is one lane packet: cell `c1z` is "column 1, row z" of every
//! matrix in the batch, with lane `i` belonging to matrix `i`.

pub mod lanes_io;
pub mod transpose;

use crate::lanes::Lanes;

/// Flat cell index for (column, row), both in `0..4`.
#[inline(always)]
pub const fn cell_index(col: usize, row: usize) -> usize {
    col * 4 + row
}

/// W column-major 4x4 matrices packed lane-parallel.
///
/// Nothing about the content is enforced: a packet can hold singular,
/// non-orthogonal or non-finite matrices.
///
/// # Example
///
/// ```
/// use matpacket::{Lanes, MatrixPacketN};
///
/// let id = MatrixPacketN::<4>::identity();
/// let res = matpacket::multiply(&id, &id);
///
/// let mut buf = [0.0f32; 4];
/// res.c0x().store_unaligned(&mut buf);
/// assert_eq!(buf[0], 1.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatrixPacket<P> {
    cells: [P; 16],
}

macro_rules! named_cells {
    ($($get:ident, $get_mut:ident => ($col:expr, $row:expr);)*) => {
        impl<P: Copy> MatrixPacket<P> {
            $(
                #[inline(always)]
                pub fn $get(&self) -> P {
                    self.cells[cell_index($col, $row)]
                }

                #[inline(always)]
                pub fn $get_mut(&mut self) -> &mut P {
                    &mut self.cells[cell_index($col, $row)]
                }
            )*
        }
    };
}

named_cells! {
    c0x, c0x_mut => (0, 0);
    c0y, c0y_mut => (0, 1);
    c0z, c0z_mut => (0, 2);
    c0w, c0w_mut => (0, 3);
    c1x, c1x_mut => (1, 0);
    c1y, c1y_mut => (1, 1);
    c1z, c1z_mut => (1, 2);
    c1w, c1w_mut => (1, 3);
    c2x, c2x_mut => (2, 0);
    c2y, c2y_mut => (2, 1);
    c2z, c2z_mut => (2, 2);
    c2w, c2w_mut => (2, 3);
    c3x, c3x_mut => (3, 0);
    c3y, c3y_mut => (3, 1);
    c3z, c3z_mut => (3, 2);
    c3w, c3w_mut => (3, 3);
}

impl<P: Copy> MatrixPacket<P> {
    /// Build from 16 cells in column-major order (`c0x, c0y, c0z, c0w, c1x, ...`).
    #[inline(always)]
    pub const fn from_cells(cells: [P; 16]) -> Self {
        Self { cells }
    }

    #[inline(always)]
    pub fn cells(&self) -> &[P; 16] {
        &self.cells
    }

    #[inline(always)]
    pub fn into_cells(self) -> [P; 16] {
        self.cells
    }

    /// Build column by column; each column is `[x, y, z, w]`.
    pub fn from_cols(cols: [[P; 4]; 4]) -> Self {
        Self {
            cells: std::array::from_fn(|i| cols[i / 4][i % 4]),
        }
    }

    /// # Panics
    ///
    /// Panics if `col` or `row` is not in `0..4`.
    #[inline(always)]
    pub fn cell(&self, col: usize, row: usize) -> P {
        assert!(col < 4 && row < 4, "cell ({col}, {row}) out of range");
        self.cells[cell_index(col, row)]
    }

    /// # Panics
    ///
    /// Panics if `col` or `row` is not in `0..4`.
    #[inline(always)]
    pub fn set_cell(&mut self, col: usize, row: usize, value: P) {
        assert!(col < 4 && row < 4, "cell ({col}, {row}) out of range");
        self.cells[cell_index(col, row)] = value;
    }

    /// Column `col` as `[x, y, z, w]`.
    pub fn col(&self, col: usize) -> [P; 4] {
        std::array::from_fn(|row| self.cell(col, row))
    }
}

impl<P: Lanes> MatrixPacket<P> {
    /// Identity in every lane.
    pub fn identity() -> Self {
        Self::diagonal(P::one(), P::one(), P::one(), P::one())
    }

    pub fn zero() -> Self {
        Self {
            cells: [P::zero(); 16],
        }
    }

    /// Diagonal matrices with `x, y, z, w` on the diagonal and zero elsewhere.
    pub fn diagonal(x: P, y: P, z: P, w: P) -> Self {
        let mut m = Self::zero();
        m.cells[cell_index(0, 0)] = x;
        m.cells[cell_index(1, 1)] = y;
        m.cells[cell_index(2, 2)] = z;
        m.cells[cell_index(3, 3)] = w;
        m
    }

    /// Broadcast one column-major scalar matrix into every lane.
    pub fn splat_cells(cells: [P::Scalar; 16]) -> Self {
        Self {
            cells: cells.map(P::splat),
        }
    }

    /// Lane-wise product `self * rhs`.
    #[inline]
    pub fn multiply(&self, rhs: &Self) -> Self {
        crate::kernels::multiply(self, rhs)
    }

    /// Lane-wise inverse. Singular lanes come back non-finite.
    #[inline]
    pub fn inverse(&self) -> Self {
        crate::kernels::inverse(self)
    }
}

impl<P: Lanes> Default for MatrixPacket<P> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<P: Lanes> std::ops::Mul for MatrixPacket<P> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        crate::kernels::multiply(&self, &rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanes::Packet;

    type M4 = MatrixPacket<Packet<f32, 4>>;

    #[test]
    fn test_identity_layout() {
        let id = M4::identity();
        for col in 0..4 {
            for row in 0..4 {
                let expected = if col == row { 1.0 } else { 0.0 };
                assert_eq!(id.cell(col, row).to_array(), [expected; 4]);
            }
        }
    }

    #[test]
    fn test_named_cells_are_column_major() {
        let m = M4::splat_cells(std::array::from_fn(|i| i as f32));
        assert_eq!(m.c0x().extract(0), 0.0);
        assert_eq!(m.c0w().extract(0), 3.0);
        assert_eq!(m.c1x().extract(0), 4.0);
        assert_eq!(m.c2y().extract(3), 9.0);
        assert_eq!(m.c3w().extract(1), 15.0);
        assert_eq!(m.col(3)[2].extract(0), 14.0);
    }

    #[test]
    fn test_field_by_field_assignment() {
        let mut m = M4::zero();
        *m.c3x_mut() = Packet::splat(5.0);
        *m.c1z_mut() = Packet::from_array([1.0, 2.0, 3.0, 4.0]);

        assert_eq!(m.cell(3, 0).to_array(), [5.0; 4]);
        assert_eq!(m.cell(1, 2).to_array(), [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(m.cells()[cell_index(1, 2)], m.c1z());
    }

    #[test]
    fn test_from_cols_matches_from_cells() {
        let cols: [[Packet<f32, 4>; 4]; 4] =
            std::array::from_fn(|c| std::array::from_fn(|r| Packet::splat((c * 4 + r) as f32)));
        let a = M4::from_cols(cols);
        let b = M4::splat_cells(std::array::from_fn(|i| i as f32));
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_cell_out_of_range_panics() {
        M4::identity().cell(4, 0);
    }
}
