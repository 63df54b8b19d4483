//! Lane primitives: W scalars that one arithmetic operation treats as a unit.
//!
//! The matrix kernels only ever talk to the [`Lanes`] trait, so the same
//! multiply/inverse code runs on the portable array backend or on real
//! vector registers.
//!
//! Available backends:
//! - `portable`: [`Packet<T, W>`], an array of W lanes for `f32`/`f64`, any W
//! - `hardware`: `wide::f32x4`, `f32x8`, `f64x2`, `f64x4` (feature `wide`)

#[cfg(feature = "wide")]
pub mod hardware;
pub mod portable;

pub use portable::Packet;

use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Lane-parallel arithmetic capability consumed by the matrix kernels.
///
/// Every operation is lane-wise: lane `i` of the result only depends on lane
/// `i` of the inputs. Division by a zero lane produces whatever IEEE-754
/// gives for that lane (±inf or NaN) and leaves the other lanes alone.
pub trait Lanes:
    Copy
    + Debug
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
{
    type Scalar: Copy + Debug + Default + PartialEq + Send + Sync + 'static;

    /// Number of lanes.
    const WIDTH: usize;

    /// Broadcast `value` into every lane.
    fn splat(value: Self::Scalar) -> Self;

    fn zero() -> Self;

    fn one() -> Self;

    /// Read `WIDTH` scalars from the front of `src`, lane 0 first.
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than `WIDTH` scalars.
    fn load_unaligned(src: &[Self::Scalar]) -> Self;

    /// Write the lanes to the front of `dst` in lane-index order.
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds fewer than `WIDTH` scalars.
    fn store_unaligned(self, dst: &mut [Self::Scalar]);

    /// Value of lane `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= WIDTH`.
    fn extract(self, index: usize) -> Self::Scalar;

    /// `self * m + a`, fused where the backend can.
    #[inline(always)]
    fn mul_add(self, m: Self, a: Self) -> Self {
        self * m + a
    }

    #[inline(always)]
    fn load_aligned<const N: usize>(src: &AlignedLanes<Self::Scalar, N>) -> Self {
        Self::load_unaligned(&src.0)
    }

    #[inline(always)]
    fn store_aligned<const N: usize>(self, dst: &mut AlignedLanes<Self::Scalar, N>) {
        self.store_unaligned(&mut dst.0);
    }
}

/// Flat scalar buffer aligned to 64 bytes, enough for any register width
/// up to AVX-512.
#[repr(C, align(64))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignedLanes<S, const N: usize>(pub [S; N]);

impl<S: Copy + Default, const N: usize> AlignedLanes<S, N> {
    pub fn new() -> Self {
        Self([S::default(); N])
    }
}

impl<S: Copy + Default, const N: usize> Default for AlignedLanes<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, const N: usize> AlignedLanes<S, N> {
    pub fn as_slice(&self) -> &[S] {
        &self.0
    }
}
