//! Portable lane backend: a plain array of W scalars.
//!
//! Works for any width and on any target. The compiler usually
//! auto-vectorizes the per-lane loops for W = 4/8 on x86_64 and aarch64.

use super::Lanes;
use std::array;
use std::ops::{Add, Div, Mul, Sub};

/// W lanes of scalar `T`.
///
/// # Example
///
/// ```
/// use matpacket::{Lanes, Packet};
///
/// let a = Packet::from_array([1.0f32, 2.0, 3.0, 4.0]);
/// let b = Packet::<f32, 4>::splat(10.0);
///
/// let mut out = [0.0f32; 4];
/// (a * b).store_unaligned(&mut out);
/// assert_eq!(out, [10.0, 20.0, 30.0, 40.0]);
/// ```
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Packet<T, const W: usize> {
    lanes: [T; W],
}

impl<T: Copy, const W: usize> Packet<T, W> {
    #[inline(always)]
    pub const fn from_array(lanes: [T; W]) -> Self {
        Self { lanes }
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; W] {
        self.lanes
    }

    #[inline(always)]
    pub fn as_array(&self) -> &[T; W] {
        &self.lanes
    }
}

impl<T, const W: usize> From<[T; W]> for Packet<T, W> {
    fn from(lanes: [T; W]) -> Self {
        Self { lanes }
    }
}

macro_rules! lanewise_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl<T, const W: usize> $trait for Packet<T, W>
        where
            T: Copy + $trait<Output = T>,
        {
            type Output = Self;

            #[inline(always)]
            fn $method(self, rhs: Self) -> Self {
                Self {
                    lanes: array::from_fn(|i| self.lanes[i] $op rhs.lanes[i]),
                }
            }
        }
    };
}

lanewise_op!(Add, add, +);
lanewise_op!(Sub, sub, -);
lanewise_op!(Mul, mul, *);
lanewise_op!(Div, div, /);

macro_rules! portable_lanes {
    ($scalar:ty) => {
        impl<const W: usize> Lanes for Packet<$scalar, W> {
            type Scalar = $scalar;
            const WIDTH: usize = W;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                Self { lanes: [value; W] }
            }

            #[inline(always)]
            fn zero() -> Self {
                Self::splat(0.0)
            }

            #[inline(always)]
            fn one() -> Self {
                Self::splat(1.0)
            }

            #[inline(always)]
            fn load_unaligned(src: &[$scalar]) -> Self {
                let mut lanes = [0.0; W];
                lanes.copy_from_slice(&src[..W]);
                Self { lanes }
            }

            #[inline(always)]
            fn store_unaligned(self, dst: &mut [$scalar]) {
                dst[..W].copy_from_slice(&self.lanes);
            }

            #[inline(always)]
            fn extract(self, index: usize) -> $scalar {
                self.lanes[index]
            }
        }
    };
}

portable_lanes!(f32);
portable_lanes!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lanewise_arithmetic() {
        let a = Packet::from_array([1.0f32, 2.0, 3.0, 4.0]);
        let b = Packet::from_array([4.0f32, 3.0, 2.0, 1.0]);

        assert_eq!((a + b).to_array(), [5.0, 5.0, 5.0, 5.0]);
        assert_eq!((a - b).to_array(), [-3.0, -1.0, 1.0, 3.0]);
        assert_eq!((a * b).to_array(), [4.0, 6.0, 6.0, 4.0]);
        assert_eq!((a / b).to_array(), [0.25, 2.0 / 3.0, 1.5, 4.0]);
    }

    #[test]
    fn test_div_by_zero_stays_in_its_lane() {
        let num = Packet::from_array([1.0f64, -1.0, 0.0, 2.0]);
        let den = Packet::from_array([0.0f64, 0.0, 0.0, 4.0]);
        let q = (num / den).to_array();

        assert_eq!(q[0], f64::INFINITY);
        assert_eq!(q[1], f64::NEG_INFINITY);
        assert!(q[2].is_nan());
        assert_eq!(q[3], 0.5);
    }

    #[test]
    fn test_store_unaligned_writes_lane_order() {
        let p = Packet::from_array([7.0f32, 8.0, 9.0]);
        let mut buf = [0.0f32; 5];
        p.store_unaligned(&mut buf[1..]);
        assert_eq!(buf, [0.0, 7.0, 8.0, 9.0, 0.0]);

        let back = Packet::<f32, 3>::load_unaligned(&buf[1..]);
        assert_eq!(back, p);
        assert_eq!(back.extract(2), 9.0);
    }

    #[test]
    #[should_panic]
    fn test_store_into_short_buffer_panics() {
        let mut buf = [0.0f32; 3];
        Packet::<f32, 4>::one().store_unaligned(&mut buf);
    }

    #[test]
    fn test_default_mul_add() {
        let a = Packet::<f32, 2>::splat(3.0);
        let r = a.mul_add(Packet::splat(2.0), Packet::one());
        assert_eq!(r.to_array(), [7.0, 7.0]);
    }
}
