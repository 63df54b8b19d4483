//! Vector-register lane backend built on the `wide` crate.
//!
//! `wide` picks SSE/AVX/NEON/simd128 at compile time and falls back to
//! scalar code elsewhere, so these impls are safe on every target.

use super::Lanes;
use wide::{f32x4, f32x8, f64x2, f64x4};

macro_rules! wide_lanes {
    ($vector:ty, $scalar:ty, $width:expr) => {
        impl Lanes for $vector {
            type Scalar = $scalar;
            const WIDTH: usize = $width;

            #[inline(always)]
            fn splat(value: $scalar) -> Self {
                <$vector>::splat(value)
            }

            #[inline(always)]
            fn zero() -> Self {
                <$vector>::splat(0.0)
            }

            #[inline(always)]
            fn one() -> Self {
                <$vector>::splat(1.0)
            }

            #[inline(always)]
            fn load_unaligned(src: &[$scalar]) -> Self {
                let mut lanes = [0.0; $width];
                lanes.copy_from_slice(&src[..$width]);
                <$vector>::from(lanes)
            }

            #[inline(always)]
            fn store_unaligned(self, dst: &mut [$scalar]) {
                dst[..$width].copy_from_slice(&self.to_array());
            }

            #[inline(always)]
            fn extract(self, index: usize) -> $scalar {
                self.to_array()[index]
            }

            #[inline(always)]
            fn mul_add(self, m: Self, a: Self) -> Self {
                <$vector>::mul_add(self, m, a)
            }
        }
    };
}

wide_lanes!(f32x4, f32, 4);
wide_lanes!(f32x8, f32, 8);
wide_lanes!(f64x2, f64, 2);
wide_lanes!(f64x4, f64, 4);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanes::Packet;

    #[test]
    fn test_wide_matches_portable() {
        let a = [1.5f32, -2.0, 3.25, 0.5, 8.0, -0.125, 7.0, 2.0];
        let b = [0.5f32, 4.0, -1.0, 2.0, 0.25, 3.0, -7.0, 9.0];

        let wa = f32x8::load_unaligned(&a);
        let wb = f32x8::load_unaligned(&b);
        let pa = Packet::<f32, 8>::load_unaligned(&a);
        let pb = Packet::<f32, 8>::load_unaligned(&b);

        let mut wide_out = [0.0f32; 8];
        let mut portable_out = [0.0f32; 8];
        (wa * wb - wa / wb + wb).store_unaligned(&mut wide_out);
        (pa * pb - pa / pb + pb).store_unaligned(&mut portable_out);

        assert_eq!(wide_out, portable_out);
    }

    #[test]
    fn test_wide_splat_and_extract() {
        let v = f64x4::splat(2.5);
        for lane in 0..4 {
            assert_eq!(v.extract(lane), 2.5);
        }

        let mut buf = [0.0f64; 2];
        f64x2::one().store_unaligned(&mut buf);
        assert_eq!(buf, [1.0, 1.0]);
    }

    #[test]
    fn test_wide_div_by_zero_is_per_lane() {
        let q = f32x4::from([1.0, 2.0, 3.0, 4.0]) / f32x4::from([1.0, 0.0, 1.0, 2.0]);
        let lanes = q.to_array();

        assert_eq!(lanes[0], 1.0);
        assert!(lanes[1].is_infinite());
        assert_eq!(lanes[2], 3.0);
        assert_eq!(lanes[3], 2.0);
    }
}
