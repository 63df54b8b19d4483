//! Batched 4x4 matrix multiply and inverse over SIMD lanes.
//!
//! Game and animation code rarely has one matrix to invert; it has a few
//! thousand. This crate stores W matrices side by side in structure-of-arrays
//! form (one SIMD packet per matrix cell) so that a single multiply or
//! inverse call processes all W of them with no shuffles and no branches.
//!
//! ## Usage
//!
//! ```
//! use matpacket::{Lanes, MatrixPacketN, Packet};
//!
//! let two = Packet::<f32, 4>::splat(2.0);
//! let scale = MatrixPacketN::<4>::diagonal(two, two, two, Packet::one());
//!
//! let inv = matpacket::inverse(&scale);
//! let id = matpacket::multiply(&scale, &inv);
//!
//! assert_eq!(inv.c0x().extract(0), 0.5);
//! assert_eq!(id, MatrixPacketN::<4>::identity());
//! ```
//!
//! If your matrices live in a flat array, let the batch drivers do the
//! packing:
//!
//! ```
//! use matpacket::{batch, Packet};
//!
//! let mats = vec![[1.0f32, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0,
//!                  0.0, 0.0, 1.0, 0.0, 3.0, 4.0, 5.0, 1.0]; 1000];
//! let mut inv = vec![[0.0f32; 16]; 1000];
//!
//! batch::inverse_batch::<Packet<f32, 8>>(&mats, &mut inv).unwrap();
//! assert_eq!(inv[999][12], -3.0);
//! ```
//!
//! ## What's inside
//!
//! - `Lanes` trait with a portable array backend and `wide` vector backends
//! - `MatrixPacket`: 16 lane packets, column-major, named cells `c0x..c3w`
//! - Multiply (64 multiply-adds per lane) and cofactor inverse kernels
//! - Slice drivers with tail padding, plus a multi-threaded variant
//!
//! Singular matrices are not detected: their lanes come back as inf/NaN
//! and every other lane is still correct.

pub mod batch;
pub mod error;
pub mod kernels;
pub mod lanes;
pub mod matrix;

pub use error::{KernelError, Result};
pub use kernels::{inverse, multiply};
pub use lanes::{AlignedLanes, Lanes, Packet};
pub use matrix::MatrixPacket;

/// Matrix packet on the portable backend, W lanes of `f32`.
pub type MatrixPacketN<const W: usize> = MatrixPacket<Packet<f32, W>>;

/// Four `f32` matrices in SSE/NEON-width registers.
#[cfg(feature = "wide")]
pub type MatrixPacket4 = MatrixPacket<wide::f32x4>;

/// Eight `f32` matrices in AVX-width registers.
#[cfg(feature = "wide")]
pub type MatrixPacket8 = MatrixPacket<wide::f32x8>;
