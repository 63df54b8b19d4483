//! Lane-parallel 4x4 kernels.
//!
//! Both kernels are branch-free straight-line arithmetic over the 16 cells
//! of a [`MatrixPacket`](crate::MatrixPacket), generic over the lane backend.
//! One call processes all W matrices of the packet.
//!
//! Available kernels:
//! - `multiply`: C = A * B, 64 multiply-adds per lane
//! - `inverse`: adjugate / determinant, no singularity masking

pub mod inverse;
pub mod multiply;

pub use inverse::inverse;
pub use multiply::multiply;
