//! ARM NEON native chunks for 128-bit registers.
//!
//! NEON is available on all AArch64 processors, including Apple Silicon, AWS
//! Graviton and modern mobile devices.
//!
//! # Available Types
//!
//! - [`f32x4::F32x4`]: the `Width128` chunk of `f32` lanes
//!
//! # Conditional Compilation
//!
//! This module is only compiled on aarch64 when the build selected the `neon`
//! catalog. Every other element type uses the portable
//! [`Lanes`](crate::simd::Lanes) chunk, which LLVM lowers onto NEON itself.

pub mod f32x4;
