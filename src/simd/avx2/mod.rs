//! AVX2 native chunks for 256-bit registers.
//!
//! This module contains the chunk implementations using Intel's Advanced Vector
//! Extensions 2 (AVX2) instruction set. AVX2 is available on most Intel
//! processors since Haswell (2013) and AMD processors since Excavator (2015).
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Haswell (2013+) or AMD Excavator (2015+)
//! - **Target Architecture**: x86 or x86_64
//! - **Compilation**: Must be compiled with AVX2 enabled (`-C target-feature=+avx2`)
//!
//! # Available Types
//!
//! - [`f32x8::F32x8`]: the `Width256` chunk of `f32` lanes
//!
//! # Conditional Compilation
//!
//! This module is only compiled when the build selected the `avx2` or `avx512`
//! catalog *and* the compiler was allowed to emit AVX2 code. Otherwise `f32`
//! falls back to the portable [`Lanes`](crate::simd::Lanes) chunk for 256-bit
//! registers.

pub mod f32x8;
