//! AVX2 8-lane f32 native chunk.
//!
//! This module provides `F32x8`, the 256-bit chunk for `f32` lanes, wrapping
//! Intel's `__m256` register, and `F32x8Mask`, its comparison mask.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel processors with AVX2 support (Haswell and later)
//! - **Target Architecture**: x86_64 (and x86 with SSE compatibility)
//! - **Compilation**: Must be compiled with AVX2 enabled (`-C target-feature=+avx2`)
//!
//! # Supported Operations
//!
//! ## Loading and Storing
//! - `load()` / `store()` - unaligned `_mm256_loadu_ps` / `_mm256_storeu_ps`
//!
//! ## Arithmetic
//! - `add`, `sub`, `mul`, `div`, `min`, `max`, `neg`, `abs` on the register
//!
//! ## Masks
//! - Comparisons through `_mm256_cmp_ps`, blending through `_mm256_blendv_ps`
//! - Bit conversion through `_mm256_movemask_ps` and a lane-bit compare

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use crate::simd::{NativeMask, NativeVector};

/// Number of f32 elements that fit in an AVX2 256-bit vector.
///
/// AVX2 vectors can contain 8 single-precision floating-point values
/// (8 × 32 bits = 256 bits).
pub(crate) const LANE_COUNT: usize = 8;

/// AVX2 SIMD vector containing 8 packed f32 values.
///
/// Unlike a slice-processing vector, a chunk is always full: the fixed-size
/// layer only hands it complete `offset..offset + 8` lane ranges.
#[derive(Copy, Clone, Debug)]
pub struct F32x8 {
    /// AVX2 256-bit vector register containing 8 packed f32 values
    pub elements: __m256,
}

/// Comparison mask of an [`F32x8`]: every lane is all ones or all zeros.
#[derive(Copy, Clone, Debug)]
pub struct F32x8Mask {
    /// Lane predicates, encoded as all-ones / all-zeros 32-bit patterns
    pub elements: __m256,
}

impl F32x8 {
    /// Copies the register into an array.
    #[inline(always)]
    fn to_array(self) -> [f32; LANE_COUNT] {
        let mut out = [0.0f32; LANE_COUNT];
        self.store(&mut out);
        out
    }
}

impl PartialEq for F32x8Mask {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl NativeMask for F32x8Mask {
    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        let pattern = if value { -1 } else { 0 };
        Self {
            elements: unsafe { _mm256_castsi256_ps(_mm256_set1_epi32(pattern)) },
        }
    }

    /// Expands the low 8 bits of `bits` into lane masks.
    ///
    /// The bit pattern is broadcast to every lane, each lane keeps only its own
    /// bit with `_mm256_and_si256`, and `_mm256_cmpeq_epi32` turns a kept bit
    /// into an all-ones lane.
    #[inline(always)]
    fn from_bits(bits: u64) -> Self {
        unsafe {
            let lane_bits = _mm256_setr_epi32(1, 2, 4, 8, 16, 32, 64, 128);
            let broadcast = _mm256_set1_epi32((bits & 0xFF) as i32);
            let kept = _mm256_and_si256(broadcast, lane_bits);
            Self {
                elements: _mm256_castsi256_ps(_mm256_cmpeq_epi32(kept, lane_bits)),
            }
        }
    }

    /// Collects the sign bit of every lane with `_mm256_movemask_ps`.
    #[inline(always)]
    fn to_bits(self) -> u64 {
        unsafe { _mm256_movemask_ps(self.elements) as u32 as u64 }
    }
}

impl NativeVector for F32x8 {
    type Elem = f32;
    type Mask = F32x8Mask;

    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { _mm256_set1_ps(value) },
        }
    }

    #[inline(always)]
    fn generate<F: FnMut(usize) -> f32>(f: F) -> Self {
        let lanes: [f32; LANE_COUNT] = core::array::from_fn(f);
        Self::load(&lanes)
    }

    /// Loads 8 elements from unaligned memory.
    ///
    /// The slice is bounds checked before the raw load, so a short slice
    /// panics instead of reading past its end.
    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        let src = &src[..LANE_COUNT];
        Self {
            elements: unsafe { _mm256_loadu_ps(src.as_ptr()) },
        }
    }

    /// Stores 8 elements to unaligned memory.
    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        let dst = &mut dst[..LANE_COUNT];
        unsafe { _mm256_storeu_ps(dst.as_mut_ptr(), self.elements) }
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> f32 {
        self.to_array()[lane]
    }

    #[inline(always)]
    fn insert(&mut self, lane: usize, value: f32) {
        let mut lanes = self.to_array();
        lanes[lane] = value;
        *self = Self::load(&lanes);
    }

    #[inline(always)]
    fn map<F: Fn(f32) -> f32>(self, f: F) -> Self {
        Self::load(&self.to_array().map(f))
    }

    #[inline(always)]
    fn zip_map<F: Fn(f32, f32) -> f32>(self, other: Self, f: F) -> Self {
        let (a, b) = (self.to_array(), other.to_array());
        Self::generate(|lane| f(a[lane], b[lane]))
    }

    #[inline(always)]
    fn compare<F: Fn(f32, f32) -> bool>(self, other: Self, f: F) -> F32x8Mask {
        let (a, b) = (self.to_array(), other.to_array());
        let bits = (0..LANE_COUNT).fold(0u64, |bits, lane| {
            bits | (u64::from(f(a[lane], b[lane])) << lane)
        });
        F32x8Mask::from_bits(bits)
    }

    /// Blends with `_mm256_blendv_ps`, which picks `if_true` where the mask
    /// lane's sign bit is set.
    #[inline(always)]
    fn select(mask: F32x8Mask, if_true: Self, if_false: Self) -> Self {
        Self {
            elements: unsafe {
                _mm256_blendv_ps(if_false.elements, if_true.elements, mask.elements)
            },
        }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_add_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_sub_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_mul_ps(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { _mm256_div_ps(self.elements, rhs.elements) },
        }
    }

    /// `_mm256_min_ps` returns `rhs` when either lane is NaN; lanes where
    /// `rhs` is NaN are blended back to `self`, so a NaN is only returned when
    /// both inputs are NaN, as with `f32::min`.
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self {
            elements: unsafe {
                let min = _mm256_min_ps(self.elements, rhs.elements);
                let rhs_nan = _mm256_cmp_ps::<_CMP_UNORD_Q>(rhs.elements, rhs.elements);
                _mm256_blendv_ps(min, self.elements, rhs_nan)
            },
        }
    }

    /// NaN handling as in [`min`](Self::min).
    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self {
            elements: unsafe {
                let max = _mm256_max_ps(self.elements, rhs.elements);
                let rhs_nan = _mm256_cmp_ps::<_CMP_UNORD_Q>(rhs.elements, rhs.elements);
                _mm256_blendv_ps(max, self.elements, rhs_nan)
            },
        }
    }

    /// Flips the sign bit of every lane.
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { _mm256_xor_ps(self.elements, _mm256_set1_ps(-0.0)) },
        }
    }

    /// Clears the sign bit of every lane.
    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { _mm256_andnot_ps(_mm256_set1_ps(-0.0), self.elements) },
        }
    }

    #[inline(always)]
    fn simd_eq(self, rhs: Self) -> F32x8Mask {
        F32x8Mask {
            elements: unsafe { _mm256_cmp_ps::<_CMP_EQ_OQ>(self.elements, rhs.elements) },
        }
    }

    /// Unordered, so NaN lanes compare not-equal like `f32::ne`.
    #[inline(always)]
    fn simd_ne(self, rhs: Self) -> F32x8Mask {
        F32x8Mask {
            elements: unsafe { _mm256_cmp_ps::<_CMP_NEQ_UQ>(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn simd_lt(self, rhs: Self) -> F32x8Mask {
        F32x8Mask {
            elements: unsafe { _mm256_cmp_ps::<_CMP_LT_OQ>(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn simd_le(self, rhs: Self) -> F32x8Mask {
        F32x8Mask {
            elements: unsafe { _mm256_cmp_ps::<_CMP_LE_OQ>(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn simd_gt(self, rhs: Self) -> F32x8Mask {
        F32x8Mask {
            elements: unsafe { _mm256_cmp_ps::<_CMP_GT_OQ>(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn simd_ge(self, rhs: Self) -> F32x8Mask {
        F32x8Mask {
            elements: unsafe { _mm256_cmp_ps::<_CMP_GE_OQ>(self.elements, rhs.elements) },
        }
    }

    /// Same pairwise fold as the default, on an array copy of the register.
    #[inline(always)]
    fn reduce<F: Fn(f32, f32) -> f32>(self, f: F) -> f32 {
        let v = self.to_array();
        let quad = [f(v[0], v[4]), f(v[1], v[5]), f(v[2], v[6]), f(v[3], v[7])];
        let pair = [f(quad[0], quad[2]), f(quad[1], quad[3])];
        f(pair[0], pair[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simd::Lanes;

    #[test]
    fn test_mask_bits_round_trip() {
        for bits in 0..=0xFFu64 {
            assert_eq!(F32x8Mask::from_bits(bits).to_bits(), bits);
        }
    }

    #[test]
    fn test_matches_portable_chunk() {
        let a = [1.5f32, -2.0, 3.25, -4.0, 5.0, 0.0, -7.5, 8.0];
        let b = [2.0f32, -2.0, 1.0, 4.0, -5.0, 0.5, 7.5, -8.0];

        let (x, y) = (F32x8::load(&a), F32x8::load(&b));
        let (p, q) = (Lanes::<f32, 8>::load(&a), Lanes::<f32, 8>::load(&b));

        assert_eq!(x.add(y).to_array(), p.add(q).0);
        assert_eq!(x.mul(y).to_array(), p.mul(q).0);
        assert_eq!(x.min(y).to_array(), p.min(q).0);
        assert_eq!(x.abs().to_array(), p.abs().0);
        assert_eq!(x.neg().to_array(), p.neg().0);
        assert_eq!(x.simd_lt(y).to_bits(), p.simd_lt(q).to_bits());
        assert_eq!(x.simd_eq(y).to_bits(), p.simd_eq(q).to_bits());
        assert_eq!(x.reduce(|a, b| a + b), p.reduce(|a, b| a + b));
    }

    fn same_lanes(actual: [f32; 8], expected: [f32; 8]) -> bool {
        actual
            .iter()
            .zip(&expected)
            .all(|(a, e)| a == e || (a.is_nan() && e.is_nan()))
    }

    #[test]
    fn test_min_max_skip_nan_like_portable_chunk() {
        let nan = f32::NAN;
        let a = [nan, 1.0, nan, -3.0, 0.0, -0.0, 2.5, nan];
        let b = [1.0, nan, nan, 4.0, -0.0, 0.0, nan, -6.0];

        let (x, y) = (F32x8::load(&a), F32x8::load(&b));
        let (p, q) = (Lanes::<f32, 8>::load(&a), Lanes::<f32, 8>::load(&b));

        let min = x.min(y).to_array();
        let max = x.max(y).to_array();
        assert!(same_lanes(min, p.min(q).0), "{min:?}");
        assert!(same_lanes(max, p.max(q).0), "{max:?}");
        assert_eq!(min[0], 1.0);
        assert_eq!(max[1], 1.0);
        assert!(min[2].is_nan() && max[2].is_nan());
        assert_eq!(min[7], -6.0);

        assert_eq!(x.reduce(f32::min), -3.0);
        assert_eq!(x.min(y).reduce(f32::min), p.min(q).reduce(f32::min));
    }

    #[test]
    fn test_select_blends_by_mask() {
        let a = F32x8::splat(1.0);
        let b = F32x8::splat(2.0);
        let mask = F32x8Mask::from_bits(0b0101_0011);
        assert_eq!(
            F32x8::select(mask, a, b).to_array(),
            [1.0, 1.0, 2.0, 2.0, 1.0, 2.0, 1.0, 2.0]
        );
    }
}
