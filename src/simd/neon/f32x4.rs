#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use crate::simd::{NativeMask, NativeVector};

pub const LANE_COUNT: usize = 4;

/// Bit weight of every lane, used to pack and unpack masks.
const LANE_BITS: [u32; LANE_COUNT] = [1, 2, 4, 8];

/// A NEON register of 4 32-bit floating point values, the `Width128` chunk
/// of `f32` lanes.
#[derive(Copy, Clone, Debug)]
pub struct F32x4 {
    elements: float32x4_t,
}

/// Comparison mask of an [`F32x4`], one all-ones or all-zeros `u32` per lane.
#[derive(Copy, Clone, Debug)]
pub struct F32x4Mask {
    elements: uint32x4_t,
}

impl F32x4 {
    #[inline(always)]
    fn to_array(self) -> [f32; LANE_COUNT] {
        let mut out = [0.0f32; LANE_COUNT];
        self.store(&mut out);
        out
    }
}

impl PartialEq for F32x4Mask {
    fn eq(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits()
    }
}

impl NativeMask for F32x4Mask {
    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        let pattern = if value { u32::MAX } else { 0 };
        Self {
            elements: unsafe { vdupq_n_u32(pattern) },
        }
    }

    // vtstq sets a lane when the broadcast bits share a bit with the lane weight
    #[inline(always)]
    fn from_bits(bits: u64) -> Self {
        unsafe {
            let weights = vld1q_u32(LANE_BITS.as_ptr());
            Self {
                elements: vtstq_u32(vdupq_n_u32((bits & 0xF) as u32), weights),
            }
        }
    }

    #[inline(always)]
    fn to_bits(self) -> u64 {
        unsafe {
            let weights = vld1q_u32(LANE_BITS.as_ptr());
            vaddvq_u32(vandq_u32(self.elements, weights)) as u64
        }
    }
}

impl NativeVector for F32x4 {
    type Elem = f32;
    type Mask = F32x4Mask;

    const LANES: usize = LANE_COUNT;

    #[inline(always)]
    fn splat(value: f32) -> Self {
        Self {
            elements: unsafe { vdupq_n_f32(value) },
        }
    }

    #[inline(always)]
    fn generate<F: FnMut(usize) -> f32>(f: F) -> Self {
        let lanes: [f32; LANE_COUNT] = core::array::from_fn(f);
        Self::load(&lanes)
    }

    #[inline(always)]
    fn load(src: &[f32]) -> Self {
        // Bounds check before the raw load
        let src = &src[..LANE_COUNT];
        Self {
            elements: unsafe { vld1q_f32(src.as_ptr()) },
        }
    }

    #[inline(always)]
    fn store(self, dst: &mut [f32]) {
        let dst = &mut dst[..LANE_COUNT];
        unsafe { vst1q_f32(dst.as_mut_ptr(), self.elements) }
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
    fn compare<F: Fn(f32, f32) -> bool>(self, other: Self, f: F) -> F32x4Mask {
        let (a, b) = (self.to_array(), other.to_array());
        let bits = (0..LANE_COUNT).fold(0u64, |bits, lane| {
            bits | (u64::from(f(a[lane], b[lane])) << lane)
        });
        F32x4Mask::from_bits(bits)
    }

    #[inline(always)]
    fn select(mask: F32x4Mask, if_true: Self, if_false: Self) -> Self {
        Self {
            elements: unsafe { vbslq_f32(mask.elements, if_true.elements, if_false.elements) },
        }
    }

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vaddq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vsubq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmulq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vdivq_f32(self.elements, rhs.elements) },
        }
    }

    // vminnmq/vmaxnmq return the number when one operand is NaN, like f32::min
    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vminnmq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        Self {
            elements: unsafe { vmaxnmq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            elements: unsafe { vnegq_f32(self.elements) },
        }
    }

    #[inline(always)]
    fn abs(self) -> Self {
        Self {
            elements: unsafe { vabsq_f32(self.elements) },
        }
    }

    #[inline(always)]
    fn simd_eq(self, rhs: Self) -> F32x4Mask {
        F32x4Mask {
            elements: unsafe { vceqq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn simd_ne(self, rhs: Self) -> F32x4Mask {
        F32x4Mask {
            elements: unsafe { vmvnq_u32(vceqq_f32(self.elements, rhs.elements)) },
        }
    }

    #[inline(always)]
    fn simd_lt(self, rhs: Self) -> F32x4Mask {
        F32x4Mask {
            elements: unsafe { vcltq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn simd_le(self, rhs: Self) -> F32x4Mask {
        F32x4Mask {
            elements: unsafe { vcleq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn simd_gt(self, rhs: Self) -> F32x4Mask {
        F32x4Mask {
            elements: unsafe { vcgtq_f32(self.elements, rhs.elements) },
        }
    }

    #[inline(always)]
    fn simd_ge(self, rhs: Self) -> F32x4Mask {
        F32x4Mask {
            elements: unsafe { vcgeq_f32(self.elements, rhs.elements) },
        }
    }
}
