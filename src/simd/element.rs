//! Lane types of fixed-size vectors.
//!
//! An [`Element`] is one of the ten primitive numeric types. Besides the
//! lane-level arithmetic, each element names the native vector type that
//! holds it for every chunk kind, which is how the fixed-size layer turns a
//! [`ChunkKind`](crate::fixed::ChunkKind) into concrete code.
//!
//! Integer arithmetic wraps on overflow, the way the hardware does. Division
//! and remainder by zero panic, as they do for the primitive types.

use std::fmt::Debug;

use num::traits::{NumCast, One, Zero};

use crate::simd::{Lanes, NativeVector};

/// A primitive numeric type usable as a SIMD lane.
pub trait Element:
    Copy + Debug + Default + PartialEq + PartialOrd + Send + Sync + Zero + One + NumCast + 'static
{
    /// Native vector filling a 128-bit register.
    type V128: NativeVector<Elem = Self>;
    /// Native vector filling a 256-bit register.
    type V256: NativeVector<Elem = Self>;
    /// Native vector filling a 512-bit register.
    type V512: NativeVector<Elem = Self>;

    fn lane_add(self, rhs: Self) -> Self;
    fn lane_sub(self, rhs: Self) -> Self;
    fn lane_mul(self, rhs: Self) -> Self;
    fn lane_div(self, rhs: Self) -> Self;
    fn lane_rem(self, rhs: Self) -> Self;
    fn lane_min(self, rhs: Self) -> Self;
    fn lane_max(self, rhs: Self) -> Self;
    fn lane_neg(self) -> Self;
    fn lane_abs(self) -> Self;
}

/// Integer lanes: bitwise logic and shifts.
///
/// Shift amounts are taken modulo the lane width in bits.
pub trait IntElement: Element + Eq + Ord {
    fn lane_and(self, rhs: Self) -> Self;
    fn lane_or(self, rhs: Self) -> Self;
    fn lane_xor(self, rhs: Self) -> Self;
    fn lane_not(self) -> Self;
    /// Shifts left by the amount held in `rhs`.
    fn lane_shl(self, rhs: Self) -> Self;
    /// Shifts right by the amount held in `rhs` (arithmetic for signed lanes).
    fn lane_shr(self, rhs: Self) -> Self;
    fn lane_shl_by(self, amount: u32) -> Self;
    fn lane_shr_by(self, amount: u32) -> Self;
}

/// Floating-point lanes.
pub trait FloatElement: Element {
    fn lane_sqrt(self) -> Self;
}

macro_rules! impl_int_element {
    ($($ty:ty => [$v128:literal, $v256:literal, $v512:literal], abs: |$x:ident| $abs:expr;)*) => {
        $(
            impl Element for $ty {
                type V128 = Lanes<$ty, $v128>;
                type V256 = Lanes<$ty, $v256>;
                type V512 = Lanes<$ty, $v512>;

                #[inline(always)]
                fn lane_add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline(always)]
                fn lane_sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                #[inline(always)]
                fn lane_mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                #[inline(always)]
                fn lane_div(self, rhs: Self) -> Self {
                    self.wrapping_div(rhs)
                }

                #[inline(always)]
                fn lane_rem(self, rhs: Self) -> Self {
                    self.wrapping_rem(rhs)
                }

                #[inline(always)]
                fn lane_min(self, rhs: Self) -> Self {
                    std::cmp::min(self, rhs)
                }

                #[inline(always)]
                fn lane_max(self, rhs: Self) -> Self {
                    std::cmp::max(self, rhs)
                }

                #[inline(always)]
                fn lane_neg(self) -> Self {
                    self.wrapping_neg()
                }

                #[inline(always)]
                fn lane_abs(self) -> Self {
                    let $x = self;
                    $abs
                }
            }

            impl IntElement for $ty {
                #[inline(always)]
                fn lane_and(self, rhs: Self) -> Self {
                    self & rhs
                }

                #[inline(always)]
                fn lane_or(self, rhs: Self) -> Self {
                    self | rhs
                }

                #[inline(always)]
                fn lane_xor(self, rhs: Self) -> Self {
                    self ^ rhs
                }

                #[inline(always)]
                fn lane_not(self) -> Self {
                    !self
                }

                #[inline(always)]
                fn lane_shl(self, rhs: Self) -> Self {
                    self.wrapping_shl(rhs as u32)
                }

                #[inline(always)]
                fn lane_shr(self, rhs: Self) -> Self {
                    self.wrapping_shr(rhs as u32)
                }

                #[inline(always)]
                fn lane_shl_by(self, amount: u32) -> Self {
                    self.wrapping_shl(amount)
                }

                #[inline(always)]
                fn lane_shr_by(self, amount: u32) -> Self {
                    self.wrapping_shr(amount)
                }
            }
        )*
    };
}

impl_int_element! {
    i8 => [16, 32, 64], abs: |x| x.wrapping_abs();
    u8 => [16, 32, 64], abs: |x| x;
    i16 => [8, 16, 32], abs: |x| x.wrapping_abs();
    u16 => [8, 16, 32], abs: |x| x;
    i32 => [4, 8, 16], abs: |x| x.wrapping_abs();
    u32 => [4, 8, 16], abs: |x| x;
    i64 => [2, 4, 8], abs: |x| x.wrapping_abs();
    u64 => [2, 4, 8], abs: |x| x;
}

// f32 picks up the intrinsic-backed registers when the build selected them.
#[cfg(all(neon, target_arch = "aarch64"))]
type F32V128 = crate::simd::neon::f32x4::F32x4;
#[cfg(not(all(neon, target_arch = "aarch64")))]
type F32V128 = Lanes<f32, 4>;

#[cfg(all(
    any(avx2, avx512),
    target_feature = "avx2",
    any(target_arch = "x86", target_arch = "x86_64")
))]
type F32V256 = crate::simd::avx2::f32x8::F32x8;
#[cfg(not(all(
    any(avx2, avx512),
    target_feature = "avx2",
    any(target_arch = "x86", target_arch = "x86_64")
)))]
type F32V256 = Lanes<f32, 8>;

macro_rules! impl_float_element {
    ($($ty:ty => [$v128:ty, $v256:ty, $v512:ty];)*) => {
        $(
            impl Element for $ty {
                type V128 = $v128;
                type V256 = $v256;
                type V512 = $v512;

                #[inline(always)]
                fn lane_add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline(always)]
                fn lane_sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline(always)]
                fn lane_mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline(always)]
                fn lane_div(self, rhs: Self) -> Self {
                    self / rhs
                }

                #[inline(always)]
                fn lane_rem(self, rhs: Self) -> Self {
                    self % rhs
                }

                #[inline(always)]
                fn lane_min(self, rhs: Self) -> Self {
                    self.min(rhs)
                }

                #[inline(always)]
                fn lane_max(self, rhs: Self) -> Self {
                    self.max(rhs)
                }

                #[inline(always)]
                fn lane_neg(self) -> Self {
                    -self
                }

                #[inline(always)]
                fn lane_abs(self) -> Self {
                    self.abs()
                }
            }

            impl FloatElement for $ty {
                #[inline(always)]
                fn lane_sqrt(self) -> Self {
                    self.sqrt()
                }
            }
        )*
    };
}

impl_float_element! {
    f32 => [F32V128, F32V256, Lanes<f32, 16>];
    f64 => [Lanes<f64, 2>, Lanes<f64, 4>, Lanes<f64, 8>];
}
