use std::fmt::Debug;

use crate::fixed::bitmask::{pack_bools, unpack_bools};
use crate::simd::Element;

/// A native per-lane predicate register.
///
/// Whatever the hardware encoding (sign bits of a float register, an integer
/// lane mask, a k-register), a native mask converts to and from a compact
/// integer holding one bit per lane, lane 0 in the least significant bit.
pub trait NativeMask: Copy + Debug + PartialEq {
    /// Number of lanes covered by the mask.
    const LANES: usize;

    /// Sets every lane to `value`.
    fn splat(value: bool) -> Self;

    /// Expands the low `LANES` bits of `bits` into the native encoding.
    /// Higher bits are ignored.
    fn from_bits(bits: u64) -> Self;

    /// Compresses the mask into its low `LANES` bits (move-mask).
    fn to_bits(self) -> u64;

    /// Reads a single lane.
    #[inline(always)]
    fn test(self, lane: usize) -> bool {
        debug_assert!(lane < Self::LANES, "lane {lane} out of range");
        (self.to_bits() >> lane) & 1 != 0
    }

    /// Loads one predicate per lane from `src[..LANES]`.
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than `LANES` values.
    #[inline(always)]
    fn load_bools(src: &[bool]) -> Self {
        Self::from_bits(pack_bools(&src[..Self::LANES]))
    }

    /// Stores one predicate per lane into `dst[..LANES]`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds fewer than `LANES` values.
    #[inline(always)]
    fn store_bools(self, dst: &mut [bool]) {
        unpack_bools(self.to_bits(), &mut dst[..Self::LANES])
    }
}

/// A native vector register holding `LANES` values of one element type.
///
/// This is the complete operation set the fixed-size layer needs from a
/// chunk. Only the memory, lane access and comparison primitives are
/// required; arithmetic defaults to the lane-wise [`Element`] operations so
/// that intrinsic-backed types override just what their ISA accelerates.
///
/// Loads and stores never require alignment.
pub trait NativeVector: Copy + Debug {
    /// Lane type.
    type Elem: Element;

    /// Mask produced by comparisons and consumed by [`select`](Self::select).
    type Mask: NativeMask;

    /// Number of lanes.
    const LANES: usize;

    /// Broadcasts `value` to every lane.
    fn splat(value: Self::Elem) -> Self;

    /// Builds a vector from `f(0), f(1), .., f(LANES - 1)`.
    fn generate<F: FnMut(usize) -> Self::Elem>(f: F) -> Self;

    /// Loads `src[..LANES]`.
    ///
    /// # Panics
    ///
    /// Panics if `src` holds fewer than `LANES` values.
    fn load(src: &[Self::Elem]) -> Self;

    /// Stores into `dst[..LANES]`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` holds fewer than `LANES` values.
    fn store(self, dst: &mut [Self::Elem]);

    /// Reads lane `lane`.
    fn extract(self, lane: usize) -> Self::Elem;

    /// Overwrites lane `lane`.
    fn insert(&mut self, lane: usize, value: Self::Elem);

    /// Applies `f` to every lane.
    fn map<F: Fn(Self::Elem) -> Self::Elem>(self, f: F) -> Self;

    /// Combines corresponding lanes of `self` and `other` with `f`.
    fn zip_map<F: Fn(Self::Elem, Self::Elem) -> Self::Elem>(self, other: Self, f: F) -> Self;

    /// Evaluates `f` on corresponding lanes and collects the results.
    fn compare<F: Fn(Self::Elem, Self::Elem) -> bool>(self, other: Self, f: F) -> Self::Mask;

    /// Picks lanes of `if_true` where `mask` is set and of `if_false` elsewhere.
    fn select(mask: Self::Mask, if_true: Self, if_false: Self) -> Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.zip_map(rhs, <Self::Elem as Element>::lane_add)
    }

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.zip_map(rhs, <Self::Elem as Element>::lane_sub)
    }

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.zip_map(rhs, <Self::Elem as Element>::lane_mul)
    }

    #[inline(always)]
    fn div(self, rhs: Self) -> Self {
        self.zip_map(rhs, <Self::Elem as Element>::lane_div)
    }

    #[inline(always)]
    fn rem(self, rhs: Self) -> Self {
        self.zip_map(rhs, <Self::Elem as Element>::lane_rem)
    }

    #[inline(always)]
    fn min(self, rhs: Self) -> Self {
        self.zip_map(rhs, <Self::Elem as Element>::lane_min)
    }

    #[inline(always)]
    fn max(self, rhs: Self) -> Self {
        self.zip_map(rhs, <Self::Elem as Element>::lane_max)
    }

    #[inline(always)]
    fn neg(self) -> Self {
        self.map(<Self::Elem as Element>::lane_neg)
    }

    #[inline(always)]
    fn abs(self) -> Self {
        self.map(<Self::Elem as Element>::lane_abs)
    }

    #[inline(always)]
    fn simd_eq(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a == b)
    }

    #[inline(always)]
    fn simd_ne(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a != b)
    }

    #[inline(always)]
    fn simd_lt(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a < b)
    }

    #[inline(always)]
    fn simd_le(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a <= b)
    }

    #[inline(always)]
    fn simd_gt(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a > b)
    }

    #[inline(always)]
    fn simd_ge(self, rhs: Self) -> Self::Mask {
        self.compare(rhs, |a, b| a >= b)
    }

    /// Horizontal reduction of all lanes with `f`.
    ///
    /// Lanes are folded pairwise, the upper half onto the lower half, until
    /// one lane remains. The order is fixed for a given `LANES`.
    #[inline(always)]
    fn reduce<F: Fn(Self::Elem, Self::Elem) -> Self::Elem>(self, f: F) -> Self::Elem {
        let mut folded = self;
        let mut width = Self::LANES;
        while width > 1 {
            let half = width.div_ceil(2);
            for lane in 0..width - half {
                let value = f(folded.extract(lane), folded.extract(lane + half));
                folded.insert(lane, value);
            }
            width = half;
        }
        folded.extract(0)
    }
}
