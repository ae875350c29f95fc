//! Portable native chunks.
//!
//! `Lanes<T, L>` stores its lanes in a plain array and implements every
//! operation as a fixed-length loop. With the length known at compile time
//! and everything inlined, LLVM lowers these loops onto whatever vector
//! registers the target was compiled for, so this type stands in for every
//! chunk kind that has no hand-written intrinsic implementation. `Lanes<T, 1>`
//! is the scalar chunk.

use crate::simd::{Element, NativeMask, NativeVector};

/// `L` lanes of `T` in a plain array.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct Lanes<T, const L: usize>(pub [T; L]);

/// Per-lane predicates of a [`Lanes`] chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct LaneMask<const L: usize>(pub [bool; L]);

impl<const L: usize> NativeMask for LaneMask<L> {
    const LANES: usize = L;

    #[inline(always)]
    fn splat(value: bool) -> Self {
        Self([value; L])
    }

    #[inline(always)]
    fn from_bits(bits: u64) -> Self {
        Self(core::array::from_fn(|lane| (bits >> lane) & 1 != 0))
    }

    #[inline(always)]
    fn to_bits(self) -> u64 {
        self.0
            .iter()
            .enumerate()
            .fold(0u64, |bits, (lane, &set)| bits | (u64::from(set) << lane))
    }

    #[inline(always)]
    fn test(self, lane: usize) -> bool {
        self.0[lane]
    }
}

impl<T: Element, const L: usize> NativeVector for Lanes<T, L> {
    type Elem = T;
    type Mask = LaneMask<L>;

    const LANES: usize = L;

    #[inline(always)]
    fn splat(value: T) -> Self {
        Self([value; L])
    }

    #[inline(always)]
    fn generate<F: FnMut(usize) -> T>(f: F) -> Self {
        Self(core::array::from_fn(f))
    }

    #[inline(always)]
    fn load(src: &[T]) -> Self {
        let src = &src[..L];
        Self(core::array::from_fn(|lane| src[lane]))
    }

    #[inline(always)]
    fn store(self, dst: &mut [T]) {
        dst[..L].copy_from_slice(&self.0);
    }

    #[inline(always)]
    fn extract(self, lane: usize) -> T {
        self.0[lane]
    }

    #[inline(always)]
    fn insert(&mut self, lane: usize, value: T) {
        self.0[lane] = value;
    }

    #[inline(always)]
    fn map<F: Fn(T) -> T>(self, f: F) -> Self {
        Self(self.0.map(f))
    }

    #[inline(always)]
    fn zip_map<F: Fn(T, T) -> T>(self, other: Self, f: F) -> Self {
        Self(core::array::from_fn(|lane| f(self.0[lane], other.0[lane])))
    }

    #[inline(always)]
    fn compare<F: Fn(T, T) -> bool>(self, other: Self, f: F) -> LaneMask<L> {
        LaneMask(core::array::from_fn(|lane| f(self.0[lane], other.0[lane])))
    }

    #[inline(always)]
    fn select(mask: LaneMask<L>, if_true: Self, if_false: Self) -> Self {
        Self(core::array::from_fn(|lane| {
            if mask.0[lane] {
                if_true.0[lane]
            } else {
                if_false.0[lane]
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_mask_bits() {
        let mask = LaneMask::<8>::from_bits(0b1010_0101);
        assert_eq!(
            mask.0,
            [true, false, true, false, false, true, false, true]
        );
        assert_eq!(mask.to_bits(), 0b1010_0101);
        assert!(mask.test(7));
        assert!(!mask.test(6));

        // bits above the lane count are dropped
        assert_eq!(LaneMask::<4>::from_bits(0xFF).to_bits(), 0x0F);
    }

    #[test]
    fn test_load_store_ignore_extra_memory() {
        let src = [1i32, 2, 3, 4, 5, 6];
        let chunk = Lanes::<i32, 4>::load(&src[1..]);
        assert_eq!(chunk.0, [2, 3, 4, 5]);

        let mut dst = [0i32; 6];
        chunk.store(&mut dst[2..]);
        assert_eq!(dst, [0, 0, 2, 3, 4, 5]);
    }

    #[test]
    #[should_panic]
    fn test_load_short_slice_panics() {
        let src = [1.0f32, 2.0, 3.0];
        let _ = Lanes::<f32, 4>::load(&src);
    }

    #[test]
    fn test_select_and_compare() {
        let a = Lanes([1u16, 5, 3, 7]);
        let b = Lanes([4u16, 2, 3, 9]);

        let lt = a.simd_lt(b);
        assert_eq!(lt.to_bits(), 0b1001);
        assert_eq!(Lanes::select(lt, a, b).0, [1, 2, 3, 7]);
        assert_eq!(a.max(b).0, [4, 5, 3, 9]);
    }

    #[test]
    fn test_horizontal_reduce_order() {
        // (a0 + a2) + (a1 + a3) folded as upper half onto lower half
        let v = Lanes([1i64, 10, 100, 1000]);
        let order = v.reduce(|a, b| a * 2 + b);
        // lane0 = 1*2+100 = 102, lane1 = 10*2+1000 = 1020, then 102*2+1020
        assert_eq!(order, 1224);

        let odd = Lanes([1i32, 2, 3]);
        assert_eq!(odd.reduce(|a, b| a + b), 6);
        assert_eq!(Lanes([42u8]).reduce(|a, b| a.wrapping_add(b)), 42);
    }
}
