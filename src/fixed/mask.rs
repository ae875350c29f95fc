//! The logical mask of a fixed-size vector.

use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::error::{length_mismatch, FixedSizeError};
use crate::fixed::bitmask::{lane_bits, pack_bools, unpack_bools};
use crate::fixed::dispatch;
use crate::fixed::kind::{ChunkCatalog, NativeCatalog};
use crate::fixed::packer::{ChunkMeta, ChunkSequence};
use crate::fixed::vector::FixedSizeSimd;
use crate::simd::Element;

/// One predicate per lane of a [`FixedSizeSimd<T, N, C>`].
///
/// Stored as a single `u64`, bit `i` holding lane `i`, with every bit from
/// `N` upward cleared. Comparisons produce it and selections consume it; the
/// conversion to each chunk's native mask happens at those boundaries.
///
/// ```rust
/// use fixsimd::{FixedSizeMask, Simd128};
///
/// let mask = FixedSizeMask::<f32, 13, Simd128>::from_bits(0b1_0000_0001_0001);
/// assert_eq!(mask.count(), 3);
/// assert_eq!(mask.first_set(), Some(0));
/// assert_eq!(mask.last_set(), Some(12));
/// assert!(mask.get(4));
/// ```
#[repr(transparent)]
pub struct FixedSizeMask<T, const N: usize, C = NativeCatalog> {
    bits: u64,
    _marker: PhantomData<fn() -> (T, C)>,
}

impl<T: Element, const N: usize, C: ChunkCatalog> FixedSizeMask<T, N, C> {
    /// Chunk decomposition shared with the vector type.
    pub const LAYOUT: ChunkSequence = FixedSizeSimd::<T, N, C>::LAYOUT;

    /// Bits of the `N` valid lanes.
    const LANE_BITS: u64 = lane_bits(Self::LAYOUT.lanes());

    // Evaluating the layout rejects unsupported widths.
    const CHECKED: () = assert!(Self::LAYOUT.lanes() == N);

    #[inline(always)]
    const fn wrap(bits: u64) -> Self {
        let () = Self::CHECKED;
        Self {
            bits,
            _marker: PhantomData,
        }
    }

    /// Sets every lane to `value`.
    #[inline(always)]
    pub fn splat(value: bool) -> Self {
        Self::wrap(if value { Self::LANE_BITS } else { 0 })
    }

    /// Builds a mask from bit `i` = lane `i`. Bits from `N` upward are dropped.
    #[inline(always)]
    pub fn from_bits(bits: u64) -> Self {
        Self::wrap(bits & Self::LANE_BITS)
    }

    #[inline(always)]
    pub fn to_bits(self) -> u64 {
        self.bits
    }

    pub fn from_array(lanes: [bool; N]) -> Self {
        Self::from_bits(pack_bools(&lanes))
    }

    pub fn to_array(self) -> [bool; N] {
        let mut lanes = [false; N];
        unpack_bools(self.bits, &mut lanes);
        lanes
    }

    /// Loads `mem[..N]`, one `bool` per lane, through each chunk's native
    /// mask.
    ///
    /// # Panics
    ///
    /// Panics if `mem` holds fewer than `N` values.
    pub fn load(mem: &[bool]) -> Self {
        Self::from_bits(dispatch::load_bools::<T>(&Self::LAYOUT, &mem[..N]))
    }

    /// Stores the lanes into `mem[..N]`.
    ///
    /// # Panics
    ///
    /// Panics if `mem` holds fewer than `N` values.
    pub fn store(self, mem: &mut [bool]) {
        dispatch::store_bools::<T>(&Self::LAYOUT, self.bits, &mut mem[..N]);
    }

    /// Reads lane `lane`.
    ///
    /// # Panics
    ///
    /// Panics if `lane >= N`.
    #[inline]
    pub fn get(self, lane: usize) -> bool {
        assert!(lane < N, "lane {lane} out of range for a {N}-lane mask");
        (self.bits >> lane) & 1 != 0
    }

    /// Sets lane `lane` to `value`.
    ///
    /// # Panics
    ///
    /// Panics if `lane >= N`.
    #[inline]
    pub fn set(&mut self, lane: usize, value: bool) {
        assert!(lane < N, "lane {lane} out of range for a {N}-lane mask");
        let bit = 1u64 << lane;
        if value {
            self.bits |= bit;
        } else {
            self.bits &= !bit;
        }
    }

    #[inline(always)]
    pub fn all(self) -> bool {
        self.bits == Self::LANE_BITS
    }

    #[inline(always)]
    pub fn any(self) -> bool {
        self.bits != 0
    }

    #[inline(always)]
    pub fn none(self) -> bool {
        self.bits == 0
    }

    /// At least one lane set and at least one clear.
    #[inline(always)]
    pub fn some(self) -> bool {
        self.any() && !self.all()
    }

    /// Number of set lanes.
    #[inline(always)]
    pub fn count(self) -> usize {
        self.bits.count_ones() as usize
    }

    /// Lowest set lane.
    #[inline(always)]
    pub fn first_set(self) -> Option<usize> {
        (self.bits != 0).then(|| self.bits.trailing_zeros() as usize)
    }

    /// Highest set lane.
    #[inline(always)]
    pub fn last_set(self) -> Option<usize> {
        (self.bits != 0).then(|| (u64::BITS - 1 - self.bits.leading_zeros()) as usize)
    }

    /// Lanes of `if_true` where set, of `if_false` elsewhere, blended chunk
    /// by chunk with the native select.
    pub fn select(
        self,
        if_true: FixedSizeSimd<T, N, C>,
        if_false: FixedSizeSimd<T, N, C>,
    ) -> FixedSizeSimd<T, N, C> {
        let mut lanes = if_false.to_array();
        dispatch::assign_where(&Self::LAYOUT, self.bits, &mut lanes, if_true.as_array());
        FixedSizeSimd::from_array(lanes)
    }

    /// Every chunk with its part of the mask, as read back from the chunk's
    /// native mask (bit 0 = the chunk's first lane).
    pub fn native_chunks(self) -> impl Iterator<Item = (ChunkMeta, u64)> {
        let bits = self.bits;
        Self::LAYOUT
            .iter()
            .map(move |meta| (meta, dispatch::native_mask_bits::<T>(&meta, bits)))
    }

    /// Reassembles a mask from per-chunk native mask bits, as produced by
    /// [`native_chunks`](Self::native_chunks).
    pub fn from_native_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = (ChunkMeta, u64)>,
    {
        let bits = chunks.into_iter().fold(0, |bits, (meta, native)| {
            bits | dispatch::place_mask_bits::<T>(&meta, native)
        });
        Self::from_bits(bits)
    }
}

impl<T, const N: usize, C> Clone for FixedSizeMask<T, N, C> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const N: usize, C> Copy for FixedSizeMask<T, N, C> {}

impl<T, const N: usize, C> PartialEq for FixedSizeMask<T, N, C> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<T, const N: usize, C> Eq for FixedSizeMask<T, N, C> {}

impl<T, const N: usize, C> Hash for FixedSizeMask<T, N, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<T: Element, const N: usize, C: ChunkCatalog> Default for FixedSizeMask<T, N, C> {
    /// No lane set.
    ///
    /// Checks the width like every other constructor:
    ///
    /// ```compile_fail
    /// let _ = fixsimd::FixedSizeMask::<f32, 0>::default();
    /// ```
    fn default() -> Self {
        Self::wrap(0)
    }
}

impl<T, const N: usize, C> Debug for FixedSizeMask<T, N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries((0..N).map(|lane| (self.bits >> lane) & 1 != 0))
            .finish()
    }
}

impl<T: Element, const N: usize, C: ChunkCatalog> From<[bool; N]> for FixedSizeMask<T, N, C> {
    fn from(lanes: [bool; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: Element, const N: usize, C: ChunkCatalog> TryFrom<&[bool]> for FixedSizeMask<T, N, C> {
    type Error = FixedSizeError;

    /// Requires exactly `N` values.
    fn try_from(mem: &[bool]) -> Result<Self, FixedSizeError> {
        if mem.len() != N {
            return Err(length_mismatch(N, mem.len()));
        }
        Ok(Self::load(mem))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::kind::{Simd128, Simd256};

    type Mask13 = FixedSizeMask<f32, 13, Simd128>;

    #[test]
    fn test_default_is_empty() {
        let mask = Mask13::default();
        assert!(mask.none());
        assert_eq!(mask, Mask13::splat(false));
        assert_eq!(FixedSizeMask::<u8, 64, Simd256>::default().to_bits(), 0);
    }

    #[test]
    fn test_bits_above_width_are_cleared() {
        let mask = Mask13::from_bits(u64::MAX);
        assert_eq!(mask.to_bits(), 0x1FFF);
        assert!(mask.all());
        assert_eq!(!Mask13::splat(false), mask);
        assert_eq!(Mask13::splat(true), mask);
    }

    #[test]
    fn test_array_and_memory_round_trip() {
        let lanes = [
            true, false, false, false, true, false, false, false, false, false, false, false,
            true,
        ];
        let mask = Mask13::from_array(lanes);
        assert_eq!(mask.to_bits(), (1 << 0) | (1 << 4) | (1 << 12));
        assert_eq!(mask.to_array(), lanes);

        let mut mem = [false; 16];
        mask.store(&mut mem);
        assert_eq!(&mem[..13], &lanes);
        assert!(!mem[13..].iter().any(|&set| set));
        assert_eq!(Mask13::load(&mem), mask);
    }

    #[test]
    fn test_native_chunks_round_trip() {
        let mask = Mask13::from_bits((1 << 0) | (1 << 4) | (1 << 12));
        let chunks: Vec<_> = mask.native_chunks().collect();

        let parts: Vec<u64> = chunks.iter().map(|&(_, bits)| bits).collect();
        assert_eq!(parts, vec![0b0001, 0b0001, 0b0000, 1]);
        assert_eq!(Mask13::from_native_chunks(chunks), mask);
    }

    #[test]
    fn test_queries() {
        let none = FixedSizeMask::<i16, 9, Simd256>::default();
        assert!(none.none() && !none.any() && !none.some());
        assert_eq!(none.first_set(), None);
        assert_eq!(none.last_set(), None);

        let mut mask = none;
        mask.set(3, true);
        mask.set(7, true);
        assert!(mask.some());
        assert_eq!(mask.count(), 2);
        assert_eq!((mask.first_set(), mask.last_set()), (Some(3), Some(7)));
        mask.set(3, false);
        assert_eq!(mask.to_bits(), 1 << 7);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_get_out_of_range_panics() {
        Mask13::splat(true).get(13);
    }

    #[test]
    fn test_try_from_checks_length() {
        let short = [true; 12];
        assert_eq!(
            Mask13::try_from(&short[..]),
            Err(FixedSizeError::LengthMismatch {
                expected: 13,
                actual: 12
            })
        );
        assert!(Mask13::try_from(&[true; 13][..]).unwrap().all());
    }

    #[test]
    fn test_debug_lists_lanes() {
        let mask = FixedSizeMask::<u8, 3, Simd128>::from_bits(0b101);
        assert_eq!(format!("{mask:?}"), "[true, false, true]");
    }
}
