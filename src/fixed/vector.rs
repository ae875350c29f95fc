//! The fixed-size vector type.

use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::mem::size_of;

use num::traits::AsPrimitive;

use crate::error::{lane_out_of_range, length_mismatch, FixedSizeError, Result};
use crate::fixed::dispatch::{self, ChunkInspect, ChunkMap, ChunkZip};
use crate::fixed::kind::{ChunkCatalog, NativeCatalog};
use crate::fixed::mask::FixedSizeMask;
use crate::fixed::ops::{
    AbsOp, AddOp, CopyOp, DecrementOp, EqOp, GeOp, GtOp, IncrementOp, LeOp, LtOp, MaxOp, MinOp,
    MulAddOp, NeOp, NegOp, SqrtOp, SubOp,
};
use crate::fixed::packer::{pack, ChunkSequence};
use crate::fixed::reduce::{self, Maximum, Minimum, Plus, Product, ReduceOp};
use crate::fixed::{memory_alignment, Alignment};
use crate::simd::{Element, FloatElement};

/// `N` lanes of `T`, processed as the widest native chunks of catalog `C`.
///
/// The value has the size and lane order of `[T; N]`. Which registers carry
/// the lanes is fixed per type and can be inspected through
/// [`LAYOUT`](Self::LAYOUT):
///
/// ```rust
/// use fixsimd::{Alignment, FixedSizeSimd, Simd256};
///
/// type F32x13 = FixedSizeSimd<f32, 13, Simd256>;
/// assert_eq!(F32x13::LAYOUT.to_string(), "[256, 128, scalar]");
///
/// let data: Vec<f32> = (0..13).map(|i| i as f32).collect();
/// let v = F32x13::load(&data, Alignment::Element);
/// let doubled = v + v;
/// assert_eq!(doubled.get(12), 24.0);
/// assert_eq!(doubled.hmax(), 24.0);
/// ```
///
/// `N` must lie in `1..=64`; other widths fail to compile when the type is
/// used.
#[repr(C)]
pub struct FixedSizeSimd<T, const N: usize, C = NativeCatalog> {
    lanes: [T; N],
    _catalog: PhantomData<fn() -> C>,
}

impl<T: Element, const N: usize, C: ChunkCatalog> FixedSizeSimd<T, N, C> {
    /// Chunk decomposition of every value of this type.
    pub const LAYOUT: ChunkSequence = pack(size_of::<T>(), N, C::KINDS);

    /// Recommended alignment, in bytes, for memory used with
    /// [`Alignment::Vector`].
    pub const MEMORY_ALIGNMENT: usize = memory_alignment(size_of::<T>(), N, C::KINDS);

    // Evaluating the layout rejects unsupported widths.
    const CHECKED: () = assert!(Self::LAYOUT.lanes() == N);

    #[inline(always)]
    fn wrap(lanes: [T; N]) -> Self {
        let () = Self::CHECKED;
        Self {
            lanes,
            _catalog: PhantomData,
        }
    }

    /// Broadcasts `value` to every lane.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        let mut lanes = [T::zero(); N];
        dispatch::splat(&Self::LAYOUT, &mut lanes, value);
        Self::wrap(lanes)
    }

    /// Builds the vector `[f(0), f(1), .., f(N - 1)]`.
    #[inline(always)]
    pub fn generate<F: FnMut(usize) -> T>(f: F) -> Self {
        let mut lanes = [T::zero(); N];
        dispatch::generate(&Self::LAYOUT, &mut lanes, f);
        Self::wrap(lanes)
    }

    #[inline(always)]
    pub fn from_array(lanes: [T; N]) -> Self {
        Self::wrap(lanes)
    }

    #[inline(always)]
    pub fn to_array(self) -> [T; N] {
        self.lanes
    }

    #[inline(always)]
    pub fn as_array(&self) -> &[T; N] {
        &self.lanes
    }

    /// Chunk decomposition, the same as [`LAYOUT`](Self::LAYOUT).
    #[inline(always)]
    pub fn layout(&self) -> ChunkSequence {
        Self::LAYOUT
    }

    /// Loads `mem[..N]` chunk by chunk.
    ///
    /// # Panics
    ///
    /// Panics if `mem` holds fewer than `N` values. With
    /// [`Alignment::Vector`], debug builds also panic when `mem` is not
    /// aligned to [`MEMORY_ALIGNMENT`](Self::MEMORY_ALIGNMENT).
    #[inline(always)]
    pub fn load(mem: &[T], alignment: Alignment) -> Self {
        let mem = &mem[..N];
        alignment.check(mem, Self::MEMORY_ALIGNMENT);

        let mut lanes = [T::zero(); N];
        dispatch::map(&Self::LAYOUT, mem, &mut lanes, &CopyOp);
        Self::wrap(lanes)
    }

    /// Like [`load`](Self::load), reporting a short slice as an error.
    pub fn try_load(mem: &[T], alignment: Alignment) -> Result<Self> {
        if mem.len() < N {
            return Err(length_mismatch(N, mem.len()));
        }
        Ok(Self::load(mem, alignment))
    }

    /// Stores the lanes into `mem[..N]` chunk by chunk.
    ///
    /// # Panics
    ///
    /// As for [`load`](Self::load).
    #[inline(always)]
    pub fn store(self, mem: &mut [T], alignment: Alignment) {
        let mem = &mut mem[..N];
        alignment.check(mem, Self::MEMORY_ALIGNMENT);
        dispatch::map(&Self::LAYOUT, &self.lanes, mem, &CopyOp);
    }

    /// Loads `mem[..N]`, converting every value with `as` semantics.
    ///
    /// ```rust
    /// use fixsimd::{Alignment, FixedSizeSimd, Simd128};
    ///
    /// let bytes = [1u8, 2, 250, 4, 5];
    /// let v = FixedSizeSimd::<f32, 5, Simd128>::load_converted(&bytes, Alignment::Element);
    /// assert_eq!(v.to_array(), [1.0, 2.0, 250.0, 4.0, 5.0]);
    /// ```
    pub fn load_converted<U>(mem: &[U], alignment: Alignment) -> Self
    where
        U: AsPrimitive<T>,
    {
        let mem = &mem[..N];
        alignment.check(mem, memory_alignment(size_of::<U>(), N, C::KINDS));
        Self::generate(|lane| mem[lane].as_())
    }

    /// Stores the lanes into `mem[..N]`, converting every value with `as`
    /// semantics.
    pub fn store_converted<U>(self, mem: &mut [U], alignment: Alignment)
    where
        U: Copy + 'static,
        T: AsPrimitive<U>,
    {
        let mem = &mut mem[..N];
        alignment.check(mem, memory_alignment(size_of::<U>(), N, C::KINDS));
        for (out, lane) in mem.iter_mut().zip(self.lanes) {
            *out = lane.as_();
        }
    }

    /// Reads lane `lane` through the chunk that owns it.
    ///
    /// # Panics
    ///
    /// Panics if `lane >= N`.
    #[inline]
    pub fn get(&self, lane: usize) -> T {
        match self.try_get(lane) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Overwrites lane `lane` through the chunk that owns it.
    ///
    /// # Panics
    ///
    /// Panics if `lane >= N`.
    #[inline]
    pub fn set(&mut self, lane: usize, value: T) {
        if let Err(err) = self.try_set(lane, value) {
            panic!("{err}");
        }
    }

    #[inline]
    pub fn try_get(&self, lane: usize) -> Result<T> {
        let (meta, local) = Self::LAYOUT
            .locate(lane)
            .ok_or_else(|| lane_out_of_range(lane, N))?;
        Ok(dispatch::extract(&meta, &self.lanes, local))
    }

    #[inline]
    pub fn try_set(&mut self, lane: usize, value: T) -> Result<()> {
        let (meta, local) = Self::LAYOUT
            .locate(lane)
            .ok_or_else(|| lane_out_of_range(lane, N))?;
        dispatch::insert(&meta, &mut self.lanes, local, value);
        Ok(())
    }

    /// Replaces the lanes selected by `mask` with `mem[..N]`.
    ///
    /// # Panics
    ///
    /// As for [`load`](Self::load).
    pub fn masked_load(&mut self, mask: FixedSizeMask<T, N, C>, mem: &[T], alignment: Alignment) {
        let mem = &mem[..N];
        alignment.check(mem, Self::MEMORY_ALIGNMENT);
        dispatch::assign_where(&Self::LAYOUT, mask.to_bits(), &mut self.lanes, mem);
    }

    /// Writes the lanes selected by `mask` to `mem[..N]`. The other elements
    /// of `mem` keep their value.
    ///
    /// # Panics
    ///
    /// As for [`store`](Self::store).
    pub fn masked_store(self, mask: FixedSizeMask<T, N, C>, mem: &mut [T], alignment: Alignment) {
        let mem = &mut mem[..N];
        alignment.check(mem, Self::MEMORY_ALIGNMENT);
        dispatch::assign_where(&Self::LAYOUT, mask.to_bits(), mem, &self.lanes);
    }

    /// Replaces the lanes selected by `mask` with those of `value`.
    #[inline(always)]
    pub fn masked_assign(&mut self, mask: FixedSizeMask<T, N, C>, value: Self) {
        dispatch::assign_where(&Self::LAYOUT, mask.to_bits(), &mut self.lanes, &value.lanes);
    }

    /// Restricts the following updates to the lanes selected by `mask`.
    ///
    /// ```rust
    /// use fixsimd::{FixedSizeMask, FixedSizeSimd, Simd128};
    ///
    /// type I32x6 = FixedSizeSimd<i32, 6, Simd128>;
    ///
    /// let mut v = I32x6::from_array([10, 20, 30, 40, 50, 60]);
    /// let divisors = I32x6::from_array([2, 0, 3, 0, 0, 4]);
    /// let nonzero = divisors.simd_ne(I32x6::splat(0));
    ///
    /// let mut selected = v.masked(nonzero);
    /// selected /= divisors;
    /// assert_eq!(v.to_array(), [5, 20, 10, 40, 50, 15]);
    /// ```
    #[inline(always)]
    pub fn masked(&mut self, mask: FixedSizeMask<T, N, C>) -> Masked<'_, T, N, C> {
        Masked { target: self, mask }
    }

    /// Lane-wise minimum.
    #[inline(always)]
    pub fn min(self, other: Self) -> Self {
        self.zip_chunks(other, &MinOp)
    }

    /// Lane-wise maximum.
    #[inline(always)]
    pub fn max(self, other: Self) -> Self {
        self.zip_chunks(other, &MaxOp)
    }

    /// Lane-wise absolute value (wrapping for signed integers).
    #[inline(always)]
    pub fn abs(self) -> Self {
        self.map_chunks(&AbsOp)
    }

    /// `self * b + c`.
    #[inline(always)]
    pub fn mul_add(self, b: Self, c: Self) -> Self {
        let mut lanes = [T::zero(); N];
        dispatch::zip3(&Self::LAYOUT, &self.lanes, &b.lanes, &c.lanes, &mut lanes, &MulAddOp);
        Self::wrap(lanes)
    }

    /// Adds one to every lane.
    #[inline(always)]
    pub fn increment(&mut self) {
        dispatch::map_in_place(&Self::LAYOUT, &mut self.lanes, &IncrementOp);
    }

    /// Subtracts one from every lane.
    #[inline(always)]
    pub fn decrement(&mut self) {
        dispatch::map_in_place(&Self::LAYOUT, &mut self.lanes, &DecrementOp);
    }

    #[inline(always)]
    pub fn simd_eq(self, rhs: Self) -> FixedSizeMask<T, N, C> {
        self.compare(rhs, &EqOp)
    }

    #[inline(always)]
    pub fn simd_ne(self, rhs: Self) -> FixedSizeMask<T, N, C> {
        self.compare(rhs, &NeOp)
    }

    #[inline(always)]
    pub fn simd_lt(self, rhs: Self) -> FixedSizeMask<T, N, C> {
        self.compare(rhs, &LtOp)
    }

    #[inline(always)]
    pub fn simd_le(self, rhs: Self) -> FixedSizeMask<T, N, C> {
        self.compare(rhs, &LeOp)
    }

    #[inline(always)]
    pub fn simd_gt(self, rhs: Self) -> FixedSizeMask<T, N, C> {
        self.compare(rhs, &GtOp)
    }

    #[inline(always)]
    pub fn simd_ge(self, rhs: Self) -> FixedSizeMask<T, N, C> {
        self.compare(rhs, &GeOp)
    }

    #[inline(always)]
    fn compare<F: dispatch::ChunkCompare<T>>(self, rhs: Self, op: &F) -> FixedSizeMask<T, N, C> {
        FixedSizeMask::from_bits(dispatch::compare(&Self::LAYOUT, &self.lanes, &rhs.lanes, op))
    }

    /// Combines all lanes with `op`, see [`reduce`](crate::fixed::reduce) for
    /// the order of operations.
    #[inline(always)]
    pub fn reduce<R: ReduceOp<T>>(self, op: R) -> T {
        reduce::reduce(&Self::LAYOUT, &self.lanes, op)
    }

    /// Sum of all lanes.
    #[inline(always)]
    pub fn sum(self) -> T {
        self.reduce(Plus)
    }

    /// Product of all lanes.
    #[inline(always)]
    pub fn product(self) -> T {
        self.reduce(Product)
    }

    /// Smallest lane.
    #[inline(always)]
    pub fn hmin(self) -> T {
        self.reduce(Minimum)
    }

    /// Largest lane.
    #[inline(always)]
    pub fn hmax(self) -> T {
        self.reduce(Maximum)
    }

    /// Applies `op` to every native chunk.
    #[inline(always)]
    pub fn map_chunks<F: ChunkMap<T>>(self, op: &F) -> Self {
        let mut lanes = [T::zero(); N];
        dispatch::map(&Self::LAYOUT, &self.lanes, &mut lanes, op);
        Self::wrap(lanes)
    }

    /// Applies `op` to every pair of corresponding native chunks.
    #[inline(always)]
    pub fn zip_chunks<F: ChunkZip<T>>(self, other: Self, op: &F) -> Self {
        let mut lanes = [T::zero(); N];
        dispatch::zip(&Self::LAYOUT, &self.lanes, &other.lanes, &mut lanes, op);
        Self::wrap(lanes)
    }

    /// Hands every native chunk, in lane order, to `inspector`.
    #[inline(always)]
    pub fn for_each_chunk<F: ChunkInspect<T>>(&self, inspector: &mut F) {
        dispatch::for_each(&Self::LAYOUT, &self.lanes, inspector);
    }
}

impl<T: FloatElement, const N: usize, C: ChunkCatalog> FixedSizeSimd<T, N, C> {
    /// Lane-wise square root.
    #[inline(always)]
    pub fn sqrt(self) -> Self {
        self.map_chunks(&SqrtOp)
    }
}

/// A vector restricted to the lanes of a mask, see
/// [`FixedSizeSimd::masked`].
///
/// The compound assignment operators update the selected lanes only. The
/// right-hand side of an unselected lane is never used, so a zero divisor
/// there is harmless.
pub struct Masked<'a, T, const N: usize, C = NativeCatalog> {
    target: &'a mut FixedSizeSimd<T, N, C>,
    mask: FixedSizeMask<T, N, C>,
}

impl<T: Element, const N: usize, C: ChunkCatalog> Masked<'_, T, N, C> {
    pub fn mask(&self) -> FixedSizeMask<T, N, C> {
        self.mask
    }

    /// Copies the selected lanes of `value`.
    #[inline(always)]
    pub fn assign(&mut self, value: FixedSizeSimd<T, N, C>) {
        self.target.masked_assign(self.mask, value);
    }

    /// Adds one to the selected lanes.
    #[inline(always)]
    pub fn increment(&mut self) {
        self.update(FixedSizeSimd::splat(T::one()), &AddOp);
    }

    /// Subtracts one from the selected lanes.
    #[inline(always)]
    pub fn decrement(&mut self) {
        self.update(FixedSizeSimd::splat(T::one()), &SubOp);
    }

    /// The target with its selected lanes negated. The target is unchanged.
    #[inline(always)]
    pub fn negated(&self) -> FixedSizeSimd<T, N, C> {
        let target = *self.target;
        self.mask.select(target.map_chunks(&NegOp), target)
    }

    #[inline(always)]
    pub(crate) fn update<F: ChunkZip<T>>(&mut self, rhs: FixedSizeSimd<T, N, C>, op: &F) {
        dispatch::update_where(
            &FixedSizeSimd::<T, N, C>::LAYOUT,
            self.mask.to_bits(),
            &mut self.target.lanes,
            &rhs.lanes,
            op,
        );
    }
}

impl<T: Copy, const N: usize, C> Clone for FixedSizeSimd<T, N, C> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy, const N: usize, C> Copy for FixedSizeSimd<T, N, C> {}

impl<T: PartialEq, const N: usize, C> PartialEq for FixedSizeSimd<T, N, C> {
    /// True when every lane compares equal; see
    /// [`simd_eq`](FixedSizeSimd::simd_eq) for the lane-wise form.
    fn eq(&self, other: &Self) -> bool {
        self.lanes == other.lanes
    }
}

impl<T: Debug, const N: usize, C> Debug for FixedSizeSimd<T, N, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FixedSizeSimd").field(&self.lanes).finish()
    }
}

impl<T: Element, const N: usize, C: ChunkCatalog> Default for FixedSizeSimd<T, N, C> {
    /// All lanes zero.
    fn default() -> Self {
        Self::splat(T::zero())
    }
}

impl<T: Element, const N: usize, C: ChunkCatalog> From<[T; N]> for FixedSizeSimd<T, N, C> {
    fn from(lanes: [T; N]) -> Self {
        Self::from_array(lanes)
    }
}

impl<T: Element, const N: usize, C: ChunkCatalog> From<FixedSizeSimd<T, N, C>> for [T; N] {
    fn from(v: FixedSizeSimd<T, N, C>) -> Self {
        v.to_array()
    }
}

impl<T: Element, const N: usize, C: ChunkCatalog> TryFrom<&[T]> for FixedSizeSimd<T, N, C> {
    type Error = FixedSizeError;

    /// Requires exactly `N` values.
    fn try_from(mem: &[T]) -> std::result::Result<Self, FixedSizeError> {
        if mem.len() != N {
            return Err(length_mismatch(N, mem.len()));
        }
        Ok(Self::load(mem, Alignment::Element))
    }
}
