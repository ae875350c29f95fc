//! Operator implementations for fixed-size vectors and masks.
//!
//! Each operator is a zero-sized chunk operation handed to the dispatcher, so
//! `a + b` becomes one native `add` per chunk.

use std::ops::{
    Add, AddAssign, BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Div,
    DivAssign, Mul, MulAssign, Neg, Not, Rem, RemAssign, Shl, ShlAssign, Shr, ShrAssign, Sub,
    SubAssign,
};

use crate::fixed::dispatch::{ChunkCompare, ChunkMap, ChunkZip, ChunkZip3};
use crate::fixed::kind::ChunkCatalog;
use crate::fixed::mask::FixedSizeMask;
use crate::fixed::vector::{FixedSizeSimd, Masked};
use crate::simd::{Element, FloatElement, IntElement, NativeVector};

macro_rules! native_zip {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            pub(crate) struct $name;

            impl<T: Element> ChunkZip<T> for $name {
                #[inline(always)]
                fn apply<V: NativeVector<Elem = T>>(&self, a: V, b: V) -> V {
                    a.$method(b)
                }
            }
        )*
    };
}

native_zip! {
    AddOp => add,
    SubOp => sub,
    MulOp => mul,
    DivOp => div,
    RemOp => rem,
    MinOp => min,
    MaxOp => max,
}

macro_rules! lane_zip {
    ($($name:ident => $lane:ident),* $(,)?) => {
        $(
            pub(crate) struct $name;

            impl<T: IntElement> ChunkZip<T> for $name {
                #[inline(always)]
                fn apply<V: NativeVector<Elem = T>>(&self, a: V, b: V) -> V {
                    a.zip_map(b, T::$lane)
                }
            }
        )*
    };
}

lane_zip! {
    AndOp => lane_and,
    OrOp => lane_or,
    XorOp => lane_xor,
    ShlOp => lane_shl,
    ShrOp => lane_shr,
}

macro_rules! native_compare {
    ($($name:ident => $method:ident),* $(,)?) => {
        $(
            pub(crate) struct $name;

            impl<T: Element> ChunkCompare<T> for $name {
                #[inline(always)]
                fn apply<V: NativeVector<Elem = T>>(&self, a: V, b: V) -> V::Mask {
                    a.$method(b)
                }
            }
        )*
    };
}

native_compare! {
    EqOp => simd_eq,
    NeOp => simd_ne,
    LtOp => simd_lt,
    LeOp => simd_le,
    GtOp => simd_gt,
    GeOp => simd_ge,
}

/// Loads and stores each chunk unchanged.
pub(crate) struct CopyOp;

impl<T: Element> ChunkMap<T> for CopyOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V {
        chunk
    }
}

pub(crate) struct NegOp;

impl<T: Element> ChunkMap<T> for NegOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V {
        chunk.neg()
    }
}

pub(crate) struct AbsOp;

impl<T: Element> ChunkMap<T> for AbsOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V {
        chunk.abs()
    }
}

pub(crate) struct IncrementOp;

impl<T: Element> ChunkMap<T> for IncrementOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V {
        chunk.add(V::splat(T::one()))
    }
}

pub(crate) struct DecrementOp;

impl<T: Element> ChunkMap<T> for DecrementOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V {
        chunk.sub(V::splat(T::one()))
    }
}

pub(crate) struct SqrtOp;

impl<T: FloatElement> ChunkMap<T> for SqrtOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V {
        chunk.map(T::lane_sqrt)
    }
}

pub(crate) struct NotOp;

impl<T: IntElement> ChunkMap<T> for NotOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V {
        chunk.map(T::lane_not)
    }
}

/// Shifts every lane left by the same amount.
pub(crate) struct ShlByOp(pub u32);

impl<T: IntElement> ChunkMap<T> for ShlByOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V {
        let amount = self.0;
        chunk.map(move |lane| lane.lane_shl_by(amount))
    }
}

/// Shifts every lane right by the same amount.
pub(crate) struct ShrByOp(pub u32);

impl<T: IntElement> ChunkMap<T> for ShrByOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V {
        let amount = self.0;
        chunk.map(move |lane| lane.lane_shr_by(amount))
    }
}

/// `a * b + c`, rounded twice.
pub(crate) struct MulAddOp;

impl<T: Element> ChunkZip3<T> for MulAddOp {
    #[inline(always)]
    fn apply<V: NativeVector<Elem = T>>(&self, a: V, b: V, c: V) -> V {
        a.mul(b).add(c)
    }
}

macro_rules! impl_binary_ops {
    ($bound:ident: $($Op:ident::$op:ident, $OpAssign:ident::$op_assign:ident => $chunk_op:ident;)*) => {
        $(
            impl<T: $bound, const N: usize, C: ChunkCatalog> $Op for FixedSizeSimd<T, N, C> {
                type Output = Self;

                #[inline(always)]
                fn $op(self, rhs: Self) -> Self {
                    self.zip_chunks(rhs, &$chunk_op)
                }
            }

            impl<T: $bound, const N: usize, C: ChunkCatalog> $OpAssign for FixedSizeSimd<T, N, C> {
                #[inline(always)]
                fn $op_assign(&mut self, rhs: Self) {
                    *self = self.zip_chunks(rhs, &$chunk_op);
                }
            }

            impl<T: $bound, const N: usize, C: ChunkCatalog> $OpAssign<FixedSizeSimd<T, N, C>>
                for Masked<'_, T, N, C>
            {
                /// Updates the selected lanes only.
                #[inline(always)]
                fn $op_assign(&mut self, rhs: FixedSizeSimd<T, N, C>) {
                    self.update(rhs, &$chunk_op);
                }
            }
        )*
    };
}

impl_binary_ops! {
    Element:
    Add::add, AddAssign::add_assign => AddOp;
    Sub::sub, SubAssign::sub_assign => SubOp;
    Mul::mul, MulAssign::mul_assign => MulOp;
    Div::div, DivAssign::div_assign => DivOp;
    Rem::rem, RemAssign::rem_assign => RemOp;
}

impl_binary_ops! {
    IntElement:
    BitAnd::bitand, BitAndAssign::bitand_assign => AndOp;
    BitOr::bitor, BitOrAssign::bitor_assign => OrOp;
    BitXor::bitxor, BitXorAssign::bitxor_assign => XorOp;
    Shl::shl, ShlAssign::shl_assign => ShlOp;
    Shr::shr, ShrAssign::shr_assign => ShrOp;
}

impl<T: Element, const N: usize, C: ChunkCatalog> Neg for FixedSizeSimd<T, N, C> {
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self {
        self.map_chunks(&NegOp)
    }
}

impl<T: IntElement, const N: usize, C: ChunkCatalog> Not for FixedSizeSimd<T, N, C> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        self.map_chunks(&NotOp)
    }
}

impl<T: IntElement, const N: usize, C: ChunkCatalog> Shl<u32> for FixedSizeSimd<T, N, C> {
    type Output = Self;

    /// Shifts every lane by `amount`, modulo the lane width.
    #[inline(always)]
    fn shl(self, amount: u32) -> Self {
        self.map_chunks(&ShlByOp(amount))
    }
}

impl<T: IntElement, const N: usize, C: ChunkCatalog> ShlAssign<u32> for FixedSizeSimd<T, N, C> {
    #[inline(always)]
    fn shl_assign(&mut self, amount: u32) {
        *self = self.map_chunks(&ShlByOp(amount));
    }
}

impl<T: IntElement, const N: usize, C: ChunkCatalog> Shr<u32> for FixedSizeSimd<T, N, C> {
    type Output = Self;

    /// Shifts every lane by `amount`, modulo the lane width. Signed lanes
    /// shift arithmetically.
    #[inline(always)]
    fn shr(self, amount: u32) -> Self {
        self.map_chunks(&ShrByOp(amount))
    }
}

impl<T: IntElement, const N: usize, C: ChunkCatalog> ShrAssign<u32> for FixedSizeSimd<T, N, C> {
    #[inline(always)]
    fn shr_assign(&mut self, amount: u32) {
        *self = self.map_chunks(&ShrByOp(amount));
    }
}

macro_rules! impl_mask_ops {
    ($($Op:ident::$op:ident, $OpAssign:ident::$op_assign:ident => $bit:tt;)*) => {
        $(
            impl<T: Element, const N: usize, C: ChunkCatalog> $Op for FixedSizeMask<T, N, C> {
                type Output = Self;

                #[inline(always)]
                fn $op(self, rhs: Self) -> Self {
                    Self::from_bits(self.to_bits() $bit rhs.to_bits())
                }
            }

            impl<T: Element, const N: usize, C: ChunkCatalog> $OpAssign for FixedSizeMask<T, N, C> {
                #[inline(always)]
                fn $op_assign(&mut self, rhs: Self) {
                    *self = *self $bit rhs;
                }
            }
        )*
    };
}

impl_mask_ops! {
    BitAnd::bitand, BitAndAssign::bitand_assign => &;
    BitOr::bitor, BitOrAssign::bitor_assign => |;
    BitXor::bitxor, BitXorAssign::bitxor_assign => ^;
}

impl<T: Element, const N: usize, C: ChunkCatalog> Not for FixedSizeMask<T, N, C> {
    type Output = Self;

    /// Flips the `N` valid lanes.
    #[inline(always)]
    fn not(self) -> Self {
        Self::from_bits(!self.to_bits())
    }
}
