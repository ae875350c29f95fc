//! Horizontal reductions of fixed-size vectors.
//!
//! A reduction runs in two phases. Within each run of same-kind chunks the
//! chunks are combined lane-wise in a balanced tree, staying at native width,
//! and the surviving chunk is reduced horizontally to one value. The per-run
//! values are then combined with the same balanced tree.
//!
//! ```text
//! f32, N = 13, Simd128:  [128 x3, scalar]
//!
//!   ((c0 + c1) + c2)  --horizontal-->  r0
//!   s12                                r1
//!                                      r0 + r1
//! ```
//!
//! Runs of different kinds are reduced separately; a 256-bit run is not
//! folded onto a following 128-bit run before its horizontal step. The order
//! of operations depends only on the chunk sequence, so floating-point
//! results are reproducible for a given element type, width and catalog.

use crate::fixed::dispatch::{with_native, NativeVisitor};
use crate::fixed::packer::{ChunkRun, ChunkSequence};
use crate::simd::{Element, NativeVector};

/// A binary operation used to reduce lanes.
///
/// Implemented for any `Fn(T, T) -> T + Copy` closure, which combines chunks
/// lane by lane. The named operations [`Plus`], [`Product`], [`Minimum`] and
/// [`Maximum`] use the native chunk arithmetic instead.
pub trait ReduceOp<T: Element>: Copy {
    fn combine(self, a: T, b: T) -> T;

    /// Combines two chunks lane-wise.
    #[inline(always)]
    fn combine_chunks<V: NativeVector<Elem = T>>(self, a: V, b: V) -> V {
        a.zip_map(b, move |x, y| self.combine(x, y))
    }

    /// Reduces one chunk to a single value.
    #[inline(always)]
    fn reduce_chunk<V: NativeVector<Elem = T>>(self, chunk: V) -> T {
        chunk.reduce(move |x, y| self.combine(x, y))
    }
}

impl<T: Element, F: Fn(T, T) -> T + Copy> ReduceOp<T> for F {
    #[inline(always)]
    fn combine(self, a: T, b: T) -> T {
        self(a, b)
    }
}

macro_rules! named_reduce_op {
    ($(#[$doc:meta])* $name:ident, $lane:ident, $chunk:ident) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name;

        impl<T: Element> ReduceOp<T> for $name {
            #[inline(always)]
            fn combine(self, a: T, b: T) -> T {
                a.$lane(b)
            }

            #[inline(always)]
            fn combine_chunks<V: NativeVector<Elem = T>>(self, a: V, b: V) -> V {
                a.$chunk(b)
            }

            #[inline(always)]
            fn reduce_chunk<V: NativeVector<Elem = T>>(self, chunk: V) -> T {
                chunk.reduce(T::$lane)
            }
        }
    };
}

named_reduce_op!(
    /// Sum of all lanes (wrapping for integers).
    Plus, lane_add, add
);
named_reduce_op!(
    /// Product of all lanes (wrapping for integers).
    Product, lane_mul, mul
);
named_reduce_op!(
    /// Smallest lane.
    Minimum, lane_min, min
);
named_reduce_op!(
    /// Largest lane.
    Maximum, lane_max, max
);

/// Combines `leaf(first)..leaf(first + count)` in a balanced binary tree.
///
/// The left subtree takes the largest power of two below `count`, so
/// `count = 5` groups as `((0 1) (2 3)) 4`.
#[inline(always)]
fn balanced<X>(
    first: usize,
    count: usize,
    leaf: &impl Fn(usize) -> X,
    combine: &impl Fn(X, X) -> X,
) -> X {
    debug_assert!(count > 0, "reduction over no values");
    if count == 1 {
        return leaf(first);
    }
    let left = count.next_power_of_two() / 2;
    combine(
        balanced(first, left, leaf, combine),
        balanced(first + left, count - left, leaf, combine),
    )
}

struct ReduceRun<'a, T, R> {
    run: &'a ChunkRun,
    lanes: &'a [T],
    op: R,
}

impl<T: Element, R: ReduceOp<T>> NativeVisitor<T> for ReduceRun<'_, T, R> {
    type Output = T;

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) -> T {
        let ReduceRun { run, lanes, op } = self;
        let chunk = balanced(
            0,
            run.count,
            &|i: usize| V::load(&lanes[run.chunk(i).range()]),
            &|a: V, b: V| op.combine_chunks(a, b),
        );
        op.reduce_chunk(chunk)
    }
}

/// Reduces `lanes`, laid out as `seq`, to a single value.
#[inline(always)]
pub fn reduce<T: Element, R: ReduceOp<T>>(seq: &ChunkSequence, lanes: &[T], op: R) -> T {
    let runs = seq.runs();
    let mut partials = [T::zero(); 4];
    for (partial, run) in partials.iter_mut().zip(runs) {
        *partial = with_native::<T, _>(run.kind, ReduceRun { run, lanes, op });
    }
    balanced(
        0,
        runs.len(),
        &|i: usize| partials[i],
        &|a: T, b: T| op.combine(a, b),
    )
}
