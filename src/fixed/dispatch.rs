//! Applying native operations across the chunks of a fixed-size vector.
//!
//! A [`ChunkSequence`] mixes chunk kinds, and each kind maps to a different
//! native vector type. [`with_native`] turns a runtime [`ChunkKind`] into a
//! generic call on the matching type, and the helpers below walk a sequence
//! run by run, so the kind is matched once per run rather than once per
//! chunk. Every helper visits chunks in ascending lane offset.
//!
//! Storage is a plain lane slice: a chunk is loaded from its lane range,
//! processed in registers and stored back.
//!
//! Operations are passed as types implementing one of the `Chunk*` traits,
//! since they must work for every native vector type of the element:
//!
//! ```rust
//! use fixsimd::fixed::dispatch::ChunkMap;
//! use fixsimd::{FixedSizeSimd, NativeVector, Simd128};
//!
//! struct Halve;
//!
//! impl ChunkMap<f32> for Halve {
//!     fn apply<V: NativeVector<Elem = f32>>(&self, chunk: V) -> V {
//!         chunk.mul(V::splat(0.5))
//!     }
//! }
//!
//! let v = FixedSizeSimd::<f32, 6, Simd128>::splat(3.0);
//! assert_eq!(v.map_chunks(&Halve).to_array(), [1.5; 6]);
//! ```

use crate::fixed::bitmask::{chunk_from_bits, chunk_to_bits};
use crate::fixed::kind::ChunkKind;
use crate::fixed::packer::{ChunkMeta, ChunkRun, ChunkSequence};
use crate::simd::{Element, Lanes, NativeMask, NativeVector};

/// A computation generic over the native vector type of a chunk.
pub trait NativeVisitor<T: Element> {
    type Output;

    fn visit<V: NativeVector<Elem = T>>(self) -> Self::Output;
}

/// Calls `visitor` with the native vector type `T` uses for `kind`.
#[inline(always)]
pub fn with_native<T: Element, F: NativeVisitor<T>>(kind: ChunkKind, visitor: F) -> F::Output {
    match kind {
        ChunkKind::Width512 => visitor.visit::<T::V512>(),
        ChunkKind::Width256 => visitor.visit::<T::V256>(),
        ChunkKind::Width128 => visitor.visit::<T::V128>(),
        ChunkKind::Scalar => visitor.visit::<Lanes<T, 1>>(),
    }
}

/// A lane-wise unary chunk operation.
pub trait ChunkMap<T: Element> {
    fn apply<V: NativeVector<Elem = T>>(&self, chunk: V) -> V;
}

/// A lane-wise binary chunk operation.
pub trait ChunkZip<T: Element> {
    fn apply<V: NativeVector<Elem = T>>(&self, a: V, b: V) -> V;
}

/// A lane-wise ternary chunk operation.
pub trait ChunkZip3<T: Element> {
    fn apply<V: NativeVector<Elem = T>>(&self, a: V, b: V, c: V) -> V;
}

/// A lane-wise predicate producing the chunk's native mask.
pub trait ChunkCompare<T: Element> {
    fn apply<V: NativeVector<Elem = T>>(&self, a: V, b: V) -> V::Mask;
}

/// Read-only access to every chunk, with its position.
pub trait ChunkInspect<T: Element> {
    fn inspect<V: NativeVector<Elem = T>>(&mut self, meta: ChunkMeta, chunk: V);
}

#[inline(always)]
fn check_width<V: NativeVector>(run: &ChunkRun) {
    debug_assert_eq!(
        V::LANES,
        run.lanes,
        "{} chunk of {} lanes packed onto a {}-lane register",
        run.kind,
        run.lanes,
        V::LANES
    );
}

/// Hands the visitor built for every run of `seq` to [`with_native`], in
/// order. Expects the element type to be named `T` at the call site.
macro_rules! for_each_run {
    ($seq:expr, |$run:ident| $visitor:expr) => {
        for $run in $seq.runs() {
            with_native::<T, _>($run.kind, $visitor);
        }
    };
}

struct Generate<'a, T, F> {
    run: &'a ChunkRun,
    dst: &'a mut [T],
    f: &'a mut F,
}

impl<T: Element, F: FnMut(usize) -> T> NativeVisitor<T> for Generate<'_, T, F> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        check_width::<V>(self.run);
        let Generate { run, dst, f } = self;
        for meta in run.chunks() {
            V::generate(|lane| f(meta.offset + lane)).store(&mut dst[meta.range()]);
        }
    }
}

/// Fills `dst` with `f(lane)` chunk by chunk.
#[inline(always)]
pub fn generate<T: Element, F: FnMut(usize) -> T>(seq: &ChunkSequence, dst: &mut [T], mut f: F) {
    for_each_run!(seq, |run| Generate {
        run,
        dst: &mut *dst,
        f: &mut f,
    });
}

struct Splat<'a, T> {
    run: &'a ChunkRun,
    dst: &'a mut [T],
    value: T,
}

impl<T: Element> NativeVisitor<T> for Splat<'_, T> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        check_width::<V>(self.run);
        let chunk = V::splat(self.value);
        for meta in self.run.chunks() {
            chunk.store(&mut self.dst[meta.range()]);
        }
    }
}

/// Broadcasts `value` to every lane of `dst`.
#[inline(always)]
pub fn splat<T: Element>(seq: &ChunkSequence, dst: &mut [T], value: T) {
    for_each_run!(seq, |run| Splat {
        run,
        dst: &mut *dst,
        value,
    });
}

struct Map<'a, T, F> {
    run: &'a ChunkRun,
    src: &'a [T],
    dst: &'a mut [T],
    op: &'a F,
}

impl<T: Element, F: ChunkMap<T>> NativeVisitor<T> for Map<'_, T, F> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        check_width::<V>(self.run);
        for meta in self.run.chunks() {
            let range = meta.range();
            self.op
                .apply(V::load(&self.src[range.clone()]))
                .store(&mut self.dst[range]);
        }
    }
}

/// `dst = op(src)` chunk by chunk.
#[inline(always)]
pub fn map<T: Element, F: ChunkMap<T>>(seq: &ChunkSequence, src: &[T], dst: &mut [T], op: &F) {
    for_each_run!(seq, |run| Map {
        run,
        src,
        dst: &mut *dst,
        op,
    });
}

struct MapInPlace<'a, T, F> {
    run: &'a ChunkRun,
    lanes: &'a mut [T],
    op: &'a F,
}

impl<T: Element, F: ChunkMap<T>> NativeVisitor<T> for MapInPlace<'_, T, F> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        check_width::<V>(self.run);
        for meta in self.run.chunks() {
            let lanes = &mut self.lanes[meta.range()];
            self.op.apply(V::load(lanes)).store(lanes);
        }
    }
}

/// `lanes = op(lanes)` chunk by chunk.
#[inline(always)]
pub fn map_in_place<T: Element, F: ChunkMap<T>>(seq: &ChunkSequence, lanes: &mut [T], op: &F) {
    for_each_run!(seq, |run| MapInPlace {
        run,
        lanes: &mut *lanes,
        op,
    });
}

struct Zip<'a, T, F> {
    run: &'a ChunkRun,
    a: &'a [T],
    b: &'a [T],
    dst: &'a mut [T],
    op: &'a F,
}

impl<T: Element, F: ChunkZip<T>> NativeVisitor<T> for Zip<'_, T, F> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        check_width::<V>(self.run);
        for meta in self.run.chunks() {
            let range = meta.range();
            let a = V::load(&self.a[range.clone()]);
            let b = V::load(&self.b[range.clone()]);
            self.op.apply(a, b).store(&mut self.dst[range]);
        }
    }
}

/// `dst = op(a, b)` chunk by chunk.
#[inline(always)]
pub fn zip<T: Element, F: ChunkZip<T>>(
    seq: &ChunkSequence,
    a: &[T],
    b: &[T],
    dst: &mut [T],
    op: &F,
) {
    for_each_run!(seq, |run| Zip {
        run,
        a,
        b,
        dst: &mut *dst,
        op,
    });
}

struct Zip3<'a, T, F> {
    run: &'a ChunkRun,
    a: &'a [T],
    b: &'a [T],
    c: &'a [T],
    dst: &'a mut [T],
    op: &'a F,
}

impl<T: Element, F: ChunkZip3<T>> NativeVisitor<T> for Zip3<'_, T, F> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        check_width::<V>(self.run);
        for meta in self.run.chunks() {
            let range = meta.range();
            let a = V::load(&self.a[range.clone()]);
            let b = V::load(&self.b[range.clone()]);
            let c = V::load(&self.c[range.clone()]);
            self.op.apply(a, b, c).store(&mut self.dst[range]);
        }
    }
}

/// `dst = op(a, b, c)` chunk by chunk.
#[inline(always)]
pub fn zip3<T: Element, F: ChunkZip3<T>>(
    seq: &ChunkSequence,
    a: &[T],
    b: &[T],
    c: &[T],
    dst: &mut [T],
    op: &F,
) {
    for_each_run!(seq, |run| Zip3 {
        run,
        a,
        b,
        c,
        dst: &mut *dst,
        op,
    });
}

struct AssignWhere<'a, T> {
    run: &'a ChunkRun,
    bits: u64,
    dst: &'a mut [T],
    src: &'a [T],
}

impl<T: Element> NativeVisitor<T> for AssignWhere<'_, T> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        check_width::<V>(self.run);
        for meta in self.run.chunks() {
            let mask: V::Mask = chunk_from_bits(self.bits, &meta);
            let dst = &mut self.dst[meta.range()];
            let src = V::load(&self.src[meta.range()]);
            V::select(mask, src, V::load(dst)).store(dst);
        }
    }
}

/// Copies the lanes of `src` selected by `bits` into `dst`.
#[inline(always)]
pub fn assign_where<T: Element>(seq: &ChunkSequence, bits: u64, dst: &mut [T], src: &[T]) {
    for_each_run!(seq, |run| AssignWhere {
        run,
        bits,
        dst: &mut *dst,
        src,
    });
}

struct UpdateWhere<'a, T, F> {
    run: &'a ChunkRun,
    bits: u64,
    dst: &'a mut [T],
    rhs: &'a [T],
    op: &'a F,
}

impl<T: Element, F: ChunkZip<T>> NativeVisitor<T> for UpdateWhere<'_, T, F> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        check_width::<V>(self.run);
        let one = V::splat(T::one());
        for meta in self.run.chunks() {
            let mask: V::Mask = chunk_from_bits(self.bits, &meta);
            let dst = &mut self.dst[meta.range()];
            let old = V::load(dst);
            // unselected lanes see a neutral operand so they cannot trap
            let rhs = V::select(mask, V::load(&self.rhs[meta.range()]), one);
            V::select(mask, self.op.apply(old, rhs), old).store(dst);
        }
    }
}

/// `dst = op(dst, rhs)` on the lanes selected by `bits`, other lanes keep
/// their value. `op` only ever sees `rhs` values of selected lanes; the rest
/// are replaced by one.
#[inline(always)]
pub fn update_where<T: Element, F: ChunkZip<T>>(
    seq: &ChunkSequence,
    bits: u64,
    dst: &mut [T],
    rhs: &[T],
    op: &F,
) {
    for_each_run!(seq, |run| UpdateWhere {
        run,
        bits,
        dst: &mut *dst,
        rhs,
        op,
    });
}

struct Compare<'a, T, F> {
    run: &'a ChunkRun,
    a: &'a [T],
    b: &'a [T],
    op: &'a F,
}

impl<T: Element, F: ChunkCompare<T>> NativeVisitor<T> for Compare<'_, T, F> {
    type Output = u64;

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) -> u64 {
        check_width::<V>(self.run);
        self.run.chunks().fold(0, |bits, meta| {
            let a = V::load(&self.a[meta.range()]);
            let b = V::load(&self.b[meta.range()]);
            bits | chunk_to_bits(self.op.apply(a, b), &meta)
        })
    }
}

/// Evaluates `op` chunk by chunk and gathers the logical mask.
#[inline(always)]
pub fn compare<T: Element, F: ChunkCompare<T>>(
    seq: &ChunkSequence,
    a: &[T],
    b: &[T],
    op: &F,
) -> u64 {
    seq.runs()
        .iter()
        .fold(0, |bits, run| {
            bits | with_native::<T, _>(run.kind, Compare { run, a, b, op })
        })
}

struct Inspect<'a, T, F> {
    run: &'a ChunkRun,
    lanes: &'a [T],
    inspector: &'a mut F,
}

impl<T: Element, F: ChunkInspect<T>> NativeVisitor<T> for Inspect<'_, T, F> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        check_width::<V>(self.run);
        for meta in self.run.chunks() {
            self.inspector
                .inspect(meta, V::load(&self.lanes[meta.range()]));
        }
    }
}

/// Hands every chunk of `lanes` to `inspector`.
#[inline(always)]
pub fn for_each<T: Element, F: ChunkInspect<T>>(
    seq: &ChunkSequence,
    lanes: &[T],
    inspector: &mut F,
) {
    for_each_run!(seq, |run| Inspect {
        run,
        lanes,
        inspector: &mut *inspector,
    });
}

struct Extract<'a, T> {
    lanes: &'a [T],
    local: usize,
}

impl<T: Element> NativeVisitor<T> for Extract<'_, T> {
    type Output = T;

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) -> T {
        V::load(self.lanes).extract(self.local)
    }
}

/// Reads lane `local` of the chunk `meta` through its native type.
#[inline(always)]
pub fn extract<T: Element>(meta: &ChunkMeta, lanes: &[T], local: usize) -> T {
    with_native::<T, _>(
        meta.kind,
        Extract {
            lanes: &lanes[meta.range()],
            local,
        },
    )
}

struct Insert<'a, T> {
    lanes: &'a mut [T],
    local: usize,
    value: T,
}

impl<T: Element> NativeVisitor<T> for Insert<'_, T> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        let mut chunk = V::load(self.lanes);
        chunk.insert(self.local, self.value);
        chunk.store(self.lanes);
    }
}

/// Overwrites lane `local` of the chunk `meta` through its native type.
#[inline(always)]
pub fn insert<T: Element>(meta: &ChunkMeta, lanes: &mut [T], local: usize, value: T) {
    with_native::<T, _>(
        meta.kind,
        Insert {
            lanes: &mut lanes[meta.range()],
            local,
            value,
        },
    )
}

struct LoadBools<'a> {
    run: &'a ChunkRun,
    src: &'a [bool],
}

impl<T: Element> NativeVisitor<T> for LoadBools<'_> {
    type Output = u64;

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) -> u64 {
        self.run.chunks().fold(0, |bits, meta| {
            let mask = V::Mask::load_bools(&self.src[meta.range()]);
            bits | chunk_to_bits(mask, &meta)
        })
    }
}

/// Loads one `bool` per lane through each chunk's native mask.
#[inline(always)]
pub fn load_bools<T: Element>(seq: &ChunkSequence, src: &[bool]) -> u64 {
    seq.runs().iter().fold(0, |bits, run| {
        bits | with_native::<T, _>(run.kind, LoadBools { run, src })
    })
}

struct StoreBools<'a> {
    run: &'a ChunkRun,
    bits: u64,
    dst: &'a mut [bool],
}

impl<T: Element> NativeVisitor<T> for StoreBools<'_> {
    type Output = ();

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) {
        for meta in self.run.chunks() {
            let mask: V::Mask = chunk_from_bits(self.bits, &meta);
            mask.store_bools(&mut self.dst[meta.range()]);
        }
    }
}

/// Stores one `bool` per lane through each chunk's native mask.
#[inline(always)]
pub fn store_bools<T: Element>(seq: &ChunkSequence, bits: u64, dst: &mut [bool]) {
    for run in seq.runs() {
        with_native::<T, _>(
            run.kind,
            StoreBools {
                run,
                bits,
                dst: &mut *dst,
            },
        );
    }
}

struct NativeBits<'a> {
    meta: &'a ChunkMeta,
    bits: u64,
}

impl<T: Element> NativeVisitor<T> for NativeBits<'_> {
    type Output = u64;

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) -> u64 {
        chunk_from_bits::<V::Mask>(self.bits, self.meta).to_bits()
    }
}

/// The chunk's slice of `bits` after conversion to its native mask,
/// starting at bit 0.
#[inline(always)]
pub fn native_mask_bits<T: Element>(meta: &ChunkMeta, bits: u64) -> u64 {
    with_native::<T, _>(meta.kind, NativeBits { meta, bits })
}

struct PlaceBits<'a> {
    meta: &'a ChunkMeta,
    native: u64,
}

impl<T: Element> NativeVisitor<T> for PlaceBits<'_> {
    type Output = u64;

    #[inline(always)]
    fn visit<V: NativeVector<Elem = T>>(self) -> u64 {
        chunk_to_bits(V::Mask::from_bits(self.native), self.meta)
    }
}

/// Places native mask bits of the chunk `meta` into the logical mask.
#[inline(always)]
pub fn place_mask_bits<T: Element>(meta: &ChunkMeta, native: u64) -> u64 {
    with_native::<T, _>(meta.kind, PlaceBits { meta, native })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::kind::{ChunkCatalog, Simd128, Simd256};
    use crate::fixed::packer::pack;

    struct Twice;

    impl ChunkMap<i32> for Twice {
        fn apply<V: NativeVector<Elem = i32>>(&self, chunk: V) -> V {
            chunk.add(chunk)
        }
    }

    struct Add;

    impl ChunkZip<i32> for Add {
        fn apply<V: NativeVector<Elem = i32>>(&self, a: V, b: V) -> V {
            a.add(b)
        }
    }

    struct Div;

    impl ChunkZip<i32> for Div {
        fn apply<V: NativeVector<Elem = i32>>(&self, a: V, b: V) -> V {
            a.div(b)
        }
    }

    struct Lt;

    impl ChunkCompare<i32> for Lt {
        fn apply<V: NativeVector<Elem = i32>>(&self, a: V, b: V) -> V::Mask {
            a.simd_lt(b)
        }
    }

    #[derive(Default)]
    struct Record(Vec<(usize, ChunkKind, usize, usize)>);

    impl ChunkInspect<i32> for Record {
        fn inspect<V: NativeVector<Elem = i32>>(&mut self, meta: ChunkMeta, chunk: V) {
            assert_eq!(V::LANES, meta.width);
            self.0
                .push((meta.index, meta.kind, meta.offset, chunk.extract(0) as usize));
        }
    }

    #[test]
    fn test_visits_in_offset_order() {
        let seq = pack(4, 15, Simd256::KINDS);
        let lanes: Vec<i32> = (0..15).collect();

        let mut record = Record::default();
        for_each(&seq, &lanes, &mut record);

        assert_eq!(
            record.0,
            vec![
                (0, ChunkKind::Width256, 0, 0),
                (1, ChunkKind::Width128, 8, 8),
                (2, ChunkKind::Scalar, 12, 12),
                (3, ChunkKind::Scalar, 13, 13),
                (4, ChunkKind::Scalar, 14, 14),
            ]
        );
    }

    #[test]
    fn test_generate_map_zip() {
        let seq = pack(4, 7, Simd128::KINDS);

        let mut a = [0i32; 7];
        generate(&seq, &mut a, |lane| lane as i32 * 10);
        assert_eq!(a, [0, 10, 20, 30, 40, 50, 60]);

        let mut doubled = [0i32; 7];
        map(&seq, &a, &mut doubled, &Twice);
        assert_eq!(doubled, [0, 20, 40, 60, 80, 100, 120]);

        let mut sum = [0i32; 7];
        zip(&seq, &a, &doubled, &mut sum, &Add);
        assert_eq!(sum, [0, 30, 60, 90, 120, 150, 180]);

        map_in_place(&seq, &mut sum, &Twice);
        assert_eq!(sum[6], 360);

        let mut ones = [0i32; 7];
        splat(&seq, &mut ones, 1);
        assert_eq!(ones, [1; 7]);
    }

    #[test]
    fn test_compare_gathers_all_chunks() {
        let seq = pack(4, 7, Simd128::KINDS);
        let a = [0, 5, 0, 5, 0, 5, 0];
        let b = [1; 7];
        assert_eq!(compare(&seq, &a, &b, &Lt), 0b101_0101);
    }

    #[test]
    fn test_assign_where_keeps_unselected_lanes() {
        let seq = pack(4, 6, Simd128::KINDS);
        let mut dst = [1, 2, 3, 4, 5, 6];
        assign_where(&seq, 0b10_0110, &mut dst, &[-1; 6]);
        assert_eq!(dst, [1, -1, -1, 4, 5, -1]);
    }

    #[test]
    fn test_update_where_never_divides_unselected_lanes() {
        let seq = pack(4, 5, Simd128::KINDS);
        let mut dst = [10, 20, 30, 40, 50];
        update_where(&seq, 0b10001, &mut dst, &[2, 0, 0, 0, 5], &Div);
        assert_eq!(dst, [5, 20, 30, 40, 10]);
    }

    #[test]
    fn test_extract_insert() {
        let seq = pack(4, 6, Simd128::KINDS);
        let mut lanes = [0, 1, 2, 3, 4, 5];

        let (meta, local) = seq.locate(2).unwrap();
        assert_eq!(extract(&meta, &lanes, local), 2);

        let (meta, local) = seq.locate(5).unwrap();
        insert(&meta, &mut lanes, local, 42);
        assert_eq!(lanes, [0, 1, 2, 3, 4, 42]);
    }

    #[test]
    fn test_bool_memory_round_trip() {
        let seq = pack(4, 6, Simd128::KINDS);
        let src = [true, false, false, true, true, false];
        let bits = load_bools::<i32>(&seq, &src);
        assert_eq!(bits, 0b01_1001);

        let mut dst = [false; 6];
        store_bools::<i32>(&seq, bits, &mut dst);
        assert_eq!(dst, src);
    }

    #[test]
    fn test_native_mask_bits_per_chunk() {
        let seq = pack(4, 6, Simd128::KINDS);
        let bits = 0b11_0110;
        let chunks: Vec<u64> = seq
            .iter()
            .map(|meta| native_mask_bits::<i32>(&meta, bits))
            .collect();
        assert_eq!(chunks, vec![0b0110, 1, 1]);

        let rebuilt = seq
            .iter()
            .zip(&chunks)
            .fold(0, |acc, (meta, &native)| acc | place_mask_bits::<i32>(&meta, native));
        assert_eq!(rebuilt, bits);
    }
}
