//! Greedy decomposition of a logical width into native chunks.
//!
//! For a lane count `N`, an element size and a catalog, [`pack`] walks the
//! catalog widest first and takes as many chunks of each kind as still fit.
//! Because the walk never returns to a wider kind, the result is at most one
//! run per kind, which is how [`ChunkSequence`] stores it.
//!
//! ```text
//! f32, N = 19, Simd256:   [ 256 | 256 | s | s | s ]
//!                           0..8  8..16 16 17 18
//! ```

use std::fmt::{self, Display};
use std::ops::Range;

use crate::fixed::kind::{ChunkKind, KindSet};
use crate::fixed::MAX_LANES;

const RUN_SLOTS: usize = ChunkKind::ALL.len();

const EMPTY_RUN: ChunkRun = ChunkRun {
    kind: ChunkKind::Scalar,
    first: 0,
    offset: 0,
    count: 0,
    lanes: 1,
};

/// A maximal run of consecutive chunks of one kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkRun {
    pub kind: ChunkKind,
    /// Index of the run's first chunk in the sequence.
    pub first: usize,
    /// Lane offset of the run's first chunk.
    pub offset: usize,
    /// Number of chunks in the run, at least 1.
    pub count: usize,
    /// Lanes per chunk.
    pub lanes: usize,
}

impl ChunkRun {
    /// Lanes covered by the whole run.
    pub const fn width(&self) -> usize {
        self.count * self.lanes
    }

    pub const fn end(&self) -> usize {
        self.offset + self.width()
    }

    /// Metadata of the run's `i`-th chunk.
    pub const fn chunk(&self, i: usize) -> ChunkMeta {
        ChunkMeta {
            index: self.first + i,
            kind: self.kind,
            offset: self.offset + i * self.lanes,
            width: self.lanes,
        }
    }

    /// The run's chunks in ascending offset order.
    pub fn chunks(&self) -> impl Iterator<Item = ChunkMeta> {
        let run = *self;
        (0..run.count).map(move |i| run.chunk(i))
    }
}

/// One chunk of a sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkMeta {
    /// Position of the chunk in the sequence.
    pub index: usize,
    pub kind: ChunkKind,
    /// Sum of the widths of all preceding chunks.
    pub offset: usize,
    /// Lanes held by the chunk.
    pub width: usize,
}

impl ChunkMeta {
    pub const fn end(&self) -> usize {
        self.offset + self.width
    }

    /// Lane range owned by the chunk.
    pub const fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// The ordered chunk decomposition of a fixed-size vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChunkSequence {
    runs: [ChunkRun; RUN_SLOTS],
    run_count: usize,
    lanes: usize,
}

/// Decomposes `lanes` lanes of `element_size` bytes into the widest chunks
/// of `kinds`.
///
/// Evaluated in const context for every fixed-size type, so an invalid width
/// is reported when the type is instantiated.
///
/// # Panics
///
/// Panics if `lanes` is 0 or exceeds [`MAX_LANES`], or if `element_size` is 0.
pub const fn pack(element_size: usize, lanes: usize, kinds: KindSet) -> ChunkSequence {
    assert!(element_size > 0, "element size must be non-zero");
    assert!(lanes >= 1, "a fixed-size vector needs at least one lane");
    assert!(
        lanes <= MAX_LANES,
        "a fixed-size vector holds at most 64 lanes"
    );

    let mut runs = [EMPTY_RUN; RUN_SLOTS];
    let mut run_count = 0;
    let mut chunk_count = 0;
    let mut offset = 0;

    let mut i = 0;
    while i < ChunkKind::ALL.len() {
        let kind = ChunkKind::ALL[i];
        let width = kind.lanes(element_size);
        let remaining = lanes - offset;

        if kinds.contains(kind) && width >= 1 && width <= remaining {
            let count = remaining / width;
            runs[run_count] = ChunkRun {
                kind,
                first: chunk_count,
                offset,
                count,
                lanes: width,
            };
            run_count += 1;
            chunk_count += count;
            offset += count * width;
        }
        i += 1;
    }

    ChunkSequence {
        runs,
        run_count,
        lanes,
    }
}

impl ChunkSequence {
    /// Number of chunks.
    pub const fn len(&self) -> usize {
        let mut total = 0;
        let mut i = 0;
        while i < self.run_count {
            total += self.runs[i].count;
            i += 1;
        }
        total
    }

    /// Always false: every sequence covers at least one lane.
    pub const fn is_empty(&self) -> bool {
        self.run_count == 0
    }

    /// Total lanes, the `N` the sequence was packed for.
    pub const fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn runs(&self) -> &[ChunkRun] {
        &self.runs[..self.run_count]
    }

    pub fn iter(&self) -> ChunkIter {
        ChunkIter {
            seq: *self,
            run: 0,
            within: 0,
        }
    }

    /// Kind of every chunk, in order.
    pub fn kinds(&self) -> impl Iterator<Item = ChunkKind> {
        self.iter().map(|meta| meta.kind)
    }

    /// Metadata of chunk `index`.
    pub fn chunk(&self, index: usize) -> Option<ChunkMeta> {
        self.runs()
            .iter()
            .find(|run| index < run.first + run.count)
            .map(|run| run.chunk(index - run.first))
    }

    /// Finds the chunk owning `lane` and the lane's index within it.
    pub fn locate(&self, lane: usize) -> Option<(ChunkMeta, usize)> {
        let run = self.runs().iter().find(|run| lane < run.end())?;
        let within = lane - run.offset;
        let meta = run.chunk(within / run.lanes);
        Some((meta, within % run.lanes))
    }
}

impl<'a> IntoIterator for &'a ChunkSequence {
    type Item = ChunkMeta;
    type IntoIter = ChunkIter;

    fn into_iter(self) -> ChunkIter {
        self.iter()
    }
}

impl Display for ChunkSequence {
    /// Renders runs as `[256 x2, 128, scalar x3]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, run) in self.runs().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", run.kind)?;
            if run.count > 1 {
                write!(f, " x{}", run.count)?;
            }
        }
        f.write_str("]")
    }
}

/// Iterator over the chunks of a [`ChunkSequence`], ascending offset.
#[derive(Clone, Debug)]
pub struct ChunkIter {
    seq: ChunkSequence,
    run: usize,
    within: usize,
}

impl Iterator for ChunkIter {
    type Item = ChunkMeta;

    fn next(&mut self) -> Option<ChunkMeta> {
        let run = self.seq.runs().get(self.run)?;
        let meta = run.chunk(self.within);

        self.within += 1;
        if self.within == run.count {
            self.run += 1;
            self.within = 0;
        }
        Some(meta)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let done = self
            .seq
            .runs()
            .get(self.run)
            .map_or(self.seq.len(), |run| run.first + self.within);
        let left = self.seq.len() - done;
        (left, Some(left))
    }
}

impl ExactSizeIterator for ChunkIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::kind::{ChunkCatalog, ScalarOnly, Simd128, Simd256, Simd512};

    fn catalogs() -> Vec<KindSet> {
        vec![
            ScalarOnly::KINDS,
            Simd128::KINDS,
            Simd256::KINDS,
            Simd512::KINDS,
            KindSet::new(&[ChunkKind::Width512, ChunkKind::Width128]),
        ]
    }

    #[test]
    fn test_widths_sum_to_lane_count() {
        for kinds in catalogs() {
            for size in [1, 2, 4, 8] {
                for n in 1..=MAX_LANES {
                    let seq = pack(size, n, kinds);
                    let covered: usize = seq.iter().map(|meta| meta.width).sum();
                    assert_eq!(covered, n, "size {size}, n {n}, {kinds:?}");
                    assert_eq!(seq.lanes(), n);
                    assert_eq!(seq.iter().len(), seq.len());
                }
            }
        }
    }

    #[test]
    fn test_chunks_are_contiguous() {
        let seq = pack(2, 61, Simd512::KINDS);
        let mut expected_offset = 0;
        for (i, meta) in seq.iter().enumerate() {
            assert_eq!(meta.index, i);
            assert_eq!(meta.offset, expected_offset);
            expected_offset = meta.end();
        }
        assert_eq!(expected_offset, 61);
    }

    #[test]
    fn test_each_choice_is_widest_fitting_kind() {
        for kinds in catalogs() {
            for size in [1, 2, 4, 8] {
                for n in 1..=MAX_LANES {
                    for meta in pack(size, n, kinds).iter() {
                        let remaining = n - meta.offset;
                        let widest = kinds
                            .iter()
                            .find(|kind| kind.lanes(size) <= remaining)
                            .unwrap();
                        assert_eq!(meta.kind, widest, "size {size}, n {n}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_rendering() {
        assert_eq!(pack(4, 5, Simd128::KINDS).to_string(), "[128, scalar]");
        assert_eq!(
            pack(4, 19, Simd256::KINDS).to_string(),
            "[256 x2, scalar x3]"
        );
        assert_eq!(
            pack(4, 31, Simd512::KINDS).to_string(),
            "[512, 256, 128, scalar x3]"
        );
        assert_eq!(pack(1, 64, Simd512::KINDS).to_string(), "[512]");
    }

    #[test]
    fn test_small_widths_are_all_scalar() {
        // 128-bit registers hold two f64, so one lane packs as scalar
        let seq = pack(8, 1, Simd512::KINDS);
        assert_eq!(seq.kinds().collect::<Vec<_>>(), vec![ChunkKind::Scalar]);

        let seq = pack(4, 3, Simd128::KINDS);
        assert_eq!(seq.len(), 3);
        assert!(seq.kinds().all(|kind| kind == ChunkKind::Scalar));
        assert_eq!(seq.runs().len(), 1);
    }

    #[test]
    fn test_native_width_is_single_chunk() {
        for (size, n, kinds) in [
            (4, 4, Simd128::KINDS),
            (4, 8, Simd256::KINDS),
            (8, 8, Simd512::KINDS),
            (1, 32, Simd256::KINDS),
        ] {
            let seq = pack(size, n, kinds);
            assert_eq!(seq.len(), 1, "size {size}, n {n}");
            assert_eq!(seq.chunk(0).unwrap().width, n);
        }
    }

    #[test]
    fn test_sparse_catalog_skips_missing_kind() {
        let kinds = KindSet::new(&[ChunkKind::Width512, ChunkKind::Width128]);
        // 16 + 4 + 4 + 2 scalars, no 256-bit chunk
        let seq = pack(4, 26, kinds);
        assert_eq!(seq.to_string(), "[512, 128 x2, scalar x2]");
    }

    #[test]
    fn test_locate() {
        let seq = pack(4, 19, Simd256::KINDS);

        let (meta, local) = seq.locate(0).unwrap();
        assert_eq!((meta.index, meta.kind, local), (0, ChunkKind::Width256, 0));

        let (meta, local) = seq.locate(13).unwrap();
        assert_eq!((meta.index, meta.offset, local), (1, 8, 5));

        let (meta, local) = seq.locate(18).unwrap();
        assert_eq!((meta.index, meta.kind, meta.range(), local), (4, ChunkKind::Scalar, 18..19, 0));

        assert!(seq.locate(19).is_none());
        assert!(seq.chunk(5).is_none());
    }

    #[test]
    fn test_iterator_size_hint_shrinks() {
        let seq = pack(4, 7, Simd128::KINDS);
        let mut iter = seq.iter();
        assert_eq!(iter.len(), 4);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 2);
        assert_eq!(iter.count(), 2);
    }

    #[test]
    fn test_packs_in_const_context() {
        const SEQ: ChunkSequence = pack(2, 13, KindSet::new(&[ChunkKind::Width128]));
        assert_eq!(SEQ.len(), 6);
        assert_eq!(SEQ.runs()[1].offset, 8);
    }

    #[test]
    #[should_panic(expected = "at least one lane")]
    fn test_zero_lanes_rejected() {
        let _ = pack(4, std::hint::black_box(0), Simd128::KINDS);
    }

    #[test]
    #[should_panic(expected = "at most 64 lanes")]
    fn test_too_many_lanes_rejected() {
        let _ = pack(1, std::hint::black_box(65), Simd512::KINDS);
    }
}
