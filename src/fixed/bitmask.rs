//! Conversions between the logical `N`-bit mask and native chunk masks.
//!
//! The logical mask is a `u64` with bit `i` holding lane `i`. A chunk owns the
//! bit range `offset..offset + width`; its native mask holds the same bits
//! starting at bit 0.

use crate::fixed::packer::ChunkMeta;
use crate::simd::NativeMask;

/// Multiplier gathering the low bit of eight bytes into the top byte.
///
/// Byte `k` of the multiplicand lands on bit `56 + k` of the product. All
/// partial products occupy distinct bits, so the multiplication never
/// carries.
const GATHER_BYTES: u64 = 0x0102_0408_1020_4080;

/// The low `width` bits set.
#[inline(always)]
pub const fn lane_bits(width: usize) -> u64 {
    if width >= u64::BITS as usize {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Moves a chunk's native mask to its place in the logical mask.
#[inline(always)]
pub fn chunk_to_bits<M: NativeMask>(mask: M, meta: &ChunkMeta) -> u64 {
    (mask.to_bits() & lane_bits(meta.width)) << meta.offset
}

/// Extracts a chunk's bits from the logical mask as a native mask.
#[inline(always)]
pub fn chunk_from_bits<M: NativeMask>(bits: u64, meta: &ChunkMeta) -> M {
    M::from_bits((bits >> meta.offset) & lane_bits(meta.width))
}

/// Packs one `bool` per lane into bits, `src[i]` becoming bit `i`.
///
/// # Panics
///
/// Panics in debug builds if `src` holds more than 64 values.
pub fn pack_bools(src: &[bool]) -> u64 {
    debug_assert!(src.len() <= 64, "{} bools do not fit a lane mask", src.len());

    let mut bits = 0u64;
    let mut groups = src.chunks_exact(8);
    for (i, group) in groups.by_ref().enumerate() {
        let bytes: [u8; 8] = core::array::from_fn(|lane| u8::from(group[lane]));
        let packed = u64::from_le_bytes(bytes).wrapping_mul(GATHER_BYTES) >> 56;
        bits |= packed << (i * 8);
    }

    let tail = groups.remainder();
    let base = src.len() - tail.len();
    for (lane, &set) in tail.iter().enumerate() {
        bits |= u64::from(set) << (base + lane);
    }
    bits
}

/// Writes bit `i` of `bits` to `dst[i]` for every element of `dst`.
pub fn unpack_bools(bits: u64, dst: &mut [bool]) {
    debug_assert!(dst.len() <= 64, "{} bools do not fit a lane mask", dst.len());

    for (lane, out) in dst.iter_mut().enumerate() {
        *out = (bits >> lane) & 1 != 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixed::kind::ChunkKind;
    use crate::simd::LaneMask;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn meta(offset: usize, width: usize) -> ChunkMeta {
        ChunkMeta {
            index: 0,
            kind: ChunkKind::Width128,
            offset,
            width,
        }
    }

    #[test]
    fn test_lane_bits() {
        assert_eq!(lane_bits(0), 0);
        assert_eq!(lane_bits(1), 1);
        assert_eq!(lane_bits(13), 0x1FFF);
        assert_eq!(lane_bits(64), u64::MAX);
    }

    #[test]
    fn test_chunk_bits_are_shifted_by_offset() {
        let chunk = LaneMask::<4>([true, false, false, true]);
        assert_eq!(chunk_to_bits(chunk, &meta(8, 4)), 0b1001 << 8);

        let back: LaneMask<4> = chunk_from_bits(0b1001 << 8 | 0xFF, &meta(8, 4));
        assert_eq!(back, chunk);
    }

    #[test]
    fn test_chunks_reassemble_logical_mask() {
        // N = 13 as [128 x3, scalar] for f32
        let bits: u64 = (1 << 0) | (1 << 4) | (1 << 12);
        let mut rebuilt = 0;
        for offset in [0, 4, 8] {
            let chunk: LaneMask<4> = chunk_from_bits(bits, &meta(offset, 4));
            rebuilt |= chunk_to_bits(chunk, &meta(offset, 4));
        }
        let scalar: LaneMask<1> = chunk_from_bits(bits, &meta(12, 1));
        assert_eq!(scalar.0, [true]);
        rebuilt |= chunk_to_bits(scalar, &meta(12, 1));
        assert_eq!(rebuilt, bits);
    }

    #[test]
    fn test_pack_bools_matches_bit_loop() {
        let mut rng = StdRng::seed_from_u64(0x5EED);
        for len in 0..=64 {
            let src: Vec<bool> = (0..len).map(|_| rng.random()).collect();
            let expected = src
                .iter()
                .enumerate()
                .fold(0u64, |bits, (i, &set)| bits | (u64::from(set) << i));
            assert_eq!(pack_bools(&src), expected, "len {len}");
        }
    }

    #[test]
    fn test_pack_all_set_group() {
        assert_eq!(pack_bools(&[true; 8]), 0xFF);
        assert_eq!(pack_bools(&[true; 64]), u64::MAX);
        assert_eq!(pack_bools(&[false; 64]), 0);
    }

    #[test]
    fn test_unpack_bools() {
        let mut dst = [true; 10];
        unpack_bools(0b10_0000_0101, &mut dst);
        assert_eq!(
            dst,
            [true, false, true, false, false, false, false, false, false, true]
        );

        let mut all = [false; 64];
        unpack_bools(u64::MAX, &mut all);
        assert!(all.iter().all(|&set| set));
    }
}
