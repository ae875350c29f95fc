//! Logical masks against the native masks of each chunk.

use fixsimd::{
    Alignment, ChunkCatalog, Element, FixedSizeMask, FixedSizeSimd, ScalarOnly, Simd128, Simd256,
    Simd512,
};

fn check_round_trip<T: Element, const N: usize, C: ChunkCatalog>(bits: u64) {
    let mask = FixedSizeMask::<T, N, C>::from_bits(bits);

    // each chunk holds exactly its slice of the logical mask
    for (meta, native) in mask.native_chunks() {
        let expected = (bits >> meta.offset) & (u64::MAX >> (64 - meta.width));
        assert_eq!(native, expected, "chunk {meta:?}");
    }
    assert_eq!(FixedSizeMask::<T, N, C>::from_native_chunks(mask.native_chunks()), mask);

    let mut mem = [false; N];
    mask.store(&mut mem);
    assert_eq!(FixedSizeMask::<T, N, C>::load(&mem), mask);
    assert_eq!(mem, mask.to_array());
}

macro_rules! check_catalogs {
    ($ty:ty, $n:literal, $bits:expr) => {
        check_round_trip::<$ty, $n, ScalarOnly>($bits);
        check_round_trip::<$ty, $n, Simd128>($bits);
        check_round_trip::<$ty, $n, Simd256>($bits);
        check_round_trip::<$ty, $n, Simd512>($bits);
    };
}

#[test]
fn test_thirteen_lanes_three_bits() {
    let bits = (1 << 0) | (1 << 4) | (1 << 12);

    check_catalogs!(f32, 13, bits);
    check_catalogs!(f64, 13, bits);
    check_catalogs!(u8, 13, bits);
    check_catalogs!(i16, 13, bits);
    check_catalogs!(i64, 13, bits);

    let mask = FixedSizeMask::<f32, 13, Simd128>::from_bits(bits);
    assert_eq!(mask.count(), 3);
    assert!((0..13).all(|lane| mask.get(lane) == [0, 4, 12].contains(&lane)));
}

#[test]
fn test_full_width_masks() {
    check_catalogs!(u8, 64, u64::MAX);
    check_catalogs!(u8, 64, 0xA5A5_0F0F_3C3C_8001);
    check_catalogs!(f32, 64, 0x8000_0000_0000_0001);
    check_catalogs!(u64, 61, 0x0F0F_F0F0_1234_5678);
}

#[test]
fn test_comparison_feeds_selection() {
    type V = FixedSizeSimd<i32, 19, Simd256>;
    let a = V::generate(|lane| lane as i32 - 9);
    let zero = V::splat(0);

    let negative = a.simd_lt(zero);
    assert_eq!(negative.count(), 9);
    assert_eq!(negative.last_set(), Some(8));

    let clamped = negative.select(zero, a);
    assert_eq!(clamped, a.max(zero));
    assert_eq!((!negative).select(a, zero).hmin(), 0);
}

#[test]
fn test_bool_memory_matches_array() {
    type M = FixedSizeMask<f64, 7, Simd512>;
    let lanes = [true, true, false, true, false, false, true];

    let mask = M::try_from(&lanes[..]).unwrap();
    assert_eq!(mask, M::from_array(lanes));
    assert_eq!(mask.to_bits(), 0b100_1011);

    let mut mem = [false; 10];
    mask.store(&mut mem);
    assert_eq!(&mem[..7], &lanes);

    let v = FixedSizeSimd::<f64, 7, Simd512>::splat(1.0);
    let mut out = [0.0; 7];
    v.masked_store(mask, &mut out, Alignment::Element);
    assert_eq!(out, [1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
}
