//! Chunk kinds and the catalogs that offer them.

use std::fmt::{self, Debug, Display};

/// A native register width a chunk can use.
///
/// Declared widest first, so the derived ordering sorts wider kinds before
/// narrower ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChunkKind {
    /// 512-bit register (AVX-512).
    Width512,
    /// 256-bit register (AVX, AVX2).
    Width256,
    /// 128-bit register (SSE, NEON).
    Width128,
    /// A single lane.
    Scalar,
}

impl ChunkKind {
    /// Every kind, widest first.
    pub const ALL: [ChunkKind; 4] = [
        ChunkKind::Width512,
        ChunkKind::Width256,
        ChunkKind::Width128,
        ChunkKind::Scalar,
    ];

    /// Register width in bits. `Scalar` reports 0, its width depends on the
    /// element.
    pub const fn bits(self) -> usize {
        match self {
            ChunkKind::Width512 => 512,
            ChunkKind::Width256 => 256,
            ChunkKind::Width128 => 128,
            ChunkKind::Scalar => 0,
        }
    }

    /// Lanes of an element of `element_size` bytes held by one chunk.
    pub const fn lanes(self, element_size: usize) -> usize {
        match self {
            ChunkKind::Scalar => 1,
            kind => kind.bits() / 8 / element_size,
        }
    }

    const fn flag(self) -> u8 {
        1 << (self as u8)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ChunkKind::Width512 => "512",
            ChunkKind::Width256 => "256",
            ChunkKind::Width128 => "128",
            ChunkKind::Scalar => "scalar",
        }
    }
}

impl Display for ChunkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of chunk kinds. `Scalar` is always a member.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct KindSet(u8);

impl KindSet {
    /// Only the scalar kind.
    pub const SCALAR: KindSet = KindSet(ChunkKind::Scalar.flag());

    /// Builds a set from `kinds`, adding `Scalar`.
    pub const fn new(kinds: &[ChunkKind]) -> Self {
        let mut flags = ChunkKind::Scalar.flag();
        let mut i = 0;
        while i < kinds.len() {
            flags |= kinds[i].flag();
            i += 1;
        }
        KindSet(flags)
    }

    pub const fn contains(self, kind: ChunkKind) -> bool {
        self.0 & kind.flag() != 0
    }

    /// The widest member.
    pub const fn widest(self) -> ChunkKind {
        let mut i = 0;
        while i < ChunkKind::ALL.len() {
            if self.contains(ChunkKind::ALL[i]) {
                return ChunkKind::ALL[i];
            }
            i += 1;
        }
        ChunkKind::Scalar
    }

    /// Members, widest first.
    pub fn iter(self) -> impl Iterator<Item = ChunkKind> {
        ChunkKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// The chunk kinds a fixed-size vector may be decomposed into.
///
/// A catalog is a zero-sized marker type. Besides the built-in ones, any type
/// implementing this trait can be used, for instance to model a target
/// without 256-bit registers:
///
/// ```rust
/// use fixsimd::{ChunkCatalog, ChunkKind, FixedSizeSimd, KindSet};
///
/// #[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
/// struct WideOrScalar;
///
/// impl ChunkCatalog for WideOrScalar {
///     const KINDS: KindSet = KindSet::new(&[ChunkKind::Width512]);
///     const NAME: &'static str = "wide-or-scalar";
/// }
///
/// let layout = FixedSizeSimd::<f32, 19, WideOrScalar>::LAYOUT;
/// assert_eq!(layout.to_string(), "[512, scalar x3]");
/// ```
pub trait ChunkCatalog: Copy + Debug + Default + PartialEq + Eq + Send + Sync + 'static {
    /// Available kinds.
    const KINDS: KindSet;
    /// Human readable name, used in logs.
    const NAME: &'static str;
}

/// Scalar chunks only.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScalarOnly;

/// 128-bit registers (SSE, NEON).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Simd128;

/// 256 and 128-bit registers (AVX2).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Simd256;

/// 512, 256 and 128-bit registers (AVX-512).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Simd512;

impl ChunkCatalog for ScalarOnly {
    const KINDS: KindSet = KindSet::SCALAR;
    const NAME: &'static str = "scalar";
}

impl ChunkCatalog for Simd128 {
    const KINDS: KindSet = KindSet::new(&[ChunkKind::Width128]);
    const NAME: &'static str = "simd128";
}

impl ChunkCatalog for Simd256 {
    const KINDS: KindSet = KindSet::new(&[ChunkKind::Width256, ChunkKind::Width128]);
    const NAME: &'static str = "simd256";
}

impl ChunkCatalog for Simd512 {
    const KINDS: KindSet = KindSet::new(&[
        ChunkKind::Width512,
        ChunkKind::Width256,
        ChunkKind::Width128,
    ]);
    const NAME: &'static str = "simd512";
}

/// The catalog selected by `build.rs` for the compilation target.
#[cfg(avx512)]
pub type NativeCatalog = Simd512;

/// The catalog selected by `build.rs` for the compilation target.
#[cfg(all(avx2, not(avx512)))]
pub type NativeCatalog = Simd256;

/// The catalog selected by `build.rs` for the compilation target.
#[cfg(all(any(sse, neon), not(any(avx2, avx512))))]
pub type NativeCatalog = Simd128;

/// The catalog selected by `build.rs` for the compilation target.
#[cfg(not(any(sse, neon, avx2, avx512)))]
pub type NativeCatalog = ScalarOnly;

/// What the build selected, for diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CatalogInfo {
    pub name: &'static str,
    pub kinds: KindSet,
    /// Widest register in bytes, 0 when only scalar chunks exist.
    pub max_register_bytes: usize,
}

/// Reports the native catalog and logs it once per call at info level.
///
/// Intended for application startup, next to other capability logging.
pub fn native_catalog_info() -> CatalogInfo {
    let info = CatalogInfo {
        name: NativeCatalog::NAME,
        kinds: NativeCatalog::KINDS,
        max_register_bytes: NativeCatalog::KINDS.widest().bits() / 8,
    };

    tracing::info!(
        catalog = info.name,
        kinds = ?info.kinds,
        max_register_bytes = info.max_register_bytes,
        "fixed-size SIMD chunk catalog selected at build time"
    );

    info
}
