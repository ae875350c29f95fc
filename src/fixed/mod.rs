//! Fixed-size vectors composed of several native registers.
//!
//! A [`FixedSizeSimd<T, N, C>`](FixedSizeSimd) holds exactly `N` lanes of `T`
//! whatever the hardware register width. At compile time the lanes are packed
//! into the widest chunk kinds the catalog `C` offers ([`pack`]); every
//! operation is then applied chunk by chunk through the element's native
//! vector types ([`dispatch`]), reductions combine the chunks in a fixed tree
//! ([`reduce`]) and masks move between the logical `N`-bit form and each
//! chunk's native form ([`bitmask`]).
//!
//! # Modules
//!
//! - [`kind`]: chunk kinds, catalogs and the build-selected [`NativeCatalog`]
//! - [`packer`]: the greedy chunk decomposition
//! - [`dispatch`]: applying native operations across chunks
//! - [`reduce`]: the reduction tree
//! - [`bitmask`]: logical and native mask conversions
//! - [`vector`] / [`mask`]: the public value types

pub mod bitmask;
pub mod dispatch;
pub mod kind;
pub mod mask;
mod ops;
pub mod packer;
pub mod reduce;
pub mod vector;

pub use kind::{
    native_catalog_info, CatalogInfo, ChunkCatalog, ChunkKind, KindSet, NativeCatalog, ScalarOnly,
    Simd128, Simd256, Simd512,
};
pub use mask::FixedSizeMask;
pub use packer::{pack, ChunkIter, ChunkMeta, ChunkRun, ChunkSequence};
pub use reduce::{Maximum, Minimum, Plus, Product, ReduceOp};
pub use vector::{FixedSizeSimd, Masked};

/// Largest supported lane count, the width of the logical bitmask.
pub const MAX_LANES: usize = 64;

/// Alignment promised by the caller for a memory operand.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Aligned to the element type only.
    #[default]
    Element,
    /// Aligned to the vector's `MEMORY_ALIGNMENT`. Checked in debug builds.
    Vector,
}

impl Alignment {
    #[inline(always)]
    pub(crate) fn check<U>(self, mem: &[U], required: usize) {
        if self == Alignment::Vector {
            debug_assert!(
                mem.as_ptr() as usize % required == 0,
                "memory at {:p} is not aligned to {} bytes",
                mem.as_ptr(),
                required
            );
        }
    }
}

/// Recommended alignment of `lanes` elements of `element_size` bytes.
///
/// The next power of two of the byte size, capped at the widest register of
/// `kinds` but never below the element's own size.
pub const fn memory_alignment(element_size: usize, lanes: usize, kinds: KindSet) -> usize {
    let bytes = (lanes * element_size).next_power_of_two();
    let register = kinds.widest().bits() / 8;
    let cap = if register > element_size {
        register
    } else {
        element_size
    };
    if bytes < cap {
        bytes
    } else {
        cap
    }
}
