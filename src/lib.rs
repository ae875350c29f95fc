//! Fixed-size SIMD vectors of any width.
//!
//! `fixsimd` lets code be written once against a logical vector of `N` lanes
//! and lowers it onto the native registers of the target. A width that does
//! not match a single register (say 13 `f32` lanes on a 256-bit machine) is
//! decomposed greedily into native chunks (`[256, 128, scalar]`), and every
//! operation fans out over those chunks.
//!
//! The native register widths available to the decomposition are chosen at
//! build time by `build.rs` (see [`fixed::NativeCatalog`]); any other catalog
//! can be selected explicitly through the third type parameter.
//!
//! ```rust
//! use fixsimd::{FixedSizeSimd, Plus, Simd128};
//!
//! let v = FixedSizeSimd::<f32, 5, Simd128>::from_array([0.0, 1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(v.layout().to_string(), "[128, scalar]");
//! assert_eq!(v.get(4), 4.0);
//! assert_eq!(v.reduce(Plus), 10.0);
//! ```

pub mod error;
pub mod fixed;
pub mod simd;

pub use error::{FixedSizeError, Result};
pub use fixed::{
    native_catalog_info, pack, Alignment, CatalogInfo, ChunkCatalog, ChunkKind, ChunkMeta,
    ChunkRun, ChunkSequence, FixedSizeMask, FixedSizeSimd, KindSet, Masked, Maximum, Minimum,
    NativeCatalog, Plus, Product, ReduceOp, ScalarOnly, Simd128, Simd256, Simd512, MAX_LANES,
};
pub use simd::{Element, FloatElement, IntElement, NativeMask, NativeVector};
