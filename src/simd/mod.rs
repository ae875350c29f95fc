//! Native chunk implementations.
//!
//! The fixed-size layer never touches registers directly. It asks an
//! [`Element`] for the native vector type of a chunk kind and drives it
//! through the [`NativeVector`] / [`NativeMask`] traits. The portable
//! [`Lanes`] type covers every kind for every element; the ISA modules
//! replace it where hand-written intrinsics exist.

#[cfg(all(
    any(avx2, avx512),
    target_feature = "avx2",
    any(target_arch = "x86", target_arch = "x86_64")
))]
pub mod avx2;

#[cfg(all(neon, target_arch = "aarch64"))]
pub mod neon;

pub mod element;
pub mod lanes;
pub mod traits;

pub use element::{Element, FloatElement, IntElement};
pub use lanes::{LaneMask, Lanes};
pub use traits::{NativeMask, NativeVector};
