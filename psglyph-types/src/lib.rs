//! Scalar and geometry types for PostScript glyph outlines
//!
//! Device space coordinates are carried as [`Fixed`] values with 8 bits of
//! fraction. Character space to device space mappings are described by a
//! [`Matrix`] and, on hot paths, by the integer [`FixedCoeff`] derived
//! from it.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod bbox;
mod fixed;
mod glyph_id;
mod matrix;
mod point;

#[cfg(all(test, feature = "serde"))]
mod serde_test;

pub use bbox::BoundingBox;
pub use fixed::{F16Dot16, Fixed};
pub use glyph_id::GlyphId;
pub use matrix::{FixedCoeff, Matrix};
pub use point::Point;
