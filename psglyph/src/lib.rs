//! Outline generation for PostScript Type 1 and Type 2 charstrings.
//!
//! The crate executes glyph programs in the Type 1 and Type 2 (CFF)
//! charstring languages and produces device space paths, optionally
//! adjusted by the font's alignment zones and the glyph's stem hints.
//!
//! The main pieces are:
//!
//! * [`charstring::Interpreter`], the virtual machine for both charstring
//!   types, including Flex, seac and blend support.
//! * [`hint`], which compiles font level hints into device space zones and
//!   snap tables and applies stem hints to path points.
//! * [`path::Path`] and the [`flatten`] module, which store the generated
//!   outline and reduce its curves to line segments.
//!
//! Font data is accessed through the [`GlyphDataProvider`] trait and
//! [`glyph::render_glyph`] runs a glyph to completion.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

extern crate alloc;

pub mod charstring;
pub mod flatten;
pub mod glyph;
pub mod hint;
pub mod params;
pub mod path;
pub mod provider;
pub mod settings;
pub mod sink;

mod error;

/// Public re-export of the psglyph-types crate.
pub extern crate psglyph_types as types;

pub use error::{Error, ErrorKind};
pub use glyph::{render_glyph, Outline};
pub use params::{CharstringType, FontHintParams};
pub use provider::{GlyphDataProvider, MemoryProvider};
pub use settings::RenderSettings;
pub use sink::PathSink;
