//! test data shared between various psglyph crates.

pub mod charstring;
pub mod glyphs;
