//! Hinting for PostScript outlines.
//!
//! Font level hints ([`FontHints`]) are computed once per font and device
//! transform. Glyph level stems ([`GlyphStems`]) are collected while a
//! charstring executes, and [`PathHintState`] moves path points onto the
//! adjusted stem edges as segments are produced.

mod font;
mod path;
mod stem;

pub use font::{
    compute_font_hints, AlignmentZone, FontHints, PixelScale, StemSnapTable, MAX_SNAPS, MAX_ZONES,
};
pub use path::{
    line_hints, PathHintState, HINT_HORZ, HINT_HORZ_LOWER, HINT_HORZ_UPPER, HINT_VERT,
    HINT_VERT_LOWER, HINT_VERT_UPPER,
};
pub use stem::{GlyphStems, StemHint, StemHintTable, MAX_STEMS};
