//! Font level hinting and decoding parameters.

use alloc::vec::Vec;

use crate::types::Fixed;

/// Charstring format.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CharstringType {
    /// Type 1 charstrings as found in PostScript Type 1 fonts.
    #[default]
    Type1,
    /// Type 2 charstrings as found in CFF fonts.
    Type2,
}

/// Parameters from the font's Private dictionary.
///
/// Zone and stem values are in character space units.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontHintParams {
    pub charstring_type: CharstringType,
    /// Pairs of (bottom, top) values. The first pair is the baseline
    /// overshoot zone; the remaining pairs are top zones.
    pub blue_values: Vec<(Fixed, Fixed)>,
    /// Pairs of (bottom, top) values, all bottom zones.
    pub other_blues: Vec<(Fixed, Fixed)>,
    pub family_blues: Vec<(Fixed, Fixed)>,
    pub family_other_blues: Vec<(Fixed, Fixed)>,
    pub blue_scale: f64,
    pub blue_shift: Fixed,
    pub blue_fuzz: Fixed,
    pub std_hw: Option<Fixed>,
    pub std_vw: Option<Fixed>,
    pub stem_snap_h: Vec<Fixed>,
    pub stem_snap_v: Vec<Fixed>,
    pub force_bold: bool,
    /// Number of leading random bytes in each encrypted charstring, or a
    /// negative value if charstrings are not encrypted.
    pub len_iv: i32,
    /// Added to local subroutine numbers.
    pub subr_bias: i32,
    /// Added to global subroutine numbers.
    pub gsubr_bias: i32,
    /// Advance width assumed by Type 2 charstrings that omit the width.
    pub default_width: Fixed,
    /// Base for the width operand of Type 2 charstrings.
    pub nominal_width: Fixed,
    /// Multiple master design weights. Empty for single master fonts.
    pub weight_vector: Vec<f64>,
}

impl Default for FontHintParams {
    fn default() -> Self {
        Self {
            charstring_type: CharstringType::Type1,
            blue_values: Vec::new(),
            other_blues: Vec::new(),
            family_blues: Vec::new(),
            family_other_blues: Vec::new(),
            blue_scale: 0.039625,
            blue_shift: Fixed::from_i32(7),
            blue_fuzz: Fixed::from_i32(1),
            std_hw: None,
            std_vw: None,
            stem_snap_h: Vec::new(),
            stem_snap_v: Vec::new(),
            force_bold: false,
            len_iv: 4,
            subr_bias: 0,
            gsubr_bias: 0,
            default_width: Fixed::ZERO,
            nominal_width: Fixed::ZERO,
            weight_vector: Vec::new(),
        }
    }
}

impl FontHintParams {
    /// Returns default parameters for unencrypted Type 2 charstrings with
    /// subroutine biases computed from the given subroutine counts.
    pub fn type2(subr_count: usize, gsubr_count: usize) -> Self {
        Self {
            charstring_type: CharstringType::Type2,
            len_iv: -1,
            subr_bias: subr_bias(subr_count),
            gsubr_bias: subr_bias(gsubr_count),
            ..Default::default()
        }
    }
}

/// Computes the bias applied to Type 2 subroutine numbers.
///
/// See <https://adobe-type-tools.github.io/font-tech-notes/pdfs/5176.CFF.pdf#page=26>
pub fn subr_bias(count: usize) -> i32 {
    if count < 1240 {
        107
    } else if count < 33900 {
        1131
    } else {
        32768
    }
}
