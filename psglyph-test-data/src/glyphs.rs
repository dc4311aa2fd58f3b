//! Hand assembled glyph programs.
//!
//! Coordinates are in a 1000 unit em. The Type 1 and Type 2 versions of a
//! glyph describe the same outline.

use crate::charstring::{t1, t2, CharstringBuilder};

/// Side bearing and advance width of every glyph in this module.
pub const SIDE_BEARING: i32 = 50;
pub const ADVANCE: i32 = 600;

/// A 500x700 box with one stem in each direction.
pub fn type1_box() -> Vec<u8> {
    CharstringBuilder::type1()
        .args(&[SIDE_BEARING, ADVANCE])
        .op(t1::HSBW)
        .args(&[0, 80])
        .op(t1::HSTEM)
        .args(&[0, 80])
        .op(t1::VSTEM)
        .args(&[0, 0])
        .op(t1::RMOVETO)
        .args(&[500, 0])
        .op(t1::RLINETO)
        .args(&[0, 700])
        .op(t1::RLINETO)
        .args(&[-500, 0])
        .op(t1::RLINETO)
        .op(t1::CLOSEPATH)
        .op(t1::ENDCHAR)
        .build()
}

/// Same outline as [`type1_box`].
///
/// The Type 2 version has no side bearing operator so the contour starts
/// at the side bearing and the advance is carried by the width operand
/// relative to a nominal width of zero.
pub fn type2_box() -> Vec<u8> {
    CharstringBuilder::type2()
        .args(&[ADVANCE, 0, 80])
        .op(t2::HSTEM)
        .args(&[SIDE_BEARING, 80])
        .op(t2::VSTEM)
        .args(&[SIDE_BEARING, 0])
        .op(t2::RMOVETO)
        .args(&[500])
        .op(t2::HLINETO)
        .args(&[700, -500])
        .op(t2::VLINETO)
        .op(t2::ENDCHAR)
        .build()
}

/// An "o" made of two curved contours, with stems on both axes and
/// overshooting the baseline and x-height.
pub fn type1_o() -> Vec<u8> {
    CharstringBuilder::type1()
        .args(&[SIDE_BEARING, ADVANCE])
        .op(t1::HSBW)
        .args(&[-12, 80])
        .op(t1::HSTEM)
        .args(&[432, 80])
        .op(t1::HSTEM)
        .args(&[0, 90])
        .op(t1::VSTEM)
        .args(&[410, 90])
        .op(t1::VSTEM)
        // outer contour
        .args(&[0, 250])
        .op(t1::RMOVETO)
        .args(&[150, 112, 112, 138])
        .op(t1::VHCURVETO)
        .args(&[138, 112, -112, -150])
        .op(t1::HVCURVETO)
        .args(&[-150, -112, -112, -138])
        .op(t1::VHCURVETO)
        .args(&[-138, -112, 112, 150])
        .op(t1::HVCURVETO)
        .op(t1::CLOSEPATH)
        // inner contour
        .args(&[90, 0])
        .op(t1::RMOVETO)
        .args(&[0, -100, 70, -80, 90, 0])
        .op(t1::RRCURVETO)
        .args(&[90, 0, 70, 80, 0, 100])
        .op(t1::RRCURVETO)
        .args(&[0, 100, -70, 80, -90, 0])
        .op(t1::RRCURVETO)
        .args(&[-90, 0, -70, -80, 0, -100])
        .op(t1::RRCURVETO)
        .op(t1::CLOSEPATH)
        .op(t1::ENDCHAR)
        .build()
}

/// Type 2 rendition of [`type1_o`] with hint masks and both contours
/// closed implicitly.
pub fn type2_o() -> Vec<u8> {
    CharstringBuilder::type2()
        .args(&[ADVANCE, -12, 80, 364, 80])
        .op(t2::HSTEMHM)
        .args(&[SIDE_BEARING, 90, 320, 90])
        .op(t2::HINTMASK)
        .raw(&[0xf0])
        .args(&[SIDE_BEARING, 250])
        .op(t2::RMOVETO)
        .args(&[150, 112, 112, 138])
        .op(t2::VHCURVETO)
        .args(&[138, 112, -112, -150])
        .op(t2::HVCURVETO)
        .args(&[-150, -112, -112, -138])
        .op(t2::VHCURVETO)
        .args(&[-138, -112, 112, 150])
        .op(t2::HVCURVETO)
        .args(&[90])
        .op(t2::HMOVETO)
        .args(&[0, -100, 70, -80, 90, 0, 90, 0, 70, 80, 0, 100])
        .op(t2::RRCURVETO)
        .args(&[0, 100, -70, 80, -90, 0, -90, 0, -70, -80, 0, -100])
        .op(t2::RRCURVETO)
        .op(t2::ENDCHAR)
        .build()
}

/// Box whose bottom edge is a Flex sequence `depth` units deep, drawn
/// through the conventional Flex subroutines of [`type1_flex_subrs`].
pub fn type1_flex(depth: i32) -> Vec<u8> {
    let moves = [
        (250, 0),
        (-150, 0),
        (100, depth),
        (50, 0),
        (50, 0),
        (100, 0),
        (100, -depth),
    ];
    let mut cs = CharstringBuilder::type1()
        .args(&[0, ADVANCE])
        .op(t1::HSBW)
        .args(&[0, 0])
        .op(t1::RMOVETO)
        .args(&[1])
        .op(t1::CALLSUBR);
    for (dx, dy) in moves {
        cs = cs
            .args(&[dx, dy])
            .op(t1::RMOVETO)
            .args(&[2])
            .op(t1::CALLSUBR);
    }
    cs.args(&[50, 500, 0, 0])
        .op(t1::CALLSUBR)
        .args(&[0, 500])
        .op(t1::RLINETO)
        .args(&[-500, 0])
        .op(t1::RLINETO)
        .op(t1::CLOSEPATH)
        .op(t1::ENDCHAR)
        .build()
}

/// The conventional Flex and hint replacement subroutines 0 to 3.
pub fn type1_flex_subrs() -> Vec<Vec<u8>> {
    vec![
        // flex end: height x y 0 callsubr
        CharstringBuilder::type1()
            .args(&[3, 0])
            .esc(t1::CALLOTHERSUBR)
            .esc(t1::POP)
            .esc(t1::POP)
            .esc(t1::SETCURRENTPOINT)
            .op(t1::RETURN)
            .build(),
        // flex start
        CharstringBuilder::type1()
            .args(&[0, 1])
            .esc(t1::CALLOTHERSUBR)
            .op(t1::RETURN)
            .build(),
        // flex point
        CharstringBuilder::type1()
            .args(&[0, 2])
            .esc(t1::CALLOTHERSUBR)
            .op(t1::RETURN)
            .build(),
        // hint replacement: subr 3 callsubr
        CharstringBuilder::type1()
            .args(&[1, 3])
            .esc(t1::CALLOTHERSUBR)
            .esc(t1::POP)
            .op(t1::CALLSUBR)
            .op(t1::RETURN)
            .build(),
    ]
}
