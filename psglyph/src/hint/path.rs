//! Applying stem hints to path segments.
//!
//! Segments are hinted incrementally as they are appended. Nearly axis
//! aligned lines and curve tangents take the displacement of the stem
//! they lie on; curve control points follow their end points. When a
//! subpath is closed, hints found at its end are carried around to its
//! start and vice versa.

use crate::{
    path::{Path, Segment, SegmentKind},
    types::{Fixed, Point},
};

use super::{font::FontHints, stem::GlyphStems};

/// Edge is nearly vertical in character space.
pub const HINT_VERT: u8 = 0o1;
/// Nearly vertical edge moving in -y.
pub const HINT_VERT_LOWER: u8 = 0o3;
/// Nearly vertical edge moving in +y.
pub const HINT_VERT_UPPER: u8 = 0o5;
/// Edge is nearly horizontal in character space.
pub const HINT_HORZ: u8 = 0o10;
/// Nearly horizontal edge moving in +x.
pub const HINT_HORZ_LOWER: u8 = 0o30;
/// Nearly horizontal edge moving in -x.
pub const HINT_HORZ_UPPER: u8 = 0o50;

/// Distance below which the end of a subpath is treated as meeting its
/// start on an axis.
const CLOSE_TOLERANCE: Fixed = Fixed::from_bits(25);

/// Returns the hints applicable to a line between two device points.
///
/// An edge is nearly axis aligned when its minor extent is at most one
/// sixteenth of its major extent.
pub fn line_hints(font: &FontHints, p0: Point<Fixed>, p1: Point<Fixed>) -> u8 {
    let mut d = p1 - p0;
    if font.axes_swapped {
        d = d.swap();
    }
    if font.x_inverted {
        d.x = -d.x;
    }
    if font.y_inverted {
        d.y = -d.y;
    }
    let (adx, ady) = (d.x.abs().to_bits(), d.y.abs().to_bits());
    if d.y != Fixed::ZERO && adx <= ady >> 4 {
        if d.y > Fixed::ZERO {
            HINT_VERT_UPPER
        } else {
            HINT_VERT_LOWER
        }
    } else if d.x != Fixed::ZERO && ady <= adx >> 4 {
        if d.x < Fixed::ZERO {
            HINT_HORZ_UPPER
        } else {
            HINT_HORZ_LOWER
        }
    } else {
        0
    }
}

fn line_is_null(p0: Point<Fixed>, p1: Point<Fixed>) -> bool {
    (p1 - p0).l1_norm().to_bits() < 4
}

fn shr2(d: Point<Fixed>) -> Point<Fixed> {
    d.map(|v| Fixed::from_bits(v.to_bits() >> 2))
}

fn adjust_curve_start(seg: &mut Segment, d: Point<Fixed>) {
    if let SegmentKind::Curve { p1, p2 } = &mut seg.kind {
        *p1 += d;
        *p2 += shr2(d);
    }
}

fn adjust_curve_end(seg: &mut Segment, d: Point<Fixed>) {
    if let SegmentKind::Curve { p1, p2 } = &mut seg.kind {
        *p1 += shr2(d);
        *p2 += d;
    }
}

/// Carries a displacement applied to the last segment back through null
/// lines to a preceding curve.
fn apply_final_hint(segs: &mut [Segment], last: usize, d: Point<Fixed>) {
    let mut ix = last;
    loop {
        match segs[ix].kind {
            SegmentKind::Curve { .. } => {
                adjust_curve_end(&mut segs[ix], d);
                return;
            }
            SegmentKind::Line | SegmentKind::LineClose => {
                if ix == 0 || !line_is_null(segs[ix - 1].pt, segs[ix].pt) {
                    return;
                }
                segs[ix - 1].pt += d;
                ix -= 1;
            }
            SegmentKind::Start => return,
        }
    }
}

/// Moves a point by the stems it lies on and returns the displacement.
fn apply_hints_at(
    font: &FontHints,
    stems: &mut GlyphStems,
    hints: u8,
    pt: &mut Point<Fixed>,
) -> Point<Fixed> {
    let start = *pt;
    if !stems.dotsection {
        if hints & HINT_VERT != 0 && !stems.vstems.is_empty() {
            let dir = (hints & HINT_VERT_UPPER) as i32 - (hints & HINT_VERT_LOWER) as i32;
            let v = if font.axes_swapped { &mut pt.y } else { &mut pt.x };
            if let Some(stem) = stems.vstems.search(*v) {
                *v += if dir == 0 {
                    Fixed::from_bits((stem.dv0.to_bits() + stem.dv1.to_bits()) >> 1)
                } else if (dir > 0) != font.x_inverted {
                    stem.dv1
                } else {
                    stem.dv0
                };
            }
        }
        if hints & HINT_HORZ != 0 && !stems.hstems.is_empty() {
            let dir = (hints & HINT_HORZ_LOWER) as i32 - (hints & HINT_HORZ_UPPER) as i32;
            let v = if font.axes_swapped { &mut pt.x } else { &mut pt.y };
            if let Some(stem) = stems.hstems.search(*v) {
                *v += if dir == 0 {
                    Fixed::from_bits((stem.dv0.to_bits() + stem.dv1.to_bits()) >> 1)
                } else if (dir < 0) != font.y_inverted {
                    stem.dv1
                } else {
                    stem.dv0
                };
            }
        }
    }
    let diff = *pt - start;
    if diff != Point::ZERO {
        log::trace!("hints {hints:o} moved {start:?} by {diff:?}");
    }
    diff
}

/// Progress of hint application along the current subpath.
#[derive(Copy, Clone, Default, Debug)]
pub struct PathHintState {
    /// Last segment whose end has been hinted, if the subpath is still
    /// being built.
    hint_next: Option<usize>,
    /// Hints already applied at the end of `hint_next`.
    hints_pending: u8,
    /// Hints applied at the start of the subpath.
    hints_initial: u8,
    /// Start point of the subpath before hinting.
    unmoved_start: Point<Fixed>,
    /// End point of the last hinted segment before hinting.
    unmoved_end: Point<Fixed>,
}

impl PathHintState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns true if part of the current subpath has been hinted.
    pub fn is_pending(&self) -> bool {
        self.hint_next.is_some()
    }

    /// Keeps the resume position valid after the path has been truncated
    /// to `len` segments.
    pub fn truncate(&mut self, len: usize) {
        if let Some(ix) = self.hint_next {
            if ix >= len {
                self.hint_next = len.checked_sub(1);
            }
        }
    }

    /// Applies hints to the segments appended to the current subpath since
    /// the last call.
    ///
    /// With `closing` set, the subpath is treated as complete and hints are
    /// propagated across the junction of its end and start.
    pub fn apply(
        &mut self,
        font: &FontHints,
        stems: &mut GlyphStems,
        path: &mut Path,
        closing: bool,
    ) {
        let Some(psub) = path.current_subpath_start() else {
            return;
        };
        let segs = path.segments_mut();
        let len = segs.len();
        let (mut pseg, mut hints) = match self.hint_next {
            Some(ix) if ix < len => (ix, self.hints_pending),
            _ => {
                let closed = segs[len - 1].kind == SegmentKind::LineClose;
                if (closed && !closing) || psub + 1 >= len {
                    return;
                }
                self.unmoved_start = segs[psub].pt;
                self.unmoved_end = segs[psub].pt;
                (psub, 0)
            }
        };
        let mut diff = Point::ZERO;
        for pnext in pseg + 1..len {
            let dseg;
            let hints_next;
            match segs[pnext].kind {
                SegmentKind::Curve { p1, p2 } => {
                    let hints_first = line_hints(font, self.unmoved_end, p1) & !hints;
                    if pseg == psub {
                        self.hints_initial = hints_first;
                    }
                    dseg = apply_hints_at(font, stems, hints_first, &mut segs[pseg].pt);
                    let diff2 = segs[pseg].pt - self.unmoved_end;
                    hints_next = line_hints(font, p2, segs[pnext].pt);
                    adjust_curve_start(&mut segs[pnext], diff2);
                    if let SegmentKind::Curve { p2, .. } = &mut segs[pnext].kind {
                        diff = apply_hints_at(font, stems, hints_next, p2);
                    }
                    self.unmoved_end = segs[pnext].pt;
                    segs[pnext].pt += diff;
                }
                SegmentKind::Line | SegmentKind::LineClose | SegmentKind::Start => {
                    if segs[pnext].kind == SegmentKind::LineClose {
                        // undo any initial hints already carried to the end
                        segs[pnext].pt = self.unmoved_start;
                    }
                    if line_is_null(segs[pnext].pt, self.unmoved_end) {
                        hints_next = hints;
                        dseg = Point::ZERO;
                    } else {
                        hints_next = line_hints(font, self.unmoved_end, segs[pnext].pt);
                        dseg = apply_hints_at(font, stems, hints_next & !hints, &mut segs[pseg].pt);
                    }
                    if pseg == psub {
                        self.hints_initial = hints_next;
                    }
                    self.unmoved_end = segs[pnext].pt;
                    apply_hints_at(font, stems, hints_next, &mut segs[pnext].pt);
                }
            }
            adjust_curve_end(&mut segs[pseg], dseg);
            hints = hints_next;
            pseg = pnext;
        }
        if !closing {
            self.hint_next = Some(pseg);
            self.hints_pending = hints;
            return;
        }
        let first = segs[psub].pt;
        let last = segs[pseg].pt;
        let closed = segs[pseg].kind == SegmentKind::LineClose
            || (last.x - first.x).abs() < CLOSE_TOLERANCE
            || (last.y - first.y).abs() < CLOSE_TOLERANCE;
        let hints_first = self.hints_initial;
        if closed {
            let (do_x, do_y) = if font.axes_swapped {
                (HINT_HORZ, HINT_VERT)
            } else {
                (HINT_VERT, HINT_HORZ)
            };
            let pick = |mask: u8, d: Point<Fixed>| {
                Point::new(
                    if mask & do_x != 0 { d.x } else { Fixed::ZERO },
                    if mask & do_y != 0 { d.y } else { Fixed::ZERO },
                )
            };
            // hints of the start not yet applied to the end, and the reverse
            let diff2 = pick(hints_first & !hints, first - self.unmoved_start);
            diff = pick(hints & !hints_first, last - self.unmoved_end);
            segs[pseg].pt += diff2;
            apply_final_hint(segs, pseg, diff2);
            segs[psub].pt += diff;
        } else {
            let hints_close =
                line_hints(font, self.unmoved_end, self.unmoved_start) & !(hints | hints_first);
            let d = apply_hints_at(font, stems, hints_close, &mut segs[pseg].pt);
            apply_final_hint(segs, pseg, d);
            diff = apply_hints_at(font, stems, hints_close, &mut segs[psub].pt);
        }
        if psub + 1 < len && segs[psub + 1].is_curve() {
            adjust_curve_start(&mut segs[psub + 1], diff);
        }
        self.hint_next = None;
        self.hints_pending = 0;
    }
}
