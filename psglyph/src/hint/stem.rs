//! Glyph level stem hints.
//!
//! Each stem records a device space range and the displacements to apply
//! to points on its lower and upper edges. The path hint applicator looks
//! up stems by coordinate and moves path points accordingly.

use crate::{
    types::{Fixed, FixedCoeff, Point},
    Error,
};

use super::font::{FontHints, PixelScale};

/// Maximum number of stems in each direction.
pub const MAX_STEMS: usize = 96;

/// Slop added to both ends of a stem's device range when searching.
const STEM_TOLERANCE: Fixed = Fixed::from_bits(12);

/// Threshold below which a transformed distance counts as axis aligned
/// when centering stems.
const CENTER_AXIS_THRESHOLD: Fixed = Fixed::from_bits(13);

/// A stem hint in device space.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct StemHint {
    /// Lower bound of the device range, including tolerance.
    pub v0: Fixed,
    /// Upper bound of the device range, including tolerance.
    pub v1: Fixed,
    /// Displacement for points on the lower device edge.
    pub dv0: Fixed,
    /// Displacement for points on the upper device edge.
    pub dv1: Fixed,
    /// Position of the stem in the charstring's hint order.
    pub index: u16,
    pub active: bool,
}

impl StemHint {
    fn contains(&self, v: Fixed) -> bool {
        self.active && v >= self.v0 && v <= self.v1
    }
}

/// Table of stems in one direction, sorted by position.
#[derive(Clone, Debug)]
pub struct StemHintTable {
    data: [StemHint; MAX_STEMS],
    count: usize,
    /// Most recent search hit.
    current: usize,
}

impl Default for StemHintTable {
    fn default() -> Self {
        Self {
            data: [StemHint::default(); MAX_STEMS],
            count: 0,
            current: 0,
        }
    }
}

impl StemHintTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn stems(&self) -> &[StemHint] {
        &self.data[..self.count]
    }

    pub fn reset(&mut self) {
        self.count = 0;
        self.current = 0;
    }

    /// Inserts a stem covering the device range `v0..=v1`, keeping the
    /// table sorted by position and then width.
    ///
    /// Returns `Ok(None)` if an identical stem already exists.
    pub fn insert(
        &mut self,
        v0: Fixed,
        v1: Fixed,
        index: u16,
    ) -> Result<Option<&mut StemHint>, Error> {
        let dv = v1 - v0;
        let mut pos = self.count;
        while pos > 0 {
            let prev = &self.data[pos - 1];
            if v0 > prev.v0 || (v0 == prev.v0 && dv >= prev.v1 - prev.v0) {
                break;
            }
            pos -= 1;
        }
        if pos > 0 {
            let prev = &self.data[pos - 1];
            if v0 == prev.v0 && v1 == prev.v1 {
                log::debug!("ignoring duplicate stem {v0}..{v1}");
                return Ok(None);
            }
        }
        if self.count == MAX_STEMS {
            log::warn!("stem hint table full, dropping {v0}..{v1}");
            return Err(Error::StemHintLimitExceeded);
        }
        self.data.copy_within(pos..self.count, pos + 1);
        self.count += 1;
        self.current = pos;
        self.data[pos] = StemHint {
            v0,
            v1,
            dv0: Fixed::ZERO,
            dv1: Fixed::ZERO,
            index,
            active: true,
        };
        Ok(Some(&mut self.data[pos]))
    }

    /// Returns the active stem containing the given device coordinate.
    pub fn search(&mut self, v: Fixed) -> Option<&StemHint> {
        if self.count == 0 {
            return None;
        }
        if self.current < self.count && self.data[self.current].contains(v) {
            return Some(&self.data[self.current]);
        }
        let ix = self.stems().iter().rposition(|stem| stem.contains(v))?;
        self.current = ix;
        Some(&self.data[ix])
    }

    /// Activates exactly the stems whose hint index has its bit set in the
    /// mask. Bits are numbered from the most significant bit of the first
    /// byte.
    pub fn enable(&mut self, mask: &[u8]) {
        for stem in &mut self.data[..self.count] {
            let ix = stem.index as usize;
            stem.active = mask
                .get(ix >> 3)
                .map(|byte| byte & (0x80 >> (ix & 7)) != 0)
                .unwrap_or(false);
        }
    }
}

/// Device axis that a stem's position is measured along.
#[derive(Copy, Clone, Debug)]
struct StemAxis {
    device_is_x: bool,
    coeff: i64,
}

impl StemAxis {
    fn component(&self, p: Point<Fixed>) -> Fixed {
        if self.device_is_x {
            p.x
        } else {
            p.y
        }
    }
}

/// Stem hints of the glyph being interpreted.
#[derive(Clone, Default, Debug)]
pub struct GlyphStems {
    pub hstems: StemHintTable,
    pub vstems: StemHintTable,
    /// Device offset applied to centered vstem3 glyphs.
    pub vs_offset: Point<Fixed>,
    /// Hints are suspended inside a dot section.
    pub dotsection: bool,
    pub vstem3_set: bool,
    /// Number of stems declared so far, used to number Type 2 hints.
    pub num_hints: usize,
}

impl GlyphStems {
    pub fn reset(&mut self) {
        self.hstems.reset();
        self.vstems.reset();
        self.vs_offset = Point::ZERO;
        self.dotsection = false;
        self.vstem3_set = false;
        self.num_hints = 0;
    }

    /// Removes all stems, keeping the vstem3 centering offset.
    pub fn clear_stems(&mut self) {
        self.hstems.reset();
        self.vstems.reset();
    }

    /// Activates the stems selected by a hint mask.
    pub fn enable(&mut self, mask: &[u8]) {
        self.hstems.enable(mask);
        self.vstems.enable(mask);
    }

    /// Adds a horizontal stem from character `y` to `y + dy`.
    ///
    /// `y` must already include the side bearing and accent offsets.
    pub fn add_hstem(
        &mut self,
        font: &FontHints,
        fc: &FixedCoeff,
        origin: Point<Fixed>,
        y: Fixed,
        dy: Fixed,
        index: usize,
    ) -> Result<(), Error> {
        if !font.use_y_hints {
            return Ok(());
        }
        let axis = StemAxis {
            device_is_x: font.axes_swapped,
            coeff: if font.axes_swapped { fc.yx } else { fc.yy },
        };
        let scale = *font.hstem_scale();
        let origin_v = axis.component(origin);
        let v = origin_v + axis.component(self.vs_offset) + fc.mul(y, axis.coeff);
        let dv = fc.mul(dy, axis.coeff);
        let (vbot, vtop) = if dy < Fixed::ZERO {
            (v + dv, v)
        } else {
            (v, v + dv)
        };
        let (v, dv) = normalize(v, dv);
        let adj_dv = font.snap_h.snap(dv, &scale);
        let zone = font.find_zone(vbot - origin_v, vtop - origin_v);
        let (dv0, dv1) = match zone {
            Some(zone) => {
                let inverted = font.y_inverted;
                let adjust_v1 = if inverted { !zone.is_top } else { zone.is_top };
                let flat = zone.flat + origin_v;
                let mut overshoot = if zone.is_top {
                    vtop - flat
                } else {
                    flat - vbot
                };
                let pos_over = if inverted { -overshoot } else { overshoot };
                let ddv = adj_dv - dv;
                let mut shift = scale.round(flat) - flat;
                if pos_over > Fixed::ZERO {
                    if pos_over < font.blue_shift || font.suppress_overshoot {
                        // Suppress the overshoot by aligning the edge with
                        // the flat position.
                        if zone.is_top {
                            shift -= overshoot;
                        } else {
                            shift += overshoot;
                        }
                    } else if pos_over < scale.unit {
                        // Enforce an overshoot of one pixel.
                        overshoot = if overshoot < Fixed::ZERO {
                            -scale.unit
                        } else {
                            scale.unit
                        } - overshoot;
                        if zone.is_top {
                            shift += overshoot;
                        } else {
                            shift -= overshoot;
                        }
                    }
                }
                log::debug!("hstem {v}+{dv} in zone {zone:?}, shift {shift}");
                if adjust_v1 {
                    (shift - ddv, shift)
                } else {
                    (shift, shift + ddv)
                }
            }
            None => stem_deltas(&scale, v, dv, adj_dv),
        };
        self.store(false, v, dv, dv0, dv1, index)
    }

    /// Adds a vertical stem from character `x` to `x + dx`.
    ///
    /// `x` must already include the side bearing and accent offsets.
    #[allow(clippy::too_many_arguments)]
    pub fn add_vstem(
        &mut self,
        font: &FontHints,
        fc: &FixedCoeff,
        origin: Point<Fixed>,
        x: Fixed,
        dx: Fixed,
        force_bold: bool,
        index: usize,
    ) -> Result<(), Error> {
        if !font.use_x_hints {
            return Ok(());
        }
        let axis = StemAxis {
            device_is_x: !font.axes_swapped,
            coeff: if font.axes_swapped { fc.xy } else { fc.xx },
        };
        let scale = *font.vstem_scale();
        let v = axis.component(origin) + axis.component(self.vs_offset) + fc.mul(x, axis.coeff);
        let (v, dv) = normalize(v, fc.mul(dx, axis.coeff));
        let mut adj_dv = font.snap_v.snap(dv, &scale);
        if force_bold && adj_dv < scale.unit {
            adj_dv = scale.unit;
        }
        let (dv0, dv1) = stem_deltas(&scale, v, dv, adj_dv);
        self.store(true, v, dv, dv0, dv1, index)
    }

    /// Computes the offset that centers a vertical stem on the pixel grid,
    /// as used by `vstem3`. The result is stored in `vs_offset`.
    pub fn center_vstem(
        &mut self,
        font: &FontHints,
        fc: &FixedCoeff,
        origin: Point<Fixed>,
        x0: Fixed,
        dx: Fixed,
    ) {
        let p0 = origin + fc.transform_distance(Point::new(x0, Fixed::ZERO));
        let p1 = origin + fc.transform_distance(Point::new(x0 + dx, Fixed::ZERO));
        let width = Point::new((p0.x - p1.x).abs(), (p0.y - p1.y).abs());
        let vertical = width.y < CENTER_AXIS_THRESHOLD;
        let (center, width, scale) = if vertical {
            (mid(p0.x, p1.x), width.x, font.scale.x)
        } else {
            (mid(p0.y, p1.y), width.y, font.scale.y)
        };
        let pixels = scale.round(width).to_bits() >> (Fixed::FRACT_BITS + scale.log2_unit as u32);
        let offset = if pixels == 0 || pixels & 1 != 0 {
            // odd widths center on a pixel center
            Fixed::from_bits(center.to_bits() & -scale.unit.to_bits()) + scale.half - center
        } else {
            scale.round(center) - center
        };
        self.vs_offset = if vertical {
            Point::new(offset, Fixed::ZERO)
        } else {
            Point::new(Fixed::ZERO, offset)
        };
        log::debug!("vstem3 centering offset {:?}", self.vs_offset);
    }

    fn store(
        &mut self,
        vertical: bool,
        v: Fixed,
        dv: Fixed,
        dv0: Fixed,
        dv1: Fixed,
        index: usize,
    ) -> Result<(), Error> {
        let table = if vertical {
            &mut self.vstems
        } else {
            &mut self.hstems
        };
        let index = u16::try_from(index).map_err(|_| Error::StemHintLimitExceeded)?;
        if let Some(stem) = table.insert(v - STEM_TOLERANCE, v + dv + STEM_TOLERANCE, index)? {
            stem.dv0 = dv0;
            stem.dv1 = dv1;
            log::debug!(
                "{} {index}: {v}+{dv} -> ({dv0}, {dv1})",
                if vertical { "vstem" } else { "hstem" }
            );
        }
        Ok(())
    }
}

fn normalize(v: Fixed, dv: Fixed) -> (Fixed, Fixed) {
    if dv < Fixed::ZERO {
        (v + dv, -dv)
    } else {
        (v, dv)
    }
}

fn mid(a: Fixed, b: Fixed) -> Fixed {
    Fixed::from_bits(((a.to_bits() as i64 + b.to_bits() as i64) >> 1) as i32)
}

/// Computes edge displacements that give a stem the adjusted width while
/// keeping its center close to where it was, with the lower edge on the
/// pixel grid.
fn stem_deltas(scale: &PixelScale, v: Fixed, dv: Fixed, adj_dv: Fixed) -> (Fixed, Fixed) {
    let ddv = adj_dv - dv;
    let diff2 = Fixed::from_bits(ddv.to_bits() >> 1);
    let edge = v - diff2;
    let diff_v = scale.round(edge) - edge;
    let dv0 = diff_v - diff2;
    (dv0, dv0 + ddv)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{params::FontHintParams, types::Matrix};

    fn fixed(v: f64) -> Fixed {
        Fixed::from_f64(v)
    }

    fn font_hints(matrix: &Matrix, params: &FontHintParams) -> FontHints {
        FontHints::new(params, matrix, Point::new(0, 0))
    }

    #[test]
    fn table_sorted_insert_and_duplicates() {
        let mut table = StemHintTable::new();
        table.insert(fixed(10.0), fixed(12.0), 0).unwrap();
        table.insert(fixed(2.0), fixed(5.0), 1).unwrap();
        table.insert(fixed(2.0), fixed(3.0), 2).unwrap();
        assert!(table.insert(fixed(2.0), fixed(5.0), 3).unwrap().is_none());
        let indices = table.stems().iter().map(|s| s.index).collect::<Vec<_>>();
        assert_eq!(indices, [2, 1, 0]);
    }

    #[test]
    fn table_limit() {
        let mut table = StemHintTable::new();
        for i in 0..MAX_STEMS {
            table
                .insert(Fixed::from_i32(i as i32), Fixed::from_i32(i as i32 + 1), i as u16)
                .unwrap();
        }
        assert_eq!(
            table.insert(fixed(500.0), fixed(501.0), 0).err(),
            Some(Error::StemHintLimitExceeded)
        );
    }

    #[test]
    fn sweep_sorted_inserts_and_widened_lookup() {
        const COUNT: usize = 64;
        let mut stems = GlyphStems::default();
        // 37 is coprime with COUNT so this visits every slot once
        let order = (0..COUNT).map(|i| (i * 37) % COUNT);
        let mut expected = Vec::new();
        for (n, slot) in order.enumerate() {
            let v = Fixed::from_bits(slot as i32 * 40 * 256 + (slot as i32 * 7) % 256);
            let dv = Fixed::from_bits((1 + slot as i32 % 20) * 256 - (slot as i32 * 13) % 200);
            stems
                .store(false, v, dv, Fixed::ZERO, Fixed::ZERO, n)
                .unwrap();
            expected.push((n as u16, v, v + dv));
            let table = stems.hstems.stems();
            assert_eq!(table.len(), n + 1);
            assert!(
                table
                    .windows(2)
                    .all(|w| (w[0].v0, w[0].v1 - w[0].v0) <= (w[1].v0, w[1].v1 - w[1].v0)),
                "unsorted after inserting stem {n}"
            );
        }
        let step = Fixed::from_bits(1);
        for (index, lo, hi) in expected {
            let (first, last) = (lo - STEM_TOLERANCE, hi + STEM_TOLERANCE);
            let mut v = first;
            while v <= last {
                assert_eq!(
                    stems.hstems.search(v).map(|stem| stem.index),
                    Some(index),
                    "lookup of {v} in stem {index}"
                );
                v += step;
            }
            assert!(stems.hstems.search(first - step).is_none());
            assert!(stems.hstems.search(last + step).is_none());
        }
    }

    #[test]
    fn search_honors_mask() {
        let mut table = StemHintTable::new();
        table.insert(fixed(0.0), fixed(10.0), 0).unwrap();
        table.insert(fixed(5.0), fixed(15.0), 1).unwrap();
        assert_eq!(table.search(fixed(7.0)).unwrap().index, 1);
        table.enable(&[0x80]);
        assert_eq!(table.search(fixed(7.0)).unwrap().index, 0);
        assert!(table.search(fixed(12.0)).is_none());
        table.enable(&[]);
        assert!(table.search(fixed(7.0)).is_none());
    }

    #[test]
    fn unzoned_stem_is_snapped() {
        let params = FontHintParams::default();
        let matrix = Matrix::scale(0.1, 0.1);
        let font = font_hints(&matrix, &params);
        let fc = matrix.fixed_coeff();
        let mut stems = GlyphStems::default();
        // 83 units at 0.1 is 8.3 pixels wide starting at 4.1
        stems
            .add_vstem(&font, &fc, Point::ZERO, fixed(41.0), fixed(83.0), false, 0)
            .unwrap();
        let stem = stems.vstems.stems()[0];
        let left = fixed(4.1) + stem.dv0;
        let right = fixed(4.1) + fixed(8.3) + stem.dv1;
        assert_eq!(left.fract(), Fixed::ZERO);
        assert_eq!(right - left, fixed(8.0));
    }

    #[test]
    fn hstem_aligns_to_zone() {
        let params = FontHintParams {
            blue_values: vec![
                (fixed(-15.0), fixed(0.0)),
                (fixed(500.0), fixed(515.0)),
            ],
            blue_scale: 0.0,
            blue_shift: Fixed::ZERO,
            ..Default::default()
        };
        let matrix = Matrix::scale(0.1, 0.1);
        let font = font_hints(&matrix, &params);
        let fc = matrix.fixed_coeff();
        let origin = Point::new(fixed(0.0), fixed(0.3));
        let mut stems = GlyphStems::default();
        // baseline stem with a 0.4 pixel overshoot below the zone
        stems
            .add_hstem(&font, &fc, origin, fixed(-4.0), fixed(60.0), 0)
            .unwrap();
        let stem = stems.hstems.stems()[0];
        let bottom = origin.y + fixed(-0.4) + stem.dv0;
        // overshoot below the blue shift is suppressed
        assert_eq!(bottom, fixed(0.0));
    }

    #[test]
    fn disabled_axis_adds_nothing() {
        let params = FontHintParams::default();
        let matrix = Matrix::new(0.1, 0.0, 0.02, 0.1, 0.0, 0.0);
        let font = font_hints(&matrix, &params);
        let fc = matrix.fixed_coeff();
        let mut stems = GlyphStems::default();
        stems
            .add_vstem(&font, &fc, Point::ZERO, fixed(10.0), fixed(50.0), false, 0)
            .unwrap();
        assert!(stems.vstems.is_empty());
    }

    #[test]
    fn center_odd_and_even_stems() {
        let params = FontHintParams::default();
        let matrix = Matrix::IDENTITY;
        let font = font_hints(&matrix, &params);
        let fc = matrix.fixed_coeff();
        let mut stems = GlyphStems::default();
        // 3 pixels wide from 10.2: center 11.7 moves to 11.5
        stems.center_vstem(&font, &fc, Point::ZERO, fixed(10.2), fixed(3.0));
        assert_eq!(stems.vs_offset, Point::new(fixed(11.5) - fixed(11.7), Fixed::ZERO));
        // 2 pixels wide from 10.2: center 11.2 moves to 11.0
        stems.center_vstem(&font, &fc, Point::ZERO, fixed(10.2), fixed(2.0));
        assert_eq!(stems.vs_offset, Point::new(fixed(11.0) - fixed(11.2), Fixed::ZERO));
    }
}
