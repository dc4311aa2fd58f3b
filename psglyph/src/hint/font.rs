//! Font level hints.
//!
//! Alignment zones and stem snap widths are transformed once per font and
//! device transform into the device axis that each stem direction maps
//! onto. Positions are relative to the transform's translation so the
//! result may be shared by every glyph rendered with the same linear
//! transform.

#[cfg(feature = "libm")]
#[allow(unused_imports)]
use core_maths::*;

use crate::{
    params::FontHintParams,
    types::{Fixed, Matrix, Point},
};

/// Maximum number of alignment zones.
pub const MAX_ZONES: usize = 24;

/// Maximum number of entries in each stem snap table.
pub const MAX_SNAPS: usize = 13;

/// Size of a device pixel when oversampling.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct PixelScale {
    pub log2_unit: u8,
    pub unit: Fixed,
    pub half: Fixed,
}

impl Default for PixelScale {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PixelScale {
    pub const fn new(log2_unit: u8) -> Self {
        let unit = Fixed::ONE.to_bits() << log2_unit;
        Self {
            log2_unit,
            unit: Fixed::from_bits(unit),
            half: Fixed::from_bits(unit >> 1),
        }
    }

    /// Rounds to the nearest multiple of the pixel unit.
    pub fn round(&self, v: Fixed) -> Fixed {
        Fixed::from_bits(v.to_bits().wrapping_add(self.half.to_bits()) & -self.unit.to_bits())
    }
}

/// Device space alignment zone.
///
/// `v0 <= v1` always holds regardless of the orientation of the device
/// axis. `flat` is the position that stem edges inside the zone snap to.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct AlignmentZone {
    pub v0: Fixed,
    pub v1: Fixed,
    pub flat: Fixed,
    pub is_top: bool,
}

impl AlignmentZone {
    const EMPTY: Self = Self {
        v0: Fixed::ZERO,
        v1: Fixed::ZERO,
        flat: Fixed::ZERO,
        is_top: false,
    };

    pub fn contains(&self, v: Fixed) -> bool {
        v >= self.v0 && v <= self.v1
    }
}

/// Sorted set of standard stem widths in device units.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct StemSnapTable {
    values: [Fixed; MAX_SNAPS],
    len: usize,
}

impl Default for StemSnapTable {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl StemSnapTable {
    const EMPTY: Self = Self {
        values: [Fixed::ZERO; MAX_SNAPS],
        len: 0,
    };

    /// Builds a table from the given widths, dropping zeros and duplicates.
    /// Widths beyond the capacity of the table are ignored.
    pub fn new(widths: impl IntoIterator<Item = Fixed>) -> Self {
        let mut table = Self::EMPTY;
        for width in widths {
            let width = width.abs();
            if width == Fixed::ZERO || table.values().contains(&width) {
                continue;
            }
            if table.len == MAX_SNAPS {
                log::debug!("stem snap table full, dropping {width}");
                break;
            }
            table.values[table.len] = width;
            table.len += 1;
        }
        table.values[..table.len].sort_unstable();
        table
    }

    pub fn values(&self) -> &[Fixed] {
        &self.values[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the width snapped to the closest table entry within half a
    /// pixel, rounded to whole pixels. A stem never collapses below one
    /// pixel.
    pub fn snap(&self, width: Fixed, scale: &PixelScale) -> Fixed {
        let mut best = scale.half;
        for snap in self.values() {
            let diff = *snap - width;
            if diff.abs() < best.abs() {
                best = diff;
            }
        }
        let adjusted = if best.abs() < scale.half {
            width + best
        } else {
            width
        };
        let rounded = scale.round(adjusted);
        if rounded == Fixed::ZERO {
            scale.unit
        } else {
            rounded
        }
    }
}

/// Hint state derived from the font's Private dictionary and a device
/// transform.
///
/// Axis flags are defined per character axis. The "y" flags describe where
/// horizontal stems (constant character y) land in device space and the
/// "x" flags do the same for vertical stems.
#[derive(Clone, PartialEq, Debug)]
pub struct FontHints {
    /// Character x maps to device y and character y to device x.
    pub axes_swapped: bool,
    /// Increasing character x decreases the device coordinate.
    pub x_inverted: bool,
    /// Increasing character y decreases the device coordinate.
    pub y_inverted: bool,
    /// Vertical stems remain axis aligned in device space.
    pub use_x_hints: bool,
    /// Horizontal stems remain axis aligned in device space.
    pub use_y_hints: bool,
    /// Oversampling of each device axis.
    pub scale: Point<PixelScale>,
    zones: [AlignmentZone; MAX_ZONES],
    zone_count: usize,
    pub suppress_overshoot: bool,
    /// BlueShift in device units.
    pub blue_shift: Fixed,
    pub snap_h: StemSnapTable,
    pub snap_v: StemSnapTable,
}

impl Default for FontHints {
    fn default() -> Self {
        Self::UNHINTED
    }
}

impl FontHints {
    /// Hints that leave every stem unused.
    pub const UNHINTED: Self = Self {
        axes_swapped: false,
        x_inverted: false,
        y_inverted: false,
        use_x_hints: false,
        use_y_hints: false,
        scale: Point::new(PixelScale::new(0), PixelScale::new(0)),
        zones: [AlignmentZone::EMPTY; MAX_ZONES],
        zone_count: 0,
        suppress_overshoot: false,
        blue_shift: Fixed::ZERO,
        snap_h: StemSnapTable::EMPTY,
        snap_v: StemSnapTable::EMPTY,
    };

    /// Computes hints for the given parameters and device transform.
    pub fn new(params: &FontHintParams, matrix: &Matrix, log2_scale: Point<u8>) -> Self {
        compute_font_hints(params, matrix, log2_scale)
    }

    /// Returns hints with no zones or snaps that still carry the
    /// oversampling scale.
    pub fn unhinted(log2_scale: Point<u8>) -> Self {
        Self {
            scale: log2_scale.map(PixelScale::new),
            ..Self::UNHINTED
        }
    }

    pub fn zones(&self) -> &[AlignmentZone] {
        &self.zones[..self.zone_count]
    }

    /// Returns true if any zone or snap width is present.
    pub fn has_hints(&self) -> bool {
        self.zone_count != 0 || !self.snap_h.is_empty() || !self.snap_v.is_empty()
    }

    /// Returns the pixel scale of the device axis that horizontal stems
    /// are measured along.
    pub fn hstem_scale(&self) -> &PixelScale {
        if self.axes_swapped {
            &self.scale.x
        } else {
            &self.scale.y
        }
    }

    /// Returns the pixel scale of the device axis that vertical stems are
    /// measured along.
    pub fn vstem_scale(&self) -> &PixelScale {
        if self.axes_swapped {
            &self.scale.y
        } else {
            &self.scale.x
        }
    }

    /// Finds the zone capturing a horizontal stem with the given device
    /// edge positions. Top zones test the edge at the character top of the
    /// stem and bottom zones the edge at its character bottom.
    pub fn find_zone(&self, vbot: Fixed, vtop: Fixed) -> Option<&AlignmentZone> {
        self.zones()
            .iter()
            .rev()
            .find(|zone| zone.contains(if zone.is_top { vtop } else { vbot }))
    }

    fn push_zone(&mut self, zone: AlignmentZone) -> bool {
        if self.zone_count == MAX_ZONES {
            return false;
        }
        self.zones[self.zone_count] = zone;
        self.zone_count += 1;
        true
    }
}

/// Device coefficients for a character axis, if the axis keeps stems
/// axis aligned.
#[derive(Copy, Clone, Debug)]
struct AxisMap {
    coeff: f64,
    swapped: bool,
}

/// Computes font level hints.
///
/// An axis is hinted only when a stem along it stays axis aligned in
/// device space, which requires an exactly zero off-diagonal term.
pub fn compute_font_hints(
    params: &FontHintParams,
    matrix: &Matrix,
    log2_scale: Point<u8>,
) -> FontHints {
    let mut hints = FontHints::unhinted(log2_scale);
    // Horizontal edges have constant character y. They stay horizontal
    // when device y does not depend on character x, and become vertical
    // when device x does not.
    let y_map = if matrix.xy == 0.0 {
        Some(AxisMap {
            coeff: matrix.yy,
            swapped: false,
        })
    } else if matrix.xx == 0.0 {
        Some(AxisMap {
            coeff: matrix.yx,
            swapped: true,
        })
    } else {
        None
    };
    let x_map = if matrix.yx == 0.0 {
        Some(AxisMap {
            coeff: matrix.xx,
            swapped: false,
        })
    } else if matrix.yy == 0.0 {
        Some(AxisMap {
            coeff: matrix.xy,
            swapped: true,
        })
    } else {
        None
    };
    if let Some(map) = y_map {
        hints.use_y_hints = map.coeff != 0.0;
        hints.y_inverted = map.coeff < 0.0;
        hints.axes_swapped |= map.swapped;
    }
    if let Some(map) = x_map {
        hints.use_x_hints = map.coeff != 0.0;
        hints.x_inverted = map.coeff < 0.0;
        hints.axes_swapped |= map.swapped;
    }
    log::debug!(
        "font hints: use_x={} use_y={} swapped={} x_inverted={} y_inverted={}",
        hints.use_x_hints,
        hints.use_y_hints,
        hints.axes_swapped,
        hints.x_inverted,
        hints.y_inverted
    );
    if let Some(map) = x_map.filter(|_| hints.use_x_hints) {
        let coeff = map.coeff.abs();
        hints.snap_v = StemSnapTable::new(
            params
                .std_vw
                .iter()
                .chain(&params.stem_snap_v)
                .map(|w| w.mul_f64(coeff)),
        );
    }
    if let Some(map) = y_map.filter(|_| hints.use_y_hints) {
        let coeff = map.coeff;
        let scale = *hints.hstem_scale();
        hints.snap_h = StemSnapTable::new(
            params
                .std_hw
                .iter()
                .chain(&params.stem_snap_h)
                .map(|w| w.mul_f64(coeff.abs())),
        );
        let pixels_per_unit = coeff.abs() / (1u32 << scale.log2_unit) as f64;
        hints.suppress_overshoot = pixels_per_unit < params.blue_scale;
        hints.blue_shift = params.blue_shift.mul_f64(coeff.abs()).max(scale.half);
        let fuzz = params.blue_fuzz.mul_f64(coeff.abs());
        let zone_sets = [
            (&params.blue_values, &params.family_blues, true),
            (&params.other_blues, &params.family_other_blues, false),
        ];
        for (blues, family_blues, first_is_bottom_only) in zone_sets {
            for (i, (bottom, top)) in blues.iter().enumerate() {
                let is_top = first_is_bottom_only && i != 0;
                let (mut v0, mut v1) = (bottom.to_f64() * coeff, top.to_f64() * coeff);
                if let Some((fam_bottom, fam_top)) = family_blues.get(i) {
                    let (f0, f1) = (fam_bottom.to_f64() * coeff, fam_top.to_f64() * coeff);
                    if ((f1 - f0) - (v1 - v0)).abs() < scale.unit.to_f64() {
                        v0 = f0;
                        v1 = f1;
                    }
                }
                // Top zones align the character bottom of the zone, bottom
                // zones the character top.
                let flat = if is_top { v0 } else { v1 };
                let (lo, hi) = if v0 <= v1 { (v0, v1) } else { (v1, v0) };
                let zone = AlignmentZone {
                    v0: Fixed::from_f64(lo) - fuzz,
                    v1: Fixed::from_f64(hi) + fuzz,
                    flat: Fixed::from_f64(flat),
                    is_top,
                };
                log::debug!("alignment zone {zone:?}");
                if !hints.push_zone(zone) {
                    log::warn!("too many alignment zones, ignoring the rest");
                    break;
                }
            }
        }
    }
    hints
}
