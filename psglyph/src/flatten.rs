//! Adaptive flattening of cubic Bezier curves.
//!
//! The number of line segments is chosen as a power of two from an L1
//! estimate of the curve's second derivative. Sampling uses forward
//! differences carried as exact integer plus remainder pairs so that no
//! error accumulates along the curve. Curves that are too long for the
//! fixed point fast path are bisected at their parametric midpoint using
//! an explicit stack.

use alloc::vec::Vec;

use crate::types::{Fixed, Point};

/// Largest subdivision exponent that can be sampled directly.
pub const MAX_SAMPLE_LOG2: u32 = 10;

/// Bound on the subdivision exponent and therefore on the bisection depth.
const MAX_LOG2: u32 = 31;

/// Bound on the exponent chosen for maximum accuracy, where the count
/// would otherwise grow with the coordinate span.
pub const MAX_ACCURACY_LOG2: u32 = MAX_SAMPLE_LOG2 + 2;

/// Points are skipped when they fall in the same half pixel cell as the
/// previous point.
const CELL_MASK: i32 = -128;

/// Sampled points are buffered in runs of this size; collinear merging
/// only looks back within the current run.
const RUN_LEN: usize = 50;

const ONE: i32 = Fixed::ONE.to_bits();

/// The control points and end point of a cubic Bezier segment. The start
/// point is supplied separately.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct Curve {
    pub p1: Point<Fixed>,
    pub p2: Point<Fixed>,
    pub p3: Point<Fixed>,
}

impl Curve {
    pub fn new(p1: Point<Fixed>, p2: Point<Fixed>, p3: Point<Fixed>) -> Self {
        Self { p1, p2, p3 }
    }

    /// Splits the curve at t = 0.5.
    pub fn split(&self, p0: Point<Fixed>) -> (Curve, Curve) {
        let mid = |a: Point<Fixed>, b: Point<Fixed>| {
            Point::new(
                Fixed::from_bits(midpoint(a.x.to_bits(), b.x.to_bits())),
                Fixed::from_bits(midpoint(a.y.to_bits(), b.y.to_bits())),
            )
        };
        let p12 = mid(self.p1, self.p2);
        let first_p1 = mid(p0, self.p1);
        let second_p2 = mid(self.p2, self.p3);
        let first_p2 = mid(first_p1, p12);
        let second_p1 = mid(p12, second_p2);
        let join = mid(first_p2, second_p1);
        (
            Curve::new(first_p1, first_p2, join),
            Curve::new(second_p1, second_p2, self.p3),
        )
    }
}

/// Midpoint of two fixed values that cannot overflow.
fn midpoint(a: i32, b: i32) -> i32 {
    (a >> 1)
        .wrapping_add(b >> 1)
        .wrapping_add(a & b & 1)
        .wrapping_add(1)
}

/// Returns the base 2 logarithm of the number of line segments required to
/// approximate the curve within the given flatness.
///
/// A flatness of zero requests maximum accuracy: the count is derived from
/// the coordinate span of the curve instead, up to [`MAX_ACCURACY_LOG2`].
pub fn log2_sample_count(p0: Point<Fixed>, curve: &Curve, flatness: Fixed) -> u32 {
    let [x0, y0] = [p0.x, p0.y].map(|v| v.to_bits() as i64);
    let [x1, y1, x2, y2, x3, y3] = [
        curve.p1.x, curve.p1.y, curve.p2.x, curve.p2.y, curve.p3.x, curve.p3.y,
    ]
    .map(|v| v.to_bits() as i64);
    let x03 = (x3 - x0).abs();
    let y03 = (y3 - y0).abs();
    let mut flat = flatness.to_bits().max(0) as i64;
    if (x03 | y03) < 16 * ONE as i64 {
        flat >>= 1;
    }
    let mut k = 0;
    if flat == 0 {
        let mut m = x03.max(y03);
        k = 1;
        while m > ONE as i64 {
            k += 1;
            m >>= 1;
        }
        k = k.min(MAX_ACCURACY_LOG2);
    } else {
        let x12 = x1 - x2;
        let y12 = y1 - y2;
        let dx0 = x0 - x1 - x12;
        let dy0 = y0 - y1 - y12;
        let dx1 = x12 - x2 + x3;
        let dy1 = y12 - y2 + y3;
        let d = dx0.abs().max(dx1.abs()) + dy0.abs().max(dy1.abs());
        // 3/4 * D, rounded up in units of flat
        let mut q = (d - (d >> 2) + flat - 1) / flat;
        while q > 1 {
            k += 1;
            q = (q + 3) >> 2;
        }
    }
    k.min(MAX_LOG2)
}

/// Flattens a curve starting at `p0` into `2^k` or fewer line segments,
/// appending the end points of the segments to `out`.
///
/// The final point appended is always exactly `curve.p3`.
pub fn flatten(p0: Point<Fixed>, curve: &Curve, k: u32, out: &mut Vec<Point<Fixed>>) {
    let mut stack = [(Curve::default(), 0u32); MAX_LOG2 as usize + 1];
    stack[0] = (*curve, k.min(MAX_LOG2));
    let mut len = 1;
    let mut start = p0;
    while len > 0 {
        len -= 1;
        let (curve, k) = stack[len];
        match SampleCursor::new(start, &curve, k) {
            Some(cursor) => cursor.sample(out),
            None if k == 0 => out.push(curve.p3),
            None => {
                // each split lowers k so the stack holds at most one entry
                // per level
                let (first, second) = curve.split(start);
                stack[len] = (second, k - 1);
                stack[len + 1] = (first, k - 1);
                len += 2;
                continue;
            }
        }
        start = curve.p3;
    }
}

/// Flattens a curve using the sample count chosen for the given flatness.
pub fn flatten_with_flatness(
    p0: Point<Fixed>,
    curve: &Curve,
    flatness: Fixed,
    out: &mut Vec<Point<Fixed>>,
) {
    let k = log2_sample_count(p0, curve, flatness);
    flatten(p0, curve, k, out);
}

/// Polynomial coefficients `a*t^3 + b*t^2 + c*t` of one coordinate.
fn coefficients(v0: i32, v1: i32, v2: i32, v3: i32) -> [i64; 3] {
    let [v0, v1, v2, v3] = [v0, v1, v2, v3].map(|v| v as i64);
    let c = 3 * (v1 - v0);
    let b = 3 * (v2 - v1) - c;
    let a = v3 - v0 - b - c;
    [a, b, c]
}

fn in_range(v: i64) -> bool {
    const MAX_FAST: i64 = i32::MAX as i64 / 6;
    v < MAX_FAST && v > -MAX_FAST
}

/// An integer plus a remainder in units of `1 / 2^(3k)`.
#[derive(Copy, Clone, Default, Debug)]
struct Diff {
    int: i32,
    rem: u32,
}

impl Diff {
    #[inline(always)]
    fn adjust(&mut self, rmask: u32) {
        if self.rem > rmask {
            self.int = self.int.wrapping_add(1);
            self.rem &= rmask;
        }
    }

    #[inline(always)]
    fn accum(&mut self, delta: Diff, rmask: u32) {
        self.rem += delta.rem;
        if self.rem > rmask {
            self.rem &= rmask;
            self.int = self.int.wrapping_add(delta.int).wrapping_add(1);
        } else {
            self.int = self.int.wrapping_add(delta.int);
        }
    }
}

/// Forward difference state for one coordinate.
#[derive(Copy, Clone, Default, Debug)]
struct AxisDiffs {
    value: Diff,
    d1: Diff,
    d2: Diff,
    d3: Diff,
}

impl AxisDiffs {
    fn new(origin: i32, [a, b, c]: [i32; 3], k: u32, rmask: u32) -> Self {
        let k2 = k << 1;
        let k3 = k2 + k;
        let b2 = b << 1;
        let a6 = ((a << 1) + a) << 1;
        // c terms
        let mut d1 = Diff {
            int: c >> k,
            rem: (c as u32).wrapping_shl(k2) & rmask,
        };
        // b terms
        let mut d2 = Diff {
            int: b2 >> k2,
            rem: (b2 as u32).wrapping_shl(k) & rmask,
        };
        d1.int += d2.int >> 1;
        d1.rem += (b as u32).wrapping_shl(k) & rmask;
        d1.adjust(rmask);
        // a terms
        d1.int += a >> k3;
        d1.rem += a as u32 & rmask;
        d1.adjust(rmask);
        let d3 = Diff {
            int: a6 >> k3,
            rem: a6 as u32 & rmask,
        };
        d2.int += d3.int;
        d2.rem += d3.rem;
        d2.adjust(rmask);
        Self {
            value: Diff {
                int: origin,
                rem: 0,
            },
            d1,
            d2,
            d3,
        }
    }

    #[inline(always)]
    fn step(&mut self, rmask: u32) {
        self.d1.accum(self.d2, rmask);
        self.d2.accum(self.d3, rmask);
    }
}

/// Sampling state for one curve at a fixed subdivision exponent.
struct SampleCursor {
    p0: Point<i32>,
    p3: Point<Fixed>,
    k: u32,
    coeffs: [[i32; 3]; 2],
}

impl SampleCursor {
    /// Returns `None` if the curve must be bisected (or, when `k == 0`,
    /// replaced by a line).
    fn new(p0: Point<Fixed>, curve: &Curve, k: u32) -> Option<Self> {
        if k == 0 || k > MAX_SAMPLE_LOG2 {
            return None;
        }
        let x = coefficients(
            p0.x.to_bits(),
            curve.p1.x.to_bits(),
            curve.p2.x.to_bits(),
            curve.p3.x.to_bits(),
        );
        let y = coefficients(
            p0.y.to_bits(),
            curve.p1.y.to_bits(),
            curve.p2.y.to_bits(),
            curve.p3.y.to_bits(),
        );
        if !x.iter().chain(y.iter()).all(|v| in_range(*v)) {
            return None;
        }
        Some(Self {
            p0: Point::new(p0.x.to_bits(), p0.y.to_bits()),
            p3: curve.p3,
            k,
            coeffs: [x.map(|v| v as i32), y.map(|v| v as i32)],
        })
    }

    fn sample(&self, out: &mut Vec<Point<Fixed>>) {
        let [[ax, bx, cx], [ay, by, cy]] = self.coeffs;
        if self.k == 1 {
            let poly2 = |a: i32, b: i32, c: i32| ((((a >> 1) + b) >> 1) + c) >> 1;
            let x = self.p0.x + poly2(ax, bx, cx);
            let y = self.p0.y + poly2(ay, by, cy);
            if ((x ^ self.p0.x) | (y ^ self.p0.y)) & CELL_MASK != 0 {
                out.push(Point::new(Fixed::from_bits(x), Fixed::from_bits(y)));
            }
            out.push(self.p3);
            return;
        }
        let rmask = (1u32 << (3 * self.k)) - 1;
        let mut xd = AxisDiffs::new(self.p0.x, self.coeffs[0], self.k, rmask);
        let mut yd = AxisDiffs::new(self.p0.y, self.coeffs[1], self.k, rmask);
        let mut prev = self.p0;
        let mut run_start = out.len();
        let mut remaining = (1u32 << self.k) - 1;
        loop {
            xd.value.accum(xd.d1, rmask);
            yd.value.accum(yd.d1, rmask);
            let (x, y) = (xd.value.int, yd.value.int);
            let mut skip = false;
            if coord_near(x, prev.x) {
                if coord_near(y, prev.y) {
                    skip = true;
                } else if out.len() > run_start + 1 {
                    let before = out[out.len() - 2];
                    let (bx, by) = (before.x.to_bits(), before.y.to_bits());
                    if coord_near(x, bx)
                        && coords_in_order(bx, prev.x, x)
                        && coords_in_order(by, prev.y, y)
                    {
                        out.pop();
                    }
                }
            } else if coord_near(y, prev.y) && out.len() > run_start + 1 {
                let before = out[out.len() - 2];
                let (bx, by) = (before.x.to_bits(), before.y.to_bits());
                if coord_near(y, by)
                    && coords_in_order(bx, prev.x, x)
                    && coords_in_order(by, prev.y, y)
                {
                    out.pop();
                }
            }
            if !skip {
                if out.len() - run_start == RUN_LEN {
                    run_start = out.len();
                }
                out.push(Point::new(Fixed::from_bits(x), Fixed::from_bits(y)));
                prev = Point::new(x, y);
            }
            remaining -= 1;
            if remaining == 0 {
                break;
            }
            xd.step(rmask);
            yd.step(rmask);
        }
        out.push(self.p3);
    }
}

#[inline(always)]
fn coord_near(v: i32, prev: i32) -> bool {
    (v ^ prev) & CELL_MASK == 0
}

#[inline(always)]
fn coords_in_order(v0: i32, v1: i32, v2: i32) -> bool {
    (v1.wrapping_sub(v0) ^ v2.wrapping_sub(v1)) >= 0
}
