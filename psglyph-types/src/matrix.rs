//! Affine transforms from character space to device space.

use crate::{Fixed, Point};

/// Affine transform in PostScript order.
///
/// A point `(x, y)` maps to `(xx * x + yx * y + tx, xy * x + yy * y + ty)`.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    pub xx: f64,
    pub xy: f64,
    pub yx: f64,
    pub yy: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Creates a new matrix from its six coefficients.
    pub const fn new(xx: f64, xy: f64, yx: f64, yy: f64, tx: f64, ty: f64) -> Self {
        Self {
            xx,
            xy,
            yx,
            yy,
            tx,
            ty,
        }
    }

    /// Creates a scaling transform.
    pub const fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Returns a copy of the matrix with the given translation.
    pub const fn with_translation(self, tx: f64, ty: f64) -> Self {
        Self { tx, ty, ..self }
    }

    /// Returns the product `self * other`: `self` is applied first.
    pub fn concat(&self, other: &Self) -> Self {
        Self {
            xx: self.xx * other.xx + self.xy * other.yx,
            xy: self.xx * other.xy + self.xy * other.yy,
            yx: self.yx * other.xx + self.yy * other.yx,
            yy: self.yx * other.xy + self.yy * other.yy,
            tx: self.tx * other.xx + self.ty * other.yx + other.tx,
            ty: self.tx * other.xy + self.ty * other.yy + other.ty,
        }
    }

    /// Returns true if either off-diagonal coefficient is non-zero.
    pub fn is_skewed(&self) -> bool {
        self.xy != 0.0 || self.yx != 0.0
    }

    pub fn transform_point(&self, p: Point<f64>) -> Point<f64> {
        Point::new(
            self.xx * p.x + self.yx * p.y + self.tx,
            self.xy * p.x + self.yy * p.y + self.ty,
        )
    }

    /// Transforms a distance vector, ignoring the translation.
    pub fn transform_distance(&self, d: Point<f64>) -> Point<f64> {
        Point::new(self.xx * d.x + self.yx * d.y, self.xy * d.x + self.yy * d.y)
    }

    pub fn transform_point_fixed(&self, p: Point<Fixed>) -> Point<Fixed> {
        let p = self.transform_point(p.to_f64());
        Point::from_f64(p.x, p.y)
    }

    pub fn transform_distance_fixed(&self, d: Point<Fixed>) -> Point<Fixed> {
        let d = self.transform_distance(d.to_f64());
        Point::from_f64(d.x, d.y)
    }

    /// Returns the translation as a fixed point.
    pub fn translation_fixed(&self) -> Point<Fixed> {
        Point::from_f64(self.tx, self.ty)
    }

    /// Computes the integer coefficients used for fast fixed point
    /// transformation of distances.
    pub fn fixed_coeff(&self) -> FixedCoeff {
        FixedCoeff::new(self)
    }
}

/// Matrix coefficients scaled to integers for exact fixed point
/// multiplication.
///
/// Each coefficient is stored as `round(c * 2^shift)` where `shift` is
/// chosen so that the largest coefficient has magnitude below 2^30.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub struct FixedCoeff {
    pub xx: i64,
    pub xy: i64,
    pub yx: i64,
    pub yy: i64,
    pub shift: u32,
    round: i64,
    /// True if either off-diagonal coefficient is non-zero.
    pub skewed: bool,
}

const MAX_COEFF_BITS: i32 = 30;

impl FixedCoeff {
    fn new(m: &Matrix) -> Self {
        let coeffs = [m.xx, m.xy, m.yx, m.yy];
        let max_exp = coeffs
            .iter()
            .filter(|c| **c != 0.0)
            .map(|c| frexp_exponent(*c))
            .max()
            .unwrap_or(0);
        let shift = (MAX_COEFF_BITS - max_exp).clamp(0, 62) as u32;
        let factor = (1u64 << shift) as f64;
        let scale = |c: f64| {
            let v = c * factor;
            let half = if v.is_sign_negative() { -0.5 } else { 0.5 };
            (v + half) as i64
        };
        Self {
            xx: scale(m.xx),
            xy: scale(m.xy),
            yx: scale(m.yx),
            yy: scale(m.yy),
            shift,
            round: if shift > 0 { 1 << (shift - 1) } else { 0 },
            skewed: m.is_skewed(),
        }
    }

    /// Multiplies a fixed point value by a scaled coefficient.
    #[inline]
    pub fn mul(&self, v: Fixed, coeff: i64) -> Fixed {
        if coeff == 0 {
            return Fixed::ZERO;
        }
        let product = (v.to_bits() as i64 * coeff + self.round) >> self.shift;
        Fixed::from_bits(product.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }

    /// Transforms a distance vector.
    pub fn transform_distance(&self, d: Point<Fixed>) -> Point<Fixed> {
        let mut x = self.mul(d.x, self.xx);
        let mut y = self.mul(d.y, self.yy);
        if self.skewed {
            x += self.mul(d.y, self.yx);
            y += self.mul(d.x, self.xy);
        }
        Point::new(x, y)
    }
}

/// Returns `e` such that `|v| = f * 2^e` with `0.5 <= f < 1`.
fn frexp_exponent(v: f64) -> i32 {
    let biased = ((v.to_bits() >> 52) & 0x7ff) as i32;
    if biased == 0 {
        // subnormal values are far below any useful scale
        -1022
    } else {
        biased - 1022
    }
}
