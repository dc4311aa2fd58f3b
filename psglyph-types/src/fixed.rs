//! fixed-point numerical types

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// shared between Fixed and F16Dot16
macro_rules! fixed_impl {
    ($name:ident, $bits:literal, $fract_bits:literal, $ty:ty) => {
        #[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
        #[repr(transparent)]
        #[doc = concat!(stringify!($bits), "-bit signed fixed point number with ", stringify!($fract_bits), " bits of fraction." )]
        pub struct $name($ty);
        impl $name {
            /// Minimum value.
            pub const MIN: Self = Self(<$ty>::MIN);

            /// Maximum value.
            pub const MAX: Self = Self(<$ty>::MAX);

            /// This type's smallest representable value
            pub const EPSILON: Self = Self(1);

            /// Representation of 0.0.
            pub const ZERO: Self = Self(0);

            /// Representation of 1.0.
            pub const ONE: Self = Self(1 << $fract_bits);

            /// Representation of 0.5.
            pub const HALF: Self = Self(1 << ($fract_bits - 1));

            const INT_MASK: $ty = !0 << $fract_bits;
            const ROUND: $ty = 1 << ($fract_bits - 1);

            /// Number of fractional bits.
            pub const FRACT_BITS: u32 = $fract_bits;

            /// Creates a new fixed point value from the underlying bit
            /// representation.
            #[inline(always)]
            pub const fn from_bits(bits: $ty) -> Self {
                Self(bits)
            }

            /// Returns the underlying bit representation of the value.
            #[inline(always)]
            pub const fn to_bits(self) -> $ty {
                self.0
            }

            /// Creates a fixed point value from an integer, wrapping on
            /// overflow.
            #[inline(always)]
            pub const fn from_i32(i: i32) -> Self {
                Self((i as $ty).wrapping_shl($fract_bits))
            }

            /// Creates a fixed point value from an integer, returning `None`
            /// if the integer does not fit the integral part.
            pub const fn checked_from_i32(i: i32) -> Option<Self> {
                let limit = <$ty>::MAX >> $fract_bits;
                if (i as i64) > limit as i64 || (i as i64) < -(limit as i64) - 1 {
                    None
                } else {
                    Some(Self((i as $ty) << $fract_bits))
                }
            }

            /// Returns the value truncated toward negative infinity as an
            /// integer.
            #[inline(always)]
            pub const fn to_i32(self) -> i32 {
                (self.0 >> $fract_bits) as i32
            }

            /// Returns the nearest integer value.
            pub fn round(self) -> Self {
                Self(self.0.wrapping_add(Self::ROUND) & Self::INT_MASK)
            }

            /// Returns the absolute value of the number.
            pub fn abs(self) -> Self {
                Self(self.0.wrapping_abs())
            }

            /// Returns the largest integer less than or equal to the number.
            pub fn floor(self) -> Self {
                Self(self.0 & Self::INT_MASK)
            }

            /// Returns the fractional part of the number.
            pub fn fract(self) -> Self {
                Self(self.0 - self.floor().0)
            }

            /// Wrapping addition.
            pub fn wrapping_add(self, other: Self) -> Self {
                Self(self.0.wrapping_add(other.0))
            }

            /// Saturating addition.
            pub fn saturating_add(self, other: Self) -> Self {
                Self(self.0.saturating_add(other.0))
            }

            /// Wrapping substitution.
            pub fn wrapping_sub(self, other: Self) -> Self {
                Self(self.0.wrapping_sub(other.0))
            }

            /// Saturating substitution.
            pub fn saturating_sub(self, other: Self) -> Self {
                Self(self.0.saturating_sub(other.0))
            }

            /// Multiplication, saturating at the bounds of the type.
            pub fn saturating_mul(self, other: Self) -> Self {
                let product = (self.0 as i64 * other.0 as i64) >> $fract_bits;
                Self(product.clamp(<$ty>::MIN as i64, <$ty>::MAX as i64) as $ty)
            }

            /// Division, returning `None` for a zero divisor or a quotient
            /// that overflows.
            pub fn checked_div(self, other: Self) -> Option<Self> {
                if other.0 == 0 {
                    return None;
                }
                let quotient = ((self.0 as i64) << $fract_bits) / other.0 as i64;
                <$ty>::try_from(quotient).ok().map(Self)
            }
        }

        impl Add for $name {
            type Output = Self;
            #[inline(always)]
            fn add(self, other: Self) -> Self {
                // device coordinates wrap like the underlying integers
                Self(self.0.wrapping_add(other.0))
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, other: Self) {
                *self = *self + other;
            }
        }

        impl Sub for $name {
            type Output = Self;
            #[inline(always)]
            fn sub(self, other: Self) -> Self {
                Self(self.0.wrapping_sub(other.0))
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, other: Self) {
                *self = *self - other;
            }
        }

        impl Neg for $name {
            type Output = Self;
            #[inline(always)]
            fn neg(self) -> Self {
                Self(self.0.wrapping_neg())
            }
        }

        impl Mul for $name {
            type Output = Self;
            #[inline(always)]
            fn mul(self, other: Self) -> Self {
                Self(((self.0 as i64 * other.0 as i64) >> $fract_bits) as $ty)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.to_f64())
            }
        }
    };
}

/// impl float conversion methods.
macro_rules! float_conv {
    ($name:ident, $to:ident, $from:ident, $ty:ty) => {
        impl $name {
            #[doc = concat!("Creates a fixed point value from a", stringify!($ty), ".")]
            ///
            /// This operation is lossy; the float will be rounded to the nearest
            /// representable value, with ties rounding away from zero.
            pub fn $from(x: $ty) -> Self {
                let scaled = x * (1i64 << Self::FRACT_BITS) as $ty;
                // `as` saturates for out of range floats
                let half = if scaled.is_sign_negative() { -0.5 } else { 0.5 };
                Self((scaled + half) as _)
            }

            #[doc = concat!("Returns the value as an ", stringify!($ty), ".")]
            ///
            /// This operation is lossless: all values can be represented exactly.
            pub fn $to(self) -> $ty {
                self.0 as $ty / (1i64 << Self::FRACT_BITS) as $ty
            }
        }
    };
}

fixed_impl!(Fixed, 32, 8, i32);
fixed_impl!(F16Dot16, 32, 16, i32);
float_conv!(Fixed, to_f64, from_f64, f64);
float_conv!(F16Dot16, to_f64, from_f64, f64);

impl Fixed {
    /// Scales the value by a float, rounding the result.
    pub fn mul_f64(self, factor: f64) -> Self {
        Self::from_f64(self.to_f64() * factor)
    }
}

impl F16Dot16 {
    /// Converts to the 24.8 format, discarding the low 8 bits of fraction.
    pub const fn to_fixed(self) -> Fixed {
        Fixed(self.0 >> 8)
    }
}

impl From<Fixed> for F16Dot16 {
    fn from(value: Fixed) -> Self {
        Self(value.0.wrapping_shl(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_from_int() {
        assert_eq!(Fixed::from_i32(3).to_bits(), 0x300);
        assert_eq!(Fixed::from_i32(-1).to_bits(), -256);
        assert_eq!(Fixed::from_i32(-3).to_i32(), -3);
        assert_eq!(Fixed::checked_from_i32(0x7f_ffff), Some(Fixed(0x7fff_ff00)));
        assert_eq!(Fixed::checked_from_i32(-0x80_0000), Some(Fixed(i32::MIN)));
        assert_eq!(Fixed::checked_from_i32(0x80_0000), None);
        assert_eq!(Fixed::checked_from_i32(-0x80_0001), None);
    }

    #[test]
    fn fixed_floor_round() {
        let v = Fixed::from_f64(-2.5);
        assert_eq!(v.floor(), Fixed::from_i32(-3));
        assert_eq!(v.round(), Fixed::from_i32(-2));
        assert_eq!(v.to_i32(), -3);
        assert_eq!(Fixed::from_f64(1.75).fract(), Fixed::from_f64(0.75));
        assert_eq!(Fixed::from_f64(0.05).to_bits(), 13);
    }

    #[test]
    fn fixed_mul_div() {
        let a = Fixed::from_f64(1.5);
        let b = Fixed::from_i32(-4);
        assert_eq!(a * b, Fixed::from_i32(-6));
        assert_eq!(b.checked_div(a), Some(Fixed::from_f64(-2.6640625)));
        assert_eq!(a.checked_div(Fixed::ZERO), None);
        assert_eq!(Fixed::MAX.saturating_mul(Fixed::from_i32(2)), Fixed::MAX);
    }

    #[test]
    fn sixteen_dot_sixteen_to_fixed() {
        let v = F16Dot16::from_f64(12.5);
        assert_eq!(v.to_bits(), 0xC_8000);
        assert_eq!(v.to_fixed(), Fixed::from_f64(12.5));
        assert_eq!(F16Dot16::from(Fixed::from_f64(-0.25)), F16Dot16::from_f64(-0.25));
    }
}
