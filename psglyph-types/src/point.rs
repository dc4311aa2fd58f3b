use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::Fixed;

/// Two dimensional point with a generic coordinate type.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::AnyBitPattern))]
#[repr(C)]
pub struct Point<T> {
    /// X coordinate.
    pub x: T,
    /// Y coordinate.
    pub y: T,
}

impl<T> Point<T> {
    /// Creates a new point with the given x and y coordinates.
    #[inline(always)]
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }

    /// Maps `Point<T>` to `Point<U>` by applying a function to each coordinate.
    #[inline(always)]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Point<U> {
        Point {
            x: f(self.x),
            y: f(self.y),
        }
    }

    /// Returns the point with its coordinates exchanged.
    #[inline(always)]
    pub fn swap(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }
}

impl Point<Fixed> {
    /// The origin.
    pub const ZERO: Self = Self::new(Fixed::ZERO, Fixed::ZERO);

    /// Creates a point from floating point coordinates.
    pub fn from_f64(x: f64, y: f64) -> Self {
        Self::new(Fixed::from_f64(x), Fixed::from_f64(y))
    }

    /// Returns the point with floating point coordinates.
    pub fn to_f64(self) -> Point<f64> {
        self.map(Fixed::to_f64)
    }

    /// Returns the sum of the absolute values of the coordinates.
    pub fn l1_norm(self) -> Fixed {
        self.x.abs() + self.y.abs()
    }
}

impl<T> Add for Point<T>
where
    T: Add<Output = T>,
{
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T> AddAssign for Point<T>
where
    T: AddAssign,
{
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl<T> Sub for Point<T>
where
    T: Sub<Output = T>,
{
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T> SubAssign for Point<T>
where
    T: SubAssign,
{
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl<T> Mul<T> for Point<T>
where
    T: Mul<Output = T> + Copy,
{
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: T) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

impl<T> Neg for Point<T>
where
    T: Neg<Output = T>,
{
    type Output = Self;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Point;
    use crate::Fixed;

    #[test]
    fn map() {
        assert_eq!(
            Point::new(42.5, 20.25).map(Fixed::from_f64),
            Point::new(Fixed::from_bits(10880), Fixed::from_bits(5184))
        );
    }

    #[test]
    fn arithmetic() {
        let mut point = Point::new(1, 2) + Point::new(3, 4);
        assert_eq!(point, Point::new(4, 6));
        point -= Point::new(5, 1);
        assert_eq!(point, Point::new(-1, 5));
        assert_eq!(-point * 3, Point::new(3, -15));
        assert_eq!(point.swap(), Point::new(5, -1));
    }

    #[test]
    fn l1_norm() {
        let p = Point::new(Fixed::from_i32(-3), Fixed::from_i32(4));
        assert_eq!(p.l1_norm(), Fixed::from_i32(7));
        assert_eq!(p.to_f64(), Point::new(-3.0, 4.0));
    }
}
