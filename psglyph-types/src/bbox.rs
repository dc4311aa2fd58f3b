use crate::Point;

/// Minimum and maximum extents of a rectangular region.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox<T> {
    /// Minimum extent in the x direction.
    pub x_min: T,
    /// Minimum extent in the y direction.
    pub y_min: T,
    /// Maximum extent in the x direction.
    pub x_max: T,
    /// Maximum extent in the y direction.
    pub y_max: T,
}

impl<T> BoundingBox<T>
where
    T: PartialOrd + Copy,
{
    /// Returns a degenerate box containing only the given point.
    pub fn from_point(point: Point<T>) -> Self {
        Self {
            x_min: point.x,
            y_min: point.y,
            x_max: point.x,
            y_max: point.y,
        }
    }

    /// Grows the box to include the given point.
    pub fn add_point(&mut self, point: Point<T>) {
        if point.x < self.x_min {
            self.x_min = point.x;
        }
        if point.x > self.x_max {
            self.x_max = point.x;
        }
        if point.y < self.y_min {
            self.y_min = point.y;
        }
        if point.y > self.y_max {
            self.y_max = point.y;
        }
    }

    /// Returns the smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        let mut result = *self;
        result.add_point(Point::new(other.x_min, other.y_min));
        result.add_point(Point::new(other.x_max, other.y_max));
        result
    }

    /// Returns true if the point lies inside the box or on its boundary.
    pub fn contains(&self, point: Point<T>) -> bool {
        point.x >= self.x_min && point.x <= self.x_max && point.y >= self.y_min && point.y <= self.y_max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_from_points() {
        let mut bbox = BoundingBox::from_point(Point::new(3, 4));
        bbox.add_point(Point::new(-1, 10));
        bbox.add_point(Point::new(5, 2));
        assert_eq!(
            bbox,
            BoundingBox {
                x_min: -1,
                y_min: 2,
                x_max: 5,
                y_max: 10
            }
        );
        assert!(bbox.contains(Point::new(0, 5)));
        assert!(!bbox.contains(Point::new(6, 5)));
        let other = BoundingBox::from_point(Point::new(20, -20));
        assert_eq!(bbox.union(&other).x_max, 20);
        assert_eq!(bbox.union(&other).y_min, -20);
    }
}
