//! Geometric primitives for layout, camera framing and transform tweens.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in diagram space, also used as an offset
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular box defined by minimum and maximum coordinates
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The origin is the top-left corner and Y grows downward, matching SVG and
//! most screen coordinate systems.

/// A 2D point representing a position (or offset) in diagram space.
///
/// # Examples
///
/// ```
/// # use animflow_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
///
/// let halfway = p1.lerp(p2, 0.5);
/// assert_eq!(halfway.x(), 7.5);
/// assert_eq!(halfway.y(), 12.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by `factor`
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Linear interpolation from `self` (t = 0) to `other` (t = 1).
    pub fn lerp(self, other: Point, t: f32) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from a center point and a size
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Creates a new bounds from a top-left point and a size
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use animflow_core::geometry::{Bounds, Point, Size};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 30.0));
    /// let b = Bounds::new_from_top_left(Point::new(10.0, 40.0), Size::new(120.0, 80.0));
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.min_x(), 0.0);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Expands the bounds outward by the given insets.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left(),
            min_y: self.min_y - insets.top(),
            max_x: self.max_x + insets.right(),
            max_y: self.max_y + insets.bottom(),
        }
    }

    /// Shrinks (or grows, for `factor < 1`) the bounds around its center.
    ///
    /// A zoom of 2 yields a box half as wide and half as tall, which is the
    /// viewport that magnifies its content twice.
    pub fn zoom(&self, factor: f32) -> Self {
        if factor <= 0.0 {
            return *self;
        }
        Self::new_from_center(self.center(), Size::new(self.width() / factor, self.height() / factor))
    }

    /// Interpolates each edge from `self` (t = 0) to `other` (t = 1).
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            min_x: self.min_x + (other.min_x - self.min_x) * t,
            min_y: self.min_y + (other.min_y - self.min_y) * t,
            max_x: self.max_x + (other.max_x - self.max_x) * t,
            max_y: self.max_y + (other.max_y - self.max_y) * t,
        }
    }
}

/// Represents spacing around an element with potentially different values
/// for each side
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates insets in CSS order: top, right, bottom, left
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates insets with the same value on every side
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_from_center() {
        let bounds = Bounds::new_from_center(Point::new(50.0, 50.0), Size::new(20.0, 10.0));
        assert_eq!(bounds.min_x(), 40.0);
        assert_eq!(bounds.min_y(), 45.0);
        assert_eq!(bounds.max_x(), 60.0);
        assert_eq!(bounds.max_y(), 55.0);
        assert_eq!(bounds.center(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_bounds_add_padding() {
        let bounds = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(100.0, 50.0));
        let padded = bounds.add_padding(Insets::uniform(50.0));
        assert_eq!(padded.min_x(), -50.0);
        assert_eq!(padded.min_y(), -50.0);
        assert_eq!(padded.width(), 200.0);
        assert_eq!(padded.height(), 150.0);
    }

    #[test]
    fn test_bounds_zoom() {
        let bounds = Bounds::new_from_center(Point::new(100.0, 100.0), Size::new(200.0, 100.0));

        let zoomed = bounds.zoom(2.0);
        assert_eq!(zoomed.center(), bounds.center());
        assert_eq!(zoomed.width(), 100.0);
        assert_eq!(zoomed.height(), 50.0);

        assert_eq!(bounds.zoom(0.0), bounds);
    }

    #[test]
    fn test_bounds_lerp_end_points() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_top_left(Point::new(20.0, 20.0), Size::new(40.0, 40.0));

        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5).min_x(), 10.0);
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), Size::new(w, h)))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Merged bounds should contain both inputs.
    fn check_bounds_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);

        for b in [b1, b2] {
            prop_assert!(merged.min_x() <= b.min_x() + 0.001);
            prop_assert!(merged.min_y() <= b.min_y() + 0.001);
            prop_assert!(merged.max_x() >= b.max_x() - 0.001);
            prop_assert!(merged.max_y() >= b.max_y() - 0.001);
        }
        Ok(())
    }

    /// Zooming keeps the center fixed.
    fn check_zoom_keeps_center(bounds: Bounds, factor: f32) -> Result<(), TestCaseError> {
        let zoomed = bounds.zoom(factor);

        prop_assert!(approx_eq!(f32, zoomed.center().x(), bounds.center().x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, zoomed.center().y(), bounds.center().y(), epsilon = 0.01));
        Ok(())
    }

    /// A point between both ends lies between them on each axis.
    fn check_lerp_is_between_points(p1: Point, p2: Point, t: f32) -> Result<(), TestCaseError> {
        let mid = p1.lerp(p2, t);

        prop_assert!(mid.x() >= p1.x().min(p2.x()) - 0.001 && mid.x() <= p1.x().max(p2.x()) + 0.001);
        prop_assert!(mid.y() >= p1.y().min(p2.y()) - 0.001 && mid.y() <= p1.y().max(p2.y()) + 0.001);
        Ok(())
    }

    proptest! {
        #[test]
        fn bounds_merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_bounds_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn zoom_keeps_center(bounds in bounds_strategy(), factor in 0.1f32..10.0) {
            check_zoom_keeps_center(bounds, factor)?;
        }

        #[test]
        fn lerp_is_between_points(p1 in point_strategy(), p2 in point_strategy(), t in 0.0f32..=1.0) {
            check_lerp_is_between_points(p1, p2, t)?;
        }
    }
}
