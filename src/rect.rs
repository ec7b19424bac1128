//! Types for rectangles.

#[allow(clippy::module_inception)]
mod rect {
    use crate::float_eq::ApproxEqPath;
    use core::ops::{Add, Sub};
    use num_traits::Zero;

    // Use our own min() and max() that are acceptable for floating point

    fn min<T: PartialOrd>(x: T, y: T) -> T {
        if x <= y {
            x
        } else {
            y
        }
    }

    fn max<T: PartialOrd>(x: T, y: T) -> T {
        if x >= y {
            x
        } else {
            y
        }
    }

    /// An axis-aligned rectangle given by two corners.
    ///
    /// A rectangle with zero width or height is still meaningful: the bounding
    /// box of a horizontal line is a rectangle with zero height.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Rect<T> {
        pub x0: T,
        pub y0: T,
        pub x1: T,
        pub y1: T,
    }

    impl<T> Rect<T> {
        #[inline]
        pub fn new(x0: T, y0: T, x1: T, y1: T) -> Self {
            Self { x0, y0, x1, y1 }
        }
    }

    impl<T> Rect<T>
    where
        T: Copy + PartialOrd + PartialEq + Add<T, Output = T> + Sub<T, Output = T> + Zero,
    {
        /// Creates a rectangle from its top-left corner and its size.
        #[inline]
        pub fn from_xywh(x: T, y: T, w: T, h: T) -> Self {
            Self {
                x0: x,
                y0: y,
                x1: x + w,
                y1: y + h,
            }
        }

        /// A degenerate rectangle holding a single point.
        #[inline]
        pub fn from_point(x: T, y: T) -> Self {
            Self {
                x0: x,
                y0: y,
                x1: x,
                y1: y,
            }
        }

        #[inline]
        pub fn x(&self) -> T {
            self.x0
        }

        #[inline]
        pub fn y(&self) -> T {
            self.y0
        }

        #[inline]
        pub fn width(&self) -> T {
            self.x1 - self.x0
        }

        #[inline]
        pub fn height(&self) -> T {
            self.y1 - self.y0
        }

        #[inline]
        pub fn translate(&self, by: (T, T)) -> Self {
            Self {
                x0: self.x0 + by.0,
                y0: self.y0 + by.1,
                x1: self.x1 + by.0,
                y1: self.y1 + by.1,
            }
        }

        #[inline]
        pub fn union(&self, rect: &Self) -> Self {
            Self {
                x0: min(self.x0, rect.x0),
                y0: min(self.y0, rect.y0),
                x1: max(self.x1, rect.x1),
                y1: max(self.y1, rect.y1),
            }
        }

        /// Grows the rectangle so that it includes the given point.
        #[inline]
        pub fn include(&self, x: T, y: T) -> Self {
            Self {
                x0: min(self.x0, x),
                y0: min(self.y0, y),
                x1: max(self.x1, x),
                y1: max(self.y1, y),
            }
        }
    }

    impl Rect<f64> {
        #[inline]
        pub fn is_empty(&self) -> bool {
            self.width().approx_eq_path(0.0) || self.height().approx_eq_path(0.0)
        }

        /// Compares all four corners within an absolute `epsilon`.
        pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
            (self.x0 - other.x0).abs() <= epsilon
                && (self.y0 - other.y0).abs() <= epsilon
                && (self.x1 - other.x1).abs() <= epsilon
                && (self.y1 - other.y1).abs() <= epsilon
        }
    }
}

pub type Rect = rect::Rect<f64>;
