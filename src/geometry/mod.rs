//! Geometric primitives in PDF page space.
//!
//! All values are PDF points (1/72 inch). PDF page space has its origin at
//! the bottom-left corner with Y growing upward; [`Rect::y`] is therefore the
//! rectangle's bottom edge. Conversion into OOXML units and the top-left
//! convention lives in [`mapper`].

pub mod mapper;

pub use mapper::{Centipoints, CoordinateMapper, Emu, HalfPoints, PlacedBox, Twips};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A rectangle in PDF page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of the left edge
    pub x: f64,
    /// Y coordinate of the bottom edge
    pub y: f64,
    /// Width of rectangle
    pub width: f64,
    /// Height of rectangle
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_office::geometry::Rect;
    ///
    /// let rect = Rect::new(72.0, 700.0, 200.0, 12.0);
    /// assert_eq!(rect.width, 200.0);
    /// assert_eq!(rect.top(), 712.0);
    /// ```
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points, normalizing negative extents.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_office::geometry::Rect;
    ///
    /// let rect = Rect::from_points(110.0, 70.0, 10.0, 20.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f64 {
        self.y
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Compute the area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// All four components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Y of this rectangle's top edge measured down from the top of a page
    /// of the given height.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_office::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 700.0, 100.0, 12.0);
    /// assert_eq!(rect.flipped_y(792.0), 80.0);
    /// ```
    pub fn flipped_y(&self, page_height: f64) -> f64 {
        page_height - self.y - self.height
    }
}

/// Size of a page's media box in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Width in points
    pub width: f64,
    /// Height in points
    pub height: f64,
}

impl PageSize {
    /// US Letter (8.5 x 11 inches)
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// ISO A4
    pub const A4: PageSize = PageSize {
        width: 595.0,
        height: 842.0,
    };

    /// Create a page size, rejecting non-positive or non-finite dimensions.
    pub fn new(width: f64, height: f64) -> Result<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Check that both dimensions are positive and finite.
    pub fn validate(&self) -> Result<()> {
        if self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
        {
            Ok(())
        } else {
            Err(Error::InvalidPageSize {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// The full page as a rectangle anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.bottom(), 20.0);
        assert_eq!(r.top(), 70.0);
        assert_eq!(r.area(), 5000.0);
    }

    #[test]
    fn test_rect_from_points_normalizes() {
        let r = Rect::from_points(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r, Rect::new(10.0, 20.0, 100.0, 50.0));
        let flipped = Rect::from_points(110.0, 70.0, 10.0, 20.0);
        assert_eq!(flipped, r);
    }

    #[test]
    fn test_flipped_y() {
        let r = Rect::new(72.0, 720.0, 200.0, 12.0);
        assert_eq!(r.flipped_y(792.0), 60.0);
    }

    #[test]
    fn test_rect_is_finite() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_finite());
        assert!(!Rect::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
        assert!(!Rect::new(0.0, 0.0, f64::INFINITY, 1.0).is_finite());
    }

    #[test]
    fn test_page_size_validation() {
        assert!(PageSize::new(612.0, 792.0).is_ok());
        assert!(matches!(
            PageSize::new(0.0, 792.0),
            Err(Error::InvalidPageSize { .. })
        ));
        assert!(PageSize::new(612.0, -1.0).is_err());
        assert!(PageSize::new(f64::NAN, 792.0).is_err());
    }

    #[test]
    fn test_page_bounds() {
        let b = PageSize::LETTER.bounds();
        assert_eq!(b.width, 612.0);
        assert_eq!(b.height, 792.0);
    }
}
