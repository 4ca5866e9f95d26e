//! Page-space to OOXML unit conversion.
//!
//! Every length that reaches an emitted XML part goes through this module so
//! the rounding rule is defined once. Rounding is half away from zero
//! (`f64::round`), which keeps a 612 x 792 point page at exactly
//! 7772400 x 10058400 EMU and 12240 x 15840 twips on every run.

use super::{PageSize, Rect};
use std::fmt;

/// EMU per point (914400 EMU per inch / 72 points per inch).
pub const EMU_PER_POINT: f64 = 12_700.0;

/// Twips per point.
pub const TWIPS_PER_POINT: f64 = 20.0;

/// WordprocessingML `w:sz` bounds, in half-points.
const HALF_POINTS_MIN: i64 = 1;
const HALF_POINTS_MAX: i64 = 3276;

/// DrawingML `a:rPr/@sz` bounds, in hundredths of a point.
const CENTIPOINTS_MIN: i64 = 100;
const CENTIPOINTS_MAX: i64 = 400_000;

macro_rules! unit {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

unit!(
    /// English Metric Units: 1/914400 inch, the DrawingML length unit.
    Emu
);
unit!(
    /// Twentieths of a point, the WordprocessingML page-geometry unit.
    Twips
);
unit!(
    /// Half-points, the WordprocessingML run font-size unit.
    HalfPoints
);
unit!(
    /// Hundredths of a point, the DrawingML run font-size unit.
    Centipoints
);

/// Convert points to EMU.
///
/// # Examples
///
/// ```
/// use pdf_office::geometry::mapper::{points_to_emu, Emu};
///
/// assert_eq!(points_to_emu(612.0), Emu(7_772_400));
/// assert_eq!(points_to_emu(1.0), Emu(12_700));
/// ```
pub fn points_to_emu(points: f64) -> Emu {
    Emu((points * EMU_PER_POINT).round() as i64)
}

/// Convert points to twips.
pub fn points_to_twips(points: f64) -> Twips {
    Twips((points * TWIPS_PER_POINT).round() as i64)
}

/// Convert EMU back to points.
pub fn emu_to_points(emu: Emu) -> f64 {
    emu.0 as f64 / EMU_PER_POINT
}

/// Font size for a WordprocessingML run (`w:sz`).
pub fn font_half_points(font_size: f64) -> HalfPoints {
    HalfPoints(((font_size * 2.0).round() as i64).clamp(HALF_POINTS_MIN, HALF_POINTS_MAX))
}

/// Font size for a DrawingML run (`a:rPr/@sz`).
pub fn font_centipoints(font_size: f64) -> Centipoints {
    Centipoints(((font_size * 100.0).round() as i64).clamp(CENTIPOINTS_MIN, CENTIPOINTS_MAX))
}

/// A rectangle placed in OOXML space: top-left origin, EMU units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlacedBox {
    /// Offset from the left page edge
    pub x: Emu,
    /// Offset from the top page edge
    pub y: Emu,
    /// Width
    pub cx: Emu,
    /// Height
    pub cy: Emu,
}

/// Maps PDF page space onto the target format's coordinate convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    page: PageSize,
}

impl CoordinateMapper {
    /// Create a mapper for one page.
    pub fn new(page: PageSize) -> Self {
        Self { page }
    }

    /// Page this mapper was built for.
    pub fn page(&self) -> PageSize {
        self.page
    }

    /// Page extent in EMU.
    pub fn page_extent(&self) -> (Emu, Emu) {
        (points_to_emu(self.page.width), points_to_emu(self.page.height))
    }

    /// Page extent in twips, for `w:pgSz`.
    pub fn page_twips(&self) -> (Twips, Twips) {
        (points_to_twips(self.page.width), points_to_twips(self.page.height))
    }

    /// Place a page-space rectangle: `y = round((H - y - h) * 12700)`.
    pub fn place(&self, rect: &Rect) -> PlacedBox {
        PlacedBox {
            x: points_to_emu(rect.x),
            y: points_to_emu(rect.flipped_y(self.page.height)),
            cx: points_to_emu(rect.width.max(0.0)),
            cy: points_to_emu(rect.height.max(0.0)),
        }
    }

    /// Recover the page-space bottom edge from a placed Y offset.
    pub fn unplace_y(&self, y: Emu, height: f64) -> f64 {
        self.page.height - emu_to_points(y) - height
    }

    /// Horizontal and vertical factors that stretch this page onto `target`.
    pub fn stretch_factors(&self, target: PageSize) -> (f64, f64) {
        (target.width / self.page.width, target.height / self.page.height)
    }

    /// Place a rectangle after stretching the page onto `target`.
    ///
    /// Equivalent to [`place`](Self::place) when the sizes match.
    pub fn place_stretched(&self, rect: &Rect, target: PageSize) -> PlacedBox {
        let (sx, sy) = self.stretch_factors(target);
        let top = rect.flipped_y(self.page.height) * sy;
        PlacedBox {
            x: points_to_emu(rect.x * sx),
            y: points_to_emu(top),
            cx: points_to_emu((rect.width * sx).max(0.0)),
            cy: points_to_emu((rect.height * sy).max(0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_page_units() {
        let mapper = CoordinateMapper::new(PageSize::LETTER);
        assert_eq!(mapper.page_extent(), (Emu(7_772_400), Emu(10_058_400)));
        assert_eq!(mapper.page_twips(), (Twips(12_240), Twips(15_840)));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        // 2.5 twips
        assert_eq!(points_to_twips(0.125), Twips(3));
        assert_eq!(points_to_twips(-0.125), Twips(-3));
        assert_eq!(points_to_emu(1.5), Emu(19_050));
    }

    #[test]
    fn test_place_flips_y() {
        let mapper = CoordinateMapper::new(PageSize::LETTER);
        let placed = mapper.place(&Rect::new(72.0, 700.0, 200.0, 12.0));
        assert_eq!(placed.x, Emu(914_400));
        assert_eq!(placed.y, Emu(80 * 12_700));
        assert_eq!(placed.cx, Emu(200 * 12_700));
        assert_eq!(placed.cy, Emu(12 * 12_700));
        assert!((mapper.unplace_y(placed.y, 12.0) - 700.0).abs() < 1e-9);
    }

    #[test]
    fn test_place_stretched() {
        let mapper = CoordinateMapper::new(PageSize::new(306.0, 396.0).unwrap());
        let rect = Rect::new(36.0, 300.0, 100.0, 12.0);
        assert_eq!(mapper.stretch_factors(PageSize::LETTER), (2.0, 2.0));
        let placed = mapper.place_stretched(&rect, PageSize::LETTER);
        assert_eq!(placed.x, Emu(72 * 12_700));
        assert_eq!(placed.y, Emu(168 * 12_700));
        assert_eq!(placed.cx, Emu(200 * 12_700));
        assert_eq!(placed.cy, Emu(24 * 12_700));

        let same = CoordinateMapper::new(PageSize::LETTER);
        let r = Rect::new(72.0, 700.0, 80.0, 12.0);
        assert_eq!(same.place_stretched(&r, PageSize::LETTER), same.place(&r));
    }

    #[test]
    fn test_negative_extent_clamped() {
        let mapper = CoordinateMapper::new(PageSize::LETTER);
        let placed = mapper.place(&Rect::new(0.0, 0.0, -5.0, 10.0));
        assert_eq!(placed.cx, Emu(0));
    }

    #[test]
    fn test_font_units() {
        assert_eq!(font_half_points(7.8), HalfPoints(16));
        assert_eq!(font_half_points(0.1), HalfPoints(1));
        assert_eq!(font_centipoints(7.8), Centipoints(780));
        assert_eq!(font_centipoints(0.2), Centipoints(100));
    }

    #[test]
    fn test_unit_display() {
        assert_eq!(Emu(12_700).to_string(), "12700");
        assert_eq!(Twips(-3).to_string(), "-3");
    }
}
