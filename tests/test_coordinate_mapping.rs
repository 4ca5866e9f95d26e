//! Property tests for page-space to package-space mapping.

use pdf_office::geometry::mapper::{emu_to_points, points_to_emu, points_to_twips};
use pdf_office::geometry::{CoordinateMapper, PageSize, Rect};
use proptest::prelude::*;

/// Half an EMU, in points: the most a rounded offset can drift.
const EMU_TOLERANCE: f64 = 0.5 / 12_700.0;

proptest! {
    #[test]
    fn prop_y_round_trip(
        width in 72.0f64..4000.0,
        height in 72.0f64..4000.0,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
        w in 0.0f64..500.0,
        h in 0.0f64..100.0,
    ) {
        let page = PageSize::new(width, height).unwrap();
        let mapper = CoordinateMapper::new(page);
        let rect = Rect::new(fx * width, fy * height, w, h);
        let placed = mapper.place(&rect);

        let y = mapper.unplace_y(placed.y, rect.height);
        prop_assert!((y - rect.y).abs() <= EMU_TOLERANCE + 1e-9);
        prop_assert!((emu_to_points(placed.x) - rect.x).abs() <= EMU_TOLERANCE + 1e-9);
    }

    #[test]
    fn prop_emu_is_nearest_integer(points in -10_000.0f64..10_000.0) {
        let emu = points_to_emu(points).0 as f64;
        prop_assert!((emu - points * 12_700.0).abs() <= 0.5 + 1e-6);
    }

    #[test]
    fn prop_twips_is_nearest_integer(points in -10_000.0f64..10_000.0) {
        let twips = points_to_twips(points).0 as f64;
        prop_assert!((twips - points * 20.0).abs() <= 0.5 + 1e-9);
    }

    #[test]
    fn prop_top_edge_text_lands_at_zero(width in 72.0f64..2000.0, height in 72.0f64..2000.0, h in 1.0f64..50.0) {
        let mapper = CoordinateMapper::new(PageSize::new(width, height).unwrap());
        let rect = Rect::new(0.0, height - h, 10.0, h);
        prop_assert_eq!(mapper.place(&rect).y.0, 0);
    }
}

#[test]
fn test_letter_extent() {
    let mapper = CoordinateMapper::new(PageSize::LETTER);
    let (cx, cy) = mapper.page_extent();
    assert_eq!((cx.0, cy.0), (7_772_400, 10_058_400));
    let (w, h) = mapper.page_twips();
    assert_eq!((w.0, h.0), (12_240, 15_840));
}
