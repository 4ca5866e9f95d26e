//! Page background composition.
//!
//! The background is the whole page rendered to a raster with every accepted
//! text block painted out in white. The editable text boxes laid over it in
//! the output package are then the only visible text at those positions.

use crate::config::RasterConfig;
use crate::error::{Error, Result};
use crate::extract::TextBlock;
use crate::geometry::PageSize;
use crate::source::PdfPage;

use image::codecs::jpeg::JpegEncoder;
use tiny_skia::{Color, Paint, Pixmap, Transform};

/// A composed page background.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    pixmap: Pixmap,
    scale: f64,
}

impl BackgroundImage {
    /// Wrap an existing canvas rendered at `scale` pixels per point.
    pub fn from_pixmap(pixmap: Pixmap, scale: f64) -> Self {
        Self { pixmap, scale }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Pixels per PDF point.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Underlying canvas.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Unpremultiplied RGB at a pixel, if in bounds.
    pub fn rgb(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.pixmap.pixel(x, y).map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue()]
        })
    }

    /// Encode as baseline JPEG. Alpha is dropped.
    pub fn encode_jpeg(&self, quality: u8) -> Result<Vec<u8>> {
        let width = self.pixmap.width();
        let height = self.pixmap.height();

        let mut rgb = Vec::with_capacity((width * height * 3) as usize);
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            rgb.extend_from_slice(&[c.red(), c.green(), c.blue()]);
        }

        let mut output = Vec::new();
        JpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100))
            .encode(&rgb, width, height, image::ColorType::Rgb8)
            .map_err(|e| Error::Image(format!("JPEG encoding failed: {}", e)))?;
        Ok(output)
    }
}

/// Renders a page and whites out its text blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct BackgroundComposer {
    config: RasterConfig,
}

impl BackgroundComposer {
    /// Create a composer with the given raster options.
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    /// Pixels per point for a page, after the longest-edge cap.
    pub fn effective_scale(&self, size: PageSize) -> f64 {
        let scale = if self.config.scale.is_finite() && self.config.scale > 0.0 {
            self.config.scale
        } else {
            1.0
        };
        let longest = size.width.max(size.height) * scale;
        let cap = self.config.max_dimension.max(1) as f64;
        if longest > cap {
            cap / size.width.max(size.height)
        } else {
            scale
        }
    }

    /// Compose the background of page `index`.
    ///
    /// Render failures come back as [`Error::Render`] carrying the page index;
    /// a blank page is never substituted.
    pub fn compose<P: PdfPage + ?Sized>(
        &self,
        page: &P,
        blocks: &[TextBlock],
        index: usize,
    ) -> Result<BackgroundImage> {
        let size = page.page_size();
        size.validate()?;

        let scale = self.effective_scale(size);
        let width = ((size.width * scale).ceil() as u32).max(1);
        let height = ((size.height * scale).ceil() as u32).max(1);

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::Image(format!("Failed to create pixmap {}x{}", width, height))
        })?;
        pixmap.fill(Color::WHITE);

        // PDF origin is bottom-left, raster origin top-left: flip Y about the
        // page height.
        let transform = Transform::from_scale(scale as f32, -(scale as f32))
            .post_translate(0.0, (size.height * scale) as f32);

        page.render(&mut pixmap, transform).map_err(|e| Error::Render {
            page: index,
            reason: e.to_string(),
        })?;

        let erased = white_out(&mut pixmap, size, blocks, scale);
        log::debug!(
            "Composed background for page {}: {}x{} px, {} text areas erased",
            index,
            width,
            height,
            erased
        );

        Ok(BackgroundImage { pixmap, scale })
    }
}

/// Paint each block's frame solid white, snapped outward to whole pixels.
fn white_out(pixmap: &mut Pixmap, size: PageSize, blocks: &[TextBlock], scale: f64) -> usize {
    let mut paint = Paint::default();
    paint.set_color(Color::WHITE);
    paint.anti_alias = false;

    let mut erased = 0;
    for block in blocks {
        let frame = block.frame;
        let left = (frame.x * scale).floor();
        let top = (frame.flipped_y(size.height) * scale).floor();
        let right = ((frame.x + frame.width) * scale).ceil();
        let bottom = ((frame.flipped_y(size.height) + frame.height) * scale).ceil();

        match tiny_skia::Rect::from_ltrb(left as f32, top as f32, right as f32, bottom as f32) {
            Some(rect) => {
                pixmap.fill_rect(rect, &paint, Transform::identity(), None);
                erased += 1;
            },
            None => log::trace!("Skipping white-out for empty frame {:?}", frame),
        }
    }
    erased
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::source::{PageContent, StaticPage};

    fn block(x: f64, y: f64, w: f64, h: f64) -> TextBlock {
        TextBlock {
            text: "t".to_string(),
            frame: Rect::new(x, y, w, h),
            font_size: h * 0.65,
        }
    }

    fn black_page(w: f64, h: f64) -> StaticPage {
        StaticPage::new(PageSize::new(w, h).unwrap()).with_content(PageContent::Fill([0, 0, 0, 255]))
    }

    #[test]
    fn test_canvas_matches_media_box() {
        let page = StaticPage::new(PageSize::LETTER);
        let image = BackgroundComposer::default().compose(&page, &[], 0).unwrap();
        assert_eq!((image.width(), image.height()), (612, 792));
        assert_eq!(image.rgb(300, 300), Some([255, 255, 255]));
    }

    #[test]
    fn test_white_out_uses_flipped_coordinates() {
        let page = black_page(100.0, 100.0);
        // Bottom-left block in PDF space lands in the bottom-left of the image
        let blocks = [block(10.0, 10.0, 30.0, 20.0)];
        let image = BackgroundComposer::default().compose(&page, &blocks, 0).unwrap();

        // y_image = 100 - 10 - 20 = 70 .. 90
        assert_eq!(image.rgb(20, 80), Some([255, 255, 255]));
        assert_eq!(image.rgb(20, 20), Some([0, 0, 0]));
        assert_eq!(image.rgb(60, 80), Some([0, 0, 0]));
    }

    #[test]
    fn test_render_failure_is_reported() {
        let page = StaticPage::unrenderable(PageSize::LETTER, "bad xref");
        let err = BackgroundComposer::default().compose(&page, &[], 4).unwrap_err();
        match err {
            Error::Render { page, reason } => {
                assert_eq!(page, 4);
                assert!(reason.contains("bad xref"));
            },
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_dimension_cap() {
        let config = RasterConfig::with_dpi(300).with_max_dimension(1000);
        let composer = BackgroundComposer::new(config);
        let page = StaticPage::new(PageSize::new(500.0, 250.0).unwrap());
        let image = composer.compose(&page, &[], 0).unwrap();
        assert_eq!((image.width(), image.height()), (1000, 500));
        assert_eq!(image.scale(), 2.0);
    }

    #[test]
    fn test_invalid_size_rejected() {
        let page = StaticPage::new(PageSize {
            width: 0.0,
            height: 10.0,
        });
        assert!(matches!(
            BackgroundComposer::default().compose(&page, &[], 0),
            Err(Error::InvalidPageSize { .. })
        ));
    }

    #[test]
    fn test_encode_jpeg() {
        let page = black_page(40.0, 30.0);
        let image = BackgroundComposer::default().compose(&page, &[], 0).unwrap();
        let jpeg = image.encode_jpeg(80).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }
}
