//! Interface to the PDF engine that supplies page geometry and drawing.
//!
//! The converter never parses PDF itself. Per page it needs three things
//! from an engine: the media box size, line-level text selections with their
//! bounding boxes, and the ability to draw the page's content onto a canvas.
//! [`PdfPage`] captures exactly that; [`StaticPage`] is an in-memory
//! implementation for callers that already hold the data (a pre-rendered
//! raster plus text lines), and for tests.

use crate::error::{Error, Result};
use crate::geometry::{PageSize, Rect};
use tiny_skia::{Color, FilterQuality, Pixmap, PixmapPaint, Transform};

/// One line of selectable text with its bounding box in page space.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSelection {
    /// Raw line text as reported by the engine (may contain padding)
    pub text: String,
    /// Bounding box in PDF points, origin bottom-left
    pub bounds: Rect,
}

impl LineSelection {
    /// Create a line selection.
    pub fn new(text: impl Into<String>, bounds: Rect) -> Self {
        Self {
            text: text.into(),
            bounds,
        }
    }
}

/// A single page handle from a PDF engine.
///
/// Handles are not required to be thread-safe. Concurrent processing only
/// accepts `PdfPage + Sync` pages, so an engine whose handles share a
/// document lock must either give each page its own handle or serialize
/// inside `render`.
pub trait PdfPage {
    /// Media box dimensions in points.
    fn page_size(&self) -> PageSize;

    /// Line-level text selections in visual line order.
    fn line_selections(&self) -> Vec<LineSelection>;

    /// Draw the page's content in PDF space onto `canvas`.
    ///
    /// `transform` maps PDF page space (points, origin bottom-left) onto
    /// canvas pixels and already includes the vertical flip. The canvas is
    /// pre-filled white.
    fn render(&self, canvas: &mut Pixmap, transform: Transform) -> Result<()>;
}

/// What a [`StaticPage`] draws.
#[derive(Debug, Clone, Default)]
pub enum PageContent {
    /// Nothing; the background stays white.
    #[default]
    Blank,
    /// A solid RGBA fill over the whole media box.
    Fill([u8; 4]),
    /// An upright raster covering the whole media box (row 0 at the top).
    Raster(Pixmap),
    /// Rendering always fails with this reason.
    Unrenderable(String),
}

/// An in-memory page: known size, known lines, known content.
#[derive(Debug, Clone)]
pub struct StaticPage {
    size: PageSize,
    lines: Vec<LineSelection>,
    content: PageContent,
}

impl StaticPage {
    /// Create a blank page with no text.
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            lines: Vec::new(),
            content: PageContent::Blank,
        }
    }

    /// Add a text line.
    pub fn with_line(mut self, text: impl Into<String>, bounds: Rect) -> Self {
        self.lines.push(LineSelection::new(text, bounds));
        self
    }

    /// Replace all text lines.
    pub fn with_lines(mut self, lines: Vec<LineSelection>) -> Self {
        self.lines = lines;
        self
    }

    /// Set the drawn content.
    pub fn with_content(mut self, content: PageContent) -> Self {
        self.content = content;
        self
    }

    /// A page whose render call always fails.
    pub fn unrenderable(size: PageSize, reason: impl Into<String>) -> Self {
        Self::new(size).with_content(PageContent::Unrenderable(reason.into()))
    }
}

impl PdfPage for StaticPage {
    fn page_size(&self) -> PageSize {
        self.size
    }

    fn line_selections(&self) -> Vec<LineSelection> {
        self.lines.clone()
    }

    fn render(&self, canvas: &mut Pixmap, transform: Transform) -> Result<()> {
        match &self.content {
            PageContent::Blank => Ok(()),
            PageContent::Fill([r, g, b, a]) => {
                let rect = tiny_skia::Rect::from_xywh(
                    0.0,
                    0.0,
                    self.size.width as f32,
                    self.size.height as f32,
                )
                .ok_or_else(|| Error::Image("empty media box".to_string()))?;
                let mut paint = tiny_skia::Paint::default();
                paint.set_color(Color::from_rgba8(*r, *g, *b, *a));
                canvas.fill_rect(rect, &paint, transform, None);
                Ok(())
            },
            PageContent::Raster(raster) => {
                // Raster pixels -> PDF space: scale to the media box and flip
                // so row 0 lands on the top edge.
                let to_page = Transform::from_row(
                    self.size.width as f32 / raster.width() as f32,
                    0.0,
                    0.0,
                    -(self.size.height as f32) / raster.height() as f32,
                    0.0,
                    self.size.height as f32,
                );
                let paint = PixmapPaint {
                    quality: FilterQuality::Bilinear,
                    ..PixmapPaint::default()
                };
                canvas.draw_pixmap(0, 0, raster.as_ref(), &paint, to_page.post_concat(transform), None);
                Ok(())
            },
            PageContent::Unrenderable(reason) => Err(Error::Image(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_page_lines() {
        let page = StaticPage::new(PageSize::LETTER)
            .with_line("Hello", Rect::new(72.0, 700.0, 80.0, 12.0))
            .with_line("World", Rect::new(72.0, 680.0, 80.0, 12.0));
        let lines = page.line_selections();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Hello");
        assert_eq!(page.page_size(), PageSize::LETTER);
    }

    #[test]
    fn test_unrenderable_page_fails() {
        let page = StaticPage::unrenderable(PageSize::LETTER, "broken stream");
        let mut canvas = Pixmap::new(10, 10).unwrap();
        let err = page.render(&mut canvas, Transform::identity()).unwrap_err();
        assert!(err.to_string().contains("broken stream"));
    }

    #[test]
    fn test_fill_covers_canvas() {
        let page = StaticPage::new(PageSize::new(10.0, 10.0).unwrap())
            .with_content(PageContent::Fill([0, 0, 0, 255]));
        let mut canvas = Pixmap::new(10, 10).unwrap();
        canvas.fill(Color::WHITE);
        page.render(&mut canvas, Transform::identity()).unwrap();
        let px = canvas.pixel(5, 5).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (0, 0, 0));
    }
}
