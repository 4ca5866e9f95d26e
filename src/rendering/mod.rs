//! Page background rendering.
//!
//! This module turns a page into the raster that sits behind the editable
//! text boxes, using the pure-Rust `tiny-skia` library for the canvas and
//! the `image` crate for JPEG output.
//!
//! ## Pipeline
//!
//! 1. Allocate a canvas sized to the page's media box and fill it white
//! 2. Let the PDF engine draw the page through a Y-flipping transform
//! 3. Paint every accepted text block's frame white
//! 4. Encode to JPEG when the package is assembled
//!
//! ## Example
//!
//! ```
//! use pdf_office::geometry::PageSize;
//! use pdf_office::rendering::BackgroundComposer;
//! use pdf_office::source::StaticPage;
//!
//! let page = StaticPage::new(PageSize::LETTER);
//! let background = BackgroundComposer::default().compose(&page, &[], 0).unwrap();
//! assert_eq!(background.width(), 612);
//! ```

mod background;

pub use background::{BackgroundComposer, BackgroundImage};
