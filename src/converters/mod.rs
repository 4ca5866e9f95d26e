//! Format converters for PDF page records.
//!
//! - **Office**: DOCX and PPTX packages that keep the page look (background
//!   raster) and the page text (editable text boxes)

pub mod office;

pub use office::{
    convert_page_records_to_flow_document, convert_page_records_to_slide_deck, ConversionOutput,
    DocxAssembler, OfficeFormat, PdfOfficeConverter, PptxAssembler,
};
