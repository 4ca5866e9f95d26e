//! PDF page records to Office document conversion.
//!
//! This module turns [`PageFidelityRecord`]s into OOXML packages:
//! - **DOCX**: one section per page, background anchored behind floating
//!   text boxes
//! - **PPTX**: one slide per page, background as the slide fill
//!
//! # Example
//!
//! ```
//! use pdf_office::converters::office::{OfficeFormat, PdfOfficeConverter};
//! use pdf_office::geometry::{PageSize, Rect};
//! use pdf_office::record::CancellationToken;
//! use pdf_office::source::StaticPage;
//!
//! # fn main() -> pdf_office::Result<()> {
//! let page = StaticPage::new(PageSize::LETTER)
//!     .with_line("Quarterly report", Rect::new(72.0, 700.0, 160.0, 14.0));
//!
//! let converter = PdfOfficeConverter::new();
//! let output = converter.convert(&[page], OfficeFormat::Docx, &CancellationToken::new())?;
//! assert_eq!(output.page_count, 1);
//! assert!(output.skipped_pages.is_empty());
//! assert_eq!(&output.bytes[..2], b"PK");
//! # Ok(())
//! # }
//! ```

mod docx;
mod pptx;
mod styles;

pub use docx::DocxAssembler;
pub use pptx::{slide_size, PptxAssembler};

use crate::config::ConversionConfig;
use crate::error::Result;
use crate::package::doc_props::{self, UnitCount};
use crate::package::PackageTree;
use crate::packager::Packager;
use crate::record::{
    build_page_records, CancellationToken, PageFailure, PageFidelityRecord, RecordSet,
};
use crate::source::PdfPage;
use serde::{Deserialize, Serialize};

/// Target package format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfficeFormat {
    /// Word-processing document, one section per page
    Docx,
    /// Presentation, one slide per page
    Pptx,
}

impl OfficeFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OfficeFormat::Docx => "docx",
            OfficeFormat::Pptx => "pptx",
        }
    }

    /// MIME type of the package.
    pub fn mime_type(&self) -> &'static str {
        match self {
            OfficeFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            },
            OfficeFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            },
        }
    }

    /// Detect the format from a file extension (case-insensitive, with or
    /// without a leading dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "docx" => Some(OfficeFormat::Docx),
            "pptx" => Some(OfficeFormat::Pptx),
            _ => None,
        }
    }
}

/// Result of a page-level conversion.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// Archive bytes
    pub bytes: Vec<u8>,
    /// Format of `bytes`
    pub format: OfficeFormat,
    /// Number of sections or slides in the package
    pub page_count: usize,
    /// Source pages that were left out, ordered by index
    pub skipped_pages: Vec<PageFailure>,
}

impl ConversionOutput {
    /// Whether any source page was left out.
    pub fn is_partial(&self) -> bool {
        !self.skipped_pages.is_empty()
    }
}

/// Converts PDF pages into Office packages.
#[derive(Debug, Clone, Default)]
pub struct PdfOfficeConverter {
    config: ConversionConfig,
    packager: Packager,
}

impl PdfOfficeConverter {
    /// Create a new converter with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a converter with custom configuration.
    pub fn with_config(config: ConversionConfig) -> Self {
        Self {
            config,
            packager: Packager::new(),
        }
    }

    /// Use a custom packager (for example, a different scratch root).
    pub fn with_packager(mut self, packager: Packager) -> Self {
        self.packager = packager;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Build and verify the part tree for `records`.
    pub fn assemble(
        &self,
        records: &[PageFidelityRecord],
        format: OfficeFormat,
    ) -> Result<PackageTree> {
        match format {
            OfficeFormat::Docx => DocxAssembler::new(self.config.clone()).assemble(records),
            OfficeFormat::Pptx => PptxAssembler::new(self.config.clone()).assemble(records),
        }
    }

    /// Assemble and zip `records`.
    pub fn package_records(
        &self,
        records: &[PageFidelityRecord],
        format: OfficeFormat,
    ) -> Result<Vec<u8>> {
        let tree = self.assemble(records, format)?;
        self.packager.package(&tree)
    }

    /// Convert PDF pages end to end.
    ///
    /// Pages that fail to render are skipped and listed in
    /// [`ConversionOutput::skipped_pages`]; packaging failures are fatal.
    pub fn convert<P: PdfPage>(
        &self,
        pages: &[P],
        format: OfficeFormat,
        cancel: &CancellationToken,
    ) -> Result<ConversionOutput> {
        let set = build_page_records(pages, &self.config, cancel)?;
        self.finish(set, format)
    }

    /// Like [`convert`](Self::convert), rendering pages concurrently.
    #[cfg(feature = "parallel")]
    pub fn convert_parallel<P: PdfPage + Sync>(
        &self,
        pages: &[P],
        format: OfficeFormat,
        cancel: &CancellationToken,
    ) -> Result<ConversionOutput> {
        let set = crate::record::build_page_records_parallel(pages, &self.config, cancel)?;
        self.finish(set, format)
    }

    fn finish(&self, set: RecordSet, format: OfficeFormat) -> Result<ConversionOutput> {
        let bytes = self.package_records(&set.records, format)?;
        log::info!(
            "Converted {} pages to {} ({} skipped)",
            set.records.len(),
            format.extension(),
            set.failures.len()
        );
        Ok(ConversionOutput {
            bytes,
            format,
            page_count: set.records.len(),
            skipped_pages: set.failures,
        })
    }
}

/// Package page records as a `.docx` archive with default settings.
pub fn convert_page_records_to_flow_document(records: &[PageFidelityRecord]) -> Result<Vec<u8>> {
    PdfOfficeConverter::new().package_records(records, OfficeFormat::Docx)
}

/// Package page records as a `.pptx` archive with default settings.
pub fn convert_page_records_to_slide_deck(records: &[PageFidelityRecord]) -> Result<Vec<u8>> {
    PdfOfficeConverter::new().package_records(records, OfficeFormat::Pptx)
}

/// Media file name for the record at `position`.
fn media_name(position: usize) -> String {
    format!("bg{}.jpg", position + 1)
}

fn write_doc_props(
    tree: &mut PackageTree,
    config: &ConversionConfig,
    count: UnitCount,
) -> Result<()> {
    tree.add_xml(doc_props::CORE_PATH, doc_props::core_xml(&config.metadata)?)?;
    tree.add_xml(doc_props::APP_PATH, doc_props::app_xml(&config.metadata, count)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(OfficeFormat::from_extension("DOCX"), Some(OfficeFormat::Docx));
        assert_eq!(OfficeFormat::from_extension(".pptx"), Some(OfficeFormat::Pptx));
        assert_eq!(OfficeFormat::from_extension("xlsx"), None);
    }

    #[test]
    fn test_format_mime() {
        assert_eq!(OfficeFormat::Docx.extension(), "docx");
        assert!(OfficeFormat::Pptx.mime_type().ends_with("presentation"));
    }

    #[test]
    fn test_converter_new() {
        let converter = PdfOfficeConverter::new();
        assert_eq!(converter.config().default_font, "Arial");
    }

    #[test]
    fn test_media_name() {
        assert_eq!(media_name(0), "bg1.jpg");
    }
}
