//! Error types for PDF to Office conversion.
//!
//! This module defines all error types that can occur while extracting page
//! content, composing backgrounds, and assembling OOXML packages.
//!
//! Candidate text lines rejected by the size filter are not errors; they are
//! dropped by the extractor and never surface here.

use std::path::PathBuf;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The PDF engine could not rasterize a page.
    ///
    /// Recovered per page by the conversion pipeline: the page is skipped
    /// and reported, the rest of the document is still produced.
    #[error("Failed to render page {page}: {reason}")]
    Render {
        /// Zero-based page index
        page: usize,
        /// Reason reported by the engine
        reason: String,
    },

    /// A part could not be staged to the scratch directory.
    #[error("Failed to write package part '{}': {source}", path.display())]
    PackageWrite {
        /// Path of the part that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The archive writer failed to zip the staged package.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Raster encoding or canvas allocation error
    #[error("Image error: {0}")]
    Image(String),

    /// XML writer or reader error
    #[error("XML error: {0}")]
    Xml(String),

    /// A relationship points at a part that was never emitted, or a part
    /// references a relationship ID its rels file does not declare.
    #[error("Dangling relationship {id} in {owner} (target: {target})")]
    DanglingRelationship {
        /// Part that owns the relationship
        owner: String,
        /// Relationship ID
        id: String,
        /// Resolved target path, if known
        target: String,
    },

    /// A part's extension has no content-type registration.
    #[error("No content type registered for part: {0}")]
    MissingContentType(String),

    /// Page dimensions must both be positive and finite.
    #[error("Invalid page size: {width} x {height}")]
    InvalidPageSize {
        /// Width in points
        width: f64,
        /// Height in points
        height: f64,
    },

    /// Conversion was cancelled between pages.
    #[error("Conversion cancelled after {completed} pages")]
    Cancelled {
        /// Number of pages processed before cancellation
        completed: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is confined to a single page.
    ///
    /// Page-scoped errors are recorded and skipped; everything else aborts
    /// the whole conversion.
    pub fn is_page_scoped(&self) -> bool {
        matches!(self, Error::Render { .. } | Error::InvalidPageSize { .. })
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Archive(format!("I/O failure: {}", e)),
            other => Error::Archive(other.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_error() {
        let err = Error::Render {
            page: 1,
            reason: "corrupt content stream".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("page 1"));
        assert!(msg.contains("corrupt content stream"));
        assert!(err.is_page_scoped());
    }

    #[test]
    fn test_package_write_error() {
        let err = Error::PackageWrite {
            path: PathBuf::from("word/document.xml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("word/document.xml"));
        assert!(msg.contains("denied"));
        assert!(!err.is_page_scoped());
    }

    #[test]
    fn test_dangling_relationship_error() {
        let err = Error::DanglingRelationship {
            owner: "word/_rels/document.xml.rels".to_string(),
            id: "rId7".to_string(),
            target: "word/media/bg7.jpg".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("rId7"));
        assert!(msg.contains("bg7.jpg"));
    }

    #[test]
    fn test_zip_error_conversion() {
        let err: Error = zip::result::ZipError::FileNotFound.into();
        assert!(matches!(err, Error::Archive(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
