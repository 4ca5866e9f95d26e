//! Open Packaging Conventions building blocks.
//!
//! A [`PackageTree`] is the in-memory form of an OOXML archive: an ordered
//! list of parts keyed by archive-relative path. The assemblers in
//! [`crate::converters::office`] fill a tree; [`crate::packager::Packager`]
//! turns it into zip bytes.
//!
//! Part order is the order parts were added, and it is also the entry order
//! of the finished archive, so identical input always yields identical bytes.

pub mod content_types;
pub mod doc_props;
pub mod relationships;
mod verify;
pub mod xml;

pub use content_types::ContentTypes;
pub use relationships::Relationships;

use crate::error::{Error, Result};

/// Archive path of the content-type registry.
pub const CONTENT_TYPES_PATH: &str = "[Content_Types].xml";

/// Package relationships namespace
pub const NS_PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
/// Content types namespace
pub const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
/// Office document relationships namespace (`r:` prefix)
pub const NS_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// WordprocessingML main namespace (`w:` prefix)
pub const NS_WORDPROCESSING: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Drawing placement in WordprocessingML (`wp:` prefix)
pub const NS_WP_DRAWING: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
/// DrawingML main namespace (`a:` prefix)
pub const NS_DRAWINGML: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
/// DrawingML picture namespace (`pic:` prefix)
pub const NS_PICTURE: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
/// Word shapes namespace (`wps:` prefix)
pub const NS_WORD_SHAPE: &str =
    "http://schemas.microsoft.com/office/word/2010/wordprocessingShape";
/// Markup compatibility namespace (`mc:` prefix)
pub const NS_MARKUP_COMPAT: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
/// PresentationML main namespace (`p:` prefix)
pub const NS_PRESENTATION: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

/// One file inside the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Archive-relative path without a leading slash
    pub path: String,
    /// Raw content
    pub data: Vec<u8>,
}

impl Part {
    /// Create an XML part.
    pub fn xml(path: impl Into<String>, xml: String) -> Self {
        Self {
            path: path.into(),
            data: xml.into_bytes(),
        }
    }

    /// Create a binary part.
    pub fn binary(path: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            data,
        }
    }

    /// Whether this part is a relationship table.
    pub fn is_relationships(&self) -> bool {
        self.path.ends_with(".rels")
    }
}

/// Ordered set of package parts.
#[derive(Debug, Clone, Default)]
pub struct PackageTree {
    parts: Vec<Part>,
}

impl PackageTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part. Adding a path twice is a programming error in the
    /// assembler and is reported as [`Error::Archive`].
    pub fn add(&mut self, part: Part) -> Result<()> {
        if self.get(&part.path).is_some() {
            return Err(Error::Archive(format!("Duplicate part: {}", part.path)));
        }
        self.parts.push(part);
        Ok(())
    }

    /// Add an XML part.
    pub fn add_xml(&mut self, path: impl Into<String>, xml: String) -> Result<()> {
        self.add(Part::xml(path, xml))
    }

    /// Add a binary part.
    pub fn add_binary(&mut self, path: impl Into<String>, data: Vec<u8>) -> Result<()> {
        self.add(Part::binary(path, data))
    }

    /// Add a relationship table at its conventional path.
    pub fn add_relationships(&mut self, rels: &Relationships) -> Result<()> {
        self.add_xml(rels.part_path(), rels.to_xml()?)
    }

    /// Look up a part by path.
    pub fn get(&self, path: &str) -> Option<&Part> {
        let path = path.trim_start_matches('/');
        self.parts.iter().find(|p| p.path == path)
    }

    /// Whether a part exists.
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Part paths in insertion order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.path.as_str())
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the tree has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Check the structural invariants of the package.
    ///
    /// - every part has a registered content type
    /// - every relationship target exists and IDs are unique per table
    /// - every `r:embed`/`r:id` reference in a part resolves in that part's
    ///   relationship table
    pub fn verify(&self, content_types: &ContentTypes) -> Result<()> {
        verify::verify_tree(self, content_types)
    }
}
