//! Relationship parts (`*.rels`).
//!
//! Each owning part has its own relationship table. IDs are handed out
//! sequentially (`rId1`, `rId2`, ...) in insertion order, so they depend only
//! on the order the assembler adds targets, never on timing.

use super::xml::XmlWriter;
use super::NS_PACKAGE_RELATIONSHIPS;
use crate::error::Result;

/// Relationship type URIs used by the assemblers.
pub mod types {
    /// Main document part from the package root
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// `docProps/core.xml`
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    /// `docProps/app.xml`
    pub const EXTENDED_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    /// Styles part
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    /// Image media
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    /// Theme part
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    /// Slide master
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    /// Slide layout
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    /// Slide
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
}

/// One entry of a relationship table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID, unique within the owning part
    pub id: String,
    /// Relationship type URI
    pub rel_type: &'static str,
    /// Target, relative to the owning part's directory
    pub target: String,
}

/// Relationship table for one owning part.
#[derive(Debug, Clone)]
pub struct Relationships {
    owner: String,
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Table for `owner`; use `""` for the package root.
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            entries: Vec::new(),
        }
    }

    /// Add a relationship and return its ID.
    pub fn add(&mut self, rel_type: &'static str, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id: id.clone(),
            rel_type,
            target: target.into(),
        });
        id
    }

    /// Owning part path (`""` for the root).
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Entries in ID order.
    pub fn entries(&self) -> &[Relationship] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Archive path of this table: `dir/_rels/name.rels`.
    pub fn part_path(&self) -> String {
        rels_path_for(&self.owner)
    }

    /// Serialize the table.
    pub fn to_xml(&self) -> Result<String> {
        let mut w = XmlWriter::new()?;
        w.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
        for rel in &self.entries {
            w.empty(
                "Relationship",
                &[
                    ("Id", rel.id.as_str()),
                    ("Type", rel.rel_type),
                    ("Target", rel.target.as_str()),
                ],
            )?;
        }
        w.end("Relationships")?;
        w.finish()
    }
}

/// Relationship part path for an owning part.
///
/// ```
/// use pdf_office::package::relationships::rels_path_for;
///
/// assert_eq!(rels_path_for(""), "_rels/.rels");
/// assert_eq!(rels_path_for("word/document.xml"), "word/_rels/document.xml.rels");
/// ```
pub fn rels_path_for(owner: &str) -> String {
    match owner.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None => format!("_rels/{}.rels", owner),
    }
}

/// Inverse of [`rels_path_for`]: the part a `.rels` file describes.
pub fn owner_of_rels(rels_path: &str) -> Option<String> {
    let (dir, file) = match rels_path.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => return None,
    };
    let name = file.strip_suffix(".rels")?;
    let parent = if dir == "_rels" {
        ""
    } else {
        dir.strip_suffix("/_rels")?
    };
    Some(if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    })
}

/// Resolve a relative target against the owning part's directory.
///
/// ```
/// use pdf_office::package::relationships::resolve_target;
///
/// assert_eq!(resolve_target("ppt/slides/slide1.xml", "../media/bg1.jpg"), "ppt/media/bg1.jpg");
/// assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
/// ```
pub fn resolve_target(owner: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match owner.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {},
            ".." => {
                segments.pop();
            },
            other => segments.push(other),
        }
    }
    segments.join("/")
}
