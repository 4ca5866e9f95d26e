//! `[Content_Types].xml` registration.

use super::xml::XmlWriter;
use super::NS_CONTENT_TYPES;
use crate::error::Result;
use indexmap::IndexMap;

/// Content type URIs used by the assemblers.
pub mod mime {
    /// Relationship parts
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    /// Generic XML
    pub const XML: &str = "application/xml";
    /// JPEG media
    pub const JPEG: &str = "image/jpeg";
    /// WordprocessingML main document
    pub const WORD_DOCUMENT: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    /// WordprocessingML styles
    pub const WORD_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    /// PresentationML main part
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    /// Slide master
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    /// Slide layout
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    /// Slide
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    /// DrawingML theme
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    /// Core properties
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    /// Extended (app) properties
    pub const EXTENDED_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

/// Default-by-extension and per-part override registrations.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: IndexMap<String, &'static str>,
    overrides: IndexMap<String, &'static str>,
}

impl ContentTypes {
    /// Registrations shared by every package: `rels`, `xml`, `jpg`.
    pub fn standard() -> Self {
        let mut types = Self::default();
        types.add_default("rels", mime::RELATIONSHIPS);
        types.add_default("xml", mime::XML);
        types.add_default("jpg", mime::JPEG);
        types
    }

    /// Register a content type for every part with this extension.
    pub fn add_default(&mut self, extension: &str, content_type: &'static str) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type);
    }

    /// Register a content type for one part (archive-relative path).
    pub fn add_override(&mut self, part_path: &str, content_type: &'static str) {
        self.overrides
            .insert(part_path.trim_start_matches('/').to_string(), content_type);
    }

    /// Content type that applies to a part, override first.
    pub fn lookup(&self, part_path: &str) -> Option<&'static str> {
        let path = part_path.trim_start_matches('/');
        if let Some(ct) = self.overrides.get(path) {
            return Some(*ct);
        }
        let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())?;
        self.defaults.get(&ext).copied()
    }

    /// Serialize as `[Content_Types].xml`.
    pub fn to_xml(&self) -> Result<String> {
        let mut w = XmlWriter::new()?;
        w.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        for (ext, &ct) in &self.defaults {
            w.empty("Default", &[("Extension", ext.as_str()), ("ContentType", ct)])?;
        }
        for (path, &ct) in &self.overrides {
            let part_name = format!("/{}", path);
            w.empty("Override", &[("PartName", part_name.as_str()), ("ContentType", ct)])?;
        }
        w.end("Types")?;
        w.finish()
    }
}
