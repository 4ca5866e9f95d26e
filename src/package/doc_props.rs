//! Package metadata parts: `docProps/core.xml` and `docProps/app.xml`.
//!
//! Some viewers treat a package without these parts as damaged, so both
//! assemblers always emit them.

use super::xml::XmlWriter;
use crate::config::DocumentMetadata;
use crate::error::Result;
use chrono::SecondsFormat;

/// Archive path of the core properties part.
pub const CORE_PATH: &str = "docProps/core.xml";

/// Archive path of the extended properties part.
pub const APP_PATH: &str = "docProps/app.xml";

const NS_CP: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
const NS_DCTERMS: &str = "http://purl.org/dc/terms/";
const NS_DCMITYPE: &str = "http://purl.org/dc/dcmitype/";
const NS_XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
const NS_EXTENDED: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties";
const NS_VT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";

/// Page-count element written to `app.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCount {
    /// `<Pages>` for word-processing documents
    Pages(usize),
    /// `<Slides>` for presentations
    Slides(usize),
}

/// Build `docProps/core.xml`.
pub fn core_xml(meta: &DocumentMetadata) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start(
        "cp:coreProperties",
        &[
            ("xmlns:cp", NS_CP),
            ("xmlns:dc", NS_DC),
            ("xmlns:dcterms", NS_DCTERMS),
            ("xmlns:dcmitype", NS_DCMITYPE),
            ("xmlns:xsi", NS_XSI),
        ],
    )?;

    if let Some(title) = &meta.title {
        w.text_element("dc:title", &[], title)?;
    }
    if let Some(creator) = &meta.creator {
        w.text_element("dc:creator", &[], creator)?;
        w.text_element("cp:lastModifiedBy", &[], creator)?;
    }
    if let Some(created) = meta.created {
        let stamp = created.to_rfc3339_opts(SecondsFormat::Secs, true);
        w.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
        w.text_element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &stamp)?;
    }

    w.end("cp:coreProperties")?;
    w.finish()
}

/// Build `docProps/app.xml`.
pub fn app_xml(meta: &DocumentMetadata, count: UnitCount) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start("Properties", &[("xmlns", NS_EXTENDED), ("xmlns:vt", NS_VT)])?;
    w.text_element("Application", &[], &meta.application)?;
    match count {
        UnitCount::Pages(n) => w.text_element("Pages", &[], &n.to_string())?,
        UnitCount::Slides(n) => w.text_element("Slides", &[], &n.to_string())?,
    }
    w.text_element("DocSecurity", &[], "0")?;
    w.end("Properties")?;
    w.finish()
}
