//! Shared style parts: the word-processing `styles.xml` and the
//! presentation theme.
//!
//! Both parts only have to name a default typeface and a neutral color
//! scheme. All visual weight comes from the page backgrounds, so text runs
//! carry their own size and nothing else.

use crate::error::Result;
use crate::package::xml::XmlWriter;
use crate::package::{NS_DRAWINGML, NS_RELATIONSHIPS, NS_WORDPROCESSING};

/// Default run size in `styles.xml`, in half-points.
const DEFAULT_HALF_POINTS: &str = "22";

/// Build `word/styles.xml` with document defaults and a `Normal` style.
///
/// Paragraph spacing is zeroed so anchored boxes are the only thing that
/// positions text.
pub fn word_styles_xml(default_font: &str) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start(
        "w:styles",
        &[("xmlns:w", NS_WORDPROCESSING), ("xmlns:r", NS_RELATIONSHIPS)],
    )?;

    w.start("w:docDefaults", &[])?;
    w.start("w:rPrDefault", &[])?;
    w.start("w:rPr", &[])?;
    w.empty(
        "w:rFonts",
        &[
            ("w:ascii", default_font),
            ("w:hAnsi", default_font),
            ("w:eastAsia", default_font),
            ("w:cs", default_font),
        ],
    )?;
    w.empty("w:sz", &[("w:val", DEFAULT_HALF_POINTS)])?;
    w.empty("w:szCs", &[("w:val", DEFAULT_HALF_POINTS)])?;
    w.empty("w:lang", &[("w:val", "en-US")])?;
    w.end("w:rPr")?;
    w.end("w:rPrDefault")?;
    w.start("w:pPrDefault", &[])?;
    w.start("w:pPr", &[])?;
    w.empty(
        "w:spacing",
        &[("w:before", "0"), ("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")],
    )?;
    w.end("w:pPr")?;
    w.end("w:pPrDefault")?;
    w.end("w:docDefaults")?;

    w.start(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    w.empty("w:name", &[("w:val", "Normal")])?;
    w.empty("w:qFormat", &[])?;
    w.end("w:style")?;

    w.end("w:styles")?;
    w.finish()
}

/// Theme color slots, in schema order.
const THEME_COLORS: [(&str, ThemeColor); 12] = [
    ("a:dk1", ThemeColor::System("windowText", "000000")),
    ("a:lt1", ThemeColor::System("window", "FFFFFF")),
    ("a:dk2", ThemeColor::Rgb("44546A")),
    ("a:lt2", ThemeColor::Rgb("E7E6E6")),
    ("a:accent1", ThemeColor::Rgb("4472C4")),
    ("a:accent2", ThemeColor::Rgb("ED7D31")),
    ("a:accent3", ThemeColor::Rgb("A5A5A5")),
    ("a:accent4", ThemeColor::Rgb("FFC000")),
    ("a:accent5", ThemeColor::Rgb("5B9BD5")),
    ("a:accent6", ThemeColor::Rgb("70AD47")),
    ("a:hlink", ThemeColor::Rgb("0563C1")),
    ("a:folHlink", ThemeColor::Rgb("954F72")),
];

#[derive(Debug, Clone, Copy)]
enum ThemeColor {
    System(&'static str, &'static str),
    Rgb(&'static str),
}

/// Build `ppt/theme/theme1.xml`.
pub fn theme_xml(default_font: &str) -> Result<String> {
    let mut w = XmlWriter::new()?;
    w.start("a:theme", &[("xmlns:a", NS_DRAWINGML), ("name", "Office Theme")])?;
    w.start("a:themeElements", &[])?;

    w.start("a:clrScheme", &[("name", "Office")])?;
    for (slot, color) in THEME_COLORS {
        w.start(slot, &[])?;
        match color {
            ThemeColor::System(val, last) => {
                w.empty("a:sysClr", &[("val", val), ("lastClr", last)])?
            },
            ThemeColor::Rgb(val) => w.empty("a:srgbClr", &[("val", val)])?,
        }
        w.end(slot)?;
    }
    w.end("a:clrScheme")?;

    w.start("a:fontScheme", &[("name", "Office")])?;
    for group in ["a:majorFont", "a:minorFont"] {
        w.start(group, &[])?;
        w.empty("a:latin", &[("typeface", default_font)])?;
        w.empty("a:ea", &[("typeface", "")])?;
        w.empty("a:cs", &[("typeface", "")])?;
        w.end(group)?;
    }
    w.end("a:fontScheme")?;

    write_format_scheme(&mut w)?;

    w.end("a:themeElements")?;
    w.empty("a:objectDefaults", &[])?;
    w.empty("a:extraClrSchemeLst", &[])?;
    w.end("a:theme")?;
    w.finish()
}

/// The format scheme needs three entries in each list; plain solid fills
/// and thin lines are enough.
fn write_format_scheme(w: &mut XmlWriter) -> Result<()> {
    w.start("a:fmtScheme", &[("name", "Office")])?;

    w.start("a:fillStyleLst", &[])?;
    for _ in 0..3 {
        write_phclr_fill(w)?;
    }
    w.end("a:fillStyleLst")?;

    w.start("a:lnStyleLst", &[])?;
    for width in ["6350", "12700", "19050"] {
        w.start(
            "a:ln",
            &[("w", width), ("cap", "flat"), ("cmpd", "sng"), ("algn", "ctr")],
        )?;
        write_phclr_fill(w)?;
        w.empty("a:prstDash", &[("val", "solid")])?;
        w.empty("a:miter", &[("lim", "800000")])?;
        w.end("a:ln")?;
    }
    w.end("a:lnStyleLst")?;

    w.start("a:effectStyleLst", &[])?;
    for _ in 0..3 {
        w.start("a:effectStyle", &[])?;
        w.empty("a:effectLst", &[])?;
        w.end("a:effectStyle")?;
    }
    w.end("a:effectStyleLst")?;

    w.start("a:bgFillStyleLst", &[])?;
    for _ in 0..3 {
        write_phclr_fill(w)?;
    }
    w.end("a:bgFillStyleLst")?;

    w.end("a:fmtScheme")
}

fn write_phclr_fill(w: &mut XmlWriter) -> Result<()> {
    w.start("a:solidFill", &[])?;
    w.empty("a:schemeClr", &[("val", "phClr")])?;
    w.end("a:solidFill")
}
