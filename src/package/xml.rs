//! Event-based XML writer for package parts.
//!
//! Parts are never assembled by string interpolation. Element names are
//! static, attribute values go through quick-xml's attribute escaping, and
//! text goes through [`XmlWriter::text`], which escapes `&`, `<` and `>` and
//! drops characters XML 1.0 cannot carry.

use crate::error::{Error, Result};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Streaming writer for one XML part.
pub struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a part with the standard `standalone="yes"` declaration.
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { writer })
    }

    /// Open an element.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer.write_event(Event::Start(element(name, attrs)))?;
        Ok(())
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer.write_event(Event::Empty(element(name, attrs)))?;
        Ok(())
    }

    /// Close an element.
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write character data.
    pub fn text(&mut self, text: &str) -> Result<()> {
        let clean = strip_invalid_chars(text);
        let escaped = partial_escape(&clean);
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(escaped)))?;
        Ok(())
    }

    /// Write `<name attrs>text</name>`.
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// Finish the part and return its content.
    pub fn finish(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| Error::Xml(format!("Part is not valid UTF-8: {}", e)))
    }
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(name);
    for &attr in attrs {
        elem.push_attribute(attr);
    }
    elem
}

/// Remove characters outside the XML 1.0 `Char` production.
fn strip_invalid_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| {
            matches!(c, '\u{9}' | '\u{A}' | '\u{D}')
                || ('\u{20}'..='\u{D7FF}').contains(&c)
                || ('\u{E000}'..='\u{FFFD}').contains(&c)
                || c >= '\u{10000}'
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_text() {
        let mut w = XmlWriter::new().unwrap();
        w.text_element("t", &[], "A & B < C > D").unwrap();
        let xml = w.finish().unwrap();
        assert!(xml.contains("<t>A &amp; B &lt; C &gt; D</t>"));
    }

    #[test]
    fn test_quotes_left_alone_in_text() {
        let mut w = XmlWriter::new().unwrap();
        w.text_element("t", &[], "it's \"quoted\"").unwrap();
        let xml = w.finish().unwrap();
        assert!(xml.contains("<t>it's \"quoted\"</t>"));
    }

    #[test]
    fn test_escapes_attributes() {
        let mut w = XmlWriter::new().unwrap();
        w.empty("docPr", &[("name", "a\"b<c")]).unwrap();
        let xml = w.finish().unwrap();
        assert!(xml.contains("name=\"a&quot;b&lt;c\""));
    }

    #[test]
    fn test_declaration() {
        let w = XmlWriter::new().unwrap();
        let xml = w.finish().unwrap();
        assert_eq!(xml, "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>");
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(strip_invalid_chars("a\u{0}b\u{1B}c\td"), "abc\td");
        assert_eq!(strip_invalid_chars("caf\u{E9} \u{1F600}"), "caf\u{E9} \u{1F600}");
    }
}
