//! XLSX shared strings: the parsed table and the write-side accumulator.

use crate::container::{escape, XML_DECLARATION};
use crate::error::Result;
use quick_xml::events::Event;
use std::collections::HashMap;

/// Shared strings table as read from `xl/sharedStrings.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedStrings {
    /// All strings in order
    strings: Vec<String>,
}

impl SharedStrings {
    /// Parse shared strings from XML content.
    ///
    /// Rich-text runs are concatenated; phonetic runs (`<rPh>`) are skipped.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut strings = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut in_si = false;
        let mut in_t = false;
        let mut phonetic_depth = 0usize;
        let mut current_text = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_text.clear();
                    }
                    b"rPh" => phonetic_depth += 1,
                    b"t" if in_si && phonetic_depth == 0 => in_t = true,
                    _ => {}
                },
                Event::Empty(e) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Event::Text(e) if in_t => {
                    current_text.push_str(&e.unescape()?);
                }
                Event::CData(e) if in_t => {
                    current_text.push_str(&String::from_utf8_lossy(&e));
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(std::mem::take(&mut current_text));
                        in_si = false;
                    }
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(Self { strings })
    }

    /// Get a string by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(|s| s.as_str())
    }

    /// Get the count of shared strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

/// Deduplicating pool filled while worksheets are prepared and rendered.
#[derive(Debug, Default)]
pub struct SharedStringsAccumulator {
    strings: Vec<String>,
    index: HashMap<String, usize>,
    references: usize,
}

impl SharedStringsAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one reference to `text` and return its index in the pool.
    pub fn add(&mut self, text: &str) -> usize {
        self.references += 1;
        if let Some(&idx) = self.index.get(text) {
            return idx;
        }
        let idx = self.strings.len();
        self.strings.push(text.to_string());
        self.index.insert(text.to_string(), idx);
        idx
    }

    /// Index of a string recorded earlier.
    pub fn index_of(&self, text: &str) -> Option<usize> {
        self.index.get(text).copied()
    }

    /// Number of distinct strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if no string has been recorded.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Render `xl/sharedStrings.xml`.
    pub fn render(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(&format!(
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            self.references,
            self.strings.len()
        ));
        for text in &self.strings {
            xml.push_str("<si>");
            xml.push_str(&text_element(text));
            xml.push_str("</si>");
        }
        xml.push_str("</sst>");
        xml
    }
}

/// A `<t>` element, preserving significant whitespace.
pub(crate) fn text_element(text: &str) -> String {
    let needs_preserve = text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.contains('\n');
    if needs_preserve {
        format!(r#"<t xml:space="preserve">{}</t>"#, escape(text))
    } else {
        format!("<t>{}</t>", escape(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shared_strings() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="5" uniqueCount="3">
    <si><t>Hello</t></si>
    <si><t>World</t></si>
    <si><t>Test</t></si>
</sst>"#;

        let ss = SharedStrings::parse(xml).unwrap();
        assert_eq!(ss.len(), 3);
        assert_eq!(ss.get(0), Some("Hello"));
        assert_eq!(ss.get(1), Some("World"));
        assert_eq!(ss.get(2), Some("Test"));
        assert_eq!(ss.get(3), None);
    }

    #[test]
    fn test_rich_text() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <si>
        <r><t>Hello</t></r>
        <r><t xml:space="preserve"> World</t></r>
        <rPh sb="0" eb="1"><t>ignored</t></rPh>
    </si>
</sst>"#;

        let ss = SharedStrings::parse(xml).unwrap();
        assert_eq!(ss.len(), 1);
        assert_eq!(ss.get(0), Some("Hello World"));
    }

    #[test]
    fn test_entities_and_empty_items() {
        let xml = r#"<sst><si><t>a &amp; b</t></si><si/><si><t/></si></sst>"#;
        let ss = SharedStrings::parse(xml).unwrap();
        assert_eq!(ss.len(), 3);
        assert_eq!(ss.get(0), Some("a & b"));
        assert_eq!(ss.get(1), Some(""));
        assert_eq!(ss.get(2), Some(""));
    }

    #[test]
    fn test_accumulator_dedupes() {
        let mut acc = SharedStringsAccumulator::new();
        assert!(acc.is_empty());
        assert_eq!(acc.add("alpha"), 0);
        assert_eq!(acc.add("beta"), 1);
        assert_eq!(acc.add("alpha"), 0);
        assert_eq!(acc.len(), 2);
        assert_eq!(acc.index_of("beta"), Some(1));
        assert_eq!(acc.index_of("gamma"), None);

        let xml = acc.render();
        assert!(xml.contains(r#"count="3" uniqueCount="2""#));

        let parsed = SharedStrings::parse(&xml).unwrap();
        assert_eq!(parsed.get(0), Some("alpha"));
        assert_eq!(parsed.get(1), Some("beta"));
    }

    #[test]
    fn test_whitespace_preserved() {
        let mut acc = SharedStringsAccumulator::new();
        acc.add("  padded ");
        acc.add("<tag>");
        let parsed = SharedStrings::parse(&acc.render()).unwrap();
        assert_eq!(parsed.get(0), Some("  padded "));
        assert_eq!(parsed.get(1), Some("<tag>"));
    }
}
