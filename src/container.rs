//! ZIP container abstraction for OOXML packages.
//!
//! The package layer never talks to `zip` directly. Reading goes through an
//! [`EntrySource`], which hands out one [`ArchiveEntry`] per archive member and
//! then a terminal [`ArchiveEvent::Finished`]. Writing goes through an
//! [`ArchiveSink`], which accepts named entries and is sealed by `finalize`.

use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::io::{self, Cursor, Read, Seek, Write};
use zip::write::SimpleFileOptions;

/// A relationship entry from a .rels file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative or absolute)
    pub target: String,
    /// Whether the target is external
    pub external: bool,
}

impl Relationship {
    /// Create an internal relationship.
    pub fn new(id: impl Into<String>, rel_type: &str, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rel_type: rel_type.to_string(),
            target: target.into(),
            external: false,
        }
    }
}

/// Ordered collection of relationships parsed from (or rendered to) a .rels file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relationships {
    items: Vec<Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.items.iter().find(|rel| rel.id == id)
    }

    /// Get relationships by type.
    pub fn get_by_type(&self, rel_type: &str) -> Vec<&Relationship> {
        self.items
            .iter()
            .filter(|rel| rel.rel_type == rel_type)
            .collect()
    }

    /// Add a relationship, rejecting an ID that is already in scope.
    pub fn add(&mut self, rel: Relationship) -> Result<()> {
        if self.get(&rel.id).is_some() {
            return Err(Error::InvalidData(format!(
                "duplicate relationship id {}",
                rel.id
            )));
        }
        self.items.push(rel);
        Ok(())
    }

    /// Iterate relationships in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.items.iter()
    }

    /// Number of relationships.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Parse a relationships part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Relationships::new();
        if xml.trim().is_empty() {
            return Ok(rels);
        }

        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event()? {
                quick_xml::events::Event::Empty(e) | quick_xml::events::Event::Start(e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut rel = Relationship::new("", "", "");
                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = attr.unescape_value()?.into_owned();
                        match attr.key.as_ref() {
                            b"Id" => rel.id = value,
                            b"Type" => rel.rel_type = value,
                            b"Target" => rel.target = value,
                            b"TargetMode" => rel.external = value.eq_ignore_ascii_case("external"),
                            _ => {}
                        }
                    }
                    if !rel.id.is_empty() {
                        rels.add(rel)?;
                    }
                }
                quick_xml::events::Event::Eof => break,
                _ => {}
            }
        }

        Ok(rels)
    }

    /// Render as a relationships part.
    pub fn render(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for rel in &self.items {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                escape(&rel.id),
                escape(&rel.rel_type),
                escape(&rel.target)
            ));
            if rel.external {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// Standard XML declaration emitted at the top of every rendered part.
pub const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

/// Escape text for use in XML content or attribute values.
pub fn escape(text: &str) -> std::borrow::Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Resolve a relationship target against the part that declares it.
///
/// `base` is the declaring part's path inside the package, e.g.
/// `xl/drawings/drawing1.xml`; absolute targets start with `/`.
pub fn resolve_path(base: &str, relative: &str) -> String {
    if let Some(stripped) = relative.strip_prefix('/') {
        return stripped.to_string();
    }

    let mut segments: Vec<&str> = base.split('/').collect();
    segments.pop();
    for segment in relative.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Whether an entry body is expected to be XML text or opaque bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryHint {
    /// XML or relationships text.
    Text,
    /// Binary media or anything else.
    Binary,
}

impl EntryHint {
    /// Derive the hint from an entry path.
    pub fn from_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".xml") || lower.ends_with(".rels") || lower.ends_with(".vml") {
            EntryHint::Text
        } else {
            EntryHint::Binary
        }
    }
}

/// One archive member as delivered by an [`EntrySource`].
///
/// The body must be consumed, either by [`read_body`](Self::read_body) or by
/// [`drain`](Self::drain), before the source can advance.
pub struct ArchiveEntry<'a> {
    /// Path of the entry inside the package.
    pub path: String,
    /// Text/binary hint derived from the path.
    pub hint: EntryHint,
    body: Box<dyn Read + 'a>,
}

impl<'a> ArchiveEntry<'a> {
    /// Create an entry over a readable body.
    pub fn new(path: impl Into<String>, body: impl Read + 'a) -> Self {
        let path = path.into();
        Self {
            hint: EntryHint::from_path(&path),
            path,
            body: Box::new(body),
        }
    }

    /// Buffer the whole body.
    pub fn read_body(mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.body.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Consume and discard the body, returning the number of bytes skipped.
    pub fn drain(mut self) -> Result<u64> {
        Ok(io::copy(&mut self.body, &mut io::sink())?)
    }
}

impl std::fmt::Debug for ArchiveEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("path", &self.path)
            .field("hint", &self.hint)
            .finish()
    }
}

/// Event emitted by an [`EntrySource`].
#[derive(Debug)]
pub enum ArchiveEvent<'a> {
    /// Another entry is available.
    Entry(ArchiveEntry<'a>),
    /// All entries have been seen.
    Finished,
}

/// Source of archive entries for the package reader.
pub trait EntrySource {
    /// Produce the next entry, or `Finished` once the archive is exhausted.
    fn next_event(&mut self) -> Result<ArchiveEvent<'_>>;
}

/// [`EntrySource`] over a ZIP archive.
pub struct ZipEntrySource<R: Read + Seek> {
    archive: zip::ZipArchive<R>,
    next: usize,
}

impl<R: Read + Seek> ZipEntrySource<R> {
    /// Open a ZIP archive from a seekable reader.
    pub fn new(reader: R) -> Result<Self> {
        Ok(Self {
            archive: zip::ZipArchive::new(reader)?,
            next: 0,
        })
    }

    /// Number of members in the archive.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Check if the archive has no members.
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }
}

impl ZipEntrySource<Cursor<Vec<u8>>> {
    /// Open a ZIP archive held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read + Seek> EntrySource for ZipEntrySource<R> {
    fn next_event(&mut self) -> Result<ArchiveEvent<'_>> {
        if self.next >= self.archive.len() {
            return Ok(ArchiveEvent::Finished);
        }
        let index = self.next;
        self.next += 1;
        let file = self.archive.by_index(index)?;
        let path = file.name().to_string();
        Ok(ArchiveEvent::Entry(ArchiveEntry::new(path, file)))
    }
}

/// [`EntrySource`] over in-memory `(path, bytes)` pairs, delivered in the given order.
#[derive(Debug, Default)]
pub struct MemoryEntrySource {
    entries: VecDeque<(String, Vec<u8>)>,
}

impl MemoryEntrySource {
    /// Create a source that yields `entries` in order.
    pub fn new(entries: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl EntrySource for MemoryEntrySource {
    fn next_event(&mut self) -> Result<ArchiveEvent<'_>> {
        Ok(match self.entries.pop_front() {
            Some((path, data)) => ArchiveEvent::Entry(ArchiveEntry::new(path, Cursor::new(data))),
            None => ArchiveEvent::Finished,
        })
    }
}

/// Sink for the package writer.
pub trait ArchiveSink {
    /// Append one named entry.
    fn append(&mut self, name: &str, data: &[u8]) -> Result<()>;

    /// Seal the archive. Returns once the underlying writer has been flushed.
    fn finalize(&mut self) -> Result<()>;
}

/// [`ArchiveSink`] writing a deflated ZIP archive.
///
/// Dropping the sink before [`ArchiveSink::finalize`] still lets the zip
/// writer seal whatever was appended. Write into a buffer when a failed
/// write must not leave a readable partial archive.
pub struct ZipSink<W: Write + Seek> {
    zip: Option<zip::ZipWriter<W>>,
    finished: Option<W>,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> ZipSink<W> {
    /// Create a sink over a seekable writer.
    pub fn new(writer: W) -> Self {
        Self {
            zip: Some(zip::ZipWriter::new(writer)),
            finished: None,
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
        }
    }

    /// The underlying writer, available once the archive has been finalized.
    pub fn into_inner(self) -> Option<W> {
        self.finished
    }
}

impl<W: Write + Seek> ArchiveSink for ZipSink<W> {
    fn append(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let zip = self
            .zip
            .as_mut()
            .ok_or_else(|| Error::InvalidData("archive already finalized".to_string()))?;
        zip.start_file(name, self.options)?;
        zip.write_all(data)?;
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let zip = self
            .zip
            .take()
            .ok_or_else(|| Error::InvalidData("archive already finalized".to_string()))?;
        let mut writer = zip.finish()?;
        writer.flush()?;
        self.finished = Some(writer);
        Ok(())
    }
}

/// [`ArchiveSink`] that keeps entries in memory, in append order.
#[derive(Debug, Default)]
pub struct MemorySink {
    /// Appended `(name, bytes)` pairs
    pub entries: Vec<(String, Vec<u8>)>,
    /// Whether `finalize` has been called
    pub finalized: bool,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the appended entries, in order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Body of an appended entry.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, data)| data.as_slice())
    }
}

impl ArchiveSink for MemorySink {
    fn append(&mut self, name: &str, data: &[u8]) -> Result<()> {
        if self.finalized {
            return Err(Error::InvalidData("archive already finalized".to_string()));
        }
        self.entries.push((name.to_string(), data.to_vec()));
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        self.finalized = true;
        Ok(())
    }
}

/// Decode XML bytes handling different encodings (UTF-8, UTF-16 LE/BE).
///
/// OOXML parts are normally UTF-8, but some producers emit UTF-16 with a BOM.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| Error::InvalidData(e.to_string())),
        [0xFF, 0xFE, rest @ ..] => {
            decode_utf16(rest, u16::from_le_bytes).map(|s| fix_encoding_declaration(&s))
        }
        [0xFE, 0xFF, rest @ ..] => {
            decode_utf16(rest, u16::from_be_bytes).map(|s| fix_encoding_declaration(&s))
        }
        _ => String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::InvalidData(format!("part is not valid UTF-8: {e}"))),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::InvalidData(e.to_string()))
}

/// The text is already UTF-8 after decoding; the declaration must say so too.
fn fix_encoding_declaration(content: &str) -> String {
    match content.find("?>") {
        Some(end) if content.starts_with("<?xml") => {
            let decl = content[..end + 2]
                .replace("\"UTF-16\"", "\"UTF-8\"")
                .replace("'UTF-16'", "'UTF-8'")
                .replace("\"utf-16\"", "\"UTF-8\"")
                .replace("'utf-16'", "'UTF-8'");
            format!("{}{}", decl, &content[end + 2..])
        }
        _ => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            resolve_path("xl/drawings/drawing1.xml", "../media/image1.png"),
            "xl/media/image1.png"
        );
        assert_eq!(
            resolve_path("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            resolve_path("xl/worksheets/sheet1.xml", "../sharedStrings.xml"),
            "xl/sharedStrings.xml"
        );
        assert_eq!(
            resolve_path("xl/workbook.xml", "/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
    }

    #[test]
    fn test_relationships_collection() {
        let mut rels = Relationships::new();
        rels.add(Relationship::new("rId1", "http://test/type1", "target1.xml"))
            .unwrap();
        rels.add(Relationship::new("rId2", "http://test/type1", "target2.xml"))
            .unwrap();

        assert!(rels.get("rId1").is_some());
        assert!(rels.get("rId3").is_none());
        assert_eq!(rels.get_by_type("http://test/type1").len(), 2);

        let dup = rels.add(Relationship::new("rId1", "http://test/type2", "other.xml"));
        assert!(dup.is_err());
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn test_relationships_render_parse() {
        let mut rels = Relationships::new();
        rels.add(Relationship::new("rId1", "http://test/img", "../media/a&b.png"))
            .unwrap();
        let mut external = Relationship::new("rId2", "http://test/link", "https://example.com");
        external.external = true;
        rels.add(external).unwrap();

        let xml = rels.render();
        assert!(xml.contains("a&amp;b.png"));
        assert!(xml.contains(r#"TargetMode="External""#));

        let parsed = Relationships::parse(&xml).unwrap();
        assert_eq!(parsed, rels);
    }

    #[test]
    fn test_empty_relationships_part() {
        assert!(Relationships::parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_entry_hint() {
        assert_eq!(EntryHint::from_path("xl/workbook.xml"), EntryHint::Text);
        assert_eq!(EntryHint::from_path("_rels/.rels"), EntryHint::Text);
        assert_eq!(EntryHint::from_path("xl/media/image1.PNG"), EntryHint::Binary);
    }

    #[test]
    fn test_entry_drain() {
        let entry = ArchiveEntry::new("custom/blob.bin", Cursor::new(vec![7u8; 32]));
        assert_eq!(entry.drain().unwrap(), 32);
    }

    #[test]
    fn test_zip_sink_roundtrip() {
        let mut sink = ZipSink::new(Cursor::new(Vec::new()));
        sink.append("a.xml", b"<a/>").unwrap();
        sink.append("b/c.bin", &[1, 2, 3]).unwrap();
        sink.finalize().unwrap();
        assert!(sink.append("late.xml", b"<x/>").is_err());

        let bytes = sink.into_inner().unwrap().into_inner();
        let mut source = ZipEntrySource::from_bytes(bytes).unwrap();
        assert_eq!(source.len(), 2);

        let mut seen = Vec::new();
        while let ArchiveEvent::Entry(entry) = source.next_event().unwrap() {
            let path = entry.path.clone();
            seen.push((path, entry.read_body().unwrap()));
        }
        assert_eq!(seen[0], ("a.xml".to_string(), b"<a/>".to_vec()));
        assert_eq!(seen[1], ("b/c.bin".to_string(), vec![1, 2, 3]));
    }

    #[test]
    fn test_memory_source_order() {
        let mut source = MemoryEntrySource::new(vec![
            ("b.xml".to_string(), b"<b/>".to_vec()),
            ("a.xml".to_string(), b"<a/>".to_vec()),
        ]);
        let ArchiveEvent::Entry(first) = source.next_event().unwrap() else {
            panic!("expected entry");
        };
        assert_eq!(first.path, "b.xml");
        first.drain().unwrap();
        let ArchiveEvent::Entry(second) = source.next_event().unwrap() else {
            panic!("expected entry");
        };
        second.drain().unwrap();
        assert!(matches!(source.next_event().unwrap(), ArchiveEvent::Finished));
    }

    #[test]
    fn test_utf16_decoding_function() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        let declared = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(declared.encode_utf16().flat_map(|u| u.to_le_bytes()));
        assert_eq!(
            decode_xml_bytes(&bytes).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>"
        );
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let err = decode_xml_bytes(b"<sst><si><t>caf\xE9</t></si></sst>").unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }
}
