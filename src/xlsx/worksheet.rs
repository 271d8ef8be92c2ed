//! Worksheet parts (`xl/worksheets/sheet{N}.xml`).

use super::parts::PartKind;
use super::raw::MediaIndex;
use super::shared_strings::{text_element, SharedStrings, SharedStringsAccumulator};
use super::styles::{StyleAccumulator, Styles};
use crate::container::{escape, resolve_path, Relationships, XML_DECLARATION};
use crate::error::{Error, Result};
use crate::model::{Cell, CellRef, CellValue, Drawing, Worksheet};
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use tracing::warn;

/// A cell as stored in the part, before indexes are resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCell {
    pub reference: CellRef,
    /// `s` attribute
    pub style: usize,
    /// `t` attribute
    pub kind: Option<String>,
    /// `<v>` text
    pub value: Option<String>,
    /// `<f>` text
    pub formula: Option<String>,
    /// `<is>` text
    pub inline: Option<String>,
}

/// A parsed worksheet part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawWorksheet {
    pub cells: Vec<RawCell>,
    pub merges: Vec<String>,
    /// `r:id` of `<drawing>`
    pub drawing_rel: Option<String>,
    /// `r:id` of `<picture>`
    pub picture_rel: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    Value,
    Formula,
    Inline,
}

/// Lookup tables a worksheet needs to resolve its references.
pub struct LinkTables<'a> {
    pub shared_strings: &'a SharedStrings,
    pub styles: &'a Styles,
    pub media: &'a MediaIndex,
    /// Reconciled drawings keyed by drawing name
    pub drawings: &'a HashMap<String, Drawing>,
}

impl RawWorksheet {
    /// Parse worksheet XML.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut sheet = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut row = 0u32;
        let mut next_col = 1u32;
        let mut cell: Option<RawCell> = None;
        let mut target: Option<TextTarget> = None;
        let mut phonetic_depth = 0usize;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"row" => {
                        row = row_number(&e, row)?;
                        next_col = 1;
                    }
                    b"c" => {
                        let raw = parse_cell_attrs(&e, row, next_col)?;
                        next_col = raw.reference.col + 1;
                        cell = Some(raw);
                    }
                    b"v" => {
                        if let Some(cell) = cell.as_mut() {
                            cell.value.get_or_insert_with(String::new);
                            target = Some(TextTarget::Value);
                        }
                    }
                    b"f" => {
                        if let Some(cell) = cell.as_mut() {
                            cell.formula = Some(String::new());
                            target = Some(TextTarget::Formula);
                        }
                    }
                    b"is" => {
                        if let Some(cell) = cell.as_mut() {
                            cell.inline = Some(String::new());
                        }
                    }
                    b"rPh" => phonetic_depth += 1,
                    b"t" if phonetic_depth == 0 && cell.as_ref().is_some_and(|c| c.inline.is_some()) => {
                        target = Some(TextTarget::Inline)
                    }
                    b"mergeCell" => push_merge(&mut sheet, &e)?,
                    b"drawing" => sheet.drawing_rel = rel_id(&e)?,
                    b"picture" => sheet.picture_rel = rel_id(&e)?,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"row" => {
                        row = row_number(&e, row)?;
                        next_col = 1;
                    }
                    b"c" => {
                        let raw = parse_cell_attrs(&e, row, next_col)?;
                        next_col = raw.reference.col + 1;
                        sheet.cells.push(raw);
                    }
                    b"is" => {
                        if let Some(cell) = cell.as_mut() {
                            cell.inline = Some(String::new());
                        }
                    }
                    b"v" => {
                        if let Some(cell) = cell.as_mut() {
                            cell.value.get_or_insert_with(String::new);
                        }
                    }
                    b"mergeCell" => push_merge(&mut sheet, &e)?,
                    b"drawing" => sheet.drawing_rel = rel_id(&e)?,
                    b"picture" => sheet.picture_rel = rel_id(&e)?,
                    _ => {}
                },
                Event::Text(e) => {
                    if let (Some(cell), Some(target)) = (cell.as_mut(), target) {
                        let text = e.unescape()?;
                        push_text(cell, target, &text);
                    }
                }
                Event::CData(e) => {
                    if let (Some(cell), Some(target)) = (cell.as_mut(), target) {
                        push_text(cell, target, &String::from_utf8_lossy(&e));
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"c" => {
                        if let Some(cell) = cell.take() {
                            sheet.cells.push(cell);
                        }
                        target = None;
                    }
                    b"v" | b"f" | b"t" => target = None,
                    b"rPh" => phonetic_depth = phonetic_depth.saturating_sub(1),
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(sheet)
    }

    /// Resolve every index and relationship id into `sheet`.
    ///
    /// `part_path` is where this part was read from; `rels` is its own
    /// relationship list. Dangling references are logged and dropped.
    pub fn reconcile(
        self,
        sheet: &mut Worksheet,
        part_path: &str,
        rels: &Relationships,
        tables: &LinkTables<'_>,
    ) {
        for raw in self.cells {
            let value = resolve_value(&raw, tables.shared_strings, &sheet.name);
            let style = tables.styles.resolve(raw.style);
            if raw.style != 0 && raw.style >= tables.styles.len() {
                warn!(
                    "{}!{}: style index {} out of range",
                    sheet.name, raw.reference, raw.style
                );
            }
            sheet.cells.insert(raw.reference, Cell { value, style });
        }
        sheet.merges = self.merges;

        if let Some(id) = self.drawing_rel {
            let drawing = rels
                .get(&id)
                .map(|rel| resolve_path(part_path, &rel.target))
                .and_then(|path| match PartKind::classify(&path) {
                    PartKind::Drawing(name) => tables.drawings.get(&name).cloned(),
                    _ => None,
                });
            if drawing.is_none() {
                warn!("{}: drawing {} does not resolve", sheet.name, id);
            }
            sheet.drawing = drawing;
        }

        if let Some(id) = self.picture_rel {
            let medium = rels
                .get(&id)
                .and_then(|rel| tables.media.get_by_path(&resolve_path(part_path, &rel.target)));
            if medium.is_none() {
                warn!("{}: background picture {} does not resolve", sheet.name, id);
            }
            sheet.background = medium.cloned();
        }
    }
}

fn row_number(e: &BytesStart<'_>, previous: u32) -> Result<u32> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"r" {
            if let Ok(r) = attr.unescape_value()?.parse() {
                return Ok(r);
            }
        }
    }
    Ok(previous + 1)
}

fn parse_cell_attrs(e: &BytesStart<'_>, row: u32, next_col: u32) -> Result<RawCell> {
    let mut cell = RawCell {
        reference: CellRef::new(row.max(1), next_col),
        ..Default::default()
    };
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"r" => cell.reference = value.parse()?,
            b"s" => cell.style = value.parse().unwrap_or(0),
            b"t" => cell.kind = Some(value.into_owned()),
            _ => {}
        }
    }
    Ok(cell)
}

fn push_merge(sheet: &mut RawWorksheet, e: &BytesStart<'_>) -> Result<()> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"ref" {
            sheet.merges.push(attr.unescape_value()?.into_owned());
        }
    }
    Ok(())
}

fn rel_id(e: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == b"id" {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn push_text(cell: &mut RawCell, target: TextTarget, text: &str) {
    let slot = match target {
        TextTarget::Value => cell.value.get_or_insert_with(String::new),
        TextTarget::Formula => cell.formula.get_or_insert_with(String::new),
        TextTarget::Inline => cell.inline.get_or_insert_with(String::new),
    };
    slot.push_str(text);
}

fn shared_string(strings: &SharedStrings, raw: &RawCell, sheet_name: &str) -> String {
    let index = raw.value.as_deref().and_then(|v| v.trim().parse::<usize>().ok());
    match index.and_then(|idx| strings.get(idx)) {
        Some(text) => text.to_string(),
        None => {
            warn!(
                "{}!{}: shared string {:?} out of range",
                sheet_name, raw.reference, raw.value
            );
            String::new()
        }
    }
}

fn resolve_value(raw: &RawCell, strings: &SharedStrings, sheet_name: &str) -> CellValue {
    if let Some(formula) = raw.formula.as_ref().filter(|f| !f.is_empty()) {
        let result = match raw.kind.as_deref() {
            Some("s") => Some(shared_string(strings, raw, sheet_name)),
            _ => raw.value.clone(),
        };
        return CellValue::Formula {
            formula: formula.clone(),
            result,
        };
    }

    match raw.kind.as_deref() {
        Some("s") => CellValue::Text(shared_string(strings, raw, sheet_name)),
        Some("inlineStr") => CellValue::Text(raw.inline.clone().unwrap_or_default()),
        Some("str") => CellValue::Text(raw.value.clone().unwrap_or_default()),
        Some("b") => CellValue::Bool(raw.value.as_deref().map(str::trim) == Some("1")),
        Some("e") => CellValue::Error(raw.value.clone().unwrap_or_default()),
        _ => match raw.value.as_deref().filter(|v| !v.trim().is_empty()) {
            None => CellValue::Empty,
            Some(v) => match v.trim().parse() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::Text(v.to_string()),
            },
        },
    }
}

/// Feed a worksheet's strings and styles into the write accumulators.
pub fn prepare(
    sheet: &Worksheet,
    strings: &mut SharedStringsAccumulator,
    styles: &mut StyleAccumulator,
    use_shared_strings: bool,
) {
    for cell in sheet.cells.values() {
        styles.add(cell.style.as_ref());
        if let (CellValue::Text(text), true) = (&cell.value, use_shared_strings) {
            strings.add(text);
        }
    }
}

/// Everything a worksheet render reads besides the worksheet itself.
pub struct RenderContext<'a> {
    pub strings: &'a SharedStringsAccumulator,
    pub styles: &'a StyleAccumulator,
    pub use_shared_strings: bool,
    /// Relationship id allocated for the sheet's drawing
    pub drawing_rel: Option<&'a str>,
    /// Relationship id allocated for the background picture
    pub background_rel: Option<&'a str>,
}

/// Render worksheet XML. Strings and styles must have been fed through [`prepare`].
pub fn render(sheet: &Worksheet, ctx: &RenderContext<'_>) -> Result<String> {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
        r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
    ));

    if let (Some(first), Some(last)) = (sheet.cells.keys().next(), sheet.cells.keys().next_back()) {
        let min_col = sheet.cells.keys().map(|r| r.col).min().unwrap_or(first.col);
        let max_col = sheet.cells.keys().map(|r| r.col).max().unwrap_or(last.col);
        let top_left = CellRef::new(first.row, min_col);
        let bottom_right = CellRef::new(last.row, max_col);
        if top_left == bottom_right {
            xml.push_str(&format!(r#"<dimension ref="{top_left}"/>"#));
        } else {
            xml.push_str(&format!(r#"<dimension ref="{top_left}:{bottom_right}"/>"#));
        }
    }

    xml.push_str("<sheetData>");
    let mut open_row: Option<u32> = None;
    for (reference, cell) in &sheet.cells {
        if open_row != Some(reference.row) {
            if open_row.is_some() {
                xml.push_str("</row>");
            }
            xml.push_str(&format!(r#"<row r="{}">"#, reference.row));
            open_row = Some(reference.row);
        }
        render_cell(&mut xml, sheet, *reference, cell, ctx)?;
    }
    if open_row.is_some() {
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    if !sheet.merges.is_empty() {
        xml.push_str(&format!(r#"<mergeCells count="{}">"#, sheet.merges.len()));
        for range in &sheet.merges {
            xml.push_str(&format!(r#"<mergeCell ref="{}"/>"#, escape(range)));
        }
        xml.push_str("</mergeCells>");
    }

    xml.push_str(r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#);

    if let Some(id) = ctx.drawing_rel {
        xml.push_str(&format!(r#"<drawing r:id="{}"/>"#, escape(id)));
    }
    if let Some(id) = ctx.background_rel {
        xml.push_str(&format!(r#"<picture r:id="{}"/>"#, escape(id)));
    }

    xml.push_str("</worksheet>");
    Ok(xml)
}

fn render_cell(
    xml: &mut String,
    sheet: &Worksheet,
    reference: CellRef,
    cell: &Cell,
    ctx: &RenderContext<'_>,
) -> Result<()> {
    let style = ctx.styles.index_of(cell.style.as_ref()).ok_or_else(|| {
        Error::InvalidData(format!("{}!{}: style was not prepared", sheet.name, reference))
    })?;

    xml.push_str(&format!(r#"<c r="{reference}""#));
    if style != 0 {
        xml.push_str(&format!(r#" s="{style}""#));
    }

    match &cell.value {
        CellValue::Empty => xml.push_str("/>"),
        CellValue::Number(n) => xml.push_str(&format!("><v>{n}</v></c>")),
        CellValue::Text(text) if ctx.use_shared_strings => {
            let idx = ctx.strings.index_of(text).ok_or_else(|| {
                Error::InvalidData(format!(
                    "{}!{}: string was not prepared",
                    sheet.name, reference
                ))
            })?;
            xml.push_str(&format!(r#" t="s"><v>{idx}</v></c>"#));
        }
        CellValue::Text(text) => {
            xml.push_str(&format!(r#" t="inlineStr"><is>{}</is></c>"#, text_element(text)));
        }
        CellValue::Bool(b) => {
            xml.push_str(&format!(r#" t="b"><v>{}</v></c>"#, u8::from(*b)));
        }
        CellValue::Error(code) => {
            xml.push_str(&format!(r#" t="e"><v>{}</v></c>"#, escape(code)));
        }
        CellValue::Formula { formula, result } => {
            let numeric = result.as_deref().is_some_and(|r| r.parse::<f64>().is_ok());
            if result.is_some() && !numeric {
                xml.push_str(r#" t="str""#);
            }
            xml.push_str(&format!("><f>{}</f>", escape(formula)));
            if let Some(result) = result {
                xml.push_str(&format!("<v>{}</v>", escape(result)));
            }
            xml.push_str("</c>");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::Relationship;
    use crate::model::{CellStyle, Medium, NumberFormat};
    use crate::xlsx::rels::{REL_DRAWING, REL_IMAGE};
    use std::sync::Arc;

    const SHEET_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <dimension ref="A1:D3"/>
  <sheetData>
    <row r="1">
      <c r="A1" t="s"><v>0</v></c>
      <c r="B1" s="1"><v>42.5</v></c>
      <c r="C1" t="b"><v>1</v></c>
      <c r="D1" t="e"><v>#DIV/0!</v></c>
    </row>
    <row r="2">
      <c r="A2"><f>SUM(B1:B1)</f><v>42.5</v></c>
      <c r="B2" t="str"><f>A1&amp;"!"</f><v>Hello!</v></c>
      <c r="C2" t="inlineStr"><is><r><t xml:space="preserve">in </t></r><r><t>line</t></r></is></c>
      <c r="D2" s="1"/>
    </row>
    <row>
      <c t="s"><v>9</v></c>
      <c><v>7</v></c>
    </row>
  </sheetData>
  <mergeCells count="1"><mergeCell ref="A3:B3"/></mergeCells>
  <drawing r:id="rId1"/>
  <picture r:id="rId2"/>
</worksheet>"#;

    const STYLES_XML: &str = r#"<styleSheet><cellXfs count="2"><xf numFmtId="0"/><xf numFmtId="10"/></cellXfs></styleSheet>"#;

    #[test]
    fn test_parse_cells() {
        let raw = RawWorksheet::parse(SHEET_XML).unwrap();
        assert_eq!(raw.cells.len(), 10);
        assert_eq!(raw.cells[6].inline.as_deref(), Some("in line"));
        assert_eq!(raw.cells[8].reference, CellRef::new(3, 1));
        assert_eq!(raw.cells[9].reference, CellRef::new(3, 2));
        assert_eq!(raw.merges, ["A3:B3"]);
        assert_eq!(raw.drawing_rel.as_deref(), Some("rId1"));
        assert_eq!(raw.picture_rel.as_deref(), Some("rId2"));
    }

    #[test]
    fn test_reconcile_cells() {
        let raw = RawWorksheet::parse(SHEET_XML).unwrap();
        let strings = SharedStrings::parse("<sst><si><t>Hello</t></si></sst>").unwrap();
        let styles = Styles::parse(STYLES_XML).unwrap();

        let mut rels = Relationships::new();
        rels.add(Relationship::new("rId1", REL_DRAWING, "../drawings/drawing1.xml"))
            .unwrap();
        rels.add(Relationship::new("rId2", REL_IMAGE, "../media/image1.png"))
            .unwrap();

        let mut media = MediaIndex::new();
        media.insert(Medium::from_buffer("image1", "png", vec![]));
        let drawings = HashMap::from([("drawing1".to_string(), Drawing::default())]);

        let tables = LinkTables {
            shared_strings: &strings,
            styles: &styles,
            media: &media,
            drawings: &drawings,
        };
        let mut sheet = Worksheet::new(1, "Data");
        raw.reconcile(&mut sheet, "xl/worksheets/sheet1.xml", &rels, &tables);

        assert_eq!(sheet.cell_a1("A1").unwrap().value, CellValue::Text("Hello".into()));
        let b1 = sheet.cell_a1("B1").unwrap();
        assert_eq!(b1.value, CellValue::Number(42.5));
        assert_eq!(
            b1.style,
            Some(CellStyle::number_format(NumberFormat::Builtin(10)))
        );
        assert_eq!(sheet.cell_a1("C1").unwrap().value, CellValue::Bool(true));
        assert_eq!(sheet.cell_a1("D1").unwrap().value, CellValue::Error("#DIV/0!".into()));
        assert_eq!(
            sheet.cell_a1("B2").unwrap().value,
            CellValue::Formula {
                formula: "A1&\"!\"".into(),
                result: Some("Hello!".into())
            }
        );
        assert_eq!(sheet.cell_a1("C2").unwrap().value, CellValue::Text("in line".into()));
        assert_eq!(sheet.cell_a1("D2").unwrap().value, CellValue::Empty);
        // out-of-range shared string
        assert_eq!(sheet.cell_a1("A3").unwrap().value, CellValue::Text(String::new()));
        assert!(sheet.drawing.is_some());
        assert!(Arc::ptr_eq(
            sheet.background.as_ref().unwrap(),
            media.get("image1").unwrap()
        ));
    }

    #[test]
    fn test_dangling_relationships_dropped() {
        let raw = RawWorksheet::parse(SHEET_XML).unwrap();
        let strings = SharedStrings::default();
        let styles = Styles::default();
        let media = MediaIndex::new();
        let drawings = HashMap::new();
        let tables = LinkTables {
            shared_strings: &strings,
            styles: &styles,
            media: &media,
            drawings: &drawings,
        };
        let mut sheet = Worksheet::new(1, "Data");
        raw.reconcile(&mut sheet, "xl/worksheets/sheet1.xml", &Relationships::new(), &tables);
        assert!(sheet.drawing.is_none());
        assert!(sheet.background.is_none());
        assert_eq!(sheet.cells.len(), 10);
    }

    fn sample_sheet() -> Worksheet {
        let mut sheet = Worksheet::new(1, "Sample");
        sheet.set_value("A1".parse().unwrap(), " padded ");
        sheet.set_value("B1".parse().unwrap(), 3.25);
        let percent = CellStyle::number_format(NumberFormat::Custom("0.0%".into()));
        sheet.set_value("C1".parse().unwrap(), false).style = Some(percent);
        sheet.set_value("A2".parse().unwrap(), CellValue::Error("#N/A".into()));
        sheet.set_value(
            "B2".parse().unwrap(),
            CellValue::Formula {
                formula: "B1*2".into(),
                result: Some("6.5".into()),
            },
        );
        sheet.set_value("C2".parse().unwrap(), CellValue::Empty);
        sheet.merges.push("A3:C3".into());
        sheet
    }

    fn render_and_parse(sheet: &Worksheet, use_shared_strings: bool) -> (String, Worksheet) {
        let mut strings = SharedStringsAccumulator::new();
        let mut styles = StyleAccumulator::new(true);
        prepare(sheet, &mut strings, &mut styles, use_shared_strings);

        let ctx = RenderContext {
            strings: &strings,
            styles: &styles,
            use_shared_strings,
            drawing_rel: None,
            background_rel: None,
        };
        let xml = render(sheet, &ctx).unwrap();

        let table = SharedStrings::parse(&strings.render()).unwrap();
        let parsed_styles = Styles::parse(&styles.render()).unwrap();
        let media = MediaIndex::new();
        let drawings = HashMap::new();
        let tables = LinkTables {
            shared_strings: &table,
            styles: &parsed_styles,
            media: &media,
            drawings: &drawings,
        };
        let mut back = Worksheet::new(sheet.id, sheet.name.clone());
        RawWorksheet::parse(&xml).unwrap().reconcile(
            &mut back,
            "xl/worksheets/sheet1.xml",
            &Relationships::new(),
            &tables,
        );
        (xml, back)
    }

    #[test]
    fn test_render_roundtrip_shared() {
        let sheet = sample_sheet();
        let (xml, back) = render_and_parse(&sheet, true);
        assert!(xml.contains(r#"<c r="A1" t="s"><v>0</v></c>"#));
        assert!(xml.contains(r#"<dimension ref="A1:C2"/>"#));
        assert_eq!(back, sheet);
    }

    #[test]
    fn test_render_roundtrip_inline() {
        let sheet = sample_sheet();
        let (xml, back) = render_and_parse(&sheet, false);
        assert!(xml.contains(r#"t="inlineStr"><is><t xml:space="preserve"> padded </t></is>"#));
        assert!(!xml.contains(r#"t="s""#));
        assert_eq!(back, sheet);
    }

    #[test]
    fn test_empty_formula_result_kept() {
        let mut sheet = Worksheet::new(1, "Blank");
        sheet.set_value(
            "A1".parse().unwrap(),
            CellValue::Formula {
                formula: "IF(B1,\"x\",\"\")".into(),
                result: Some(String::new()),
            },
        );
        sheet.set_value(
            "A2".parse().unwrap(),
            CellValue::Formula {
                formula: "NOW()".into(),
                result: None,
            },
        );
        let (xml, back) = render_and_parse(&sheet, true);
        assert!(xml.contains("<v></v>"));
        assert_eq!(back, sheet);

        let raw = RawWorksheet::parse(r#"<worksheet><sheetData><row r="1"><c r="A1"><v/></c></row></sheetData></worksheet>"#).unwrap();
        assert_eq!(raw.cells[0].value.as_deref(), Some(""));
    }

    #[test]
    fn test_render_rejects_unprepared_string() {
        let sheet = sample_sheet();
        let strings = SharedStringsAccumulator::new();
        let styles = StyleAccumulator::new(false);
        let ctx = RenderContext {
            strings: &strings,
            styles: &styles,
            use_shared_strings: true,
            drawing_rel: Some("rId1"),
            background_rel: None,
        };
        assert!(matches!(render(&sheet, &ctx), Err(Error::InvalidData(_))));
    }
}
