//! XLSX styles: the parsed table, index resolution, and the write-side accumulator.

use crate::container::{escape, XML_DECLARATION};
use crate::error::Result;
use crate::model::{Alignment, CellStyle, NumberFormat, XmlFragment};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use std::collections::HashMap;

const DEFAULT_FONT: &str = r#"<font><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#;
const DEFAULT_FILLS: [&str; 2] = [
    r#"<fill><patternFill patternType="none"/></fill>"#,
    r#"<fill><patternFill patternType="gray125"/></fill>"#,
];
const DEFAULT_BORDER: &str = "<border><left/><right/><top/><bottom/><diagonal/></border>";

/// First id available for custom number formats.
const FIRST_CUSTOM_NUM_FMT: u32 = 164;

/// One `<xf>` record from `<cellXfs>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
struct Xf {
    num_fmt_id: u32,
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    alignment: Option<Alignment>,
}

/// Styles information parsed from xl/styles.xml.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Styles {
    /// Custom number formats: numFmtId -> formatCode
    num_fmts: HashMap<u32, String>,
    fonts: Vec<XmlFragment>,
    fills: Vec<XmlFragment>,
    borders: Vec<XmlFragment>,
    /// Cell formats, indexed by a cell's `s` attribute
    cell_xfs: Vec<Xf>,
}

impl Styles {
    /// Parse styles from xl/styles.xml content.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut styles = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut section: Option<Vec<u8>> = None;
        let mut current_xf: Option<Xf> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.local_name().as_ref().to_vec();
                    match (section.as_deref(), name.as_slice()) {
                        (Some(b"fonts"), b"font")
                        | (Some(b"fills"), b"fill")
                        | (Some(b"borders"), b"border") => {
                            let qname = e.name().as_ref().to_vec();
                            let inner = reader.read_text(QName(&qname))?;
                            let fragment = XmlFragment::new(format!(
                                "<{}>{}</{}>",
                                String::from_utf8_lossy(&e),
                                inner,
                                String::from_utf8_lossy(&qname)
                            ));
                            styles.push_fragment(&name, fragment);
                        }
                        (Some(b"cellXfs"), b"xf") => current_xf = Some(parse_xf(&e)?),
                        (None, b"numFmts" | b"fonts" | b"fills" | b"borders" | b"cellXfs") => {
                            section = Some(name)
                        }
                        _ => {}
                    }
                }
                Event::Empty(e) => {
                    let name = e.local_name().as_ref().to_vec();
                    match (section.as_deref(), name.as_slice()) {
                        (Some(b"numFmts"), b"numFmt") => {
                            let mut id = None;
                            let mut code = String::new();
                            for attr in e.attributes() {
                                let attr = attr?;
                                match attr.key.local_name().as_ref() {
                                    b"numFmtId" => id = attr.unescape_value()?.parse().ok(),
                                    b"formatCode" => code = attr.unescape_value()?.into_owned(),
                                    _ => {}
                                }
                            }
                            if let Some(id) = id {
                                styles.num_fmts.insert(id, code);
                            }
                        }
                        (Some(b"fonts"), b"font")
                        | (Some(b"fills"), b"fill")
                        | (Some(b"borders"), b"border") => {
                            let fragment =
                                XmlFragment::new(format!("<{}/>", String::from_utf8_lossy(&e)));
                            styles.push_fragment(&name, fragment);
                        }
                        (Some(b"cellXfs"), b"xf") => styles.cell_xfs.push(parse_xf(&e)?),
                        (Some(b"cellXfs"), b"alignment") => {
                            if let Some(xf) = current_xf.as_mut() {
                                xf.alignment = Some(parse_alignment(&e)?);
                            }
                        }
                        _ => {}
                    }
                }
                Event::End(e) => {
                    let name = e.local_name();
                    if name.as_ref() == b"xf" {
                        if let Some(xf) = current_xf.take() {
                            styles.cell_xfs.push(xf);
                        }
                    } else if section.as_deref() == Some(name.as_ref()) {
                        section = None;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(styles)
    }

    fn push_fragment(&mut self, element: &[u8], fragment: XmlFragment) {
        match element {
            b"font" => self.fonts.push(fragment),
            b"fill" => self.fills.push(fragment),
            _ => self.borders.push(fragment),
        }
    }

    /// Number of cell formats.
    pub fn len(&self) -> usize {
        self.cell_xfs.len()
    }

    /// Check if the table holds no cell formats.
    pub fn is_empty(&self) -> bool {
        self.cell_xfs.is_empty()
    }

    /// Get the numFmtId for a cell style index.
    pub fn get_num_fmt_id(&self, style_index: usize) -> Option<u32> {
        self.cell_xfs.get(style_index).map(|xf| xf.num_fmt_id)
    }

    /// Resolve a cell's style index into its content.
    ///
    /// Index 0 and anything equal to the default format resolve to `None`.
    pub fn resolve(&self, style_index: usize) -> Option<CellStyle> {
        if style_index == 0 {
            return None;
        }
        let xf = self.cell_xfs.get(style_index)?;
        let number_format = match xf.num_fmt_id {
            0 => None,
            id => Some(match self.num_fmts.get(&id) {
                Some(code) => NumberFormat::Custom(code.clone()),
                None => NumberFormat::Builtin(id),
            }),
        };
        let style = CellStyle {
            number_format,
            font: (xf.font_id > 0)
                .then(|| self.fonts.get(xf.font_id).cloned())
                .flatten(),
            fill: (xf.fill_id > 1)
                .then(|| self.fills.get(xf.fill_id).cloned())
                .flatten(),
            border: (xf.border_id > 0)
                .then(|| self.borders.get(xf.border_id).cloned())
                .flatten(),
            alignment: xf.alignment.clone().filter(|a| !a.is_default()),
        };
        (!style.is_default()).then_some(style)
    }
}

fn parse_xf(e: &BytesStart<'_>) -> Result<Xf> {
    let mut xf = Xf::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.local_name().as_ref() {
            b"numFmtId" => xf.num_fmt_id = value.parse().unwrap_or(0),
            b"fontId" => xf.font_id = value.parse().unwrap_or(0),
            b"fillId" => xf.fill_id = value.parse().unwrap_or(0),
            b"borderId" => xf.border_id = value.parse().unwrap_or(0),
            _ => {}
        }
    }
    Ok(xf)
}

fn parse_alignment(e: &BytesStart<'_>) -> Result<Alignment> {
    let mut alignment = Alignment::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.local_name().as_ref() {
            b"horizontal" => alignment.horizontal = Some(value.into_owned()),
            b"vertical" => alignment.vertical = Some(value.into_owned()),
            b"wrapText" => alignment.wrap_text = value == "1" || value == "true",
            b"indent" => alignment.indent = value.parse().ok(),
            _ => {}
        }
    }
    Ok(alignment)
}

/// Deduplicating registry behind the tracking accumulator.
#[derive(Debug)]
pub struct StyleRegistry {
    num_fmts: Vec<(u32, String)>,
    fonts: Vec<XmlFragment>,
    fills: Vec<XmlFragment>,
    borders: Vec<XmlFragment>,
    xfs: Vec<Xf>,
    xf_index: HashMap<Xf, usize>,
}

impl Default for StyleRegistry {
    fn default() -> Self {
        let default_xf = Xf::default();
        Self {
            num_fmts: Vec::new(),
            fonts: vec![XmlFragment::new(DEFAULT_FONT)],
            fills: DEFAULT_FILLS.iter().map(|f| XmlFragment::new(*f)).collect(),
            borders: vec![XmlFragment::new(DEFAULT_BORDER)],
            xfs: vec![default_xf.clone()],
            xf_index: HashMap::from([(default_xf, 0)]),
        }
    }
}

impl StyleRegistry {
    fn add(&mut self, style: &CellStyle) -> usize {
        if style.is_default() {
            return 0;
        }
        let xf = Xf {
            num_fmt_id: match &style.number_format {
                None => 0,
                Some(NumberFormat::Builtin(id)) => *id,
                Some(NumberFormat::Custom(code)) => self.num_fmt_id(code),
            },
            font_id: style
                .font
                .as_ref()
                .map_or(0, |f| intern(&mut self.fonts, f)),
            fill_id: style
                .fill
                .as_ref()
                .map_or(0, |f| intern(&mut self.fills, f)),
            border_id: style
                .border
                .as_ref()
                .map_or(0, |b| intern(&mut self.borders, b)),
            alignment: style.alignment.clone().filter(|a| !a.is_default()),
        };
        if let Some(&idx) = self.xf_index.get(&xf) {
            return idx;
        }
        let idx = self.xfs.len();
        self.xfs.push(xf.clone());
        self.xf_index.insert(xf, idx);
        idx
    }

    /// Index of a style added earlier, without registering anything new.
    fn lookup(&self, style: &CellStyle) -> Option<usize> {
        if style.is_default() {
            return Some(0);
        }
        let xf = Xf {
            num_fmt_id: match &style.number_format {
                None => 0,
                Some(NumberFormat::Builtin(id)) => *id,
                Some(NumberFormat::Custom(code)) => self
                    .num_fmts
                    .iter()
                    .find(|(_, c)| c == code)
                    .map(|(id, _)| *id)?,
            },
            font_id: match &style.font {
                None => 0,
                Some(font) => self.fonts.iter().position(|f| f == font)?,
            },
            fill_id: match &style.fill {
                None => 0,
                Some(fill) => self.fills.iter().position(|f| f == fill)?,
            },
            border_id: match &style.border {
                None => 0,
                Some(border) => self.borders.iter().position(|b| b == border)?,
            },
            alignment: style.alignment.clone().filter(|a| !a.is_default()),
        };
        self.xf_index.get(&xf).copied()
    }

    fn num_fmt_id(&mut self, code: &str) -> u32 {
        if let Some((id, _)) = self.num_fmts.iter().find(|(_, c)| c == code) {
            return *id;
        }
        let id = FIRST_CUSTOM_NUM_FMT + self.num_fmts.len() as u32;
        self.num_fmts.push((id, code.to_string()));
        id
    }

    fn render(&self) -> String {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );
        if !self.num_fmts.is_empty() {
            xml.push_str(&format!(r#"<numFmts count="{}">"#, self.num_fmts.len()));
            for (id, code) in &self.num_fmts {
                xml.push_str(&format!(
                    r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
                    id,
                    escape(code)
                ));
            }
            xml.push_str("</numFmts>");
        }
        push_fragments(&mut xml, "fonts", &self.fonts);
        push_fragments(&mut xml, "fills", &self.fills);
        push_fragments(&mut xml, "borders", &self.borders);
        xml.push_str(
            r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
        );
        xml.push_str(&format!(r#"<cellXfs count="{}">"#, self.xfs.len()));
        for xf in &self.xfs {
            xml.push_str(&format!(
                r#"<xf numFmtId="{}" fontId="{}" fillId="{}" borderId="{}" xfId="0""#,
                xf.num_fmt_id, xf.font_id, xf.fill_id, xf.border_id
            ));
            if xf.num_fmt_id > 0 {
                xml.push_str(r#" applyNumberFormat="1""#);
            }
            if xf.font_id > 0 {
                xml.push_str(r#" applyFont="1""#);
            }
            if xf.fill_id > 0 {
                xml.push_str(r#" applyFill="1""#);
            }
            if xf.border_id > 0 {
                xml.push_str(r#" applyBorder="1""#);
            }
            match &xf.alignment {
                Some(alignment) => {
                    xml.push_str(r#" applyAlignment="1">"#);
                    xml.push_str(&render_alignment(alignment));
                    xml.push_str("</xf>");
                }
                None => xml.push_str("/>"),
            }
        }
        xml.push_str("</cellXfs>");
        xml.push_str(
            r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#,
        );
        xml.push_str(r#"<dxfs count="0"/><tableStyles count="0"/></styleSheet>"#);
        xml
    }
}

fn intern(pool: &mut Vec<XmlFragment>, fragment: &XmlFragment) -> usize {
    match pool.iter().position(|f| f == fragment) {
        Some(idx) => idx,
        None => {
            pool.push(fragment.clone());
            pool.len() - 1
        }
    }
}

fn push_fragments(xml: &mut String, element: &str, fragments: &[XmlFragment]) {
    xml.push_str(&format!(r#"<{} count="{}">"#, element, fragments.len()));
    for fragment in fragments {
        xml.push_str(fragment.as_str());
    }
    xml.push_str(&format!("</{element}>"));
}

fn render_alignment(alignment: &Alignment) -> String {
    let mut xml = String::from("<alignment");
    if let Some(h) = &alignment.horizontal {
        xml.push_str(&format!(r#" horizontal="{}""#, escape(h)));
    }
    if let Some(v) = &alignment.vertical {
        xml.push_str(&format!(r#" vertical="{}""#, escape(v)));
    }
    if alignment.wrap_text {
        xml.push_str(r#" wrapText="1""#);
    }
    if let Some(indent) = alignment.indent {
        xml.push_str(&format!(r#" indent="{indent}""#));
    }
    xml.push_str("/>");
    xml
}

/// Style accumulator selected once per write.
///
/// `Tracking` interns every style it is fed and renders them; `NoOp` maps
/// everything to the default format and renders a minimal stylesheet.
#[derive(Debug)]
pub enum StyleAccumulator {
    NoOp,
    Tracking(StyleRegistry),
}

impl StyleAccumulator {
    /// Choose the variant for the `use_styles` write option.
    pub fn new(use_styles: bool) -> Self {
        if use_styles {
            StyleAccumulator::Tracking(StyleRegistry::default())
        } else {
            StyleAccumulator::NoOp
        }
    }

    /// Record a style and return its `s` index (0 is the default format).
    pub fn add(&mut self, style: Option<&CellStyle>) -> usize {
        match (self, style) {
            (StyleAccumulator::Tracking(registry), Some(style)) => registry.add(style),
            _ => 0,
        }
    }

    /// Index of a style recorded earlier; `None` if it was never added.
    pub fn index_of(&self, style: Option<&CellStyle>) -> Option<usize> {
        match (self, style) {
            (StyleAccumulator::Tracking(registry), Some(style)) => registry.lookup(style),
            _ => Some(0),
        }
    }

    /// Render `xl/styles.xml`.
    pub fn render(&self) -> String {
        match self {
            StyleAccumulator::Tracking(registry) => registry.render(),
            StyleAccumulator::NoOp => StyleRegistry::default().render(),
        }
    }
}
