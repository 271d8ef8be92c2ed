//! xl/workbook.xml: sheet list, defined names and workbook views.

use crate::container::{escape, XML_DECLARATION};
use crate::error::{Error, Result};
use crate::model::{DefinedName, SheetState, Workbook, WorkbookView};
use quick_xml::events::{BytesStart, Event};

/// One `<sheet>` entry, still referring to its part by relationship id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    pub name: String,
    pub sheet_id: u32,
    pub state: SheetState,
    /// Workbook-scoped relationship id
    pub rel_id: String,
}

/// The parsed workbook part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkbookPart {
    pub sheets: Vec<SheetEntry>,
    pub defined_names: Vec<DefinedName>,
    pub views: Vec<WorkbookView>,
}

impl WorkbookPart {
    /// Parse workbook XML.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut part = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut pending_name: Option<DefinedName> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e)
                    if pending_name.is_none() && e.local_name().as_ref() == b"sheet" =>
                {
                    if let Some(sheet) = parse_sheet(&e)? {
                        part.sheets.push(sheet);
                    }
                }
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"workbookView" => {
                    part.views.push(parse_view(&e)?);
                }
                Event::Start(e) if e.local_name().as_ref() == b"definedName" => {
                    pending_name = Some(parse_defined_name(&e)?);
                }
                Event::Text(e) => {
                    if let Some(name) = pending_name.as_mut() {
                        name.refers_to.push_str(&e.unescape()?);
                    }
                }
                Event::End(e) if e.local_name().as_ref() == b"definedName" => {
                    if let Some(name) = pending_name.take() {
                        part.defined_names.push(name);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(part)
    }
}

fn parse_sheet(e: &BytesStart<'_>) -> Result<Option<SheetEntry>> {
    let mut name = String::new();
    let mut sheet_id = 0;
    let mut state = SheetState::Visible;
    let mut rel_id = String::new();

    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"name" => name = value.into_owned(),
            b"sheetId" => sheet_id = value.parse().unwrap_or(0),
            b"state" => state = SheetState::from_attr(&value),
            b"r:id" => rel_id = value.into_owned(),
            // r:id under some other prefix
            key if key.ends_with(b":id") => rel_id = value.into_owned(),
            _ => {}
        }
    }

    Ok((!name.is_empty()).then_some(SheetEntry {
        name,
        sheet_id,
        state,
        rel_id,
    }))
}

fn parse_defined_name(e: &BytesStart<'_>) -> Result<DefinedName> {
    let mut name = DefinedName {
        name: String::new(),
        refers_to: String::new(),
        local_sheet_id: None,
        hidden: false,
    };
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"name" => name.name = value.into_owned(),
            b"localSheetId" => name.local_sheet_id = value.parse().ok(),
            b"hidden" => name.hidden = value == "1" || value == "true",
            _ => {}
        }
    }
    Ok(name)
}

fn parse_view(e: &BytesStart<'_>) -> Result<WorkbookView> {
    let mut view = WorkbookView::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?;
        match attr.key.as_ref() {
            b"xWindow" => view.x_window = value.parse().ok(),
            b"yWindow" => view.y_window = value.parse().ok(),
            b"windowWidth" => view.window_width = value.parse().ok(),
            b"windowHeight" => view.window_height = value.parse().ok(),
            b"activeTab" => view.active_tab = value.parse().ok(),
            b"firstSheet" => view.first_sheet = value.parse().ok(),
            _ => {}
        }
    }
    Ok(view)
}

/// Render xl/workbook.xml.
///
/// Every worksheet must already carry the relationship id allocated for it.
pub fn render(workbook: &Workbook) -> Result<String> {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main""#,
        r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
    ));

    if !workbook.views.is_empty() {
        xml.push_str("<bookViews>");
        for view in &workbook.views {
            xml.push_str("<workbookView");
            for (attr, value) in [
                ("xWindow", view.x_window),
                ("yWindow", view.y_window),
                ("windowWidth", view.window_width),
                ("windowHeight", view.window_height),
                ("firstSheet", view.first_sheet.map(i64::from)),
                ("activeTab", view.active_tab.map(i64::from)),
            ] {
                if let Some(value) = value {
                    xml.push_str(&format!(r#" {attr}="{value}""#));
                }
            }
            xml.push_str("/>");
        }
        xml.push_str("</bookViews>");
    }

    xml.push_str("<sheets>");
    for worksheet in &workbook.worksheets {
        let rel_id = worksheet.rel_id.as_deref().ok_or_else(|| {
            Error::MissingComponent(format!(
                "relationship id for worksheet {}",
                worksheet.name
            ))
        })?;
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}""#,
            escape(&worksheet.name),
            worksheet.id
        ));
        if let Some(state) = worksheet.state.as_attr() {
            xml.push_str(&format!(r#" state="{state}""#));
        }
        xml.push_str(&format!(r#" r:id="{}"/>"#, escape(rel_id)));
    }
    xml.push_str("</sheets>");

    if !workbook.defined_names.is_empty() {
        xml.push_str("<definedNames>");
        for name in &workbook.defined_names {
            xml.push_str(&format!(r#"<definedName name="{}""#, escape(&name.name)));
            if let Some(local) = name.local_sheet_id {
                xml.push_str(&format!(r#" localSheetId="{local}""#));
            }
            if name.hidden {
                xml.push_str(r#" hidden="1""#);
            }
            xml.push_str(&format!(">{}</definedName>", escape(&name.refers_to)));
        }
        xml.push_str("</definedNames>");
    }

    xml.push_str(r#"<calcPr calcId="191029"/></workbook>"#);
    Ok(xml)
}
