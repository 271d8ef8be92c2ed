//! docProps/core.xml and docProps/app.xml.

use crate::container::{escape, XML_DECLARATION};
use crate::error::Result;
use crate::model::DocumentProperties;
use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::Event;

/// Fields read from docProps/core.xml.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreProperties {
    pub creator: Option<String>,
    pub last_modified_by: Option<String>,
    pub title: Option<String>,
    pub subject: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub category: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
}

/// Fields read from docProps/app.xml.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppProperties {
    pub application: Option<String>,
    pub company: Option<String>,
    pub manager: Option<String>,
}

/// Collect `(element local name, text)` pairs for the leaf elements of a flat part.
fn leaf_texts(xml: &str) -> Result<Vec<(String, String)>> {
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut texts = Vec::new();
    let mut current_element: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                current_element = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::Text(e) => {
                if let Some(ref elem) = current_element {
                    texts.push((elem.clone(), e.unescape()?.into_owned()));
                }
            }
            Event::End(_) => current_element = None,
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(texts)
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl CoreProperties {
    /// Parse docProps/core.xml.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut core = Self::default();
        for (elem, text) in leaf_texts(xml)? {
            match elem.as_str() {
                "creator" => core.creator = Some(text),
                "lastModifiedBy" => core.last_modified_by = Some(text),
                "title" => core.title = Some(text),
                "subject" => core.subject = Some(text),
                "description" => core.description = Some(text),
                "keywords" => core.keywords = Some(text),
                "category" => core.category = Some(text),
                "created" => core.created = parse_timestamp(&text),
                "modified" => core.modified = parse_timestamp(&text),
                _ => {}
            }
        }
        Ok(core)
    }
}

impl AppProperties {
    /// Parse docProps/app.xml.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut app = Self::default();
        for (elem, text) in leaf_texts(xml)? {
            match elem.as_str() {
                "Application" => app.application = Some(text),
                "Company" => app.company = Some(text),
                "Manager" => app.manager = Some(text),
                _ => {}
            }
        }
        Ok(app)
    }
}

/// Merge both property parts into the document model's single record.
pub fn merge(core: CoreProperties, app: AppProperties) -> DocumentProperties {
    DocumentProperties {
        creator: core.creator,
        last_modified_by: core.last_modified_by,
        title: core.title,
        subject: core.subject,
        description: core.description,
        keywords: core.keywords,
        category: core.category,
        created: core.created,
        modified: core.modified,
        application: app.application,
        company: app.company,
        manager: app.manager,
    }
}

fn push_element(xml: &mut String, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        xml.push_str(&format!("<{name}>{}</{name}>", escape(value)));
    }
}

fn push_timestamp(xml: &mut String, name: &str, value: Option<&DateTime<Utc>>) {
    if let Some(value) = value {
        xml.push_str(&format!(
            r#"<{name} xsi:type="dcterms:W3CDTF">{}</{name}>"#,
            value.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
}

/// Render docProps/core.xml.
pub fn render_core(props: &DocumentProperties) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties""#,
        r#" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/""#,
        r#" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
    ));
    push_element(&mut xml, "dc:creator", props.creator.as_deref());
    push_element(&mut xml, "dc:title", props.title.as_deref());
    push_element(&mut xml, "dc:subject", props.subject.as_deref());
    push_element(&mut xml, "dc:description", props.description.as_deref());
    push_element(&mut xml, "cp:keywords", props.keywords.as_deref());
    push_element(&mut xml, "cp:category", props.category.as_deref());
    push_element(&mut xml, "cp:lastModifiedBy", props.last_modified_by.as_deref());
    push_timestamp(&mut xml, "dcterms:created", props.created.as_ref());
    push_timestamp(&mut xml, "dcterms:modified", props.modified.as_ref());
    xml.push_str("</cp:coreProperties>");
    xml
}

/// Render docProps/app.xml, listing the worksheet titles.
pub fn render_app(props: &DocumentProperties, sheet_names: &[&str]) -> String {
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties""#,
        r#" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
    ));
    push_element(&mut xml, "Application", props.application.as_deref());
    xml.push_str("<DocSecurity>0</DocSecurity><ScaleCrop>false</ScaleCrop>");
    xml.push_str(&format!(
        concat!(
            "<HeadingPairs><vt:vector size=\"2\" baseType=\"variant\">",
            "<vt:variant><vt:lpstr>Worksheets</vt:lpstr></vt:variant>",
            "<vt:variant><vt:i4>{}</vt:i4></vt:variant>",
            "</vt:vector></HeadingPairs>"
        ),
        sheet_names.len()
    ));
    xml.push_str(&format!(
        r#"<TitlesOfParts><vt:vector size="{}" baseType="lpstr">"#,
        sheet_names.len()
    ));
    for name in sheet_names {
        xml.push_str(&format!("<vt:lpstr>{}</vt:lpstr>", escape(name)));
    }
    xml.push_str("</vt:vector></TitlesOfParts>");
    push_element(&mut xml, "Manager", props.manager.as_deref());
    push_element(&mut xml, "Company", props.company.as_deref());
    xml.push_str("<LinksUpToDate>false</LinksUpToDate><SharedDoc>false</SharedDoc>");
    xml.push_str("<HyperlinksChanged>false</HyperlinksChanged><AppVersion>16.0300</AppVersion>");
    xml.push_str("</Properties>");
    xml
}
