//! Worksheet drawings (`xl/drawings/drawing{N}.xml`).
//!
//! Only two-cell anchors holding pictures are modelled; shapes, charts and
//! other anchor kinds are skipped on read.

use super::raw::MediaIndex;
use super::rels::REL_IMAGE;
use crate::container::{escape, resolve_path, Relationship, Relationships, XML_DECLARATION};
use crate::error::{Error, Result};
use crate::model::{Anchor, Drawing, Marker, Medium, Picture};
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use tracing::warn;

/// A two-cell anchor whose picture still points at a relationship id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAnchor {
    pub from: Marker,
    pub to: Marker,
    pub edit_as: Option<String>,
    pub name: String,
    pub description: Option<String>,
    /// `r:embed` of the picture's blip
    pub embed: Option<String>,
}

/// A parsed drawing part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDrawing {
    pub anchors: Vec<RawAnchor>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MarkerSide {
    From,
    To,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum MarkerField {
    Col,
    ColOff,
    Row,
    RowOff,
}

impl RawDrawing {
    /// Parse drawing XML.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut drawing = Self::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut anchor: Option<RawAnchor> = None;
        let mut has_picture = false;
        let mut side: Option<MarkerSide> = None;
        let mut field: Option<MarkerField> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"twoCellAnchor" => {
                        anchor = Some(RawAnchor {
                            edit_as: attr_value(&e, b"editAs")?,
                            ..Default::default()
                        });
                        has_picture = false;
                    }
                    b"from" if anchor.is_some() => side = Some(MarkerSide::From),
                    b"to" if anchor.is_some() => side = Some(MarkerSide::To),
                    b"col" if side.is_some() => field = Some(MarkerField::Col),
                    b"colOff" if side.is_some() => field = Some(MarkerField::ColOff),
                    b"row" if side.is_some() => field = Some(MarkerField::Row),
                    b"rowOff" if side.is_some() => field = Some(MarkerField::RowOff),
                    b"pic" if anchor.is_some() => has_picture = true,
                    b"cNvPr" | b"blip" => apply_picture_attrs(anchor.as_mut(), has_picture, &e)?,
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"cNvPr" | b"blip" => apply_picture_attrs(anchor.as_mut(), has_picture, &e)?,
                    _ => {}
                },
                Event::Text(e) => {
                    if let (Some(anchor), Some(side), Some(field)) = (anchor.as_mut(), side, field)
                    {
                        let text = e.unescape()?;
                        let marker = match side {
                            MarkerSide::From => &mut anchor.from,
                            MarkerSide::To => &mut anchor.to,
                        };
                        match field {
                            MarkerField::Col => marker.col = text.trim().parse().unwrap_or(0),
                            MarkerField::ColOff => marker.col_off = text.trim().parse().unwrap_or(0),
                            MarkerField::Row => marker.row = text.trim().parse().unwrap_or(0),
                            MarkerField::RowOff => marker.row_off = text.trim().parse().unwrap_or(0),
                        }
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"twoCellAnchor" => {
                        if let Some(anchor) = anchor.take() {
                            if has_picture {
                                drawing.anchors.push(anchor);
                            }
                        }
                    }
                    b"from" | b"to" => side = None,
                    b"col" | b"colOff" | b"row" | b"rowOff" => field = None,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(drawing)
    }

    /// Resolve picture references through the drawing's relationships.
    ///
    /// Anchors whose picture cannot be found are dropped.
    pub fn reconcile(self, part_path: &str, rels: &Relationships, media: &MediaIndex) -> Drawing {
        let mut anchors = Vec::with_capacity(self.anchors.len());
        for raw in self.anchors {
            let medium = raw
                .embed
                .as_deref()
                .and_then(|id| rels.get(id))
                .filter(|rel| !rel.external)
                .and_then(|rel| media.get_by_path(&resolve_path(part_path, &rel.target)));
            match medium {
                Some(medium) => anchors.push(Anchor {
                    from: raw.from,
                    to: raw.to,
                    edit_as: raw.edit_as,
                    picture: Picture {
                        name: raw.name,
                        description: raw.description,
                        medium: medium.clone(),
                    },
                }),
                None => warn!(
                    "{}: picture {:?} references missing media {:?}",
                    part_path, raw.name, raw.embed
                ),
            }
        }
        Drawing { anchors }
    }
}

fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn apply_picture_attrs(
    anchor: Option<&mut RawAnchor>,
    has_picture: bool,
    e: &BytesStart<'_>,
) -> Result<()> {
    let Some(anchor) = anchor.filter(|_| has_picture) else {
        return Ok(());
    };
    if e.local_name().as_ref() == b"blip" {
        anchor.embed = attr_value(e, b"embed")?;
    } else {
        anchor.name = attr_value(e, b"name")?.unwrap_or_default();
        anchor.description = attr_value(e, b"descr")?;
    }
    Ok(())
}

/// Relationships a drawing needs on write, and the id each anchor embeds.
#[derive(Debug, Clone, Default)]
pub struct DrawingLinks {
    pub rels: Relationships,
    pub embeds: Vec<String>,
}

/// Allocate one image relationship per distinct medium in the drawing.
///
/// `package_name` gives the file name a medium is stored under in `xl/media/`.
pub fn link(drawing: &Drawing, package_name: impl Fn(&Medium) -> String) -> Result<DrawingLinks> {
    let mut links = DrawingLinks::default();
    let mut by_file: HashMap<String, String> = HashMap::new();
    for medium in drawing.media() {
        let filename = package_name(medium);
        let id = match by_file.get(&filename) {
            Some(id) => id.clone(),
            None => {
                let id = format!("rId{}", links.rels.len() + 1);
                links.rels.add(Relationship::new(
                    id.clone(),
                    REL_IMAGE,
                    format!("../media/{filename}"),
                ))?;
                by_file.insert(filename, id.clone());
                id
            }
        };
        links.embeds.push(id);
    }
    Ok(links)
}

fn push_marker(xml: &mut String, element: &str, marker: &Marker) {
    xml.push_str(&format!(
        "<xdr:{element}><xdr:col>{}</xdr:col><xdr:colOff>{}</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>{}</xdr:rowOff></xdr:{element}>",
        marker.col, marker.col_off, marker.row, marker.row_off
    ));
}

/// Render drawing XML; `embeds` holds one relationship id per anchor.
pub fn render(drawing: &Drawing, embeds: &[String]) -> Result<String> {
    if embeds.len() != drawing.anchors.len() {
        return Err(Error::InvalidData(format!(
            "drawing has {} anchors but {} picture links",
            drawing.anchors.len(),
            embeds.len()
        )));
    }

    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(concat!(
        r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing""#,
        r#" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#,
        r#" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
    ));
    for (idx, (anchor, embed)) in drawing.anchors.iter().zip(embeds).enumerate() {
        xml.push_str("<xdr:twoCellAnchor");
        if let Some(edit_as) = &anchor.edit_as {
            xml.push_str(&format!(r#" editAs="{}""#, escape(edit_as)));
        }
        xml.push('>');
        push_marker(&mut xml, "from", &anchor.from);
        push_marker(&mut xml, "to", &anchor.to);

        let picture = &anchor.picture;
        xml.push_str(&format!(
            r#"<xdr:pic><xdr:nvPicPr><xdr:cNvPr id="{}" name="{}""#,
            idx + 2,
            escape(&picture.name)
        ));
        if let Some(descr) = &picture.description {
            xml.push_str(&format!(r#" descr="{}""#, escape(descr)));
        }
        xml.push_str(concat!(
            "/>",
            r#"<xdr:cNvPicPr><a:picLocks noChangeAspect="1"/></xdr:cNvPicPr></xdr:nvPicPr>"#
        ));
        xml.push_str(&format!(
            r#"<xdr:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill>"#,
            escape(embed)
        ));
        xml.push_str(concat!(
            r#"<xdr:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></xdr:spPr>"#,
            "</xdr:pic><xdr:clientData/></xdr:twoCellAnchor>"
        ));
    }
    xml.push_str("</xdr:wsDr>");
    Ok(xml)
}
