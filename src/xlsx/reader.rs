//! Package reader: dispatches archive entries to part parsers.

use super::drawing::RawDrawing;
use super::parts::PartKind;
use super::props::{AppProperties, CoreProperties};
use super::raw::{ParsedPart, RawModel};
use super::reconcile::reconcile;
use super::shared_strings::SharedStrings;
use super::styles::Styles;
use super::workbook_part::WorkbookPart;
use super::worksheet::RawWorksheet;
use crate::container::{decode_xml_bytes, ArchiveEvent, EntrySource, Relationships};
use crate::error::{Error, Result};
use crate::model::{Medium, Workbook};
use tokio::task::JoinSet;
use tracing::{debug, trace};

/// Parse one classified entry body.
fn parse_part(kind: PartKind, data: Vec<u8>) -> Result<ParsedPart> {
    if let PartKind::Media { name, extension } = kind {
        return Ok(ParsedPart::Media(Medium::from_buffer(name, extension, data)));
    }

    let xml = decode_xml_bytes(&data)?;
    Ok(match kind {
        PartKind::GlobalRels => ParsedPart::GlobalRels(Relationships::parse(&xml)?),
        PartKind::Workbook => ParsedPart::Workbook(WorkbookPart::parse(&xml)?),
        PartKind::WorkbookRels => ParsedPart::WorkbookRels(Relationships::parse(&xml)?),
        PartKind::SharedStrings => ParsedPart::SharedStrings(SharedStrings::parse(&xml)?),
        PartKind::Styles => ParsedPart::Styles(Styles::parse(&xml)?),
        PartKind::AppProps => ParsedPart::AppProps(AppProperties::parse(&xml)?),
        PartKind::CoreProps => ParsedPart::CoreProps(CoreProperties::parse(&xml)?),
        PartKind::Worksheet(n) => ParsedPart::Worksheet(n, RawWorksheet::parse(&xml)?),
        PartKind::WorksheetRels(n) => ParsedPart::WorksheetRels(n, Relationships::parse(&xml)?),
        PartKind::Drawing(name) => {
            let drawing = RawDrawing::parse(&xml)?;
            ParsedPart::Drawing(name, drawing)
        }
        PartKind::DrawingRels(name) => {
            let rels = Relationships::parse(&xml)?;
            ParsedPart::DrawingRels(name, rels)
        }
        PartKind::Theme(name) => ParsedPart::Theme(name, xml),
        PartKind::Media { .. } | PartKind::Unknown => {
            return Err(Error::InvalidData("entry has no parser".to_string()))
        }
    })
}

/// Read every entry of `source` and reconcile the result.
///
/// Entries are parsed as independent tasks; each fills its own slot of the
/// raw model, so the order in which they complete does not matter. The first
/// failing task fails the read and the remaining tasks are aborted.
/// Media come back in name order rather than the order they were written.
pub async fn read_package<S: EntrySource + ?Sized>(source: &mut S) -> Result<Workbook> {
    let mut tasks: JoinSet<Result<ParsedPart>> = JoinSet::new();

    loop {
        let entry = match source.next_event()? {
            ArchiveEvent::Entry(entry) => entry,
            ArchiveEvent::Finished => break,
        };

        let kind = PartKind::classify(&entry.path);
        if kind == PartKind::Unknown {
            let path = entry.path.clone();
            let skipped = entry.drain()?;
            trace!("skipped {} ({} bytes)", path, skipped);
            continue;
        }

        let path = entry.path.clone();
        let data = entry.read_body()?;
        debug!("dispatching {} ({} bytes) as {:?}", path, data.len(), kind);
        tasks.spawn(async move { parse_part(kind, data).map_err(|e| Error::aggregate(path, e)) });
    }

    let mut raw = RawModel::new();
    while let Some(joined) = tasks.join_next().await {
        raw.merge(joined??);
    }

    Ok(reconcile(raw))
}
