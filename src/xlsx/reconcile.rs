//! Projection of the raw model into the document model.

use super::parts::{PartKind, WORKBOOK};
use super::props;
use super::raw::RawModel;
use super::worksheet::LinkTables;
use crate::container::{resolve_path, Relationships};
use crate::model::{Drawing, Workbook, Worksheet};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Turn a fully read raw model into a workbook.
///
/// Consumes the raw model; the per-part relationship lists and the index
/// tables do not survive into the result.
pub fn reconcile(mut raw: RawModel) -> Workbook {
    let mut workbook = Workbook::new();

    // Workbook-level entities
    let part = raw.workbook.take().unwrap_or_else(|| {
        warn!("package has no {}; reading it as an empty workbook", WORKBOOK);
        Default::default()
    });
    workbook.defined_names = part.defined_names;
    workbook.views = part.views;
    workbook.properties = props::merge(
        raw.core.take().unwrap_or_default(),
        raw.app.take().unwrap_or_default(),
    );
    workbook.themes = std::mem::take(&mut raw.themes);
    workbook.media = raw.media.to_vec();

    // Drawings, through their own relationships
    let empty = Relationships::new();
    let mut drawings: HashMap<String, Drawing> = HashMap::with_capacity(raw.drawings.len());
    for (name, drawing) in std::mem::take(&mut raw.drawings) {
        let Some(path) = PartKind::Drawing(name.clone()).path() else {
            continue;
        };
        let rels = raw.drawing_rels.get(&name).unwrap_or(&empty);
        drawings.insert(name, drawing.reconcile(&path, rels, &raw.media));
    }

    // Worksheets, through the workbook relationships
    let shared_strings = raw.shared_strings.take().unwrap_or_default();
    let styles = raw.styles.take().unwrap_or_default();
    let tables = LinkTables {
        shared_strings: &shared_strings,
        styles: &styles,
        media: &raw.media,
        drawings: &drawings,
    };
    let workbook_rels = raw.workbook_rels.take().unwrap_or_default();

    for entry in part.sheets {
        let mut sheet = Worksheet::new(entry.sheet_id, entry.name);
        sheet.state = entry.state;
        sheet.rel_id = Some(entry.rel_id.clone());

        let number = workbook_rels
            .get(&entry.rel_id)
            .map(|rel| resolve_path(WORKBOOK, &rel.target))
            .and_then(|path| match PartKind::classify(&path) {
                PartKind::Worksheet(n) => Some((n, path)),
                _ => None,
            });

        match number.and_then(|(n, path)| raw.worksheets.remove(&n).map(|ws| (n, path, ws))) {
            Some((n, path, raw_sheet)) => {
                let rels = raw.worksheet_rels.remove(&n).unwrap_or_default();
                debug!("reconciling {} from {}", sheet.name, path);
                raw_sheet.reconcile(&mut sheet, &path, &rels, &tables);
            }
            None => warn!(
                "worksheet {} ({}) has no readable part",
                sheet.name, entry.rel_id
            ),
        }
        workbook.worksheets.push(sheet);
    }

    if !raw.worksheets.is_empty() {
        debug!(
            "{} worksheet parts are not listed in the workbook",
            raw.worksheets.len()
        );
    }

    workbook
}
