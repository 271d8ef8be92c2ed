//! The raw model: loosely linked part data accumulated while entries arrive.

use super::drawing::RawDrawing;
use super::props::{AppProperties, CoreProperties};
use super::shared_strings::SharedStrings;
use super::styles::Styles;
use super::workbook_part::WorkbookPart;
use super::worksheet::RawWorksheet;
use crate::container::Relationships;
use crate::model::Medium;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::warn;

/// Ordering key for media: the name without its trailing digits, the trailing
/// number, then the file name. `image2` sorts before `image10`.
type MediaKey = (String, u64, String);

fn media_key(medium: &Medium) -> MediaKey {
    let stem = medium.name.trim_end_matches(|c: char| c.is_ascii_digit());
    let number = medium.name[stem.len()..].parse().unwrap_or(0);
    (stem.to_string(), number, medium.filename())
}

/// Media keyed by both file name (`image1.png`) and bare name (`image1`).
///
/// Iteration order does not depend on insertion order.
#[derive(Debug, Clone, Default)]
pub struct MediaIndex {
    ordered: BTreeMap<MediaKey, Arc<Medium>>,
    keys: HashMap<String, MediaKey>,
}

impl MediaIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a medium under its file name and its bare name.
    ///
    /// When two files share a bare name (`logo.png`, `logo.gif`), the bare
    /// name refers to the one that sorts first.
    pub fn insert(&mut self, medium: Medium) {
        let key = media_key(&medium);
        let filename = medium.filename();
        let name = medium.name.clone();

        if let Some(previous) = self.keys.insert(filename.clone(), key.clone()) {
            warn!("media file {} delivered twice", filename);
            self.ordered.remove(&previous);
        }
        match self.keys.get(&name) {
            Some(existing) if *existing <= key => {}
            _ => {
                self.keys.insert(name, key.clone());
            }
        }
        self.ordered.insert(key, Arc::new(medium));
    }

    /// Look up by file name or bare name.
    pub fn get(&self, key: &str) -> Option<&Arc<Medium>> {
        self.keys.get(key).and_then(|k| self.ordered.get(k))
    }

    /// Look up by a package path such as `xl/media/image1.png`.
    pub fn get_by_path(&self, path: &str) -> Option<&Arc<Medium>> {
        let file = path.rsplit('/').next().unwrap_or(path);
        self.get(file)
    }

    /// Number of distinct media.
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// The media in index order.
    pub fn to_vec(&self) -> Vec<Arc<Medium>> {
        self.ordered.values().cloned().collect()
    }
}

/// The result of parsing one classified entry.
#[derive(Debug)]
pub enum ParsedPart {
    GlobalRels(Relationships),
    Workbook(WorkbookPart),
    WorkbookRels(Relationships),
    SharedStrings(SharedStrings),
    Styles(Styles),
    AppProps(AppProperties),
    CoreProps(CoreProperties),
    Worksheet(u32, RawWorksheet),
    WorksheetRels(u32, Relationships),
    Media(Medium),
    Drawing(String, RawDrawing),
    DrawingRels(String, Relationships),
    Theme(String, String),
}

/// Everything parsed from a package, before any cross-part reference is resolved.
///
/// Each entry fills its own slot, so parts can be merged in any order.
#[derive(Debug, Default)]
pub struct RawModel {
    pub global_rels: Option<Relationships>,
    pub workbook: Option<WorkbookPart>,
    pub workbook_rels: Option<Relationships>,
    pub shared_strings: Option<SharedStrings>,
    pub styles: Option<Styles>,
    pub app: Option<AppProperties>,
    pub core: Option<CoreProperties>,
    pub worksheets: HashMap<u32, RawWorksheet>,
    pub worksheet_rels: HashMap<u32, Relationships>,
    pub drawings: HashMap<String, RawDrawing>,
    pub drawing_rels: HashMap<String, Relationships>,
    pub themes: BTreeMap<String, String>,
    pub media: MediaIndex,
}

impl RawModel {
    /// Create an empty raw model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a parsed part in its slot.
    pub fn merge(&mut self, part: ParsedPart) {
        match part {
            ParsedPart::GlobalRels(rels) => self.global_rels = Some(rels),
            ParsedPart::Workbook(workbook) => self.workbook = Some(workbook),
            ParsedPart::WorkbookRels(rels) => self.workbook_rels = Some(rels),
            ParsedPart::SharedStrings(strings) => self.shared_strings = Some(strings),
            ParsedPart::Styles(styles) => self.styles = Some(styles),
            ParsedPart::AppProps(app) => self.app = Some(app),
            ParsedPart::CoreProps(core) => self.core = Some(core),
            ParsedPart::Worksheet(n, sheet) => {
                self.worksheets.insert(n, sheet);
            }
            ParsedPart::WorksheetRels(n, rels) => {
                self.worksheet_rels.insert(n, rels);
            }
            ParsedPart::Media(medium) => self.media.insert(medium),
            ParsedPart::Drawing(name, drawing) => {
                self.drawings.insert(name, drawing);
            }
            ParsedPart::DrawingRels(name, rels) => {
                self.drawing_rels.insert(name, rels);
            }
            ParsedPart::Theme(name, xml) => {
                self.themes.insert(name, xml);
            }
        }
    }
}
