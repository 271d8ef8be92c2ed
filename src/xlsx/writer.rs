//! Package writer.
//!
//! Writing happens in two phases. [`PackageWriter::prepare`] runs once: it
//! fills default properties, settles worksheet ids, feeds every cell into the
//! shared-strings and style accumulators, and plans drawings and media. The
//! writer then walks the waves of [`EmitGraph::package`], rendering each
//! step's entries and appending them to the sink. Nothing is finalized
//! unless every step succeeded.

use super::drawing::{self, DrawingLinks};
use super::parts::{self, PartKind};
use super::props;
use super::rels::{
    ContentTypes, CT_CORE_PROPERTIES, CT_DRAWING, CT_EXTENDED_PROPERTIES, CT_SHARED_STRINGS,
    CT_STYLES, CT_THEME, CT_WORKBOOK, CT_WORKSHEET, REL_CORE_PROPERTIES, REL_DRAWING,
    REL_EXTENDED_PROPERTIES, REL_IMAGE, REL_OFFICE_DOCUMENT, REL_SHARED_STRINGS, REL_STYLES,
    REL_THEME, REL_WORKSHEET,
};
use super::schedule::{EmitGraph, EmitStep};
use super::shared_strings::SharedStringsAccumulator;
use super::styles::StyleAccumulator;
use super::theme::{DEFAULT_THEME, DEFAULT_THEME_NAME};
use super::workbook_part;
use super::worksheet::{self, RenderContext};
use crate::container::{ArchiveSink, Relationship, Relationships};
use crate::error::{Error, Result};
use crate::model::{DocumentProperties, MediaSource, Medium, Workbook, Worksheet};
use chrono::{DateTime, SubsecRound, Utc};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::debug;

/// Author recorded when the document has none.
pub const DEFAULT_AUTHOR: &str = "xlsxpack";

/// Options for writing a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Store text through the shared-strings table; inline strings otherwise
    pub use_shared_strings: bool,
    /// Write cell styles; everything uses the default format otherwise
    pub use_styles: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            use_shared_strings: true,
            use_styles: true,
        }
    }
}

impl WriteOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether text goes through the shared-strings table.
    pub fn with_shared_strings(mut self, enabled: bool) -> Self {
        self.use_shared_strings = enabled;
        self
    }

    /// Set whether cell styles are written.
    pub fn with_styles(mut self, enabled: bool) -> Self {
        self.use_styles = enabled;
        self
    }
}

/// A rendered entry: package path and body.
type Entries = Vec<(String, Vec<u8>)>;

/// Relationships owned by one worksheet.
#[derive(Debug, Default)]
struct SheetLinks {
    rels: Relationships,
    drawing_rel: Option<String>,
    background_rel: Option<String>,
}

/// A drawing part to emit for the worksheet at `sheet`.
#[derive(Debug)]
struct PlannedDrawing {
    name: String,
    sheet: usize,
    links: DrawingLinks,
}

/// Everything the prepare pass computes.
struct WriteState {
    options: WriteOptions,
    strings: SharedStringsAccumulator,
    styles: StyleAccumulator,
    sheets: Vec<SheetLinks>,
    drawings: Vec<PlannedDrawing>,
    media: MediaPlan,
}

/// Writer for one workbook, holding it exclusively for the duration of the write.
pub struct PackageWriter<'a> {
    workbook: &'a mut Workbook,
    state: WriteState,
}

fn part_path(kind: PartKind) -> String {
    kind.path().unwrap_or_default()
}

fn next_rel_id(rels: &Relationships) -> String {
    format!("rId{}", rels.len() + 1)
}

/// Fill missing authorship and timestamps.
fn fill_properties(props: &mut DocumentProperties, now: DateTime<Utc>) {
    props
        .creator
        .get_or_insert_with(|| DEFAULT_AUTHOR.to_string());
    props
        .last_modified_by
        .get_or_insert_with(|| DEFAULT_AUTHOR.to_string());
    props.created.get_or_insert(now);
    props.modified.get_or_insert(now);
}

/// Give id 0 worksheets the next free id; reject duplicates.
fn assign_sheet_ids(worksheets: &mut [Worksheet]) -> Result<()> {
    let mut seen = HashSet::new();
    for sheet in worksheets.iter().filter(|ws| ws.id != 0) {
        if !seen.insert(sheet.id) {
            return Err(Error::InvalidData(format!(
                "worksheet id {} is used more than once",
                sheet.id
            )));
        }
    }
    let mut next = seen.iter().copied().max().unwrap_or(0) + 1;
    for sheet in worksheets.iter_mut().filter(|ws| ws.id == 0) {
        sheet.id = next;
        next += 1;
    }
    Ok(())
}

/// Media to emit: the workbook's list, then anything only referenced from a
/// drawing or background. One entry per file name.
fn collect_media(workbook: &Workbook) -> Vec<Arc<Medium>> {
    let referenced = workbook.worksheets.iter().flat_map(|ws| {
        ws.drawing
            .iter()
            .flat_map(|d| d.media())
            .chain(ws.background.iter())
    });

    let mut seen = HashSet::new();
    let mut media = Vec::new();
    for medium in workbook.media.iter().chain(referenced) {
        if seen.insert(medium.filename()) {
            media.push(Arc::clone(medium));
        }
    }
    media
}

/// Whether the reader will recognize `filename` as a media part.
fn is_package_media_name(filename: &str) -> bool {
    matches!(
        PartKind::classify(&format!("xl/media/{filename}")),
        PartKind::Media { .. }
    )
}

/// Media to emit, each with the file name it is stored under in `xl/media/`.
///
/// Names the reader would not recognize (`company-logo.png`, `my logo.png`)
/// are replaced by `image{N}` with the same extension, where no other medium
/// already uses the name `image{N}`.
#[derive(Debug, Default)]
struct MediaPlan {
    entries: Vec<(Arc<Medium>, String)>,
    renamed: HashMap<String, String>,
}

impl MediaPlan {
    fn new(media: Vec<Arc<Medium>>) -> Result<Self> {
        for medium in &media {
            if medium.source.is_none() {
                return Err(Error::UnsupportedMedia(medium.filename()));
            }
            if !is_package_media_name(&format!("image1.{}", medium.extension)) {
                return Err(Error::InvalidData(format!(
                    "media file {} needs an extension of 3 or 4 letters or digits",
                    medium.filename()
                )));
            }
        }

        let mut used: HashSet<String> = media
            .iter()
            .filter(|m| is_package_media_name(&m.filename()))
            .map(|m| m.name.clone())
            .collect();
        let mut plan = Self::default();
        let mut next = 1;
        for medium in media {
            let filename = medium.filename();
            let stored = if is_package_media_name(&filename) {
                filename
            } else {
                while used.contains(&format!("image{next}")) {
                    next += 1;
                }
                let name = format!("image{next}");
                let stored = format!("{name}.{}", medium.extension);
                used.insert(name);
                debug!("storing media {} as {}", filename, stored);
                plan.renamed.insert(filename, stored.clone());
                stored
            };
            plan.entries.push((medium, stored));
        }
        Ok(plan)
    }

    /// File name `medium` is stored under.
    fn package_name(&self, medium: &Medium) -> String {
        let filename = medium.filename();
        self.renamed.get(&filename).cloned().unwrap_or(filename)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

async fn read_media_file(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
        _ => Error::Io(e),
    })
}

impl<'a> PackageWriter<'a> {
    /// Run the prepare pass over `workbook`.
    pub fn prepare(workbook: &'a mut Workbook, options: WriteOptions) -> Result<Self> {
        fill_properties(&mut workbook.properties, Utc::now().trunc_subsecs(0));
        assign_sheet_ids(&mut workbook.worksheets)?;

        let media = MediaPlan::new(collect_media(workbook))?;
        let mut strings = SharedStringsAccumulator::new();
        let mut styles = StyleAccumulator::new(options.use_styles);
        let mut sheets = Vec::with_capacity(workbook.worksheets.len());
        let mut drawings = Vec::new();

        for (idx, sheet) in workbook.worksheets.iter_mut().enumerate() {
            sheet.rel_id = None;
            worksheet::prepare(sheet, &mut strings, &mut styles, options.use_shared_strings);

            let mut links = SheetLinks::default();
            if let Some(drawing) = &sheet.drawing {
                let name = format!("drawing{}", drawings.len() + 1);
                let id = next_rel_id(&links.rels);
                links.rels.add(Relationship::new(
                    id.clone(),
                    REL_DRAWING,
                    format!("../drawings/{name}.xml"),
                ))?;
                links.drawing_rel = Some(id);
                drawings.push(PlannedDrawing {
                    name,
                    sheet: idx,
                    links: drawing::link(drawing, |m| media.package_name(m))?,
                });
            }
            if let Some(medium) = &sheet.background {
                let id = next_rel_id(&links.rels);
                links.rels.add(Relationship::new(
                    id.clone(),
                    REL_IMAGE,
                    format!("../media/{}", media.package_name(medium)),
                ))?;
                links.background_rel = Some(id);
            }
            sheets.push(links);
        }

        debug!(
            "prepared {} worksheets, {} shared strings, {} drawings, {} media",
            sheets.len(),
            strings.len(),
            drawings.len(),
            media.len()
        );

        Ok(Self {
            workbook,
            state: WriteState {
                options,
                strings,
                styles,
                sheets,
                drawings,
                media,
            },
        })
    }

    /// Emit every step in dependency order, then finalize the sink.
    pub async fn run<S: ArchiveSink + ?Sized>(mut self, sink: &mut S) -> Result<()> {
        for wave in EmitGraph::package().waves()? {
            debug!("emitting {:?}", wave);
            let entries = match wave.as_slice() {
                [step] => self.emit_exclusive(*step).await?,
                [first, second] => {
                    let (mut a, b) = tokio::try_join!(self.emit(*first), self.emit(*second))?;
                    a.extend(b);
                    a
                }
                steps => {
                    let mut all = Vec::new();
                    for step in steps {
                        all.extend(self.emit(*step).await?);
                    }
                    all
                }
            };
            for (name, data) in &entries {
                sink.append(name, data)?;
            }
        }
        sink.finalize()
    }

    /// Run a step that may update the workbook.
    async fn emit_exclusive(&mut self, step: EmitStep) -> Result<Entries> {
        match step {
            EmitStep::WorkbookRels => self.allocate_workbook_rels(),
            other => self.emit(other).await,
        }
    }

    /// Run a step that only reads the workbook and the prepared state.
    async fn emit(&self, step: EmitStep) -> Result<Entries> {
        let text = |name: String, xml: String| (name, xml.into_bytes());
        Ok(match step {
            EmitStep::ContentTypes => {
                vec![text(parts::CONTENT_TYPES.to_string(), self.content_types().render())]
            }
            EmitStep::PackageRels => {
                let mut rels = Relationships::new();
                rels.add(Relationship::new("rId1", REL_OFFICE_DOCUMENT, parts::WORKBOOK))?;
                rels.add(Relationship::new("rId2", REL_CORE_PROPERTIES, parts::CORE_PROPS))?;
                rels.add(Relationship::new("rId3", REL_EXTENDED_PROPERTIES, parts::APP_PROPS))?;
                vec![text(parts::GLOBAL_RELS.to_string(), rels.render())]
            }
            EmitStep::WorkbookRels => {
                return Err(Error::InvalidData(
                    "workbook relationships must be allocated on their own".to_string(),
                ))
            }
            EmitStep::Worksheets => self.worksheet_entries()?,
            EmitStep::SharedStrings if self.state.strings.is_empty() => Vec::new(),
            EmitStep::SharedStrings => vec![text(
                parts::SHARED_STRINGS.to_string(),
                self.state.strings.render(),
            )],
            EmitStep::Drawings => self.drawing_entries()?,
            EmitStep::Themes => self
                .themes()
                .map(|(name, xml)| text(part_path(PartKind::Theme(name.to_string())), xml.to_string()))
                .collect(),
            EmitStep::Styles => vec![text(parts::STYLES.to_string(), self.state.styles.render())],
            EmitStep::Media => self.media_entries().await?,
            EmitStep::AppProps => {
                let names: Vec<&str> = self
                    .workbook
                    .worksheets
                    .iter()
                    .map(|ws| ws.name.as_str())
                    .collect();
                vec![text(
                    parts::APP_PROPS.to_string(),
                    props::render_app(&self.workbook.properties, &names),
                )]
            }
            EmitStep::CoreProps => vec![text(
                parts::CORE_PROPS.to_string(),
                props::render_core(&self.workbook.properties),
            )],
            EmitStep::Workbook => vec![text(
                parts::WORKBOOK.to_string(),
                workbook_part::render(self.workbook)?,
            )],
        })
    }

    /// Theme parts to write, falling back to the default theme.
    fn themes(&self) -> Box<dyn Iterator<Item = (&str, &str)> + '_> {
        if self.workbook.themes.is_empty() {
            Box::new(std::iter::once((DEFAULT_THEME_NAME, DEFAULT_THEME)))
        } else {
            Box::new(
                self.workbook
                    .themes
                    .iter()
                    .map(|(name, xml)| (name.as_str(), xml.as_str())),
            )
        }
    }

    /// Manifest derived from the prepared model.
    fn content_types(&self) -> ContentTypes {
        let mut types = ContentTypes::new();
        for (medium, _) in &self.state.media.entries {
            types.add_default(&medium.extension, medium.content_type());
        }
        types.add_override(parts::WORKBOOK, CT_WORKBOOK);
        for sheet in &self.workbook.worksheets {
            types.add_override(&part_path(PartKind::Worksheet(sheet.id)), CT_WORKSHEET);
        }
        for (name, _) in self.themes() {
            types.add_override(&part_path(PartKind::Theme(name.to_string())), CT_THEME);
        }
        types.add_override(parts::STYLES, CT_STYLES);
        if !self.state.strings.is_empty() {
            types.add_override(parts::SHARED_STRINGS, CT_SHARED_STRINGS);
        }
        for planned in &self.state.drawings {
            types.add_override(&part_path(PartKind::Drawing(planned.name.clone())), CT_DRAWING);
        }
        types.add_override(parts::CORE_PROPS, CT_CORE_PROPERTIES);
        types.add_override(parts::APP_PROPS, CT_EXTENDED_PROPERTIES);
        types
    }

    /// Allocate the workbook relationship ids and record each worksheet's id.
    fn allocate_workbook_rels(&mut self) -> Result<Entries> {
        let mut rels = Relationships::new();
        rels.add(Relationship::new(next_rel_id(&rels), REL_STYLES, "styles.xml"))?;

        let theme_names: Vec<String> = self.themes().map(|(name, _)| name.to_string()).collect();
        for name in theme_names {
            rels.add(Relationship::new(
                next_rel_id(&rels),
                REL_THEME,
                format!("theme/{name}.xml"),
            ))?;
        }
        if !self.state.strings.is_empty() {
            rels.add(Relationship::new(
                next_rel_id(&rels),
                REL_SHARED_STRINGS,
                "sharedStrings.xml",
            ))?;
        }
        for sheet in self.workbook.worksheets.iter_mut() {
            let id = next_rel_id(&rels);
            rels.add(Relationship::new(
                id.clone(),
                REL_WORKSHEET,
                format!("worksheets/sheet{}.xml", sheet.id),
            ))?;
            sheet.rel_id = Some(id);
        }

        Ok(vec![(parts::WORKBOOK_RELS.to_string(), rels.render().into_bytes())])
    }

    fn worksheet_entries(&self) -> Result<Entries> {
        let mut entries = Vec::new();
        for (sheet, links) in self.workbook.worksheets.iter().zip(&self.state.sheets) {
            if sheet.rel_id.is_none() {
                return Err(Error::MissingComponent(format!(
                    "relationship id for worksheet {}",
                    sheet.name
                )));
            }
            let ctx = RenderContext {
                strings: &self.state.strings,
                styles: &self.state.styles,
                use_shared_strings: self.state.options.use_shared_strings,
                drawing_rel: links.drawing_rel.as_deref(),
                background_rel: links.background_rel.as_deref(),
            };
            let xml = worksheet::render(sheet, &ctx)?;
            entries.push((part_path(PartKind::Worksheet(sheet.id)), xml.into_bytes()));
            if !links.rels.is_empty() {
                entries.push((
                    part_path(PartKind::WorksheetRels(sheet.id)),
                    links.rels.render().into_bytes(),
                ));
            }
        }
        Ok(entries)
    }

    fn drawing_entries(&self) -> Result<Entries> {
        let mut entries = Vec::new();
        for planned in &self.state.drawings {
            let drawing = self
                .workbook
                .worksheets
                .get(planned.sheet)
                .and_then(|ws| ws.drawing.as_ref())
                .ok_or_else(|| Error::MissingComponent(format!("drawing {}", planned.name)))?;
            let xml = drawing::render(drawing, &planned.links.embeds)?;
            entries.push((part_path(PartKind::Drawing(planned.name.clone())), xml.into_bytes()));
            entries.push((
                part_path(PartKind::DrawingRels(planned.name.clone())),
                planned.links.rels.render().into_bytes(),
            ));
        }
        Ok(entries)
    }

    /// Buffer-backed media are copied; path-backed media are read concurrently
    /// and the first failed read fails the step.
    async fn media_entries(&self) -> Result<Entries> {
        let plan = &self.state.media;
        let mut bodies: HashMap<String, Vec<u8>> = HashMap::with_capacity(plan.len());
        let mut reads: JoinSet<Result<(String, Vec<u8>)>> = JoinSet::new();

        for (medium, stored) in &plan.entries {
            let stored = stored.clone();
            match &medium.source {
                Some(MediaSource::Buffer(data)) => {
                    bodies.insert(stored, data.clone());
                }
                Some(MediaSource::Path(path)) => {
                    let path = path.clone();
                    let filename = medium.filename();
                    reads.spawn(async move {
                        let data = read_media_file(&path)
                            .await
                            .map_err(|e| Error::aggregate(filename, e))?;
                        Ok((stored, data))
                    });
                }
                None => return Err(Error::UnsupportedMedia(medium.filename())),
            }
        }

        while let Some(joined) = reads.join_next().await {
            let (stored, data) = joined??;
            bodies.insert(stored, data);
        }

        let mut entries = Vec::with_capacity(bodies.len());
        for (_, stored) in &plan.entries {
            if let Some(data) = bodies.remove(stored) {
                entries.push((format!("xl/media/{stored}"), data));
            }
        }
        Ok(entries)
    }
}

/// Prepare `workbook` and write it to `sink`.
pub async fn write_package<S: ArchiveSink + ?Sized>(
    workbook: &mut Workbook,
    sink: &mut S,
    options: WriteOptions,
) -> Result<()> {
    PackageWriter::prepare(workbook, options)?.run(sink).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MemorySink;
    use crate::model::{Anchor, CellRef, Drawing, Marker, Picture};

    fn workbook_with_picture() -> Workbook {
        let mut workbook = Workbook::new();
        let logo = workbook.add_medium(Medium::from_buffer("image1", "png", vec![1, 2, 3]));
        let sheet = workbook.add_worksheet("Pictures");
        sheet.set_value(CellRef::new(1, 1), "caption");
        sheet.drawing = Some(Drawing {
            anchors: vec![Anchor {
                from: Marker::at(0, 1),
                to: Marker::at(3, 8),
                edit_as: None,
                picture: Picture {
                    name: "Logo".into(),
                    description: None,
                    medium: logo,
                },
            }],
        });
        workbook
    }

    #[test]
    fn test_write_options_builders() {
        let options = WriteOptions::new().with_shared_strings(false);
        assert!(!options.use_shared_strings);
        assert!(options.use_styles);
        assert!(!WriteOptions::default().with_styles(false).use_styles);
    }

    #[test]
    fn test_fill_properties_keeps_existing() {
        let now = Utc::now().trunc_subsecs(0);
        let mut props = DocumentProperties {
            creator: Some("Ana".into()),
            ..Default::default()
        };
        fill_properties(&mut props, now);
        assert_eq!(props.creator.as_deref(), Some("Ana"));
        assert_eq!(props.last_modified_by.as_deref(), Some(DEFAULT_AUTHOR));
        assert_eq!(props.created, Some(now));
        assert_eq!(props.modified, Some(now));
    }

    #[test]
    fn test_assign_sheet_ids() {
        let mut sheets = vec![
            Worksheet::new(0, "a"),
            Worksheet::new(4, "b"),
            Worksheet::new(0, "c"),
        ];
        assign_sheet_ids(&mut sheets).unwrap();
        let ids: Vec<u32> = sheets.iter().map(|s| s.id).collect();
        assert_eq!(ids, [5, 4, 6]);

        let mut duplicated = vec![Worksheet::new(2, "a"), Worksheet::new(2, "b")];
        assert!(matches!(
            assign_sheet_ids(&mut duplicated),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_collect_media_includes_referenced_only_once() {
        let mut workbook = workbook_with_picture();
        let stray = Arc::new(Medium::from_buffer("bg", "jpg", vec![]));
        workbook.worksheets[0].background = Some(stray);
        let media = collect_media(&workbook);
        let names: Vec<String> = media.iter().map(|m| m.filename()).collect();
        assert_eq!(names, ["image1.png", "bg.jpg"]);
    }

    #[test]
    fn test_media_plan_renames_unreadable_names() {
        let media = vec![
            Arc::new(Medium::from_buffer("company-logo", "png", vec![1])),
            Arc::new(Medium::from_buffer("image1", "png", vec![2])),
            Arc::new(Medium::from_buffer("my logo", "png", vec![3])),
            Arc::new(Medium::from_buffer("chart", "jpeg", vec![4])),
        ];
        let plan = MediaPlan::new(media.clone()).unwrap();
        let stored: Vec<&str> = plan.entries.iter().map(|(_, s)| s.as_str()).collect();
        assert_eq!(stored, ["image2.png", "image1.png", "image3.png", "chart.jpeg"]);
        assert_eq!(plan.package_name(&media[0]), "image2.png");
        assert_eq!(plan.package_name(&media[3]), "chart.jpeg");
    }

    #[test]
    fn test_media_plan_rejects_bad_extension() {
        let media = vec![Arc::new(Medium::from_buffer("x", "jp", vec![1]))];
        assert!(matches!(MediaPlan::new(media), Err(Error::InvalidData(_))));
    }

    #[test]
    fn test_prepare_rejects_medium_without_source() {
        let mut workbook = workbook_with_picture();
        workbook.add_medium(Medium {
            name: "orphan".into(),
            extension: "png".into(),
            source: None,
        });
        let err = PackageWriter::prepare(&mut workbook, WriteOptions::default())
            .err()
            .unwrap();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnsupportedMedia);
    }

    #[tokio::test]
    async fn test_renamed_medium_is_linked_by_stored_name() {
        let mut workbook = Workbook::new();
        let logo = workbook.add_medium(Medium::from_buffer("company-logo", "png", vec![1]));
        let sheet = workbook.add_worksheet("Cover");
        sheet.background = Some(Arc::clone(&logo));
        sheet.drawing = Some(Drawing {
            anchors: vec![Anchor {
                from: Marker::at(0, 0),
                to: Marker::at(2, 2),
                edit_as: None,
                picture: Picture {
                    name: "Logo".into(),
                    description: None,
                    medium: logo,
                },
            }],
        });

        let mut sink = MemorySink::new();
        write_package(&mut workbook, &mut sink, WriteOptions::default())
            .await
            .unwrap();
        assert!(sink.get("xl/media/image1.png").is_some());
        assert!(sink.names().iter().all(|n| !n.contains("company-logo")));
        let text = |name: &str| String::from_utf8(sink.get(name).unwrap().to_vec()).unwrap();
        assert!(text("xl/worksheets/_rels/sheet1.xml.rels").contains("../media/image1.png"));
        assert!(text("xl/drawings/_rels/drawing1.xml.rels").contains("../media/image1.png"));
    }

    #[tokio::test]
    async fn test_entries_follow_wave_order() {
        let mut workbook = workbook_with_picture();
        let mut sink = MemorySink::new();
        write_package(&mut workbook, &mut sink, WriteOptions::default())
            .await
            .unwrap();

        assert!(sink.finalized);
        assert_eq!(
            sink.names(),
            [
                "[Content_Types].xml",
                "_rels/.rels",
                "xl/_rels/workbook.xml.rels",
                "xl/worksheets/sheet1.xml",
                "xl/worksheets/_rels/sheet1.xml.rels",
                "xl/sharedStrings.xml",
                "xl/drawings/drawing1.xml",
                "xl/drawings/_rels/drawing1.xml.rels",
                "xl/theme/theme1.xml",
                "xl/styles.xml",
                "xl/media/image1.png",
                "docProps/app.xml",
                "docProps/core.xml",
                "xl/workbook.xml",
            ]
        );

        let types = String::from_utf8(sink.get("[Content_Types].xml").unwrap().to_vec()).unwrap();
        assert!(types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(types.contains(r#"PartName="/xl/drawings/drawing1.xml""#));
        assert_eq!(workbook.worksheets[0].rel_id.as_deref(), Some("rId4"));
        assert_eq!(workbook.properties.creator.as_deref(), Some(DEFAULT_AUTHOR));
    }

    #[tokio::test]
    async fn test_missing_media_file_aborts_before_finalize() {
        let mut workbook = Workbook::new();
        workbook.add_medium(Medium::from_path("/definitely/not/here/image9.png"));
        let mut sink = MemorySink::new();
        let err = write_package(&mut workbook, &mut sink, WriteOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Aggregate { .. }));
        assert!(matches!(err.root(), Error::NotFound(_)));
        assert!(!sink.finalized);
    }
}
