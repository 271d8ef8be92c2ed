//! Classification of package entry paths.

/// Package-level relationships.
pub const GLOBAL_RELS: &str = "_rels/.rels";
/// Content-types manifest.
pub const CONTENT_TYPES: &str = "[Content_Types].xml";
/// Workbook part.
pub const WORKBOOK: &str = "xl/workbook.xml";
/// Workbook relationships.
pub const WORKBOOK_RELS: &str = "xl/_rels/workbook.xml.rels";
/// Shared-strings table.
pub const SHARED_STRINGS: &str = "xl/sharedStrings.xml";
/// Styles table.
pub const STYLES: &str = "xl/styles.xml";
/// Extended properties.
pub const APP_PROPS: &str = "docProps/app.xml";
/// Core properties.
pub const CORE_PROPS: &str = "docProps/core.xml";

/// What a package entry holds, decided once from its path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartKind {
    GlobalRels,
    Workbook,
    WorkbookRels,
    SharedStrings,
    Styles,
    AppProps,
    CoreProps,
    /// `xl/worksheets/sheet{N}.xml`
    Worksheet(u32),
    /// `xl/worksheets/_rels/sheet{N}.xml.rels`
    WorksheetRels(u32),
    /// `xl/media/{name}.{extension}`
    Media { name: String, extension: String },
    /// `xl/drawings/{name}.xml`
    Drawing(String),
    /// `xl/drawings/_rels/{name}.xml.rels`
    DrawingRels(String),
    /// `xl/theme/{name}.xml`
    Theme(String),
    /// Anything else; drained and ignored.
    Unknown,
}

impl PartKind {
    /// Classify an entry path.
    pub fn classify(path: &str) -> Self {
        let path = path.strip_prefix('/').unwrap_or(path);
        match path {
            GLOBAL_RELS => return PartKind::GlobalRels,
            WORKBOOK => return PartKind::Workbook,
            WORKBOOK_RELS => return PartKind::WorkbookRels,
            SHARED_STRINGS => return PartKind::SharedStrings,
            STYLES => return PartKind::Styles,
            APP_PROPS => return PartKind::AppProps,
            CORE_PROPS => return PartKind::CoreProps,
            _ => {}
        }

        if let Some(rest) = path.strip_prefix("xl/worksheets/_rels/sheet") {
            if let Some(n) = rest.strip_suffix(".xml.rels").and_then(parse_number) {
                return PartKind::WorksheetRels(n);
            }
        } else if let Some(rest) = path.strip_prefix("xl/worksheets/sheet") {
            if let Some(n) = rest.strip_suffix(".xml").and_then(parse_number) {
                return PartKind::Worksheet(n);
            }
        } else if let Some(file) = path.strip_prefix("xl/media/") {
            if let Some((name, extension)) = file.split_once('.') {
                if is_alphanumeric(name)
                    && is_alphanumeric(extension)
                    && (3..=4).contains(&extension.len())
                {
                    return PartKind::Media {
                        name: name.to_string(),
                        extension: extension.to_string(),
                    };
                }
            }
        } else if let Some(rest) = path.strip_prefix("xl/drawings/_rels/") {
            if let Some(name) = rest.strip_suffix(".xml.rels").filter(|n| is_drawing_name(n)) {
                return PartKind::DrawingRels(name.to_string());
            }
        } else if let Some(rest) = path.strip_prefix("xl/drawings/") {
            if let Some(name) = rest.strip_suffix(".xml").filter(|n| is_drawing_name(n)) {
                return PartKind::Drawing(name.to_string());
            }
        } else if let Some(rest) = path.strip_prefix("xl/theme/") {
            if let Some(name) = rest.strip_suffix(".xml").filter(|n| is_alphanumeric(n)) {
                return PartKind::Theme(name.to_string());
            }
        }

        PartKind::Unknown
    }

    /// Canonical path of the part; `None` for `Unknown`.
    pub fn path(&self) -> Option<String> {
        Some(match self {
            PartKind::GlobalRels => GLOBAL_RELS.to_string(),
            PartKind::Workbook => WORKBOOK.to_string(),
            PartKind::WorkbookRels => WORKBOOK_RELS.to_string(),
            PartKind::SharedStrings => SHARED_STRINGS.to_string(),
            PartKind::Styles => STYLES.to_string(),
            PartKind::AppProps => APP_PROPS.to_string(),
            PartKind::CoreProps => CORE_PROPS.to_string(),
            PartKind::Worksheet(n) => format!("xl/worksheets/sheet{n}.xml"),
            PartKind::WorksheetRels(n) => format!("xl/worksheets/_rels/sheet{n}.xml.rels"),
            PartKind::Media { name, extension } => format!("xl/media/{name}.{extension}"),
            PartKind::Drawing(name) => format!("xl/drawings/{name}.xml"),
            PartKind::DrawingRels(name) => format!("xl/drawings/_rels/{name}.xml.rels"),
            PartKind::Theme(name) => format!("xl/theme/{name}.xml"),
            PartKind::Unknown => return None,
        })
    }
}

fn parse_number(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn is_drawing_name(name: &str) -> bool {
    name.strip_prefix("drawing")
        .and_then(parse_number)
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_paths() {
        assert_eq!(PartKind::classify("_rels/.rels"), PartKind::GlobalRels);
        assert_eq!(PartKind::classify("xl/workbook.xml"), PartKind::Workbook);
        assert_eq!(PartKind::classify("/xl/styles.xml"), PartKind::Styles);
        assert_eq!(PartKind::classify("docProps/core.xml"), PartKind::CoreProps);
    }

    #[test]
    fn test_patterned_paths() {
        assert_eq!(
            PartKind::classify("xl/worksheets/sheet12.xml"),
            PartKind::Worksheet(12)
        );
        assert_eq!(
            PartKind::classify("xl/worksheets/_rels/sheet2.xml.rels"),
            PartKind::WorksheetRels(2)
        );
        assert_eq!(
            PartKind::classify("xl/media/image1.jpeg"),
            PartKind::Media {
                name: "image1".to_string(),
                extension: "jpeg".to_string()
            }
        );
        assert_eq!(
            PartKind::classify("xl/drawings/drawing3.xml"),
            PartKind::Drawing("drawing3".to_string())
        );
        assert_eq!(
            PartKind::classify("xl/drawings/_rels/drawing3.xml.rels"),
            PartKind::DrawingRels("drawing3".to_string())
        );
        assert_eq!(
            PartKind::classify("xl/theme/theme1.xml"),
            PartKind::Theme("theme1".to_string())
        );
    }

    #[test]
    fn test_unknown_paths() {
        for path in [
            "[Content_Types].xml",
            "xl/worksheets/sheet.xml",
            "xl/worksheets/sheetA.xml",
            "xl/media/image1.p",
            "xl/media/image-1.png",
            "xl/drawings/vmlDrawing1.vml",
            "xl/charts/chart1.xml",
            "customXml/item1.xml",
            "xl/calcChain.xml",
        ] {
            assert_eq!(PartKind::classify(path), PartKind::Unknown, "{path}");
        }
    }

    #[test]
    fn test_canonical_path_roundtrip() {
        for kind in [
            PartKind::Worksheet(4),
            PartKind::WorksheetRels(4),
            PartKind::Drawing("drawing1".to_string()),
            PartKind::Theme("theme1".to_string()),
            PartKind::WorkbookRels,
        ] {
            let path = kind.path().unwrap();
            assert_eq!(PartKind::classify(&path), kind);
        }
        assert_eq!(PartKind::Unknown.path(), None);
    }
}
