//! Workbook and worksheet model structures.

use super::{CellStyle, Drawing, DocumentProperties, Medium};
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A cell coordinate, 1-based in both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    /// Row number (1-based)
    pub row: u32,
    /// Column number (1-based, A = 1)
    pub col: u32,
}

impl CellRef {
    /// Create a reference from 1-based row and column numbers.
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Column letters for a 1-based column number.
    pub fn column_name(mut col: u32) -> String {
        let mut letters = Vec::new();
        while col > 0 {
            let rem = (col - 1) % 26;
            letters.push(b'A' + rem as u8);
            col = (col - 1) / 26;
        }
        letters.reverse();
        String::from_utf8(letters).unwrap_or_default()
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::column_name(self.col), self.row)
    }
}

impl FromStr for CellRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| Error::InvalidData(format!("bad cell reference {s}")))?;
        let (letters, digits) = s.split_at(split);
        if letters.is_empty()
            || letters.len() > 3
            || !letters.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(Error::InvalidData(format!("bad cell reference {s}")));
        }
        let col = letters
            .bytes()
            .fold(0u32, |acc, b| acc * 26 + u32::from(b.to_ascii_uppercase() - b'A' + 1));
        let row = digits
            .parse::<u32>()
            .map_err(|_| Error::InvalidData(format!("bad cell reference {s}")))?;
        if row == 0 {
            return Err(Error::InvalidData(format!("bad cell reference {s}")));
        }
        Ok(Self { row, col })
    }
}

impl Serialize for CellRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CellRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// The value held by a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// A cell that carries only formatting
    Empty,
    /// Numeric value
    Number(f64),
    /// Text, stored through the shared-strings table or inline
    Text(String),
    /// Boolean
    Bool(bool),
    /// Error literal such as `#DIV/0!`
    Error(String),
    /// Formula text with its cached result, if any
    Formula {
        /// Formula without the leading `=`
        formula: String,
        /// Cached result as stored in the part
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// A resolved cell: value plus its resolved style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell value
    pub value: CellValue,

    /// Resolved style; `None` means the workbook default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
}

impl Cell {
    /// Create an unstyled cell.
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            style: None,
        }
    }

    /// Attach a style.
    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = Some(style);
        self
    }
}

/// Visibility of a worksheet tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SheetState {
    #[default]
    Visible,
    Hidden,
    VeryHidden,
}

impl SheetState {
    /// Parse the `state` attribute of a workbook `<sheet>` element.
    pub fn from_attr(value: &str) -> Self {
        match value {
            "hidden" => SheetState::Hidden,
            "veryHidden" => SheetState::VeryHidden,
            _ => SheetState::Visible,
        }
    }

    /// Attribute value, or `None` for the default.
    pub fn as_attr(self) -> Option<&'static str> {
        match self {
            SheetState::Visible => None,
            SheetState::Hidden => Some("hidden"),
            SheetState::VeryHidden => Some("veryHidden"),
        }
    }
}

/// A worksheet with all of its references resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    /// Sheet id; also names the part (`sheet{id}.xml`) on write
    pub id: u32,

    /// Tab name
    pub name: String,

    /// Tab visibility
    #[serde(default)]
    pub state: SheetState,

    /// Cells keyed by coordinate
    #[serde(default)]
    pub cells: BTreeMap<CellRef, Cell>,

    /// Merged ranges in A1 notation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<String>,

    /// Drawing attached to the sheet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drawing: Option<Drawing>,

    /// Background picture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Arc<Medium>>,

    /// Workbook-scoped relationship id, assigned by the writer
    #[serde(skip)]
    pub rel_id: Option<String>,
}

impl Worksheet {
    /// Create an empty worksheet.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set a cell value, keeping any existing style.
    pub fn set_value(&mut self, reference: CellRef, value: impl Into<CellValue>) -> &mut Cell {
        let value = value.into();
        let cell = self
            .cells
            .entry(reference)
            .or_insert_with(|| Cell::new(CellValue::Empty));
        cell.value = value;
        cell
    }

    /// Get a cell.
    pub fn cell(&self, reference: CellRef) -> Option<&Cell> {
        self.cells.get(&reference)
    }

    /// Get a cell by its A1 reference.
    pub fn cell_a1(&self, reference: &str) -> Option<&Cell> {
        reference.parse().ok().and_then(|r| self.cells.get(&r))
    }
}

/// A workbook-level defined name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinedName {
    /// Name
    pub name: String,

    /// Formula the name refers to, e.g. `Sheet1!$A$1:$B$2`
    pub refers_to: String,

    /// Index of the sheet the name is scoped to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_sheet_id: Option<u32>,

    /// Hidden from the name manager
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

/// A workbook window (`<workbookView>`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkbookView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_window: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_window: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_width: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_height: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_tab: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_sheet: Option<u32>,
}

/// A fully reconciled spreadsheet document.
///
/// A `Workbook` is produced by the package reader and consumed by the package
/// writer. Writing mutates it in place (default properties, worksheet ids and
/// relationship ids), so a workbook cannot be read into and written at the same
/// time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    /// Worksheets in tab order
    #[serde(default)]
    pub worksheets: Vec<Worksheet>,

    /// Defined names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defined_names: Vec<DefinedName>,

    /// Workbook windows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<WorkbookView>,

    /// Core and app properties
    #[serde(default)]
    pub properties: DocumentProperties,

    /// Theme XML keyed by theme name (e.g. `theme1`)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub themes: BTreeMap<String, String>,

    /// Embedded media.
    ///
    /// A read workbook lists media by name stem, trailing number and file
    /// name (`image2` before `image10`), not in the order they were added.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Arc<Medium>>,
}

impl Workbook {
    /// Create a new empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a worksheet with the next free id.
    pub fn add_worksheet(&mut self, name: impl Into<String>) -> &mut Worksheet {
        let id = self.worksheets.iter().map(|ws| ws.id).max().unwrap_or(0) + 1;
        self.worksheets.push(Worksheet::new(id, name));
        let last = self.worksheets.len() - 1;
        &mut self.worksheets[last]
    }

    /// Get a worksheet by tab name.
    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name == name)
    }

    /// Get a mutable worksheet by tab name.
    pub fn worksheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        self.worksheets.iter_mut().find(|ws| ws.name == name)
    }

    /// Register a medium and return the shared handle used by drawings.
    pub fn add_medium(&mut self, medium: Medium) -> Arc<Medium> {
        let medium = Arc::new(medium);
        self.media.push(Arc::clone(&medium));
        medium
    }

    /// Look a medium up by file name (`image1.png`) or bare name (`image1`).
    pub fn medium(&self, key: &str) -> Option<&Arc<Medium>> {
        self.media
            .iter()
            .find(|m| m.filename() == key)
            .or_else(|| self.media.iter().find(|m| m.name == key))
    }

    /// Total number of cells across all worksheets.
    pub fn cell_count(&self) -> usize {
        self.worksheets.iter().map(|ws| ws.cells.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_ref_parse_and_display() {
        let r: CellRef = "B3".parse().unwrap();
        assert_eq!(r, CellRef::new(3, 2));
        assert_eq!(r.to_string(), "B3");

        let r: CellRef = "AA10".parse().unwrap();
        assert_eq!(r.col, 27);
        assert_eq!(r.to_string(), "AA10");

        let r: CellRef = "XFD1048576".parse().unwrap();
        assert_eq!(r.col, 16384);

        assert!("12".parse::<CellRef>().is_err());
        assert!("A0".parse::<CellRef>().is_err());
        assert!("A-1".parse::<CellRef>().is_err());
    }

    #[test]
    fn test_cell_ref_ordering() {
        let a: CellRef = "Z1".parse().unwrap();
        let b: CellRef = "A2".parse().unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_add_worksheet_ids() {
        let mut wb = Workbook::new();
        wb.add_worksheet("One");
        wb.worksheets.push(Worksheet::new(7, "Seven"));
        let ws = wb.add_worksheet("Eight");
        assert_eq!(ws.id, 8);
        assert!(wb.worksheet("Seven").is_some());
    }

    #[test]
    fn test_medium_lookup_by_either_key() {
        let mut wb = Workbook::new();
        let handle = wb.add_medium(Medium::from_buffer("image1", "png", vec![1, 2]));
        let by_file = wb.medium("image1.png").unwrap();
        let by_name = wb.medium("image1").unwrap();
        assert!(Arc::ptr_eq(by_file, by_name));
        assert!(Arc::ptr_eq(by_file, &handle));
        assert!(wb.medium("image2").is_none());
    }

    #[test]
    fn test_serialize_cells_as_a1_keys() {
        let mut ws = Worksheet::new(1, "Data");
        ws.set_value(CellRef::new(1, 1), "hello");
        ws.set_value(CellRef::new(2, 3), 4.5);
        let json = serde_json::to_value(&ws).unwrap();
        assert_eq!(json["cells"]["A1"]["value"]["type"], "text");
        assert_eq!(json["cells"]["C2"]["value"]["value"], 4.5);
    }
}
