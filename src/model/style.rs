//! Resolved cell style structures.
//!
//! Styles are passed through, not interpreted: fonts, fills and borders are
//! carried as the XML fragment they were read from.

use serde::{Deserialize, Serialize};

/// A number format reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberFormat {
    /// One of the built-in formats, by id
    Builtin(u32),
    /// A custom format code
    Custom(String),
}

/// A verbatim XML element from the styles part (`<font>`, `<fill>` or `<border>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct XmlFragment(pub String);

impl XmlFragment {
    /// Wrap raw XML.
    pub fn new(xml: impl Into<String>) -> Self {
        Self(xml.into())
    }

    /// The raw XML text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Cell alignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub wrap_text: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<u32>,
}

impl Alignment {
    /// Check if every field holds its default.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A cell style with every index resolved to its content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_format: Option<NumberFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<XmlFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<XmlFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<XmlFragment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

impl CellStyle {
    /// A style with only a number format.
    pub fn number_format(format: NumberFormat) -> Self {
        Self {
            number_format: Some(format),
            ..Default::default()
        }
    }

    /// Check if this style is indistinguishable from the workbook default.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
