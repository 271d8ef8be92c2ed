//! Drawing model structures.

use super::Medium;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A cell-relative anchor point (`<xdr:from>` / `<xdr:to>`), 0-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub col: u32,
    pub col_off: i64,
    pub row: u32,
    pub row_off: i64,
}

impl Marker {
    /// A marker at the top-left corner of a cell.
    pub fn at(col: u32, row: u32) -> Self {
        Self {
            col,
            row,
            ..Default::default()
        }
    }
}

/// A picture placed by an anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picture {
    /// Shape name
    pub name: String,

    /// Alt text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The image shown
    pub medium: Arc<Medium>,
}

/// A two-cell anchor holding a picture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub from: Marker,
    pub to: Marker,

    /// `editAs` attribute (`oneCell`, `twoCell`, `absolute`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_as: Option<String>,

    pub picture: Picture,
}

/// A worksheet drawing with picture references resolved to media.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Drawing {
    pub anchors: Vec<Anchor>,
}

impl Drawing {
    /// Media referenced by this drawing, in anchor order.
    pub fn media(&self) -> impl Iterator<Item = &Arc<Medium>> {
        self.anchors.iter().map(|a| &a.picture.medium)
    }
}
