//! Document model for spreadsheet packages.
//!
//! This module defines the public, fully cross-referenced representation of a
//! workbook. The package reader produces it and the package writer consumes it;
//! nothing in here holds an unresolved relationship id or table index.

mod drawing;
mod media;
mod properties;
mod style;
mod workbook;

pub use drawing::*;
pub use media::*;
pub use properties::*;
pub use style::*;
pub use workbook::*;
