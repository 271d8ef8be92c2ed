//! # xlsxpack
//!
//! Package orchestration for XLSX spreadsheets.
//!
//! An XLSX file is a ZIP archive of interdependent parts: the workbook, its
//! worksheets, a shared-strings table, styles, drawings, media and the
//! relationship files that tie them together. This crate reads such archives
//! in whatever order the entries arrive and resolves every cross-part
//! reference into a plain [`Workbook`]; on write it allocates relationship
//! ids and emits the parts in dependency order.
//!
//! ## Quick Start
//!
//! ```no_run
//! use xlsxpack::{CellRef, Workbook, WriteOptions};
//!
//! # async fn demo() -> xlsxpack::Result<()> {
//! let mut workbook = Workbook::new();
//! let sheet = workbook.add_worksheet("Summary");
//! sheet.set_value(CellRef::new(1, 1), "Total");
//! sheet.set_value(CellRef::new(1, 2), 1250.0);
//!
//! let bytes = workbook.write_buffer(WriteOptions::default()).await?;
//! let again = Workbook::load(&bytes, Default::default()).await?;
//! assert_eq!(again.worksheets[0].name, "Summary");
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom archives
//!
//! [`container::EntrySource`] and [`container::ArchiveSink`] abstract the
//! archive on either side; [`Workbook::read_source`] and
//! [`Workbook::write_to_sink`] accept any implementation.

pub mod container;
pub mod error;
pub mod model;
pub mod xlsx;

// Re-exports
pub use container::{
    ArchiveSink, EntrySource, MemoryEntrySource, MemorySink, Relationship, Relationships,
    ZipEntrySource, ZipSink,
};
pub use error::{Error, ErrorKind, Result};
pub use model::{
    Anchor, Cell, CellRef, CellStyle, CellValue, DefinedName, DocumentProperties, Drawing,
    MediaSource, Medium, Marker, Picture, SheetState, Workbook, WorkbookView, Worksheet,
};
pub use xlsx::{LoadOptions, WriteOptions};
